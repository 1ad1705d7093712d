use std::time::Duration;

use crate::chart::Theme;
use crate::overlay::OverlayConfig;

/// Knobs of the animated trade chart.
///
/// Buy and sell points are positions counted back from the end of the data; they are inputs,
/// not derived from prices.
#[derive(Debug, Clone, PartialEq)]
pub struct TradeSetup {
    pub buy_offset: usize,
    pub sell_offset: usize,
    /// Take-profit as a multiple of the entry price.
    pub take_profit_ratio: f64,
    /// Stop-loss as a multiple of the entry price.
    pub stop_loss_ratio: f64,
    /// Replay period, one candle per tick.
    pub tick: Duration,
    pub theme: Theme,
    pub overlay: OverlayConfig,
}

impl Default for TradeSetup {
    fn default() -> Self {
        Self {
            buy_offset: 30,
            sell_offset: 10,
            take_profit_ratio: 1.03,
            stop_loss_ratio: 0.99,
            tick: Duration::from_millis(200),
            theme: Theme::Dark,
            overlay: OverlayConfig::default(),
        }
    }
}

impl TradeSetup {
    pub fn offsets(mut self, buy: usize, sell: usize) -> Self {
        self.buy_offset = buy;
        self.sell_offset = sell;
        self
    }

    pub fn ratios(mut self, take_profit: f64, stop_loss: f64) -> Self {
        self.take_profit_ratio = take_profit;
        self.stop_loss_ratio = stop_loss;
        self
    }

    pub fn tick(mut self, period: Duration) -> Self {
        self.tick = period;
        self
    }

    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn overlay(mut self, config: OverlayConfig) -> Self {
        self.overlay = config;
        self
    }
}
