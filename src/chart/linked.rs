//! Two charts (candles above, volume below) whose visible time ranges move together.

use crate::chart::{ChartAdapter, ChartBackend, Size, Theme};
use crate::core::PriceSeries;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Price,
    Volume,
}

/// A price chart and a separate volume chart kept on the same visible range.
///
/// Every pan or zoom on one pane is mirrored onto the other. The mirror only writes when the
/// ranges differ, so a follower never echoes back into its leader.
pub struct LinkedCharts<B> {
    price: ChartAdapter<B>,
    volume: ChartAdapter<B>,
}

impl<B: ChartBackend> LinkedCharts<B> {
    pub fn new(price: B, volume: B, theme: Theme) -> Self {
        Self {
            price: ChartAdapter::price_pane(price, theme),
            volume: ChartAdapter::volume_pane(volume, theme),
        }
    }

    pub fn bind(&mut self, series: &PriceSeries) {
        self.price.bind_candles(&series.candles);
        self.volume.bind_volume(&series.volumes);
        self.mirror_from(Pane::Price);
    }

    pub fn pane(&self, pane: Pane) -> &ChartAdapter<B> {
        match pane {
            Pane::Price => &self.price,
            Pane::Volume => &self.volume,
        }
    }

    fn pane_mut(&mut self, pane: Pane) -> &mut ChartAdapter<B> {
        match pane {
            Pane::Price => &mut self.price,
            Pane::Volume => &mut self.volume,
        }
    }

    pub fn scroll(&mut self, pane: Pane, bars: f64) {
        self.pane_mut(pane).backend_mut().scroll_by(bars);
        self.mirror_from(pane);
    }

    pub fn zoom(&mut self, pane: Pane, factor: f64) {
        self.pane_mut(pane).backend_mut().zoom(factor);
        self.mirror_from(pane);
    }

    /// Follows a container width change; each pane keeps its own height.
    pub fn resize(&mut self, width: f64) {
        for pane in [Pane::Price, Pane::Volume] {
            let backend = self.pane_mut(pane).backend_mut();
            let height = backend.container_size().height;
            backend.set_size(Size::new(width, height));
        }
        self.mirror_from(Pane::Price);
    }

    fn mirror_from(&mut self, leader: Pane) {
        let follower = match leader {
            Pane::Price => Pane::Volume,
            Pane::Volume => Pane::Price,
        };
        let Some(range) = self.pane(leader).backend().visible_time_range() else {
            return;
        };
        if self.pane(follower).backend().visible_time_range() != Some(range) {
            self.pane_mut(follower)
                .backend_mut()
                .set_visible_time_range(range);
        }
    }

    pub fn remove(&mut self) {
        self.price.remove();
        self.volume.remove();
    }
}
