//! Chart appearance: theme palettes, series styles and price-scale margins.

use std::borrow::Cow;

use serde::Serialize;

use crate::core::Direction;

/// A CSS colour string (`#rrggbb` or `rgba(...)`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Color(pub Cow<'static, str>);

impl Color {
    pub const fn new(s: &'static str) -> Self {
        Color(Cow::Borrowed(s))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for Color {
    fn from(s: String) -> Self {
        Color(Cow::Owned(s))
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub const UP_COLOR: Color = Color::new("#0FEDBE");
pub const DOWN_COLOR: Color = Color::new("#F63C6B");

/// Fixed palettes of the two chart screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrosshairMode {
    #[default]
    Normal,
    Magnet,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutOptions {
    pub background: Color,
    pub text_color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GridOptions {
    pub vert_lines: Color,
    pub horz_lines: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TimeScaleOptions {
    pub border_color: Color,
    pub time_visible: bool,
    pub seconds_visible: bool,
}

/// Surface-wide options applied once at construction.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub auto_size: bool,
    pub layout: LayoutOptions,
    pub grid: GridOptions,
    pub crosshair: CrosshairMode,
    pub right_price_scale_border: Color,
    pub time_scale: TimeScaleOptions,
}

impl ChartOptions {
    pub fn themed(theme: Theme) -> Self {
        let (background, text, grid, border) = match theme {
            Theme::Dark => ("#1F1F1F", "#d1d4dc", "#2a2a2a", "#3a3a3a"),
            Theme::Light => ("#ffffff", "#333", "#f0f0f0", "#d1d4dc"),
        };
        Self {
            auto_size: true,
            layout: LayoutOptions {
                background: Color::new(background),
                text_color: Color::new(text),
            },
            grid: GridOptions {
                vert_lines: Color::new(grid),
                horz_lines: Color::new(grid),
            },
            crosshair: CrosshairMode::Normal,
            right_price_scale_border: Color::new(border),
            time_scale: TimeScaleOptions {
                border_color: Color::new(border),
                time_visible: true,
                seconds_visible: false,
            },
        }
    }
}

impl From<Theme> for ChartOptions {
    fn from(theme: Theme) -> Self {
        Self::themed(theme)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandleStyle {
    pub up_color: Color,
    pub down_color: Color,
    pub border_up_color: Color,
    pub border_down_color: Color,
    pub wick_up_color: Color,
    pub wick_down_color: Color,
}

impl Default for CandleStyle {
    fn default() -> Self {
        Self {
            up_color: UP_COLOR,
            down_color: DOWN_COLOR,
            border_up_color: UP_COLOR,
            border_down_color: DOWN_COLOR,
            wick_up_color: UP_COLOR,
            wick_down_color: DOWN_COLOR,
        }
    }
}

/// Histogram (volume) series style.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramStyle {
    /// Id of the price scale the series is bound to. Series sharing an id share a scale.
    pub price_scale_id: String,
    /// Fallback colour for bars that carry none.
    pub color: Color,
    pub volume_format: bool,
}

impl HistogramStyle {
    /// Volume on its own scale, for overlaying on a candle chart.
    pub fn volume_overlay() -> Self {
        Self {
            price_scale_id: "volume".into(),
            color: Color::new("#26a69a"),
            volume_format: true,
        }
    }

    /// Volume on the right scale of a dedicated chart.
    pub fn volume_pane() -> Self {
        Self {
            price_scale_id: "right".into(),
            ..Self::volume_overlay()
        }
    }
}

/// Fractions of the pane height kept free above and below a price scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScaleMargins {
    pub top: f64,
    pub bottom: f64,
}

impl ScaleMargins {
    /// Pins a series to the bottom 15% of the pane.
    pub const VOLUME: ScaleMargins = ScaleMargins { top: 0.85, bottom: 0.0 };
}

impl Default for ScaleMargins {
    fn default() -> Self {
        Self { top: 0.2, bottom: 0.1 }
    }
}

/// Per-bar colours of the volume histogram.
pub fn volume_color(direction: Direction) -> Color {
    match direction {
        Direction::Up => Color::new("rgba(38, 166, 154, 0.5)"),
        Direction::Down => Color::new("rgba(239, 83, 80, 0.5)"),
    }
}
