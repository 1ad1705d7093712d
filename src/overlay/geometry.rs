//! The synchronization pass as a pure function of the chart's current projections.

use serde::Serialize;

use crate::chart::Projector;
use crate::core::ChartDate;

/// Price levels and time anchors of one trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeLevels {
    pub entry: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub entry_time: ChartDate,
    pub exit_time: ChartDate,
}

impl TradeLevels {
    /// Derives take-profit and stop-loss as multiples of the entry price.
    pub fn from_entry(
        entry: f64,
        take_profit_ratio: f64,
        stop_loss_ratio: f64,
        entry_time: ChartDate,
        exit_time: ChartDate,
    ) -> Self {
        Self {
            entry,
            take_profit: entry * take_profit_ratio,
            stop_loss: entry * stop_loss_ratio,
            entry_time,
            exit_time,
        }
    }

    pub fn take_profit_pct(&self) -> f64 {
        (self.take_profit - self.entry) / self.entry * 100.0
    }

    pub fn stop_loss_pct(&self) -> f64 {
        (self.stop_loss - self.entry) / self.entry * 100.0
    }

    pub fn take_profit_text(&self) -> String {
        format!("Take Profit: +{:.2}%", self.take_profit_pct())
    }

    pub fn stop_loss_text(&self) -> String {
        format!("Stop Loss: {:.2}%", self.stop_loss_pct())
    }

    pub fn entry_text(&self) -> String {
        format!("Entry Price: {:.2}", self.entry)
    }
}

/// How the entry split fraction is reported when the entry row falls outside the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SplitPolicy {
    /// Raw `(entry - top) / height`, possibly outside `[0, 1]`.
    #[default]
    Unclamped,
    /// Clamped to `[0, 1]`.
    Clamped,
}

impl SplitPolicy {
    /// `None` for a degenerate (zero or non-finite height) band.
    pub fn fraction(self, offset: f64, height: f64) -> Option<f64> {
        if height.is_nan() || height <= 0.0 || !offset.is_finite() {
            return None;
        }
        let f = offset / height;
        Some(match self {
            SplitPolicy::Unclamped => f,
            SplitPolicy::Clamped => f.clamp(0.0, 1.0),
        })
    }
}

/// Label font size: `width / divisor`, bounded to `[min, max]` px.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontClamp {
    pub min: f64,
    pub max: f64,
    pub divisor: f64,
}

impl FontClamp {
    pub fn size_for(&self, width: f64) -> f64 {
        (width / self.divisor).min(self.max).max(self.min)
    }
}

impl Default for FontClamp {
    fn default() -> Self {
        Self {
            min: 10.0,
            max: 14.0,
            divisor: 25.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OverlayConfig {
    pub split_policy: SplitPolicy,
    pub font: FontClamp,
    /// Gap between the container bottom and the marker's circle.
    pub bottom_margin: f64,
    /// Take-profit label distance above the band, in font sizes.
    pub take_profit_lift: f64,
    /// Stop-loss label distance below the band, in font sizes.
    pub stop_loss_drop: f64,
    pub entry_label_right: f64,
    pub entry_label_lift: f64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            split_policy: SplitPolicy::Unclamped,
            font: FontClamp::default(),
            bottom_margin: 30.0,
            take_profit_lift: 2.5,
            stop_loss_drop: 0.5,
            entry_label_right: 8.0,
            entry_label_lift: 10.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Rect {
    pub top: f64,
    pub left: f64,
    pub width: f64,
    pub height: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LabelGeometry {
    pub font_size: f64,
    /// Vertical and horizontal padding.
    pub padding: (f64, f64),
    /// Horizontal centre shared by both labels.
    pub center_x: f64,
    pub take_profit_top: f64,
    pub stop_loss_top: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntryGeometry {
    /// Entry row relative to the band's top edge.
    pub offset: f64,
    /// Where the fill switches colour, as a fraction of the band height.
    pub split: Option<f64>,
    /// Entry line length: from the band's left edge to the container's right edge.
    pub line_width: f64,
    pub label_top: f64,
    /// Entry label distance from the container's right edge.
    pub label_right: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BandGeometry {
    pub rect: Rect,
    pub labels: LabelGeometry,
    pub entry: Option<EntryGeometry>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum BandFrame {
    /// A price bound has no projection: hide the band and its labels.
    Hidden,
    /// Price bounds project but a time anchor does not: only the vertical extent is known.
    Vertical { top: f64, height: f64 },
    Placed(BandGeometry),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum MarkerFrame {
    Hidden,
    /// Vertical line at `x` rising `height` px from the bottom margin.
    Placed { x: f64, height: f64 },
}

/// Output of one synchronization pass.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct OverlayFrame {
    pub band: BandFrame,
    pub marker: MarkerFrame,
}

/// Computes overlay geometry. Depends only on the projections and the fixed inputs, so calling
/// it again against an unchanged viewport yields the same frame.
pub fn compute_frame(p: &dyn Projector, levels: &TradeLevels, cfg: &OverlayConfig) -> OverlayFrame {
    OverlayFrame {
        band: band_frame(p, levels, cfg),
        marker: marker_frame(p, levels, cfg),
    }
}

fn finite(v: Option<f64>) -> Option<f64> {
    v.filter(|v| v.is_finite())
}

fn band_frame(p: &dyn Projector, levels: &TradeLevels, cfg: &OverlayConfig) -> BandFrame {
    let (Some(tp_y), Some(sl_y)) = (
        finite(p.price_to_pixel(levels.take_profit)),
        finite(p.price_to_pixel(levels.stop_loss)),
    ) else {
        return BandFrame::Hidden;
    };
    let top = tp_y.min(sl_y);
    let height = (sl_y - tp_y).abs();

    let (Some(x1), Some(x2)) = (
        finite(p.time_to_pixel(levels.entry_time)),
        finite(p.time_to_pixel(levels.exit_time)),
    ) else {
        return BandFrame::Vertical { top, height };
    };
    let left = x1.min(x2);
    let width = (x2 - x1).abs();

    let container = p.container_size();
    let entry = finite(p.price_to_pixel(levels.entry)).map(|entry_y| {
        let offset = entry_y - top;
        EntryGeometry {
            offset,
            split: cfg.split_policy.fraction(offset, height),
            line_width: container.width - left,
            label_top: entry_y - cfg.entry_label_lift,
            label_right: cfg.entry_label_right,
        }
    });

    let font_size = cfg.font.size_for(width);
    let labels = LabelGeometry {
        font_size,
        padding: (font_size * 0.4, font_size),
        center_x: left + width / 2.0,
        take_profit_top: top - font_size * cfg.take_profit_lift,
        stop_loss_top: top + height + font_size * cfg.stop_loss_drop,
    };

    BandFrame::Placed(BandGeometry {
        rect: Rect {
            top,
            left,
            width,
            height,
        },
        labels,
        entry,
    })
}

fn marker_frame(p: &dyn Projector, levels: &TradeLevels, cfg: &OverlayConfig) -> MarkerFrame {
    let (Some(x), Some(y)) = (
        finite(p.time_to_pixel(levels.entry_time)),
        finite(p.price_to_pixel(levels.entry)),
    ) else {
        return MarkerFrame::Hidden;
    };
    MarkerFrame::Placed {
        x,
        height: p.container_size().height - y - cfg.bottom_margin,
    }
}
