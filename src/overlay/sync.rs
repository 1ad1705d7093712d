use std::sync::{Arc, Mutex};

use crate::chart::{ChartAdapter, ChartBackend, Color, Projector, SubscriptionId};
use crate::internal::lock::lock;
use crate::overlay::dom::{Border, BorderSide, Display, ElementId, Fill, Layer, Length, Style};
use crate::overlay::geometry::{
    BandFrame, BandGeometry, MarkerFrame, OverlayConfig, OverlayFrame, TradeLevels, compute_frame,
};

const BAND_UPPER: Color = Color::new("rgba(11, 99, 81, 0.4)");
const BAND_LOWER: Color = Color::new("rgba(81, 19, 24, 0.4)");
const MARKER_GOLD: Color = Color::new("#FFD700");

/// Ids of every element one trade overlay owns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayNodes {
    pub band: ElementId,
    pub take_profit_line: ElementId,
    pub stop_loss_line: ElementId,
    pub entry_line: ElementId,
    pub entry_label: ElementId,
    pub take_profit_label: ElementId,
    pub stop_loss_label: ElementId,
    pub marker_line: ElementId,
    pub marker_dot: ElementId,
}

impl OverlayNodes {
    fn all(&self) -> [ElementId; 9] {
        [
            self.take_profit_line,
            self.stop_loss_line,
            self.entry_line,
            self.band,
            self.entry_label,
            self.take_profit_label,
            self.stop_loss_label,
            self.marker_line,
            self.marker_dot,
        ]
    }

    /// Creates the elements with their static look. Positions are filled in by [`apply_frame`].
    pub fn create(layer: &mut Layer, levels: &TradeLevels, cfg: &OverlayConfig) -> Self {
        let band = layer.create(
            None,
            Style {
                z_index: 2,
                ..Style::default()
            },
        );
        let take_profit_line = layer.create(
            Some(band),
            dashed_rule(
                Color::new("#088D25"),
                Color::new("rgba(8, 141, 37, 0.6)"),
            ),
        );
        let stop_loss_line = layer.create(
            Some(band),
            dashed_rule(
                Color::new("#E92424"),
                Color::new("rgba(233, 36, 36, 0.6)"),
            ),
        );
        let entry_line = layer.create(
            Some(band),
            dashed_rule(
                Color::new("#00BDDD"),
                Color::new("rgba(0, 189, 221, 0.6)"),
            ),
        );

        let entry_label = layer.create(
            None,
            pill(
                Color::new("rgba(0, 189, 221, 0.9)"),
                Color::new("#1F1F1F"),
                (2.0, 8.0),
                4.0,
                11.0,
                None,
            ),
        );
        layer.set_text(entry_label, levels.entry_text());

        let take_profit_label = layer.create(
            None,
            pill(
                Color::new("rgba(15, 237, 190, 0.9)"),
                Color::new("#1F1F1F"),
                (4.0, 10.0),
                8.0,
                12.0,
                Some(Color::new("rgba(15, 237, 190, 0.4)")),
            ),
        );
        layer.set_text(take_profit_label, levels.take_profit_text());

        let stop_loss_label = layer.create(
            None,
            pill(
                Color::new("rgba(246, 60, 107, 0.9)"),
                Color::new("#FFFFFF"),
                (4.0, 10.0),
                8.0,
                12.0,
                Some(Color::new("rgba(246, 60, 107, 0.4)")),
            ),
        );
        layer.set_text(stop_loss_label, levels.stop_loss_text());

        let marker_line = layer.create(
            None,
            Style {
                width: Some(Length::Px(0.0)),
                bottom: Some(Length::Px(cfg.bottom_margin)),
                z_index: 3,
                border: Some(Border {
                    side: BorderSide::Left,
                    width: 2.0,
                    dashed: true,
                    color: MARKER_GOLD,
                }),
                glow: Some(Color::new("rgba(255, 215, 0, 0.6)")),
                ..Style::default()
            },
        );
        let marker_dot = layer.create(
            None,
            Style {
                width: Some(Length::Px(16.0)),
                height: Some(Length::Px(16.0)),
                bottom: Some(Length::Px(cfg.bottom_margin)),
                z_index: 4,
                background: Some(Fill::Solid(MARKER_GOLD)),
                border_radius: Some(Length::Percent(50.0)),
                translate_x: Some(-50.0),
                glow: Some(Color::new("rgba(255, 215, 0, 0.8)")),
                ..Style::default()
            },
        );

        Self {
            band,
            take_profit_line,
            stop_loss_line,
            entry_line,
            entry_label,
            take_profit_label,
            stop_loss_label,
            marker_line,
            marker_dot,
        }
    }
}

fn dashed_rule(color: Color, glow: Color) -> Style {
    Style {
        height: Some(Length::Px(0.0)),
        width: Some(Length::Percent(100.0)),
        border: Some(Border {
            side: BorderSide::Top,
            width: 2.0,
            dashed: true,
            color,
        }),
        glow: Some(glow),
        ..Style::default()
    }
}

fn pill(
    background: Color,
    color: Color,
    padding: (f64, f64),
    radius: f64,
    font_size: f64,
    glow: Option<Color>,
) -> Style {
    Style {
        z_index: 5,
        background: Some(Fill::Solid(background)),
        color: Some(color),
        padding: Some(padding),
        border_radius: Some(Length::Px(radius)),
        font_size: Some(font_size),
        glow,
        ..Style::default()
    }
}

fn edit(layer: &mut Layer, id: ElementId, f: impl FnOnce(&mut Style)) {
    if let Some(style) = layer.style_mut(id) {
        f(style);
    }
}

/// Writes a frame onto the layer. Elements the frame says nothing about keep their last state.
pub fn apply_frame(layer: &mut Layer, nodes: &OverlayNodes, frame: &OverlayFrame) {
    match frame.band {
        BandFrame::Hidden => {
            for id in [
                nodes.band,
                nodes.take_profit_label,
                nodes.stop_loss_label,
                nodes.entry_label,
            ] {
                layer.set_display(id, Display::None);
            }
        }
        BandFrame::Vertical { top, height } => {
            for id in [nodes.band, nodes.take_profit_label, nodes.stop_loss_label] {
                layer.set_display(id, Display::Block);
            }
            edit(layer, nodes.band, |s| {
                s.top = Some(Length::Px(top));
                s.height = Some(Length::Px(height));
            });
        }
        BandFrame::Placed(ref g) => apply_band(layer, nodes, g),
    }

    match frame.marker {
        MarkerFrame::Hidden => {
            layer.set_display(nodes.marker_line, Display::None);
            layer.set_display(nodes.marker_dot, Display::None);
        }
        MarkerFrame::Placed { x, height } => {
            edit(layer, nodes.marker_line, |s| {
                s.display = Display::Block;
                s.left = Some(Length::Px(x));
                s.height = Some(Length::Px(height));
            });
            edit(layer, nodes.marker_dot, |s| {
                s.display = Display::Block;
                s.left = Some(Length::Px(x));
            });
        }
    }
}

fn apply_band(layer: &mut Layer, nodes: &OverlayNodes, g: &BandGeometry) {
    let r = g.rect;
    edit(layer, nodes.band, |s| {
        s.display = Display::Block;
        s.top = Some(Length::Px(r.top));
        s.left = Some(Length::Px(r.left));
        s.width = Some(Length::Px(r.width));
        s.height = Some(Length::Px(r.height));
    });
    edit(layer, nodes.take_profit_line, |s| {
        s.width = Some(Length::Percent(100.0));
        s.top = Some(Length::Px(0.0));
    });
    edit(layer, nodes.stop_loss_line, |s| {
        s.width = Some(Length::Percent(100.0));
        s.bottom = Some(Length::Px(0.0));
    });

    match g.entry {
        Some(e) => {
            edit(layer, nodes.band, |s| {
                s.background = Some(match e.split {
                    Some(at) => Fill::Split {
                        upper: BAND_UPPER,
                        lower: BAND_LOWER,
                        at,
                    },
                    None => Fill::Solid(BAND_UPPER),
                });
            });
            edit(layer, nodes.entry_line, |s| {
                s.top = Some(Length::Px(e.offset));
                s.left = Some(Length::Px(0.0));
                s.width = Some(Length::Px(e.line_width));
            });
            edit(layer, nodes.entry_label, |s| {
                s.display = Display::Block;
                s.right = Some(Length::Px(e.label_right));
                s.top = Some(Length::Px(e.label_top));
            });
        }
        None => layer.set_display(nodes.entry_label, Display::None),
    }

    let l = g.labels;
    for (id, top) in [
        (nodes.take_profit_label, l.take_profit_top),
        (nodes.stop_loss_label, l.stop_loss_top),
    ] {
        edit(layer, id, |s| {
            s.display = Display::Block;
            s.font_size = Some(l.font_size);
            s.padding = Some(l.padding);
            s.left = Some(Length::Px(l.center_x));
            s.top = Some(Length::Px(top));
            s.translate_x = Some(-50.0);
        });
    }
}

fn pass(me: Arc<OverlaySynchronizer>) -> impl Fn(&dyn Projector) + Send + Sync + 'static {
    move |p: &dyn Projector| {
        me.sync(p);
    }
}

/// Keeps one trade overlay locked to a chart's pixel space.
pub struct OverlaySynchronizer {
    layer: Arc<Mutex<Layer>>,
    nodes: OverlayNodes,
    levels: TradeLevels,
    config: OverlayConfig,
    last: Mutex<Option<OverlayFrame>>,
}

impl OverlaySynchronizer {
    /// Creates the overlay's elements on `layer`.
    pub fn mount(layer: Arc<Mutex<Layer>>, levels: TradeLevels, config: OverlayConfig) -> Arc<Self> {
        let nodes = OverlayNodes::create(&mut lock(&layer), &levels, &config);
        Arc::new(Self {
            layer,
            nodes,
            levels,
            config,
            last: Mutex::new(None),
        })
    }

    pub fn nodes(&self) -> &OverlayNodes {
        &self.nodes
    }

    pub fn levels(&self) -> &TradeLevels {
        &self.levels
    }

    pub fn config(&self) -> &OverlayConfig {
        &self.config
    }

    /// Frame written by the most recent pass.
    pub fn last_frame(&self) -> Option<OverlayFrame> {
        *lock(&self.last)
    }

    /// Runs one synchronization pass.
    pub fn sync(&self, p: &dyn Projector) -> OverlayFrame {
        let frame = compute_frame(p, &self.levels, &self.config);
        apply_frame(&mut lock(&self.layer), &self.nodes, &frame);
        *lock(&self.last) = Some(frame);
        frame
    }

    /// Subscribes a pass to size, visible-range and crosshair events. The returned ids are the
    /// caller's to release.
    pub fn attach<B: ChartBackend>(self: &Arc<Self>, chart: &mut ChartAdapter<B>) -> Vec<SubscriptionId> {
        vec![
            chart.on_size_change(pass(self.clone())),
            chart.on_visible_range_change(pass(self.clone())),
            chart.on_crosshair_move(pass(self.clone())),
        ]
    }

    /// Removes every element this overlay created. Safe to call more than once.
    pub fn release(&self) {
        let mut layer = lock(&self.layer);
        for id in self.nodes.all() {
            layer.remove(id);
        }
    }
}
