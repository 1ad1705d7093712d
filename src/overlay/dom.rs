//! A retained layer of absolutely positioned elements drawn above the chart.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::chart::Color;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct ElementId(pub u32);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Display {
    #[default]
    Block,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Length {
    Px(f64),
    Percent(f64),
}

/// Element background.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Fill {
    Solid(Color),
    /// Two flat colours meeting at a hard edge, `at` being the fraction of the height from the
    /// top where `lower` begins.
    Split { upper: Color, lower: Color, at: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BorderSide {
    Top,
    Left,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Border {
    pub side: BorderSide,
    pub width: f64,
    pub dashed: bool,
    pub color: Color,
}

/// The subset of CSS box properties the overlay uses. `None` means "not set".
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Style {
    pub display: Display,
    pub top: Option<Length>,
    pub left: Option<Length>,
    pub right: Option<Length>,
    pub bottom: Option<Length>,
    pub width: Option<Length>,
    pub height: Option<Length>,
    pub z_index: i32,
    pub background: Option<Fill>,
    pub color: Option<Color>,
    pub border: Option<Border>,
    pub border_radius: Option<Length>,
    pub font_size: Option<f64>,
    /// Vertical and horizontal padding in px.
    pub padding: Option<(f64, f64)>,
    /// Horizontal self-translation as a percentage of the element's width.
    pub translate_x: Option<f64>,
    pub glow: Option<Color>,
}

impl Style {
    pub fn is_visible(&self) -> bool {
        self.display == Display::Block
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Element {
    pub parent: Option<ElementId>,
    pub style: Style,
    pub text: Option<String>,
}

/// Owns every overlay element of one chart container.
#[derive(Debug, Default)]
pub struct Layer {
    next: u32,
    nodes: BTreeMap<ElementId, Element>,
}

impl Layer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an element, optionally nested in `parent` (positions are then relative to it).
    pub fn create(&mut self, parent: Option<ElementId>, style: Style) -> ElementId {
        let id = ElementId(self.next);
        self.next += 1;
        self.nodes.insert(
            id,
            Element {
                parent,
                style,
                text: None,
            },
        );
        id
    }

    /// Removes an element and everything nested in it. Returns whether it existed.
    pub fn remove(&mut self, id: ElementId) -> bool {
        if self.nodes.remove(&id).is_none() {
            return false;
        }
        let children: Vec<ElementId> = self
            .nodes
            .iter()
            .filter(|(_, e)| e.parent == Some(id))
            .map(|(k, _)| *k)
            .collect();
        for child in children {
            self.remove(child);
        }
        true
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.nodes.get(&id)
    }

    pub fn style(&self, id: ElementId) -> Option<&Style> {
        self.nodes.get(&id).map(|e| &e.style)
    }

    pub fn style_mut(&mut self, id: ElementId) -> Option<&mut Style> {
        self.nodes.get_mut(&id).map(|e| &mut e.style)
    }

    pub fn set_text(&mut self, id: ElementId, text: impl Into<String>) {
        if let Some(e) = self.nodes.get_mut(&id) {
            e.text = Some(text.into());
        }
    }

    pub fn set_display(&mut self, id: ElementId, display: Display) {
        if let Some(s) = self.style_mut(id) {
            s.display = display;
        }
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}
