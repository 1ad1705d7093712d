//! Overlay synchronizer: DOM-style elements kept aligned with a chart's pixel space.
//!
//! [`compute_frame`] is the pure geometry pass; [`OverlaySynchronizer`] owns the elements,
//! applies frames and wires the pass to chart events. [`ResizeDispatcher`] is the single
//! window-resize source overlays register against.

pub mod dom;
mod geometry;
mod resize;
mod sync;

pub use dom::{Display, Element, ElementId, Fill, Layer, Length, Style};
pub use geometry::{
    BandFrame, BandGeometry, EntryGeometry, FontClamp, LabelGeometry, MarkerFrame, OverlayConfig,
    OverlayFrame, Rect, SplitPolicy, TradeLevels, compute_frame,
};
pub use resize::{ResizeDispatcher, ResizeListener, ResizeRegistration};
pub use sync::{OverlayNodes, OverlaySynchronizer, apply_frame};
