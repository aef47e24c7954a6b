//! facemesh-overlay — Rendering of landmark analyses onto a drawing surface.
//!
//! Maps frame coordinates into view space, tints landmarks by depth and
//! composes the face box, landmark circles and segments into a render list
//! that paints onto any [`Canvas`].

pub mod canvas;
pub mod color;
pub mod graphics;
pub mod transform;

pub use canvas::{Canvas, ImageCanvas, OverlayError};
pub use color::depth_color;
pub use graphics::{build_overlay, Drawable, OverlayStyle, RenderList};
pub use transform::ViewTransform;
