//! Request handlers.

pub mod health;
pub mod image;
pub mod text;

pub use health::*;
pub use image::*;
pub use text::*;
