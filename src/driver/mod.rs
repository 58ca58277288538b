pub mod probe;
pub mod traits;
pub mod web;

#[cfg(test)]
pub mod testing;

pub use traits::{BoundingBox, CaptureArea, QaBrowser, QaPage};
