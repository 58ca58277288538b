pub mod config;

pub use config::{Config, HoverTarget, PageTarget, Viewport};
