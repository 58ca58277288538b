//! Pure classification over values read from the page

pub mod color;
pub mod flash;
pub mod hover;
pub mod layout;
