pub mod analysis;
pub mod driver;
pub mod error;
pub mod report;
pub mod runner;
pub mod utils;

// Re-export common items
pub use error::QaError;
pub use runner::{run_tool, Tool};
pub use utils::Config;
