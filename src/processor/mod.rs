pub mod base;
pub mod feed;
pub mod scan;

pub use base::{ProgressReporter, StandardProgressTracker};
pub use scan::ScanProcessor;
