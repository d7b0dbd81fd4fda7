pub mod host;
pub mod range;
pub mod report;
pub mod target;
