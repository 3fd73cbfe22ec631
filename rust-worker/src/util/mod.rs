//! Small helpers shared by the binaries.

pub mod logging;

pub use logging::init_logging;
