//! Observability module - access logging.

mod access_log;

pub use access_log::AccessLog;
