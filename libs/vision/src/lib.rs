pub mod common;
pub mod annotate;
pub mod format;
pub mod overlay;
pub mod service;
