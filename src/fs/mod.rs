//! Filesystem helpers: name sanitization and path construction.

pub mod naming;
pub mod paths;

pub use naming::sanitize;
pub use paths::{course_dir, ensure_dir, material_path, temp_path};
