//! Core module for transcript parsing and GPA computation

pub mod config;
pub mod courses_export;
pub mod gpa;
pub mod models;
pub mod peers;
pub mod percentage;
pub mod predict;
pub mod transcript;

/// Returns the current version of the `GradeLens` crate
#[must_use]
pub const fn get_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
