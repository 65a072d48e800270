//! Shared library for `GradeLens`
//! Contains the transcript parser, GPA math and peer aggregation used by the CLI

pub mod core;
pub mod logger;

pub use core::config;
pub use core::get_version;
