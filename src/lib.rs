#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::struct_field_names,
    clippy::must_use_candidate
)]

pub mod config;
pub mod diff;
pub mod error;
pub mod gateway;
pub mod history;
pub mod providers;
pub mod rewrite;
pub mod ui;
pub mod utils;

pub use config::Config;
pub use error::{ConfigError, RewriteError};
