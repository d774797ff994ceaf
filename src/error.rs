//! Setup-time errors. Runtime animation operations never fail.

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SetupError {
    #[error("label catalogue is empty, nothing to explode into")]
    NoLabels,

    #[error("{count} labels given, at most {max} fragments are supported")]
    TooManyLabels { count: usize, max: usize },

    #[error("parameter `{name}` has invalid value {value}")]
    InvalidParameter { name: &'static str, value: f64 },

    #[error("label `{label}` has unreadable color `{color}` (expected #rrggbb)")]
    InvalidColor { label: String, color: String },
}
