//! CLI module for namecast
//!
//! Each command owns an [`context::CommandContext`] whose error sink is tagged
//! with the command name and flushed when the command ends.

pub mod config;
pub mod context;
pub mod error;
pub mod generate;
pub mod list;
pub mod output;
pub mod parse;
pub mod run;
pub mod select;

pub use error::HelpfulError;

/// Flags shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalArgs {
    pub error_dir: Option<String>,
    pub file_origin: Option<String>,
}

/// Split `FIELD=VALUE` arguments, keeping their order.
pub fn parse_assignments(raw: &[String], flag: &str) -> Result<Vec<(String, String)>, HelpfulError> {
    raw.iter()
        .map(|item| {
            item.split_once('=')
                .filter(|(field, _)| !field.trim().is_empty())
                .map(|(field, value)| (field.trim().to_string(), value.to_string()))
                .ok_or_else(|| HelpfulError::invalid_assignment(item, flag))
        })
        .collect()
}
