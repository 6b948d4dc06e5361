//! Helpful error types for CLI commands
//!
//! Every error includes:
//! - What went wrong
//! - Context about the situation
//! - Suggestions for how to fix it

use std::fmt;
use std::path::Path;

/// An error with helpful context and suggestions
#[derive(Debug)]
pub struct HelpfulError {
    /// The main error message
    pub message: String,
    /// Additional context about what was happening
    pub context: Option<String>,
    /// Suggestions for how to fix the error
    pub suggestions: Vec<String>,
}

impl HelpfulError {
    /// Create a new helpful error
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            context: None,
            suggestions: Vec::new(),
        }
    }

    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn with_suggestions(
        mut self,
        suggestions: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        self.suggestions.extend(suggestions.into_iter().map(|s| s.into()));
        self
    }

    // === Common error constructors ===

    /// Config file does not exist
    pub fn config_not_found(path: &Path) -> Self {
        Self::new(format!("Config file not found: {}", path.display()))
            .with_context("The run command reads its tasks from a TOML file")
            .with_suggestions([
                "TRY: Create it, or pass another file: namecast run --config <FILE>".to_string(),
                "TRY: Set NAMECAST_HOME to the folder holding namecast.toml".to_string(),
                "TRY: Inspect resolved paths: namecast config".to_string(),
            ])
    }

    /// Config file exists but does not parse
    pub fn invalid_config(path: &Path, details: &str) -> Self {
        Self::new(format!("Invalid config: {}", path.display()))
            .with_context(details.to_string())
            .with_suggestions([
                "TRY: Every task needs `name` and `output_directory`".to_string(),
                "TRY: Every input needs `name` and a non-empty `schema` without duplicates"
                    .to_string(),
            ])
    }

    /// `field=value` argument without `=`
    pub fn invalid_assignment(raw: &str, flag: &str) -> Self {
        Self::new(format!("Invalid {} argument: '{}'", flag, raw))
            .with_context("Expected FIELD=VALUE")
            .with_suggestions([format!("TRY: {} year=2024", flag)])
    }

    /// Task name not present in the config
    pub fn task_not_found(name: &str, known: &[String]) -> Self {
        Self::new(format!("Task not found: {}", name))
            .with_context(format!("Configured tasks: {}", known.join(", ")))
            .with_suggestions(["TRY: Omit --task to run every configured task"])
    }

    /// Schema arguments rejected
    pub fn invalid_schema(details: &str) -> Self {
        Self::new(format!("Invalid schema: {}", details))
            .with_context("Fields are given in filename order with repeated --field flags")
            .with_suggestions([
                "TRY: namecast parse north-2024.csv --field site --field year --field extension",
            ])
    }
}

impl fmt::Display for HelpfulError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ERROR: {}", self.message)?;

        if let Some(ctx) = &self.context {
            writeln!(f, "CONTEXT: {}", ctx)?;
        }

        if !self.suggestions.is_empty() {
            writeln!(f)?;
            for suggestion in &self.suggestions {
                writeln!(f, "  {}", suggestion)?;
            }
        }

        Ok(())
    }
}

impl std::error::Error for HelpfulError {}

/// Print an error as a JSON object on stdout, for `--json` callers.
pub fn print_json_error(err: &anyhow::Error) {
    let payload = match err.downcast_ref::<HelpfulError>() {
        Some(helpful) => serde_json::json!({
            "error": helpful.message,
            "context": helpful.context,
            "suggestions": helpful.suggestions,
        }),
        None => serde_json::json!({ "error": format!("{:#}", err) }),
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&payload).unwrap_or_else(|_| payload.to_string())
    );
}
