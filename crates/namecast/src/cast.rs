//! Field casting
//!
//! Cast rules are a closed set. Configuration names them with string tags
//! (`str`, `int`, `float`, `bool`, `date:<format>`); unknown tags only exist at
//! that boundary, where they are recorded and dropped.

use crate::error::{ErrorKind, NamecastError, Result};
use crate::record::{FieldValue, EXTENSION_FIELD};
use crate::sink::ErrorSink;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// A caller-supplied conversion. Its errors are returned to the caller as-is.
pub type Transform = Arc<dyn Fn(&str) -> anyhow::Result<FieldValue> + Send + Sync>;

#[derive(Clone)]
pub enum CastRule {
    String,
    Int,
    Float,
    Bool,
    Custom(Transform),
}

impl CastRule {
    pub fn custom<F>(transform: F) -> Self
    where
        F: Fn(&str) -> anyhow::Result<FieldValue> + Send + Sync + 'static,
    {
        CastRule::Custom(Arc::new(transform))
    }

    /// Resolve a configuration tag. Returns `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        if let Some(format) = tag.strip_prefix("date:") {
            return Some(date_rule(format.to_string()));
        }
        match tag.to_ascii_lowercase().as_str() {
            "str" | "string" => Some(CastRule::String),
            "int" => Some(CastRule::Int),
            "float" => Some(CastRule::Float),
            "bool" => Some(CastRule::Bool),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            CastRule::String => "string",
            CastRule::Int => "int",
            CastRule::Float => "float",
            CastRule::Bool => "bool",
            CastRule::Custom(_) => "custom",
        }
    }
}

impl fmt::Debug for CastRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Built-in custom transform that normalizes dates to `YYYY-MM-DD`.
fn date_rule(format: String) -> CastRule {
    CastRule::custom(move |value| {
        let date = NaiveDate::parse_from_str(value, &format)?;
        Ok(FieldValue::Str(date.format("%Y-%m-%d").to_string()))
    })
}

/// Cast rules keyed by field name.
#[derive(Debug, Clone, Default)]
pub struct CastRules {
    rules: BTreeMap<String, CastRule>,
}

impl CastRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, rule: CastRule) -> Self {
        self.insert(field, rule);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, rule: CastRule) {
        self.rules.insert(field.into(), rule);
    }

    pub fn get(&self, field: &str) -> Option<&CastRule> {
        self.rules.get(field)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Build rules from `field -> tag` pairs, recording each unknown tag.
    pub fn from_tags<'a>(
        tags: impl IntoIterator<Item = (&'a str, &'a str)>,
        sink: &mut ErrorSink,
    ) -> Self {
        let mut rules = Self::new();
        for (field, tag) in tags {
            if field == EXTENSION_FIELD {
                sink.record(
                    ErrorKind::CastUnknownType,
                    format!(
                        "Cast Type: {} not allowed for field {}. Keeping original value",
                        tag, field
                    ),
                );
                continue;
            }
            match CastRule::from_tag(tag) {
                Some(rule) => rules.insert(field, rule),
                None => sink.record(
                    ErrorKind::CastUnknownType,
                    format!(
                        "Cast Type: {} not found for field {}. Keeping original value",
                        tag, field
                    ),
                ),
            }
        }
        rules
    }
}

fn unknown_tag_message(tag: &str, value: &str) -> String {
    format!(
        "Cast Type: {} not found. Returning original argument: {}",
        tag, value
    )
}

/// Apply `rule` to `value`.
///
/// A primitive that cannot parse `value` is fatal. A custom transform's error
/// comes back as [`NamecastError::Transform`] without touching the sink.
pub fn cast(field: &str, value: &str, rule: &CastRule, sink: &mut ErrorSink) -> Result<FieldValue> {
    let parsed = match rule {
        CastRule::String => Some(FieldValue::Str(value.to_string())),
        CastRule::Int => value.trim().parse().ok().map(FieldValue::Int),
        CastRule::Float => value.trim().parse().ok().map(FieldValue::Float),
        CastRule::Bool => parse_bool(value).map(FieldValue::Bool),
        CastRule::Custom(transform) => {
            return transform(value).map_err(|source| NamecastError::Transform {
                field: field.to_string(),
                source,
            })
        }
    };

    parsed.ok_or_else(|| {
        sink.fatal(
            ErrorKind::CastFailed,
            format!(
                "cannot cast value '{}' of field '{}' to {}",
                value,
                field,
                rule.name()
            ),
        )
    })
}

/// Cast by configuration tag. An unknown tag is recorded and `value` is
/// returned unchanged.
pub fn cast_tag(value: &str, tag: &str, sink: &mut ErrorSink) -> Result<FieldValue> {
    match CastRule::from_tag(tag) {
        Some(rule) => cast("value", value, &rule, sink),
        None => {
            sink.record(ErrorKind::CastUnknownType, unknown_tag_message(tag, value));
            Ok(FieldValue::Str(value.to_string()))
        }
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "t" | "yes" | "y" | "on" | "1" => Some(true),
        "false" | "f" | "no" | "n" | "off" | "0" | "" => Some(false),
        _ => None,
    }
}
