//! Filename schema engine
//!
//! A [`FilenameSchema`] names the delimiter-separated segments of a filename.
//! [`parse`] splits a filename into a [`ParsedRecord`] and [`generate`] renders a
//! record back into a filename:
//!
//! ```text
//! schema:   site - year - kind . extension
//! filename: north-2024-orders.csv
//! record:   { site: "north", year: "2024", kind: "orders", extension: ".csv" }
//! ```
//!
//! At most one period is allowed in a filename. Classification into a
//! [`FilenameShape`] happens before anything else, and each shape maps to
//! exactly one outcome.

use crate::cast::{cast, CastRules};
use crate::error::{ErrorKind, NamecastError, Result};
use crate::record::{FieldValue, ParsedRecord, EXTENSION_FIELD};
use crate::sink::ErrorSink;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Ordered field names for a filename. A field named `extension` receives the
/// filename's extension instead of a delimiter segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilenameSchema {
    fields: Vec<String>,
}

impl FilenameSchema {
    pub fn new<I, S>(fields: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        if fields.is_empty() {
            return Err(NamecastError::Schema(
                "schema must declare at least one field".to_string(),
            ));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            if field.is_empty() {
                return Err(NamecastError::Schema("field names must not be empty".to_string()));
            }
            if !seen.insert(field.as_str()) {
                return Err(NamecastError::Schema(format!("duplicate field '{}'", field)));
            }
        }

        Ok(Self { fields })
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn has_extension_field(&self) -> bool {
        self.fields.iter().any(|f| f == EXTENSION_FIELD)
    }

    /// Number of delimiter segments a matching base name must have.
    pub fn base_field_count(&self) -> usize {
        self.fields.iter().filter(|f| *f != EXTENSION_FIELD).count()
    }
}

/// Problems found while parsing a filename. The codes are what ends up in the
/// error log.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseIssue {
    FilenameIsEmpty,
    MultiplePeriods,
    HiddenFile,
    MissingExtension,
    SchemaMissingExtensionField,
    FieldCountMismatch,
}

impl ParseIssue {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParseIssue::FilenameIsEmpty => "filename_is_empty",
            ParseIssue::MultiplePeriods => "filename_contains_multiple_periods",
            ParseIssue::HiddenFile => "filename_is_hidden_file",
            ParseIssue::MissingExtension => "filename_is_missing_extension",
            ParseIssue::SchemaMissingExtensionField => "schema_missing_extension_field",
            ParseIssue::FieldCountMismatch => "field_count_mismatch",
        }
    }

    fn with_detail(&self, detail: impl fmt::Display) -> String {
        format!("{}: {}", self.as_str(), detail)
    }
}

impl fmt::Display for ParseIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Period layout of a filename.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilenameShape<'a> {
    Empty,
    /// Two or more periods, wherever they are.
    MultiplePeriods,
    /// A single leading period (`.env`). Carries the whole filename.
    Hidden(&'a str),
    /// A single trailing period (`report.`). Carries the part before it.
    MissingExtension(&'a str),
    /// No period at all.
    Bare(&'a str),
    /// A single interior period. `extension` keeps its leading period.
    WithExtension { base: &'a str, extension: &'a str },
}

impl<'a> FilenameShape<'a> {
    pub fn classify(filename: &'a str) -> Self {
        if filename.is_empty() {
            return FilenameShape::Empty;
        }

        let mut parts = filename.splitn(3, '.');
        match (parts.next(), parts.next(), parts.next()) {
            (_, _, Some(_)) => FilenameShape::MultiplePeriods,
            (Some(""), Some(_), None) => FilenameShape::Hidden(filename),
            (Some(base), Some(""), None) => FilenameShape::MissingExtension(base),
            (Some(base), Some(_), None) => FilenameShape::WithExtension {
                base,
                extension: &filename[base.len()..],
            },
            (Some(base), None, None) => FilenameShape::Bare(base),
            (None, _, _) => FilenameShape::Empty,
        }
    }
}

/// Parse `filename` into a record following `schema`.
///
/// Fatal problems are recorded, flushed, and returned as
/// [`NamecastError::Fatal`]. Hidden files and missing extensions are recorded
/// as warnings and parsing continues.
pub fn parse(
    filename: &str,
    delimiter: &str,
    schema: &FilenameSchema,
    casts: Option<&CastRules>,
    sink: &mut ErrorSink,
) -> Result<ParsedRecord> {
    let (base, extension) = match FilenameShape::classify(filename) {
        FilenameShape::Empty => {
            return Err(sink.fatal(ErrorKind::ParseFatal, ParseIssue::FilenameIsEmpty.as_str()))
        }
        FilenameShape::MultiplePeriods => {
            return Err(sink.fatal(
                ErrorKind::ParseFatal,
                ParseIssue::MultiplePeriods.with_detail(filename),
            ))
        }
        FilenameShape::Hidden(whole) => {
            sink.record(ErrorKind::ParseWarning, ParseIssue::HiddenFile.with_detail(filename));
            (whole, None)
        }
        FilenameShape::MissingExtension(base) => {
            sink.record(
                ErrorKind::ParseWarning,
                ParseIssue::MissingExtension.with_detail(filename),
            );
            (base, None)
        }
        FilenameShape::Bare(base) => {
            if schema.has_extension_field() {
                sink.record(
                    ErrorKind::ParseWarning,
                    ParseIssue::MissingExtension.with_detail(filename),
                );
            }
            (base, None)
        }
        FilenameShape::WithExtension { base, extension } => {
            if !schema.has_extension_field() {
                return Err(sink.fatal(
                    ErrorKind::ParseFatal,
                    ParseIssue::SchemaMissingExtensionField.with_detail(filename),
                ));
            }
            (base, Some(extension))
        }
    };

    if delimiter.is_empty() {
        return Err(NamecastError::Schema("delimiter must not be empty".to_string()));
    }

    let segments: Vec<&str> = base.split(delimiter).collect();
    let expected = schema.base_field_count();
    if segments.len() != expected {
        return Err(sink.fatal(
            ErrorKind::ParseFatal,
            ParseIssue::FieldCountMismatch.with_detail(format!(
                "{} (expected {} fields, found {})",
                filename,
                expected,
                segments.len()
            )),
        ));
    }

    let record = ParsedRecord::bind(
        schema.fields(),
        segments.into_iter().map(FieldValue::from),
        extension,
    );
    debug!(filename = %filename, fields = record.len(), "Parsed filename");

    match casts {
        Some(rules) if !rules.is_empty() => record.map_values(|name, value| {
            // The extension keeps its period-prefixed string form.
            if name == EXTENSION_FIELD {
                return Ok(value);
            }
            let Some(rule) = rules.get(name) else {
                return Ok(value);
            };
            match value {
                FieldValue::Str(raw) => cast(name, &raw, rule, sink),
                other => Ok(other),
            }
        }),
        _ => Ok(record),
    }
}

/// Render `record` as a filename.
///
/// The record's own extension wins when `extension` is absent or equal. When
/// both are given and differ, the mismatch is recorded and the filename gets
/// no extension. `folder` is prepended verbatim.
pub fn generate(
    record: &ParsedRecord,
    delimiter: &str,
    folder: Option<&str>,
    extension: Option<&str>,
    sink: &mut ErrorSink,
) -> String {
    let extension = resolve_extension(
        record.extension().filter(|e| !e.is_empty()),
        extension.filter(|e| !e.is_empty()),
        sink,
    );
    let parts: Vec<String> = record.base_fields().map(|(_, v)| v.to_string()).collect();

    compose(
        parts.iter().map(String::as_str),
        delimiter,
        folder.unwrap_or(""),
        extension.unwrap_or(""),
    )
}

fn resolve_extension<'a>(
    from_record: Option<&'a str>,
    requested: Option<&'a str>,
    sink: &mut ErrorSink,
) -> Option<&'a str> {
    match (from_record, requested) {
        (Some(own), Some(other)) if own == other => Some(own),
        (Some(own), Some(other)) => {
            sink.record(
                ErrorKind::ExtensionMismatch,
                format!(
                    "Mismatch between filename_extension: {} and extension: {}",
                    own, other
                ),
            );
            None
        }
        (own, other) => own.or(other),
    }
}

/// Join `parts` with `delimiter`, prefix `folder`, and append `extension`.
pub(crate) fn compose<'a>(
    parts: impl IntoIterator<Item = &'a str>,
    delimiter: &str,
    folder: &str,
    extension: &str,
) -> String {
    let mut output = String::from(folder);
    for (i, part) in parts.into_iter().enumerate() {
        if i > 0 {
            output.push_str(delimiter);
        }
        output.push_str(part);
    }
    output.push_str(extension);
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cast::CastRule;
    use tempfile::TempDir;

    fn schema(fields: &[&str]) -> FilenameSchema {
        FilenameSchema::new(fields.iter().copied()).unwrap()
    }

    fn sink_in(dir: &TempDir) -> ErrorSink {
        let mut sink = ErrorSink::new(dir.path().to_string_lossy().to_string());
        sink.set_file_origin("schema");
        sink.set_task_origin("test");
        sink
    }

    fn assert_fatal(result: Result<ParsedRecord>, issue: ParseIssue) {
        match result {
            Err(NamecastError::Fatal { kind, message }) => {
                assert_eq!(kind, ErrorKind::ParseFatal);
                assert!(
                    message.starts_with(issue.as_str()),
                    "expected {}, got {}",
                    issue,
                    message
                );
            }
            other => panic!("expected fatal {}, got {:?}", issue, other),
        }
    }

    #[test]
    fn classify_covers_every_period_layout() {
        assert_eq!(FilenameShape::classify(""), FilenameShape::Empty);
        assert_eq!(FilenameShape::classify("a.b.c"), FilenameShape::MultiplePeriods);
        assert_eq!(FilenameShape::classify(".a.b"), FilenameShape::MultiplePeriods);
        assert_eq!(FilenameShape::classify("a.b."), FilenameShape::MultiplePeriods);
        assert_eq!(FilenameShape::classify(".env"), FilenameShape::Hidden(".env"));
        assert_eq!(FilenameShape::classify("."), FilenameShape::Hidden("."));
        assert_eq!(
            FilenameShape::classify("report."),
            FilenameShape::MissingExtension("report")
        );
        assert_eq!(FilenameShape::classify("report"), FilenameShape::Bare("report"));
        assert_eq!(
            FilenameShape::classify("a-b.txt"),
            FilenameShape::WithExtension {
                base: "a-b",
                extension: ".txt"
            }
        );
    }

    #[test]
    fn parse_binds_extension_with_period() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);
        let record = parse("a-b.txt", "-", &schema(&["a", "b", "extension"]), None, &mut sink).unwrap();

        assert_eq!(
            record,
            ParsedRecord::from_fields([("a", "a"), ("b", "b"), ("extension", ".txt")])
        );
        assert!(sink.is_empty());
    }

    #[test]
    fn parse_without_extension_warns_when_schema_expects_one() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);
        let record = parse("report", "-", &schema(&["a", "extension"]), None, &mut sink).unwrap();

        assert_eq!(record, ParsedRecord::from_fields([("a", "report")]));
        assert_eq!(sink.errors().len(), 1);
        assert_eq!(sink.errors()[0].kind, ErrorKind::ParseWarning);
        assert!(sink.errors()[0]
            .message
            .starts_with("filename_is_missing_extension"));
    }

    #[test]
    fn parse_trailing_period_warns() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);
        let record = parse("north-2024.", "-", &schema(&["site", "year"]), None, &mut sink).unwrap();

        assert_eq!(record, ParsedRecord::from_fields([("site", "north"), ("year", "2024")]));
        assert!(sink.has(ErrorKind::ParseWarning));
    }

    #[test]
    fn parse_hidden_file_keeps_whole_name() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);
        let record = parse(".env", "-", &schema(&["name"]), None, &mut sink).unwrap();

        assert_eq!(record, ParsedRecord::from_fields([("name", ".env")]));
        assert!(sink.errors()[0].message.starts_with("filename_is_hidden_file"));
    }

    #[test]
    fn parse_empty_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);

        assert_fatal(
            parse("", "-", &schema(&["a"]), None, &mut sink),
            ParseIssue::FilenameIsEmpty,
        );
        assert!(temp_dir.path().join("schema-test.txt").exists());
    }

    #[test]
    fn parse_multiple_periods_is_fatal_for_any_schema() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);

        for (delimiter, fields) in [("-", vec!["a"]), ("_", vec!["a", "extension"])] {
            assert_fatal(
                parse("a.b.c", delimiter, &schema(&fields), None, &mut sink),
                ParseIssue::MultiplePeriods,
            );
        }
        assert_fatal(
            parse(".a.b", "-", &schema(&["a"]), None, &mut sink),
            ParseIssue::MultiplePeriods,
        );
    }

    #[test]
    fn parse_extension_without_schema_field_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);

        assert_fatal(
            parse("a-b.txt", "-", &schema(&["a", "b"]), None, &mut sink),
            ParseIssue::SchemaMissingExtensionField,
        );
    }

    #[test]
    fn parse_field_count_mismatch_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);

        assert_fatal(
            parse("a-b-c.txt", "-", &schema(&["a", "b", "extension"]), None, &mut sink),
            ParseIssue::FieldCountMismatch,
        );
        let log = std::fs::read_to_string(temp_dir.path().join("schema-test.txt")).unwrap();
        assert!(log.contains("field_count_mismatch: a-b-c.txt (expected 2 fields, found 3)"));
    }

    #[test]
    fn parse_applies_casts() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);
        let rules = CastRules::new()
            .with("year", CastRule::Int)
            .with("ratio", CastRule::Float)
            .with("code", CastRule::custom(|v| Ok(FieldValue::Str(v.to_uppercase()))));

        let record = parse(
            "north_2024_25_ab.csv",
            "_",
            &schema(&["site", "year", "ratio", "code", "extension"]),
            Some(&rules),
            &mut sink,
        )
        .unwrap();

        assert_eq!(record.get("site"), Some(&FieldValue::from("north")));
        assert_eq!(record.get("year"), Some(&FieldValue::Int(2024)));
        assert_eq!(record.get("ratio"), Some(&FieldValue::Float(25.0)));
        assert_eq!(record.get("code"), Some(&FieldValue::from("AB")));
        assert_eq!(record.extension(), Some(".csv"));
    }

    #[test]
    fn parse_cast_failure_is_fatal() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);
        let rules = CastRules::new().with("year", CastRule::Int);

        let err = parse("north-latest", "-", &schema(&["site", "year"]), Some(&rules), &mut sink)
            .unwrap_err();

        assert!(matches!(err, NamecastError::Fatal { kind: ErrorKind::CastFailed, .. }));
    }

    #[test]
    fn parse_custom_transform_error_propagates() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);
        let rules = CastRules::new().with("site", CastRule::custom(|_| anyhow::bail!("unknown site")));

        let err = parse("north-2024", "-", &schema(&["site", "year"]), Some(&rules), &mut sink)
            .unwrap_err();

        assert!(matches!(err, NamecastError::Transform { .. }));
        assert!(sink.is_empty());
    }

    #[test]
    fn parse_classifies_before_checking_delimiter() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);

        assert_fatal(
            parse("a.b.c", "", &schema(&["a"]), None, &mut sink),
            ParseIssue::MultiplePeriods,
        );
        assert_fatal(
            parse("", "", &schema(&["a"]), None, &mut sink),
            ParseIssue::FilenameIsEmpty,
        );
        let log = std::fs::read_to_string(temp_dir.path().join("schema-test.txt")).unwrap();
        assert!(log.contains("parse_fatal: filename_is_empty"));
    }

    #[test]
    fn parse_never_casts_extension() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);
        let rules = CastRules::new()
            .with("year", CastRule::Int)
            .with("extension", CastRule::custom(|_| Ok(FieldValue::Int(0))));

        let record = parse(
            "north-2024.csv",
            "-",
            &schema(&["site", "year", "extension"]),
            Some(&rules),
            &mut sink,
        )
        .unwrap();

        assert_eq!(record.get("year"), Some(&FieldValue::Int(2024)));
        assert_eq!(record.extension(), Some(".csv"));
        assert_eq!(generate(&record, "-", None, None, &mut sink), "north-2024.csv");
    }

    #[test]
    fn parse_rejects_empty_delimiter() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);
        let err = parse("abc", "", &schema(&["a"]), None, &mut sink).unwrap_err();
        assert!(matches!(err, NamecastError::Schema(_)));
    }

    #[test]
    fn schema_rejects_duplicates_and_empty() {
        assert!(FilenameSchema::new(["a", "a"]).is_err());
        assert!(FilenameSchema::new(Vec::<String>::new()).is_err());
        assert!(FilenameSchema::new(["a", ""]).is_err());
    }

    #[test]
    fn generate_round_trips_without_extension() {
        let schema = schema(&["site", "year", "kind"]);
        let records = [
            ParsedRecord::from_fields([("site", "north"), ("year", "2024"), ("kind", "orders")]),
            ParsedRecord::from_fields([("site", "s"), ("year", ""), ("kind", "x y")]),
        ];

        for record in records {
            let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);
            let filename = generate(&record, "-", None, None, &mut sink);
            let parsed = parse(&filename, "-", &schema, None, &mut sink).unwrap();
            assert_eq!(parsed, record);
            assert!(sink.is_empty());
        }
    }

    #[test]
    fn generate_uses_record_extension_and_folder() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);
        let record = ParsedRecord::from_fields([("a", "x"), ("extension", ".csv"), ("b", "y")]);

        assert_eq!(generate(&record, "_", Some("out/"), None, &mut sink), "out/x_y.csv");
        assert_eq!(generate(&record, "_", None, Some(".csv"), &mut sink), "x_y.csv");
        assert!(sink.is_empty());
    }

    #[test]
    fn generate_uses_parameter_extension() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);
        let record = ParsedRecord::from_fields([("name", "summary")]);

        assert_eq!(generate(&record, "-", Some("reports"), Some(".md"), &mut sink), "reportssummary.md");
    }

    #[test]
    fn generate_mismatch_drops_extension() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);
        let record = ParsedRecord::from_fields([("a", "x"), ("extension", ".csv")]);

        let filename = generate(&record, "-", None, Some(".txt"), &mut sink);

        assert_eq!(filename, "x");
        assert!(sink.has(ErrorKind::ExtensionMismatch));
    }

    #[test]
    fn generate_renders_cast_values() {
        let temp_dir = TempDir::new().unwrap();
        let mut sink = sink_in(&temp_dir);
        let record = ParsedRecord::from_fields([
            ("year", FieldValue::Int(2024)),
            ("final", FieldValue::Bool(false)),
        ]);

        assert_eq!(generate(&record, "-", None, None, &mut sink), "2024-false");
    }
}
