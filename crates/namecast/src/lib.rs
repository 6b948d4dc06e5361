//! namecast - filename schema engine
//!
//! Parse filenames into typed records, generate filenames from records, select
//! single files from a folder by name conditions, and collect recoverable
//! problems into an on-disk error log.

pub mod cast;
pub mod discovery;
pub mod error;
pub mod paths;
pub mod record;
pub mod schema;
pub mod settings;
pub mod sink;

pub use cast::{cast, cast_tag, CastRule, CastRules};
pub use discovery::{select_one, DiscoveryOptions, FileDiscovery};
pub use error::{ErrorKind, NamecastError, Result};
pub use paths::ensure_path;
pub use record::{FieldValue, ParsedRecord};
pub use schema::{generate, parse, FilenameSchema, FilenameShape};
pub use settings::Settings;
pub use sink::{ErrorRecord, ErrorSink, FlushOptions};
