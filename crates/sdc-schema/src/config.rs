//! Where the schema description comes from.
//!
//! The registry is built once at startup. By default the embedded catalog
//! schema is used; setting `SDC_SCHEMA_PATH` points the loader at a JSON or
//! YAML description on disk instead.

use std::ffi::OsString;
use std::fmt;
use std::path::PathBuf;

/// Environment variable naming an external schema description file.
pub const SCHEMA_PATH_ENV: &str = "SDC_SCHEMA_PATH";

/// Source of the schema description used to build a
/// [`SchemaRegistry`](crate::SchemaRegistry).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SchemaSource {
    /// The catalog schema compiled into this crate.
    #[default]
    Builtin,
    /// A description file; `.yaml`/`.yml` is read as YAML, anything else as JSON.
    File(PathBuf),
}

impl SchemaSource {
    /// Resolve the source from `SDC_SCHEMA_PATH`.
    pub fn from_env() -> Self {
        Self::from_env_value(std::env::var_os(SCHEMA_PATH_ENV))
    }

    /// Resolve the source from an already-read environment value. Unset or
    /// empty selects the builtin schema.
    pub fn from_env_value(value: Option<OsString>) -> Self {
        match value {
            Some(path) if !path.is_empty() => Self::File(PathBuf::from(path)),
            _ => Self::Builtin,
        }
    }
}

impl fmt::Display for SchemaSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Builtin => f.write_str("builtin"),
            Self::File(path) => write!(f, "{}", path.display()),
        }
    }
}
