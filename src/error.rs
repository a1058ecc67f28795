use std::fmt;

/// Conditions recovered locally with a default or placeholder. Only ever used as a
/// logging field; none of these reach the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fallback {
    FileAbsent,
    FileWriteFailed,
    ProcessInvocationFailed,
    PatternNotMatched,
    NameNotInCatalog,
}

impl fmt::Display for Fallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Fallback::FileAbsent => "file_absent",
            Fallback::FileWriteFailed => "file_write_failed",
            Fallback::ProcessInvocationFailed => "process_invocation_failed",
            Fallback::PatternNotMatched => "pattern_not_matched",
            Fallback::NameNotInCatalog => "name_not_in_catalog",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ThemeError {
    #[error("theme catalog is empty")]
    EmptyCatalog,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("parsing {path}: {message}")]
    Parse { path: String, message: String },
}
