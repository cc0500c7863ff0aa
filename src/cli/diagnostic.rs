//! Miette diagnostics for configuration files.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// TOML error with the offending location in the file.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(limit_desk::config))]
pub struct ConfigDiagnostic {
    pub message: String,

    #[source_code]
    pub src: NamedSource<String>,

    #[label("here")]
    pub span: SourceSpan,

    #[help]
    pub help: Option<String>,
}

impl ConfigDiagnostic {
    /// Build from a TOML parse error over `src`, read from `name`.
    #[must_use]
    pub fn from_toml(name: &str, src: &str, err: &toml::de::Error) -> Self {
        let span = err
            .span()
            .map_or_else(|| (0, 0).into(), |range| (range.start, range.len()).into());
        Self {
            message: err.message().to_string(),
            src: NamedSource::new(name, src.to_string()),
            span,
            help: Some("see config.example.toml for the expected layout".into()),
        }
    }
}
