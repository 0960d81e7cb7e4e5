#![forbid(unsafe_code)]

//! Run configuration, as assembled from the command line.

use std::path::PathBuf;

use dsigcheck_dsig::DEFAULT_ENGINE;

/// Everything one validation run depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    /// The XML document to validate.
    pub file: PathBuf,
    /// Name of the signature engine (see `dsigcheck_dsig::engine_by_name`).
    pub engine: String,
    /// Extra ID attribute names for same-document references.
    pub id_attrs: Vec<String>,
    pub verbose: bool,
}

impl Settings {
    pub fn new(file: impl Into<PathBuf>) -> Self {
        Self {
            file: file.into(),
            engine: DEFAULT_ENGINE.to_owned(),
            id_attrs: Vec::new(),
            verbose: false,
        }
    }

    /// Log filter used when `RUST_LOG` is not set.
    pub fn default_log_filter(&self) -> &'static str {
        if self.verbose {
            "debug"
        } else {
            "warn"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let settings = Settings::new("doc.xml");
        assert_eq!(settings.engine, "dom");
        assert!(settings.id_attrs.is_empty());
        assert_eq!(settings.default_log_filter(), "warn");

        let verbose = Settings {
            verbose: true,
            ..settings
        };
        assert_eq!(verbose.default_log_filter(), "debug");
    }
}
