//! Pipeline configuration
//!
//! Search paths follow the same priority order javac uses for its classpath:
//! 1. explicit search paths handed over by the batch driver (highest priority)
//! 2. the `RECAST_CLASSPATH` environment variable, then `CLASSPATH`
//! 3. the current directory "." (default fallback)

use std::env;
use std::path::PathBuf;

use crate::consts::{DEFAULT_INDENT, IMPLICIT_PACKAGE, SEARCH_PATH_ENV};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub struct Config {
    /// Canonical search roots for class lookup
    pub search_paths: Vec<PathBuf>,
    /// Package every unit sees without an import
    pub implicit_package: String,
    /// Consult the built-in table of well-known JDK classes
    pub builtin_classes: bool,
    /// Spaces per indentation level in generated source
    pub indent_width: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            search_paths: Vec::new(),
            implicit_package: IMPLICIT_PACKAGE.to_string(),
            builtin_classes: true,
            indent_width: DEFAULT_INDENT,
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration with search paths taken from the environment
    pub fn from_env() -> Self {
        let search_path = resolve_search_path(None);
        Self {
            search_paths: parse_search_path(&search_path),
            ..Self::default()
        }
    }

    pub fn with_search_paths<I, P>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<PathBuf>,
    {
        self.search_paths = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn without_builtin_classes(mut self) -> Self {
        self.builtin_classes = false;
        self
    }

    /// Reject configurations the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.indent_width == 0 || self.indent_width > 16 {
            return Err(Error::Config {
                message: format!("indent width must be between 1 and 16, got {}", self.indent_width),
            });
        }
        if self.implicit_package.is_empty()
            || self.implicit_package.split('.').any(|segment| segment.is_empty())
        {
            return Err(Error::Config {
                message: format!("invalid implicit package '{}'", self.implicit_package),
            });
        }
        Ok(())
    }
}

/// Resolve the search path string, explicit argument first
pub fn resolve_search_path(explicit: Option<&str>) -> String {
    if let Some(path) = explicit {
        log::debug!("search path from argument: {}", path);
        return path.to_string();
    }

    for var in [SEARCH_PATH_ENV, "CLASSPATH"] {
        if let Ok(value) = env::var(var) {
            if !value.is_empty() {
                log::debug!("search path from {}: {}", var, value);
                return value;
            }
        }
    }

    log::debug!("search path defaults to current directory");
    ".".to_string()
}

/// Split a search path on the platform separator (`:` on Unix, `;` on Windows)
pub fn parse_search_path(search_path: &str) -> Vec<PathBuf> {
    let separator = if cfg!(windows) { ';' } else { ':' };
    search_path
        .split(separator)
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(PathBuf::from)
        .collect()
}
