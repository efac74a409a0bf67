//! Python environment discovery.
//!
//! An environment is the module search path of one interpreter: its standard
//! library, compiled extension directory and site-packages. Discovery reads the
//! installation layout on disk instead of running the interpreter, so an
//! environment can be described for any executable path, including virtualenvs
//! created for another machine's interpreter.

mod cache;
mod discovery;

pub use cache::EnvironmentCache;
pub use discovery::{PyvenvConfig, discover, discover_default, interpreters_on_path};

use std::path::PathBuf;

/// Analysis context bound to one interpreter's module search path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PythonEnvironment {
    /// Interpreter this environment was discovered from; `None` for the bare
    /// fallback environment
    pub executable: Option<PathBuf>,
    /// Installation prefix (`sys.prefix` equivalent)
    pub prefix: Option<PathBuf>,
    /// `major.minor` when it could be determined
    pub version: Option<String>,
    /// Directories searched for importable modules, in priority order
    pub search_path: Vec<PathBuf>,
}

impl PythonEnvironment {
    /// Environment with no interpreter: only built-in modules and the
    /// analyzed file's own package root are importable.
    pub fn bare(extra_paths: &[PathBuf]) -> Self {
        Self {
            executable: None,
            prefix: None,
            version: None,
            search_path: extra_paths.to_vec(),
        }
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }
}
