use parking_lot::RwLock;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::PythonEnvironment;
use crate::error::EnvironmentResult;

/// Process-wide map from interpreter path to its discovered environment.
///
/// `None` keys the default environment. Entries are never evicted; failures
/// are never stored, so a fixed interpreter is picked up on the next query.
pub struct EnvironmentCache {
    enabled: bool,
    inner: RwLock<HashMap<Option<PathBuf>, Arc<PythonEnvironment>>>,
}

impl Default for EnvironmentCache {
    fn default() -> Self {
        Self::new(true)
    }
}

impl EnvironmentCache {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            inner: RwLock::new(HashMap::new()),
        }
    }

    /// Cached environment for `executable`, discovering it with `discover`
    /// on first use.
    pub fn get_or_discover<F>(
        &self,
        executable: Option<&Path>,
        discover: F,
    ) -> EnvironmentResult<Arc<PythonEnvironment>>
    where
        F: FnOnce() -> EnvironmentResult<PythonEnvironment>,
    {
        if !self.enabled {
            return discover().map(Arc::new);
        }

        let key = executable.map(cache_key);
        if let Some(env) = self.inner.read().get(&key) {
            return Ok(Arc::clone(env));
        }

        let env = Arc::new(discover()?);
        let mut map = self.inner.write();
        Ok(Arc::clone(map.entry(key).or_insert(env)))
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}

/// Absolute but not canonical: a venv's `bin/python` is usually a symlink to
/// the base interpreter, and resolving it would merge two environments.
fn cache_key(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}
