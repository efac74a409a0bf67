use super::{AnalysisEngine, Candidate, SourceInput};
use crate::config::Settings;
use crate::environment::{EnvironmentCache, PythonEnvironment, discover, discover_default};
use crate::error::{EngineError, EngineResult, EnvironmentResult};
use crate::parsing::python::modules::is_package_file;
use crate::parsing::python::{Goto, ModuleFinder, ModuleIndex, PythonParser, module_path_from_file};
use crate::types::EnginePosition;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Static Python analysis on tree-sitter.
///
/// Owns the parser for analyzed files, the summaries of imported modules and
/// the environment cache; all three live as long as the worker.
pub struct PythonEngine {
    parser: PythonParser,
    modules: ModuleIndex,
    environments: EnvironmentCache,
    default_interpreter: Option<PathBuf>,
    extra_paths: Vec<PathBuf>,
}

impl PythonEngine {
    pub fn new() -> EngineResult<Self> {
        Self::from_settings(&Settings::default())
    }

    pub fn from_settings(settings: &Settings) -> EngineResult<Self> {
        Ok(Self {
            parser: PythonParser::new()?,
            modules: ModuleIndex::new()?,
            environments: EnvironmentCache::new(settings.environment.cache),
            default_interpreter: settings.default_interpreter.clone(),
            extra_paths: settings.environment.extra_paths.clone(),
        })
    }

    /// Number of environments discovered so far
    pub fn cached_environments(&self) -> usize {
        self.environments.len()
    }
}

impl AnalysisEngine for PythonEngine {
    type Context = PythonEnvironment;

    fn resolve_environment(
        &self,
        executable: Option<&Path>,
    ) -> EnvironmentResult<Arc<PythonEnvironment>> {
        self.environments
            .get_or_discover(executable, || match executable {
                Some(executable) => discover(executable, &self.extra_paths),
                None => discover_default(self.default_interpreter.as_deref(), &self.extra_paths),
            })
    }

    fn resolve_at(
        &mut self,
        context: &PythonEnvironment,
        source: SourceInput<'_>,
        position: EnginePosition,
    ) -> EngineResult<Vec<Candidate>> {
        let path = std::path::absolute(source.path).unwrap_or_else(|_| source.path.to_path_buf());
        let code = match source.text {
            Some(text) => text.to_string(),
            None => read_source(&path)?,
        };

        let parsed = self
            .parser
            .parse(code)
            .ok_or_else(|| EngineError::ParseFailed { path: path.clone() })?;
        let offset = parsed.byte_offset(position)?;

        let (module, package_root) = module_path_from_file(&path);
        let finder = ModuleFinder::for_file(package_root, context.search_path());
        let goto = Goto::new(
            &parsed,
            &module,
            is_package_file(&path),
            &finder,
            &self.modules,
        );

        let candidates = goto.definitions(offset);
        tracing::debug!(
            module = %module,
            line = position.line,
            column = position.column,
            candidates = candidates.len(),
            "goto"
        );
        Ok(candidates)
    }
}

fn read_source(path: &Path) -> EngineResult<String> {
    let bytes = std::fs::read(path).map_err(|source| EngineError::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    })?;
    String::from_utf8(bytes).map_err(|_| EngineError::InvalidUtf8 {
        path: path.to_path_buf(),
    })
}
