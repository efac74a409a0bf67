//! Summaries of imported modules
//!
//! Attribute lookups on an imported module (`requests.get`, `os.path`) only
//! need to know which names the module binds at top level and which members
//! its classes have. [`ModuleSummary`] keeps exactly that, so imported files
//! are parsed once and their trees dropped immediately.

use super::modules::{ModuleKind, ModuleLocation, resolve_relative_import};
use super::parser::{ParsedSource, PythonParseError, PythonParser};
use super::scope::{
    BindingKind, ImportTarget, Scope, ScopeKind, collect_bindings, instance_attributes,
};
use parking_lot::{Mutex, RwLock};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;

/// What a module-level name is bound to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MemberKind {
    Function,
    Class,
    Variable,
    /// Re-exported import, with the module path already made absolute
    Import(ImportTarget),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassSummary {
    /// Names bound in the class body plus `self.x` attributes
    pub members: HashSet<String>,
    /// Base class expressions as written (`Base`, `abc.ABC`)
    pub bases: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleSummary {
    pub name: String,
    names: HashMap<String, MemberKind>,
    classes: HashMap<String, ClassSummary>,
    /// Module-level `def __getattr__`: any attribute may exist
    pub has_getattr: bool,
    /// Absolute names of modules star-imported at top level
    pub star_imports: Vec<String>,
}

impl ModuleSummary {
    pub fn from_source(source: &ParsedSource, module: &str, is_package: bool) -> Self {
        let Some(scope) = Scope::new(source.root()) else {
            return Self::empty(module);
        };
        let bindings = collect_bindings(source, scope);

        let absolute =
            |target: &str| resolve_relative_import(target, module, is_package);

        let mut names = HashMap::new();
        let mut classes = HashMap::new();
        for binding in &bindings.bindings {
            // Conditional rebinds (`if ...: import a as x` / `else: import b as x`)
            // keep the first branch
            if names.contains_key(binding.name) {
                continue;
            }
            let kind = match &binding.kind {
                BindingKind::Function => MemberKind::Function,
                BindingKind::Class => {
                    if let Some(class) = binding.definition() {
                        classes.insert(binding.name.to_string(), summarize_class(source, class));
                    }
                    MemberKind::Class
                }
                BindingKind::Variable | BindingKind::Parameter => MemberKind::Variable,
                BindingKind::Import(target) => match absolute(target.module.as_str()) {
                    Some(module) => MemberKind::Import(ImportTarget {
                        module,
                        member: target.member.clone(),
                    }),
                    None => MemberKind::Variable,
                },
            };
            names.insert(binding.name.to_string(), kind);
        }

        let has_getattr = matches!(names.get("__getattr__"), Some(MemberKind::Function));
        let star_imports = bindings
            .star_imports
            .iter()
            .filter_map(|target| absolute(target.as_str()))
            .collect();

        Self {
            name: module.to_string(),
            names,
            classes,
            has_getattr,
            star_imports,
        }
    }

    fn empty(module: &str) -> Self {
        Self {
            name: module.to_string(),
            names: HashMap::new(),
            classes: HashMap::new(),
            has_getattr: false,
            star_imports: Vec::new(),
        }
    }

    pub fn member(&self, name: &str) -> Option<&MemberKind> {
        self.names.get(name)
    }

    pub fn class(&self, name: &str) -> Option<&ClassSummary> {
        self.classes.get(name)
    }

    /// Whether names missing from the summary may still exist at runtime
    pub fn is_open(&self) -> bool {
        self.has_getattr || !self.star_imports.is_empty()
    }
}

fn summarize_class(source: &ParsedSource, class: tree_sitter::Node<'_>) -> ClassSummary {
    let mut members: HashSet<String> = collect_bindings(
        source,
        Scope {
            node: class,
            kind: ScopeKind::Class,
        },
    )
    .bindings
    .iter()
    .map(|binding| binding.name.to_string())
    .collect();
    members.extend(
        instance_attributes(source, class)
            .iter()
            .map(|binding| binding.name.to_string()),
    );

    let mut bases = Vec::new();
    if let Some(superclasses) = class.child_by_field_name("superclasses") {
        let mut cursor = superclasses.walk();
        for base in superclasses.named_children(&mut cursor) {
            if matches!(base.kind(), "identifier" | "attribute") {
                bases.push(source.text(base).to_string());
            }
        }
    }

    ClassSummary { members, bases }
}

struct CachedSummary {
    modified: Option<SystemTime>,
    summary: Arc<ModuleSummary>,
}

/// Process-wide cache of module summaries keyed by file path.
///
/// An entry is reused while the file's modification time is unchanged.
pub struct ModuleIndex {
    parser: Mutex<PythonParser>,
    inner: RwLock<HashMap<PathBuf, CachedSummary>>,
}

impl ModuleIndex {
    pub fn new() -> Result<Self, PythonParseError> {
        Ok(Self {
            parser: Mutex::new(PythonParser::new()?),
            inner: RwLock::new(HashMap::new()),
        })
    }

    /// Summary of a located source module; `None` for compiled modules,
    /// namespace packages and files that cannot be read or decoded.
    pub fn summary(&self, location: &ModuleLocation) -> Option<Arc<ModuleSummary>> {
        let path = location.source_file()?;
        let is_package = matches!(location.kind, ModuleKind::Package(_));
        let modified = fs::metadata(path).and_then(|m| m.modified()).ok();

        if let Some(cached) = self.inner.read().get(path) {
            if cached.modified == modified {
                return Some(Arc::clone(&cached.summary));
            }
        }

        let summary = Arc::new(self.summarize(path, &location.name, is_package)?);
        self.inner.write().insert(
            path.to_path_buf(),
            CachedSummary {
                modified,
                summary: Arc::clone(&summary),
            },
        );
        Some(summary)
    }

    fn summarize(&self, path: &Path, module: &str, is_package: bool) -> Option<ModuleSummary> {
        let bytes = fs::read(path)
            .inspect_err(|e| tracing::debug!("cannot read module '{}': {e}", path.display()))
            .ok()?;
        let Ok(code) = String::from_utf8(bytes) else {
            tracing::debug!("module '{}' is not valid UTF-8", path.display());
            return None;
        };
        let source = self.parser.lock().parse(code)?;
        tracing::debug!("summarized module '{module}' from {}", path.display());
        Some(ModuleSummary::from_source(&source, module, is_package))
    }

    pub fn len(&self) -> usize {
        self.inner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.read().is_empty()
    }
}
