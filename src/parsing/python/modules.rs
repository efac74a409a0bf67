//! Module naming and lookup
//!
//! Maps files to dotted module names and dotted names back to files, using
//! the same rules as the import system: regular packages (with
//! `__init__.py`) win over plain modules, plain modules win over namespace
//! packages, and the first search root that has a regular match wins.

use super::builtins::is_builtin_module;
use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

const SOURCE_SUFFIXES: &[&str] = &["py", "pyi"];
const PACKAGE_INITS: &[&str] = &["__init__.py", "__init__.pyi"];
const EXTENSION_SUFFIXES: &[&str] = &[".so", ".pyd"];

/// Dotted module name of `file` and the directory its top-level package
/// lives in.
///
/// Walks up parent directories for as long as they contain `__init__.py`.
/// `pkg/__init__.py` is named `pkg`; a file outside any package is named by
/// its stem.
pub fn module_path_from_file(file: &Path) -> (String, PathBuf) {
    let stem = file
        .file_stem()
        .and_then(OsStr::to_str)
        .unwrap_or_default()
        .to_string();
    let mut dir = file.parent().map(Path::to_path_buf).unwrap_or_default();

    let mut parts = Vec::new();
    if stem != "__init__" {
        parts.push(stem);
    }

    while is_regular_package(&dir) {
        let Some(name) = dir.file_name().and_then(OsStr::to_str) else {
            break;
        };
        parts.push(name.to_string());
        let Some(parent) = dir.parent() else {
            break;
        };
        dir = parent.to_path_buf();
    }

    parts.reverse();
    (parts.join("."), dir)
}

/// Whether `file` is a package's `__init__` module
pub fn is_package_file(file: &Path) -> bool {
    file.file_stem().and_then(OsStr::to_str) == Some("__init__")
}

fn is_regular_package(dir: &Path) -> bool {
    !dir.as_os_str().is_empty() && PACKAGE_INITS.iter().any(|init| dir.join(init).is_file())
}

/// Resolve a relative import (`.`, `..pkg.mod`) against the importing module.
///
/// One dot is the package containing the importer; every further dot goes up
/// one more package. A package's `__init__` is its own containing package.
/// `None` when the import climbs past the top-level package.
pub fn resolve_relative_import(
    import_path: &str,
    current_module: &str,
    is_package: bool,
) -> Option<String> {
    let dots = import_path.chars().take_while(|&c| c == '.').count();
    if dots == 0 {
        return Some(import_path.to_string());
    }
    let remaining = &import_path[dots..];

    let mut parts: Vec<&str> = current_module.split('.').filter(|p| !p.is_empty()).collect();
    let levels = if is_package { dots - 1 } else { dots };
    if levels > parts.len() {
        return None;
    }
    parts.truncate(parts.len() - levels);

    parts.extend(remaining.split('.').filter(|p| !p.is_empty()));
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("."))
    }
}

/// How a located module is implemented
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleKind {
    /// Compiled into the interpreter (`sys`, `builtins`, ...)
    Builtin,
    /// A `.py`/`.pyi` file
    Source(PathBuf),
    /// A regular package; the path is its `__init__` file
    Package(PathBuf),
    /// A directory without `__init__.py`, possibly spread over several roots
    Namespace(Vec<PathBuf>),
    /// A compiled extension (`.so`/`.pyd`)
    Extension(PathBuf),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLocation {
    pub name: String,
    pub kind: ModuleKind,
}

impl ModuleLocation {
    /// Source file to summarize for attribute lookups
    pub fn source_file(&self) -> Option<&Path> {
        match &self.kind {
            ModuleKind::Source(path) | ModuleKind::Package(path) => Some(path),
            _ => None,
        }
    }

    /// Compiled modules expose attributes that cannot be read from source
    pub fn is_compiled(&self) -> bool {
        matches!(self.kind, ModuleKind::Builtin | ModuleKind::Extension(_))
    }
}

impl ModuleKind {
    /// Directories searched for submodules
    fn submodule_dirs(&self) -> Vec<PathBuf> {
        match self {
            Self::Package(init) => init.parent().map(Path::to_path_buf).into_iter().collect(),
            Self::Namespace(dirs) => dirs.clone(),
            _ => Vec::new(),
        }
    }
}

/// Looks modules up along an ordered list of search roots
#[derive(Debug, Clone)]
pub struct ModuleFinder {
    roots: Vec<PathBuf>,
}

impl ModuleFinder {
    pub fn new(roots: Vec<PathBuf>) -> Self {
        Self { roots }
    }

    /// Finder for a file: its package root first, then `search_path`.
    /// An empty root (unsaved file without a directory) is skipped.
    pub fn for_file(file_root: PathBuf, search_path: &[PathBuf]) -> Self {
        let mut roots = Vec::with_capacity(search_path.len() + 1);
        if !file_root.as_os_str().is_empty() {
            roots.push(file_root);
        }
        for root in search_path {
            if !roots.contains(root) {
                roots.push(root.clone());
            }
        }
        Self::new(roots)
    }

    pub fn roots(&self) -> &[PathBuf] {
        &self.roots
    }

    /// Locate the module `dotted` (e.g. `os.path`, `requests.adapters`)
    pub fn find(&self, dotted: &str) -> Option<ModuleLocation> {
        if dotted.is_empty() || dotted.split('.').any(str::is_empty) {
            return None;
        }
        if is_builtin_module(dotted) {
            return Some(ModuleLocation {
                name: dotted.to_string(),
                kind: ModuleKind::Builtin,
            });
        }

        let mut parts = dotted.split('.');
        let first = parts.next()?;
        let mut kind = find_in(&self.roots, first)?;
        for part in parts {
            kind = find_in(&kind.submodule_dirs(), part)?;
        }

        Some(ModuleLocation {
            name: dotted.to_string(),
            kind,
        })
    }
}

fn find_in(dirs: &[PathBuf], name: &str) -> Option<ModuleKind> {
    let mut namespace = Vec::new();

    for dir in dirs {
        let package = dir.join(name);
        if package.is_dir() {
            if let Some(init) = PACKAGE_INITS
                .iter()
                .map(|init| package.join(init))
                .find(|init| init.is_file())
            {
                return Some(ModuleKind::Package(init));
            }
        }

        if let Some(file) = SOURCE_SUFFIXES
            .iter()
            .map(|suffix| dir.join(format!("{name}.{suffix}")))
            .find(|file| file.is_file())
        {
            return Some(ModuleKind::Source(file));
        }

        if let Some(extension) = find_extension(dir, name) {
            return Some(ModuleKind::Extension(extension));
        }

        if package.is_dir() {
            namespace.push(package);
        }
    }

    (!namespace.is_empty()).then_some(ModuleKind::Namespace(namespace))
}

/// `name.so`, `name.pyd` or a tagged variant such as
/// `name.cpython-312-x86_64-linux-gnu.so`
fn find_extension(dir: &Path, name: &str) -> Option<PathBuf> {
    let entries = fs::read_dir(dir).ok()?;
    let prefix = format!("{name}.");
    entries
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .find(|path| {
            let Some(file_name) = path.file_name().and_then(OsStr::to_str) else {
                return false;
            };
            file_name.starts_with(&prefix)
                && EXTENSION_SUFFIXES.iter().any(|suffix| file_name.ends_with(suffix))
                && path.is_file()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn touch(root: &Path, relative: &str) -> PathBuf {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "").unwrap();
        path
    }

    #[test]
    fn test_module_path_from_file() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        touch(root, "project/pkg/__init__.py");
        touch(root, "project/pkg/sub/__init__.py");
        let module = touch(root, "project/pkg/sub/module.py");
        let script = touch(root, "project/script.py");

        let (name, package_root) = module_path_from_file(&module);
        assert_eq!(name, "pkg.sub.module");
        assert_eq!(package_root, root.join("project"));

        let (name, _) = module_path_from_file(&root.join("project/pkg/sub/__init__.py"));
        assert_eq!(name, "pkg.sub");

        let (name, package_root) = module_path_from_file(&script);
        assert_eq!(name, "script");
        assert_eq!(package_root, root.join("project"));
    }

    #[test]
    fn test_module_path_for_unsaved_file() {
        let (name, root) = module_path_from_file(Path::new("untitled.py"));
        assert_eq!(name, "untitled");
        assert_eq!(root, PathBuf::new());
    }

    #[test]
    fn test_resolve_relative_import() {
        // . = current package, .. = parent package
        assert_eq!(
            resolve_relative_import(".sibling", "pkg.module", false).as_deref(),
            Some("pkg.sibling")
        );
        assert_eq!(
            resolve_relative_import("..other", "pkg.sub.module", false).as_deref(),
            Some("pkg.other")
        );
        assert_eq!(
            resolve_relative_import(".", "pkg.module", false).as_deref(),
            Some("pkg")
        );
        // inside pkg/__init__.py a single dot is pkg itself
        assert_eq!(
            resolve_relative_import(".helpers", "pkg", true).as_deref(),
            Some("pkg.helpers")
        );
        assert_eq!(
            resolve_relative_import("absolute.path", "pkg.module", false).as_deref(),
            Some("absolute.path")
        );
        assert_eq!(resolve_relative_import("...", "pkg.module", false), None);
    }

    #[test]
    fn test_finder_prefers_package_then_module_then_namespace() {
        let temp = TempDir::new().unwrap();
        let first = temp.path().join("first");
        let second = temp.path().join("second");

        fs::create_dir_all(first.join("shared")).unwrap();
        let regular = touch(&second, "shared/__init__.py");
        let module = touch(&first, "plain.py");
        touch(&second, "plain/__init__.py");
        fs::create_dir_all(first.join("ns")).unwrap();
        fs::create_dir_all(second.join("ns")).unwrap();
        let nested = touch(&second, "ns/inner.py");

        let finder = ModuleFinder::new(vec![first.clone(), second.clone()]);

        assert_eq!(finder.find("shared").unwrap().kind, ModuleKind::Package(regular));
        assert_eq!(finder.find("plain").unwrap().kind, ModuleKind::Source(module));
        assert_eq!(
            finder.find("ns").unwrap().kind,
            ModuleKind::Namespace(vec![first.join("ns"), second.join("ns")])
        );
        assert_eq!(finder.find("ns.inner").unwrap().kind, ModuleKind::Source(nested));
        assert!(finder.find("missing").is_none());
        assert!(finder.find("plain.nothing").is_none());
    }

    #[test]
    fn test_finder_builtin_and_extension_modules() {
        let temp = TempDir::new().unwrap();
        let extension = touch(temp.path(), "_speedups.cpython-312-x86_64-linux-gnu.so");
        let source = touch(temp.path(), "typed.pyi");

        let finder = ModuleFinder::new(vec![temp.path().to_path_buf()]);
        let sys = finder.find("sys").unwrap();
        assert!(sys.is_compiled());
        assert_eq!(sys.kind, ModuleKind::Builtin);

        let found = finder.find("_speedups").unwrap();
        assert_eq!(found.kind, ModuleKind::Extension(extension));
        assert!(found.source_file().is_none());

        assert_eq!(finder.find("typed").unwrap().source_file(), Some(source.as_path()));
    }
}
