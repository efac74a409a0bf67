use crate::common::{FakeVenv, TestProject, position_of};
use pyresolve::{PythonEngine, Query, SymbolResolver, Position};
use std::path::Path;

struct Session {
    resolver: SymbolResolver<PythonEngine>,
    venv: FakeVenv,
}

impl Session {
    fn new() -> Self {
        Self {
            resolver: SymbolResolver::new(PythonEngine::new().unwrap()),
            venv: FakeVenv::new(&[]),
        }
    }

    /// Resolve the `nth` occurrence of `needle` in `file`
    fn resolve(&mut self, file: &Path, needle: &str, nth: usize) -> Option<String> {
        let code = std::fs::read_to_string(file).unwrap();
        let (line, column) = position_of(&code, needle, nth);
        let query = Query {
            file: file.to_path_buf(),
            position: Position { line, column },
            file_text: None,
            python_executable: Some(self.venv.python()),
        };
        self.resolver.resolve(&query).unwrap()
    }
}

fn package_project() -> (TestProject, std::path::PathBuf, std::path::PathBuf) {
    let project = TestProject::new();
    let init = project.add_file("pkg/__init__.py", "from .core import Engine\n");
    project.add_file(
        "pkg/core.py",
        "class Engine:\n    def start(self):\n        pass\n\ndef build():\n    return Engine()\n",
    );
    let cli = project.add_file(
        "pkg/cli.py",
        "from . import core\nfrom .core import Engine, build\nfrom .core import Engine as E\nfrom .missing import nothing\n\ne = Engine()\ne.start()\ncore.build()\nE\n",
    );
    (project, init, cli)
}

#[test]
fn test_relative_imports_resolve_against_package() {
    let (_project, init, cli) = package_project();
    let mut session = Session::new();

    assert_eq!(session.resolve(&cli, "core", 0).as_deref(), Some("pkg.core"));
    assert_eq!(
        session.resolve(&cli, "Engine", 0).as_deref(),
        Some("pkg.core.Engine")
    );
    assert_eq!(
        session.resolve(&cli, "build", 0).as_deref(),
        Some("pkg.core.build")
    );
    assert_eq!(session.resolve(&cli, "nothing", 0), None);

    // `__init__.py` is the package itself, so `.core` is a child of it
    assert_eq!(
        session.resolve(&init, "Engine", 0).as_deref(),
        Some("pkg.core.Engine")
    );
}

#[test]
fn test_usages_follow_imports() {
    let (_project, _init, cli) = package_project();
    let mut session = Session::new();

    // `e = Engine()`
    assert_eq!(
        session.resolve(&cli, "Engine", 2).as_deref(),
        Some("pkg.core.Engine")
    );
    assert_eq!(
        session.resolve(&cli, "start", 0).as_deref(),
        Some("pkg.core.Engine.start")
    );
    assert_eq!(
        session.resolve(&cli, "build", 1).as_deref(),
        Some("pkg.core.build")
    );
    assert_eq!(session.resolve(&cli, "E\n", 1).as_deref(), Some("pkg.core.Engine"));
}

#[test]
fn test_scoping_rules() {
    let project = TestProject::new();
    let file = project.add_file(
        "scopes.py",
        "counter = 0\n\nclass Config:\n    counter = 1\n    def bump(self):\n        global counter\n        counter += 1\n        return counter\n\ndef outer():\n    value = 1\n    def inner():\n        return value\n    return inner\n",
    );
    let mut session = Session::new();

    assert_eq!(
        session.resolve(&file, "counter", 1).as_deref(),
        Some("scopes.Config.counter")
    );
    // class bodies are skipped for methods; `global` points at the module
    assert_eq!(
        session.resolve(&file, "counter", 4).as_deref(),
        Some("scopes.counter")
    );
    assert_eq!(
        session.resolve(&file, "inner", 0).as_deref(),
        None,
        "nested functions have no dotted name"
    );
    assert_eq!(session.resolve(&file, "value", 1), None);
    assert_eq!(
        session.resolve(&file, "outer", 0).as_deref(),
        Some("scopes.outer")
    );
}

#[test]
fn test_site_packages_and_builtin_modules() {
    let project = TestProject::new();
    let file = project.add_file(
        "main.py",
        "import sys\nimport requests\nfrom requests.sessions import Session\n\nrequests.get('u')\nSession().mount('x')\nsys.argv\n",
    );
    let mut session = Session::new();
    session.venv = FakeVenv::new(&[
        (
            "requests/__init__.py",
            "from .api import get\nfrom .sessions import Session\n",
        ),
        ("requests/api.py", "def get(url, **kwargs):\n    pass\n"),
        (
            "requests/sessions.py",
            "class Session:\n    def mount(self, prefix):\n        pass\n",
        ),
    ]);

    assert_eq!(session.resolve(&file, "requests", 0).as_deref(), Some("requests"));
    assert_eq!(
        session.resolve(&file, "get", 0).as_deref(),
        Some("requests.get")
    );
    assert_eq!(
        session.resolve(&file, "Session", 0).as_deref(),
        Some("requests.sessions.Session")
    );
    assert_eq!(
        session.resolve(&file, "mount", 0).as_deref(),
        Some("requests.sessions.Session.mount")
    );
    assert_eq!(session.resolve(&file, "argv", 0).as_deref(), Some("sys.argv"));
}
