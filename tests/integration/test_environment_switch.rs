use crate::common::{FakeVenv, TestProject};
use pyresolve::environment::discover;
use pyresolve::{AnalysisEngine, PythonEngine, Settings, Worker};
use serde_json::{Value, json};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

const REQUESTS: (&str, &str) = ("requests/__init__.py", "def get(url):\n    pass\n");

#[test]
fn test_environment_changes_answer() {
    let project = TestProject::new();
    let script = project.add_file("script.py", "import requests\nrequests.get('u')\n");
    let with_requests = FakeVenv::new(&[REQUESTS]);
    let without_requests = FakeVenv::new(&[]);

    let request = |python: &PathBuf| {
        json!({ "file": script, "line": 2, "column": 10, "pythonExecutable": python })
            .to_string()
    };
    let input = [
        request(&with_requests.python()),
        request(&without_requests.python()),
        request(&with_requests.python()),
    ]
    .join("\n");

    let mut output = Vec::new();
    let engine = PythonEngine::new().unwrap();
    let mut worker = Worker::new(engine);
    worker.run(input.as_bytes(), &mut output).unwrap();

    let responses: Vec<Value> = String::from_utf8(output)
        .unwrap()
        .lines()
        .map(|line| serde_json::from_str(line).unwrap())
        .collect();
    assert_eq!(
        responses,
        vec![json!("requests.get"), Value::Null, json!("requests.get")]
    );
    // one discovery per interpreter
    assert_eq!(worker.resolver().engine().cached_environments(), 2);
}

#[test]
fn test_discovery_reads_venv_layout() {
    let base = TempDir::new().unwrap();
    let base_site = base.path().join("lib/python3.12/site-packages");
    fs::create_dir_all(&base_site).unwrap();
    fs::create_dir_all(base.path().join("lib/python3.12/lib-dynload")).unwrap();
    fs::create_dir_all(base.path().join("bin")).unwrap();

    let venv = TempDir::new().unwrap();
    fs::create_dir_all(venv.path().join("bin")).unwrap();
    fs::write(venv.path().join("bin/python3"), "").unwrap();
    fs::create_dir_all(venv.path().join("lib/python3.12/site-packages")).unwrap();
    fs::write(
        venv.path().join("pyvenv.cfg"),
        format!(
            "home = {}\ninclude-system-site-packages = true\nversion = 3.12.3\n",
            base.path().join("bin").display()
        ),
    )
    .unwrap();

    let extra = PathBuf::from("/opt/stubs");
    let env = discover(&venv.path().join("bin/python3"), &[extra.clone()]).unwrap();

    assert_eq!(env.version.as_deref(), Some("3.12"));
    assert_eq!(env.prefix.as_deref(), Some(venv.path()));
    assert_eq!(
        env.search_path,
        vec![
            base.path().join("lib/python3.12"),
            base.path().join("lib/python3.12/lib-dynload"),
            base_site,
            venv.path().join("lib/python3.12/site-packages"),
            extra,
        ]
    );
}

#[test]
fn test_configured_default_interpreter() {
    let venv = FakeVenv::new(&[REQUESTS]);
    let mut settings = Settings::default();
    settings.default_interpreter = Some(venv.python());
    settings.environment.extra_paths = vec![PathBuf::from("/opt/extra")];

    let engine = PythonEngine::from_settings(&settings).unwrap();
    let env = engine.resolve_environment(None).unwrap();
    assert_eq!(env.executable, Some(venv.python()));
    assert_eq!(env.search_path, vec![venv.site_packages(), PathBuf::from("/opt/extra")]);

    let again = engine.resolve_environment(None).unwrap();
    assert!(Arc::ptr_eq(&env, &again));
}

#[test]
fn test_disabled_cache_rediscovers() {
    let venv = FakeVenv::new(&[]);
    let mut settings = Settings::default();
    settings.environment.cache = false;

    let engine = PythonEngine::from_settings(&settings).unwrap();
    let first = engine.resolve_environment(Some(&venv.python())).unwrap();
    let second = engine.resolve_environment(Some(&venv.python())).unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first, second);
    assert_eq!(engine.cached_environments(), 0);
}
