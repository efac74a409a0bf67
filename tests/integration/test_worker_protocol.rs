use crate::common::{FakeVenv, TestProject};
use pyresolve::{
    AnalysisEngine, Candidate, EnginePosition, EngineResult, EnvironmentResult, PythonEngine,
    SourceInput, Worker,
};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;

fn query(file: &Path, line: u32, column: u32) -> Value {
    json!({ "file": file, "line": line, "column": column })
}

fn serve(engine: PythonEngine, requests: &[String]) -> Vec<Value> {
    let input = requests.join("\n");
    let mut output = Vec::new();
    Worker::new(engine)
        .run(input.as_bytes(), &mut output)
        .expect("worker loop failed");

    let output = String::from_utf8(output).expect("stdout is not UTF-8");
    output
        .lines()
        .map(|line| serde_json::from_str(line).expect("stdout line is not JSON"))
        .collect()
}

#[test]
fn test_every_line_gets_exactly_one_response() {
    let project = TestProject::new();
    let script = project.add_file("script.py", "open('data.txt')\n");
    let missing = project.path().join("missing.py");

    let requests = vec![
        query(&script, 1, 1).to_string(),
        "not json".to_string(),
        query(&missing, 1, 1).to_string(),
        "   ".to_string(),
        json!({ "file": script, "line": 0, "column": 1 }).to_string(),
        query(&script, 1, 3).to_string(),
    ];

    let responses = serve(PythonEngine::new().unwrap(), &requests);
    assert_eq!(
        responses,
        vec![
            json!("builtins.open"),
            Value::Null,
            Value::Null,
            Value::Null,
            Value::Null,
            json!("builtins.open"),
        ]
    );
}

#[test]
fn test_deeply_nested_file_keeps_worker_alive() {
    let project = TestProject::new();
    let script = project.add_file("script.py", "open('data.txt')\n");
    let depth = 20_000;
    let deep_text = format!(
        "print(total)\ntotal = {}1{}\n",
        "(".repeat(depth),
        ")".repeat(depth)
    );

    let requests = vec![
        json!({ "file": script, "line": 1, "column": 1, "fileText": deep_text }).to_string(),
        json!({ "file": script, "line": 1, "column": 7, "fileText": deep_text }).to_string(),
        query(&script, 1, 1).to_string(),
    ];

    let responses = serve(PythonEngine::new().unwrap(), &requests);
    assert_eq!(
        responses,
        vec![
            json!("builtins.print"),
            json!("script.total"),
            json!("builtins.open"),
        ]
    );
}

#[test]
fn test_file_text_and_column_translation() {
    let project = TestProject::new();
    let script = project.add_file("script.py", "x = 1\n");

    let at = |column: u32| {
        json!({ "file": script, "line": 1, "column": column, "fileText": "(open)\n" })
            .to_string()
    };
    let responses = serve(PythonEngine::new().unwrap(), &[at(1), at(2), at(6), at(7)]);

    // column 1 is the parenthesis; column 2 is the first letter of `open`;
    // column 6 sits just past the name; column 7 is the end of the line
    assert_eq!(
        responses,
        vec![
            Value::Null,
            json!("builtins.open"),
            json!("builtins.open"),
            Value::Null,
        ]
    );
}

#[test]
fn test_implicit_module_attributes() {
    let project = TestProject::new();
    let script = project.add_file("script.py", "print(__file__, __name__)\n");

    let responses = serve(
        PythonEngine::new().unwrap(),
        &[query(&script, 1, 7).to_string(), query(&script, 1, 17).to_string()],
    );
    assert_eq!(
        responses,
        vec![
            json!("__import_system__.__file__"),
            json!("__import_system__.__name__"),
        ]
    );
}

#[test]
fn test_repeated_queries_are_stable() {
    let project = TestProject::new();
    let script = project.add_file(
        "app.py",
        "class Greeter:\n    def hello(self):\n        return 'hi'.upper()\n\nGreeter().hello()\n",
    );

    let hello = query(&script, 5, 11).to_string();
    let upper = query(&script, 3, 22).to_string();
    let responses = serve(
        PythonEngine::new().unwrap(),
        &[hello.clone(), upper.clone(), hello, upper],
    );

    assert_eq!(responses[0], json!("app.Greeter.hello"));
    assert_eq!(responses[1], json!("builtins.str.upper"));
    assert_eq!(responses[0], responses[2]);
    assert_eq!(responses[1], responses[3]);
}

#[test]
fn test_unknown_interpreter_answers_null_and_continues() {
    let project = TestProject::new();
    let script = project.add_file("script.py", "len([])\n");
    let venv = FakeVenv::new(&[]);

    let requests = vec![
        json!({
            "file": script, "line": 1, "column": 1,
            "pythonExecutable": project.path().join("no/such/python"),
        })
        .to_string(),
        json!({ "file": script, "line": 1, "column": 1, "pythonExecutable": venv.python() })
            .to_string(),
    ];

    let responses = serve(PythonEngine::new().unwrap(), &requests);
    assert_eq!(responses, vec![Value::Null, json!("builtins.len")]);
}

/// Engine that knows a single name but not its module
struct DunderOnly;

impl AnalysisEngine for DunderOnly {
    type Context = ();

    fn resolve_environment(&self, _: Option<&Path>) -> EnvironmentResult<Arc<()>> {
        Ok(Arc::new(()))
    }

    fn resolve_at(
        &mut self,
        _: &(),
        _: SourceInput<'_>,
        position: EnginePosition,
    ) -> EngineResult<Vec<Candidate>> {
        Ok(match position.column {
            0 => vec![Candidate::new("__init__", None)],
            1 => vec![Candidate::new("helper", None)],
            _ => vec![
                Candidate::new("first", Some("pkg.first".to_string())),
                Candidate::new("second", Some("pkg.second".to_string())),
            ],
        })
    }
}

#[test]
fn test_name_normalization_through_worker() {
    let requests: Vec<String> = (1..=3)
        .map(|column| json!({ "file": "m.py", "line": 1, "column": column }).to_string())
        .collect();
    let input = requests.join("\n");
    let mut output = Vec::new();

    let stats = Worker::new(DunderOnly)
        .run(input.as_bytes(), &mut output)
        .unwrap();

    assert_eq!(
        String::from_utf8(output).unwrap(),
        "\"__import_system__.__init__\"\nnull\n\"pkg.first\"\n"
    );
    assert_eq!(stats.received, 3);
    assert_eq!(stats.resolved, 2);
    assert_eq!(stats.null, 1);
    assert_eq!(stats.failed, 0);
}
