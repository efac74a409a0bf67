//! Python language analysis

pub mod builtins;
pub mod goto;
pub mod modules;
pub mod parser;
pub mod scope;
pub mod summary;

pub use goto::Goto;
pub use modules::{ModuleFinder, ModuleKind, ModuleLocation, module_path_from_file};
pub use parser::{ParsedSource, PythonParseError, PythonParser};
pub use summary::{ModuleIndex, ModuleSummary};
