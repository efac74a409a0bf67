//! Source analysis
//!
//! Everything that reads Python source: parsing, scoping, module lookup and
//! definition resolution.

pub mod python;

pub use python::{Goto, ModuleFinder, ModuleIndex, ParsedSource, PythonParser};
