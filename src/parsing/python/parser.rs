//! Python source parsing
//!
//! Thin wrapper over tree-sitter-python. The tree is error tolerant: code
//! with syntax errors still yields a tree whose intact parts resolve normally.
//!
//! **Tree-sitter ABI Version**: ABI-15 (tree-sitter-python 0.25)

use crate::error::{EngineError, EngineResult};
use crate::types::EnginePosition;
use thiserror::Error;
use tree_sitter::{Node, Parser, Tree};

/// Python-specific parsing errors
#[derive(Error, Debug)]
pub enum PythonParseError {
    #[error(
        "Failed to initialize Python parser: {reason}\nSuggestion: Ensure tree-sitter-python is properly installed and the version matches Cargo.toml"
    )]
    ParserInitFailed { reason: String },
}

impl From<PythonParseError> for EngineError {
    fn from(err: PythonParseError) -> Self {
        match err {
            PythonParseError::ParserInitFailed { reason } => EngineError::ParserInit { reason },
        }
    }
}

/// Python language parser
pub struct PythonParser {
    parser: Parser,
}

impl std::fmt::Debug for PythonParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PythonParser")
            .field("language", &"Python")
            .finish()
    }
}

impl PythonParser {
    /// Create a new Python parser instance
    pub fn new() -> Result<Self, PythonParseError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| PythonParseError::ParserInitFailed {
                reason: format!("tree-sitter error: {e}"),
            })?;

        Ok(Self { parser })
    }

    /// Parse `code`; `None` only when tree-sitter gives up entirely
    pub fn parse(&mut self, code: String) -> Option<ParsedSource> {
        let tree = self.parser.parse(&code, None)?;
        let line_starts = line_starts(&code);
        Some(ParsedSource {
            code,
            tree,
            line_starts,
        })
    }
}

/// Source text together with its syntax tree
pub struct ParsedSource {
    code: String,
    tree: Tree,
    /// Byte offset of the first character of every line
    line_starts: Vec<usize>,
}

impl ParsedSource {
    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn root(&self) -> Node<'_> {
        self.tree.root_node()
    }

    pub fn text(&self, node: Node<'_>) -> &str {
        node.utf8_text(self.code.as_bytes()).unwrap_or("")
    }

    /// Number of lines; a trailing newline starts one more (empty) line
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Byte offset of an engine position.
    ///
    /// The column counts characters and may point one past the last
    /// character of the line (cursor at end of line).
    pub fn byte_offset(&self, position: EnginePosition) -> EngineResult<usize> {
        let out_of_range = |reason: String| EngineError::PositionOutOfRange {
            line: position.line,
            column: position.column,
            reason,
        };

        let line_index = (position.line as usize)
            .checked_sub(1)
            .filter(|index| *index < self.line_starts.len())
            .ok_or_else(|| {
                out_of_range(format!("line must be in 1..={}", self.line_starts.len()))
            })?;

        let start = self.line_starts[line_index];
        let line = self.line_text(line_index);
        let column = position.column as usize;

        let char_count = line.chars().count();
        if column > char_count {
            return Err(out_of_range(format!("column must be in 0..={char_count}")));
        }

        let within_line = line
            .char_indices()
            .nth(column)
            .map(|(offset, _)| offset)
            .unwrap_or(line.len());
        Ok(start + within_line)
    }

    /// Text of a line without its terminator
    fn line_text(&self, line_index: usize) -> &str {
        let start = self.line_starts[line_index];
        let end = self
            .line_starts
            .get(line_index + 1)
            .map(|next| next - 1)
            .unwrap_or(self.code.len());
        let line = &self.code[start..end];
        line.strip_suffix('\r').unwrap_or(line)
    }
}

fn line_starts(code: &str) -> Vec<usize> {
    std::iter::once(0)
        .chain(code.match_indices('\n').map(|(i, _)| i + 1))
        .collect()
}
