use serde::{Deserialize, Serialize};

/// A cursor position as the host sends it: both coordinates 1-indexed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

/// A cursor position in the engine's convention.
///
/// `line` is 1-indexed like [`Position::line`]; `column` is 0-indexed and
/// counts characters (not bytes) from the start of the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnginePosition {
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// Returns `None` unless both coordinates are at least 1.
    pub fn new(line: u32, column: u32) -> Option<Self> {
        if line == 0 || column == 0 {
            None
        } else {
            Some(Self { line, column })
        }
    }

    /// Translate to the engine's convention.
    ///
    /// Lines pass through unchanged; columns shift from 1-indexed to
    /// 0-indexed. This is the only place the shift happens.
    pub fn to_engine(self) -> EnginePosition {
        EnginePosition {
            line: self.line,
            column: self.column.saturating_sub(1),
        }
    }
}
