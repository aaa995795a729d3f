use cppmodel_core::{LiteralTable, SourceLocation, StringLiteral};

use crate::ast::Offset;

/// One source file: its name, text, and the literal table its syntax tree
/// was interned into. Turns byte offsets into line/column locations.
#[derive(Debug, Clone)]
pub struct TranslationUnit {
    literals: LiteralTable,
    file_name: String,
    file: StringLiteral,
    source: String,
    line_starts: Vec<u32>,
}

impl TranslationUnit {
    pub fn new(literals: &LiteralTable, file_name: impl Into<String>, source: impl Into<String>) -> Self {
        let file_name = file_name.into();
        let source = source.into();
        let file = literals.string_literal(&file_name);
        let line_starts = std::iter::once(0)
            .chain(
                source
                    .bytes()
                    .enumerate()
                    .filter(|(_, b)| *b == b'\n')
                    .map(|(i, _)| i as u32 + 1),
            )
            .collect();
        Self {
            literals: literals.clone(),
            file_name,
            file,
            source,
            line_starts,
        }
    }

    pub fn literals(&self) -> &LiteralTable {
        &self.literals
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// One-based line and column of `offset`. Offsets past the end clamp to
    /// the end of the source.
    pub fn line_column(&self, offset: Offset) -> (u32, u32) {
        let offset = offset.min(self.source.len() as u32);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        let column = offset - self.line_starts[line] + 1;
        (line as u32 + 1, column)
    }

    pub fn location(&self, offset: Offset) -> SourceLocation {
        let (line, column) = self.line_column(offset);
        SourceLocation {
            file: Some(self.file),
            offset,
            line,
            column,
        }
    }

    /// Source text between two offsets, empty when the range is not valid.
    pub fn text(&self, start: Offset, end: Offset) -> &str {
        self.source.get(start as usize..end as usize).unwrap_or_default()
    }
}
