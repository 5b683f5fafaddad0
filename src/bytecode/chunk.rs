//! Code buffer used while generating bytecode.

use crate::bytecode::instruction::OpCode;
use crate::bytecode::word::{wrap, Word, MAX_WORD};
use crate::error::CompileError;

/// One slot of emitted code before label resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodePoint {
    /// A finished word.
    Word(Word),
    /// Placeholder for the address of a label, filled in by [`Chunk::resolve`].
    LabelRef(String),
}

/// A label declaration: the code offset at the time it was seen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub position: usize,
    pub name: String,
}

/// A chunk of code points plus the symbols declared while emitting it.
#[derive(Debug, Clone, Default)]
pub struct Chunk {
    /// The emitted code, possibly containing placeholders.
    pub code: Vec<CodePoint>,
    /// Source line for each code point.
    pub lines: Vec<usize>,
    /// Label declarations in source order. Duplicates are allowed.
    pub symbols: Vec<Symbol>,
}

impl Chunk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write an opcode to the chunk.
    pub fn write_op(&mut self, op: OpCode, line: usize) {
        self.code.push(CodePoint::Word(op.word()));
        self.lines.push(line);
    }

    /// Write a literal, wrapped into word range.
    pub fn write_literal(&mut self, value: i64, line: usize) {
        self.code.push(CodePoint::Word(wrap(value)));
        self.lines.push(line);
    }

    /// Write a placeholder for a label's address.
    pub fn write_label_ref(&mut self, name: impl Into<String>, line: usize) {
        self.code.push(CodePoint::LabelRef(name.into()));
        self.lines.push(line);
    }

    /// Record a label at the current offset.
    pub fn declare_label(&mut self, name: impl Into<String>) {
        self.symbols.push(Symbol {
            position: self.current_offset(),
            name: name.into(),
        });
    }

    /// Get the current offset in the code.
    pub fn current_offset(&self) -> usize {
        self.code.len()
    }

    /// Get the line number at a given offset.
    pub fn get_line(&self, offset: usize) -> usize {
        self.lines.get(offset).copied().unwrap_or(0)
    }

    /// Position of the first declaration named `name`. Later duplicates are
    /// never found.
    pub fn lookup(&self, name: &str) -> Option<usize> {
        self.symbols
            .iter()
            .find(|symbol| symbol.name == name)
            .map(|symbol| symbol.position)
    }

    /// Replace every placeholder with its label's position.
    ///
    /// A position must itself fit in a word; labels past `MAX_WORD` are an error.
    pub fn resolve(&self) -> Result<Vec<Word>, CompileError> {
        self.code
            .iter()
            .enumerate()
            .map(|(offset, point)| match point {
                CodePoint::Word(word) => Ok(*word),
                CodePoint::LabelRef(name) => self.resolve_label(name, self.get_line(offset)),
            })
            .collect()
    }

    fn resolve_label(&self, name: &str, line: usize) -> Result<Word, CompileError> {
        let position = self
            .lookup(name)
            .ok_or_else(|| CompileError::unresolved_label(name, line))?;
        if position > MAX_WORD as usize {
            return Err(CompileError::label_out_of_range(name, position, line));
        }
        Ok(position as Word)
    }
}
