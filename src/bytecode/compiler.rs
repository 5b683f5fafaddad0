//! Bytecode compiler: transforms source text into words.
//!
//! Compilation is two passes. The first walks the token stream and emits
//! code points into a [`Chunk`], recording label declarations as it goes;
//! label references become placeholders. The second pass replaces every
//! placeholder with its label's position.

use crate::bytecode::chunk::Chunk;
use crate::bytecode::instruction::OpCode;
use crate::bytecode::word::Word;
use crate::error::{CompileError, LexerError};
use crate::lexer::{Token, TokenKind, Tokenizer};

/// Result type for compilation.
pub type CompileResult<T> = Result<T, CompileError>;

/// The bytecode compiler.
#[derive(Debug, Default)]
pub struct Compiler {
    chunk: Chunk,
}

impl Compiler {
    /// Create a new compiler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Compile source text into a resolved word sequence.
    pub fn compile(source: &str) -> CompileResult<Vec<Word>> {
        // The trailing newline closes whatever token the source ends on.
        let source = format!("{}\n", source);
        let mut compiler = Compiler::new();
        compiler.emit_all(Tokenizer::new(&source))?;
        compiler.finish()
    }

    /// Pass 1: emit code for every token in the stream.
    pub fn emit_all<I>(&mut self, tokens: I) -> CompileResult<()>
    where
        I: IntoIterator<Item = Result<Token, LexerError>>,
    {
        for token in tokens {
            self.emit(token?);
        }
        Ok(())
    }

    /// Emit the code for a single token.
    pub fn emit(&mut self, token: Token) {
        let line = token.line;
        match token.kind {
            TokenKind::Number(n) => {
                self.chunk.write_op(OpCode::Push, line);
                self.chunk.write_literal(n, line);
            }
            TokenKind::String(s) => {
                // Reversed so that popping yields the characters in order.
                for c in s.chars().rev() {
                    self.chunk.write_op(OpCode::Push, line);
                    self.chunk.write_literal(c as i64, line);
                }
            }
            TokenKind::Instruction(op) => self.chunk.write_op(op, line),
            TokenKind::Label(name) => self.chunk.declare_label(name),
            TokenKind::LabelRef(name) => {
                self.chunk.write_op(OpCode::Push, line);
                self.chunk.write_label_ref(name, line);
            }
        }
    }

    /// The chunk emitted so far.
    pub fn chunk(&self) -> &Chunk {
        &self.chunk
    }

    /// Append the final HALT and run pass 2.
    pub fn finish(mut self) -> CompileResult<Vec<Word>> {
        let line = self.chunk.lines.last().copied().unwrap_or(1);
        self.chunk.write_op(OpCode::Halt, line);
        self.chunk.resolve()
    }
}
