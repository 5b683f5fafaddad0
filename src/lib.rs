//! stackvm: a tiny toolchain made of a two-pass word compiler and a stack machine.
//!
//! Source text is tokenized, compiled into a flat sequence of 16-bit words
//! with labels resolved to code offsets, and executed by a stack-based
//! virtual machine.
//!
//! ```
//! let code = stackvm::compile("5 2 -").unwrap();
//! assert_eq!(stackvm::run(&code).unwrap(), 3);
//! ```

// `Machine::next` is a fetch, not an iterator.
#![allow(clippy::should_implement_trait)]

pub mod bytecode;
pub mod error;
pub mod lexer;

use bytecode::{Compiler, Machine, RunOptions, Word};
use error::{CompileError, DecodeError, RuntimeError, StackVmError};

/// Compile source text into a resolved word sequence.
pub fn compile(source: &str) -> Result<Vec<Word>, CompileError> {
    Compiler::compile(source)
}

/// Encode a word sequence as raw little-endian bytes.
pub fn serialize(code: &[Word]) -> Vec<u8> {
    bytecode::serialize(code)
}

/// Decode raw bytes back into a word sequence.
pub fn deserialize(bytes: &[u8]) -> Result<Vec<Word>, DecodeError> {
    bytecode::deserialize(bytes)
}

/// Run a word sequence to HALT and return the value on top of the stack.
pub fn run(code: &[Word]) -> Result<Word, RuntimeError> {
    run_with_options(code, RunOptions::default())
}

/// Run a word sequence with explicit execution options.
pub fn run_with_options(code: &[Word], options: RunOptions) -> Result<Word, RuntimeError> {
    Machine::new(code).with_options(options).run()?.result()
}

/// Compile and run source text in one go.
pub fn run_source(source: &str) -> Result<Word, StackVmError> {
    let code = compile(source)?;
    Ok(run(&code)?)
}
