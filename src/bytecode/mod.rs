//! Bytecode module for the stackvm toolchain.
//!
//! # Architecture
//!
//! - `word`: the machine word and its wraparound range
//! - `instruction`: OpCode definitions for the instruction set
//! - `chunk`: code points and symbols collected during generation
//! - `compiler`: transforms source text into resolved words
//! - `machine`: stack-based virtual machine for executing words
//! - `codec`: flat binary encoding of word sequences
//! - `disassembler`: debug output for bytecode inspection

pub mod chunk;
pub mod codec;
pub mod compiler;
pub mod disassembler;
pub mod instruction;
pub mod machine;
pub mod word;

#[cfg(test)]
mod tests;

pub use chunk::{Chunk, CodePoint, Symbol};
pub use codec::{deserialize, serialize};
pub use compiler::Compiler;
pub use disassembler::{disassemble, print_disassembly};
pub use instruction::OpCode;
pub use machine::{Machine, MachineSnapshot, RunOptions, CALL_STACK_SIZE, MAIN_STACK_SIZE};
pub use word::{wrap, Word, MAX_WORD, MIN_WORD};
