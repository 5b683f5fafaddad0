//! Error types for compilation and execution.

use crate::bytecode::machine::MachineSnapshot;
use crate::bytecode::word::Word;
use thiserror::Error;

/// Lexer errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LexerError {
    #[error("Line {line}: Bad character '{ch}' on {state}")]
    UnexpectedChar {
        ch: char,
        state: &'static str,
        line: usize,
    },

    #[error("Line {line}: Unknown opcode: {text}")]
    UnknownInstruction { text: String, line: usize },

    #[error("Line {line}: Invalid number '{text}'")]
    InvalidNumber { text: String, line: usize },

    #[error("Line {line}: Expected a name after '{sigil}'")]
    EmptyName { sigil: char, line: usize },
}

impl LexerError {
    pub fn unexpected_char(ch: char, state: &'static str, line: usize) -> Self {
        Self::UnexpectedChar { ch, state, line }
    }

    pub fn unknown_instruction(text: impl Into<String>, line: usize) -> Self {
        Self::UnknownInstruction {
            text: text.into(),
            line,
        }
    }

    pub fn invalid_number(text: impl Into<String>, line: usize) -> Self {
        Self::InvalidNumber {
            text: text.into(),
            line,
        }
    }

    pub fn empty_name(sigil: char, line: usize) -> Self {
        Self::EmptyName { sigil, line }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::UnexpectedChar { line, .. } => *line,
            Self::UnknownInstruction { line, .. } => *line,
            Self::InvalidNumber { line, .. } => *line,
            Self::EmptyName { line, .. } => *line,
        }
    }
}

/// Compilation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
    #[error(transparent)]
    Lexer(#[from] LexerError),

    #[error("Line {line}: Unresolved symbol: {name}")]
    UnresolvedLabel { name: String, line: usize },

    #[error("Line {line}: Label {name} at offset {position} does not fit in a word")]
    LabelOutOfRange {
        name: String,
        position: usize,
        line: usize,
    },
}

impl CompileError {
    pub fn unresolved_label(name: impl Into<String>, line: usize) -> Self {
        Self::UnresolvedLabel {
            name: name.into(),
            line,
        }
    }

    pub fn label_out_of_range(name: impl Into<String>, position: usize, line: usize) -> Self {
        Self::LabelOutOfRange {
            name: name.into(),
            position,
            line,
        }
    }

    pub fn line(&self) -> usize {
        match self {
            Self::Lexer(err) => err.line(),
            Self::UnresolvedLabel { line, .. } => *line,
            Self::LabelOutOfRange { line, .. } => *line,
        }
    }
}

/// Runtime errors. Each carries a copy of the machine state at the point of failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("ip out of code range: ip={ip}, code size={code_len} ({snapshot})")]
    IpOutOfRange {
        ip: isize,
        code_len: usize,
        snapshot: MachineSnapshot,
    },

    #[error("Stack overflow ({snapshot})")]
    StackOverflow { snapshot: MachineSnapshot },

    #[error("Stack underflow ({snapshot})")]
    StackUnderflow { snapshot: MachineSnapshot },

    #[error("Got bad opcode: {opcode:#04x}, {reason} ({snapshot})")]
    UnknownOpcode {
        opcode: Word,
        reason: &'static str,
        snapshot: MachineSnapshot,
    },
}

impl RuntimeError {
    pub fn ip_out_of_range(ip: isize, snapshot: MachineSnapshot) -> Self {
        Self::IpOutOfRange {
            ip,
            code_len: snapshot.code_len,
            snapshot,
        }
    }

    pub fn stack_overflow(snapshot: MachineSnapshot) -> Self {
        Self::StackOverflow { snapshot }
    }

    pub fn stack_underflow(snapshot: MachineSnapshot) -> Self {
        Self::StackUnderflow { snapshot }
    }

    pub fn unknown_opcode(opcode: Word, snapshot: MachineSnapshot) -> Self {
        Self::UnknownOpcode {
            opcode,
            reason: "no such instruction",
            snapshot,
        }
    }

    pub fn unimplemented_opcode(opcode: Word, snapshot: MachineSnapshot) -> Self {
        Self::UnknownOpcode {
            opcode,
            reason: "reserved instruction has no handler",
            snapshot,
        }
    }

    pub fn snapshot(&self) -> &MachineSnapshot {
        match self {
            Self::IpOutOfRange { snapshot, .. } => snapshot,
            Self::StackOverflow { snapshot } => snapshot,
            Self::StackUnderflow { snapshot } => snapshot,
            Self::UnknownOpcode { snapshot, .. } => snapshot,
        }
    }
}

/// Errors decoding a serialized word stream.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("Byte length {0} is not a whole number of words")]
    OddLength(usize),
}

/// A unified error type for all phases.
#[derive(Debug, Error)]
pub enum StackVmError {
    #[error("Compile error: {0}")]
    Compile(#[from] CompileError),

    #[error("Runtime error: {0}")]
    Runtime(#[from] RuntimeError),

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<LexerError> for StackVmError {
    fn from(err: LexerError) -> Self {
        Self::Compile(CompileError::Lexer(err))
    }
}
