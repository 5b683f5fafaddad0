//! Opcode definitions for the stack machine.

use crate::bytecode::word::Word;

/// Opcodes for the virtual machine.
///
/// Every opcode occupies one word in the code stream. Opcodes marked
/// reserved decode but have no handler, and fail at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i16)]
pub enum OpCode {
    // ============ Machine ============
    /// Stop execution. Checked before dispatch by the run loop.
    Halt = 0x00,

    // ============ Stack ============
    /// Push the next code word as a literal: PUSH <word>
    Push = 0x01,
    /// Discard the top of the stack (reserved)
    Pop = 0x02,
    /// Duplicate the top of the stack (reserved)
    Copy = 0x03,
    /// Exchange the two topmost values (reserved)
    Swap = 0x04,

    // ============ Arithmetic ============
    /// Add two values: a + b
    Add = 0x20,
    /// Subtract two values: a - b. Also serves as the equality test.
    Subtract = 0x21,

    // ============ Control Flow ============
    /// Pop target, pop value; jump to target if value is zero
    Jz = 0x30,
    /// Jump if greater (reserved)
    Jg = 0x31,
    /// Jump if less (reserved)
    Jl = 0x32,

    // ============ I/O ============
    /// Print top of stack as a character (reserved)
    Putch = 0x50,
    /// Print top of stack in decimal (reserved)
    Putdec = 0x51,
    /// Print top of stack in hex (reserved)
    Puthex = 0x52,
}

impl OpCode {
    /// Decode a word into an opcode.
    pub fn from_word(word: Word) -> Option<OpCode> {
        let op = match word {
            0x00 => OpCode::Halt,
            0x01 => OpCode::Push,
            0x02 => OpCode::Pop,
            0x03 => OpCode::Copy,
            0x04 => OpCode::Swap,
            0x20 => OpCode::Add,
            0x21 => OpCode::Subtract,
            0x30 => OpCode::Jz,
            0x31 => OpCode::Jg,
            0x32 => OpCode::Jl,
            0x50 => OpCode::Putch,
            0x51 => OpCode::Putdec,
            0x52 => OpCode::Puthex,
            _ => return None,
        };
        Some(op)
    }

    /// The word this opcode is encoded as.
    pub fn word(self) -> Word {
        self as Word
    }

    /// Upper-case display name.
    pub fn name(self) -> &'static str {
        match self {
            OpCode::Halt => "HALT",
            OpCode::Push => "PUSH",
            OpCode::Pop => "POP",
            OpCode::Copy => "COPY",
            OpCode::Swap => "SWAP",
            OpCode::Add => "ADD",
            OpCode::Subtract => "SUB",
            OpCode::Jz => "JZ",
            OpCode::Jg => "JG",
            OpCode::Jl => "JL",
            OpCode::Putch => "PUTCH",
            OpCode::Putdec => "PUTDEC",
            OpCode::Puthex => "PUTHEX",
        }
    }

    /// Number of inline operand words following the opcode.
    pub fn operand_count(self) -> usize {
        match self {
            OpCode::Push => 1,
            _ => 0,
        }
    }
}

impl std::fmt::Display for OpCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}
