//! Bytecode disassembler for debugging.

use crate::bytecode::instruction::OpCode;
use crate::bytecode::word::Word;
use std::fmt::Write;

/// Disassemble a word sequence into human-readable output.
pub fn disassemble(code: &[Word]) -> String {
    let mut output = String::new();
    let mut offset = 0;

    while offset < code.len() {
        offset = disassemble_instruction(code, offset, &mut output);
    }

    output
}

/// Disassemble a single instruction, returning the offset of the next one.
///
/// An offset past the end of `code` writes nothing and is returned unchanged.
pub fn disassemble_instruction(code: &[Word], offset: usize, output: &mut String) -> usize {
    let word = match code.get(offset) {
        Some(word) => *word,
        None => return offset,
    };

    write!(output, "{:04} ", offset).unwrap();

    let opcode = match OpCode::from_word(word) {
        Some(op) => op,
        None => {
            writeln!(output, ".word {:#06x}", word).unwrap();
            return offset + 1;
        }
    };

    let operands = opcode.operand_count();
    match code.get(offset + 1..offset + 1 + operands) {
        Some(literals) => {
            write!(output, "{}", opcode).unwrap();
            for literal in literals {
                write!(output, " {}", literal).unwrap();
            }
            writeln!(output).unwrap();
            offset + 1 + operands
        }
        None => {
            writeln!(output, "{} <missing operand>", opcode).unwrap();
            offset + 1
        }
    }
}

/// Print disassembly to stdout.
pub fn print_disassembly(code: &[Word]) {
    print!("{}", disassemble(code));
}
