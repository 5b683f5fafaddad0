//! Token definitions for the stackvm lexer.

use std::collections::HashMap;

use lazy_static::lazy_static;

use crate::bytecode::instruction::OpCode;

lazy_static! {
    /// Mnemonic → opcode table. Keys are upper-case.
    static ref MNEMONICS: HashMap<&'static str, OpCode> = {
        let mut m = HashMap::new();
        m.insert("+", OpCode::Add);
        m.insert("-", OpCode::Subtract);
        // Comparison is subtraction; the caller tests the result against zero.
        m.insert("=", OpCode::Subtract);
        m.insert("JZ", OpCode::Jz);
        m.insert("HALT", OpCode::Halt);
        m
    };
}

/// Resolve an instruction mnemonic, ignoring case.
pub fn lookup_mnemonic(text: &str) -> Option<OpCode> {
    MNEMONICS.get(text.to_ascii_uppercase().as_str()).copied()
}

/// All token types in stackvm source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Decimal or `0x` hexadecimal literal, not yet wrapped to word range
    Number(i64),
    /// Double-quoted literal, no escapes
    String(String),
    Instruction(OpCode),
    /// `:name`
    Label(String),
    /// `@name`
    LabelRef(String),
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TokenKind::Number(n) => write!(f, "{}", n),
            TokenKind::String(s) => write!(f, "\"{}\"", s),
            TokenKind::Instruction(op) => write!(f, "{}", op),
            TokenKind::Label(name) => write!(f, ":{}", name),
            TokenKind::LabelRef(name) => write!(f, "@{}", name),
        }
    }
}

/// A token with its kind and the line it started on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: usize,
}

impl Token {
    pub fn new(kind: TokenKind, line: usize) -> Self {
        Self { kind, line }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mnemonics_are_case_insensitive() {
        assert_eq!(lookup_mnemonic("halt"), Some(OpCode::Halt));
        assert_eq!(lookup_mnemonic("Jz"), Some(OpCode::Jz));
        assert_eq!(lookup_mnemonic("HALT"), Some(OpCode::Halt));
    }

    #[test]
    fn test_equals_is_subtraction() {
        assert_eq!(lookup_mnemonic("="), Some(OpCode::Subtract));
        assert_eq!(lookup_mnemonic("-"), Some(OpCode::Subtract));
        assert_eq!(lookup_mnemonic("+"), Some(OpCode::Add));
    }

    #[test]
    fn test_unknown_mnemonic() {
        assert_eq!(lookup_mnemonic("PUSH"), None);
        assert_eq!(lookup_mnemonic("*"), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(TokenKind::Label("start".into()).to_string(), ":start");
        assert_eq!(TokenKind::LabelRef("start".into()).to_string(), "@start");
        assert_eq!(TokenKind::Instruction(OpCode::Jz).to_string(), "JZ");
    }
}
