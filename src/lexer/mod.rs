//! Lexer module for stackvm source text.

pub mod token;
pub mod tokenizer;

pub use token::{lookup_mnemonic, Token, TokenKind};
pub use tokenizer::Tokenizer;
