//! Single-pass character scanner for stackvm source.

use crate::error::LexerError;
use crate::lexer::token::{lookup_mnemonic, Token, TokenKind};

/// What the tokenizer is currently accumulating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    None,
    Number,
    Instruction,
    String,
    Label,
    LabelRef,
}

impl State {
    fn describe(self) -> &'static str {
        match self {
            State::None => "token start",
            State::Number => "number",
            State::Instruction => "instruction",
            State::String => "string",
            State::Label => "label",
            State::LabelRef => "label reference",
        }
    }
}

fn is_separator(c: char) -> bool {
    c.is_ascii_whitespace()
}

fn is_instruction_char(c: char) -> bool {
    c.is_ascii_alphabetic() || matches!(c, '+' | '-' | '*' | '/' | '=')
}

/// The tokenizer turns source text into a lazy stream of tokens.
///
/// Tokens are terminated by whitespace. A token still open at the end of
/// input is closed as if a separator followed it; an unterminated string is
/// emitted as-is. After the first error the stream is exhausted.
pub struct Tokenizer<'a> {
    chars: std::str::Chars<'a>,
    state: State,
    current: String,
    line: usize,
    start_line: usize,
    done: bool,
}

impl<'a> Tokenizer<'a> {
    pub fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars(),
            state: State::None,
            current: String::new(),
            line: 1,
            start_line: 1,
            done: false,
        }
    }

    /// Scan all tokens from the source.
    pub fn scan_tokens(self) -> Result<Vec<Token>, LexerError> {
        self.collect()
    }

    fn begin(&mut self, state: State, first: Option<char>) {
        self.state = state;
        self.start_line = self.line;
        self.current.clear();
        if let Some(c) = first {
            self.current.push(c);
        }
    }

    fn unexpected(&self, c: char) -> LexerError {
        LexerError::unexpected_char(c, self.state.describe(), self.line)
    }

    /// Feed one character, possibly completing a token.
    fn feed(&mut self, c: char) -> Result<Option<Token>, LexerError> {
        match self.state {
            State::None => {
                match c {
                    c if is_separator(c) => {}
                    c if c.is_ascii_digit() => self.begin(State::Number, Some(c)),
                    c if is_instruction_char(c) => self.begin(State::Instruction, Some(c)),
                    '"' => self.begin(State::String, None),
                    ':' => self.begin(State::Label, None),
                    '@' => self.begin(State::LabelRef, None),
                    _ => return Err(self.unexpected(c)),
                }
                Ok(None)
            }
            State::Number => {
                let hex = self.current.starts_with("0x");
                if self.current == "0" && c == 'x' {
                    self.current.push(c);
                    Ok(None)
                } else if (hex && c.is_ascii_hexdigit()) || (!hex && c.is_ascii_digit()) {
                    self.current.push(c);
                    Ok(None)
                } else if is_separator(c) {
                    self.finish().map(Some)
                } else {
                    Err(self.unexpected(c))
                }
            }
            State::Instruction => {
                if is_instruction_char(c) {
                    self.current.push(c);
                    Ok(None)
                } else if is_separator(c) {
                    self.finish().map(Some)
                } else {
                    Err(self.unexpected(c))
                }
            }
            State::String => {
                if c == '"' {
                    self.finish().map(Some)
                } else {
                    self.current.push(c);
                    Ok(None)
                }
            }
            State::Label | State::LabelRef => {
                if c.is_ascii_alphabetic() {
                    self.current.push(c);
                    Ok(None)
                } else if is_separator(c) {
                    self.finish().map(Some)
                } else {
                    Err(self.unexpected(c))
                }
            }
        }
    }

    /// Turn the accumulated text into a token and reset to `State::None`.
    fn finish(&mut self) -> Result<Token, LexerError> {
        let text = std::mem::take(&mut self.current);
        let state = std::mem::replace(&mut self.state, State::None);
        let kind = match state {
            State::Number => TokenKind::Number(Self::parse_number(&text, self.line)?),
            State::Instruction => match lookup_mnemonic(&text) {
                Some(op) => TokenKind::Instruction(op),
                None => return Err(LexerError::unknown_instruction(text, self.line)),
            },
            State::String => TokenKind::String(text),
            State::Label | State::LabelRef if text.is_empty() => {
                let sigil = if state == State::Label { ':' } else { '@' };
                return Err(LexerError::empty_name(sigil, self.line));
            }
            State::Label => TokenKind::Label(text),
            State::LabelRef => TokenKind::LabelRef(text),
            State::None => unreachable!("finish called with no pending token"),
        };
        Ok(Token::new(kind, self.start_line))
    }

    fn parse_number(text: &str, line: usize) -> Result<i64, LexerError> {
        let parsed = match text.strip_prefix("0x") {
            Some(digits) => i64::from_str_radix(digits, 16),
            None => text.parse::<i64>(),
        };
        parsed.map_err(|_| LexerError::invalid_number(text, line))
    }
}

impl<'a> Iterator for Tokenizer<'a> {
    type Item = Result<Token, LexerError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        while let Some(c) = self.chars.next() {
            let result = self.feed(c);
            // Lines are counted whatever the state, including inside strings.
            if c == '\n' {
                self.line += 1;
            }
            match result {
                Ok(Some(token)) => return Some(Ok(token)),
                Ok(None) => {}
                Err(err) => {
                    self.done = true;
                    return Some(Err(err));
                }
            }
        }

        self.done = true;
        if self.state == State::None {
            None
        } else {
            Some(self.finish())
        }
    }
}

impl<'a> std::iter::FusedIterator for Tokenizer<'a> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bytecode::instruction::OpCode;
    use pretty_assertions::assert_eq;

    fn scan(source: &str) -> Vec<TokenKind> {
        Tokenizer::new(source)
            .scan_tokens()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_numbers() {
        assert_eq!(
            scan("42 0x1F 0\n"),
            vec![
                TokenKind::Number(42),
                TokenKind::Number(0x1F),
                TokenKind::Number(0),
            ]
        );
    }

    #[test]
    fn test_instructions() {
        assert_eq!(
            scan("+ - = jz HALT\n"),
            vec![
                TokenKind::Instruction(OpCode::Add),
                TokenKind::Instruction(OpCode::Subtract),
                TokenKind::Instruction(OpCode::Subtract),
                TokenKind::Instruction(OpCode::Jz),
                TokenKind::Instruction(OpCode::Halt),
            ]
        );
    }

    #[test]
    fn test_string_keeps_spaces_and_no_escapes() {
        assert_eq!(
            scan("\"hi there\\n\"\n"),
            vec![TokenKind::String("hi there\\n".to_string())]
        );
    }

    #[test]
    fn test_labels() {
        assert_eq!(
            scan(":start @start\n"),
            vec![
                TokenKind::Label("start".to_string()),
                TokenKind::LabelRef("start".to_string()),
            ]
        );
    }

    #[test]
    fn test_pending_token_closed_at_end_of_input() {
        assert_eq!(
            scan("1 HALT"),
            vec![
                TokenKind::Number(1),
                TokenKind::Instruction(OpCode::Halt)
            ]
        );
    }

    #[test]
    fn test_unterminated_string_is_flushed() {
        assert_eq!(scan("\"abc"), vec![TokenKind::String("abc".to_string())]);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(scan(""), Vec::<TokenKind>::new());
        assert_eq!(scan(" \n\t\n"), Vec::<TokenKind>::new());
    }

    #[test]
    fn test_token_lines() {
        let tokens = Tokenizer::new("1\n\"a\nb\" 2\n3\n").scan_tokens().unwrap();
        let lines: Vec<usize> = tokens.iter().map(|t| t.line).collect();
        assert_eq!(lines, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_bad_character_in_number() {
        let err = Tokenizer::new("\n\n12a\n").scan_tokens().unwrap_err();
        assert_eq!(err, LexerError::unexpected_char('a', "number", 3));
    }

    #[test]
    fn test_hex_digits_only_after_prefix() {
        assert!(Tokenizer::new("1f\n").scan_tokens().is_err());
        assert!(Tokenizer::new("0xff\n").scan_tokens().is_ok());
    }

    #[test]
    fn test_bare_hex_prefix_is_invalid() {
        let err = Tokenizer::new("0x\n").scan_tokens().unwrap_err();
        assert_eq!(err, LexerError::invalid_number("0x", 1));
    }

    #[test]
    fn test_unknown_instruction() {
        let err = Tokenizer::new("1 2\nfoo\n").scan_tokens().unwrap_err();
        assert_eq!(err, LexerError::unknown_instruction("foo", 2));
    }

    #[test]
    fn test_digit_inside_instruction() {
        let err = Tokenizer::new("-5\n").scan_tokens().unwrap_err();
        assert_eq!(err, LexerError::unexpected_char('5', "instruction", 1));
    }

    #[test]
    fn test_label_names_are_letters_only() {
        let err = Tokenizer::new(":loop1\n").scan_tokens().unwrap_err();
        assert_eq!(err, LexerError::unexpected_char('1', "label", 1));
    }

    #[test]
    fn test_empty_label_name() {
        let err = Tokenizer::new("@ HALT\n").scan_tokens().unwrap_err();
        assert_eq!(err, LexerError::empty_name('@', 1));
    }

    #[test]
    fn test_stray_character() {
        let err = Tokenizer::new("1 ; 2\n").scan_tokens().unwrap_err();
        assert_eq!(err, LexerError::unexpected_char(';', "token start", 1));
    }

    #[test]
    fn test_stream_is_lazy_and_stops_after_error() {
        let mut tokens = Tokenizer::new("1 ! 2\n");
        assert_eq!(tokens.next().unwrap().unwrap().kind, TokenKind::Number(1));
        assert!(tokens.next().unwrap().is_err());
        assert!(tokens.next().is_none());
    }
}
