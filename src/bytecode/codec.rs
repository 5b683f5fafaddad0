//! Flat binary encoding of a word sequence.
//!
//! Each word is two little-endian bytes. There is no header, length field or
//! padding: the word count is the byte length divided by two. Decoded words
//! are wrapped into word range, so bytes from `serialize` come back unchanged.

use bytes::{Buf, BufMut, BytesMut};

use crate::bytecode::word::{wrap, Word};
use crate::error::DecodeError;

/// Size of one encoded word in bytes.
pub const WORD_BYTES: usize = 2;

/// Encode words into bytes.
pub fn serialize(code: &[Word]) -> Vec<u8> {
    let mut buf = BytesMut::with_capacity(code.len() * WORD_BYTES);
    for word in code {
        buf.put_i16_le(*word);
    }
    buf.to_vec()
}

/// Decode bytes produced by [`serialize`].
pub fn deserialize(mut bytes: &[u8]) -> Result<Vec<Word>, DecodeError> {
    if bytes.len() % WORD_BYTES != 0 {
        return Err(DecodeError::OddLength(bytes.len()));
    }
    let mut code = Vec::with_capacity(bytes.len() / WORD_BYTES);
    while bytes.has_remaining() {
        code.push(wrap(bytes.get_i16_le() as i64));
    }
    Ok(code)
}
