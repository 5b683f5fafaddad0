//! The machine word: the only value type the VM knows about.

/// A 16-bit signed machine word.
pub type Word = i16;

/// Smallest representable word.
pub const MIN_WORD: Word = -0x8000;
/// Largest representable word. Deliberately below `i16::MAX`.
pub const MAX_WORD: Word = 0x799F;

/// Number of distinct values in `[MIN_WORD, MAX_WORD]`.
const WORD_SPAN: i128 = MAX_WORD as i128 - MIN_WORD as i128 + 1;

/// Wrap an arbitrary integer into `[MIN_WORD, MAX_WORD]`.
///
/// Overflow past `MAX_WORD` continues at `MIN_WORD` and underflow past
/// `MIN_WORD` continues at `MAX_WORD`; the result never saturates.
pub fn wrap(value: i64) -> Word {
    let offset = (value as i128 - MIN_WORD as i128).rem_euclid(WORD_SPAN);
    (offset + MIN_WORD as i128) as Word
}

/// Whether a word already satisfies the range invariant.
#[cfg(test)]
pub(crate) fn in_range(word: Word) -> bool {
    (MIN_WORD..=MAX_WORD).contains(&word)
}
