//! The ordered, cyclic character set a flap slot can display.

use std::fmt;

/// Characters used when none are configured.
pub const DEFAULT_CHARACTERS: &str = "abcdefghijklmnopqrstuvwxyz0123456789!?";

/// The blank sentinel every slot can be reset to.
pub const BLANK: char = ' ';

/// An ordered cyclic alphabet wrapped in a leading and trailing blank.
///
/// `Alphabet::new("ab")` holds `[' ', 'a', 'b', ' ']`. After the last
/// character the next one is the first, so the trailing blank flips
/// straight onto the leading one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    chars: Vec<char>,
}

impl Alphabet {
    /// Build an alphabet from the configured characters.
    pub fn new(characters: &str) -> Self {
        let mut chars = Vec::with_capacity(characters.chars().count() + 2);
        chars.push(BLANK);
        chars.extend(characters.chars());
        chars.push(BLANK);
        Self { chars }
    }

    /// Number of positions in one full cycle (always at least 2).
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    /// Alphabets always contain the two blank sentinels.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The blank sentinel.
    pub fn blank(&self) -> char {
        BLANK
    }

    /// Character at a (possibly out of range) cyclic position.
    pub fn char_at(&self, index: usize) -> char {
        self.chars[index % self.chars.len()]
    }

    /// Index of the first occurrence of `c`, or 0 when `c` is not in the alphabet.
    pub fn index_of(&self, c: char) -> usize {
        self.chars.iter().position(|&x| x == c).unwrap_or(0)
    }

    /// Whether `c` can be displayed without falling back to blank.
    pub fn contains(&self, c: char) -> bool {
        self.chars.contains(&c)
    }

    /// Forward cyclic distance from `current` to `desired`.
    ///
    /// The result is in `[0, len - 1]` and `(current + shift) % len == desired`.
    pub fn forward_shift(&self, current: usize, desired: usize) -> usize {
        if desired >= current {
            desired - current
        } else {
            self.len() - current + desired
        }
    }

    /// The configured characters, without the blank sentinels.
    pub fn characters(&self) -> String {
        self.chars[1..self.chars.len() - 1].iter().collect()
    }

    /// Iterate over every position of the cycle.
    pub fn iter(&self) -> impl Iterator<Item = char> + '_ {
        self.chars.iter().copied()
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::new(DEFAULT_CHARACTERS)
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.chars {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
