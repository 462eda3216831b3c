//! Splitting of multi-valued fields.

use either::{Left, Right};
use serde::{Deserialize, Serialize};

/// Ordered list of delimiters tried when splitting a multi-valued field.
///
/// The first delimiter that occurs anywhere in a value splits the whole value;
/// later delimiters are not consulted for that value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DelimiterPriority(Vec<char>);

impl Default for DelimiterPriority {
    fn default() -> Self {
        Self(vec![';', ',', '|', '\n'])
    }
}

impl DelimiterPriority {
    pub fn new(delimiters: Vec<char>) -> Self {
        Self(delimiters)
    }

    pub fn delimiters(&self) -> &[char] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The highest-priority delimiter present in `value`.
    fn first_present(&self, value: &str) -> Option<char> {
        self.0.iter().copied().find(|d| value.contains(*d))
    }
}

impl From<Vec<char>> for DelimiterPriority {
    fn from(delimiters: Vec<char>) -> Self {
        Self(delimiters)
    }
}

/// Split `value` on its highest-priority delimiter.
///
/// Pieces are trimmed and empty pieces dropped. A value with no delimiter yields
/// itself, trimmed, as the only piece.
pub fn split_multi_valued<'a>(value: &'a str, priority: &DelimiterPriority) -> Vec<&'a str> {
    let pieces = match priority.first_present(value) {
        Some(delimiter) => Left(value.split(delimiter)),
        None => Right(std::iter::once(value)),
    };
    pieces.map(str::trim).filter(|piece| !piece.is_empty()).collect()
}
