#![forbid(unsafe_code)]

//! Ordered token storage.
//!
//! The store speaks in *token indices* (`0..len`). Every removal computes the
//! affected indices against the current sequence first and only then mutates,
//! removing from the back so the returned indices stay valid for an
//! incremental delete against the pre-removal sequence.

use std::collections::BTreeSet;
use std::ops::Range;

/// Tokens in insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct TokenStore<T> {
    tokens: Vec<T>,
}

impl<T> Default for TokenStore<T> {
    fn default() -> Self {
        Self { tokens: Vec::new() }
    }
}

impl<T> TokenStore<T> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether the store holds no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Token at `index`.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.tokens.get(index)
    }

    /// All tokens in order.
    pub fn as_slice(&self) -> &[T] {
        &self.tokens
    }

    /// Iterate tokens in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.tokens.iter()
    }

    /// Append tokens in order and return the indices they occupy.
    pub fn append(&mut self, tokens: impl IntoIterator<Item = T>) -> Range<usize> {
        let start = self.tokens.len();
        self.tokens.extend(tokens);
        start..self.tokens.len()
    }

    /// Remove tokens at `indexes`, skipping out-of-range ones.
    ///
    /// Returns the removed indices in descending order, deduplicated.
    pub fn remove_at_indexes(&mut self, indexes: impl IntoIterator<Item = usize>) -> Vec<usize> {
        let len = self.tokens.len();
        let valid: BTreeSet<usize> = indexes.into_iter().filter(|&i| i < len).collect();
        let removed: Vec<usize> = valid.into_iter().rev().collect();
        for &index in &removed {
            self.tokens.remove(index);
        }
        removed
    }
}

impl<T: PartialEq> TokenStore<T> {
    /// Indices of the first not-yet-claimed occurrence of each requested token.
    ///
    /// Requesting the same value twice claims two occurrences. Tokens that
    /// are not present are skipped.
    pub fn positions_of(&self, tokens: &[T]) -> BTreeSet<usize> {
        let mut claimed = BTreeSet::new();
        for wanted in tokens {
            let found = self
                .tokens
                .iter()
                .enumerate()
                .find(|(index, token)| *token == wanted && !claimed.contains(index))
                .map(|(index, _)| index);
            if let Some(index) = found {
                claimed.insert(index);
            }
        }
        claimed
    }

    /// Remove tokens by value.
    ///
    /// Returns the removed indices in descending order.
    pub fn remove_matching(&mut self, tokens: &[T]) -> Vec<usize> {
        let positions = self.positions_of(tokens);
        self.remove_at_indexes(positions)
    }

    /// Whether a token equal to `token` is stored.
    pub fn contains(&self, token: &T) -> bool {
        self.tokens.contains(token)
    }
}

impl<'a, T> IntoIterator for &'a TokenStore<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.tokens.iter()
    }
}
