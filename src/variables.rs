//! The ordered list of free variables, and the bit-ordering convention.
//!
//! Variables are sorted lexicographically. For an assignment index `i` over `n`
//! variables, variable `j` takes bit `n - 1 - j` of `i`: the first variable is the
//! most significant bit, so the bitstring of `i` is `format!("{i:0n$b}")` and its
//! `j`-th character is the value of variable `j`.
//!
//! On the circuit side qubit `q` holds bit `q` of the index, so qubit `q` carries
//! variable `n - 1 - q`.

use std::fmt;

use indexmap::IndexSet;

use crate::text::Name;

/// `i` as a `width`-character binary string, most significant bit first.
/// A width of zero gives the empty string.
pub fn bitstring(i: usize, width: usize) -> String {
    if width == 0 {
        return String::new();
    }
    format!("{i:0width$b}")
}

/// Ordered, deduplicated variable names. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VariableList(IndexSet<Name>);

impl VariableList {
    /// Build a list from names in any order, with duplicates. The result is sorted.
    pub fn from_names(names: impl IntoIterator<Item = Name>) -> Self {
        let mut set: IndexSet<Name> = names.into_iter().collect();
        set.sort();
        VariableList(set)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn position(&self, name: &Name) -> Option<usize> {
        self.0.get_index_of(name)
    }

    pub fn get(&self, j: usize) -> Option<&Name> {
        self.0.get_index(j)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Name> {
        self.0.iter()
    }

    /// Size of the search space, `2^n`.
    pub fn search_space(&self) -> usize {
        1 << self.len()
    }

    /// The assignment encoded by index `i`: `result[j]` is the value of variable `j`.
    pub fn assignment(&self, i: usize) -> Vec<bool> {
        let n = self.len();
        (0..n).map(|j| (i >> (n - 1 - j)) & 1 == 1).collect()
    }

    /// The bitstring of index `i`, most significant (first variable) first.
    pub fn bitstring(&self, i: usize) -> String {
        bitstring(i, self.len())
    }

    /// Decode a bitstring back into `(name, value)` pairs.
    /// Returns `None` if the string has the wrong length or a character other than `0`/`1`.
    pub fn decode<'a>(&'a self, bits: &str) -> Option<Vec<(&'a Name, bool)>> {
        if bits.len() != self.len() {
            return None;
        }
        self.iter()
            .zip(bits.chars())
            .map(|(name, c)| match c {
                '0' => Some((name, false)),
                '1' => Some((name, true)),
                _ => None,
            })
            .collect()
    }
}

impl fmt::Display for VariableList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (j, name) in self.iter().enumerate() {
            if j > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{name}")?;
        }
        write!(f, "]")
    }
}
