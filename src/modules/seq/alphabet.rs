//! Symbol classes
//!
//! A `SymbolClass` is a classification predicate over single sequence
//! symbols. Metrics such as GC content count the symbols of a window that
//! fall into a class; everything outside the class (ambiguity codes, gaps,
//! unexpected bytes) is simply non-matching.

use std::fmt;

/// Named symbol classes used by the shipped metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassKind {
    /// Guanine and cytosine
    GC,
    /// Adenine and thymine/uracil
    AT,
    /// A user-supplied set of symbols
    Custom,
}

/// Byte classification predicate backed by a 256-entry lookup table
#[derive(Clone, PartialEq, Eq)]
pub struct SymbolClass {
    table: [bool; 256],
    kind: ClassKind,
}

impl SymbolClass {
    /// Build a class from its member symbols.
    ///
    /// Members are matched case-insensitively: `b'G'` also admits `b'g'`.
    pub fn from_symbols(symbols: &[u8]) -> Self {
        Self::build(symbols, ClassKind::Custom)
    }

    /// Build a class that matches only the exact bytes given
    pub fn from_symbols_case_sensitive(symbols: &[u8]) -> Self {
        let mut table = [false; 256];
        for &symbol in symbols {
            table[symbol as usize] = true;
        }

        Self {
            table,
            kind: ClassKind::Custom,
        }
    }

    /// G/C symbols in either case
    pub fn gc() -> Self {
        Self::build(b"GC", ClassKind::GC)
    }

    /// A/T/U symbols in either case
    pub fn at() -> Self {
        Self::build(b"ATU", ClassKind::AT)
    }

    fn build(symbols: &[u8], kind: ClassKind) -> Self {
        let mut table = [false; 256];
        for &symbol in symbols {
            table[symbol.to_ascii_uppercase() as usize] = true;
            table[symbol.to_ascii_lowercase() as usize] = true;
        }

        Self { table, kind }
    }

    /// Check whether a symbol belongs to this class
    #[inline]
    pub fn contains(&self, symbol: u8) -> bool {
        self.table[symbol as usize]
    }

    /// Count the symbols of `sequence` that belong to this class
    pub fn count(&self, sequence: &[u8]) -> usize {
        sequence.iter().filter(|&&symbol| self.contains(symbol)).count()
    }

    /// The kind this class was built as
    pub fn kind(&self) -> ClassKind {
        self.kind
    }

    /// The member bytes, in ascending order
    pub fn members(&self) -> Vec<u8> {
        (0..=u8::MAX).filter(|&b| self.contains(b)).collect()
    }
}

impl Default for SymbolClass {
    fn default() -> Self {
        Self::gc()
    }
}

impl fmt::Debug for SymbolClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SymbolClass")
            .field("kind", &self.kind)
            .field("members", &String::from_utf8_lossy(&self.members()))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gc_class_is_case_insensitive() {
        let gc = SymbolClass::gc();
        for &symbol in b"GCgc" {
            assert!(gc.contains(symbol));
        }
        for &symbol in b"ATUNatun-*" {
            assert!(!gc.contains(symbol));
        }
        assert_eq!(gc.members(), b"CGcg".to_vec());
    }

    #[test]
    fn test_count() {
        let gc = SymbolClass::gc();
        assert_eq!(gc.count(b"ACGTNNacgt"), 4);
        assert_eq!(gc.count(b""), 0);

        let at = SymbolClass::at();
        assert_eq!(at.count(b"ACGUacgt"), 4);
    }

    #[test]
    fn test_custom_classes() {
        let purines = SymbolClass::from_symbols(b"AG");
        assert_eq!(purines.kind(), ClassKind::Custom);
        assert!(purines.contains(b'a'));
        assert!(purines.contains(b'G'));
        assert!(!purines.contains(b'C'));

        let upper_only = SymbolClass::from_symbols_case_sensitive(b"N");
        assert!(upper_only.contains(b'N'));
        assert!(!upper_only.contains(b'n'));
    }

    #[test]
    fn test_non_ascii_bytes_are_not_members() {
        let gc = SymbolClass::gc();
        assert_eq!(gc.count("GÇ".as_bytes()), 1);
    }
}
