use parking_lot::RwLock;
use std::sync::Arc;

use string_interner::StringInterner;
use string_interner::backend::DefaultBackend;
use string_interner::symbol::DefaultSymbol;

/// Interned string symbol backed by a `StringInterner`.
pub type InternedStr = DefaultSymbol;

macro_rules! literal_kind {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(InternedStr);

        impl $name {
            #[inline]
            pub fn symbol(self) -> InternedStr {
                self.0
            }

            /// Content comparison. Literals from one table are unique per
            /// spelling, so symbol equality decides it.
            #[inline]
            pub fn equal_to(self, other: Self) -> bool {
                self.0 == other.0
            }
        }
    };
}

literal_kind!(
    /// An interned identifier spelling (`foo`, `vector`, `operator`).
    Identifier
);
literal_kind!(
    /// An interned string literal, also used for file names and captured
    /// initializer text.
    StringLiteral
);
literal_kind!(
    /// An interned numeric literal spelling (`3`, `0x10u`, `1.5f`).
    NumericLiteral
);

#[derive(Debug, Default)]
struct LiteralTableInner {
    interner: RwLock<StringInterner<DefaultBackend>>,
}

impl LiteralTableInner {
    #[inline]
    fn intern(&self, value: &str) -> InternedStr {
        if let Some(sym) = self.interner.read().get(value) {
            return sym;
        }
        self.interner.write().get_or_intern(value)
    }

    fn with_resolved<R, F>(&self, symbol: InternedStr, f: F) -> Option<R>
    where
        F: FnOnce(&str) -> R,
    {
        self.interner.read().resolve(symbol).map(f)
    }
}

/// Shared literal table for identifiers, string literals and numeric literals.
///
/// Cloning is cheap and clones share the same storage, so several controls
/// (one per translation unit) can agree on identifier identity.
#[derive(Clone, Debug, Default)]
pub struct LiteralTable {
    inner: Arc<LiteralTableInner>,
}

impl LiteralTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn identifier(&self, spelling: impl AsRef<str>) -> Identifier {
        Identifier(self.inner.intern(spelling.as_ref()))
    }

    pub fn string_literal(&self, spelling: impl AsRef<str>) -> StringLiteral {
        StringLiteral(self.inner.intern(spelling.as_ref()))
    }

    pub fn numeric_literal(&self, spelling: impl AsRef<str>) -> NumericLiteral {
        NumericLiteral(self.inner.intern(spelling.as_ref()))
    }

    /// Resolve an interned symbol back into an owned string.
    pub fn resolve_owned(&self, symbol: InternedStr) -> Option<String> {
        self.inner.with_resolved(symbol, str::to_owned)
    }

    /// Resolve an interned symbol and apply a closure while the borrow is active.
    pub fn with_resolved<R, F>(&self, symbol: InternedStr, f: F) -> Option<R>
    where
        F: FnOnce(&str) -> R,
    {
        self.inner.with_resolved(symbol, f)
    }

    /// Spelling of an identifier, or the empty string for a foreign symbol.
    pub fn spelling(&self, id: Identifier) -> String {
        self.resolve_owned(id.symbol()).unwrap_or_default()
    }

    pub fn string(&self, lit: StringLiteral) -> String {
        self.resolve_owned(lit.symbol()).unwrap_or_default()
    }

    pub fn number(&self, lit: NumericLiteral) -> String {
        self.resolve_owned(lit.symbol()).unwrap_or_default()
    }

    /// Parse a numeric literal as an unsigned value, honouring the usual
    /// C++ radix prefixes, digit separators and integer suffixes.
    pub fn number_value(&self, lit: NumericLiteral) -> Option<u64> {
        self.with_resolved(lit.symbol(), parse_integer_literal)
            .flatten()
    }

    pub fn len(&self) -> usize {
        self.inner.interner.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn parse_integer_literal(text: &str) -> Option<u64> {
    let cleaned: String = text.chars().filter(|c| *c != '\'').collect();
    let trimmed = cleaned.trim_end_matches(['u', 'U', 'l', 'L', 'z', 'Z']);
    let lower = trimmed.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix("0x") {
        u64::from_str_radix(hex, 16).ok()
    } else if let Some(bin) = lower.strip_prefix("0b") {
        u64::from_str_radix(bin, 2).ok()
    } else if lower.len() > 1 && lower.starts_with('0') {
        u64::from_str_radix(&lower[1..], 8).ok()
    } else {
        lower.parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rayon::prelude::*;

    #[test]
    fn interning_returns_stable_identifier() {
        let table = LiteralTable::new();
        let first = table.identifier("foo");
        let second = table.identifier("foo");
        assert_eq!(first, second);
        assert!(first.equal_to(second));
        assert!(!first.equal_to(table.identifier("bar")));
    }

    #[test]
    fn spelling_recovers_string() {
        let table = LiteralTable::new();
        let id = table.identifier("vector");
        assert_eq!(table.spelling(id), "vector");
        let lit = table.string_literal("widget.cpp");
        assert_eq!(table.string(lit), "widget.cpp");
    }

    #[test]
    fn numeric_values() {
        let table = LiteralTable::new();
        let value = |s: &str| table.number_value(table.numeric_literal(s));
        assert_eq!(value("3"), Some(3));
        assert_eq!(value("0x10u"), Some(16));
        assert_eq!(value("0b101"), Some(5));
        assert_eq!(value("017"), Some(15));
        assert_eq!(value("1'000ULL"), Some(1000));
        assert_eq!(value("0"), Some(0));
        assert_eq!(value("N"), None);
    }

    #[test]
    fn clones_share_storage() {
        let table = LiteralTable::new();
        let other = table.clone();
        assert_eq!(table.identifier("shared"), other.identifier("shared"));
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn parallel_interning_with_duplicates() {
        let table = LiteralTable::new();
        let names = ["alpha", "beta", "gamma", "delta", "epsilon"];
        let ids: Vec<_> = (0..500)
            .into_par_iter()
            .map(|i| table.identifier(names[i % names.len()]))
            .collect();
        assert_eq!(table.len(), 5);
        assert_eq!(ids[0], ids[5]);
    }
}
