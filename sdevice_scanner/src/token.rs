use sdevice_basics::source::SourceRangeRef;
use sdevice_tokendata_derive::TokenData;
use std::fmt;

/// Type of a [Token] produced by the directive scanner.
///
/// The declaration order is significant: it is the index order of the valid symbols vector
/// that the host parser passes to every scan, and also the priority order in which directive
/// names are tried.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, TokenData)]
pub enum TokenKind {
    /// #define
    #[directive("define")]
    Define,
    /// #undef
    #[directive("undef")]
    Undef,
    /// #setdep
    #[directive("setdep")]
    Setdep,
    /// #if
    #[directive("if")]
    If,
    /// #elif
    #[directive("elif")]
    Elif,
    /// #else
    #[directive("else")]
    Else,
    /// #endif
    #[directive("endif")]
    Endif,
    /// Any other #-prefixed text, up to the end of the line.
    Comment,
}

impl TokenKind {
    /// The position of this kind in the valid symbols vector.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Returns true for the kinds that continue or close an open `#if` block.
    pub fn is_conditional_continuation(self) -> bool {
        matches!(self, TokenKind::Elif | TokenKind::Else | TokenKind::Endif)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.directive_name() {
            Some(name) => write!(f, "#{}", name),
            None => f.write_str("comment"),
        }
    }
}

/// Looks up a directive by its name (without the `#` sigil).
pub fn parse_directive(name: &str) -> Option<TokenKind> {
    TokenKind::DIRECTIVES.get(name).copied()
}

/// The set of token kinds the host parser is currently willing to accept.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct ValidSymbols {
    valid: [bool; TokenKind::COUNT],
}

impl ValidSymbols {
    /// The empty set.
    pub fn none() -> Self {
        ValidSymbols::default()
    }

    /// The set of all kinds.
    pub fn all() -> Self {
        ValidSymbols {
            valid: [true; TokenKind::COUNT],
        }
    }

    /// Builds a set containing exactly the given kinds.
    pub fn from_kinds(kinds: &[TokenKind]) -> Self {
        let mut res = ValidSymbols::none();
        for &kind in kinds {
            res.insert(kind);
        }
        res
    }

    /// Builds a set from a host-provided vector indexed by [`TokenKind::index`].  Missing
    /// trailing entries count as false, extra entries are ignored.
    pub fn from_slice(valid: &[bool]) -> Self {
        let mut res = ValidSymbols::none();
        for (slot, &v) in res.valid.iter_mut().zip(valid) {
            *slot = v;
        }
        res
    }

    pub fn contains(&self, kind: TokenKind) -> bool {
        self.valid[kind.index()]
    }

    pub fn insert(&mut self, kind: TokenKind) {
        self.valid[kind.index()] = true;
    }

    pub fn remove(&mut self, kind: TokenKind) {
        self.valid[kind.index()] = false;
    }

    /// Returns a copy of this set with the given kind added or removed.
    pub fn with(mut self, kind: TokenKind, valid: bool) -> Self {
        self.valid[kind.index()] = valid;
        self
    }

    pub fn is_empty(&self) -> bool {
        !self.valid.iter().any(|&v| v)
    }

    /// Iterates over the kinds in the set, in index order.
    pub fn iter(&self) -> impl Iterator<Item = TokenKind> + '_ {
        TokenKind::ALL
            .iter()
            .copied()
            .filter(move |&kind| self.contains(kind))
    }
}

impl fmt::Debug for ValidSymbols {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// A token, as returned by the scanner through a [`SourceCursor`](crate::cursor::SourceCursor).
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub struct Token<'sm> {
    pub kind: TokenKind,
    pub src: SourceRangeRef<'sm>,
}

/// Formats as a listing line: `file:line:col kind text`.
impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let li = self.src.start().get_line_info();
        write!(
            f,
            "{}:{}:{} {} {}",
            li.chunk.file_name,
            li.line_num,
            li.get_column_num(),
            self.kind,
            &*self.src
        )
    }
}

#[cfg(test)]
mod tests;
