//! The contextual directive scanner.
//!
//! A `#` followed by a name is either one of the seven directives or a comment running to the
//! end of the line, and only the parser knows which of these it can accept at a given point.
//! The scanner is thus asked with a [`ValidSymbols`] set and only ever answers with a member of
//! that set.

use crate::cursor::LexerCursor;
use crate::token::{TokenKind, ValidSymbols};
use tracing::trace;

/// The longest directive name collected after the `#`.  Longer names are cut here, which
/// cannot make them match, as no directive is anywhere near this long.
pub const MAX_DIRECTIVE_NAME_LEN: usize = 19;

/// The protocol between the host parser and a scanner of externally recognized tokens.
///
/// The host creates one scanner per parser, saves and restores its state around incremental
/// and speculative parses, and calls [`ExternalScanner::scan`] wherever the grammar allows one
/// of the external tokens.
pub trait ExternalScanner: Sized {
    /// Creates a scanner in its initial state.
    fn create() -> Self;

    /// Releases the scanner.
    fn destroy(self) {}

    /// Returns the saved form of the scanner state.
    fn serialize(&self) -> Vec<u8>;

    /// Restores a state saved by [`ExternalScanner::serialize`].
    fn deserialize(&mut self, buffer: &[u8]);

    /// Tries to recognize a token at the cursor, returning its kind.  The kind is always
    /// a member of `valid`.  On None, the host must not assume the cursor is where it was.
    fn scan<C: LexerCursor + ?Sized>(
        &mut self,
        cursor: &mut C,
        valid: &ValidSymbols,
    ) -> Option<TokenKind>;
}

/// Scanner for the `#` directives and comments of sdevice command files.  Carries no state
/// between calls.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct DirectiveScanner;

/// The C-locale `isspace` class.
pub(crate) fn is_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\x0b' | '\x0c' | '\r')
}

fn skip_whitespace<C: LexerCursor + ?Sized>(cursor: &mut C) {
    while cursor.lookahead().map_or(false, is_space) {
        cursor.advance(true);
    }
}

/// Steps over the rest of the line, leaving the line terminator (if any) as lookahead.
fn skip_to_line_end<C: LexerCursor + ?Sized>(cursor: &mut C) {
    while let Some(c) = cursor.lookahead() {
        if matches!(c, '\n' | '\r') {
            break;
        }
        cursor.advance(false);
    }
}

/// Picks the directive named `name` if the parser accepts it.  Names are tried in
/// declaration order of [`TokenKind`].
pub fn match_directive(name: &[u8], valid: &ValidSymbols) -> Option<TokenKind> {
    TokenKind::ALL.iter().copied().find(|&kind| {
        valid.contains(kind) && kind.directive_name().map(str::as_bytes) == Some(name)
    })
}

impl ExternalScanner for DirectiveScanner {
    fn create() -> Self {
        DirectiveScanner
    }

    fn serialize(&self) -> Vec<u8> {
        Vec::new()
    }

    fn deserialize(&mut self, _buffer: &[u8]) {}

    fn scan<C: LexerCursor + ?Sized>(
        &mut self,
        cursor: &mut C,
        valid: &ValidSymbols,
    ) -> Option<TokenKind> {
        skip_whitespace(cursor);
        if cursor.lookahead() != Some('#') {
            return None;
        }
        // From here on the `#` is part of whatever we return, and stays consumed even if we
        // return nothing.
        cursor.advance(false);

        let mut name = [0u8; MAX_DIRECTIVE_NAME_LEN];
        let mut len = 0;
        while len < MAX_DIRECTIVE_NAME_LEN {
            match cursor.lookahead() {
                Some(c) if c.is_ascii_alphanumeric() => {
                    name[len] = c as u8;
                    len += 1;
                    cursor.advance(false);
                }
                _ => break,
            }
        }
        let name = &name[..len];

        if let Some(kind) = match_directive(name, valid) {
            trace!(?kind, "directive");
            return Some(kind);
        }
        if valid.contains(TokenKind::Comment) {
            skip_to_line_end(cursor);
            trace!(name = %String::from_utf8_lossy(name), "comment");
            return Some(TokenKind::Comment);
        }
        trace!(name = %String::from_utf8_lossy(name), ?valid, "no acceptable token after `#`");
        None
    }
}
