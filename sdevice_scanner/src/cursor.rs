//! The read head the host parser lends to the scanner.

use crate::token::{Token, TokenKind};
use sdevice_basics::source::{SourceChunk, SourceRangeRef, SourceReader, SourceRef};

/// The scanner's view of the host's position in the input.  The scanner can only look at the
/// current character and step forward; the host owns the position and decides where tokens
/// start and end.
pub trait LexerCursor {
    /// Returns the current lookahead character, or None at the end of input.
    fn lookahead(&self) -> Option<char>;

    /// Steps over the lookahead character.  With `skip` set, the character is insignificant:
    /// the token being recognized starts after it.  Does nothing at the end of input.
    fn advance(&mut self, skip: bool);
}

/// A [`LexerCursor`] over a [`SourceChunk`].  The token start is kept as the mark of the
/// underlying [`SourceReader`].
#[derive(Copy, Clone, Debug)]
pub struct SourceCursor<'sm> {
    reader: SourceReader<'sm>,
}

impl<'sm> SourceCursor<'sm> {
    /// Creates a cursor at the start of the chunk.
    pub fn new(chunk: &'sm SourceChunk) -> Self {
        SourceCursor::at(chunk.start())
    }

    /// Creates a cursor at the given position.
    pub fn at(pos: SourceRef<'sm>) -> Self {
        SourceCursor {
            reader: pos.reader(),
        }
    }

    /// The current position.
    pub fn position(&self) -> SourceRef<'sm> {
        self.reader.cursor()
    }

    /// The current token start.
    pub fn token_start(&self) -> SourceRef<'sm> {
        self.reader.mark()
    }

    /// Returns true iff the whole chunk has been read.
    pub fn at_end(&self) -> bool {
        self.reader.at_end()
    }

    /// Starts a new token at the current position.
    pub fn begin_token(&mut self) {
        self.reader.set_mark();
    }

    /// Returns the token spanning from the token start to the current position.
    pub fn token(&self, kind: TokenKind) -> Token<'sm> {
        Token {
            kind,
            src: self.reader.range(),
        }
    }

    /// Steps over characters as long as they satisfy the predicate, returning the text stepped
    /// over.  The next token starts after it.
    pub fn skip_while(&mut self, f: impl FnMut(char) -> bool) -> SourceRangeRef<'sm> {
        let start = self.reader.cursor();
        self.reader.eat_while(f);
        let res = self.reader.range_from(start);
        self.reader.set_mark();
        res
    }

    /// Moves the cursor to an arbitrary position of the same chunk.  Only the host may do this;
    /// scanners never rewind.
    pub fn reset_to(&mut self, pos: SourceRef<'sm>) {
        debug_assert_eq!(pos.chunk, self.reader.cursor().chunk);
        self.reader = pos.reader();
    }
}

impl LexerCursor for SourceCursor<'_> {
    fn lookahead(&self) -> Option<char> {
        self.reader.peek()
    }

    fn advance(&mut self, skip: bool) {
        if self.reader.eat().is_some() && skip {
            self.reader.set_mark();
        }
    }
}
