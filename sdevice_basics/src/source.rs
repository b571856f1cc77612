//! Data structures that keep sdevice command files in memory and handle
//! source location data.
//!
//! - There is one SourceManager per run that owns the text of every file
//!   involved.
//! - Every file is loaded wholesale into a SourceChunk, a single str.
//! - All SourceChunks are conceptually concatenated into one linear array of
//!   bytes, so any source location can be stored as a single u32 byte index
//!   into this virtual array (a SourceLoc).  The array is never materialized:
//!   only the virtual start position of every chunk is stored, and lookups
//!   use binary search.
//! - SourceRef is the unpacked form of a SourceLoc and gives direct access to
//!   the chunk text.  SourceRange / SourceRangeRef are the range versions;
//!   a SourceRangeRef derefs to its str.
//! - SourceReader walks a chunk one character at a time.  Scanners and the
//!   outline driver are built on top of it.
//! - To print a diagnostic, decode a location with get_line_info (or
//!   get_simple_line_info for a plain file+line+column triple).

use elsa::FrozenVec;
use once_cell::unsync::OnceCell;
use std::convert::TryInto;
use std::fmt;
use std::fmt::Debug;
use std::hash::{Hash, Hasher};
use std::num::NonZeroU32;
use std::ops::Deref;

/// A source file loaded into a SourceManager.
pub struct SourceChunk {
    /// The file name, as given by the driver.
    pub file_name: Box<str>,
    /// The file contents.
    pub text: Box<str>,
    /// The linearized position of the first byte of this chunk.
    start_vpos: NonZeroU32,
    /// Vector of all text indices that start a new line, lazily computed.
    raw_line_table: OnceCell<Box<[usize]>>,
}

/// A catalogue of all source files involved in a run.  New files can be
/// inserted given only a shared reference.
pub struct SourceManager {
    /// All chunks, in increasing start_vpos order.
    chunks: FrozenVec<Box<SourceChunk>>,
}

/// A compressed representation of a location in the source code, to be used
/// in diagnostics and other long-lived places.  Only has meaning in relation
/// to a given SourceManager.  Option<SourceLoc> is as cheap as SourceLoc.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceLoc {
    vpos: NonZeroU32,
}

/// A half-open range of two SourceLoc that must belong to the same chunk.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceRange {
    pub start: SourceLoc,
    pub end: SourceLoc,
}

/// An uncompressed location: a chunk and a byte index into its text.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceRef<'a> {
    pub chunk: &'a SourceChunk,
    pub pos: usize,
}

/// An uncompressed range of locations within one chunk.  Can be dereferenced
/// to obtain the underlying str.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceRangeRef<'a> {
    pub chunk: &'a SourceChunk,
    pub pos_start: usize,
    pub pos_end: usize,
}

/// Plain file+line+column triple, both numbers 1-based.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SourceSimpleLineInfo<'a> {
    pub file_name: &'a str,
    pub line_num: usize,
    pub column_num: usize,
}

/// Result of looking up a line number.
#[derive(Copy, Clone, Debug)]
pub struct SourceLineInfo<'a> {
    pub chunk: &'a SourceChunk,
    /// Line number, 1-based.
    pub line_num: usize,
    /// The line text, including its terminator.
    pub line: &'a str,
    /// Offset, in bytes, within the line text.
    pub line_offset: usize,
}

/// A forward reader over the text of a chunk.  Keeps a mark, which is the
/// start of the range returned by [`SourceReader::range`].
#[derive(Copy, Clone, Debug)]
pub struct SourceReader<'a> {
    chunk: &'a SourceChunk,
    pos: usize,
    mark: usize,
}

impl SourceChunk {
    /// Returns the raw line table, materializing it first if necessary.
    fn get_raw_line_table(&self) -> &[usize] {
        self.raw_line_table.get_or_init(|| {
            let mut res = vec![0];
            let mut pos = 0;
            while let Some(n) = self.text[pos..].find(&['\r', '\n'][..]) {
                pos += n;
                if self.text[pos..].starts_with("\r\n") {
                    pos += 2;
                } else {
                    pos += 1;
                }
                res.push(pos);
            }
            res.into_boxed_slice()
        })
    }

    /// Decodes the raw position into line number and related information.
    pub fn get_line_info(&self, pos: usize) -> SourceLineInfo<'_> {
        assert!(pos <= self.text.len());
        let raw_line_table = self.get_raw_line_table();
        let line_num = raw_line_table.partition_point(|x| *x <= pos);
        let line_idx = line_num - 1;
        let line_start = raw_line_table[line_idx];
        let line_end = raw_line_table
            .get(line_idx + 1)
            .copied()
            .unwrap_or_else(|| self.text.len());
        SourceLineInfo {
            chunk: self,
            line_num,
            line: &self.text[line_start..line_end],
            line_offset: pos - line_start,
        }
    }

    /// Returns a reference to the first byte of this chunk.
    pub fn start(&self) -> SourceRef<'_> {
        SourceRef { chunk: self, pos: 0 }
    }

    /// Returns a range covering the whole chunk.
    pub fn range(&self) -> SourceRangeRef<'_> {
        SourceRangeRef {
            chunk: self,
            pos_start: 0,
            pos_end: self.text.len(),
        }
    }
}

impl PartialEq for SourceChunk {
    fn eq(&self, other: &Self) -> bool {
        // Chunks are owned by their manager and never move.
        std::ptr::eq(self, other)
    }
}

impl Eq for SourceChunk {}

impl Hash for SourceChunk {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.start_vpos.hash(state);
    }
}

impl Debug for SourceChunk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        f.debug_struct("SourceChunk")
            .field("start_vpos", &self.start_vpos)
            .field("file_name", &self.file_name)
            .finish()
    }
}

impl SourceManager {
    /// Creates a new SourceManager.
    pub fn new() -> Self {
        SourceManager {
            chunks: FrozenVec::new(),
        }
    }

    /// Adds a new file and returns its chunk.
    pub fn add_file(
        &self,
        file_name: impl Into<Box<str>>,
        text: impl Into<Box<str>>,
    ) -> &SourceChunk {
        let text = text.into();
        let start_vpos = if self.chunks.len() == 0 {
            NonZeroU32::new(1).unwrap()
        } else {
            let last = &self.chunks[self.chunks.len() - 1];
            // Cannot overflow, the range was checked when the last chunk was
            // created.
            let last_end = last.start_vpos.get() + (last.text.len() as u32);
            // Add 1 so that the end of the previous chunk and the start of
            // this one are different locations.
            let ovf_msg = "SourceLoc overflow: too much source text";
            let raw_start = last_end.checked_add(1).expect(ovf_msg);
            let size32: u32 = text.len().try_into().expect(ovf_msg);
            raw_start.checked_add(size32).expect(ovf_msg);
            NonZeroU32::new(raw_start).unwrap()
        };
        self.chunks.push_get(Box::new(SourceChunk {
            file_name: file_name.into(),
            text,
            start_vpos,
            raw_line_table: OnceCell::new(),
        }))
    }

    /// Expands a SourceLoc into a SourceRef.
    pub fn expand_loc(&self, loc: SourceLoc) -> SourceRef<'_> {
        // A valid loc implies at least one chunk.
        assert!(self.chunks.len() != 0);
        let mut size = self.chunks.len() - 1;
        let mut left = 0;
        let mut right = size;
        while left < right {
            let mid = left + size / 2 + 1;
            if loc.vpos < self.chunks[mid].start_vpos {
                right = mid - 1;
            } else {
                left = mid;
            }
            size = right - left;
        }
        let chunk = &self.chunks[left];
        assert!(loc.vpos >= chunk.start_vpos);
        let pos = (loc.vpos.get() - chunk.start_vpos.get()) as usize;
        assert!(pos <= chunk.text.len());
        SourceRef { chunk, pos }
    }

    /// Expands a SourceRange into a SourceRangeRef.
    pub fn expand_range(&self, range: SourceRange) -> SourceRangeRef<'_> {
        let start = self.expand_loc(range.start);
        assert!(range.end.vpos >= start.chunk.start_vpos);
        let pos_end = (range.end.vpos.get() - start.chunk.start_vpos.get()) as usize;
        assert!(pos_end <= start.chunk.text.len());
        SourceRangeRef {
            chunk: start.chunk,
            pos_start: start.pos,
            pos_end,
        }
    }

    /// Decodes a SourceLoc directly to SourceLineInfo.
    pub fn get_line_info(&self, loc: SourceLoc) -> SourceLineInfo<'_> {
        self.expand_loc(loc).get_line_info()
    }

    /// Decodes a SourceLoc into SourceSimpleLineInfo.
    pub fn get_simple_line_info(&self, loc: SourceLoc) -> SourceSimpleLineInfo<'_> {
        let li = self.get_line_info(loc);
        SourceSimpleLineInfo {
            file_name: &li.chunk.file_name,
            line_num: li.line_num,
            column_num: li.get_column_num(),
        }
    }
}

impl PartialEq for SourceManager {
    fn eq(&self, other: &Self) -> bool {
        // SourceManagers can only be equal to themselves.
        std::ptr::eq(self, other)
    }
}

impl Eq for SourceManager {}

impl Default for SourceManager {
    fn default() -> Self {
        SourceManager::new()
    }
}

impl From<SourceRef<'_>> for SourceLoc {
    fn from(src: SourceRef) -> Self {
        SourceLoc {
            vpos: NonZeroU32::new(src.chunk.start_vpos.get() + (src.pos as u32)).unwrap(),
        }
    }
}

impl From<SourceRangeRef<'_>> for SourceRange {
    fn from(src: SourceRangeRef) -> Self {
        SourceRange {
            start: src.start().into(),
            end: src.end().into(),
        }
    }
}

impl<'a> SourceRef<'a> {
    /// Returns the suffix of the chunk text starting from this position.
    pub fn suffix(&self) -> &'a str {
        &self.chunk.text[self.pos..]
    }

    /// Returns a range of given length starting from this position.
    pub fn range_len(&self, len: usize) -> SourceRangeRef<'a> {
        SourceRangeRef {
            chunk: self.chunk,
            pos_start: self.pos,
            pos_end: self.pos + len,
        }
    }

    /// Returns a reader starting (and marked) at this position.
    pub fn reader(self) -> SourceReader<'a> {
        SourceReader {
            chunk: self.chunk,
            pos: self.pos,
            mark: self.pos,
        }
    }

    /// Decodes the raw position into line number and related information.
    pub fn get_line_info(&self) -> SourceLineInfo<'a> {
        self.chunk.get_line_info(self.pos)
    }

    /// Compresses into a SourceLoc.
    pub fn compress(self) -> SourceLoc {
        self.into()
    }
}

impl<'a> SourceRangeRef<'a> {
    /// Returns a SourceRef corresponding to the start of this range.
    pub fn start(&self) -> SourceRef<'a> {
        SourceRef {
            chunk: self.chunk,
            pos: self.pos_start,
        }
    }

    /// Returns a SourceRef corresponding to the end of this range.
    pub fn end(&self) -> SourceRef<'a> {
        SourceRef {
            chunk: self.chunk,
            pos: self.pos_end,
        }
    }

    /// Compresses into a SourceRange.
    pub fn compress(self) -> SourceRange {
        self.into()
    }
}

impl Deref for SourceRangeRef<'_> {
    type Target = str;

    fn deref(&self) -> &str {
        &self.chunk.text[self.pos_start..self.pos_end]
    }
}

impl SourceLineInfo<'_> {
    /// Returns the 1-based column number, counted in bytes.
    pub fn get_column_num(&self) -> usize {
        self.line_offset + 1
    }
}

impl<'a> SourceReader<'a> {
    /// Returns the current position.
    pub fn cursor(&self) -> SourceRef<'a> {
        SourceRef {
            chunk: self.chunk,
            pos: self.pos,
        }
    }

    /// Returns the remaining text.
    pub fn suffix(&self) -> &'a str {
        &self.chunk.text[self.pos..]
    }

    /// Returns true iff there is nothing left to read.
    pub fn at_end(&self) -> bool {
        self.pos == self.chunk.text.len()
    }

    /// Returns the next character without stepping over it.
    pub fn peek(&self) -> Option<char> {
        self.suffix().chars().next()
    }

    /// Steps over the next character and returns it.
    pub fn eat(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// Steps over characters as long as they satisfy the predicate, returns
    /// the text stepped over.
    pub fn eat_while(&mut self, mut f: impl FnMut(char) -> bool) -> &'a str {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if !f(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
        &self.chunk.text[start..self.pos]
    }

    /// Moves the mark to the current position.
    pub fn set_mark(&mut self) {
        self.mark = self.pos;
    }

    /// Returns the marked position.
    pub fn mark(&self) -> SourceRef<'a> {
        SourceRef {
            chunk: self.chunk,
            pos: self.mark,
        }
    }

    /// Returns the range from the mark to the current position.
    pub fn range(&self) -> SourceRangeRef<'a> {
        SourceRangeRef {
            chunk: self.chunk,
            pos_start: self.mark,
            pos_end: self.pos,
        }
    }

    /// Returns the range from the given position (which must be in the same
    /// chunk, not after the current position) to the current position.
    pub fn range_from(&self, start: SourceRef<'a>) -> SourceRangeRef<'a> {
        debug_assert_eq!(start.chunk, self.chunk);
        debug_assert!(start.pos <= self.pos);
        SourceRangeRef {
            chunk: self.chunk,
            pos_start: start.pos,
            pos_end: self.pos,
        }
    }
}

#[cfg(test)]
mod tests;
