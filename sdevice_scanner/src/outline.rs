//! A minimal host for the directive scanner: walks a whole command file, plays the parser's
//! part of advertising which directives are acceptable, and yields the directive and comment
//! tokens.
//!
//! The only grammar knowledge kept here is the nesting of `#if` blocks.  Everything between
//! scan points is ordinary text that the real parser would handle: the outline steps over it
//! up to the next `#` or line end, treating `"`-quoted strings as opaque.

use crate::cursor::{LexerCursor, SourceCursor};
use crate::diags;
use crate::scanner::{is_space, DirectiveScanner, ExternalScanner, MAX_DIRECTIVE_NAME_LEN};
use crate::token::{parse_directive, Token, TokenKind, ValidSymbols};
use sdevice_basics::diag::DiagSystem;
use sdevice_basics::source::{SourceChunk, SourceRange, SourceRangeRef, SourceRef};
use tracing::debug;

/// Selects whether `#` remarks are accepted between directives.
#[derive(Copy, Clone, Eq, PartialEq, Debug)]
pub enum CommentMode {
    /// Any `#` that does not start an acceptable directive is a comment.
    Allowed,
    /// Only directives are accepted; any other `#` is an error.
    Forbidden,
}

/// An `#if` block that has been entered, but hasn't yet been closed.
struct IfBlock {
    /// Location of the `#if` directive.
    loc_if: SourceRange,
    /// Location of the `#else`, if already seen.
    loc_else: Option<SourceRange>,
}

/// Everything needed to restart scanning from an earlier position.
#[derive(Clone, Debug)]
pub struct Checkpoint<'sm> {
    pos: SourceRef<'sm>,
    scanner_state: Vec<u8>,
}

/// A running outline over one source chunk.  Iterate it to get the tokens; diagnostics for
/// misplaced or unclosed directives go to the [`DiagSystem`].
pub struct Outline<'sm, 'a> {
    diags: &'a DiagSystem<'a>,
    mode: CommentMode,
    scanner: DirectiveScanner,
    cursor: SourceCursor<'sm>,
    /// The stack of open `#if` blocks.
    if_stack: Vec<IfBlock>,
    /// Set once the end of the chunk has been reached and open blocks reported.
    finished: bool,
}

/// Returns the directive name of a `#`-prefixed text, as far as the scanner reads it.
fn directive_name(text: &str) -> &str {
    let name = &text[1..];
    let len = name
        .bytes()
        .take(MAX_DIRECTIVE_NAME_LEN)
        .take_while(u8::is_ascii_alphanumeric)
        .count();
    &name[..len]
}

impl<'sm, 'a> Outline<'sm, 'a> {
    /// Creates an outline positioned at the start of the chunk.
    pub fn new(chunk: &'sm SourceChunk, diags: &'a DiagSystem<'a>, mode: CommentMode) -> Self {
        Outline {
            diags,
            mode,
            scanner: DirectiveScanner::create(),
            cursor: SourceCursor::new(chunk),
            if_stack: Vec::new(),
            finished: false,
        }
    }

    /// Returns the token kinds the grammar accepts at the current position.
    pub fn valid_symbols(&self) -> ValidSymbols {
        let mut valid = ValidSymbols::from_kinds(&[
            TokenKind::Define,
            TokenKind::Undef,
            TokenKind::Setdep,
            TokenKind::If,
        ]);
        if let Some(block) = self.if_stack.last() {
            valid.insert(TokenKind::Endif);
            if block.loc_else.is_none() {
                valid.insert(TokenKind::Elif);
                valid.insert(TokenKind::Else);
            }
        }
        valid.with(TokenKind::Comment, self.mode == CommentMode::Allowed)
    }

    /// Returns the number of currently open `#if` blocks.
    pub fn depth(&self) -> usize {
        self.if_stack.len()
    }

    /// Saves the current position together with the scanner state.
    pub fn checkpoint(&self) -> Checkpoint<'sm> {
        Checkpoint {
            pos: self.cursor.position(),
            scanner_state: self.scanner.serialize(),
        }
    }

    /// Goes back to a checkpoint.  The `#if` stack is not part of it.
    pub fn rewind(&mut self, checkpoint: &Checkpoint<'sm>) {
        self.cursor.reset_to(checkpoint.pos);
        self.scanner.deserialize(&checkpoint.scanner_state);
    }

    /// Emits the diagnostic for a conditional directive the grammar doesn't accept here.
    fn misplaced_directive(&self, kind: TokenKind, src: SourceRangeRef<'sm>) {
        let block = match self.if_stack.last() {
            None => {
                let typ = match kind {
                    TokenKind::Elif => diags::err_unmatched_elif,
                    TokenKind::Else => diags::err_unmatched_else,
                    _ => diags::err_unmatched_endif,
                };
                self.diags
                    .begin(typ, format!("found `{}` without a matching `#if`", kind))
                    .primary(src, format!("unmatched `{}`", kind))
                    .emit();
                return;
            }
            Some(block) => block,
        };
        let mut builder = self
            .diags
            .begin(
                diags::err_double_else,
                format!("found `{}` for an `#if` that already had an `#else`", kind),
            )
            .primary(src, format!("unexpected `{}`", kind));
        if let Some(loc_else) = block.loc_else {
            builder = builder.secondary(loc_else, "earlier `#else`");
        }
        builder.secondary(block.loc_if, "attached to this `#if`").emit();
    }

    /// Updates the `#if` stack for a recognized token.
    fn handle_token(&mut self, token: Token<'sm>, valid: &ValidSymbols) {
        debug!(kind = ?token.kind, text = &*token.src, "token");
        match token.kind {
            TokenKind::If => self.if_stack.push(IfBlock {
                loc_if: token.src.compress(),
                loc_else: None,
            }),
            TokenKind::Else => {
                if let Some(block) = self.if_stack.last_mut() {
                    block.loc_else = Some(token.src.compress());
                }
            }
            TokenKind::Endif => {
                self.if_stack.pop();
            }
            TokenKind::Comment => {
                // A conditional directive that was not acceptable here comes back as
                // a comment.
                if let Some(kind) = parse_directive(directive_name(&token.src)) {
                    if kind.is_conditional_continuation() && !valid.contains(kind) {
                        self.misplaced_directive(kind, token.src);
                    }
                }
            }
            TokenKind::Define | TokenKind::Undef | TokenKind::Setdep | TokenKind::Elif => (),
        }
    }

    /// Deals with a `#` that the scanner consumed without producing a token: reports it,
    /// goes back to the checkpoint taken before the scan, and steps over the line as text.
    fn reject_directive(&mut self, checkpoint: &Checkpoint<'sm>, valid: &ValidSymbols) {
        let src = self.cursor.token(TokenKind::Comment).src;
        match parse_directive(directive_name(&src)) {
            Some(kind) if !valid.contains(kind) && kind.is_conditional_continuation() => {
                self.misplaced_directive(kind, src);
            }
            _ => {
                self.diags
                    .begin(
                        diags::err_unknown_directive,
                        format!("`{}` is not a directive allowed here", &*src),
                    )
                    .primary(src, "expected a directive")
                    .help("`#` comments are not accepted in this mode")
                    .emit();
            }
        }
        debug!(text = &*src, "rewinding after rejected `#`");
        self.rewind(checkpoint);
        self.cursor.skip_while(is_space);
        self.cursor.skip_while(|c| !matches!(c, '\n' | '\r'));
    }

    /// Steps over ordinary text up to the next `#` outside of a string, or the line end.
    fn skip_text(&mut self) {
        loop {
            self.cursor.skip_while(|c| !matches!(c, '#' | '"' | '\n' | '\r'));
            if self.cursor.lookahead() != Some('"') {
                return;
            }
            // Strings don't span lines; an unclosed one ends at the line end.
            self.cursor.advance(true);
            self.cursor.skip_while(|c| !matches!(c, '"' | '\n' | '\r'));
            if self.cursor.lookahead() == Some('"') {
                self.cursor.advance(true);
            }
        }
    }

    /// Reports all `#if` blocks left open at the end of the chunk.
    fn finalize(&mut self) {
        self.finished = true;
        while let Some(block) = self.if_stack.pop() {
            self.diags
                .begin(diags::err_unclosed_if, "an `#if` without a matching `#endif`")
                .primary(block.loc_if, "unclosed `#if`")
                .emit();
        }
    }

    /// Returns the next directive or comment token, or None at the end of the chunk.
    pub fn next_token(&mut self) -> Option<Token<'sm>> {
        if self.finished {
            return None;
        }
        loop {
            let checkpoint = self.checkpoint();
            let valid = self.valid_symbols();
            self.cursor.begin_token();
            match self.scanner.scan(&mut self.cursor, &valid) {
                Some(kind) => {
                    let token = self.cursor.token(kind);
                    self.handle_token(token, &valid);
                    return Some(token);
                }
                None if self.cursor.position() != self.cursor.token_start() => {
                    self.reject_directive(&checkpoint, &valid);
                }
                None if self.cursor.at_end() => {
                    self.finalize();
                    return None;
                }
                None => self.skip_text(),
            }
        }
    }
}

impl<'sm, 'a> Iterator for Outline<'sm, 'a> {
    type Item = Token<'sm>;

    fn next(&mut self) -> Option<Token<'sm>> {
        self.next_token()
    }
}
