//! Provides a diagnostics sink [DiagPrinter] which pretty-prints the diagnostics to the standard
//! error output.

use super::{DiagSink, DiagSpanKind, Diagnostic};
use crate::source::SourceManager;

/// A [DiagSink] implementation that pretty-prints errors to the standard error output.
pub struct DiagPrinter<'sm> {
    manager: &'sm SourceManager,
}

impl<'sm> DiagPrinter<'sm> {
    /// Creates a new [DiagPrinter] given a [SourceManager].
    pub fn new(manager: &'sm SourceManager) -> Self {
        DiagPrinter { manager }
    }
}

impl<'sm> DiagSink for DiagPrinter<'sm> {
    fn emit(&self, diag: Diagnostic) {
        eprintln!("\x1b[31;1merror\x1b[0;1m: {}\x1b[0m", diag.msg);
        for span in diag.spans {
            let loc = self.manager.get_simple_line_info(span.range.start);
            eprintln!(
                "\x1b[30;1m{}:{}:{}\x1b[0;1m: {}\x1b[0m",
                loc.file_name, loc.line_num, loc.column_num, span.msg
            );
            let li = self.manager.get_line_info(span.range.start);
            let li_end = self.manager.get_line_info(span.range.end);
            let line = li.line.trim_end_matches(&['\r', '\n'][..]);
            eprintln!("{}", line);
            // Spans ending on a later line are underlined to the end of the first one.
            let end = if li.chunk == li_end.chunk && li.line_num == li_end.line_num {
                li_end.line_offset
            } else {
                line.len()
            };
            let len = end.saturating_sub(li.line_offset).max(1);
            let (color, mark) = match span.kind {
                DiagSpanKind::Primary => ("31", "^"),
                DiagSpanKind::Secondary => ("34", "~"),
            };
            eprintln!(
                "{}\x1b[{};1m{}\x1b[0m",
                " ".repeat(li.line_offset),
                color,
                mark.repeat(len)
            );
        }
        if let Some(help) = diag.help {
            eprintln!("\x1b[34;1mhelp\x1b[0;1m: {}\x1b[0m", help);
        }
        eprintln!();
    }
}
