//! # Source Code Frames
//!
//! Renders a small window of source around a byte offset, the way a compiler
//! diagnostic does, so `InputError` and `InternalError` can show the user
//! where things went wrong instead of just a message.

use serde::{Deserialize, Serialize};

use crate::parser::get_line_column;

/// How many lines of context to show above and below the offending line.
const CONTEXT_LINES: usize = 2;

/// A rendered source window pointing at one offset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CodeFrame {
    pub line: u32,
    pub column: u32,
    pub rendered: String,
}

/// Build a code frame for `offset` within `source`, labeling the failing
/// line with `^` under the offending column and a short `message`.
pub fn render_code_frame(source: &str, filename: &str, offset: u32, message: &str) -> CodeFrame {
    let (line, column) = get_line_column(source, offset);
    let lines: Vec<&str> = source.split('\n').collect();
    let target_idx = line.saturating_sub(1) as usize;

    let start = target_idx.saturating_sub(CONTEXT_LINES);
    let end = (target_idx + CONTEXT_LINES + 1).min(lines.len());

    let gutter_width = end.to_string().len();
    let mut rendered = format!("--> {filename}:{line}:{column}\n");

    for (i, src_line) in lines.iter().enumerate().take(end).skip(start) {
        let line_no = i + 1;
        rendered.push_str(&format!("{line_no:>gutter_width$} | {src_line}\n"));
        if line_no as u32 == line {
            let caret_offset = column.saturating_sub(1) as usize;
            rendered.push_str(&format!(
                "{:gutter_width$} | {}^ {}\n",
                "",
                " ".repeat(caret_offset),
                message
            ));
        }
    }

    CodeFrame { line, column, rendered }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_pointer_at_offset() {
        let source = "let a = 1;\nlet b = ;\n";
        let frame = render_code_frame(source, "test.js", 19, "unexpected ';'");
        assert_eq!(frame.line, 2);
        assert!(frame.rendered.contains("test.js:2"));
        assert!(frame.rendered.contains("unexpected ';'"));
    }

    #[test]
    fn includes_surrounding_context_lines() {
        let source = "a;\nb;\nc;\nd;\ne;\n";
        let frame = render_code_frame(source, "test.js", 6, "note");
        assert!(frame.rendered.contains("a;"));
        assert!(frame.rendered.contains("e;"));
    }
}
