//! Text emission primitives shared by every dialect.

use std::fmt::Write;

use crate::syntax::SEMICOLON;

const INDENT: &str = "    ";

/// Line-oriented source buffer with scope-based indentation.
#[derive(Debug, Default, Clone)]
pub struct SourceWriter {
    code: String,
    indent: usize,
}

impl SourceWriter {
    /// An empty buffer at indentation level 0.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// Consume the writer, returning the emitted source.
    pub fn into_string(self) -> String {
        self.code
    }

    /// Append raw text with no indentation or line handling.
    pub fn emit_string(&mut self, s: &str) {
        self.code.push_str(s);
    }

    /// Indent for the current scope depth. Pair with [`SourceWriter::line_end`].
    pub fn line_begin(&mut self) {
        for _ in 0..self.indent {
            self.code.push_str(INDENT);
        }
    }

    /// Finish the current line, optionally terminating the statement with `;`.
    pub fn line_end(&mut self, semicolon: bool) {
        if semicolon {
            self.code.push_str(SEMICOLON);
        }
        self.code.push('\n');
    }

    /// Bare newline. Sections end with one of these as their blank separator line.
    pub fn line_break(&mut self) {
        self.code.push('\n');
    }

    /// One complete indented line.
    pub fn emit_line(&mut self, s: &str, semicolon: bool) {
        self.line_begin();
        self.code.push_str(s);
        self.line_end(semicolon);
    }

    /// Single-line `// text` comment at the current indentation.
    pub fn comment(&mut self, text: &str) {
        self.line_begin();
        let _ = writeln!(self.code, "// {text}");
    }

    /// Emit `{` on its own line and indent what follows.
    pub fn scope_begin(&mut self) {
        self.emit_line("{", false);
        self.indent += 1;
    }

    /// Close the innermost scope. With `newline == false` the cursor stays after the brace so the
    /// caller can append a trailing name (`} vd;`).
    pub fn scope_end(&mut self, semicolon: bool, newline: bool) {
        self.indent = self.indent.saturating_sub(1);
        self.line_begin();
        self.code.push('}');
        if semicolon {
            self.code.push_str(SEMICOLON);
        }
        if newline {
            self.code.push('\n');
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scopes_indent_their_contents() {
        let mut w = SourceWriter::new();
        w.emit_line("struct S", false);
        w.scope_begin();
        w.emit_line("float x", true);
        w.comment("nested");
        w.scope_end(true, true);
        assert_eq!(w.as_str(), "struct S\n{\n    float x;\n    // nested\n};\n");
    }

    #[test]
    fn scope_end_without_newline_allows_trailing_text() {
        let mut w = SourceWriter::new();
        w.scope_begin();
        w.scope_end(false, false);
        w.emit_string(" vd;");
        w.line_break();
        assert_eq!(w.into_string(), "{\n} vd;\n");
    }
}
