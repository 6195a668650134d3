//! Indentation-scoped source text emission.

const INDENT: &str = "    ";

/// Accumulates generated source one line at a time.
///
/// Text passed to [`write`](Self::write) is split on newlines and every
/// non-empty line is prefixed with the current indentation.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    depth: usize,
}

impl CodeWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write(&mut self, text: impl AsRef<str>) -> &mut Self {
        for line in text.as_ref().split('\n') {
            if !line.is_empty() {
                for _ in 0..self.depth {
                    self.buf.push_str(INDENT);
                }
                self.buf.push_str(line);
            }
            self.buf.push('\n');
        }
        self
    }

    /// Append verbatim, without indentation.
    pub fn write_raw(&mut self, text: &str) -> &mut Self {
        self.buf.push_str(text);
        self
    }

    pub fn blank_line(&mut self) -> &mut Self {
        self.buf.push('\n');
        self
    }

    /// `///` lines; blank source lines become bare `///`.
    pub fn write_docs(&mut self, docs: &str) -> &mut Self {
        for line in docs.trim_end().lines() {
            let line = line.trim_end();
            if line.is_empty() {
                self.write("///");
            } else {
                self.write(format!("/// {line}"));
            }
        }
        self
    }

    pub fn write_comment(&mut self, text: &str) -> &mut Self {
        for line in text.lines() {
            self.write(format!("// {line}"));
        }
        self
    }

    pub fn indent(&mut self) -> &mut Self {
        self.depth += 1;
        self
    }

    pub fn dedent(&mut self) -> &mut Self {
        self.depth = self.depth.saturating_sub(1);
        self
    }

    /// Write `header` and indent what follows.
    pub fn open_block(&mut self, header: impl AsRef<str>) -> &mut Self {
        self.write(header);
        self.indent()
    }

    /// Dedent and write `footer`.
    pub fn close_block(&mut self, footer: impl AsRef<str>) -> &mut Self {
        self.dedent();
        self.write(footer)
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    #[must_use]
    pub fn into_string(self) -> String {
        self.buf
    }
}

/// Quote text as a Rust string literal.
///
/// Plain text gets a normal literal, text with quotes or backslashes a raw
/// literal with enough `#`s, and anything with control characters an escaped
/// literal so it stays on one line.
#[must_use]
pub fn rust_string(text: &str) -> String {
    if text.chars().any(char::is_control) {
        return format!("{text:?}");
    }
    if !text.contains(['"', '\\']) {
        return format!("\"{text}\"");
    }
    let mut hashes = 1;
    while text.contains(&format!("\"{}", "#".repeat(hashes))) {
        hashes += 1;
    }
    let fence = "#".repeat(hashes);
    format!("r{fence}\"{text}\"{fence}")
}
