use std::fmt;

/// A line of generated text and its indentation level.
///
/// Indentation is applied only when the line is displayed, so nesting a
/// block never copies the text of its lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    pub text: String,
    pub indent_level: usize,
}

impl Line {
    pub const INDENT_UNIT: &'static str = "    ";

    pub fn new(text: impl Into<String>, indent_level: usize) -> Self {
        Self {
            text: text.into(),
            indent_level,
        }
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Blank lines carry no trailing indentation.
        if self.text.is_empty() {
            return Ok(());
        }
        for _ in 0..self.indent_level {
            f.write_str(Self::INDENT_UNIT)?;
        }
        f.write_str(&self.text)
    }
}
