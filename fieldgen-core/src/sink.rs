//! Destinations for emitted source lines.

/// Accumulates generated source, one line per call.
pub trait CodeSink {
    fn write_line(&mut self, line: &str);
}

impl CodeSink for Vec<String> {
    fn write_line(&mut self, line: &str) {
        self.push(line.to_string());
    }
}

/// Text buffer that prefixes each line with the current indentation.
#[derive(Debug, Clone)]
pub struct IndentedWriter {
    buffer: String,
    depth: usize,
    width: usize,
}

impl IndentedWriter {
    pub fn new(width: usize) -> Self {
        IndentedWriter {
            buffer: String::new(),
            depth: 0,
            width,
        }
    }

    pub fn indent(&mut self) {
        self.depth += 1;
    }

    /// Saturates at column zero.
    pub fn outdent(&mut self) {
        self.depth = self.depth.saturating_sub(1);
    }

    pub fn as_str(&self) -> &str {
        &self.buffer
    }

    pub fn into_string(self) -> String {
        self.buffer
    }
}

impl Default for IndentedWriter {
    fn default() -> Self {
        IndentedWriter::new(2)
    }
}

impl CodeSink for IndentedWriter {
    fn write_line(&mut self, line: &str) {
        if !line.is_empty() {
            for _ in 0..self.depth * self.width {
                self.buffer.push(' ');
            }
            self.buffer.push_str(line);
        }
        self.buffer.push('\n');
    }
}
