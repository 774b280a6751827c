//! Elastic tabstops for `\t`-separated text.
//!
//! Text is buffered until [`TabWriter::into_string`], then every line is cut
//! into cells at its tabs. A cell is terminated by `\t` or `\v`; the text
//! after the last terminator of a line is a trailing cell that never takes
//! part in alignment. Consecutive lines that all have a terminated cell in
//! column `n` form a column block, and every cell of the block is padded to
//! the widest cell plus the padding.
//!
//! A `\f` ends the line like `\n` and also ends every open column block, so
//! the text after it is aligned on its own.

use std::fmt;

#[derive(Debug, Clone)]
pub struct TabWriter {
    buf: String,
    min_width: usize,
    padding: usize,
}

impl Default for TabWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl TabWriter {
    pub fn new() -> Self {
        Self {
            buf: String::new(),
            min_width: 0,
            padding: 2,
        }
    }

    pub fn min_width(mut self, min_width: usize) -> Self {
        self.min_width = min_width;
        self
    }

    pub fn padding(mut self, padding: usize) -> Self {
        self.padding = padding;
        self
    }

    /// Aligns everything written so far.
    pub fn into_string(self) -> String {
        let mut out = String::with_capacity(self.buf.len());
        for (i, section) in self.buf.split('\x0C').enumerate() {
            if i > 0 {
                out.push('\n');
            }
            let lines: Vec<Vec<&str>> = section
                .split('\n')
                .map(|line| line.split(['\t', '\x0B']).collect())
                .collect();

            let mut widths = Vec::new();
            self.format(&lines, 0, lines.len(), &mut widths, &mut out);
        }
        out
    }

    fn format(
        &self,
        lines: &[Vec<&str>],
        mut line0: usize,
        line1: usize,
        widths: &mut Vec<usize>,
        out: &mut String,
    ) {
        let column = widths.len();
        let mut this = line0;

        while this < line1 {
            if column >= lines[this].len() - 1 {
                this += 1;
                continue;
            }

            self.write_lines(lines, line0, this, widths, out);
            line0 = this;

            let mut width = self.min_width;
            while this < line1 && column < lines[this].len() - 1 {
                width = width.max(cell_width(lines[this][column]) + self.padding);
                this += 1;
            }

            widths.push(width);
            self.format(lines, line0, this, widths, out);
            widths.pop();
            line0 = this;
        }

        self.write_lines(lines, line0, line1, widths, out);
    }

    fn write_lines(
        &self,
        lines: &[Vec<&str>],
        line0: usize,
        line1: usize,
        widths: &[usize],
        out: &mut String,
    ) {
        for i in line0..line1 {
            for (j, cell) in lines[i].iter().enumerate() {
                out.push_str(cell);
                if let Some(&width) = widths.get(j) {
                    let pad = width.saturating_sub(cell_width(cell));
                    out.extend(std::iter::repeat_n(' ', pad));
                }
            }
            if i + 1 < lines.len() {
                out.push('\n');
            }
        }
    }
}

impl fmt::Write for TabWriter {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.buf.push_str(s);
        Ok(())
    }
}

fn cell_width(cell: &str) -> usize {
    cell.chars().count()
}

/// Runs `f` against a fresh [`TabWriter`] and returns the aligned text.
pub fn tabbed_string<F, E>(f: F) -> Result<String, E>
where
    F: FnOnce(&mut TabWriter) -> Result<(), E>,
{
    let mut out = TabWriter::new();
    f(&mut out)?;
    Ok(out.into_string())
}

// ============================================================================
// Tests
// ============================================================================
