//! Console formatter: one line per chunk
//!
//! Each line is the size right-aligned in a fixed column, an arrow, and the
//! chunk's path. Directories are highlighted when color is enabled.

use std::io::{self, Write};

use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::tree::UsageNode;

use super::config::OutputConfig;
use super::utils::{SIZE_WIDTH, format_size};

pub struct ChunkFormatter {
    config: OutputConfig,
}

impl ChunkFormatter {
    pub fn new(config: OutputConfig) -> Self {
        Self { config }
    }

    fn size_text(&self, size: u64) -> String {
        if self.config.human {
            format_size(size)
        } else {
            size.to_string()
        }
    }

    /// Render a single chunk line without color or trailing newline.
    pub fn format_line(&self, chunk: &UsageNode) -> String {
        format!(
            "{:>width$} -> {}",
            self.size_text(chunk.size),
            chunk.path.display(),
            width = SIZE_WIDTH
        )
    }

    /// Render all chunks as plain text.
    pub fn format(&self, chunks: &[UsageNode]) -> String {
        let mut output = String::new();
        for chunk in chunks {
            output.push_str(&self.format_line(chunk));
            output.push('\n');
        }
        output
    }

    pub fn print(&self, chunks: &[UsageNode]) -> io::Result<()> {
        let choice = if self.config.use_color {
            ColorChoice::Auto
        } else {
            ColorChoice::Never
        };
        let mut stdout = StandardStream::stdout(choice);
        self.write(&mut stdout, chunks)
    }

    /// Write chunks to any color-capable writer.
    pub fn write<W: WriteColor>(&self, out: &mut W, chunks: &[UsageNode]) -> io::Result<()> {
        for chunk in chunks {
            write!(
                out,
                "{:>width$} -> ",
                self.size_text(chunk.size),
                width = SIZE_WIDTH
            )?;
            if chunk.path.is_dir() {
                out.set_color(ColorSpec::new().set_fg(Some(Color::Blue)).set_bold(true))?;
            }
            write!(out, "{}", chunk.path.display())?;
            out.reset()?;
            writeln!(out)?;
        }
        Ok(())
    }
}
