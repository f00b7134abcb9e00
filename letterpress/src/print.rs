//! Printing glyph bands
//!
//! The [`Printer`] pads every row for its [`Alignment`], turns hardblanks into blanks and colors
//! every other visible character according to a [`ColorConfig`].
use std::io::{self, Write};

use crate::color::ColorConfig;
use crate::font::Font;
use crate::render::{GlyphBand, Renderer, Settings};

/// Horizontal alignment of rows within the maximum width
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Alignment {
    /// No padding
    #[default]
    Left,
    /// Half of the free space, rounded down, before the row
    Center,
    /// All of the free space before the row
    Right,
}

/// Writes glyph bands as terminal output
///
/// ```
/// # use letterpress::font::{Font, FontFile};
/// # use letterpress::print::{Alignment, Printer};
/// let font = Font::built_in(FontFile::Term).unwrap();
/// let printer = Printer::new(10).alignment(Alignment::Center);
/// assert_eq!(printer.sprint_message("hi", &font, font.settings()), "    hi\n");
/// ```
#[must_use]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Printer {
    max_width: usize,
    alignment: Alignment,
    colors: ColorConfig,
}

impl Default for Printer {
    fn default() -> Self {
        Self::new(80)
    }
}

impl Printer {
    /// A left-aligned printer without colors for output `max_width` columns wide.
    pub const fn new(max_width: usize) -> Self {
        Self {
            max_width,
            alignment: Alignment::Left,
            colors: ColorConfig::None,
        }
    }

    /// Sets the alignment.
    pub const fn alignment(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Sets the colors.
    pub const fn colors(mut self, colors: ColorConfig) -> Self {
        self.colors = colors;
        self
    }

    /// The maximum width, which is also used for rendering messages.
    #[must_use]
    pub const fn max_width(&self) -> usize {
        self.max_width
    }

    /// Writes every row of every band.
    ///
    /// A row is followed by a newline only if it is narrower than the maximum width and the
    /// alignment is not [`Alignment::Right`]; full rows rely on the terminal wrapping.
    ///
    /// # Errors
    /// Any error from writing to `w`.
    pub fn write_bands<W: Write + ?Sized>(
        &self,
        w: &mut W,
        bands: &[GlyphBand],
        hardblank: char,
    ) -> io::Result<()> {
        let mut buffer = String::new();
        for row in bands.iter().flat_map(GlyphBand::rows) {
            buffer.clear();
            self.format_row(&mut buffer, row, hardblank);
            w.write_all(buffer.as_bytes())?;
        }
        Ok(())
    }

    /// [`write_bands`](Self::write_bands) to stdout.
    ///
    /// # Errors
    /// Any error from writing to stdout.
    pub fn print_bands(&self, bands: &[GlyphBand], hardblank: char) -> io::Result<()> {
        self.write_bands(&mut io::stdout().lock(), bands, hardblank)
    }

    /// [`write_bands`](Self::write_bands) into a string.
    #[must_use]
    pub fn sprint_bands(&self, bands: &[GlyphBand], hardblank: char) -> String {
        let mut output = String::new();
        for row in bands.iter().flat_map(GlyphBand::rows) {
            self.format_row(&mut output, row, hardblank);
        }
        output
    }

    /// Renders `message` at this printer's maximum width and writes it.
    ///
    /// # Errors
    /// Any error from writing to `w`.
    pub fn write_message<W: Write + ?Sized>(
        &self,
        w: &mut W,
        message: &str,
        font: &Font,
        settings: Settings,
    ) -> io::Result<()> {
        let bands = self.render(message, font, settings);
        self.write_bands(w, &bands, settings.hardblank().as_char())
    }

    /// [`write_message`](Self::write_message) to stdout.
    ///
    /// # Errors
    /// Any error from writing to stdout.
    pub fn print_message(&self, message: &str, font: &Font, settings: Settings) -> io::Result<()> {
        self.write_message(&mut io::stdout().lock(), message, font, settings)
    }

    /// [`write_message`](Self::write_message) into a string.
    #[must_use]
    pub fn sprint_message(&self, message: &str, font: &Font, settings: Settings) -> String {
        let bands = self.render(message, font, settings);
        self.sprint_bands(&bands, settings.hardblank().as_char())
    }

    fn render(&self, message: &str, font: &Font, settings: Settings) -> Vec<GlyphBand> {
        Renderer::new(font)
            .settings(settings)
            .max_width(self.max_width)
            .bands(message)
    }

    fn format_row(&self, output: &mut String, row: &str, hardblank: char) {
        let length = row.chars().count();
        let pad = self.max_width.saturating_sub(length);
        let indent = match self.alignment {
            Alignment::Left => 0,
            Alignment::Center => pad / 2,
            Alignment::Right => pad,
        };
        output.extend(std::iter::repeat_n(' ', indent));
        for (index, c) in row.chars().enumerate() {
            let c = if c == hardblank { ' ' } else { c };
            if c == ' ' || self.colors.is_none() {
                output.push(c);
            } else {
                output.push_str(&self.colors.decorate(c, position(index, length)));
            }
        }
        if length < self.max_width && self.alignment != Alignment::Right {
            output.push('\n');
        }
    }
}

/// The position of a character within its row, from 0 at the first to 1 at the last.
#[expect(
    clippy::cast_precision_loss,
    reason = "rows are never anywhere near 2^52 characters long"
)]
fn position(index: usize, length: usize) -> f64 {
    if length > 1 {
        index as f64 / (length - 1) as f64
    } else {
        0.0
    }
}
