//! Rendering text into glyph bands
//!
//! A [`Renderer`] turns every input line into a [`GlyphBand`]: as many rows as the font is high,
//! with FIGcharacters placed side by side according to the [`HorizontalLayout`]. Lines wider than
//! the maximum width are broken into several bands. Widths are counted in columns, one per `char`
//! of a FIGcharacter row, whatever the font's encoding. Bands keep the font's hardblanks; the
//! [printer](crate::print) replaces them when writing.
mod layout;

pub use layout::{HorizontalLayout, LayoutDecodeError, LayoutMode, SmushingRule};

use itertools::izip;

use crate::font::{Character, Font, Hardblank, Header, PrintDirection};
use crate::str_ext::RowExt as _;

/// Characters that always end a band
const LINE_BREAKS: [char; 4] = ['\n', '\r', '\x0b', '\x0c'];

/// Settings for a [`Renderer`], starting from the defaults of a font
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Settings {
    hardblank: Hardblank,
    direction: PrintDirection,
    layout: HorizontalLayout,
}

impl Settings {
    pub(crate) const fn from_header(header: &Header) -> Self {
        Self {
            hardblank: header.hardblank,
            direction: header.print_direction,
            layout: header.horizontal_layout,
        }
    }

    /// The hardblank that rendered bands may contain.
    #[must_use]
    pub const fn hardblank(&self) -> Hardblank {
        self.hardblank
    }

    /// The print direction.
    #[must_use]
    pub const fn print_direction(&self) -> PrintDirection {
        self.direction
    }

    /// Switches between right-to-left and left-to-right printing.
    pub const fn set_right_to_left(&mut self, right_to_left: bool) {
        self.direction = if right_to_left {
            PrintDirection::RightToLeft
        } else {
            PrintDirection::LeftToRight
        };
    }

    /// The horizontal layout.
    #[must_use]
    pub const fn layout(&self) -> HorizontalLayout {
        self.layout
    }

    /// Overrides the horizontal layout mode, keeping the font's smushing rules.
    pub const fn set_layout_mode(&mut self, mode: LayoutMode) {
        self.layout.set_mode(mode);
    }
}

/// The rendered rows for one line of input
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GlyphBand {
    rows: Vec<String>,
}

impl GlyphBand {
    /// Wraps already rendered rows.
    #[must_use]
    pub const fn new(rows: Vec<String>) -> Self {
        Self { rows }
    }

    /// The rows, top to bottom.
    #[must_use]
    pub fn rows(&self) -> &[String] {
        &self.rows
    }

    /// The width of the band: the number of characters in its first row.
    #[must_use]
    pub fn width(&self) -> usize {
        self.rows.first().map_or(0, |row| row.chars().count())
    }
}

impl From<Vec<String>> for GlyphBand {
    fn from(rows: Vec<String>) -> Self {
        Self::new(rows)
    }
}

/// Renders text with a font
///
/// ```
/// # use letterpress::font::{Font, FontFile};
/// # use letterpress::render::Renderer;
/// let font = Font::built_in(FontFile::Term).unwrap();
/// let bands = Renderer::new(&font).max_width(5).bands("hello world");
/// assert_eq!(bands.len(), 2);
/// assert_eq!(bands[0].rows(), ["hello"]);
/// assert_eq!(bands[1].rows(), ["world"]);
/// ```
#[must_use]
#[derive(Debug, Clone, Copy)]
pub struct Renderer<'font> {
    font: &'font Font,
    settings: Settings,
    max_width: Option<usize>,
}

impl<'font> Renderer<'font> {
    /// A renderer using the font's default settings and no maximum width.
    pub const fn new(font: &'font Font) -> Self {
        Self {
            font,
            settings: font.settings(),
            max_width: None,
        }
    }

    /// Replaces all settings.
    pub const fn settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Breaks lines so that no band is wider than `width`, unless a single FIGcharacter is.
    pub const fn max_width(mut self, width: usize) -> Self {
        self.max_width = Some(width);
        self
    }

    /// Overrides the horizontal layout mode.
    pub const fn layout_mode(mut self, mode: LayoutMode) -> Self {
        self.settings.set_layout_mode(mode);
        self
    }

    /// Renders `text`, one band per line.
    ///
    /// A newline, carriage return, vertical tab or form feed always ends a band. A line that does
    /// not fit the maximum width is broken before its last run of blanks, or in the middle of a
    /// word if it has none. Every band holds at least one FIGcharacter, so rendering always makes
    /// progress. Characters missing from the font are skipped.
    #[must_use]
    pub fn bands(&self, text: &str) -> Vec<GlyphBand> {
        let mut bands = Vec::new();
        let mut rest = text;
        while !rest.is_empty() {
            let (line, remaining) = self.render_line(rest);
            bands.push(self.finish(line));
            rest = remaining;
        }
        log::debug!("rendered {} bands from {} bytes", bands.len(), text.len());
        bands
    }

    fn render_line<'a>(&self, text: &'a str) -> (Line, &'a str) {
        let mut line = Line::new(self.font.header().height.get());
        let mut chars = text.chars();
        let mut rest = text;
        let mut before_blanks = None;
        let mut in_blanks = false;
        let mut overfull = false;
        while let Some(c) = chars.next() {
            if LINE_BREAKS.contains(&c) {
                rest = chars.as_str();
                if c == '\r' {
                    rest = rest.strip_prefix('\n').unwrap_or(rest);
                }
                break;
            }
            let c = if c == '\t' { ' ' } else { c };
            if c == ' ' {
                if !in_blanks {
                    before_blanks = Some((line.clone(), rest));
                }
                in_blanks = true;
            } else {
                in_blanks = false;
            }
            if let Some(character) = self.font.get(c)
                && !self.append(&mut line, character)
            {
                overfull = true;
                break;
            }
            rest = chars.as_str();
        }
        if overfull && let Some((saved, at)) = before_blanks.filter(|(saved, _)| saved.width > 0) {
            line = saved;
            rest = at.trim_start_matches([' ', '\t']);
        }
        (line, rest)
    }

    /// Appends a FIGcharacter, unless that would overflow a non-empty line.
    fn append(&self, line: &mut Line, character: &Character) -> bool {
        let layout = self.layout_between(line, character);
        let char_rows: Vec<Vec<char>> = character
            .rows
            .iter()
            .map(|row| row.ordered(self.settings.direction))
            .collect();
        let overlap = self.overlap(layout, line, &char_rows, character.width);
        let width = line.width + character.width - overlap;
        if line.width > 0 && self.max_width.is_some_and(|max_width| width > max_width) {
            return false;
        }
        for (row, char_row) in izip!(&mut line.rows, &char_rows) {
            let overlap = overlap.min(char_row.len());
            let skip = overlap.saturating_sub(row.len());
            let start = row.len() + skip - overlap;
            for (target, &c) in row[start..].iter_mut().zip(&char_row[skip..overlap]) {
                *target = layout
                    .smush(*target, c, self.settings.hardblank)
                    .unwrap_or(c);
            }
            row.extend_from_slice(char_row.get(overlap..).unwrap_or_default());
        }
        line.width = width;
        line.last_width = character.width;
        true
    }

    /// FIGcharacters narrower than two columns are only ever fitted, never smushed.
    fn layout_between(&self, line: &Line, character: &Character) -> HorizontalLayout {
        let mut layout = self.settings.layout;
        if layout.mode() == LayoutMode::Smushing && (line.last_width < 2 || character.width < 2) {
            layout.set_mode(LayoutMode::Fitting);
        }
        layout
    }

    /// How many columns the next FIGcharacter can move into the line: the blanks between them in
    /// the tightest row, plus one where the touching sub-characters smush.
    fn overlap(
        &self,
        layout: HorizontalLayout,
        line: &Line,
        char_rows: &[Vec<char>],
        char_width: usize,
    ) -> usize {
        if layout.mode() == LayoutMode::FullSize || line.width == 0 {
            return 0;
        }
        izip!(&line.rows, char_rows)
            .map(|(row, char_row)| {
                let trailing = row.trailing_blanks();
                let leading = char_row.leading_blanks();
                let left = row.len().checked_sub(trailing + 1).map(|i| row[i]);
                let right = char_row.get(leading).copied();
                let smushes = left
                    .zip(right)
                    .and_then(|(left, right)| layout.smush(left, right, self.settings.hardblank))
                    .is_some();
                trailing + leading + usize::from(smushes)
            })
            .min()
            .unwrap_or(0)
            .min(char_width)
    }

    fn finish(&self, line: Line) -> GlyphBand {
        let rows = line
            .rows
            .into_iter()
            .map(|mut row| {
                if self.settings.direction == PrintDirection::RightToLeft {
                    row.reverse();
                }
                row.into_iter().collect()
            })
            .collect();
        GlyphBand::new(rows)
    }
}

/// Renders `text` with `font`, breaking bands at `max_width`.
///
/// Shorthand for [`Renderer::bands`] with the given settings.
#[must_use]
pub fn render(text: &str, font: &Font, max_width: usize, settings: Settings) -> Vec<GlyphBand> {
    Renderer::new(font)
        .settings(settings)
        .max_width(max_width)
        .bands(text)
}

/// A band under construction, stored in print order (reversed for right-to-left)
#[derive(Clone, Debug)]
struct Line {
    rows: Vec<Vec<char>>,
    width: usize,
    last_width: usize,
}

impl Line {
    fn new(height: usize) -> Self {
        Self {
            rows: vec![Vec::new(); height],
            width: 0,
            last_width: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{GlyphBand, LayoutMode, Renderer, render};
    use crate::font::tests::{blocks_source, boxes};
    use crate::font::{Font, PrintDirection};

    fn rows(bands: &[GlyphBand]) -> Vec<Vec<&str>> {
        bands
            .iter()
            .map(|band| band.rows().iter().map(String::as_str).collect())
            .collect()
    }

    #[test]
    fn full_size() {
        let font = boxes();
        let bands = Renderer::new(&font).bands("A B");
        assert_eq!(rows(&bands), [["+-+$$+-+", "|A|$$|B|", "+-+$$+-+"]]);
        assert_eq!(bands[0].width(), 8);
    }

    #[test]
    fn smushing() {
        let font = boxes();
        let bands = Renderer::new(&font)
            .layout_mode(LayoutMode::Smushing)
            .bands("AB");
        assert_eq!(rows(&bands), [["+-+-+", "|A|B|", "+-+-+"]]);
    }

    #[test]
    fn fitting_without_blanks() {
        let font = boxes();
        let bands = Renderer::new(&font)
            .layout_mode(LayoutMode::Fitting)
            .bands("AB");
        assert_eq!(rows(&bands), [["+-++-+", "|A||B|", "+-++-+"]]);
    }

    #[test]
    fn line_breaks() {
        let font = boxes();
        let bands = Renderer::new(&font).bands("A\nB\r\nC\n");
        assert_eq!(
            rows(&bands),
            [
                ["+-+", "|A|", "+-+"],
                ["+-+", "|B|", "+-+"],
                ["+-+", "|C|", "+-+"]
            ]
        );
    }

    #[test]
    fn break_at_blanks() {
        let font = boxes();
        let bands = Renderer::new(&font).max_width(8).bands("AB   CD");
        assert_eq!(
            rows(&bands),
            [
                ["+-++-+", "|A||B|", "+-++-+"],
                ["+-++-+", "|C||D|", "+-++-+"]
            ]
        );
    }

    #[test]
    fn break_inside_word() {
        let font = boxes();
        let bands = Renderer::new(&font).max_width(7).bands("ABC");
        assert_eq!(
            rows(&bands),
            [["+-++-+", "|A||B|", "+-++-+"], ["+-+", "|C|", "+-+"]]
        );
    }

    #[test]
    fn always_makes_progress() {
        let font = boxes();
        let bands = Renderer::new(&font).max_width(1).bands("AB");
        assert_eq!(
            rows(&bands),
            [["+-+", "|A|", "+-+"], ["+-+", "|B|", "+-+"]]
        );
    }

    #[test]
    fn right_to_left() {
        let font = boxes();
        let mut settings = font.settings();
        settings.set_right_to_left(true);
        assert_eq!(settings.print_direction(), PrintDirection::RightToLeft);
        let bands = render("AB", &font, 80, settings);
        assert_eq!(rows(&bands), [["+-++-+", "|B||A|", "+-++-+"]]);
    }

    #[test]
    fn missing_characters_are_skipped() {
        let font = boxes();
        let bands = Renderer::new(&font).bands("A\u{1F600}");
        assert_eq!(rows(&bands), [["+-+", "|A|", "+-+"]]);
        assert!(Renderer::new(&font).bands("").is_empty());
    }

    #[test]
    fn multibyte_columns() {
        let fitting = Font::from_bytes(blocks_source(0, 64)).unwrap();
        let bands = Renderer::new(&fitting).max_width(4).bands("AA");
        assert_eq!(rows(&bands), [["\u{2588}\u{2588}\u{2588}\u{2588}"]]);
        assert_eq!(bands[0].width(), 4);
        let bands = Renderer::new(&fitting).max_width(3).bands("AA");
        assert_eq!(rows(&bands), [["\u{2588}\u{2588}"], ["\u{2588}\u{2588}"]]);

        let universal = Font::from_bytes(blocks_source(0, 128)).unwrap();
        let bands = Renderer::new(&universal).bands("AA");
        assert_eq!(rows(&bands), [["\u{2588}\u{2588}\u{2588}"]]);

        let mut settings = universal.settings();
        settings.set_right_to_left(true);
        let bands = render("AB", &universal, 80, settings);
        assert_eq!(rows(&bands), [["B\u{2588}\u{2588}"]]);
    }

    #[cfg(feature = "fonts")]
    #[test]
    fn latin1_rows() {
        use crate::font::FontFile;

        let font = Font::built_in(FontFile::Term).unwrap();
        assert!(!font.is_utf8());
        let bands = Renderer::new(&font).bands("Größe");
        assert_eq!(rows(&bands), [["Größe"]]);
    }
}
