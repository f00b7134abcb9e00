//! FIGfonts
//!
//! Decoding of `.flf` files into [`Font`]s, which the [renderer](crate::render) turns into glyph
//! bands.
mod header;

use std::collections::{BTreeMap, HashMap};
use std::str;

use bstr::{BString, ByteSlice as _};
use itertools::Itertools as _;
#[cfg(feature = "fonts")]
pub use letterpress_fonts::FontFile;
use thiserror::Error;

pub use header::{Hardblank, Header, HeaderError, PrintDirection, SIGNATURE};

use crate::render::Settings;

/// The suffix of FIGfont files
pub const FONT_SUFFIX: &str = ".flf";

/// The 102 characters every FIGfont defines, in file order
///
/// The 95 printable ASCII characters followed by 7 Deutsch characters from Latin-1.
pub const DEFAULT_CODEPOINTS: [u8; 102] = *b" !\"#$%&'()*+,-./0123456789:;<=>?@\
                                             ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`\
                                             abcdefghijklmnopqrstuvwxyz{|}~\
                                             \xc4\xd6\xdc\xe4\xf6\xfc\xdf";

/// A decoded FIGfont
#[derive(Debug)]
pub struct Font {
    header: Header,
    comments: String,
    characters: HashMap<u32, Character>,
    is_utf8: bool,
}

impl Font {
    /// Decodes the contents of an `.flf` file, ignoring non-fatal issues.
    ///
    /// # Errors
    /// See [`FontError`].
    pub fn from_bytes(bytes: impl AsRef<[u8]>) -> Result<Self, FontError> {
        Self::from_bytes_with_warnings(bytes).map(|(font, _)| font)
    }

    /// Decodes the contents of an `.flf` file, also returning any non-fatal issues.
    ///
    /// # Errors
    /// See [`FontError`].
    pub fn from_bytes_with_warnings(
        bytes: impl AsRef<[u8]>,
    ) -> Result<(Self, Vec<FontWarning>), FontError> {
        let mut warnings = Vec::new();
        let normalized: BString = bytes
            .as_ref()
            .replace("\r\n", "\n")
            .into_iter()
            .map(|c| if c == b'\r' { b'\n' } else { c })
            .collect();
        let mut lines = normalized.lines();
        let header_line = lines.next().ok_or(HeaderError::Missing)?;
        let header = Header::decode(header_line)?;
        let comments = bstr::join("\n", lines.by_ref().take(header.comment_lines));
        let comments = String::from_utf8_lossy(&comments).into_owned();

        let mut raw = BTreeMap::new();
        decode_rows(&header, &mut lines, &mut raw, &mut warnings)?;
        let is_utf8 = raw.values().flatten().all(|row: &&[u8]| row.is_utf8());
        let characters = raw
            .into_iter()
            .map(|(codepoint, rows)| {
                let character =
                    Character::decode(&rows, codepoint, is_utf8, header.max_length, &mut warnings);
                (codepoint, character)
            })
            .collect();
        let font = Self {
            header,
            comments,
            characters,
            is_utf8,
        };
        Ok((font, warnings))
    }

    /// Decodes a font bundled with this crate.
    ///
    /// Only available with the `fonts` feature.
    ///
    /// # Errors
    /// Only if the bundled file is broken, which the tests rule out.
    #[cfg(feature = "fonts")]
    pub fn built_in(font: FontFile) -> Result<Self, FontError> {
        Self::from_bytes(font.as_bytes())
    }

    /// The decoded header.
    #[must_use]
    pub const fn header(&self) -> &Header {
        &self.header
    }

    /// The comment lines between the header and the FIGcharacters, usually crediting the author.
    #[must_use]
    pub fn comments(&self) -> &str {
        &self.comments
    }

    /// Returns `true` if every row of every FIGcharacter is valid UTF-8. Otherwise rows are read as
    /// Latin-1.
    #[must_use]
    pub const fn is_utf8(&self) -> bool {
        self.is_utf8
    }

    /// The default render settings of this font.
    #[must_use]
    pub const fn settings(&self) -> Settings {
        Settings::from_header(&self.header)
    }

    /// The width of the widest FIGcharacter, in columns.
    #[must_use]
    pub fn max_width(&self) -> usize {
        self.characters.values().map(|c| c.width).max().unwrap_or(0)
    }

    /// The FIGcharacter for `c`, falling back to the one with code 0 if the font defines it.
    pub(crate) fn get(&self, c: char) -> Option<&Character> {
        self.characters
            .get(&u32::from(c))
            .or_else(|| self.characters.get(&0))
    }
}

/// Collects the raw rows of every FIGcharacter, the required ones first and then the code-tagged
/// ones. A later definition of the same code replaces an earlier one.
fn decode_rows<'a>(
    header: &Header,
    lines: &mut impl Iterator<Item = &'a [u8]>,
    raw: &mut BTreeMap<u32, Vec<&'a [u8]>>,
    warnings: &mut Vec<FontWarning>,
) -> Result<(), FontError> {
    let height = header.height.get();
    let mut insert = |codepoint: u32, rows: Vec<&'a [u8]>| {
        if rows.iter().any(|row| row.is_empty()) {
            return Err(FontError::EmptyRow(codepoint));
        }
        drop(raw.insert(codepoint, rows));
        Ok(())
    };
    for (found, codepoint) in DEFAULT_CODEPOINTS.into_iter().enumerate() {
        let rows: Vec<_> = lines.by_ref().take(height).collect();
        if rows.len() < height {
            warnings.push(FontWarning::MissingDefaultCharacters(found));
            return Ok(());
        }
        insert(codepoint.into(), rows)?;
    }

    let mut tagged = 0;
    while let Some(tag) = lines.next() {
        let rows: Vec<_> = lines.by_ref().take(height).collect();
        if rows.len() < height {
            break;
        }
        let code = tag.split_str(" ").next().unwrap_or_default();
        let code =
            str::from_utf8(code).map_err(|_| FontError::InvalidCharacterCode(code.into()))?;
        // negative codes hold human-readable tables, not FIGcharacters
        if let Some(codepoint) = parse_codepoint(code)? {
            insert(codepoint, rows)?;
        }
        tagged += 1;
    }
    if tagged < header.code_tag_count {
        warnings.push(FontWarning::TooFewCodeTags {
            found: tagged,
            expected: header.code_tag_count,
        });
    }
    Ok(())
}

/// Parses the code of a code-tagged character: decimal, octal with a leading `0`, or hex with a
/// leading `0x`. Returns `None` for negative codes.
fn parse_codepoint(code: &str) -> Result<Option<u32>, FontError> {
    let (negative, digits) = code
        .strip_prefix('-')
        .map_or((false, code), |digits| (true, digits));
    let parsed = if let Some(hex) = digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16)
    } else if let Some(octal) = digits.strip_prefix('0').filter(|octal| !octal.is_empty()) {
        u32::from_str_radix(octal, 8)
    } else {
        digits.parse()
    };
    let codepoint = parsed.map_err(|_| FontError::InvalidCharacterCode(code.into()))?;
    if negative {
        Ok(None)
    } else if codepoint <= 0x7FFF_FFFF {
        Ok(Some(codepoint))
    } else {
        Err(FontError::CharacterCodeOutOfRange(codepoint))
    }
}

/// A decoded FIGcharacter, one `char` per column
#[derive(Debug)]
pub(crate) struct Character {
    pub width: usize,
    pub rows: Vec<Vec<char>>,
}

impl Character {
    /// Decodes rows as UTF-8, or as Latin-1 if any row in the font is not UTF-8, and strips the
    /// endmarks. Rows are known to be non-empty.
    fn decode(
        rows: &[&[u8]],
        codepoint: u32,
        is_utf8: bool,
        max_length: usize,
        warnings: &mut Vec<FontWarning>,
    ) -> Self {
        let rows: Vec<Vec<char>> = rows
            .iter()
            .map(|row| {
                if is_utf8 {
                    row.chars().collect()
                } else {
                    row.iter().copied().map(char::from).collect()
                }
            })
            .collect();
        if let Some(length) = rows.iter().map(Vec::len).filter(|&len| len > max_length).max() {
            warnings.push(FontWarning::ExcessLength {
                codepoint,
                length,
                max_length,
            });
        }
        let rows: Vec<Vec<char>> = rows
            .into_iter()
            .map(|mut row| {
                if let Some(&endmark) = row.last() {
                    let marks = row.iter().rev().take_while(|&&c| c == endmark).count();
                    row.truncate(row.len() - marks);
                }
                row
            })
            .collect();
        let width = match rows.iter().map(Vec::len).all_equal_value() {
            Ok(width) => width,
            Err(_) => {
                warnings.push(FontWarning::InconsistentWidth(codepoint));
                rows.iter().map(Vec::len).max().unwrap_or(0)
            }
        };
        Self { width, rows }
    }
}

/// A fatal error decoding a FIGfont
#[derive(Debug, Error)]
pub enum FontError {
    /// The header could not be decoded.
    #[error("bad header: {0}")]
    BadHeader(#[from] HeaderError),
    /// A code tag that is not a number.
    #[error("{0} is not a valid character code")]
    InvalidCharacterCode(BString),
    /// A code above `2147483647`.
    #[error("character code {0} is out of range")]
    CharacterCodeOutOfRange(u32),
    /// A FIGcharacter row without even an endmark.
    #[error("empty row in FIGcharacter {0}")]
    EmptyRow(u32),
}

/// A non-fatal issue found while decoding a FIGfont
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum FontWarning {
    /// The font ends before all 102 required FIGcharacters.
    #[error("not enough required FIGcharacters, found {0}, expected 102")]
    MissingDefaultCharacters(usize),
    /// Fewer code-tagged characters than the header announces.
    #[error("found {found} tagged characters but expected {expected} from header")]
    TooFewCodeTags {
        /// Tagged characters in the font
        found: usize,
        /// `Codetag_Count` from the header
        expected: usize,
    },
    /// Rows of different widths within one FIGcharacter.
    #[error("FIGcharacter with code {0} has inconsistent width")]
    InconsistentWidth(u32),
    /// A row longer than `Max_Length`.
    #[error("FIGcharacter with code {codepoint} has a row of length {length} > {max_length}")]
    ExcessLength {
        /// The character code
        codepoint: u32,
        /// Length of the longest row, endmarks included
        length: usize,
        /// `Max_Length` from the header
        max_length: usize,
    },
}

#[cfg(test)]
pub(crate) mod tests {
    use super::{DEFAULT_CODEPOINTS, Font, FontError, FontWarning, parse_codepoint};

    /// A font with three rows per FIGcharacter: every required character is drawn as a box with
    /// the character in the middle row, plus one code-tagged smiley.
    pub(crate) fn boxes() -> Font {
        Font::from_bytes(boxes_source(true)).unwrap()
    }

    fn row(font: &Font, c: char, index: usize) -> String {
        font.get(c).unwrap().rows[index].iter().collect()
    }

    /// A font one row high where every required character is drawn as itself, except that `A` is
    /// two full blocks.
    pub(crate) fn blocks_source(old_layout: i8, full_layout: u16) -> String {
        let mut source = format!("flf2a$ 1 1 8 {old_layout} 0 0 {full_layout} 0\n");
        for &codepoint in &DEFAULT_CODEPOINTS {
            match char::from(codepoint) {
                'A' => source.push_str("\u{2588}\u{2588}@@\n"),
                ' ' => source.push_str("$@@\n"),
                '@' => source.push_str("@##\n"),
                c => source.push_str(&format!("{c}@@\n")),
            }
        }
        source
    }

    pub(crate) fn boxes_source(tagged: bool) -> String {
        let mut source = String::from("flf2a$ 3 2 6 -1 1 0 0 1\nbox font for tests\n");
        let charset = concat!(
            " !\"#$%&'()*+,-./0123456789:;<=>?@",
            "ABCDEFGHIJKLMNOPQRSTUVWXYZ[\\]^_`",
            "abcdefghijklmnopqrstuvwxyz{|}~ÄÖÜäöüß",
        );
        for c in charset.chars() {
            if c == ' ' {
                source.push_str("$$@\n$$@\n$$@@\n");
            } else {
                let mid = if c == '@' || !c.is_ascii() { '*' } else { c };
                source.push_str(&format!("+-+@\n|{mid}|@\n+-+@@\n"));
            }
        }
        if tagged {
            source.push_str("9786  WHITE SMILING FACE\n( )@\n:) @\n( )@@\n");
        }
        source
    }

    #[test]
    fn decode_boxes() {
        let (font, warnings) = Font::from_bytes_with_warnings(boxes_source(true)).unwrap();
        assert_eq!(warnings, []);
        assert_eq!(font.comments(), "box font for tests");
        assert_eq!(font.header().height.get(), 3);
        assert_eq!(font.max_width(), 3);
        assert!(font.is_utf8());
        assert_eq!(row(&font, 'A', 1), "|A|");
        assert_eq!(row(&font, ' ', 0), "$$");
        assert_eq!(row(&font, '\u{263A}', 1), ":) ");
        assert_eq!(font.get('\u{263A}').unwrap().width, 3);
        assert!(font.get('\u{1F600}').is_none());
    }

    #[test]
    fn multibyte_rows_are_measured_in_columns() {
        let (font, warnings) = Font::from_bytes_with_warnings(blocks_source(0, 64)).unwrap();
        assert_eq!(warnings, []);
        assert!(font.is_utf8());
        assert_eq!(font.get('A').unwrap().width, 2);
        assert_eq!(row(&font, 'A', 0), "\u{2588}\u{2588}");
        assert_eq!(row(&font, '\u{e4}', 0), "\u{e4}");
        assert_eq!(font.max_width(), 2);
    }

    #[test]
    fn latin1_rows() {
        let mut source = blocks_source(0, 64).replace("\u{2588}\u{2588}", "AA").into_bytes();
        let umlaut = source
            .windows(2)
            .position(|pair| pair == "\u{e4}".as_bytes())
            .unwrap();
        drop(source.splice(umlaut..umlaut + 2, [0xe4]));
        let font = Font::from_bytes(source).unwrap();
        assert!(!font.is_utf8());
        assert_eq!(row(&font, '\u{e4}', 0), "\u{e4}");
        assert_eq!(font.get('\u{e4}').unwrap().width, 1);
    }

    #[test]
    fn warnings() {
        let (_, warnings) = Font::from_bytes_with_warnings(boxes_source(false)).unwrap();
        assert_eq!(
            warnings,
            [FontWarning::TooFewCodeTags {
                found: 0,
                expected: 1
            }]
        );
        let truncated = "flf2a$ 1 1 3 -1 0\n @@\n!@@\n";
        let (font, warnings) = Font::from_bytes_with_warnings(truncated).unwrap();
        assert_eq!(warnings, [FontWarning::MissingDefaultCharacters(2)]);
        assert_eq!(row(&font, '!', 0), "!");
    }

    #[test]
    fn errors() {
        assert!(matches!(Font::from_bytes(""), Err(FontError::BadHeader(_))));
        assert!(matches!(
            Font::from_bytes("flf2a$ 1 1 3 -1 0\n@\n\n"),
            Err(FontError::EmptyRow(33))
        ));
    }

    #[test]
    fn codepoints() {
        assert_eq!(parse_codepoint("65").unwrap(), Some(65));
        assert_eq!(parse_codepoint("0x263A").unwrap(), Some(0x263A));
        assert_eq!(parse_codepoint("0101").unwrap(), Some(65));
        assert_eq!(parse_codepoint("0").unwrap(), Some(0));
        assert_eq!(parse_codepoint("-2").unwrap(), None);
        assert!(matches!(
            parse_codepoint("sixty"),
            Err(FontError::InvalidCharacterCode(_))
        ));
        assert!(matches!(
            parse_codepoint("4294967295"),
            Err(FontError::CharacterCodeOutOfRange(_))
        ));
    }

    #[cfg(feature = "fonts")]
    #[test]
    fn decode_bundled() {
        use super::FontFile;

        for file in FontFile::ALL {
            let (font, warnings) = Font::from_bytes_with_warnings(file.as_bytes())
                .unwrap_or_else(|e| panic!("failed to decode {file:?}: {e}"));
            assert_eq!(warnings, [], "warnings decoding {file:?}");
            assert!(font.get('A').is_some());
        }
    }
}
