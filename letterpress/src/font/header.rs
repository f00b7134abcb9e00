use std::num::NonZero;
use std::str::{self, FromStr};

use bstr::{BString, ByteSlice as _};
use itertools::Itertools as _;
use thiserror::Error;

use crate::render::{HorizontalLayout, LayoutDecodeError};

/// The signature every FIGfont header starts with, immediately followed by the hardblank
pub const SIGNATURE: &[u8] = b"flf2a";

/// A FIGfont header
#[derive(Clone, Copy, Debug)]
pub struct Header {
    /// The *hardblank*; see [`Hardblank`].
    pub hardblank: Hardblank,
    /// Number of rows in every FIGcharacter, including blank space above and below the glyph.
    pub height: NonZero<usize>,
    /// Rows from the top of the tallest FIGcharacter down to the baseline. Does not affect
    /// rendering; `None` if the parameter could not be parsed.
    pub baseline: Option<usize>,
    /// Upper bound for the length of each row, including *endmarks*.
    pub max_length: usize,
    /// Number of comment lines between the header and the FIGcharacters.
    pub comment_lines: usize,
    /// The default horizontal layout
    pub horizontal_layout: HorizontalLayout,
    /// The default print direction
    pub print_direction: PrintDirection,
    /// Number of code-tagged characters after the 102 required ones.
    pub code_tag_count: usize,
}

impl Header {
    /// Decodes a header line.
    ///
    /// # Errors
    /// See [`HeaderError`].
    pub fn decode(header_line: &[u8]) -> Result<Self, HeaderError> {
        let mut parameters = header_line
            .split(|&c| c == b' ')
            .filter(|parameter| !parameter.is_empty());
        let Some([signature_and_hardblank, height, baseline, max_length, old_layout, comments]) =
            parameters.next_array()
        else {
            return Err(HeaderError::NotEnoughParameters(header_line.into()));
        };
        let print_direction = parameters.next();
        let full_layout = parameters.next();
        let code_tag_count = parameters.next();

        let Some(hardblank) = signature_and_hardblank.strip_prefix(SIGNATURE) else {
            return Err(HeaderError::UnknownSignature(signature_and_hardblank.into()));
        };
        let Ok(&hardblank) = hardblank.iter().exactly_one() else {
            return Err(HeaderError::HardblankLength(hardblank.into()));
        };
        let hardblank = Hardblank::try_from(hardblank).map_err(HeaderError::InvalidHardblank)?;
        let height = NonZero::new(IntParameter::Height.parse(height)?)
            .ok_or(HeaderError::ZeroHeight)?;
        let baseline = IntParameter::Baseline.parse(baseline).ok();
        let max_length = IntParameter::MaxLength.parse(max_length)?;
        let comment_lines = IntParameter::CommentLines.parse(comments)?;
        let old_layout = IntParameter::OldLayout.parse(old_layout)?;
        let full_layout = full_layout
            .map(|full_layout| IntParameter::FullLayout.parse(full_layout))
            .transpose()?;
        let code_tag_count = code_tag_count
            .map(|count| IntParameter::CodeTagCount.parse(count))
            .transpose()?
            .unwrap_or(0);

        Ok(Self {
            hardblank,
            height,
            baseline,
            max_length,
            comment_lines,
            horizontal_layout: HorizontalLayout::decode(old_layout, full_layout)?,
            print_direction: PrintDirection::decode(print_direction)?,
            code_tag_count,
        })
    }
}

/// Printing direction
///
/// Rendered rows are always read left-to-right; right-to-left only changes the order in which
/// FIGcharacters are placed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PrintDirection {
    /// Left-to-right
    #[default]
    LeftToRight,
    /// Right-to-left
    RightToLeft,
}

impl PrintDirection {
    fn decode(print_direction: Option<&[u8]>) -> Result<Self, HeaderError> {
        match print_direction {
            None | Some(b"0") => Ok(Self::LeftToRight),
            Some(b"1") => Ok(Self::RightToLeft),
            Some(other) => Err(HeaderError::PrintDirection(other.into())),
        }
    }
}

/// The integer parameters of a header, named as in the FIGfont documentation
#[derive(Debug, Clone, Copy)]
enum IntParameter {
    Height,
    Baseline,
    MaxLength,
    CommentLines,
    OldLayout,
    FullLayout,
    CodeTagCount,
}

impl IntParameter {
    const NAMES: [&'static str; 7] = [
        "Height",
        "Baseline",
        "Max_Length",
        "Comment_Lines",
        "Old_Layout",
        "Full_Layout",
        "Codetag_Count",
    ];

    fn parse<T: FromStr>(self, bytes: &[u8]) -> Result<T, HeaderError> {
        str::from_utf8(bytes)
            .ok()
            .and_then(|text| text.parse().ok())
            .ok_or_else(|| HeaderError::Parse(Self::NAMES[self as usize], bytes.into()))
    }
}

/// A hardblank
///
/// A sub-character that renders as a blank (`' '`) but behaves like a visible sub-character while
/// FIGcharacters are fitted or smushed together, keeping them apart. Replacing it with a blank is
/// left to the [printer](crate::print); rendered bands still contain it.
///
/// The usual hardblank is `$`; anything except a blank, carriage-return, newline or null byte is
/// allowed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Hardblank(u8);

impl Hardblank {
    /// The hardblank as it appears in rendered rows.
    #[must_use]
    pub const fn as_char(self) -> char {
        self.0 as char
    }

    /// The raw byte from the font file.
    #[must_use]
    pub const fn as_byte(self) -> u8 {
        self.0
    }
}

impl PartialEq<u8> for Hardblank {
    fn eq(&self, byte: &u8) -> bool {
        self.0 == *byte
    }
}

impl PartialEq<char> for Hardblank {
    fn eq(&self, c: &char) -> bool {
        self.as_char() == *c
    }
}

impl TryFrom<u8> for Hardblank {
    type Error = u8;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        match byte {
            b' ' | b'\r' | b'\n' | 0 => Err(byte),
            _ => Ok(Self(byte)),
        }
    }
}

/// Why a FIGfont header could not be decoded
#[derive(Debug, Error)]
pub enum HeaderError {
    /// The font is empty.
    #[error("the font is empty")]
    Missing,
    /// Fewer than the six required parameters, counting signature and hardblank as one.
    #[error("header {0:?} has fewer than six parameters")]
    NotEnoughParameters(BString),
    /// The header does not begin with `flf2a`.
    #[error("signature {0:?} is not `flf2a` followed by the hardblank")]
    UnknownSignature(BString),
    /// The hardblank is missing or longer than one byte.
    #[error("hardblank {0:?} must be a single byte")]
    HardblankLength(BString),
    /// The hardblank is a blank, carriage-return, newline or null byte.
    #[error("{0:#04x} must not be the hardblank")]
    InvalidHardblank(u8),
    /// An integer parameter could not be parsed.
    #[error("invalid value {1:?} for `{0}`")]
    Parse(&'static str, BString),
    /// The print direction is neither 0 nor 1.
    #[error("print direction {0:?} is neither 0 nor 1")]
    PrintDirection(BString),
    /// The layout parameters are invalid or inconsistent.
    #[error(transparent)]
    Layout(#[from] LayoutDecodeError),
    /// The height is 0.
    #[error("FIGcharacters must be at least one row high")]
    ZeroHeight,
}

#[cfg(test)]
mod tests {
    use super::{Header, HeaderError, PrintDirection};
    use crate::render::LayoutMode;

    #[test]
    fn full_header() {
        let header = Header::decode(b"flf2a$ 6 5 16 15 11 0 24463 229").unwrap();
        assert_eq!(header.hardblank, b'$');
        assert_eq!(header.height.get(), 6);
        assert_eq!(header.baseline, Some(5));
        assert_eq!(header.max_length, 16);
        assert_eq!(header.comment_lines, 11);
        assert_eq!(header.horizontal_layout.mode(), LayoutMode::Smushing);
        assert_eq!(header.print_direction, PrintDirection::LeftToRight);
        assert_eq!(header.code_tag_count, 229);
    }

    #[test]
    fn minimal_header() {
        let header = Header::decode(b"flf2a# 1 x 3 -1 0").unwrap();
        assert_eq!(header.hardblank.as_char(), '#');
        assert_eq!(header.baseline, None);
        assert_eq!(header.horizontal_layout.mode(), LayoutMode::FullSize);
        assert_eq!(header.code_tag_count, 0);
    }

    #[test]
    fn bad_headers() {
        assert!(matches!(
            Header::decode(b"flf2a$ 6 5 16"),
            Err(HeaderError::NotEnoughParameters(_))
        ));
        assert!(matches!(
            Header::decode(b"tlf2a$ 6 5 16 15 11"),
            Err(HeaderError::UnknownSignature(_))
        ));
        assert!(matches!(
            Header::decode(b"flf2a$$ 6 5 16 15 11"),
            Err(HeaderError::HardblankLength(_))
        ));
        assert!(matches!(
            Header::decode(b"flf2a$ 0 5 16 15 11"),
            Err(HeaderError::ZeroHeight)
        ));
        assert!(matches!(
            Header::decode(b"flf2a$ 6 5 16 15 11 2"),
            Err(HeaderError::PrintDirection(_))
        ));
        assert!(matches!(
            Header::decode(b"flf2a$ six 5 16 15 11"),
            Err(HeaderError::Parse("Height", _))
        ));
    }
}
