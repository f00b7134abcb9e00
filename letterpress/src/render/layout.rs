use enumset::{EnumSet, EnumSetType};
use thiserror::Error;

use crate::font::Hardblank;

/// Horizontal layout: how adjacent FIGcharacters are moved together
///
/// The smushing rules are only consulted in [`LayoutMode::Smushing`]. An empty rule set in that
/// mode means *universal smushing*.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HorizontalLayout {
    mode: LayoutMode,
    rules: EnumSet<SmushingRule>,
}

impl HorizontalLayout {
    /// A layout with the given mode and controlled smushing rules.
    #[must_use]
    pub const fn new(mode: LayoutMode, rules: EnumSet<SmushingRule>) -> Self {
        Self { mode, rules }
    }

    /// Returns the layout mode.
    #[must_use]
    pub const fn mode(&self) -> LayoutMode {
        self.mode
    }

    /// Sets the layout mode, keeping the smushing rules.
    pub const fn set_mode(&mut self, mode: LayoutMode) {
        self.mode = mode;
    }

    /// The active controlled smushing rules.
    #[must_use]
    pub const fn rules(&self) -> EnumSet<SmushingRule> {
        self.rules
    }

    /// Decodes the `Old_Layout` and (low byte of the) `Full_Layout` header parameters.
    ///
    /// `old_layout` is `-1` for full size, `0` for fitting, or a bit set of [`SmushingRule`]s
    /// implying smushing. When `full_layout` is present it wins: bits 0 to 5 are the rules, bit 6
    /// selects fitting and bit 7 smushing, and the two parameters must agree.
    ///
    /// ```
    /// # use letterpress::render::{HorizontalLayout, LayoutMode, SmushingRule};
    /// let layout = HorizontalLayout::decode(15, Some(24463)).unwrap();
    /// assert_eq!(layout.mode(), LayoutMode::Smushing);
    /// assert!(layout.rules().contains(SmushingRule::OppositePair));
    /// assert!(!layout.rules().contains(SmushingRule::BigX));
    /// ```
    ///
    /// # Errors
    /// See [`LayoutDecodeError`].
    pub fn decode(old_layout: i8, full_layout: Option<u16>) -> Result<Self, LayoutDecodeError> {
        let Some(full_layout) = full_layout else {
            return match old_layout {
                -1 => Ok(Self::new(LayoutMode::FullSize, EnumSet::empty())),
                0 => Ok(Self::new(LayoutMode::Fitting, EnumSet::empty())),
                1..=63 => Ok(Self::new(
                    LayoutMode::Smushing,
                    SmushingRule::decode(old_layout.unsigned_abs()),
                )),
                _ => Err(LayoutDecodeError::InvalidOld(old_layout)),
            };
        };
        let [_, low] = full_layout.to_be_bytes();
        let mode = match low >> 6 {
            0 => LayoutMode::FullSize,
            1 => LayoutMode::Fitting,
            _ => LayoutMode::Smushing,
        };
        let rules = low & 63;
        match (old_layout, mode) {
            (-1, LayoutMode::FullSize) | (0, LayoutMode::Fitting) => {}
            (1..=63, LayoutMode::Smushing) if old_layout.unsigned_abs() == rules => {}
            (0, LayoutMode::Smushing) if rules == 0 => {}
            (-1..=63, _) => return Err(LayoutDecodeError::Inconsistent(old_layout, full_layout)),
            _ => return Err(LayoutDecodeError::InvalidOld(old_layout)),
        }
        Ok(Self::new(mode, SmushingRule::decode(rules)))
    }

    /// The sub-character replacing `left` and `right` when they overlap, if smushing is allowed.
    ///
    /// Blanks always give way to the other sub-character; this is how fitting works.
    pub(crate) fn smush(self, left: char, right: char, hardblank: Hardblank) -> Option<char> {
        if left == ' ' {
            return Some(right);
        }
        if right == ' ' {
            return Some(left);
        }
        if self.mode != LayoutMode::Smushing {
            return None;
        }
        if self.rules.is_empty() {
            // universal smushing: the later FIGcharacter wins, except over a hardblank
            return Some(if hardblank == right { left } else { right });
        }
        if hardblank == left || hardblank == right {
            let both = hardblank == left && hardblank == right;
            return (both && self.rules.contains(SmushingRule::Hardblank)).then_some(left);
        }
        self.rules
            .iter()
            .find_map(|rule| rule.smush(left, right))
    }
}

/// Layout modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutMode {
    /// FIGcharacters are laid out as the rectangles they are defined as.
    FullSize,
    /// FIGcharacters are moved together until they touch. Hardblanks count as visible.
    Fitting,
    /// FIGcharacters are moved one column further than fitting when the touching sub-characters
    /// can be smushed into one.
    Smushing,
}

/// Controlled smushing rules
#[derive(EnumSetType, Debug)]
#[enumset(repr = "u8")]
pub enum SmushingRule {
    /// Two equal sub-characters (other than hardblanks) become one.
    EqualCharacter = 0,
    /// `_` is replaced by any of `|/\[]{}()<>`.
    Underscore = 1,
    /// Of the classes `|`, `/\`, `[]`, `{}`, `()`, `<>`, the later class wins.
    Hierarchy = 2,
    /// Opposite brackets, braces or parentheses become `|`.
    OppositePair = 3,
    /// `/\` becomes `|`, `\/` becomes `Y`, `><` becomes `X`.
    BigX = 4,
    /// Two hardblanks become one.
    Hardblank = 5,
}

impl SmushingRule {
    fn decode(bits: u8) -> EnumSet<Self> {
        EnumSet::from_repr_truncated(bits)
    }

    fn smush(self, left: char, right: char) -> Option<char> {
        match self {
            Self::EqualCharacter => (left == right).then_some(left),
            Self::Underscore => underscore(left, right).or_else(|| underscore(right, left)),
            Self::Hierarchy => hierarchy(left, right).or_else(|| hierarchy(right, left)),
            Self::OppositePair => OPPOSITE_PAIRS
                .iter()
                .any(|pair| pair.starts_with(left) && pair.ends_with(right))
                .then_some('|'),
            Self::BigX => match (left, right) {
                ('/', '\\') => Some('|'),
                ('\\', '/') => Some('Y'),
                ('>', '<') => Some('X'),
                _ => None,
            },
            // handled before any other rule, since hardblanks never smush otherwise
            Self::Hardblank => None,
        }
    }
}

const HIERARCHY: [&str; 6] = ["|", "/\\", "[]", "{}", "()", "<>"];

const OPPOSITE_PAIRS: [&str; 6] = ["[]", "][", "{}", "}{", "()", ")("];

fn underscore(underscore: char, other: char) -> Option<char> {
    (underscore == '_' && class(other).is_some()).then_some(other)
}

fn class(c: char) -> Option<usize> {
    HIERARCHY.iter().position(|class| class.contains(c))
}

fn hierarchy(lower: char, higher: char) -> Option<char> {
    class(lower)
        .zip(class(higher))
        .is_some_and(|(lower, higher)| lower < higher)
        .then_some(higher)
}

/// Errors decoding the layout parameters of a header
#[derive(Error, Debug)]
pub enum LayoutDecodeError {
    /// `Old_Layout` and `Full_Layout` describe different layouts.
    #[error("inconsistent layout parameters: {0} and {1}")]
    Inconsistent(i8, u16),
    /// `Old_Layout` is outside `-1..=63`.
    #[error("invalid `Old_Layout` {0}")]
    InvalidOld(i8),
}
