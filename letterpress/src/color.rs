//! Colors and true-color decoration
//!
//! Color literals are accepted in three forms, all case-insensitive:
//! * six hexadecimal digits, optionally prefixed with `#` (`#FF8800`, `ff8800`);
//! * `rgb(<r>, <g>, <b>)` with decimal components in `0..=255`;
//! * one of the names in [`NAMED_COLORS`].
//!
//! Decorated characters are wrapped in a 24-bit foreground escape (`ESC[38;2;R;G;Bm`) and a reset
//! (`ESC[0m`).

use std::fmt::{self, Display};
use std::str::FromStr;

use thiserror::Error;

/// The escape sequence that resets all terminal attributes
pub const RESET: &str = "\x1b[0m";

/// Colors that can be referred to by name
///
/// Note that `lime` and `green` are the same color.
pub const NAMED_COLORS: [(&str, Color); 18] = [
    ("red", Color::new(255, 0, 0)),
    ("green", Color::new(0, 255, 0)),
    ("blue", Color::new(0, 0, 255)),
    ("yellow", Color::new(255, 255, 0)),
    ("magenta", Color::new(255, 0, 255)),
    ("cyan", Color::new(0, 255, 255)),
    ("white", Color::new(255, 255, 255)),
    ("black", Color::new(0, 0, 0)),
    ("orange", Color::new(255, 165, 0)),
    ("purple", Color::new(128, 0, 128)),
    ("pink", Color::new(255, 192, 203)),
    ("lime", Color::new(0, 255, 0)),
    ("navy", Color::new(0, 0, 128)),
    ("teal", Color::new(0, 128, 128)),
    ("silver", Color::new(192, 192, 192)),
    ("gray", Color::new(128, 128, 128)),
    ("maroon", Color::new(128, 0, 0)),
    ("olive", Color::new(128, 128, 0)),
];

/// A 24-bit RGB color
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Creates a color from its channels.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Blends linearly from `self` (at `t = 0`) to `end` (at `t = 1`).
    ///
    /// `t` is clamped to `0.0..=1.0` and every channel is truncated, not rounded:
    /// ```
    /// # use letterpress::color::Color;
    /// let black = Color::new(0, 0, 0);
    /// let white = Color::new(255, 255, 255);
    /// assert_eq!(black.interpolate(white, 0.5), Color::new(127, 127, 127));
    /// ```
    #[must_use]
    pub fn interpolate(self, end: Self, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let blend = |start: u8, end: u8| {
            let start = f64::from(start);
            let value = start + (f64::from(end) - start) * t;
            truncate(value)
        };
        Self::new(
            blend(self.r, end.r),
            blend(self.g, end.g),
            blend(self.b, end.b),
        )
    }

    /// The escape sequence selecting this color as the foreground color.
    #[must_use]
    pub const fn foreground(self) -> Foreground {
        Foreground(self)
    }
}

impl Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl FromStr for Color {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_color(s)
    }
}

/// Displays as the true-color foreground escape for a [`Color`]
#[derive(Clone, Copy, Debug)]
pub struct Foreground(Color);

impl Display for Foreground {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Color { r, g, b } = self.0;
        write!(f, "\x1b[38;2;{r};{g};{b}m")
    }
}

/// Parses a color literal.
///
/// Surrounding whitespace is ignored. A literal starting with `#`, or six characters long and not
/// a color name, is parsed as hex.
///
/// # Errors
/// Returns a [`ColorError`] carrying the literal if it matches none of the accepted forms.
pub fn parse_color(literal: &str) -> Result<Color, ColorError> {
    let trimmed = literal.trim();
    let lower = trimmed.to_ascii_lowercase();
    if let Some(hex) = lower.strip_prefix('#') {
        return parse_hex(hex).ok_or_else(|| ColorError::Hex(literal.to_owned()));
    }
    if let Some(components) = lower
        .strip_prefix("rgb(")
        .and_then(|rest| rest.strip_suffix(')'))
    {
        return parse_rgb(components).ok_or_else(|| ColorError::Rgb(literal.to_owned()));
    }
    if let Some(&(_, color)) = NAMED_COLORS.iter().find(|(name, _)| *name == lower) {
        return Ok(color);
    }
    if lower.chars().count() == 6 {
        return parse_hex(&lower).ok_or_else(|| ColorError::Hex(literal.to_owned()));
    }
    Err(ColorError::UnknownName(literal.to_owned()))
}

fn parse_hex(hex: &str) -> Option<Color> {
    if hex.len() != 6 || !hex.bytes().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::new(channel(0)?, channel(2)?, channel(4)?))
}

fn parse_rgb(components: &str) -> Option<Color> {
    let mut channels = components.split(',').map(|component| {
        let component = component.trim();
        if component.is_empty() || !component.bytes().all(|c| c.is_ascii_digit()) {
            return None;
        }
        component.parse::<u8>().ok()
    });
    let color = Color::new(channels.next()??, channels.next()??, channels.next()??);
    channels.next().is_none().then_some(color)
}

/// Converts a color from HSV.
///
/// The hue is split into six sectors `[0, 60)`, `[60, 120)`, ... `[300, 360)`. A hue outside all of
/// them, including exactly `360.0`, gets neither chroma nor the intermediate component, so only
/// the `value - chroma` offset remains.
#[must_use]
pub fn hsv_to_color(hue: f64, saturation: f64, value: f64) -> Color {
    let chroma = value * saturation;
    let intermediate = chroma * (1.0 - ((hue / 60.0) % 2.0 - 1.0).abs());
    let offset = value - chroma;

    let (r, g, b) = if (0.0..60.0).contains(&hue) {
        (chroma, intermediate, 0.0)
    } else if (60.0..120.0).contains(&hue) {
        (intermediate, chroma, 0.0)
    } else if (120.0..180.0).contains(&hue) {
        (0.0, chroma, intermediate)
    } else if (180.0..240.0).contains(&hue) {
        (0.0, intermediate, chroma)
    } else if (240.0..300.0).contains(&hue) {
        (intermediate, 0.0, chroma)
    } else if (300.0..360.0).contains(&hue) {
        (chroma, 0.0, intermediate)
    } else {
        (0.0, 0.0, 0.0)
    };

    Color::new(
        truncate((r + offset) * 255.0),
        truncate((g + offset) * 255.0),
        truncate((b + offset) * 255.0),
    )
}

/// The color at `position` (clamped to `0.0..=1.0`) along a full sweep of the hue circle.
#[must_use]
pub fn rainbow_color(position: f64) -> Color {
    let position = position.clamp(0.0, 1.0);
    hsv_to_color(position * 360.0, 1.0, 1.0)
}

#[expect(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "clamped to the u8 range first"
)]
fn truncate(channel: f64) -> u8 {
    channel.clamp(0.0, 255.0) as u8
}

/// How rendered characters are colored
///
/// Only the variant decides which colors matter: the gradient endpoints exist only on
/// [`ColorConfig::Gradient`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorConfig {
    /// No decoration at all
    #[default]
    None,
    /// A linear blend from `start` on the left to `end` on the right of every row
    Gradient {
        /// Color at position 0
        start: Color,
        /// Color at position 1
        end: Color,
    },
    /// A full hue sweep from red on the left of every row
    Rainbow,
}

impl ColorConfig {
    /// Returns `true` for [`ColorConfig::None`].
    #[must_use]
    pub const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// The color for a character at `position` (`0.0..=1.0`) in its row, or `None` if no
    /// decoration applies.
    #[must_use]
    pub fn color_at(&self, position: f64) -> Option<Color> {
        match *self {
            Self::None => None,
            Self::Gradient { start, end } => Some(start.interpolate(end, position)),
            Self::Rainbow => Some(rainbow_color(position)),
        }
    }

    /// Wraps `c` in the escape sequences for its color; see [`decorate`].
    #[must_use]
    pub fn decorate(&self, c: char, position: f64) -> String {
        match self.color_at(position) {
            Some(color) => format!("{}{c}{RESET}", color.foreground()),
            None => c.to_string(),
        }
    }
}

/// Wraps `c` in a foreground color escape and a reset according to `config`.
///
/// With [`ColorConfig::None`] the character is returned as is. Blanks are *not* special-cased
/// here; callers that want uncolored spaces skip them.
/// ```
/// # use letterpress::color::{decorate, Color, ColorConfig};
/// let config = ColorConfig::Gradient {
///     start: Color::new(255, 0, 0),
///     end: Color::new(0, 0, 255),
/// };
/// assert_eq!(decorate('#', 0.0, config), "\x1b[38;2;255;0;0m#\x1b[0m");
/// assert_eq!(decorate('#', 0.5, ColorConfig::None), "#");
/// ```
#[must_use]
pub fn decorate(c: char, position: f64, config: ColorConfig) -> String {
    config.decorate(c, position)
}

/// A color literal that could not be parsed
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ColorError {
    /// A `#`-prefixed or six character literal that is not six hex digits
    #[error("invalid hex color: {0}")]
    Hex(String),
    /// An `rgb(...)` literal without exactly three components in `0..=255`
    #[error("invalid rgb color: {0}")]
    Rgb(String),
    /// A literal that is neither hex, `rgb(...)`, nor a known color name
    #[error("unknown color: {0}")]
    UnknownName(String),
}

impl ColorError {
    /// The literal that failed to parse, as given.
    #[must_use]
    pub fn literal(&self) -> &str {
        match self {
            Self::Hex(literal) | Self::Rgb(literal) | Self::UnknownName(literal) => literal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{
        Color, ColorConfig, ColorError, decorate, hsv_to_color, parse_color, rainbow_color,
    };

    const RED: Color = Color::new(255, 0, 0);

    #[test]
    fn hex() {
        assert_eq!(parse_color("#FF0000"), Ok(RED));
        assert_eq!(parse_color("ff0000"), Ok(RED));
        assert_eq!(parse_color("  #0a0B0c "), Ok(Color::new(10, 11, 12)));
        assert_eq!(parse_color("#ff00"), Err(ColorError::Hex("#ff00".into())));
        assert_eq!(parse_color("#gg0000"), Err(ColorError::Hex("#gg0000".into())));
        assert_eq!(parse_color("+f0000"), Err(ColorError::Hex("+f0000".into())));
        assert!(parse_color("zzzzzz").is_err());
    }

    #[test]
    fn rgb() {
        assert_eq!(parse_color("rgb( 0, 255, 0 )"), Ok(Color::new(0, 255, 0)));
        assert_eq!(parse_color("RGB(1,2,3)"), Ok(Color::new(1, 2, 3)));
        assert_eq!(parse_color("rgb(1,2)"), Err(ColorError::Rgb("rgb(1,2)".into())));
        assert_eq!(
            parse_color("rgb(1,2,3,4)"),
            Err(ColorError::Rgb("rgb(1,2,3,4)".into()))
        );
        assert_eq!(
            parse_color("rgb(300,0,0)"),
            Err(ColorError::Rgb("rgb(300,0,0)".into()))
        );
        assert!(parse_color("rgb(-1,0,0)").is_err());
        assert!(parse_color("rgb(+1,0,0)").is_err());
        assert!(parse_color("rgb(,0,0)").is_err());
    }

    #[test]
    fn named() {
        assert_eq!(parse_color("RED"), Ok(RED));
        assert_eq!(parse_color("red"), Ok(RED));
        assert_eq!(parse_color("lime"), parse_color("green"));
        // six letters long, but still names rather than hex
        assert_eq!(parse_color("orange"), Ok(Color::new(255, 165, 0)));
        assert_eq!(parse_color("Silver"), Ok(Color::new(192, 192, 192)));
        let error = parse_color("chartreuse").unwrap_err();
        assert_eq!(error, ColorError::UnknownName("chartreuse".into()));
        assert_eq!(error.literal(), "chartreuse");
        assert_eq!(error.to_string(), "unknown color: chartreuse");
    }

    #[test]
    fn from_str() {
        assert_eq!("navy".parse::<Color>(), Ok(Color::new(0, 0, 128)));
        assert_eq!(Color::new(0, 0, 128).to_string(), "#000080");
    }

    #[test]
    fn interpolate() {
        let black = Color::new(0, 0, 0);
        let white = Color::new(255, 255, 255);
        assert_eq!(black.interpolate(white, 0.5), Color::new(127, 127, 127));
        assert_eq!(black.interpolate(white, -1.0), black);
        assert_eq!(black.interpolate(white, 2.0), white);
        assert_eq!(white.interpolate(black, 0.25), Color::new(191, 191, 191));
    }

    #[test]
    fn hsv() {
        assert_eq!(hsv_to_color(0.0, 1.0, 1.0), RED);
        assert_eq!(hsv_to_color(120.0, 1.0, 1.0), Color::new(0, 255, 0));
        assert_eq!(hsv_to_color(240.0, 1.0, 1.0), Color::new(0, 0, 255));
        assert_eq!(hsv_to_color(60.0, 1.0, 1.0), Color::new(255, 255, 0));
        assert_eq!(hsv_to_color(0.0, 0.0, 0.5), Color::new(127, 127, 127));
        // outside every sector
        assert_eq!(hsv_to_color(360.0, 1.0, 1.0), Color::new(0, 0, 0));
    }

    #[test]
    fn rainbow() {
        assert_eq!(rainbow_color(0.0), RED);
        assert_eq!(rainbow_color(-3.0), RED);
        assert_eq!(rainbow_color(0.5), Color::new(0, 255, 255));
        assert_eq!(rainbow_color(1.0), hsv_to_color(360.0, 1.0, 1.0));
    }

    #[test]
    fn decoration() {
        assert_eq!(decorate('x', 0.3, ColorConfig::None), "x");
        assert_eq!(
            decorate('x', 0.0, ColorConfig::Rainbow),
            "\x1b[38;2;255;0;0mx\x1b[0m"
        );
        let gradient = ColorConfig::Gradient {
            start: Color::new(0, 0, 0),
            end: Color::new(10, 20, 30),
        };
        assert_eq!(decorate('#', 1.0, gradient), "\x1b[38;2;10;20;30m#\x1b[0m");
        assert_eq!(gradient.color_at(0.5), Some(Color::new(5, 10, 15)));
        assert!(ColorConfig::None.color_at(0.5).is_none());
    }
}
