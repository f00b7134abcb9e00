//! A crate for printing text as large letters made of characters, using FIGfonts.
//!
//! # Features
//!
//! - Font sources that look fonts up by name in a directory, in the bundled fonts, or in several
//!   sources in priority order ([`source`])
//! - Horizontal fitting and smushing with automatic line breaking ([`render`])
//! - Left, centered and right alignment ([`print::Alignment`])
//! - True-color gradients and rainbows ([`color`])
//!
//! # Example
//!
//! ```
//! # use letterpress::color::{parse_color, ColorConfig};
//! # use letterpress::print::Printer;
//! # use letterpress::source::{default_loader, FontSource};
//! let loader = default_loader(None, None);
//! let font = loader.font_by_name("term").unwrap();
//! let printer = Printer::new(80);
//! assert_eq!(printer.sprint_message("Hello", &font, font.settings()), "Hello\n");
//!
//! let colors = ColorConfig::Gradient {
//!     start: parse_color("red").unwrap(),
//!     end: parse_color("#0000ff").unwrap(),
//! };
//! let output = printer.colors(colors).sprint_message("ab", &font, font.settings());
//! assert_eq!(output, "\x1b[38;2;255;0;0ma\x1b[0m\x1b[38;2;0;0;255mb\x1b[0m\n");
//! ```
//!
//! ## Feature flags
//!
//! - `fonts` (default): bundles a few fonts from the
//!   [`letterpress-fonts`](https://crates.io/crates/letterpress-fonts) package (via a dependency),
//!   available through [`source::Loader::bundled`] and
//!   [`Font::built_in()`](crate::font::Font::built_in)

pub mod color;
pub mod font;
pub mod print;
pub mod render;
pub mod source;
mod str_ext;
