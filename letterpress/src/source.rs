//! Font sources
//!
//! A [`FontSource`] lists the fonts it can provide and decodes them by name. A [`Loader`] reads a
//! single namespace: a directory of `.flf` files or the fonts bundled into the binary. A
//! [`CombinedLoader`] stacks several sources in priority order, which is how a user's font
//! directory overrides the bundled fonts while they remain a fallback.
//!
//! ```
//! # use letterpress::source::{default_loader, FontSource};
//! let loader = default_loader(None, None);
//! assert_eq!(loader.origin(), "bundled");
//! assert!(loader.font_names().unwrap().contains(&"pixel".to_owned()));
//! let font = loader.font_by_name("pixel.flf").unwrap();
//! assert_eq!(font.header().height.get(), 5);
//! ```
use std::borrow::Cow;
use std::collections::BTreeMap;
use std::fmt::Debug;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use std::{fs, io};

use itertools::Itertools as _;
use thiserror::Error;

use crate::font::{FONT_SUFFIX, Font, FontError};

/// Directories checked by [`discover_font_dir`], relative to the base path, in priority order
pub const FONT_DIR_CANDIDATES: [&str; 3] =
    ["letterpress/fonts", "fonts", "../share/letterpress/fonts"];

/// Something that provides fonts by name
pub trait FontSource: Debug {
    /// A human-readable description of where the fonts come from.
    fn origin(&self) -> String;

    /// The names of all available fonts, without the `.flf` suffix.
    ///
    /// # Errors
    /// [`SourceError::Enumeration`] if the fonts cannot be listed.
    fn font_names(&self) -> Result<Vec<String>, SourceError>;

    /// Decodes the font called `name`; the `.flf` suffix is optional.
    ///
    /// # Errors
    /// [`SourceError::FontNotFound`] if there is no such font, or another [`SourceError`] if it
    /// cannot be read or decoded.
    fn font_by_name(&self, name: &str) -> Result<Font, SourceError>;
}

/// The namespace behind a [`Loader`]
#[derive(Debug, Clone, PartialEq, Eq)]
enum Namespace {
    /// A directory containing `.flf` files; subdirectories are not searched.
    Directory(PathBuf),
    /// The fonts compiled into this crate. Empty without the `fonts` feature.
    Bundled,
}

/// A font source backed by a single [`Namespace`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loader {
    namespace: Namespace,
}

impl Loader {
    /// Loads fonts from the `.flf` files in `dir`.
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        Self {
            namespace: Namespace::Directory(dir.into()),
        }
    }

    /// Loads the bundled fonts.
    #[must_use]
    pub const fn bundled() -> Self {
        Self {
            namespace: Namespace::Bundled,
        }
    }

    fn read(&self, file_name: &str) -> io::Result<Cow<'static, [u8]>> {
        match &self.namespace {
            Namespace::Directory(dir) => fs::read(dir.join(file_name)).map(Cow::Owned),
            Namespace::Bundled => BUNDLED
                .get(file_name)
                .map(|&bytes| Cow::Borrowed(bytes))
                .ok_or_else(|| io::ErrorKind::NotFound.into()),
        }
    }
}

impl FontSource for Loader {
    fn origin(&self) -> String {
        match &self.namespace {
            Namespace::Directory(dir) => dir.display().to_string(),
            Namespace::Bundled => "bundled".to_owned(),
        }
    }

    fn font_names(&self) -> Result<Vec<String>, SourceError> {
        let Namespace::Directory(dir) = &self.namespace else {
            return Ok(BUNDLED
                .keys()
                .filter_map(|file_name| file_name.strip_suffix(FONT_SUFFIX))
                .map(str::to_owned)
                .collect());
        };
        let enumeration_error = |source| SourceError::Enumeration {
            origin: self.origin(),
            source,
        };
        let mut names = Vec::new();
        for entry in fs::read_dir(dir).map_err(enumeration_error)? {
            let entry = entry.map_err(enumeration_error)?;
            if let Some(name) = entry
                .file_name()
                .to_str()
                .and_then(|file_name| file_name.strip_suffix(FONT_SUFFIX))
                .filter(|name| !name.is_empty())
            {
                names.push(name.to_owned());
            }
        }
        names.sort_unstable();
        Ok(names)
    }

    fn font_by_name(&self, name: &str) -> Result<Font, SourceError> {
        // names are file names inside the namespace, never paths
        if name.contains(['/', '\\']) {
            return Err(SourceError::FontNotFound(name.to_owned()));
        }
        let file_name = if name.ends_with(FONT_SUFFIX) {
            Cow::Borrowed(name)
        } else {
            Cow::Owned(format!("{name}{FONT_SUFFIX}"))
        };
        log::debug!("looking up {file_name} in {}", self.origin());
        let bytes = self.read(&file_name).map_err(|source| {
            if source.kind() == io::ErrorKind::NotFound {
                SourceError::FontNotFound(name.to_owned())
            } else {
                SourceError::Read {
                    name: name.to_owned(),
                    source,
                }
            }
        })?;
        let (font, warnings) =
            Font::from_bytes_with_warnings(bytes).map_err(|source| SourceError::Decode {
                name: name.to_owned(),
                source,
            })?;
        for warning in warnings {
            log::debug!("{file_name}: {warning}");
        }
        Ok(font)
    }
}

/// Several font sources, tried in order
///
/// Font names are listed once each, in the order they are first seen. Looking up a font returns
/// the first success; if every source fails, the error from the last source is returned.
#[derive(Debug, Default)]
pub struct CombinedLoader {
    sources: Vec<Box<dyn FontSource + Send + Sync>>,
}

impl CombinedLoader {
    /// An empty source, which provides no fonts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    /// Adds a source with lower priority than all previous ones.
    #[must_use]
    pub fn with(mut self, source: impl FontSource + Send + Sync + 'static) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// The number of sources.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns `true` if there are no sources.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl FontSource for CombinedLoader {
    fn origin(&self) -> String {
        self.sources.iter().map(|source| source.origin()).join(" + ")
    }

    /// Only fails if every source fails, with the error from the last one.
    fn font_names(&self) -> Result<Vec<String>, SourceError> {
        let mut names = Vec::new();
        let mut last_error = None;
        let mut any_listed = self.sources.is_empty();
        for source in &self.sources {
            match source.font_names() {
                Ok(source_names) => {
                    any_listed = true;
                    for name in source_names {
                        if !names.contains(&name) {
                            names.push(name);
                        }
                    }
                }
                Err(error) => {
                    log::warn!("skipping fonts from {}: {error}", source.origin());
                    last_error = Some(error);
                }
            }
        }
        match last_error {
            Some(error) if !any_listed => Err(error),
            _ => Ok(names),
        }
    }

    fn font_by_name(&self, name: &str) -> Result<Font, SourceError> {
        let mut last_error = SourceError::FontNotFound(name.to_owned());
        for source in &self.sources {
            match source.font_by_name(name) {
                Ok(font) => return Ok(font),
                Err(error) => {
                    log::debug!("{name} not available from {}: {error}", source.origin());
                    last_error = error;
                }
            }
        }
        Err(last_error)
    }
}

/// Errors from a [`FontSource`]
#[derive(Debug, Error)]
pub enum SourceError {
    /// No font with this name exists.
    #[error("font {0:?} not found")]
    FontNotFound(String),
    /// The font exists but could not be read.
    #[error("failed to read font {name:?}")]
    Read {
        /// The requested name
        name: String,
        /// The underlying error
        source: io::Error,
    },
    /// The font is not a valid FIGfont.
    #[error("failed to decode font {name:?}")]
    Decode {
        /// The requested name
        name: String,
        /// The underlying error
        source: FontError,
    },
    /// The fonts of a source could not be listed.
    #[error("failed to list fonts in {origin}")]
    Enumeration {
        /// The source's origin
        origin: String,
        /// The underlying error
        source: io::Error,
    },
}

static BUNDLED: LazyLock<BTreeMap<&'static str, &'static [u8]>> = LazyLock::new(bundled_files);

#[cfg(feature = "fonts")]
fn bundled_files() -> BTreeMap<&'static str, &'static [u8]> {
    crate::font::FontFile::ALL
        .iter()
        .map(|file| (file.file_name(), file.as_bytes()))
        .collect()
}

#[cfg(not(feature = "fonts"))]
fn bundled_files() -> BTreeMap<&'static str, &'static [u8]> {
    BTreeMap::new()
}

/// Returns `true` if `dir` directly contains at least one `.flf` file.
#[must_use]
pub fn has_fonts(dir: &Path) -> bool {
    fs::read_dir(dir).is_ok_and(|entries| {
        entries.flatten().any(|entry| {
            entry
                .file_name()
                .to_str()
                .is_some_and(|file_name| file_name.ends_with(FONT_SUFFIX))
        })
    })
}

/// Finds a font directory below `base`, usually the directory of the running executable.
///
/// Returns the first of the [`FONT_DIR_CANDIDATES`] that contains a `.flf` file.
#[must_use]
pub fn discover_font_dir(base: &Path) -> Option<PathBuf> {
    FONT_DIR_CANDIDATES
        .iter()
        .map(|candidate| base.join(candidate))
        .find(|dir| {
            let found = has_fonts(dir);
            log::debug!("probing {} for fonts: {found}", dir.display());
            found
        })
}

/// The font source to use by default.
///
/// An explicit directory, or else one found by [`discover_font_dir`] below `base`, comes first
/// with the bundled fonts as a fallback. Without a usable directory the bundled fonts are used
/// alone.
#[must_use]
pub fn default_loader(
    explicit: Option<&Path>,
    base: Option<&Path>,
) -> Box<dyn FontSource + Send + Sync> {
    let dir = match explicit {
        Some(dir) if has_fonts(dir) => Some(dir.to_path_buf()),
        Some(dir) => {
            log::warn!(
                "no {FONT_SUFFIX} files in {}, using bundled fonts only",
                dir.display()
            );
            None
        }
        None => base.and_then(discover_font_dir),
    };
    match dir {
        Some(dir) => Box::new(
            CombinedLoader::new()
                .with(Loader::directory(dir))
                .with(Loader::bundled()),
        ),
        None => Box::new(Loader::bundled()),
    }
}
