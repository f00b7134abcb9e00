//! Collection of `.flf` fonts bundled with the
//! [`letterpress`](https://crates.io/crates/letterpress) crate.
//!
//! The files are compiled into the binary, so they are always available as a fallback when no
//! font directory is installed next to the executable.

macro_rules! fonts {
    ($($name:ident => $file_name:expr,)*) => {

        /// Bundled fonts
        #[derive(Debug, Clone, Copy, PartialEq, Eq)]
        #[non_exhaustive]
        pub enum FontFile {
            $(
                #[doc = concat!("Font `", $file_name, ".flf`")]
                $name,
            )*
        }

        impl FontFile {
            /// Every bundled font, sorted by file name
            pub const ALL: [Self; const{0 $(+ {_ = $file_name; 1} )*}] = [$(Self::$name),*];

            /// The contents of the font file
            #[must_use]
            pub const fn as_bytes(&self) -> &'static [u8] {
                match self {
                    $(Self::$name => include_bytes!(concat!("../fonts/", $file_name, ".flf")),)*
                }
            }

            /// The file stem, which is also the logical font name
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    $(Self::$name => $file_name,)*
                }
            }

            /// The file name, including the `.flf` suffix
            #[must_use]
            pub const fn file_name(&self) -> &'static str {
                match self {
                    $(Self::$name => concat!($file_name, ".flf"),)*
                }
            }
        }

    };
}

fonts! {
    Pixel => "pixel",
    Term => "term",
    Wide => "wide",
}
