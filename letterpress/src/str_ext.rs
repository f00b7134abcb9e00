use crate::font::PrintDirection;

/// Helpers on the rows of FIGcharacters, one `char` per column
pub(crate) trait RowExt {
    /// The row in placement order: reversed when printing right-to-left.
    fn ordered(&self, direction: PrintDirection) -> Vec<char>;

    fn leading_blanks(&self) -> usize;

    fn trailing_blanks(&self) -> usize;
}

impl RowExt for [char] {
    fn ordered(&self, direction: PrintDirection) -> Vec<char> {
        match direction {
            PrintDirection::LeftToRight => self.to_vec(),
            PrintDirection::RightToLeft => self.iter().rev().copied().collect(),
        }
    }

    fn leading_blanks(&self) -> usize {
        self.iter().take_while(|&&c| c == ' ').count()
    }

    fn trailing_blanks(&self) -> usize {
        self.iter().rev().take_while(|&&c| c == ' ').count()
    }
}

#[cfg(test)]
mod tests {
    use super::RowExt as _;
    use crate::font::PrintDirection;

    fn row(text: &str) -> Vec<char> {
        text.chars().collect()
    }

    #[test]
    fn blanks() {
        assert_eq!(row("  ab ").leading_blanks(), 2);
        assert_eq!(row("  ab ").trailing_blanks(), 1);
        assert_eq!(row("   ").leading_blanks(), 3);
        assert_eq!(row("").trailing_blanks(), 0);
        assert_eq!(row(" \u{2588}\u{2588}  ").trailing_blanks(), 2);
    }

    #[test]
    fn ordered() {
        assert_eq!(row("/_ ").ordered(PrintDirection::LeftToRight), row("/_ "));
        assert_eq!(row("/\u{2588} ").ordered(PrintDirection::RightToLeft), row(" \u{2588}/"));
    }
}
