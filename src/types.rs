//! Core types used throughout the project.

use serde::Serialize;

/// A range in a catalog file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct SourceRange {
    pub start: SourcePosition,
    pub end: SourcePosition,
}

/// A position in a catalog file (0-indexed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize)]
pub struct SourcePosition {
    pub line: u32,
    pub character: u32,
}

impl std::fmt::Display for SourcePosition {
    /// Renders as the 1-indexed `line:column` editors expect.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line.saturating_add(1), self.character.saturating_add(1))
    }
}

impl SourceRange {
    /// Creates an empty range at `position`.
    #[must_use]
    pub const fn at(position: SourcePosition) -> Self {
        Self { start: position, end: position }
    }

    /// Checks if a position is within this range.
    #[must_use]
    pub const fn contains(&self, position: SourcePosition) -> bool {
        if position.line < self.start.line {
            return false;
        }
        if position.line == self.start.line && position.character < self.start.character {
            return false;
        }
        if position.line > self.end.line {
            return false;
        }
        if position.line == self.end.line && position.character > self.end.character {
            return false;
        }
        true
    }
}

/// Maps byte offsets of a document to line/character positions.
///
/// Characters are counted in `char`s, not bytes.
#[derive(Debug, Clone)]
pub struct LineIndex<'a> {
    /// The indexed document.
    text: &'a str,
    /// Byte offset at which each line starts.
    line_starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        let line_starts = std::iter::once(0)
            .chain(text.match_indices('\n').map(|(offset, _)| offset + 1))
            .collect();
        Self { text, line_starts }
    }

    /// Position of the byte `offset`. Offsets past the end clamp to the end.
    #[must_use]
    pub fn position(&self, offset: usize) -> SourcePosition {
        let offset = offset.min(self.text.len());
        let line = self.line_starts.partition_point(|&start| start <= offset).saturating_sub(1);
        let line_start = self.line_starts.get(line).copied().unwrap_or(0);
        let character = self
            .text
            .get(line_start..offset)
            .map_or(offset - line_start, |prefix| prefix.chars().count());

        SourcePosition {
            line: u32::try_from(line).unwrap_or(u32::MAX),
            character: u32::try_from(character).unwrap_or(u32::MAX),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use googletest::prelude::*;
    use rstest::rstest;

    use super::*;

    const fn pos(line: u32, character: u32) -> SourcePosition {
        SourcePosition { line, character }
    }

    const fn range(start_line: u32, start_char: u32, end_line: u32, end_char: u32) -> SourceRange {
        SourceRange { start: pos(start_line, start_char), end: pos(end_line, end_char) }
    }

    #[rstest]
    #[case::before_start_line(pos(0, 5), range(1, 5, 2, 10), false)]
    #[case::before_start_char(pos(1, 4), range(1, 5, 2, 10), false)]
    #[case::at_start(pos(1, 5), range(1, 5, 2, 10), true)]
    #[case::middle_line(pos(1, 10), range(1, 5, 2, 10), true)]
    #[case::at_end(pos(2, 10), range(1, 5, 2, 10), true)]
    #[case::after_end_char(pos(2, 11), range(1, 5, 2, 10), false)]
    #[case::after_end_line(pos(3, 0), range(1, 5, 2, 10), false)]
    fn test_contains(
        #[case] position: SourcePosition,
        #[case] range: SourceRange,
        #[case] expected: bool,
    ) {
        assert_that!(range.contains(position), eq(expected));
    }

    #[rstest]
    #[case::start_of_document(0, pos(0, 0))]
    #[case::first_line(3, pos(0, 3))]
    #[case::newline_belongs_to_its_line(4, pos(0, 4))]
    #[case::second_line_start(5, pos(1, 0))]
    #[case::second_line_end(14, pos(1, 9))]
    #[case::third_line(16, pos(2, 1))]
    #[case::past_the_end(100, pos(2, 3))]
    fn test_line_index_position(#[case] offset: usize, #[case] expected: SourcePosition) {
        let index = LineIndex::new("<TS>\n<context>\n<na");

        assert_that!(index.position(offset), eq(expected));
    }

    #[rstest]
    fn test_line_index_counts_chars_not_bytes() {
        let index = LineIndex::new("ÄÖ<x>");

        assert_that!(index.position(4), eq(pos(0, 2)));
    }

    #[rstest]
    fn test_display_is_one_indexed() {
        assert_that!(pos(0, 0).to_string(), eq("1:1"));
        assert_that!(pos(9, 4).to_string(), eq("10:5"));
    }
}
