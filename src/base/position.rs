/// Row/column positions for syntax nodes
///
/// Rows and columns are 0-indexed and columns count bytes, so a point can be
/// turned back into a byte offset without looking at character widths.
use text_size::{TextRange, TextSize};

/// A position in source text (0-indexed row, byte column)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Point {
    pub row: usize,
    pub column: usize,
}

impl Point {
    pub fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

impl std::fmt::Display for Point {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.column)
    }
}

/// Byte range paired with its start/end points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PointRange {
    pub range: TextRange,
    pub start: Point,
    pub end: Point,
}

/// Maps byte offsets to points and back for one source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    /// Offset of the first byte of every line; always starts with 0.
    line_starts: Vec<TextSize>,
    len: TextSize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![TextSize::new(0)];
        for (idx, byte) in text.bytes().enumerate() {
            if byte == b'\n' {
                line_starts.push(TextSize::new(idx as u32 + 1));
            }
        }
        Self {
            line_starts,
            len: TextSize::of(text),
        }
    }

    /// Number of rows a point can address (a trailing newline opens one more).
    pub fn row_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn len(&self) -> TextSize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == TextSize::new(0)
    }

    /// Point of a byte offset. Offsets past the end clamp to the end.
    pub fn point(&self, offset: TextSize) -> Point {
        let offset = offset.min(self.len);
        let row = match self.line_starts.binary_search(&offset) {
            Ok(row) => row,
            Err(next) => next - 1,
        };
        let column = u32::from(offset - self.line_starts[row]) as usize;
        Point::new(row, column)
    }

    /// Byte offset of a point, if the point lies inside the text.
    pub fn offset(&self, point: Point) -> Option<TextSize> {
        let start = *self.line_starts.get(point.row)?;
        let line_end = self
            .line_starts
            .get(point.row + 1)
            .copied()
            .unwrap_or(self.len);
        let offset = start + TextSize::new(u32::try_from(point.column).ok()?);
        (offset <= line_end).then_some(offset)
    }

    pub fn point_range(&self, range: TextRange) -> PointRange {
        PointRange {
            range,
            start: self.point(range.start()),
            end: self.point(range.end()),
        }
    }
}
