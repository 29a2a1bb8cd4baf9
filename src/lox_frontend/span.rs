use std::fmt;

/// Location of a single character in the source.
#[derive(Debug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy, Default)]
pub struct CodePosition {
    pub byte_pos: usize,
    pub line_no: usize,
    pub column_no: usize,
}

/// Half-open range of source covered by a token or syntax node.
#[derive(Debug, PartialEq, Eq, Clone, Copy, Default)]
pub struct Span {
    pub start_pos: CodePosition,
    pub end_pos: CodePosition,
}

impl CodePosition {
    pub fn new(byte_pos: usize, line_no: usize, column_no: usize) -> Self {
        CodePosition {
            byte_pos,
            line_no,
            column_no,
        }
    }
}

impl fmt::Display for CodePosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}:{}", self.line_no, self.column_no)
    }
}

impl Span {
    pub fn new(start_pos: CodePosition, end_pos: CodePosition) -> Self {
        Span { start_pos, end_pos }
    }

    /// Smallest span covering both `self` and `other`.
    pub fn extend(&self, other: Self) -> Self {
        Span {
            start_pos: std::cmp::min(self.start_pos, other.start_pos),
            end_pos: std::cmp::max(self.end_pos, other.end_pos),
        }
    }

    /// Line the span starts on. Used when reporting errors.
    pub fn line(&self) -> usize {
        self.start_pos.line_no
    }

    /// The first `len` bytes of a span that starts with an ASCII keyword.
    pub fn head(&self, len: usize) -> Self {
        let mut end_pos = self.start_pos;
        end_pos.byte_pos += len;
        end_pos.column_no += len;
        Span {
            start_pos: self.start_pos,
            end_pos: std::cmp::min(end_pos, self.end_pos),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start_pos.byte_pos == self.end_pos.byte_pos
    }

    pub fn extract_string<'a>(&self, source: &'a str) -> Option<&'a str> {
        source.get(self.start_pos.byte_pos..self.end_pos.byte_pos)
    }
}
