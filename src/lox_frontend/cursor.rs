use super::span::CodePosition;
use std::iter::Peekable;
use std::str::CharIndices;

/// Character stream over the source that tracks line/column as it advances.
#[derive(Debug, Clone)]
pub struct Cursor<'src> {
    source: &'src str,
    char_iterator: Peekable<CharIndices<'src>>,
    position: CodePosition,
}

impl<'src> Cursor<'src> {
    pub fn new(source: &'src str) -> Self {
        Cursor {
            source,
            char_iterator: source.char_indices().peekable(),
            position: CodePosition::new(0, 1, 1),
        }
    }

    pub fn get_position(&self) -> CodePosition {
        self.position
    }

    pub fn is_at_end(&mut self) -> bool {
        self.peek().is_none()
    }

    /// Byte offset of the next unconsumed character.
    pub fn offset(&mut self) -> usize {
        self.peek().map_or(self.source.len(), |(idx, _)| idx)
    }

    pub fn peek(&mut self) -> Option<(usize, char)> {
        self.char_iterator.peek().copied()
    }

    pub fn peek_next(&mut self) -> Option<(usize, char)> {
        let mut lookahead = self.clone();
        lookahead.take();
        lookahead.peek()
    }

    pub fn take(&mut self) -> Option<(usize, char)> {
        let (byte_idx, ch) = self.char_iterator.next()?;

        self.position.byte_pos = self.offset();
        if ch == '\n' {
            self.position.line_no += 1;
            self.position.column_no = 1;
        } else {
            self.position.column_no += 1;
        }

        Some((byte_idx, ch))
    }

    /// Consumes the next character if it equals `target`.
    pub fn take_if(&mut self, target: char) -> bool {
        match self.peek() {
            Some((_, ch)) if ch == target => {
                self.take();
                true
            }
            _ => false,
        }
    }

    /// Consumes the next two characters if they are exactly `first` then `second`.
    pub fn take_if_pair(&mut self, first: char, second: char) -> bool {
        let matches = matches!(self.peek(), Some((_, ch)) if ch == first)
            && matches!(self.peek_next(), Some((_, ch)) if ch == second);
        if matches {
            self.take();
            self.take();
        }
        matches
    }

    /// Consumes characters while they satisfy `condition`.
    pub fn take_while<F>(&mut self, condition: F)
    where
        F: Fn(char) -> bool,
    {
        while let Some((_, ch)) = self.peek() {
            if !condition(ch) {
                break;
            }
            self.take();
        }
    }

    pub fn take_until<F>(&mut self, condition: F)
    where
        F: Fn(char) -> bool,
    {
        self.take_while(|ch| !condition(ch));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_tracks_lines() {
        let mut cursor = Cursor::new("ab\ncd");
        cursor.take_until(|ch| ch == 'c');

        let position = cursor.get_position();
        assert_eq!(position.line_no, 2);
        assert_eq!(position.column_no, 1);
        assert_eq!(position.byte_pos, 3);
    }

    #[test]
    fn test_take_if_pair() {
        let mut cursor = Cursor::new("*/x");
        assert!(!cursor.take_if_pair('/', '*'));
        assert!(cursor.take_if_pair('*', '/'));
        assert_eq!(cursor.take(), Some((2, 'x')));
        assert!(cursor.is_at_end());
    }
}
