//! Source text and forward-only read positions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// A place in the source: byte offset plus 1-based line and column.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };
}

impl Default for Position {
    fn default() -> Self {
        Self::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Shared view of the text being tokenized and the next unread character.
///
/// Cloning is cheap: the text is reference counted and only the position is
/// copied. A cursor never moves backwards.
#[derive(Clone)]
pub struct Cursor {
    source: Arc<str>,
    position: Position,
}

impl Cursor {
    pub fn new(source: impl Into<Arc<str>>) -> Self {
        Self {
            source: source.into(),
            position: Position::START,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn has_more(&self) -> bool {
        self.position.offset < self.source.len()
    }

    /// The next unread character.
    pub fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    /// Consume one character. A newline moves to column 1 of the next line.
    pub fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position.offset += ch.len_utf8();
        if ch == '\n' {
            self.position.line += 1;
            self.position.column = 1;
        } else {
            self.position.column += 1;
        }
        Some(ch)
    }

    /// Text from `start` up to the current position.
    pub(crate) fn slice_from(&self, start: usize) -> &str {
        &self.source[start..self.position.offset]
    }

    fn rest(&self) -> &str {
        &self.source[self.position.offset..]
    }
}

impl fmt::Debug for Cursor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("len", &self.source.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_lines_and_columns() {
        let mut cursor = Cursor::new("ab\ncd");
        assert_eq!(cursor.advance(), Some('a'));
        assert_eq!(cursor.advance(), Some('b'));
        assert_eq!(cursor.position().column, 3);

        assert_eq!(cursor.advance(), Some('\n'));
        assert_eq!(
            cursor.position(),
            Position {
                offset: 3,
                line: 2,
                column: 1
            }
        );
        assert_eq!(cursor.peek(), Some('c'));
    }

    #[test]
    fn exhausted_cursor_stays_put() {
        let mut cursor = Cursor::new("x");
        cursor.advance();
        assert!(!cursor.has_more());
        assert_eq!(cursor.advance(), None);
        assert_eq!(cursor.position().offset, 1);
    }

    #[test]
    fn multi_byte_chars_advance_by_their_length() {
        let mut cursor = Cursor::new("é1");
        cursor.advance();
        assert_eq!(cursor.position().offset, 2);
        assert_eq!(cursor.position().column, 2);
        assert_eq!(cursor.peek(), Some('1'));
    }

    #[test]
    fn clones_share_text_but_not_position() {
        let mut cursor = Cursor::new("12");
        let snapshot = cursor.clone();
        cursor.advance();

        assert_eq!(snapshot.position().offset, 0);
        assert_eq!(cursor.slice_from(0), "1");
        assert_eq!(snapshot.peek(), Some('1'));
    }
}
