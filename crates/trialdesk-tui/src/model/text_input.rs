/// An in-place text editor: a buffer plus a byte-offset cursor that always
/// sits on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    pub buffer: String,
    pub cursor: usize,
    /// Whether newlines may be inserted.
    pub multiline: bool,
}

impl TextInput {
    /// Start editing `value` with the cursor at the end.
    pub fn new(value: &str, multiline: bool) -> Self {
        Self {
            buffer: value.to_string(),
            cursor: value.len(),
            multiline,
        }
    }

    pub fn insert(&mut self, ch: char) {
        if ch == '\n' && !self.multiline {
            return;
        }
        self.buffer.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn newline(&mut self) {
        self.insert('\n');
    }

    /// Delete the char before the cursor.
    pub fn backspace(&mut self) {
        if self.cursor > 0 {
            let prev = self.prev_boundary();
            self.buffer.drain(prev..self.cursor);
            self.cursor = prev;
        }
    }

    /// Delete the char under the cursor.
    pub fn delete_forward(&mut self) {
        if self.cursor < self.buffer.len() {
            let next = self.next_boundary();
            self.buffer.drain(self.cursor..next);
        }
    }

    pub fn left(&mut self) {
        self.cursor = self.prev_boundary();
    }

    pub fn right(&mut self) {
        self.cursor = self.next_boundary();
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.buffer.len();
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.cursor
            + self.buffer[self.cursor..]
                .chars()
                .next()
                .map(|c| c.len_utf8())
                .unwrap_or(0)
    }

    /// Text before and after the cursor, for rendering.
    pub fn split_at_cursor(&self) -> (&str, &str) {
        self.buffer.split_at(self.cursor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_multibyte_text() {
        let mut input = TextInput::new("试验", false);
        input.backspace();
        assert_eq!(input.buffer, "试");
        input.insert('药');
        input.left();
        input.left();
        input.insert('新');
        assert_eq!(input.buffer, "新试药");
        input.delete_forward();
        assert_eq!(input.buffer, "新药");
        input.end();
        input.right();
        assert_eq!(input.cursor, input.buffer.len());
    }

    #[test]
    fn newline_only_when_multiline() {
        let mut single = TextInput::new("a", false);
        single.newline();
        assert_eq!(single.buffer, "a");

        let mut multi = TextInput::new("a", true);
        multi.newline();
        multi.insert('b');
        assert_eq!(multi.buffer, "a\nb");
    }

    #[test]
    fn backspace_at_start_is_noop() {
        let mut input = TextInput::new("ab", false);
        input.home();
        input.backspace();
        assert_eq!(input.buffer, "ab");
        assert_eq!(input.split_at_cursor(), ("", "ab"));
    }
}
