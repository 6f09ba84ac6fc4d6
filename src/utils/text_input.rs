use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// What a key press did to a [`TextInput`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputOutcome {
    /// The text changed; callers should re-validate.
    Edited,
    /// Only the cursor moved.
    Moved,
    /// The key is not a text editing key.
    Ignored,
}

impl InputOutcome {
    pub fn is_handled(&self) -> bool {
        !matches!(self, InputOutcome::Ignored)
    }
}

/// A single-line text field with a character-indexed cursor.
///
/// Accepts any printable character, so Spanish names such as "Ñuñoa" or
/// "José" can be typed directly.
///
/// # Example
/// ```
/// use servimatch::utils::text_input::TextInput;
///
/// let mut input = TextInput::new();
/// input.insert_char('ñ');
/// input.insert_char('u');
/// assert_eq!(input.text(), "ñu");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TextInput {
    text: String,
    cursor: usize,
    max_chars: Option<usize>,
}

impl TextInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a text input with initial text, cursor at the end.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut input = Self::new();
        input.set_text(text);
        input
    }

    /// Cap the number of characters that can be typed.
    pub fn max_chars(mut self, limit: usize) -> Self {
        self.max_chars = Some(limit);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    /// Check if the text is empty (ignoring whitespace).
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Set the text and move cursor to end.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
        self.cursor = self.char_count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.text.len())
    }

    /// Insert a character at the cursor. Control characters and input past the limit are dropped.
    pub fn insert_char(&mut self, c: char) -> bool {
        if c.is_control() {
            return false;
        }
        if self.max_chars.is_some_and(|max| self.char_count() >= max) {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.insert(at, c);
        self.cursor += 1;
        true
    }

    /// Delete the character before the cursor.
    pub fn backspace(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let at = self.byte_index(self.cursor - 1);
        self.text.remove(at);
        self.cursor -= 1;
        true
    }

    /// Delete the character under the cursor.
    pub fn delete(&mut self) -> bool {
        if self.cursor >= self.char_count() {
            return false;
        }
        let at = self.byte_index(self.cursor);
        self.text.remove(at);
        true
    }

    pub fn move_left(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.char_count() {
            self.cursor += 1;
        }
    }

    pub fn move_home(&mut self) {
        self.cursor = 0;
    }

    pub fn move_end(&mut self) {
        self.cursor = self.char_count();
    }

    /// Apply an editing key. Ctrl/Alt chords are left to the caller.
    pub fn handle_key(&mut self, key: KeyEvent) -> InputOutcome {
        if key
            .modifiers
            .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
        {
            return InputOutcome::Ignored;
        }
        let edited = match key.code {
            KeyCode::Char(c) => self.insert_char(c),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => self.delete(),
            KeyCode::Left => {
                self.move_left();
                return InputOutcome::Moved;
            }
            KeyCode::Right => {
                self.move_right();
                return InputOutcome::Moved;
            }
            KeyCode::Home => {
                self.move_home();
                return InputOutcome::Moved;
            }
            KeyCode::End => {
                self.move_end();
                return InputOutcome::Moved;
            }
            _ => return InputOutcome::Ignored,
        };
        if edited {
            InputOutcome::Edited
        } else {
            InputOutcome::Moved
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_insert_in_middle() {
        let mut input = TextInput::with_text("hello");
        input.move_left();
        input.move_left();
        input.move_left();
        input.insert_char('x');
        assert_eq!(input.text(), "hexllo");
        assert_eq!(input.cursor(), 3);
    }

    #[test]
    fn test_spanish_characters() {
        let mut input = TextInput::with_text("Nuoa");
        input.move_home();
        input.move_right();
        input.move_right();
        input.insert_char('ñ');
        assert_eq!(input.text(), "Nuñoa");
        input.move_home();
        input.delete();
        input.insert_char('Ñ');
        assert_eq!(input.text(), "Ñuñoa");
        input.move_end();
        input.backspace();
        assert_eq!(input.text(), "Ñuño");
    }

    #[test]
    fn test_backspace_and_delete_at_edges() {
        let mut input = TextInput::with_text("ab");
        assert!(!input.delete());
        input.move_home();
        assert!(!input.backspace());
        assert_eq!(input.text(), "ab");
    }

    #[test]
    fn test_max_chars() {
        let mut input = TextInput::new().max_chars(3);
        for c in "abcd".chars() {
            input.insert_char(c);
        }
        assert_eq!(input.text(), "abc");
    }

    #[test]
    fn test_handle_key_outcomes() {
        let mut input = TextInput::new();
        assert_eq!(input.handle_key(key(KeyCode::Char('a'))), InputOutcome::Edited);
        assert_eq!(input.handle_key(key(KeyCode::Left)), InputOutcome::Moved);
        assert_eq!(input.handle_key(key(KeyCode::Backspace)), InputOutcome::Moved);
        assert_eq!(input.handle_key(key(KeyCode::Enter)), InputOutcome::Ignored);
        assert_eq!(
            input.handle_key(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL)),
            InputOutcome::Ignored
        );
        assert_eq!(input.text(), "a");
    }

    #[test]
    fn test_whitespace_only_is_empty() {
        assert!(TextInput::with_text("   ").is_empty());
        assert!(!TextInput::with_text(" a ").is_empty());
    }
}
