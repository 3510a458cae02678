use ropey::Rope;

use super::format::Edit;
use super::selection::Selection;

/// Cursor position in the editor buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    /// Zero-based line index.
    pub line: usize,
    /// Zero-based column (byte offset within the line).
    pub col: usize,
    /// Remembered column for vertical movement (sticky column).
    col_memory: usize,
}

impl Cursor {
    /// Create a cursor at line 0, column 0.
    pub const fn new() -> Self {
        Self {
            line: 0,
            col: 0,
            col_memory: 0,
        }
    }

    /// Create a cursor at a specific position.
    pub const fn at(line: usize, col: usize) -> Self {
        Self {
            line,
            col,
            col_memory: col,
        }
    }

    /// Update column and reset column memory to match.
    const fn set_col(&mut self, col: usize) {
        self.col = col;
        self.col_memory = col;
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::new()
    }
}

/// Direction for cursor movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// A text buffer backed by a rope data structure.
///
/// The cursor is tracked as line/byte-column for editing and exposed as a
/// char offset for the search and formatting layers. An optional anchor turns
/// the span between anchor and cursor into the active selection.
pub struct EditorBuffer {
    rope: Rope,
    cursor: Cursor,
    anchor: Option<usize>,
    revision: u64,
}

impl EditorBuffer {
    /// Create a new buffer from a string.
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            cursor: Cursor::new(),
            anchor: None,
            revision: 0,
        }
    }

    /// Create an empty buffer.
    pub fn empty() -> Self {
        Self::from_text("")
    }

    /// The current cursor position.
    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    /// Monotonic counter bumped on every text mutation.
    pub const fn revision(&self) -> u64 {
        self.revision
    }

    /// Total number of lines in the buffer.
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Total number of chars in the buffer.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// Get the content of a line (without trailing newline).
    pub fn line_at(&self, line_idx: usize) -> Option<String> {
        if line_idx >= self.rope.len_lines() {
            return None;
        }
        let line = self.rope.line(line_idx);
        let s = line.to_string();
        Some(s.trim_end_matches('\n').trim_end_matches('\r').to_string())
    }

    /// Length of a line in bytes (without trailing newline).
    pub fn line_len(&self, line_idx: usize) -> usize {
        self.line_at(line_idx).map_or(0, |s| s.len())
    }

    /// The full text content of the buffer.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Char offset of the first char of `line_idx`.
    pub fn line_start_offset(&self, line_idx: usize) -> usize {
        self.rope
            .line_to_char(line_idx.min(self.rope.len_lines().saturating_sub(1)))
    }

    // --- Offsets and selection ---

    /// The cursor as a char offset into the text.
    pub fn cursor_offset(&self) -> usize {
        let line_start = self.rope.line_to_char(self.cursor.line);
        let line_str = self.line_at(self.cursor.line).unwrap_or_default();
        let byte_col = self.cursor.col.min(line_str.len());
        line_start + line_str[..byte_col].chars().count()
    }

    /// Place the cursor at a char offset, clamped to the text. Keeps the anchor.
    pub fn set_cursor_offset(&mut self, offset: usize) {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        let line_start = self.rope.line_to_char(line);
        let col = self
            .rope
            .slice(line_start..offset)
            .chars()
            .map(char::len_utf8)
            .sum();
        self.cursor.line = line;
        self.cursor.set_col(col);
    }

    /// The active selection, or an empty selection at the cursor.
    pub fn selection(&self) -> Selection {
        let cursor = self.cursor_offset();
        self.anchor
            .map_or_else(|| Selection::cursor(cursor), |a| Selection::new(a, cursor))
    }

    pub fn has_selection(&self) -> bool {
        !self.selection().is_empty()
    }

    /// Select a range; the cursor lands on its end.
    pub fn select(&mut self, selection: Selection) {
        let selection = selection.clamp(self.rope.len_chars());
        if selection.is_empty() {
            self.anchor = None;
        } else {
            self.anchor = Some(selection.start);
        }
        self.set_cursor_offset(selection.end);
    }

    pub fn select_all(&mut self) {
        self.select(Selection::new(0, self.rope.len_chars()));
    }

    pub const fn clear_selection(&mut self) {
        self.anchor = None;
    }

    /// Text covered by the active selection.
    pub fn selected_text(&self) -> String {
        let sel = self.selection();
        self.rope.slice(sel.start..sel.end).to_string()
    }

    /// Replace the active selection (or insert at the cursor) with `s`.
    pub fn replace_selection(&mut self, s: &str) {
        let sel = self.selection();
        self.anchor = None;
        if !sel.is_empty() {
            self.rope.remove(sel.range());
        }
        if !s.is_empty() {
            self.rope.insert(sel.start, s);
        }
        if !sel.is_empty() || !s.is_empty() {
            self.revision += 1;
        }
        self.set_cursor_offset(sel.start + s.chars().count());
    }

    /// Replace the whole text, clamping the cursor to the new content.
    pub fn set_text(&mut self, text: &str) {
        let offset = self.cursor_offset();
        self.rope = Rope::from_str(text);
        self.anchor = None;
        self.revision += 1;
        self.set_cursor_offset(offset);
    }

    /// Apply a formatting or search edit: new text plus the resulting selection.
    pub fn apply_edit(&mut self, edit: &Edit) {
        self.rope = Rope::from_str(&edit.text);
        self.anchor = None;
        self.revision += 1;
        self.select(edit.selection);
    }

    // --- Editing ---

    /// Insert a character at the cursor position, replacing any selection.
    pub fn insert_char(&mut self, ch: char) {
        if self.has_selection() {
            let mut buf = [0u8; 4];
            self.replace_selection(ch.encode_utf8(&mut buf));
            return;
        }
        self.anchor = None;
        let char_idx = self.cursor_offset();
        self.rope.insert_char(char_idx, ch);
        self.cursor.set_col(self.cursor.col + ch.len_utf8());
        self.revision += 1;
    }

    /// Insert a string at the cursor position, replacing any selection.
    pub fn insert_str(&mut self, s: &str) {
        if s.is_empty() && !self.has_selection() {
            return;
        }
        self.replace_selection(s);
    }

    /// Split the current line at the cursor (Enter key).
    pub fn split_line(&mut self) {
        if self.has_selection() {
            self.replace_selection("\n");
            return;
        }
        self.anchor = None;
        let char_idx = self.cursor_offset();
        self.rope.insert_char(char_idx, '\n');
        self.cursor.line += 1;
        self.cursor.set_col(0);
        self.revision += 1;
    }

    /// Delete the selection, or the character before the cursor (Backspace).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_back(&mut self) -> bool {
        if self.has_selection() {
            self.replace_selection("");
            return true;
        }
        self.anchor = None;
        let char_idx = self.cursor_offset();
        if char_idx == 0 {
            return false;
        }
        self.rope.remove(char_idx - 1..char_idx);
        self.set_cursor_offset(char_idx - 1);
        self.revision += 1;
        true
    }

    /// Delete the selection, or the character at the cursor (Delete key).
    ///
    /// Returns `true` if anything was deleted.
    pub fn delete_forward(&mut self) -> bool {
        if self.has_selection() {
            self.replace_selection("");
            return true;
        }
        self.anchor = None;
        let char_idx = self.cursor_offset();
        if char_idx >= self.rope.len_chars() {
            return false;
        }
        self.rope.remove(char_idx..=char_idx);
        self.revision += 1;
        true
    }

    // --- Movement ---

    /// Move the cursor, optionally extending the selection.
    pub fn move_cursor(&mut self, direction: Direction, extend: bool) {
        self.prepare_move(extend);
        match direction {
            Direction::Left => self.move_left(),
            Direction::Right => self.move_right(),
            Direction::Up => self.move_up(),
            Direction::Down => self.move_down(),
        }
    }

    /// Move cursor to the beginning of the line (Home).
    pub fn move_home(&mut self, extend: bool) {
        self.prepare_move(extend);
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the line (End).
    pub fn move_end(&mut self, extend: bool) {
        self.prepare_move(extend);
        let len = self.line_len(self.cursor.line);
        self.cursor.set_col(len);
    }

    /// Move cursor one word to the left (Ctrl+Left).
    pub fn move_word_left(&mut self, extend: bool) {
        self.prepare_move(extend);
        if self.cursor.col == 0 {
            if self.cursor.line > 0 {
                self.cursor.line -= 1;
                self.cursor.set_col(self.line_len(self.cursor.line));
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let trimmed = line[..self.cursor.col].trim_end();
        if trimmed.is_empty() {
            self.cursor.set_col(0);
            return;
        }

        let pos = trimmed
            .rfind(|c: char| !c.is_alphanumeric() && c != '_')
            .map_or(0, |i| i + trimmed[i..].chars().next().map_or(1, char::len_utf8));
        self.cursor.set_col(pos);
    }

    /// Move cursor one word to the right (Ctrl+Right).
    pub fn move_word_right(&mut self, extend: bool) {
        self.prepare_move(extend);
        let line_len = self.line_len(self.cursor.line);

        if self.cursor.col >= line_len {
            if self.cursor.line + 1 < self.line_count() {
                self.cursor.line += 1;
                self.cursor.set_col(0);
            }
            return;
        }

        let line = self.line_at(self.cursor.line).unwrap_or_default();
        let after = &line[self.cursor.col..];
        let word_end = after
            .find(|c: char| !c.is_alphanumeric() && c != '_')
            .unwrap_or(after.len());
        let rest = &after[word_end..];
        let space_end = rest
            .find(|c: char| c.is_alphanumeric() || c == '_')
            .unwrap_or(rest.len());

        self.cursor.set_col(self.cursor.col + word_end + space_end);
    }

    /// Move cursor to a specific line and column, dropping the selection.
    pub fn move_to(&mut self, line: usize, col: usize) {
        self.anchor = None;
        let max_line = self.line_count().saturating_sub(1);
        self.cursor.line = line.min(max_line);
        let line_str = self.line_at(self.cursor.line).unwrap_or_default();
        let mut col = col.min(line_str.len());
        while !line_str.is_char_boundary(col) {
            col -= 1;
        }
        self.cursor.set_col(col);
    }

    /// Move cursor to the start of the buffer (Ctrl+Home).
    pub fn move_to_start(&mut self, extend: bool) {
        self.prepare_move(extend);
        self.cursor.line = 0;
        self.cursor.set_col(0);
    }

    /// Move cursor to the end of the buffer (Ctrl+End).
    pub fn move_to_end(&mut self, extend: bool) {
        self.prepare_move(extend);
        let last_line = self.line_count().saturating_sub(1);
        self.cursor.line = last_line;
        self.cursor.set_col(self.line_len(last_line));
    }

    // --- Private helpers ---

    fn prepare_move(&mut self, extend: bool) {
        if extend {
            if self.anchor.is_none() {
                self.anchor = Some(self.cursor_offset());
            }
        } else {
            self.anchor = None;
        }
    }

    fn move_left(&mut self) {
        if self.cursor.col > 0 {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let before = &line[..self.cursor.col];
            let prev_char_len = before.chars().next_back().map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col - prev_char_len);
        } else if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.set_col(self.line_len(self.cursor.line));
        }
    }

    fn move_right(&mut self) {
        let line_len = self.line_len(self.cursor.line);
        if self.cursor.col < line_len {
            let line = self.line_at(self.cursor.line).unwrap_or_default();
            let next_char_len = line[self.cursor.col..]
                .chars()
                .next()
                .map_or(1, char::len_utf8);
            self.cursor.set_col(self.cursor.col + next_char_len);
        } else if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.set_col(0);
        }
    }

    fn move_up(&mut self) {
        if self.cursor.line > 0 {
            self.cursor.line -= 1;
            self.cursor.col = self.clamp_col(self.cursor.line, self.cursor.col_memory);
        }
    }

    fn move_down(&mut self) {
        if self.cursor.line + 1 < self.line_count() {
            self.cursor.line += 1;
            self.cursor.col = self.clamp_col(self.cursor.line, self.cursor.col_memory);
        }
    }

    fn clamp_col(&self, line_idx: usize, col: usize) -> usize {
        let line = self.line_at(line_idx).unwrap_or_default();
        let mut col = col.min(line.len());
        while !line.is_char_boundary(col) {
            col -= 1;
        }
        col
    }
}

impl std::fmt::Debug for EditorBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EditorBuffer")
            .field(
                "rope",
                &format_args!("Rope({} lines)", self.rope.len_lines()),
            )
            .field("cursor", &self.cursor)
            .field("anchor", &self.anchor)
            .field("revision", &self.revision)
            .finish()
    }
}

impl Default for EditorBuffer {
    fn default() -> Self {
        Self::empty()
    }
}
