//! Markdown formatting helpers.
//!
//! Every helper is a pure transformation `(text, selection) -> Edit`; the
//! caller applies the result to the buffer. Offsets are char offsets.

use super::selection::Selection;

const TABLE_SKELETON: &str = "| Column1 | Column2 |\n|---------|---------|\n| Data1   | Data2   |\n";
const LINK_PLACEHOLDER_URL: &str = "https://example.com";
const CODE_PLACEHOLDER: &str = "Your code here";

/// Result of a text transformation: the new text and where the selection ends up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub text: String,
    pub selection: Selection,
}

/// Formatting actions offered by the Format menu and shortcuts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatAction {
    Bold,
    Italic,
    Strikethrough,
    InlineCode,
    CodeBlock,
    Heading(u8),
    BulletList,
    NumberedList,
    Blockquote,
    Table,
    Link,
    /// Insert an image reference to the given path.
    Image(String),
}

impl FormatAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Bold => "Bold",
            Self::Italic => "Italic",
            Self::Strikethrough => "Strikethrough",
            Self::InlineCode => "Inline code",
            Self::CodeBlock => "Code block",
            Self::Heading(_) => "Heading",
            Self::BulletList => "Bullet list",
            Self::NumberedList => "Numbered list",
            Self::Blockquote => "Blockquote",
            Self::Table => "Table",
            Self::Link => "Link",
            Self::Image(_) => "Image",
        }
    }
}

/// Apply a formatting action to `text` at `selection`.
pub fn apply(action: &FormatAction, text: &str, selection: Selection) -> Edit {
    match action {
        FormatAction::Bold => wrap_inline(text, selection, "**", "**"),
        FormatAction::Italic => wrap_inline(text, selection, "_", "_"),
        FormatAction::Strikethrough => wrap_inline(text, selection, "~~", "~~"),
        FormatAction::InlineCode => wrap_inline(text, selection, "`", "`"),
        FormatAction::CodeBlock => code_block(text, selection),
        FormatAction::Heading(level) => heading(text, selection, *level),
        FormatAction::BulletList => prefix_lines(
            text,
            selection,
            |_| "* ".to_string(),
            "* Item 1\n* Item 2\n* Item 3",
        ),
        FormatAction::NumberedList => prefix_lines(
            text,
            selection,
            |i| format!("{}. ", i + 1),
            "1. Item 1\n2. Item 2\n3. Item 3",
        ),
        FormatAction::Blockquote => {
            prefix_lines(text, selection, |_| "> ".to_string(), "> This is a blockquote")
        }
        FormatAction::Table => splice(text, selection, TABLE_SKELETON),
        FormatAction::Link => link(text, selection),
        FormatAction::Image(path) => splice(text, selection, &image_markdown(path)),
    }
}

/// Wrap the selection in `start`/`end` markers.
///
/// Without a selection the markers are inserted and the cursor is left
/// between them.
pub fn wrap_inline(text: &str, selection: Selection, start: &str, end: &str) -> Edit {
    let selected = slice_chars(text, selection);
    if selection.is_empty() {
        let mut edit = splice(text, selection, &format!("{start}{end}"));
        let cursor = selection.start + start.chars().count();
        edit.selection = Selection::cursor(cursor);
        return edit;
    }
    splice(text, selection, &format!("{start}{selected}{end}"))
}

pub fn code_block(text: &str, selection: Selection) -> Edit {
    if selection.is_empty() {
        let mut edit = splice(text, selection, &format!("```\n{CODE_PLACEHOLDER}\n```"));
        // Cursor at the start of the placeholder line.
        edit.selection = Selection::cursor(selection.start + 4);
        return edit;
    }
    let selected = slice_chars(text, selection);
    splice(text, selection, &format!("```\n{selected}\n```"))
}

pub fn heading(text: &str, selection: Selection, level: u8) -> Edit {
    let level = level.clamp(1, 6);
    let prefix = format!("{} ", "#".repeat(usize::from(level)));
    if selection.is_empty() {
        return splice(text, selection, &format!("{prefix}Heading {level}"));
    }
    let selected = slice_chars(text, selection);
    splice(text, selection, &format!("{prefix}{selected}"))
}

pub fn link(text: &str, selection: Selection) -> Edit {
    let label = if selection.is_empty() {
        "Link Text".to_string()
    } else {
        slice_chars(text, selection)
    };
    splice(text, selection, &format!("[{label}]({LINK_PLACEHOLDER_URL})"))
}

/// Markdown for an inline image reference.
///
/// Paths with spaces or parentheses are wrapped in angle brackets so
/// `CommonMark` still parses them as a single destination.
pub fn image_markdown(path: &str) -> String {
    if path.contains(|c: char| c.is_whitespace() || c == '(' || c == ')') {
        format!("![Image](<{path}>)")
    } else {
        format!("![Image]({path})")
    }
}

fn prefix_lines(
    text: &str,
    selection: Selection,
    prefix: impl Fn(usize) -> String,
    sample: &str,
) -> Edit {
    if selection.is_empty() {
        return splice(text, selection, sample);
    }
    let selected = slice_chars(text, selection);
    let prefixed = selected
        .split('\n')
        .enumerate()
        .map(|(i, line)| format!("{}{line}", prefix(i)))
        .collect::<Vec<_>>()
        .join("\n");
    splice(text, selection, &prefixed)
}

/// Replace the chars covered by `selection` with `insert`; cursor after it.
pub fn splice(text: &str, selection: Selection, insert: &str) -> Edit {
    let len = text.chars().count();
    let selection = selection.clamp(len);
    let start = byte_offset(text, selection.start);
    let end = byte_offset(text, selection.end);

    let mut out = String::with_capacity(text.len() + insert.len());
    out.push_str(&text[..start]);
    out.push_str(insert);
    out.push_str(&text[end..]);

    Edit {
        text: out,
        selection: Selection::cursor(selection.start + insert.chars().count()),
    }
}

fn slice_chars(text: &str, selection: Selection) -> String {
    text.chars()
        .skip(selection.start)
        .take(selection.len())
        .collect()
}

/// Byte offset of the char at `char_offset`, or `text.len()` past the end.
pub(crate) fn byte_offset(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(i, _)| i)
}
