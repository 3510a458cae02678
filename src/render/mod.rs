//! Markdown rendering with comrak.
//!
//! One parse feeds two outputs: an HTML string (used for export and kept in
//! sync with the buffer) and styled lines for the terminal preview pane.
//! Both expand a paragraph consisting of `[TOC]` into a table of contents.

mod html;
mod preview;
mod types;

use comrak::nodes::{AstNode, NodeCode, NodeValue};
use comrak::{Anchorizer, Options};

pub use html::markdown_to_html;
pub use preview::render_preview;
pub use types::{InlineColor, InlineSpan, InlineStyle, LineType, PreviewLine};

const TOC_MARKER: &str = "[TOC]";

fn configure(options: &mut Options) {
    options.extension.strikethrough = true;
    options.extension.table = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.footnotes = true;
    options.extension.shortcodes = true;
    options.extension.header_ids = Some(String::new());
    // Highlighted code and the TOC are injected as raw HTML blocks.
    options.render.unsafe_ = true;
}

/// A heading as it appears in the table of contents.
#[derive(Debug, Clone, PartialEq, Eq)]
struct TocEntry {
    level: u8,
    text: String,
    anchor: String,
}

/// Headings in document order, with the same anchors comrak emits.
fn collect_toc<'a>(root: &'a AstNode<'a>) -> Vec<TocEntry> {
    let mut anchorizer = Anchorizer::new();
    root.descendants()
        .filter_map(|node| {
            let level = match &node.data.borrow().value {
                NodeValue::Heading(heading) => heading.level,
                _ => return None,
            };
            let text = plain_text(node);
            let anchor = anchorizer.anchorize(text.clone());
            Some(TocEntry {
                level,
                text,
                anchor,
            })
        })
        .collect()
}

fn is_toc_marker<'a>(node: &'a AstNode<'a>) -> bool {
    matches!(node.data.borrow().value, NodeValue::Paragraph)
        && node
            .children()
            .all(|child| matches!(child.data.borrow().value, NodeValue::Text(_)))
        && plain_text(node).trim() == TOC_MARKER
}

/// Text content of a node, with breaks as spaces.
fn plain_text<'a>(node: &'a AstNode<'a>) -> String {
    let mut text = String::new();
    push_plain_text(node, &mut text);
    text
}

fn push_plain_text<'a>(node: &'a AstNode<'a>, text: &mut String) {
    match &node.data.borrow().value {
        NodeValue::Text(literal) | NodeValue::Code(NodeCode { literal, .. }) => text.push_str(literal),
        NodeValue::SoftBreak | NodeValue::LineBreak => text.push(' '),
        _ => {
            for child in node.children() {
                push_plain_text(child, text);
            }
        }
    }
}

/// First word of a fenced block's info string.
fn code_language(info: &str) -> Option<&str> {
    info.split_whitespace().next().filter(|lang| !lang.is_empty())
}
