use std::fmt::Write as _;

use comrak::nodes::{AstNode, NodeHtmlBlock, NodeValue};
use comrak::{Arena, Options, format_html, parse_document};
use tracing::warn;

use super::{TocEntry, code_language, collect_toc, configure, is_toc_marker};
use crate::highlight::highlight_html;

/// Convert Markdown to an HTML fragment.
///
/// Tables, strikethrough, autolinks, task lists, footnotes and heading
/// anchors are enabled. Fenced code with a known language is syntax
/// highlighted, and a `[TOC]` paragraph becomes a nested list of links to
/// the document's headings.
pub fn markdown_to_html(text: &str) -> String {
    let arena = Arena::new();
    let mut options = Options::default();
    configure(&mut options);
    let root = parse_document(&arena, text, &options);

    let toc = collect_toc(root);
    let nodes: Vec<_> = root.descendants().collect();
    for node in nodes {
        let replacement = {
            let data = node.data.borrow();
            match &data.value {
                NodeValue::Paragraph if is_toc_marker(node) => Some(toc_html(&toc)),
                NodeValue::CodeBlock(block) if block.fenced => {
                    highlight_html(code_language(&block.info), &block.literal)
                        .map(|pre| format!("<div class=\"highlight\">{pre}</div>\n"))
                }
                _ => None,
            }
        };
        if let Some(literal) = replacement {
            replace_with_html(node, literal);
        }
    }

    let mut out = Vec::new();
    if let Err(err) = format_html(root, &options, &mut out) {
        warn!(error = %err, "html formatting failed");
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn replace_with_html<'a>(node: &'a AstNode<'a>, literal: String) {
    let children: Vec<_> = node.children().collect();
    for child in children {
        child.detach();
    }
    node.data.borrow_mut().value = NodeValue::HtmlBlock(NodeHtmlBlock {
        block_type: 0,
        literal,
    });
}

fn toc_html(entries: &[TocEntry]) -> String {
    let mut html = String::from("<div class=\"toc\">\n");
    let mut open: Vec<u8> = Vec::new();

    for entry in entries {
        match open.last().copied() {
            Some(top) if entry.level == top => html.push_str("</li>\n"),
            Some(top) if entry.level < top => {
                while open.last().is_some_and(|&top| top > entry.level) {
                    open.pop();
                    html.push_str("</li>\n</ul>\n");
                }
                if open.last().is_some_and(|&top| top == entry.level) {
                    html.push_str("</li>\n");
                } else {
                    html.push_str("<ul>\n");
                    open.push(entry.level);
                }
            }
            _ => {
                html.push_str("<ul>\n");
                open.push(entry.level);
            }
        }
        let _ = write!(
            html,
            "<li><a href=\"#{}\">{}</a>",
            escape_html(&entry.anchor),
            escape_html(&entry.text)
        );
    }
    for _ in open {
        html.push_str("</li>\n</ul>\n");
    }

    html.push_str("</div>\n");
    html
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}
