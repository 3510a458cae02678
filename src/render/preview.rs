//! Terminal preview: Markdown to styled, wrapped lines.

use comrak::nodes::{AstNode, ListDelimType, ListType, NodeValue, TableAlignment};
use comrak::{Arena, Options, parse_document};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::types::{InlineSpan, InlineStyle, LineType, PreviewLine};
use super::{TocEntry, code_language, collect_toc, configure, is_toc_marker, plain_text};
use crate::highlight::{HighlightBackground, highlight_code};

const CODE_RIGHT_PADDING: usize = 3;

/// Render Markdown into preview lines wrapped to `width` columns.
pub fn render_preview(source: &str, width: u16, background: HighlightBackground) -> Vec<PreviewLine> {
    let arena = Arena::new();
    let mut options = Options::default();
    configure(&mut options);
    let root = parse_document(&arena, source, &options);

    let mut builder = PreviewBuilder {
        lines: Vec::new(),
        toc: collect_toc(root),
        width: usize::from(width.max(1)),
        background,
    };
    builder.node(root, 0, None);
    while builder
        .lines
        .last()
        .is_some_and(|line| line.line_type() == LineType::Empty)
    {
        builder.lines.pop();
    }
    builder.lines
}

struct PreviewBuilder {
    lines: Vec<PreviewLine>,
    toc: Vec<TocEntry>,
    width: usize,
    background: HighlightBackground,
}

impl PreviewBuilder {
    fn node<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, list_marker: Option<String>) {
        match &node.data.borrow().value {
            NodeValue::Heading(heading) => {
                self.ensure_blank_lines(if self.lines.is_empty() { 0 } else { 1 });
                let text = plain_text(node);
                let prefix = "#".repeat(usize::from(heading.level));
                self.lines.push(PreviewLine::new(
                    format!("{prefix} {text}"),
                    LineType::Heading(heading.level),
                ));
                self.lines.push(PreviewLine::empty());
            }

            NodeValue::Paragraph if is_toc_marker(node) => {
                for entry in &self.toc {
                    let indent = "  ".repeat(usize::from(entry.level.saturating_sub(1)));
                    self.lines
                        .push(PreviewLine::new(format!("{indent}• {}", entry.text), LineType::Toc));
                }
                self.lines.push(PreviewLine::empty());
            }

            NodeValue::Paragraph => {
                let spans = collect_inline_spans(node);
                self.push_wrapped(&spans, LineType::Paragraph, "", "");
                self.lines.push(PreviewLine::empty());
            }

            NodeValue::CodeBlock(block) => {
                self.code_block(code_language(&block.info), &block.literal);
                self.lines.push(PreviewLine::empty());
            }

            NodeValue::HtmlBlock(html) => {
                for raw in html.literal.lines() {
                    self.lines
                        .push(PreviewLine::new(raw.to_string(), LineType::Paragraph));
                }
                self.lines.push(PreviewLine::empty());
            }

            NodeValue::List(list) => {
                let list_depth = depth + 1;
                let delimiter = match list.delimiter {
                    ListDelimType::Paren => ')',
                    ListDelimType::Period => '.',
                };
                let max_number = list.start + node.children().count().saturating_sub(1);
                let number_width = max_number.to_string().len();

                for (index, child) in node.children().enumerate() {
                    let marker = match list.list_type {
                        ListType::Bullet => "• ".to_string(),
                        ListType::Ordered => {
                            format!("{:>number_width$}{delimiter} ", list.start + index)
                        }
                    };
                    self.node(child, list_depth, Some(marker));
                }
                if depth == 0 {
                    self.lines.push(PreviewLine::empty());
                }
            }

            NodeValue::Item(_) | NodeValue::TaskItem(_) => {
                let marker = match &node.data.borrow().value {
                    NodeValue::TaskItem(checked) => {
                        String::from(if checked.is_some() { "✓ " } else { "□ " })
                    }
                    _ => list_marker.unwrap_or_else(|| "• ".to_string()),
                };
                self.list_item(node, depth, &marker);
            }

            NodeValue::BlockQuote => {
                self.blockquote(node, 1);
                self.lines.push(PreviewLine::empty());
            }

            NodeValue::ThematicBreak => {
                self.lines.push(PreviewLine::new(
                    "─".repeat(self.width.min(40)),
                    LineType::HorizontalRule,
                ));
                self.lines.push(PreviewLine::empty());
            }

            NodeValue::Table(_) => {
                for line in render_table(node, self.width) {
                    self.lines.push(PreviewLine::new(line, LineType::Table));
                }
                self.lines.push(PreviewLine::empty());
            }

            NodeValue::FootnoteDefinition(def) => {
                let label = format!("[^{}]: ", def.name);
                let continuation = " ".repeat(label.chars().count());
                let spans = collect_inline_spans(node);
                self.push_wrapped(&spans, LineType::Paragraph, &label, &continuation);
                self.lines.push(PreviewLine::empty());
            }

            _ => {
                for child in node.children() {
                    self.node(child, depth, None);
                }
            }
        }
    }

    fn list_item<'a>(&mut self, node: &'a AstNode<'a>, depth: usize, marker: &str) {
        let indent = "  ".repeat(depth.saturating_sub(1));
        let prefix_first = format!("{indent}{marker}");
        let prefix_next = format!("{indent}{}", " ".repeat(marker.chars().count()));
        let mut rendered_any = false;

        for child in node.children() {
            let is_text_block = matches!(
                child.data.borrow().value,
                NodeValue::Paragraph | NodeValue::TaskItem(_)
            );
            if is_text_block {
                let spans = collect_inline_spans(child);
                let prefix = if rendered_any { &prefix_next } else { &prefix_first };
                self.push_wrapped(&spans, LineType::ListItem(depth), prefix, &prefix_next);
                rendered_any = true;
            } else {
                self.node(child, depth, None);
            }
        }

        if !rendered_any {
            self.lines.push(PreviewLine::new(prefix_first, LineType::ListItem(depth)));
        }
    }

    fn blockquote<'a>(&mut self, node: &'a AstNode<'a>, quote_depth: usize) {
        let prefix = "│ ".repeat(quote_depth);
        for child in node.children() {
            match &child.data.borrow().value {
                NodeValue::Paragraph => {
                    let spans = collect_inline_spans(child);
                    self.push_wrapped(&spans, LineType::BlockQuote, &prefix, &prefix);
                }
                NodeValue::BlockQuote => self.blockquote(child, quote_depth + 1),
                _ => {
                    for raw in plain_text(child).lines() {
                        let spans = [InlineSpan::plain(raw)];
                        self.push_wrapped(&spans, LineType::BlockQuote, &prefix, &prefix);
                    }
                }
            }
        }
    }

    fn code_block(&mut self, language: Option<&str>, literal: &str) {
        let content_width = literal
            .lines()
            .map(UnicodeWidthStr::width)
            .max()
            .unwrap_or(0)
            .min(self.width.saturating_sub(4 + CODE_RIGHT_PADDING).max(1));
        let label = format!(" {} ", language.unwrap_or("code"));
        let frame_inner_width = content_width + 2 + CODE_RIGHT_PADDING;
        let visible_label: String = label.chars().take(frame_inner_width).collect();
        self.lines.push(PreviewLine::new(
            format!(
                "┌{visible_label}{}┐",
                "─".repeat(frame_inner_width.saturating_sub(visible_label.chars().count()))
            ),
            LineType::CodeBlock,
        ));

        for spans in highlight_code(language, literal, self.background) {
            let body = truncate_spans(&spans, content_width);
            let used: usize = body.iter().map(|span| span.text().width()).sum();
            let padding = " ".repeat(content_width.saturating_sub(used) + CODE_RIGHT_PADDING);

            let mut line_spans = vec![InlineSpan::plain("│ ")];
            line_spans.extend(body);
            line_spans.push(InlineSpan::plain(format!("{padding} │")));
            let content = spans_to_string(&line_spans);
            self.lines.push(PreviewLine::with_spans(
                content,
                LineType::CodeBlock,
                line_spans,
            ));
        }

        self.lines.push(PreviewLine::new(
            format!("└{}┘", "─".repeat(frame_inner_width)),
            LineType::CodeBlock,
        ));
    }

    fn push_wrapped(
        &mut self,
        spans: &[InlineSpan],
        line_type: LineType,
        prefix_first: &str,
        prefix_next: &str,
    ) {
        for line_spans in wrap_spans(spans, self.width, prefix_first, prefix_next) {
            let content = spans_to_string(&line_spans);
            self.lines
                .push(PreviewLine::with_spans(content, line_type, line_spans));
        }
    }

    fn ensure_blank_lines(&mut self, count: usize) {
        let existing = self
            .lines
            .iter()
            .rev()
            .take_while(|line| line.line_type() == LineType::Empty)
            .count();
        for _ in existing..count {
            self.lines.push(PreviewLine::empty());
        }
    }
}

fn collect_inline_spans<'a>(node: &'a AstNode<'a>) -> Vec<InlineSpan> {
    let mut spans = Vec::new();
    collect_inline_spans_recursive(node, InlineStyle::default(), &mut spans);
    spans
}

fn collect_inline_spans_recursive<'a>(
    node: &'a AstNode<'a>,
    style: InlineStyle,
    spans: &mut Vec<InlineSpan>,
) {
    let nested = |next: InlineStyle, spans: &mut Vec<InlineSpan>| {
        for child in node.children() {
            collect_inline_spans_recursive(child, next, spans);
        }
    };
    match &node.data.borrow().value {
        NodeValue::List(_) | NodeValue::Item(_) => {}
        NodeValue::Text(text) => spans.push(InlineSpan::new(text.clone(), style)),
        NodeValue::Code(code) => {
            let code_style = InlineStyle {
                code: true,
                ..style
            };
            spans.push(InlineSpan::new(code.literal.clone(), code_style));
        }
        NodeValue::Emph => nested(InlineStyle { emphasis: true, ..style }, spans),
        NodeValue::Strong => nested(InlineStyle { strong: true, ..style }, spans),
        NodeValue::Strikethrough => nested(
            InlineStyle {
                strikethrough: true,
                ..style
            },
            spans,
        ),
        NodeValue::Link(_) => nested(InlineStyle { link: true, ..style }, spans),
        NodeValue::Image(image) => {
            let alt = plain_text(node);
            let label = if alt.is_empty() { image.url.clone() } else { alt };
            spans.push(InlineSpan::new(format!("[Image: {label}]"), style));
        }
        NodeValue::FootnoteReference(reference) => {
            spans.push(InlineSpan::new(format!("[^{}]", reference.name), style));
        }
        NodeValue::ShortCode(code) => spans.push(InlineSpan::new(code.emoji.clone(), style)),
        NodeValue::SoftBreak | NodeValue::LineBreak => spans.push(InlineSpan::plain(" ")),
        _ => nested(style, spans),
    }
}

fn wrap_spans(
    spans: &[InlineSpan],
    width: usize,
    prefix_first: &str,
    prefix_next: &str,
) -> Vec<Vec<InlineSpan>> {
    let tokens = spans.iter().flat_map(split_inline_tokens);

    let mut lines: Vec<Vec<InlineSpan>> = Vec::new();
    let mut current: Vec<InlineSpan> = Vec::new();
    let mut current_len = 0usize;
    let mut has_word = false;

    let start_line = |prefix: &str, current: &mut Vec<InlineSpan>, current_len: &mut usize| {
        current.clear();
        *current_len = prefix.width();
        if !prefix.is_empty() {
            current.push(InlineSpan::plain(prefix));
        }
    };

    start_line(prefix_first, &mut current, &mut current_len);

    for token in tokens {
        let token_len = token.text().width();
        let token_is_ws = token.text().chars().all(char::is_whitespace);

        if current_len + token_len > width && has_word {
            while current
                .last()
                .is_some_and(|span| span.text().chars().all(char::is_whitespace))
            {
                current.pop();
            }
            lines.push(std::mem::take(&mut current));
            start_line(prefix_next, &mut current, &mut current_len);
            has_word = false;
        }

        // Drop leading whitespace at wrapped line starts.
        if token_is_ws && !has_word {
            continue;
        }

        current_len += token_len;
        current.push(token);
        has_word = true;
    }

    lines.push(current);
    lines
}

fn split_inline_tokens(span: &InlineSpan) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut buf = String::new();
    let mut ws_state: Option<bool> = None;

    for ch in span.text().chars() {
        let is_ws = ch.is_whitespace();
        if ws_state.is_some_and(|state| state != is_ws) {
            out.push(InlineSpan::new(std::mem::take(&mut buf), span.style()));
        }
        buf.push(ch);
        ws_state = Some(is_ws);
    }

    if !buf.is_empty() {
        out.push(InlineSpan::new(buf, span.style()));
    }
    out
}

fn spans_to_string(spans: &[InlineSpan]) -> String {
    spans.iter().map(InlineSpan::text).collect()
}

fn truncate_spans(spans: &[InlineSpan], max_width: usize) -> Vec<InlineSpan> {
    let mut out = Vec::new();
    let mut remaining = max_width;
    for span in spans {
        let taken = truncate_text(span.text(), remaining);
        if taken.is_empty() {
            break;
        }
        remaining -= taken.width();
        out.push(InlineSpan::new(taken, span.style()));
    }
    out
}

fn render_table<'a>(table_node: &'a AstNode<'a>, max_width: usize) -> Vec<String> {
    let (alignments, mut rows, has_header) = collect_table_rows(table_node);
    let num_cols = rows.iter().map(Vec::len).max().unwrap_or(0);
    if num_cols == 0 {
        return Vec::new();
    }
    for row in &mut rows {
        row.resize(num_cols, String::new());
    }

    let mut col_widths = vec![1_usize; num_cols];
    for row in &rows {
        for (idx, cell) in row.iter().enumerate() {
            col_widths[idx] = col_widths[idx].max(cell.width());
        }
    }

    // Row width is 1 + sum(col_width + 3).
    let max_table_width = max_width.max(4);
    while 1 + col_widths.iter().sum::<usize>() + (3 * num_cols) > max_table_width {
        let Some((widest, &w)) = col_widths.iter().enumerate().max_by_key(|(_, w)| **w) else {
            break;
        };
        if w <= 1 {
            break;
        }
        col_widths[widest] -= 1;
    }

    let mut lines = vec![render_table_border(&col_widths, '┌', '┬', '┐')];
    for (idx, row) in rows.iter().enumerate() {
        lines.push(render_table_row(row, &col_widths, &alignments));
        if has_header && idx == 0 {
            lines.push(render_table_border(&col_widths, '├', '┼', '┤'));
        }
    }
    lines.push(render_table_border(&col_widths, '└', '┴', '┘'));
    lines
}

fn collect_table_rows<'a>(
    table_node: &'a AstNode<'a>,
) -> (Vec<TableAlignment>, Vec<Vec<String>>, bool) {
    let alignments = match &table_node.data.borrow().value {
        NodeValue::Table(table) => table.alignments.clone(),
        _ => Vec::new(),
    };

    let mut rows = Vec::new();
    let mut has_header = false;
    for row_node in table_node.children() {
        match row_node.data.borrow().value {
            NodeValue::TableRow(header) => has_header |= header,
            _ => continue,
        }
        let cells = row_node
            .children()
            .filter(|cell| matches!(cell.data.borrow().value, NodeValue::TableCell))
            .map(|cell| plain_text(cell).split_whitespace().collect::<Vec<_>>().join(" "))
            .collect();
        rows.push(cells);
    }

    (alignments, rows, has_header)
}

fn render_table_border(widths: &[usize], left: char, middle: char, right: char) -> String {
    let middle = middle.to_string();
    let inner = widths
        .iter()
        .map(|w| "─".repeat(w + 2))
        .collect::<Vec<_>>()
        .join(middle.as_str());
    format!("{left}{inner}{right}")
}

fn render_table_row(cells: &[String], widths: &[usize], alignments: &[TableAlignment]) -> String {
    let mut out = String::from("│");
    for (idx, width) in widths.iter().enumerate() {
        let content = truncate_text(cells.get(idx).map_or("", String::as_str), *width);
        let padding = width.saturating_sub(content.width());
        let (left, right) = match alignments.get(idx).copied().unwrap_or(TableAlignment::None) {
            TableAlignment::Right => (padding, 0),
            TableAlignment::Center => (padding / 2, padding - padding / 2),
            TableAlignment::Left | TableAlignment::None => (0, padding),
        };
        out.push(' ');
        out.push_str(&" ".repeat(left));
        out.push_str(&content);
        out.push_str(&" ".repeat(right));
        out.push_str(" │");
    }
    out
}

fn truncate_text(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut width = 0usize;
    for ch in text.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if width + ch_width > max_width {
            break;
        }
        out.push(ch);
        width += ch_width;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> Vec<PreviewLine> {
        render_preview(source, 80, HighlightBackground::Dark)
    }

    fn contents(lines: &[PreviewLine]) -> Vec<&str> {
        lines.iter().map(PreviewLine::content).collect()
    }

    #[test]
    fn test_empty_document_has_no_lines() {
        assert!(render("").is_empty());
    }

    #[test]
    fn test_heading_then_paragraph() {
        let lines = render("# Hello\n\nWorld");
        assert_eq!(contents(&lines), vec!["# Hello", "", "World"]);
        assert_eq!(lines[0].line_type(), LineType::Heading(1));
    }

    #[test]
    fn test_paragraph_wraps_to_width() {
        let lines = render_preview("one two three four", 9, HighlightBackground::Dark);
        assert_eq!(contents(&lines), vec!["one two", "three", "four"]);
    }

    #[test]
    fn test_inline_styles_create_spans() {
        let lines = render("plain **bold** _it_ `code`");
        let spans = lines[0].spans().unwrap();
        assert!(spans.iter().any(|s| s.text() == "bold" && s.style().strong));
        assert!(spans.iter().any(|s| s.text() == "it" && s.style().emphasis));
        assert!(spans.iter().any(|s| s.text() == "code" && s.style().code));
    }

    #[test]
    fn test_bullet_and_ordered_lists() {
        let lines = render("- a\n- b\n\n1. x\n2. y\n");
        let text = contents(&lines);
        assert!(text.contains(&"• a"));
        assert!(text.contains(&"• b"));
        assert!(text.contains(&"1. x"));
        assert!(text.contains(&"2. y"));
    }

    #[test]
    fn test_task_items_show_check_state() {
        let text = render("- [x] done\n- [ ] todo\n");
        let text = contents(&text);
        assert!(text.contains(&"✓ done"));
        assert!(text.contains(&"□ todo"));
    }

    #[test]
    fn test_nested_list_indents_children() {
        let lines = render("- parent\n  - child\n");
        assert!(contents(&lines).contains(&"  • child"));
    }

    #[test]
    fn test_blockquote_has_bar_prefix() {
        let lines = render("> quoted");
        assert_eq!(lines[0].content(), "│ quoted");
        assert_eq!(lines[0].line_type(), LineType::BlockQuote);
    }

    #[test]
    fn test_code_block_framed_and_highlighted() {
        let lines = render("```rust\nfn main() {}\n```");
        assert!(lines[0].content().starts_with("┌ rust "));
        assert!(lines[1].content().contains("fn main"));
        assert!(
            lines[1]
                .spans()
                .unwrap()
                .iter()
                .any(|s| s.style().fg.is_some())
        );
        assert!(lines[2].content().starts_with('└'));
    }

    #[test]
    fn test_table_renders_box() {
        let lines = render("| a | b |\n|---|--:|\n| 1 | 22 |\n");
        let text = contents(&lines);
        assert_eq!(text[0], "┌───┬────┐");
        assert_eq!(text[1], "│ a │  b │");
        assert_eq!(text[2], "├───┼────┤");
        assert_eq!(text[3], "│ 1 │ 22 │");
        assert_eq!(text[4], "└───┴────┘");
    }

    #[test]
    fn test_toc_marker_lists_headings() {
        let lines = render("[TOC]\n\n# One\n\n## Two\n");
        assert_eq!(lines[0].content(), "• One");
        assert_eq!(lines[1].content(), "  • Two");
        assert_eq!(lines[0].line_type(), LineType::Toc);
    }

    #[test]
    fn test_image_placeholder_uses_alt_text() {
        let lines = render("![diagram](d.png)");
        assert_eq!(lines[0].content(), "[Image: diagram]");
    }

    #[test]
    fn test_horizontal_rule() {
        let lines = render("a\n\n---\n\nb");
        assert!(
            lines
                .iter()
                .any(|l| l.line_type() == LineType::HorizontalRule)
        );
    }
}
