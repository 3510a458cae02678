use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};
use unicode_width::UnicodeWidthChar;

use crate::app::Model;
use crate::render::PreviewLine;

use super::style::{Palette, style_for_inline, style_for_line_type};
use super::{EDITOR_WIDTH_PERCENT, PREVIEW_LEFT_PADDING, PREVIEW_WIDTH_PERCENT, overlays, status};

/// Split the screen into editor pane, preview pane and status bar.
pub fn split_screen(area: Rect) -> (Rect, Rect, Rect) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(EDITOR_WIDTH_PERCENT),
            Constraint::Percentage(PREVIEW_WIDTH_PERCENT),
        ])
        .split(rows[0]);
    (columns[0], columns[1], rows[1])
}

/// Text area (columns, rows) inside the editor and preview panes.
pub fn pane_content_sizes(width: u16, height: u16) -> ((u16, u16), (u16, u16)) {
    let (editor, preview, _) = split_screen(Rect::new(0, 0, width, height));
    let inner = |pane: Rect| (pane.width.saturating_sub(2), pane.height.saturating_sub(2));
    let (preview_w, preview_h) = inner(preview);
    (
        inner(editor),
        (preview_w.saturating_sub(PREVIEW_LEFT_PADDING).max(1), preview_h),
    )
}

/// Width of the line number column, not counting its trailing space.
pub const fn line_number_width(total_lines: usize) -> u16 {
    if total_lines < 10 {
        1
    } else if total_lines < 100 {
        2
    } else if total_lines < 1_000 {
        3
    } else if total_lines < 10_000 {
        4
    } else if total_lines < 100_000 {
        5
    } else {
        6
    }
}

/// Render the complete UI.
pub fn render(model: &Model, frame: &mut Frame) {
    let area = frame.area();
    let palette = model.palette;
    frame.render_widget(Block::default().style(palette.window()), area);

    let (editor_area, preview_area, status_area) = split_screen(area);
    render_editor(model, frame, editor_area);
    render_preview(model, frame, preview_area);

    if model.active_toast().is_some() {
        status::render_toast_bar(model, frame, status_area);
    } else {
        status::render_status_bar(model, frame, status_area);
    }

    overlays::render_overlay(model, frame, area);
}

fn pane_block(title: &str, palette: &Palette) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(palette.window())
        .style(palette.pane())
}

fn render_editor(model: &Model, frame: &mut Frame, area: Rect) {
    let palette = &model.palette;
    let block = pane_block(&model.title(), palette);
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let buffer = &model.document.buffer;
    let total_lines = buffer.line_count();
    let gutter_width = usize::from(line_number_width(total_lines));
    let text_width = usize::from(inner.width).saturating_sub(gutter_width + 1);

    let selection = buffer.selection();
    let cursor = buffer.cursor();
    let gutter_style = palette.pane().add_modifier(Modifier::DIM);
    let cursor_style = palette.pane().add_modifier(Modifier::REVERSED);

    let start = model.editor_scroll_offset;
    let end = (start + usize::from(inner.height)).min(total_lines);
    let mut content: Vec<Line> = Vec::with_capacity(end.saturating_sub(start));
    for line_idx in start..end {
        let line_text = buffer.line_at(line_idx).unwrap_or_default();
        let line_start = buffer.line_start_offset(line_idx);
        let cursor_char = (line_idx == cursor.line)
            .then(|| line_text.get(..cursor.col).map_or(0, |before| before.chars().count()));

        let mut spans = vec![Span::styled(
            format!("{:>gutter_width$} ", line_idx + 1),
            gutter_style,
        )];
        let mut run = String::new();
        let mut run_style = palette.pane();
        let mut column = 0usize;
        let mut shown = 0usize;
        for (char_idx, ch) in line_text.chars().chain(std::iter::once(' ')).enumerate() {
            let is_eol = char_idx == line_text.chars().count();
            let width = ch.width().unwrap_or(0);
            let visible = column >= model.editor_col_offset && shown + width <= text_width;
            column += width;
            if !visible {
                continue;
            }
            let offset = line_start + char_idx;
            let style = if cursor_char == Some(char_idx) {
                cursor_style
            } else if is_eol {
                break;
            } else if selection.range().contains(&offset) {
                palette.selection()
            } else {
                palette.pane()
            };
            if style != run_style && !run.is_empty() {
                spans.push(Span::styled(std::mem::take(&mut run), run_style));
            }
            run_style = style;
            run.push(ch);
            shown += width;
        }
        if !run.is_empty() {
            spans.push(Span::styled(run, run_style));
        }
        content.push(Line::from(spans));
    }

    frame.render_widget(Paragraph::new(content).style(palette.pane()), inner);
}

fn render_preview(model: &Model, frame: &mut Frame, area: Rect) {
    let palette = &model.palette;
    let block = pane_block("Preview", palette).padding(Padding::left(PREVIEW_LEFT_PADDING));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let range = model.preview_viewport.visible_range();
    let lines: Vec<Line> = model
        .preview
        .get(range)
        .unwrap_or_default()
        .iter()
        .map(|line| preview_line(line, palette))
        .collect();
    frame.render_widget(Paragraph::new(lines).style(palette.pane()), inner);
}

fn preview_line(line: &PreviewLine, palette: &Palette) -> Line<'static> {
    let base = style_for_line_type(line.line_type(), palette);
    match line.spans() {
        Some(spans) => Line::from(
            spans
                .iter()
                .map(|span| {
                    Span::styled(
                        span.text().to_string(),
                        style_for_inline(base, span.style(), palette),
                    )
                })
                .collect::<Vec<_>>(),
        ),
        None => Line::styled(line.content().to_string(), base),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_screen_halves_and_status_row() {
        let (editor, preview, status) = split_screen(Rect::new(0, 0, 100, 30));
        assert_eq!(editor.width + preview.width, 100);
        assert_eq!(editor.height, 29);
        assert_eq!(status, Rect::new(0, 29, 100, 1));
    }

    #[test]
    fn test_pane_content_sizes_subtract_borders_and_padding() {
        let ((ew, eh), (pw, ph)) = pane_content_sizes(100, 30);
        assert_eq!((ew, eh), (48, 27));
        assert_eq!((pw, ph), (47, 27));
    }

    #[test]
    fn test_line_number_width() {
        assert_eq!(line_number_width(1), 1);
        assert_eq!(line_number_width(10), 2);
        assert_eq!(line_number_width(12_345), 5);
    }
}
