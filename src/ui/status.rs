use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

use crate::app::{Model, ToastLevel};

pub fn render_status_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let cursor = model.document.buffer.cursor();
    let column = model
        .document
        .buffer
        .line_at(cursor.line)
        .and_then(|line| line.get(..cursor.col).map(|before| before.chars().count()))
        .unwrap_or(0);

    let case = if model.search.case_sensitive {
        "  [Aa]"
    } else {
        ""
    };
    let preview_percent = model.preview_viewport.scroll_percent();
    let status = format!(
        " {}  Ln {}, Col {}  Preview {preview_percent}%  {}{case}  F1:help",
        model.title(),
        cursor.line + 1,
        column + 1,
        model.theme.label(),
    );

    frame.render_widget(Paragraph::new(status).style(model.palette.status()), area);
}

pub fn render_toast_bar(model: &Model, frame: &mut Frame, area: Rect) {
    let Some((message, level)) = model.active_toast() else {
        return;
    };
    let (prefix, style) = match level {
        ToastLevel::Info => ("[info]", model.palette.status()),
        ToastLevel::Warning => (
            "[warn]",
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        ToastLevel::Error => ("[error]", Style::default().bg(Color::Red).fg(Color::White)),
    };
    let toast = Paragraph::new(format!("{prefix} {message}")).style(style);
    frame.render_widget(toast, area);
}
