use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph, Wrap};

use crate::app::{FindField, Model, Overlay, PathPrompt};

pub fn render_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    match &model.overlay {
        None => {}
        Some(Overlay::Help) => render_help_overlay(model, frame, area),
        Some(Overlay::Find(field)) => render_find_overlay(model, *field, frame, area),
        Some(Overlay::Prompt(prompt)) => render_prompt_overlay(prompt, frame, area),
        Some(Overlay::ConfirmReload(path)) => {
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().to_string());
            render_confirm_overlay(
                "File Changed",
                &format!("{name} has been modified outside mdpad. Reload it and discard unsaved edits?"),
                frame,
                area,
            );
        }
    }
}

fn popup_block(title: &str) -> Block<'static> {
    Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .padding(Padding::horizontal(1))
        .style(Style::default().bg(Color::Black).fg(Color::White))
}

fn hint_style() -> Style {
    Style::default().fg(Color::Indexed(245))
}

fn label_style() -> Style {
    Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD)
}

/// An input line with a block cursor at its end when focused.
fn input_line(label: &str, value: &str, focused: bool) -> Line<'static> {
    let mut spans = vec![
        Span::styled(label.to_string(), label_style()),
        Span::raw(value.to_string()),
    ];
    if focused {
        spans.push(Span::styled(" ", Style::default().add_modifier(Modifier::REVERSED)));
    }
    Line::from(spans)
}

fn render_find_overlay(model: &Model, field: FindField, frame: &mut Frame, area: Rect) {
    let popup = centered_popup_rect(area.width.saturating_sub(8).clamp(40, 72), 7, area);
    let case = if model.search.case_sensitive { "x" } else { " " };
    let lines = vec![
        input_line("Find:    ", &model.search.query, field == FindField::Query),
        input_line(
            "Replace: ",
            &model.search.replacement,
            field == FindField::Replacement,
        ),
        Line::raw(format!("[{case}] Match case (Alt+C)")),
        Line::raw(""),
        Line::styled(
            "Enter next \u{2502} Ctrl+R replace \u{2502} Ctrl+A all \u{2502} Tab field \u{2502} Esc close",
            hint_style(),
        ),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(popup_block("Find & Replace")),
        popup,
    );
}

fn render_prompt_overlay(prompt: &PathPrompt, frame: &mut Frame, area: Rect) {
    let popup = centered_popup_rect(area.width.saturating_sub(8).clamp(40, 80), 5, area);
    let lines = vec![
        input_line(prompt.kind.label(), &prompt.input, true),
        Line::raw(""),
        Line::styled("Enter confirm \u{2502} Esc cancel", hint_style()),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines).block(popup_block(prompt.kind.title())),
        popup,
    );
}

fn render_confirm_overlay(title: &str, question: &str, frame: &mut Frame, area: Rect) {
    let popup = centered_popup_rect(area.width.saturating_sub(8).clamp(40, 64), 7, area);
    let lines = vec![
        Line::raw(question.to_string()),
        Line::raw(""),
        Line::styled("y/Enter reload \u{2502} n/Esc keep editing", hint_style()),
    ];
    frame.render_widget(Clear, popup);
    frame.render_widget(
        Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(popup_block(title)),
        popup,
    );
}

fn render_help_overlay(model: &Model, frame: &mut Frame, area: Rect) {
    let popup_width = area.width.saturating_sub(12).max(48);
    let popup_height = area.height.saturating_sub(4).max(12);
    let popup = centered_popup_rect(popup_width, popup_height, area);

    let global_cfg = model
        .config_global_path
        .as_ref()
        .map_or_else(|| "<unknown>".to_string(), |p| p.display().to_string());
    let local_cfg = model
        .config_local_path
        .as_ref()
        .map_or_else(|| "<none>".to_string(), |p| p.display().to_string());

    let section_style = label_style();
    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::styled("File", section_style));
    lines.push(Line::raw("  Ctrl+N              New"));
    lines.push(Line::raw("  Ctrl+O              Open"));
    lines.push(Line::raw("  Ctrl+S / Alt+S      Save / Save as"));
    lines.push(Line::raw("  Ctrl+E / Ctrl+P     Export HTML / PDF"));
    lines.push(Line::raw("  Ctrl+G              Import image"));
    lines.push(Line::raw("  Ctrl+Q              Quit"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Edit", section_style));
    lines.push(Line::raw("  Shift+arrows        Extend selection"));
    lines.push(Line::raw("  Ctrl+Left/Right     Word movement"));
    lines.push(Line::raw("  Ctrl+Home/End       Buffer start / end"));
    lines.push(Line::raw("  Ctrl+A              Select all"));
    lines.push(Line::raw("  Ctrl+F              Find & replace"));
    lines.push(Line::raw("  Alt+Up/Down         Scroll preview"));
    lines.push(Line::raw("  Alt+Home/End        Preview top / bottom"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Format", section_style));
    lines.push(Line::raw("  Ctrl+B / Alt+I      Bold / italic"));
    lines.push(Line::raw("  Alt+X / Alt+`       Strikethrough / inline code"));
    lines.push(Line::raw("  Alt+C               Code block"));
    lines.push(Line::raw("  Alt+1..6            Heading"));
    lines.push(Line::raw("  Alt+U / Alt+O       Bullet / numbered list"));
    lines.push(Line::raw("  Alt+Q / Alt+T       Blockquote / table"));
    lines.push(Line::raw("  Ctrl+K              Link"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("View", section_style));
    lines.push(Line::raw("  Ctrl+T              Cycle theme"));
    lines.push(Line::raw("  Alt+N / Alt+B       Theme by name / background"));
    lines.push(Line::raw("  F1                  Toggle help"));
    lines.push(Line::raw(""));

    lines.push(Line::styled("Config", section_style));
    lines.push(Line::raw(format!("  Global: {global_cfg}")));
    lines.push(Line::raw(format!("  Local override: {local_cfg}")));

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .padding(Padding::uniform(1))
        .style(Style::default().bg(Color::Black).fg(Color::White));
    let inner = block.inner(popup);
    frame.render_widget(Clear, popup);
    frame.render_widget(block, popup);

    // Reserve 1 row at bottom for footer hint
    let content_height = inner.height.saturating_sub(1);
    lines.truncate(usize::from(content_height));
    frame.render_widget(
        Paragraph::new(lines),
        Rect::new(inner.x, inner.y, inner.width, content_height),
    );
    let footer_area = Rect::new(inner.x, inner.y + content_height, inner.width, 1);
    frame.render_widget(
        Paragraph::new(Line::styled("Any key closes", hint_style())),
        footer_area,
    );
}

fn centered_popup_rect(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(w) / 2);
    let y = area.y + (area.height.saturating_sub(h) / 2);
    Rect::new(x, y, w, h)
}
