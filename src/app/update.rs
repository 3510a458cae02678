use std::path::{Path, PathBuf};

use unicode_width::UnicodeWidthStr;

use crate::app::Model;
use crate::app::model::{FileRequest, FindField, Overlay, PathPrompt, PromptKind, Setting};
use crate::app::ToastLevel;
use crate::editor::{Direction, FormatAction, Selection, format};
use crate::search::replace_one;
use crate::ui::style::{Rgb, ThemeName};
use crate::watcher::ChangeAction;

/// All possible events and actions in the application.
///
/// These represent user input, system events, and internal actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Message {
    // Editing
    /// Insert a character at the cursor, replacing any selection
    InsertChar(char),
    /// Insert text at the cursor, replacing any selection
    InsertText(String),
    /// Split the line at the cursor
    InsertNewline,
    /// Delete the selection or the character before the cursor
    DeleteBack,
    /// Delete the selection or the character at the cursor
    DeleteForward,
    /// Move the cursor; `true` extends the selection
    MoveCursor(Direction, bool),
    MoveHome(bool),
    MoveEnd(bool),
    MoveWordLeft(bool),
    MoveWordRight(bool),
    MoveToStart(bool),
    MoveToEnd(bool),
    PageUp(bool),
    PageDown(bool),
    SelectAll,
    /// Apply a Markdown formatting helper at the selection
    Format(FormatAction),

    // Preview
    PreviewScrollUp(usize),
    PreviewScrollDown(usize),
    PreviewTop,
    PreviewBottom,

    // Find & replace
    /// Open the find & replace dialog
    OpenFind,
    /// Switch typing between the query and replacement fields
    FindSwitchField,
    FindNext,
    ReplaceOne,
    ReplaceAll,
    ToggleCaseSensitive,

    // Overlay text input (find dialog and path prompt)
    OverlayInput(char),
    OverlayBackspace,
    /// Accept the path prompt
    OverlaySubmit,
    /// Close whichever overlay is open
    CloseOverlay,

    // File
    New,
    /// Ask for a path to open
    Open,
    /// Save to the bound path, or ask for one when untitled
    Save,
    SaveAs,
    ExportHtml,
    ExportPdf,
    ImportImage,

    // External changes
    /// The watcher reported a change to the open file
    FileChanged(ChangeAction),
    /// Reload the changed file from disk
    ConfirmReload,
    /// Keep the buffer as it is
    DeclineReload,

    // Settings
    CycleTheme,
    /// Ask for a theme by name
    ChooseTheme,
    /// Ask for a window background color
    ChooseBackground,
    ApplySetting(Setting),

    // Application
    ToggleHelp,
    Resize(u16, u16),
    Quit,
}

/// Update the model based on a message.
///
/// This is the core state transition function. I/O is not performed here;
/// file work is queued on the model and carried out by the effect handler.
pub fn update(mut model: Model, msg: Message) -> Model {
    // Save keeps a pending quit alive so Ctrl+S, Ctrl+Q still exits.
    if !matches!(msg, Message::Quit | Message::Save) {
        model.quit_confirmed = false;
    }

    match msg {
        // Editing
        Message::InsertChar(ch) => model.document.buffer.insert_char(ch),
        Message::InsertText(text) => model.document.buffer.insert_str(&text),
        Message::InsertNewline => model.document.buffer.split_line(),
        Message::DeleteBack => {
            model.document.buffer.delete_back();
        }
        Message::DeleteForward => {
            model.document.buffer.delete_forward();
        }
        Message::MoveCursor(direction, extend) => {
            model.document.buffer.move_cursor(direction, extend);
        }
        Message::MoveHome(extend) => model.document.buffer.move_home(extend),
        Message::MoveEnd(extend) => model.document.buffer.move_end(extend),
        Message::MoveWordLeft(extend) => model.document.buffer.move_word_left(extend),
        Message::MoveWordRight(extend) => model.document.buffer.move_word_right(extend),
        Message::MoveToStart(extend) => model.document.buffer.move_to_start(extend),
        Message::MoveToEnd(extend) => model.document.buffer.move_to_end(extend),
        Message::PageUp(extend) => {
            for _ in 0..model.editor_height().max(1) {
                model.document.buffer.move_cursor(Direction::Up, extend);
            }
        }
        Message::PageDown(extend) => {
            for _ in 0..model.editor_height().max(1) {
                model.document.buffer.move_cursor(Direction::Down, extend);
            }
        }
        Message::SelectAll => model.document.buffer.select_all(),
        Message::Format(action) => apply_format(&mut model, &action),

        // Preview
        Message::PreviewScrollUp(n) => model.preview_viewport.scroll_up(n),
        Message::PreviewScrollDown(n) => model.preview_viewport.scroll_down(n),
        Message::PreviewTop => model.preview_viewport.go_to_top(),
        Message::PreviewBottom => model.preview_viewport.go_to_bottom(),

        // Find & replace
        Message::OpenFind => {
            let selected = model.document.buffer.selected_text();
            if !selected.is_empty() && !selected.contains('\n') {
                model.search.query = selected;
            }
            model.overlay = Some(Overlay::Find(FindField::Query));
        }
        Message::FindSwitchField => {
            if let Some(Overlay::Find(field)) = &mut model.overlay {
                *field = match field {
                    FindField::Query => FindField::Replacement,
                    FindField::Replacement => FindField::Query,
                };
            }
        }
        Message::FindNext => find_next(&mut model),
        Message::ReplaceOne => replace_current(&mut model),
        Message::ReplaceAll => replace_every(&mut model),
        Message::ToggleCaseSensitive => {
            model.search.case_sensitive = !model.search.case_sensitive;
        }

        Message::OverlayInput(ch) => match &mut model.overlay {
            Some(Overlay::Find(FindField::Query)) => model.search.query.push(ch),
            Some(Overlay::Find(FindField::Replacement)) => model.search.replacement.push(ch),
            Some(Overlay::Prompt(prompt)) => prompt.input.push(ch),
            _ => {}
        },
        Message::OverlayBackspace => match &mut model.overlay {
            Some(Overlay::Find(FindField::Query)) => {
                model.search.query.pop();
            }
            Some(Overlay::Find(FindField::Replacement)) => {
                model.search.replacement.pop();
            }
            Some(Overlay::Prompt(prompt)) => {
                prompt.input.pop();
            }
            _ => {}
        },
        Message::OverlaySubmit => submit_prompt(&mut model),
        Message::CloseOverlay => model.overlay = None,

        // File
        Message::New => {
            model.overlay = None;
            model.suspended_overlay = None;
            model.pending_request = Some(FileRequest::New);
        }
        Message::Open => open_prompt(&mut model, PromptKind::Open),
        Message::Save => {
            if model.file_path().is_some() {
                model.pending_request = Some(FileRequest::Save);
            } else {
                open_prompt(&mut model, PromptKind::SaveAs);
            }
        }
        Message::SaveAs => open_prompt(&mut model, PromptKind::SaveAs),
        Message::ExportHtml => open_prompt(&mut model, PromptKind::ExportHtml),
        Message::ExportPdf => open_prompt(&mut model, PromptKind::ExportPdf),
        Message::ImportImage => open_prompt(&mut model, PromptKind::ImportImage),

        // External changes
        Message::FileChanged(action) => match action {
            ChangeAction::Ignore => {}
            ChangeAction::PromptReload(path) => {
                if model.file_path() == Some(path.as_path()) {
                    let previous = model.overlay.replace(Overlay::ConfirmReload(path));
                    if !matches!(previous, Some(Overlay::ConfirmReload(_))) {
                        model.suspended_overlay = previous;
                    }
                }
            }
        },
        Message::ConfirmReload => {
            if matches!(model.overlay, Some(Overlay::ConfirmReload(_))) {
                model.overlay = model.suspended_overlay.take();
                model.pending_request = Some(FileRequest::Reload);
            }
        }
        Message::DeclineReload => {
            if matches!(model.overlay, Some(Overlay::ConfirmReload(_))) {
                model.overlay = model.suspended_overlay.take();
            }
        }

        // Settings
        Message::CycleTheme => {
            let next = model.theme.next();
            model.apply_setting(Setting::Theme(next));
            model.show_toast(ToastLevel::Info, format!("Theme: {}", next.label()));
        }
        Message::ChooseTheme => open_prompt(&mut model, PromptKind::Theme),
        Message::ChooseBackground => open_prompt(&mut model, PromptKind::Background),
        Message::ApplySetting(setting) => model.apply_setting(setting),

        // Application
        Message::ToggleHelp => {
            model.overlay = match model.overlay {
                Some(Overlay::Help) => None,
                _ => Some(Overlay::Help),
            };
        }
        Message::Resize(width, height) => model.resize(width, height),
        Message::Quit => {
            if model.document.is_dirty() && !model.quit_confirmed {
                model.show_toast(
                    ToastLevel::Warning,
                    "Unsaved changes! Press Ctrl+Q again to quit, or Ctrl+S to save",
                );
                model.quit_confirmed = true;
            } else {
                model.should_quit = true;
            }
        }
    }

    model.refresh_render();
    editor_ensure_cursor_visible(&mut model);
    model
}

fn apply_format(model: &mut Model, action: &FormatAction) {
    let buffer = &mut model.document.buffer;
    let edit = format::apply(action, &buffer.text(), buffer.selection());
    buffer.apply_edit(&edit);
}

fn find_next(model: &mut Model) {
    if model.search.query.is_empty() {
        return;
    }
    let buffer = &mut model.document.buffer;
    let from = buffer.selection().end;
    match model.search.find_next(&buffer.text(), from) {
        Some(range) => buffer.select(Selection::from(range)),
        None => {
            let message = not_found(&model.search.query);
            model.show_toast(ToastLevel::Info, message);
        }
    }
}

fn replace_current(model: &mut Model) {
    let buffer = &mut model.document.buffer;
    // An active selection is replaced as-is; only a search needs a query.
    if model.search.query.is_empty() && buffer.selection().is_empty() {
        return;
    }
    match replace_one(&buffer.text(), buffer.selection(), &model.search) {
        Some(edit) => buffer.apply_edit(&edit),
        None => {
            let message = not_found(&model.search.query);
            model.show_toast(ToastLevel::Info, message);
        }
    }
}

fn replace_every(model: &mut Model) {
    if model.search.query.is_empty() {
        return;
    }
    let (text, count) = model.search.replace_all(&model.document.text());
    if count == 0 {
        let message = not_found(&model.search.query);
        model.show_toast(ToastLevel::Info, message);
        return;
    }
    model.document.buffer.set_text(&text);
    let noun = if count == 1 { "occurrence" } else { "occurrences" };
    model.show_toast(ToastLevel::Info, format!("Replaced {count} {noun}."));
}

fn not_found(query: &str) -> String {
    format!("'{query}' not found.")
}

fn open_prompt(model: &mut Model, kind: PromptKind) {
    let input = match kind {
        PromptKind::Theme => model.theme.as_str().to_string(),
        PromptKind::Background => model.background.map(|bg| bg.to_string()).unwrap_or_default(),
        _ => default_prompt_input(model.file_path(), kind),
    };
    model.overlay = Some(Overlay::Prompt(PathPrompt { kind, input }));
}

/// Prefill for the path prompt, derived from the current file.
fn default_prompt_input(current: Option<&Path>, kind: PromptKind) -> String {
    let Some(current) = current else {
        return String::new();
    };
    let suggested = match kind {
        PromptKind::SaveAs => current.to_path_buf(),
        PromptKind::ExportHtml => current.with_extension("html"),
        PromptKind::ExportPdf => current.with_extension("pdf"),
        PromptKind::Open | PromptKind::ImportImage => match current.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => {
                let mut dir = dir.display().to_string();
                dir.push(std::path::MAIN_SEPARATOR);
                return dir;
            }
            _ => return String::new(),
        },
        PromptKind::Theme | PromptKind::Background => return String::new(),
    };
    suggested.display().to_string()
}

fn submit_prompt(model: &mut Model) {
    let Some(Overlay::Prompt(prompt)) = model.overlay.take() else {
        return;
    };
    let input = prompt.input.trim();
    match prompt.kind {
        PromptKind::Theme => return submit_theme(model, input),
        PromptKind::Background => return submit_background(model, input),
        _ => {}
    }
    if input.is_empty() {
        return;
    }
    let path = PathBuf::from(input);
    model.pending_request = match prompt.kind {
        PromptKind::Open => Some(FileRequest::Open(path)),
        PromptKind::SaveAs => Some(FileRequest::SaveAs(path)),
        PromptKind::ExportHtml => Some(FileRequest::ExportHtml(path)),
        PromptKind::ExportPdf => Some(FileRequest::ExportPdf(path)),
        PromptKind::ImportImage => {
            apply_format(model, &FormatAction::Image(input.to_string()));
            None
        }
        PromptKind::Theme | PromptKind::Background => None,
    };
}

fn submit_theme(model: &mut Model, name: &str) {
    if ThemeName::parse(name).is_none() {
        model.show_toast(ToastLevel::Warning, format!("Unknown theme '{name}'"));
        return;
    }
    model.apply_setting(Setting::ThemeNamed(name.to_string()));
    let message = format!("Theme: {}", model.theme.label());
    model.show_toast(ToastLevel::Info, message);
}

/// An empty input drops the override and goes back to the theme's background.
fn submit_background(model: &mut Model, value: &str) {
    if value.is_empty() {
        model.apply_setting(Setting::Background(None));
        model.show_toast(ToastLevel::Info, "Background: theme default");
        return;
    }
    match Rgb::parse_hex(value) {
        Some(color) => {
            model.apply_setting(Setting::Background(Some(color)));
            model.show_toast(ToastLevel::Info, format!("Background: {color}"));
        }
        None => model.show_toast(
            ToastLevel::Warning,
            format!("Invalid color '{value}', expected #rrggbb"),
        ),
    }
}

/// Scroll the editor pane so the cursor stays on screen.
fn editor_ensure_cursor_visible(model: &mut Model) {
    let cursor = model.document.buffer.cursor();
    let visible_height = model.editor_height();
    if visible_height == 0 {
        model.editor_scroll_offset = cursor.line;
    } else if cursor.line < model.editor_scroll_offset {
        model.editor_scroll_offset = cursor.line;
    } else if cursor.line >= model.editor_scroll_offset + visible_height {
        model.editor_scroll_offset = cursor.line + 1 - visible_height;
    }

    let line = model.document.buffer.line_at(cursor.line).unwrap_or_default();
    let cursor_col = line
        .get(..cursor.col)
        .map_or(0, UnicodeWidthStr::width);
    let visible_width = model.editor_width();
    if visible_width == 0 {
        model.editor_col_offset = cursor_col;
    } else if cursor_col < model.editor_col_offset {
        model.editor_col_offset = cursor_col;
    } else if cursor_col >= model.editor_col_offset + visible_width {
        model.editor_col_offset = cursor_col + 1 - visible_width;
    }
}
