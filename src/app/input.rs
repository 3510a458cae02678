use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::{App, Message, Model, Overlay};
use crate::editor::{Direction, FormatAction};

use super::event_loop::ResizeDebouncer;

/// Lines the preview scrolls per Alt+Up/Down.
const PREVIEW_SCROLL_STEP: usize = 3;
/// Tab inserts spaces; the editor pane does not expand tab stops.
const TAB_TEXT: &str = "    ";

impl App {
    pub(super) fn handle_event(
        event: &Event,
        model: &Model,
        now_ms: u64,
        resize_debouncer: &mut ResizeDebouncer,
    ) -> Option<Message> {
        match event {
            Event::Key(key) if key.kind != KeyEventKind::Release => Self::handle_key(*key, model),
            Event::Resize(w, h) => {
                resize_debouncer.queue(*w, *h, now_ms);
                None
            }
            _ => None,
        }
    }

    /// Map a key press to a message, given which overlay is open.
    pub(crate) fn handle_key(key: KeyEvent, model: &Model) -> Option<Message> {
        match &model.overlay {
            Some(Overlay::Help) => Some(Message::ToggleHelp),
            Some(Overlay::ConfirmReload(_)) => match key.code {
                KeyCode::Char('y' | 'Y') | KeyCode::Enter => Some(Message::ConfirmReload),
                KeyCode::Char('n' | 'N') | KeyCode::Esc => Some(Message::DeclineReload),
                _ => None,
            },
            Some(Overlay::Prompt(_)) => handle_prompt_key(key),
            Some(Overlay::Find(_)) => handle_find_key(key),
            None => handle_editor_key(key),
        }
    }
}

fn handle_prompt_key(key: KeyEvent) -> Option<Message> {
    match key.code {
        KeyCode::Esc => Some(Message::CloseOverlay),
        KeyCode::Enter => Some(Message::OverlaySubmit),
        KeyCode::Backspace => Some(Message::OverlayBackspace),
        KeyCode::Char(c) if !has_command_modifier(key.modifiers) => {
            Some(Message::OverlayInput(c))
        }
        _ => None,
    }
}

fn handle_find_key(key: KeyEvent) -> Option<Message> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    match key.code {
        KeyCode::Esc => Some(Message::CloseOverlay),
        KeyCode::Enter | KeyCode::F(3) => Some(Message::FindNext),
        KeyCode::Tab | KeyCode::BackTab => Some(Message::FindSwitchField),
        KeyCode::Backspace => Some(Message::OverlayBackspace),
        KeyCode::Char('r') if ctrl => Some(Message::ReplaceOne),
        KeyCode::Char('a') if ctrl => Some(Message::ReplaceAll),
        KeyCode::Char('c') if alt => Some(Message::ToggleCaseSensitive),
        KeyCode::Char(c) if !ctrl && !alt => Some(Message::OverlayInput(c)),
        _ => None,
    }
}

fn handle_editor_key(key: KeyEvent) -> Option<Message> {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    if ctrl {
        return match key.code {
            KeyCode::Char('q') => Some(Message::Quit),
            KeyCode::Char('s') => Some(Message::Save),
            KeyCode::Char('n') => Some(Message::New),
            KeyCode::Char('o') => Some(Message::Open),
            KeyCode::Char('e') => Some(Message::ExportHtml),
            KeyCode::Char('p') => Some(Message::ExportPdf),
            KeyCode::Char('f' | 'h') => Some(Message::OpenFind),
            KeyCode::Char('t') => Some(Message::CycleTheme),
            KeyCode::Char('a') => Some(Message::SelectAll),
            KeyCode::Char('b') => Some(Message::Format(FormatAction::Bold)),
            KeyCode::Char('k') => Some(Message::Format(FormatAction::Link)),
            KeyCode::Char('g') => Some(Message::ImportImage),
            KeyCode::Left => Some(Message::MoveWordLeft(shift)),
            KeyCode::Right => Some(Message::MoveWordRight(shift)),
            KeyCode::Home => Some(Message::MoveToStart(shift)),
            KeyCode::End => Some(Message::MoveToEnd(shift)),
            _ => None,
        };
    }

    if alt {
        return match key.code {
            KeyCode::Char('s') => Some(Message::SaveAs),
            KeyCode::Char('i') => Some(Message::Format(FormatAction::Italic)),
            KeyCode::Char('x') => Some(Message::Format(FormatAction::Strikethrough)),
            KeyCode::Char('`') => Some(Message::Format(FormatAction::InlineCode)),
            KeyCode::Char('c') => Some(Message::Format(FormatAction::CodeBlock)),
            KeyCode::Char(c @ '1'..='6') => {
                let level = u8::try_from(c.to_digit(10)?).ok()?;
                Some(Message::Format(FormatAction::Heading(level)))
            }
            KeyCode::Char('u') => Some(Message::Format(FormatAction::BulletList)),
            KeyCode::Char('o') => Some(Message::Format(FormatAction::NumberedList)),
            KeyCode::Char('q') => Some(Message::Format(FormatAction::Blockquote)),
            KeyCode::Char('t') => Some(Message::Format(FormatAction::Table)),
            KeyCode::Char('n') => Some(Message::ChooseTheme),
            KeyCode::Char('b') => Some(Message::ChooseBackground),
            KeyCode::Up => Some(Message::PreviewScrollUp(PREVIEW_SCROLL_STEP)),
            KeyCode::Down => Some(Message::PreviewScrollDown(PREVIEW_SCROLL_STEP)),
            KeyCode::Home => Some(Message::PreviewTop),
            KeyCode::End => Some(Message::PreviewBottom),
            _ => None,
        };
    }

    match key.code {
        KeyCode::F(1) => Some(Message::ToggleHelp),
        KeyCode::Enter => Some(Message::InsertNewline),
        KeyCode::Tab => Some(Message::InsertText(TAB_TEXT.to_string())),
        KeyCode::Backspace => Some(Message::DeleteBack),
        KeyCode::Delete => Some(Message::DeleteForward),
        KeyCode::Left => Some(Message::MoveCursor(Direction::Left, shift)),
        KeyCode::Right => Some(Message::MoveCursor(Direction::Right, shift)),
        KeyCode::Up => Some(Message::MoveCursor(Direction::Up, shift)),
        KeyCode::Down => Some(Message::MoveCursor(Direction::Down, shift)),
        KeyCode::Home => Some(Message::MoveHome(shift)),
        KeyCode::End => Some(Message::MoveEnd(shift)),
        KeyCode::PageUp => Some(Message::PageUp(shift)),
        KeyCode::PageDown => Some(Message::PageDown(shift)),
        KeyCode::Char(c) => Some(Message::InsertChar(c)),
        _ => None,
    }
}

fn has_command_modifier(modifiers: KeyModifiers) -> bool {
    modifiers.contains(KeyModifiers::CONTROL) || modifiers.contains(KeyModifiers::ALT)
}
