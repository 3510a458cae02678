use std::fs;
use std::path::Path;
use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tempfile::tempdir;

use crate::config::EditorConfig;
use crate::document::Document;
use crate::editor::{Direction, FormatAction, Selection};
use crate::export::{ExportError, PdfConverter};
use crate::ui::style::{Palette, Rgb, ThemeName};
use crate::watcher::ChangeAction;

use super::event_loop::ResizeDebouncer;
use super::{App, FindField, Message, Model, Overlay, PromptKind, Setting, ToastLevel, update};

struct FakeConverter {
    fail: bool,
}

impl PdfConverter for FakeConverter {
    fn convert(&self, html: &str, output: &Path) -> Result<(), ExportError> {
        if self.fail {
            return Err(ExportError::Spawn {
                program: "fake-pdf".to_string(),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            });
        }
        fs::write(output, html).map_err(|source| ExportError::Write {
            path: output.to_path_buf(),
            source,
        })
    }
}

fn quiet_config() -> EditorConfig {
    EditorConfig {
        watch: false,
        autosave_interval: Duration::ZERO,
        ..EditorConfig::default()
    }
}

fn create_app(document: Document) -> (App, Model) {
    let mut app = App::new(document)
        .with_config(quiet_config())
        .with_converter(Box::new(FakeConverter { fail: false }));
    let model = app.initial_model((80, 24));
    (app, model)
}

fn create_test_model(text: &str) -> Model {
    Model::new(Document::from_text(text), (80, 24))
}

fn type_text(app: &mut App, model: &mut Model, text: &str) {
    for ch in text.chars() {
        app.dispatch(model, Message::OverlayInput(ch));
    }
}

fn toast_text(model: &Model) -> Option<&str> {
    model.active_toast().map(|(message, _)| message)
}

fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
    KeyEvent::new(code, modifiers)
}

// --- Editing and rendering ---

#[test]
fn test_typing_updates_preview_and_html() {
    let model = create_test_model("");
    let model = "# Hi".chars().fold(model, |m, ch| update(m, Message::InsertChar(ch)));

    assert_eq!(model.document.text(), "# Hi");
    assert!(model.html.contains("Hi</h1>"));
    assert_eq!(model.preview[0].content(), "# Hi");
    assert!(model.document.is_dirty());
    assert_eq!(model.title(), "Untitled* - mdpad");
}

#[test]
fn test_insert_text_replaces_selection() {
    let mut model = create_test_model("one two");
    model.document.buffer.select(Selection::new(0, 3));
    let model = update(model, Message::InsertText("    ".to_string()));
    assert_eq!(model.document.text(), "     two");
}

#[test]
fn test_shift_movement_extends_selection() {
    let model = create_test_model("hello world");
    let model = update(model, Message::MoveWordRight(true));
    let model = update(model, Message::MoveCursor(Direction::Left, true));
    assert_eq!(model.document.buffer.selected_text(), "hello");
}

#[test]
fn test_format_bold_wraps_selection() {
    let mut model = create_test_model("make this bold");
    model.document.buffer.select(Selection::new(10, 14));
    let model = update(model, Message::Format(FormatAction::Bold));
    assert_eq!(model.document.text(), "make this **bold**");
    assert!(model.html.contains("<strong>bold</strong>"));
}

#[test]
fn test_editor_scroll_follows_cursor() {
    let text = (1..=60).map(|i| format!("line {i}")).collect::<Vec<_>>().join("\n");
    let model = Model::new(Document::from_text(&text), (80, 12));
    let model = update(model, Message::MoveToEnd(false));
    let visible = model.editor_height();
    assert!(model.editor_scroll_offset > 0);
    assert!(model.editor_scroll_offset + visible > 59);

    let model = update(model, Message::MoveToStart(false));
    assert_eq!(model.editor_scroll_offset, 0);
}

#[test]
fn test_preview_scroll_is_clamped() {
    let text = (1..=80).map(|i| format!("para {i}\n")).collect::<Vec<_>>().join("\n");
    let model = Model::new(Document::from_text(&text), (80, 20));
    let model = update(model, Message::PreviewScrollDown(10_000));
    let bottom = model.preview_viewport.offset();
    assert!(bottom > 0);
    assert_eq!(model.preview_viewport.visible_range().end, model.preview.len());

    let model = update(model, Message::PreviewTop);
    assert_eq!(model.preview_viewport.offset(), 0);
}

// --- Quit confirmation ---

#[test]
fn test_quit_clean_document_exits_immediately() {
    let model = update(create_test_model(""), Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_quit_dirty_document_needs_second_press() {
    let model = update(create_test_model(""), Message::InsertChar('x'));
    let model = update(model, Message::Quit);
    assert!(!model.should_quit);
    assert!(model.quit_pending());
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Warning));

    let model = update(model, Message::Quit);
    assert!(model.should_quit);
}

#[test]
fn test_other_message_resets_quit_confirmation() {
    let model = update(create_test_model(""), Message::InsertChar('x'));
    let model = update(model, Message::Quit);
    let model = update(model, Message::MoveHome(false));
    assert!(!model.quit_pending());
    let model = update(model, Message::Quit);
    assert!(!model.should_quit);
}

// --- Find & replace ---

#[test]
fn test_open_find_prefills_query_from_selection() {
    let mut model = create_test_model("alpha beta");
    model.document.buffer.select(Selection::new(6, 10));
    let model = update(model, Message::OpenFind);
    assert_eq!(model.overlay, Some(Overlay::Find(FindField::Query)));
    assert_eq!(model.search.query, "beta");
}

#[test]
fn test_find_next_selects_match_and_wraps() {
    let model = update(create_test_model("cat dog cat"), Message::OpenFind);
    let model = "cat".chars().fold(model, |m, ch| update(m, Message::OverlayInput(ch)));

    let model = update(model, Message::FindNext);
    assert_eq!(model.document.buffer.selection(), Selection::new(0, 3));
    let model = update(model, Message::FindNext);
    assert_eq!(model.document.buffer.selection(), Selection::new(8, 11));
    let model = update(model, Message::FindNext);
    assert_eq!(model.document.buffer.selection(), Selection::new(0, 3));
}

#[test]
fn test_find_next_missing_query_shows_toast() {
    let mut model = create_test_model("cat dog");
    model.search.query = "zzz".to_string();
    let model = update(model, Message::FindNext);
    assert_eq!(toast_text(&model), Some("'zzz' not found."));
    assert!(model.document.buffer.selection().is_empty());
}

#[test]
fn test_find_respects_case_toggle() {
    let mut model = create_test_model("Word word");
    model.search.query = "word".to_string();
    let model = update(model, Message::ToggleCaseSensitive);
    assert!(model.search.case_sensitive);
    let model = update(model, Message::FindNext);
    assert_eq!(model.document.buffer.selection(), Selection::new(5, 9));
}

#[test]
fn test_replace_one_without_selection_replaces_next_match() {
    let mut model = create_test_model("a cat, a cat");
    model.search.query = "cat".to_string();
    model.search.replacement = "dog".to_string();
    let model = update(model, Message::ReplaceOne);
    assert_eq!(model.document.text(), "a dog, a cat");
    assert_eq!(model.document.buffer.cursor_offset(), 5);
}

#[test]
fn test_replace_one_with_empty_query_replaces_selection() {
    let mut model = create_test_model("bird cat");
    model.document.buffer.select(Selection::new(0, 4));
    model.search.replacement = "dog".to_string();
    let model = update(model, Message::ReplaceOne);
    assert_eq!(model.document.text(), "dog cat");
    assert!(model.active_toast().is_none());
}

#[test]
fn test_replace_one_with_empty_query_and_no_selection_does_nothing() {
    let mut model = create_test_model("bird cat");
    model.search.replacement = "dog".to_string();
    let model = update(model, Message::ReplaceOne);
    assert_eq!(model.document.text(), "bird cat");
}

#[test]
fn test_replace_all_case_insensitive_reports_count() {
    let mut model = create_test_model("Hello HELLO");
    model.search.query = "hello".to_string();
    model.search.replacement = "hi".to_string();
    let model = update(model, Message::ReplaceAll);
    assert_eq!(model.document.text(), "hi hi");
    assert_eq!(toast_text(&model), Some("Replaced 2 occurrences."));
}

#[test]
fn test_replace_all_without_match_leaves_text() {
    let mut model = create_test_model("abc");
    model.search.query = "x".to_string();
    let model = update(model, Message::ReplaceAll);
    assert_eq!(model.document.text(), "abc");
    assert_eq!(toast_text(&model), Some("'x' not found."));
}

#[test]
fn test_find_dialog_fields_receive_typing() {
    let model = update(create_test_model(""), Message::OpenFind);
    let model = update(model, Message::OverlayInput('a'));
    let model = update(model, Message::FindSwitchField);
    let model = update(model, Message::OverlayInput('b'));
    let model = update(model, Message::OverlayBackspace);
    let model = update(model, Message::OverlayInput('c'));
    assert_eq!(model.search.query, "a");
    assert_eq!(model.search.replacement, "c");
    assert_eq!(model.document.text(), "");
}

// --- File operations ---

#[test]
fn test_save_untitled_asks_for_path_then_saves() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("new.md");
    let (mut app, mut model) = create_app(Document::untitled());

    app.dispatch(&mut model, Message::InsertChar('x'));
    app.dispatch(&mut model, Message::Save);
    assert!(matches!(
        &model.overlay,
        Some(Overlay::Prompt(prompt)) if prompt.kind == PromptKind::SaveAs
    ));

    type_text(&mut app, &mut model, &path.display().to_string());
    app.dispatch(&mut model, Message::OverlaySubmit);

    assert!(model.overlay.is_none());
    assert_eq!(fs::read_to_string(&path).unwrap(), "x");
    assert_eq!(model.file_path(), Some(path.as_path()));
    assert!(!model.document.is_dirty());
    assert_eq!(toast_text(&model), Some("Saved new.md"));
}

#[test]
fn test_save_bound_document_writes_in_place() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.md");
    fs::write(&path, "old").unwrap();
    let (mut app, mut model) = create_app(Document::load(&path).unwrap());

    app.dispatch(&mut model, Message::MoveToEnd(false));
    app.dispatch(&mut model, Message::InsertChar('!'));
    app.dispatch(&mut model, Message::Save);

    assert_eq!(fs::read_to_string(&path).unwrap(), "old!");
    assert!(model.overlay.is_none());
    assert_eq!(model.title(), "doc.md - mdpad");
}

#[test]
fn test_save_failure_keeps_state_and_reports() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("missing").join("doc.md");
    let (mut app, mut model) = create_app(Document::unsaved_at(&path));

    app.dispatch(&mut model, Message::InsertChar('x'));
    app.dispatch(&mut model, Message::Save);

    assert!(model.document.is_dirty());
    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Error);
    assert!(message.starts_with("Save Error"));
}

#[test]
fn test_open_loads_file_through_prompt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("notes.md");
    fs::write(&path, "# Notes\n\nÜber 🦀").unwrap();
    let (mut app, mut model) = create_app(Document::untitled());

    app.dispatch(&mut model, Message::Open);
    type_text(&mut app, &mut model, &path.display().to_string());
    app.dispatch(&mut model, Message::OverlaySubmit);

    assert_eq!(model.document.text(), "# Notes\n\nÜber 🦀");
    assert!(model.html.contains("Notes</h1>"));
    assert_eq!(toast_text(&model), Some("Opened notes.md"));
}

#[test]
fn test_open_missing_file_reports_error() {
    let dir = tempdir().unwrap();
    let (mut app, mut model) = create_app(Document::from_text("keep me"));

    app.dispatch(&mut model, Message::Open);
    type_text(&mut app, &mut model, &dir.path().join("nope.md").display().to_string());
    app.dispatch(&mut model, Message::OverlaySubmit);

    assert_eq!(model.document.text(), "keep me");
    assert!(toast_text(&model).unwrap().starts_with("Open Error"));
}

#[test]
fn test_empty_prompt_submit_does_nothing() {
    let (mut app, mut model) = create_app(Document::from_text("text"));
    app.dispatch(&mut model, Message::Open);
    app.dispatch(&mut model, Message::OverlaySubmit);
    assert!(model.overlay.is_none());
    assert!(model.pending_request().is_none());
    assert_eq!(model.document.text(), "text");
}

#[test]
fn test_new_clears_path_and_stops_watching() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.md");
    fs::write(&path, "content").unwrap();
    let mut app = App::new(Document::load(&path).unwrap()).with_config(EditorConfig {
        watch: true,
        ..quiet_config()
    });
    let mut model = app.initial_model((80, 24));
    assert_eq!(app.watcher.current(), Some(path.as_path()));

    app.dispatch(&mut model, Message::New);

    assert!(!app.watcher.is_watching());
    assert!(model.file_path().is_none());
    assert_eq!(model.document.text(), "");
    assert_eq!(model.title(), "Untitled - mdpad");
}

#[test]
fn test_save_as_moves_watch_to_new_path() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a.md");
    let second = dir.path().join("b.md");
    fs::write(&first, "a").unwrap();
    let mut app = App::new(Document::load(&first).unwrap()).with_config(EditorConfig {
        watch: true,
        ..quiet_config()
    });
    let mut model = app.initial_model((80, 24));

    app.dispatch(&mut model, Message::SaveAs);
    if let Some(Overlay::Prompt(prompt)) = &mut model.overlay {
        prompt.input.clear();
    }
    type_text(&mut app, &mut model, &second.display().to_string());
    app.dispatch(&mut model, Message::OverlaySubmit);

    assert_eq!(app.watcher.current(), Some(second.as_path()));
    assert_eq!(fs::read_to_string(&second).unwrap(), "a");
}

#[test]
fn test_import_image_inserts_reference() {
    let (mut app, mut model) = create_app(Document::untitled());
    app.dispatch(&mut model, Message::ImportImage);
    type_text(&mut app, &mut model, "img/cat.png");
    app.dispatch(&mut model, Message::OverlaySubmit);
    assert_eq!(model.document.text(), "![Image](img/cat.png)");
    assert!(model.pending_request().is_none());
}

// --- External changes ---

#[test]
fn test_external_change_confirm_reloads() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.md");
    fs::write(&path, "original").unwrap();
    let (mut app, mut model) = create_app(Document::load(&path).unwrap());
    app.dispatch(&mut model, Message::InsertChar('x'));

    fs::write(&path, "changed on disk").unwrap();
    app.dispatch(&mut model, Message::FileChanged(ChangeAction::PromptReload(path.clone())));
    assert_eq!(model.overlay, Some(Overlay::ConfirmReload(path.clone())));

    app.dispatch(&mut model, Message::ConfirmReload);
    assert!(model.overlay.is_none());
    assert_eq!(model.document.text(), "changed on disk");
    assert!(!model.document.is_dirty());
    assert!(model.html.contains("changed on disk"));
}

#[test]
fn test_external_change_decline_keeps_buffer() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.md");
    fs::write(&path, "original").unwrap();
    let (mut app, mut model) = create_app(Document::load(&path).unwrap());

    fs::write(&path, "changed").unwrap();
    app.dispatch(&mut model, Message::FileChanged(ChangeAction::PromptReload(path.clone())));
    app.dispatch(&mut model, Message::DeclineReload);

    assert!(model.overlay.is_none());
    assert_eq!(model.document.text(), "original");
}

#[test]
fn test_reload_question_restores_interrupted_prompt() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.md");
    fs::write(&path, "original").unwrap();
    let (mut app, mut model) = create_app(Document::load(&path).unwrap());

    app.dispatch(&mut model, Message::SaveAs);
    type_text(&mut app, &mut model, ".bak");
    let typed = model.overlay.clone();

    fs::write(&path, "changed").unwrap();
    app.dispatch(&mut model, Message::FileChanged(ChangeAction::PromptReload(path.clone())));
    assert_eq!(model.overlay, Some(Overlay::ConfirmReload(path.clone())));

    app.dispatch(&mut model, Message::DeclineReload);
    assert_eq!(model.overlay, typed);
    assert_eq!(model.document.text(), "original");
}

#[test]
fn test_confirmed_reload_returns_to_find_dialog() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.md");
    fs::write(&path, "original").unwrap();
    let (mut app, mut model) = create_app(Document::load(&path).unwrap());
    app.dispatch(&mut model, Message::OpenFind);

    fs::write(&path, "changed").unwrap();
    let change = Message::FileChanged(ChangeAction::PromptReload(path.clone()));
    app.dispatch(&mut model, change.clone());
    // A repeated notification keeps the dialog that was open first.
    app.dispatch(&mut model, change);
    app.dispatch(&mut model, Message::ConfirmReload);

    assert_eq!(model.document.text(), "changed");
    assert_eq!(model.overlay, Some(Overlay::Find(FindField::Query)));
}

#[test]
fn test_ignored_change_shows_nothing() {
    let model = update(create_test_model("x"), Message::FileChanged(ChangeAction::Ignore));
    assert!(model.overlay.is_none());
    assert!(model.active_toast().is_none());
}

#[test]
fn test_change_for_other_path_is_ignored() {
    let mut model = Model::new(Document::unsaved_at("a.md"), (80, 24));
    model = update(
        model,
        Message::FileChanged(ChangeAction::PromptReload("b.md".into())),
    );
    assert!(model.overlay.is_none());
}

// --- Export ---

#[test]
fn test_export_html_writes_file() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.html");
    let (mut app, mut model) = create_app(Document::from_text("# Title"));

    app.dispatch(&mut model, Message::ExportHtml);
    type_text(&mut app, &mut model, &out.display().to_string());
    app.dispatch(&mut model, Message::OverlaySubmit);

    assert!(fs::read_to_string(&out).unwrap().contains("Title</h1>"));
    assert!(toast_text(&model).unwrap().starts_with("Exported HTML"));
}

#[test]
fn test_export_writes_html_of_latest_edit() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.html");
    let (mut app, mut model) = create_app(Document::from_text("# Old"));
    app.dispatch(&mut model, Message::MoveToEnd(false));
    app.dispatch(&mut model, Message::InsertText(" and new".to_string()));

    app.dispatch(&mut model, Message::ExportHtml);
    type_text(&mut app, &mut model, &out.display().to_string());
    app.dispatch(&mut model, Message::OverlaySubmit);

    let written = fs::read_to_string(&out).unwrap();
    assert_eq!(written, model.html);
    assert!(written.contains("Old and new</h1>"));
}

#[test]
fn test_export_pdf_uses_converter() {
    let dir = tempdir().unwrap();
    let out = dir.path().join("out.pdf");
    let (mut app, mut model) = create_app(Document::from_text("*hi*"));

    app.dispatch(&mut model, Message::ExportPdf);
    type_text(&mut app, &mut model, &out.display().to_string());
    app.dispatch(&mut model, Message::OverlaySubmit);

    assert!(fs::read_to_string(&out).unwrap().contains("<em>hi</em>"));
}

#[test]
fn test_export_pdf_failure_is_reported() {
    let dir = tempdir().unwrap();
    let mut app = App::new(Document::from_text("x"))
        .with_config(quiet_config())
        .with_converter(Box::new(FakeConverter { fail: true }));
    let mut model = app.initial_model((80, 24));

    app.dispatch(&mut model, Message::ExportPdf);
    type_text(&mut app, &mut model, &dir.path().join("x.pdf").display().to_string());
    app.dispatch(&mut model, Message::OverlaySubmit);

    let (message, level) = model.active_toast().unwrap();
    assert_eq!(level, ToastLevel::Error);
    assert!(message.starts_with("Export Error"));
}

#[test]
fn test_export_prompt_suggests_sibling_file() {
    let model = Model::new(Document::unsaved_at("docs/readme.md"), (80, 24));
    let model = update(model, Message::ExportHtml);
    let Some(Overlay::Prompt(prompt)) = &model.overlay else {
        panic!("expected prompt");
    };
    assert_eq!(prompt.input, "docs/readme.html");
}

// --- Autosave ---

#[test]
fn test_autosave_writes_shadow_copy_when_due() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.md");
    fs::write(&path, "saved").unwrap();
    let mut app = App::new(Document::load(&path).unwrap()).with_config(EditorConfig {
        autosave_interval: Duration::from_secs(1),
        ..quiet_config()
    });
    let mut model = app.initial_model((80, 24));

    assert!(!app.poll_autosave(&mut model, Instant::now()));
    let later = Instant::now() + Duration::from_secs(2);
    assert!(!app.poll_autosave(&mut model, later));

    let shadow = dir.path().join("doc.md.autosave");
    assert_eq!(fs::read_to_string(shadow).unwrap(), "saved");
}

#[test]
fn test_autosave_failure_shows_toast_once() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("gone").join("doc.md");
    let mut app = App::new(Document::unsaved_at(&path)).with_config(EditorConfig {
        autosave_interval: Duration::from_secs(1),
        ..quiet_config()
    });
    let mut model = app.initial_model((80, 24));
    app.dispatch(&mut model, Message::InsertChar('x'));

    let first = Instant::now() + Duration::from_secs(2);
    assert!(app.poll_autosave(&mut model, first));
    assert!(toast_text(&model).unwrap().starts_with("Autosave Error"));

    let second = first + Duration::from_secs(2);
    assert!(!app.poll_autosave(&mut model, second));
}

#[test]
fn test_disabled_autosave_never_writes() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.md");
    fs::write(&path, "x").unwrap();
    let (mut app, mut model) = create_app(Document::load(&path).unwrap());
    app.poll_autosave(&mut model, Instant::now() + Duration::from_secs(3600));
    assert!(!dir.path().join("doc.md.autosave").exists());
}

#[test]
fn test_autosave_before_interval_writes_nothing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("doc.md");
    fs::write(&path, "x").unwrap();
    let mut app = App::new(Document::load(&path).unwrap()).with_config(EditorConfig {
        autosave_interval: Duration::from_secs(3600),
        ..quiet_config()
    });
    let mut model = app.initial_model((80, 24));
    app.dispatch(&mut model, Message::InsertChar('y'));

    assert!(!app.poll_autosave(&mut model, Instant::now()));
    assert!(!dir.path().join("doc.md.autosave").exists());
    assert_eq!(app.autosave.last_text(), "");
}

// --- Settings ---

#[test]
fn test_cycle_theme_updates_palette() {
    let model = create_test_model("");
    assert_eq!(model.theme, ThemeName::Light);
    let model = update(model, Message::CycleTheme);
    assert_eq!(model.theme, ThemeName::Dark);
    assert_eq!(model.palette, Palette::for_theme(ThemeName::Dark));
    assert_eq!(toast_text(&model), Some("Theme: Dark"));
}

#[test]
fn test_apply_setting_by_unknown_name_is_ignored() {
    let model = update(
        create_test_model(""),
        Message::ApplySetting(Setting::ThemeNamed("neon".to_string())),
    );
    assert_eq!(model.theme, ThemeName::Light);
    let model = update(
        model,
        Message::ApplySetting(Setting::ThemeNamed("Solarized".to_string())),
    );
    assert_eq!(model.theme, ThemeName::Solarized);
}

#[test]
fn test_background_override_survives_theme_change() {
    let bg = Rgb(0x12, 0x34, 0x56);
    let model = update(
        create_test_model(""),
        Message::ApplySetting(Setting::Background(Some(bg))),
    );
    assert_eq!(model.palette.window_bg, bg);
    let model = update(model, Message::CycleTheme);
    assert_eq!(model.palette.window_bg, bg);
    let model = update(model, Message::ApplySetting(Setting::Background(None)));
    assert_eq!(model.palette, Palette::for_theme(ThemeName::Dark));
}

#[test]
fn test_initial_model_uses_config_theme() {
    let mut app = App::new(Document::untitled()).with_config(EditorConfig {
        theme: ThemeName::HighContrast,
        ..quiet_config()
    });
    let model = app.initial_model((80, 24));
    assert_eq!(model.theme, ThemeName::HighContrast);
}

#[test]
fn test_choose_theme_by_name() {
    let model = update(create_test_model(""), Message::ChooseTheme);
    let Some(Overlay::Prompt(prompt)) = &model.overlay else {
        panic!("expected prompt");
    };
    assert_eq!(prompt.kind, PromptKind::Theme);
    assert_eq!(prompt.input, "light");

    let model = (0..5).fold(model, |m, _| update(m, Message::OverlayBackspace));
    let model = "solarized".chars().fold(model, |m, ch| update(m, Message::OverlayInput(ch)));
    let model = update(model, Message::OverlaySubmit);

    assert_eq!(model.theme, ThemeName::Solarized);
    assert!(model.overlay.is_none());
    assert_eq!(toast_text(&model), Some("Theme: Solarized"));
}

#[test]
fn test_choose_unknown_theme_keeps_current() {
    let mut model = update(create_test_model(""), Message::ChooseTheme);
    if let Some(Overlay::Prompt(prompt)) = &mut model.overlay {
        prompt.input = "neon".to_string();
    }
    let model = update(model, Message::OverlaySubmit);
    assert_eq!(model.theme, ThemeName::Light);
    assert_eq!(model.active_toast().map(|(_, level)| level), Some(ToastLevel::Warning));
}

#[test]
fn test_choose_background_sets_and_clears_override() {
    let model = update(create_test_model(""), Message::ChooseBackground);
    let model = "#102030".chars().fold(model, |m, ch| update(m, Message::OverlayInput(ch)));
    let model = update(model, Message::OverlaySubmit);
    assert_eq!(model.background, Some(Rgb(0x10, 0x20, 0x30)));
    assert_eq!(model.palette.window_bg, Rgb(0x10, 0x20, 0x30));

    let model = update(model, Message::ChooseBackground);
    let Some(Overlay::Prompt(prompt)) = &model.overlay else {
        panic!("expected prompt");
    };
    assert_eq!(prompt.input, "#102030");

    let model = (0..7).fold(model, |m, _| update(m, Message::OverlayBackspace));
    let model = update(model, Message::OverlaySubmit);
    assert_eq!(model.background, None);
    assert_eq!(model.palette, Palette::for_theme(ThemeName::Light));
}

#[test]
fn test_choose_background_rejects_bad_color() {
    let model = update(create_test_model(""), Message::ChooseBackground);
    let model = "blue".chars().fold(model, |m, ch| update(m, Message::OverlayInput(ch)));
    let model = update(model, Message::OverlaySubmit);
    assert_eq!(model.background, None);
    assert_eq!(
        toast_text(&model),
        Some("Invalid color 'blue', expected #rrggbb")
    );
}

// --- Overlays and keys ---

#[test]
fn test_toggle_help() {
    let model = update(create_test_model(""), Message::ToggleHelp);
    assert_eq!(model.overlay, Some(Overlay::Help));
    let model = update(model, Message::ToggleHelp);
    assert!(model.overlay.is_none());
}

#[test]
fn test_editor_keys_map_to_messages() {
    let model = create_test_model("");
    let ctrl = KeyModifiers::CONTROL;
    assert_eq!(App::handle_key(key(KeyCode::Char('s'), ctrl), &model), Some(Message::Save));
    assert_eq!(App::handle_key(key(KeyCode::Char('f'), ctrl), &model), Some(Message::OpenFind));
    assert_eq!(
        App::handle_key(key(KeyCode::Right, KeyModifiers::SHIFT), &model),
        Some(Message::MoveCursor(Direction::Right, true))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('2'), KeyModifiers::ALT), &model),
        Some(Message::Format(FormatAction::Heading(2)))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('q'), KeyModifiers::NONE), &model),
        Some(Message::InsertChar('q'))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('n'), KeyModifiers::ALT), &model),
        Some(Message::ChooseTheme)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('b'), KeyModifiers::ALT), &model),
        Some(Message::ChooseBackground)
    );
}

#[test]
fn test_find_overlay_keys() {
    let model = update(create_test_model(""), Message::OpenFind);
    assert_eq!(
        App::handle_key(key(KeyCode::Enter, KeyModifiers::NONE), &model),
        Some(Message::FindNext)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('a'), KeyModifiers::CONTROL), &model),
        Some(Message::ReplaceAll)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Char('s'), KeyModifiers::NONE), &model),
        Some(Message::OverlayInput('s'))
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Esc, KeyModifiers::NONE), &model),
        Some(Message::CloseOverlay)
    );
}

#[test]
fn test_confirm_overlay_keys() {
    let mut model = create_test_model("");
    model.overlay = Some(Overlay::ConfirmReload("doc.md".into()));
    assert_eq!(
        App::handle_key(key(KeyCode::Char('y'), KeyModifiers::NONE), &model),
        Some(Message::ConfirmReload)
    );
    assert_eq!(
        App::handle_key(key(KeyCode::Esc, KeyModifiers::NONE), &model),
        Some(Message::DeclineReload)
    );
    assert_eq!(App::handle_key(key(KeyCode::Char('x'), KeyModifiers::NONE), &model), None);
}

#[test]
fn test_resize_event_is_debounced() {
    let model = create_test_model("");
    let mut debouncer = ResizeDebouncer::new(100);
    let msg = App::handle_event(
        &crossterm::event::Event::Resize(120, 40),
        &model,
        0,
        &mut debouncer,
    );
    assert!(msg.is_none());
    assert_eq!(debouncer.take_ready(100), Some((120, 40)));
}

#[test]
fn test_resize_rewraps_preview() {
    let text = "word ".repeat(40);
    let model = Model::new(Document::from_text(&text), (200, 24));
    let wide = model.preview.len();
    let model = update(model, Message::Resize(40, 24));
    assert!(model.preview.len() > wide);
}

#[test]
fn test_toast_expires() {
    let mut model = update(create_test_model(""), Message::CycleTheme);
    assert!(model.active_toast().is_some());
    assert!(!model.expire_toast(Instant::now()));
    assert!(model.expire_toast(Instant::now() + Duration::from_secs(5)));
    assert!(model.active_toast().is_none());
}
