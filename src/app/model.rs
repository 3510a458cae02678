use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use crate::config::EditorConfig;
use crate::document::Document;
use crate::render::{PreviewLine, markdown_to_html, render_preview};
use crate::search::SearchState;
use crate::ui::style::{Palette, Rgb, ThemeName};
use crate::ui::viewport::Viewport;

const TOAST_DURATION: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Warning,
    Error,
}

#[derive(Debug, Clone)]
struct Toast {
    level: ToastLevel,
    message: String,
    expires_at: Instant,
}

/// A change to the editor's appearance settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Setting {
    Theme(ThemeName),
    /// Theme by config or display name; unknown names are ignored.
    ThemeNamed(String),
    /// Window background override, or `None` to use the theme's.
    Background(Option<Rgb>),
}

/// What the path prompt is asking for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Open,
    SaveAs,
    ExportHtml,
    ExportPdf,
    ImportImage,
    /// Theme by name
    Theme,
    /// Window background as `#rrggbb`, empty for the theme's own
    Background,
}

impl PromptKind {
    pub const fn title(self) -> &'static str {
        match self {
            Self::Open => "Open File",
            Self::SaveAs => "Save As",
            Self::ExportHtml => "Export to HTML",
            Self::ExportPdf => "Export to PDF",
            Self::ImportImage => "Import Image",
            Self::Theme => "Theme",
            Self::Background => "Background Color",
        }
    }

    /// Label in front of the input field.
    pub const fn label(self) -> &'static str {
        match self {
            Self::Theme => "Name: ",
            Self::Background => "Color: ",
            _ => "Path: ",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPrompt {
    pub kind: PromptKind,
    pub input: String,
}

/// Which field of the find & replace dialog receives typing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FindField {
    #[default]
    Query,
    Replacement,
}

/// Modal layer drawn over the panes. At most one is open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Overlay {
    Find(FindField),
    Prompt(PathPrompt),
    /// The watched file changed on disk; ask before reloading it.
    ConfirmReload(PathBuf),
    Help,
}

/// File work queued by [`update`](super::update) for the effect handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileRequest {
    New,
    Open(PathBuf),
    Save,
    SaveAs(PathBuf),
    ExportHtml(PathBuf),
    ExportPdf(PathBuf),
    Reload,
}

/// The complete application state.
///
/// All state lives here - no global or scattered state.
pub struct Model {
    /// The open document and its editor buffer
    pub document: Document,
    /// Find & replace inputs, kept between dialog openings
    pub search: SearchState,
    pub overlay: Option<Overlay>,
    /// Overlay set aside while the reload question is asked
    pub(super) suspended_overlay: Option<Overlay>,
    pub theme: ThemeName,
    pub background: Option<Rgb>,
    /// Colors resolved from `theme` and `background`
    pub palette: Palette,
    /// Styled lines shown in the preview pane
    pub preview: Vec<PreviewLine>,
    /// HTML rendering of the current text, used for export
    pub html: String,
    /// Scroll state of the preview pane
    pub preview_viewport: Viewport,
    /// First buffer line shown in the editor pane
    pub editor_scroll_offset: usize,
    /// First display column shown in the editor pane
    pub editor_col_offset: usize,
    /// Terminal size in cells
    pub size: (u16, u16),
    /// Global config path shown in help
    pub config_global_path: Option<PathBuf>,
    /// Local override path shown in help
    pub config_local_path: Option<PathBuf>,
    pub should_quit: bool,
    pub(super) quit_confirmed: bool,
    pub(super) pending_request: Option<FileRequest>,
    render_key: Option<RenderKey>,
    toast: Option<Toast>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct RenderKey {
    revision: u64,
    width: u16,
    light: bool,
}

impl Model {
    pub fn new(document: Document, size: (u16, u16)) -> Self {
        let mut model = Self {
            document,
            size,
            ..Self::default()
        };
        model.resize(size.0, size.1);
        model
    }

    /// Start with the theme and background from `config`.
    #[must_use]
    pub fn with_config(mut self, config: &EditorConfig) -> Self {
        self.apply_setting(Setting::Theme(config.theme));
        self.apply_setting(Setting::Background(config.background));
        self
    }

    /// The single setter for appearance settings.
    pub fn apply_setting(&mut self, setting: Setting) {
        match setting {
            Setting::Theme(theme) => self.theme = theme,
            Setting::ThemeNamed(name) => match ThemeName::parse(&name) {
                Some(theme) => self.theme = theme,
                None => return,
            },
            Setting::Background(background) => self.background = background,
        }
        self.palette = Palette::resolve(self.theme, self.background);
        self.refresh_render();
    }

    /// Re-render the preview and HTML if the text, width or palette changed.
    pub fn refresh_render(&mut self) {
        let key = RenderKey {
            revision: self.document.buffer.revision(),
            width: self.preview_width(),
            light: self.palette.is_light(),
        };
        if self.render_key == Some(key) {
            return;
        }
        let text = self.document.text();
        if self.render_key.is_none_or(|old| old.revision != key.revision) {
            self.html = markdown_to_html(&text);
        }
        self.preview = render_preview(&text, key.width, self.palette.highlight);
        self.preview_viewport.set_total_lines(self.preview.len());
        self.render_key = Some(key);
    }

    /// Swap in a freshly loaded or created document.
    pub fn replace_document(&mut self, document: Document) {
        self.document = document;
        self.editor_scroll_offset = 0;
        self.editor_col_offset = 0;
        self.preview_viewport.go_to_top();
        self.render_key = None;
        self.refresh_render();
    }

    /// Force the next refresh to re-render, e.g. after the text was reloaded.
    pub(super) fn invalidate_render(&mut self) {
        self.render_key = None;
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        self.size = (width, height);
        let (_, preview) = crate::ui::pane_content_sizes(width, height);
        self.preview_viewport.resize(preview.1);
        self.refresh_render();
    }

    /// Rows of text visible in the editor pane.
    pub fn editor_height(&self) -> usize {
        usize::from(crate::ui::pane_content_sizes(self.size.0, self.size.1).0.1)
    }

    /// Columns of text visible in the editor pane, right of the line numbers.
    pub fn editor_width(&self) -> usize {
        let pane = usize::from(crate::ui::pane_content_sizes(self.size.0, self.size.1).0.0);
        let gutter = usize::from(crate::ui::line_number_width(
            self.document.buffer.line_count(),
        ));
        pane.saturating_sub(gutter + 1)
    }

    fn preview_width(&self) -> u16 {
        crate::ui::pane_content_sizes(self.size.0, self.size.1).1.0
    }

    pub fn file_path(&self) -> Option<&Path> {
        self.document.file_path()
    }

    /// Title bar text: the file name or "Untitled", starred when dirty.
    pub fn title(&self) -> String {
        let dirty = if self.document.is_dirty() { "*" } else { "" };
        format!("{}{dirty} - mdpad", self.document.display_name())
    }

    /// Take the file request queued by the last update, if any.
    pub(super) fn take_request(&mut self) -> Option<FileRequest> {
        self.pending_request.take()
    }

    pub const fn pending_request(&self) -> Option<&FileRequest> {
        self.pending_request.as_ref()
    }

    pub const fn quit_pending(&self) -> bool {
        self.quit_confirmed
    }

    pub(super) fn show_toast(&mut self, level: ToastLevel, message: impl Into<String>) {
        self.toast = Some(Toast {
            level,
            message: message.into(),
            expires_at: Instant::now() + TOAST_DURATION,
        });
    }

    pub(super) fn expire_toast(&mut self, now: Instant) -> bool {
        if self
            .toast
            .as_ref()
            .is_some_and(|toast| toast.expires_at <= now)
        {
            self.toast = None;
            return true;
        }
        false
    }

    pub fn active_toast(&self) -> Option<(&str, ToastLevel)> {
        self.toast
            .as_ref()
            .map(|toast| (toast.message.as_str(), toast.level))
    }
}

impl Default for Model {
    fn default() -> Self {
        Self {
            document: Document::untitled(),
            search: SearchState::default(),
            overlay: None,
            suspended_overlay: None,
            theme: ThemeName::default(),
            background: None,
            palette: Palette::default(),
            preview: Vec::new(),
            html: String::new(),
            preview_viewport: Viewport::new(24, 0),
            editor_scroll_offset: 0,
            editor_col_offset: 0,
            size: (80, 24),
            config_global_path: None,
            config_local_path: None,
            should_quit: false,
            quit_confirmed: false,
            pending_request: None,
            render_key: None,
            toast: None,
        }
    }
}
