//! Themes and color definitions.
//!
//! A theme is a background/foreground pair for the window and for the two
//! panes. Markdown element styles in the preview are layered on top and pick
//! light or dark variants from the theme.

use std::fmt;

use ratatui::style::{Color, Modifier, Style};

use crate::highlight::HighlightBackground;
use crate::render::{InlineColor, InlineStyle, LineType};

/// Named editor theme.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeName {
    #[default]
    Light,
    Dark,
    Solarized,
    HighContrast,
}

impl ThemeName {
    pub const ALL: [Self; 4] = [Self::Light, Self::Dark, Self::Solarized, Self::HighContrast];

    /// Config-file spelling.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
            Self::Solarized => "solarized",
            Self::HighContrast => "high-contrast",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Light => "Light",
            Self::Dark => "Dark",
            Self::Solarized => "Solarized",
            Self::HighContrast => "High Contrast",
        }
    }

    /// Accepts either the config spelling or the display label.
    pub fn parse(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.as_str() == name || theme.label().eq_ignore_ascii_case(name))
    }

    #[must_use]
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|t| *t == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

/// A 24-bit color written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn parse_hex(value: &str) -> Option<Self> {
        let hex = value.strip_prefix('#')?;
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn to_color(self) -> Color {
        if supports_truecolor() {
            Color::Rgb(self.0, self.1, self.2)
        } else {
            Color::Indexed(rgb_to_xterm_256(self.0, self.1, self.2))
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

/// Resolved colors for the current theme.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub window_bg: Rgb,
    pub window_fg: Rgb,
    pub pane_bg: Rgb,
    pub pane_fg: Rgb,
    pub highlight: HighlightBackground,
}

impl Palette {
    pub const fn for_theme(theme: ThemeName) -> Self {
        match theme {
            ThemeName::Light => Self {
                window_bg: Rgb(0xff, 0xff, 0xff),
                window_fg: Rgb(0x00, 0x00, 0x00),
                pane_bg: Rgb(0xfa, 0xfa, 0xfa),
                pane_fg: Rgb(0x00, 0x00, 0x00),
                highlight: HighlightBackground::Light,
            },
            ThemeName::Dark => Self {
                window_bg: Rgb(0x28, 0x2c, 0x34),
                window_fg: Rgb(0xf0, 0xf0, 0xf0),
                pane_bg: Rgb(0x1e, 0x1e, 0x1e),
                pane_fg: Rgb(0xf0, 0xf0, 0xf0),
                highlight: HighlightBackground::Dark,
            },
            ThemeName::Solarized => Self {
                window_bg: Rgb(0xfd, 0xf6, 0xe3),
                window_fg: Rgb(0x65, 0x7b, 0x83),
                pane_bg: Rgb(0xfd, 0xf6, 0xe3),
                pane_fg: Rgb(0x65, 0x7b, 0x83),
                highlight: HighlightBackground::Light,
            },
            ThemeName::HighContrast => Self {
                window_bg: Rgb(0x00, 0x00, 0x00),
                window_fg: Rgb(0xff, 0xff, 0xff),
                pane_bg: Rgb(0x00, 0x00, 0x00),
                pane_fg: Rgb(0xff, 0xff, 0xff),
                highlight: HighlightBackground::Dark,
            },
        }
    }

    /// Theme colors with the window background optionally overridden.
    pub fn resolve(theme: ThemeName, background: Option<Rgb>) -> Self {
        let mut palette = Self::for_theme(theme);
        if let Some(bg) = background {
            palette.window_bg = bg;
        }
        palette
    }

    pub const fn is_light(&self) -> bool {
        matches!(self.highlight, HighlightBackground::Light)
    }

    pub fn window(&self) -> Style {
        Style::default()
            .bg(self.window_bg.to_color())
            .fg(self.window_fg.to_color())
    }

    pub fn pane(&self) -> Style {
        Style::default()
            .bg(self.pane_bg.to_color())
            .fg(self.pane_fg.to_color())
    }

    pub fn status(&self) -> Style {
        Style::default()
            .bg(self.pane_fg.to_color())
            .fg(self.pane_bg.to_color())
    }

    pub fn selection(&self) -> Style {
        self.pane().add_modifier(Modifier::REVERSED)
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::for_theme(ThemeName::default())
    }
}

/// Style for a preview line of the given type.
pub fn style_for_line_type(line_type: LineType, palette: &Palette) -> Style {
    let light = palette.is_light();
    let pick = |on_light: Color, on_dark: Color| if light { on_light } else { on_dark };
    let base = palette.pane();
    match line_type {
        LineType::Heading(1) => base
            .fg(pick(Color::Indexed(24), Color::Cyan))
            .add_modifier(Modifier::BOLD | Modifier::UNDERLINED),
        LineType::Heading(2) => base
            .fg(pick(Color::Indexed(22), Color::Green))
            .add_modifier(Modifier::BOLD),
        LineType::Heading(3) => base
            .fg(pick(Color::Indexed(58), Color::Yellow))
            .add_modifier(Modifier::BOLD),
        LineType::Heading(_) => base
            .fg(pick(Color::Indexed(24), Color::Blue))
            .add_modifier(Modifier::BOLD),
        LineType::CodeBlock | LineType::HorizontalRule => {
            base.fg(pick(Color::Indexed(241), Color::Indexed(245)))
        }
        LineType::BlockQuote => base
            .fg(pick(Color::Indexed(24), Color::Blue))
            .add_modifier(Modifier::ITALIC),
        LineType::Image => base
            .fg(pick(Color::Indexed(90), Color::Magenta))
            .add_modifier(Modifier::ITALIC),
        LineType::Toc => base
            .fg(pick(Color::Indexed(25), Color::LightBlue))
            .add_modifier(Modifier::UNDERLINED),
        LineType::ListItem(_) | LineType::Table | LineType::Paragraph | LineType::Empty => base,
    }
}

/// Style for an inline span, merged with a base line style.
pub fn style_for_inline(base: Style, inline: InlineStyle, palette: &Palette) -> Style {
    let light = palette.is_light();
    let mut style = base;

    if let Some(fg) = inline.fg {
        style = style.fg(inline_color(fg));
    }
    if let Some(bg) = inline.bg {
        style = style.bg(inline_color(bg));
    }
    if inline.emphasis {
        style = style.add_modifier(Modifier::ITALIC);
    }
    if inline.strong {
        style = style.add_modifier(Modifier::BOLD);
    }
    if inline.strikethrough {
        style = style.add_modifier(Modifier::CROSSED_OUT);
    }
    if inline.link {
        style = style.add_modifier(Modifier::UNDERLINED);
        if inline.fg.is_none() {
            style = style.fg(if light { Color::Blue } else { Color::LightBlue });
        }
    }
    if inline.code && inline.fg.is_none() {
        style = style.fg(if light { Color::Indexed(88) } else { Color::Red });
    }

    style
}

fn inline_color(color: InlineColor) -> Color {
    Rgb(color.r, color.g, color.b).to_color()
}

fn supports_truecolor() -> bool {
    if let Ok(force) = std::env::var("MDPAD_TRUECOLOR") {
        let value = force.to_ascii_lowercase();
        return matches!(value.as_str(), "1" | "true" | "yes" | "on");
    }
    supports_truecolor_from_env(
        std::env::var("COLORTERM").ok().as_deref(),
        std::env::var("TERM").ok().as_deref(),
    )
}

fn supports_truecolor_from_env(colorterm: Option<&str>, term: Option<&str>) -> bool {
    let has = |value: Option<&str>, needles: &[&str]| {
        value.is_some_and(|v| {
            let lower = v.to_ascii_lowercase();
            needles.iter().any(|n| lower.contains(n))
        })
    };
    has(colorterm, &["truecolor", "24bit"]) || has(term, &["direct", "truecolor"])
}

fn rgb_to_xterm_256(r: u8, g: u8, b: u8) -> u8 {
    // Result is always 0-5, fits in u8
    #[allow(clippy::cast_possible_truncation)]
    let to_cube = |v: u8| ((u16::from(v) * 5) / 255) as u8;
    16 + (36 * to_cube(r)) + (6 * to_cube(g)) + to_cube(b)
}
