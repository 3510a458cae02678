//! Syntax highlighting for code blocks.
//!
//! Uses syntect for highlighting with Sublime Text syntax definitions. The
//! preview gets styled spans; HTML export gets inline-styled `<pre>` markup.

use std::sync::OnceLock;

use syntect::easy::HighlightLines;
use syntect::highlighting::{Theme, ThemeSet};
use syntect::html::highlighted_html_for_string;
use syntect::parsing::{SyntaxReference, SyntaxSet};

use crate::render::{InlineColor, InlineSpan, InlineStyle};

/// Which background the highlighted code sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HighlightBackground {
    Light,
    #[default]
    Dark,
}

/// Highlight `code` into one span list per line.
///
/// Unknown or missing languages produce plain code-styled spans.
pub fn highlight_code(
    language: Option<&str>,
    code: &str,
    background: HighlightBackground,
) -> Vec<Vec<InlineSpan>> {
    let mut lines = Vec::new();
    let syntax_set = syntax_set();

    let Some(syntax) = find_syntax(language) else {
        for line in code.lines() {
            let style = InlineStyle {
                code: true,
                ..InlineStyle::default()
            };
            lines.push(vec![InlineSpan::new(line.to_string(), style)]);
        }
        return lines;
    };

    let mut highlighter = HighlightLines::new(syntax, theme(background));
    for line in code.lines() {
        let ranges = highlighter
            .highlight_line(line, syntax_set)
            .unwrap_or_default();
        let mut spans = Vec::new();
        for (style, text) in ranges {
            let fg = InlineColor {
                r: style.foreground.r,
                g: style.foreground.g,
                b: style.foreground.b,
            };
            let inline_style = InlineStyle {
                code: true,
                fg: Some(adjust_fg_for_background(fg, background)),
                ..InlineStyle::default()
            };
            spans.push(InlineSpan::new(text.to_string(), inline_style));
        }
        lines.push(spans);
    }

    lines
}

/// Highlight `code` as a standalone HTML `<pre>` block.
///
/// Returns `None` when the language is unknown so the caller can fall back
/// to a plain code block.
pub fn highlight_html(language: Option<&str>, code: &str) -> Option<String> {
    let syntax = find_syntax(language)?;
    highlighted_html_for_string(code, syntax_set(), syntax, theme(HighlightBackground::Light)).ok()
}

fn find_syntax(language: Option<&str>) -> Option<&'static SyntaxReference> {
    let language = language.filter(|lang| !lang.is_empty())?;
    let syntax_set = syntax_set();
    syntax_set
        .find_syntax_by_token(language)
        .or_else(|| syntax_set.find_syntax_by_name(language))
}

fn syntax_set() -> &'static SyntaxSet {
    static SYNTAX_SET: OnceLock<SyntaxSet> = OnceLock::new();
    SYNTAX_SET.get_or_init(SyntaxSet::load_defaults_newlines)
}

fn theme(background: HighlightBackground) -> &'static Theme {
    static DARK: OnceLock<Theme> = OnceLock::new();
    static LIGHT: OnceLock<Theme> = OnceLock::new();
    match background {
        HighlightBackground::Dark => DARK.get_or_init(|| {
            pick_theme(&[
                "Monokai Extended",
                "base16-eighties.dark",
                "Solarized (dark)",
                "base16-ocean.dark",
            ])
        }),
        HighlightBackground::Light => LIGHT.get_or_init(|| {
            pick_theme(&["InspiredGitHub", "Solarized (light)", "base16-ocean.light"])
        }),
    }
}

fn pick_theme(preferred: &[&str]) -> Theme {
    let theme_set = ThemeSet::load_defaults();
    for name in preferred {
        if let Some(theme) = theme_set.themes.get(*name) {
            return theme.clone();
        }
    }
    theme_set
        .themes
        .values()
        .next()
        .cloned()
        .unwrap_or_default()
}

fn adjust_fg_for_background(color: InlineColor, background: HighlightBackground) -> InlineColor {
    match background {
        HighlightBackground::Dark => color,
        HighlightBackground::Light => {
            let luma = (0.2126 * f32::from(color.r))
                + (0.7152 * f32::from(color.g))
                + (0.0722 * f32::from(color.b));
            if luma < 155.0 {
                return color;
            }

            let darken = |c: u8| (f32::from(c) * 0.42).round() as u8;
            InlineColor {
                r: darken(color.r),
                g: darken(color.g),
                b: darken(color.b),
            }
        }
    }
}
