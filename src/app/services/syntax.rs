use std::collections::HashMap;

use syntect::highlighting::{Color, HighlightIterator, HighlightState, Highlighter, ThemeSet};
use syntect::parsing::{ParseState, ScopeStack, SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use crate::app::domain::settings::CodeTheme;
use crate::app::infrastructure::error::{AppError, Result};

/// A run of code text sharing one color. `style` is `None` for the theme's
/// default foreground, so plain text stays unwrapped.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightedPiece {
    pub style: Option<String>,
    pub text: String,
}

/// Maps syntect colors to inline CSS, cached per theme.
struct StyleMap {
    color_to_css: HashMap<(u8, u8, u8), String>,
    default_fg: Option<(u8, u8, u8)>,
}

impl StyleMap {
    fn new(default_fg: Option<Color>) -> Self {
        Self {
            color_to_css: HashMap::new(),
            default_fg: default_fg.map(|c| (c.r, c.g, c.b)),
        }
    }

    fn css_for(&mut self, color: Color) -> Option<String> {
        let key = (color.r, color.g, color.b);
        if Some(key) == self.default_fg {
            return None;
        }
        let css = self
            .color_to_css
            .entry(key)
            .or_insert_with(|| format!("color: #{:02x}{:02x}{:02x};", key.0, key.1, key.2));
        Some(css.clone())
    }
}

pub struct CodeHighlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    style_map: StyleMap,
}

impl CodeHighlighter {
    pub fn new(theme: CodeTheme) -> Self {
        let syntax_set = SyntaxSet::load_defaults_newlines();
        let theme_set = ThemeSet::load_defaults();
        let mut highlighter = Self {
            syntax_set,
            theme_set,
            theme_name: String::new(),
            style_map: StyleMap::new(None),
        };
        highlighter.set_theme(theme);
        highlighter
    }

    /// Switch to a specific theme. Clears the style map.
    fn set_theme(&mut self, theme: CodeTheme) {
        self.theme_name = theme.theme_key().to_string();
        let fg = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .and_then(|t| t.settings.foreground);
        self.style_map = StyleMap::new(fg);
    }

    /// Pick a syntax: the language token first, then the first line
    /// (shebangs, modelines), then plain text.
    pub fn detect_syntax(&self, language: Option<&str>, text: &str) -> &SyntaxReference {
        detect_in(&self.syntax_set, language, text)
    }

    /// Highlight `text` into colored runs. Adjacent runs with the same color
    /// are merged; concatenating the runs gives back `text` exactly.
    pub fn highlight(&mut self, text: &str, language: Option<&str>) -> Result<Vec<HighlightedPiece>> {
        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .ok_or_else(|| AppError::Highlight(format!("unknown theme '{}'", self.theme_name)))?;
        let syntax = detect_in(&self.syntax_set, language, text);
        let highlighter = Highlighter::new(theme);
        let mut parse_state = ParseState::new(syntax);
        let mut highlight_state = HighlightState::new(&highlighter, ScopeStack::new());
        let mut pieces: Vec<HighlightedPiece> = Vec::new();

        for line in LinesWithEndings::from(text) {
            let ops = parse_state
                .parse_line(line, &self.syntax_set)
                .map_err(|e| AppError::Highlight(e.to_string()))?;
            let iter = HighlightIterator::new(&mut highlight_state, &ops, line, &highlighter);
            for (style, piece) in iter {
                if piece.is_empty() {
                    continue;
                }
                let css = if piece.trim().is_empty() {
                    pieces.last().and_then(|p| p.style.clone())
                } else {
                    self.style_map.css_for(style.foreground)
                };
                match pieces.last_mut() {
                    Some(last) if last.style == css => last.text.push_str(piece),
                    _ => pieces.push(HighlightedPiece {
                        style: css,
                        text: piece.to_string(),
                    }),
                }
            }
        }

        Ok(pieces)
    }
}

fn detect_in<'a>(syntax_set: &'a SyntaxSet, language: Option<&str>, text: &str) -> &'a SyntaxReference {
    language
        .and_then(|lang| syntax_set.find_syntax_by_token(lang))
        .or_else(|| {
            let first_line = text.lines().next().unwrap_or_default();
            syntax_set.find_syntax_by_first_line(first_line)
        })
        .unwrap_or_else(|| syntax_set.find_syntax_plain_text())
}
