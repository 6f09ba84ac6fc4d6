//! Theme and style system for the Servimatch TUI
//!
//! One global palette, switchable between dark, light and no-color at startup.

use ratatui::style::{Color, Modifier, Style};
use std::str::FromStr;
use std::sync::RwLock;

/// Marker shown next to the highlighted suggestion or choice
pub const LIST_HIGHLIGHT_SYMBOL: &str = "» ";

/// Servimatch brand teal (#00796B)
pub const BRAND_TEAL: Color = Color::Rgb(0x00, 0x79, 0x6B);

static THEME: RwLock<Theme> = RwLock::new(Theme {
    theme_type: ThemeType::Dark,
    primary: Color::Cyan,
    success: Color::Green,
    warning: Color::Yellow,
    error: Color::Red,
    text: Color::White,
    text_muted: Color::DarkGray,
    border: Color::DarkGray,
    border_focused: Color::Cyan,
    highlight_bg: Color::DarkGray,
});

/// Replace the global theme
pub fn init_theme(theme_type: ThemeType) {
    let mut theme = THEME.write().unwrap_or_else(|e| e.into_inner());
    *theme = Theme::new(theme_type);
}

/// Get the current theme
pub fn theme() -> Theme {
    THEME.read().unwrap_or_else(|e| e.into_inner()).clone()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThemeType {
    #[default]
    Dark,
    Light,
    /// No colors at all (`NO_COLOR=1`)
    NoColor,
}

impl FromStr for ThemeType {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "light" => ThemeType::Light,
            "nocolor" | "no-color" | "no_color" => ThemeType::NoColor,
            _ => ThemeType::Dark,
        })
    }
}

/// Color palette
#[derive(Debug, Clone)]
pub struct Theme {
    pub theme_type: ThemeType,
    /// Titles, active step, focused borders
    pub primary: Color,
    pub success: Color,
    pub warning: Color,
    /// Inline validation messages and failure dialogs
    pub error: Color,
    pub text: Color,
    pub text_muted: Color,
    pub border: Color,
    pub border_focused: Color,
    pub highlight_bg: Color,
}

impl Theme {
    pub fn new(theme_type: ThemeType) -> Self {
        match theme_type {
            ThemeType::Dark => Self::dark(),
            ThemeType::Light => Self::light(),
            ThemeType::NoColor => Self::no_color(),
        }
    }

    pub fn dark() -> Self {
        Self {
            theme_type: ThemeType::Dark,
            primary: Color::Cyan,
            success: Color::Green,
            warning: Color::Yellow,
            error: Color::Red,
            text: Color::White,
            text_muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: Color::Cyan,
            highlight_bg: Color::DarkGray,
        }
    }

    /// Brand teal on light terminal backgrounds
    pub fn light() -> Self {
        Self {
            theme_type: ThemeType::Light,
            primary: BRAND_TEAL,
            success: Color::Green,
            warning: Color::Rgb(180, 120, 0),
            error: Color::Red,
            text: Color::Black,
            text_muted: Color::DarkGray,
            border: Color::DarkGray,
            border_focused: BRAND_TEAL,
            highlight_bg: Color::Gray,
        }
    }

    pub fn no_color() -> Self {
        Self {
            theme_type: ThemeType::NoColor,
            primary: Color::Reset,
            success: Color::Reset,
            warning: Color::Reset,
            error: Color::Reset,
            text: Color::Reset,
            text_muted: Color::Reset,
            border: Color::Reset,
            border_focused: Color::Reset,
            highlight_bg: Color::Reset,
        }
    }

    fn colored(&self) -> bool {
        self.theme_type != ThemeType::NoColor
    }

    pub fn title_style(&self) -> Style {
        let style = Style::default().add_modifier(Modifier::BOLD);
        if self.colored() {
            style.fg(self.primary)
        } else {
            style
        }
    }

    pub fn text_style(&self) -> Style {
        if self.colored() {
            Style::default().fg(self.text)
        } else {
            Style::default()
        }
    }

    /// Placeholders, hints and closed days
    pub fn muted_style(&self) -> Style {
        if self.colored() {
            Style::default().fg(self.text_muted)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        }
    }

    pub fn success_style(&self) -> Style {
        if self.colored() {
            Style::default().fg(self.success)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        }
    }

    pub fn warning_style(&self) -> Style {
        if self.colored() {
            Style::default().fg(self.warning)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        }
    }

    pub fn error_style(&self) -> Style {
        if self.colored() {
            Style::default().fg(self.error)
        } else {
            Style::default().add_modifier(Modifier::BOLD | Modifier::ITALIC)
        }
    }

    pub fn border_style(&self) -> Style {
        if self.colored() {
            Style::default().fg(self.border)
        } else {
            Style::default()
        }
    }

    pub fn border_focused_style(&self) -> Style {
        if self.colored() {
            Style::default().fg(self.border_focused)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        }
    }

    /// Selected suggestion, choice or availability cell
    pub fn highlight_style(&self) -> Style {
        if self.colored() {
            Style::default()
                .fg(self.primary)
                .bg(self.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED)
        }
    }
}
