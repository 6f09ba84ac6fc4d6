//! Blocking alert dialog.
//!
//! Used for backend failures: the message is shown verbatim until the user
//! dismisses it.

use crate::styles::theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Padding, Paragraph, Wrap};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogVariant {
    #[default]
    Info,
    Error,
}

pub struct Dialog<'a> {
    pub title: &'a str,
    pub content: &'a str,
    pub variant: DialogVariant,
    pub footer: &'a str,
    pub max_width: u16,
}

impl<'a> Dialog<'a> {
    pub fn new(title: &'a str, content: &'a str) -> Self {
        Self {
            title,
            content,
            variant: DialogVariant::Info,
            footer: "Enter para cerrar",
            max_width: 70,
        }
    }

    pub fn variant(mut self, variant: DialogVariant) -> Self {
        self.variant = variant;
        self
    }

    pub fn footer(mut self, footer: &'a str) -> Self {
        self.footer = footer;
        self
    }

    /// Centered rectangle sized to the wrapped content.
    fn popup_area(&self, area: Rect) -> Rect {
        let width = self.max_width.min(area.width.saturating_sub(4)).max(10);
        let text_width = usize::from(width.saturating_sub(6).max(1));
        let lines: usize = self
            .content
            .lines()
            .map(|l| l.chars().count().div_ceil(text_width).max(1))
            .sum();
        // borders + padding + blank line + footer
        let height = u16::try_from(lines + 5)
            .unwrap_or(u16::MAX)
            .min(area.height.saturating_sub(2))
            .max(5u16.min(area.height));
        let x = area.x + area.width.saturating_sub(width) / 2;
        let y = area.y + area.height.saturating_sub(height) / 2;
        Rect::new(x, y, width.min(area.width), height)
    }
}

impl Widget for Dialog<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let t = theme();
        let popup = self.popup_area(area);
        Clear.render(popup, buf);

        let border_style = match self.variant {
            DialogVariant::Info => t.border_focused_style(),
            DialogVariant::Error => t.error_style(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(Span::styled(format!(" {} ", self.title), t.title_style()))
            .title_bottom(Line::from(Span::styled(format!(" {} ", self.footer), t.muted_style())).centered())
            .padding(Padding::new(2, 2, 1, 0));

        Paragraph::new(self.content)
            .wrap(Wrap { trim: true })
            .style(t.text_style())
            .block(block)
            .render(popup, buf);
    }
}
