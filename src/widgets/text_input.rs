//! Text input widget for rendering [`TextInput`] fields of the wizard.
//!
//! The field shows its label as the block title and, when validation failed,
//! the message on the bottom border in the error color. Long text scrolls
//! horizontally so the cursor stays visible.

use crate::styles::theme;
use crate::utils::text_input::TextInput;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Paragraph};

pub struct TextInputWidget<'a> {
    input: &'a TextInput,
    title: Option<&'a str>,
    placeholder: Option<&'a str>,
    error: Option<&'a str>,
    /// Shown as "n/min" on the right of the title
    min_chars: Option<usize>,
    focused: bool,
}

impl<'a> TextInputWidget<'a> {
    pub fn new(input: &'a TextInput) -> Self {
        Self {
            input,
            title: None,
            placeholder: None,
            error: None,
            min_chars: None,
            focused: false,
        }
    }

    pub fn title(mut self, title: &'a str) -> Self {
        self.title = Some(title);
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    pub fn min_chars(mut self, min: usize) -> Self {
        self.min_chars = Some(min);
        self
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// First visible character so the cursor fits in `width` columns.
    fn scroll_offset(&self, width: u16) -> usize {
        let width = usize::from(width.max(1));
        self.input.cursor().saturating_sub(width - 1)
    }

    fn display_text(&self, width: u16) -> String {
        if self.input.text().is_empty() {
            return self.placeholder.unwrap_or("").to_string();
        }
        self.input
            .text()
            .chars()
            .skip(self.scroll_offset(width))
            .take(usize::from(width))
            .collect()
    }

    fn create_block(&self) -> Block<'a> {
        let t = theme();
        let border_style = if self.error.is_some() {
            t.error_style()
        } else if self.focused {
            t.border_focused_style()
        } else {
            t.border_style()
        };

        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border_style);

        if let Some(title) = self.title {
            block = block.title(format!(" {} ", title));
        }
        if let Some(min) = self.min_chars {
            let count = self.input.text().trim().chars().count();
            let style = if count >= min {
                t.success_style()
            } else {
                t.muted_style()
            };
            block = block.title(
                Line::from(Span::styled(format!(" {}/{} ", count, min), style))
                    .right_aligned(),
            );
        }
        if let Some(error) = self.error {
            block = block.title_bottom(Span::styled(format!(" {} ", error), t.error_style()));
        }
        block
    }

    fn cursor_position(&self, inner: Rect) -> Position {
        let visible = self.input.cursor() - self.scroll_offset(inner.width);
        let x = inner.x + u16::try_from(visible).unwrap_or(inner.width).min(inner.width);
        Position::new(x, inner.y)
    }
}

impl Widget for TextInputWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let t = theme();
        let block = self.create_block();
        let inner = block.inner(area);
        let style = if self.input.text().is_empty() {
            t.muted_style()
        } else {
            t.text_style()
        };
        Paragraph::new(self.display_text(inner.width))
            .style(style)
            .block(block)
            .render(area, buf);
    }
}

/// Extension trait for Frame to render a [`TextInputWidget`] and place the cursor.
pub trait TextInputWidgetExt {
    fn render_text_input_widget(&mut self, widget: TextInputWidget, area: Rect);
}

impl TextInputWidgetExt for Frame<'_> {
    fn render_text_input_widget(&mut self, widget: TextInputWidget, area: Rect) {
        let focused = widget.focused;
        let inner = widget.create_block().inner(area);
        let cursor = widget.cursor_position(inner);
        self.render_widget(widget, area);
        if focused {
            self.set_cursor_position(cursor);
        }
    }
}
