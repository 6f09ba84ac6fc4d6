//! Header of the wizard: step indicator plus field completion gauge.

use crate::profile::wizard::StepProgress;
use crate::styles::theme;
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Gauge};

pub struct StepProgressWidget<'a> {
    current: usize,
    total: usize,
    title: &'a str,
    progress: StepProgress,
    unread: Option<usize>,
}

impl<'a> StepProgressWidget<'a> {
    pub fn new(current: usize, total: usize, title: &'a str, progress: StepProgress) -> Self {
        Self {
            current,
            total,
            title,
            progress,
            unread: None,
        }
    }

    /// Notification badge shown on the right of the header.
    pub fn unread(mut self, unread: Option<usize>) -> Self {
        self.unread = unread;
        self
    }

    /// "● ● ○" style step dots.
    fn dots(&self) -> String {
        (1..=self.total)
            .map(|i| if i <= self.current { "●" } else { "○" })
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Widget for StepProgressWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let t = theme();
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(t.border_style())
            .title(Span::styled(
                format!(" Paso {} de {}: {} ", self.current, self.total, self.title),
                t.title_style(),
            ))
            .title(Line::from(Span::styled(format!(" {} ", self.dots()), t.title_style())).right_aligned());
        if let Some(count) = self.unread.filter(|c| *c > 0) {
            block = block.title_bottom(
                Line::from(Span::styled(format!(" 🔔 {} ", count), t.warning_style())).right_aligned(),
            );
        }

        Gauge::default()
            .block(block)
            .gauge_style(t.success_style())
            .ratio(self.progress.ratio().clamp(0.0, 1.0))
            .label(self.progress.label())
            .render(area, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn test_header_text() {
        let backend = TestBackend::new(60, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let progress = StepProgress {
            completed: 2,
            total: 4,
        };
        terminal
            .draw(|f| {
                f.render_widget(
                    StepProgressWidget::new(2, 4, "Dirección", progress),
                    f.area(),
                );
            })
            .unwrap();
        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Paso 2 de 4"));
        assert!(text.contains("2 de 4 campos"));
    }

    #[test]
    fn test_dots() {
        let widget = StepProgressWidget::new(
            2,
            3,
            "x",
            StepProgress {
                completed: 0,
                total: 1,
            },
        );
        assert_eq!(widget.dots(), "● ● ○");
    }
}
