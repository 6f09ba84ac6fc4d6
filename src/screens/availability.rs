//! Weekly availability editor.
//!
//! Opened from the worker step. Edits the wizard's [`AvailabilityMap`] in
//! place: every day lists its ranges, hours are picked from a fixed list.
//!
//! Keys: ↑/↓ row (crosses days), Tab start/end, ←/→ change hour,
//! `a` add range, `d`/Supr remove range, `x` clear cell, Esc/Enter close.

use crate::profile::availability::{cycle_hour, AvailabilityMap, RangeField, Weekday};
use crate::styles::{theme, LIST_HIGHLIGHT_SYMBOL};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, Clear, Paragraph};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorOutcome {
    Continue,
    Close,
}

#[derive(Debug, Clone)]
pub struct AvailabilityEditor {
    day: Weekday,
    row: usize,
    column: RangeField,
}

impl Default for AvailabilityEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl AvailabilityEditor {
    pub fn new() -> Self {
        Self {
            day: Weekday::Lunes,
            row: 0,
            column: RangeField::Start,
        }
    }

    pub fn selected(&self) -> (Weekday, usize, RangeField) {
        (self.day, self.row, self.column)
    }

    fn rows_in(map: &AvailabilityMap, day: Weekday) -> usize {
        map.ranges(day).len().max(1)
    }

    fn move_down(&mut self, map: &AvailabilityMap) {
        if self.row + 1 < Self::rows_in(map, self.day) {
            self.row += 1;
        } else if let Some(next) = Weekday::from_index(self.day.index() + 1) {
            self.day = next;
            self.row = 0;
        }
    }

    fn move_up(&mut self, map: &AvailabilityMap) {
        if self.row > 0 {
            self.row -= 1;
        } else if let Some(prev) = self.day.index().checked_sub(1).and_then(Weekday::from_index) {
            self.day = prev;
            self.row = Self::rows_in(map, prev) - 1;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, map: &mut AvailabilityMap) -> EditorOutcome {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => return EditorOutcome::Close,
            KeyCode::Down => self.move_down(map),
            KeyCode::Up => self.move_up(map),
            KeyCode::Tab | KeyCode::BackTab => {
                self.column = match self.column {
                    RangeField::Start => RangeField::End,
                    RangeField::End => RangeField::Start,
                };
            }
            KeyCode::Left | KeyCode::Right => {
                let forward = key.code == KeyCode::Right;
                if let Some(range) = map.ranges(self.day).get(self.row) {
                    let next = cycle_hour(range.get(self.column), forward);
                    map.update_range(self.day, self.row, self.column, next);
                }
            }
            KeyCode::Char('a') => {
                map.add_range(self.day);
                self.row = map.ranges(self.day).len() - 1;
                self.column = RangeField::Start;
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                map.remove_range(self.day, self.row);
                self.row = self.row.min(Self::rows_in(map, self.day) - 1);
            }
            KeyCode::Char('x') => map.update_range(self.day, self.row, self.column, ""),
            _ => {}
        }
        EditorOutcome::Continue
    }

    fn cell<'a>(&self, value: &'a str, selected: bool) -> Span<'a> {
        let t = theme();
        let text = if value.is_empty() { "--:--" } else { value };
        let style = if selected {
            t.highlight_style()
        } else if value.is_empty() {
            t.muted_style()
        } else {
            t.text_style()
        };
        Span::styled(format!(" {} ", text), style)
    }

    /// Lines to draw plus the index of the selected line.
    fn lines<'a>(&self, map: &'a AvailabilityMap) -> (Vec<Line<'a>>, usize) {
        let t = theme();
        let mut lines = Vec::new();
        let mut selected_line = 0;

        for day in Weekday::ALL {
            let summary_style = if map.is_open(day) {
                t.success_style()
            } else {
                t.muted_style()
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{:<10}", day.label()), t.title_style()),
                Span::styled(map.summary(day), summary_style),
            ]));

            let ranges = map.ranges(day);
            if ranges.is_empty() {
                let here = day == self.day;
                if here {
                    selected_line = lines.len();
                }
                let marker = if here { LIST_HIGHLIGHT_SYMBOL } else { "  " };
                lines.push(Line::from(vec![
                    Span::raw(format!("  {}", marker)),
                    Span::styled("sin horarios (a: agregar)", t.muted_style()),
                ]));
            }
            for (i, range) in ranges.iter().enumerate() {
                let here = day == self.day && i == self.row;
                if here {
                    selected_line = lines.len();
                }
                let marker = if here { LIST_HIGHLIGHT_SYMBOL } else { "  " };
                lines.push(Line::from(vec![
                    Span::raw(format!("  {}", marker)),
                    self.cell(&range.inicio, here && self.column == RangeField::Start),
                    Span::raw(" – "),
                    self.cell(&range.fin, here && self.column == RangeField::End),
                ]));
            }
        }
        (lines, selected_line)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, map: &AvailabilityMap) {
        let t = theme();
        frame.render_widget(Clear, area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(t.border_focused_style())
            .title(Span::styled(" Disponibilidad semanal ", t.title_style()))
            .title_bottom(Line::from(Span::styled(
                " ↑↓ fila  Tab inicio/fin  ←→ hora  a agregar  d quitar  x limpiar  Esc listo ",
                t.muted_style(),
            )));
        let inner_height = block.inner(area).height;

        let (lines, selected) = self.lines(map);
        let scroll = selected.saturating_sub(usize::from(inner_height.saturating_sub(1)));
        let scroll = u16::try_from(scroll).unwrap_or(u16::MAX);

        frame.render_widget(Paragraph::new(lines).block(block).scroll((scroll, 0)), area);
    }
}
