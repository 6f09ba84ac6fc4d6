//! "Complete your profile" wizard screen.
//!
//! Walks the user through personal data, address, role and (for workers)
//! profession and availability, then submits everything in one request.
//! The profile is loaded in the background when the screen is entered and
//! the fields are pre-filled once it arrives.

use crate::api::{Profession, Service};
use crate::config::Config;
use crate::profile::draft::Field;
use crate::profile::validators::{DESCRIPTION_MIN_CHARS, SHORT_DESCRIPTION_MIN_CHARS};
use crate::profile::wizard::{Advance, ProfileWizard, Step};
use crate::profile::{ProfileDraft, ProfileSubmission, Weekday};
use crate::screens::availability::{AvailabilityEditor, EditorOutcome};
use crate::screens::screen_trait::{RenderContext, Screen, ScreenAction, ScreenContext};
use crate::services::{AddressAutocomplete, LoadedProfile, ProfileService, TaskHandle};
use crate::styles::{theme, LIST_HIGHLIGHT_SYMBOL};
use crate::utils::{expand_path, InputOutcome, TextInput};
use crate::widgets::{StepProgressWidget, TextInputWidget, TextInputWidgetExt, Toast};
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::prelude::*;
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use tracing::{info, warn};

/// How long the success toast stays up
pub const SUCCESS_TOAST_DURATION: Duration = Duration::from_secs(2);
/// Delay between a successful submit and leaving the wizard
pub const NAVIGATE_AWAY_DELAY: Duration = Duration::from_millis(1500);

/// Fields edited through a text box.
const TEXT_FIELDS: [Field; 8] = [
    Field::FirstName,
    Field::LastName,
    Field::Phone,
    Field::Description,
    Field::Address,
    Field::YearsExperience,
    Field::ShortDescription,
    Field::Languages,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Focus {
    Input(Field),
    Photo,
    Commune,
    Suggestions(usize),
    Role,
    Profession,
    Services,
    Availability,
}

pub struct CompleteProfileScreen {
    wizard: ProfileWizard,
    inputs: BTreeMap<Field, TextInput>,
    photo_input: TextInput,
    communes: Vec<String>,
    professions: Vec<Profession>,
    services: Vec<Service>,
    service_cursor: usize,
    focus: Focus,
    autocomplete: AddressAutocomplete,
    editor: Option<AvailabilityEditor>,
    load_handle: Option<TaskHandle<LoadedProfile>>,
    submit_handle: Option<TaskHandle<()>>,
    leave_at: Option<Instant>,
}

impl CompleteProfileScreen {
    pub fn new(config: &Config, autocomplete: AddressAutocomplete) -> Self {
        let mut draft = ProfileDraft::new();
        draft.commune = config.default_commune.clone();

        let mut screen = Self {
            wizard: ProfileWizard::new(draft),
            inputs: BTreeMap::new(),
            photo_input: TextInput::new(),
            communes: config.communes.clone(),
            professions: Vec::new(),
            services: Vec::new(),
            service_cursor: 0,
            focus: Focus::Input(Field::FirstName),
            autocomplete,
            editor: None,
            load_handle: None,
            submit_handle: None,
            leave_at: None,
        };
        screen.sync_inputs();
        screen
    }

    pub fn wizard(&self) -> &ProfileWizard {
        &self.wizard
    }

    fn is_loading(&self) -> bool {
        self.load_handle.is_some()
    }

    /// Copy draft values into the text boxes.
    fn sync_inputs(&mut self) {
        for field in TEXT_FIELDS {
            let mut input = TextInput::with_text(self.wizard.draft().value(field));
            if field == Field::Description {
                input = input.max_chars(500);
            }
            self.inputs.insert(field, input);
        }
        let photo = self
            .wizard
            .draft()
            .photo
            .as_ref()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        self.photo_input.set_text(photo);
    }

    fn apply_loaded(&mut self, loaded: LoadedProfile) {
        self.wizard
            .prefill(loaded.draft, loaded.availability, loaded.selected_services);
        self.professions = loaded.professions;
        self.services = loaded.services;
        self.service_cursor = 0;
        self.sync_inputs();
        self.focus = self.focus_order()[0];
    }

    fn focus_order(&self) -> Vec<Focus> {
        match self.wizard.step() {
            Step::Personal => vec![
                Focus::Input(Field::FirstName),
                Focus::Input(Field::LastName),
                Focus::Input(Field::Phone),
                Focus::Input(Field::Description),
                Focus::Photo,
            ],
            Step::Address => vec![Focus::Commune, Focus::Input(Field::Address)],
            Step::Role => vec![Focus::Role],
            Step::Worker => vec![
                Focus::Profession,
                Focus::Input(Field::YearsExperience),
                Focus::Input(Field::ShortDescription),
                Focus::Input(Field::Languages),
                Focus::Services,
                Focus::Availability,
            ],
        }
    }

    fn move_focus(&mut self, forward: bool) {
        let order = self.focus_order();
        let current = match self.focus {
            Focus::Suggestions(_) => Focus::Input(Field::Address),
            other => other,
        };
        let pos = order.iter().position(|f| *f == current).unwrap_or(0);
        let next = if forward {
            (pos + 1) % order.len()
        } else {
            (pos + order.len() - 1) % order.len()
        };
        self.focus = order[next];
    }

    /// Focus the first field of the current step that shows an error.
    fn focus_first_error(&mut self) {
        let step = self.wizard.step();
        if let Some(field) = step
            .fields()
            .iter()
            .find(|f| self.wizard.error(**f).is_some())
        {
            self.focus = match field {
                Field::Profession => Focus::Profession,
                other => Focus::Input(*other),
            };
        }
    }

    fn on_text_changed(&mut self, field: Field) {
        let text = self
            .inputs
            .get(&field)
            .map(|i| i.text().to_string())
            .unwrap_or_default();
        self.wizard.set_field(field, &text);
        if field == Field::Address {
            let commune = self.wizard.draft().commune.clone();
            self.autocomplete.on_input(&text, &commune);
        }
    }

    fn on_photo_changed(&mut self) {
        let path = self.photo_input.text().trim();
        self.wizard.draft_mut().photo = if path.is_empty() {
            None
        } else {
            Some(expand_path(path))
        };
    }

    fn cycle_commune(&mut self, forward: bool) {
        if self.communes.is_empty() {
            return;
        }
        let len = self.communes.len();
        let pos = self
            .communes
            .iter()
            .position(|c| *c == self.wizard.draft().commune)
            .unwrap_or(0);
        let next = if forward { (pos + 1) % len } else { (pos + len - 1) % len };
        let commune = self.communes[next].clone();
        self.wizard.draft_mut().set_commune(&commune);
        self.autocomplete.cancel();
        if let Some(input) = self.inputs.get_mut(&Field::Address) {
            input.set_text(self.wizard.draft().address.clone());
        }
    }

    fn cycle_role(&mut self, forward: bool) {
        let role = self.wizard.draft().role;
        self.wizard
            .set_role(if forward { role.next() } else { role.prev() });
    }

    fn cycle_profession(&mut self, forward: bool) {
        if self.professions.is_empty() {
            return;
        }
        let len = self.professions.len();
        let next = match self
            .professions
            .iter()
            .position(|p| Some(p.id) == self.wizard.draft().profession_id)
        {
            Some(pos) if forward => (pos + 1) % len,
            Some(pos) => (pos + len - 1) % len,
            None if forward => 0,
            None => len - 1,
        };
        let id = self.professions[next].id.to_string();
        self.wizard.set_field(Field::Profession, &id);
    }

    fn choose_suggestion(&mut self, index: usize) {
        if let Some(suggestion) = self.autocomplete.choose(index) {
            info!("Address chosen: {}", suggestion.display_name);
            self.wizard
                .set_field(Field::Address, &suggestion.display_name);
            self.wizard
                .draft_mut()
                .choose_address(&suggestion.display_name, suggestion.location);
            if let Some(input) = self.inputs.get_mut(&Field::Address) {
                input.set_text(suggestion.display_name);
            }
        }
        self.focus = Focus::Input(Field::Address);
    }

    fn toggle_service(&mut self) {
        if let Some(service) = self.services.get(self.service_cursor) {
            self.wizard.toggle_service(service.id);
        }
    }

    fn submit(&mut self, ctx: &ScreenContext) -> ScreenAction {
        let submission = match ProfileSubmission::assemble(
            self.wizard.draft(),
            self.wizard.availability(),
            self.wizard.selected_services(),
        ) {
            Ok(submission) => submission,
            Err(e) => {
                return ScreenAction::ShowAlert {
                    title: "Error".to_string(),
                    message: format!("{:#}", e),
                }
            }
        };
        self.wizard.set_submitting(true);
        self.submit_handle = Some(ProfileService::start_submit(
            ctx.runtime,
            ctx.api.clone(),
            submission,
        ));
        ScreenAction::ShowToast(Toast::info("Guardando perfil…"))
    }

    fn on_enter_key(&mut self, ctx: &ScreenContext) -> ScreenAction {
        match self.focus {
            Focus::Suggestions(i) => {
                self.choose_suggestion(i);
                ScreenAction::None
            }
            Focus::Availability => {
                self.editor = Some(AvailabilityEditor::new());
                ScreenAction::None
            }
            Focus::Services => {
                self.toggle_service();
                ScreenAction::None
            }
            _ => match self.wizard.advance() {
                Advance::Moved(step) => {
                    info!("Wizard moved to step {}", step);
                    self.autocomplete.cancel();
                    self.focus = self.focus_order()[0];
                    ScreenAction::None
                }
                Advance::Blocked => {
                    self.focus_first_error();
                    ScreenAction::None
                }
                Advance::Submit => self.submit(ctx),
                Advance::Busy => ScreenAction::None,
            },
        }
    }

    fn on_escape(&mut self) -> ScreenAction {
        if matches!(self.focus, Focus::Suggestions(_)) || !self.autocomplete.suggestions().is_empty()
        {
            self.autocomplete.cancel();
            if matches!(self.focus, Focus::Suggestions(_)) {
                self.focus = Focus::Input(Field::Address);
            }
            return ScreenAction::None;
        }
        if self.wizard.retreat() {
            self.autocomplete.cancel();
            self.focus = self.focus_order()[0];
            ScreenAction::None
        } else {
            ScreenAction::Quit
        }
    }

    fn handle_focused_key(&mut self, key: KeyEvent) {
        match (self.focus, key.code) {
            (Focus::Input(Field::Address), KeyCode::Down)
                if !self.autocomplete.suggestions().is_empty() =>
            {
                self.focus = Focus::Suggestions(0);
            }
            (Focus::Suggestions(i), KeyCode::Up) => {
                self.focus = if i == 0 {
                    Focus::Input(Field::Address)
                } else {
                    Focus::Suggestions(i - 1)
                };
            }
            (Focus::Suggestions(i), KeyCode::Down) => {
                let last = self.autocomplete.suggestions().len().saturating_sub(1);
                self.focus = Focus::Suggestions((i + 1).min(last));
            }
            (Focus::Suggestions(_), _) => {}
            (_, KeyCode::Up) => self.move_focus(false),
            (_, KeyCode::Down) => self.move_focus(true),
            (Focus::Input(field), _) => {
                let outcome = self
                    .inputs
                    .get_mut(&field)
                    .map(|input| input.handle_key(key))
                    .unwrap_or(InputOutcome::Ignored);
                if outcome == InputOutcome::Edited {
                    self.on_text_changed(field);
                }
            }
            (Focus::Photo, _) => {
                if self.photo_input.handle_key(key) == InputOutcome::Edited {
                    self.on_photo_changed();
                }
            }
            (Focus::Commune, KeyCode::Left | KeyCode::Right) => {
                self.cycle_commune(key.code == KeyCode::Right);
            }
            (Focus::Role, KeyCode::Left | KeyCode::Right) => {
                self.cycle_role(key.code == KeyCode::Right);
            }
            (Focus::Profession, KeyCode::Left | KeyCode::Right) => {
                self.cycle_profession(key.code == KeyCode::Right);
            }
            (Focus::Services, KeyCode::Left) => {
                self.service_cursor = self.service_cursor.saturating_sub(1);
            }
            (Focus::Services, KeyCode::Right) => {
                if self.service_cursor + 1 < self.services.len() {
                    self.service_cursor += 1;
                }
            }
            (Focus::Services, KeyCode::Char(' ')) => self.toggle_service(),
            (Focus::Availability, KeyCode::Char(' ')) => {
                self.editor = Some(AvailabilityEditor::new());
            }
            _ => {}
        }
    }

    // Rendering

    fn render_input(&self, frame: &mut Frame, area: Rect, field: Field) {
        let Some(input) = self.inputs.get(&field) else {
            return;
        };
        let mut widget = TextInputWidget::new(input)
            .title(field.label())
            .placeholder(field.placeholder())
            .error(self.wizard.error(field))
            .focused(self.focus == Focus::Input(field));
        widget = match field {
            Field::Description => widget.min_chars(DESCRIPTION_MIN_CHARS),
            Field::ShortDescription => widget.min_chars(SHORT_DESCRIPTION_MIN_CHARS),
            _ => widget,
        };
        frame.render_text_input_widget(widget, area);
    }

    fn render_selector(
        &self,
        frame: &mut Frame,
        area: Rect,
        title: &str,
        value: &str,
        focus: Focus,
        error: Option<&str>,
    ) {
        let t = theme();
        let focused = self.focus == focus;
        let border = if error.is_some() {
            t.error_style()
        } else if focused {
            t.border_focused_style()
        } else {
            t.border_style()
        };
        let mut block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(format!(" {} ", title));
        if let Some(error) = error {
            block = block.title_bottom(Span::styled(format!(" {} ", error), t.error_style()));
        }
        let style = if focused {
            t.highlight_style()
        } else {
            t.text_style()
        };
        let line = Line::from(vec![
            Span::styled("◀ ", t.muted_style()),
            Span::styled(value.to_string(), style),
            Span::styled(" ▶", t.muted_style()),
        ]);
        frame.render_widget(
            Paragraph::new(line).alignment(Alignment::Center).block(block),
            area,
        );
    }

    fn render_personal(&self, frame: &mut Frame, area: Rect) {
        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(area);
        self.render_input(frame, rows[0], Field::FirstName);
        self.render_input(frame, rows[1], Field::LastName);
        self.render_input(frame, rows[2], Field::Phone);
        self.render_input(frame, rows[3], Field::Description);
        frame.render_text_input_widget(
            TextInputWidget::new(&self.photo_input)
                .title("Foto de perfil (opcional)")
                .placeholder("Ruta a una imagen, ej: ~/Imágenes/yo.jpg")
                .focused(self.focus == Focus::Photo),
            rows[4],
        );
    }

    fn render_address(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let suggestions = self.autocomplete.suggestions();
        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(u16::try_from(suggestions.len()).unwrap_or(0) + 2),
            Constraint::Length(1),
            Constraint::Min(0),
        ])
        .split(area);

        let commune = self.wizard.draft().commune.clone();
        self.render_selector(frame, rows[0], "Comuna", &commune, Focus::Commune, None);
        self.render_input(frame, rows[1], Field::Address);

        if !suggestions.is_empty() {
            let items: Vec<ListItem> = suggestions
                .iter()
                .enumerate()
                .map(|(i, s)| {
                    let selected = self.focus == Focus::Suggestions(i);
                    let marker = if selected { LIST_HIGHLIGHT_SYMBOL } else { "  " };
                    let style = if selected {
                        t.highlight_style()
                    } else {
                        t.text_style()
                    };
                    ListItem::new(Line::from(Span::styled(
                        format!("{}{}", marker, s.display_name),
                        style,
                    )))
                })
                .collect();
            let block = Block::default()
                .borders(Borders::ALL)
                .border_type(BorderType::Rounded)
                .border_style(t.border_style())
                .title(" Sugerencias (↓ para elegir) ");
            frame.render_widget(List::new(items).block(block), rows[2]);
        }

        let location = match self.wizard.draft().location {
            Some(loc) => Span::styled(
                format!("Ubicación: {:.5}, {:.5}", loc.latitude, loc.longitude),
                t.success_style(),
            ),
            None => Span::styled(
                "Sin ubicación: elige una sugerencia para fijarla",
                t.muted_style(),
            ),
        };
        frame.render_widget(Paragraph::new(Line::from(location)), rows[3]);
    }

    fn render_role(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let rows = Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).split(area);
        let role = self.wizard.draft().role;
        self.render_selector(frame, rows[0], "Rol", role.label(), Focus::Role, None);

        let help = vec![
            Line::from(vec![
                Span::styled("Cliente: ", t.title_style()),
                Span::raw("contratas servicios."),
            ]),
            Line::from(vec![
                Span::styled("Trabajador: ", t.title_style()),
                Span::raw("ofreces servicios; completarás tu profesión y disponibilidad."),
            ]),
            Line::from(vec![
                Span::styled("Ambos: ", t.title_style()),
                Span::raw("contratas y ofreces servicios."),
            ]),
        ];
        frame.render_widget(
            Paragraph::new(help)
                .wrap(Wrap { trim: true })
                .style(t.text_style())
                .block(Block::default().borders(Borders::NONE)),
            rows[1],
        );
    }

    fn render_worker(&self, frame: &mut Frame, area: Rect) {
        let t = theme();
        let rows = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Min(9),
        ])
        .split(area);

        let profession = self
            .wizard
            .draft()
            .profession_id
            .and_then(|id| self.professions.iter().find(|p| p.id == id))
            .map(|p| p.nombre.clone())
            .unwrap_or_else(|| Field::Profession.placeholder().to_string());
        self.render_selector(
            frame,
            rows[0],
            Field::Profession.label(),
            &profession,
            Focus::Profession,
            self.wizard.error(Field::Profession),
        );
        self.render_input(frame, rows[1], Field::YearsExperience);
        self.render_input(frame, rows[2], Field::ShortDescription);
        self.render_input(frame, rows[3], Field::Languages);

        // Services
        let focused = self.focus == Focus::Services;
        let mut spans = Vec::new();
        for (i, service) in self.services.iter().enumerate() {
            let checked = self.wizard.selected_services().contains(&service.id);
            let style = if focused && i == self.service_cursor {
                t.highlight_style()
            } else if checked {
                t.success_style()
            } else {
                t.text_style()
            };
            let mark = if checked { "[x]" } else { "[ ]" };
            spans.push(Span::styled(format!("{} {}", mark, service.nombre), style));
            spans.push(Span::raw("  "));
        }
        if spans.is_empty() {
            spans.push(Span::styled("No hay servicios disponibles", t.muted_style()));
        }
        let border = if focused {
            t.border_focused_style()
        } else {
            t.border_style()
        };
        frame.render_widget(
            Paragraph::new(Line::from(spans)).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(border)
                    .title(" Servicios (←→ mover, Espacio marcar) "),
            ),
            rows[4],
        );

        // Availability summary
        let availability = self.wizard.availability();
        let lines: Vec<Line> = Weekday::ALL
            .iter()
            .map(|day| {
                let style = if availability.is_open(*day) {
                    t.text_style()
                } else {
                    t.muted_style()
                };
                Line::from(vec![
                    Span::styled(format!("{:<10}", day.label()), t.title_style()),
                    Span::styled(availability.summary(*day), style),
                ])
            })
            .collect();
        let border = if self.focus == Focus::Availability {
            t.border_focused_style()
        } else {
            t.border_style()
        };
        frame.render_widget(
            Paragraph::new(lines).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Rounded)
                    .border_style(border)
                    .title(" Disponibilidad (Enter para editar) "),
            ),
            rows[5],
        );
    }

    fn footer_text(&self) -> &'static str {
        if self.wizard.is_submitting() {
            return "Enviando perfil…";
        }
        if self.editor.is_some() {
            return "Editando disponibilidad";
        }
        match self.focus {
            Focus::Suggestions(_) => "↑↓ elegir  Enter usar dirección  Esc cerrar",
            Focus::Commune | Focus::Role | Focus::Profession => {
                "←→ cambiar  ↑↓/Tab campo  Enter siguiente  Esc atrás"
            }
            Focus::Availability => "Enter editar disponibilidad  ↑↓/Tab campo  Esc atrás",
            _ if self.wizard.is_last_step() => "Tab campo  Enter guardar perfil  Esc atrás",
            _ => "Tab campo  Enter siguiente  Esc atrás  Ctrl+C salir",
        }
    }
}

impl Screen for CompleteProfileScreen {
    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext) -> Result<()> {
        let t = theme();
        let chunks = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

        let step = self.wizard.step();
        frame.render_widget(
            StepProgressWidget::new(
                self.wizard.current_step(),
                self.wizard.total_steps(),
                step.title(),
                self.wizard.progress(step),
            )
            .unread(ctx.unread),
            chunks[0],
        );

        let body = chunks[1];
        if self.is_loading() {
            frame.render_widget(
                Paragraph::new("Cargando perfil…")
                    .style(t.muted_style())
                    .alignment(Alignment::Center),
                body,
            );
        } else if let Some(editor) = &self.editor {
            editor.render(frame, body, self.wizard.availability());
        } else {
            match step {
                Step::Personal => self.render_personal(frame, body),
                Step::Address => self.render_address(frame, body),
                Step::Role => self.render_role(frame, body),
                Step::Worker => self.render_worker(frame, body),
            }
        }

        frame.render_widget(
            Paragraph::new(self.footer_text()).style(t.muted_style()),
            chunks[2],
        );
        Ok(())
    }

    fn handle_event(&mut self, event: Event, ctx: &ScreenContext) -> Result<ScreenAction> {
        let Event::Key(key) = event else {
            return Ok(ScreenAction::None);
        };
        if key.kind != KeyEventKind::Press {
            return Ok(ScreenAction::None);
        }

        if let Some(editor) = self.editor.as_mut() {
            if editor.handle_key(key, self.wizard.availability_mut()) == EditorOutcome::Close {
                self.editor = None;
            }
            return Ok(ScreenAction::None);
        }

        if self.is_loading() {
            return Ok(if key.code == KeyCode::Esc {
                ScreenAction::Quit
            } else {
                ScreenAction::None
            });
        }
        if self.wizard.is_submitting() {
            return Ok(ScreenAction::None);
        }

        let action = match key.code {
            KeyCode::Esc => self.on_escape(),
            KeyCode::Enter => self.on_enter_key(ctx),
            KeyCode::Tab => {
                self.move_focus(true);
                ScreenAction::None
            }
            KeyCode::BackTab => {
                self.move_focus(false);
                ScreenAction::None
            }
            _ => {
                self.handle_focused_key(key);
                ScreenAction::None
            }
        };
        Ok(action)
    }

    fn tick(&mut self, _ctx: &ScreenContext) -> Result<ScreenAction> {
        self.autocomplete.poll();
        if let Focus::Suggestions(i) = self.focus {
            let len = self.autocomplete.suggestions().len();
            if len == 0 {
                self.focus = Focus::Input(Field::Address);
            } else if i >= len {
                self.focus = Focus::Suggestions(len - 1);
            }
        }

        if let Some(result) = self.load_handle.as_mut().and_then(TaskHandle::try_recv) {
            self.load_handle = None;
            match result {
                Ok(loaded) => self.apply_loaded(loaded),
                Err(e) => {
                    warn!("Failed to load profile: {:#}", e);
                    return Ok(ScreenAction::ShowAlert {
                        title: "No se pudo cargar el perfil".to_string(),
                        message: format!("{:#}", e),
                    });
                }
            }
        }

        if let Some(result) = self.submit_handle.as_mut().and_then(TaskHandle::try_recv) {
            self.submit_handle = None;
            match result {
                Ok(()) => {
                    self.leave_at = Some(Instant::now() + NAVIGATE_AWAY_DELAY);
                    return Ok(ScreenAction::ShowToast(
                        Toast::success("Perfil actualizado").with_duration(SUCCESS_TOAST_DURATION),
                    ));
                }
                Err(e) => {
                    self.wizard.set_submitting(false);
                    return Ok(ScreenAction::ShowAlert {
                        title: "Error".to_string(),
                        message: format!("{:#}", e),
                    });
                }
            }
        }

        if self.leave_at.is_some_and(|at| Instant::now() >= at) {
            self.leave_at = None;
            return Ok(ScreenAction::Finished);
        }
        Ok(ScreenAction::None)
    }

    fn is_input_focused(&self) -> bool {
        self.editor.is_none() && matches!(self.focus, Focus::Input(_) | Focus::Photo)
    }

    fn on_enter(&mut self, ctx: &ScreenContext) -> Result<()> {
        self.load_handle = Some(ProfileService::start_load(
            ctx.runtime,
            ctx.api.clone(),
            ctx.config.communes.clone(),
        ));
        Ok(())
    }
}
