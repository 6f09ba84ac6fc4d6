//! Application loop: terminal, runtime and the wizard screen.

use crate::api::ApiClient;
use crate::config::Config;
use crate::geocoding::GeocodingClient;
use crate::screens::{CompleteProfileScreen, RenderContext, Screen, ScreenAction, ScreenContext};
use crate::services::{AddressAutocomplete, NotificationPoller};
use crate::session::Session;
use crate::tui::Tui;
use crate::widgets::{Dialog, DialogVariant, ToastManager};
use anyhow::{Context, Result};
use crossterm::event::{Event, KeyCode, KeyEventKind, KeyModifiers};
use std::time::Duration;
use tokio::runtime::Runtime;
use tracing::{info, warn};

/// UI tick: event poll timeout and background result check.
pub const TICK_RATE: Duration = Duration::from_millis(250);

struct Alert {
    title: String,
    message: String,
}

pub struct App {
    config: Config,
    api: ApiClient,
    tui: Tui,
    runtime: Runtime,
    screen: CompleteProfileScreen,
    poller: NotificationPoller,
    toasts: ToastManager,
    alert: Option<Alert>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config, session: Session) -> Result<Self> {
        let runtime = Runtime::new().context("Failed to create tokio runtime")?;
        info!(
            "Starting wizard against {} (token {})",
            config.api_base_url,
            session.token_preview()
        );

        let api = ApiClient::new(&config, session)?;
        let geocoding = GeocodingClient::new(&config)?;
        let autocomplete = AddressAutocomplete::new(
            geocoding,
            runtime.handle().clone(),
            Duration::from_millis(config.autocomplete_debounce_ms),
        );
        let poller = NotificationPoller::start(
            runtime.handle(),
            api.clone(),
            Duration::from_secs(config.notification_poll_secs),
        );
        let screen = CompleteProfileScreen::new(&config, autocomplete);

        Ok(Self {
            config,
            api,
            tui: Tui::new()?,
            runtime,
            screen,
            poller,
            toasts: ToastManager::new(),
            alert: None,
            should_quit: false,
        })
    }

    pub fn run(&mut self) -> Result<()> {
        self.tui.enter()?;
        let result = self.event_loop();
        self.tui.exit()?;
        result
    }

    fn event_loop(&mut self) -> Result<()> {
        {
            let handle = self.runtime.handle().clone();
            let ctx = ScreenContext::new(&self.config, &handle, &self.api);
            self.screen.on_enter(&ctx)?;
        }

        loop {
            let action = {
                let handle = self.runtime.handle().clone();
                let ctx = ScreenContext::new(&self.config, &handle, &self.api);
                self.screen.tick(&ctx)?
            };
            self.apply(action);
            self.toasts.tick();

            self.draw()?;

            if self.should_quit {
                break;
            }

            if let Some(event) = self.tui.poll_event(TICK_RATE)? {
                self.handle_event(event)?;
            }
        }
        Ok(())
    }

    fn draw(&mut self) -> Result<()> {
        let ctx = RenderContext::new(&self.config, self.poller.unread());
        let screen = &mut self.screen;
        let toasts = &self.toasts;
        let alert = self.alert.as_ref();

        let mut result = Ok(());
        self.tui.draw(|frame| {
            let area = frame.area();
            result = screen.render(frame, area, &ctx);
            toasts.render(frame, area);
            if let Some(alert) = alert {
                frame.render_widget(
                    Dialog::new(&alert.title, &alert.message).variant(DialogVariant::Error),
                    area,
                );
            }
        })?;
        result
    }

    fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = &event {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                self.should_quit = true;
                return Ok(());
            }
            if self.alert.is_some() {
                if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                    self.alert = None;
                }
                return Ok(());
            }
        }

        let action = {
            let handle = self.runtime.handle().clone();
            let ctx = ScreenContext::new(&self.config, &handle, &self.api);
            self.screen.handle_event(event, &ctx)?
        };
        self.apply(action);
        Ok(())
    }

    fn apply(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::None => {}
            ScreenAction::Quit => self.should_quit = true,
            ScreenAction::ShowAlert { title, message } => {
                warn!("{}: {}", title, message);
                self.alert = Some(Alert { title, message });
            }
            ScreenAction::ShowToast(toast) => self.toasts.push(toast),
            ScreenAction::Finished => {
                info!("Profile completed");
                self.should_quit = true;
            }
        }
    }
}
