//! Screen trait and associated types.
//!
//! Screens own their state, draw themselves and turn input into a
//! [`ScreenAction`] for the app loop. Network work is started through the
//! handles in [`ScreenContext`] and collected in [`Screen::tick`].

use crate::api::ApiClient;
use crate::config::Config;
use crate::widgets::Toast;
use anyhow::Result;
use crossterm::event::Event;
use ratatui::layout::Rect;
use ratatui::Frame;
use tokio::runtime::Handle;

/// Read-only data for drawing.
pub struct RenderContext<'a> {
    pub config: &'a Config,
    /// Unread notifications, once the poller has answered
    pub unread: Option<usize>,
}

impl<'a> RenderContext<'a> {
    pub fn new(config: &'a Config, unread: Option<usize>) -> Self {
        Self { config, unread }
    }
}

/// Shared resources for event handling and background work.
pub struct ScreenContext<'a> {
    pub config: &'a Config,
    pub runtime: &'a Handle,
    pub api: &'a ApiClient,
}

impl<'a> ScreenContext<'a> {
    pub fn new(config: &'a Config, runtime: &'a Handle, api: &'a ApiClient) -> Self {
        Self {
            config,
            runtime,
            api,
        }
    }
}

/// What the app loop should do after a screen handled an event or tick.
#[derive(Debug, Clone, Default)]
pub enum ScreenAction {
    #[default]
    None,
    /// Leave the application.
    Quit,
    /// Show a blocking alert until dismissed.
    ShowAlert { title: String, message: String },
    /// Show a transient notification.
    ShowToast(Toast),
    /// The screen completed its job; navigate away.
    Finished,
}

pub trait Screen {
    fn render(&mut self, frame: &mut Frame, area: Rect, ctx: &RenderContext) -> Result<()>;

    fn handle_event(&mut self, event: Event, ctx: &ScreenContext) -> Result<ScreenAction>;

    /// Called on every UI tick to collect background results and timers.
    fn tick(&mut self, _ctx: &ScreenContext) -> Result<ScreenAction> {
        Ok(ScreenAction::None)
    }

    /// When true, printable keys are text and must not trigger shortcuts.
    fn is_input_focused(&self) -> bool {
        false
    }

    /// Called once when the screen becomes active.
    fn on_enter(&mut self, _ctx: &ScreenContext) -> Result<()> {
        Ok(())
    }
}
