//! Screen controllers for the application.
//!
//! Each screen implements [`Screen`]: it owns its state, renders itself and
//! turns input into a [`ScreenAction`] that the app loop acts on.
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │ App loop (250ms)                             │
//! │   poll event ──► screen.handle_event(ctx)    │
//! │   every pass ──► screen.tick(ctx)            │
//! │   ScreenAction ─► alert / toast / quit       │
//! └──────────────────────────────────────────────┘
//! ```

pub mod availability;
pub mod complete_profile;
pub mod screen_trait;

pub use availability::{AvailabilityEditor, EditorOutcome};
pub use complete_profile::CompleteProfileScreen;
pub use screen_trait::{RenderContext, Screen, ScreenAction, ScreenContext};
