//! Application services layer.
//!
//! Services run network work off the UI thread and hand results back to the
//! screens through channels that the event loop polls on each tick.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                       UI Layer                       │
//! │   (App, CompleteProfileScreen, AvailabilityEditor)   │
//! └──────────────────────────┬───────────────────────────┘
//!                            │ TaskHandle / mpsc / watch
//!                            ▼
//! ┌──────────────────────────────────────────────────────┐
//! │                    Services Layer                    │
//! │  ProfileService  AddressAutocomplete  Notification-  │
//! │                                       Poller         │
//! └──────────────────────────┬───────────────────────────┘
//!                            ▼
//! ┌──────────────────────────────────────────────────────┐
//! │      Infrastructure (ApiClient, GeocodingClient)     │
//! └──────────────────────────────────────────────────────┘
//! ```

pub mod autocomplete;
pub mod notification_poller;
pub mod profile_service;
pub mod task;

pub use autocomplete::AddressAutocomplete;
pub use notification_poller::NotificationPoller;
pub use profile_service::{LoadedProfile, ProfileService};
pub use task::{spawn_task, TaskHandle};
