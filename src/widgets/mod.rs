// Reusable UI widgets

pub mod dialog;
pub mod step_progress;
pub mod text_input;
pub mod toast;

pub use dialog::{Dialog, DialogVariant};
pub use step_progress::StepProgressWidget;
pub use text_input::{TextInputWidget, TextInputWidgetExt};
pub use toast::{Toast, ToastManager, ToastVariant, ToastWidget};
