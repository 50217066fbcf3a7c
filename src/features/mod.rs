//! Per-feature state holders.
//!
//! Each feature owns its transient state and takes `&mut self` for the call
//! that talks to the network, so one value never has two requests in flight.

pub mod art;
pub mod chat;
pub mod homework;
pub mod writing;

pub use art::{ArtStudio, Generation};
pub use chat::ChatSession;
pub use homework::HomeworkSolver;
pub use writing::WritingAssistant;

/// Display text for a failed request.
pub(crate) fn error_text(err: &crate::Error) -> String {
    format!("Error: {}", err)
}
