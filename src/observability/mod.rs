//! Observability for the CRM backend
//!
//! Structured single-line JSON logs with a fixed set of typed events.
//!
//! ```ignore
//! use simplecrm::observability::{Event, Logger};
//!
//! Logger::info(Event::DocumentCreated.as_str(), &[("collection", "contact")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};
