//! Observable events emitted by the CRM backend.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration resolved from environment and CLI
    ConfigLoaded,
    /// Document store connection established
    StoreConnected,
    /// Document store could not be opened
    StoreUnavailable,
    /// HTTP listener bound, ready to serve
    Serving,

    // Requests
    /// One HTTP request/response cycle finished
    HttpRequest,
    /// Payload rejected by the schema layer
    ValidationRejected,

    // Storage
    /// Document inserted
    DocumentCreated,
    /// Store operation failed
    StorageFailed,

    // Email
    /// Mock e-mail send recorded
    EmailQueued,
}

impl Event {
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::StoreConnected => "STORE_CONNECTED",
            Event::StoreUnavailable => "STORE_UNAVAILABLE",
            Event::Serving => "SERVING",
            Event::HttpRequest => "HTTP_REQUEST",
            Event::ValidationRejected => "VALIDATION_REJECTED",
            Event::DocumentCreated => "DOCUMENT_CREATED",
            Event::StorageFailed => "STORAGE_FAILED",
            Event::EmailQueued => "EMAIL_QUEUED",
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
