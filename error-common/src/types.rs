use serde::{Deserialize, Serialize};

/// Coarse classification of a domain error.
///
/// The boundary layer keys its transport mapping off this. Every kind is
/// deterministic and non-retryable except `Storage`, which marks an
/// infrastructure failure surfaced unchanged from the persistence layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    NotFound,
    Conflict,
    PermissionDenied,
    ValidationFailed,
    FundsInsufficient,
    OverpaymentRejected,
    Storage,
}

/// Contract fulfilled by every domain error in the engine.
///
/// `code` is wire-visible and stable across releases; `message_key` is the
/// key a boundary layer resolves to a localized message.
pub trait DomainError: std::error::Error {
    fn kind(&self) -> ErrorKind;
    fn code(&self) -> &'static str;
    fn message_key(&self) -> &'static str;
}

/// Log a domain error with its stable code attached.
pub fn log_domain_error(context: &str, error: &dyn DomainError) {
    tracing::error!(
        context = context,
        code = error.code(),
        kind = ?error.kind(),
        error = %error,
        "domain error occurred"
    );
}
