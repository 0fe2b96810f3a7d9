//! UI/backend events and error modeling for the showcase controller.

use shared::domain::{DocumentSummary, SessionUser};
use shared::protocol::SignedUrlResult;

pub enum UiEvent {
    Info(String),
    SignedIn { user: SessionUser },
    SignedOut,
    /// The session changed underneath the view; re-pull whatever it shows.
    SoftRefresh,
    Documents(Vec<DocumentSummary>),
    DocumentLinks(Vec<SignedUrlResult>),
    Error(UiError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorCategory {
    Auth,
    Transport,
    Validation,
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiErrorContext {
    BackendStartup,
    SignIn,
    SignOut,
    FetchDocuments,
    SignLinks,
}

pub fn classify_sign_in_failure(message: &str) -> String {
    let lower = message.to_ascii_lowercase();
    if lower.contains("backend worker startup failure") || lower.contains("failed to build")
    {
        "Backend worker startup failure; verify local app environment and retry.".to_string()
    } else if lower.contains("failed to connect")
        || lower.contains("connection refused")
        || lower.contains("dns")
        || lower.contains("timed out")
    {
        "Identity service unreachable; check URL/network and retry sign-in.".to_string()
    } else if lower.contains("credential") {
        "Sign-in rejected; check e-mail address and password.".to_string()
    } else {
        format!("Sign-in error: {message}")
    }
}

#[derive(Debug, Clone)]
pub struct UiError {
    category: UiErrorCategory,
    context: UiErrorContext,
    message: String,
}

impl UiError {
    pub fn from_message(context: UiErrorContext, message: impl Into<String>) -> Self {
        let message = message.into();
        let message_lower = message.to_ascii_lowercase();
        let category = if message_lower.contains("401")
            || message_lower.contains("403")
            || message_lower.contains("unauthorized")
            || message_lower.contains("forbidden")
            || message_lower.contains("credential")
            || message_lower.contains("no active session")
            || message_lower.contains("session expired")
            || message_lower.contains("invalid token")
        {
            UiErrorCategory::Auth
        } else if message_lower.contains("invalid")
            || message_lower.contains("missing")
            || message_lower.contains("malformed")
        {
            UiErrorCategory::Validation
        } else if message_lower.contains("timeout")
            || message_lower.contains("timed out")
            || message_lower.contains("connection")
            || message_lower.contains("network")
            || message_lower.contains("transport")
            || message_lower.contains("unavailable")
            || message_lower.contains("disconnect")
        {
            UiErrorCategory::Transport
        } else {
            UiErrorCategory::Unknown
        };

        Self {
            category,
            context,
            message,
        }
    }

    pub fn requires_reauth(&self) -> bool {
        self.category == UiErrorCategory::Auth
    }

    pub fn category(&self) -> UiErrorCategory {
        self.category
    }

    pub fn context(&self) -> UiErrorContext {
        self.context
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

#[cfg(test)]
mod tests {
    use super::{classify_sign_in_failure, UiError, UiErrorCategory, UiErrorContext};

    #[test]
    fn classifies_rejected_credentials_as_auth_error() {
        let error = UiError::from_message(
            UiErrorContext::SignIn,
            "identity provider rejected the credentials",
        );
        assert_eq!(error.category(), UiErrorCategory::Auth);
        assert!(error.requires_reauth());
    }

    #[test]
    fn classifies_expired_session_as_auth_error() {
        let error = UiError::from_message(UiErrorContext::FetchDocuments, "no active session");
        assert_eq!(error.category(), UiErrorCategory::Auth);
        assert!(error.requires_reauth());
    }

    #[test]
    fn classifies_connection_failures_as_transport_error() {
        let error = UiError::from_message(
            UiErrorContext::SignLinks,
            "storage request failed: error sending request: connection refused",
        );
        assert_eq!(error.category(), UiErrorCategory::Transport);
        assert!(!error.requires_reauth());
    }

    #[test]
    fn classifies_malformed_responses_as_validation_error() {
        let error = UiError::from_message(
            UiErrorContext::SignIn,
            "malformed identity response: session has an empty access token",
        );
        assert_eq!(error.category(), UiErrorCategory::Validation);
    }

    #[test]
    fn unknown_messages_keep_their_text() {
        let error = UiError::from_message(UiErrorContext::SignOut, "boom");
        assert_eq!(error.category(), UiErrorCategory::Unknown);
        assert_eq!(error.message(), "boom");
        assert_eq!(error.context(), UiErrorContext::SignOut);
    }

    #[test]
    fn sign_in_failure_text_guides_the_user() {
        assert_eq!(
            classify_sign_in_failure("identity provider rejected the credentials"),
            "Sign-in rejected; check e-mail address and password."
        );
        assert_eq!(
            classify_sign_in_failure("identity request failed: connection refused"),
            "Identity service unreachable; check URL/network and retry sign-in."
        );
        assert_eq!(
            classify_sign_in_failure("backend worker startup failure: failed to build runtime: nope"),
            "Backend worker startup failure; verify local app environment and retry."
        );
        assert_eq!(classify_sign_in_failure("boom"), "Sign-in error: boom");
    }
}
