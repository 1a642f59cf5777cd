use thiserror::Error;

/// Why one payment attempt ended in the `Error` state. Each is terminal for
/// the attempt; the user starts over explicitly.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutFailure {
    /// The relay could not be reached at all.
    #[error("Payment service unreachable: {0}")]
    Network(String),

    /// The relay answered with an error (configuration or gateway rejection).
    #[error("{0}")]
    Gateway(String),

    #[error("{0}")]
    ScriptLoad(String),

    /// The Snap widget reported a failed or denied payment.
    #[error("{0}")]
    Payment(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Failed to load Midtrans Snap script: {0}")]
pub struct ScriptLoadError(pub String);

impl From<ScriptLoadError> for CheckoutFailure {
    fn from(err: ScriptLoadError) -> Self {
        CheckoutFailure::ScriptLoad(err.to_string())
    }
}

/// An action the flow refused to perform in its current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CheckoutError {
    #[error("Select a payment method first")]
    NoMethodSelected,

    #[error("Cannot {action} while {state}")]
    InvalidTransition {
        state: &'static str,
        action: &'static str,
    },
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Directory error: {0}")]
    Directory(#[from] anyhow::Error),
}
