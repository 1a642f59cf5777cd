//! Student checkout flow for EduPay.
//!
//! [`orchestrator::CheckoutFlow`] drives one payment attempt: it asks the
//! relay service for a Snap token, makes sure the Snap script is loaded, opens
//! the widget and turns the widget's outcome into UI transitions. Everything
//! that touches the outside world sits behind a trait so the flow can run
//! against a browser shell, a native shell, or test fakes.

pub mod config;
pub mod error;
pub mod models;
pub mod orchestrator;
pub mod services;
pub mod utils;

pub use error::{AuthError, CheckoutError, CheckoutFailure, ScriptLoadError};
pub use orchestrator::{CheckoutFlow, CheckoutState, CheckoutUi, Notice, NoticeLevel, Route};
