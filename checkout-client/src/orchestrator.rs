//! One payment attempt, from method selection to the Snap outcome.

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;

use crate::config::CheckoutConfig;
use crate::error::{CheckoutError, CheckoutFailure};
use crate::models::{Bill, PaymentIntent, PaymentMethod, SnapResult};
use crate::services::{
    HttpRelayClient, RelayClient, ScriptLoader, SnapLoader, SnapOutcome, SnapWidget,
};
use crate::utils::generate_order_id;

pub const DEFAULT_SUCCESS_DELAY: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckoutState {
    Idle,
    MethodSelected(PaymentMethod),
    Submitting {
        order_id: String,
        method: PaymentMethod,
    },
    AwaitingGateway {
        order_id: String,
        token: String,
    },
    Success(SnapResult),
    Pending(SnapResult),
    Error(CheckoutFailure),
    Cancelled,
}

impl CheckoutState {
    pub fn name(&self) -> &'static str {
        match self {
            CheckoutState::Idle => "idle",
            CheckoutState::MethodSelected(_) => "method_selected",
            CheckoutState::Submitting { .. } => "submitting",
            CheckoutState::AwaitingGateway { .. } => "awaiting_gateway",
            CheckoutState::Success(_) => "success",
            CheckoutState::Pending(_) => "pending",
            CheckoutState::Error(_) => "error",
            CheckoutState::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            CheckoutState::Success(_)
                | CheckoutState::Pending(_)
                | CheckoutState::Error(_)
                | CheckoutState::Cancelled
        )
    }

    pub fn is_in_flight(&self) -> bool {
        matches!(
            self,
            CheckoutState::Submitting { .. } | CheckoutState::AwaitingGateway { .. }
        )
    }

    fn accepts_method_selection(&self) -> bool {
        matches!(
            self,
            CheckoutState::Idle
                | CheckoutState::MethodSelected(_)
                | CheckoutState::Error(_)
                | CheckoutState::Cancelled
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub title: String,
    pub description: String,
}

impl Notice {
    fn new(level: NoticeLevel, title: &str, description: impl Into<String>) -> Self {
        Self {
            level,
            title: title.to_string(),
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    History,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::History => "/student/history",
        }
    }
}

/// What the flow needs from whatever renders it.
pub trait CheckoutUi: Send + Sync {
    fn notify(&self, notice: Notice);
    /// Success animation.
    fn celebrate(&self);
    /// Close the checkout drawer.
    fn close(&self);
    fn navigate(&self, route: Route);
}

pub struct CheckoutFlow {
    relay: Arc<dyn RelayClient>,
    snap: Arc<SnapLoader>,
    widget: Arc<dyn SnapWidget>,
    ui: Arc<dyn CheckoutUi>,
    payer_name: String,
    success_delay: Duration,
    state: watch::Sender<CheckoutState>,
}

impl CheckoutFlow {
    pub fn new(
        relay: Arc<dyn RelayClient>,
        snap: Arc<SnapLoader>,
        widget: Arc<dyn SnapWidget>,
        ui: Arc<dyn CheckoutUi>,
        payer_name: impl Into<String>,
    ) -> Self {
        let (state, _) = watch::channel(CheckoutState::Idle);
        Self {
            relay,
            snap,
            widget,
            ui,
            payer_name: payer_name.into(),
            success_delay: DEFAULT_SUCCESS_DELAY,
            state,
        }
    }

    /// Flow that reaches the relay over HTTP, with the Snap script and success
    /// delay taken from `config`.
    pub fn from_config(
        config: &CheckoutConfig,
        scripts: Arc<dyn ScriptLoader>,
        widget: Arc<dyn SnapWidget>,
        ui: Arc<dyn CheckoutUi>,
        payer_name: impl Into<String>,
    ) -> Self {
        let relay = Arc::new(HttpRelayClient::new(config.relay_base_url.clone()));
        let snap = Arc::new(SnapLoader::from_config(scripts, config));
        Self::new(relay, snap, widget, ui, payer_name)
            .with_success_delay(config.success_redirect_delay())
    }

    pub fn with_success_delay(mut self, delay: Duration) -> Self {
        self.success_delay = delay;
        self
    }

    pub fn state(&self) -> CheckoutState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<CheckoutState> {
        self.state.subscribe()
    }

    pub fn can_confirm(&self) -> bool {
        matches!(*self.state.borrow(), CheckoutState::MethodSelected(_))
    }

    /// Start loading Snap as soon as the checkout opens. Failure only warns the
    /// user; `confirm` tries again.
    pub async fn preload(&self) {
        if let Err(e) = self.snap.ensure_loaded().await {
            tracing::warn!(error = %e, "Snap preload failed");
            self.ui.notify(Notice::new(
                NoticeLevel::Error,
                "Gagal memuat sistem pembayaran",
                e.to_string(),
            ));
        }
    }

    pub fn select_method(&self, method: PaymentMethod) -> Result<(), CheckoutError> {
        self.transition("select a payment method", |state| {
            state
                .accepts_method_selection()
                .then(|| CheckoutState::MethodSelected(method))
        })
    }

    /// Back to `Idle` from anywhere except an attempt in flight.
    pub fn reset(&self) -> Result<(), CheckoutError> {
        self.transition("reset", |state| {
            (!state.is_in_flight()).then_some(CheckoutState::Idle)
        })
    }

    /// Pay `bill` with the selected method. Returns the terminal state the
    /// attempt ended in; refuses to start without a selected method.
    pub async fn confirm(&self, bill: &Bill) -> Result<CheckoutState, CheckoutError> {
        let order_id = generate_order_id();
        let mut selected = Err(CheckoutError::NoMethodSelected);
        self.state.send_if_modified(|state| match *state {
            CheckoutState::MethodSelected(method) => {
                selected = Ok(method);
                *state = CheckoutState::Submitting {
                    order_id: order_id.clone(),
                    method,
                };
                true
            }
            CheckoutState::Idle | CheckoutState::Error(_) | CheckoutState::Cancelled => false,
            ref other => {
                selected = Err(CheckoutError::InvalidTransition {
                    state: other.name(),
                    action: "confirm",
                });
                false
            }
        });
        let method = selected?;

        let intent = PaymentIntent {
            order_id: order_id.clone(),
            amount: bill.amount,
            payer_name: self.payer_name.clone(),
            description: bill.title.clone(),
            preferred_method: Some(method.gateway_code().to_string()),
        };

        tracing::info!(
            order_id = %order_id,
            bill_id = %bill.id,
            method = method.id(),
            "Creating payment"
        );

        let session = match self.relay.create_payment(&intent).await {
            Ok(session) => session,
            Err(failure) => return Ok(self.fail(failure)),
        };

        self.set(CheckoutState::AwaitingGateway {
            order_id: order_id.clone(),
            token: session.token.clone(),
        });

        if let Err(e) = self.snap.ensure_loaded().await {
            return Ok(self.fail(e.into()));
        }

        let outcome = self.widget.pay(&session.token).await;
        Ok(self.finish(outcome).await)
    }

    async fn finish(&self, outcome: SnapOutcome) -> CheckoutState {
        match outcome {
            SnapOutcome::Success(result) => {
                tracing::info!(order_id = %result.order_id, "Payment succeeded");
                let state = self.set(CheckoutState::Success(result.clone()));
                self.ui.celebrate();
                self.ui.notify(Notice::new(
                    NoticeLevel::Success,
                    "Pembayaran Berhasil!",
                    format!("Transaksi {} telah diproses", result.order_id),
                ));
                tokio::time::sleep(self.success_delay).await;
                self.ui.close();
                self.ui.navigate(Route::History);
                state
            }
            SnapOutcome::Pending(result) => {
                tracing::info!(order_id = %result.order_id, "Payment pending");
                let description = format!(
                    "Selesaikan pembayaran Anda. Order ID: {}",
                    result.order_id
                );
                let state = self.set(CheckoutState::Pending(result));
                self.ui
                    .notify(Notice::new(NoticeLevel::Info, "Pembayaran Pending", description));
                self.ui.close();
                state
            }
            SnapOutcome::Error(result) => {
                let message = if result.status_message.trim().is_empty() {
                    "Terjadi kesalahan".to_string()
                } else {
                    result.status_message
                };
                self.fail(CheckoutFailure::Payment(message))
            }
            SnapOutcome::Closed => {
                tracing::info!("Snap closed without a result");
                let state = self.set(CheckoutState::Cancelled);
                self.ui.notify(Notice::new(
                    NoticeLevel::Info,
                    "Pembayaran dibatalkan",
                    "Anda menutup popup pembayaran",
                ));
                state
            }
        }
    }

    fn fail(&self, failure: CheckoutFailure) -> CheckoutState {
        tracing::warn!(error = %failure, "Payment attempt failed");
        self.ui.notify(Notice::new(
            NoticeLevel::Error,
            "Pembayaran Gagal",
            failure.to_string(),
        ));
        self.set(CheckoutState::Error(failure))
    }

    fn set(&self, next: CheckoutState) -> CheckoutState {
        self.state.send_replace(next.clone());
        next
    }

    fn transition(
        &self,
        action: &'static str,
        next: impl FnOnce(&CheckoutState) -> Option<CheckoutState>,
    ) -> Result<(), CheckoutError> {
        let mut rejected = None;
        self.state.send_if_modified(|state| match next(state) {
            Some(new_state) => {
                *state = new_state;
                true
            }
            None => {
                rejected = Some(state.name());
                false
            }
        });

        match rejected {
            None => Ok(()),
            Some(state) => Err(CheckoutError::InvalidTransition { state, action }),
        }
    }
}
