#![allow(dead_code)]

use async_trait::async_trait;
use checkout_client::models::{Bill, BillStatus, GatewaySession, PaymentIntent, SnapResult};
use checkout_client::services::{RelayClient, ScriptLoader, SnapLoader, SnapOutcome, SnapWidget};
use checkout_client::{CheckoutFailure, CheckoutFlow, CheckoutUi, Notice, Route, ScriptLoadError};
use chrono::NaiveDate;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

pub const TEST_TOKEN: &str = "66e4fa55-fdac-4ef9-91b5-733b97d1b862";

/// Everything the flow did to the UI, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiEvent {
    Notice(Notice),
    Celebrate,
    Close,
    Navigate(Route),
}

#[derive(Default)]
pub struct RecordingUi {
    events: Mutex<Vec<UiEvent>>,
}

impl RecordingUi {
    pub fn events(&self) -> Vec<UiEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Notice(n) => Some(n),
                _ => None,
            })
            .collect()
    }

    pub fn navigations(&self) -> Vec<Route> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                UiEvent::Navigate(r) => Some(r),
                _ => None,
            })
            .collect()
    }

    fn push(&self, event: UiEvent) {
        self.events.lock().unwrap().push(event);
    }
}

impl CheckoutUi for RecordingUi {
    fn notify(&self, notice: Notice) {
        self.push(UiEvent::Notice(notice));
    }

    fn celebrate(&self) {
        self.push(UiEvent::Celebrate);
    }

    fn close(&self) {
        self.push(UiEvent::Close);
    }

    fn navigate(&self, route: Route) {
        self.push(UiEvent::Navigate(route));
    }
}

pub struct FakeRelay {
    response: Result<GatewaySession, CheckoutFailure>,
    latency: Option<Duration>,
    intents: Mutex<Vec<PaymentIntent>>,
}

impl FakeRelay {
    pub fn ok() -> Self {
        Self::with(Ok(GatewaySession {
            token: TEST_TOKEN.to_string(),
            redirect_url: format!(
                "https://app.sandbox.midtrans.com/snap/v4/redirection/{}",
                TEST_TOKEN
            ),
        }))
    }

    /// Answers like `ok()` after `latency` has passed.
    pub fn slow(latency: Duration) -> Self {
        Self {
            latency: Some(latency),
            ..Self::ok()
        }
    }

    pub fn failing(failure: CheckoutFailure) -> Self {
        Self::with(Err(failure))
    }

    fn with(response: Result<GatewaySession, CheckoutFailure>) -> Self {
        Self {
            response,
            latency: None,
            intents: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.intents.lock().unwrap().len()
    }

    pub fn intents(&self) -> Vec<PaymentIntent> {
        self.intents.lock().unwrap().clone()
    }
}

#[async_trait]
impl RelayClient for FakeRelay {
    async fn create_payment(&self, intent: &PaymentIntent) -> Result<GatewaySession, CheckoutFailure> {
        self.intents.lock().unwrap().push(intent.clone());
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
        self.response.clone()
    }
}

/// Answers every `pay` with the same outcome and remembers the tokens.
pub struct FakeWidget {
    outcome: SnapOutcome,
    tokens: Mutex<Vec<String>>,
}

impl FakeWidget {
    pub fn new(outcome: SnapOutcome) -> Self {
        Self {
            outcome,
            tokens: Mutex::new(Vec::new()),
        }
    }

    pub fn tokens(&self) -> Vec<String> {
        self.tokens.lock().unwrap().clone()
    }
}

#[async_trait]
impl SnapWidget for FakeWidget {
    async fn pay(&self, token: &str) -> SnapOutcome {
        self.tokens.lock().unwrap().push(token.to_string());
        self.outcome.clone()
    }
}

/// Fails the first `fail_first` injections, then succeeds.
pub struct FakeScriptLoader {
    calls: AtomicUsize,
    fail_first: usize,
    injected: Mutex<Vec<(String, String)>>,
}

impl FakeScriptLoader {
    pub fn new(fail_first: usize) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            fail_first,
            injected: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// `(src, client_key)` of every injection attempt.
    pub fn injected(&self) -> Vec<(String, String)> {
        self.injected.lock().unwrap().clone()
    }
}

#[async_trait]
impl ScriptLoader for FakeScriptLoader {
    async fn inject(&self, src: &str, client_key: &str) -> Result<(), ScriptLoadError> {
        self.injected
            .lock()
            .unwrap()
            .push((src.to_string(), client_key.to_string()));
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_first {
            Err(ScriptLoadError("script blocked".to_string()))
        } else {
            Ok(())
        }
    }
}

pub fn snap_result(order_id: &str, transaction_status: &str) -> SnapResult {
    SnapResult {
        order_id: order_id.to_string(),
        transaction_id: "9aed5972-5b6a-401e-894b-a32c91ed1a3a".to_string(),
        status_code: "200".to_string(),
        status_message: "Success, transaction is found".to_string(),
        transaction_status: transaction_status.to_string(),
        ..SnapResult::default()
    }
}

pub fn unpaid_bill() -> Bill {
    Bill {
        id: "bill-001".to_string(),
        student_id: "1".to_string(),
        title: "SPP Bulan Februari 2026".to_string(),
        description: "Pembayaran SPP bulanan".to_string(),
        amount: 500000,
        due_date: NaiveDate::from_ymd_opt(2026, 2, 28).unwrap(),
        status: BillStatus::Unpaid,
        paid_at: None,
        payment_method: None,
        transaction_id: None,
    }
}

/// A flow wired to fakes, with handles to inspect them.
pub struct TestFlow {
    pub flow: Arc<CheckoutFlow>,
    pub relay: Arc<FakeRelay>,
    pub widget: Arc<FakeWidget>,
    pub scripts: Arc<FakeScriptLoader>,
    pub ui: Arc<RecordingUi>,
}

impl TestFlow {
    pub fn new(relay: FakeRelay, outcome: SnapOutcome) -> Self {
        Self::with_scripts(relay, outcome, FakeScriptLoader::new(0))
    }

    pub fn with_scripts(relay: FakeRelay, outcome: SnapOutcome, scripts: FakeScriptLoader) -> Self {
        let relay = Arc::new(relay);
        let widget = Arc::new(FakeWidget::new(outcome));
        let scripts = Arc::new(scripts);
        let ui = Arc::new(RecordingUi::default());
        let snap = Arc::new(SnapLoader::new(
            scripts.clone(),
            "https://app.sandbox.midtrans.com/snap/snap.js",
            "SB-Mid-client-TEST123",
        ));

        let flow = Arc::new(CheckoutFlow::new(
            relay.clone(),
            snap,
            widget.clone(),
            ui.clone(),
            "Ahmad Rizky Pratama",
        ));

        Self {
            flow,
            relay,
            widget,
            scripts,
            ui,
        }
    }
}
