pub mod metrics;
pub mod midtrans;

pub use metrics::{get_metrics, init_metrics, record_transaction};
pub use midtrans::{GatewayError, SnapClient, SnapTransactionRequest};
