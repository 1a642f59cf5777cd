use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

/// The payment channels offered in the checkout drawer.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    BcaVa,
    BniVa,
    MandiriVa,
    Gopay,
    Qris,
}

impl PaymentMethod {
    pub const ALL: [PaymentMethod; 5] = [
        PaymentMethod::BcaVa,
        PaymentMethod::BniVa,
        PaymentMethod::MandiriVa,
        PaymentMethod::Gopay,
        PaymentMethod::Qris,
    ];

    pub fn id(&self) -> &'static str {
        match self {
            PaymentMethod::BcaVa => "bca_va",
            PaymentMethod::BniVa => "bni_va",
            PaymentMethod::MandiriVa => "mandiri_va",
            PaymentMethod::Gopay => "gopay",
            PaymentMethod::Qris => "qris",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            PaymentMethod::BcaVa => "BCA Virtual Account",
            PaymentMethod::BniVa => "BNI Virtual Account",
            PaymentMethod::MandiriVa => "Mandiri Virtual Account",
            PaymentMethod::Gopay => "GoPay",
            PaymentMethod::Qris => "QRIS",
        }
    }

    /// Channel name in Snap's `enabled_payments` list.
    pub fn gateway_code(&self) -> &'static str {
        match self {
            PaymentMethod::BcaVa => "bca_va",
            PaymentMethod::BniVa => "bni_va",
            PaymentMethod::MandiriVa => "echannel",
            PaymentMethod::Gopay => "gopay",
            PaymentMethod::Qris => "other_qris",
        }
    }

    pub fn from_id(id: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.id() == id)
    }
}

/// What the relay needs to open one Snap session. Serialized in the relay's
/// wire shape: `{orderId, amount, name, billTitle, paymentMethod?}`.
#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct PaymentIntent {
    #[serde(rename = "orderId")]
    pub order_id: String,
    pub amount: i64,
    #[serde(rename = "name")]
    pub payer_name: String,
    #[serde(rename = "billTitle")]
    pub description: String,
    #[serde(rename = "paymentMethod", skip_serializing_if = "Option::is_none")]
    pub preferred_method: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct GatewaySession {
    pub token: String,
    pub redirect_url: String,
}

/// Result object handed to the Snap `onSuccess`/`onPending`/`onError` callbacks.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq, Default)]
pub struct SnapResult {
    pub order_id: String,
    #[serde(default)]
    pub transaction_id: String,
    #[serde(default)]
    pub status_code: String,
    #[serde(default)]
    pub status_message: String,
    #[serde(default)]
    pub transaction_status: String,
    #[serde(default)]
    pub gross_amount: Option<String>,
    #[serde(default)]
    pub payment_type: Option<String>,
    #[serde(default)]
    pub transaction_time: Option<String>,
    #[serde(default)]
    pub fraud_status: Option<String>,
    #[serde(default)]
    pub va_numbers: Option<Vec<VaNumber>>,
    #[serde(default)]
    pub payment_code: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct VaNumber {
    pub bank: String,
    pub va_number: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: String,
    pub nisn: String,
    pub name: String,
    pub class_name: String,
    pub avatar: String,
    pub email: String,
    pub phone: String,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BillStatus {
    Unpaid,
    Paid,
    Expired,
    Pending,
}

impl BillStatus {
    /// Bills a student can still pay from the dashboard.
    pub fn is_payable(&self) -> bool {
        matches!(self, BillStatus::Unpaid | BillStatus::Expired)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Bill {
    pub id: String,
    pub student_id: String,
    pub title: String,
    pub description: String,
    pub amount: i64,
    pub due_date: NaiveDate,
    pub status: BillStatus,
    pub paid_at: Option<NaiveDateTime>,
    pub payment_method: Option<String>,
    pub transaction_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Success,
    Pending,
    Failed,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct Payment {
    pub id: String,
    pub bill_id: String,
    pub student_id: String,
    pub student_name: String,
    pub amount: i64,
    pub status: PaymentStatus,
    pub method: String,
    pub transaction_id: String,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct AdminProfile {
    pub username: String,
    pub name: String,
}

/// Who is signed in.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Identity {
    Student { student: Student },
    Admin { admin: AdminProfile },
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct MonthlyRevenue {
    /// `YYYY-MM`
    pub month: String,
    pub revenue: i64,
}

#[derive(Debug, Serialize, Clone, PartialEq, Eq)]
pub struct AdminStats {
    pub total_students: usize,
    pub total_bills: usize,
    pub total_paid: usize,
    pub total_unpaid: usize,
    pub total_revenue: i64,
    pub monthly_revenue: Vec<MonthlyRevenue>,
}
