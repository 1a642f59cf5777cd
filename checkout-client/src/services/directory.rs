//! Read side of the school's records: students, bills and payments.

use async_trait::async_trait;
use serde::Deserialize;
use std::collections::BTreeMap;

use crate::models::{AdminStats, Bill, BillStatus, MonthlyRevenue, Payment, PaymentStatus, Student};

const DEMO_FIXTURE: &str = include_str!("../../fixtures/demo_directory.json");

#[async_trait]
pub trait SchoolDirectory: Send + Sync {
    async fn student_by_id(&self, id: &str) -> anyhow::Result<Option<Student>>;
    async fn student_by_nisn(&self, nisn: &str) -> anyhow::Result<Option<Student>>;
    async fn students(&self) -> anyhow::Result<Vec<Student>>;
    async fn bill_by_id(&self, id: &str) -> anyhow::Result<Option<Bill>>;
    async fn bills_for_student(&self, student_id: &str) -> anyhow::Result<Vec<Bill>>;
    /// Bills still open for payment (unpaid or expired).
    async fn unpaid_bills_for_student(&self, student_id: &str) -> anyhow::Result<Vec<Bill>>;
    async fn paid_bills_for_student(&self, student_id: &str) -> anyhow::Result<Vec<Bill>>;
    async fn payments(&self) -> anyhow::Result<Vec<Payment>>;
    async fn stats(&self) -> anyhow::Result<AdminStats>;
}

#[derive(Debug, Default, Deserialize)]
pub struct InMemoryDirectory {
    students: Vec<Student>,
    bills: Vec<Bill>,
    payments: Vec<Payment>,
}

impl InMemoryDirectory {
    pub fn new(students: Vec<Student>, bills: Vec<Bill>, payments: Vec<Payment>) -> Self {
        Self {
            students,
            bills,
            payments,
        }
    }

    /// Directory seeded with the bundled demo school.
    pub fn with_demo_data() -> anyhow::Result<Self> {
        let directory: Self = serde_json::from_str(DEMO_FIXTURE)?;
        tracing::debug!(
            students = directory.students.len(),
            bills = directory.bills.len(),
            payments = directory.payments.len(),
            "Loaded demo directory"
        );
        Ok(directory)
    }

    fn bills_where(&self, student_id: &str, keep: impl Fn(&Bill) -> bool) -> Vec<Bill> {
        self.bills
            .iter()
            .filter(|b| b.student_id == student_id && keep(b))
            .cloned()
            .collect()
    }

    fn compute_stats(&self) -> AdminStats {
        let settled = self
            .payments
            .iter()
            .filter(|p| p.status == PaymentStatus::Success);

        let mut by_month: BTreeMap<String, i64> = BTreeMap::new();
        let mut total_revenue = 0;
        for payment in settled {
            total_revenue += payment.amount;
            *by_month
                .entry(payment.created_at.format("%Y-%m").to_string())
                .or_default() += payment.amount;
        }

        AdminStats {
            total_students: self.students.len(),
            total_bills: self.bills.len(),
            total_paid: self
                .bills
                .iter()
                .filter(|b| b.status == BillStatus::Paid)
                .count(),
            total_unpaid: self.bills.iter().filter(|b| b.status.is_payable()).count(),
            total_revenue,
            monthly_revenue: by_month
                .into_iter()
                .map(|(month, revenue)| MonthlyRevenue { month, revenue })
                .collect(),
        }
    }
}

#[async_trait]
impl SchoolDirectory for InMemoryDirectory {
    async fn student_by_id(&self, id: &str) -> anyhow::Result<Option<Student>> {
        Ok(self.students.iter().find(|s| s.id == id).cloned())
    }

    async fn student_by_nisn(&self, nisn: &str) -> anyhow::Result<Option<Student>> {
        Ok(self.students.iter().find(|s| s.nisn == nisn).cloned())
    }

    async fn students(&self) -> anyhow::Result<Vec<Student>> {
        Ok(self.students.clone())
    }

    async fn bill_by_id(&self, id: &str) -> anyhow::Result<Option<Bill>> {
        Ok(self.bills.iter().find(|b| b.id == id).cloned())
    }

    async fn bills_for_student(&self, student_id: &str) -> anyhow::Result<Vec<Bill>> {
        Ok(self.bills_where(student_id, |_| true))
    }

    async fn unpaid_bills_for_student(&self, student_id: &str) -> anyhow::Result<Vec<Bill>> {
        Ok(self.bills_where(student_id, |b| b.status.is_payable()))
    }

    async fn paid_bills_for_student(&self, student_id: &str) -> anyhow::Result<Vec<Bill>> {
        Ok(self.bills_where(student_id, |b| b.status == BillStatus::Paid))
    }

    async fn payments(&self) -> anyhow::Result<Vec<Payment>> {
        Ok(self.payments.clone())
    }

    async fn stats(&self) -> anyhow::Result<AdminStats> {
        Ok(self.compute_stats())
    }
}
