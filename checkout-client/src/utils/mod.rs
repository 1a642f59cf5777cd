use chrono::Utc;
use rand::Rng;

const ORDER_SUFFIX_CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const ORDER_SUFFIX_LEN: usize = 6;

/// `EDU-{unix millis}-{6 random [0-9A-Z]}`. Unique enough per attempt, not a
/// guarantee.
pub fn generate_order_id() -> String {
    let mut rng = rand::thread_rng();
    let suffix: String = (0..ORDER_SUFFIX_LEN)
        .map(|_| ORDER_SUFFIX_CHARSET[rng.gen_range(0..ORDER_SUFFIX_CHARSET.len())] as char)
        .collect();

    format!("EDU-{}-{}", Utc::now().timestamp_millis(), suffix)
}

/// `500000` -> `Rp 500.000`
pub fn format_rupiah(amount: i64) -> String {
    let digits = amount.unsigned_abs().to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }

    if amount < 0 {
        format!("Rp -{}", grouped)
    } else {
        format!("Rp {}", grouped)
    }
}
