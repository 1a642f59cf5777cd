/// Show only the ends of a key, e.g. `SB-Mid-server-A...9xYz`.
pub fn mask_key(key: &str, head: usize, tail: usize) -> String {
    let chars: Vec<char> = key.chars().collect();
    if chars.len() <= head + tail {
        return "*".repeat(chars.len());
    }

    let start: String = chars[..head].iter().collect();
    let end: String = chars[chars.len() - tail..].iter().collect();
    format!("{}...{}", start, end)
}
