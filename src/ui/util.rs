use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;

/// Display prefix for an ISO 4217 code. Unknown codes print as `CHF 12.00`.
pub(crate) fn currency_symbol(code: &str) -> String {
    match code {
        "USD" => "$".into(),
        "EUR" => "€".into(),
        "GBP" => "£".into(),
        "JPY" => "¥".into(),
        "INR" => "₹".into(),
        "CAD" => "CA$".into(),
        "AUD" => "A$".into(),
        other => format!("{other} "),
    }
}

/// Format a decimal amount with thousand separators and 2 decimal places.
/// e.g. `1234567.89` in USD → `"$1,234,567.89"`
pub(crate) fn format_currency(val: Decimal, code: &str) -> String {
    let abs = val.abs().round_dp(2);
    let formatted = format!("{abs:.2}");
    let mut parts = formatted.split('.');
    let int_part = parts.next().unwrap_or("0");
    let dec_part = parts.next().unwrap_or("00");

    let with_commas: String = int_part
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|chunk| std::str::from_utf8(chunk).unwrap_or(""))
        .collect::<Vec<_>>()
        .join(",");

    let symbol = currency_symbol(code);
    if val.round_dp(2) < Decimal::ZERO {
        format!("-{symbol}{with_commas}.{dec_part}")
    } else {
        format!("{symbol}{with_commas}.{dec_part}")
    }
}

/// At most `max` chars, the last one replaced by "…" when cut.
pub(crate) fn truncate(s: &str, max: usize) -> String {
    if s.char_indices().nth(max).is_none() {
        return s.to_string();
    }
    match max.checked_sub(1) {
        Some(keep) => {
            let cut = s.char_indices().nth(keep).map_or(0, |(i, _)| i);
            format!("{}…", &s[..cut])
        }
        None => String::new(),
    }
}

/// `[████░░░░]` for a percent in `0..=100`.
pub(crate) fn progress_bar(percent: Decimal, width: usize) -> String {
    let ratio = (percent / Decimal::ONE_HUNDRED)
        .to_f64()
        .unwrap_or(0.0)
        .clamp(0.0, 1.0);
    let filled = (ratio * width as f64) as usize;
    let empty = width.saturating_sub(filled);
    format!("[{}{}]", "█".repeat(filled), "░".repeat(empty))
}

/// Scroll offset that keeps `index` inside a window of `page` rows.
pub(crate) fn follow(index: usize, scroll: usize, page: usize) -> usize {
    scroll
        .min(index)
        .max((index + 1).saturating_sub(page.max(1)))
}

pub(crate) fn scroll_down(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    if *index + 1 < len {
        *index += 1;
    }
    *scroll = follow(*index, *scroll, page);
}

pub(crate) fn scroll_up(index: &mut usize, scroll: &mut usize) {
    *index = index.saturating_sub(1);
    *scroll = (*scroll).min(*index);
}

pub(crate) fn scroll_to_top(index: &mut usize, scroll: &mut usize) {
    *index = 0;
    *scroll = 0;
}

pub(crate) fn scroll_to_bottom(index: &mut usize, scroll: &mut usize, len: usize, page: usize) {
    *index = len.saturating_sub(1);
    *scroll = follow(*index, 0, page);
}
