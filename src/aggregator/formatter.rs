//! Display formatting for magnitudes, percentages and prices.
//!
//! All functions are total: absent, zero and non-finite inputs map to a fixed
//! placeholder instead of failing.

const BILLION: f64 = 1_000_000_000.0;
const MILLION: f64 = 1_000_000.0;
const THOUSAND: f64 = 1_000.0;

/// Rounds half away from zero at `places` decimals.
fn round_half_up(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

fn is_blank(value: Option<f64>) -> bool {
    match value {
        None => true,
        Some(v) => v == 0.0 || !v.is_finite(),
    }
}

/// Formats a magnitude with a K/M/B suffix, e.g. `1_250_000` -> `"1.25M"`.
///
/// Values below one thousand keep up to six fractional digits and use
/// `en-US` digit grouping.
pub fn format_number(value: Option<f64>) -> String {
    if is_blank(value) {
        return "0".to_string();
    }
    let v = value.unwrap_or_default();

    if v >= BILLION {
        format!("{:.2}B", round_half_up(v / BILLION, 2))
    } else if v >= MILLION {
        format!("{:.2}M", round_half_up(v / MILLION, 2))
    } else if v >= THOUSAND {
        format!("{:.2}K", round_half_up(v / THOUSAND, 2))
    } else {
        format_grouped(v, 6)
    }
}

/// Convenience for integer counts (holders, LP providers).
pub fn format_count(value: Option<u64>) -> String {
    format_number(value.map(|v| v as f64))
}

/// Formats a percentage with two decimals, e.g. `12.345` -> `"12.35%"`.
pub fn format_pct(value: Option<f64>) -> String {
    if is_blank(value) {
        return "0%".to_string();
    }
    format!("{:.2}%", round_half_up(value.unwrap_or_default(), 2))
}

/// Percentage with an explicit sign, used for 24h price change.
pub fn format_signed_pct(value: Option<f64>) -> String {
    let v = value.filter(|v| v.is_finite()).unwrap_or(0.0);
    let sign = if v >= 0.0 { "+" } else { "" };
    format!("{}{:.2}%", sign, round_half_up(v, 2))
}

/// Absolute percentage behind an up/down arrow, used for 24h volume change.
pub fn format_change_arrow(value: Option<f64>) -> String {
    let v = value.filter(|v| v.is_finite()).unwrap_or(0.0);
    let arrow = if v >= 0.0 { '↑' } else { '↓' };
    format!("{} {:.2}%", arrow, round_half_up(v.abs(), 2))
}

/// USD price with eight decimals, or `"Unknown"`.
pub fn format_price(value: Option<f64>) -> String {
    if is_blank(value) {
        return "Unknown".to_string();
    }
    format!("{:.8}", value.unwrap_or_default())
}

/// `ABCD...WXYZ` for identifiers longer than eight characters.
pub fn shorten_address(address: &str) -> String {
    let chars: Vec<char> = address.chars().collect();
    if chars.len() <= 8 {
        return address.to_string();
    }
    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("{}...{}", head, tail)
}

fn format_grouped(value: f64, max_fraction_digits: usize) -> String {
    let fixed = format!("{:.*}", max_fraction_digits, value.abs());
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), ""));
    let frac = frac_part.trim_end_matches('0');

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let is_zero = int_part.chars().all(|c| c == '0') && frac.is_empty();
    let sign = if value < 0.0 && !is_zero { "-" } else { "" };

    if frac.is_empty() {
        format!("{}{}", sign, grouped)
    } else {
        format!("{}{}.{}", sign, grouped, frac)
    }
}
