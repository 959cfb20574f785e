//! Display rules for dashboard figures
//!
//! Every function here is a pure mapping from a snapshot field to the text a
//! user sees. Rounding follows `Number.prototype.toFixed` so figures match
//! what browser clients of the same payload show.

/// Arrow shown in front of every growth figure, whatever its sign
pub const GROWTH_GLYPH: &str = "↑";

/// Badge text shown on every corridor row
pub const STATUS_BADGE_TEXT: &str = "Healthy";

/// JavaScript switches `toFixed` to exponent notation at this magnitude
const EXPONENT_THRESHOLD: f64 = 1e21;

/// Format `value` with exactly `digits` fractional digits.
///
/// The exact binary value is rounded; an exact half rounds away from zero.
/// Negative zero prints without a sign, other negatives keep theirs even
/// when they round to zero (`-0.04` gives `"-0.0"` at one digit).
pub fn to_fixed(value: f64, digits: u8) -> String {
    if !value.is_finite() {
        return format_number(value);
    }

    let magnitude = value.abs();
    if magnitude >= EXPONENT_THRESHOLD {
        return format_number(value);
    }

    let precision = usize::from(digits);
    let body = if is_half_way(magnitude, digits) {
        let scale = 10f64.powi(i32::from(digits));
        format!("{:.precision$}", (magnitude * scale).round() / scale)
    } else {
        format!("{magnitude:.precision$}")
    };

    if value < 0.0 { format!("-{body}") } else { body }
}

/// Whether `magnitude` sits exactly between two `digits`-digit decimals.
///
/// That only happens for odd multiples of `2^-(digits + 1)`, which lets the
/// check run in exact binary arithmetic.
fn is_half_way(magnitude: f64, digits: u8) -> bool {
    let scaled = magnitude * 2f64.powi(i32::from(digits) + 1);
    scaled.fract() == 0.0 && scaled % 2.0 == 1.0
}

/// Format a number the way JavaScript stringifies it.
///
/// Integral values print without a fractional part (`98`, not `98.0`).
/// Digits are the shortest that read back as `value`; when two 17-digit
/// candidates are equally close the even one wins, as in ECMAScript.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let (digits, exponent) = shortest_digits(value.abs());
    let body = layout(&digits, exponent);

    if value < 0.0 { format!("-{body}") } else { body }
}

/// Shortest round-tripping digits of `magnitude` and the decimal exponent
/// of the first one
fn shortest_digits(magnitude: f64) -> (String, i32) {
    let shortest = split_scientific(&format!("{magnitude:e}"));
    if shortest.0.len() == 17 {
        even_tie_digits(magnitude).unwrap_or(shortest)
    } else {
        shortest
    }
}

/// The even 17-digit candidate, if `magnitude` lies exactly halfway
/// between two 17-digit decimals that both read back as it.
///
/// Halfway means the exact expansion has 18 significant digits ending in 5.
fn even_tie_digits(magnitude: f64) -> Option<(String, i32)> {
    let (exact, exponent) = split_scientific(&format!("{magnitude:.800e}"));
    if exact.len() != 18 || !exact.ends_with('5') {
        return None;
    }

    let lower: u64 = exact.get(..17)?.parse().ok()?;
    let even = if lower % 2 == 0 { lower } else { lower + 1 };
    let candidate: f64 = format!("{even}e{}", exponent - 16).parse().ok()?;
    if candidate.to_bits() != magnitude.to_bits() {
        return None;
    }

    // Rounding 99..9 up carries into an eighteenth digit
    let rendered = even.to_string();
    let exponent = if rendered.len() == 17 { exponent } else { exponent + 1 };
    Some((rendered.trim_end_matches('0').to_string(), exponent))
}

/// Significant digits and exponent of a `{:e}` rendering
fn split_scientific(rendered: &str) -> (String, i32) {
    let (mantissa, exponent) = rendered.split_once('e').unwrap_or((rendered, "0"));
    let digits: String = mantissa.chars().filter(char::is_ascii_digit).collect();
    let digits = match digits.trim_end_matches('0') {
        "" => "0",
        trimmed => trimmed,
    };
    (digits.to_string(), exponent.parse().unwrap_or(0))
}

/// Lay out `digits`, the first of which sits at `10^exponent`, using plain
/// notation from 1e-6 up to 1e21 and exponent notation outside.
fn layout(digits: &str, exponent: i32) -> String {
    let count = i32::try_from(digits.len()).unwrap_or(i32::MAX);
    let point = exponent + 1;

    if (count..=21).contains(&point) {
        let zeros = usize::try_from(point - count).unwrap_or(0);
        return format!("{digits}{}", "0".repeat(zeros));
    }
    if (1..=21).contains(&point) {
        let split = usize::try_from(point).unwrap_or(0);
        if let Some((whole, fraction)) = digits.split_at_checked(split) {
            return format!("{whole}.{fraction}");
        }
    }
    if (-5..=0).contains(&point) {
        let zeros = usize::try_from(-point).unwrap_or(0);
        return format!("0.{}{digits}", "0".repeat(zeros));
    }

    let sign = if exponent < 0 { '-' } else { '+' };
    let power = exponent.unsigned_abs();
    match digits.split_at_checked(1) {
        Some((head, rest)) if !rest.is_empty() => format!("{head}.{rest}e{sign}{power}"),
        _ => format!("{digits}e{sign}{power}"),
    }
}

/// Headline volume in millions: `2_500_000.0` gives `"$2.5M"`
pub fn format_volume_millions(volume: f64) -> String {
    format!("${}M", to_fixed(volume / 1_000_000.0, 1))
}

/// Corridor volume in thousands: `15_000.0` gives `"$15K"`
pub fn format_volume_thousands(volume: f64) -> String {
    format!("${}K", to_fixed(volume / 1_000.0, 0))
}

/// Pass-through percentage: `97.0` gives `"97%"`
pub fn format_percent(value: f64) -> String {
    format!("{}%", format_number(value))
}

/// Growth in percent with its period, e.g. `"↑ 3% from yesterday"`
pub fn format_growth_percent(value: f64, period: &str) -> String {
    format!("{GROWTH_GLYPH} {}% {period}", format_number(value))
}

/// Growth as a plain count with its period, e.g. `"↑ 2 this month"`
pub fn format_growth_count(value: i64, period: &str) -> String {
    format!("{GROWTH_GLYPH} {value} {period}")
}

/// CSS width of a health bar. Values outside 0-100 pass through unclamped.
pub fn health_bar_width(health: f64) -> String {
    format_percent(health)
}
