//! Human-readable sizes and rates using binary units.
//!
//! All arithmetic is integer fixed-point; magnitudes are rounded half-up
//! to the requested number of decimals and trailing zeros are dropped.

pub const SIZE_UNITS: [&str; 6] = ["B", "KiB", "MiB", "GiB", "TiB", "PiB"];
pub const DEFAULT_DECIMALS: u32 = 2;
const MAX_DECIMALS: u32 = 9;
const UNIT_STEP: u128 = 1_024;
const MS_PER_SEC: u64 = 1_000;

/// Formats `bytes` with two decimals, e.g. `1.43MiB`.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    format_size_with(bytes, DEFAULT_DECIMALS)
}

/// Formats `bytes` in the largest unit whose divisor it reaches.
#[must_use]
pub fn format_size_with(bytes: u64, decimals: u32) -> String {
    let decimals = decimals.min(MAX_DECIMALS);
    let value = u128::from(bytes);

    let mut unit = "B";
    let mut divisor: u128 = 1;
    let mut candidate: u128 = 1;
    for name in SIZE_UNITS {
        if value < candidate {
            break;
        }
        unit = name;
        divisor = candidate;
        candidate = candidate.saturating_mul(UNIT_STEP);
    }

    let scale = 10_u128.checked_pow(decimals).unwrap_or(1);
    let rounded = value
        .saturating_mul(scale)
        .saturating_mul(2)
        .saturating_add(divisor)
        .checked_div(divisor.saturating_mul(2))
        .unwrap_or(0);
    let whole = rounded.checked_div(scale).unwrap_or(0);
    let frac = rounded.checked_rem(scale).unwrap_or(0);

    let width = usize::try_from(decimals).unwrap_or(0);
    let frac_text = format!("{frac:0width$}");
    let frac_text = frac_text.trim_end_matches('0');
    if decimals == 0 || frac_text.is_empty() {
        format!("{whole}{unit}")
    } else {
        format!("{whole}.{frac_text}{unit}")
    }
}

/// Formats a byte/second rate, e.g. `1.43MiB/s`.
#[must_use]
pub fn format_rate(bytes_per_second: u64) -> String {
    format!("{}/s", format_size(bytes_per_second))
}

/// Formats tenths of a second as seconds with at most one decimal.
#[must_use]
pub fn format_tenths(tenths: u64) -> String {
    let secs = tenths.checked_div(10).unwrap_or(0);
    let rem = tenths.checked_rem(10).unwrap_or(0);
    if rem == 0 {
        secs.to_string()
    } else {
        format!("{secs}.{rem}")
    }
}

/// Rounds milliseconds to tenths of a second.
#[must_use]
pub const fn ms_to_tenths(ms: u64) -> u64 {
    ms.saturating_add(50).saturating_div(100)
}

/// Average throughput, rounded to a whole byte per second.
///
/// Zero elapsed time counts as one millisecond.
#[must_use]
pub fn bytes_per_second(bytes: u64, elapsed_ms: u64) -> u64 {
    let elapsed = u128::from(elapsed_ms.max(1));
    let rate = u128::from(bytes)
        .saturating_mul(u128::from(MS_PER_SEC))
        .saturating_mul(2)
        .saturating_add(elapsed)
        .checked_div(elapsed.saturating_mul(2))
        .unwrap_or(0);
    u64::try_from(rate).unwrap_or(u64::MAX)
}
