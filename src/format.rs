use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::DisplayConfig;

fn group_int_digits(int_part: &str) -> String {
    let mut out = String::with_capacity(int_part.len() + int_part.len() / 3);
    let len = int_part.len();
    for (i, ch) in int_part.chars().enumerate() {
        out.push(ch);
        let remaining = len.saturating_sub(i + 1);
        if remaining > 0 && remaining % 3 == 0 {
            out.push(',');
        }
    }
    out
}

/// Render an amount for display: rounded half away from zero to
/// `currency_decimals` places, padded to exactly that many, optional
/// thousands separators, symbol prefix after the sign.
pub fn format_currency(value: Decimal, display: &DisplayConfig) -> String {
    let dp = display.currency_decimals;
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded.is_sign_negative() && !rounded.is_zero();

    let mut abs = rounded.abs();
    abs.rescale(dp);
    let s = abs.to_string();
    let (int_part, frac_part) = match s.split_once('.') {
        Some((i, f)) => (i.to_string(), Some(f.to_string())),
        None => (s, None),
    };
    let int_part = if display.currency_grouping {
        group_int_digits(&int_part)
    } else {
        int_part
    };

    let mut out = String::new();
    if negative {
        out.push('-');
    }
    if !display.currency_symbol.is_empty() {
        out.push_str(&display.currency_symbol);
        out.push(' ');
    }
    out.push_str(&int_part);
    if let Some(frac) = frac_part {
        out.push('.');
        out.push_str(&frac);
    }
    out
}
