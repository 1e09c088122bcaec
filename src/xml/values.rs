//! Attribute value parsing and formatting.

use crate::foundation::error::{FlameError, FlameResult};

/// Parse one finite number.
pub fn parse_f64(attr: &str, value: &str) -> FlameResult<f64> {
    match value.trim().parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(FlameError::format(format!(
            "attribute \"{attr}\" expects a number but received \"{value}\""
        ))),
    }
}

/// Parse exactly `N` whitespace separated numbers.
pub fn parse_f64_array<const N: usize>(attr: &str, value: &str) -> FlameResult<[f64; N]> {
    let mut out = [0.0; N];
    let mut parts = value.split_whitespace();
    for slot in out.iter_mut() {
        let part = parts.next().ok_or_else(|| {
            FlameError::format(format!(
                "attribute \"{attr}\" expects {N} numbers but received \"{value}\""
            ))
        })?;
        *slot = parse_f64(attr, part)?;
    }
    if parts.next().is_some() {
        return Err(FlameError::format(format!(
            "attribute \"{attr}\" expects {N} numbers but received \"{value}\""
        )));
    }
    Ok(out)
}

/// Parse a `"width height"` pair of integers; signs are kept so callers can
/// report non-positive sizes as range errors.
pub fn parse_size(attr: &str, value: &str) -> FlameResult<(i64, i64)> {
    let [w, h] = parse_f64_array::<2>(attr, value)?;
    if w.fract() != 0.0 || h.fract() != 0.0 {
        return Err(FlameError::format(format!(
            "attribute \"{attr}\" expects two integers but received \"{value}\""
        )));
    }
    Ok((w as i64, h as i64))
}

/// Shortest representation that parses back to the same `f64`.
pub fn format_f64(v: f64) -> String {
    format!("{v}")
}

pub fn format_f64s(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| format_f64(*v))
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
#[path = "../../tests/unit/xml/values.rs"]
mod tests;
