use crate::symbols::Value;

/// Formats a value the way `write` prints it: integers in plain decimal, floats
/// with exactly six fractional digits.
pub fn format_value(value: Value) -> String {
    match value {
        Value::Integer(i) => i.to_string(),
        Value::Float(f) => format_float(f),
    }
}

pub fn format_float(value: f64) -> String {
    if value.is_nan() {
        if value.is_sign_negative() {
            "-nan".into()
        } else {
            "nan".into()
        }
    } else if value.is_infinite() {
        if value.is_sign_positive() {
            "inf".into()
        } else {
            "-inf".into()
        }
    } else {
        format!("{:.6}", value)
    }
}
