//! Price formatting for reports.

/// Format a price the way reports show it: four decimals below 5, two
/// below 100, none from 100 up. Thousands are grouped with `.` and the
/// decimal separator is `,`.
pub fn format_price(value: f64) -> String {
    if !value.is_finite() {
        return "-".to_string();
    }

    let decimals = match value.abs() {
        v if v < 5.0 => 4,
        v if v < 100.0 => 2,
        _ => 0,
    };
    let plain = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut out = String::with_capacity(plain.len() + plain.len() / 3 + 1);
    if value < 0.0 && plain.chars().any(|c| c.is_ascii_digit() && c != '0') {
        out.push('-');
    }
    for (i, digit) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            out.push('.');
        }
        out.push(digit);
    }
    if let Some(frac) = frac_part {
        out.push(',');
        out.push_str(frac);
    }
    out
}
