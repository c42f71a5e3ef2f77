//! Display formatting helpers.

use rust_decimal::Decimal;

/// Escape text for HTML content and attribute values.
pub fn escape_html(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// `$1,234.56`, `-$12.00`.
pub fn currency(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(&format!("{:.2}", value.abs())))
}

/// Decimal variant of [`currency`].
pub fn currency_decimal(value: Decimal) -> String {
    let sign = if value.is_sign_negative() && !value.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${}", group_thousands(&format!("{:.2}", value.abs())))
}

/// `+1.23%`, `-0.40%`.
pub fn signed_percent(value: f64) -> String {
    format!("{value:+.2}%")
}

/// `+1.20`, `-3.05`.
pub fn signed_number(value: f64) -> String {
    format!("{value:+.2}")
}

/// Insert `,` every three digits of the integer part of a fixed-point string.
fn group_thousands(fixed: &str) -> String {
    let (int_part, frac_part) = match fixed.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (fixed, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, c) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    match frac_part {
        Some(frac) => format!("{grouped}.{frac}"),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn test_currency() {
        assert_eq!(currency(0.0), "$0.00");
        assert_eq!(currency(999.5), "$999.50");
        assert_eq!(currency(1234.567), "$1,234.57");
        assert_eq!(currency(1_000_000.0), "$1,000,000.00");
        assert_eq!(currency(-12.0), "-$12.00");
        assert_eq!(currency_decimal(dec!(450)), "$450.00");
        assert_eq!(currency_decimal(dec!(-1234.5)), "-$1,234.50");
    }

    #[test]
    fn test_signed() {
        assert_eq!(signed_percent(1.234), "+1.23%");
        assert_eq!(signed_percent(-0.4), "-0.40%");
        assert_eq!(signed_number(-3.05), "-3.05");
    }
}
