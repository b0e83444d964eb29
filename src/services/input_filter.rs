use rust_decimal::Decimal;
use std::str::FromStr;

/// Largest value an hour field accepts unless configured otherwise (99999.9).
pub const DEFAULT_MAX_HOURS: Decimal = Decimal::from_parts(999_999, 0, 0, false, 1);

const MAX_FRACTION_DIGITS: usize = 1;

/// Cleans the text of an hour input after every keystroke.
///
/// Keeps digits and the first decimal point, drops every other character,
/// cuts the fraction to one digit and clamps the value to `max`. Partial
/// input such as `"12."` or `"."` is left alone so the user can keep typing.
pub fn sanitize_hours_input(raw: &str, max: Decimal) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut seen_point = false;
    let mut fraction_digits = 0;

    for ch in raw.chars() {
        match ch {
            '0'..='9' if seen_point => {
                if fraction_digits < MAX_FRACTION_DIGITS {
                    cleaned.push(ch);
                    fraction_digits += 1;
                }
            }
            '0'..='9' => cleaned.push(ch),
            '.' if !seen_point => {
                seen_point = true;
                cleaned.push(ch);
            }
            _ => {}
        }
    }

    match parse_partial(&cleaned) {
        Some(value) if value > max => max.to_string(),
        _ => cleaned,
    }
}

// Only digits and one point reach here, so a failed parse means the
// integer part overflowed and the value is above any ceiling
fn parse_partial(cleaned: &str) -> Option<Decimal> {
    let trimmed = cleaned.trim_end_matches('.');
    if trimmed.is_empty() {
        return None;
    }
    let parsed = if trimmed.starts_with('.') {
        Decimal::from_str(&format!("0{}", trimmed))
    } else {
        Decimal::from_str(trimmed)
    };
    Some(parsed.unwrap_or(Decimal::MAX))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sanitize(raw: &str) -> String {
        sanitize_hours_input(raw, DEFAULT_MAX_HOURS)
    }

    #[test]
    fn extra_decimal_points_are_collapsed() {
        assert_eq!(sanitize("12.3.4"), "12.3");
        assert_eq!(sanitize("1..5"), "1.5");
    }

    #[test]
    fn foreign_characters_are_stripped_before_truncation() {
        assert_eq!(sanitize("abc12.34"), "12.3");
        assert_eq!(sanitize("-4,5h"), "45");
        assert_eq!(sanitize("  "), "");
    }

    #[test]
    fn partial_input_is_kept_while_typing() {
        assert_eq!(sanitize("12."), "12.");
        assert_eq!(sanitize("."), ".");
        assert_eq!(sanitize(".75"), ".7");
        assert_eq!(sanitize("007"), "007");
    }

    #[test]
    fn values_above_the_maximum_are_clamped() {
        assert_eq!(DEFAULT_MAX_HOURS.to_string(), "99999.9");
        assert_eq!(sanitize("123456"), "99999.9");
        assert_eq!(sanitize("99999.95"), "99999.9");
        assert_eq!(sanitize("99999.9"), "99999.9");
        assert_eq!(sanitize_hours_input("750", Decimal::new(500, 0)), "500");
        assert_eq!(sanitize_hours_input("499.9", Decimal::new(500, 0)), "499.9");
    }

    #[test]
    fn digit_runs_too_long_for_a_decimal_are_clamped() {
        assert_eq!(sanitize(&"1".repeat(40)), "99999.9");
        assert_eq!(sanitize(&format!("{}.5", "9".repeat(35))), "99999.9");
        assert_eq!(sanitize_hours_input(&"7".repeat(30), Decimal::new(24, 0)), "24");
    }

    #[test]
    fn sanitizing_is_stable_on_clean_input() {
        for raw in ["0", "1.5", "24", "99999.9", "12."] {
            assert_eq!(sanitize(&sanitize(raw)), sanitize(raw));
        }
    }
}
