//! Display formatting for unit labels.

/// Format a raw unit label for display: `"PerKg"` becomes `"1 kg"`,
/// `"PerDay"` becomes `"1 Day"`, and labels without the `Per` prefix pass
/// through with the `"1 "` prefix (`"CubicM"` → `"1 CubicM"`).
///
/// The remainder after a (case-insensitive) `Per` prefix is lowercased only
/// when it is all-uppercase or at most two characters long, so short
/// abbreviations read naturally while mixed-case words keep their casing.
#[must_use]
pub fn format_unit(raw: &str) -> String {
    if let Some(prefix) = raw.get(..3) {
        if prefix.eq_ignore_ascii_case("per") {
            let rest = &raw[3..];
            if is_all_uppercase(rest) || rest.chars().count() <= 2 {
                return format!("1 {}", rest.to_lowercase());
            }
            return format!("1 {rest}");
        }
    }
    format!("1 {raw}")
}

/// True when the string has at least one cased character and every cased
/// character is uppercase (the semantics display templates relied on).
fn is_all_uppercase(s: &str) -> bool {
    let mut has_cased = false;
    for c in s.chars() {
        if c.is_lowercase() {
            return false;
        }
        if c.is_uppercase() {
            has_cased = true;
        }
    }
    has_cased
}
