//! Optional-field normalization shared by every assembler.
//!
//! The MH schema rejects placeholder strings where it expects an absent
//! value, so `""`, `"0"`, and `"N/A"` are normalized to `None` through a
//! single function instead of per call site.

/// Map the sentinel values `""`, `"0"`, and `"N/A"` to `None`; any other
/// string passes through unchanged. Idempotent over its own output.
pub fn normalize_optional(value: &str) -> Option<String> {
    match value {
        "" | "0" | "N/A" => None,
        other => Some(other.to_string()),
    }
}

/// Insert a dash before the final character of a document number unless the
/// number already carries one (DUI check-digit convention).
pub fn with_dash(text: &str) -> String {
    if text.contains('-') || text.chars().count() < 2 {
        return text.to_string();
    }
    let split = text.len() - text.chars().last().map_or(0, char::len_utf8);
    format!("{}-{}", &text[..split], &text[split..])
}

/// Zero-pad a correlative to the 15 digits the control number requires.
pub fn pad_correlative(correlative: u64) -> String {
    format!("{correlative:015}")
}
