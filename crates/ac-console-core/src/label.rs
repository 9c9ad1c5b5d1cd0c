// Copyright 2025 Schelling Point Labs Inc
// SPDX-License-Identifier: AGPL-3.0-only

//! Human-readable labels for setting keys and section names

/// ASCII word character as matched by `\w`
fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Uppercase every ASCII letter that starts a word
fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_word = false;
    for c in text.chars() {
        let word = is_word_char(c);
        out.push(if word && !in_word { c.to_ascii_uppercase() } else { c });
        in_word = word;
    }
    out
}

/// Derive a display label from a setting key
///
/// Underscores become spaces, a space is inserted at every lowercase to
/// uppercase boundary, each word is capitalized and the result is trimmed:
/// `max_users` and `maxUsers` both read "Max Users". Applying the function
/// to its own output is a no-op.
pub fn format_label(key: &str) -> String {
    let mut spaced = String::with_capacity(key.len() + 4);
    let mut prev: Option<char> = None;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        if prev.is_some_and(|p| p.is_ascii_lowercase()) && c.is_ascii_uppercase() {
            spaced.push(' ');
        }
        spaced.push(c);
        prev = Some(c);
    }
    capitalize_words(&spaced).trim().to_string()
}

/// Heading for a settings section, e.g. `email` reads "Email Settings"
pub fn section_title(section: &str) -> String {
    format!("{} Settings", capitalize_words(&section.replace('_', " ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_format_label() {
        assert_eq!(format_label("max_users"), "Max Users");
        assert_eq!(format_label("maxUsers"), "Max Users");
        assert_eq!(format_label("backupFrequency"), "Backup Frequency");
        assert_eq!(format_label("email_notifications"), "Email Notifications");
        assert_eq!(format_label("smtpHost"), "Smtp Host");
        assert_eq!(format_label("maintenance"), "Maintenance");
    }

    #[test]
    fn test_format_label_edges() {
        assert_eq!(format_label(""), "");
        assert_eq!(format_label("_leading_"), "Leading");
        assert_eq!(format_label("APIKey"), "APIKey");
        assert_eq!(format_label("retry2fa"), "Retry2fa");
        assert_eq!(format_label("a-b"), "A-B");
    }

    #[test]
    fn test_section_title() {
        assert_eq!(section_title("email"), "Email Settings");
        assert_eq!(section_title("payment_gateway"), "Payment Gateway Settings");
    }

    proptest! {
        #[test]
        fn format_label_is_idempotent(key in "[a-zA-Z0-9_ -]{0,24}") {
            let once = format_label(&key);
            prop_assert_eq!(format_label(&once), once);
        }

        #[test]
        fn format_label_is_idempotent_for_any_text(key in "\\PC{0,16}") {
            let once = format_label(&key);
            prop_assert_eq!(format_label(&once), once);
        }
    }
}
