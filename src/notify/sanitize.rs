//! Message validation and sanitization.
//!
//! Control characters that break the provider's message framing are
//! removed. Tab, line feed and carriage return survive so multi-line
//! messages keep their layout.

use crate::notify::telegram::NotifyError;

/// Characters removed from outgoing text: C0 controls except `\t`, `\n`,
/// `\r`, plus DEL and the C1 block.
pub fn is_stripped_control(c: char) -> bool {
    matches!(
        c,
        '\u{0}'..='\u{8}' | '\u{B}' | '\u{C}' | '\u{E}'..='\u{1F}' | '\u{7F}'..='\u{9F}'
    )
}

/// Trim surrounding whitespace, then drop stripped control characters.
pub fn sanitize(text: &str) -> String {
    text.trim().chars().filter(|c| !is_stripped_control(*c)).collect()
}

/// Validate and sanitize in one step.
///
/// Blank input, and input that is nothing but control characters, is
/// rejected with [`NotifyError::InvalidMessage`].
pub fn prepare(text: &str) -> Result<String, NotifyError> {
    if text.trim().is_empty() {
        return Err(NotifyError::InvalidMessage);
    }
    let clean = sanitize(text);
    if clean.trim().is_empty() {
        return Err(NotifyError::InvalidMessage);
    }
    Ok(clean)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bell_removed_newline_kept() {
        assert_eq!(sanitize("Hello\u{0007}World\nLine2"), "HelloWorld\nLine2");
    }

    #[test]
    fn test_tab_and_cr_kept() {
        assert_eq!(sanitize("a\tb\r\nc"), "a\tb\r\nc");
    }

    #[test]
    fn test_c1_and_del_removed() {
        assert_eq!(sanitize("x\u{7F}y\u{85}z\u{9F}"), "xyz");
        assert_eq!(sanitize("\u{0}\u{B}\u{C}\u{1B}[31mred"), "[31mred");
    }

    #[test]
    fn test_surrounding_whitespace_trimmed() {
        assert_eq!(sanitize("  order #12 shipped \n"), "order #12 shipped");
    }

    #[test]
    fn test_non_ascii_preserved() {
        assert_eq!(sanitize("Заказ №5 готов ✅"), "Заказ №5 готов ✅");
    }

    #[test]
    fn test_prepare_rejects_blank() {
        assert!(matches!(prepare(""), Err(NotifyError::InvalidMessage)));
        assert!(matches!(prepare(" \n\t "), Err(NotifyError::InvalidMessage)));
    }

    #[test]
    fn test_prepare_rejects_control_only() {
        assert!(matches!(prepare("\u{7}\u{1}"), Err(NotifyError::InvalidMessage)));
    }

    #[test]
    fn test_prepare_accepts_text() {
        assert_eq!(prepare(" hi\u{7} ").unwrap(), "hi");
    }
}
