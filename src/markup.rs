//! Escaping of chat text for safe embedding in markup.

/// First code point that is always emitted as a numeric reference.
const FIRST_ESCAPED_CODE_POINT: u32 = 0xA0;

/// Escape `text` so it can be embedded in markup as literal text.
///
/// `<`, `>`, `&` and `"` become numeric character references, as does every
/// code point from U+00A0 upwards. ASCII and C1 controls pass through unchanged.
pub fn escape_text(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        let code = ch as u32;
        if matches!(ch, '<' | '>' | '&' | '"') || code >= FIRST_ESCAPED_CODE_POINT {
            out.push_str("&#");
            out.push_str(&code.to_string());
            out.push(';');
        } else {
            out.push(ch);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_ascii_unchanged() {
        assert_eq!(escape_text("hello world 123 !?"), "hello world 123 !?");
    }

    #[test]
    fn test_markup_characters() {
        assert_eq!(
            escape_text("<b>\"a\" & b</b>"),
            "&#60;b&#62;&#34;a&#34; &#38; b&#60;/b&#62;"
        );
    }

    #[test]
    fn test_non_ascii_uses_full_code_point() {
        assert_eq!(escape_text("é"), "&#233;");
        assert_eq!(escape_text("\u{a0}"), "&#160;");
        // Astral plane characters are one reference, not two surrogate halves.
        assert_eq!(escape_text("📢"), "&#128226;");
    }

    #[test]
    fn test_single_quote_passes_through() {
        assert_eq!(escape_text("it's"), "it's");
    }
}
