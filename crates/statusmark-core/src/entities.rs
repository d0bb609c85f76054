use once_cell::sync::Lazy;
use std::collections::HashMap;

static NAMED_ENTITIES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    [
        ("amp", "&"),
        ("lt", "<"),
        ("gt", ">"),
        ("quot", "\""),
        ("apos", "'"),
        ("nbsp", "\u{00A0}"),
        ("hellip", "\u{2026}"),
        ("mdash", "\u{2014}"),
        ("ndash", "\u{2013}"),
        ("lsquo", "\u{2018}"),
        ("rsquo", "\u{2019}"),
        ("ldquo", "\u{201C}"),
        ("rdquo", "\u{201D}"),
        ("copy", "\u{00A9}"),
        ("reg", "\u{00AE}"),
        ("trade", "\u{2122}"),
    ]
    .into_iter()
    .collect()
});

// Longest name in the table; bounds the scan for the closing ';'.
const MAX_NAME_LEN: usize = 6;

pub(crate) fn lookup_named_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// Decodes every entity reference in `text`. Unknown or unterminated
/// references are copied through unchanged.
pub(crate) fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }
    let mut result = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        result.push_str(&rest[..amp]);
        let tail = &rest[amp..];
        match decode_entity(tail) {
            Some((decoded, consumed)) => {
                result.push_str(&decoded);
                rest = &tail[consumed..];
            }
            None => {
                result.push('&');
                rest = &tail[1..];
            }
        }
    }
    result.push_str(rest);
    result
}

/// Decodes one reference at the start of `text` (which begins with `&`),
/// returning the replacement and the number of bytes consumed.
fn decode_entity(text: &str) -> Option<(String, usize)> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'&') {
        return None;
    }
    let mut i = 1;
    if bytes.get(i) == Some(&b'#') {
        i += 1;
        let radix = match bytes.get(i) {
            Some(b'x') | Some(b'X') => {
                i += 1;
                16
            }
            _ => 10,
        };
        let num_start = i;
        while i < bytes.len() && bytes[i].is_ascii_hexdigit() {
            if radix == 10 && !bytes[i].is_ascii_digit() {
                break;
            }
            i += 1;
        }
        if i == num_start || bytes.get(i) != Some(&b';') {
            return None;
        }
        let digits = &text[num_start..i];
        let max_digits = if radix == 16 { 6 } else { 7 };
        if digits.len() > max_digits {
            return None;
        }
        let value = u32::from_str_radix(digits, radix).ok()?;
        let ch = if value == 0 {
            '\u{FFFD}'
        } else {
            char::from_u32(value).unwrap_or('\u{FFFD}')
        };
        return Some((ch.to_string(), i + 1));
    }
    let name_start = i;
    while i < bytes.len() && i - name_start <= MAX_NAME_LEN && bytes[i].is_ascii_alphanumeric() {
        i += 1;
    }
    if i == name_start || bytes.get(i) != Some(&b';') {
        return None;
    }
    let decoded = lookup_named_entity(&text[name_start..i])?;
    Some((decoded.to_string(), i + 1))
}
