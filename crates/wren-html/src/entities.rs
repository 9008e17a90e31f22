//! Character references.
//!
//! Named references are looked up in a small fixed table. Keys carry the
//! trailing semicolon; the handful of legacy names that browsers accept
//! without one are listed again bare. Numeric references (`&#169;`,
//! `&#xA9;`) decode any valid scalar value.

use std::collections::HashMap;
use std::sync::LazyLock;

/// Longest entity name we bother scanning for.
const MAX_NAME_LEN: usize = 32;

static NAMED_ENTITIES: LazyLock<HashMap<&'static str, &'static str>> = LazyLock::new(|| {
    HashMap::from([
        ("amp;", "&"),
        ("amp", "&"),
        ("lt;", "<"),
        ("lt", "<"),
        ("gt;", ">"),
        ("gt", ">"),
        ("quot;", "\""),
        ("quot", "\""),
        ("apos;", "'"),
        ("nbsp;", "\u{00A0}"),
        ("nbsp", "\u{00A0}"),
        ("copy;", "\u{00A9}"),
        ("copy", "\u{00A9}"),
        ("reg;", "\u{00AE}"),
        ("reg", "\u{00AE}"),
        ("trade;", "\u{2122}"),
        ("ndash;", "\u{2013}"),
        ("mdash;", "\u{2014}"),
        ("hellip;", "\u{2026}"),
        ("shy;", "\u{00AD}"),
        ("bull;", "\u{2022}"),
        ("middot;", "\u{00B7}"),
        ("lsquo;", "\u{2018}"),
        ("rsquo;", "\u{2019}"),
        ("ldquo;", "\u{201C}"),
        ("rdquo;", "\u{201D}"),
        ("laquo;", "\u{00AB}"),
        ("raquo;", "\u{00BB}"),
        ("times;", "\u{00D7}"),
        ("deg;", "\u{00B0}"),
        ("euro;", "\u{20AC}"),
        ("pound;", "\u{00A3}"),
    ])
});

/// Look up a named reference, without the leading `&`.
///
/// `"amp;"` and the legacy `"amp"` both resolve; `"apos"` does not.
#[must_use]
pub fn lookup_entity(name: &str) -> Option<&'static str> {
    NAMED_ENTITIES.get(name).copied()
}

/// Decode the character reference at the start of `input`.
///
/// `input` must start with `&`. Returns the replacement text and the number
/// of bytes consumed, or `None` when the text is not a recognized reference
/// (the caller then keeps the `&` literally).
#[must_use]
pub fn decode_reference(input: &str) -> Option<(String, usize)> {
    let body = input.strip_prefix('&')?;
    if let Some(numeric) = body.strip_prefix('#') {
        return decode_numeric(numeric).map(|(c, len)| (c.to_string(), 2 + len));
    }

    let name_len = body
        .bytes()
        .take(MAX_NAME_LEN)
        .take_while(u8::is_ascii_alphanumeric)
        .count();
    if name_len == 0 {
        return None;
    }
    let name = &body[..name_len];

    if body[name_len..].starts_with(';')
        && let Some(replacement) = lookup_entity(&body[..=name_len])
    {
        return Some((replacement.to_string(), 1 + name_len + 1));
    }

    // Legacy references match the longest known prefix: "&ampx" is "&x".
    (1..=name_len).rev().find_map(|len| {
        lookup_entity(&name[..len]).map(|replacement| (replacement.to_string(), 1 + len))
    })
}

/// Decode `123;` or `x7B;` (the part after `&#`). The semicolon is optional.
fn decode_numeric(input: &str) -> Option<(char, usize)> {
    let (radix, prefix_len) = if input.starts_with(['x', 'X']) {
        (16, 1)
    } else {
        (10, 0)
    };
    let digits = &input[prefix_len..];
    let digit_len = digits
        .bytes()
        .take_while(|b| char::from(*b).is_digit(radix))
        .count();
    if digit_len == 0 {
        return None;
    }
    let value = u32::from_str_radix(&digits[..digit_len], radix).ok()?;
    let decoded = char::from_u32(value).filter(|&c| c != '\0')?;
    let semicolon = usize::from(digits[digit_len..].starts_with(';'));
    Some((decoded, prefix_len + digit_len + semicolon))
}

/// Replace every recognized reference in `text`, leaving the rest intact.
#[must_use]
pub fn decode_entities(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        rest = &rest[amp..];
        match decode_reference(rest) {
            Some((replacement, consumed)) => {
                out.push_str(&replacement);
                rest = &rest[consumed..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}
