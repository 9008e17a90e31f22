use wren_dom::AttributesMap;

use crate::entities::decode_entities;

/// Split the text between `<` and `>` into a lowercase tag name and its
/// attributes. Returns `None` for an empty tag.
///
/// Accepts `key=value`, `key="quoted value"`, `key='quoted'` and bare `key`
/// (empty value). A trailing `/` that closes the tag (`<br/>`,
/// `<img src="a.png" />`) is dropped; one that ends an unquoted value
/// (`<a href=/docs/>`) is kept.
pub(crate) fn parse_tag(raw: &str) -> Option<(String, AttributesMap)> {
    let raw = strip_self_closing_slash(raw.trim());
    let name_end = raw
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(raw.len());
    let name = raw[..name_end].to_lowercase();
    if name.is_empty() {
        return None;
    }

    let mut attrs = AttributesMap::new();
    let mut rest = raw[name_end..].trim_start();
    while !rest.is_empty() {
        let key_end = rest
            .find(|c: char| c.is_ascii_whitespace() || c == '=')
            .unwrap_or(rest.len());
        let key = rest[..key_end].to_lowercase();
        rest = rest[key_end..].trim_start();

        let value = if let Some(after_eq) = rest.strip_prefix('=') {
            let (value, remaining) = split_value(after_eq.trim_start());
            rest = remaining;
            decode_entities(value)
        } else {
            String::new()
        };

        // A stray `=` with no key: skip it rather than loop forever.
        if !key.is_empty() {
            let _ = attrs.insert(key, value);
        }
        rest = rest.trim_start();
    }
    Some((name, attrs))
}

/// Take one attribute value off the front of `input`, returning it and the
/// unconsumed remainder.
fn split_value(input: &str) -> (&str, &str) {
    if let Some(quote) = input.chars().next().filter(|c| matches!(c, '"' | '\'')) {
        let body = &input[1..];
        return match body.find(quote) {
            Some(end) => (&body[..end], &body[end + 1..]),
            None => (body, ""),
        };
    }
    let end = input
        .find(|c: char| c.is_ascii_whitespace())
        .unwrap_or(input.len());
    (&input[..end], &input[end..])
}

fn strip_self_closing_slash(raw: &str) -> &str {
    let Some(before) = raw.strip_suffix('/') else {
        return raw;
    };
    if before.is_empty() {
        return raw;
    }
    let bare_name = !before.contains(|c: char| c.is_ascii_whitespace());
    let closes_tag = before.ends_with(|c: char| c.is_ascii_whitespace() || c == '"' || c == '\'');
    if bare_name || closes_tag { before.trim_end() } else { raw }
}
