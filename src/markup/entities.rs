//! HTML entity decoding for text content and attribute payloads.

use quick_xml::escape::resolve_html5_entity;
use std::borrow::Cow;

// Longest named reference in the HTML5 table is 31 characters plus `&`/`;`.
const MAX_REFERENCE_LEN: usize = 40;

/// Decodes named (`&amp;`, `&nbsp;`, ...) and numeric (`&#38;`, `&#x26;`)
/// character references. References that do not resolve are left as written.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let candidate = &rest[amp..];
        let end = candidate
            .char_indices()
            .take(MAX_REFERENCE_LEN)
            .find(|(_, c)| *c == ';')
            .map(|(i, _)| i);

        match end.and_then(|end| resolve(&candidate[1..end]).map(|r| (end, r))) {
            Some((end, resolved)) => {
                out.push_str(&resolved);
                rest = &candidate[end + 1..];
            }
            None => {
                out.push('&');
                rest = &candidate[1..];
            }
        }
    }
    out.push_str(rest);
    Cow::Owned(out)
}

fn resolve(name: &str) -> Option<Cow<'static, str>> {
    if let Some(numeric) = name.strip_prefix('#') {
        let code = match numeric.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => numeric.parse::<u32>().ok()?,
        };
        let c = match code {
            0 => '\u{FFFD}',
            _ => char::from_u32(code).unwrap_or('\u{FFFD}'),
        };
        return Some(Cow::Owned(c.to_string()));
    }
    resolve_html5_entity(name).map(Cow::Borrowed)
}
