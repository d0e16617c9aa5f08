//! Bracketed format aliases.

use alloc::{borrow::Cow, format, string::String};

use crate::{DatetimeError, DatetimeResult};

/// The known aliases and the patterns they expand to.
pub const ALIASES: [(&str, &str); 13] = [
    ("datetime_global_v2", r"D M d Y H:i:s \U\T\CO (e)"),
    ("datetime_global_v1", r"D M d Y H:i:s \G\M\TO (e)"),
    ("date_v1", "D M d Y"),
    ("header_default", "D, d M Y H:i:s O"),
    ("mysqli", "Y-m-d H:i:s.v"),
    ("b", r"\@B"),
    ("iso8601", r"Y-m-d\TH:i:sO"),
    ("mysql", "Y-m-d H:i:s"),
    ("rfc2822", "D, d M Y H:i:s O"),
    ("short_date", "m/d/Y"),
    ("long_date", "l, F j, Y"),
    ("short_date_time", "m/d/Y H:i"),
    ("full_date_time", "l, F j, Y H:i:s"),
];

/// Looks up an alias by name, ignoring ASCII case.
#[must_use]
pub fn lookup(name: &str) -> Option<&'static str> {
    ALIASES
        .iter()
        .find(|(alias, _)| alias.eq_ignore_ascii_case(name))
        .map(|(_, pattern)| *pattern)
}

fn is_alias_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

/// Replaces every unescaped `[name]` in `pattern` with its expansion.
///
/// Expansions are not scanned again. A bracket that does not enclose an
/// identifier is left as is; an identifier that is not a known alias is
/// an error.
pub(crate) fn expand(pattern: &str) -> DatetimeResult<Cow<'_, str>> {
    if !pattern.contains('[') {
        return Ok(Cow::Borrowed(pattern));
    }
    let mut out = String::with_capacity(pattern.len());
    let mut backslashes = 0usize;
    let mut rest = pattern;
    while let Some(ch) = rest.chars().next() {
        if ch == '[' && backslashes % 2 == 0 {
            let inner = &rest[1..];
            let end = inner.find(|c: char| !is_alias_char(c));
            if let Some(end) = end.filter(|end| *end > 0 && inner[*end..].starts_with(']')) {
                let name = &inner[..end];
                let expansion = lookup(name).ok_or_else(|| {
                    DatetimeError::format().with_message(format!("Unknown format alias: [{name}]"))
                })?;
                #[cfg(feature = "log")]
                log::debug!("expanded format alias [{name}] to {expansion:?}");
                out.push_str(expansion);
                rest = &inner[end + 1..];
                backslashes = 0;
                continue;
            }
        }
        backslashes = if ch == '\\' { backslashes + 1 } else { 0 };
        out.push(ch);
        rest = &rest[ch.len_utf8()..];
    }
    Ok(Cow::Owned(out))
}
