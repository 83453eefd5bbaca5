/// Inline markup inside a paragraph, list item or heading.
#[derive(Debug, Clone, PartialEq)]
pub enum Inline {
    Text(String),
    Bold(Vec<Inline>),
    Italic(Vec<Inline>),
    Strikethrough(Vec<Inline>),
    Code(String),
    Link { text: Vec<Inline>, url: String },
}

const TWITTER_PREFIX: &str = "https://twitter.com/";

/// Parse emphasis, strikethrough, code spans and links out of one run of text.
///
/// Unmatched delimiters stay as literal text. A backslash escapes ASCII
/// punctuation. `<@name>` links to the Twitter profile, `<scheme://...>` is
/// an autolink.
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut plain = String::new();
    let mut prev: Option<char> = None;
    let mut rest = text;

    while let Some(c) = rest.chars().next() {
        if c == '\\' {
            if let Some(escaped) = rest[1..].chars().next().filter(char::is_ascii_punctuation) {
                plain.push(escaped);
                prev = Some(escaped);
                rest = &rest[1 + escaped.len_utf8()..];
                continue;
            }
        }
        if let Some((inline, used)) = span(rest, prev) {
            match inline {
                Inline::Text(s) => plain.push_str(&s),
                other => {
                    flush(&mut plain, &mut out);
                    out.push(other);
                }
            }
            prev = rest[..used].chars().last();
            rest = &rest[used..];
            continue;
        }
        plain.push(c);
        prev = Some(c);
        rest = &rest[c.len_utf8()..];
    }
    flush(&mut plain, &mut out);
    out
}

fn flush(plain: &mut String, out: &mut Vec<Inline>) {
    if !plain.is_empty() {
        out.push(Inline::Text(std::mem::take(plain)));
    }
}

/// Try to read one span at the start of `rest`. Returns the span and the
/// number of bytes it covers.
fn span(rest: &str, prev: Option<char>) -> Option<(Inline, usize)> {
    match rest.as_bytes().first().copied()? {
        b'`' => Some(code_span(rest)),
        b'~' if rest.starts_with("~~") => delimited(rest, "~~", prev)
            .map(|(inner, used)| (Inline::Strikethrough(parse_inlines(inner)), used)),
        b'*' | b'_' => emphasis(rest, prev),
        b'[' => link(rest),
        b'<' => angle_link(rest),
        _ => None,
    }
}

/// A backtick run closes only on a run of the same length. An unclosed run is
/// literal text.
fn code_span(rest: &str) -> (Inline, usize) {
    let ticks = rest.bytes().take_while(|&b| b == b'`').count();
    let fence = &rest[..ticks];
    let mut from = ticks;
    while let Some(pos) = rest[from..].find(fence) {
        let start = from + pos;
        let run = rest[start..].bytes().take_while(|&b| b == b'`').count();
        if run == ticks {
            let content = &rest[ticks..start];
            let content = match content.strip_prefix(' ').and_then(|c| c.strip_suffix(' ')) {
                Some(inner) if !inner.trim().is_empty() => inner,
                _ => content,
            };
            return (Inline::Code(content.to_string()), start + ticks);
        }
        from = start + run;
    }
    (Inline::Text(fence.to_string()), ticks)
}

fn emphasis(rest: &str, prev: Option<char>) -> Option<(Inline, usize)> {
    let double = if rest.starts_with('*') { "**" } else { "__" };
    if rest.starts_with(double) {
        if let Some((inner, used)) = delimited(rest, double, prev) {
            return Some((Inline::Bold(parse_inlines(inner)), used));
        }
    }
    delimited(rest, &rest[..1], prev)
        .map(|(inner, used)| (Inline::Italic(parse_inlines(inner)), used))
}

/// Find the text between `delim` at the start of `rest` and its closer.
///
/// The content may not start or end with whitespace. Underscores never open
/// or close inside a word, so `snake_case_name` stays as written.
fn delimited<'a>(rest: &'a str, delim: &str, prev: Option<char>) -> Option<(&'a str, usize)> {
    let intraword = delim.starts_with('_');
    if intraword && prev.is_some_and(char::is_alphanumeric) {
        return None;
    }
    let body = &rest[delim.len()..];
    if body.is_empty() || body.starts_with(char::is_whitespace) {
        return None;
    }

    let mut skip_to = 0;
    for (i, _) in body.char_indices() {
        if i == 0 || i < skip_to {
            continue;
        }
        let at = &body[i..];
        if !at.starts_with(delim) {
            continue;
        }
        // A single delimiter skips over doubled ones, which belong to nested bold
        if delim.len() == 1 && at[1..].starts_with(delim) {
            skip_to = i + 2;
            continue;
        }
        let inner = &body[..i];
        if inner.ends_with(char::is_whitespace) {
            continue;
        }
        let after = at[delim.len()..].chars().next();
        if intraword && after.is_some_and(char::is_alphanumeric) {
            continue;
        }
        return Some((inner, delim.len() * 2 + i));
    }
    None
}

/// `[text](url)`
fn link(rest: &str) -> Option<(Inline, usize)> {
    let mut depth = 0i32;
    let mut close = None;
    for (i, c) in rest.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    close = Some(i);
                    break;
                }
            }
            _ => {}
        }
    }
    let close = close?;
    let target = rest[close + 1..].strip_prefix('(')?;
    let end = target.find(')')?;
    let inline = Inline::Link {
        text: parse_inlines(&rest[1..close]),
        url: target[..end].trim().to_string(),
    };
    Some((inline, close + 2 + end + 1))
}

/// `<@name>` or `<https://...>`
fn angle_link(rest: &str) -> Option<(Inline, usize)> {
    let end = rest.find('>')?;
    let inner = &rest[1..end];

    if let Some(handle) = inner.strip_prefix('@') {
        let valid = !handle.is_empty()
            && handle
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_');
        return valid.then(|| {
            let inline = Inline::Link {
                text: vec![Inline::Text(inner.to_string())],
                url: format!("{TWITTER_PREFIX}{inner}"),
            };
            (inline, end + 1)
        });
    }

    let is_url = !inner.contains(char::is_whitespace)
        && inner.split_once("://").is_some_and(|(scheme, _)| {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '.' | '-'))
        });
    is_url.then(|| {
        let inline = Inline::Link {
            text: vec![Inline::Text(inner.to_string())],
            url: inner.to_string(),
        };
        (inline, end + 1)
    })
}
