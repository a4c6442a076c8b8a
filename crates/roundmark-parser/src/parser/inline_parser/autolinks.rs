//! Autolinks: `<scheme:...>` and `<email>` forms, plus GFM extended
//! autolinks found in plain text.

use std::sync::LazyLock;

use regex::Regex;

use crate::tokens::AutolinkKind;

static URI_AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^<([A-Za-z][A-Za-z0-9.+-]{1,31}:[^<>\x00-\x20]*)>").expect("valid regex")
});

static EMAIL_AUTOLINK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^<([a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*)>",
    )
    .expect("valid regex")
});

static EXTENDED_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9.+_-]+@[a-zA-Z0-9_-]+(?:\.[a-zA-Z0-9_-]+)+").expect("valid regex")
});

/// A parsed `<...>` autolink.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Autolink<'a> {
    pub len: usize,
    pub kind: AutolinkKind,
    pub raw: &'a str,
}

/// Try to parse an autolink at the start of `text` (which begins with `<`).
pub(crate) fn try_parse_autolink(text: &str) -> Option<Autolink<'_>> {
    if let Some(caps) = URI_AUTOLINK.captures(text) {
        let whole = caps.get(0)?;
        return Some(Autolink {
            len: whole.end(),
            kind: AutolinkKind::Uri,
            raw: caps.get(1)?.as_str(),
        });
    }
    let caps = EMAIL_AUTOLINK.captures(text)?;
    Some(Autolink {
        len: caps.get(0)?.end(),
        kind: AutolinkKind::Email,
        raw: caps.get(1)?.as_str(),
    })
}

/// An extended autolink found in text: byte range and link target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ExtendedAutolink {
    pub start: usize,
    pub end: usize,
    pub href: String,
}

fn is_host_char(c: char) -> bool {
    c.is_alphanumeric() || c == '-' || c == '_'
}

/// Length of a valid domain at the start of `text`. Underscores are not
/// allowed in the last two segments; `require_period` asks for at least
/// one `.`.
fn domain_len(text: &str, require_period: bool) -> Option<usize> {
    let mut periods = 0;
    let mut underscores_last = 0;
    let mut underscores_prev = 0;
    let mut end = 0;
    for (idx, c) in text.char_indices() {
        match c {
            '.' => {
                if !text[idx + 1..].starts_with(is_host_char) {
                    break;
                }
                underscores_prev = underscores_last;
                underscores_last = 0;
                periods += 1;
            }
            '_' => underscores_last += 1,
            c if is_host_char(c) => {}
            _ => break,
        }
        end = idx + c.len_utf8();
    }
    if end == 0 || underscores_last > 0 || underscores_prev > 0 {
        return None;
    }
    if require_period && periods == 0 {
        return None;
    }
    Some(end)
}

/// Trim trailing punctuation, unbalanced `)` and entity-like suffixes
/// from an extended autolink.
fn trim_link_end(link: &str) -> usize {
    let bytes = link.as_bytes();
    let mut end = link.len();
    while end > 0 {
        match bytes[end - 1] {
            b'?' | b'!' | b'.' | b',' | b':' | b'*' | b'_' | b'~' | b'\'' | b'"' => end -= 1,
            b';' => {
                let name_start = link[..end - 1]
                    .rfind(|c: char| !c.is_ascii_alphanumeric())
                    .unwrap_or(0);
                if name_start + 1 < end - 1 && bytes[name_start] == b'&' {
                    end = name_start;
                } else {
                    end -= 1;
                }
            }
            b')' => {
                let opening = link[..end].matches('(').count();
                let closing = link[..end].matches(')').count();
                if closing <= opening {
                    break;
                }
                end -= 1;
            }
            _ => break,
        }
    }
    end
}

fn valid_preceding(text: &str, start: usize) -> bool {
    text[..start]
        .chars()
        .next_back()
        .is_none_or(|c| c.is_whitespace() || matches!(c, '*' | '_' | '~' | '('))
}

/// Find a `www.` or `http(s)://` link starting at `start`.
fn url_at(text: &str, start: usize) -> Option<ExtendedAutolink> {
    let rest = &text[start..];
    let (prefix_len, require_period, scheme) = if rest.starts_with("www.") {
        (0, true, "http://")
    } else if rest.starts_with("http://") {
        (7, false, "")
    } else if rest.starts_with("https://") {
        (8, false, "")
    } else {
        return None;
    };
    let domain = domain_len(&rest[prefix_len..], require_period)?;
    let mut end = prefix_len + domain;
    end += rest[end..]
        .find(|c: char| c.is_whitespace() || c == '<')
        .unwrap_or(rest.len() - end);
    let end = trim_link_end(&rest[..end]);
    if end <= prefix_len {
        return None;
    }
    let raw = &rest[..end];
    Some(ExtendedAutolink {
        start,
        end: start + end,
        href: format!("{scheme}{raw}"),
    })
}

/// Find every extended autolink in a run of plain text.
pub(crate) fn find_extended_autolinks(text: &str) -> Vec<ExtendedAutolink> {
    let mut links = Vec::new();
    let mut pos = 0;
    while pos < text.len() {
        let rest = &text[pos..];
        let next_url = ["www.", "http://", "https://"]
            .iter()
            .filter_map(|prefix| rest.find(prefix))
            .min();
        let next_email = EXTENDED_EMAIL.find(rest);

        let email_first = match (next_email, next_url) {
            (Some(email), Some(url)) => email.start() < url,
            (Some(_), None) => true,
            _ => false,
        };

        if email_first && let Some(email) = next_email {
            let raw = email.as_str();
            let start = pos + email.start();
            if !raw.ends_with(['-', '_']) {
                links.push(ExtendedAutolink {
                    start,
                    end: start + raw.len(),
                    href: format!("mailto:{raw}"),
                });
            }
            pos = start + raw.len();
            continue;
        }

        let Some(offset) = next_url else {
            break;
        };
        let start = pos + offset;
        match url_at(text, start).filter(|_| valid_preceding(text, start)) {
            Some(link) => {
                pos = link.end;
                links.push(link);
            }
            None => pos = start + 1,
        }
    }
    links
}
