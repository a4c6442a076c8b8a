//! Link reference definitions and the registry they populate.
//!
//! Definitions have the form:
//! ```markdown
//! [label]: url "optional title"
//! [label]: <url> 'title'
//! [label]:
//!   url
//!   (title on later lines)
//! ```
//! They can only appear at the start of a paragraph, so they are peeled
//! off paragraph content when the paragraph closes (or becomes a setext
//! heading).

use std::collections::HashMap;

use crate::parser::inline_parser::links::{
    scan_link_destination, scan_link_label, scan_link_title, skip_spnl,
};
use crate::utils::{normalize_label, unescape};

/// A reference definition that maps a label to a destination and title.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ReferenceDefinition {
    pub label: String,
    pub destination: String,
    pub title: Option<String>,
}

/// Registry of reference definitions, keyed by normalized label.
/// The first definition of a label wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceRegistry {
    definitions: HashMap<String, ReferenceDefinition>,
}

impl ReferenceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a definition. Returns `false` if the label was already defined,
    /// in which case the registry is unchanged.
    pub fn add(&mut self, label: &str, destination: String, title: Option<String>) -> bool {
        let key = normalize_label(label);
        if key.is_empty() || self.definitions.contains_key(&key) {
            return false;
        }
        self.definitions.insert(
            key,
            ReferenceDefinition {
                label: label.to_string(),
                destination,
                title,
            },
        );
        true
    }

    /// Look up a definition by label (case-insensitive).
    pub fn get(&self, label: &str) -> Option<&ReferenceDefinition> {
        self.definitions.get(&normalize_label(label))
    }

    pub fn contains(&self, label: &str) -> bool {
        self.get(label).is_some()
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}

/// A definition scanned from the start of some text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct ParsedDefinition {
    /// Bytes consumed, including the final line ending if any.
    pub len: usize,
    pub label: String,
    pub destination: String,
    pub title: Option<String>,
}

/// Try to parse a reference definition at the start of `text`.
///
/// A definition must end at the end of a line. If a title is present but
/// followed by other text on its line, the definition may still stand
/// without the title when the destination ends its own line.
pub(crate) fn try_parse_reference_definition(text: &str) -> Option<ParsedDefinition> {
    let label_end = scan_link_label(text, 0)?;
    let label = &text[1..label_end - 1];
    if normalize_label(label).is_empty() {
        return None;
    }
    if text.as_bytes().get(label_end) != Some(&b':') {
        return None;
    }

    let dest_start = skip_spnl(text, label_end + 1);
    let destination = scan_link_destination(text, dest_start, false)?;

    let before_title = destination.end;
    let title_start = skip_spnl(text, before_title);
    let mut title = None;
    let mut end = before_title;
    if title_start > before_title
        && let Some((title_end, raw_title, _)) = scan_link_title(text, title_start)
    {
        title = Some(raw_title);
        end = title_end;
    }

    let line_end = match at_line_end(text, end) {
        Some(line_end) => line_end,
        None if title.is_some() => {
            title = None;
            at_line_end(text, before_title)?
        }
        None => return None,
    };

    Some(ParsedDefinition {
        len: line_end,
        label: label.to_string(),
        destination: unescape(destination.raw).into_owned(),
        title: title.map(|raw| unescape(raw).into_owned()),
    })
}

/// If only spaces and tabs remain on the line starting at `pos`, return the
/// position just after the line ending (or end of text).
fn at_line_end(text: &str, pos: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut end = pos;
    while let Some(&byte) = bytes.get(end) {
        match byte {
            b' ' | b'\t' => end += 1,
            b'\n' => return Some(end + 1),
            _ => return None,
        }
    }
    Some(end)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_first_definition_wins() {
        let mut registry = ReferenceRegistry::new();
        assert!(registry.add("Foo", "/one".into(), None));
        assert!(!registry.add("FOO", "/two".into(), None));
        assert_eq!(registry.get("foo").unwrap().destination, "/one");
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn simple_definition() {
        let def = try_parse_reference_definition("[foo]: /url \"title\"").unwrap();
        assert_eq!(def.label, "foo");
        assert_eq!(def.destination, "/url");
        assert_eq!(def.title.as_deref(), Some("title"));
        assert_eq!(def.len, 19);
    }

    #[test]
    fn multiline_definition_consumes_its_lines() {
        let text = "[Foo bar]:\n<my url>\n'title'\nrest";
        let def = try_parse_reference_definition(text).unwrap();
        assert_eq!(def.destination, "my url");
        assert_eq!(def.title.as_deref(), Some("title"));
        assert_eq!(&text[def.len..], "rest");
    }

    #[test]
    fn title_with_trailing_text_drops_to_destination_only() {
        let text = "[foo]: /url\n\"title\" ok";
        let def = try_parse_reference_definition(text).unwrap();
        assert_eq!(def.title, None);
        assert_eq!(&text[def.len..], "\"title\" ok");
    }

    #[test]
    fn rejects_trailing_garbage_and_missing_destination() {
        assert!(try_parse_reference_definition("[foo]: /url \"title\" ok").is_none());
        assert!(try_parse_reference_definition("[foo]:").is_none());
        assert!(try_parse_reference_definition("[foo]:\n").is_none());
        assert!(try_parse_reference_definition("[ ]: /url").is_none());
        assert!(try_parse_reference_definition("[foo] /url").is_none());
    }

    #[test]
    fn empty_angle_destination_is_allowed() {
        let def = try_parse_reference_definition("[foo]: <>").unwrap();
        assert_eq!(def.destination, "");
    }
}
