//! Link and image properties shared by the link tokens.

/// How a link's destination was supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum LabelType {
    /// `[text](dest "title")`
    Inline,
    /// `[text][label]`
    Full,
    /// `[text][]`
    Collapsed,
    /// `[text]`
    Shortcut,
}

impl LabelType {
    pub fn as_str(&self) -> &'static str {
        match self {
            LabelType::Inline => "inline",
            LabelType::Full => "full",
            LabelType::Collapsed => "collapsed",
            LabelType::Shortcut => "shortcut",
        }
    }
}

/// Everything known about a resolved link or image, built once when the
/// closing bracket resolves.
///
/// Resolved values (`uri`, `title`) are what renderers use; the raw values
/// and whitespace fields are what rehydration uses.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct LinkProperties {
    pub label_type: LabelType,
    pub uri: String,
    pub title: Option<String>,
    pub raw_uri: String,
    pub raw_title: Option<String>,
    /// Raw text between the brackets of a full reference.
    pub reference_label: Option<String>,
    pub before_uri_whitespace: String,
    pub after_uri_whitespace: String,
    pub after_title_whitespace: String,
    /// Opening character of the title: `"`, `'` or `(`.
    pub title_bound: Option<char>,
    pub uses_angle_brackets: bool,
}

impl LinkProperties {
    pub(crate) fn reference(
        label_type: LabelType,
        uri: String,
        title: Option<String>,
        reference_label: Option<String>,
    ) -> Self {
        Self {
            label_type,
            uri,
            title,
            raw_uri: String::new(),
            raw_title: None,
            reference_label,
            before_uri_whitespace: String::new(),
            after_uri_whitespace: String::new(),
            after_title_whitespace: String::new(),
            title_bound: None,
            uses_angle_brackets: false,
        }
    }

    /// Source text that follows the link text, starting at the `]`.
    pub fn tail(&self) -> String {
        match self.label_type {
            LabelType::Shortcut => "]".to_string(),
            LabelType::Collapsed => "][]".to_string(),
            LabelType::Full => format!(
                "][{}]",
                self.reference_label.as_deref().unwrap_or_default()
            ),
            LabelType::Inline => {
                let mut tail = String::from("](");
                tail.push_str(&self.before_uri_whitespace);
                if self.uses_angle_brackets {
                    tail.push('<');
                    tail.push_str(&self.raw_uri);
                    tail.push('>');
                } else {
                    tail.push_str(&self.raw_uri);
                }
                tail.push_str(&self.after_uri_whitespace);
                if let (Some(bound), Some(raw_title)) = (self.title_bound, &self.raw_title) {
                    tail.push(bound);
                    tail.push_str(raw_title);
                    tail.push(closing_bound(bound));
                }
                tail.push_str(&self.after_title_whitespace);
                tail.push(')');
                tail
            }
        }
    }

    pub(crate) fn extra_data(&self) -> String {
        format!(
            "{}:{}:{}:{}:{}:{}:{}:{}:{}:{}",
            self.label_type.as_str(),
            self.uri,
            self.title.as_deref().unwrap_or_default(),
            self.raw_uri,
            self.raw_title.as_deref().unwrap_or_default(),
            self.reference_label.as_deref().unwrap_or_default(),
            self.uses_angle_brackets,
            self.before_uri_whitespace,
            self.after_uri_whitespace,
            self.after_title_whitespace,
        )
    }
}

pub(crate) fn closing_bound(open: char) -> char {
    match open {
        '(' => ')',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inline(raw_uri: &str) -> LinkProperties {
        LinkProperties {
            label_type: LabelType::Inline,
            uri: raw_uri.to_string(),
            title: None,
            raw_uri: raw_uri.to_string(),
            raw_title: None,
            reference_label: None,
            before_uri_whitespace: String::new(),
            after_uri_whitespace: String::new(),
            after_title_whitespace: String::new(),
            title_bound: None,
            uses_angle_brackets: false,
        }
    }

    #[test]
    fn inline_tail_keeps_whitespace_and_title() {
        let mut props = inline("/url");
        props.before_uri_whitespace = " ".to_string();
        props.after_uri_whitespace = "\n".to_string();
        props.title_bound = Some('(');
        props.raw_title = Some("t\\)".to_string());
        props.title = Some("t)".to_string());
        assert_eq!(props.tail(), "]( /url\n(t\\)))");
    }

    #[test]
    fn angle_bracket_tail() {
        let mut props = inline("a b");
        props.uses_angle_brackets = true;
        assert_eq!(props.tail(), "](<a b>)");
    }

    #[test]
    fn reference_tails() {
        let full = LinkProperties::reference(
            LabelType::Full,
            "/u".into(),
            None,
            Some("Foo Bar".into()),
        );
        assert_eq!(full.tail(), "][Foo Bar]");
        let collapsed = LinkProperties::reference(LabelType::Collapsed, "/u".into(), None, None);
        assert_eq!(collapsed.tail(), "][]");
        let shortcut = LinkProperties::reference(LabelType::Shortcut, "/u".into(), None, None);
        assert_eq!(shortcut.tail(), "]");
    }
}
