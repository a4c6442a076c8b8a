//! Parser options.

/// The Markdown dialect to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
pub enum Flavor {
    /// CommonMark 0.31 with no extensions.
    #[default]
    #[cfg_attr(feature = "serde", serde(rename = "commonmark", alias = "common-mark"))]
    CommonMark,
    /// GitHub Flavored Markdown.
    Gfm,
}

/// GFM extensions, fixed when the parser is constructed.
///
/// Tab width is not an option: tabs always expand to the next multiple of
/// four columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ParserOptions {
    /// `~text~` and `~~text~~`
    pub strikethrough: bool,
    /// `www.example.com`, `https://example.com` and bare emails in text
    pub extended_autolinks: bool,
    /// `- [ ]` and `- [x]`
    pub task_list_items: bool,
    /// Escape the GFM set of disallowed raw HTML tags when rendering
    pub disallowed_raw_html: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self::for_flavor(Flavor::default())
    }
}

impl ParserOptions {
    pub fn for_flavor(flavor: Flavor) -> Self {
        match flavor {
            Flavor::CommonMark => Self::commonmark(),
            Flavor::Gfm => Self::gfm(),
        }
    }

    pub fn commonmark() -> Self {
        Self {
            strikethrough: false,
            extended_autolinks: false,
            task_list_items: false,
            disallowed_raw_html: false,
        }
    }

    pub fn gfm() -> Self {
        Self {
            strikethrough: true,
            extended_autolinks: true,
            task_list_items: true,
            disallowed_raw_html: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_plain_commonmark() {
        let options = ParserOptions::default();
        assert_eq!(options, ParserOptions::commonmark());
        assert!(!options.strikethrough);
    }

    #[test]
    fn gfm_enables_every_extension() {
        let options = ParserOptions::for_flavor(Flavor::Gfm);
        assert!(options.strikethrough);
        assert!(options.extended_autolinks);
        assert!(options.task_list_items);
        assert!(options.disallowed_raw_html);
    }
}
