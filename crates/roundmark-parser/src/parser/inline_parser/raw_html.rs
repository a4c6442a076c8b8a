//! Raw HTML tag grammar, shared by inline raw HTML and HTML block start
//! condition 7.

use std::sync::LazyLock;

use regex::Regex;

const TAG_NAME: &str = "[A-Za-z][A-Za-z0-9-]*";
const ATTRIBUTE_NAME: &str = "[a-zA-Z_:][a-zA-Z0-9:._-]*";
const UNQUOTED_VALUE: &str = "[^\"'=<>`\\x00-\\x20]+";
const SINGLE_QUOTED_VALUE: &str = "'[^']*'";
const DOUBLE_QUOTED_VALUE: &str = "\"[^\"]*\"";
const SPACE: &str = "[ \\t\\n\\x0B\\x0C\\r]";

pub(crate) fn open_tag_pattern() -> String {
    let value =
        format!("(?:{UNQUOTED_VALUE}|{SINGLE_QUOTED_VALUE}|{DOUBLE_QUOTED_VALUE})");
    let value_spec = format!("(?:{SPACE}*={SPACE}*{value})");
    let attribute = format!("(?:{SPACE}+{ATTRIBUTE_NAME}{value_spec}?)");
    format!("<{TAG_NAME}{attribute}*{SPACE}*/?>")
}

pub(crate) fn close_tag_pattern() -> String {
    format!("</{TAG_NAME}{SPACE}*>")
}

static HTML_TAG: LazyLock<Regex> = LazyLock::new(|| {
    let comment = "<!-->|<!--->|<!--(?s:.*?)-->";
    let processing = "<\\?(?s:.*?)\\?>";
    let declaration = "<![A-Za-z]+[^>]*>";
    let cdata = "<!\\[CDATA\\[(?s:.*?)\\]\\]>";
    let pattern = format!(
        "^(?:{}|{}|{comment}|{processing}|{declaration}|{cdata})",
        open_tag_pattern(),
        close_tag_pattern()
    );
    Regex::new(&pattern).expect("raw HTML pattern is valid")
});

/// Length of the raw HTML construct starting at `text[0] == '<'`.
pub(crate) fn scan_raw_html(text: &str) -> Option<usize> {
    HTML_TAG.find(text).map(|m| m.end())
}
