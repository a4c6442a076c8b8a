//! Examples taken from the CommonMark 0.31 and GFM specifications. Each one
//! must render to the reference HTML and rehydrate to its source.

use roundmark_parser::{Parser, ParserOptions, rehydrate};
use roundmark::to_html;
use similar_asserts::assert_eq;

struct Example {
    section: &'static str,
    markdown: &'static str,
    html: &'static str,
}

const COMMONMARK: &[Example] = &[
    Example {
        section: "Tabs",
        markdown: "\tfoo\tbaz\t\tbim\n",
        html: "<pre><code>foo\tbaz\t\tbim\n</code></pre>\n",
    },
    Example {
        section: "Precedence",
        markdown: "- `one\n- two`\n",
        html: "<ul>\n<li>`one</li>\n<li>two`</li>\n</ul>\n",
    },
    Example {
        section: "Thematic breaks",
        markdown: "***\n---\n___\n",
        html: "<hr />\n<hr />\n<hr />\n",
    },
    Example {
        section: "ATX headings",
        markdown: "# foo\n## foo\n### foo\n#### foo\n##### foo\n###### foo\n",
        html: "<h1>foo</h1>\n<h2>foo</h2>\n<h3>foo</h3>\n<h4>foo</h4>\n<h5>foo</h5>\n<h6>foo</h6>\n",
    },
    Example {
        section: "ATX headings",
        markdown: "#5 bolt\n\n#hashtag\n",
        html: "<p>#5 bolt</p>\n<p>#hashtag</p>\n",
    },
    Example {
        section: "Setext headings",
        markdown: "Foo *bar*\n=========\n\nFoo *bar*\n---------\n",
        html: "<h1>Foo <em>bar</em></h1>\n<h2>Foo <em>bar</em></h2>\n",
    },
    Example {
        section: "Fenced code blocks",
        markdown: "```\n<\n >\n```\n",
        html: "<pre><code>&lt;\n &gt;\n</code></pre>\n",
    },
    Example {
        section: "Fenced code blocks",
        markdown: "~~~~\naaa\n~~~\n~~~~\n",
        html: "<pre><code>aaa\n~~~\n</code></pre>\n",
    },
    Example {
        section: "Fenced code blocks",
        markdown: "```ruby\ndef foo(x)\n  return 3\nend\n```\n",
        html: "<pre><code class=\"language-ruby\">def foo(x)\n  return 3\nend\n</code></pre>\n",
    },
    Example {
        section: "HTML blocks",
        markdown: "<table><tr><td>\n<pre>\n**Hello**,\n\n_world_.\n</pre>\n</td></tr></table>\n",
        html: "<table><tr><td>\n<pre>\n**Hello**,\n<p><em>world</em>.\n</pre></p>\n</td></tr></table>\n",
    },
    Example {
        section: "Link reference definitions",
        markdown: "[foo]: /url \"title\"\n\n[foo]\n",
        html: "<p><a href=\"/url\" title=\"title\">foo</a></p>\n",
    },
    Example {
        section: "Paragraphs",
        markdown: "  aaa\n bbb\n",
        html: "<p>aaa\nbbb</p>\n",
    },
    Example {
        section: "Block quotes",
        markdown: "> # Foo\n> bar\n> baz\n",
        html: "<blockquote>\n<h1>Foo</h1>\n<p>bar\nbaz</p>\n</blockquote>\n",
    },
    Example {
        section: "Block quotes",
        markdown: "> bar\nbaz\n> foo\n",
        html: "<blockquote>\n<p>bar\nbaz\nfoo</p>\n</blockquote>\n",
    },
    Example {
        section: "List items",
        markdown: "1.  A paragraph\n    with two lines.\n\n        indented code\n\n    > A block quote.\n",
        html: "<ol>\n<li>\n<p>A paragraph\nwith two lines.</p>\n<pre><code>indented code\n</code></pre>\n<blockquote>\n<p>A block quote.</p>\n</blockquote>\n</li>\n</ol>\n",
    },
    Example {
        section: "List items",
        markdown: "- foo\n\n  bar\n",
        html: "<ul>\n<li>\n<p>foo</p>\n<p>bar</p>\n</li>\n</ul>\n",
    },
    Example {
        section: "List items",
        markdown: "123456789. ok\n",
        html: "<ol start=\"123456789\">\n<li>ok</li>\n</ol>\n",
    },
    Example {
        section: "Code spans",
        markdown: "`` foo ` bar ``\n",
        html: "<p><code>foo ` bar</code></p>\n",
    },
    Example {
        section: "Emphasis and strong emphasis",
        markdown: "a * foo bar*\n",
        html: "<p>a * foo bar*</p>\n",
    },
    Example {
        section: "Emphasis and strong emphasis",
        markdown: "*foo**bar**baz*\n",
        html: "<p><em>foo<strong>bar</strong>baz</em></p>\n",
    },
    Example {
        section: "Links",
        markdown: "[link](</my uri>)\n",
        html: "<p><a href=\"/my%20uri\">link</a></p>\n",
    },
    Example {
        section: "Links",
        markdown: "[link](foo\\)\\:)\n",
        html: "<p><a href=\"foo):\">link</a></p>\n",
    },
    Example {
        section: "Images",
        markdown: "![foo](/url \"title\")\n",
        html: "<p><img src=\"/url\" alt=\"foo\" title=\"title\" /></p>\n",
    },
    Example {
        section: "Autolinks",
        markdown: "<http://foo.bar.baz>\n",
        html: "<p><a href=\"http://foo.bar.baz\">http://foo.bar.baz</a></p>\n",
    },
    Example {
        section: "Autolinks",
        markdown: "<foo@bar.example.com>\n",
        html: "<p><a href=\"mailto:foo@bar.example.com\">foo@bar.example.com</a></p>\n",
    },
    Example {
        section: "Raw HTML",
        markdown: "<a><bab><c2c>\n",
        html: "<p><a><bab><c2c></p>\n",
    },
    Example {
        section: "Hard line breaks",
        markdown: "foo\\\nbar\n",
        html: "<p>foo<br />\nbar</p>\n",
    },
    Example {
        section: "Entity and numeric character references",
        markdown: "&nbsp; &amp; &copy;\n",
        html: "<p>\u{a0} &amp; ©</p>\n",
    },
    Example {
        section: "Backslash escapes",
        markdown: "\\*not emphasized*\n",
        html: "<p>*not emphasized*</p>\n",
    },
];

const GFM: &[Example] = &[
    Example {
        section: "Strikethrough",
        markdown: "~~Hi~~ Hello, ~there~ world!\n",
        html: "<p><del>Hi</del> Hello, <del>there</del> world!</p>\n",
    },
    Example {
        section: "Strikethrough",
        markdown: "This ~~has a\n\nnew paragraph~~.\n",
        html: "<p>This ~~has a</p>\n<p>new paragraph~~.</p>\n",
    },
    Example {
        section: "Autolinks (extension)",
        markdown: "www.commonmark.org\n",
        html: "<p><a href=\"http://www.commonmark.org\">www.commonmark.org</a></p>\n",
    },
    Example {
        section: "Autolinks (extension)",
        markdown: "foo@bar.baz\n",
        html: "<p><a href=\"mailto:foo@bar.baz\">foo@bar.baz</a></p>\n",
    },
    Example {
        section: "Task list items",
        markdown: "- [ ] foo\n- [x] bar\n",
        html: "<ul>\n<li><input disabled=\"\" type=\"checkbox\"> foo</li>\n<li><input checked=\"\" disabled=\"\" type=\"checkbox\"> bar</li>\n</ul>\n",
    },
    Example {
        section: "Disallowed Raw HTML",
        markdown: "<strong> <title> <style> <em>\n",
        html: "<p><strong> &lt;title> &lt;style> <em></p>\n",
    },
];

fn run(examples: &[Example], options: ParserOptions) {
    let parser = Parser::new(options);
    for example in examples {
        let tokens = parser.parse(example.markdown);
        assert_eq!(
            to_html(&tokens, options),
            example.html,
            "{}: {:?}",
            example.section,
            example.markdown
        );
        assert_eq!(
            rehydrate(&tokens).unwrap(),
            example.markdown,
            "{}: round trip",
            example.section
        );
    }
}

#[test]
fn commonmark_examples() {
    run(COMMONMARK, ParserOptions::commonmark());
}

#[test]
fn gfm_examples() {
    run(GFM, ParserOptions::gfm());
}

#[test]
fn commonmark_examples_unchanged_under_gfm() {
    // None of the CommonMark examples use text that the extensions claim.
    run(COMMONMARK, ParserOptions::gfm());
}
