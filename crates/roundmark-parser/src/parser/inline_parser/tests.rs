use crate::options::ParserOptions;
use crate::rehydrate::rehydrate;
use crate::tokens::{AutolinkKind, LabelType, MarkdownToken, TokenKind, render_tokens};
use crate::{Parser, ReferenceRegistry, init_logger};

fn parse(input: &str) -> Vec<MarkdownToken> {
    init_logger();
    Parser::new(ParserOptions::gfm()).parse(input)
}

fn parse_commonmark(input: &str) -> Vec<MarkdownToken> {
    init_logger();
    Parser::new(ParserOptions::commonmark()).parse(input)
}

/// Inline tokens of the first paragraph, without the paragraph tokens.
fn inlines(tokens: &[MarkdownToken]) -> Vec<MarkdownToken> {
    let start = tokens
        .iter()
        .position(|token| matches!(token.kind, TokenKind::Paragraph(_)))
        .expect("paragraph");
    tokens[start + 1..]
        .iter()
        .take_while(|token| !token.to_string().starts_with("[end-para"))
        .cloned()
        .collect()
}

fn summary(tokens: &[MarkdownToken]) -> String {
    render_tokens(&inlines(tokens))
}

fn roundtrips(input: &str) {
    let tokens = parse(input);
    similar_asserts::assert_eq!(rehydrate(&tokens).unwrap(), input);
}

#[test]
fn emphasis_tokens() {
    let tokens = parse("*foo*\n");
    insta::assert_snapshot!(render_tokens(&tokens), @r"
    [document(1,1):\n:true]
    [para(1,1):]
    [emphasis(1,1):1:*]
    [text(1,2):foo]
    [end-emphasis(1,1):1:*]
    [end-para(1,1):]
    [end-document(1,1):]
    ");
}

#[test]
fn strong_inside_emphasis() {
    let tokens = parse("***strong emph***\n");
    insta::assert_snapshot!(summary(&tokens), @r"
    [emphasis(1,1):1:*]
    [emphasis(1,2):2:*]
    [text(1,4):strong emph]
    [end-emphasis(1,2):2:*]
    [end-emphasis(1,1):1:*]
    ");
}

#[test]
fn leftover_delimiters_are_text() {
    let tokens = parse("**foo*\n");
    insta::assert_snapshot!(summary(&tokens), @r"
    [text(1,1):*]
    [emphasis(1,2):1:*]
    [text(1,3):foo]
    [end-emphasis(1,2):1:*]
    ");
}

#[test]
fn intraword_underscore_is_literal() {
    let tokens = parse("snake_case_name\n");
    insta::assert_snapshot!(summary(&tokens), @"[text(1,1):snake_case_name]");
}

#[test]
fn strikethrough_needs_matching_runs() {
    let tokens = parse("~~gone~~ ~one~ ~~~three~~~\n");
    let strikes: Vec<usize> = tokens
        .iter()
        .filter_map(|token| match token.kind {
            TokenKind::Strikethrough { count } => Some(count),
            _ => None,
        })
        .collect();
    assert_eq!(strikes, vec![2, 1]);
    roundtrips("~~gone~~ ~one~ ~~~three~~~\n");

    let tokens = parse_commonmark("~~gone~~\n");
    assert_eq!(summary(&tokens), "[text(1,1):~~gone~~]\n");
}

#[test]
fn inline_link_properties() {
    let tokens = parse("[foo *bar*]( </my uri> \"title\" )\n");
    let TokenKind::Link(link) = &inlines(&tokens)[0].kind else {
        panic!("expected link");
    };
    assert_eq!(link.text_from_blocks, "foo *bar*");
    let props = &link.properties;
    assert_eq!(props.label_type, LabelType::Inline);
    assert_eq!(props.uri, "/my uri");
    assert_eq!(props.raw_uri, "/my uri");
    assert!(props.uses_angle_brackets);
    assert_eq!(props.title.as_deref(), Some("title"));
    assert_eq!(props.before_uri_whitespace, " ");
    assert_eq!(props.after_uri_whitespace, " ");
    assert_eq!(props.after_title_whitespace, " ");
    roundtrips("[foo *bar*]( </my uri> \"title\" )\n");
}

#[test]
fn link_text_tokens_sit_between_link_tokens() {
    let tokens = parse("a [b `c`](/d) e\n");
    insta::assert_snapshot!(summary(&tokens), @r"
    [text(1,1):a ]
    [link(1,3):inline:/d::/d:::false::::b `c`]
    [text(1,4):b ]
    [icode-span(1,6):1:c]
    [end-link(1,3):]
    [text(1,14): e]
    ");
}

#[test]
fn reference_links() {
    let input = "[full][Bar] [collapsed][] [shortcut] [missing]\n\n[bar]: /b 'B'\n[collapsed]: /c\n[shortcut]: /s\n";
    let tokens = parse(input);
    let links: Vec<(LabelType, String)> = tokens
        .iter()
        .filter_map(|token| match &token.kind {
            TokenKind::Link(link) => {
                Some((link.properties.label_type, link.properties.uri.clone()))
            }
            _ => None,
        })
        .collect();
    assert_eq!(
        links,
        vec![
            (LabelType::Full, "/b".to_string()),
            (LabelType::Collapsed, "/c".to_string()),
            (LabelType::Shortcut, "/s".to_string()),
        ]
    );
    roundtrips(input);
}

#[test]
fn preloaded_references_resolve() {
    let mut registry = ReferenceRegistry::new();
    registry.add("Docs", "https://docs.example".into(), None);
    let tokens = Parser::new(ParserOptions::commonmark())
        .with_references(registry)
        .parse("See [docs].\n");
    let TokenKind::Link(link) = &inlines(&tokens)[1].kind else {
        panic!("expected link");
    };
    assert_eq!(link.properties.uri, "https://docs.example");
}

#[test]
fn links_do_not_nest() {
    let tokens = parse("[foo [bar](/inner)](/outer)\n");
    let uris: Vec<String> = tokens
        .iter()
        .filter_map(|token| match &token.kind {
            TokenKind::Link(link) => Some(link.properties.uri.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(uris, vec!["/inner"]);
}

#[test]
fn image_alt_is_plain_text() {
    let tokens = parse("![foo *bar* `baz`](/img.png \"T\")\n");
    let TokenKind::Image(image) = &inlines(&tokens)[0].kind else {
        panic!("expected image");
    };
    assert_eq!(image.alt, "foo bar baz");
    assert_eq!(image.text_from_blocks, "foo *bar* `baz`");
    assert_eq!(inlines(&tokens).len(), 1);
    roundtrips("![foo *bar* `baz`](/img.png \"T\")\n");
}

#[test]
fn link_inside_image() {
    let tokens = parse("![[inner](/a)](/img)\n");
    let TokenKind::Image(image) = &inlines(&tokens)[0].kind else {
        panic!("expected image");
    };
    assert_eq!(image.alt, "inner");
    assert_eq!(image.properties.uri, "/img");
}

#[test]
fn autolinks() {
    let tokens = parse("<https://example.com> <me@example.com>\n");
    let links: Vec<(AutolinkKind, String)> = tokens
        .iter()
        .filter_map(|token| match &token.kind {
            TokenKind::Autolink(link) => Some((link.kind, link.href.clone())),
            _ => None,
        })
        .collect();
    assert_eq!(
        links,
        vec![
            (AutolinkKind::Uri, "https://example.com".to_string()),
            (AutolinkKind::Email, "mailto:me@example.com".to_string()),
        ]
    );
}

#[test]
fn extended_autolinks_only_with_gfm() {
    let input = "Go to www.example.com/a, or mail bob@example.org.\n";
    let tokens = parse(input);
    insta::assert_snapshot!(summary(&tokens), @r"
    [text(1,1):Go to ]
    [uri-autolink(1,7):http://www.example.com/a:www.example.com/a]
    [text(1,24):, or mail ]
    [uri-autolink(1,34):mailto:bob@example.org:bob@example.org]
    [text(1,49):.]
    ");
    roundtrips(input);

    let tokens = parse_commonmark(input);
    assert_eq!(inlines(&tokens).len(), 1);
}

#[test]
fn no_extended_autolinks_inside_links() {
    let tokens = parse("[www.example.com](/x)\n");
    assert!(
        tokens
            .iter()
            .all(|token| !matches!(token.kind, TokenKind::Autolink(_)))
    );
}

#[test]
fn code_spans() {
    let tokens = parse("`` foo ` bar ``\n");
    let TokenKind::CodeSpan(span) = &inlines(&tokens)[0].kind else {
        panic!("expected code span");
    };
    assert_eq!(span.backticks, 2);
    assert_eq!(span.raw, " foo ` bar ");
    assert_eq!(span.content, "foo ` bar");
}

#[test]
fn unmatched_backticks_are_literal() {
    let tokens = parse("```foo``\n");
    assert_eq!(summary(&tokens), "[text(1,1):```foo``]\n");
}

#[test]
fn hard_and_soft_breaks() {
    let input = "foo  \nbar\\\nbaz \nqux\n";
    let tokens = parse(input);
    insta::assert_snapshot!(summary(&tokens), @r"
    [text(1,1):foo]
    [hard-break(1,4):  \n]
    [text(2,1):bar]
    [hard-break(2,4):\\n]
    [text(3,1):baz\nqux]
    ");
    roundtrips(input);
}

#[test]
fn escapes_and_entities() {
    let tokens = parse("\\*not emphasis\\* &copy; &#x41; &bogus;\n");
    let text: String = inlines(&tokens)
        .iter()
        .filter_map(|token| match &token.kind {
            TokenKind::Text(text) => Some(text.text.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(text, "*not emphasis* © A &bogus;");
    roundtrips("\\*not emphasis\\* &copy; &#x41; &bogus;\n");
}

#[test]
fn raw_html() {
    let tokens = parse("a <span class=\"x\">b</span> <!-- c -->\n");
    let html: Vec<String> = tokens
        .iter()
        .filter_map(|token| match &token.kind {
            TokenKind::RawHtml { raw } => Some(raw.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(html, vec!["<span class=\"x\">", "</span>", "<!-- c -->"]);
}

#[test]
fn task_marker_needs_a_list_item() {
    let tokens = parse("[ ] not a task\n");
    assert!(
        tokens
            .iter()
            .all(|token| !matches!(token.kind, TokenKind::TaskListMarker { .. }))
    );
    let tokens = parse("- [X]\tdone\n");
    assert!(
        tokens
            .iter()
            .any(|token| token.kind
                == TokenKind::TaskListMarker {
                    checked: true,
                    raw: "[X]".into()
                })
    );
}

#[test]
fn positions_follow_continuation_lines() {
    let tokens = parse("> one *two\n>   three* four\n");
    let text_positions: Vec<(usize, usize)> = tokens
        .iter()
        .filter(|token| matches!(token.kind, TokenKind::Text(_)))
        .map(|token| (token.line, token.column))
        .collect();
    assert_eq!(text_positions, vec![(1, 3), (1, 8), (2, 11)]);
}
