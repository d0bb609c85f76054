use statusmark_core::{
    Attribute, AttributeKind, ConvertOptions, Emphasis, Span, StyledText, Url,
};

fn url(value: &str) -> Url {
    Url::parse(value).expect("test url")
}

fn trailing(value: &str) -> ConvertOptions {
    ConvertOptions {
        trailing_url: Some(url(value)),
        ..Default::default()
    }
}

#[test]
fn trailing_link_paragraph_is_removed() {
    let html = r#"<p>Hello <b>world</b></p><p><a href="https://x.test/1">https://x.test/1</a></p>"#;

    let full = StyledText::from_simple_html(html);
    assert_eq!(full.as_str(), "Hello world\nhttps://x.test/1");

    let trimmed = StyledText::from_simple_html_with_options(html, &trailing("https://x.test/1"));
    assert_eq!(trimmed.as_str(), "Hello world");
    assert_eq!(
        trimmed.attributes(),
        &[Attribute {
            span: Span { start: 6, end: 11 },
            kind: AttributeKind::Emphasis(Emphasis::BOLD),
        }]
    );
    assert_eq!(trimmed.links().count(), 0);
}

#[test]
fn other_trailing_url_is_a_no_op() {
    let html = r#"<p>Hello</p><p><a href="https://x.test/1">https://x.test/1</a></p>"#;
    let full = StyledText::from_simple_html(html);
    let trimmed = StyledText::from_simple_html_with_options(html, &trailing("https://x.test/2"));
    assert_eq!(trimmed, full);
}

#[test]
fn link_that_is_not_last_is_kept() {
    let html = r#"<p><a href="https://x.test/1">link</a> then text</p>"#;
    let trimmed = StyledText::from_simple_html_with_options(html, &trailing("https://x.test/1"));
    assert_eq!(trimmed.as_str(), "link then text");
    assert_eq!(trimmed.links().count(), 1);
}

#[test]
fn invisible_spans_are_deleted() {
    let html = r#"Check <span class="invisible">this out</span> now"#;
    let options = ConvertOptions {
        remove_invisible_spans: true,
        ..Default::default()
    };
    let full = StyledText::from_simple_html(html);
    let visible = StyledText::from_simple_html_with_options(html, &options);
    assert_eq!(visible.as_str(), "Check  now");
    assert_eq!(full.char_count() - visible.char_count(), 8);
    assert!(visible.attributes().is_empty());
}

#[test]
fn unclosed_markup_still_renders() {
    let styled = StyledText::from_simple_html("<p>Unclosed <b>bold");
    assert_eq!(styled.as_str(), "Unclosed bold");
    assert_eq!(
        styled.attributes(),
        &[Attribute {
            span: Span { start: 9, end: 13 },
            kind: AttributeKind::Emphasis(Emphasis::BOLD),
        }]
    );
}

#[test]
fn both_passes_compose_on_a_real_post() {
    let html = concat!(
        r#"<p>New blog post about parsers!</p>"#,
        r#"<p>Read it here: <a href="https://blog.test/posts/2024/parsers" rel="nofollow noopener noreferrer" target="_blank">"#,
        r#"<span class="invisible">https://</span><span class="ellipsis">blog.test/posts/2024/</span>"#,
        r#"<span class="invisible">parsers</span></a></p>"#
    );
    let options = ConvertOptions {
        trailing_url: Some(url("https://blog.test/posts/2024/parsers")),
        remove_invisible_spans: true,
        ..Default::default()
    };
    let styled = StyledText::from_simple_html_with_options(html, &options);
    assert_eq!(styled.as_str(), "New blog post about parsers!\nRead it here:");
    assert_eq!(
        styled.attributes(),
        &[Attribute {
            span: Span { start: 28, end: 29 },
            kind: AttributeKind::ParagraphBreak,
        }]
    );
}

#[test]
fn invisible_prefix_in_kept_link_is_removed() {
    let html = concat!(
        r#"<p>Docs at <a href="https://docs.test/guide"><span class="invisible">https://</span>"#,
        r#"<span class="">docs.test/guide</span><span class="invisible"></span></a> are great</p>"#
    );
    let options = ConvertOptions {
        trailing_url: Some(url("https://docs.test/guide")),
        remove_invisible_spans: true,
        ..Default::default()
    };
    let styled = StyledText::from_simple_html_with_options(html, &options);
    assert_eq!(styled.as_str(), "Docs at docs.test/guide are great");
    let links: Vec<(&str, &str)> = styled
        .links()
        .map(|(text, link)| (text, link.url.as_str()))
        .collect();
    assert_eq!(links, vec![("docs.test/guide", "https://docs.test/guide")]);
}

#[test]
fn removing_links_after_conversion_keeps_the_text() {
    let html = r#"<p>Hi <a href="https://social.test/@ana"><b>@ana</b></a></p>"#;
    let styled = StyledText::from_simple_html(html);
    let unlinked = styled.removing_links();
    assert_eq!(unlinked.as_str(), styled.as_str());
    assert_eq!(unlinked.links().count(), 0);
    assert_eq!(unlinked.emphasis_at(3), Emphasis::BOLD);
    assert_eq!(unlinked.removing_links(), unlinked);
}

#[test]
fn relative_links_resolve_against_base_url() {
    let options = ConvertOptions {
        base_url: Some(url("https://social.test/")),
        ..Default::default()
    };
    let styled =
        StyledText::from_simple_html_with_options(r#"<a href="/tags/rust">#rust</a>"#, &options);
    let targets: Vec<String> = styled
        .links()
        .map(|(_, link)| link.url.to_string())
        .collect();
    assert_eq!(targets, vec!["https://social.test/tags/rust".to_string()]);
}

#[test]
fn anchor_without_href_is_kept_when_removing_invisible_text() {
    let options = ConvertOptions {
        remove_invisible_spans: true,
        ..Default::default()
    };
    let styled =
        StyledText::from_simple_html_with_options(r#"see <a class="invisible">this</a>"#, &options);
    assert_eq!(styled.as_str(), "see this");
    assert!(styled.attributes().is_empty());
}
