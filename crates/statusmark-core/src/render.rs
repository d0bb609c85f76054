use crate::ast::{Document, Element, MarkupNode, Tag};
use crate::span::Span;
use crate::styled::{Attribute, AttributeKind, Emphasis, Link, StyledText};
use tracing::debug;
use url::Url;

#[derive(Clone, Debug, Default, PartialEq)]
pub struct RenderOptions {
    /// Base against which relative `href`s are resolved. Without one,
    /// anchors with relative targets render as plain text.
    pub base_url: Option<Url>,
}

/// Renders a parsed document into styled text with default options.
pub fn render(document: &Document) -> StyledText {
    render_with_options(document, &RenderOptions::default())
}

pub fn render_with_options(document: &Document, options: &RenderOptions) -> StyledText {
    let mut writer = StyledWriter::new(options);
    writer.render_nodes(&document.nodes);
    writer.finish()
}

struct StyledWriter<'a> {
    options: &'a RenderOptions,
    text: String,
    attributes: Vec<Attribute>,
    emphasis: Emphasis,
    // Paragraph breaks are written lazily so the last paragraph leaves none.
    pending_break: bool,
}

impl<'a> StyledWriter<'a> {
    fn new(options: &'a RenderOptions) -> Self {
        Self {
            options,
            text: String::new(),
            attributes: Vec::new(),
            emphasis: Emphasis::default(),
            pending_break: false,
        }
    }

    fn finish(self) -> StyledText {
        StyledText::from_parts(self.text, self.attributes)
    }

    fn render_nodes(&mut self, nodes: &[MarkupNode]) {
        for node in nodes {
            match node {
                MarkupNode::Text(text) => self.push_str(text),
                MarkupNode::Element(element) => self.render_element(element),
            }
        }
    }

    fn render_element(&mut self, element: &Element) {
        match element.tag {
            Tag::Paragraph => {
                let start = self.text.len();
                self.render_nodes(&element.children);
                if self.text.len() > start {
                    self.pending_break = true;
                }
            }
            Tag::LineBreak => {
                self.flush_break();
                let start = self.text.len();
                self.text.push('\n');
                self.push_attribute(start, AttributeKind::LineBreak);
            }
            Tag::Strong => self.render_emphasis(element, Emphasis::BOLD),
            Tag::Emphasis => self.render_emphasis(element, Emphasis::ITALIC),
            Tag::Anchor => self.render_anchor(element),
            Tag::Span if element.is_invisible() => {
                let start = self.write_content(|writer| writer.render_nodes(&element.children));
                self.push_attribute(start, AttributeKind::Invisible);
            }
            Tag::Span => self.render_nodes(&element.children),
        }
    }

    fn render_emphasis(&mut self, element: &Element, flag: Emphasis) {
        let outer = self.emphasis;
        self.emphasis = outer.union(flag);
        let start = self.write_content(|writer| writer.render_nodes(&element.children));
        let combined = self.emphasis;
        self.emphasis = outer;
        self.push_attribute(start, AttributeKind::Emphasis(combined));
    }

    fn render_anchor(&mut self, element: &Element) {
        let Some(href) = element.href() else {
            self.render_nodes(&element.children);
            return;
        };
        let Some(url) = self.resolve_href(href) else {
            debug!(href, "anchor target is not a url, rendering as text");
            self.render_nodes(&element.children);
            return;
        };
        let mut start = self.write_content(|writer| writer.render_nodes(&element.children));
        if start == self.text.len() {
            start = self.write_content(|writer| writer.push_str(href));
        }
        self.push_attribute(start, AttributeKind::Link(Link::new(url)));
    }

    fn resolve_href(&self, href: &str) -> Option<Url> {
        let href = href.trim();
        match Url::parse(href) {
            Ok(url) => Some(url),
            Err(url::ParseError::RelativeUrlWithoutBase) => {
                self.options.base_url.as_ref()?.join(href).ok()
            }
            Err(_) => None,
        }
    }

    fn push_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.flush_break();
        self.text.push_str(text);
    }

    fn flush_break(&mut self) {
        if !self.pending_break {
            return;
        }
        self.pending_break = false;
        let start = self.text.len();
        self.text.push('\n');
        self.push_attribute(start, AttributeKind::ParagraphBreak);
    }

    /// Runs `write` and returns where its output begins. A paragraph break
    /// still pending on entry is flushed by the first write and belongs to
    /// the enclosing content, so it is skipped.
    fn write_content(&mut self, write: impl FnOnce(&mut Self)) -> usize {
        let start = self.text.len();
        let break_pending = self.pending_break;
        write(self);
        if break_pending && self.text.len() > start {
            start + 1
        } else {
            start
        }
    }

    fn push_attribute(&mut self, start: usize, kind: AttributeKind) {
        let span = Span {
            start,
            end: self.text.len(),
        };
        if !span.is_empty() {
            self.attributes.push(Attribute { span, kind });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{RenderOptions, render, render_with_options};
    use crate::parser::parse;
    use crate::styled::AttributeKind;
    use url::Url;

    #[test]
    fn break_before_nested_emphasis_is_not_emphasized() {
        let styled = render(&parse("<p>a</p><b><i>x</i></b>").document);
        assert_eq!(styled.as_str(), "a\nx");
        for attribute in styled.attributes() {
            if let AttributeKind::Emphasis(_) = attribute.kind {
                assert_eq!(attribute.span.start, 2);
            }
        }
    }

    #[test]
    fn ranges_skip_only_the_break_flushed_on_entry() {
        let styled = render(&parse("<p>a</p><span class=\"invisible\">x<p>y</p>z</span>").document);
        assert_eq!(styled.as_str(), "a\nxy\nz");
        let invisible: Vec<_> = styled
            .attributes()
            .iter()
            .filter(|attribute| attribute.kind == AttributeKind::Invisible)
            .map(|attribute| (attribute.span.start, attribute.span.end))
            .collect();
        assert_eq!(invisible, vec![(2, 6)]);
        assert_eq!(styled.removing_invisible_spans().as_str(), "a\n");
    }

    #[test]
    fn empty_paragraph_requests_no_break() {
        let styled = render(&parse("a<b><p></p>x</b>").document);
        assert_eq!(styled.as_str(), "ax");
        assert_eq!(styled.attributes().len(), 1);
        assert_eq!(styled.attributes()[0].span.start, 1);
    }

    #[test]
    fn relative_hrefs_need_a_base() {
        let source = r#"<a href="/tags/rust">#rust</a>"#;
        let plain = render(&parse(source).document);
        assert_eq!(plain.links().count(), 0);

        let options = RenderOptions {
            base_url: Some(Url::parse("https://social.test/").expect("url")),
        };
        let linked = render_with_options(&parse(source).document, &options);
        let links: Vec<_> = linked
            .links()
            .map(|(text, link)| (text.to_string(), link.url.to_string()))
            .collect();
        assert_eq!(
            links,
            vec![("#rust".to_string(), "https://social.test/tags/rust".to_string())]
        );
    }
}
