use crate::ast::{AttrMap, Document, Element, MarkupNode, Tag};
use crate::diagnostic::{
    Diagnostic, DiagnosticSeverity, W_ANCHOR_HREF, W_MALFORMED_TAG, W_STRAY_CLOSE_TAG,
    W_UNCLOSED_TAG,
};
use crate::entities::decode_entities;
use crate::source_map::SourceMap;
use crate::span::Span;
use tracing::debug;

pub struct ParseResult {
    pub document: Document,
    pub diagnostics: Vec<Diagnostic>,
    pub source_map: SourceMap,
}

/// Parses post markup into a node tree. Never fails: anything that cannot be
/// read as a tag is kept as text, and unbalanced tags are repaired.
pub fn parse(source: &str) -> ParseResult {
    let mut parser = Parser::new(source);
    parser.run();
    let nodes = parser.finish();
    ParseResult {
        document: Document {
            span: Span {
                start: 0,
                end: source.len(),
            },
            nodes,
        },
        diagnostics: parser.diagnostics,
        source_map: parser.source_map,
    }
}

const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const RAW_TEXT_ELEMENTS: &[&str] = &["script", "style"];

struct Parser<'a> {
    source: &'a str,
    pos: usize,
    root: Vec<MarkupNode>,
    stack: Vec<OpenElement>,
    diagnostics: Vec<Diagnostic>,
    source_map: SourceMap,
}

struct OpenElement {
    name: String,
    // None for tags that get unwrapped when closed.
    tag: Option<Tag>,
    attrs: AttrMap,
    open_span: Span,
    children: Vec<MarkupNode>,
}

#[derive(Debug, PartialEq)]
struct RawTag {
    name: String,
    closing: bool,
    self_closing: bool,
    attrs: AttrMap,
    len: usize,
}

impl<'a> Parser<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            pos: 0,
            root: Vec::new(),
            stack: Vec::new(),
            diagnostics: Vec::new(),
            source_map: SourceMap::new(source),
        }
    }

    fn run(&mut self) {
        let source = self.source;
        while self.pos < source.len() {
            let rest = &source[self.pos..];
            match rest.find('<') {
                None => {
                    self.push_text(rest);
                    self.pos = source.len();
                }
                Some(0) => self.parse_markup(),
                Some(idx) => {
                    self.push_text(&rest[..idx]);
                    self.pos += idx;
                }
            }
        }
    }

    fn parse_markup(&mut self) {
        let source = self.source;
        let rest = &source[self.pos..];
        if let Some(body) = rest.strip_prefix("<!--") {
            match body.find("-->") {
                Some(end) => self.pos += 4 + end + 3,
                None => {
                    let span = Span {
                        start: self.pos,
                        end: self.pos + 4,
                    };
                    self.push_diag(span, W_MALFORMED_TAG, "unterminated comment kept as text");
                    self.push_literal_lt();
                }
            }
            return;
        }
        if rest.starts_with("<!") || rest.starts_with("<?") {
            match rest.find('>') {
                Some(end) => self.pos += end + 1,
                None => self.push_literal_lt(),
            }
            return;
        }
        match scan_tag(rest) {
            Some(raw) if raw.closing => self.handle_close(raw),
            Some(raw) => self.handle_open(raw),
            None => {
                let looks_like_tag = rest[1..]
                    .bytes()
                    .next()
                    .is_some_and(|b| b.is_ascii_alphabetic() || b == b'/');
                if looks_like_tag {
                    let span = Span {
                        start: self.pos,
                        end: self.pos + 1,
                    };
                    self.push_diag(span, W_MALFORMED_TAG, "unreadable tag kept as text");
                }
                self.push_literal_lt();
            }
        }
    }

    fn push_literal_lt(&mut self) {
        self.push_text("<");
        self.pos += 1;
    }

    fn handle_open(&mut self, raw: RawTag) {
        let span = Span {
            start: self.pos,
            end: self.pos + raw.len,
        };
        self.pos = span.end;

        if RAW_TEXT_ELEMENTS.contains(&raw.name.as_str()) {
            if !raw.self_closing {
                self.skip_raw_text(&raw.name);
            }
            return;
        }

        match Tag::from_name(&raw.name) {
            Some(Tag::LineBreak) => {
                self.push_node(MarkupNode::Element(Element::new(
                    span,
                    Tag::LineBreak,
                    raw.attrs,
                )));
            }
            Some(tag) => {
                if raw.self_closing {
                    return;
                }
                if matches!(tag, Tag::Paragraph | Tag::Anchor) {
                    // Paragraphs and anchors never nest; a new one closes the open one.
                    if let Some(index) = self.stack.iter().rposition(|open| open.tag == Some(tag)) {
                        self.close_to(index, span.start);
                    }
                }
                self.stack.push(OpenElement {
                    name: raw.name,
                    tag: Some(tag),
                    attrs: raw.attrs,
                    open_span: span,
                    children: Vec::new(),
                });
            }
            None => {
                if raw.self_closing || VOID_ELEMENTS.contains(&raw.name.as_str()) {
                    return;
                }
                self.stack.push(OpenElement {
                    name: raw.name,
                    tag: None,
                    attrs: raw.attrs,
                    open_span: span,
                    children: Vec::new(),
                });
            }
        }
    }

    fn handle_close(&mut self, raw: RawTag) {
        let span = Span {
            start: self.pos,
            end: self.pos + raw.len,
        };
        self.pos = span.end;

        if raw.name == "br" {
            // `</br>` is read as a line break, as browsers do.
            self.push_node(MarkupNode::Element(Element::new(
                span,
                Tag::LineBreak,
                AttrMap::new(),
            )));
            return;
        }
        match self.stack.iter().rposition(|open| open.name == raw.name) {
            Some(index) => self.close_to(index, span.end),
            None => {
                let message = format!("closing tag </{}> has no open element", raw.name);
                self.push_diag(span, W_STRAY_CLOSE_TAG, &message);
            }
        }
    }

    /// Closes the open element at `index`, implicitly closing everything
    /// opened after it.
    fn close_to(&mut self, index: usize, end: usize) {
        while self.stack.len() > index + 1 {
            if let Some(open) = self.stack.pop() {
                let message = format!("<{}> closed implicitly", open.name);
                self.push_diag(open.open_span, W_UNCLOSED_TAG, &message);
                self.close_element(open, end);
            }
        }
        if let Some(open) = self.stack.pop() {
            self.close_element(open, end);
        }
    }

    fn close_element(&mut self, open: OpenElement, end: usize) {
        let Some(mut tag) = open.tag else {
            for child in open.children {
                self.push_node(child);
            }
            return;
        };
        let mut attrs = open.attrs;
        if tag == Tag::Anchor && attrs.get("href").is_none_or(|href| href.trim().is_empty()) {
            self.push_diag(
                open.open_span,
                W_ANCHOR_HREF,
                "anchor without href rendered as plain text",
            );
            // The demoted span carries no classes, so it is never invisible.
            attrs.remove("href");
            attrs.remove("class");
            tag = Tag::Span;
        }
        let mut element = Element::new(
            Span {
                start: open.open_span.start,
                end,
            },
            tag,
            attrs,
        );
        element.children = open.children;
        self.push_node(MarkupNode::Element(element));
    }

    fn skip_raw_text(&mut self, name: &str) {
        let source = self.source;
        let rest = &source[self.pos..];
        let needle = format!("</{}", name);
        let lowered = rest.to_ascii_lowercase();
        self.pos += match lowered.find(&needle) {
            Some(start) => match rest[start..].find('>') {
                Some(close) => start + close + 1,
                None => rest.len(),
            },
            None => rest.len(),
        };
    }

    fn push_text(&mut self, raw: &str) {
        if raw.is_empty() {
            return;
        }
        let text = decode_entities(raw);
        self.push_node(MarkupNode::Text(text));
    }

    fn push_node(&mut self, node: MarkupNode) {
        let siblings = match self.stack.last_mut() {
            Some(open) => &mut open.children,
            None => &mut self.root,
        };
        if let MarkupNode::Text(text) = &node {
            if let Some(MarkupNode::Text(previous)) = siblings.last_mut() {
                previous.push_str(text);
                return;
            }
        }
        siblings.push(node);
    }

    fn finish(&mut self) -> Vec<MarkupNode> {
        let end = self.source.len();
        while let Some(open) = self.stack.pop() {
            let message = format!("<{}> is never closed", open.name);
            self.push_diag(open.open_span, W_UNCLOSED_TAG, &message);
            self.close_element(open, end);
        }
        std::mem::take(&mut self.root)
    }

    fn push_diag(&mut self, span: Span, code: &'static str, message: &str) {
        debug!(code, start = span.start, end = span.end, "{}", message);
        let range = self.source_map.range(span);
        self.diagnostics.push(Diagnostic::new(
            span,
            range,
            DiagnosticSeverity::Warning,
            code,
            message,
        ));
    }
}

/// Reads one tag at the start of `text`. Returns `None` when the text cannot
/// be read as a complete tag.
fn scan_tag(text: &str) -> Option<RawTag> {
    let bytes = text.as_bytes();
    if bytes.first() != Some(&b'<') {
        return None;
    }
    let mut i = 1;
    let closing = bytes.get(i) == Some(&b'/');
    if closing {
        i += 1;
    }
    if !bytes.get(i)?.is_ascii_alphabetic() {
        return None;
    }
    let name_start = i;
    while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || matches!(bytes[i], b'-' | b':'))
    {
        i += 1;
    }
    let name = text[name_start..i].to_ascii_lowercase();
    match bytes.get(i) {
        Some(b) if b.is_ascii_whitespace() || *b == b'>' || *b == b'/' => {}
        _ => return None,
    }

    if closing {
        // Attributes on end tags are ignored.
        let end = text[i..].find('>')?;
        return Some(RawTag {
            name,
            closing,
            self_closing: false,
            attrs: AttrMap::new(),
            len: i + end + 1,
        });
    }

    let mut attrs = AttrMap::new();
    loop {
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        match bytes.get(i)? {
            b'>' => {
                return Some(RawTag {
                    name,
                    closing,
                    self_closing: false,
                    attrs,
                    len: i + 1,
                });
            }
            b'/' => {
                if bytes.get(i + 1) == Some(&b'>') {
                    return Some(RawTag {
                        name,
                        closing,
                        self_closing: true,
                        attrs,
                        len: i + 2,
                    });
                }
                i += 1;
                continue;
            }
            b'=' | b'<' => return None,
            _ => {}
        }

        let attr_start = i;
        while i < bytes.len() && !is_attr_name_end(bytes[i]) {
            if bytes[i] == b'<' {
                return None;
            }
            i += 1;
        }
        let key = text[attr_start..i].to_ascii_lowercase();

        let mut ws = i;
        while ws < bytes.len() && bytes[ws].is_ascii_whitespace() {
            ws += 1;
        }
        if bytes.get(ws) != Some(&b'=') {
            attrs.insert(key, "");
            continue;
        }
        i = ws + 1;
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        let value = match bytes.get(i)? {
            quote @ (b'"' | b'\'') => {
                let value_start = i + 1;
                let close = text[value_start..].find(*quote as char)?;
                i = value_start + close + 1;
                &text[value_start..value_start + close]
            }
            _ => {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() && bytes[i] != b'>' {
                    if bytes[i] == b'<' {
                        return None;
                    }
                    i += 1;
                }
                &text[value_start..i]
            }
        };
        attrs.insert(key, decode_entities(value));
    }
}

fn is_attr_name_end(byte: u8) -> bool {
    byte.is_ascii_whitespace() || matches!(byte, b'/' | b'>' | b'=')
}

#[cfg(test)]
mod tests {
    use super::{RawTag, scan_tag};
    use crate::ast::AttrMap;

    #[test]
    fn scans_attributes_in_every_quoting_style() {
        let raw = scan_tag(r#"<a href="https://x.test/?a=1&amp;b=2" class='u-url mention' rel=nofollow hidden>"#)
            .expect("tag");
        assert_eq!(raw.name, "a");
        assert!(!raw.closing);
        assert_eq!(raw.attrs.get("href"), Some("https://x.test/?a=1&b=2"));
        assert_eq!(raw.attrs.get("class"), Some("u-url mention"));
        assert_eq!(raw.attrs.get("rel"), Some("nofollow"));
        assert_eq!(raw.attrs.get("hidden"), Some(""));
    }

    #[test]
    fn scans_void_and_closing_tags() {
        assert_eq!(
            scan_tag("<BR/>tail"),
            Some(RawTag {
                name: "br".to_string(),
                closing: false,
                self_closing: true,
                attrs: AttrMap::new(),
                len: 5,
            })
        );
        let close = scan_tag("</P >").expect("closing tag");
        assert!(close.closing);
        assert_eq!(close.name, "p");
        assert_eq!(close.len, 5);
    }

    #[test]
    fn rejects_text_that_only_looks_like_a_tag() {
        assert_eq!(scan_tag("< b>"), None);
        assert_eq!(scan_tag("<3 you"), None);
        assert_eq!(scan_tag("<b"), None);
        assert_eq!(scan_tag("<a href=\"open"), None);
        assert_eq!(scan_tag("<b <i>"), None);
        assert_eq!(scan_tag("<b!>"), None);
    }
}
