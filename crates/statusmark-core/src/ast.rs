use crate::span::Span;

/// Root of a parsed post body.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    pub span: Span,
    pub nodes: Vec<MarkupNode>,
}

#[derive(Clone, Debug, PartialEq)]
pub enum MarkupNode {
    /// Literal text with entity references already decoded.
    Text(String),
    Element(Element),
}

#[derive(Clone, Debug, PartialEq)]
pub struct Element {
    pub span: Span,
    pub tag: Tag,
    pub attrs: AttrMap,
    pub children: Vec<MarkupNode>,
}

impl Element {
    pub fn new(span: Span, tag: Tag, attrs: AttrMap) -> Self {
        Self {
            span,
            tag,
            attrs,
            children: Vec::new(),
        }
    }

    /// Target of an anchor. Only `Tag::Anchor` elements are guaranteed to
    /// carry one.
    pub fn href(&self) -> Option<&str> {
        self.attrs.get("href")
    }

    pub fn has_class(&self, name: &str) -> bool {
        self.attrs
            .get("class")
            .is_some_and(|classes| classes.split_ascii_whitespace().any(|class| class == name))
    }

    pub fn is_invisible(&self) -> bool {
        self.tag == Tag::Span && self.has_class("invisible")
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Tag {
    Paragraph,
    LineBreak,
    Strong,
    Emphasis,
    Anchor,
    Span,
}

impl Tag {
    /// Maps a lowercase tag name to a supported tag.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "p" => Some(Tag::Paragraph),
            "br" => Some(Tag::LineBreak),
            "strong" | "b" => Some(Tag::Strong),
            "em" | "i" => Some(Tag::Emphasis),
            "a" => Some(Tag::Anchor),
            "span" => Some(Tag::Span),
            _ => None,
        }
    }
}

/// Element attributes in source order. Names are lowercase; the first
/// occurrence of a duplicated name wins.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AttrMap {
    items: Vec<AttrItem>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AttrItem {
    pub key: String,
    pub value: String,
}

impl AttrMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.items
            .iter()
            .find(|item| item.key == key)
            .map(|item| item.value.as_str())
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if self.get(&key).is_none() {
            self.items.push(AttrItem {
                key,
                value: value.into(),
            });
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        let index = self.items.iter().position(|item| item.key == key)?;
        Some(self.items.remove(index).value)
    }

    pub fn iter(&self) -> impl Iterator<Item = &AttrItem> {
        self.items.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
