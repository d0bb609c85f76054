use crate::span::Span;
use std::cmp::Reverse;
use url::Url;

/// Characters plus attribute ranges over them.
///
/// Attribute spans are byte ranges into the text. They are never empty, never
/// leave the text and always sit on `char` boundaries. Ranges may nest or
/// overlap (an emphasis inside a link, for instance).
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct StyledText {
    text: String,
    attributes: Vec<Attribute>,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Attribute {
    pub span: Span,
    pub kind: AttributeKind,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "type", rename_all = "camelCase")
)]
pub enum AttributeKind {
    Emphasis(Emphasis),
    Link(Link),
    /// Text kept for plain-text fallback that should not be shown.
    Invisible,
    /// The newline separating a paragraph from what follows it.
    ParagraphBreak,
    /// The newline produced by `<br>`.
    LineBreak,
}

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Emphasis {
    pub bold: bool,
    pub italic: bool,
}

impl Emphasis {
    pub const BOLD: Emphasis = Emphasis {
        bold: true,
        italic: false,
    };
    pub const ITALIC: Emphasis = Emphasis {
        bold: false,
        italic: true,
    };

    pub fn union(self, other: Emphasis) -> Emphasis {
        Emphasis {
            bold: self.bold || other.bold,
            italic: self.italic || other.italic,
        }
    }

    pub fn is_plain(self) -> bool {
        !self.bold && !self.italic
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(rename_all = "camelCase")
)]
pub struct Link {
    pub url: Url,
    /// Styled as a link but not meant to be opened (non-web schemes).
    pub display_only: bool,
}

impl Link {
    pub fn new(url: Url) -> Self {
        let display_only = !matches!(url.scheme(), "http" | "https");
        Self { url, display_only }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum StyledTextError {
    #[error("attribute {index} spans {start}..{end}, past the end of {len}-byte text")]
    OutOfBounds {
        index: usize,
        start: usize,
        end: usize,
        len: usize,
    },
    #[error("attribute {index} has an inverted or empty span {start}..{end}")]
    Empty {
        index: usize,
        start: usize,
        end: usize,
    },
    #[error("attribute {index} splits a character at byte {offset}")]
    NotCharBoundary { index: usize, offset: usize },
}

impl StyledText {
    /// Builds styled text from parts, checking every attribute span.
    pub fn new(
        text: impl Into<String>,
        attributes: Vec<Attribute>,
    ) -> Result<Self, StyledTextError> {
        let text = text.into();
        for (index, attribute) in attributes.iter().enumerate() {
            let Span { start, end } = attribute.span;
            if start >= end {
                return Err(StyledTextError::Empty { index, start, end });
            }
            if end > text.len() {
                return Err(StyledTextError::OutOfBounds {
                    index,
                    start,
                    end,
                    len: text.len(),
                });
            }
            if let Some(offset) = [start, end]
                .into_iter()
                .find(|offset| !text.is_char_boundary(*offset))
            {
                return Err(StyledTextError::NotCharBoundary { index, offset });
            }
        }
        Ok(Self::from_parts(text, attributes))
    }

    /// Plain text without attributes.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            attributes: Vec::new(),
        }
    }

    pub(crate) fn from_parts(text: String, mut attributes: Vec<Attribute>) -> Self {
        attributes.retain(|attribute| !attribute.span.is_empty());
        attributes.sort_by_key(|attribute| (attribute.span.start, Reverse(attribute.span.end)));
        Self { text, attributes }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn into_string(self) -> String {
        self.text
    }

    /// Length in bytes.
    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// Text covered by `span`, or `None` if it is out of range.
    pub fn slice(&self, span: Span) -> Option<&str> {
        self.text.get(span.start..span.end)
    }

    /// Every link with the text it covers.
    pub fn links(&self) -> impl Iterator<Item = (&str, &Link)> {
        self.attributes
            .iter()
            .filter_map(|attribute| match &attribute.kind {
                AttributeKind::Link(link) => {
                    Some((&self.text[attribute.span.start..attribute.span.end], link))
                }
                _ => None,
            })
    }

    /// Combined emphasis of all ranges covering the byte at `offset`.
    pub fn emphasis_at(&self, offset: usize) -> Emphasis {
        self.attributes
            .iter()
            .filter(|attribute| attribute.span.contains(offset))
            .filter_map(|attribute| match attribute.kind {
                AttributeKind::Emphasis(emphasis) => Some(emphasis),
                _ => None,
            })
            .fold(Emphasis::default(), Emphasis::union)
    }

    pub fn is_invisible_at(&self, offset: usize) -> bool {
        self.attributes.iter().any(|attribute| {
            attribute.kind == AttributeKind::Invisible && attribute.span.contains(offset)
        })
    }

    /// Deletes the characters in `removed` and remaps every attribute through
    /// the deletion, dropping those that collapse.
    pub(crate) fn delete(&mut self, removed: Span) {
        if removed.is_empty() {
            return;
        }
        self.text.replace_range(removed.start..removed.end, "");
        for attribute in &mut self.attributes {
            attribute.span = attribute.span.after_deletion(removed);
        }
        let attributes = std::mem::take(&mut self.attributes);
        *self = Self::from_parts(std::mem::take(&mut self.text), attributes);
    }
}
