//! Transforms over already-rendered styled text. Each returns a new value and
//! leaves the receiver untouched.

use crate::span::Span;
use crate::styled::{AttributeKind, StyledText};
use tracing::debug;
use url::Url;

impl StyledText {
    /// Same text with every link attribute dropped. The linked characters
    /// stay in place, unstyled.
    pub fn removing_links(&self) -> StyledText {
        let attributes = self
            .attributes()
            .iter()
            .filter(|attribute| !matches!(attribute.kind, AttributeKind::Link(_)))
            .cloned()
            .collect();
        StyledText::from_parts(self.as_str().to_string(), attributes)
    }

    /// Removes a link to `url` when it is the very end of the text, together
    /// with the whitespace separating it from the preceding content. Returns
    /// an unchanged copy when the text does not end with such a link.
    pub fn removing_trailing_url(&self, url: &Url) -> StyledText {
        let len = self.len();
        let trailing = self
            .attributes()
            .iter()
            .filter_map(|attribute| match &attribute.kind {
                AttributeKind::Link(link) if attribute.span.end == len && link.url == *url => {
                    Some(attribute.span)
                }
                _ => None,
            })
            .min_by_key(|span| span.start);

        let mut result = self.clone();
        let Some(link_span) = trailing else {
            return result;
        };
        let start = self.as_str()[..link_span.start].trim_end().len();
        debug!(%url, start, end = len, "removing trailing url");
        result.delete(Span { start, end: len });
        result
    }

    /// Deletes the characters of every invisible range, last range first, so
    /// that the offsets of the ranges still to be removed stay valid.
    pub fn removing_invisible_spans(&self) -> StyledText {
        let mut result = self.clone();
        while let Some(span) = result
            .attributes()
            .iter()
            .filter(|attribute| attribute.kind == AttributeKind::Invisible)
            .map(|attribute| attribute.span)
            .max()
        {
            debug!(start = span.start, end = span.end, "removing invisible span");
            result.delete(span);
        }
        result
    }
}
