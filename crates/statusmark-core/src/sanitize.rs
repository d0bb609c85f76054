use ammonia::Builder;
use std::collections::{HashMap, HashSet};

/// Cleans untrusted markup down to the tags the renderer understands.
///
/// Tags outside the allow-list are unwrapped (their text is kept), `script`
/// and `style` are removed with their content, and `href`s with unsafe
/// schemes are dropped, which later demotes their anchors to plain text.
pub fn sanitize(html: &str) -> String {
    let tags: HashSet<&'static str> = ["a", "b", "br", "em", "i", "p", "span", "strong"]
        .iter()
        .copied()
        .collect();

    let mut tag_attributes = HashMap::new();
    tag_attributes.insert("a", ["href"].iter().copied().collect());
    tag_attributes.insert("span", ["class"].iter().copied().collect());

    Builder::new()
        .tags(tags)
        .generic_attributes(HashSet::new())
        .tag_attributes(tag_attributes)
        .link_rel(None)
        .clean(html)
        .to_string()
}
