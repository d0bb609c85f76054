mod ast;
mod convert;
mod diagnostic;
mod entities;
mod parser;
mod render;
mod sanitize;
mod security_access;
mod source_map;
mod span;
mod styled;
mod transform;

pub use ast::{AttrItem, AttrMap, Document, Element, MarkupNode, Tag};
pub use convert::{ConvertOptions, ConvertResult, convert};
pub use diagnostic::{
    Diagnostic, DiagnosticSeverity, W_ANCHOR_HREF, W_MALFORMED_TAG, W_STRAY_CLOSE_TAG,
    W_UNCLOSED_TAG,
};
pub use parser::{ParseResult, parse};
pub use render::{RenderOptions, render, render_with_options};
pub use sanitize::sanitize;
pub use security_access::{SecurityAccess, SecurityAccessSource};
pub use source_map::{Position, Range, SourceMap};
pub use span::{Span, SpanError};
pub use styled::{Attribute, AttributeKind, Emphasis, Link, StyledText, StyledTextError};
pub use url::Url;
