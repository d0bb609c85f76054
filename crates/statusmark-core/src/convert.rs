use crate::diagnostic::Diagnostic;
use crate::parser::parse;
use crate::render::{RenderOptions, render_with_options};
use crate::sanitize::sanitize;
use crate::styled::StyledText;
use tracing::debug;
use url::Url;

/// Settings for [`StyledText::from_simple_html_with_options`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConvertOptions {
    /// Link to drop when it is the last thing in the post, typically because
    /// a preview card already shows it.
    pub trailing_url: Option<Url>,
    /// Delete text the server marked `invisible`.
    pub remove_invisible_spans: bool,
    pub base_url: Option<Url>,
    /// Run the markup through the allow-list sanitizer before parsing.
    pub sanitize: bool,
}

impl ConvertOptions {
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions {
            base_url: self.base_url.clone(),
        }
    }
}

pub struct ConvertResult {
    pub styled: StyledText,
    /// Repairs made while parsing the markup that was rendered, which is the
    /// sanitized markup when [`ConvertOptions::sanitize`] is set.
    pub diagnostics: Vec<Diagnostic>,
}

/// Parses and renders post markup, then applies the trailing-url and
/// invisible-span trimming requested in `options`, in that order.
pub fn convert(html: &str, options: &ConvertOptions) -> ConvertResult {
    let cleaned;
    let source = if options.sanitize {
        cleaned = sanitize(html);
        cleaned.as_str()
    } else {
        html
    };

    let parsed = parse(source);
    if !parsed.diagnostics.is_empty() {
        debug!(count = parsed.diagnostics.len(), "markup repaired while parsing");
    }
    let mut styled = render_with_options(&parsed.document, &options.render_options());

    if let Some(url) = &options.trailing_url {
        styled = styled.removing_trailing_url(url);
    }
    if options.remove_invisible_spans {
        styled = styled.removing_invisible_spans();
    }
    ConvertResult {
        styled,
        diagnostics: parsed.diagnostics,
    }
}

impl StyledText {
    pub fn from_simple_html(html: &str) -> StyledText {
        Self::from_simple_html_with_options(html, &ConvertOptions::default())
    }

    pub fn from_simple_html_with_options(html: &str, options: &ConvertOptions) -> StyledText {
        convert(html, options).styled
    }
}
