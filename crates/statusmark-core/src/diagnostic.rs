use crate::source_map::Range;
use crate::span::Span;

pub const W_UNCLOSED_TAG: &str = "W_UNCLOSED_TAG";
pub const W_STRAY_CLOSE_TAG: &str = "W_STRAY_CLOSE_TAG";
pub const W_MALFORMED_TAG: &str = "W_MALFORMED_TAG";
pub const W_ANCHOR_HREF: &str = "W_ANCHOR_HREF";

/// A repair the parser made while reading markup. Never fatal.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Diagnostic {
    pub span: Span,
    pub range: Range,
    pub severity: DiagnosticSeverity,
    pub code: &'static str,
    pub message: String,
}

impl Diagnostic {
    pub fn new(
        span: Span,
        range: Range,
        severity: DiagnosticSeverity,
        code: &'static str,
        message: impl Into<String>,
    ) -> Self {
        Self {
            span,
            range,
            severity,
            code,
            message: message.into(),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum DiagnosticSeverity {
    Warning,
}

impl DiagnosticSeverity {
    pub fn label(self) -> &'static str {
        match self {
            DiagnosticSeverity::Warning => "warning",
        }
    }
}
