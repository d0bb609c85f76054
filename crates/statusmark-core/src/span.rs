/// Half-open byte range `[start, end)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Result<Self, SpanError> {
        if start <= end {
            Ok(Self { start, end })
        } else {
            Err(SpanError::Inverted { start, end })
        }
    }

    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    pub fn contains(&self, offset: usize) -> bool {
        self.start <= offset && offset < self.end
    }

    /// Maps this span through the deletion of `removed`, collapsing any part
    /// that falls inside it.
    pub(crate) fn after_deletion(self, removed: Span) -> Span {
        let map = |offset: usize| {
            if offset <= removed.start {
                offset
            } else if offset <= removed.end {
                removed.start
            } else {
                offset - removed.len()
            }
        };
        Span {
            start: map(self.start),
            end: map(self.end),
        }
    }
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, thiserror::Error)]
pub enum SpanError {
    #[error("span start {start} is after its end {end}")]
    Inverted { start: usize, end: usize },
}
