use crate::annotate::scan::{scan, TextSpan};

/// Deployment-selectable rule for deciding whether bold text names a place.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EmphasisPolicy {
    /// Only bracket markers inside the emphasis count.
    BracketMarkers,
    /// The emphasis is a place when it contains any of these names
    /// (case-sensitive substring match). The list is a flat set of
    /// interchangeable aliases, e.g. a local-script and a transliterated
    /// spelling of the same store.
    KeywordAllowlist(Vec<String>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntityDecision {
    /// The whole emphasized span names one place; the value is the link label.
    IsEntity(String),
    /// Bracket markers inside the span name places individually; literal
    /// spans in between stay highlighted text.
    Markers(Vec<TextSpan>),
    /// Ordinary highlighted text, left untouched.
    PlainHighlight,
}

impl EmphasisPolicy {
    /// Decide how one emphasized span should be rendered.
    ///
    /// Bracket markers are authoritative under either policy: a keyword hit
    /// inside a span that also carries markers resolves through the markers,
    /// so fine-grained links win over a single coarse one.
    pub fn classify(&self, text: &str) -> EntityDecision {
        let spans = scan(text);
        if spans.iter().any(|s| matches!(s, TextSpan::Entity(_))) {
            return EntityDecision::Markers(spans);
        }

        match self {
            EmphasisPolicy::BracketMarkers => EntityDecision::PlainHighlight,
            EmphasisPolicy::KeywordAllowlist(names) => {
                if names.iter().any(|name| text.contains(name.as_str())) {
                    EntityDecision::IsEntity(text.to_string())
                } else {
                    EntityDecision::PlainHighlight
                }
            }
        }
    }
}
