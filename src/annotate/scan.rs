use tracing::trace;

/// One piece of a scanned text leaf.
///
/// `Entity` holds the interior of a `[...]` marker verbatim; `Literal` holds
/// everything between markers, including brackets that never found a partner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TextSpan {
    Literal(String),
    Entity(String),
}

/// Split a string into literal text and bracket-marked place names.
///
/// Matches are shortest, left to right and non-overlapping. An unmatched `[`
/// is ordinary text, never an error. Re-wrapping every `Entity` in brackets
/// and concatenating the spans reproduces the input exactly.
pub fn scan(text: &str) -> Vec<TextSpan> {
    let mut spans = Vec::new();
    let mut rest = text;

    loop {
        let Some(open) = rest.find('[') else {
            break;
        };
        let Some(close) = rest[open + 1..].find(']') else {
            break;
        };
        let close = open + 1 + close;

        if open > 0 {
            spans.push(TextSpan::Literal(rest[..open].to_string()));
        }
        spans.push(TextSpan::Entity(rest[open + 1..close].to_string()));
        rest = &rest[close + 1..];
    }

    if !rest.is_empty() {
        spans.push(TextSpan::Literal(rest.to_string()));
    }

    trace!(input = ?text, count = spans.len(), "Scanned marker spans");
    spans
}
