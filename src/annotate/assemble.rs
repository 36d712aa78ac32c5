use crate::annotate::blocks::{AnnotatedNode, Block};
use crate::annotate::classify::{EmphasisPolicy, EntityDecision};
use crate::annotate::links::{build_map_link, LinkContext, LinkStyle};
use crate::annotate::scan::{scan, TextSpan};

/// Walk a parsed document and resolve every text leaf into plain runs and
/// map links.
///
/// Plain leaves outside emphasis always get the city-qualified link form so
/// generic chain names land in the right city; emphasis-derived links use
/// the configured `style`. Containers keep their shape, and every `Block`
/// kind has a defined handling, so nothing the model wrote is lost.
pub fn annotate(
    blocks: &[Block],
    ctx: &LinkContext,
    policy: &EmphasisPolicy,
    style: LinkStyle,
) -> Vec<AnnotatedNode> {
    let mut nodes = Vec::with_capacity(blocks.len());
    for block in blocks {
        match block {
            Block::Heading { level, children } => nodes.push(AnnotatedNode::Heading {
                level: *level,
                children: annotate(children, ctx, policy, style),
            }),
            Block::Paragraph(children) => nodes.push(AnnotatedNode::Paragraph {
                children: annotate(children, ctx, policy, style),
            }),
            Block::List(items) => nodes.push(AnnotatedNode::List {
                items: annotate(items, ctx, policy, style),
            }),
            Block::ListItem(children) => nodes.push(AnnotatedNode::ListItem {
                children: annotate(children, ctx, policy, style),
            }),
            Block::Emphasis(children) => {
                nodes.push(annotate_emphasis(children, ctx, policy, style));
            }
            Block::PlainText(text) => {
                for span in scan(text) {
                    nodes.push(match span {
                        TextSpan::Literal(text) => AnnotatedNode::PlainText { text },
                        TextSpan::Entity(name) => AnnotatedNode::Link {
                            uri: build_map_link(&name, ctx, LinkStyle::CityQualified),
                            label: name,
                        },
                    });
                }
            }
        }
    }
    nodes
}

fn annotate_emphasis(
    children: &[Block],
    ctx: &LinkContext,
    policy: &EmphasisPolicy,
    style: LinkStyle,
) -> AnnotatedNode {
    let text = flatten_text(children);
    match policy.classify(&text) {
        EntityDecision::IsEntity(label) => AnnotatedNode::Link {
            uri: build_map_link(&label, ctx, style),
            label,
        },
        EntityDecision::Markers(spans) => AnnotatedNode::Emphasis {
            children: spans
                .into_iter()
                .map(|span| match span {
                    TextSpan::Literal(text) => AnnotatedNode::PlainText { text },
                    TextSpan::Entity(name) => AnnotatedNode::Link {
                        uri: build_map_link(&name, ctx, style),
                        label: name,
                    },
                })
                .collect(),
        },
        EntityDecision::PlainHighlight => AnnotatedNode::Emphasis {
            children: plain_nodes(children),
        },
    }
}

// Structure-preserving conversion with no link resolution, used for
// emphasis that stays a plain highlight.
fn plain_nodes(children: &[Block]) -> Vec<AnnotatedNode> {
    children
        .iter()
        .map(|block| match block {
            Block::Heading { level, children } => AnnotatedNode::Heading {
                level: *level,
                children: plain_nodes(children),
            },
            Block::Paragraph(children) => AnnotatedNode::Paragraph {
                children: plain_nodes(children),
            },
            Block::List(items) => AnnotatedNode::List {
                items: plain_nodes(items),
            },
            Block::ListItem(children) => AnnotatedNode::ListItem {
                children: plain_nodes(children),
            },
            Block::Emphasis(children) => AnnotatedNode::Emphasis {
                children: plain_nodes(children),
            },
            Block::PlainText(text) => AnnotatedNode::PlainText { text: text.clone() },
        })
        .collect()
}

fn flatten_text(children: &[Block]) -> String {
    let mut text = String::new();
    for block in children {
        match block {
            Block::PlainText(t) => text.push_str(t),
            Block::Heading { children, .. }
            | Block::Paragraph(children)
            | Block::List(children)
            | Block::ListItem(children)
            | Block::Emphasis(children) => text.push_str(&flatten_text(children)),
        }
    }
    text
}
