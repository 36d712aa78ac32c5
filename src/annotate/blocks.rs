use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};
use serde::{Deserialize, Serialize};

/// The markdown subset the generator actually produces: headings,
/// paragraphs, unordered lists and bold emphasis around plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    Heading { level: u8, children: Vec<Block> },
    Paragraph(Vec<Block>),
    List(Vec<Block>),
    ListItem(Vec<Block>),
    Emphasis(Vec<Block>),
    PlainText(String),
}

/// Render-ready mirror of [`Block`] where every text leaf has been resolved
/// into plain runs and map links.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnnotatedNode {
    Heading {
        level: u8,
        children: Vec<AnnotatedNode>,
    },
    Paragraph {
        children: Vec<AnnotatedNode>,
    },
    List {
        items: Vec<AnnotatedNode>,
    },
    ListItem {
        children: Vec<AnnotatedNode>,
    },
    Emphasis {
        children: Vec<AnnotatedNode>,
    },
    PlainText {
        text: String,
    },
    Link {
        label: String,
        uri: String,
    },
}

enum Frame {
    Heading(u8),
    Paragraph,
    List,
    ListItem,
    Emphasis,
}

struct TreeBuilder {
    root: Vec<Block>,
    stack: Vec<(Frame, Vec<Block>)>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            root: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn open(&mut self, frame: Frame) {
        self.stack.push((frame, Vec::new()));
    }

    fn close(&mut self) {
        let Some((frame, children)) = self.stack.pop() else {
            return;
        };
        let block = match frame {
            Frame::Heading(level) => Block::Heading { level, children },
            Frame::Paragraph => Block::Paragraph(children),
            Frame::List => Block::List(children),
            Frame::ListItem => Block::ListItem(children),
            Frame::Emphasis => Block::Emphasis(children),
        };
        self.attach(block);
    }

    fn attach(&mut self, block: Block) {
        match self.stack.last_mut() {
            Some((_, children)) => children.push(block),
            None => self.root.push(block),
        }
    }

    // Adjacent text runs are merged so a marker split across parser events
    // still scans as one span.
    fn push_text(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let children = match self.stack.last_mut() {
            Some((_, children)) => children,
            None => &mut self.root,
        };
        if let Some(Block::PlainText(existing)) = children.last_mut() {
            existing.push_str(text);
        } else {
            children.push(Block::PlainText(text.to_string()));
        }
    }
}

/// Parse generator markdown into the [`Block`] tree.
///
/// Constructs outside the supported subset degrade to their text content;
/// nothing the model writes is dropped or rejected.
pub fn parse_markdown(text: &str) -> Vec<Block> {
    let mut builder = TreeBuilder::new();

    for event in Parser::new_ext(text, Options::empty()) {
        match event {
            Event::Start(Tag::Heading { level, .. }) => {
                builder.open(Frame::Heading(heading_level(level)));
            }
            Event::Start(Tag::Paragraph) => builder.open(Frame::Paragraph),
            Event::Start(Tag::List(_)) => builder.open(Frame::List),
            Event::Start(Tag::Item) => builder.open(Frame::ListItem),
            Event::Start(Tag::Strong) => builder.open(Frame::Emphasis),
            // Other containers stay transparent; their text flows through.
            Event::Start(_) => {}
            Event::End(
                TagEnd::Heading(_)
                | TagEnd::Paragraph
                | TagEnd::List(_)
                | TagEnd::Item
                | TagEnd::Strong,
            ) => builder.close(),
            Event::End(_) => {}
            Event::Text(text)
            | Event::Code(text)
            | Event::Html(text)
            | Event::InlineHtml(text) => builder.push_text(&text),
            Event::SoftBreak => builder.push_text(" "),
            Event::HardBreak => builder.push_text("\n"),
            _ => {}
        }
    }

    // Unclosed frames only appear on malformed event streams; flush them
    // rather than lose their text.
    while !builder.stack.is_empty() {
        builder.close();
    }

    builder.root
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
