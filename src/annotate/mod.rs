//! The content-annotation pipeline.
//!
//! Takes the raw text a generative model returned for a city query and
//! deterministically turns it into something renderable: the trailing image
//! directive is split off, the remaining markdown is parsed into a small
//! block tree, and store-name markers become map-search links. Everything
//! here is synchronous, allocation-only and total over arbitrary input.

pub mod assemble;
pub mod blocks;
pub mod classify;
pub mod links;
pub mod scan;
pub mod split;

pub use assemble::annotate;
pub use blocks::{parse_markdown, AnnotatedNode, Block};
pub use classify::{EmphasisPolicy, EntityDecision};
pub use links::{build_image_link, build_map_link, LinkContext, LinkStyle};
pub use scan::{scan, TextSpan};
pub use split::{split, SplitResult, IMAGE_PROMPT_DELIMITER};

/// Per-deployment knobs for the pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotateConfig {
    pub policy: EmphasisPolicy,
    pub link_style: LinkStyle,
}

impl Default for AnnotateConfig {
    fn default() -> Self {
        Self {
            policy: EmphasisPolicy::BracketMarkers,
            link_style: LinkStyle::CityQualified,
        }
    }
}

/// Fully processed guide for one city query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuideDocument {
    pub blocks: Vec<AnnotatedNode>,
    pub image_prompt: String,
}

/// Run the whole pipeline on one raw model response.
pub fn annotate_response(raw: &str, city: &str, config: &AnnotateConfig) -> GuideDocument {
    let SplitResult {
        main_text,
        image_prompt,
    } = split(raw, city);

    let ctx = LinkContext {
        city_subject: city.to_string(),
    };
    let blocks = annotate(
        &parse_markdown(&main_text),
        &ctx,
        &config.policy,
        config.link_style,
    );

    GuideDocument {
        blocks,
        image_prompt,
    }
}
