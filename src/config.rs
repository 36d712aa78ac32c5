use std::env;

use crate::ai::config::AiConfig;
use crate::annotate::{AnnotateConfig, EmphasisPolicy, LinkStyle};

#[derive(Clone)]
pub struct Config {
    pub bind_addr: String,
    pub ai: Option<AiConfig>,
    pub annotate: AnnotateConfig,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());
        let ai = AiConfig::from_env();
        let annotate = AnnotateConfig {
            policy: emphasis_policy_from_env(),
            link_style: link_style_from_env(),
        };
        Self {
            bind_addr,
            ai,
            annotate,
        }
    }
}

fn emphasis_policy_from_env() -> EmphasisPolicy {
    match env::var("EMPHASIS_POLICY").as_deref() {
        Ok("keywords") => EmphasisPolicy::KeywordAllowlist(keyword_list_from_env()),
        _ => EmphasisPolicy::BracketMarkers,
    }
}

// MART_KEYWORDS is a comma-separated flat list of store-name aliases.
fn keyword_list_from_env() -> Vec<String> {
    env::var("MART_KEYWORDS")
        .unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

fn link_style_from_env() -> LinkStyle {
    match env::var("MAP_LINK_STYLE").as_deref() {
        Ok("entity") => LinkStyle::EntityOnly,
        _ => LinkStyle::CityQualified,
    }
}
