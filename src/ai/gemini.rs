use anyhow::{anyhow, Result};
use serde::Deserialize;
use tracing::{debug, instrument, trace, warn};

pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Deserialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: String,
}

/// Ask the generative model for market guidance about a city.
///
/// Returns the raw response text untouched; shaping it is the annotation
/// pipeline's job. `base_url` overrides the API host so tests can point the
/// client at a mock server.
#[instrument(level = "trace", skip(client, api_key))]
pub async fn generate_guide(
    client: &reqwest::Client,
    api_key: &str,
    model: &str,
    city: &str,
    base_url: Option<&str>,
) -> Result<String> {
    let base = base_url.unwrap_or(GEMINI_API_URL);
    let url = format!("{base}/v1beta/models/{model}:generateContent?key={api_key}");
    let body = serde_json::json!({
        "contents": [{
            "parts": [{ "text": crate::ai::prompts::guide_prompt(city) }]
        }]
    });

    debug!(model, city, "sending generateContent request");

    let resp = client.post(&url).json(&body).send().await?;

    if !resp.status().is_success() {
        let status = resp.status();
        let err_text = resp.text().await.unwrap_or_default();
        warn!(%status, "generator API error");
        return Err(anyhow!("generator API error {status}: {err_text}"));
    }

    let raw = resp.text().await?;
    let snippet: String = raw.chars().take(200).collect();
    debug!(snippet = %snippet, "generateContent response body");
    trace!(raw = %raw, "generateContent response");

    let parsed: GenerateResponse = serde_json::from_str(&raw)?;
    let text: String = parsed
        .candidates
        .first()
        .ok_or_else(|| anyhow!("missing generation candidate"))?
        .content
        .parts
        .iter()
        .map(|p| p.text.as_str())
        .collect();

    Ok(text)
}
