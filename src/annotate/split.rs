use tracing::trace;

/// Token the generator is instructed to put in front of the trailing
/// image-description line. Case-sensitive; only the first occurrence splits.
pub const IMAGE_PROMPT_DELIMITER: &str = "IMAGE_PROMPT:";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitResult {
    pub main_text: String,
    pub image_prompt: String,
}

/// Separate a raw model response into display text and an image prompt.
///
/// A missing or empty directive is a normal case: the prompt falls back to a
/// default sentence built around `fallback_subject`, so `image_prompt` is
/// always non-empty. Never fails for any input, including the empty string.
pub fn split(raw: &str, fallback_subject: &str) -> SplitResult {
    let (main, directive) = match raw.find(IMAGE_PROMPT_DELIMITER) {
        Some(at) => (&raw[..at], &raw[at + IMAGE_PROMPT_DELIMITER.len()..]),
        None => {
            trace!("No image prompt directive in response");
            (raw, "")
        }
    };

    let image_prompt = directive.trim();
    let image_prompt = if image_prompt.is_empty() {
        default_image_prompt(fallback_subject)
    } else {
        image_prompt.to_string()
    };

    SplitResult {
        main_text: main.trim().to_string(),
        image_prompt,
    }
}

fn default_image_prompt(subject: &str) -> String {
    format!("{subject} local grocery store, photorealistic")
}
