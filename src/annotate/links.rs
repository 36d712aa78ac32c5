use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

/// Characters kept verbatim when encoding a query component, matching what
/// browsers' `encodeURIComponent` leaves alone for the unreserved set.
const QUERY: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

pub const MAP_SEARCH_URL: &str = "https://www.google.com/maps/search/?api=1&query=";
pub const IMAGE_GENERATOR_URL: &str = "https://pollinations.ai/p/";

/// Contextual qualifier appended to map queries so generic chain names
/// resolve inside the city the user asked about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkContext {
    pub city_subject: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkStyle {
    /// Query the entity name alone.
    EntityOnly,
    /// Query `"{name} {city}"` to disambiguate across cities.
    CityQualified,
}

/// Build a map-search URI for a place name. Purely textual; whether the
/// query resolves to a real place is the map frontend's problem.
pub fn build_map_link(entity_name: &str, ctx: &LinkContext, style: LinkStyle) -> String {
    let query = match style {
        LinkStyle::EntityOnly => entity_name.to_string(),
        LinkStyle::CityQualified => format!("{entity_name} {}", ctx.city_subject),
    };
    format!("{MAP_SEARCH_URL}{}", utf8_percent_encode(&query, QUERY))
}

/// Build the scenery-image URL for an image prompt.
pub fn build_image_link(prompt: &str) -> String {
    format!(
        "{IMAGE_GENERATOR_URL}{}?width=1024&height=512&nologo=true",
        utf8_percent_encode(prompt, QUERY)
    )
}
