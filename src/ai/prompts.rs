//! Instruction templates sent to the text generator.
//!
//! Keeping these in one place makes it easy to tweak what the model is asked
//! for without digging through the client code. The template pins down the
//! two structural conventions the annotation pipeline relies on: square
//! brackets around store names and a final `IMAGE_PROMPT:` line.

/// Instruction sent with every city query.
pub fn guide_prompt(city: &str) -> String {
    format!(
        "Give practical tips about local supermarkets in {city} and a recommended \
         shopping list of regional products, in markdown with ### headings and \
         bulleted lists. Wrap every store or market name in square brackets, \
         like [Big C]. Finish with exactly one last line of the form \
         'IMAGE_PROMPT: <an English sentence describing the scenery of a \
         market in this city>'."
    )
}
