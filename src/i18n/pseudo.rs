//! Placeholder translation generator.
//!
//! A placeholder is the base value tagged with its language code and padded
//! with `!` on both sides up to the length a real translation would likely
//! have. Lengths are measured in UTF-8 bytes, not characters, so output for
//! multi-byte scripts is stable across implementations.

use crate::i18n::LengthMultipliers;

/// Character used to pad placeholders up to their target length.
const FILLER: char = '!';

/// Generate the placeholder value of `base_value` for `language`.
///
/// The target length is `floor(bytes(base_value) * multiplier)`. Padding is
/// whatever the tagged value `"<base_value> [<language>]"` falls short of the
/// target, split with the smaller half in front.
pub fn placeholder_translate(
    base_value: &str,
    language: &str,
    multipliers: &LengthMultipliers,
) -> String {
    let multiplier = multipliers.for_language(language);
    let target_len = (base_value.len() as f64 * multiplier).floor() as usize;

    let core = format!("{} [{}]", base_value, language);
    let padding = target_len.saturating_sub(core.len());
    let leading = padding / 2;
    let trailing = padding - leading;

    let mut out = String::with_capacity(core.len() + padding);
    out.extend(std::iter::repeat(FILLER).take(leading));
    out.push_str(&core);
    out.extend(std::iter::repeat(FILLER).take(trailing));
    out
}
