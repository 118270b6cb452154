use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

/// Prompt asking a completion model to list the foods a user likes
pub const EXTRACTION_PROMPT: &str = r#"You are Food-Friend, an assistant that extracts food preferences.

Your task: From the user's description, extract a list of foods/cuisines they like.

Rules:
- ONLY extract items the user says they like.
- If the user mentions multiple items separated by commas, split them.
- If the user lists items with words like "and", "or", etc., split them too.
- If unsure, output 1-3 reasonable food-related items from the text.
- Do NOT add explanations.
- Do NOT include items they did NOT say they like.

Output format (IMPORTANT):
Foods: item1, item2, item3"#;

pub fn extraction_prompt(description: &str) -> String {
    format!("{}\n\nUser: {}\n\nExtract:\n", EXTRACTION_PROMPT, description)
}

/// Food choices from a model reply, or `None` when the reply has no usable
/// `Foods:` line
pub fn parse_food_list(raw: &str) -> Option<Vec<String>> {
    static FOODS_LINE: OnceLock<Regex> = OnceLock::new();
    static CONJUNCTION: OnceLock<Regex> = OnceLock::new();
    let foods_line = FOODS_LINE.get_or_init(|| Regex::new(r"(?i)Foods:(.*)").expect("foods line regex"));
    let conjunction = CONJUNCTION.get_or_init(|| Regex::new(r"(?i)\b(?:and|or)\b").expect("conjunction regex"));

    let items = foods_line.captures(raw)?.get(1)?.as_str().trim();
    let items = conjunction.replace_all(items, ",");

    let parts: Vec<String> = items
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect();

    if parts.is_empty() {
        None
    } else {
        Some(parts)
    }
}

/// Well-known food words found directly in the user's own description
///
/// Lower-cased, de-duplicated, in order of first appearance.
pub fn fallback_food_words(description: &str) -> Vec<String> {
    static FOOD_WORDS: OnceLock<Regex> = OnceLock::new();
    let food_words = FOOD_WORDS.get_or_init(|| {
        Regex::new(
            r"(?i)\b(?:biryani|curry|rice|dosa|tacos?|fries|pizza|pasta|bbq|indian|thai|mexican|chicken|noodles|spicy)\b",
        )
        .expect("food words regex")
    });

    let mut seen = HashSet::new();
    food_words
        .find_iter(description)
        .map(|m| m.as_str().to_lowercase())
        .filter(|w| seen.insert(w.clone()))
        .collect()
}

/// Model reply if it parses, otherwise the keyword scan of the description
pub fn resolve_food_choices(raw: Option<&str>, description: &str) -> Vec<String> {
    raw.and_then(parse_food_list)
        .unwrap_or_else(|| fallback_food_words(description))
}
