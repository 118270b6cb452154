use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;

use async_trait::async_trait;
use regex::Regex;
use serde_json::Value;

use crate::core::error::JudgeError;
use crate::models::{FallbackCause, JudgmentResult, JudgmentSource, ParseStrategy};

/// Rationale used when a score was found but no explanation came with it
pub const DEFAULT_RATIONALE: &str = "The model rated this pair without giving a reason.";

/// Rationale for the overlap fallback when nothing is shared
pub const NO_OVERLAP_RATIONALE: &str = "No strong overlap between these food preferences.";

/// Rationale when one side has nothing to compare
pub const EMPTY_INPUT_RATIONALE: &str = "Not enough food preferences to compare.";

const FALLBACK_BASE: u32 = 10;
const FALLBACK_PER_ITEM: u32 = 20;
const FALLBACK_CEILING: u32 = 80;

const COMPATIBILITY_PROMPT: &str = r#"You are Food-Friend, an offline food compatibility expert.

Consider:
- cuisines
- spice levels
- cooking style
- dish similarities
- ingredient overlap
- flavor profile

Scoring Rubric:
0-20  = very low similarity
20-40 = weak match
40-60 = moderate
60-80 = strong
80-100 = very strong

Be strict and realistic. Do NOT repeat the same score for all users.

Output ONLY:
{
  "score": <integer>,
  "reason": "<string>"
}"#;

/// The two food lists a judge is asked to compare
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JudgePrompt {
    pub list_a: Vec<String>,
    pub list_b: Vec<String>,
}

impl JudgePrompt {
    pub fn new(list_a: &[String], list_b: &[String]) -> Self {
        Self {
            list_a: list_a.to_vec(),
            list_b: list_b.to_vec(),
        }
    }

    /// Natural-language compatibility prompt for a text completion model
    pub fn render(&self) -> String {
        let a = serde_json::to_string_pretty(&self.list_a).unwrap_or_else(|_| "[]".to_string());
        let b = serde_json::to_string_pretty(&self.list_b).unwrap_or_else(|_| "[]".to_string());

        format!(
            "{}\n\nUser A foods:\n{}\n\nUser B foods:\n{}\n\nJSON OUTPUT:\n",
            COMPATIBILITY_PROMPT, a, b
        )
    }
}

/// External semantic judge
///
/// Returns raw, unstructured text. Implementations may be slow, fail, or
/// answer differently for identical input.
#[async_trait]
pub trait Judge: Send + Sync {
    async fn invoke(&self, prompt: &JudgePrompt) -> Result<String, JudgeError>;
}

/// Score and rationale recovered from judge text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub score: u8,
    pub rationale: String,
}

/// Ask the judge to compare two food lists, never failing
///
/// Empty input short-circuits without invoking the judge. Invocation errors
/// and timeouts fall back to the overlap heuristic, as does text that none of
/// the parsing strategies understand.
pub async fn judge_foods(
    foods_a: &[String],
    foods_b: &[String],
    judge: &dyn Judge,
    timeout: Option<Duration>,
) -> JudgmentResult {
    if is_blank(foods_a) || is_blank(foods_b) {
        return JudgmentResult {
            score: 0,
            rationale: EMPTY_INPUT_RATIONALE.to_string(),
            source: JudgmentSource::Fallback(FallbackCause::EmptyInput),
        };
    }

    let prompt = JudgePrompt::new(foods_a, foods_b);
    let outcome = match timeout {
        Some(limit) => match tokio::time::timeout(limit, judge.invoke(&prompt)).await {
            Ok(result) => result,
            Err(_) => Err(JudgeError::Timeout(limit)),
        },
        None => judge.invoke(&prompt).await,
    };

    match outcome {
        Ok(raw) => interpret(&raw, foods_a, foods_b),
        Err(e) => {
            tracing::warn!("Judge invocation failed, using overlap fallback: {}", e);
            overlap_fallback(foods_a, foods_b, FallbackCause::InvocationFailed)
        }
    }
}

/// Run the parsing cascade over raw judge text
pub fn interpret(raw: &str, foods_a: &[String], foods_b: &[String]) -> JudgmentResult {
    let strategies: [(ParseStrategy, fn(&str) -> Option<Verdict>); 3] = [
        (ParseStrategy::Strict, parse_strict),
        (ParseStrategy::Loose, parse_loose),
        (ParseStrategy::Fuzzy, parse_fuzzy),
    ];

    for (strategy, parse) in strategies {
        if let Some(verdict) = parse(raw) {
            tracing::debug!(?strategy, score = verdict.score, "Parsed judge output");
            return JudgmentResult {
                score: verdict.score,
                rationale: verdict.rationale,
                source: JudgmentSource::Judge(strategy),
            };
        }
    }

    tracing::warn!("Unparseable judge output ({} bytes), using overlap fallback", raw.len());
    overlap_fallback(foods_a, foods_b, FallbackCause::Unparseable)
}

/// `"score": <n>` directly followed by `"reason": "<text>"`
pub fn parse_strict(raw: &str) -> Option<Verdict> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let re = PATTERN.get_or_init(|| {
        Regex::new(r#"(?is)"score"\s*:\s*"?(-?\d+(?:\.\d+)?)"?\s*,\s*"reason"\s*:\s*"((?:[^"\\]|\\.)*)""#)
            .expect("strict verdict regex")
    });

    let caps = re.captures(raw)?;
    let score = caps.get(1)?.as_str().parse::<f64>().ok()?;
    let reason = caps.get(2)?.as_str();

    // Reuse the JSON string grammar to undo escapes such as \" and \n
    let rationale = serde_json::from_str::<String>(&format!("\"{}\"", reason))
        .unwrap_or_else(|_| reason.to_string());

    Some(Verdict {
        score: clamp_score(score),
        rationale: non_empty_or_default(rationale),
    })
}

/// Any brace-delimited fragment that decodes as JSON with a usable score
pub fn parse_loose(raw: &str) -> Option<Verdict> {
    static OUTER: OnceLock<Regex> = OnceLock::new();
    static FLAT: OnceLock<Regex> = OnceLock::new();
    let outer = OUTER.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("outer object regex"));
    let flat = FLAT.get_or_init(|| Regex::new(r"\{[^{}]*\}").expect("flat object regex"));

    let fragments = outer
        .find(raw)
        .into_iter()
        .chain(flat.find_iter(raw))
        .map(|m| m.as_str());

    for fragment in fragments {
        let Ok(Value::Object(map)) = serde_json::from_str::<Value>(fragment) else {
            continue;
        };

        let Some(score) = map.get("score").and_then(numeric_value) else {
            continue;
        };

        let rationale = ["reason", "rationale", "explanation"]
            .iter()
            .find_map(|key| map.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_default();

        return Some(Verdict {
            score: clamp_score(score),
            rationale: non_empty_or_default(rationale),
        });
    }

    None
}

/// A number next to "score", "compatibility" or "match", in either order
pub fn parse_fuzzy(raw: &str) -> Option<Verdict> {
    static AFTER: OnceLock<Regex> = OnceLock::new();
    static BEFORE: OnceLock<Regex> = OnceLock::new();
    static CLAUSE: OnceLock<Regex> = OnceLock::new();
    let after = AFTER.get_or_init(|| {
        Regex::new(r"(?i)\b(?:scores?|compatib\w*|match\w*)\b[^0-9\n-]{0,20}(-?\d{1,3}(?:\.\d+)?)")
            .expect("keyword-number regex")
    });
    let before = BEFORE.get_or_init(|| {
        Regex::new(r"(?i)\b(\d{1,3}(?:\.\d+)?)\s*(?:%|/\s*100|out of 100)?\s*(?:compatib\w*|match\w*|scores?)\b")
            .expect("number-keyword regex")
    });
    let clause = CLAUSE.get_or_init(|| {
        Regex::new(r"(?i)\b(?:reason|rationale|because|since)\b\s*[:\-]?\s*([^\n]+)").expect("clause regex")
    });

    let number = after
        .captures(raw)
        .or_else(|| before.captures(raw))
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<f64>().ok())?;

    let rationale = clause
        .captures(raw)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim_matches(|c: char| c == '"' || c == '}' || c == ',' || c.is_whitespace()))
        .map(str::to_string)
        .unwrap_or_default();

    Some(Verdict {
        score: clamp_score(number),
        rationale: non_empty_or_default(rationale),
    })
}

/// Score derived purely from case-normalized overlap of the raw lists
pub fn overlap_fallback(foods_a: &[String], foods_b: &[String], cause: FallbackCause) -> JudgmentResult {
    let side_b: HashSet<String> = foods_b.iter().map(|f| f.trim().to_lowercase()).collect();

    let mut seen = HashSet::new();
    let overlap: Vec<String> = foods_a
        .iter()
        .map(|f| f.trim().to_lowercase())
        .filter(|f| !f.is_empty() && side_b.contains(f))
        .filter(|f| seen.insert(f.clone()))
        .collect();

    let score = (FALLBACK_BASE + FALLBACK_PER_ITEM * overlap.len() as u32).min(FALLBACK_CEILING) as u8;

    let rationale = if overlap.is_empty() {
        NO_OVERLAP_RATIONALE.to_string()
    } else {
        let named: Vec<&str> = overlap.iter().take(3).map(String::as_str).collect();
        format!("Both enjoy {}.", join_names(&named))
    };

    JudgmentResult {
        score,
        rationale,
        source: JudgmentSource::Fallback(cause),
    }
}

fn join_names(names: &[&str]) -> String {
    match names {
        [] => String::new(),
        [one] => (*one).to_string(),
        [init @ .., last] => format!("{} and {}", init.join(", "), last),
    }
}

fn numeric_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn clamp_score(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

fn non_empty_or_default(rationale: String) -> String {
    let trimmed = rationale.trim();
    if trimmed.is_empty() {
        DEFAULT_RATIONALE.to_string()
    } else {
        trimmed.to_string()
    }
}

fn is_blank(foods: &[String]) -> bool {
    foods.iter().all(|f| f.trim().is_empty())
}
