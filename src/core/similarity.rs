use std::collections::BTreeSet;

use crate::core::catalog::CuisineCatalog;
use crate::models::{ScoringWeights, SubScore};

/// Exact dish overlap (Jaccard index scaled to `weights.exact_overlap`)
///
/// Evidence is the intersection in sorted order.
#[inline]
pub fn jaccard_similarity(foods1: &[String], foods2: &[String], weights: &ScoringWeights) -> SubScore {
    let set1: BTreeSet<&str> = foods1.iter().map(String::as_str).collect();
    let set2: BTreeSet<&str> = foods2.iter().map(String::as_str).collect();

    if set1.is_empty() || set2.is_empty() {
        return SubScore::zero();
    }

    let intersection: Vec<String> = set1.intersection(&set2).map(|s| (*s).to_string()).collect();
    let union = set1.union(&set2).count();

    let jaccard = intersection.len() as f64 / union as f64;
    let value = (jaccard * weights.exact_overlap as f64).floor() as u8;

    SubScore {
        value: value.min(weights.exact_overlap),
        evidence: intersection,
    }
}

/// Cuisine cluster overlap
///
/// A cuisine matches when each side mentions at least one of its keywords
/// anywhere in its joined text. Each match adds `cuisine_increment`, capped at
/// `cuisine_cap`; every matched cuisine is still reported.
#[inline]
pub fn cuisine_similarity(
    foods1: &[String],
    foods2: &[String],
    catalog: &CuisineCatalog,
    weights: &ScoringWeights,
) -> SubScore {
    let f1 = foods1.join(" ");
    let f2 = foods2.join(" ");

    let mut total: u32 = 0;
    let mut matched = Vec::new();

    for cuisine in catalog.cuisines() {
        let in1 = cuisine.keywords.iter().any(|w| f1.contains(w.as_str()));
        let in2 = cuisine.keywords.iter().any(|w| f2.contains(w.as_str()));

        if in1 && in2 {
            total += weights.cuisine_increment as u32;
            matched.push(cuisine.name.clone());
        }
    }

    SubScore {
        value: total.min(weights.cuisine_cap as u32) as u8,
        evidence: matched,
    }
}

/// Coarse taste/texture overlap, the weakest signal
#[inline]
pub fn keyword_similarity(
    foods1: &[String],
    foods2: &[String],
    catalog: &CuisineCatalog,
    weights: &ScoringWeights,
) -> SubScore {
    let f1 = foods1.join(" ");
    let f2 = foods2.join(" ");

    let hits: Vec<String> = catalog
        .general_keywords()
        .iter()
        .filter(|kw| f1.contains(kw.as_str()) && f2.contains(kw.as_str()))
        .cloned()
        .collect();

    let total = hits.len() as u32 * weights.keyword_increment as u32;

    SubScore {
        value: total.min(weights.keyword_cap as u32) as u8,
        evidence: hits,
    }
}
