use crate::core::catalog::CuisineCatalog;

/// Expand cuisine mentions into that cuisine's keyword set
///
/// "Korean food" becomes every Korean dish keyword; "kimchi stew" stays as
/// written (lower-cased). A term is expanded by at most one cuisine, the first
/// one in catalog order whose name it contains. Blank terms are dropped.
pub fn normalize_food_list<S: AsRef<str>>(foods: &[S], catalog: &CuisineCatalog) -> Vec<String> {
    let mut normalized = Vec::with_capacity(foods.len());

    for item in foods {
        let term = item.as_ref().trim().to_lowercase();
        if term.is_empty() {
            continue;
        }

        match catalog.cuisines().iter().find(|c| term.contains(c.name.as_str())) {
            Some(cuisine) => normalized.extend(cuisine.keywords.iter().cloned()),
            None => normalized.push(term),
        }
    }

    normalized
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cuisine_mention_expands() {
        let catalog = CuisineCatalog::default();
        let normalized = normalize_food_list(&["Korean food"], &catalog);

        assert_eq!(normalized, catalog.get("korean").unwrap().keywords);
    }

    #[test]
    fn test_plain_dish_lowercased() {
        let catalog = CuisineCatalog::default();
        let normalized = normalize_food_list(&["Tacos", "  Fried Chicken "], &catalog);

        assert_eq!(normalized, vec!["tacos", "fried chicken"]);
    }

    #[test]
    fn test_first_cuisine_wins() {
        let catalog = CuisineCatalog::default();
        // Contains both "indian" and "thai"; indian is registered first
        let normalized = normalize_food_list(&["indian and thai fusion"], &catalog);

        assert_eq!(normalized, catalog.get("indian").unwrap().keywords);
    }

    #[test]
    fn test_empty_and_blank_input() {
        let catalog = CuisineCatalog::default();
        let empty: [&str; 0] = [];

        assert!(normalize_food_list(&empty, &catalog).is_empty());
        assert!(normalize_food_list(&["", "   "], &catalog).is_empty());
    }
}
