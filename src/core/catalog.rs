/// Representative dishes for each cuisine, in scan order
const DEFAULT_CUISINES: &[(&str, &[&str])] = &[
    (
        "mexican",
        &[
            "tacos", "burrito", "enchilada", "queso", "chimichanga",
            "nachos", "barbacoa", "asada", "elote", "churro",
        ],
    ),
    (
        "indian",
        &[
            "biryani", "curry", "masala", "tandoori", "dal",
            "naan", "paneer", "vindaloo", "spicy",
        ],
    ),
    (
        "korean",
        &[
            "kimchi", "bibimbap", "bulgogi", "jajangmyeon", "tteokbokki",
            "gochujang", "korean bbq", "galbi", "japchae", "fried chicken", "pancake",
        ],
    ),
    (
        "japanese",
        &["sushi", "ramen", "tempura", "udon", "donburi", "teriyaki", "miso"],
    ),
    (
        "italian",
        &["pasta", "pizza", "lasagna", "ravioli", "gnocchi", "risotto", "tiramisu"],
    ),
    (
        "thai",
        &["pad thai", "green curry", "red curry", "tom yum", "massaman", "papaya salad"],
    ),
    (
        "chinese",
        &["noodles", "kung pao", "dumplings", "mapo tofu", "fried rice", "hotpot"],
    ),
    (
        "vietnamese",
        &[
            "vietnamese", "pho", "pho bo", "pho ga", "bun cha", "bun bo hue",
            "banh mi", "banh xeo", "com tam", "hu tieu", "goi cuon", "cha gio",
            "nem", "bun rieu", "mi quang", "ca phe sua da", "spring roll",
        ],
    ),
    (
        "taiwanese",
        &[
            "taiwanese", "beef noodle", "beef noodle soup", "lu rou fan",
            "braised pork rice", "xiao long bao", "stinky tofu", "bubble tea",
            "boba", "gua bao", "three cup chicken", "taiwanese breakfast",
            "salt and pepper chicken", "taiwanese street food", "night market",
        ],
    ),
];

/// Coarse taste, texture and protein descriptors
const DEFAULT_GENERAL_KEYWORDS: &[&str] = &[
    "spicy", "sweet", "savory", "crispy", "fried",
    "grilled", "bbq", "noodles", "soup", "rice",
    "seafood", "chicken", "beef", "pork",
    "vegan", "vegetarian",
];

/// A named cluster of representative dish keywords
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cuisine {
    pub name: String,
    pub keywords: Vec<String>,
}

/// Immutable cuisine and descriptor vocabulary shared by every scorer
///
/// Cuisines keep their registration order: normalization expands a term with
/// the first cuisine whose name it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CuisineCatalog {
    cuisines: Vec<Cuisine>,
    general_keywords: Vec<String>,
}

impl CuisineCatalog {
    /// Build a catalog, keeping only the first registration of a cuisine name
    pub fn new<C, K>(cuisines: C, general_keywords: K) -> Self
    where
        C: IntoIterator<Item = Cuisine>,
        K: IntoIterator<Item = String>,
    {
        let mut unique: Vec<Cuisine> = Vec::new();
        for cuisine in cuisines {
            let name = cuisine.name.to_lowercase();
            if unique.iter().any(|c| c.name == name) {
                tracing::warn!("Duplicate cuisine '{}' ignored in catalog", name);
                continue;
            }
            unique.push(Cuisine {
                name,
                keywords: cuisine.keywords.iter().map(|k| k.to_lowercase()).collect(),
            });
        }

        Self {
            cuisines: unique,
            general_keywords: general_keywords.into_iter().map(|k| k.to_lowercase()).collect(),
        }
    }

    pub fn cuisines(&self) -> &[Cuisine] {
        &self.cuisines
    }

    pub fn general_keywords(&self) -> &[String] {
        &self.general_keywords
    }

    pub fn get(&self, name: &str) -> Option<&Cuisine> {
        self.cuisines.iter().find(|c| c.name == name)
    }
}

impl Default for CuisineCatalog {
    fn default() -> Self {
        let cuisines = DEFAULT_CUISINES.iter().map(|(name, keywords)| Cuisine {
            name: (*name).to_string(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        });
        let keywords = DEFAULT_GENERAL_KEYWORDS.iter().map(|k| (*k).to_string());

        Self::new(cuisines, keywords)
    }
}
