use serde::{Deserialize, Serialize};

/// Shown in place of instructions when a recipe has none.
pub const NO_INSTRUCTIONS: &str = "No instructions available.";

/// Shown in place of instructions when the detail lookup failed.
pub const DETAILS_UNAVAILABLE: &str = "Details unavailable.";

/// A candidate recipe returned by the find-by-ingredients search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub id: u64,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub image: String,
    /// How many of the queried ingredients the recipe uses
    #[serde(default)]
    pub used_ingredient_count: Option<u32>,
    /// How many extra ingredients the recipe needs
    #[serde(default)]
    pub missed_ingredient_count: Option<u32>,
}

/// Per-recipe information payload. Only the instructions are used.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeDetail {
    #[serde(default)]
    pub instructions: Option<String>,
}

/// A rendered recipe, ready to be appended to an output sink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecipeCard {
    pub id: u64,
    pub title: String,
    pub link: String,
    pub image: String,
    pub instructions: String,
    /// True when the card stands in for a recipe whose details could not be fetched
    pub details_unavailable: bool,
}

impl RecipeCard {
    /// Build a card from a candidate and its fetched detail.
    pub fn new(candidate: &SearchResult, detail: &RecipeDetail, recipe_base_url: &str) -> Self {
        let instructions = detail
            .instructions
            .as_deref()
            .filter(|text| !text.is_empty())
            .unwrap_or(NO_INSTRUCTIONS)
            .to_string();

        Self {
            id: candidate.id,
            title: candidate.title.clone(),
            link: recipe_link(recipe_base_url, &candidate.title, candidate.id),
            image: candidate.image.clone(),
            instructions,
            details_unavailable: false,
        }
    }

    /// Build a stand-in card for a candidate whose details are missing.
    pub fn unavailable(candidate: &SearchResult, recipe_base_url: &str) -> Self {
        Self {
            id: candidate.id,
            title: candidate.title.clone(),
            link: recipe_link(recipe_base_url, &candidate.title, candidate.id),
            image: candidate.image.clone(),
            instructions: DETAILS_UNAVAILABLE.to_string(),
            details_unavailable: true,
        }
    }
}

/// Replace every space in a title with a dash, as the recipe site's URLs do.
pub fn slugify(title: &str) -> String {
    title.replace(' ', "-")
}

/// Canonical recipe page: `<base>/<slug>-<id>`.
pub fn recipe_link(base_url: &str, title: &str, id: u64) -> String {
    format!("{}/{}-{}", base_url.trim_end_matches('/'), slugify(title), id)
}
