use serde::Deserialize;

/// Localized strings shown in the results area.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MessageBundle {
    pub loading: String,
    pub no_result: String,
    pub search_error: String,
}

impl Default for MessageBundle {
    fn default() -> Self {
        Self {
            loading: "Loading...".to_string(),
            no_result: "No Result! Please try another keyword.".to_string(),
            search_error: "Search error!".to_string(),
        }
    }
}
