use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub author: String,
    pub date: String,
    pub content: String,
    pub rating: String,
}

/// What was actually found on a review element, before defaults.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ReviewDraft {
    pub author: Option<String>,
    pub date: Option<String>,
    pub content: Option<String>,
    pub rating: Option<String>,
}

impl ReviewDraft {
    /// A review is only kept when its author or its content was found.
    pub fn finish(self) -> Option<Review> {
        if self.author.is_none() && self.content.is_none() {
            return None;
        }

        Some(Review {
            author: self.author.unwrap_or_else(|| "Anonymous".to_string()),
            date: self.date.unwrap_or_else(|| "Unknown".to_string()),
            content: self.content.unwrap_or_else(|| "No content".to_string()),
            rating: self.rating.unwrap_or_else(|| "No rating".to_string()),
        })
    }
}
