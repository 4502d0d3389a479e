use serde::{Deserialize, Serialize};

use super::review::Review;

/// Names the maps UI shows when a detail view did not load properly.
pub const SENTINEL_NAMES: [&str; 2] = ["Unknown", "Failed to extract"];

#[derive(Debug, Default, Clone, PartialEq)]
pub struct Place {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub rating: Option<f64>,
    pub review_count: u64,
    pub description: String,
    pub image_url: String,
    pub reviews: Vec<Review>,
}

impl Place {
    pub fn has_valid_name(&self) -> bool {
        let name = self.name.trim();
        !name.is_empty() && !SENTINEL_NAMES.contains(&name)
    }

    pub fn describe(&mut self) {
        self.description = match (self.name.is_empty(), self.address.is_empty()) {
            (true, _) => String::new(),
            (false, true) => format!("Business listing for {}", self.name),
            (false, false) => format!(
                "Business listing for {} located at {}",
                self.name, self.address
            ),
        };
    }
}

/// One row of the places file. Column order follows field order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceRow {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub website: String,
    pub rating: Option<f64>,
    pub review_count: u64,
    pub description: String,
    pub image_url: String,
}

impl From<&Place> for PlaceRow {
    fn from(place: &Place) -> Self {
        PlaceRow {
            name: place.name.clone(),
            address: place.address.clone(),
            phone: place.phone.clone(),
            website: place.website.clone(),
            rating: place.rating,
            review_count: place.review_count,
            description: place.description.clone(),
            image_url: place.image_url.clone(),
        }
    }
}
