use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;
pub const MAX_COMMENT_LEN: usize = 1000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub rating: u8,
    pub comment: String,
    pub author_name: String,
    pub user_id: Option<String>,
    pub order_id: Option<String>,
    pub verified_purchase: bool,
    pub created_at: DateTime<Utc>,
}

/// What a customer submits from the product page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewSubmission {
    pub product_id: String,
    pub rating: u8,
    pub comment: String,
    pub author_name: String,
    pub user_id: Option<String>,
    pub order_id: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ReviewCreate {
    pub submission: ReviewSubmission,
    pub verified_purchase: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RatingSummary {
    pub count: usize,
    pub average: Option<f64>,
}

impl RatingSummary {
    pub fn from_reviews(reviews: &[Review]) -> Self {
        if reviews.is_empty() {
            return Self { count: 0, average: None };
        }
        let total: u32 = reviews.iter().map(|review| review.rating as u32).sum();
        let average = total as f64 / reviews.len() as f64;
        Self {
            count: reviews.len(),
            average: Some((average * 10.0).round() / 10.0),
        }
    }
}
