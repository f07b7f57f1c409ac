//! Product reviews.

use serde::{Deserialize, Serialize};

use handycraft_core::{FeedbackId, ProductId};

/// A stored review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub id: FeedbackId,
    pub product_id: ProductId,
    pub username: String,
    pub user_email: String,
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
    /// Local time formatted `YYYY-MM-DD HH:MM`.
    pub timestamp: String,
}

/// Review submission.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackRequest {
    pub id: Option<FeedbackId>,
    pub product_id: Option<ProductId>,
    #[serde(default)]
    pub username: String,
    pub user_email: Option<String>,
    #[serde(default)]
    pub rating: u8,
    #[serde(default)]
    pub comment: String,
}

/// A review as shown on a product page, without the reviewer's email.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewView {
    pub username: String,
    pub rating: u8,
    pub comment: String,
    pub timestamp: String,
}

impl From<Feedback> for ReviewView {
    fn from(feedback: Feedback) -> Self {
        Self {
            username: feedback.username,
            rating: feedback.rating,
            comment: feedback.comment,
            timestamp: feedback.timestamp,
        }
    }
}

/// Reviews for one product plus their mean rating.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductReviews {
    pub reviews: Vec<ReviewView>,
    pub average: f64,
}

impl ProductReviews {
    #[must_use]
    pub fn new(feedback: Vec<Feedback>) -> Self {
        let average = if feedback.is_empty() {
            0.0
        } else {
            let sum: u32 = feedback.iter().map(|f| u32::from(f.rating)).sum();
            #[allow(clippy::cast_precision_loss)]
            let count = feedback.len() as f64;
            f64::from(sum) / count
        };

        Self {
            reviews: feedback.into_iter().map(ReviewView::from).collect(),
            average,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn review(rating: u8) -> Feedback {
        Feedback {
            id: FeedbackId::new(format!("f{rating}")),
            product_id: ProductId::new("P1"),
            username: "Ali".to_owned(),
            user_email: "ali@x.my".to_owned(),
            rating,
            comment: String::new(),
            timestamp: "2024-05-01 10:00".to_owned(),
        }
    }

    #[test]
    fn test_average_of_no_reviews_is_zero() {
        let reviews = ProductReviews::new(Vec::new());
        assert!(reviews.reviews.is_empty());
        assert!(reviews.average.abs() < f64::EPSILON);
    }

    #[test]
    fn test_average_rating() {
        let reviews = ProductReviews::new(vec![review(5), review(4), review(3)]);
        assert_eq!(reviews.reviews.len(), 3);
        assert!((reviews.average - 4.0).abs() < f64::EPSILON);
    }
}
