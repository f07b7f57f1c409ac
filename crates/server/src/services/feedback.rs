//! Purchase-verified product reviews.

use chrono::Local;
use thiserror::Error;
use tracing::instrument;

use handycraft_core::{FeedbackId, ProductId};

use crate::db::{Database, FeedbackRepository, OrderRepository, RepositoryError};
use crate::models::{Feedback, FeedbackRequest, ProductReviews};

/// Review timestamps are local wall-clock time to the minute.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M";

#[derive(Debug, Error)]
pub enum FeedbackError {
    #[error("Incomplete data")]
    Incomplete,

    #[error("Rating must be between 1 and 5")]
    InvalidRating(u8),

    /// The reviewer has no completed order containing the product.
    #[error("purchase not verified")]
    NotVerified,

    #[error("Feedback not found: {0}")]
    NotFound(FeedbackId),

    #[error("Feedback already exists: {0}")]
    AlreadyExists(FeedbackId),

    #[error("repository error: {0}")]
    Repository(#[from] RepositoryError),
}

pub struct FeedbackService<'a> {
    feedback: FeedbackRepository<'a>,
    orders: OrderRepository<'a>,
}

impl<'a> FeedbackService<'a> {
    #[must_use]
    pub const fn new(db: &'a Database) -> Self {
        Self {
            feedback: FeedbackRepository::new(&db.feedback),
            orders: OrderRepository::new(&db.orders),
        }
    }

    /// Store a review from a customer who received the product.
    ///
    /// # Errors
    ///
    /// Returns `FeedbackError::Incomplete` without an email or product id,
    /// `FeedbackError::InvalidRating` outside 1-5,
    /// `FeedbackError::NotVerified` without a completed purchase, and
    /// `FeedbackError::AlreadyExists` if a supplied id is taken.
    #[instrument(skip(self, request), fields(product_id = ?request.product_id))]
    pub async fn submit(&self, request: FeedbackRequest) -> Result<Feedback, FeedbackError> {
        let user_email = request
            .user_email
            .map(|e| e.trim().to_owned())
            .filter(|e| !e.is_empty())
            .ok_or(FeedbackError::Incomplete)?;
        let product_id = request
            .product_id
            .filter(|id| !id.as_str().trim().is_empty())
            .ok_or(FeedbackError::Incomplete)?;
        if !(1..=5).contains(&request.rating) {
            return Err(FeedbackError::InvalidRating(request.rating));
        }

        if !self
            .orders
            .has_completed_purchase(&user_email, &product_id)
            .await
        {
            tracing::info!("Review rejected, no completed purchase");
            return Err(FeedbackError::NotVerified);
        }

        let feedback = Feedback {
            id: request
                .id
                .filter(|id| !id.as_str().is_empty())
                .unwrap_or_else(|| FeedbackId::new(uuid::Uuid::new_v4().to_string())),
            product_id,
            username: request.username.trim().to_owned(),
            user_email,
            rating: request.rating,
            comment: request.comment.trim().to_owned(),
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
        };

        let id = feedback.id.clone();
        self.feedback.create(feedback).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => FeedbackError::AlreadyExists(id),
            other => FeedbackError::Repository(other),
        })
    }

    /// Reviews for one product with their average rating.
    pub async fn for_product(&self, product_id: &ProductId) -> ProductReviews {
        ProductReviews::new(self.feedback.for_product(product_id).await)
    }

    pub async fn list(&self) -> Vec<Feedback> {
        self.feedback.list().await
    }

    /// # Errors
    ///
    /// Returns `FeedbackError::NotFound` for an unknown id.
    pub async fn delete(&self, id: &FeedbackId) -> Result<Feedback, FeedbackError> {
        self.feedback.delete(id).await.map_err(|e| match e {
            RepositoryError::NotFound => FeedbackError::NotFound(id.clone()),
            other => FeedbackError::Repository(other),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::Utc;
    use handycraft_core::{OrderId, OrderStatus, Price};

    use super::*;
    use crate::models::{LineItem, Order};

    fn order(status: OrderStatus) -> Order {
        Order {
            order_id: OrderId::new("ORD-1"),
            user_id: "Ali@Mail.my".to_owned(),
            customer_name: "Ali".to_owned(),
            address: String::new(),
            phone: String::new(),
            items: vec![LineItem {
                product_id: ProductId::new("P1"),
                name: "Wau".to_owned(),
                variant: "Default".to_owned(),
                quantity: 1,
                price: Price::from_sen(3000),
            }],
            total_amount: Price::from_sen(3000),
            created_at: Utc::now(),
            status,
        }
    }

    fn review(email: &str, product: &str, rating: u8) -> FeedbackRequest {
        FeedbackRequest {
            id: None,
            product_id: Some(ProductId::new(product)),
            username: "Ali".to_owned(),
            user_email: Some(email.to_owned()),
            rating,
            comment: "Cantik".to_owned(),
        }
    }

    async fn with_order(dir: &tempfile::TempDir, status: OrderStatus) -> Database {
        let db = Database::open(dir.path()).await.unwrap();
        db.orders
            .update(|orders| {
                orders.push(order(status));
                Ok::<_, RepositoryError>(())
            })
            .await
            .unwrap();
        db
    }

    #[tokio::test]
    async fn test_requires_completed_purchase() {
        let dir = tempfile::tempdir().unwrap();
        let db = with_order(&dir, OrderStatus::Shipped).await;
        let service = FeedbackService::new(&db);

        assert!(matches!(
            service.submit(review("ali@mail.my", "P1", 5)).await,
            Err(FeedbackError::NotVerified)
        ));
    }

    #[tokio::test]
    async fn test_submit_and_average() {
        let dir = tempfile::tempdir().unwrap();
        let db = with_order(&dir, OrderStatus::Completed).await;
        let service = FeedbackService::new(&db);

        let stored = service.submit(review("ALI@mail.my", "P1", 4)).await.unwrap();
        assert_eq!(stored.timestamp.len(), "2024-01-01 00:00".len());
        assert!(matches!(
            service.submit(review("ali@mail.my", "P2", 4)).await,
            Err(FeedbackError::NotVerified)
        ));
        assert!(matches!(
            service.submit(review("ali@mail.my", "P1", 6)).await,
            Err(FeedbackError::InvalidRating(6))
        ));

        let reviews = service.for_product(&ProductId::new("P1")).await;
        assert_eq!(reviews.reviews.len(), 1);
        assert!((reviews.average - 4.0).abs() < f64::EPSILON);

        service.delete(&stored.id).await.unwrap();
        assert!(matches!(
            service.delete(&stored.id).await,
            Err(FeedbackError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_duplicate_id_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let db = with_order(&dir, OrderStatus::Completed).await;
        let service = FeedbackService::new(&db);

        let mut request = review("ali@mail.my", "P1", 5);
        request.id = Some(FeedbackId::new("fb-1"));
        service.submit(request.clone()).await.unwrap();

        request.rating = 2;
        assert!(matches!(
            service.submit(request).await,
            Err(FeedbackError::AlreadyExists(id)) if id.as_str() == "fb-1"
        ));
        assert_eq!(service.list().await.len(), 1);

        service.delete(&FeedbackId::new("fb-1")).await.unwrap();
        assert!(service.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_incomplete() {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open(dir.path()).await.unwrap();
        let mut request = review("ali@mail.my", "P1", 5);
        request.user_email = None;
        assert!(matches!(
            FeedbackService::new(&db).submit(request).await,
            Err(FeedbackError::Incomplete)
        ));
    }
}
