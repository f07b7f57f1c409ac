//! Feedback repository over `feedback.json`.

use handycraft_core::{FeedbackId, ProductId};

use super::{JsonStore, RepositoryError};
use crate::models::Feedback;

pub struct FeedbackRepository<'a> {
    store: &'a JsonStore<Feedback>,
}

impl<'a> FeedbackRepository<'a> {
    #[must_use]
    pub const fn new(store: &'a JsonStore<Feedback>) -> Self {
        Self { store }
    }

    pub async fn list(&self) -> Vec<Feedback> {
        self.store.all().await
    }

    pub async fn for_product(&self, product_id: &ProductId) -> Vec<Feedback> {
        self.store.filter(|f| &f.product_id == product_id).await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if a review already has this id.
    pub async fn create(&self, feedback: Feedback) -> Result<Feedback, RepositoryError> {
        self.store
            .update(|all| {
                if all.iter().any(|f| f.id == feedback.id) {
                    return Err(RepositoryError::Conflict(format!(
                        "feedback {} already exists",
                        feedback.id
                    )));
                }
                all.push(feedback.clone());
                Ok(feedback)
            })
            .await
    }

    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if no review has this id.
    pub async fn delete(&self, id: &FeedbackId) -> Result<Feedback, RepositoryError> {
        self.store
            .update(|all| {
                let index = all
                    .iter()
                    .position(|f| &f.id == id)
                    .ok_or(RepositoryError::NotFound)?;
                Ok(all.remove(index))
            })
            .await
    }
}
