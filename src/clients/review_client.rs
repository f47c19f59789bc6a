use tracing::{debug, info, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::clients::OrderClient;
use crate::domain::{
    OrderStatus, RatingSummary, Review, ReviewCreate, ReviewSubmission, MAX_COMMENT_LEN, MAX_RATING, MIN_RATING,
};
use crate::review_actor::ReviewError;

/// Client for product reviews. Holds an order client to check purchases.
#[derive(Clone)]
pub struct ReviewClient {
    inner: ResourceClient<Review>,
    order_client: OrderClient,
}

crate::impl_client_methods!(ReviewClient, inner: Review, ReviewError, review, reviews);

impl ReviewClient {
    pub fn new(inner: ResourceClient<Review>, order_client: OrderClient) -> Self {
        Self { inner, order_client }
    }

    /// Store a review. It is flagged as a verified purchase when the linked
    /// order belongs to the author, contains the product and is completed.
    #[instrument(skip(self, submission), fields(product_id = %submission.product_id, rating = submission.rating))]
    pub async fn submit(&self, submission: ReviewSubmission) -> Result<Review, ReviewError> {
        if !(MIN_RATING..=MAX_RATING).contains(&submission.rating) {
            return Err(ReviewError::InvalidRating(submission.rating));
        }
        if submission.comment.chars().count() > MAX_COMMENT_LEN {
            return Err(ReviewError::ValidationError(format!(
                "Comment longer than {} characters",
                MAX_COMMENT_LEN
            )));
        }

        let verified_purchase = self.is_verified_purchase(&submission).await;

        debug!("Sending request");
        let review = self.inner.create(ReviewCreate { submission, verified_purchase }).await?;
        info!(review_id = %review.id, verified_purchase, "Review stored");
        Ok(review)
    }

    async fn is_verified_purchase(&self, submission: &ReviewSubmission) -> bool {
        let (Some(order_id), Some(user_id)) = (&submission.order_id, &submission.user_id) else {
            return false;
        };

        match self.order_client.get_order(order_id.clone()).await {
            Ok(Some(order)) => {
                order.user_id.as_deref() == Some(user_id.as_str())
                    && order.contains_product(&submission.product_id)
                    && order.status == OrderStatus::Completed
            }
            Ok(None) => false,
            Err(e) => {
                warn!(order_id = %order_id, error = %e, "Purchase check failed, storing review unverified");
                false
            }
        }
    }

    /// Newest first.
    #[instrument(skip(self))]
    pub async fn reviews_for_product(&self, product_id: String) -> Result<Vec<Review>, ReviewError> {
        debug!("Sending request");
        let mut reviews = self
            .inner
            .list_where(move |review: &Review| review.product_id == product_id)
            .await?;
        reviews.reverse();
        Ok(reviews)
    }

    #[instrument(skip(self))]
    pub async fn rating_summary(&self, product_id: String) -> Result<RatingSummary, ReviewError> {
        let reviews = self.reviews_for_product(product_id).await?;
        Ok(RatingSummary::from_reviews(&reviews))
    }
}
