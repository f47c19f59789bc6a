use chrono::Utc;

use crate::actor_framework::Entity;
use crate::domain::{Review, ReviewCreate, MAX_COMMENT_LEN, MAX_RATING, MIN_RATING};

impl Entity for Review {
    type Id = String;
    type CreateParams = ReviewCreate;
    type Patch = ();
    type Action = ();
    type ActionResult = ();

    const TABLE: &'static str = "reviews";

    fn id(&self) -> &String { &self.id }

    fn from_create_params(id: String, params: ReviewCreate) -> Result<Self, String> {
        let submission = params.submission;
        if !(MIN_RATING..=MAX_RATING).contains(&submission.rating) {
            return Err(format!("Rating out of range: {}", submission.rating));
        }
        if submission.comment.chars().count() > MAX_COMMENT_LEN {
            return Err(format!("Comment longer than {} characters", MAX_COMMENT_LEN));
        }
        if submission.author_name.trim().is_empty() {
            return Err("Author name is required".to_string());
        }
        Ok(Self {
            id,
            product_id: submission.product_id,
            rating: submission.rating,
            comment: submission.comment,
            author_name: submission.author_name.trim().to_string(),
            user_id: submission.user_id,
            order_id: submission.order_id,
            verified_purchase: params.verified_purchase,
            created_at: Utc::now(),
        })
    }

    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err("Reviews are append-only".to_string())
    }

    fn on_delete(&self) -> Result<(), String> {
        Err("Reviews are append-only".to_string())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}
