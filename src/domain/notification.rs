use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who a notification is addressed to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "user_id", rename_all = "snake_case")]
pub enum Audience {
    /// Every back-office user.
    Admin,
    User(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub audience: Audience,
    pub title: String,
    pub message: String,
    /// Loose tag such as "new_order" or "order_status".
    pub category: String,
    pub read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotificationCreate {
    pub audience: Audience,
    pub title: String,
    pub message: String,
    pub category: String,
}

impl NotificationCreate {
    pub fn for_admins(category: impl Into<String>, title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            audience: Audience::Admin,
            title: title.into(),
            message: message.into(),
            category: category.into(),
        }
    }

    pub fn for_user(
        user_id: impl Into<String>,
        category: impl Into<String>,
        title: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            audience: Audience::User(user_id.into()),
            title: title.into(),
            message: message.into(),
            category: category.into(),
        }
    }
}
