//! Database model types for Diesel ORM.

use diesel::prelude::*;

use super::schema::{products, subscriptions};

/// Database row for a tracked product. Timestamps are RFC 3339 text.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct ProductRow {
    pub url: String,
    pub name: String,
    pub status: String,
    pub image_url: Option<String>,
    pub created_at: String,
    pub last_checked: Option<String>,
}

/// Database row for one user ↔ product subscription.
#[derive(Queryable, Selectable, Insertable, Debug, Clone)]
#[diesel(table_name = subscriptions)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct SubscriptionRow {
    pub user_id: String,
    pub product_url: String,
    pub created_at: String,
}
