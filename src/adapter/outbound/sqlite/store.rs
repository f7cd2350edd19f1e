//! SQLite product store implementation.
//!
//! Products and subscriptions live in two tables. The subscription table is
//! the single source for both "who watches this product" and "what does this
//! user watch", so the two views cannot drift apart.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::upsert::excluded;

use crate::adapter::outbound::sqlite::database::connection::DbPool;
use crate::adapter::outbound::sqlite::database::model::{ProductRow, SubscriptionRow};
use crate::adapter::outbound::sqlite::database::schema::{products, subscriptions};
use crate::domain::{Observation, Product, ProductUrl, StockStatus, TrackerStats, UserId};
use crate::error::{Error, Result};
use crate::port::ProductStore;

type Conn = PooledConnection<ConnectionManager<SqliteConnection>>;

/// SQLite-backed product store.
pub struct SqliteProductStore {
    pool: DbPool,
}

impl SqliteProductStore {
    #[must_use]
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }

    fn conn(&self) -> Result<Conn> {
        self.pool.get().map_err(|e| Error::Connection(e.to_string()))
    }

    fn to_row(product: &Product) -> ProductRow {
        ProductRow {
            url: product.url.as_str().to_string(),
            name: product.name.clone(),
            status: product.status.as_str().to_string(),
            image_url: product.image_url.clone(),
            created_at: product.created_at.to_rfc3339(),
            last_checked: product.last_checked.map(|t| t.to_rfc3339()),
        }
    }

    fn from_row(row: ProductRow) -> Result<Product> {
        Ok(Product {
            url: ProductUrl::from_stored(row.url),
            name: row.name,
            status: row.status.parse::<StockStatus>()?,
            image_url: row.image_url,
            created_at: parse_time(&row.created_at)?,
            last_checked: row.last_checked.as_deref().map(parse_time).transpose()?,
        })
    }

    fn load_product(conn: &mut SqliteConnection, url: &str) -> QueryResult<Option<ProductRow>> {
        products::table
            .find(url)
            .select(ProductRow::as_select())
            .first(conn)
            .optional()
    }
}

fn parse_time(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Parse(e.to_string()))
}

#[async_trait]
impl ProductStore for SqliteProductStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let mut conn = self.conn()?;
        let rows: Vec<ProductRow> = products::table
            .select(ProductRow::as_select())
            .order(products::url.asc())
            .load(&mut conn)?;
        rows.into_iter().map(Self::from_row).collect()
    }

    async fn get_product(&self, url: &ProductUrl) -> Result<Option<Product>> {
        let mut conn = self.conn()?;
        Self::load_product(&mut conn, url.as_str())?
            .map(Self::from_row)
            .transpose()
    }

    async fn upsert_product(&self, product: &Product) -> Result<()> {
        let row = Self::to_row(product);
        let mut conn = self.conn()?;
        diesel::insert_into(products::table)
            .values(&row)
            .on_conflict(products::url)
            .do_update()
            .set((
                products::name.eq(excluded(products::name)),
                products::status.eq(excluded(products::status)),
                products::image_url.eq(excluded(products::image_url)),
                products::last_checked.eq(excluded(products::last_checked)),
            ))
            .execute(&mut conn)?;
        Ok(())
    }

    async fn write_observation(
        &self,
        url: &ProductUrl,
        observation: &Observation,
        checked_at: DateTime<Utc>,
    ) -> Result<bool> {
        let mut conn = self.conn()?;
        let key = url.as_str();

        conn.transaction::<bool, Error, _>(|conn| {
            let Some(row) = Self::load_product(conn, key)? else {
                return Ok(false);
            };
            let mut product = Self::from_row(row)?;
            product.apply(observation, checked_at);
            let row = Self::to_row(&product);

            diesel::update(products::table.find(key))
                .set((
                    products::name.eq(&row.name),
                    products::status.eq(&row.status),
                    products::image_url.eq(&row.image_url),
                    products::last_checked.eq(&row.last_checked),
                ))
                .execute(conn)?;
            Ok(true)
        })
    }

    async fn remove_product(&self, url: &ProductUrl) -> Result<bool> {
        let mut conn = self.conn()?;
        let key = url.as_str();

        conn.transaction::<bool, Error, _>(|conn| {
            diesel::delete(subscriptions::table.filter(subscriptions::product_url.eq(key)))
                .execute(conn)?;
            let deleted = diesel::delete(products::table.find(key)).execute(conn)?;
            Ok(deleted > 0)
        })
    }

    async fn subscribe(&self, user: &UserId, url: &ProductUrl) -> Result<bool> {
        let mut conn = self.conn()?;
        let row = SubscriptionRow {
            user_id: user.as_str().to_string(),
            product_url: url.as_str().to_string(),
            created_at: Utc::now().to_rfc3339(),
        };

        conn.transaction::<bool, Error, _>(|conn| {
            if Self::load_product(conn, &row.product_url)?.is_none() {
                return Err(Error::Database(format!("product not tracked: {url}")));
            }
            let inserted = diesel::insert_or_ignore_into(subscriptions::table)
                .values(&row)
                .execute(conn)?;
            Ok(inserted > 0)
        })
    }

    async fn unsubscribe(&self, user: &UserId, url: &ProductUrl) -> Result<bool> {
        let mut conn = self.conn()?;
        let key = url.as_str();

        conn.transaction::<bool, Error, _>(|conn| {
            let removed = diesel::delete(
                subscriptions::table
                    .filter(subscriptions::user_id.eq(user.as_str()))
                    .filter(subscriptions::product_url.eq(key)),
            )
            .execute(conn)?;
            if removed == 0 {
                return Ok(false);
            }

            let remaining: i64 = subscriptions::table
                .filter(subscriptions::product_url.eq(key))
                .count()
                .get_result(conn)?;
            if remaining == 0 {
                diesel::delete(products::table.find(key)).execute(conn)?;
            }
            Ok(true)
        })
    }

    async fn is_subscribed(&self, user: &UserId, url: &ProductUrl) -> Result<bool> {
        let mut conn = self.conn()?;
        let count: i64 = subscriptions::table
            .filter(subscriptions::user_id.eq(user.as_str()))
            .filter(subscriptions::product_url.eq(url.as_str()))
            .count()
            .get_result(&mut conn)?;
        Ok(count > 0)
    }

    async fn subscribers(&self, url: &ProductUrl) -> Result<Vec<UserId>> {
        let mut conn = self.conn()?;
        let ids: Vec<String> = subscriptions::table
            .filter(subscriptions::product_url.eq(url.as_str()))
            .select(subscriptions::user_id)
            .order(subscriptions::user_id.asc())
            .load(&mut conn)?;
        ids.into_iter()
            .map(|id| UserId::try_new(id).map_err(Error::from))
            .collect()
    }

    async fn subscriber_count(&self, url: &ProductUrl) -> Result<usize> {
        let mut conn = self.conn()?;
        let count: i64 = subscriptions::table
            .filter(subscriptions::product_url.eq(url.as_str()))
            .count()
            .get_result(&mut conn)?;
        Ok(usize::try_from(count).unwrap_or_default())
    }

    async fn user_products(&self, user: &UserId) -> Result<Vec<Product>> {
        let mut conn = self.conn()?;
        let urls: Vec<String> = subscriptions::table
            .filter(subscriptions::user_id.eq(user.as_str()))
            .select(subscriptions::product_url)
            .load(&mut conn)?;

        let rows: Vec<ProductRow> = products::table
            .filter(products::url.eq_any(urls))
            .select(ProductRow::as_select())
            .order(products::url.asc())
            .load(&mut conn)?;
        rows.into_iter().map(Self::from_row).collect()
    }

    async fn stats(&self) -> Result<TrackerStats> {
        let mut conn = self.conn()?;
        let count_status = |conn: &mut Conn, status: StockStatus| -> Result<i64> {
            products::table
                .filter(products::status.eq(status.as_str()))
                .count()
                .get_result(conn)
                .map_err(Error::from)
        };

        let total_products: i64 = products::table.count().get_result(&mut conn)?;
        let total_subscribers: i64 = subscriptions::table
            .select(diesel::dsl::count_distinct(subscriptions::user_id))
            .first(&mut conn)?;
        let in_stock = count_status(&mut conn, StockStatus::InStock)?;
        let out_of_stock = count_status(&mut conn, StockStatus::OutOfStock)?;

        let to_usize = |n: i64| usize::try_from(n).unwrap_or_default();
        Ok(TrackerStats {
            total_products: to_usize(total_products),
            total_subscribers: to_usize(total_subscribers),
            in_stock: to_usize(in_stock),
            out_of_stock: to_usize(out_of_stock),
        })
    }
}
