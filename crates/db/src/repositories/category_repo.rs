//! Repository for the `categories` table and product links.

use echoarty_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{Category, ProductCategoryLink};

const COLUMNS: &str = "id, name, created_at";

pub struct CategoryRepo;

impl CategoryRepo {
    /// Insert a category. A duplicate name violates `uq_categories_name`.
    pub async fn create(pool: &PgPool, name: &str) -> Result<Category, sqlx::Error> {
        let query = format!("INSERT INTO categories (name) VALUES ($1) RETURNING {COLUMNS}");
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_one(pool)
            .await
    }

    /// List categories ordered by name.
    pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY name ASC, id ASC");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Delete a category and its product links. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Ids from `ids` that do not name an existing category.
    pub async fn find_missing(pool: &PgPool, ids: &[DbId]) -> Result<Vec<DbId>, sqlx::Error> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_scalar::<_, DbId>(
            "SELECT wanted.id FROM UNNEST($1::BIGINT[]) AS wanted(id)
             WHERE NOT EXISTS (SELECT 1 FROM categories c WHERE c.id = wanted.id)
             ORDER BY wanted.id",
        )
        .bind(ids)
        .fetch_all(pool)
        .await
    }

    /// Category links for a set of products, ordered by product then tag name.
    pub async fn links_for_products(
        pool: &PgPool,
        product_ids: &[DbId],
    ) -> Result<Vec<ProductCategoryLink>, sqlx::Error> {
        if product_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, ProductCategoryLink>(
            "SELECT pc.product_id, c.id, c.name
             FROM product_categories pc
             JOIN categories c ON c.id = pc.category_id
             WHERE pc.product_id = ANY($1)
             ORDER BY pc.product_id, c.name, c.id",
        )
        .bind(product_ids)
        .fetch_all(pool)
        .await
    }

    /// Replace every category link of `product_id` inside an open transaction.
    pub(crate) async fn set_links_inner(
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        product_id: DbId,
        category_ids: &[DbId],
    ) -> Result<(), sqlx::Error> {
        sqlx::query("DELETE FROM product_categories WHERE product_id = $1")
            .bind(product_id)
            .execute(&mut **tx)
            .await?;

        for &category_id in category_ids {
            sqlx::query(
                "INSERT INTO product_categories (product_id, category_id) VALUES ($1, $2)
                 ON CONFLICT DO NOTHING",
            )
            .bind(product_id)
            .bind(category_id)
            .execute(&mut **tx)
            .await?;
        }

        Ok(())
    }
}
