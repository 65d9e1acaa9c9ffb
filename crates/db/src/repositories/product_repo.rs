//! Repository for the `products` table (the catalog store).

use echoarty_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::CategoryTag;
use crate::models::product::{
    CreateProduct, Product, ProductWithCategories, UpdateProduct, DEFAULT_SIZE,
};
use crate::repositories::category_repo::CategoryRepo;

const COLUMNS: &str = "id, name, description, price, image_url, size, created_at, updated_at";

pub struct ProductRepo;

impl ProductRepo {
    /// Insert a product and its category links in one transaction.
    pub async fn create(
        pool: &PgPool,
        input: &CreateProduct,
    ) -> Result<ProductWithCategories, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "INSERT INTO products (name, description, price, image_url, size)
             VALUES ($1, $2, $3, $4, COALESCE($5, '{DEFAULT_SIZE}'))
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(&input.image_url)
            .bind(&input.size)
            .fetch_one(&mut *tx)
            .await?;

        if !input.category_ids.is_empty() {
            CategoryRepo::set_links_inner(&mut tx, product.id, &input.category_ids).await?;
        }

        tx.commit().await?;
        Self::with_categories(pool, product).await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Product>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM products WHERE id = $1");
        sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a product by ID, enriched with its category tags.
    pub async fn find_with_categories(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<ProductWithCategories>, sqlx::Error> {
        match Self::find_by_id(pool, id).await? {
            Some(product) => Ok(Some(Self::with_categories(pool, product).await?)),
            None => Ok(None),
        }
    }

    /// List products (newest first), optionally only those tagged `category_id`.
    pub async fn list(
        pool: &PgPool,
        category_id: Option<DbId>,
    ) -> Result<Vec<ProductWithCategories>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM products p
             WHERE $1::BIGINT IS NULL OR EXISTS (
                SELECT 1 FROM product_categories pc
                WHERE pc.product_id = p.id AND pc.category_id = $1
             )
             ORDER BY created_at DESC, id DESC"
        );
        let products = sqlx::query_as::<_, Product>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await?;

        let ids: Vec<DbId> = products.iter().map(|p| p.id).collect();
        let links = CategoryRepo::links_for_products(pool, &ids).await?;

        Ok(products
            .into_iter()
            .map(|product| {
                let categories = links
                    .iter()
                    .filter(|l| l.product_id == product.id)
                    .map(|l| CategoryTag {
                        id: l.id,
                        name: l.name.clone(),
                    })
                    .collect();
                ProductWithCategories {
                    product,
                    categories,
                }
            })
            .collect())
    }

    /// Apply a partial update. Returns `None` if no product has `id`.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateProduct,
    ) -> Result<Option<ProductWithCategories>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        let query = format!(
            "UPDATE products SET
                name = COALESCE($2, name),
                description = COALESCE($3, description),
                price = COALESCE($4, price),
                image_url = COALESCE($5, image_url),
                size = COALESCE($6, size)
             WHERE id = $1
             RETURNING {COLUMNS}"
        );
        let product = sqlx::query_as::<_, Product>(&query)
            .bind(id)
            .bind(&input.name)
            .bind(&input.description)
            .bind(input.price)
            .bind(&input.image_url)
            .bind(&input.size)
            .fetch_optional(&mut *tx)
            .await?;

        let Some(product) = product else {
            return Ok(None);
        };

        if let Some(ref category_ids) = input.category_ids {
            CategoryRepo::set_links_inner(&mut tx, product.id, category_ids).await?;
        }

        tx.commit().await?;
        Ok(Some(Self::with_categories(pool, product).await?))
    }

    /// Delete a product. Fails with a foreign-key violation while orders
    /// reference it. Returns `true` if a row was removed.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn with_categories(
        pool: &PgPool,
        product: Product,
    ) -> Result<ProductWithCategories, sqlx::Error> {
        let categories = CategoryRepo::links_for_products(pool, &[product.id])
            .await?
            .into_iter()
            .map(|l| CategoryTag {
                id: l.id,
                name: l.name,
            })
            .collect();
        Ok(ProductWithCategories {
            product,
            categories,
        })
    }
}
