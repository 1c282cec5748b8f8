use sqlx::sqlite::SqliteRow;
use sqlx::Row;

use sellery_core::domain::product::{Product, ProductId};

use super::user::parse_timestamp;
use super::{ProductRepository, RepositoryError};
use crate::DbPool;

const PRODUCT_COLUMNS: &str = "id, title, brand, colour, size, material, description, \
     price_cents, stock, image, created_at, updated_at";

pub struct SqlProductRepository {
    pool: DbPool,
}

impl SqlProductRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl ProductRepository for SqlProductRepository {
    async fn list(&self) -> Result<Vec<Product>, RepositoryError> {
        let rows = sqlx::query(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY created_at DESC, id DESC"
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(row_to_product).collect()
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, RepositoryError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = ?"))
            .bind(&id.0)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(row_to_product).transpose()
    }

    async fn insert(&self, product: Product) -> Result<(), RepositoryError> {
        sqlx::query(
            "INSERT INTO products (id, title, brand, colour, size, material, description,
                 price_cents, stock, image, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&product.id.0)
        .bind(&product.title)
        .bind(&product.brand)
        .bind(&product.colour)
        .bind(&product.size)
        .bind(&product.material)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.image.as_deref())
        .bind(product.created_at.to_rfc3339())
        .bind(product.updated_at.to_rfc3339())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn update(&self, product: Product) -> Result<bool, RepositoryError> {
        let result = sqlx::query(
            "UPDATE products SET title = ?, brand = ?, colour = ?, size = ?, material = ?,
                 description = ?, price_cents = ?, stock = ?, image = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&product.title)
        .bind(&product.brand)
        .bind(&product.colour)
        .bind(&product.size)
        .bind(&product.material)
        .bind(&product.description)
        .bind(product.price_cents)
        .bind(product.stock)
        .bind(product.image.as_deref())
        .bind(product.updated_at.to_rfc3339())
        .bind(&product.id.0)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete(&self, id: &ProductId) -> Result<bool, RepositoryError> {
        let result =
            sqlx::query("DELETE FROM products WHERE id = ?").bind(&id.0).execute(&self.pool).await?;
        Ok(result.rows_affected() > 0)
    }
}

fn row_to_product(row: &SqliteRow) -> Result<Product, RepositoryError> {
    Ok(Product {
        id: ProductId(row.try_get("id")?),
        title: row.try_get("title")?,
        brand: row.try_get("brand")?,
        colour: row.try_get("colour")?,
        size: row.try_get("size")?,
        material: row.try_get("material")?,
        description: row.try_get("description")?,
        price_cents: row.try_get("price_cents")?,
        stock: row.try_get("stock")?,
        image: row.try_get("image")?,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at")?)?,
        updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at")?)?,
    })
}
