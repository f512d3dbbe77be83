//! Catalog repository: categories and products.

use sqlx::{Executor, Sqlite, SqlitePool};

use brewdesk_core::{CategoryId, Money, ProductId};

use super::RepositoryError;
use crate::models::catalog::{Category, NewProduct, ProductListing};

#[derive(Debug, sqlx::FromRow)]
struct ProductListingRow {
    id: ProductId,
    name: String,
    price_cents: i64,
    is_active: bool,
    category: Option<String>,
}

impl From<ProductListingRow> for ProductListing {
    fn from(row: ProductListingRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            price: Money::from_cents(row.price_cents),
            is_active: row.is_active,
            category: row.category,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct CategoryRow {
    id: CategoryId,
    name: String,
    description: Option<String>,
}

impl From<CategoryRow> for Category {
    fn from(row: CategoryRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            description: row.description,
        }
    }
}

/// Insert a category using any executor (pool or open transaction).
pub(crate) async fn insert_category<'e, E>(
    executor: E,
    name: &str,
    description: Option<&str>,
) -> Result<Category, RepositoryError>
where
    E: Executor<'e, Database = Sqlite>,
{
    let row = sqlx::query_as::<_, CategoryRow>(
        r"
        INSERT INTO category (name, description)
        VALUES (?, ?)
        RETURNING id, name, description
        ",
    )
    .bind(name)
    .bind(description)
    .fetch_one(executor)
    .await
    .map_err(|e| RepositoryError::from_insert(e, "category name already exists"))?;

    Ok(row.into())
}

/// Insert a product using any executor (pool or open transaction).
pub(crate) async fn insert_product<'e, E>(
    executor: E,
    product: &NewProduct,
) -> Result<ProductId, sqlx::Error>
where
    E: Executor<'e, Database = Sqlite>,
{
    sqlx::query_scalar::<_, ProductId>(
        r"
        INSERT INTO product (name, price_cents, is_active, category_id)
        VALUES (?, ?, ?, ?)
        RETURNING id
        ",
    )
    .bind(product.name.as_str())
    .bind(product.price.cents())
    .bind(product.is_active)
    .bind(product.category_id)
    .fetch_one(executor)
    .await
}

/// Repository for catalog reads and seeding writes.
pub struct CatalogRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CatalogRepository<'a> {
    /// Create a new catalog repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// List active products ordered by category name, then product name.
    ///
    /// Uncategorised products sort first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_active_products(&self) -> Result<Vec<ProductListing>, RepositoryError> {
        let rows = sqlx::query_as::<_, ProductListingRow>(
            r"
            SELECT p.id, p.name, p.price_cents, p.is_active, c.name AS category
            FROM product p
            LEFT JOIN category c ON c.id = p.category_id
            WHERE p.is_active = 1
            ORDER BY c.name, p.name, p.id
            ",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(ProductListing::from).collect())
    }

    /// List all categories ordered by name.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_categories(&self) -> Result<Vec<Category>, RepositoryError> {
        let rows = sqlx::query_as::<_, CategoryRow>(
            "SELECT id, name, description FROM category ORDER BY name",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(rows.into_iter().map(Category::from).collect())
    }

    /// Number of categories; zero means the catalog has never been seeded.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn category_count(&self) -> Result<i64, RepositoryError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM category")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }

    /// Create a category.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Conflict` if the name is already taken.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn create_category(
        &self,
        name: &str,
        description: Option<&str>,
    ) -> Result<Category, RepositoryError> {
        insert_category(self.pool, name, description).await
    }

    /// Create a product.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including an
    /// unknown category id, which violates the foreign key).
    pub async fn create_product(&self, product: &NewProduct) -> Result<ProductId, RepositoryError> {
        Ok(insert_product(self.pool, product).await?)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::db::connect_in_memory;

    async fn add_product(
        repo: &CatalogRepository<'_>,
        name: &str,
        cents: i64,
        active: bool,
        category: Option<CategoryId>,
    ) -> ProductId {
        repo.create_product(&NewProduct {
            name: name.to_owned(),
            price: Money::from_cents(cents),
            is_active: active,
            category_id: category,
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_active_products_sorted_by_category_then_name() {
        let pool = connect_in_memory().await.unwrap();
        let repo = CatalogRepository::new(&pool);

        let tea = repo.create_category("Tea", Some("Tea drinks")).await.unwrap();
        let coffee = repo.create_category("Coffee", None).await.unwrap();

        add_product(&repo, "Milk Tea", 2200, true, Some(tea.id)).await;
        add_product(&repo, "Mocha", 3500, true, Some(coffee.id)).await;
        add_product(&repo, "Americano", 2500, true, Some(coffee.id)).await;
        add_product(&repo, "Retired Blend", 1000, false, Some(coffee.id)).await;

        let products = repo.list_active_products().await.unwrap();
        let names: Vec<_> = products.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, ["Americano", "Mocha", "Milk Tea"]);
        assert!(products.iter().all(|p| p.is_active));
        assert_eq!(products[0].category.as_deref(), Some("Coffee"));
        assert_eq!(products[0].price, Money::from_cents(2500));
    }

    #[tokio::test]
    async fn test_categories_sorted_by_name() {
        let pool = connect_in_memory().await.unwrap();
        let repo = CatalogRepository::new(&pool);

        repo.create_category("Tea", None).await.unwrap();
        repo.create_category("Dessert", Some("Cakes and snacks")).await.unwrap();
        repo.create_category("Coffee", None).await.unwrap();

        let categories = repo.list_categories().await.unwrap();
        let names: Vec<_> = categories.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["Coffee", "Dessert", "Tea"]);
        assert_eq!(categories[1].description.as_deref(), Some("Cakes and snacks"));
        assert_eq!(repo.category_count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_duplicate_category_is_conflict() {
        let pool = connect_in_memory().await.unwrap();
        let repo = CatalogRepository::new(&pool);

        repo.create_category("Coffee", None).await.unwrap();
        let err = repo.create_category("Coffee", None).await.unwrap_err();
        assert!(matches!(err, RepositoryError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_product_with_unknown_category_is_rejected() {
        let pool = connect_in_memory().await.unwrap();
        let repo = CatalogRepository::new(&pool);

        let result = repo
            .create_product(&NewProduct {
                name: "Ghost".to_owned(),
                price: Money::from_cents(100),
                is_active: true,
                category_id: Some(CategoryId::new(99)),
            })
            .await;
        assert!(matches!(result, Err(RepositoryError::Database(_))));
    }
}
