use async_trait::async_trait;
use chrono::Utc;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, NewProduct, Product, ProductListing, ProductStatus, ProductWithCategory, SubCategory,
    UNSPECIFIED_SUB_CATEGORY,
};
use crate::query::{Ordering, ProductQuery, TextField, relevance_rank};

/// Repository trait for catalog persistence
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// Get a category by ID
    async fn find_category(&self, id: i32) -> CatalogResult<Option<Category>>;

    /// Active, non-sentinel categories ordered by name
    async fn list_families(&self) -> CatalogResult<Vec<Category>>;

    /// Create a category; `DuplicateName` if the name is taken
    async fn create_category(&self, name: &str) -> CatalogResult<Category>;

    /// The category's UNSPECIFIED sub-category, created on first use
    async fn find_or_create_unspecified_sub_category(
        &self,
        category_id: i32,
    ) -> CatalogResult<SubCategory>;

    /// Insert an active product without image; `DuplicateCode` if the code is taken
    async fn create_product(&self, input: NewProduct) -> CatalogResult<Product>;

    /// Get a listed (active, not deleted) product with its category
    async fn get_product(&self, id: i32) -> CatalogResult<Option<ProductWithCategory>>;

    /// Persist name, price, sub-category and image of an existing product
    async fn update_product(&self, product: Product) -> CatalogResult<Product>;

    /// Set or clear the stored image filename
    async fn set_product_image(&self, id: i32, image: Option<String>) -> CatalogResult<()>;

    /// Mark a product deleted; returns false if it was not listed
    async fn soft_delete_product(&self, id: i32) -> CatalogResult<bool>;

    /// Whether any product, deleted or not, uses this merchandise code
    async fn code_exists(&self, code: &str) -> CatalogResult<bool>;

    /// One page of listed products plus the total match count
    async fn query_products(&self, query: &ProductQuery) -> CatalogResult<(Vec<ProductListing>, u64)>;
}

#[derive(Debug, Default)]
struct CatalogState {
    categories: HashMap<i32, Category>,
    sub_categories: HashMap<i32, SubCategory>,
    products: BTreeMap<i32, Product>,
    last_id: i32,
}

impl CatalogState {
    fn next_id(&mut self) -> i32 {
        self.last_id += 1;
        self.last_id
    }

    fn category_of(&self, product: &Product) -> Option<&Category> {
        self.sub_categories
            .get(&product.sub_category_id)
            .and_then(|sub| self.categories.get(&sub.category_id))
    }
}

/// In-memory implementation of CatalogRepository (for testing/development)
#[derive(Debug, Default, Clone)]
pub struct InMemoryCatalogRepository {
    state: Arc<RwLock<CatalogState>>,
}

impl InMemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Change a product's status directly; there is no service operation for it.
    pub async fn set_status(&self, id: i32, status: ProductStatus) {
        if let Some(product) = self.state.write().await.products.get_mut(&id) {
            product.status = status;
        }
    }
}

#[async_trait]
impl CatalogRepository for InMemoryCatalogRepository {
    async fn find_category(&self, id: i32) -> CatalogResult<Option<Category>> {
        Ok(self.state.read().await.categories.get(&id).cloned())
    }

    async fn list_families(&self) -> CatalogResult<Vec<Category>> {
        let state = self.state.read().await;
        let mut families: Vec<Category> = state
            .categories
            .values()
            .filter(|c| c.active && !c.unspecified)
            .cloned()
            .collect();
        families.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(families)
    }

    async fn create_category(&self, name: &str) -> CatalogResult<Category> {
        let mut state = self.state.write().await;
        if state.categories.values().any(|c| c.name == name) {
            return Err(CatalogError::DuplicateName(name.to_string()));
        }

        let category = Category {
            id: state.next_id(),
            name: name.to_string(),
            active: true,
            unspecified: false,
            created_at: Utc::now(),
        };
        state.categories.insert(category.id, category.clone());

        tracing::info!(category_id = category.id, "Created category");
        Ok(category)
    }

    async fn find_or_create_unspecified_sub_category(
        &self,
        category_id: i32,
    ) -> CatalogResult<SubCategory> {
        let mut state = self.state.write().await;
        if let Some(existing) = state
            .sub_categories
            .values()
            .find(|s| s.category_id == category_id && s.name == UNSPECIFIED_SUB_CATEGORY)
        {
            return Ok(existing.clone());
        }

        let sub_category = SubCategory {
            id: state.next_id(),
            category_id,
            name: UNSPECIFIED_SUB_CATEGORY.to_string(),
            active: true,
            unspecified: true,
        };
        state
            .sub_categories
            .insert(sub_category.id, sub_category.clone());

        tracing::info!(category_id, sub_category_id = sub_category.id, "Created UNSPECIFIED sub-category");
        Ok(sub_category)
    }

    async fn create_product(&self, input: NewProduct) -> CatalogResult<Product> {
        let mut state = self.state.write().await;
        if state
            .products
            .values()
            .any(|p| p.merchandise_code == input.merchandise_code)
        {
            return Err(CatalogError::DuplicateCode(input.merchandise_code));
        }

        let now = Utc::now();
        let product = Product {
            id: state.next_id(),
            name: input.name,
            merchandise_code: input.merchandise_code,
            unit_price: input.unit_price,
            status: ProductStatus::Active,
            sub_category_id: input.sub_category_id,
            image: None,
            deleted_at: None,
            created_at: now,
            updated_at: now,
        };
        state.products.insert(product.id, product.clone());

        tracing::info!(product_id = product.id, "Created product");
        Ok(product)
    }

    async fn get_product(&self, id: i32) -> CatalogResult<Option<ProductWithCategory>> {
        let state = self.state.read().await;
        Ok(state
            .products
            .get(&id)
            .filter(|p| p.is_listed())
            .map(|product| ProductWithCategory {
                product: product.clone(),
                category: state.category_of(product).cloned(),
            }))
    }

    async fn update_product(&self, product: Product) -> CatalogResult<Product> {
        let mut state = self.state.write().await;
        let stored = state
            .products
            .get_mut(&product.id)
            .ok_or_else(|| CatalogError::not_found("Product", product.id))?;

        stored.name = product.name;
        stored.unit_price = product.unit_price;
        stored.sub_category_id = product.sub_category_id;
        stored.image = product.image;
        stored.updated_at = Utc::now();

        tracing::info!(product_id = stored.id, "Updated product");
        Ok(stored.clone())
    }

    async fn set_product_image(&self, id: i32, image: Option<String>) -> CatalogResult<()> {
        let mut state = self.state.write().await;
        let product = state
            .products
            .get_mut(&id)
            .ok_or_else(|| CatalogError::not_found("Product", id))?;
        product.image = image;
        product.updated_at = Utc::now();
        Ok(())
    }

    async fn soft_delete_product(&self, id: i32) -> CatalogResult<bool> {
        let mut state = self.state.write().await;
        match state.products.get_mut(&id).filter(|p| p.is_listed()) {
            Some(product) => {
                product.deleted_at = Some(Utc::now());
                tracing::info!(product_id = id, "Soft-deleted product");
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn code_exists(&self, code: &str) -> CatalogResult<bool> {
        let state = self.state.read().await;
        Ok(state.products.values().any(|p| p.merchandise_code == code))
    }

    async fn query_products(&self, query: &ProductQuery) -> CatalogResult<(Vec<ProductListing>, u64)> {
        let state = self.state.read().await;

        let mut matches: Vec<(&Product, Option<&Category>)> = state
            .products
            .values()
            .filter(|p| p.is_listed())
            .map(|p| (p, state.category_of(p)))
            .filter(|(_, category)| match query.category_id {
                Some(id) => category.is_some_and(|c| c.id == id),
                None => true,
            })
            .filter(|(product, category)| {
                let Some(predicate) = &query.predicate else {
                    return true;
                };
                let compact: String = product.name.chars().filter(|c| *c != ' ').collect();
                let category_name = category.map(|c| c.name.as_str()).unwrap_or_default();
                predicate.matches(&|field| match field {
                    TextField::ProductName => product.name.as_str(),
                    TextField::CompactProductName => compact.as_str(),
                    TextField::MerchandiseCode => product.merchandise_code.as_str(),
                    TextField::CategoryName => category_name,
                })
            })
            .collect();

        match &query.ordering {
            Ordering::Newest => matches.sort_by(|a, b| b.0.id.cmp(&a.0.id)),
            Ordering::RelevanceThenNewest { term } => matches.sort_by(|a, b| {
                relevance_rank(&a.0.name, term)
                    .cmp(&relevance_rank(&b.0.name, term))
                    .then(b.0.id.cmp(&a.0.id))
            }),
        }

        let total = matches.len() as u64;
        let items = matches
            .into_iter()
            .skip(query.page.offset() as usize)
            .take(query.page.limit as usize)
            .map(|(product, category)| ProductListing {
                id: product.id,
                name: product.name.clone(),
                category_name: category.map(|c| c.name.clone()),
                unit_price: product.unit_price,
                image: product.image.clone(),
            })
            .collect();

        Ok((items, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::PageRequest;

    async fn seeded() -> (InMemoryCatalogRepository, i32) {
        let repo = InMemoryCatalogRepository::new();
        let category = repo.create_category("Fluids").await.unwrap();
        let sub = repo
            .find_or_create_unspecified_sub_category(category.id)
            .await
            .unwrap();
        for (i, name) in ["Water Pump", "Pump X", "Pump", "Hose"].iter().enumerate() {
            repo.create_product(NewProduct {
                merchandise_code: format!("P-{}", i),
                name: name.to_string(),
                unit_price: 10.0,
                sub_category_id: sub.id,
            })
            .await
            .unwrap();
        }
        (repo, category.id)
    }

    #[tokio::test]
    async fn test_unspecified_sub_category_created_once() {
        let repo = InMemoryCatalogRepository::new();
        let category = repo.create_category("Tools").await.unwrap();

        let first = repo
            .find_or_create_unspecified_sub_category(category.id)
            .await
            .unwrap();
        let second = repo
            .find_or_create_unspecified_sub_category(category.id)
            .await
            .unwrap();

        assert_eq!(first.id, second.id);
        assert!(first.unspecified);
        assert_eq!(first.name, UNSPECIFIED_SUB_CATEGORY);
    }

    #[tokio::test]
    async fn test_duplicate_code_and_name() {
        let (repo, _) = seeded().await;

        let err = repo
            .create_product(NewProduct {
                merchandise_code: "P-0".into(),
                name: "Again".into(),
                unit_price: 1.0,
                sub_category_id: 1,
            })
            .await
            .unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateCode(_)));

        let err = repo.create_category("Fluids").await.unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateName(_)));
    }

    #[tokio::test]
    async fn test_relevance_ordering() {
        let (repo, _) = seeded().await;

        let query = ProductQuery::search("Pump", None, PageRequest::default()).unwrap();
        let (items, total) = repo.query_products(&query).await.unwrap();

        let names: Vec<&str> = items.iter().map(|i| i.name.as_str()).collect();
        assert_eq!(names, ["Pump", "Pump X", "Water Pump"]);
        assert_eq!(total, 3);
    }

    #[tokio::test]
    async fn test_search_matches_category_name() {
        let (repo, _) = seeded().await;

        let query = ProductQuery::search("fluid", None, PageRequest::default()).unwrap();
        let (items, total) = repo.query_products(&query).await.unwrap();

        assert_eq!(total, 4);
        assert!(items.iter().any(|i| i.name == "Hose"));
    }

    #[tokio::test]
    async fn test_listing_excludes_deleted_and_inactive() {
        let (repo, category_id) = seeded().await;
        let (items, _) = repo
            .query_products(&ProductQuery::list(Some(category_id), PageRequest::default()))
            .await
            .unwrap();
        let newest = items[0].id;
        let oldest = items[3].id;

        assert!(repo.soft_delete_product(newest).await.unwrap());
        assert!(!repo.soft_delete_product(newest).await.unwrap());
        repo.set_status(oldest, ProductStatus::Inactive).await;

        let (items, total) = repo
            .query_products(&ProductQuery::list(None, PageRequest::default()))
            .await
            .unwrap();
        assert_eq!(total, 2);
        assert!(items.iter().all(|i| i.id != newest && i.id != oldest));
        assert!(repo.get_product(newest).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_pagination_window_and_count() {
        let (repo, _) = seeded().await;

        let (items, total) = repo
            .query_products(&ProductQuery::list(None, PageRequest::new(2, 3)))
            .await
            .unwrap();
        assert_eq!(total, 4);
        assert_eq!(items.len(), 1);

        let (items, total) = repo
            .query_products(&ProductQuery::list(None, PageRequest::new(9, 3)))
            .await
            .unwrap();
        assert_eq!(total, 4);
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_category_filter() {
        let (repo, category_id) = seeded().await;
        let other = repo.create_category("Other").await.unwrap();

        let (_, total) = repo
            .query_products(&ProductQuery::list(Some(category_id), PageRequest::default()))
            .await
            .unwrap();
        assert_eq!(total, 4);

        let (items, total) = repo
            .query_products(&ProductQuery::list(Some(other.id), PageRequest::default()))
            .await
            .unwrap();
        assert_eq!(total, 0);
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_families_sorted_without_sentinel() {
        let repo = InMemoryCatalogRepository::new();
        repo.create_category("Zinc").await.unwrap();
        repo.create_category("Adhesives").await.unwrap();
        repo.state.write().await.categories.insert(
            99,
            Category {
                id: 99,
                name: "UNSPECIFIED".into(),
                active: true,
                unspecified: true,
                created_at: Utc::now(),
            },
        );

        let names: Vec<String> = repo
            .list_families()
            .await
            .unwrap()
            .into_iter()
            .map(|c| c.name)
            .collect();
        assert_eq!(names, ["Adhesives", "Zinc"]);
    }
}
