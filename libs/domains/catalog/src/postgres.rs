use async_trait::async_trait;
use chrono::Utc;
use sea_orm::ActiveValue::{NotSet, Set};
use sea_orm::sea_query::{Alias, Expr, ExprTrait, Func, LikeExpr, OnConflict};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, DbErr, EntityTrait,
    FromQueryResult, IntoActiveModel, JoinType, Order, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, RelationTrait, SqlErr,
};

use crate::entity::{category, product, sub_category};
use crate::error::{CatalogError, CatalogResult};
use crate::models::{
    Category, NewProduct, Product, ProductListing, ProductStatus, ProductWithCategory, SubCategory,
    UNSPECIFIED_SUB_CATEGORY,
};
use crate::query::{Ordering, Predicate, ProductQuery, TextField, escape_like};
use crate::repository::CatalogRepository;

/// PostgreSQL implementation of CatalogRepository
#[derive(Clone)]
pub struct PgCatalogRepository {
    db: DatabaseConnection,
}

impl PgCatalogRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

/// Listing projection over `products ⋈ sub_categories ⋈ categories`
#[derive(Debug, FromQueryResult)]
struct ProductRow {
    id: i32,
    name: String,
    unit_price: f64,
    image: Option<String>,
    category_name: Option<String>,
}

impl From<ProductRow> for ProductListing {
    fn from(row: ProductRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            category_name: row.category_name,
            unit_price: row.unit_price,
            image: row.image,
        }
    }
}

fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

/// Upper-cased column expression a predicate field tests.
fn field_expr(field: TextField) -> Expr {
    let column = match field {
        TextField::ProductName => Expr::col((product::Entity, product::Column::Name)),
        TextField::CompactProductName => Func::cust(Alias::new("REPLACE"))
            .arg(Expr::col((product::Entity, product::Column::Name)))
            .arg(" ")
            .arg("")
            .into(),
        TextField::MerchandiseCode => {
            Expr::col((product::Entity, product::Column::MerchandiseCode))
        }
        TextField::CategoryName => Expr::col((category::Entity, category::Column::Name)),
    };
    Func::upper(column).into()
}

/// Translates a predicate tree into a SeaORM condition.
///
/// Needles are already upper-cased and matched literally: `escape_like`
/// prefixes wildcards with a backslash, declared as the `ESCAPE` character.
fn to_condition(predicate: &Predicate) -> Condition {
    match predicate {
        Predicate::Contains { field, needle } => Condition::all().add(
            field_expr(*field)
                .like(LikeExpr::new(format!("%{}%", escape_like(needle))).escape('\\')),
        ),
        Predicate::All(children) => children
            .iter()
            .fold(Condition::all(), |cond, child| cond.add(to_condition(child))),
        Predicate::Any(children) => children
            .iter()
            .fold(Condition::any(), |cond, child| cond.add(to_condition(child))),
    }
}

/// `CASE` expression ranking exact name matches 1, prefix matches 2, the rest 3.
fn relevance_expr(term: &str) -> Expr {
    let term = term.to_uppercase();
    Expr::case(field_expr(TextField::ProductName).eq(term.clone()), 1)
        .case(
            field_expr(TextField::ProductName)
                .like(LikeExpr::new(format!("{}%", escape_like(&term))).escape('\\')),
            2,
        )
        .finally(3)
        .into()
}

/// Largest value the driver binds as a signed 64-bit integer.
fn bind_limit(value: u64) -> u64 {
    Ord::min(value, i64::MAX as u64)
}

#[async_trait]
impl CatalogRepository for PgCatalogRepository {
    async fn find_category(&self, id: i32) -> CatalogResult<Option<Category>> {
        let model = category::Entity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Into::into))
    }

    async fn list_families(&self) -> CatalogResult<Vec<Category>> {
        let models = category::Entity::find()
            .filter(category::Column::Active.eq(true))
            .filter(category::Column::Unspecified.eq(false))
            .order_by_asc(category::Column::Name)
            .all(&self.db)
            .await?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn create_category(&self, name: &str) -> CatalogResult<Category> {
        let now = Utc::now();
        let model = category::ActiveModel {
            id: NotSet,
            name: Set(name.to_string()),
            active: Set(true),
            unspecified: Set(false),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        }
        .insert(&self.db)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                CatalogError::DuplicateName(name.to_string())
            } else {
                e.into()
            }
        })?;

        tracing::info!(category_id = model.id, "Created category");
        Ok(model.into())
    }

    async fn find_or_create_unspecified_sub_category(
        &self,
        category_id: i32,
    ) -> CatalogResult<SubCategory> {
        let now = Utc::now();
        let sentinel = sub_category::ActiveModel {
            id: NotSet,
            category_id: Set(category_id),
            name: Set(UNSPECIFIED_SUB_CATEGORY.to_string()),
            active: Set(true),
            unspecified: Set(true),
            created_at: Set(now.into()),
            updated_at: Set(now.into()),
        };

        // The no-op update makes RETURNING yield the existing row on conflict.
        let model = sub_category::Entity::insert(sentinel)
            .on_conflict(
                OnConflict::columns([
                    sub_category::Column::CategoryId,
                    sub_category::Column::Name,
                ])
                .update_column(sub_category::Column::Name)
                .to_owned(),
            )
            .exec_with_returning(&self.db)
            .await?;

        Ok(model.into())
    }

    async fn create_product(&self, input: NewProduct) -> CatalogResult<Product> {
        if self.code_exists(&input.merchandise_code).await? {
            return Err(CatalogError::DuplicateCode(input.merchandise_code));
        }

        let code = input.merchandise_code.clone();
        let active_model: product::ActiveModel = input.into();
        let model = active_model.insert(&self.db).await.map_err(|e| {
            if is_unique_violation(&e) {
                CatalogError::DuplicateCode(code)
            } else {
                e.into()
            }
        })?;

        tracing::info!(product_id = model.id, "Created product");
        Ok(model.into())
    }

    async fn get_product(&self, id: i32) -> CatalogResult<Option<ProductWithCategory>> {
        let Some(model) = product::Entity::find_by_id(id)
            .filter(product::Column::Status.eq(ProductStatus::Active))
            .filter(product::Column::DeletedAt.is_null())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };

        let category = sub_category::Entity::find_by_id(model.sub_category_id)
            .find_also_related(category::Entity)
            .one(&self.db)
            .await?
            .and_then(|(_, category)| category)
            .map(Into::into);

        Ok(Some(ProductWithCategory {
            product: model.into(),
            category,
        }))
    }

    async fn update_product(&self, product: Product) -> CatalogResult<Product> {
        let mut active_model = product::Entity::find_by_id(product.id)
            .one(&self.db)
            .await?
            .ok_or_else(|| CatalogError::not_found("Product", product.id))?
            .into_active_model();

        active_model.name = Set(product.name);
        active_model.unit_price = Set(product.unit_price);
        active_model.sub_category_id = Set(product.sub_category_id);
        active_model.image = Set(product.image);
        active_model.updated_at = Set(Utc::now().into());

        let model = active_model.update(&self.db).await?;

        tracing::info!(product_id = model.id, "Updated product");
        Ok(model.into())
    }

    async fn set_product_image(&self, id: i32, image: Option<String>) -> CatalogResult<()> {
        let result = product::Entity::update_many()
            .col_expr(product::Column::Image, Expr::value(image))
            .col_expr(product::Column::UpdatedAt, Expr::value(Utc::now()))
            .filter(product::Column::Id.eq(id))
            .exec(&self.db)
            .await?;

        if result.rows_affected == 0 {
            return Err(CatalogError::not_found("Product", id));
        }
        Ok(())
    }

    async fn soft_delete_product(&self, id: i32) -> CatalogResult<bool> {
        let now = Utc::now();
        let result = product::Entity::update_many()
            .col_expr(product::Column::DeletedAt, Expr::value(now))
            .col_expr(product::Column::UpdatedAt, Expr::value(now))
            .filter(product::Column::Id.eq(id))
            .filter(product::Column::Status.eq(ProductStatus::Active))
            .filter(product::Column::DeletedAt.is_null())
            .exec(&self.db)
            .await?;

        if result.rows_affected > 0 {
            tracing::info!(product_id = id, "Soft-deleted product");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn code_exists(&self, code: &str) -> CatalogResult<bool> {
        let count = product::Entity::find()
            .filter(product::Column::MerchandiseCode.eq(code))
            .count(&self.db)
            .await?;

        Ok(count > 0)
    }

    async fn query_products(&self, query: &ProductQuery) -> CatalogResult<(Vec<ProductListing>, u64)> {
        let mut select = product::Entity::find()
            .join(JoinType::LeftJoin, product::Relation::SubCategory.def())
            .join(JoinType::LeftJoin, sub_category::Relation::Category.def())
            .filter(product::Column::Status.eq(ProductStatus::Active))
            .filter(product::Column::DeletedAt.is_null());

        if let Some(category_id) = query.category_id {
            select = select.filter(category::Column::Id.eq(category_id));
        }
        if let Some(predicate) = &query.predicate {
            select = select.filter(to_condition(predicate));
        }

        let total = select.clone().count(&self.db).await?;
        if query.page.offset() >= total {
            tracing::debug!(total, page = query.page.page, "Page past the last match");
            return Ok((Vec::new(), total));
        }

        if let Ordering::RelevanceThenNewest { term } = &query.ordering {
            select = select.order_by(relevance_expr(term), Order::Asc);
        }

        let rows = select
            .order_by_desc(product::Column::Id)
            .select_only()
            .column(product::Column::Id)
            .column(product::Column::Name)
            .column(product::Column::UnitPrice)
            .column(product::Column::Image)
            .column_as(category::Column::Name, "category_name")
            .limit(bind_limit(query.page.limit))
            .offset(bind_limit(query.page.offset()))
            .into_model::<ProductRow>()
            .all(&self.db)
            .await?;

        tracing::debug!(total, returned = rows.len(), "Queried products");
        Ok((rows.into_iter().map(Into::into).collect(), total))
    }
}
