use sea_orm_migration::sea_query::extension::postgres::Type;
use sea_orm_migration::{prelude::*, schema::*};

use crate::m20250301_000001_create_categories::SubCategories;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_type(
                Type::create()
                    .as_enum(ProductStatus::Enum)
                    .values([ProductStatus::Active, ProductStatus::Inactive])
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Products::Table)
                    .if_not_exists()
                    .col(pk_auto(Products::Id))
                    .col(string_len(Products::Name, 200))
                    .col(string_len_uniq(Products::MerchandiseCode, 50))
                    .col(double(Products::UnitPrice).default(0.0))
                    .col(
                        ColumnDef::new(Products::Status)
                            .enumeration(
                                ProductStatus::Enum,
                                [ProductStatus::Active, ProductStatus::Inactive],
                            )
                            .not_null()
                            .default("active"),
                    )
                    .col(integer(Products::SubCategoryId))
                    .col(string_len_null(Products::Image, 255))
                    .col(timestamp_with_time_zone_null(Products::DeletedAt))
                    .col(
                        timestamp_with_time_zone(Products::CreatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        timestamp_with_time_zone(Products::UpdatedAt)
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_products_sub_category_id")
                            .from(Products::Table, Products::SubCategoryId)
                            .to(SubCategories::Table, SubCategories::Id)
                            .on_delete(ForeignKeyAction::Restrict),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .get_connection()
            .execute_unprepared(
                "ALTER TABLE products ADD CONSTRAINT ck_products_unit_price_non_negative CHECK (unit_price >= 0)",
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_sub_category_id")
                    .table(Products::Table)
                    .col(Products::SubCategoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_products_status_deleted_at")
                    .table(Products::Table)
                    .col(Products::Status)
                    .col(Products::DeletedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Products::Table).to_owned())
            .await?;

        manager
            .drop_type(Type::drop().name(ProductStatus::Enum).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Products {
    Table,
    Id,
    Name,
    MerchandiseCode,
    UnitPrice,
    Status,
    SubCategoryId,
    Image,
    DeletedAt,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum ProductStatus {
    #[sea_orm(iden = "product_status")]
    Enum,
    #[sea_orm(iden = "active")]
    Active,
    #[sea_orm(iden = "inactive")]
    Inactive,
}
