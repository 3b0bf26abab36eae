//! SeaORM entities for the catalog tables (schema owned by the `migration` crate).

pub mod category;
pub mod product;
pub mod sub_category;
