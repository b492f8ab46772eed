//! Storage entry entity - one row per document key.
//! Each row holds the full JSON serialization of a collection or a scalar
//! slot (session, remember-token), addressed by a fixed string key.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Key/value row holding one JSON document
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "storage_entries")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Document key (e.g., `"fds_users"`)
    #[sea_orm(unique)]
    pub key: String,
    /// JSON document text
    #[sea_orm(column_type = "Text")]
    pub value: String,
    /// When this document was last rewritten
    pub updated_at: DateTime,
}

/// `StorageEntry` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
