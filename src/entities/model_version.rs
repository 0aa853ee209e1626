//! Model version entity - The single-row schema version marker.
//! The service only ever reads it; bumping it is part of a manual schema upgrade.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Schema version marker model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Model")]
pub struct Model {
    /// Schema version string, e.g. `"0.1.0"`
    #[sea_orm(primary_key, auto_increment = false)]
    pub version: String,
}

/// `Model` has no relationships with other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
