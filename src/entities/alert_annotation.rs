//! Alert annotation entity - Annotation pairs of a single alert.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Alert annotation database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "AlertAnnotation")]
pub struct Model {
    /// Store-generated identifier
    #[sea_orm(primary_key, column_name = "ID")]
    pub id: i64,
    /// Owning alert
    #[sea_orm(column_name = "AlertID")]
    pub alert_id: i64,
    /// Annotation name
    #[sea_orm(column_name = "Annotation")]
    pub annotation: String,
    /// Annotation value
    #[sea_orm(column_name = "Value")]
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning alert
    #[sea_orm(
        belongs_to = "super::alert::Entity",
        from = "Column::AlertId",
        to = "super::alert::Column::Id"
    )]
    Alert,
}

impl Related<super::alert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alert.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
