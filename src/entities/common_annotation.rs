//! Common annotation entity - Annotations shared by every alert of a notification.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Common annotation database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "CommonAnnotation")]
pub struct Model {
    /// Store-generated identifier
    #[sea_orm(primary_key, column_name = "ID")]
    pub id: i64,
    /// Owning alert group
    #[sea_orm(column_name = "AlertGroupID")]
    pub alert_group_id: i64,
    /// Annotation name
    #[sea_orm(column_name = "Annotation")]
    pub annotation: String,
    /// Annotation value
    #[sea_orm(column_name = "Value")]
    pub value: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Owning alert group
    #[sea_orm(
        belongs_to = "super::alert_group::Entity",
        from = "Column::AlertGroupId",
        to = "super::alert_group::Column::Id"
    )]
    AlertGroup,
}

impl Related<super::alert_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AlertGroup.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
