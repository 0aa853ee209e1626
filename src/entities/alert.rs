//! Alert entity - One row per alert inside a notification.
//!
//! `ends_at` is `None` for alerts that are still open. The sender encodes that
//! case as an end time before the start time; the row never stores that value.
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Alert database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "Alert")]
pub struct Model {
    /// Store-generated identifier
    #[sea_orm(primary_key, column_name = "ID")]
    pub id: i64,
    /// Owning alert group
    #[sea_orm(column_name = "alertGroupID")]
    pub alert_group_id: i64,
    /// Alert status, `"firing"` or `"resolved"`
    pub status: String,
    /// When the alert started firing
    #[sea_orm(column_name = "startsAt")]
    pub starts_at: DateTimeUtc,
    /// When the alert stopped firing, if it has
    #[sea_orm(column_name = "endsAt")]
    pub ends_at: Option<DateTimeUtc>,
    /// Link to the expression that produced the alert
    #[sea_orm(column_name = "generatorURL")]
    pub generator_url: String,
    /// Sender-assigned identity of the alert
    pub fingerprint: String,
}

/// Defines relationships between Alert and other entities
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Each alert belongs to one alert group
    #[sea_orm(
        belongs_to = "super::alert_group::Entity",
        from = "Column::AlertGroupId",
        to = "super::alert_group::Column::Id"
    )]
    AlertGroup,
    /// One alert has many labels
    #[sea_orm(has_many = "super::alert_label::Entity")]
    Labels,
    /// One alert has many annotations
    #[sea_orm(has_many = "super::alert_annotation::Entity")]
    Annotations,
}

impl Related<super::alert_group::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::AlertGroup.def()
    }
}

impl Related<super::alert_label::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Labels.def()
    }
}

impl Related<super::alert_annotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Annotations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
