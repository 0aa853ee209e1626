//! Alert group entity - One row per received webhook notification.
//!
//! The `time` column is assigned by the service when the notification is saved,
//! never taken from the payload.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Alert group database model
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "AlertGroup")]
pub struct Model {
    /// Store-generated identifier
    #[sea_orm(primary_key, column_name = "ID")]
    pub id: i64,
    /// When the service received the notification
    pub time: DateTimeUtc,
    /// Name of the receiver the notification was routed to
    pub receiver: String,
    /// Group status, `"firing"` or `"resolved"`
    pub status: String,
    /// Backlink to the sending Alertmanager
    #[sea_orm(column_name = "externalURL")]
    pub external_url: String,
    /// Key identifying the group on the sender side
    #[sea_orm(column_name = "groupKey")]
    pub group_key: String,
}

/// Defines relationships between `AlertGroup` and its children
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    /// Labels the sender grouped by
    #[sea_orm(has_many = "super::group_label::Entity")]
    GroupLabels,
    /// Labels shared by every alert in the group
    #[sea_orm(has_many = "super::common_label::Entity")]
    CommonLabels,
    /// Annotations shared by every alert in the group
    #[sea_orm(has_many = "super::common_annotation::Entity")]
    CommonAnnotations,
    /// Individual alerts
    #[sea_orm(has_many = "super::alert::Entity")]
    Alerts,
}

impl Related<super::group_label::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::GroupLabels.def()
    }
}

impl Related<super::common_label::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommonLabels.def()
    }
}

impl Related<super::common_annotation::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::CommonAnnotations.def()
    }
}

impl Related<super::alert::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Alerts.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
