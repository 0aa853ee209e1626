//! Entity module - SeaORM entity definitions for the alert history tables.
//! Table and column names follow the established alert history schema so an
//! existing database can be used as-is.
//! Each entity has a Model struct for data and an Entity struct for operations.

pub mod alert;
pub mod alert_annotation;
pub mod alert_group;
pub mod alert_label;
pub mod common_annotation;
pub mod common_label;
pub mod group_label;
pub mod model_version;

// Re-export specific types to avoid conflicts
pub use alert::{Column as AlertColumn, Entity as Alert, Model as AlertModel};
pub use alert_annotation::{
    Column as AlertAnnotationColumn, Entity as AlertAnnotation, Model as AlertAnnotationModel,
};
pub use alert_group::{Column as AlertGroupColumn, Entity as AlertGroup, Model as AlertGroupModel};
pub use alert_label::{Column as AlertLabelColumn, Entity as AlertLabel, Model as AlertLabelModel};
pub use common_annotation::{
    Column as CommonAnnotationColumn, Entity as CommonAnnotation,
    Model as CommonAnnotationModel,
};
pub use common_label::{
    Column as CommonLabelColumn, Entity as CommonLabel, Model as CommonLabelModel,
};
pub use group_label::{Column as GroupLabelColumn, Entity as GroupLabel, Model as GroupLabelModel};
pub use model_version::{
    Column as ModelVersionColumn, Entity as ModelVersion, Model as ModelVersionModel,
};
