//! Bootstrap tasks, one per preparation step.

mod schema;
mod settings;
mod volume;

pub use schema::SchemaTask;
pub use settings::SettingsTask;
pub use volume::VolumeTask;
