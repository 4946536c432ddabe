//! Tickform - configuration form core for a ticker display panel
//!
//! A configuration form produces a flat stream of named text fields.
//! Tickform folds that stream into a nested JSON configuration (repeatable
//! ticker entries with a nested layout, one global sequence object), manages
//! the repeatable block list behind the form, and checks for newer releases.

pub mod blocks;
pub mod config;
pub mod form;
pub mod scalar;
pub mod update;
pub mod version;
pub mod visibility;

pub use blocks::{Block, BlockId, BlockList, Phase};
pub use config::PanelConfig;
pub use form::{FormEntry, SerializedForm, TickerEntry};
pub use scalar::ScalarValue;
pub use update::UpdateInfo;
pub use visibility::FieldVisibility;
