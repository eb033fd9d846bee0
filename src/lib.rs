//! Design properties document model
//!
//! In-memory model of a design-properties document (named elements, each with
//! an ordered list of Toggle/Dropdown properties), its JSON codec, the
//! mutation/reordering store and a persistence bridge that mirrors the store
//! into a storage sink.

#![forbid(unsafe_code)]

pub mod codec;
pub mod config;
pub mod constants;
pub mod error;
pub mod persistence;
pub mod property;
pub mod store;
pub mod validation;

pub use codec::{DocumentTemplate, DocumentType, ExtraFields, RecordWarning};
pub use error::{LoadError, SinkError};
pub use property::{DesignProperty, DropdownOption, OptionId, PropertyId, PropertyKind, PropertyType};
pub use store::{ChangeKind, LoadReport, PropertiesStore, StoreChange};
