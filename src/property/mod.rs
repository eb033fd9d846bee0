//! Design property entities
//!
//! A design property is either a Toggle (one class) or a Dropdown (an ordered
//! list of named classes). Both share a base record of name, description and
//! old names; the variant lives in [`PropertyKind`].

mod dropdown;
mod export;

pub use dropdown::{DropdownOption, OptionId};
pub(crate) use dropdown::move_item;
pub use export::{ExportOption, ExportProperty, ExportValue};

use serde::Serialize;
use std::fmt;
use uuid::Uuid;

/// Opaque, session-unique property identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PropertyId(Uuid);

impl PropertyId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PropertyId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for PropertyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

impl std::str::FromStr for PropertyId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Property type tag as written in documents ("Toggle" / "Dropdown")
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum PropertyType {
    Toggle,
    Dropdown,
}

impl PropertyType {
    /// Case-insensitive match against the document's `type` field
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.to_uppercase().as_str() {
            "TOGGLE" => Some(Self::Toggle),
            "DROPDOWN" => Some(Self::Dropdown),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Toggle => "Toggle",
            Self::Dropdown => "Dropdown",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Variant-specific payload
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyKind {
    Toggle { class_name: String },
    Dropdown { options: Vec<DropdownOption> },
}

/// A single design property attached to an element
#[derive(Debug, Clone, PartialEq)]
pub struct DesignProperty {
    id: PropertyId,
    pub name: String,
    pub description: String,
    old_names: Vec<String>,
    kind: PropertyKind,
}

impl DesignProperty {
    pub fn toggle(name: impl Into<String>, description: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            id: PropertyId::new(),
            name: name.into(),
            description: description.into(),
            old_names: Vec::new(),
            kind: PropertyKind::Toggle { class_name: class_name.into() },
        }
    }

    /// Build a dropdown; every option gets a fresh id
    pub fn dropdown<N, C>(
        name: impl Into<String>,
        description: impl Into<String>,
        options: impl IntoIterator<Item = (N, C)>,
    ) -> Self
    where
        N: Into<String>,
        C: Into<String>,
    {
        let options = options
            .into_iter()
            .map(|(name, class_name)| DropdownOption::new(name, class_name))
            .collect();
        Self {
            id: PropertyId::new(),
            name: name.into(),
            description: description.into(),
            old_names: Vec::new(),
            kind: PropertyKind::Dropdown { options },
        }
    }

    pub fn with_old_names(mut self, old_names: Vec<String>) -> Self {
        self.old_names = old_names;
        self
    }

    pub fn id(&self) -> PropertyId {
        self.id
    }

    pub fn property_type(&self) -> PropertyType {
        match self.kind {
            PropertyKind::Toggle { .. } => PropertyType::Toggle,
            PropertyKind::Dropdown { .. } => PropertyType::Dropdown,
        }
    }

    pub fn kind(&self) -> &PropertyKind {
        &self.kind
    }

    pub fn old_names(&self) -> &[String] {
        &self.old_names
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Replace the recorded prior names wholesale
    pub fn set_old_names(&mut self, names: Vec<String>) {
        self.old_names = names;
    }

    /// Toggle class; `None` when this is a dropdown
    pub fn class_name(&self) -> Option<&str> {
        match &self.kind {
            PropertyKind::Toggle { class_name } => Some(class_name),
            PropertyKind::Dropdown { .. } => None,
        }
    }

    /// Set the toggle class. Returns false (and changes nothing) for dropdowns.
    pub fn set_class_name(&mut self, class: impl Into<String>) -> bool {
        match &mut self.kind {
            PropertyKind::Toggle { class_name } => {
                *class_name = class.into();
                true
            }
            PropertyKind::Dropdown { .. } => false,
        }
    }

    /// Dropdown options; empty for toggles
    pub fn options(&self) -> &[DropdownOption] {
        match &self.kind {
            PropertyKind::Dropdown { options } => options,
            PropertyKind::Toggle { .. } => &[],
        }
    }

    /// Append an option, returning its id. `None` for toggles.
    pub fn add_option(&mut self, name: impl Into<String>, class_name: impl Into<String>) -> Option<OptionId> {
        match &mut self.kind {
            PropertyKind::Dropdown { options } => {
                let option = DropdownOption::new(name, class_name);
                let id = option.id();
                options.push(option);
                Some(id)
            }
            PropertyKind::Toggle { .. } => None,
        }
    }

    pub fn remove_option(&mut self, id: OptionId) -> bool {
        match &mut self.kind {
            PropertyKind::Dropdown { options } => {
                let before = options.len();
                options.retain(|opt| opt.id() != id);
                options.len() != before
            }
            PropertyKind::Toggle { .. } => false,
        }
    }

    /// Move an option; out-of-range indices are ignored
    pub fn move_option(&mut self, from: usize, to: usize) -> bool {
        match &mut self.kind {
            PropertyKind::Dropdown { options } => dropdown::move_item(options, from, to),
            PropertyKind::Toggle { .. } => false,
        }
    }

    pub fn option_mut(&mut self, id: OptionId) -> Option<&mut DropdownOption> {
        match &mut self.kind {
            PropertyKind::Dropdown { options } => options.iter_mut().find(|opt| opt.id() == id),
            PropertyKind::Toggle { .. } => None,
        }
    }

    /// Ignored properties stay editable but never reach the exported document
    pub fn is_ignored(&self) -> bool {
        match &self.kind {
            PropertyKind::Toggle { class_name } => class_name.is_empty(),
            PropertyKind::Dropdown { options } => !options.iter().any(DropdownOption::is_complete),
        }
    }

    /// Every non-empty class this property contributes, in option order
    pub fn class_names(&self) -> Vec<&str> {
        let classes: Vec<&str> = match &self.kind {
            PropertyKind::Toggle { class_name } => vec![class_name.as_str()],
            PropertyKind::Dropdown { options } => options.iter().map(|opt| opt.class_name.as_str()).collect(),
        };
        classes.into_iter().filter(|class| !class.is_empty()).collect()
    }
}
