//! Derived read views over the store. Computed on every call.

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::collections::HashMap;

use super::PropertiesStore;
use crate::codec::serialize_document;
use crate::error::SinkError;
use crate::property::{DesignProperty, PropertyId};

/// One element in render order
#[derive(Debug, Clone, Copy)]
pub struct ElementView<'a> {
    pub name: &'a str,
    pub position: i64,
    pub properties: &'a [DesignProperty],
}

/// A class name together with where it is used
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassRow {
    pub element: String,
    pub property: String,
    pub class_name: String,
}

impl PropertiesStore {
    /// Elements sorted by position (ties broken by name)
    pub fn element_list(&self) -> Vec<ElementView<'_>> {
        let mut list: Vec<ElementView<'_>> = self
            .positions
            .iter()
            .filter_map(|(name, &position)| {
                self.elements.get(name).map(|properties| ElementView {
                    name: name.as_str(),
                    position,
                    properties: properties.as_slice(),
                })
            })
            .collect();
        list.sort_by(|a, b| a.position.cmp(&b.position).then_with(|| a.name.cmp(b.name)));
        list
    }

    pub fn export_json(&self) -> Value {
        serialize_document(self)
    }

    /// Export document as indented JSON text
    pub fn export_string(&self, indent: usize) -> Result<String, SinkError> {
        let indent = " ".repeat(indent);
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(indent.as_bytes());
        let mut serializer = Serializer::with_formatter(&mut buf, formatter);
        self.export_json().serialize(&mut serializer)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Every non-empty class with its element and property, in traversal order
    pub fn class_rows(&self) -> Vec<ClassRow> {
        self.element_list()
            .into_iter()
            .flat_map(|element| {
                element.properties.iter().flat_map(move |prop| {
                    prop.class_names().into_iter().map(move |class| ClassRow {
                        element: element.name.to_string(),
                        property: prop.name.clone(),
                        class_name: class.to_string(),
                    })
                })
            })
            .collect()
    }

    pub fn flat_class_names(&self) -> Vec<String> {
        self.class_rows().into_iter().map(|row| row.class_name).collect()
    }

    /// Current element names, in render order
    pub fn element_names(&self) -> Vec<String> {
        self.element_list().into_iter().map(|el| el.name.to_string()).collect()
    }

    /// Property names within one element; empty when the element is unknown
    pub fn property_names_of(&self, element: &str) -> Vec<String> {
        self.elements
            .get(element)
            .map(|props| props.iter().map(|prop| prop.name.clone()).collect())
            .unwrap_or_default()
    }

    pub fn properties_of(&self, element: &str) -> Option<&[DesignProperty]> {
        self.elements.get(element).map(Vec::as_slice)
    }

    pub fn position_of(&self, element: &str) -> Option<i64> {
        self.positions.get(element).copied()
    }

    pub fn property(&self, id: PropertyId) -> Option<&DesignProperty> {
        self.elements.values().flatten().find(|prop| prop.id() == id)
    }

    /// Property id → owning element name
    pub(super) fn id_map(&self) -> HashMap<PropertyId, String> {
        self.elements
            .iter()
            .flat_map(|(element, props)| props.iter().map(move |prop| (prop.id(), element.clone())))
            .collect()
    }
}
