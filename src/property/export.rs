use serde::Serialize;

use super::{DesignProperty, PropertyKind, PropertyType};

/// Exported shape of a property, as written under `designProperties`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportProperty {
    pub name: String,
    pub description: String,
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    #[serde(rename = "oldNames", skip_serializing_if = "Vec::is_empty")]
    pub old_names: Vec<String>,
    #[serde(flatten)]
    pub value: ExportValue,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExportValue {
    Toggle {
        #[serde(rename = "class")]
        class_name: String,
    },
    Dropdown {
        options: Vec<ExportOption>,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExportOption {
    pub name: String,
    #[serde(rename = "class")]
    pub class_name: String,
}

impl DesignProperty {
    /// Export form, or `None` while the property is ignored.
    /// Incomplete dropdown options are dropped.
    pub fn to_export_form(&self) -> Option<ExportProperty> {
        if self.is_ignored() {
            return None;
        }

        let value = match &self.kind {
            PropertyKind::Toggle { class_name } => ExportValue::Toggle {
                class_name: class_name.clone(),
            },
            PropertyKind::Dropdown { options } => ExportValue::Dropdown {
                options: options
                    .iter()
                    .filter(|opt| opt.is_complete())
                    .map(|opt| ExportOption {
                        name: opt.name.clone(),
                        class_name: opt.class_name.clone(),
                    })
                    .collect(),
            },
        };

        Some(ExportProperty {
            name: self.name.clone(),
            description: self.description.clone(),
            property_type: self.property_type(),
            old_names: self.old_names.clone(),
            value,
        })
    }
}
