//! Document codec
//!
//! Translates between the wire JSON document and in-memory design properties.
//! Parsing is lenient per record (malformed records are dropped with a warning)
//! and strict only about the `designProperties` object itself.

use serde_json::{Map, Value, json};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

use crate::constants::document::{
    CSS_FILES, DESIGN_PROPERTIES, NATIVE_EXPORT_FILE, PAGE_TEMPLATES, POSITION_STEP, WEB_EXPORT_FILE,
};
use crate::error::LoadError;
use crate::property::{DesignProperty, PropertyType};
use crate::store::PropertiesStore;

/// Document flavor, decided by the presence of web-only top-level fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentType {
    Web,
    Native,
}

impl DocumentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Web => "Web",
            Self::Native => "Native",
        }
    }

    /// Suggested file name when the document is downloaded
    pub fn export_file_name(document_type: Option<Self>) -> &'static str {
        match document_type {
            Some(Self::Native) => NATIVE_EXPORT_FILE,
            _ => WEB_EXPORT_FILE,
        }
    }
}

impl fmt::Display for DocumentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Web-only passthrough fields, kept verbatim
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtraFields {
    pub page_templates: Option<Value>,
    pub css_files: Option<Value>,
}

impl ExtraFields {
    pub fn is_empty(&self) -> bool {
        self.page_templates.is_none() && self.css_files.is_none()
    }
}

/// A property record that failed to parse and was left out of the load
#[derive(Debug, Clone, PartialEq)]
pub struct RecordWarning {
    pub element: String,
    pub record: Value,
}

impl fmt::Display for RecordWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unable to parse for {}: {}", self.element, self.record)
    }
}

/// Result of a successful document parse
#[derive(Debug, Default)]
pub struct ParsedDocument {
    pub elements: HashMap<String, Vec<DesignProperty>>,
    pub positions: HashMap<String, i64>,
    pub document_type: Option<DocumentType>,
    pub extra_fields: ExtraFields,
    pub warnings: Vec<RecordWarning>,
}

/// Starter documents offered when no persisted data exists
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentTemplate {
    EmptyWeb,
    EmptyNative,
}

impl DocumentTemplate {
    pub fn to_json(&self) -> String {
        let doc = match self {
            Self::EmptyWeb => json!({
                PAGE_TEMPLATES: "",
                CSS_FILES: [],
                DESIGN_PROPERTIES: {},
            }),
            Self::EmptyNative => json!({ DESIGN_PROPERTIES: {} }),
        };
        doc.to_string()
    }
}

/// Non-empty string field, or `None`
fn non_empty_str<'a>(record: &'a Value, key: &str) -> Option<&'a str> {
    record.get(key).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Parse one property record. Returns `None` instead of failing.
pub fn parse_property_record(raw: &Value) -> Option<DesignProperty> {
    let name = non_empty_str(raw, "name")?;
    let raw_type = non_empty_str(raw, "type")?;
    let description = non_empty_str(raw, "description")?;

    let old_names: Vec<String> = raw
        .get("oldNames")
        .and_then(Value::as_array)
        .map(|names| names.iter().filter_map(Value::as_str).map(str::to_string).collect())
        .unwrap_or_default();

    let prop = match PropertyType::parse(raw_type)? {
        PropertyType::Dropdown => {
            let options = raw.get("options")?.as_array()?;
            let options: Vec<(String, String)> = options
                .iter()
                .filter_map(|opt| {
                    let name = opt.get("name").and_then(Value::as_str)?.trim();
                    let class = opt.get("class").and_then(Value::as_str)?.trim();
                    (!name.is_empty() && !class.is_empty()).then(|| (name.to_string(), class.to_string()))
                })
                .collect();
            DesignProperty::dropdown(name, description, options)
        }
        PropertyType::Toggle => {
            let class = non_empty_str(raw, "class")?;
            DesignProperty::toggle(name, description, class)
        }
    };

    Some(prop.with_old_names(old_names))
}

/// Parse a whole document.
///
/// Fails only when the text is not JSON or `designProperties` is not an object.
/// Elements are positioned `10, 20, 30, …` in document order.
pub fn parse_document(json_text: &str) -> Result<ParsedDocument, LoadError> {
    let root: Value = serde_json::from_str(json_text)?;

    let design_properties = root
        .get(DESIGN_PROPERTIES)
        .and_then(Value::as_object)
        .ok_or(LoadError::MissingDesignProperties)?;

    let mut parsed = ParsedDocument::default();

    for (index, (element, records)) in design_properties.iter().enumerate() {
        let mut properties = Vec::new();
        match records.as_array() {
            Some(records) => {
                for record in records {
                    match parse_property_record(record) {
                        Some(prop) => properties.push(prop),
                        None => {
                            let warning = RecordWarning {
                                element: element.clone(),
                                record: record.clone(),
                            };
                            warn!(element = %element, record = %record, "{warning}");
                            parsed.warnings.push(warning);
                        }
                    }
                }
            }
            None => {
                let warning = RecordWarning {
                    element: element.clone(),
                    record: records.clone(),
                };
                warn!(element = %element, "property list is not an array, element loaded empty");
                parsed.warnings.push(warning);
            }
        }

        parsed.elements.insert(element.clone(), properties);
        parsed.positions.insert(element.clone(), (index as i64 + 1) * POSITION_STEP);
    }

    let page_templates = root.get(PAGE_TEMPLATES);
    let css_files = root.get(CSS_FILES);
    if page_templates.is_some() || css_files.is_some() {
        parsed.document_type = Some(DocumentType::Web);
        parsed.extra_fields = ExtraFields {
            page_templates: page_templates.filter(|v| !v.is_null()).cloned(),
            css_files: css_files.filter(|v| !v.is_null()).cloned(),
        };
    } else {
        parsed.document_type = Some(DocumentType::Native);
    }

    debug!(
        elements = parsed.elements.len(),
        warnings = parsed.warnings.len(),
        document_type = ?parsed.document_type,
        "parsed document"
    );

    Ok(parsed)
}

/// Build the export document from the store's current state.
///
/// Elements are written in position order; elements with nothing exportable are left out.
pub fn serialize_document(store: &PropertiesStore) -> Value {
    let mut root = Map::new();

    if store.document_type() == Some(DocumentType::Web) {
        let extra = store.extra_fields();
        if let Some(page_templates) = &extra.page_templates {
            root.insert(PAGE_TEMPLATES.to_string(), page_templates.clone());
        }
        if let Some(css_files) = &extra.css_files {
            root.insert(CSS_FILES.to_string(), css_files.clone());
        }
    }

    let mut design_properties = Map::new();
    for element in store.element_list() {
        let exported: Vec<Value> = element
            .properties
            .iter()
            .filter_map(DesignProperty::to_export_form)
            .filter_map(|form| serde_json::to_value(form).ok())
            .collect();
        if !exported.is_empty() {
            design_properties.insert(element.name.to_string(), Value::Array(exported));
        }
    }
    root.insert(DESIGN_PROPERTIES.to_string(), Value::Object(design_properties));

    Value::Object(root)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::property::PropertyKind;

    #[test]
    fn test_parse_toggle_record() {
        let prop = parse_property_record(&json!({
            "name": "Bold", "description": "Bold text", "type": "toggle", "class": "bold", "oldNames": ["Heavy"]
        }))
        .unwrap();
        assert_eq!(prop.name, "Bold");
        assert_eq!(prop.class_name(), Some("bold"));
        assert_eq!(prop.old_names(), ["Heavy".to_string()]);
    }

    #[test]
    fn test_parse_record_requires_base_fields() {
        assert!(parse_property_record(&json!({"name": "Bold", "type": "Toggle", "class": "bold"})).is_none());
        assert!(parse_property_record(&json!({"description": "d", "type": "Toggle", "class": "bold"})).is_none());
        assert!(parse_property_record(&json!({"name": "Bold", "description": "d", "class": "bold"})).is_none());
        assert!(parse_property_record(&json!("not a record")).is_none());
    }

    #[test]
    fn test_parse_toggle_without_class_is_none() {
        assert!(parse_property_record(&json!({"name": "Bold", "description": "d", "type": "Toggle"})).is_none());
        assert!(
            parse_property_record(&json!({"name": "Bold", "description": "d", "type": "Toggle", "class": ""}))
                .is_none()
        );
    }

    #[test]
    fn test_parse_unknown_type_is_none() {
        assert!(
            parse_property_record(&json!({"name": "S", "description": "d", "type": "Slider", "class": "s"}))
                .is_none()
        );
    }

    #[test]
    fn test_parse_dropdown_requires_options_array() {
        assert!(parse_property_record(&json!({"name": "S", "description": "d", "type": "Dropdown"})).is_none());
        assert!(
            parse_property_record(&json!({"name": "S", "description": "d", "type": "Dropdown", "options": {}}))
                .is_none()
        );
    }

    #[test]
    fn test_parse_dropdown_trims_and_filters_options() {
        let prop = parse_property_record(&json!({
            "name": "Size",
            "description": "Spacing",
            "type": "DROPDOWN",
            "options": [
                {"name": " Small ", "class": " small "},
                {"name": "NoClass"},
                {"name": "   ", "class": "blank"},
                {"name": "Large", "class": "large"}
            ]
        }))
        .unwrap();

        let PropertyKind::Dropdown { options } = prop.kind() else {
            panic!("expected dropdown");
        };
        let pairs: Vec<(&str, &str)> = options.iter().map(|o| (o.name.as_str(), o.class_name.as_str())).collect();
        assert_eq!(pairs, vec![("Small", "small"), ("Large", "large")]);
    }

    #[test]
    fn test_parse_document_positions_follow_key_order() {
        let parsed = parse_document(r#"{"designProperties":{"Zeta":[],"Alpha":[],"Mid":[]}}"#).unwrap();
        assert_eq!(parsed.positions["Zeta"], 10);
        assert_eq!(parsed.positions["Alpha"], 20);
        assert_eq!(parsed.positions["Mid"], 30);
        assert_eq!(parsed.document_type, Some(DocumentType::Native));
        assert!(parsed.extra_fields.is_empty());
    }

    #[test]
    fn test_parse_document_rejects_missing_design_properties() {
        assert!(matches!(parse_document(r#"{"cssFiles":[]}"#), Err(LoadError::MissingDesignProperties)));
        assert!(matches!(
            parse_document(r#"{"designProperties":[1,2]}"#),
            Err(LoadError::MissingDesignProperties)
        ));
        assert!(matches!(parse_document("{not json"), Err(LoadError::InvalidJson(_))));
    }

    #[test]
    fn test_parse_document_web_extra_fields() {
        let parsed =
            parse_document(r#"{"pageTemplates":"templates","cssFiles":["a.css"],"designProperties":{}}"#).unwrap();
        assert_eq!(parsed.document_type, Some(DocumentType::Web));
        assert_eq!(parsed.extra_fields.page_templates, Some(json!("templates")));
        assert_eq!(parsed.extra_fields.css_files, Some(json!(["a.css"])));

        let css_only = parse_document(r#"{"cssFiles":[],"designProperties":{}}"#).unwrap();
        assert_eq!(css_only.document_type, Some(DocumentType::Web));
        assert_eq!(css_only.extra_fields.page_templates, None);
    }

    #[test]
    fn test_parse_document_collects_record_warnings() {
        let parsed = parse_document(
            r#"{"designProperties":{"Button":[
                {"name":"Bold","description":"d","type":"Toggle","class":"bold"},
                {"name":"Broken","type":"Toggle","class":"broken"}
            ]}}"#,
        )
        .unwrap();
        assert_eq!(parsed.elements["Button"].len(), 1);
        assert_eq!(parsed.warnings.len(), 1);
        assert_eq!(parsed.warnings[0].element, "Button");
        assert_eq!(parsed.warnings[0].record["name"], "Broken");
    }

    #[test]
    fn test_parse_document_non_array_element_loads_empty() {
        let parsed = parse_document(r#"{"designProperties":{"Button":"oops"}}"#).unwrap();
        assert!(parsed.elements["Button"].is_empty());
        assert_eq!(parsed.positions["Button"], 10);
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn test_templates_parse() {
        let web = parse_document(&DocumentTemplate::EmptyWeb.to_json()).unwrap();
        assert_eq!(web.document_type, Some(DocumentType::Web));
        let native = parse_document(&DocumentTemplate::EmptyNative.to_json()).unwrap();
        assert_eq!(native.document_type, Some(DocumentType::Native));
    }

    #[test]
    fn test_export_file_name() {
        assert_eq!(DocumentType::export_file_name(Some(DocumentType::Native)), "settings-native.json");
        assert_eq!(DocumentType::export_file_name(Some(DocumentType::Web)), "settings.json");
        assert_eq!(DocumentType::export_file_name(None), "settings.json");
    }
}
