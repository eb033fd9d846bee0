//! Field validation rules
//!
//! Pure predicates an editor runs before calling store mutators. The store
//! itself never enforces these.

use regex::Regex;
use std::sync::LazyLock;

use crate::codec::DocumentType;
use crate::constants::validation::{CLASS_NAME_NATIVE, CLASS_NAME_WEB, DESIGN_PROPERTY};
use crate::store::PropertiesStore;

#[derive(Debug)]
pub struct ValidationRule {
    pub pattern: Regex,
    pub message: &'static str,
}

impl ValidationRule {
    fn new(pattern: &str, message: &'static str) -> Self {
        // Only ever built from `constants::validation`, each compiled in the tests
        let pattern = Regex::new(pattern).expect("built-in validation pattern must compile");
        Self { pattern, message }
    }

    pub fn is_valid(&self, value: &str) -> bool {
        self.pattern.is_match(value)
    }

    /// `Err(message)` when `value` breaks the rule
    pub fn check(&self, value: &str) -> Result<(), &'static str> {
        if self.is_valid(value) { Ok(()) } else { Err(self.message) }
    }
}

pub static DESIGN_PROPERTY_RULE: LazyLock<ValidationRule> = LazyLock::new(|| {
    ValidationRule::new(
        DESIGN_PROPERTY,
        "Design Property Elements can only consist of letters and dots (.)",
    )
});

pub static CLASS_NAME_NATIVE_RULE: LazyLock<ValidationRule> = LazyLock::new(|| {
    ValidationRule::new(
        CLASS_NAME_NATIVE,
        "Native classes can only be written as pascalCase (e.g. 'myAwesomeVariation')",
    )
});

pub static CLASS_NAME_WEB_RULE: LazyLock<ValidationRule> = LazyLock::new(|| {
    ValidationRule::new(
        CLASS_NAME_WEB,
        "Web classes should only use lowercase letters and hyphens (e.g. 'spacing-outer-bottom')",
    )
});

/// Class rule for the document flavor; unset documents only require non-empty
pub fn class_rule_for(document_type: Option<DocumentType>) -> Option<&'static ValidationRule> {
    match document_type {
        Some(DocumentType::Native) => Some(&*CLASS_NAME_NATIVE_RULE),
        Some(DocumentType::Web) => Some(&*CLASS_NAME_WEB_RULE),
        None => None,
    }
}

/// Validate a class name against the store's current document type
pub fn check_class_name(store: &PropertiesStore, class_name: &str) -> Result<(), &'static str> {
    if class_name.is_empty() {
        return Err("A class name is required for this property, otherwise it is ignored");
    }
    match class_rule_for(store.document_type()) {
        Some(rule) => rule.check(class_name),
        None => Ok(()),
    }
}

pub fn is_unique_element_name(store: &PropertiesStore, name: &str) -> bool {
    !store.element_names().iter().any(|existing| existing == name)
}

pub fn is_unique_property_name(store: &PropertiesStore, element: &str, name: &str) -> bool {
    !store.property_names_of(element).iter().any(|existing| existing == name)
}
