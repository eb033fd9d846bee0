//! Properties store
//!
//! The single owner of the working document: element name → ordered property
//! list, plus an explicit position index that defines element order. Every
//! mutator runs to completion and then notifies subscribed listeners with the
//! freshly serialized export document.
//!
//! One store is built per session and handed around by reference; there is no
//! global instance.
//!
//! Invalid keys or indices are silent no-ops. Mutators return `true` only when
//! state actually changed.

mod events;
mod views;

pub use events::{ChangeKind, Listener, ListenerId, StoreChange};
pub use views::{ClassRow, ElementView};

use std::collections::HashMap;
use std::fmt;
use tracing::{debug, error, info, warn};

use crate::codec::{self, DocumentType, ExtraFields, RecordWarning};
use crate::constants::document::{POSITION_MIDPOINT, POSITION_STEP};
use crate::error::LoadError;
use crate::property::{DesignProperty, PropertyId};

/// Summary of a successful `populate_from_json`
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub document_type: Option<DocumentType>,
    pub element_count: usize,
    pub property_count: usize,
    pub warnings: Vec<RecordWarning>,
}

pub struct PropertiesStore {
    elements: HashMap<String, Vec<DesignProperty>>,
    positions: HashMap<String, i64>,
    document_type: Option<DocumentType>,
    extra_fields: ExtraFields,
    has_persisted_data: bool,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener_id: u64,
}

impl Default for PropertiesStore {
    fn default() -> Self {
        Self {
            elements: HashMap::new(),
            positions: HashMap::new(),
            document_type: None,
            extra_fields: ExtraFields::default(),
            has_persisted_data: false,
            listeners: Vec::new(),
            next_listener_id: 0,
        }
    }
}

impl fmt::Debug for PropertiesStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PropertiesStore")
            .field("elements", &self.elements)
            .field("positions", &self.positions)
            .field("document_type", &self.document_type)
            .field("extra_fields", &self.extra_fields)
            .field("has_persisted_data", &self.has_persisted_data)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl PropertiesStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store and load `json` into it. Load errors leave the store empty.
    pub fn from_json(json: &str) -> Self {
        let mut store = Self::new();
        let _ = store.populate_from_json(json);
        store
    }

    pub fn document_type(&self) -> Option<DocumentType> {
        self.document_type
    }

    pub fn extra_fields(&self) -> &ExtraFields {
        &self.extra_fields
    }

    pub fn has_persisted_data(&self) -> bool {
        self.has_persisted_data
    }

    pub(crate) fn set_has_persisted_data(&mut self, state: bool) {
        self.has_persisted_data = state;
    }

    // ==========================================================================
    // Listeners
    // ==========================================================================

    pub fn subscribe(&mut self, listener: Listener) -> ListenerId {
        let id = ListenerId(self.next_listener_id);
        self.next_listener_id += 1;
        self.listeners.push((id, listener));
        id
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, kind: ChangeKind) {
        debug!(?kind, "store changed");
        if self.listeners.is_empty() {
            return;
        }
        let document = codec::serialize_document(self);
        let change = StoreChange { kind, document: &document };
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
    }

    // ==========================================================================
    // Whole-document operations
    // ==========================================================================

    /// Replace the whole document with `json`.
    ///
    /// All-or-nothing: on a structural failure the store is reset to empty,
    /// listeners are notified, and the error is returned for display.
    pub fn populate_from_json(&mut self, json: &str) -> Result<LoadReport, LoadError> {
        match codec::parse_document(json) {
            Ok(parsed) => {
                let report = LoadReport {
                    document_type: parsed.document_type,
                    element_count: parsed.elements.len(),
                    property_count: parsed.elements.values().map(Vec::len).sum(),
                    warnings: parsed.warnings,
                };
                self.elements = parsed.elements;
                self.positions = parsed.positions;
                self.document_type = parsed.document_type;
                self.extra_fields = parsed.extra_fields;

                info!(
                    document_type = ?report.document_type,
                    elements = report.element_count,
                    properties = report.property_count,
                    skipped = report.warnings.len(),
                    "Loaded design properties document"
                );
                self.notify(ChangeKind::Populated);
                Ok(report)
            }
            Err(e) => {
                error!(error = %e, "Failed to load design properties document, resetting store");
                self.reset();
                Err(e)
            }
        }
    }

    /// Drop all elements and document metadata
    pub fn reset(&mut self) {
        self.elements.clear();
        self.positions.clear();
        self.document_type = None;
        self.extra_fields = ExtraFields::default();
        self.notify(ChangeKind::Reset);
    }

    /// Switch between Web and Native. Web-only fields are kept in memory
    /// while Native so switching back restores them.
    pub fn set_document_type(&mut self, document_type: DocumentType) -> bool {
        if self.document_type == Some(document_type) {
            return false;
        }
        info!(from = ?self.document_type, to = %document_type, "Changing document type");
        self.document_type = Some(document_type);
        self.notify(ChangeKind::DocumentTypeChanged);
        true
    }

    // ==========================================================================
    // Elements
    // ==========================================================================

    /// Append an empty element after the current last one.
    /// An existing element of the same name is replaced.
    pub fn add_element(&mut self, name: &str) -> bool {
        let max_position = self.positions.values().copied().max().unwrap_or(0);
        if self.elements.contains_key(name) {
            warn!(element = %name, "Element already exists, replacing it");
        }
        self.elements.insert(name.to_string(), Vec::new());
        self.positions.insert(name.to_string(), max_position + POSITION_STEP);
        self.notify(ChangeKind::ElementAdded);
        true
    }

    /// Move list and position from `old` to `new`. An existing `new` is overwritten.
    pub fn rename_element(&mut self, old: &str, new: &str) -> bool {
        if new.is_empty() || old == new || !self.elements.contains_key(old) {
            return false;
        }
        let (Some(properties), Some(position)) = (self.elements.remove(old), self.positions.remove(old)) else {
            return false;
        };
        if self.elements.contains_key(new) {
            warn!(old = %old, new = %new, "Rename target exists, overwriting it");
        }
        self.elements.insert(new.to_string(), properties);
        self.positions.insert(new.to_string(), position);
        info!(old = %old, new = %new, "Renamed element");
        self.notify(ChangeKind::ElementRenamed);
        true
    }

    pub fn delete_element(&mut self, name: &str) -> bool {
        if self.positions.remove(name).is_none() {
            return false;
        }
        self.elements.remove(name);
        info!(element = %name, "Deleted element");
        self.notify(ChangeKind::ElementDeleted);
        true
    }

    /// Move the element rendered at `src_index` to `dst_index`.
    ///
    /// The moved element is parked on a half-step slot past its destination
    /// neighbour, then every position is renumbered `10, 20, 30, …`.
    pub fn reorder_elements(&mut self, src_index: usize, dst_index: usize) -> bool {
        if src_index == dst_index {
            return false;
        }
        let Some(name) = self.element_list().get(src_index).map(|el| el.name.to_string()) else {
            return false;
        };
        // Positions may have gaps after deletes; the slot maths needs them dense.
        self.renumber_positions();

        let modifier = if src_index < dst_index { 1 } else { 0 };
        let parked = (dst_index as i64 + modifier) * POSITION_STEP + POSITION_MIDPOINT;
        self.positions.insert(name.clone(), parked);
        self.renumber_positions();
        debug!(element = %name, from = src_index, to = dst_index, "Reordered element");
        self.notify(ChangeKind::ElementsReordered);
        true
    }

    fn renumber_positions(&mut self) {
        let mut order: Vec<(String, i64)> = self.positions.drain().collect();
        order.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        self.positions = order
            .into_iter()
            .enumerate()
            .map(|(index, (name, _))| (name, (index as i64 + 1) * POSITION_STEP))
            .collect();
    }

    // ==========================================================================
    // Properties
    // ==========================================================================

    /// Append `prop` to an existing element. Ids already in the store are refused.
    pub fn add_property_to_element(&mut self, element: &str, prop: DesignProperty) -> bool {
        if self.property(prop.id()).is_some() {
            warn!(element = %element, id = %prop.id(), "Property id already present in store");
            return false;
        }
        let Some(list) = self.elements.get_mut(element) else {
            return false;
        };
        debug!(element = %element, property = %prop.name, "Added property");
        list.push(prop);
        self.notify(ChangeKind::PropertyAdded);
        true
    }

    pub fn delete_property(&mut self, id: PropertyId) -> bool {
        let Some(element) = self.id_map().remove(&id) else {
            return false;
        };
        let Some(list) = self.elements.get_mut(&element) else {
            return false;
        };
        list.retain(|prop| prop.id() != id);
        info!(element = %element, id = %id, "Deleted property");
        self.notify(ChangeKind::PropertyDeleted);
        true
    }

    /// Remove at `from`, reinsert at `to` within one element
    pub fn move_within_element(&mut self, element: &str, from: usize, to: usize) -> bool {
        let Some(list) = self.elements.get_mut(element) else {
            return false;
        };
        if !crate::property::move_item(list, from, to) {
            return false;
        }
        self.notify(ChangeKind::PropertyMoved);
        true
    }

    /// Move a property from one element into another at `to` (clamped to the end)
    pub fn move_between_elements(&mut self, source: &str, from: usize, target: &str, to: usize) -> bool {
        if source == target {
            return self.move_within_element(source, from, to);
        }
        if !self.elements.contains_key(target) {
            return false;
        }
        let Some(source_list) = self.elements.get_mut(source) else {
            return false;
        };
        if from >= source_list.len() {
            return false;
        }
        let prop = source_list.remove(from);
        if let Some(target_list) = self.elements.get_mut(target) {
            let to = to.min(target_list.len());
            target_list.insert(to, prop);
        }
        self.notify(ChangeKind::PropertyMoved);
        true
    }

    /// Edit a property in place and notify listeners. `None` for an unknown id.
    pub fn update_property<R>(&mut self, id: PropertyId, edit: impl FnOnce(&mut DesignProperty) -> R) -> Option<R> {
        let prop = self.elements.values_mut().flatten().find(|prop| prop.id() == id)?;
        let result = edit(prop);
        self.notify(ChangeKind::PropertyUpdated);
        Some(result)
    }
}
