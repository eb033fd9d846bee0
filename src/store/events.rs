use serde_json::Value;

/// What kind of mutation produced a change notification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    Populated,
    Reset,
    DocumentTypeChanged,
    ElementAdded,
    ElementRenamed,
    ElementDeleted,
    ElementsReordered,
    PropertyAdded,
    PropertyDeleted,
    PropertyMoved,
    PropertyUpdated,
}

/// Notification handed to listeners after every state change
#[derive(Debug)]
pub struct StoreChange<'a> {
    pub kind: ChangeKind,
    /// Freshly serialized export document
    pub document: &'a Value,
}

/// Handle returned by `subscribe`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

pub type Listener = Box<dyn FnMut(&StoreChange<'_>)>;
