use std::fmt;
use uuid::Uuid;

/// Opaque option identifier, unique within its owning dropdown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OptionId(Uuid);

impl OptionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for OptionId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.hyphenated().fmt(f)
    }
}

/// One selectable entry of a dropdown property
#[derive(Debug, Clone, PartialEq)]
pub struct DropdownOption {
    id: OptionId,
    pub name: String,
    pub class_name: String,
}

impl DropdownOption {
    pub fn new(name: impl Into<String>, class_name: impl Into<String>) -> Self {
        Self {
            id: OptionId::new(),
            name: name.into(),
            class_name: class_name.into(),
        }
    }

    pub fn id(&self) -> OptionId {
        self.id
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_class_name(&mut self, class_name: impl Into<String>) {
        self.class_name = class_name.into();
    }

    /// Only options with both a name and a class are exported
    pub fn is_complete(&self) -> bool {
        !self.name.is_empty() && !self.class_name.is_empty()
    }
}

/// Remove the item at `from` and reinsert it at `to` in the shortened list.
/// Both indices must lie in `[0, len)`; otherwise nothing happens.
pub(crate) fn move_item<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    let len = items.len();
    if from >= len || to >= len {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_item_forward_is_rotation() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        assert!(move_item(&mut items, 1, 3));
        assert_eq!(items, vec!['a', 'c', 'd', 'b']);
    }

    #[test]
    fn test_move_item_backward() {
        let mut items = vec!['a', 'b', 'c', 'd'];
        assert!(move_item(&mut items, 3, 0));
        assert_eq!(items, vec!['d', 'a', 'b', 'c']);
    }

    #[test]
    fn test_move_item_same_index_keeps_order() {
        let mut items = vec!['a', 'b'];
        assert!(move_item(&mut items, 1, 1));
        assert_eq!(items, vec!['a', 'b']);
    }

    #[test]
    fn test_move_item_rejects_out_of_range() {
        let mut items = vec!['a', 'b'];
        assert!(!move_item(&mut items, 0, 2));
        assert!(!move_item(&mut items, 2, 0));
        let mut empty: Vec<char> = Vec::new();
        assert!(!move_item(&mut empty, 0, 0));
        assert_eq!(items, vec!['a', 'b']);
    }

    #[test]
    fn test_option_completeness() {
        assert!(DropdownOption::new("Small", "small").is_complete());
        assert!(!DropdownOption::new("", "small").is_complete());
        assert!(!DropdownOption::new("Small", "").is_complete());
    }
}
