//! UI selection state for a list, kept apart from the records themselves.
//!
//! `checked` is the multi-select batch for mass actions; `active` is the one
//! record whose action menu is open.

use std::collections::HashSet;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    checked: HashSet<String>,
    active: Option<String>,
}

impl Selection {
    pub fn is_checked(&self, id: &str) -> bool {
        self.checked.contains(id)
    }

    pub fn is_active(&self, id: &str) -> bool {
        self.active.as_deref() == Some(id)
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    pub fn checked_count(&self) -> usize {
        self.checked.len()
    }

    pub fn toggle_checked(&mut self, id: &str) {
        if !self.checked.remove(id) {
            self.checked.insert(id.to_string());
        }
    }

    pub fn set_checked<'a>(&mut self, ids: impl IntoIterator<Item = &'a str>, checked: bool) {
        for id in ids {
            if checked {
                self.checked.insert(id.to_string());
            } else {
                self.checked.remove(id);
            }
        }
    }

    /// Open the menu for `id`, closing any other.
    pub fn activate(&mut self, id: &str) {
        self.active = Some(id.to_string());
    }

    /// Clear every checked and active flag.
    pub fn clear(&mut self) {
        self.checked.clear();
        self.active = None;
    }

    /// True when `ids` is non-empty and every one is checked.
    pub fn all_checked<'a>(&self, ids: impl IntoIterator<Item = &'a str>) -> bool {
        let mut any = false;
        for id in ids {
            if !self.checked.contains(id) {
                return false;
            }
            any = true;
        }
        any
    }
}
