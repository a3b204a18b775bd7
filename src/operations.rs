/// Tab selection in the popup's current-tabs list

use std::collections::HashSet;

use crate::page_data::TabDescriptor;

/// Ids of the tabs checked for saving
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TabSelection {
    selected: HashSet<i32>,
}

impl TabSelection {
    /// Every tab starts out checked
    pub fn all(tabs: &[TabDescriptor]) -> TabSelection {
        TabSelection {
            selected: tabs.iter().map(|tab| tab.id).collect(),
        }
    }

    pub fn is_selected(&self, tab_id: i32) -> bool {
        self.selected.contains(&tab_id)
    }

    pub fn toggle(&mut self, tab_id: i32) {
        if !self.selected.remove(&tab_id) {
            self.selected.insert(tab_id);
        }
    }

    pub fn set_all(&mut self, tabs: &[TabDescriptor], checked: bool) {
        if checked {
            self.selected = tabs.iter().map(|tab| tab.id).collect();
        } else {
            self.selected.clear();
        }
    }

    pub fn all_selected(&self, tabs: &[TabDescriptor]) -> bool {
        tabs.iter().all(|tab| self.is_selected(tab.id))
    }

    /// Selected tabs, in window order
    pub fn selected_tabs(&self, tabs: &[TabDescriptor]) -> Vec<TabDescriptor> {
        tabs.iter().filter(|tab| self.is_selected(tab.id)).cloned().collect()
    }
}
