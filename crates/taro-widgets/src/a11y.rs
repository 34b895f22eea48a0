//! Accessibility descriptors exposed by form widgets.
//!
//! Terminal UIs have no DOM to hang ARIA attributes on, but the *contract*
//! is still testable: each widget can report the semantic tree a screen
//! reader would see.  Widgets expose an `access_nodes()` method returning
//! [`AccessNode`]s; hosts and tests read them to verify role and state
//! announcements.

/// Semantic role of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Combobox,
    Listbox,
    Option,
    Button,
    TextInput,
}

/// One node of a widget's semantic tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessNode {
    pub role: Role,
    /// Accessible name (label or display text).
    pub label: String,
    /// Expanded/collapsed state, for roles that open a popup.
    pub expanded: Option<bool>,
    /// Selected state, for option rows.
    pub selected: Option<bool>,
    /// Whether several options may be selected, for listboxes.
    pub multi_selectable: Option<bool>,
    pub disabled: bool,
}

impl AccessNode {
    pub fn new(role: Role, label: impl Into<String>) -> Self {
        Self {
            role,
            label: label.into(),
            expanded: None,
            selected: None,
            multi_selectable: None,
            disabled: false,
        }
    }

    pub fn expanded(mut self, expanded: bool) -> Self {
        self.expanded = Some(expanded);
        self
    }

    pub fn selected(mut self, selected: bool) -> Self {
        self.selected = Some(selected);
        self
    }

    pub fn multi_selectable(mut self, multi: bool) -> Self {
        self.multi_selectable = Some(multi);
        self
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }
}
