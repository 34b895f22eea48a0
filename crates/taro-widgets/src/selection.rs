//! Selection state for choice widgets: who owns the value, and how it
//! changes.
//!
//! A [`Selection`] runs in one of two regimes, fixed at construction:
//!
//! * **Uncontrolled** -- the widget owns the value.  Mutations apply
//!   immediately and are also reported to the host.
//! * **Controlled** -- the host owns the value.  Mutations are only
//!   *proposed*: the computed next value is returned for notification, and
//!   nothing changes locally until the host pushes a new snapshot with
//!   [`Selection::sync`].
//!
//! Switching regimes mid-lifetime is unsupported; `sync` on an uncontrolled
//! selection fails fast in debug builds.

use crate::choice::Choice;

/// The external shape of a selection value.
///
/// Single-select reports `Single(None)` when empty; multi-select reports the
/// ordered list of selected keys (insertion order, no duplicates).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    Single(Option<String>),
    Multi(Vec<String>),
}

impl Value {
    /// The canonical empty value for the given mode.
    pub fn empty(multiple: bool) -> Self {
        if multiple {
            Value::Multi(Vec::new())
        } else {
            Value::Single(None)
        }
    }

    /// Normalize to an ordered, duplicate-free list of keys.
    fn normalize(self) -> Vec<String> {
        match self {
            Value::Single(None) => Vec::new(),
            Value::Single(Some(v)) => vec![v],
            Value::Multi(list) => {
                let mut seen = Vec::with_capacity(list.len());
                for v in list {
                    if !seen.contains(&v) {
                        seen.push(v);
                    }
                }
                seen
            }
        }
    }

    fn from_list(list: &[String], multiple: bool) -> Self {
        if multiple {
            Value::Multi(list.to_vec())
        } else {
            Value::Single(list.first().cloned())
        }
    }
}

enum Store {
    Owned(Vec<String>),
    External(Vec<String>),
}

/// Selection state with controlled/uncontrolled value ownership.
pub struct Selection {
    store: Store,
    multiple: bool,
}

impl Selection {
    /// An uncontrolled, empty selection.
    pub fn uncontrolled(multiple: bool) -> Self {
        Self {
            store: Store::Owned(Vec::new()),
            multiple,
        }
    }

    /// Seed an uncontrolled selection with a default value.
    pub fn with_default(mut self, value: Value) -> Self {
        let list = self.clamp(value.normalize());
        self.store = Store::Owned(list);
        self
    }

    /// A controlled selection mirroring a host-owned value.
    pub fn controlled(multiple: bool, value: Value) -> Self {
        let mut selection = Self {
            store: Store::External(Vec::new()),
            multiple,
        };
        let list = selection.clamp(value.normalize());
        selection.store = Store::External(list);
        selection
    }

    /// Whether the host owns the value.
    pub fn is_controlled(&self) -> bool {
        matches!(self.store, Store::External(_))
    }

    /// Replace the mirrored snapshot with a new host-supplied value.
    ///
    /// Only meaningful in controlled mode; calling it on an uncontrolled
    /// selection is a caller bug and panics in debug builds.
    pub fn sync(&mut self, value: Value) {
        debug_assert!(
            self.is_controlled(),
            "sync() called on an uncontrolled selection"
        );
        let list = self.clamp(value.normalize());
        if let Store::External(ref mut current) = self.store {
            *current = list;
        }
    }

    /// The currently visible selected keys, in selection order.
    pub fn values(&self) -> &[String] {
        match &self.store {
            Store::Owned(list) | Store::External(list) => list,
        }
    }

    /// Whether `value` is currently selected.
    pub fn is_selected(&self, value: &str) -> bool {
        self.values().iter().any(|v| v == value)
    }

    /// Whether nothing is selected.
    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// Apply a select intent for `value`.
    ///
    /// Returns `None` (a silent no-op) when `value` does not name a known,
    /// non-disabled option.  Otherwise returns the resulting external value
    /// for change notification.  Single mode replaces; multi mode toggles.
    pub fn select(&mut self, value: &str, options: &[Choice]) -> Option<Value> {
        let known = options
            .iter()
            .find(|opt| opt.value == value)
            .filter(|opt| !opt.disabled)?;

        let current = self.values();
        let next: Vec<String> = if self.multiple {
            if current.iter().any(|v| v == &known.value) {
                current
                    .iter()
                    .filter(|v| *v != &known.value)
                    .cloned()
                    .collect()
            } else {
                let mut next = current.to_vec();
                next.push(known.value.clone());
                next
            }
        } else {
            vec![known.value.clone()]
        };

        let external = Value::from_list(&next, self.multiple);
        if let Store::Owned(ref mut list) = self.store {
            *list = next;
        }
        Some(external)
    }

    /// Apply a clear intent.
    ///
    /// Always returns the canonical empty value, even when nothing was
    /// selected: clearing is idempotent by contract, so the notification is
    /// unconditional.
    pub fn clear(&mut self) -> Value {
        if let Store::Owned(ref mut list) = self.store {
            list.clear();
        }
        Value::empty(self.multiple)
    }

    /// Human-readable summary of the selection.
    ///
    /// Empty string when nothing is selected.  Only keys that still resolve
    /// to an option label count: a stale key (say, after the option list
    /// changed) contributes nothing, so a multi-selection whose resolvable
    /// part is a single label shows that label, and the `"N {count_label}"`
    /// summary counts resolvable labels rather than raw keys.  A single
    /// selection whose key no longer resolves shows nothing, which lets the
    /// widget fall back to its placeholder.
    pub fn display_text(&self, options: &[Choice], count_label: &str) -> String {
        let values = self.values();
        if values.is_empty() {
            return String::new();
        }
        if self.multiple {
            let labels: Vec<&str> = values
                .iter()
                .filter_map(|v| {
                    options
                        .iter()
                        .find(|opt| &opt.value == v)
                        .map(|opt| opt.label.as_str())
                })
                .collect();
            if labels.len() == 1 {
                return labels[0].to_string();
            }
            return format!("{} {count_label}", labels.len());
        }
        options
            .iter()
            .find(|opt| opt.value == values[0])
            .map(|opt| opt.label.clone())
            .unwrap_or_default()
    }

    // Single-select never holds more than one key.
    fn clamp(&self, mut list: Vec<String>) -> Vec<String> {
        if !self.multiple {
            list.truncate(1);
        }
        list
    }
}
