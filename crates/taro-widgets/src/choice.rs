//! Option entries consumed by selection widgets.

/// A selectable entry in a [`Combobox`](crate::combobox::Combobox) or similar
/// widget.
///
/// `value` is the stable key reported through change notifications; `label`
/// is what the user sees and what search matches against.  Uniqueness of
/// `value` across one widget's option list is assumed, not enforced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Choice {
    /// Unique key reported on selection.
    pub value: String,
    /// Display text, also the search target.
    pub label: String,
    /// Disabled entries render dimmed and cannot be highlighted or selected.
    pub disabled: bool,
}

impl Choice {
    /// Create an enabled choice.
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
            disabled: false,
        }
    }

    /// Mark this choice as disabled.
    pub fn disabled(mut self) -> Self {
        self.disabled = true;
        self
    }
}

impl<V: Into<String>, L: Into<String>> From<(V, L)> for Choice {
    fn from((value, label): (V, L)) -> Self {
        Choice::new(value, label)
    }
}
