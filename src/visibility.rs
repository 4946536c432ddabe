//! Visibility of a dependent form field.
//!
//! One field's container is shown only while a sibling controlling field
//! holds a fixed value. The evaluation is pure; the host re-runs it on every
//! change signal of the controlling field and applies the result to the
//! container.

/// Symbol type whose markets have pre/post sessions.
///
/// The pre/post toggle is only meaningful for stocks; crypto trades around
/// the clock.
pub const SYMBOL_TYPE_STOCK: &str = "stock";

/// Decides whether a dependent field is shown.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldVisibility {
    show_when: String,
}

impl FieldVisibility {
    /// Controller that shows the dependent field when the controlling field
    /// equals `show_when`.
    #[must_use]
    pub fn new(show_when: impl Into<String>) -> Self {
        Self {
            show_when: show_when.into(),
        }
    }

    /// Whether the dependent field is shown for the controlling field's
    /// current value.
    #[must_use]
    pub fn evaluate(&self, controlling_value: &str) -> bool {
        controlling_value == self.show_when
    }
}

impl Default for FieldVisibility {
    fn default() -> Self {
        Self::new(SYMBOL_TYPE_STOCK)
    }
}
