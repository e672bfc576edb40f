use thiserror::Error;

/// Failure of the checked list operations (`try_insert_at`, `try_delete_at`).
///
/// The unchecked operations treat the same situations as silent no-ops.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListError<T> {
    /// `index` does not name a position of a list holding `len` elements.
    /// A rejected insertion hands its value back in `value`.
    #[error("index {index} out of range for list of length {len}")]
    IndexOutOfRange {
        index: usize,
        len: usize,
        value: Option<T>,
    },

    #[error("list is empty")]
    Empty,
}

impl<T> ListError<T> {
    /// recovers the value of a rejected insertion
    pub fn into_value(self) -> Option<T> {
        match self {
            Self::IndexOutOfRange { value, .. } => value,
            Self::Empty => None,
        }
    }
}
