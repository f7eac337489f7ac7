//! The 3-way toggle decision

use crate::value_objects::Disposition;

/// The single row mutation a request resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation<D: Disposition> {
    /// No row yet: create one
    Insert(D),
    /// A row with a different value exists: overwrite it in place
    Update(D),
    /// The request repeats the current value: remove the row
    Delete,
}

impl<D: Disposition> Mutation<D> {
    /// Decide the mutation from the current and requested values
    pub fn plan(current: Option<D>, requested: D) -> Self {
        match current {
            Some(existing) if existing == requested => Self::Delete,
            None => Self::Insert(requested),
            Some(_) => Self::Update(requested),
        }
    }

    /// Disposition left in the store once the mutation is applied
    pub fn effective(self) -> Option<D> {
        match self {
            Self::Insert(value) | Self::Update(value) => Some(value),
            Self::Delete => None,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insert(_) => "insert",
            Self::Update(_) => "update",
            Self::Delete => "delete",
        }
    }
}
