//! Identity-based ancestry for cycle detection
//!
//! An [`Ancestry`] is a borrowed linked list of the handles visited on the
//! current branch of a traversal. Descending pushes a new frame on the stack;
//! returning drops it, so sibling branches never see each other's entries.

use crate::value::Value;

/// Handles visited between the traversal root and the current node
#[derive(Debug, Clone, Copy, Default)]
pub struct Ancestry<'a> {
    id: Option<usize>,
    parent: Option<&'a Ancestry<'a>>,
}

impl Ancestry<'static> {
    /// Empty ancestry at the top of a traversal
    pub fn root() -> Self {
        Ancestry::default()
    }
}

impl<'a> Ancestry<'a> {
    /// Extend the ancestry with `value`. Leaves have no identity and are
    /// never matched.
    pub fn push(&'a self, value: &Value) -> Ancestry<'a> {
        Ancestry {
            id: value.identity(),
            parent: Some(self),
        }
    }

    /// Whether `value` is the same handle as any ancestor
    pub fn contains(&self, value: &Value) -> bool {
        let Some(id) = value.identity() else {
            return false;
        };
        let mut frame = Some(self);
        while let Some(current) = frame {
            if current.id == Some(id) {
                return true;
            }
            frame = current.parent;
        }
        false
    }
}
