use std::{
    fmt::{self, Display},
    ops::{Deref, DerefMut},
};

use itertools::Itertools;

/// An ordered batch of diagnostics collected by one pipeline stage.
///
/// Stages keep going after an error so that a single run can report as many
/// problems as possible, and hand the whole batch back to the caller at the end.
#[derive(Debug, Clone, PartialEq)]
pub struct Errors<E>(pub Vec<E>);

impl<E> Default for Errors<E> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<E> Errors<E> {
    /// `Ok(value)` if nothing was recorded, the batch otherwise.
    pub fn into_result<T>(self, value: T) -> Result<T, Self> {
        if self.0.is_empty() {
            Ok(value)
        } else {
            Err(self)
        }
    }
}

impl<E> From<E> for Errors<E> {
    fn from(e: E) -> Self {
        Self(vec![e])
    }
}

impl<E> FromIterator<E> for Errors<E> {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<E> Deref for Errors<E> {
    type Target = Vec<E>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<E> DerefMut for Errors<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

impl<E: Display> Display for Errors<E> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0.iter().join("\n"))
    }
}

impl<E: std::error::Error> std::error::Error for Errors<E> {}
