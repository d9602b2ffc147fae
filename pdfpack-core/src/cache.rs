//! Lazily populated value with explicit invalidation

use std::sync::OnceLock;

/// A cell that is either unset or holds a computed value.
///
/// The value is computed on first [`Cache::access`] and kept until
/// [`Cache::invalidate`] is called; the next access recomputes it.
#[derive(Debug, Clone)]
pub struct Cache<T> {
    value: OnceLock<T>,
}

impl<T> Cache<T> {
    pub fn new() -> Self {
        Self {
            value: OnceLock::new(),
        }
    }

    /// Return the cached value, running `populate` if the cell is unset.
    pub fn access<E>(&self, populate: impl FnOnce() -> Result<T, E>) -> Result<&T, E> {
        if let Some(value) = self.value.get() {
            return Ok(value);
        }
        let computed = populate()?;
        Ok(self.value.get_or_init(|| computed))
    }

    pub fn get(&self) -> Option<&T> {
        self.value.get()
    }

    pub fn is_populated(&self) -> bool {
        self.value.get().is_some()
    }

    pub fn invalidate(&mut self) {
        self.value.take();
    }
}

impl<T> Default for Cache<T> {
    fn default() -> Self {
        Self::new()
    }
}
