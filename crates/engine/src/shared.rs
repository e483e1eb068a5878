//! Thread-safe handle to a [`Stowage`] service.
//!
//! Whole operations are serialized: readers share the lock, every mutating
//! operation holds it exclusively until it has finished.

use crate::stowage::Stowage;
use std::sync::{Arc, RwLock};
use u_stowage_core::{Error, Result};

/// Cloneable, shareable stowage service.
#[derive(Debug, Clone)]
pub struct SharedStowage {
    inner: Arc<RwLock<Stowage>>,
}

impl SharedStowage {
    /// Wraps a service.
    pub fn new(stowage: Stowage) -> Self {
        Self {
            inner: Arc::new(RwLock::new(stowage)),
        }
    }

    /// Runs a read-only operation.
    pub fn read<T>(&self, f: impl FnOnce(&Stowage) -> T) -> Result<T> {
        let guard = self
            .inner
            .read()
            .map_err(|_| Error::Internal("stowage lock poisoned".into()))?;
        Ok(f(&guard))
    }

    /// Runs a mutating operation with exclusive access.
    pub fn write<T>(&self, f: impl FnOnce(&mut Stowage) -> T) -> Result<T> {
        let mut guard = self
            .inner
            .write()
            .map_err(|_| Error::Internal("stowage lock poisoned".into()))?;
        Ok(f(&mut guard))
    }
}

impl From<Stowage> for SharedStowage {
    fn from(stowage: Stowage) -> Self {
        Self::new(stowage)
    }
}
