//! Surrogate months by (location, averaging type), plus the output column
//! each location reads.
//!
//! Registration policy: registering the same `Arc` twice is a no-op,
//! registering a different month under a taken key is
//! [`ManagerError::AlreadyRegistered`], and [`SurrogateRegistry::replace`]
//! overwrites explicitly.
use std::{
    collections::HashMap,
    sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use crate::{
    manager::errors::{ManagerError, ManagerResult},
    surrogate::month::SurrogateMonth,
};

/// Location codes used by the optimization model and their station names.
pub const LOCATIONS: [(i32, &str); 16] = [
    (1, "JER"),
    (2, "RSL"),
    (3, "EMM"),
    (4, "ANH"),
    (5, "CLL"),
    (6, "MAL"),
    (7, "LVR"),
    (8, "MDR"),
    (9, "VIC"),
    (10, "TRP"),
    (11, "CCF"),
    (12, "CCI"),
    (15, "BAC"),
    (20, "BDL"),
    (21, "MRZ"),
    (30, "X2"),
];

/// Station name for a location code, or `"UNKNOWN"`.
pub fn location_code(location: i32) -> &'static str {
    LOCATIONS
        .iter()
        .find(|(code, _)| *code == location)
        .map_or("UNKNOWN", |(_, name)| name)
}

#[derive(Debug, Default)]
pub struct SurrogateRegistry {
    months: RwLock<HashMap<(i32, i32), Arc<SurrogateMonth>>>,
    output_index: RwLock<HashMap<i32, usize>>,
}

fn read<T>(lock: &RwLock<T>) -> ManagerResult<RwLockReadGuard<'_, T>> {
    lock.read().map_err(|_| ManagerError::CachePoisoned { map: "registry" })
}

fn write<T>(lock: &RwLock<T>) -> ManagerResult<RwLockWriteGuard<'_, T>> {
    lock.write().map_err(|_| ManagerError::CachePoisoned { map: "registry" })
}

impl SurrogateRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `month` for `(location, ave_type)`.
    ///
    /// # Errors
    /// - [`ManagerError::AlreadyRegistered`] if another month holds the key.
    pub fn register(&self, location: i32, ave_type: i32, month: Arc<SurrogateMonth>) -> ManagerResult<()> {
        let mut months = write(&self.months)?;
        match months.get(&(location, ave_type)) {
            Some(existing) if Arc::ptr_eq(existing, &month) => Ok(()),
            Some(_) => Err(ManagerError::AlreadyRegistered { location, ave_type }),
            None => {
                months.insert((location, ave_type), month);
                Ok(())
            }
        }
    }

    /// Register `month`, overwriting any previous entry. Returns the
    /// replaced month.
    pub fn replace(
        &self, location: i32, ave_type: i32, month: Arc<SurrogateMonth>,
    ) -> ManagerResult<Option<Arc<SurrogateMonth>>> {
        Ok(write(&self.months)?.insert((location, ave_type), month))
    }

    /// # Errors
    /// - [`ManagerError::NotRegistered`] if nothing is registered.
    pub fn get(&self, location: i32, ave_type: i32) -> ManagerResult<Arc<SurrogateMonth>> {
        read(&self.months)?
            .get(&(location, ave_type))
            .cloned()
            .ok_or(ManagerError::NotRegistered { location, ave_type })
    }

    pub fn contains(&self, location: i32, ave_type: i32) -> ManagerResult<bool> {
        Ok(read(&self.months)?.contains_key(&(location, ave_type)))
    }

    /// Output column of the surrogate that corresponds to `location`.
    pub fn set_output_index(&self, location: i32, index: usize) -> ManagerResult<()> {
        write(&self.output_index)?.insert(location, index);
        Ok(())
    }

    /// # Errors
    /// - [`ManagerError::NoOutputIndex`] if `location` has no column.
    pub fn output_index(&self, location: i32) -> ManagerResult<usize> {
        read(&self.output_index)?
            .get(&location)
            .copied()
            .ok_or(ManagerError::NoOutputIndex { location })
    }
}
