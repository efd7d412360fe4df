//! Bounded memo tables for manager evaluations.
//!
//! [`LruCache`] evicts the least recently used entry once `capacity` is
//! exceeded; reads count as use. [`EvaluationCache`] bundles the five maps
//! the manager keeps, each behind its own `Mutex`. Locks are held only for
//! the map operation, never across a surrogate call.
use std::{
    collections::{BTreeMap, HashMap},
    hash::Hash,
    sync::{Mutex, MutexGuard},
};

use ndarray::Array2;

use crate::{
    control::linear::ConstraintCoefs,
    manager::{
        errors::{ManagerError, ManagerResult},
        key::EvaluationKey,
    },
    surrogate::types::GridResult,
};

#[derive(Debug, Clone)]
pub struct LruCache<K, V> {
    capacity: usize,
    tick: u64,
    entries: HashMap<K, (V, u64)>,
    order: BTreeMap<u64, K>,
}

impl<K: Eq + Hash + Clone, V: Clone> LruCache<K, V> {
    /// Empty cache holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            tick: 0,
            entries: HashMap::new(),
            order: BTreeMap::new(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, key: &K) -> bool {
        self.entries.contains_key(key)
    }

    /// Clone of the value under `key`, marking it most recently used.
    pub fn get(&mut self, key: &K) -> Option<V> {
        self.tick += 1;
        let tick = self.tick;
        let (value, used) = self.entries.get_mut(key)?;
        self.order.remove(&*used);
        *used = tick;
        self.order.insert(tick, key.clone());
        Some(value.clone())
    }

    /// Insert or overwrite `key`, evicting the least recently used entry
    /// when over capacity.
    pub fn put(&mut self, key: K, value: V) {
        self.tick += 1;
        if let Some((_, used)) = self.entries.insert(key.clone(), (value, self.tick)) {
            self.order.remove(&used);
        }
        self.order.insert(self.tick, key);
        while self.entries.len() > self.capacity {
            match self.order.pop_first() {
                Some((_, oldest)) => {
                    self.entries.remove(&oldest);
                }
                None => break,
            }
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }
}

type Shared<V> = Mutex<LruCache<EvaluationKey, V>>;

/// The manager's memo tables.
#[derive(Debug)]
pub struct EvaluationCache {
    constraints: Shared<ConstraintCoefs>,
    gradients: Shared<Array2<f64>>,
    outputs: Shared<Array2<f64>>,
    grids: Shared<GridResult>,
    required_flows: Shared<f64>,
}

fn guard<'a, V>(map: &'a Shared<V>, name: &'static str) -> ManagerResult<MutexGuard<'a, LruCache<EvaluationKey, V>>> {
    map.lock().map_err(|_| ManagerError::CachePoisoned { map: name })
}

macro_rules! cache_accessors {
    ($get:ident, $put:ident, $field:ident, $ty:ty) => {
        pub fn $get(&self, key: &EvaluationKey) -> ManagerResult<Option<$ty>> {
            Ok(guard(&self.$field, stringify!($field))?.get(key))
        }

        pub fn $put(&self, key: EvaluationKey, value: $ty) -> ManagerResult<()> {
            guard(&self.$field, stringify!($field))?.put(key, value);
            Ok(())
        }
    };
}

impl EvaluationCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            constraints: Mutex::new(LruCache::new(capacity)),
            gradients: Mutex::new(LruCache::new(capacity)),
            outputs: Mutex::new(LruCache::new(capacity)),
            grids: Mutex::new(LruCache::new(capacity)),
            required_flows: Mutex::new(LruCache::new(capacity)),
        }
    }

    cache_accessors!(constraint, put_constraint, constraints, ConstraintCoefs);
    cache_accessors!(gradient, put_gradient, gradients, Array2<f64>);
    cache_accessors!(output, put_output, outputs, Array2<f64>);
    cache_accessors!(grid, put_grid, grids, GridResult);
    cache_accessors!(required_flow, put_required_flow, required_flows, f64);

    /// Drop every cached entry.
    pub fn clear(&self) -> ManagerResult<()> {
        guard(&self.constraints, "constraints")?.clear();
        guard(&self.gradients, "gradients")?.clear();
        guard(&self.outputs, "outputs")?.clear();
        guard(&self.grids, "grids")?.clear();
        guard(&self.required_flows, "required_flows")?.clear();
        Ok(())
    }

    /// Entries per map: constraints, gradients, outputs, grids, required flows.
    pub fn sizes(&self) -> ManagerResult<[usize; 5]> {
        Ok([
            guard(&self.constraints, "constraints")?.len(),
            guard(&self.gradients, "gradients")?.len(),
            guard(&self.outputs, "outputs")?.len(),
            guard(&self.grids, "grids")?.len(),
            guard(&self.required_flows, "required_flows")?.len(),
        ])
    }
}
