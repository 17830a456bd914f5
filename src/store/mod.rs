//! Client-side cache of server resources keyed by id.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResourceState<T> {
    Absent,
    Loading,
    Present(T),
}

impl<T> Default for ResourceState<T> {
    fn default() -> Self {
        Self::Absent
    }
}

impl<T> ResourceState<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Self::Present(value) => Some(value),
            Self::Absent | Self::Loading => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        matches!(self, Self::Loading)
    }
}

/// Undo record for an optimistic write.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "an optimistic write must be confirmed or rolled back"]
pub struct Rollback<T> {
    id: String,
    previous: ResourceState<T>,
}

impl<T> Rollback<T> {
    pub fn id(&self) -> &str {
        &self.id
    }
}

#[derive(Debug, Clone)]
pub struct ResourceStore<T> {
    entries: BTreeMap<String, ResourceState<T>>,
}

impl<T> Default for ResourceStore<T> {
    fn default() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }
}

impl<T> ResourceStore<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, id: &str) -> ResourceState<&T> {
        match self.entries.get(id) {
            None | Some(ResourceState::Absent) => ResourceState::Absent,
            Some(ResourceState::Loading) => ResourceState::Loading,
            Some(ResourceState::Present(value)) => ResourceState::Present(value),
        }
    }

    pub fn get(&self, id: &str) -> Option<&T> {
        self.entries.get(id).and_then(ResourceState::value)
    }

    pub fn mark_loading(&mut self, id: impl Into<String>) {
        self.entries.insert(id.into(), ResourceState::Loading);
    }

    pub fn insert(&mut self, id: impl Into<String>, value: T) {
        self.entries.insert(id.into(), ResourceState::Present(value));
    }

    pub fn remove(&mut self, id: &str) -> Option<T> {
        match self.entries.remove(id) {
            Some(ResourceState::Present(value)) => Some(value),
            _ => None,
        }
    }

    /// Replaces the whole cache with a freshly fetched listing.
    pub fn replace_all(&mut self, values: impl IntoIterator<Item = (String, T)>) {
        self.entries = values
            .into_iter()
            .map(|(id, value)| (id, ResourceState::Present(value)))
            .collect();
    }

    /// Present values in id order.
    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values().filter_map(ResourceState::value)
    }

    pub fn len(&self) -> usize {
        self.values().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Applies `value` immediately and returns what is needed to undo it.
    pub fn write_optimistic(&mut self, id: impl Into<String>, value: T) -> Rollback<T> {
        let id = id.into();
        let previous = self
            .entries
            .insert(id.clone(), ResourceState::Present(value))
            .unwrap_or_default();
        Rollback { id, previous }
    }

    pub fn rollback(&mut self, rollback: Rollback<T>) {
        tracing::debug!(id = %rollback.id, "rolling back optimistic write");
        match rollback.previous {
            ResourceState::Absent => {
                self.entries.remove(&rollback.id);
            }
            previous => {
                self.entries.insert(rollback.id, previous);
            }
        }
    }

    /// Keeps the optimistic value, optionally replacing it with the server's.
    pub fn confirm(&mut self, rollback: Rollback<T>, confirmed: Option<T>) {
        if let Some(value) = confirmed {
            self.entries
                .insert(rollback.id, ResourceState::Present(value));
        }
    }
}
