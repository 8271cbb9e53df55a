//! Reverse indices over binding IDs.
//!
//! [`BindingIndex`] tracks which binding IDs are registered under each exact
//! query string and each type name, and hands out sequential IDs. It knows
//! nothing about the bindings themselves or about storage.
//!
//! Every type name that is defined has an entry in the type index, even when
//! no binding uses it, so membership in the type index doubles as the
//! "is defined" check. Query entries disappear once their last binding is
//! removed.

use std::collections::{BTreeMap, BTreeSet};

use crate::binding::BindingId;
use crate::error::{DiscoveryError, Result};

pub type IdSet = BTreeSet<BindingId>;

/// Mapping from an index key (query or type name) to binding IDs.
pub type IdIndex = BTreeMap<String, IdSet>;

#[derive(Debug, Clone, PartialEq)]
pub struct BindingIndex {
  type_index: IdIndex,
  query_index: IdIndex,
  next_id: u64,
}

impl Default for BindingIndex {
  fn default() -> Self {
    Self::new()
  }
}

impl BindingIndex {
  pub fn new() -> Self {
    Self {
      type_index: IdIndex::new(),
      query_index: IdIndex::new(),
      next_id: 1,
    }
  }

  /// Rebuild an index from persisted snapshots.
  ///
  /// A counter below 1, or below an ID the snapshots already reference, is
  /// raised so that no live ID can be handed out again. Fails with
  /// [`DiscoveryError::IdExhausted`] if the snapshots reference `u64::MAX`.
  pub fn from_snapshots(type_index: IdIndex, query_index: IdIndex, next_id: u64) -> Result<Self> {
    let highest = type_index
      .values()
      .chain(query_index.values())
      .filter_map(|ids| ids.last())
      .map(|id| id.0)
      .max()
      .unwrap_or(0);
    let floor = highest.checked_add(1).ok_or(DiscoveryError::IdExhausted(highest))?;

    Ok(Self {
      type_index,
      query_index,
      next_id: next_id.max(floor),
    })
  }

  /// Reserve and return the next binding ID.
  ///
  /// The last representable value is never handed out, since the counter
  /// could not move past it.
  pub fn next_id(&mut self) -> Result<BindingId> {
    let id = BindingId(self.next_id);
    self.next_id = self
      .next_id
      .checked_add(1)
      .ok_or(DiscoveryError::IdExhausted(self.next_id))?;
    Ok(id)
  }

  /// The ID the next call to [`next_id`](Self::next_id) will return.
  pub fn peek_next_id(&self) -> BindingId {
    BindingId(self.next_id)
  }

  pub fn type_index(&self) -> &IdIndex {
    &self.type_index
  }

  pub fn query_index(&self) -> &IdIndex {
    &self.query_index
  }

  /// Add an empty entry for `type_name`. Returns `false` if it already
  /// existed.
  pub fn define_type(&mut self, type_name: &str) -> bool {
    if self.type_index.contains_key(type_name) {
      return false;
    }
    self.type_index.insert(type_name.to_string(), IdSet::new());
    true
  }

  /// Drop the entry for `type_name`, returning the IDs it still held.
  ///
  /// Callers remove those bindings first; any IDs left over are also purged
  /// from the query index.
  pub fn undefine_type(&mut self, type_name: &str) -> Option<IdSet> {
    let ids = self.type_index.remove(type_name)?;
    if !ids.is_empty() {
      self.query_index.retain(|_, query_ids| {
        query_ids.retain(|id| !ids.contains(id));
        !query_ids.is_empty()
      });
    }
    Some(ids)
  }

  pub fn is_type_defined(&self, type_name: &str) -> bool {
    self.type_index.contains_key(type_name)
  }

  pub fn type_names(&self) -> impl Iterator<Item = &str> {
    self.type_index.keys().map(String::as_str)
  }

  /// Record `id` under its query and type name.
  pub fn insert(&mut self, id: BindingId, query: &str, type_name: &str) {
    self.type_index.entry(type_name.to_string()).or_default().insert(id);
    self.query_index.entry(query.to_string()).or_default().insert(id);
  }

  /// Remove `id` from the entries for its query and type name. Returns
  /// whether the ID was indexed.
  pub fn remove(&mut self, id: BindingId, query: &str, type_name: &str) -> bool {
    let in_type = self
      .type_index
      .get_mut(type_name)
      .is_some_and(|ids| ids.remove(&id));

    let mut in_query = false;
    if let Some(ids) = self.query_index.get_mut(query) {
      in_query = ids.remove(&id);
      if ids.is_empty() {
        self.query_index.remove(query);
      }
    }

    in_type || in_query
  }

  pub fn contains(&self, id: BindingId) -> bool {
    self.type_index.values().any(|ids| ids.contains(&id))
  }

  pub fn ids_for_query(&self, query: &str) -> IdSet {
    self.query_index.get(query).cloned().unwrap_or_default()
  }

  pub fn ids_for_type(&self, type_name: &str) -> IdSet {
    self.type_index.get(type_name).cloned().unwrap_or_default()
  }

  /// All live binding IDs.
  pub fn all_ids(&self) -> IdSet {
    self.type_index.values().flatten().copied().collect()
  }

  pub fn len(&self) -> usize {
    self.type_index.values().map(IdSet::len).sum()
  }

  pub fn is_empty(&self) -> bool {
    self.type_index.values().all(IdSet::is_empty)
  }

  /// IDs that can match the given query and type constraints.
  ///
  /// With both constraints the two index entries are intersected; with one,
  /// that entry is returned; with none, every live ID.
  pub fn candidates(&self, query: Option<&str>, type_name: Option<&str>) -> IdSet {
    match (query, type_name) {
      (Some(query), Some(type_name)) => match (self.query_index.get(query), self.type_index.get(type_name)) {
        (Some(by_query), Some(by_type)) => {
          let (small, large) = if by_query.len() <= by_type.len() {
            (by_query, by_type)
          } else {
            (by_type, by_query)
          };
          small.iter().filter(|id| large.contains(*id)).copied().collect()
        }
        _ => IdSet::new(),
      },
      (Some(query), None) => self.ids_for_query(query),
      (None, Some(type_name)) => self.ids_for_type(type_name),
      (None, None) => self.all_ids(),
    }
  }

  /// Empty both indices. The ID counter keeps its value.
  pub fn clear(&mut self) {
    self.type_index.clear();
    self.query_index.clear();
  }
}
