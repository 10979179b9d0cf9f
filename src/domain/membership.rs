//! Membership selection: the (category, sub-group) pairs a user picked.

use std::collections::BTreeSet;
use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

use crate::domain::group::GroupNode;

/// Separator between category and sub-group name inside a [`SelectionKey`].
pub const SELECTION_KEY_SEPARATOR: char = '|';

/// Composite key `"<category>|<sub-group>"`.
///
/// Keys read back from storage are kept verbatim, including keys that no
/// longer name a live pair.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct SelectionKey(String);

impl SelectionKey {
    pub fn new(category: &str, subgroup: &str) -> Self {
        Self(format!("{category}{SELECTION_KEY_SEPARATOR}{subgroup}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for SelectionKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for SelectionKey {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for SelectionKey {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Set of selection keys owned by a user profile.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct MembershipSelection(BTreeSet<SelectionKey>);

impl MembershipSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, category: &str, subgroup: &str) -> bool {
        self.0.contains(&SelectionKey::new(category, subgroup))
    }

    pub fn contains_key(&self, key: &SelectionKey) -> bool {
        self.0.contains(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &SelectionKey> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<SelectionKey>> FromIterator<K> for MembershipSelection {
    fn from_iter<T: IntoIterator<Item = K>>(iter: T) -> Self {
        Self(iter.into_iter().map(Into::into).collect())
    }
}

/// Returns a new selection with the `(category, subgroup)` pair flipped.
///
/// The input is left untouched.
pub fn toggle(selection: &MembershipSelection, category: &str, subgroup: &str) -> MembershipSelection {
    let key = SelectionKey::new(category, subgroup);
    let mut next = selection.0.clone();
    if !next.remove(&key) {
        next.insert(key);
    }
    MembershipSelection(next)
}

/// One sub-group checkbox in the membership view.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipEntry {
    pub subgroup: GroupNode,
    pub key: SelectionKey,
    pub checked: bool,
}

/// A category with its sub-groups, as shown to a profile owner.
#[derive(Debug, Clone, PartialEq)]
pub struct MembershipCategory {
    pub category: GroupNode,
    pub entries: Vec<MembershipEntry>,
}

/// Cross-references the live taxonomy with a selection.
///
/// `nodes` must already be in taxonomy order. Keys that do not name a live
/// pair simply never appear in the result.
pub fn membership_view(nodes: &[GroupNode], selection: &MembershipSelection) -> Vec<MembershipCategory> {
    nodes
        .iter()
        .filter(|node| node.is_category())
        .map(|category| MembershipCategory {
            category: category.clone(),
            entries: nodes
                .iter()
                .filter(|node| node.is_child_of(category.id))
                .map(|subgroup| {
                    let key = SelectionKey::new(category.name.as_str(), subgroup.name.as_str());
                    MembershipEntry {
                        checked: selection.contains_key(&key),
                        subgroup: subgroup.clone(),
                        key,
                    }
                })
                .collect(),
        })
        .collect()
}

/// Keys in `selection` that no longer name a live (category, sub-group) pair.
pub fn stale_keys<'a>(nodes: &[GroupNode], selection: &'a MembershipSelection) -> Vec<&'a SelectionKey> {
    let live: BTreeSet<SelectionKey> = membership_view(nodes, selection)
        .into_iter()
        .flat_map(|category| category.entries.into_iter().map(|entry| entry.key))
        .collect();
    selection.keys().filter(|key| !live.contains(*key)).collect()
}
