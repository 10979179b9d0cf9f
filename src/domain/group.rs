use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::types::{GroupId, GroupName};

/// A single entry of the two-level group taxonomy.
///
/// Nodes without a parent are categories; nodes with a parent are
/// sub-groups of exactly one category and never have children themselves.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct GroupNode {
    pub id: GroupId,
    pub name: GroupName,
    pub parent_id: Option<GroupId>,
    pub created_at: NaiveDateTime,
}

impl GroupNode {
    /// Whether this node is a top-level category.
    pub fn is_category(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Whether this node is a sub-group of `category_id`.
    pub fn is_child_of(&self, category_id: GroupId) -> bool {
        self.parent_id == Some(category_id)
    }
}

/// Data required to insert a new [`GroupNode`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewGroupNode {
    pub name: GroupName,
    pub parent_id: Option<GroupId>,
    pub created_at: NaiveDateTime,
}

impl NewGroupNode {
    pub fn category(name: GroupName, created_at: NaiveDateTime) -> Self {
        Self {
            name,
            parent_id: None,
            created_at,
        }
    }

    pub fn subgroup(parent_id: GroupId, name: GroupName, created_at: NaiveDateTime) -> Self {
        Self {
            name,
            parent_id: Some(parent_id),
            created_at,
        }
    }
}

/// Returns `true` when `name` matches a sibling name case-insensitively.
///
/// `except` excludes one node (the node being renamed) from the check.
pub fn name_collides(siblings: &[GroupNode], name: &GroupName, except: Option<GroupId>) -> bool {
    siblings
        .iter()
        .filter(|sibling| Some(sibling.id) != except)
        .any(|sibling| sibling.name.eq_ignore_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::DateTime;

    fn node(id: i32, name: &str, parent_id: Option<i32>) -> GroupNode {
        GroupNode {
            id: GroupId::new(id).unwrap(),
            name: GroupName::new(name).unwrap(),
            parent_id: parent_id.map(|p| GroupId::new(p).unwrap()),
            created_at: DateTime::from_timestamp(0, 0).unwrap().naive_utc(),
        }
    }

    #[test]
    fn classifies_categories_and_subgroups() {
        let category = node(1, "Jugend", None);
        let subgroup = node(2, "U8", Some(1));
        assert!(category.is_category());
        assert!(!subgroup.is_category());
        assert!(subgroup.is_child_of(category.id));
    }

    #[test]
    fn detects_case_insensitive_collisions() {
        let siblings = vec![node(2, "Herren 1", Some(1)), node(3, "Herren 2", Some(1))];
        let name = GroupName::new("HERREN 1").unwrap();
        assert!(name_collides(&siblings, &name, None));
        assert!(!name_collides(&siblings, &name, Some(GroupId::new(2).unwrap())));
    }
}
