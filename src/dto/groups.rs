use serde::Serialize;

use crate::domain::group::GroupNode;
use crate::domain::membership::{MembershipCategory, MembershipEntry, MembershipSelection};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupDto {
    pub id: i32,
    pub name: String,
    pub parent_id: Option<i32>,
}

impl From<GroupNode> for GroupDto {
    fn from(value: GroupNode) -> Self {
        Self {
            id: value.id.get(),
            name: value.name.into_inner(),
            parent_id: value.parent_id.map(|id| id.get()),
        }
    }
}

/// A category together with its ordered sub-groups.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryTreeDto {
    pub id: i32,
    pub name: String,
    pub children: Vec<GroupDto>,
}

impl CategoryTreeDto {
    /// Groups ordered nodes into trees, keeping the input order.
    pub fn from_ordered(nodes: Vec<GroupNode>) -> Vec<Self> {
        let (categories, subgroups): (Vec<_>, Vec<_>) =
            nodes.into_iter().partition(GroupNode::is_category);

        categories
            .into_iter()
            .map(|category| Self {
                id: category.id.get(),
                children: subgroups
                    .iter()
                    .filter(|s| s.is_child_of(category.id))
                    .cloned()
                    .map(GroupDto::from)
                    .collect(),
                name: category.name.into_inner(),
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipEntryDto {
    pub id: i32,
    pub name: String,
    pub key: String,
    pub checked: bool,
}

impl From<MembershipEntry> for MembershipEntryDto {
    fn from(value: MembershipEntry) -> Self {
        Self {
            id: value.subgroup.id.get(),
            name: value.subgroup.name.into_inner(),
            key: value.key.as_str().to_string(),
            checked: value.checked,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MembershipCategoryDto {
    pub id: i32,
    pub name: String,
    pub entries: Vec<MembershipEntryDto>,
}

impl From<MembershipCategory> for MembershipCategoryDto {
    fn from(value: MembershipCategory) -> Self {
        Self {
            id: value.category.id.get(),
            name: value.category.name.into_inner(),
            entries: value.entries.into_iter().map(Into::into).collect(),
        }
    }
}

/// Stored selection keys, in key order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SelectionDto {
    pub keys: Vec<String>,
}

impl From<MembershipSelection> for SelectionDto {
    fn from(value: MembershipSelection) -> Self {
        Self {
            keys: value.keys().map(|k| k.as_str().to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::{GroupId, GroupName};
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
    fn builds_trees_in_input_order() {
        let trees = CategoryTreeDto::from_ordered(vec![
            node(2, "Herren", None),
            node(1, "Jugend", None),
            node(5, "Herren 1", Some(2)),
            node(4, "U8", Some(1)),
            node(3, "U10", Some(1)),
        ]);

        assert_eq!(trees.len(), 2);
        assert_eq!(trees[0].name, "Herren");
        assert_eq!(trees[0].children[0].parent_id, Some(2));
        let jugend: Vec<&str> = trees[1].children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(jugend, vec!["U8", "U10"]);
    }

    #[test]
    fn serializes_selection_as_key_list() {
        let selection: MembershipSelection = ["Jugend|U8", "Herren|Herren 1"].into_iter().collect();
        let json = serde_json::to_value(SelectionDto::from(selection)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"keys": ["Herren|Herren 1", "Jugend|U8"]})
        );
    }
}
