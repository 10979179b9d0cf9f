use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::group::{GroupNode as DomainGroupNode, NewGroupNode as DomainNewGroupNode};
use crate::domain::types::{GroupId, GroupName, TypeConstraintError};

/// Diesel model representing the `groups` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::groups)]
pub struct Group {
    pub id: i32,
    pub name: String,
    pub name_key: String,
    pub parent_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

/// Insertable form of [`Group`].
#[derive(Debug, Insertable)]
#[diesel(table_name = crate::schema::groups)]
pub struct NewGroup {
    pub name: String,
    pub name_key: String,
    pub parent_id: Option<i32>,
    pub created_at: NaiveDateTime,
}

impl TryFrom<Group> for DomainGroupNode {
    type Error = TypeConstraintError;

    fn try_from(group: Group) -> Result<Self, Self::Error> {
        Ok(Self {
            id: group.id.try_into()?,
            name: GroupName::new(group.name)?,
            parent_id: group.parent_id.map(GroupId::new).transpose()?,
            created_at: group.created_at,
        })
    }
}

impl From<DomainNewGroupNode> for NewGroup {
    fn from(group: DomainNewGroupNode) -> Self {
        Self {
            name_key: group.name.folded(),
            name: group.name.into_inner(),
            parent_id: group.parent_id.map(GroupId::get),
            created_at: group.created_at,
        }
    }
}
