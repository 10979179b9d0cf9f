use diesel::prelude::*;

use crate::changes::GroupChange;
use crate::domain::group::{GroupNode, NewGroupNode};
use crate::domain::types::{GroupId, GroupName};
use crate::models::group::{Group as DbGroup, NewGroup as DbNewGroup};
use crate::repository::{
    DieselRepository, GroupListQuery, GroupReader, GroupScope, GroupWriter, RepositoryError,
    RepositoryResult,
};

impl GroupReader for DieselRepository {
    fn list_groups(&self, query: GroupListQuery) -> RepositoryResult<Vec<GroupNode>> {
        use crate::schema::groups;

        let mut conn = self.conn()?;

        let mut items = groups::table.into_boxed::<diesel::sqlite::Sqlite>();
        match query.scope {
            GroupScope::All => {}
            GroupScope::Categories => items = items.filter(groups::parent_id.is_null()),
            GroupScope::ChildrenOf(category_id) => {
                items = items.filter(groups::parent_id.eq(Some(category_id.get())))
            }
        }

        let items = items
            .order((groups::parent_id.asc(), groups::name.asc()))
            .load::<DbGroup>(&mut conn)?
            .into_iter()
            .map(TryInto::try_into)
            .collect::<Result<Vec<GroupNode>, _>>()?;

        Ok(items)
    }

    fn get_group_by_id(&self, id: GroupId) -> RepositoryResult<Option<GroupNode>> {
        use crate::schema::groups;

        let mut conn = self.conn()?;

        let group = groups::table
            .filter(groups::id.eq(id.get()))
            .first::<DbGroup>(&mut conn)
            .optional()?;

        let group = group.map(TryInto::try_into).transpose()?;
        Ok(group)
    }
}

impl GroupWriter for DieselRepository {
    fn create_group(&self, group: &NewGroupNode) -> RepositoryResult<GroupNode> {
        use crate::schema::groups;

        let mut conn = self.conn()?;
        let db_group: DbNewGroup = group.clone().into();

        let created = conn.transaction::<_, RepositoryError, _>(|conn| {
            if let Some(parent_id) = db_group.parent_id {
                // Outer `None`: no such row. Inner `Some`: the parent is itself a sub-group.
                let grandparent = groups::table
                    .filter(groups::id.eq(parent_id))
                    .select(groups::parent_id)
                    .first::<Option<i32>>(conn)
                    .optional()?;
                if !matches!(grandparent, Some(None)) {
                    return Err(RepositoryError::NotFound);
                }
            }

            let created = diesel::insert_into(groups::table)
                .values(&db_group)
                .get_result::<DbGroup>(conn)?;
            Ok(created)
        })?;

        let created: GroupNode = created.try_into()?;
        self.feed.publish(GroupChange::inserted(created.id));
        Ok(created)
    }

    fn rename_group(&self, id: GroupId, name: &GroupName) -> RepositoryResult<GroupNode> {
        use crate::schema::groups;

        let mut conn = self.conn()?;

        let renamed = conn.transaction::<_, RepositoryError, _>(|conn| {
            diesel::update(groups::table.filter(groups::id.eq(id.get())))
                .set((
                    groups::name.eq(name.as_str()),
                    groups::name_key.eq(name.folded()),
                ))
                .get_result::<DbGroup>(conn)
                .optional()?
                .ok_or(RepositoryError::NotFound)
        })?;

        let renamed: GroupNode = renamed.try_into()?;
        self.feed.publish(GroupChange::updated(renamed.id));
        Ok(renamed)
    }

    fn delete_group(&self, id: GroupId) -> RepositoryResult<usize> {
        use crate::schema::groups;

        let mut conn = self.conn()?;

        let removed = conn.transaction::<_, RepositoryError, _>(|conn| {
            let child_ids = groups::table
                .filter(groups::parent_id.eq(Some(id.get())))
                .select(groups::id)
                .load::<i32>(conn)?;

            // Children go first so the result does not depend on the
            // connection having foreign keys enabled.
            diesel::delete(groups::table.filter(groups::parent_id.eq(Some(id.get()))))
                .execute(conn)?;
            let affected =
                diesel::delete(groups::table.filter(groups::id.eq(id.get()))).execute(conn)?;
            if affected == 0 {
                return Err(RepositoryError::NotFound);
            }

            Ok(child_ids)
        })?;

        for child_id in &removed {
            if let Ok(child_id) = GroupId::new(*child_id) {
                self.feed.publish(GroupChange::deleted(child_id));
            }
        }
        self.feed.publish(GroupChange::deleted(id));

        Ok(removed.len() + 1)
    }
}
