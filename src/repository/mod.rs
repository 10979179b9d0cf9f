use std::sync::Arc;

use crate::changes::ChangeFeed;
use crate::db::{DbConnection, DbPool};
use crate::domain::group::{GroupNode, NewGroupNode};
use crate::domain::membership::MembershipSelection;
use crate::domain::profile::{Profile, ProfileAttributes};
use crate::domain::types::{GroupId, GroupName, UserSub};

pub mod cache;
pub mod errors;
pub mod group;
pub mod profile;
#[cfg(test)]
pub mod test;

pub use errors::{RepositoryError, RepositoryResult};

/// Repository implementation backed by Diesel and SQLite.
///
/// The underlying `r2d2::Pool` and the change feed are reference counted, so
/// the repository is cheap to clone and can be passed around freely between
/// handlers. Clones publish to the same feed.
#[derive(Clone)]
pub struct DieselRepository {
    pool: DbPool,
    feed: Arc<ChangeFeed>,
}

impl DieselRepository {
    /// Create a new repository from an established database pool.
    pub fn new(pool: DbPool) -> Self {
        Self {
            pool,
            feed: ChangeFeed::new(),
        }
    }

    /// Feed notified after every committed taxonomy write.
    pub fn feed(&self) -> &Arc<ChangeFeed> {
        &self.feed
    }

    /// Get a pooled database connection.
    fn conn(&self) -> RepositoryResult<DbConnection> {
        Ok(self.pool.get()?)
    }
}

/// Which part of the taxonomy a listing covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GroupScope {
    /// Every node.
    #[default]
    All,
    /// Top-level nodes only.
    Categories,
    /// Sub-groups of one category.
    ChildrenOf(GroupId),
}

/// Query parameters used when listing taxonomy nodes.
#[derive(Debug, Clone, Default)]
pub struct GroupListQuery {
    pub scope: GroupScope,
}

impl GroupListQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn categories() -> Self {
        Self {
            scope: GroupScope::Categories,
        }
    }

    pub fn children_of(category_id: GroupId) -> Self {
        Self {
            scope: GroupScope::ChildrenOf(category_id),
        }
    }

    /// Siblings of a node with the given parent.
    pub fn siblings(parent_id: Option<GroupId>) -> Self {
        match parent_id {
            Some(parent_id) => Self::children_of(parent_id),
            None => Self::categories(),
        }
    }

    /// Whether `node` falls inside this query.
    pub fn matches(&self, node: &GroupNode) -> bool {
        match self.scope {
            GroupScope::All => true,
            GroupScope::Categories => node.is_category(),
            GroupScope::ChildrenOf(category_id) => node.is_child_of(category_id),
        }
    }
}

/// Read-only operations for taxonomy nodes.
///
/// Listings come back in no guaranteed order; callers sort with
/// [`crate::domain::ordering::sort_nodes`].
pub trait GroupReader {
    /// List nodes matching the supplied query.
    fn list_groups(&self, query: GroupListQuery) -> RepositoryResult<Vec<GroupNode>>;
    /// Retrieve a node by its identifier.
    fn get_group_by_id(&self, id: GroupId) -> RepositoryResult<Option<GroupNode>>;
}

/// Write operations for taxonomy nodes. Each call is one transaction.
pub trait GroupWriter {
    /// Persist a new node.
    ///
    /// Fails with [`RepositoryError::NotFound`] when the parent is missing or
    /// is not a category, and with [`RepositoryError::UniqueViolation`] when
    /// a sibling already uses the name.
    fn create_group(&self, group: &NewGroupNode) -> RepositoryResult<GroupNode>;
    /// Change the name of a node. The parent never changes.
    fn rename_group(&self, id: GroupId, name: &GroupName) -> RepositoryResult<GroupNode>;
    /// Delete a node together with all of its children.
    ///
    /// Returns the number of removed rows.
    fn delete_group(&self, id: GroupId) -> RepositoryResult<usize>;
}

/// Read-only operations for user profiles.
pub trait ProfileReader {
    /// Retrieve the profile of a user, if one was ever saved.
    fn get_profile(&self, user_id: &UserSub) -> RepositoryResult<Option<Profile>>;
}

/// Write operations for user profiles.
///
/// Both calls create the profile when it does not exist yet.
pub trait ProfileWriter {
    /// Replace the personal attributes of a profile.
    fn save_profile_attributes(
        &self,
        user_id: &UserSub,
        attributes: &ProfileAttributes,
    ) -> RepositoryResult<Profile>;
    /// Replace the whole group selection of a profile.
    fn save_group_selection(
        &self,
        user_id: &UserSub,
        selection: &MembershipSelection,
    ) -> RepositoryResult<Profile>;
}

impl<T: GroupReader + ?Sized> GroupReader for Arc<T> {
    fn list_groups(&self, query: GroupListQuery) -> RepositoryResult<Vec<GroupNode>> {
        (**self).list_groups(query)
    }

    fn get_group_by_id(&self, id: GroupId) -> RepositoryResult<Option<GroupNode>> {
        (**self).get_group_by_id(id)
    }
}

impl<T: GroupWriter + ?Sized> GroupWriter for Arc<T> {
    fn create_group(&self, group: &NewGroupNode) -> RepositoryResult<GroupNode> {
        (**self).create_group(group)
    }

    fn rename_group(&self, id: GroupId, name: &GroupName) -> RepositoryResult<GroupNode> {
        (**self).rename_group(id, name)
    }

    fn delete_group(&self, id: GroupId) -> RepositoryResult<usize> {
        (**self).delete_group(id)
    }
}
