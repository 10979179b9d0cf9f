//! Read-through snapshot of the taxonomy, invalidated by the change feed.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::changes::{ChangeFeed, Subscription};
use crate::domain::group::GroupNode;
use crate::domain::types::GroupId;
use crate::repository::{GroupListQuery, GroupReader, RepositoryResult};

/// [`GroupReader`] that serves listings from an in-memory snapshot.
///
/// The snapshot is loaded lazily from the wrapped reader and dropped
/// whenever the feed reports any change. The cache never applies change
/// events itself; it only re-queries.
pub struct GroupCache<R> {
    inner: R,
    snapshot: RwLock<Option<Arc<Vec<GroupNode>>>>,
    stale: Arc<AtomicBool>,
    _subscription: Subscription,
}

impl<R: GroupReader> GroupCache<R> {
    pub fn new(inner: R, feed: &Arc<ChangeFeed>) -> Self {
        let stale = Arc::new(AtomicBool::new(true));
        let flag = stale.clone();
        let subscription = feed.subscribe(move |_| flag.store(true, Ordering::Release));

        Self {
            inner,
            snapshot: RwLock::new(None),
            stale,
            _subscription: subscription,
        }
    }

    /// Drops the snapshot so the next read re-queries.
    pub fn invalidate(&self) {
        self.stale.store(true, Ordering::Release);
    }

    fn nodes(&self) -> RepositoryResult<Arc<Vec<GroupNode>>> {
        // Clear the flag before loading: a change committed during the load
        // sets it again and forces another reload on the next read.
        if !self.stale.swap(false, Ordering::AcqRel) {
            let snapshot = self
                .snapshot
                .read()
                .unwrap_or_else(PoisonError::into_inner);
            if let Some(nodes) = snapshot.as_ref() {
                return Ok(nodes.clone());
            }
        }

        let nodes = match self.inner.list_groups(GroupListQuery::all()) {
            Ok(nodes) => Arc::new(nodes),
            Err(e) => {
                self.stale.store(true, Ordering::Release);
                return Err(e);
            }
        };
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(nodes.clone());
        Ok(nodes)
    }
}

impl<R: GroupReader> GroupReader for GroupCache<R> {
    fn list_groups(&self, query: GroupListQuery) -> RepositoryResult<Vec<GroupNode>> {
        Ok(self
            .nodes()?
            .iter()
            .filter(|node| query.matches(node))
            .cloned()
            .collect())
    }

    fn get_group_by_id(&self, id: GroupId) -> RepositoryResult<Option<GroupNode>> {
        Ok(self.nodes()?.iter().find(|node| node.id == id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::group::NewGroupNode;
    use crate::domain::types::GroupName;
    use crate::repository::GroupWriter;
    use crate::repository::test::TestRepository;
    use chrono::DateTime;

    fn now() -> chrono::NaiveDateTime {
        DateTime::from_timestamp(0, 0).unwrap().naive_utc()
    }

    #[test]
    fn serves_snapshot_until_feed_reports_change() {
        let repo = Arc::new(TestRepository::default());
        let cache = GroupCache::new(repo.clone(), repo.feed());

        let jugend = repo
            .create_group(&NewGroupNode::category(GroupName::new("Jugend").unwrap(), now()))
            .unwrap();
        assert_eq!(cache.list_groups(GroupListQuery::all()).unwrap().len(), 1);
        assert_eq!(repo.list_calls(), 1);

        cache.list_groups(GroupListQuery::categories()).unwrap();
        cache.get_group_by_id(jugend.id).unwrap();
        assert_eq!(repo.list_calls(), 1);

        repo.create_group(&NewGroupNode::subgroup(
            jugend.id,
            GroupName::new("U8").unwrap(),
            now(),
        ))
        .unwrap();
        let children = cache
            .list_groups(GroupListQuery::children_of(jugend.id))
            .unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(repo.list_calls(), 2);
    }

    #[test]
    fn manual_invalidation_forces_reload() {
        let repo = Arc::new(TestRepository::default());
        let cache = GroupCache::new(repo.clone(), repo.feed());

        cache.list_groups(GroupListQuery::all()).unwrap();
        cache.invalidate();
        cache.list_groups(GroupListQuery::all()).unwrap();
        assert_eq!(repo.list_calls(), 2);
    }
}
