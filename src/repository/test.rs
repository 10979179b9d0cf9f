use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use chrono::Utc;

use crate::changes::{ChangeFeed, GroupChange};
use crate::domain::group::{GroupNode, NewGroupNode, name_collides};
use crate::domain::membership::MembershipSelection;
use crate::domain::profile::{Profile, ProfileAttributes};
use crate::domain::types::{GroupId, GroupName, UserSub};
use crate::repository::{
    GroupListQuery, GroupReader, GroupWriter, ProfileReader, ProfileWriter, RepositoryError,
    RepositoryResult,
};

/// Simple in-memory repository used for unit tests.
///
/// Writes mimic the SQLite schema: sibling names are unique ignoring case,
/// parents must be categories and deletes cascade.
#[derive(Default)]
pub struct TestRepository {
    groups: Mutex<Vec<GroupNode>>,
    profiles: Mutex<HashMap<UserSub, Profile>>,
    feed: Arc<ChangeFeed>,
    list_calls: AtomicUsize,
    fail_writes: bool,
}

impl TestRepository {
    pub fn new(groups: Vec<GroupNode>) -> Self {
        Self {
            groups: Mutex::new(groups),
            ..Default::default()
        }
    }

    /// Makes every write fail as if the database were unavailable.
    pub fn failing_writes(mut self) -> Self {
        self.fail_writes = true;
        self
    }

    pub fn feed(&self) -> &Arc<ChangeFeed> {
        &self.feed
    }

    /// Number of `list_groups` calls served so far.
    pub fn list_calls(&self) -> usize {
        self.list_calls.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> Vec<GroupNode> {
        self.groups.lock().unwrap().clone()
    }

    fn check_writable(&self) -> RepositoryResult<()> {
        if self.fail_writes {
            Err(RepositoryError::ConnectionError("database unavailable".into()))
        } else {
            Ok(())
        }
    }
}

impl GroupReader for TestRepository {
    fn list_groups(&self, query: GroupListQuery) -> RepositoryResult<Vec<GroupNode>> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .groups
            .lock()
            .unwrap()
            .iter()
            .filter(|g| query.matches(g))
            .cloned()
            .collect())
    }

    fn get_group_by_id(&self, id: GroupId) -> RepositoryResult<Option<GroupNode>> {
        Ok(self
            .groups
            .lock()
            .unwrap()
            .iter()
            .find(|g| g.id == id)
            .cloned())
    }
}

impl GroupWriter for TestRepository {
    fn create_group(&self, group: &NewGroupNode) -> RepositoryResult<GroupNode> {
        self.check_writable()?;
        let mut groups = self.groups.lock().unwrap();

        if let Some(parent_id) = group.parent_id {
            let parent_is_category = groups
                .iter()
                .any(|g| g.id == parent_id && g.is_category());
            if !parent_is_category {
                return Err(RepositoryError::NotFound);
            }
        }

        let siblings: Vec<GroupNode> = groups
            .iter()
            .filter(|g| g.parent_id == group.parent_id)
            .cloned()
            .collect();
        if name_collides(&siblings, &group.name, None) {
            return Err(RepositoryError::UniqueViolation(
                "groups_sibling_name_unique".into(),
            ));
        }

        let next_id = groups.iter().map(|g| g.id.get()).max().unwrap_or(0) + 1;
        let created = GroupNode {
            id: GroupId::new(next_id).unwrap(),
            name: group.name.clone(),
            parent_id: group.parent_id,
            created_at: group.created_at,
        };
        groups.push(created.clone());
        drop(groups);

        self.feed.publish(GroupChange::inserted(created.id));
        Ok(created)
    }

    fn rename_group(&self, id: GroupId, name: &GroupName) -> RepositoryResult<GroupNode> {
        self.check_writable()?;
        let mut groups = self.groups.lock().unwrap();

        let parent_id = groups
            .iter()
            .find(|g| g.id == id)
            .ok_or(RepositoryError::NotFound)?
            .parent_id;
        let siblings: Vec<GroupNode> = groups
            .iter()
            .filter(|g| g.parent_id == parent_id)
            .cloned()
            .collect();
        if name_collides(&siblings, name, Some(id)) {
            return Err(RepositoryError::UniqueViolation(
                "groups_sibling_name_unique".into(),
            ));
        }

        let node = groups
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or(RepositoryError::NotFound)?;
        node.name = name.clone();
        let renamed = node.clone();
        drop(groups);

        self.feed.publish(GroupChange::updated(id));
        Ok(renamed)
    }

    fn delete_group(&self, id: GroupId) -> RepositoryResult<usize> {
        self.check_writable()?;
        let mut groups = self.groups.lock().unwrap();

        if !groups.iter().any(|g| g.id == id) {
            return Err(RepositoryError::NotFound);
        }
        let removed: Vec<GroupId> = groups
            .iter()
            .filter(|g| g.id == id || g.is_child_of(id))
            .map(|g| g.id)
            .collect();
        groups.retain(|g| !removed.contains(&g.id));
        drop(groups);

        for removed_id in &removed {
            self.feed.publish(GroupChange::deleted(*removed_id));
        }
        Ok(removed.len())
    }
}

impl ProfileReader for TestRepository {
    fn get_profile(&self, user_id: &UserSub) -> RepositoryResult<Option<Profile>> {
        Ok(self.profiles.lock().unwrap().get(user_id).cloned())
    }
}

impl ProfileWriter for TestRepository {
    fn save_profile_attributes(
        &self,
        user_id: &UserSub,
        attributes: &ProfileAttributes,
    ) -> RepositoryResult<Profile> {
        self.check_writable()?;
        let now = Utc::now().naive_utc();
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .entry(user_id.clone())
            .or_insert_with(|| Profile::empty(user_id.clone(), now));
        profile.firstname = attributes.firstname.clone();
        profile.lastname = attributes.lastname.clone();
        profile.phone = attributes.phone.clone();
        profile.city = attributes.city.clone();
        profile.updated_at = now;
        Ok(profile.clone())
    }

    fn save_group_selection(
        &self,
        user_id: &UserSub,
        selection: &MembershipSelection,
    ) -> RepositoryResult<Profile> {
        self.check_writable()?;
        let now = Utc::now().naive_utc();
        let mut profiles = self.profiles.lock().unwrap();
        let profile = profiles
            .entry(user_id.clone())
            .or_insert_with(|| Profile::empty(user_id.clone(), now));
        profile.groups = selection.clone();
        profile.updated_at = now;
        Ok(profile.clone())
    }
}
