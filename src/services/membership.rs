use chrono::Utc;

use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};
use crate::domain::auth::{AuthenticatedUser, check_role};
use crate::domain::membership::{self, MembershipCategory, MembershipSelection, membership_view};
use crate::domain::ordering::sort_nodes;
use crate::domain::profile::{Profile, ProfileAttributes};
use crate::domain::types::UserSub;
use crate::forms::profile::{ToggleMembershipFormPayload, UpdateProfileFormPayload};
use crate::repository::{GroupListQuery, GroupReader, ProfileReader, ProfileWriter};

use super::{ServiceError, ServiceResult};

/// Everything the profile page shows.
#[derive(Debug, Clone, PartialEq)]
pub struct ProfilePage {
    pub profile: Profile,
    pub categories: Vec<MembershipCategory>,
}

/// Any role that may read the taxonomy may also manage its own profile.
fn authorize(user: &AuthenticatedUser) -> ServiceResult<UserSub> {
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) && !check_role(SERVICE_ADMIN_ROLE, &user.roles)
    {
        return Err(ServiceError::Unauthorized);
    }

    UserSub::new(user.sub.as_str()).map_err(|e| {
        log::error!("Invalid subject in user context: {e}");
        ServiceError::Internal
    })
}

fn load_profile<R>(user_id: &UserSub, repo: &R) -> ServiceResult<Profile>
where
    R: ProfileReader + ?Sized,
{
    match repo.get_profile(user_id) {
        Ok(Some(profile)) => Ok(profile),
        Ok(None) => Ok(Profile::empty(user_id.clone(), Utc::now().naive_utc())),
        Err(e) => {
            log::error!("Failed to load profile {user_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Selection keys stored on the user's profile, as stored.
pub fn current_selection<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<MembershipSelection>
where
    R: ProfileReader + ?Sized,
{
    let user_id = authorize(user)?;
    Ok(load_profile(&user_id, repo)?.groups)
}

/// Replaces the stored selection with `selection`.
pub fn commit_selection<R>(
    selection: &MembershipSelection,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<MembershipSelection>
where
    R: ProfileWriter + ?Sized,
{
    let user_id = authorize(user)?;

    match repo.save_group_selection(&user_id, selection) {
        Ok(profile) => Ok(profile.groups),
        Err(e) => {
            log::error!("Failed to save group selection of {user_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}

/// Flips one (category, sub-group) pair and commits the result.
///
/// Selecting a pair that does not exist in the taxonomy fails with
/// [`ServiceError::NotFound`]. Deselecting always succeeds, which lets users
/// clear keys whose groups were renamed or removed.
pub fn toggle_membership<G, P>(
    payload: ToggleMembershipFormPayload,
    user: &AuthenticatedUser,
    groups: &G,
    profiles: &P,
) -> ServiceResult<MembershipSelection>
where
    G: GroupReader + ?Sized,
    P: ProfileReader + ProfileWriter + ?Sized,
{
    let current = current_selection(user, profiles)?;
    let category = payload.category.as_str();
    let subgroup = payload.subgroup.as_str();

    if !current.contains(category, subgroup) {
        let nodes = match groups.list_groups(GroupListQuery::all()) {
            Ok(nodes) => nodes,
            Err(e) => {
                log::error!("Failed to list groups: {e}");
                return Err(ServiceError::Internal);
            }
        };
        let live = nodes.iter().filter(|n| n.is_category()).any(|c| {
            c.name == category
                && nodes
                    .iter()
                    .any(|s| s.is_child_of(c.id) && s.name == subgroup)
        });
        if !live {
            return Err(ServiceError::NotFound);
        }
    }

    let next = membership::toggle(&current, category, subgroup);
    commit_selection(&next, user, profiles)
}

/// Loads the profile together with the membership checkboxes.
pub fn show_profile<G, P>(user: &AuthenticatedUser, groups: &G, profiles: &P) -> ServiceResult<ProfilePage>
where
    G: GroupReader + ?Sized,
    P: ProfileReader + ?Sized,
{
    let user_id = authorize(user)?;
    let profile = load_profile(&user_id, profiles)?;

    let mut nodes = match groups.list_groups(GroupListQuery::all()) {
        Ok(nodes) => nodes,
        Err(e) => {
            log::error!("Failed to list groups: {e}");
            return Err(ServiceError::Internal);
        }
    };
    sort_nodes(&mut nodes);

    let stale = membership::stale_keys(&nodes, &profile.groups);
    if !stale.is_empty() {
        log::debug!("Profile {user_id} keeps {} stale group key(s)", stale.len());
    }

    let categories = membership_view(&nodes, &profile.groups);
    Ok(ProfilePage {
        profile,
        categories,
    })
}

/// Saves the personal attributes of the current user.
pub fn update_profile<R>(
    payload: UpdateProfileFormPayload,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Profile>
where
    R: ProfileWriter + ?Sized,
{
    let user_id = authorize(user)?;
    let attributes: ProfileAttributes = payload.into();

    match repo.save_profile_attributes(&user_id, &attributes) {
        Ok(profile) => Ok(profile),
        Err(e) => {
            log::error!("Failed to save profile {user_id}: {e}");
            Err(ServiceError::Internal)
        }
    }
}
