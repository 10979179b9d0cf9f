//! Group taxonomy operations.
//!
//! Reads are available to every member, writes to administrators only. All
//! listings are returned in taxonomy order (see [`crate::domain::ordering`]).
//! Sibling-name collisions are checked here against the current state and
//! again by the database constraint, which decides races between
//! concurrent writers.

use chrono::Utc;

use crate::domain::auth::{AuthenticatedUser, check_role};
use crate::domain::group::{GroupNode, NewGroupNode, name_collides};
use crate::domain::ordering::sort_nodes;
use crate::domain::types::{GroupId, GroupName};
use crate::repository::{GroupListQuery, GroupReader, GroupWriter, RepositoryError};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

use super::{ServiceError, ServiceResult};

fn ensure_reader(user: &AuthenticatedUser) -> ServiceResult<()> {
    if check_role(SERVICE_ACCESS_ROLE, &user.roles) || check_role(SERVICE_ADMIN_ROLE, &user.roles)
    {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

fn ensure_admin(user: &AuthenticatedUser) -> ServiceResult<()> {
    if check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        Ok(())
    } else {
        Err(ServiceError::Unauthorized)
    }
}

/// Translates repository failures of write operations.
fn write_error(action: &str, err: RepositoryError) -> ServiceError {
    match err {
        RepositoryError::NotFound | RepositoryError::ForeignKeyViolation(_) => {
            ServiceError::NotFound
        }
        RepositoryError::UniqueViolation(e) => {
            log::warn!("Concurrent write rejected while trying to {action}: {e}");
            ServiceError::Conflict("a group with this name already exists".to_string())
        }
        e => {
            log::error!("Failed to {action}: {e}");
            ServiceError::Internal
        }
    }
}

fn list_sorted<R>(repo: &R, query: GroupListQuery) -> ServiceResult<Vec<GroupNode>>
where
    R: GroupReader + ?Sized,
{
    match repo.list_groups(query) {
        Ok(mut nodes) => {
            sort_nodes(&mut nodes);
            Ok(nodes)
        }
        Err(e) => {
            log::error!("Failed to list groups: {e}");
            Err(ServiceError::Internal)
        }
    }
}

fn get_node<R>(repo: &R, id: GroupId) -> ServiceResult<Option<GroupNode>>
where
    R: GroupReader + ?Sized,
{
    repo.get_group_by_id(id).map_err(|e| {
        log::error!("Failed to get group {id}: {e}");
        ServiceError::Internal
    })
}

fn ensure_unique_among_siblings<R>(
    repo: &R,
    parent_id: Option<GroupId>,
    name: &GroupName,
    except: Option<GroupId>,
) -> ServiceResult<()>
where
    R: GroupReader + ?Sized,
{
    let siblings = list_sorted(repo, GroupListQuery::siblings(parent_id))?;
    if name_collides(&siblings, name, except) {
        return Err(ServiceError::Validation(format!(
            "a group named \"{name}\" already exists here"
        )));
    }
    Ok(())
}

/// Every node: categories first, then sub-groups grouped by category.
pub fn list_all<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<GroupNode>>
where
    R: GroupReader + ?Sized,
{
    ensure_reader(user)?;
    list_sorted(repo, GroupListQuery::all())
}

pub fn list_categories<R>(user: &AuthenticatedUser, repo: &R) -> ServiceResult<Vec<GroupNode>>
where
    R: GroupReader + ?Sized,
{
    ensure_reader(user)?;
    list_sorted(repo, GroupListQuery::categories())
}

/// Sub-groups of `category_id`; empty when the category has none or does
/// not exist.
pub fn list_children<R>(
    category_id: GroupId,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<Vec<GroupNode>>
where
    R: GroupReader + ?Sized,
{
    ensure_reader(user)?;
    list_sorted(repo, GroupListQuery::children_of(category_id))
}

pub fn add_category<R>(
    name: GroupName,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<GroupNode>
where
    R: GroupReader + GroupWriter + ?Sized,
{
    ensure_admin(user)?;
    ensure_unique_among_siblings(repo, None, &name, None)?;

    let group = NewGroupNode::category(name, Utc::now().naive_utc());
    match repo.create_group(&group) {
        Ok(created) => {
            log::info!("Category {} created by {}", created.name, user.email);
            Ok(created)
        }
        Err(e) => Err(write_error("create category", e)),
    }
}

/// Adds a sub-group below `category_id`.
///
/// Fails with [`ServiceError::NotFound`] when `category_id` is unknown or is
/// itself a sub-group, since the taxonomy has exactly two levels.
pub fn add_subgroup<R>(
    category_id: GroupId,
    name: GroupName,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<GroupNode>
where
    R: GroupReader + GroupWriter + ?Sized,
{
    ensure_admin(user)?;

    match get_node(repo, category_id)? {
        Some(parent) if parent.is_category() => {}
        _ => return Err(ServiceError::NotFound),
    }

    ensure_unique_among_siblings(repo, Some(category_id), &name, None)?;

    let group = NewGroupNode::subgroup(category_id, name, Utc::now().naive_utc());
    match repo.create_group(&group) {
        Ok(created) => {
            log::info!(
                "Sub-group {} created under {} by {}",
                created.name,
                category_id,
                user.email
            );
            Ok(created)
        }
        Err(e) => Err(write_error("create sub-group", e)),
    }
}

/// Renames a node. The parent of the node is left untouched.
pub fn rename_group<R>(
    id: GroupId,
    name: GroupName,
    user: &AuthenticatedUser,
    repo: &R,
) -> ServiceResult<GroupNode>
where
    R: GroupReader + GroupWriter + ?Sized,
{
    ensure_admin(user)?;

    let node = match get_node(repo, id)? {
        Some(node) => node,
        None => return Err(ServiceError::NotFound),
    };

    if node.name == name {
        return Ok(node);
    }

    ensure_unique_among_siblings(repo, node.parent_id, &name, Some(id))?;

    match repo.rename_group(id, &name) {
        Ok(renamed) => {
            log::info!("Group {} renamed to {} by {}", node.name, renamed.name, user.email);
            Ok(renamed)
        }
        Err(e) => Err(write_error("rename group", e)),
    }
}

/// Deletes a node. Deleting a category removes its sub-groups in the same
/// transaction. Returns the number of removed nodes.
pub fn delete_group<R>(id: GroupId, user: &AuthenticatedUser, repo: &R) -> ServiceResult<usize>
where
    R: GroupReader + GroupWriter + ?Sized,
{
    ensure_admin(user)?;

    let node = match get_node(repo, id)? {
        Some(node) => node,
        None => return Err(ServiceError::NotFound),
    };

    match repo.delete_group(id) {
        Ok(removed) => {
            log::info!(
                "Group {} deleted by {} ({removed} node(s) removed)",
                node.name,
                user.email
            );
            Ok(removed)
        }
        Err(e) => Err(write_error("delete group", e)),
    }
}
