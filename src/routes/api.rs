use actix_web::{HttpResponse, Responder, get, web};
use log::error;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::GroupId;
use crate::dto::groups::{CategoryTreeDto, GroupDto, SelectionDto};
use crate::repository::DieselRepository;
use crate::repository::cache::GroupCache;
use crate::services::ServiceError;
use crate::services::groups::{list_all, list_children};
use crate::services::membership::current_selection;

fn error_response(err: ServiceError, action: &str) -> HttpResponse {
    match err {
        ServiceError::Unauthorized => HttpResponse::Unauthorized().finish(),
        ServiceError::NotFound => HttpResponse::NotFound().finish(),
        err => {
            error!("Failed to {action}: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Whole taxonomy as category trees, in display order.
#[get("/v1/groups")]
pub async fn api_v1_groups(
    user: AuthenticatedUser,
    groups: web::Data<GroupCache<DieselRepository>>,
) -> impl Responder {
    match list_all(&user, groups.get_ref()) {
        Ok(nodes) => HttpResponse::Ok().json(CategoryTreeDto::from_ordered(nodes)),
        Err(err) => error_response(err, "list groups"),
    }
}

#[get("/v1/groups/{group_id}/children")]
pub async fn api_v1_group_children(
    group_id: web::Path<i32>,
    user: AuthenticatedUser,
    groups: web::Data<GroupCache<DieselRepository>>,
) -> impl Responder {
    let Ok(category_id) = GroupId::new(group_id.into_inner()) else {
        return HttpResponse::NotFound().finish();
    };

    match list_children(category_id, &user, groups.get_ref()) {
        Ok(children) => HttpResponse::Ok().json(
            children
                .into_iter()
                .map(GroupDto::from)
                .collect::<Vec<_>>(),
        ),
        Err(err) => error_response(err, "list sub-groups"),
    }
}

#[get("/v1/profile/groups")]
pub async fn api_v1_profile_groups(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    match current_selection(&user, repo.get_ref()) {
        Ok(selection) => HttpResponse::Ok().json(SelectionDto::from(selection)),
        Err(err) => error_response(err, "load group selection"),
    }
}
