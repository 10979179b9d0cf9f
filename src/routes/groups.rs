use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use serde::Deserialize;
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::types::GroupId;
use crate::dto::groups::CategoryTreeDto;
use crate::forms::groups::{
    AddGroupForm, AddGroupFormPayload, RenameGroupForm, RenameGroupFormPayload,
};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::repository::cache::GroupCache;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::groups::{
    add_category as add_category_service, add_subgroup as add_subgroup_service,
    delete_group as delete_group_service, list_all as list_all_service,
    rename_group as rename_group_service,
};

#[derive(Deserialize)]
struct GroupsQueryParams {
    category: Option<i32>,
}

fn groups_page(category: Option<GroupId>) -> String {
    match category {
        Some(id) => format!("/groups?category={id}"),
        None => "/groups".to_string(),
    }
}

/// Sends the flash message for a failed write; `None` means the error was
/// handled and the caller should redirect back.
fn flash_write_error(err: ServiceError, action: &str) -> Option<HttpResponse> {
    match err {
        ServiceError::Unauthorized => return Some(redirect("/na")),
        ServiceError::NotFound => FlashMessage::error("Gruppe nicht gefunden.").send(),
        ServiceError::Validation(message) | ServiceError::Conflict(message) => {
            FlashMessage::error(message).send()
        }
        ServiceError::Internal => return Some(HttpResponse::InternalServerError().finish()),
    }
    log::debug!("Rejected {action}");
    None
}

#[get("/groups")]
pub async fn show_groups(
    params: web::Query<GroupsQueryParams>,
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    groups: web::Data<GroupCache<DieselRepository>>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    let nodes = match list_all_service(&user, groups.get_ref()) {
        Ok(nodes) => nodes,
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(err) => {
            log::error!("Failed to render groups page: {err}");
            return HttpResponse::InternalServerError().finish();
        }
    };

    let trees = CategoryTreeDto::from_ordered(nodes);
    let selected = params
        .category
        .and_then(|id| trees.iter().find(|tree| tree.id == id))
        .or_else(|| trees.first());

    let mut context = base_context(
        &flash_messages,
        &user,
        "groups",
        &server_config.auth_service_url,
    );
    context.insert("categories", &trees);
    context.insert("selected", &selected);
    render_template(&tera, "groups/index.html", &context)
}

#[post("/groups")]
pub async fn add_group(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<AddGroupForm>,
) -> impl Responder {
    let payload: AddGroupFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/groups");
        }
    };
    let back = groups_page(payload.parent_id);

    let result = match payload.parent_id {
        Some(parent_id) => add_subgroup_service(parent_id, payload.name, &user, repo.get_ref()),
        None => add_category_service(payload.name, &user, repo.get_ref()),
    };

    match result {
        Ok(created) => {
            FlashMessage::success(format!("Gruppe \"{}\" angelegt.", created.name)).send();
            redirect(&groups_page(created.parent_id.or(Some(created.id))))
        }
        Err(err) => flash_write_error(err, "add group").unwrap_or_else(|| redirect(&back)),
    }
}

#[post("/groups/{group_id}/rename")]
pub async fn rename_group(
    group_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<RenameGroupForm>,
) -> impl Responder {
    let group_id: GroupId = match group_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect("/groups");
        }
    };
    let payload: RenameGroupFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/groups");
        }
    };

    match rename_group_service(group_id, payload.name, &user, repo.get_ref()) {
        Ok(renamed) => {
            FlashMessage::success(format!("Gruppe in \"{}\" umbenannt.", renamed.name)).send();
            redirect(&groups_page(renamed.parent_id.or(Some(renamed.id))))
        }
        Err(err) => {
            flash_write_error(err, "rename group").unwrap_or_else(|| redirect("/groups"))
        }
    }
}

#[post("/groups/{group_id}/delete")]
pub async fn delete_group(
    group_id: web::Path<i32>,
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
) -> impl Responder {
    let group_id: GroupId = match group_id.into_inner().try_into() {
        Ok(id) => id,
        Err(e) => {
            FlashMessage::error(format!("{e}")).send();
            return redirect("/groups");
        }
    };

    match delete_group_service(group_id, &user, repo.get_ref()) {
        Ok(1) => FlashMessage::success("Gruppe gelöscht.").send(),
        Ok(removed) => FlashMessage::success(format!(
            "Kategorie mit {} Untergruppe(n) gelöscht.",
            removed - 1
        ))
        .send(),
        Err(err) => {
            if let Some(response) = flash_write_error(err, "delete group") {
                return response;
            }
        }
    }

    redirect("/groups")
}

