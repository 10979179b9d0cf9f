use actix_web::{HttpResponse, Responder, get, post, web};
use actix_web_flash_messages::{FlashMessage, IncomingFlashMessages};
use tera::Tera;

use crate::domain::auth::AuthenticatedUser;
use crate::dto::groups::MembershipCategoryDto;
use crate::forms::profile::{
    ToggleMembershipForm, ToggleMembershipFormPayload, UpdateProfileForm,
    UpdateProfileFormPayload,
};
use crate::models::config::ServerConfig;
use crate::repository::DieselRepository;
use crate::repository::cache::GroupCache;
use crate::routes::{base_context, redirect, render_template};
use crate::services::ServiceError;
use crate::services::membership::{
    show_profile as show_profile_service, toggle_membership as toggle_membership_service,
    update_profile as update_profile_service,
};

#[get("/profile")]
pub async fn show_profile(
    user: AuthenticatedUser,
    flash_messages: IncomingFlashMessages,
    groups: web::Data<GroupCache<DieselRepository>>,
    repo: web::Data<DieselRepository>,
    server_config: web::Data<ServerConfig>,
    tera: web::Data<Tera>,
) -> impl Responder {
    match show_profile_service(&user, groups.get_ref(), repo.get_ref()) {
        Ok(page) => {
            let categories: Vec<MembershipCategoryDto> =
                page.categories.into_iter().map(Into::into).collect();
            let mut context = base_context(
                &flash_messages,
                &user,
                "profile",
                &server_config.auth_service_url,
            );
            context.insert("profile", &page.profile);
            context.insert("categories", &categories);
            render_template(&tera, "profile/index.html", &context)
        }
        Err(ServiceError::Unauthorized) => redirect("/na"),
        Err(err) => {
            log::error!("Failed to render profile page: {err}");
            HttpResponse::InternalServerError().finish()
        }
    }
}

#[post("/profile")]
pub async fn update_profile(
    user: AuthenticatedUser,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<UpdateProfileForm>,
) -> impl Responder {
    let payload: UpdateProfileFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/profile");
        }
    };

    match update_profile_service(payload, &user, repo.get_ref()) {
        Ok(_) => FlashMessage::success("Profil gespeichert.").send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::Internal) => return HttpResponse::InternalServerError().finish(),
        Err(err) => FlashMessage::error(err.to_string()).send(),
    }

    redirect("/profile")
}

#[post("/profile/groups")]
pub async fn toggle_membership(
    user: AuthenticatedUser,
    groups: web::Data<GroupCache<DieselRepository>>,
    repo: web::Data<DieselRepository>,
    web::Form(form): web::Form<ToggleMembershipForm>,
) -> impl Responder {
    let payload: ToggleMembershipFormPayload = match form.try_into() {
        Ok(payload) => payload,
        Err(e) => {
            FlashMessage::error(e.to_string()).send();
            return redirect("/profile");
        }
    };

    match toggle_membership_service(payload, &user, groups.get_ref(), repo.get_ref()) {
        Ok(_) => FlashMessage::success("Gruppenauswahl gespeichert.").send(),
        Err(ServiceError::Unauthorized) => return redirect("/na"),
        Err(ServiceError::NotFound) => FlashMessage::error("Gruppe nicht gefunden.").send(),
        Err(ServiceError::Internal) => return HttpResponse::InternalServerError().finish(),
        Err(err) => FlashMessage::error(err.to_string()).send(),
    }

    redirect("/profile")
}
