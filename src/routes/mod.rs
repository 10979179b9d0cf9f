use std::future::{Ready, ready};

use actix_identity::IdentityExt;
use actix_web::dev::Payload;
use actix_web::http::header;
use actix_web::{FromRequest, HttpRequest, HttpResponse, error};
use actix_web_flash_messages::{IncomingFlashMessages, Level};
use chrono::Utc;
use tera::{Context, Tera};

use crate::domain::auth::AuthenticatedUser;

pub mod api;
pub mod groups;
pub mod main;
pub mod profile;

impl FromRequest for AuthenticatedUser {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    /// Reads the user stored as the identity id by the auth service.
    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let identity = match req.get_identity() {
            Ok(identity) => identity,
            Err(_) => return ready(Err(error::ErrorUnauthorized("not signed in"))),
        };
        let user = identity
            .id()
            .ok()
            .and_then(|id| serde_json::from_str::<AuthenticatedUser>(&id).ok());

        ready(match user {
            Some(user) if user.exp > Utc::now().timestamp() => Ok(user),
            Some(_) => {
                identity.logout();
                Err(error::ErrorUnauthorized("session expired"))
            }
            None => {
                log::warn!("Discarding unreadable identity");
                Err(error::ErrorUnauthorized("invalid identity"))
            }
        })
    }
}

pub fn alert_level_to_str(level: &Level) -> &'static str {
    match level {
        Level::Error => "danger",
        Level::Warning => "warning",
        Level::Success => "success",
        _ => "info",
    }
}

pub fn render_template(tera: &Tera, template: &str, context: &Context) -> HttpResponse {
    HttpResponse::Ok().body(tera.render(template, context).unwrap_or_else(|e| {
        log::error!("Failed to render template '{template}': {e}");
        String::new()
    }))
}

pub fn base_context(
    flash_messages: &IncomingFlashMessages,
    user: &AuthenticatedUser,
    current_page: &str,
    home_url: &str,
) -> Context {
    let alerts = flash_messages
        .iter()
        .map(|f| (f.content(), alert_level_to_str(&f.level())))
        .collect::<Vec<_>>();

    let mut context = Context::new();
    context.insert("alerts", &alerts);
    context.insert("current_user", user);
    context.insert("current_page", current_page);
    context.insert("home_url", home_url);
    context
}

/// `303 See Other` to `location`, used after every form post.
pub fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn redirect_sets_location() {
        let response = redirect("/groups");
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(
            response.headers().get(header::LOCATION).unwrap(),
            "/groups"
        );
    }

    #[test]
    fn maps_flash_levels_to_alert_classes() {
        assert_eq!(alert_level_to_str(&Level::Error), "danger");
        assert_eq!(alert_level_to_str(&Level::Success), "success");
        assert_eq!(alert_level_to_str(&Level::Info), "info");
    }
}
