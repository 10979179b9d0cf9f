use crate::domain::auth::{AuthenticatedUser, check_role};
use crate::{SERVICE_ACCESS_ROLE, SERVICE_ADMIN_ROLE};

use super::{ServiceError, ServiceResult};

/// Picks the page a user lands on after signing in.
///
/// Administrators go to the taxonomy, members to their profile; everyone
/// else is unauthorized.
pub fn landing_page(user: &AuthenticatedUser) -> ServiceResult<&'static str> {
    if check_role(SERVICE_ADMIN_ROLE, &user.roles) {
        Ok("/groups")
    } else if check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        Ok("/profile")
    } else {
        Err(ServiceError::Unauthorized)
    }
}
