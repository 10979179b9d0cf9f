use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::domain::membership::MembershipSelection;
use crate::domain::types::UserSub;

/// Profile of a club member.
///
/// Personal attributes are free text; the group selection is the only
/// structured attribute and is always written as a whole.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub user_id: UserSub,
    pub firstname: String,
    pub lastname: String,
    pub phone: String,
    pub city: String,
    pub groups: MembershipSelection,
    pub updated_at: NaiveDateTime,
}

impl Profile {
    /// Blank profile used until the owner saves anything.
    pub fn empty(user_id: UserSub, now: NaiveDateTime) -> Self {
        Self {
            user_id,
            firstname: String::new(),
            lastname: String::new(),
            phone: String::new(),
            city: String::new(),
            groups: MembershipSelection::new(),
            updated_at: now,
        }
    }
}

/// Personal data edited on the profile page.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ProfileAttributes {
    pub firstname: String,
    pub lastname: String,
    pub phone: String,
    pub city: String,
}
