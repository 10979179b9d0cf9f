use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::domain::membership::MembershipSelection;
use crate::domain::profile::Profile as DomainProfile;
use crate::domain::types::{TypeConstraintError, UserSub};

/// Diesel model representing the `profiles` table.
#[derive(Debug, Clone, Identifiable, Queryable, Selectable)]
#[diesel(table_name = crate::schema::profiles, primary_key(user_id))]
pub struct Profile {
    pub user_id: String,
    pub firstname: String,
    pub lastname: String,
    pub phone: String,
    pub city: String,
    /// JSON array of selection keys.
    pub group_keys: String,
    pub updated_at: NaiveDateTime,
}

/// Serializes a selection into the `group_keys` column format.
pub fn encode_group_keys(selection: &MembershipSelection) -> Result<String, TypeConstraintError> {
    serde_json::to_string(selection)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("group selection: {e}")))
}

/// Parses the `group_keys` column.
pub fn decode_group_keys(value: &str) -> Result<MembershipSelection, TypeConstraintError> {
    serde_json::from_str(value)
        .map_err(|e| TypeConstraintError::InvalidValue(format!("group selection: {e}")))
}

impl TryFrom<Profile> for DomainProfile {
    type Error = TypeConstraintError;

    fn try_from(profile: Profile) -> Result<Self, Self::Error> {
        Ok(Self {
            groups: decode_group_keys(&profile.group_keys)?,
            user_id: UserSub::new(profile.user_id)?,
            firstname: profile.firstname,
            lastname: profile.lastname,
            phone: profile.phone,
            city: profile.city,
            updated_at: profile.updated_at,
        })
    }
}
