use chrono::Utc;
use diesel::prelude::*;

use crate::domain::membership::MembershipSelection;
use crate::domain::profile::{Profile, ProfileAttributes};
use crate::domain::types::UserSub;
use crate::models::profile::{Profile as DbProfile, encode_group_keys};
use crate::repository::{DieselRepository, ProfileReader, ProfileWriter, RepositoryResult};

impl ProfileReader for DieselRepository {
    fn get_profile(&self, user_id: &UserSub) -> RepositoryResult<Option<Profile>> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;

        let profile = profiles::table
            .filter(profiles::user_id.eq(user_id.as_str()))
            .first::<DbProfile>(&mut conn)
            .optional()?;

        let profile = profile.map(TryInto::try_into).transpose()?;
        Ok(profile)
    }
}

impl ProfileWriter for DieselRepository {
    fn save_profile_attributes(
        &self,
        user_id: &UserSub,
        attributes: &ProfileAttributes,
    ) -> RepositoryResult<Profile> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();

        let saved = diesel::insert_into(profiles::table)
            .values((
                profiles::user_id.eq(user_id.as_str()),
                profiles::firstname.eq(attributes.firstname.as_str()),
                profiles::lastname.eq(attributes.lastname.as_str()),
                profiles::phone.eq(attributes.phone.as_str()),
                profiles::city.eq(attributes.city.as_str()),
                profiles::updated_at.eq(now),
            ))
            .on_conflict(profiles::user_id)
            .do_update()
            .set((
                profiles::firstname.eq(attributes.firstname.as_str()),
                profiles::lastname.eq(attributes.lastname.as_str()),
                profiles::phone.eq(attributes.phone.as_str()),
                profiles::city.eq(attributes.city.as_str()),
                profiles::updated_at.eq(now),
            ))
            .get_result::<DbProfile>(&mut conn)?;

        Ok(saved.try_into()?)
    }

    fn save_group_selection(
        &self,
        user_id: &UserSub,
        selection: &MembershipSelection,
    ) -> RepositoryResult<Profile> {
        use crate::schema::profiles;

        let mut conn = self.conn()?;
        let now = Utc::now().naive_utc();
        let group_keys = encode_group_keys(selection)?;

        let saved = diesel::insert_into(profiles::table)
            .values((
                profiles::user_id.eq(user_id.as_str()),
                profiles::group_keys.eq(group_keys.as_str()),
                profiles::updated_at.eq(now),
            ))
            .on_conflict(profiles::user_id)
            .do_update()
            .set((
                profiles::group_keys.eq(group_keys.as_str()),
                profiles::updated_at.eq(now),
            ))
            .get_result::<DbProfile>(&mut conn)?;

        Ok(saved.try_into()?)
    }
}
