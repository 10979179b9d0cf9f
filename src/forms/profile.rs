use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::profile::ProfileAttributes;
use crate::domain::types::TypeConstraintError;

/// Flip of a single membership checkbox.
#[derive(Deserialize, Validate)]
pub struct ToggleMembershipForm {
    #[validate(length(min = 1, max = 64))]
    pub category: String,
    #[validate(length(min = 1, max = 64))]
    pub subgroup: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToggleMembershipFormPayload {
    pub category: String,
    pub subgroup: String,
}

#[derive(Debug, Error)]
pub enum ToggleMembershipFormError {
    #[error("Membership form validation failed: {0}")]
    Validation(String),
    #[error("Membership form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for ToggleMembershipFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for ToggleMembershipFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<ToggleMembershipForm> for ToggleMembershipFormPayload {
    type Error = ToggleMembershipFormError;

    fn try_from(value: ToggleMembershipForm) -> Result<Self, Self::Error> {
        value.validate()?;
        // Names are kept verbatim so stale keys can still be matched and cleared.
        let category = value.category.trim().to_string();
        let subgroup = value.subgroup.trim().to_string();
        if category.is_empty() {
            return Err(TypeConstraintError::EmptyString("category").into());
        }
        if subgroup.is_empty() {
            return Err(TypeConstraintError::EmptyString("subgroup").into());
        }
        Ok(Self { category, subgroup })
    }
}

#[derive(Deserialize, Validate)]
pub struct UpdateProfileForm {
    #[validate(length(max = 128))]
    #[serde(default)]
    pub firstname: String,
    #[validate(length(max = 128))]
    #[serde(default)]
    pub lastname: String,
    #[validate(length(max = 32))]
    #[serde(default)]
    pub phone: String,
    #[validate(length(max = 128))]
    #[serde(default)]
    pub city: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UpdateProfileFormPayload {
    pub firstname: String,
    pub lastname: String,
    pub phone: String,
    pub city: String,
}

#[derive(Debug, Error)]
pub enum UpdateProfileFormError {
    #[error("Profile form validation failed: {0}")]
    Validation(String),
}

impl From<ValidationErrors> for UpdateProfileFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl TryFrom<UpdateProfileForm> for UpdateProfileFormPayload {
    type Error = UpdateProfileFormError;

    fn try_from(value: UpdateProfileForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            firstname: value.firstname.trim().to_string(),
            lastname: value.lastname.trim().to_string(),
            phone: value.phone.trim().to_string(),
            city: value.city.trim().to_string(),
        })
    }
}

impl From<UpdateProfileFormPayload> for ProfileAttributes {
    fn from(value: UpdateProfileFormPayload) -> Self {
        Self {
            firstname: value.firstname,
            lastname: value.lastname,
            phone: value.phone,
            city: value.city,
        }
    }
}
