use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::types::{GroupId, GroupName, TypeConstraintError};

/// Form submitted to create a category, or a sub-group when `parent_id` is set.
#[derive(Deserialize, Validate)]
pub struct AddGroupForm {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
    #[serde(default)]
    #[validate(range(min = 1))]
    pub parent_id: Option<i32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AddGroupFormPayload {
    pub name: GroupName,
    pub parent_id: Option<GroupId>,
}

#[derive(Debug, Error)]
pub enum AddGroupFormError {
    #[error("Add group form validation failed: {0}")]
    Validation(String),
    #[error("Add group form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for AddGroupFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for AddGroupFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<AddGroupForm> for AddGroupFormPayload {
    type Error = AddGroupFormError;

    fn try_from(value: AddGroupForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: GroupName::new(value.name)?,
            parent_id: value.parent_id.map(GroupId::new).transpose()?,
        })
    }
}

#[derive(Deserialize, Validate)]
pub struct RenameGroupForm {
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenameGroupFormPayload {
    pub name: GroupName,
}

#[derive(Debug, Error)]
pub enum RenameGroupFormError {
    #[error("Rename group form validation failed: {0}")]
    Validation(String),
    #[error("Rename group form contains invalid data: {0}")]
    TypeConstraint(String),
}

impl From<ValidationErrors> for RenameGroupFormError {
    fn from(value: ValidationErrors) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<TypeConstraintError> for RenameGroupFormError {
    fn from(value: TypeConstraintError) -> Self {
        Self::TypeConstraint(value.to_string())
    }
}

impl TryFrom<RenameGroupForm> for RenameGroupFormPayload {
    type Error = RenameGroupFormError;

    fn try_from(value: RenameGroupForm) -> Result<Self, Self::Error> {
        value.validate()?;
        Ok(Self {
            name: GroupName::new(value.name)?,
        })
    }
}
