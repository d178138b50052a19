//! Membership oracle: who belongs to a project.

use serde::Serialize;

use crate::model::{Project, UserId};

/// Owner is authorized even when absent from `members`.
#[must_use]
pub fn is_owner(project: &Project, user: &UserId) -> bool {
    project.owner == *user
}

#[must_use]
pub fn is_member(project: &Project, user: &UserId) -> bool {
    project.members.contains(user)
}

/// Answer for a (project, user) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Membership {
    pub is_owner: bool,
    pub is_member: bool,
    pub is_authorized: bool,
}

impl Membership {
    #[must_use]
    pub fn of(project: &Project, user: &UserId) -> Self {
        let is_owner = is_owner(project, user);
        let is_member = is_member(project, user);
        Self {
            is_owner,
            is_member,
            is_authorized: is_owner || is_member,
        }
    }
}
