//! Ownership-or-read-only permission policy
//!
//! Every owned resource names the field that designates its owner through
//! [`OwnerField`]. Safe methods are open to everyone; writes require an
//! authenticated caller matching that owner, or a staff account.

use axum::http::Method;

use crate::{
    error::{ApiError, ApiResult},
    middleware::AuthUser,
    models::{Comment, Favorite, Profile, Recipe},
};

/// Which attribute of a resource designates its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OwnerField {
    /// Owned through a `user` reference
    User(i64),
    /// Owned through an `author` reference
    Author(i64),
    /// No owner attribute: never writable through the ownership policy
    Unowned,
}

impl OwnerField {
    pub fn owner_id(&self) -> Option<i64> {
        match *self {
            OwnerField::User(id) | OwnerField::Author(id) => Some(id),
            OwnerField::Unowned => None,
        }
    }
}

/// Resources checked against the ownership policy
pub trait Owned {
    fn owner_field(&self) -> OwnerField;
}

impl Owned for Profile {
    fn owner_field(&self) -> OwnerField {
        OwnerField::User(self.user_id)
    }
}

impl Owned for Comment {
    fn owner_field(&self) -> OwnerField {
        OwnerField::User(self.user_id)
    }
}

impl Owned for Favorite {
    fn owner_field(&self) -> OwnerField {
        OwnerField::User(self.user_id)
    }
}

impl Owned for Recipe {
    fn owner_field(&self) -> OwnerField {
        OwnerField::Author(self.author_id)
    }
}

/// GET, HEAD and OPTIONS never modify state
pub fn is_safe_method(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Writes require a caller; reads are open
pub fn authenticated_or_read_only<'a>(
    method: &Method,
    user: Option<&'a AuthUser>,
) -> ApiResult<Option<&'a AuthUser>> {
    if is_safe_method(method) {
        return Ok(user);
    }

    user.map(Some).ok_or(ApiError::Unauthorized)
}

/// Object-level check: reads are open, writes need the owner or staff
pub fn owner_or_read_only(
    method: &Method,
    user: Option<&AuthUser>,
    resource: &impl Owned,
) -> ApiResult<()> {
    if is_safe_method(method) {
        return Ok(());
    }

    let user = user.ok_or(ApiError::Unauthorized)?;
    if user.is_staff {
        return Ok(());
    }

    match resource.owner_field().owner_id() {
        Some(owner_id) if owner_id == user.id => Ok(()),
        _ => Err(ApiError::Forbidden),
    }
}

/// Who may update or delete user accounts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserWritePolicy {
    /// Only the account itself (or staff)
    SelfOnly,
    /// Anyone, including anonymous callers
    Open,
}

/// Check a write to the account `target_id`
pub fn user_write(
    policy: UserWritePolicy,
    user: Option<&AuthUser>,
    target_id: i64,
) -> ApiResult<()> {
    if policy == UserWritePolicy::Open {
        return Ok(());
    }

    let user = user.ok_or(ApiError::Unauthorized)?;
    if user.is_staff || user.id == target_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden)
    }
}
