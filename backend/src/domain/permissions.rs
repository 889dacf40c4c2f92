//! Role-based access policies.
//!
//! Each endpoint names one [`Policy`]; handlers describe the caller as an
//! [`Actor`], the attempted [`Access`] and the [`Subject`] it touches, and the
//! policy answers allow or deny. Denials for anonymous callers surface as
//! `401 Unauthorized`, denials for signed-in callers as `403 Forbidden`.

use crate::domain::{Error, User, UserId};

/// Who is making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Actor {
    /// No bearer token was presented.
    Anonymous,
    /// A bearer token resolved to this user.
    Authenticated(User),
}

impl Actor {
    /// The signed-in user, if any.
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }

    /// The signed-in user or `401 Unauthorized`.
    pub fn require_user(&self) -> Result<&User, Error> {
        self.user().ok_or_else(not_authenticated)
    }

    fn is_admin(&self) -> bool {
        self.user().is_some_and(User::is_admin)
    }

    fn is_moderator(&self) -> bool {
        self.user().is_some_and(User::is_moderator)
    }

    fn owns(&self, owner: UserId) -> bool {
        self.user().is_some_and(|user| user.id == owner)
    }
}

/// Kind of operation being attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    /// GET, HEAD or OPTIONS.
    Read,
    /// POST.
    Create,
    /// PATCH or PUT.
    Update,
    /// DELETE.
    Delete,
}

impl Access {
    /// Whether the operation leaves state untouched.
    pub const fn is_safe(self) -> bool {
        matches!(self, Self::Read)
    }
}

/// What the operation targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Subject {
    /// A collection or an object without an owner.
    Collection,
    /// An object authored by the given user.
    Owned(UserId),
    /// The caller's own profile (`/users/me/`).
    OwnProfile,
}

/// Outcome of evaluating a policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny,
}

/// Access policies attached to endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Policy {
    /// Administrators only, reads included.
    AdminOnly,
    /// Any signed-in user for their own profile; administrators otherwise.
    SelfOrAdmin,
    /// Reads are open; mutations require an administrator.
    AdminWritePublicRead,
    /// Reads are open; creating needs a signed-in user; editing or removing
    /// needs the author, a moderator or an administrator.
    ContentOwnership,
}

impl Policy {
    /// Decide whether `actor` may perform `access` on `subject`.
    ///
    /// # Examples
    /// ```
    /// use yamdb::domain::{Access, Actor, Decision, Policy, Subject};
    ///
    /// let decision = Policy::AdminWritePublicRead.evaluate(&Actor::Anonymous, Access::Read, Subject::Collection);
    /// assert_eq!(decision, Decision::Allow);
    /// ```
    pub fn evaluate(self, actor: &Actor, access: Access, subject: Subject) -> Decision {
        let allowed = match self {
            Self::AdminOnly => actor.is_admin(),
            Self::SelfOrAdmin => match subject {
                Subject::OwnProfile => actor.user().is_some(),
                Subject::Collection | Subject::Owned(_) => actor.is_admin(),
            },
            Self::AdminWritePublicRead => access.is_safe() || actor.is_admin(),
            Self::ContentOwnership => match access {
                Access::Read => true,
                Access::Create => actor.user().is_some(),
                Access::Update | Access::Delete => {
                    let owner = matches!(subject, Subject::Owned(id) if actor.owns(id));
                    owner || actor.is_moderator() || actor.is_admin()
                }
            },
        };
        if allowed {
            Decision::Allow
        } else {
            Decision::Deny
        }
    }

    /// Evaluate and convert a denial into the matching error.
    pub fn authorize(self, actor: &Actor, access: Access, subject: Subject) -> Result<(), Error> {
        match self.evaluate(actor, access, subject) {
            Decision::Allow => Ok(()),
            Decision::Deny => match actor {
                Actor::Anonymous => Err(not_authenticated()),
                Actor::Authenticated(_) => Err(Error::forbidden(
                    "you do not have permission to perform this action",
                )),
            },
        }
    }
}

fn not_authenticated() -> Error {
    Error::unauthorized("authentication credentials were not provided")
}
