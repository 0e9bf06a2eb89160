/// Authorization guard
///
/// Decides whether an actor may perform an action on an aggregate. The
/// decision is a pure function of its inputs; stores call it while they hold
/// the aggregate lock so the check and the write see the same state.
use std::fmt;
use uuid::Uuid;

use crate::error::AppError;

/// Who is acting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Anonymous,
    User(Uuid),
}

impl Actor {
    fn is(&self, owner: Uuid) -> bool {
        matches!(self, Actor::User(id) if *id == owner)
    }
}

/// What is being attempted, with the owners the decision depends on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Listing or reading posts and profiles
    Read,
    UpdateProfile { owner: Uuid },
    CreatePost,
    UpdatePost { author: Uuid },
    DeletePost { author: Uuid },
    AddComment,
    DeleteComment { comment_author: Uuid, post_author: Uuid },
    ToggleLike,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    NotAuthenticated,
    NotProfileOwner,
    NotPostAuthor,
    NotCommentOwner,
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            DenyReason::NotAuthenticated => "Authentication required",
            DenyReason::NotProfileOwner => "You can only update your own profile",
            DenyReason::NotPostAuthor => "Unauthorized: only the author can modify this blog",
            DenyReason::NotCommentOwner => {
                "Unauthorized: only the commenter or the blog author can delete this comment"
            }
        };
        f.write_str(msg)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allow,
    Deny(DenyReason),
}

impl Decision {
    /// `Deny` becomes [`AppError::Forbidden`]
    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            Decision::Allow => Ok(()),
            Decision::Deny(reason) => {
                tracing::warn!(%reason, "authorization denied");
                Err(AppError::Forbidden(reason.to_string()))
            }
        }
    }
}

pub fn authorize(actor: Actor, action: Action) -> Decision {
    use Decision::{Allow, Deny};

    if action == Action::Read {
        return Allow;
    }
    if actor == Actor::Anonymous {
        return Deny(DenyReason::NotAuthenticated);
    }

    match action {
        Action::Read | Action::CreatePost | Action::AddComment | Action::ToggleLike => Allow,
        Action::UpdateProfile { owner } if actor.is(owner) => Allow,
        Action::UpdateProfile { .. } => Deny(DenyReason::NotProfileOwner),
        Action::UpdatePost { author } | Action::DeletePost { author } if actor.is(author) => Allow,
        Action::UpdatePost { .. } | Action::DeletePost { .. } => Deny(DenyReason::NotPostAuthor),
        Action::DeleteComment {
            comment_author,
            post_author,
        } if actor.is(comment_author) || actor.is(post_author) => Allow,
        Action::DeleteComment { .. } => Deny(DenyReason::NotCommentOwner),
    }
}
