//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod content;
pub mod identity;
pub mod social;
pub mod user;
pub mod validation;

pub use content::{CommentContent, PostContent};
pub use identity::{ExternalIdentity, Session};
pub use social::{Comment, FollowState, Notification, NotificationKind, Post};
pub use user::{NewUser, SuggestedUser, User, UserCounts, UserProfile};
pub use validation::ValidationError;
