mod identity;
mod username;

pub use identity::{Identity, NewIdentity, UserId, UserProfile};
pub use username::Username;
