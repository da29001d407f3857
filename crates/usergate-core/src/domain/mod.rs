//! 도메인 모델.

mod role;
mod user;

pub use role::Role;
pub use user::{NewProfile, NewUser, Profile, User, UserChanges, UserWithProfile};
