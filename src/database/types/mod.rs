mod user;

pub use user::{default_seed, ProfileUpdate, RolesUpdate, User};
