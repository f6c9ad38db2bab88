mod errors;
mod services;
mod types;

pub use errors::DatabaseError;
pub use services::{connect_store, InMemoryUserStore, PostgresUserStore, UserStore};
pub use types::{default_seed, ProfileUpdate, RolesUpdate, User};
