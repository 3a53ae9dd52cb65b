pub mod memory;
pub mod model;
pub mod repo;
pub mod store;

pub use model::{NewUserRecord, UserChanges, UserRecord};
pub use store::{StoreError, UserStore};
