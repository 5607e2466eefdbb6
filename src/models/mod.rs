pub mod query_log;
pub mod user;

pub use query_log::*;
pub use user::*;
