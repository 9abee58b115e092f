pub mod common;
pub mod session;
pub mod transaction;
pub mod user;

pub use common::*;
pub use session::*;
pub use transaction::*;
pub use user::*;
