pub mod cookies;
pub mod password;
pub mod time;
pub mod token;

pub use password::*;
pub use time::*;
pub use token::*;
