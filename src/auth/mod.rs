//! Authentication: the single configured author and the session flag.

pub mod credentials;
pub mod session;

pub use credentials::{Credentials, LoginError};
pub use session::{flash, is_logged_in, log_in, log_out, take_flashes};
