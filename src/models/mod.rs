mod organization;
mod principal;
mod role;
mod user;

pub use organization::*;
pub use principal::*;
pub use role::*;
pub use user::*;
