mod expense;
mod money;
mod savings;
mod user;

pub use expense::*;
pub use money::*;
pub use savings::*;
pub use user::*;
