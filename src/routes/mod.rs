mod account;
mod health_check;
mod login;
mod register;
mod response;

pub use account::*;
pub use health_check::*;
pub use login::*;
pub use register::*;
pub use response::*;
