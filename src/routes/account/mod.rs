mod delete;
mod info;
mod password;

pub use delete::delete_user;
pub use info::get_user_info;
pub use password::update_password;
