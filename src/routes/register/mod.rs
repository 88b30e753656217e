mod post;

pub use post::register;
