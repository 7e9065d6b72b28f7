pub mod auth;
pub mod link;
pub mod session;
pub mod user;
