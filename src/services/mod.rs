pub mod auth_service;
pub mod link_service;
pub mod token_service;
