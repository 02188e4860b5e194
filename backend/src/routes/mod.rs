pub mod auth;
pub mod hello;
