pub mod auth;
pub mod meeting;
pub mod statistics;
pub mod upload;
pub mod user;
