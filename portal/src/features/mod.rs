pub mod analytics;
pub mod auth;
pub mod meeting;
pub mod records;
pub mod statistics;
pub mod upload;
pub mod user;
