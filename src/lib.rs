pub mod auth;
pub mod auth0;
pub mod config;
pub mod dictionary;
pub mod error;
pub mod gateway;
pub mod i18n;
pub mod identity;
pub mod schema;
pub mod server;
pub mod training;
