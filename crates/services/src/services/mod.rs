pub mod api_client;
pub mod auth;
pub mod cart;
pub mod config;
pub mod confirm;
pub mod list_store;
pub mod message;
pub mod query;
pub mod search;
pub mod selection;
pub mod transactions;
pub mod validation;
