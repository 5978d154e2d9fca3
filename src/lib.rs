pub mod api;
pub mod catalogue;
pub mod clients;
pub mod config;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod prompts;
pub mod renderer;
pub mod sanitize;
pub mod utils;
