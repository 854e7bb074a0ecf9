pub mod engine;
pub mod models;
pub mod repositories;
pub mod rules;
pub mod services;
