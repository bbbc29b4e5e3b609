pub mod config;
pub mod db;
pub mod errors;
pub mod generator;
pub mod handlers;
pub mod models;
pub mod registration;
pub mod throttle;
