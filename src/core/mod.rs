pub mod config;
pub mod entities;
pub mod errors;
pub mod helpers;
pub mod logger;
pub mod service;
pub mod theme;
