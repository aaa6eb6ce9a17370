pub mod config;
pub mod refresh;
pub mod render;
pub mod routes;
pub mod state;
pub mod token;
