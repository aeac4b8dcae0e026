pub mod common;

pub mod server {
    pub mod config;
    pub mod routes;
    pub mod service;
}
