pub mod server;

pub mod models;
pub mod services;
pub mod web;
