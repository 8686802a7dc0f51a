pub mod app;
pub mod config;
pub mod header;
pub mod images;
pub mod models;
pub mod page;
pub mod rating;
pub mod tmdb;
pub mod views;
