// Services module - remote metadata providers

pub mod tmdb;
