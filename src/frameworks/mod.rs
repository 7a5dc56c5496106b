// Frameworks: process bootstrap, configuration and the terminal loop.

pub mod app;
pub mod config;
pub mod terminal;
