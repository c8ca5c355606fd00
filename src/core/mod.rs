pub mod config;
pub mod selection;
pub mod source;
pub mod views;
