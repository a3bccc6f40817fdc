pub mod config;
pub mod events;
pub mod gui;
pub mod icon;
mod macros;
pub mod sys;
