pub mod app;
pub mod host;
pub mod stage;
pub mod theme;
