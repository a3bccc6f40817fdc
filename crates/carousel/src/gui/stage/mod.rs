pub mod model;
pub mod view;

pub use model::{Card, Stage, Visual};
pub use view::draw;

pub const ICON_SIZE: i32 = 256;
pub const CARD_SIZE: f64 = 160.0; // card edge at scale 1
pub const CARD_CORNER_RADIUS: f64 = 18.0;
pub const ICON_FILL: f64 = 0.6; // icon edge relative to card edge
pub const LABEL_FONT_SIZE: f64 = 16.0;
