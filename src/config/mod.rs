//! Scene configuration: the theme palette table and the shared control record

pub mod store;
pub mod theme;

pub use store::{ControlAction, TreeConfig};
pub use theme::{Theme, ThemePalette, GIFT_RED};
