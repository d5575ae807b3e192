//! Catalog data model.

mod filter;
mod item;
mod map;
mod playlist;

pub use filter::{ItemFilter, Statistics};
pub use item::{Item, MediaRef};
pub use map::ItemMap;
pub use playlist::Playlist;
