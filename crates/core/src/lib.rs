pub mod color;
pub mod error;
pub mod export;
pub mod hierarchy;
pub mod human;
pub mod loader;
pub mod model;
pub mod scene;
pub mod search;
pub mod treemap;
pub mod viewport;

pub use error::*;
pub use model::*;
pub use treemap::{layout, Layout, LeafRect, Rect};
