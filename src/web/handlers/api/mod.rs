//! API 处理器

pub mod health;
pub mod translate;

pub use health::*;
pub use translate::*;
