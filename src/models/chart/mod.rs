pub mod kind;

pub use kind::{ChartKind, ImageFormat, RenderedChart};
