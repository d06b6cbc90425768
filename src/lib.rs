pub mod chart;
pub mod data;
pub mod error;
pub mod render;
pub mod table;

pub use chart::{ChartSpec, PlotSeries};
pub use error::ChartError;
pub use render::{FileRenderer, Renderer, ViewerRenderer};
pub use table::Table;
