pub mod loader;

pub use loader::{bracket_options, load_dataset, read_dataset};
