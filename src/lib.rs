pub mod combine;
pub mod config;
pub mod discover;
pub mod pipeline;
pub mod process;
pub mod schema;
pub mod sink;
pub mod summary;

pub use config::Config;
pub use discover::{discover_inputs, InputFile, Source};
pub use pipeline::{run, RunReport};
pub use process::{load_table, NormalizedTable};
