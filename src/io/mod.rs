//! File output: trajectory CSV and episode summary JSON.

mod summary;
mod trajectory_csv;

pub use summary::EpisodeSummary;
pub use trajectory_csv::{
    export_trajectory_csv, load_trajectory_csv, read_trajectory_csv, write_trajectory_csv,
};
