use std::path::PathBuf;

use thiserror::Error;

/// Fatal failures while reading and cleaning the source file.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed CSV in {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} is missing required column '{column}'")]
    MissingColumn { path: PathBuf, column: String },

    #[error("{path} contains no usable rows ({dropped} dropped during cleaning)")]
    NoRecords { path: PathBuf, dropped: usize },
}

/// Recoverable conditions raised by the filter-and-aggregate pipeline.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PipelineError {
    #[error("No data found for the selected filters. Try selecting more options.")]
    EmptyResult,
}
