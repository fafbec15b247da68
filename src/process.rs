//! One end-to-end run: decode, filter, encode.
//!
//! ```text
//! input.bmp ──decode──▶ Bitmap ──Pipeline──▶ Grid ──encode──▶ output.bmp
//!                         │                    ▲
//!                         └── Dimensions ──────┘ (crop updates them)
//! ```
//!
//! Every failure is terminal and surfaces as a [`ProcessError`]. Decoding
//! and parameter validation both finish before any filter runs, and the
//! output file is only created once the final grid is ready, so a rejected
//! run never leaves a partial output behind.
//!
//! Header fields other than width and height are carried through from the
//! input untouched unless `output.update_header_sizes` is set.

use crate::bmp::{Bitmap, BmpError};
use crate::config::{ConfigError, ProcessorConfig};
use crate::pipeline::{Dimensions, FilterSpec, ParameterError, Pipeline, PipelineEvent};
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ProcessError {
    #[error(transparent)]
    Bmp(#[from] BmpError),
    #[error(transparent)]
    Parameter(#[from] ParameterError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// What a finished run did, serializable for `--report`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProcessReport {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Width and height as stored in the input's info header.
    pub source: Dimensions,
    /// Width and height written to the output's info header.
    pub result: Dimensions,
    /// Applied filters in order, with their parameters.
    pub filters: Vec<String>,
    /// Unknown filter names that were skipped.
    pub skipped: Vec<String>,
}

/// Decode `input`, run `specs` in order and write the result to `output`.
///
/// Events go to `events` when given; the sender is dropped on return so a
/// printer thread draining the receiver terminates.
pub fn process(
    input: &Path,
    output: &Path,
    specs: &[FilterSpec],
    config: &ProcessorConfig,
    events: Option<Sender<PipelineEvent>>,
) -> Result<ProcessReport, ProcessError> {
    let Bitmap {
        file_header,
        mut info_header,
        grid,
    } = Bitmap::open(input)?;

    let pipeline = Pipeline::build(specs, config.pipeline.unknown_filters, events.as_ref())?;

    let source = Dimensions::of_header(&info_header);
    let mut result = source;
    let grid = pipeline.apply(grid, &mut result, events.as_ref());
    info_header.width = result.width;
    info_header.height = result.height;

    let mut bitmap = Bitmap {
        file_header,
        info_header,
        grid,
    };
    if config.output.update_header_sizes {
        bitmap.reconcile_sizes()?;
    }
    bitmap.save(output)?;

    Ok(ProcessReport {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        source,
        result,
        filters: pipeline.filters().map(ToString::to_string).collect(),
        skipped: pipeline.skipped().to_vec(),
    })
}

/// Write `report` as pretty-printed JSON.
pub fn write_report(report: &ProcessReport, path: &Path) -> Result<(), ProcessError> {
    let json = serde_json::to_string_pretty(report)?;
    fs::write(path, json)?;
    Ok(())
}
