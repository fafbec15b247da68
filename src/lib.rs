//! # BMP Filters
//!
//! Reads an uncompressed 24-bit BMP, runs an ordered chain of pixel filters
//! over it and writes the result back in the same format.
//!
//! # Architecture: Decode, Filter, Encode
//!
//! ```text
//! 1. Decode   input.bmp  →  Bitmap     (headers validated, rows top-down)
//! 2. Filter   Grid       →  Grid       (each filter a pure transform)
//! 3. Encode   Bitmap     →  output.bmp (headers written back verbatim)
//! ```
//!
//! The library never prints. Errors are returned as `thiserror` enums, one
//! per layer, and progress is reported as [`pipeline::PipelineEvent`]s over
//! an optional channel so the binary decides what reaches the terminal.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`bmp`] | Header layout, validation, and the byte-exact codec |
//! | [`types`] | `Pixel` and the row-major `Grid` every filter works on |
//! | [`filters`] | Crop, grayscale, negative, sharpen, edge, blur, drop; shared convolution |
//! | [`pipeline`] | Filter name resolution, parameter validation, ordered application |
//! | [`args`] | Splits raw command-line tokens into filter specs |
//! | [`process`] | One end-to-end run plus the JSON run report |
//! | [`config`] | Optional `config.toml`: thread cap, unknown-filter policy, header sizes |
//! | [`output`] | CLI output formatting for pipeline events and the summary |
//!
//! # Design Decisions
//!
//! ## Header Values Are Carried, Not Recomputed
//!
//! Decoded header fields are written back as read. Only width and height
//! change, and only when a crop runs. Recomputing `file_size` and
//! `image_size` is opt-in (`output.update_header_sizes`), so a file that
//! went through value-only filters comes out with byte-identical headers.
//!
//! ## Deterministic Parallelism
//!
//! Filters fan out across output rows with rayon. Every output pixel reads
//! only from the input grid and sums its kernel in a fixed order, so results
//! do not depend on the thread count.

pub mod args;
pub mod bmp;
pub mod config;
pub mod filters;
pub mod output;
pub mod pipeline;
pub mod process;
pub mod types;

#[cfg(test)]
pub(crate) mod test_helpers;
