//! Filter pipeline: resolve, validate, then apply in order.
//!
//! ## Stages
//!
//! ```text
//! FilterSpec list ──build──▶ Pipeline (validated filters) ──apply──▶ Grid
//! ```
//!
//! [`Pipeline::build`] walks the specs in order. Each name token is resolved
//! to a [`FilterKind`]; unknown names are reported through a
//! [`PipelineEvent::UnknownFilter`] and skipped (or rejected when the
//! configured policy is [`UnknownFilters::Error`]). Parameters are parsed
//! and validated for every recognized filter before any pixel work starts,
//! so a bad parameter aborts the run without producing output.
//!
//! [`Pipeline::apply`] then runs the filters against the working grid. A
//! crop replaces the carried [`Dimensions`] with the cropped grid's actual
//! size; every other filter leaves them alone.

use crate::bmp::InfoHeader;
use crate::config::UnknownFilters;
use crate::filters::Filter;
use crate::types::Grid;
use serde::Serialize;
use std::sync::mpsc::Sender;
use thiserror::Error;

/// Lowest accepted drop-effect strength.
pub const MIN_DROP_STRENGTH: f32 = 2.0;

/// One filter request as tokenized from the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterSpec {
    pub name: String,
    pub params: Vec<String>,
}

impl FilterSpec {
    pub fn new(name: impl Into<String>, params: &[&str]) -> Self {
        Self {
            name: name.into(),
            params: params.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParameterError {
    #[error("{filter} filter requires {expected}.")]
    Missing {
        filter: &'static str,
        expected: &'static str,
    },
    #[error("Invalid {param} for {filter} filter: '{value}' is not a valid {kind}.")]
    Invalid {
        filter: &'static str,
        param: &'static str,
        value: String,
        kind: &'static str,
    },
    #[error("Drop effect filter requires a strength parameter not less than 2, got {0}.")]
    DropStrength(f32),
    #[error("Gaussian blur filter requires a positive sigma, got {0}.")]
    NonPositiveSigma(f32),
    #[error("Unknown filter: {0}")]
    UnknownFilter(String),
}

/// Every filter the command line can name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterKind {
    Crop,
    Grayscale,
    Negative,
    Sharpen,
    EdgeDetection,
    GaussianBlur,
    Drop,
}

impl FilterKind {
    pub const ALL: [FilterKind; 7] = [
        FilterKind::Crop,
        FilterKind::Grayscale,
        FilterKind::Negative,
        FilterKind::Sharpen,
        FilterKind::EdgeDetection,
        FilterKind::GaussianBlur,
        FilterKind::Drop,
    ];

    /// Resolve a command-line token such as `-blur`.
    pub fn from_token(token: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.token() == token)
    }

    pub fn token(self) -> &'static str {
        match self {
            FilterKind::Crop => "-crop",
            FilterKind::Grayscale => "-gs",
            FilterKind::Negative => "-neg",
            FilterKind::Sharpen => "-sharp",
            FilterKind::EdgeDetection => "-edge",
            FilterKind::GaussianBlur => "-blur",
            FilterKind::Drop => "-drop",
        }
    }

    fn label(self) -> &'static str {
        match self {
            FilterKind::Crop => "Crop",
            FilterKind::Grayscale => "Grayscale",
            FilterKind::Negative => "Negative",
            FilterKind::Sharpen => "Sharpen",
            FilterKind::EdgeDetection => "Edge detection",
            FilterKind::GaussianBlur => "Gaussian blur",
            FilterKind::Drop => "Drop effect",
        }
    }

    /// Parse and validate `params` into a ready-to-apply [`Filter`].
    ///
    /// Extra trailing parameters are ignored.
    pub fn build(self, params: &[String]) -> Result<Filter, ParameterError> {
        let filter = self.label();
        let missing = |expected| ParameterError::Missing { filter, expected };
        match self {
            FilterKind::Crop => {
                let [width, height] = match params {
                    [w, h, ..] => [w, h],
                    _ => return Err(missing("width and height parameters")),
                };
                Ok(Filter::Crop {
                    width: parse_size(filter, "width", width)?,
                    height: parse_size(filter, "height", height)?,
                })
            }
            FilterKind::Grayscale => Ok(Filter::Grayscale),
            FilterKind::Negative => Ok(Filter::Negative),
            FilterKind::Sharpen => Ok(Filter::Sharpen),
            FilterKind::EdgeDetection => {
                let threshold = params
                    .first()
                    .ok_or_else(|| missing("a threshold parameter"))?;
                Ok(Filter::EdgeDetection {
                    threshold: parse_float(filter, "threshold", threshold)?,
                })
            }
            FilterKind::GaussianBlur => {
                let sigma = params.first().ok_or_else(|| missing("a sigma parameter"))?;
                let sigma = parse_float(filter, "sigma", sigma)?;
                if sigma <= 0.0 {
                    return Err(ParameterError::NonPositiveSigma(sigma));
                }
                Ok(Filter::GaussianBlur { sigma })
            }
            FilterKind::Drop => {
                let strength = params
                    .first()
                    .ok_or_else(|| missing("a strength parameter not less than 2"))?;
                let strength = parse_float(filter, "strength", strength)?;
                if strength < MIN_DROP_STRENGTH {
                    return Err(ParameterError::DropStrength(strength));
                }
                // A centre needs both coordinates; a lone x is ignored.
                let (center_x, center_y) = match params {
                    [_, x, y, ..] => (
                        parse_center(filter, "center_x", x)?,
                        parse_center(filter, "center_y", y)?,
                    ),
                    _ => (None, None),
                };
                Ok(Filter::Drop {
                    strength,
                    center_x,
                    center_y,
                })
            }
        }
    }
}

fn parse_size(
    filter: &'static str,
    param: &'static str,
    value: &str,
) -> Result<usize, ParameterError> {
    value.parse().map_err(|_| ParameterError::Invalid {
        filter,
        param,
        value: value.to_string(),
        kind: "non-negative integer",
    })
}

fn parse_float(
    filter: &'static str,
    param: &'static str,
    value: &str,
) -> Result<f32, ParameterError> {
    value
        .parse::<f32>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| ParameterError::Invalid {
            filter,
            param,
            value: value.to_string(),
            kind: "finite number",
        })
}

/// Negative coordinates select the automatic centre.
fn parse_center(
    filter: &'static str,
    param: &'static str,
    value: &str,
) -> Result<Option<f32>, ParameterError> {
    let v = parse_float(filter, param, value)?;
    Ok((v >= 0.0).then_some(v))
}

/// Width/height carried alongside the working grid, in info-header terms.
///
/// Starts from the decoded header (sign of `height` included) and is only
/// replaced by a crop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Dimensions {
    pub width: i32,
    pub height: i32,
}

impl Dimensions {
    pub fn of_header(info: &InfoHeader) -> Self {
        Self {
            width: info.width,
            height: info.height,
        }
    }

    fn of(grid: &Grid) -> Self {
        // Crop only shrinks, so both values came from i32 header fields.
        Self {
            width: i32::try_from(grid.width()).unwrap_or(i32::MAX),
            height: i32::try_from(grid.height()).unwrap_or(i32::MAX),
        }
    }
}

/// Progress reported while building and running a pipeline.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// A name that matched no filter was skipped. `position` is 1-based.
    UnknownFilter { position: usize, name: String },
    /// A filter finished; `width`/`height` describe its output grid.
    FilterApplied {
        position: usize,
        filter: Filter,
        width: usize,
        height: usize,
    },
}

#[derive(Debug, Clone, PartialEq)]
struct Step {
    position: usize,
    filter: Filter,
}

/// An ordered, fully validated filter chain.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Pipeline {
    steps: Vec<Step>,
    skipped: Vec<String>,
}

impl Pipeline {
    /// Resolve and validate every spec.
    ///
    /// Fails on the first spec with missing or malformed parameters, and on
    /// the first unknown name when `unknown` is [`UnknownFilters::Error`].
    pub fn build(
        specs: &[FilterSpec],
        unknown: UnknownFilters,
        events: Option<&Sender<PipelineEvent>>,
    ) -> Result<Self, ParameterError> {
        let mut pipeline = Pipeline::default();
        for (index, spec) in specs.iter().enumerate() {
            let position = index + 1;
            let Some(kind) = FilterKind::from_token(&spec.name) else {
                if unknown == UnknownFilters::Error {
                    return Err(ParameterError::UnknownFilter(spec.name.clone()));
                }
                emit(
                    events,
                    PipelineEvent::UnknownFilter {
                        position,
                        name: spec.name.clone(),
                    },
                );
                pipeline.skipped.push(spec.name.clone());
                continue;
            };
            let filter = kind.build(&spec.params)?;
            pipeline.steps.push(Step { position, filter });
        }
        Ok(pipeline)
    }

    /// Validated filters in application order.
    pub fn filters(&self) -> impl Iterator<Item = &Filter> {
        self.steps.iter().map(|step| &step.filter)
    }

    /// Names that were skipped as unknown.
    pub fn skipped(&self) -> &[String] {
        &self.skipped
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Run every filter in order, returning the final grid.
    ///
    /// `dimensions` is overwritten with the cropped size after each crop.
    pub fn apply(
        &self,
        grid: Grid,
        dimensions: &mut Dimensions,
        events: Option<&Sender<PipelineEvent>>,
    ) -> Grid {
        self.steps.iter().fold(grid, |current, step| {
            let next = step.filter.apply(&current);
            if step.filter.changes_dimensions() {
                *dimensions = Dimensions::of(&next);
            }
            emit(
                events,
                PipelineEvent::FilterApplied {
                    position: step.position,
                    filter: step.filter,
                    width: next.width(),
                    height: next.height(),
                },
            );
            next
        })
    }
}

fn emit(events: Option<&Sender<PipelineEvent>>, event: PipelineEvent) {
    if let Some(tx) = events {
        // A dropped receiver only means nobody is listening.
        tx.send(event).ok();
    }
}
