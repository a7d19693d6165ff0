//! Coordinate transform plumbing.
//!
//! The decoder consumes a transform as an opaque `(x, y) -> (x, y)` function.
//! A failing transform never aborts decoding: the untransformed pair is kept
//! and the failure is counted.

use thiserror::Error;

use crate::Position;

/// Errors a fallible transform may report.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum TransformError {
    #[error("transform produced non-finite output for ({x}, {y})")]
    NonFinite { x: f64, y: f64 },
    #[error("transform failed: {0}")]
    Failed(String),
}

/// Planar coordinate transform applied to every decoded `(x, y)` pair.
///
/// Implemented for plain closures returning `(f64, f64)`; wrap closures that
/// can fail in [`TryTransform`].
///
/// # Examples
/// ```
/// use shpjson_core::CoordinateTransform;
///
/// let shift = |x: f64, y: f64| (x + 10.0, y - 10.0);
/// assert_eq!(shift.transform(1.0, 1.0), Ok((11.0, -9.0)));
/// ```
pub trait CoordinateTransform {
    fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), TransformError>;
}

impl<F> CoordinateTransform for F
where
    F: Fn(f64, f64) -> (f64, f64),
{
    fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), TransformError> {
        Ok(self(x, y))
    }
}

/// The identity transform.
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl CoordinateTransform for Identity {
    fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), TransformError> {
        Ok((x, y))
    }
}

/// Adapter for closures that may fail.
///
/// # Examples
/// ```
/// use shpjson_core::{CoordinateTransform, TransformError, TryTransform};
///
/// let only_positive = TryTransform(|x: f64, y: f64| {
///     if x < 0.0 {
///         Err(TransformError::Failed("negative x".to_string()))
///     } else {
///         Ok((x, y))
///     }
/// });
/// assert!(only_positive.transform(-1.0, 0.0).is_err());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct TryTransform<F>(pub F);

impl<F> CoordinateTransform for TryTransform<F>
where
    F: Fn(f64, f64) -> Result<(f64, f64), TransformError>,
{
    fn transform(&self, x: f64, y: f64) -> Result<(f64, f64), TransformError> {
        (self.0)(x, y)
    }
}

/// Applies an optional transform and tracks fallbacks for one decode call.
pub(crate) struct Projector<'t> {
    transform: Option<&'t dyn CoordinateTransform>,
    failures: usize,
    first_error: Option<TransformError>,
}

impl<'t> Projector<'t> {
    pub(crate) fn new(transform: Option<&'t dyn CoordinateTransform>) -> Self {
        Self {
            transform,
            failures: 0,
            first_error: None,
        }
    }

    pub(crate) fn project(&mut self, x: f64, y: f64) -> Position {
        let Some(transform) = self.transform else {
            return vec![x, y];
        };
        let result = transform.transform(x, y).and_then(|(px, py)| {
            if px.is_finite() && py.is_finite() {
                Ok((px, py))
            } else {
                Err(TransformError::NonFinite { x, y })
            }
        });
        match result {
            Ok((px, py)) => vec![px, py],
            Err(err) => {
                tracing::trace!(%err, "coordinate transform fallback");
                self.failures += 1;
                self.first_error.get_or_insert(err);
                vec![x, y]
            }
        }
    }

    pub(crate) fn failures(&self) -> usize {
        self.failures
    }

    pub(crate) fn first_error(&self) -> Option<&TransformError> {
        self.first_error.as_ref()
    }
}
