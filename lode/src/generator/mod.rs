//! Position generators.
//!
//! A generator is an iterator of [`Position`] records with indices starting
//! at 1. Once it returns `None` it keeps returning `None`.
//!
//! # Variants
//!
//! - [`DynamicGenerator`] - endless circular motion computed with great-circle math
//! - [`RouteGenerator`] - a preloaded list replayed through a cursor, filled by
//!   one of the file loaders ([`load_csv`], [`load_geojson`], [`load_nmea_log`])
//!
//! Generators are normally built by name through [`registry::create`].

mod csv;
mod dynamic;
mod geojson;
mod nmea_log;
mod params;
pub mod registry;
mod route;

pub use csv::load_csv;
pub use dynamic::{DynamicConfig, DynamicGenerator};
pub use geojson::load_geojson;
pub use nmea_log::load_nmea_log;
pub use params::SourceParams;
pub use route::RouteGenerator;

use std::iter::FusedIterator;
use std::path::PathBuf;

use thiserror::Error;

use crate::position::Position;

/// Errors raised while constructing a generator.
///
/// All of them are fatal: the server does not start serving.
#[derive(Debug, Error)]
pub enum GeneratorError {
    /// No generator is registered under this name.
    #[error("unknown generator source '{name}' (available: {available})")]
    UnknownSource { name: String, available: String },

    /// A required positional parameter was not supplied.
    #[error("missing required parameter '{0}'")]
    MissingParameter(&'static str),

    /// A parameter value could not be parsed or is out of range.
    #[error("invalid value '{value}' for parameter '{name}': {reason}")]
    InvalidParameter {
        name: String,
        value: String,
        reason: String,
    },

    /// A `key=value` option the source does not understand.
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),

    /// The source file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A CSV row is malformed.
    #[error("{}:{line}: {reason}", .path.display())]
    Csv {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    /// The GeoJSON document is malformed.
    #[error("invalid GeoJSON in {}: {reason}", .path.display())]
    GeoJson { path: PathBuf, reason: String },

    /// The file contained no usable points.
    #[error("no valid points found in {}", .0.display())]
    NoPoints(PathBuf),
}

impl GeneratorError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        GeneratorError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Any generator variant behind one iteration protocol.
#[derive(Debug)]
pub enum Generator {
    Dynamic(DynamicGenerator),
    Route(RouteGenerator),
}

impl Generator {
    /// Short name of the source that produced this generator.
    pub fn source(&self) -> &'static str {
        match self {
            Generator::Dynamic(_) => "dynamic",
            Generator::Route(route) => route.source(),
        }
    }

    /// Number of positions left, or `None` for an endless generator.
    pub fn remaining(&self) -> Option<usize> {
        match self {
            Generator::Dynamic(_) => None,
            Generator::Route(route) => Some(route.remaining()),
        }
    }
}

impl Iterator for Generator {
    type Item = Position;

    fn next(&mut self) -> Option<Position> {
        match self {
            Generator::Dynamic(dynamic) => dynamic.next(),
            Generator::Route(route) => route.next(),
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match self {
            Generator::Dynamic(dynamic) => dynamic.size_hint(),
            Generator::Route(route) => route.size_hint(),
        }
    }
}

impl FusedIterator for Generator {}

impl From<DynamicGenerator> for Generator {
    fn from(generator: DynamicGenerator) -> Self {
        Generator::Dynamic(generator)
    }
}

impl From<RouteGenerator> for Generator {
    fn from(generator: RouteGenerator) -> Self {
        Generator::Route(generator)
    }
}
