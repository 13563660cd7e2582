//! Named generator sources.
//!
//! The registry is a fixed table from the source name given on the command
//! line to the function that builds the generator from its parameter tokens.

use super::{csv, dynamic, geojson, nmea_log};
use super::{DynamicGenerator, Generator, GeneratorError, SourceParams};

/// One registered source.
#[derive(Debug, Clone, Copy)]
pub struct SourceEntry {
    /// Name used to select the source (`--source <name>`).
    pub name: &'static str,
    /// Required positional parameters, in order.
    pub positional: &'static [&'static str],
    /// Accepted `key=value` options.
    pub options: &'static [&'static str],
    /// One-line description for help output.
    pub summary: &'static str,
    build: fn(&SourceParams) -> Result<Generator, GeneratorError>,
}

impl SourceEntry {
    /// Usage line, e.g. `dynamic <lat> <lon> [speed=..] [duration=..]`.
    pub fn usage(&self) -> String {
        let mut usage = self.name.to_string();
        for name in self.positional {
            usage.push_str(&format!(" <{}>", name));
        }
        for key in self.options {
            usage.push_str(&format!(" [{}=..]", key));
        }
        usage
    }
}

static SOURCES: &[SourceEntry] = &[
    SourceEntry {
        name: "dynamic",
        positional: dynamic::POSITIONAL,
        options: dynamic::OPTIONS,
        summary: "circular motion around a point",
        build: |params| DynamicGenerator::from_params(params).map(Generator::from),
    },
    SourceEntry {
        name: "csv",
        positional: csv::POSITIONAL,
        options: csv::OPTIONS,
        summary: "route replayed from a CSV file",
        build: |params| csv::from_params(params).map(Generator::from),
    },
    SourceEntry {
        name: "geojson",
        positional: geojson::POSITIONAL,
        options: geojson::OPTIONS,
        summary: "Point features replayed from a GeoJSON file",
        build: |params| geojson::from_params(params).map(Generator::from),
    },
    SourceEntry {
        name: "nmea",
        positional: nmea_log::POSITIONAL,
        options: nmea_log::OPTIONS,
        summary: "RMC/GGA sentences replayed from a recorded log",
        build: |params| nmea_log::from_params(params).map(Generator::from),
    },
];

/// All registered sources, in help order.
pub fn sources() -> &'static [SourceEntry] {
    SOURCES
}

/// Look up a source by name.
pub fn find(name: &str) -> Option<&'static SourceEntry> {
    SOURCES.iter().find(|entry| entry.name == name)
}

/// Build the generator registered as `source` from its parameter tokens.
///
/// Loading happens here: file sources read and validate their whole file
/// before this returns.
pub fn create<S: AsRef<str>>(source: &str, tokens: &[S]) -> Result<Generator, GeneratorError> {
    let entry = find(source).ok_or_else(|| GeneratorError::UnknownSource {
        name: source.to_string(),
        available: SOURCES
            .iter()
            .map(|entry| entry.name)
            .collect::<Vec<_>>()
            .join(", "),
    })?;

    let params = SourceParams::parse(tokens, entry.positional, entry.options)?;
    (entry.build)(&params)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_registered_names() {
        let names: Vec<&str> = sources().iter().map(|entry| entry.name).collect();
        assert_eq!(names, vec!["dynamic", "csv", "geojson", "nmea"]);
    }

    #[test]
    fn test_usage() {
        let entry = find("nmea").unwrap();
        assert_eq!(entry.usage(), "nmea <path> [duration=..]");
    }

    #[test]
    fn test_create_dynamic() {
        let mut generator = create("dynamic", &["55.7522", "37.6156", "speed=20"]).unwrap();
        assert_eq!(generator.source(), "dynamic");
        assert_eq!(generator.next().unwrap().speed, 20.0);
    }

    #[test]
    fn test_create_csv() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "1,55.7522,37.6156,10.0,120.5").unwrap();

        let path = file.path().to_str().unwrap();
        let generator = create("csv", &[path]).unwrap();
        assert_eq!(generator.source(), "csv");
        assert_eq!(generator.remaining(), Some(1));
    }

    #[test]
    fn test_unknown_source_lists_available() {
        let err = create("gpx", &["track.gpx"]).unwrap_err();
        assert_eq!(
            err.to_string(),
            "unknown generator source 'gpx' (available: dynamic, csv, geojson, nmea)"
        );
    }

    #[test]
    fn test_missing_path() {
        let err = create::<&str>("geojson", &[]).unwrap_err();
        assert!(matches!(err, GeneratorError::MissingParameter("path")));
    }

    #[test]
    fn test_csv_takes_no_options() {
        let err = create("csv", &["route.csv", "duration=2"]).unwrap_err();
        assert!(matches!(err, GeneratorError::UnknownParameter(ref k) if k == "duration"));
    }
}
