use thiserror::Error;

use crate::driver::initial_conditions::ParseIcError;

#[derive(Error, Debug)]
pub enum EphemError {
    #[error("JPL ephemeris file not found at: {0}")]
    FileNotFound(String),

    #[error("Malformed JPL ephemeris header: {0}")]
    HeaderMalformed(String),

    #[error("Unable to memory-map the JPL ephemeris file: {0}")]
    MapFailed(String),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Julian date {jde} outside ephemeris coverage [{beg}, {end}]")]
    OutOfRange { jde: f64, beg: f64, end: f64 },

    #[error("Ephemeris record {0} is not present in the mapped file")]
    RecordMissing(usize),

    #[error("Body not available in this ephemeris file: {0}")]
    BodyUnavailable(String),

    #[error("Ephemeris file is not open (resolver was shut down)")]
    NotOpen,

    #[error("Missing force parameter: {0}")]
    ConfigMissing(&'static str),

    #[error("Invalid force parameter {name}: {reason}")]
    ConfigInvalid { name: &'static str, reason: String },

    #[error("Error during the initial conditions parsing: {0}")]
    ParseError(#[from] ParseIcError),

    #[error("Invalid trajectory line {line}: {content}")]
    InvalidTrajectoryLine { line: usize, content: String },

    #[error("Invalid JPL ephemeris file source: {0}")]
    InvalidEphemFileSource(String),

    #[error("Unknown JPL DE version: {0}")]
    UnknownDeVersion(String),

    #[error("Base directory lookup failed for JPL ephemeris file: {0}")]
    BaseDirUnavailable(String),

    #[error("Host integrator failure: {0}")]
    Integration(String),
}

impl PartialEq for EphemError {
    fn eq(&self, other: &Self) -> bool {
        use EphemError::*;
        match (self, other) {
            (FileNotFound(a), FileNotFound(b)) => a == b,
            (HeaderMalformed(a), HeaderMalformed(b)) => a == b,
            (MapFailed(a), MapFailed(b)) => a == b,

            // io::Error is not comparable: same variant is enough
            (IoError(_), IoError(_)) => true,

            (
                OutOfRange { jde, beg, end },
                OutOfRange {
                    jde: jde2,
                    beg: beg2,
                    end: end2,
                },
            ) => jde == jde2 && beg == beg2 && end == end2,
            (RecordMissing(a), RecordMissing(b)) => a == b,
            (BodyUnavailable(a), BodyUnavailable(b)) => a == b,
            (ConfigMissing(a), ConfigMissing(b)) => a == b,
            (
                ConfigInvalid { name, reason },
                ConfigInvalid {
                    name: name2,
                    reason: reason2,
                },
            ) => name == name2 && reason == reason2,
            (ParseError(a), ParseError(b)) => a == b,
            (
                InvalidTrajectoryLine { line, content },
                InvalidTrajectoryLine {
                    line: line2,
                    content: content2,
                },
            ) => line == line2 && content == content2,
            (InvalidEphemFileSource(a), InvalidEphemFileSource(b)) => a == b,
            (UnknownDeVersion(a), UnknownDeVersion(b)) => a == b,
            (BaseDirUnavailable(a), BaseDirUnavailable(b)) => a == b,
            (Integration(a), Integration(b)) => a == b,

            (NotOpen, NotOpen) => true,

            _ => false,
        }
    }
}
