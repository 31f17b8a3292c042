//! Reader for the initial-conditions file of a run.
//!
//! The file is a sequence of whitespace separated labels, each followed by
//! its values:
//!
//! ```text
//! tstart     2458849.5
//! tstep      20.0
//! trange     1000.0
//! geocentric 0
//! state      3.338875 -0.904942 0.368731  0.002740 0.006924 0.002697
//! state      ...
//! ```
//!
//! `tstart`, `tstep` and `trange` are required, `geocentric` defaults to 0
//! and at least one `state` (position then velocity, AU and AU/day) must be
//! present. Any other label is an error.
use std::{fs, io::ErrorKind, str::FromStr};

use camino::Utf8Path;
use nalgebra::Vector3;
use nom::{
    bytes::complete::take_while1,
    character::complete::{i64 as parse_i64, multispace0, multispace1},
    multi::count,
    number::complete::double,
    sequence::preceded,
    IResult, Parser,
};
use thiserror::Error;

use crate::{ephem_errors::EphemError, forces::Particle};

const STEP_COUNT_TOLERANCE: f64 = 1e-9;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseIcError {
    #[error("Unknown label: {0}")]
    UnknownLabel(String),

    #[error("Invalid or missing value after label {0}")]
    InvalidValue(String),

    #[error("Missing required label: {0}")]
    MissingField(&'static str),

    #[error("No particle state given")]
    NoParticle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct InitialConditions {
    pub tstart: f64,
    pub tstep: f64,
    pub trange: f64,
    pub geocentric: bool,
    pub particles: Vec<Particle>,
}

fn label(input: &str) -> IResult<&str, &str> {
    preceded(multispace0, take_while1(|c: char| !c.is_whitespace())).parse(input)
}

fn number(input: &str) -> IResult<&str, f64> {
    preceded(multispace1, double).parse(input)
}

fn integer(input: &str) -> IResult<&str, i64> {
    preceded(multispace1, parse_i64).parse(input)
}

fn state(input: &str) -> IResult<&str, Particle> {
    let (input, values) = count(number, 6).parse(input)?;
    Ok((
        input,
        Particle::new(
            Vector3::new(values[0], values[1], values[2]),
            Vector3::new(values[3], values[4], values[5]),
        ),
    ))
}

fn value_of<'a, O>(
    name: &str,
    input: &'a str,
    parser: fn(&'a str) -> IResult<&'a str, O>,
) -> Result<(&'a str, O), ParseIcError> {
    parser(input).map_err(|_| ParseIcError::InvalidValue(name.to_string()))
}

impl FromStr for InitialConditions {
    type Err = ParseIcError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let mut tstart = None;
        let mut tstep = None;
        let mut trange = None;
        let mut geocentric = false;
        let mut particles = Vec::new();

        let mut input = text.trim_start();
        while !input.is_empty() {
            let (rest, name) =
                label(input).map_err(|_| ParseIcError::UnknownLabel(input.to_string()))?;

            let rest = match name {
                "tstart" => {
                    let (rest, v) = value_of(name, rest, number)?;
                    tstart = Some(v);
                    rest
                }
                "tstep" => {
                    let (rest, v) = value_of(name, rest, number)?;
                    tstep = Some(v);
                    rest
                }
                "trange" => {
                    let (rest, v) = value_of(name, rest, number)?;
                    trange = Some(v);
                    rest
                }
                "geocentric" => {
                    let (rest, v) = value_of(name, rest, integer)?;
                    geocentric = match v {
                        0 => false,
                        1 => true,
                        _ => return Err(ParseIcError::InvalidValue(name.to_string())),
                    };
                    rest
                }
                "state" => {
                    let (rest, particle) = value_of(name, rest, state)?;
                    particles.push(particle);
                    rest
                }
                other => return Err(ParseIcError::UnknownLabel(other.to_string())),
            };

            input = rest.trim_start();
        }

        let tstep = tstep.ok_or(ParseIcError::MissingField("tstep"))?;
        if tstep == 0.0 || !tstep.is_finite() {
            return Err(ParseIcError::InvalidValue("tstep".into()));
        }
        if particles.is_empty() {
            return Err(ParseIcError::NoParticle);
        }
        let tstart = tstart.ok_or(ParseIcError::MissingField("tstart"))?;
        let trange = trange.ok_or(ParseIcError::MissingField("trange"))?;
        // the range is walked in the direction of the step
        if !trange.is_finite() || trange / tstep < 0.0 {
            return Err(ParseIcError::InvalidValue("trange".into()));
        }

        Ok(InitialConditions {
            tstart,
            tstep,
            trange,
            geocentric,
            particles,
        })
    }
}

impl InitialConditions {
    /// Read and parse an initial-conditions file.
    pub fn from_file(path: impl AsRef<Utf8Path>) -> Result<Self, EphemError> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => EphemError::FileNotFound(path.to_string()),
            _ => EphemError::IoError(err),
        })?;
        Ok(text.parse()?)
    }

    /// Number of output times, `floor(trange / tstep) + 1`.
    ///
    /// The quotient is floored with a small tolerance so that ranges which
    /// are a whole number of steps in decimal (`0.3 / 0.1`) keep their last
    /// output time.
    pub fn step_count(&self) -> usize {
        (self.trange / self.tstep + STEP_COUNT_TOLERANCE).floor() as usize + 1
    }

    /// Stop times of the run: `tstart + i·tstep`.
    pub fn output_times(&self) -> Vec<f64> {
        (0..self.step_count())
            .map(|i| self.tstart + i as f64 * self.tstep)
            .collect()
    }
}
