//! Text output of sampled trajectories.
//!
//! One line per sample and particle:
//!
//! ```text
//! <time> <particle index> <x> <y> <z> <vx> <vy> <vz>
//! ```
//!
//! The time is written with six decimals, the state in scientific notation
//! with eight decimals and a signed exponent of at least two digits, right
//! aligned on 16 characters (`2.74000000e-03`).
use std::{
    fs::File,
    io::{self, BufWriter, Write},
};

use camino::Utf8Path;
use nalgebra::Vector3;
use nom::{
    character::complete::{multispace0, multispace1, u64 as parse_u64},
    multi::count,
    number::complete::double,
    sequence::preceded,
    IResult, Parser,
};

use crate::ephem_errors::EphemError;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryRow {
    pub t: f64,
    pub particle: usize,
    pub position: Vector3<f64>,
    pub velocity: Vector3<f64>,
}

pub type Trajectory = Vec<TrajectoryRow>;

/// `v` with eight decimals and an exponent of the form `e+00`, width 16.
fn scientific(v: f64) -> String {
    let text = format!("{v:.8e}");
    let formatted = text
        .split_once('e')
        .and_then(|(mantissa, exp)| Some(format!("{mantissa}e{:+03}", exp.parse::<i32>().ok()?)))
        .unwrap_or(text);
    format!("{formatted:>16}")
}

pub fn write_trajectory<W: Write>(writer: &mut W, rows: &[TrajectoryRow]) -> io::Result<()> {
    for row in rows {
        write!(writer, "{:.6} {}", row.t, row.particle)?;
        for v in row.position.iter().chain(row.velocity.iter()) {
            write!(writer, " {}", scientific(*v))?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Write `rows` to `path`, replacing any previous content.
pub fn save_trajectory(path: impl AsRef<Utf8Path>, rows: &[TrajectoryRow]) -> Result<(), EphemError> {
    let mut writer = BufWriter::new(File::create(path.as_ref())?);
    write_trajectory(&mut writer, rows)?;
    writer.flush()?;
    Ok(())
}

fn parse_row(input: &str) -> IResult<&str, TrajectoryRow> {
    let (input, t) = preceded(multispace0, double).parse(input)?;
    let (input, particle) = preceded(multispace1, parse_u64).parse(input)?;
    let (input, values) = count(preceded(multispace1, double), 6).parse(input)?;
    let (input, _) = multispace0(input)?;

    Ok((
        input,
        TrajectoryRow {
            t,
            particle: particle as usize,
            position: Vector3::new(values[0], values[1], values[2]),
            velocity: Vector3::new(values[3], values[4], values[5]),
        },
    ))
}

/// Parse the text written by [`write_trajectory`]. Blank lines are skipped.
pub fn parse_trajectory(text: &str) -> Result<Trajectory, EphemError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| match parse_row(line) {
            Ok(("", row)) => Ok(row),
            _ => Err(EphemError::InvalidTrajectoryLine {
                line: i + 1,
                content: line.to_string(),
            }),
        })
        .collect()
}

pub fn read_trajectory(path: impl AsRef<Utf8Path>) -> Result<Trajectory, EphemError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    parse_trajectory(&text)
}
