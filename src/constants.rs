//! # Constants and type definitions for ephem_forces
//!
//! This module centralizes the **physical constants**, **unit conversions**,
//! **integrator node fractions** and **common type aliases** shared by the
//! ephemeris decoder, the force engine and the dense-output post-processor.

// -------------------------------------------------------------------------------------------------
// Physical constants and unit conversions
// -------------------------------------------------------------------------------------------------

/// Number of seconds in a Julian day
pub const SECONDS_PER_DAY: f64 = 86_400.0;

/// Astronomical Unit in kilometers (IAU 2012)
pub const AU: f64 = 149_597_870.7;

/// G in AU³ / (M☉ · day²), as used by ephemeris-quality integrations
pub const G_AU_MSUN_DAY: f64 = 0.295912208285591100E-03;

/// Julian date of J2000.0 (2000-01-01 12:00:00 TDB)
pub const J2000_JD: f64 = 2_451_545.0;

/// Julian date matching simulation time `t = 0` when no other origin is configured
pub const DEFAULT_TIME_ORIGIN_JD: f64 = 2_450_123.7;

// -------------------------------------------------------------------------------------------------
// Planetary masses (DE430, in solar masses)
// -------------------------------------------------------------------------------------------------

pub const MASS_SUN: f64 = 1.0;
pub const MASS_MERCURY: f64 = 1.0 / 6_023_597.4;
pub const MASS_VENUS: f64 = 1.0 / 408_523.72;
pub const MASS_EARTH_MOON: f64 = 1.0 / 328_900.56;
pub const MASS_MARS: f64 = 1.0 / 3_098_703.6;
pub const MASS_JUPITER: f64 = 1.0 / 1_047.348_644;
pub const MASS_SATURN: f64 = 1.0 / 3_497.901_8;
pub const MASS_URANUS: f64 = 1.0 / 22_902.98;
pub const MASS_NEPTUNE: f64 = 1.0 / 19_412.26;
pub const MASS_PLUTO: f64 = 1.0 / 136_045_556.0;

// -------------------------------------------------------------------------------------------------
// Gauss-Radau spacings
// -------------------------------------------------------------------------------------------------

/// Relative node fractions of the 15th-order Gauss-Radau step, including both
/// interval ends (`h[0] = 0`, `h[8] = 1`).
pub const GAUSS_RADAU_NODES: [f64; 9] = [
    0.0,
    0.0562625605369221464656521910318,
    0.180240691736892364987579942780,
    0.352624717113169637373907769648,
    0.547153626330555383001448554766,
    0.734210177215410531523210605558,
    0.885320946839095768090359771030,
    0.977520613561287501891174488626,
    1.0,
];

/// Number of dense-output samples produced for each completed step.
pub const SAMPLES_PER_STEP: usize = 8;

// -------------------------------------------------------------------------------------------------
// Type aliases
// -------------------------------------------------------------------------------------------------

/// Julian date, TDB time scale (days)
pub type JulianDate = f64;
/// Mass in solar masses
pub type SolarMass = f64;
