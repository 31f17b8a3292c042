pub mod constants;
pub mod dense_output;
pub mod driver;
pub mod ephem_errors;
pub mod forces;
pub mod jpl_ephem;

pub use ephem_errors::EphemError;
pub use forces::{EphemerisForce, ForceModel, Particle};
pub use jpl_ephem::{
    body_ids::Body, body_state::BodyState, de_file::EphemerisFile, resolver::EphemerisResolver,
};
