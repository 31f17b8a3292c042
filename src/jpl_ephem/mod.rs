//! # JPL DE binary ephemerides
//!
//! Decoding and evaluation of the JPL planetary and lunar ephemerides
//! distributed as Chebyshev coefficient records (`linux_p1550p2650.430` and
//! relatives).
//!
//! ## Overview
//!
//! ```text
//! EphemerisResolver ──(lazy open)──► EphemerisFile ──► record bytes ──► chebyshev
//!        ▲                                 │
//!   EphemFileSource                     DeHeader
//! ```
//!
//! * [`de_header`] decodes the fixed-offset header and the per-slot layout.
//! * [`de_file`] maps the file and evaluates bodies at a Julian date.
//! * [`chebyshev`] evaluates one coefficient block.
//! * [`resolver`] owns the lazily opened file used by the force engine.
//!
//! ## Units
//!
//! States are returned in the file units: kilometers and kilometers per
//! second. [`body_state::BodyState::to_au`] converts them to AU and AU/day
//! with the AU stored in the header.
//!
//! ## Example
//!
//! ```rust, no_run
//! use ephem_forces::jpl_ephem::{body_ids::Body, resolver::EphemerisResolver};
//!
//! let resolver = EphemerisResolver::new("file:linux_p1550p2650.430").unwrap();
//! let sun = resolver
//!     .resolve(2451545.0, Body::Sun, Body::Barycenter)
//!     .unwrap();
//! let cau = resolver.header().unwrap().cau;
//! println!("{}", sun.to_au(cau).position);
//! ```
pub mod body_ids;
pub mod body_state;
pub mod chebyshev;
pub mod de_file;
pub mod de_header;
pub mod ephem_source;
pub mod resolver;
