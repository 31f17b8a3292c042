//! Ephemeris bodies pulling on the test particles, with their masses.
use crate::{
    constants::{
        SolarMass, MASS_EARTH_MOON, MASS_JUPITER, MASS_MARS, MASS_MERCURY, MASS_NEPTUNE,
        MASS_PLUTO, MASS_SATURN, MASS_SUN, MASS_URANUS, MASS_VENUS,
    },
    jpl_ephem::body_ids::Body,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Perturber {
    pub body: Body,
    /// mass in solar masses
    pub mass: SolarMass,
}

impl Perturber {
    pub const fn new(body: Body, mass: SolarMass) -> Self {
        Perturber { body, mass }
    }

    /// Perturber with its DE430 mass, `None` for bodies without a tabulated mass.
    pub fn with_de430_mass(body: Body) -> Option<Self> {
        let mass = match body {
            Body::Sun => MASS_SUN,
            Body::Mercury => MASS_MERCURY,
            Body::Venus => MASS_VENUS,
            Body::EarthMoonBarycenter => MASS_EARTH_MOON,
            Body::Mars => MASS_MARS,
            Body::Jupiter => MASS_JUPITER,
            Body::Saturn => MASS_SATURN,
            Body::Uranus => MASS_URANUS,
            Body::Neptune => MASS_NEPTUNE,
            Body::Pluto => MASS_PLUTO,
            Body::Barycenter | Body::Earth | Body::Moon => return None,
        };
        Some(Perturber::new(body, mass))
    }
}

/// Sun and giant planets, in the order the `N_ephem` parameter counts them.
pub const DEFAULT_PERTURBERS: [Perturber; 5] = [
    Perturber::new(Body::Sun, MASS_SUN),
    Perturber::new(Body::Jupiter, MASS_JUPITER),
    Perturber::new(Body::Saturn, MASS_SATURN),
    Perturber::new(Body::Uranus, MASS_URANUS),
    Perturber::new(Body::Neptune, MASS_NEPTUNE),
];
