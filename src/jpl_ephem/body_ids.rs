/// Raw coefficient slots of a JPL DE binary ephemeris.
///
/// Every DATA RECORD stores one Chebyshev coefficient block per slot, in
/// this order. The discriminant is the slot index in the header layout table.
///
/// Conversions
/// -----------
/// * Use [`TryFrom<u8>`] to convert from a raw slot index to a `JplSlot`.
///   Invalid values return an error.
/// * Use [`From<JplSlot>`] to recover the slot index (`u8`).
///
/// See also
/// --------
/// * [`Body`] – the user-facing identifiers resolved from these slots.
/// * [`DeHeader`](crate::jpl_ephem::de_header::DeHeader) – per-slot coefficient layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JplSlot {
    Mercury = 0,
    Venus = 1,
    EarthMoonBarycenter = 2,
    Mars = 3,
    Jupiter = 4,
    Saturn = 5,
    Uranus = 6,
    Neptune = 7,
    Pluto = 8,
    MoonGeocentric = 9,
    Sun = 10,
    Nutations = 11,
    Librations = 12,
    LunarMantle = 13,
    TtTdb = 14,
}

/// Number of coefficient slots in a DE record.
pub const NUM_SLOTS: usize = 15;

impl JplSlot {
    pub const ALL: [JplSlot; NUM_SLOTS] = [
        JplSlot::Mercury,
        JplSlot::Venus,
        JplSlot::EarthMoonBarycenter,
        JplSlot::Mars,
        JplSlot::Jupiter,
        JplSlot::Saturn,
        JplSlot::Uranus,
        JplSlot::Neptune,
        JplSlot::Pluto,
        JplSlot::MoonGeocentric,
        JplSlot::Sun,
        JplSlot::Nutations,
        JplSlot::Librations,
        JplSlot::LunarMantle,
        JplSlot::TtTdb,
    ];

    /// Number of components stored for this slot (2 for nutations, 1 for TT-TDB, 3 otherwise).
    pub fn components(self) -> usize {
        match self {
            JplSlot::Nutations => 2,
            JplSlot::TtTdb => 1,
            _ => 3,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }
}

impl TryFrom<u8> for JplSlot {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        JplSlot::ALL
            .get(value as usize)
            .copied()
            .ok_or_else(|| format!("Invalid JPL slot: {value}"))
    }
}

impl From<JplSlot> for u8 {
    fn from(slot: JplSlot) -> Self {
        slot as u8
    }
}

/// Bodies that can be resolved from a DE file, relative to one another.
///
/// `Barycenter` is the zero reference of the raw file. `Earth` and `Moon`
/// are not stored in the file: they are derived from the Earth–Moon
/// barycenter and the geocentric Moon using the Earth/Moon mass ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Body {
    Barycenter,
    Sun,
    Earth,
    EarthMoonBarycenter,
    Mercury,
    Venus,
    Mars,
    Jupiter,
    Saturn,
    Uranus,
    Neptune,
    Pluto,
    Moon,
}

/// How a [`Body`] state is obtained from the coefficient slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// Always zero position and velocity.
    Zero,
    /// A single Chebyshev evaluation of one slot.
    Direct(JplSlot),
    /// `emb - moon / (1 + cem)`
    Earth,
    /// `emb + moon * cem / (1 + cem)`
    Moon,
}

impl Body {
    pub fn evaluation(self) -> Evaluation {
        match self {
            Body::Barycenter => Evaluation::Zero,
            Body::Sun => Evaluation::Direct(JplSlot::Sun),
            Body::Earth => Evaluation::Earth,
            Body::EarthMoonBarycenter => Evaluation::Direct(JplSlot::EarthMoonBarycenter),
            Body::Mercury => Evaluation::Direct(JplSlot::Mercury),
            Body::Venus => Evaluation::Direct(JplSlot::Venus),
            Body::Mars => Evaluation::Direct(JplSlot::Mars),
            Body::Jupiter => Evaluation::Direct(JplSlot::Jupiter),
            Body::Saturn => Evaluation::Direct(JplSlot::Saturn),
            Body::Uranus => Evaluation::Direct(JplSlot::Uranus),
            Body::Neptune => Evaluation::Direct(JplSlot::Neptune),
            Body::Pluto => Evaluation::Direct(JplSlot::Pluto),
            Body::Moon => Evaluation::Moon,
        }
    }
}

impl std::fmt::Display for Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Body::Barycenter => "Solar System Barycenter",
            Body::Sun => "Sun",
            Body::Earth => "Earth",
            Body::EarthMoonBarycenter => "Earth-Moon Barycenter",
            Body::Mercury => "Mercury",
            Body::Venus => "Venus",
            Body::Mars => "Mars",
            Body::Jupiter => "Jupiter",
            Body::Saturn => "Saturn",
            Body::Uranus => "Uranus",
            Body::Neptune => "Neptune",
            Body::Pluto => "Pluto",
            Body::Moon => "Moon",
        };
        write!(f, "{name}")
    }
}
