#![allow(dead_code)]

use std::{
    io::{Seek, SeekFrom, Write},
    ops::Range,
};

use approx::assert_relative_eq;
use nalgebra::Vector3;
use tempfile::NamedTempFile;

use ephem_forces::{
    constants::{AU, J2000_JD, SECONDS_PER_DAY},
    jpl_ephem::body_ids::{JplSlot, NUM_SLOTS},
    BodyState,
};

pub const DE430_BEG: f64 = 2287184.5;
pub const DE430_END: f64 = 2688976.5;
pub const DE430_CAU: f64 = AU;
pub const DE430_CEM: f64 = 81.30056907419062;

const HEADER_OFFSET: usize = 0x0A5C;
const START_401TH_CONSTANT_NAME: usize = 2856;

/// `p0 + p1·d + p2·d²` per component, with `d` in days from the reference epoch (km).
pub type Motion = [[f64; 3]; 3];

/// A DE file whose bodies follow known quadratic motions.
///
/// Each sub-interval stores the exact Chebyshev expansion of the quadratic,
/// so evaluation reproduces the motion to rounding and is continuous
/// across sub-intervals and records.
pub struct SyntheticDe {
    pub beg: f64,
    pub end: f64,
    pub inc: f64,
    pub cau: f64,
    pub cem: f64,
    pub ncon: i32,
    pub t_ref: f64,
    pub ncf: usize,
    pub niv: usize,
    pub motions: [Motion; NUM_SLOTS],
}

impl SyntheticDe {
    pub fn new(beg: f64, end: f64, inc: f64) -> Self {
        let mut motions = [[[0.0; 3]; 3]; NUM_SLOTS];
        for (i, motion) in motions.iter_mut().enumerate() {
            let k = (i + 1) as f64;
            motion[0] = [1.0e7 * k, 2.5e5 * k, 1.0e-3];
            motion[1] = [-1.0e6 * k, 5.0e5, -2.0e-4];
            motion[2] = [2.0e1 * k, -3.0 * k, 5.0e-6 * k];
        }
        // geocentric Moon stays near 384 000 km
        motions[JplSlot::MoonGeocentric.index()] = [
            [3.0e5, -2.0e5, 1.0e5],
            [2.0e3, -1.0e3, 5.0e2],
            [0.0, 0.0, 0.0],
        ];

        SyntheticDe {
            beg,
            end,
            inc,
            cau: DE430_CAU,
            cem: DE430_CEM,
            ncon: 572,
            t_ref: J2000_JD,
            ncf: 8,
            niv: 2,
            motions,
        }
    }

    /// Coverage of the real DE430 file.
    pub fn de430_coverage() -> Self {
        Self::new(DE430_BEG, DE430_END, 32.0)
    }

    pub fn with_motion(mut self, slot: JplSlot, motion: Motion) -> Self {
        self.motions[slot.index()] = motion;
        self
    }

    pub fn record_count(&self) -> usize {
        ((self.end - self.beg) / self.inc).ceil() as usize
    }

    /// 1-based (offset, ncf, niv) triples.
    pub fn triples(&self) -> [[i32; 3]; NUM_SLOTS] {
        let mut triples = [[0; 3]; NUM_SLOTS];
        let mut offset = 3;
        for (slot, triple) in JplSlot::ALL.iter().zip(triples.iter_mut()) {
            *triple = [offset as i32, self.ncf as i32, self.niv as i32];
            offset += self.ncf * self.niv * slot.components();
        }
        triples
    }

    pub fn record_size(&self) -> usize {
        let words: usize = JplSlot::ALL
            .iter()
            .map(|slot| self.ncf * self.niv * slot.components())
            .sum();
        (2 + words) * 8
    }

    /// Position (km) and velocity (km/s) of a raw slot, from its motion.
    pub fn expected(&self, slot: JplSlot, jde: f64) -> (Vector3<f64>, Vector3<f64>) {
        let motion = &self.motions[slot.index()];
        let d = jde - self.t_ref;
        let mut position = Vector3::zeros();
        let mut velocity = Vector3::zeros();
        for m in 0..slot.components() {
            position[m] = motion[0][m] + motion[1][m] * d + motion[2][m] * d * d;
            velocity[m] = (motion[1][m] + 2.0 * motion[2][m] * d) / SECONDS_PER_DAY;
        }
        (position, velocity)
    }

    /// Barycentric Earth, from the Earth-Moon barycenter and the geocentric Moon.
    pub fn expected_earth(&self, jde: f64) -> (Vector3<f64>, Vector3<f64>) {
        let (emb, vemb) = self.expected(JplSlot::EarthMoonBarycenter, jde);
        let (moon, vmoon) = self.expected(JplSlot::MoonGeocentric, jde);
        let w = 1.0 + self.cem;
        (emb - moon / w, vemb - vmoon / w)
    }

    fn header_bytes(&self) -> Vec<u8> {
        fn put(buf: &mut [u8], pos: &mut usize, bytes: &[u8]) {
            buf[*pos..*pos + bytes.len()].copy_from_slice(bytes);
            *pos += bytes.len();
        }

        let mut buf = vec![0u8; 2 * self.record_size()];
        let mut pos = HEADER_OFFSET;
        let triples = self.triples();

        for v in [self.beg, self.end, self.inc] {
            put(&mut buf, &mut pos, &v.to_le_bytes());
        }
        put(&mut buf, &mut pos, &self.ncon.to_le_bytes());
        put(&mut buf, &mut pos, &self.cau.to_le_bytes());
        put(&mut buf, &mut pos, &self.cem.to_le_bytes());
        for triple in &triples[..12] {
            for v in triple {
                put(&mut buf, &mut pos, &v.to_le_bytes());
            }
        }
        put(&mut buf, &mut pos, &430i32.to_le_bytes());
        for v in &triples[12] {
            put(&mut buf, &mut pos, &v.to_le_bytes());
        }
        if self.ncon >= 400 {
            pos = START_401TH_CONSTANT_NAME + 6 * (self.ncon - 400) as usize;
            for triple in &triples[13..] {
                for v in triple {
                    put(&mut buf, &mut pos, &v.to_le_bytes());
                }
            }
        }
        buf
    }

    /// Chebyshev coefficients of one component of `motion` on `[ta, tb]`.
    fn component_coefficients(&self, motion: &Motion, m: usize, ta: f64, tb: f64) -> Vec<f64> {
        let mid = (ta + tb) / 2.0;
        let half = (tb - ta) / 2.0;
        let d = mid - self.t_ref;

        // f(mid + half·x) = q0 + q1·x + q2·x²,  x² = (T0 + T2) / 2
        let q0 = motion[0][m] + motion[1][m] * d + motion[2][m] * d * d;
        let q1 = (motion[1][m] + 2.0 * motion[2][m] * d) * half;
        let q2 = motion[2][m] * half * half;

        let mut coef = vec![0.0; self.ncf];
        coef[0] = q0 + q2 / 2.0;
        coef[1] = q1;
        coef[2] = q2 / 2.0;
        coef
    }

    fn record_words(&self, blk: usize) -> Vec<f64> {
        let mut words = Vec::with_capacity(self.record_size() / 8);
        let start = self.beg + blk as f64 * self.inc;
        words.push(start);
        words.push(start + self.inc);

        let span = self.inc / self.niv as f64;
        for slot in JplSlot::ALL {
            let motion = &self.motions[slot.index()];
            for sub in 0..self.niv {
                let ta = start + sub as f64 * span;
                for m in 0..slot.components() {
                    words.extend(self.component_coefficients(motion, m, ta, ta + span));
                }
            }
        }
        words
    }

    /// Write the file with every record present.
    pub fn write(&self) -> NamedTempFile {
        self.write_records(0..self.record_count())
    }

    /// Write the header and only the records in `records`; the others are
    /// left as holes in a file of full length.
    pub fn write_records(&self, records: Range<usize>) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&self.header_bytes()).unwrap();

        for blk in records {
            let bytes: Vec<u8> = self
                .record_words(blk)
                .iter()
                .flat_map(|w| w.to_le_bytes())
                .collect();
            file.seek(SeekFrom::Start(((blk + 2) * self.record_size()) as u64))
                .unwrap();
            file.write_all(&bytes).unwrap();
        }

        file.as_file()
            .set_len(((self.record_count() + 2) * self.record_size()) as u64)
            .unwrap();
        file.flush().unwrap();
        file
    }
}

pub fn assert_state_close(
    actual: &BodyState,
    position: &Vector3<f64>,
    velocity: &Vector3<f64>,
    max_relative: f64,
) {
    assert_relative_eq!(
        actual.position,
        *position,
        epsilon = 1e-6,
        max_relative = max_relative
    );
    assert_relative_eq!(
        actual.velocity,
        *velocity,
        epsilon = 1e-9,
        max_relative = max_relative
    );
}
