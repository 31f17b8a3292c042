//! Memory-mapped JPL DE binary ephemeris.
//!
//! The file is mapped once and never copied: every query decodes only the
//! coefficients of the sub-interval it needs, straight from the mapped
//! record, into a stack buffer.
use std::{fs::File, io::ErrorKind, path::Path};

use log::debug;
use memmap2::Mmap;

use super::{
    body_ids::{Body, Evaluation, JplSlot},
    body_state::BodyState,
    chebyshev::{self, MAX_COEFFS, MAX_COMPONENTS},
    de_header::DeHeader,
};
use crate::{constants::JulianDate, ephem_errors::EphemError};

/// Coefficients of one slot for one sub-interval, decoded from a record.
#[derive(Debug, Clone, Copy)]
pub struct Coefficients {
    values: [f64; MAX_COEFFS * MAX_COMPONENTS],
    pub ncm: usize,
    pub ncf: usize,
}

impl Coefficients {
    /// Component-major coefficients, `ncm * ncf` values.
    pub fn as_slice(&self) -> &[f64] {
        &self.values[..self.ncm * self.ncf]
    }
}

/// An opened DE ephemeris file.
///
/// The handle is exclusively owned; [`EphemerisFile::close`] consumes it.
/// Reads go through `&self` and are safe from several threads.
#[derive(Debug)]
pub struct EphemerisFile {
    header: DeHeader,
    mmap: Mmap,
    path: String,
}

impl EphemerisFile {
    /// Open and map a DE binary file, then decode and validate its header.
    ///
    /// Arguments
    /// ---------
    /// * `path` : location of the binary file (e.g. `linux_p1550p2650.430`)
    ///
    /// Return
    /// ------
    /// * The opened file, or
    ///   - [`EphemError::FileNotFound`] if the path does not exist,
    ///   - [`EphemError::MapFailed`] if the file cannot be mapped,
    ///   - [`EphemError::HeaderMalformed`] if the header is inconsistent or
    ///     the file is shorter than the records it announces.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, EphemError> {
        let path = path.as_ref();
        let display = path.display().to_string();

        let file = File::open(path).map_err(|err| match err.kind() {
            ErrorKind::NotFound => EphemError::FileNotFound(display.clone()),
            _ => EphemError::IoError(err),
        })?;

        let mmap = unsafe { Mmap::map(&file) }
            .map_err(|err| EphemError::MapFailed(format!("{display}: {err}")))?;

        let header = DeHeader::parse(&mmap)?;

        let required = header.record_offset(header.record_count());
        if mmap.len() < required {
            return Err(EphemError::HeaderMalformed(format!(
                "{display} is {} bytes, {} records of {} bytes need {required}",
                mmap.len(),
                header.record_count(),
                header.record_size
            )));
        }

        debug!(
            "opened DE{} ephemeris {display}: JD {} .. {}, {} records of {} bytes",
            header.numde,
            header.beg,
            header.end,
            header.record_count(),
            header.record_size
        );

        Ok(EphemerisFile {
            header,
            mmap,
            path: display,
        })
    }

    pub fn header(&self) -> &DeHeader {
        &self.header
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    /// Release the mapping.
    pub fn close(self) {
        debug!("closing ephemeris {}", self.path);
        drop(self.mmap);
    }

    /// Bytes of data record `blk`, if it lies inside the mapped file.
    pub fn record(&self, blk: usize) -> Option<&[u8]> {
        let start = self.header.record_offset(blk);
        self.mmap.get(start..start + self.header.record_size)
    }

    /// Julian dates stored at the head of data record `blk`.
    pub fn record_span(&self, blk: usize) -> Option<(JulianDate, JulianDate)> {
        let record = self.record(blk)?;
        Some((read_f64(record, 0)?, read_f64(record, 1)?))
    }

    /// Decode the coefficients of `slot` for sub-interval `sub` of record `blk`.
    pub fn coefficients(
        &self,
        blk: usize,
        slot: JplSlot,
        sub: usize,
    ) -> Result<Coefficients, EphemError> {
        let record = self.record(blk).ok_or(EphemError::RecordMissing(blk))?;
        decode_coefficients(&self.header, record, slot, sub).ok_or(EphemError::RecordMissing(blk))
    }

    /// Locate the record containing `jde` and the fractional time inside it.
    ///
    /// Return
    /// ------
    /// * `(blk, t)` with `t ∈ [0, 1]`, or [`EphemError::OutOfRange`] when
    ///   `jde` is outside `[beg, end]` (NaN included). The end of coverage
    ///   belongs to the last record with `t = 1`.
    pub fn record_index(&self, jde: JulianDate) -> Result<(usize, f64), EphemError> {
        let DeHeader { beg, end, inc, .. } = self.header;

        if !(jde >= beg && jde <= end) {
            return Err(EphemError::OutOfRange { jde, beg, end });
        }

        let elapsed = jde - beg;
        let remainder = elapsed % inc;
        // record index consistent with the remainder
        let blk = ((elapsed - remainder) / inc).round() as usize;
        let last = self.header.record_count().saturating_sub(1);

        if blk > last {
            Ok((last, 1.0))
        } else {
            Ok((blk, remainder / inc))
        }
    }

    /// State of `target` relative to `reference` at `jde`.
    ///
    /// Arguments
    /// ---------
    /// * `jde` : Julian date (TDB)
    /// * `target` : body to evaluate
    /// * `reference` : origin of the returned state
    ///
    /// Return
    /// ------
    /// * `state(target) - state(reference)` in file units (km, km/s), tagged
    ///   with `jde`.
    pub fn state(
        &self,
        jde: JulianDate,
        target: Body,
        reference: Body,
    ) -> Result<BodyState, EphemError> {
        let (blk, t) = self.record_index(jde)?;
        let record = self.record(blk).ok_or(EphemError::RecordMissing(blk))?;

        let target_state = self.barycentric(record, blk, target, t, jde)?;
        let reference_state = self.barycentric(record, blk, reference, t, jde)?;

        Ok(target_state - reference_state)
    }

    fn barycentric(
        &self,
        record: &[u8],
        blk: usize,
        body: Body,
        t: f64,
        jde: JulianDate,
    ) -> Result<BodyState, EphemError> {
        let state = match body.evaluation() {
            Evaluation::Zero => BodyState::zero(jde),
            Evaluation::Direct(slot) => self.slot_state(record, blk, slot, t, jde)?,
            Evaluation::Earth => self.earth(record, blk, t, jde)?,
            Evaluation::Moon => {
                let moon = self.slot_state(record, blk, JplSlot::MoonGeocentric, t, jde)?;
                self.earth(record, blk, t, jde)? + moon
            }
        };
        Ok(state)
    }

    /// `emb - moon / (1 + cem)`
    fn earth(
        &self,
        record: &[u8],
        blk: usize,
        t: f64,
        jde: JulianDate,
    ) -> Result<BodyState, EphemError> {
        let emb = self.slot_state(record, blk, JplSlot::EarthMoonBarycenter, t, jde)?;
        let moon = self.slot_state(record, blk, JplSlot::MoonGeocentric, t, jde)?;
        let weight = -1.0 / (1.0 + self.header.cem);

        Ok(BodyState {
            position: emb.position + moon.position * weight,
            velocity: emb.velocity + moon.velocity * weight,
            jde,
        })
    }

    fn slot_state(
        &self,
        record: &[u8],
        blk: usize,
        slot: JplSlot,
        t: f64,
        jde: JulianDate,
    ) -> Result<BodyState, EphemError> {
        let layout = self.header.slot(slot);
        if layout.is_empty() {
            return Err(EphemError::BodyUnavailable(format!(
                "slot {slot:?} has no coefficients in {}",
                self.path
            )));
        }

        let sub = chebyshev::sub_interval(t, layout.niv);
        let coef = decode_coefficients(&self.header, record, slot, sub.index)
            .ok_or(EphemError::RecordMissing(blk))?;

        let (position, velocity) = chebyshev::evaluate_block(
            coef.as_slice(),
            coef.ncm,
            coef.ncf,
            sub.x,
            chebyshev::velocity_scale(layout.niv, self.header.inc),
        );

        Ok(BodyState {
            position,
            velocity,
            jde,
        })
    }
}

fn read_f64(record: &[u8], word: usize) -> Option<f64> {
    let bytes = record.get(word * 8..word * 8 + 8)?;
    let mut raw = [0u8; 8];
    raw.copy_from_slice(bytes);
    Some(f64::from_le_bytes(raw))
}

fn decode_coefficients(
    header: &DeHeader,
    record: &[u8],
    slot: JplSlot,
    sub: usize,
) -> Option<Coefficients> {
    let layout = header.slot(slot);
    if layout.is_empty() || sub >= layout.niv {
        return None;
    }

    let n = layout.ncm * layout.ncf;
    let start = (layout.offset + sub * n) * 8;
    let bytes = record.get(start..start + n * 8)?;

    let mut values = [0.0; MAX_COEFFS * MAX_COMPONENTS];
    for (value, chunk) in values.iter_mut().zip(bytes.chunks_exact(8)) {
        let mut raw = [0u8; 8];
        raw.copy_from_slice(chunk);
        *value = f64::from_le_bytes(raw);
    }

    Some(Coefficients {
        values,
        ncm: layout.ncm,
        ncf: layout.ncf,
    })
}

#[cfg(test)]
mod de_file_test {
    use std::io::{Seek, SeekFrom, Write};

    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::jpl_ephem::de_header::de_header_test::{header_bytes, small_triples};

    const BEG: f64 = 2451536.5;
    const INC: f64 = 32.0;

    /// Two records; every slot is the constant series `(slot + 1) * (blk + 1)` on x,
    /// with a linear term of 0.5 on y.
    fn write_small_file() -> (NamedTempFile, DeHeader) {
        let triples = small_triples();
        let header_len = 8192;
        let bytes = header_bytes(BEG, BEG + 2.0 * INC, INC, 572, &triples, header_len);
        let header = DeHeader::parse(&bytes).unwrap();

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&bytes[..2 * header.record_size]).unwrap();

        for blk in 0..2 {
            let mut words = vec![0.0f64; header.record_size / 8];
            words[0] = BEG + blk as f64 * INC;
            words[1] = words[0] + INC;
            for slot in JplSlot::ALL {
                let layout = header.slot(slot);
                words[layout.offset] = (slot.index() + 1) as f64 * (blk + 1) as f64;
                if layout.ncm > 1 {
                    words[layout.offset + layout.ncf + 1] = 0.5;
                }
            }
            let raw: Vec<u8> = words.iter().flat_map(|w| w.to_le_bytes()).collect();
            file.seek(SeekFrom::Start(header.record_offset(blk) as u64))
                .unwrap();
            file.write_all(&raw).unwrap();
        }
        file.flush().unwrap();
        (file, header)
    }

    #[test]
    fn test_open_and_header() {
        let (file, header) = write_small_file();
        let ephem = EphemerisFile::open(file.path()).unwrap();
        assert_eq!(ephem.header(), &header);
        assert_eq!(ephem.record_span(1), Some((BEG + INC, BEG + 2.0 * INC)));
        assert!(ephem.record(2).is_none());
        ephem.close();
    }

    #[test]
    fn test_missing_file() {
        let err = EphemerisFile::open("/nonexistent/linux_p1550p2650.430").unwrap_err();
        assert!(matches!(err, EphemError::FileNotFound(_)));
    }

    #[test]
    fn test_file_shorter_than_records() {
        let (file, header) = write_small_file();
        file.as_file()
            .set_len(header.record_offset(1) as u64)
            .unwrap();
        assert!(matches!(
            EphemerisFile::open(file.path()),
            Err(EphemError::HeaderMalformed(_))
        ));
    }

    #[test]
    fn test_record_index() {
        let (file, _) = write_small_file();
        let ephem = EphemerisFile::open(file.path()).unwrap();

        assert_eq!(ephem.record_index(BEG).unwrap(), (0, 0.0));
        assert_eq!(ephem.record_index(BEG + 8.0).unwrap(), (0, 0.25));
        assert_eq!(ephem.record_index(BEG + 40.0).unwrap(), (1, 0.25));
        assert_eq!(ephem.record_index(BEG + 64.0).unwrap(), (1, 1.0));

        assert_eq!(
            ephem.record_index(BEG - 1.0),
            Err(EphemError::OutOfRange {
                jde: BEG - 1.0,
                beg: BEG,
                end: BEG + 64.0
            })
        );
        assert!(ephem.record_index(f64::NAN).is_err());
    }

    #[test]
    fn test_direct_and_derived_states() {
        let (file, header) = write_small_file();
        let ephem = EphemerisFile::open(file.path()).unwrap();
        let jde = BEG + 40.0;

        let sun = ephem.state(jde, Body::Sun, Body::Barycenter).unwrap();
        assert_eq!(sun.position.x, 11.0 * 2.0);
        assert_eq!(sun.jde, jde);

        let emb = ephem
            .state(jde, Body::EarthMoonBarycenter, Body::Barycenter)
            .unwrap();
        let earth = ephem.state(jde, Body::Earth, Body::Barycenter).unwrap();
        let moon = ephem.state(jde, Body::Moon, Body::Barycenter).unwrap();
        let moon_geo = ephem.coefficients(1, JplSlot::MoonGeocentric, 0).unwrap();

        assert_relative_eq!(
            earth.position.x,
            emb.position.x - moon_geo.as_slice()[0] / (1.0 + header.cem),
            max_relative = 1e-15
        );
        assert_relative_eq!(moon.position.x - earth.position.x, 20.0, max_relative = 1e-14);

        let zero = ephem.state(jde, Body::Mars, Body::Mars).unwrap();
        assert_eq!(zero.position, Vector3::zeros());
        assert_eq!(zero.velocity, Vector3::zeros());
    }

    #[test]
    fn test_linear_term_gives_velocity() {
        let (file, header) = write_small_file();
        let ephem = EphemerisFile::open(file.path()).unwrap();
        let jupiter = ephem
            .state(BEG + 10.0, Body::Jupiter, Body::Barycenter)
            .unwrap();

        // y = 0.5·x with x = 2t - 1 over a 32 day record
        assert_relative_eq!(
            jupiter.velocity.y,
            0.5 * chebyshev::velocity_scale(1, header.inc),
            max_relative = 1e-15
        );
        assert_relative_eq!(jupiter.position.y, 0.5 * (2.0 * 10.0 / 32.0 - 1.0));
    }

    #[test]
    fn test_absent_slot() {
        let mut triples = small_triples();
        let mut offset = 3;
        for (slot, triple) in JplSlot::ALL.iter().zip(triples.iter_mut()) {
            triple[0] = offset;
            if *slot == JplSlot::Pluto {
                *triple = [offset, 0, 0];
            }
            offset += triple[1] * triple[2] * slot.components() as i32;
        }
        let bytes = header_bytes(BEG, BEG + INC, INC, 400, &triples, 8192);
        let header = DeHeader::parse(&bytes).unwrap();

        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&bytes[..2 * header.record_size]).unwrap();
        file.as_file()
            .set_len(header.record_offset(1) as u64)
            .unwrap();

        let ephem = EphemerisFile::open(file.path()).unwrap();
        assert!(matches!(
            ephem.state(BEG + 1.0, Body::Pluto, Body::Barycenter),
            Err(EphemError::BodyUnavailable(_))
        ));
        assert!(ephem.state(BEG + 1.0, Body::Sun, Body::Barycenter).is_ok());
    }
}
