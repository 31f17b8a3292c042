//! Fixed-layout header of a JPL DE binary ephemeris.
//!
//! The header is not self-describing: fields live at fixed byte offsets in
//! the first record of the file (after the 3×84-byte title block and the
//! 400 six-character constant names).
//!
//! ```text
//! 0x0A5C  beg, end, inc                (f64 × 3)   coverage [JD TDB] and record span [days]
//! 0x0A74  ncon                         (i32)       number of constants
//! 0x0A78  cau                          (f64)       kilometers per AU
//! 0x0A80  cem                          (f64)       Earth/Moon mass ratio
//! 0x0A88  12 × (offset, ncf, niv)      (i32 × 36)  slots 0..11
//! 0x0B18  numde                        (i32)       DE version
//! 0x0B1C  (offset, ncf, niv)           (i32 × 3)   slot 12
//! 0x0B28  constant names 401..ncon     (6 bytes each)
//!         2 × (offset, ncf, niv)       (i32 × 6)   slots 13, 14
//! ```
//!
//! Offsets are 1-based positions in 8-byte words from the start of a data
//! record; they are stored 0-based in [`SlotLayout`]. Integers and floats
//! are little-endian.
use std::fmt;

use nom::{
    multi::count,
    number::complete::{le_f64, le_i32},
    IResult, Parser,
};

use super::{
    body_ids::{JplSlot, NUM_SLOTS},
    chebyshev::MAX_COEFFS,
};
use crate::{constants::JulianDate, ephem_errors::EphemError};

/// Byte offset of the coverage fields.
pub const HEADER_OFFSET: usize = 0x0A5C;

/// Byte offset of the 401st constant name, where the extended name block starts.
const START_401TH_CONSTANT_NAME: usize = 2856;

/// Constant count covered by the fixed name block.
const OLD_MAX: i32 = 400;

/// Size in bytes of the two leading time tags of each data record.
const RECORD_TIME_TAGS: usize = 2 * std::mem::size_of::<f64>();

/// Coefficient layout of one slot inside a data record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SlotLayout {
    /// 0-based offset, in f64 words, from the start of the record
    pub offset: usize,
    /// number of Chebyshev coefficients per component
    pub ncf: usize,
    /// number of sub-intervals per record
    pub niv: usize,
    /// number of components
    pub ncm: usize,
}

impl SlotLayout {
    /// Number of f64 words used by this slot in every record.
    pub fn len(&self) -> usize {
        self.ncf * self.niv * self.ncm
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DeHeader {
    pub beg: JulianDate,
    pub end: JulianDate,
    pub inc: f64,
    pub ncon: i32,
    pub cau: f64,
    pub cem: f64,
    pub numde: i32,
    pub layout: [SlotLayout; NUM_SLOTS],
    /// size of one data record in bytes
    pub record_size: usize,
    /// first byte after the last header field read
    pub header_end: usize,
}

type RawTriple = [i32; 3];

struct RawHeader {
    beg: f64,
    end: f64,
    inc: f64,
    ncon: i32,
    cau: f64,
    cem: f64,
    triples: Vec<RawTriple>,
    numde: i32,
}

fn parse_triple(input: &[u8]) -> IResult<&[u8], RawTriple> {
    let (input, offset) = le_i32(input)?;
    let (input, ncf) = le_i32(input)?;
    let (input, niv) = le_i32(input)?;
    Ok((input, [offset, ncf, niv]))
}

/// Parse the fields from `beg` up to the slot 12 triple.
fn parse_fixed_block(input: &[u8]) -> IResult<&[u8], RawHeader> {
    let (input, beg) = le_f64(input)?;
    let (input, end) = le_f64(input)?;
    let (input, inc) = le_f64(input)?;
    let (input, ncon) = le_i32(input)?;
    let (input, cau) = le_f64(input)?;
    let (input, cem) = le_f64(input)?;
    let (input, mut triples) = count(parse_triple, 12).parse(input)?;
    let (input, numde) = le_i32(input)?;
    let (input, librations) = parse_triple(input)?;
    triples.push(librations);

    Ok((
        input,
        RawHeader {
            beg,
            end,
            inc,
            ncon,
            cau,
            cem,
            triples,
            numde,
        },
    ))
}

fn malformed(msg: impl Into<String>) -> EphemError {
    EphemError::HeaderMalformed(msg.into())
}

fn to_layout(slot: JplSlot, raw: RawTriple) -> Result<SlotLayout, EphemError> {
    let [offset, ncf, niv] = raw;

    if ncf < 0 || niv < 0 {
        return Err(malformed(format!(
            "negative coefficient layout for slot {slot:?}: ncf={ncf}, niv={niv}"
        )));
    }

    if ncf == 0 {
        return Ok(SlotLayout {
            ncm: slot.components(),
            ..SlotLayout::default()
        });
    }

    if ncf as usize > MAX_COEFFS {
        return Err(malformed(format!(
            "slot {slot:?} has {ncf} coefficients, at most {MAX_COEFFS} are supported"
        )));
    }

    if niv == 0 {
        return Err(malformed(format!(
            "slot {slot:?} has coefficients but no sub-interval"
        )));
    }

    // 1-based in the file, must point past the two time tags
    if offset < 3 {
        return Err(malformed(format!(
            "slot {slot:?} has an invalid offset {offset}"
        )));
    }

    Ok(SlotLayout {
        offset: offset as usize - 1,
        ncf: ncf as usize,
        niv: niv as usize,
        ncm: slot.components(),
    })
}

impl DeHeader {
    /// Decode and validate the header from the beginning of a DE file.
    ///
    /// Arguments
    /// ---------
    /// * `bytes` : the file content, starting at byte 0
    ///
    /// Return
    /// ------
    /// * The decoded header, or [`EphemError::HeaderMalformed`] if a field is
    ///   missing or inconsistent.
    pub fn parse(bytes: &[u8]) -> Result<Self, EphemError> {
        let fixed = bytes.get(HEADER_OFFSET..).ok_or_else(|| {
            malformed(format!(
                "file is {} bytes, header starts at byte {HEADER_OFFSET}",
                bytes.len()
            ))
        })?;

        let (_, raw) = parse_fixed_block(fixed)
            .map_err(|_| malformed("truncated coverage/layout block"))?;

        let (extra, header_end) = if raw.ncon < OLD_MAX {
            ([[0; 3]; 2], START_401TH_CONSTANT_NAME)
        } else {
            let start = START_401TH_CONSTANT_NAME + 6 * (raw.ncon - OLD_MAX) as usize;
            let input = bytes.get(start..).ok_or_else(|| {
                malformed(format!(
                    "{} constants imply slot 13 at byte {start}, beyond the file",
                    raw.ncon
                ))
            })?;
            let (_, extra) = count(parse_triple, 2)
                .parse(input)
                .map_err(|_: nom::Err<nom::error::Error<&[u8]>>| {
                    malformed("truncated layout for slots 13 and 14")
                })?;
            ([extra[0], extra[1]], start + 24)
        };

        let raw_triples = raw.triples.iter().chain(extra.iter());
        let mut layout = [SlotLayout::default(); NUM_SLOTS];
        for (slot_layout, (slot, triple)) in layout
            .iter_mut()
            .zip(JplSlot::ALL.iter().zip(raw_triples))
        {
            *slot_layout = to_layout(*slot, *triple)?;
        }

        let header = DeHeader {
            beg: raw.beg,
            end: raw.end,
            inc: raw.inc,
            ncon: raw.ncon,
            cau: raw.cau,
            cem: raw.cem,
            numde: raw.numde,
            record_size: compute_record_size(&layout),
            layout,
            header_end,
        };

        header.validate()?;
        Ok(header)
    }

    fn validate(&self) -> Result<(), EphemError> {
        if !(self.beg.is_finite() && self.end.is_finite() && self.inc.is_finite()) {
            return Err(malformed("non-finite coverage fields"));
        }
        if self.end <= self.beg {
            return Err(malformed(format!(
                "coverage end {} is not after begin {}",
                self.end, self.beg
            )));
        }
        if self.inc <= 0.0 {
            return Err(malformed(format!("invalid record span {}", self.inc)));
        }
        if !(self.cau > 0.0) {
            return Err(malformed(format!("invalid AU definition {}", self.cau)));
        }
        if !(self.cem > 0.0) {
            return Err(malformed(format!("invalid Earth/Moon mass ratio {}", self.cem)));
        }

        let words = self.record_size / 8;
        for (slot, layout) in JplSlot::ALL.iter().zip(self.layout.iter()) {
            if !layout.is_empty() && layout.offset + layout.len() > words {
                return Err(malformed(format!(
                    "slot {slot:?} ends at word {} beyond the {words}-word record",
                    layout.offset + layout.len()
                )));
            }
        }

        if self.header_end > 2 * self.record_size {
            return Err(malformed(format!(
                "header ends at byte {} inside the first data record (record size {})",
                self.header_end, self.record_size
            )));
        }

        Ok(())
    }

    pub fn slot(&self, slot: JplSlot) -> &SlotLayout {
        &self.layout[slot.index()]
    }

    /// Number of data records needed to cover `[beg, end]`.
    pub fn record_count(&self) -> usize {
        ((self.end - self.beg) / self.inc).ceil() as usize
    }

    /// Byte offset of data record `blk` (the two leading records hold the header and constants).
    pub fn record_offset(&self, blk: usize) -> usize {
        (blk + 2) * self.record_size
    }
}

/// Size in bytes of one data record: two time tags followed by every slot block.
pub fn compute_record_size(layout: &[SlotLayout; NUM_SLOTS]) -> usize {
    RECORD_TIME_TAGS
        + layout
            .iter()
            .map(|slot| slot.len() * std::mem::size_of::<f64>())
            .sum::<usize>()
}

impl fmt::Display for DeHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DE{} ephemeris", self.numde)?;
        writeln!(f, "  coverage    : JD {} .. {}", self.beg, self.end)?;
        writeln!(f, "  record span : {} days", self.inc)?;
        writeln!(f, "  record size : {} bytes", self.record_size)?;
        writeln!(f, "  AU          : {} km", self.cau)?;
        write!(f, "  Earth/Moon  : {}", self.cem)
    }
}
