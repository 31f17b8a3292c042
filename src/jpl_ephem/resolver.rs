//! Lazily opened ephemeris shared by the force engine.
//!
//! The resolver owns a [`EphemFileSource`] and opens the file the first time
//! a state is requested. The file stays mapped until [`EphemerisResolver::shutdown`];
//! afterwards every query fails with [`EphemError::NotOpen`].
use camino::Utf8PathBuf;
use hifitime::Epoch;
use once_cell::sync::OnceCell;

use super::{
    body_ids::Body, body_state::BodyState, de_file::EphemerisFile, de_header::DeHeader,
    ephem_source::EphemFileSource,
};
use crate::{constants::JulianDate, ephem_errors::EphemError};

#[derive(Debug)]
pub struct EphemerisResolver {
    source: EphemFileSource,
    file: OnceCell<EphemerisFile>,
    closed: bool,
}

impl EphemerisResolver {
    /// Build a resolver from a source descriptor (`"file:<path>"` or `"de:<version>"`).
    ///
    /// The file is not opened here.
    pub fn new(source: &str) -> Result<Self, EphemError> {
        Ok(Self::from_source(source.try_into()?))
    }

    pub fn from_source(source: EphemFileSource) -> Self {
        EphemerisResolver {
            source,
            file: OnceCell::new(),
            closed: false,
        }
    }

    /// Wrap a file that is already open.
    pub fn from_file(file: EphemerisFile) -> Self {
        EphemerisResolver {
            source: EphemFileSource::File(Utf8PathBuf::from(file.path())),
            file: OnceCell::with_value(file),
            closed: false,
        }
    }

    pub fn source(&self) -> &EphemFileSource {
        &self.source
    }

    pub fn is_open(&self) -> bool {
        self.file.get().is_some()
    }

    /// The opened file, opening it on first use.
    ///
    /// A failed open is not cached: the next call tries again.
    pub fn file(&self) -> Result<&EphemerisFile, EphemError> {
        if self.closed {
            return Err(EphemError::NotOpen);
        }
        self.file
            .get_or_try_init(|| EphemerisFile::open(self.source.path()?))
    }

    pub fn header(&self) -> Result<&DeHeader, EphemError> {
        Ok(self.file()?.header())
    }

    /// State of `target` relative to `reference` at the Julian date `jde` (TDB).
    ///
    /// Return
    /// ------
    /// * Position in km and velocity in km/s, see [`BodyState::to_au`].
    pub fn resolve(
        &self,
        jde: JulianDate,
        target: Body,
        reference: Body,
    ) -> Result<BodyState, EphemError> {
        self.file()?.state(jde, target, reference)
    }

    /// Same as [`EphemerisResolver::resolve`] for a `hifitime` epoch, read as a TDB Julian date.
    pub fn resolve_epoch(
        &self,
        epoch: &Epoch,
        target: Body,
        reference: Body,
    ) -> Result<BodyState, EphemError> {
        self.resolve(epoch.to_jde_tdb_days(), target, reference)
    }

    /// Close the file. Later queries return [`EphemError::NotOpen`].
    pub fn shutdown(&mut self) {
        self.closed = true;
        if let Some(file) = self.file.take() {
            file.close();
        }
    }
}
