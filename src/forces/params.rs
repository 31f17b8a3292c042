//! Named integer and floating-point parameters read by the force models.
//!
//! Values are typed: a parameter stored with [`Params::set_double`] is not
//! visible through [`Params::get_int`] and conversely.
use std::collections::HashMap;

/// Reference body switch, `0` (barycentric) or `1` (geocentric).
pub const GEOCENTRIC: &str = "geocentric";
/// Number of ephemeris perturbers taken from the perturber table.
pub const N_EPHEM: &str = "N_ephem";
/// Number of massive asteroids.
pub const N_AST: &str = "N_ast";
/// Speed of light in simulation units.
pub const SPEED_OF_LIGHT: &str = "c";
/// Output counter.
pub const N_OUT: &str = "n_out";

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Int(i64),
    Double(f64),
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    values: HashMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_int(&mut self, name: &str, value: i64) {
        self.values.insert(name.to_string(), ParamValue::Int(value));
    }

    pub fn set_double(&mut self, name: &str, value: f64) {
        self.values
            .insert(name.to_string(), ParamValue::Double(value));
    }

    pub fn get_int(&self, name: &str) -> Option<i64> {
        match self.values.get(name) {
            Some(ParamValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn get_double(&self, name: &str) -> Option<f64> {
        match self.values.get(name) {
            Some(ParamValue::Double(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<ParamValue> {
        self.values.remove(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }
}

#[cfg(test)]
mod params_test {
    use super::*;

    #[test]
    fn test_typed_access() {
        let mut params = Params::new();
        params.set_int(N_EPHEM, 5);
        params.set_double(SPEED_OF_LIGHT, 173.144632674);

        assert_eq!(params.get_int(N_EPHEM), Some(5));
        assert_eq!(params.get_double(SPEED_OF_LIGHT), Some(173.144632674));
        assert_eq!(params.get_double(N_EPHEM), None);
        assert_eq!(params.get_int(SPEED_OF_LIGHT), None);
        assert_eq!(params.get_int(GEOCENTRIC), None);
    }

    #[test]
    fn test_overwrite_and_remove() {
        let mut params = Params::new();
        params.set_int(GEOCENTRIC, 0);
        params.set_int(GEOCENTRIC, 1);
        assert_eq!(params.get_int(GEOCENTRIC), Some(1));

        assert_eq!(params.remove(GEOCENTRIC), Some(ParamValue::Int(1)));
        assert!(!params.contains(GEOCENTRIC));
    }
}
