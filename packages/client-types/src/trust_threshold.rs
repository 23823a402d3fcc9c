//! This module defines [`TrustThreshold`].

use std::fmt;

use ibc_light_utils::ensure;
use serde::{Deserialize, Serialize};

use crate::error::ClientTypesError;

/// Fraction of voting power that must sign for a header to be trusted.
///
/// Valid thresholds lie within `[1/3, 1]`. All comparisons are done on integers.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(try_from = "RawTrustThreshold")]
pub struct TrustThreshold {
    numerator: u64,
    denominator: u64,
}

#[derive(Deserialize)]
struct RawTrustThreshold {
    numerator: u64,
    denominator: u64,
}

impl TrustThreshold {
    /// The default trust level of the light client
    pub const ONE_THIRD: Self = Self {
        numerator: 1,
        denominator: 3,
    };

    /// Trust level required for a commit to be final
    pub const TWO_THIRDS: Self = Self {
        numerator: 2,
        denominator: 3,
    };

    /// Create a new [`TrustThreshold`]
    /// # Errors
    /// Returns an error if the fraction is outside of `[1/3, 1]`
    pub fn new(numerator: u64, denominator: u64) -> Result<Self, ClientTypesError> {
        let threshold = Self {
            numerator,
            denominator,
        };
        threshold.validate()?;
        Ok(threshold)
    }

    /// Numerator of the fraction
    #[must_use]
    pub const fn numerator(&self) -> u64 {
        self.numerator
    }

    /// Denominator of the fraction
    #[must_use]
    pub const fn denominator(&self) -> u64 {
        self.denominator
    }

    /// Checks that the fraction lies within `[1/3, 1]`
    /// # Errors
    /// Returns an error if the denominator is zero or the fraction is out of range
    pub fn validate(&self) -> Result<(), ClientTypesError> {
        let err = ClientTypesError::InvalidTrustThreshold {
            numerator: self.numerator,
            denominator: self.denominator,
        };

        ensure!(self.denominator != 0, err);
        // numerator / denominator >= 1 / 3
        ensure!(
            u128::from(self.numerator) * 3 >= u128::from(self.denominator),
            err
        );
        ensure!(self.numerator <= self.denominator, err);

        Ok(())
    }

    /// Whether `signed` out of `total` power meets the threshold. The bound is inclusive.
    /// An empty total never meets the threshold.
    #[must_use]
    pub fn is_met(&self, signed: u64, total: u64) -> bool {
        if total == 0 {
            return false;
        }

        u128::from(signed) * u128::from(self.denominator)
            >= u128::from(total) * u128::from(self.numerator)
    }
}

impl Default for TrustThreshold {
    fn default() -> Self {
        Self::ONE_THIRD
    }
}

impl TryFrom<RawTrustThreshold> for TrustThreshold {
    type Error = ClientTypesError;

    fn try_from(raw: RawTrustThreshold) -> Result<Self, Self::Error> {
        Self::new(raw.numerator, raw.denominator)
    }
}

impl fmt::Display for TrustThreshold {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}
