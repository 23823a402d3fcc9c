//! This module defines [`Height`].

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ClientTypesError;

/// A checkpoint of a tracked chain.
///
/// Heights are ordered lexicographically: first by epoch, then by the height within the epoch.
/// The field order below is what the derived [`Ord`] relies on.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Height {
    /// The epoch (revision) of the chain
    pub epoch_number: u64,
    /// The block height within the epoch
    pub epoch_height: u64,
}

impl Height {
    /// Create a new [`Height`]
    #[must_use]
    pub const fn new(epoch_number: u64, epoch_height: u64) -> Self {
        Self {
            epoch_number,
            epoch_height,
        }
    }

    /// Whether both components are zero
    #[must_use]
    pub const fn is_zero(&self) -> bool {
        self.epoch_number == 0 && self.epoch_height == 0
    }

    /// The next height within the same epoch
    #[must_use]
    pub const fn increment(self) -> Self {
        Self {
            epoch_number: self.epoch_number,
            epoch_height: self.epoch_height.saturating_add(1),
        }
    }
}

impl fmt::Display for Height {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.epoch_number, self.epoch_height)
    }
}

impl FromStr for Height {
    type Err = ClientTypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| ClientTypesError::InvalidHeight {
            height: s.to_string(),
            reason: reason.to_string(),
        };

        let (epoch, height) = s
            .split_once('-')
            .ok_or_else(|| invalid("expected `{epoch}-{height}`"))?;
        let epoch_number = epoch
            .parse::<u64>()
            .map_err(|e| invalid(&format!("epoch: {e}")))?;
        let epoch_height = height
            .parse::<u64>()
            .map_err(|e| invalid(&format!("height: {e}")))?;

        Ok(Self::new(epoch_number, epoch_height))
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case::same_epoch(Height::new(0, 10), Height::new(0, 11))]
    #[case::epoch_dominates(Height::new(0, 1_000), Height::new(1, 1))]
    #[case::zero_first(Height::new(0, 0), Height::new(0, 1))]
    fn heights_are_ordered_lexicographically(#[case] lower: Height, #[case] higher: Height) {
        assert!(lower < higher);
        assert!(higher > lower);
        assert_eq!(lower.max(higher), higher);
    }

    #[test]
    fn increment_stays_within_epoch() {
        assert_eq!(Height::new(2, 7).increment(), Height::new(2, 8));
        assert_eq!(
            Height::new(2, u64::MAX).increment(),
            Height::new(2, u64::MAX)
        );
    }

    #[test]
    fn display_and_parse_agree() {
        let height = Height::new(4, 1_234);
        assert_eq!(height.to_string(), "4-1234");
        assert_eq!("4-1234".parse::<Height>().unwrap(), height);
    }

    #[rstest]
    #[case::missing_separator("10")]
    #[case::bad_epoch("x-10")]
    #[case::bad_height("1-")]
    #[case::negative("1--2")]
    fn parse_rejects_malformed_heights(#[case] input: &str) {
        assert!(matches!(
            input.parse::<Height>(),
            Err(ClientTypesError::InvalidHeight { .. })
        ));
    }

    #[test]
    fn zero_height() {
        assert!(Height::default().is_zero());
        assert!(!Height::new(0, 1).is_zero());
    }
}
