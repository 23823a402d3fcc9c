//! Structural checks and lookups on tendermint validator sets.

use std::collections::BTreeSet;

use tendermint::account;

pub use tendermint::validator::{Info as Validator, Set as ValidatorSet};

/// The validator with the given address
#[must_use]
pub fn find<'a>(set: &'a ValidatorSet, address: &account::Id) -> Option<&'a Validator> {
    set.validators().iter().find(|v| &v.address == address)
}

/// Sum of the voting power of all validators
#[must_use]
pub fn total_voting_power(set: &ValidatorSet) -> u64 {
    set.total_voting_power().value()
}

/// Checks that the set is non-empty, has positive powers, addresses derived from the public
/// keys and no duplicate validators
/// # Errors
/// Returns a description of the first violation
pub fn validate(set: &ValidatorSet) -> Result<(), String> {
    let validators = set.validators();
    if validators.is_empty() {
        return Err("validator set is empty".to_string());
    }
    if validators.iter().any(|v| v.power.value() == 0) {
        return Err("validator with zero voting power".to_string());
    }
    if let Some(v) = validators
        .iter()
        .find(|v| v.address != account::Id::from(v.pub_key))
    {
        return Err(format!("address {} does not match its public key", v.address));
    }
    let mut seen = BTreeSet::new();
    if !validators.iter().all(|v| seen.insert(v.address)) {
        return Err("duplicate validator".to_string());
    }
    Ok(())
}
