//! End to end scenarios of the solo machine client.

use ibc_light_client_types::ClientStatus;
use ibc_light_commitment::{
    merkle::{self, encode_path},
    MerklePath,
};
use ics06_solomachine_client::{
    header::{apply_header, verify_header},
    membership::{verify_membership, verify_non_membership},
    misbehaviour::{update_state_on_misbehaviour, verify_misbehaviour},
    test_utils::{
        client_state, misbehaviour, rotation_header, signed_data, statement_proof, TestKey,
        TIMESTAMP,
    },
    verify_solo_machine_update, DataType, SequencePolicy, SoloMachineError,
};
use rstest::rstest;

fn merkle_path() -> MerklePath {
    merkle::merkle_path([
        b"ibc".as_slice(),
        b"clients/07-tendermint-0/clientState".as_slice(),
    ])
}

#[rstest]
#[case::ed25519(TestKey::ed25519(7))]
#[case::secp256k1(TestKey::secp256k1(7))]
fn sequence_advances_and_replay_fails(#[case] key: TestKey) {
    let client_state = client_state(&key, 5, SequencePolicy::default());
    let statement = signed_data(&key, 5, TIMESTAMP + 1, b"path", b"value");

    let advanced = verify_solo_machine_update(&client_state, &statement).unwrap();
    assert_eq!(advanced.sequence, 6);

    assert_eq!(
        verify_solo_machine_update(&advanced, &statement),
        Err(SoloMachineError::SequenceMismatch {
            expected: 6,
            found: 5
        })
    );
}

#[rstest]
#[case::continue_policy(SequencePolicy::Continue, 4)]
#[case::reset_policy(SequencePolicy::Reset, 1)]
fn key_rotation_follows_sequence_policy(#[case] policy: SequencePolicy, #[case] next: u64) {
    let old_key = TestKey::ed25519(1);
    let new_key = TestKey::secp256k1(2);
    let client_state = client_state(&old_key, 3, policy);

    let header = rotation_header(&old_key, &new_key, 3, TIMESTAMP + 5, "rotated");
    verify_header(&client_state, &header).unwrap();
    let rotated = apply_header(&client_state, &header);

    assert_eq!(rotated.sequence, next);
    assert_eq!(rotated.consensus_state.public_key, new_key.public_key());
    assert_eq!(rotated.consensus_state.diversifier, "rotated");
    assert_eq!(rotated.consensus_state.timestamp, TIMESTAMP + 5);

    // the old key no longer signs for the client
    let mut by_old_key = signed_data(&old_key, next, TIMESTAMP + 6, b"path", b"value");
    by_old_key.diversifier = "rotated".to_string();
    assert_eq!(
        verify_solo_machine_update(&rotated, &by_old_key),
        Err(SoloMachineError::InvalidPublicKey)
    );
}

#[test]
fn rotation_signed_by_other_key_is_rejected() {
    let key = TestKey::ed25519(1);
    let client_state = client_state(&key, 3, SequencePolicy::default());
    let header = rotation_header(&TestKey::ed25519(9), &TestKey::ed25519(2), 3, TIMESTAMP, "d");

    assert!(matches!(
        verify_header(&client_state, &header),
        Err(SoloMachineError::InvalidSignature { .. })
    ));
}

#[test]
fn membership_and_non_membership_statements() {
    let key = TestKey::secp256k1(4);
    let client_state = client_state(&key, 10, SequencePolicy::default());
    let path = merkle_path();
    let path_bytes = encode_path(&path);

    let proof = statement_proof(
        &key,
        10,
        TIMESTAMP,
        DataType::Membership,
        &path_bytes,
        b"state",
    );
    let advanced = verify_membership(&client_state, 10, &proof, &path, b"state").unwrap();
    assert_eq!(advanced.sequence, 11);

    assert!(matches!(
        verify_membership(&client_state, 10, &proof, &path, b"other"),
        Err(SoloMachineError::InvalidSignature { .. })
    ));

    // a membership signature does not prove absence
    assert!(matches!(
        verify_non_membership(&client_state, 10, &proof, &path),
        Err(SoloMachineError::InvalidSignature { .. })
    ));

    let absence = statement_proof(
        &key,
        11,
        TIMESTAMP,
        DataType::NonMembership,
        &path_bytes,
        &[],
    );
    let advanced = verify_non_membership(&advanced, 11, &absence, &path).unwrap();
    assert_eq!(advanced.sequence, 12);
}

#[test]
fn membership_proofs_must_decode() {
    let key = TestKey::ed25519(4);
    let client_state = client_state(&key, 1, SequencePolicy::default());
    let prefixed = merkle::apply_prefix(b"ibc", b"key");

    assert!(matches!(
        verify_membership(&client_state, 1, &[0xff, 0xff], &prefixed.unwrap(), b"v"),
        Err(SoloMachineError::InvalidProof { .. })
    ));
}

#[test]
fn misbehaviour_freezes_the_client() {
    let key = TestKey::ed25519(5);
    let client_state = client_state(&key, 2, SequencePolicy::default());
    let evidence = misbehaviour(&key, 2);

    verify_misbehaviour(&client_state, &evidence).unwrap();
    let frozen = update_state_on_misbehaviour(&client_state);
    assert_eq!(frozen.status(), ClientStatus::Frozen);

    // frozen absorbs everything
    let statement = signed_data(&key, 2, TIMESTAMP, b"path", b"value");
    assert_eq!(
        verify_solo_machine_update(&frozen, &statement),
        Err(SoloMachineError::FrozenClient)
    );
    assert_eq!(
        verify_misbehaviour(&frozen, &evidence),
        Err(SoloMachineError::FrozenClient)
    );
}

#[test]
fn misbehaviour_over_identical_data_is_rejected() {
    let key = TestKey::ed25519(5);
    let client_state = client_state(&key, 2, SequencePolicy::default());
    let mut evidence = misbehaviour(&key, 2);
    evidence.signature_two = evidence.signature_one.clone();

    assert!(matches!(
        verify_misbehaviour(&client_state, &evidence),
        Err(SoloMachineError::InvalidMisbehaviour { .. })
    ));
}

#[test]
fn misbehaviour_with_foreign_signature_is_rejected() {
    let key = TestKey::ed25519(5);
    let client_state = client_state(&key, 2, SequencePolicy::default());
    let mut evidence = misbehaviour(&key, 2);
    evidence.signature_two = misbehaviour(&TestKey::ed25519(6), 2).signature_two;

    assert!(matches!(
        verify_misbehaviour(&client_state, &evidence),
        Err(SoloMachineError::InvalidSignature { .. })
    ));
}

#[test]
fn client_state_roundtrips_through_json() {
    let client_state = client_state(&TestKey::secp256k1(3), 8, SequencePolicy::Reset);
    let json = serde_json::to_string(&client_state).unwrap();
    assert_eq!(
        serde_json::from_str::<ics06_solomachine_client::ClientState>(&json).unwrap(),
        client_state
    );
}
