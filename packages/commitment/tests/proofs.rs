//! Membership and non-membership verification against simple merkle multistores.

use ibc_light_commitment::{
    merkle::{decode_proof, encode_proof, merkle_path},
    test_utils::{MultiStore, SimpleTree},
    verify_membership, verify_non_membership, CommitmentError, CommitmentRoot, MerkleProof,
    ProofSpecs,
};
use ics23::commitment_proof::Proof;
use rstest::rstest;

const STORE: &[u8] = b"ibc";

fn specs() -> ProofSpecs {
    ProofSpecs::new(vec![ics23::tendermint_spec(), ics23::tendermint_spec()]).unwrap()
}

fn store() -> MultiStore {
    let mut store = MultiStore::with_store(
        STORE,
        [
            ("clients/07-tendermint-0/clientState", "client state"),
            ("commitments/ports/transfer/channels/channel-0/sequences/1", "packet one"),
            ("commitments/ports/transfer/channels/channel-0/sequences/3", "packet three"),
            ("connections/connection-0", "connection end"),
        ],
    );
    store.insert_store(b"bank", [("balances/alice", "100")]);
    store.insert_store(b"staking", [("validators/0", "validator")]);
    store
}

#[rstest]
#[case::first_key(b"clients/07-tendermint-0/clientState".as_slice(), b"client state".as_slice())]
#[case::middle_key(
    b"commitments/ports/transfer/channels/channel-0/sequences/3".as_slice(),
    b"packet three".as_slice()
)]
#[case::last_key(b"connections/connection-0".as_slice(), b"connection end".as_slice())]
fn committed_values_verify(#[case] key: &[u8], #[case] value: &[u8]) {
    let store = store();
    let proof = store.membership_proof(STORE, key).unwrap();

    verify_membership(
        &store.root(),
        &specs(),
        &proof,
        &MultiStore::path(STORE, key),
        value,
    )
    .unwrap();
}

#[rstest]
#[case::between_keys(b"commitments/ports/transfer/channels/channel-0/sequences/2".as_slice())]
#[case::before_first(b"acks/ports/transfer".as_slice())]
#[case::after_last(b"receipts/ports/transfer".as_slice())]
fn absent_keys_verify_non_membership(#[case] key: &[u8]) {
    let store = store();
    let proof = store.non_membership_proof(STORE, key).unwrap();

    verify_non_membership(&store.root(), &specs(), &proof, &MultiStore::path(STORE, key))
        .unwrap();
}

#[test]
fn wrong_value_fails() {
    let store = store();
    let key = b"connections/connection-0";
    let proof = store.membership_proof(STORE, key).unwrap();

    let err = verify_membership(
        &store.root(),
        &specs(),
        &proof,
        &MultiStore::path(STORE, key),
        b"connection enD",
    )
    .unwrap_err();
    assert!(matches!(err, CommitmentError::VerificationFailed { .. }));
}

#[test]
fn wrong_path_fails() {
    let store = store();
    let key = b"connections/connection-0";
    let proof = store.membership_proof(STORE, key).unwrap();

    let err = verify_membership(
        &store.root(),
        &specs(),
        &proof,
        &MultiStore::path(STORE, b"connections/connection-1"),
        b"connection end",
    )
    .unwrap_err();
    assert!(matches!(err, CommitmentError::VerificationFailed { .. }));

    let err = verify_membership(
        &store.root(),
        &specs(),
        &proof,
        &MultiStore::path(b"bank", key),
        b"connection end",
    )
    .unwrap_err();
    assert!(matches!(err, CommitmentError::VerificationFailed { .. }));
}

#[test]
fn tampered_proof_fails() {
    let store = store();
    let key = b"connections/connection-0";
    let mut proof = store.membership_proof(STORE, key).unwrap();

    let Some(Proof::Exist(existence)) = proof.proofs[0].proof.as_mut() else {
        panic!("expected an existence proof");
    };
    existence.path[0].prefix[1] ^= 0x01;

    let err = verify_membership(
        &store.root(),
        &specs(),
        &proof,
        &MultiStore::path(STORE, key),
        b"connection end",
    )
    .unwrap_err();
    assert!(matches!(err, CommitmentError::VerificationFailed { .. }));
}

#[test]
fn tampered_root_fails() {
    let store = store();
    let key = b"connections/connection-0";
    let proof = store.membership_proof(STORE, key).unwrap();

    let mut root = store.root().as_bytes().to_vec();
    root[0] ^= 0x01;

    let err = verify_membership(
        &CommitmentRoot::from_bytes(&root),
        &specs(),
        &proof,
        &MultiStore::path(STORE, key),
        b"connection end",
    )
    .unwrap_err();
    assert!(matches!(err, CommitmentError::RootMismatch { .. }));
}

#[rstest]
#[case::flipped_bit(|root: &mut Vec<u8>| root[31] ^= 0x80)]
#[case::truncated(|root: &mut Vec<u8>| root.truncate(31))]
#[case::extended(|root: &mut Vec<u8>| root.push(0))]
fn root_mismatch_is_detected_before_layer_verification(#[case] mutate: fn(&mut Vec<u8>)) {
    let store = store();
    let key = b"connections/connection-0";
    let mut root = store.root().as_bytes().to_vec();
    mutate(&mut root);

    // the proof itself is intact, only the trusted root differs
    let err = verify_non_membership(
        &CommitmentRoot::from_bytes(&root),
        &specs(),
        &store.membership_proof(STORE, key).unwrap(),
        &MultiStore::path(STORE, key),
    )
    .unwrap_err();
    assert!(matches!(err, CommitmentError::RootMismatch { .. }));
}

#[test]
fn tampered_outer_layer_is_a_root_mismatch() {
    let store = store();
    let key = b"connections/connection-0";
    let mut proof = store.membership_proof(STORE, key).unwrap();

    let Some(Proof::Exist(existence)) = proof.proofs[1].proof.as_mut() else {
        panic!("expected an existence proof");
    };
    existence.value[0] ^= 0x01;

    let err = verify_membership(
        &store.root(),
        &specs(),
        &proof,
        &MultiStore::path(STORE, key),
        b"connection end",
    )
    .unwrap_err();
    assert!(matches!(err, CommitmentError::RootMismatch { .. }));
}

#[test]
fn present_key_has_no_non_membership_proof() {
    let store = store();
    let key = b"connections/connection-0";
    let membership = store.membership_proof(STORE, key).unwrap();

    assert!(store.non_membership_proof(STORE, key).is_none());
    assert!(matches!(
        verify_non_membership(&store.root(), &specs(), &membership, &MultiStore::path(STORE, key)),
        Err(CommitmentError::VerificationFailed { .. })
    ));
}

#[test]
fn non_membership_proof_for_other_key_fails() {
    let store = store();
    let proof = store
        .non_membership_proof(STORE, b"commitments/ports/transfer/channels/channel-0/sequences/2")
        .unwrap();

    let err = verify_non_membership(
        &store.root(),
        &specs(),
        &proof,
        &MultiStore::path(STORE, b"receipts/ports/transfer"),
    )
    .unwrap_err();
    assert!(matches!(err, CommitmentError::VerificationFailed { .. }));
}

#[test]
fn empty_root_is_rejected_first() {
    let store = store();
    let key = b"connections/connection-0";
    let proof = store.membership_proof(STORE, key).unwrap();

    assert_eq!(
        verify_membership(
            &CommitmentRoot::from_bytes(&[]),
            &specs(),
            &proof,
            &MultiStore::path(STORE, key),
            b"connection end",
        ),
        Err(CommitmentError::EmptyCommitmentRoot)
    );
    assert_eq!(
        verify_non_membership(
            &CommitmentRoot::from_bytes(&[]),
            &specs(),
            &MerkleProof { proofs: vec![] },
            &MultiStore::path(STORE, key),
        ),
        Err(CommitmentError::EmptyCommitmentRoot)
    );
}

#[test]
fn layer_count_mismatches_are_rejected() {
    let store = store();
    let key = b"connections/connection-0";
    let proof = store.membership_proof(STORE, key).unwrap();

    assert!(matches!(
        verify_membership(
            &store.root(),
            &ProofSpecs::tendermint(),
            &proof,
            &MultiStore::path(STORE, key),
            b"connection end",
        ),
        Err(CommitmentError::VerificationFailed { .. })
    ));
    assert!(matches!(
        verify_membership(
            &store.root(),
            &specs(),
            &proof,
            &merkle_path([key]),
            b"connection end",
        ),
        Err(CommitmentError::VerificationFailed { .. })
    ));
}

#[test]
fn single_layer_tree_verifies() {
    let tree = SimpleTree::new([("a", "1"), ("b", "2"), ("c", "3"), ("d", "4"), ("e", "5")]);
    let root = CommitmentRoot::from_bytes(&tree.root());

    for (key, value) in [("a", "1"), ("c", "3"), ("e", "5")] {
        let proof = MerkleProof {
            proofs: vec![tree.membership_proof(key.as_bytes()).unwrap()],
        };
        verify_membership(
            &root,
            &ProofSpecs::tendermint(),
            &proof,
            &merkle_path([key]),
            value.as_bytes(),
        )
        .unwrap();
    }
}

#[test]
fn proofs_survive_protobuf_encoding() {
    let store = store();
    let key = b"connections/connection-0";
    let bytes = encode_proof(&store.membership_proof(STORE, key).unwrap());

    let decoded = decode_proof(&bytes).unwrap();
    verify_membership(
        &store.root(),
        &specs(),
        &decoded,
        &MultiStore::path(STORE, key),
        b"connection end",
    )
    .unwrap();
}
