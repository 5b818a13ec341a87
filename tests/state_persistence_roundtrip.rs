//! The mock facade backends keep their records in memory, but the stub
//! naming convention and the `bincode` wire format they use are exactly
//! what a file-backed facade would persist to disk. This exercises
//! that round trip literally, through a temp directory, rather than
//! through the in-memory mock.

use serde::{Deserialize, Serialize};

use ffs_core::state::StateRef;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct PersistedRecord {
    position: f64,
    rng_seed: u64,
}

#[test]
fn a_state_written_to_its_stub_path_reads_back_identically() {
    let dir = tempfile::tempdir().unwrap();
    let state_ref = StateRef::new(3, 1, 42);
    let path = dir.path().join(state_ref.stub());

    let record = PersistedRecord {
        position: 2.71828,
        rng_seed: 0xDEAD_BEEF,
    };
    let bytes = bincode::serialize(&record).unwrap();
    std::fs::write(&path, &bytes).unwrap();

    let read_back = std::fs::read(&path).unwrap();
    let restored: PersistedRecord = bincode::deserialize(&read_back).unwrap();
    assert_eq!(restored, record);
}

#[test]
fn two_state_refs_with_different_triples_never_collide_on_the_same_stub() {
    let dir = tempfile::tempdir().unwrap();
    let a = StateRef::new(0, 0, 1);
    let b = StateRef::new(0, 0, 2);
    assert_ne!(a.stub(), b.stub());

    let path_a = dir.path().join(a.stub());
    let path_b = dir.path().join(b.stub());
    std::fs::write(&path_a, bincode::serialize(&1.0f64).unwrap()).unwrap();
    std::fs::write(&path_b, bincode::serialize(&2.0f64).unwrap()).unwrap();

    let value_a: f64 = bincode::deserialize(&std::fs::read(&path_a).unwrap()).unwrap();
    let value_b: f64 = bincode::deserialize(&std::fs::read(&path_b).unwrap()).unwrap();
    assert_eq!(value_a, 1.0);
    assert_eq!(value_b, 2.0);
}

#[test]
fn deleting_a_stub_path_makes_it_unreadable() {
    let dir = tempfile::tempdir().unwrap();
    let state_ref = StateRef::new(5, 0, 7);
    let path = dir.path().join(state_ref.stub());

    std::fs::write(&path, bincode::serialize(&9.0f64).unwrap()).unwrap();
    assert!(path.exists());
    std::fs::remove_file(&path).unwrap();
    assert!(!path.exists());
}
