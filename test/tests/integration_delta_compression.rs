/// Integration tests for snapshot deltas between monster states
/// Snapshots of small edits must patch back exactly and stay well below
/// the size of a full snapshot

use replica_shared::{
    apply_patch, compute_delta, replicate, DeltaCodec, DeltaConfig, Replicate, SyncPayload,
};
use replica_test::{
    assert_delta_round_trip, init_logging, CompressionMonster, MonsterState, SnapshotChannel,
};

replicate! {
    #[replicate(sync_interval = 0.0)]
    struct Skeleton {
        #[replicated]
        name: String,
        #[replicated]
        health: i32,
        #[replicated]
        mana: i32,
        #[replicated]
        level: u8,
    }

    impl Skeleton {
        fn new(name: &str, health: i32, mana: i32, level: u8) -> Self {
            Self {
                name: name.to_string(),
                health,
                mana,
                level,
            }
        }
    }
}

fn snapshot_of(state: MonsterState) -> replica_shared::Snapshot {
    CompressionMonster::from_state(state).snapshot()
}

#[test]
fn skeleton_delta_is_smaller_than_its_snapshot() {
    let before = Skeleton::new("Skeleton", 100, 200, 60).snapshot();
    let after = Skeleton::new("Skeleton", 95, 180, 60).snapshot();

    let delta = assert_delta_round_trip(&before, &after);
    assert!(
        delta.len() < after.len(),
        "delta of {} bytes should be smaller than a {} byte snapshot",
        delta.len(),
        after.len()
    );
}

#[test]
fn small_change_round_trips_and_compresses() {
    init_logging();

    let original = snapshot_of(MonsterState::original());
    let small_change = snapshot_of(MonsterState::small_change());

    let delta = assert_delta_round_trip(&original, &small_change);
    log::debug!(
        "small change: {} byte snapshot, {} byte delta",
        small_change.len(),
        delta.len()
    );
    assert!(delta.len() < small_change.len());
}

#[test]
fn big_change_round_trips() {
    let original = snapshot_of(MonsterState::original());
    let big_change = snapshot_of(MonsterState::big_change());

    let delta = assert_delta_round_trip(&original, &big_change);
    // never worse than a single literal plus the header
    assert!(delta.len() <= big_change.len() + 16);
}

#[test]
fn big_change_back_to_original_round_trips() {
    let original = snapshot_of(MonsterState::original());
    let big_change = snapshot_of(MonsterState::big_change());
    assert_delta_round_trip(&big_change, &original);
}

#[test]
fn identical_snapshots_give_a_tiny_delta() {
    let original = snapshot_of(MonsterState::original());
    let delta = assert_delta_round_trip(&original, &original.clone());
    assert!(delta.len() < 16, "identity delta was {} bytes", delta.len());
}

#[test]
fn small_change_from_scratch_round_trips() {
    let empty = replica_shared::Snapshot::default();
    let small_change = snapshot_of(MonsterState::small_change());
    assert_delta_round_trip(&empty, &small_change);
}

#[test]
fn patching_the_wrong_baseline_fails() {
    let original = snapshot_of(MonsterState::original());
    let small_change = snapshot_of(MonsterState::small_change());
    let big_change = snapshot_of(MonsterState::big_change());

    let delta = compute_delta(&original, &small_change);
    assert!(apply_patch(&big_change, &delta).is_err());
}

#[test]
fn patched_snapshot_applies_to_a_mirror() {
    let original = CompressionMonster::from_state(MonsterState::original());
    let changed = CompressionMonster::from_state(MonsterState::small_change());

    let delta = compute_delta(&original.snapshot(), &changed.snapshot());
    let patched = apply_patch(&original.snapshot(), &delta).unwrap();

    let mut mirror = CompressionMonster::from_state(MonsterState::original());
    mirror.apply_snapshot(&patched).unwrap();
    assert_eq!(mirror.state(), MonsterState::small_change());
}

#[test]
fn any_codec_config_round_trips() {
    let original = snapshot_of(MonsterState::original());
    let small_change = snapshot_of(MonsterState::small_change());

    for (min_match, max_candidates) in [(1, 1), (4, 16), (8, 2), (32, 64)] {
        let codec = DeltaCodec::new(DeltaConfig {
            min_match,
            max_candidates,
        });
        let delta = codec.compute_delta(&original, &small_change);
        assert_eq!(codec.apply_patch(&original, &delta).unwrap(), small_change);
    }
}

#[test]
fn channel_sends_full_then_deltas() {
    init_logging();

    let mut channel = SnapshotChannel::default();
    let mut monster = CompressionMonster::from_state(MonsterState::original());

    let (received, full_size) = channel.send(monster.snapshot()).unwrap();
    assert_eq!(received, monster.snapshot());

    monster.apply_state(MonsterState::small_change());
    let (received, delta_size) = channel.send(monster.snapshot()).unwrap();
    assert_eq!(received, monster.snapshot());
    assert!(delta_size < full_size);

    monster.apply_state(MonsterState::big_change());
    let (received, _) = channel.send(monster.snapshot()).unwrap();
    assert_eq!(received, monster.snapshot());
    assert_eq!(channel.decoder().baseline(), Some(&monster.snapshot()));
}

#[test]
fn channel_falls_back_to_full_after_reset() {
    let mut channel = SnapshotChannel::default();
    let original = snapshot_of(MonsterState::original());
    channel.send(original.clone()).unwrap();

    channel.drop_receiver();
    assert!(channel.encoder().baseline().is_none());

    let small_change = snapshot_of(MonsterState::small_change());
    let (received, size) = channel.send(small_change.clone()).unwrap();
    assert_eq!(received, small_change);
    assert!(size > small_change.len(), "a full payload carries the whole snapshot");
}

#[test]
fn first_payload_is_full() {
    let mut encoder = replica_shared::BaselineEncoder::default();
    let payload = encoder.encode(snapshot_of(MonsterState::original()));
    assert!(matches!(payload, SyncPayload::Full(_)));

    let payload = encoder.encode(snapshot_of(MonsterState::small_change()));
    assert!(matches!(payload, SyncPayload::Delta(_)));
}
