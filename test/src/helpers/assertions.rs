use replica_shared::{apply_patch, compute_delta, Delta, Snapshot};

/// Enables debug logging for a test. Safe to call from every test.
pub fn init_logging() {
    env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init()
        .ok();
}

/// Computes the delta between two snapshots, checks that it patches `from`
/// back into exactly `to` and that computing it again gives the same bytes
pub fn assert_delta_round_trip(from: &Snapshot, to: &Snapshot) -> Delta {
    let delta = compute_delta(from, to);
    let patched = apply_patch(from, &delta)
        .unwrap_or_else(|error| panic!("delta failed to apply: {}", error));
    assert_eq!(patched, *to, "patched snapshot should equal the target");
    assert_eq!(
        compute_delta(from, to),
        delta,
        "the same snapshots should always produce the same delta"
    );
    delta
}
