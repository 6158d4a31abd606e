/// PROPERTY-BASED TESTS: Replication invariants
///
/// Uses proptest to verify replication properties hold across random states.
///
/// Key invariants:
/// 1. A delta between any two monster snapshots patches back exactly
/// 2. Dirty-only updates leave the mirror equal to the authority
/// 3. Dirty bits are exactly the members that were set

use proptest::prelude::*;
use replica_shared::{apply_patch, compute_delta, Replicate};
use replica_test::{
    CompressionMonster, InventorySlot, MonsterState, Quaternion, ReplicaLink, SkillSlot, Vector3,
};

fn vector_strategy() -> impl Strategy<Value = Vector3> {
    (-1000.0f32..1000.0, -1000.0f32..1000.0, -1000.0f32..1000.0)
        .prop_map(|(x, y, z)| Vector3::new(x, y, z))
}

fn monster_state_strategy() -> impl Strategy<Value = MonsterState> {
    (
        "[a-zA-Z ()]{0,24}",
        any::<i32>(),
        any::<i32>(),
        any::<u8>(),
        vector_strategy(),
        prop::collection::vec((any::<i32>(), 0i32..100), 0..8),
        (any::<i32>(), any::<i32>(), any::<i32>(), any::<i32>()),
        prop::collection::vec((any::<u16>(), 0.0f64..120.0), 0..8),
    )
        .prop_map(
            |(monster_name, health, mana, level, position, inventory, stats, skills)| {
                MonsterState {
                    monster_name,
                    health,
                    mana,
                    level,
                    position,
                    rotation: Quaternion::IDENTITY,
                    inventory: inventory
                        .into_iter()
                        .map(|(item_id, amount)| InventorySlot::new(item_id, amount))
                        .collect(),
                    strength: stats.0,
                    intelligence: stats.1,
                    damage: stats.2,
                    defense: stats.3,
                    skills: skills
                        .into_iter()
                        .map(|(skill_id, cooldown)| SkillSlot::new(skill_id, cooldown))
                        .collect(),
                }
            },
        )
}

proptest! {
    /// Test that any two monster snapshots survive a delta round trip
    #[test]
    fn prop_monster_delta_round_trips(
        from in monster_state_strategy(),
        to in monster_state_strategy(),
    ) {
        let from = CompressionMonster::from_state(from).snapshot();
        let to = CompressionMonster::from_state(to).snapshot();

        let delta = compute_delta(&from, &to);
        prop_assert_eq!(apply_patch(&from, &delta).unwrap(), to);
    }

    /// Test that a health change alone always compresses
    #[test]
    fn prop_single_field_change_compresses(
        state in monster_state_strategy(),
        health in any::<i32>(),
    ) {
        let mut monster = CompressionMonster::from_state(state);
        let before = monster.snapshot();
        monster.set_network_health(health);
        let after = monster.snapshot();

        let delta = compute_delta(&before, &after);
        prop_assert!(delta.len() < after.len() + 16);
        prop_assert_eq!(apply_patch(&before, &delta).unwrap(), after);
    }

    /// Test that dirty-only updates make the mirror equal to the authority
    #[test]
    fn prop_dirty_updates_converge(
        start in monster_state_strategy(),
        next in monster_state_strategy(),
    ) {
        let mut link = ReplicaLink::new(
            CompressionMonster::from_state(start),
            CompressionMonster::new(),
        );
        link.connect().unwrap();

        link.authority.apply_state(next.clone());
        link.tick().unwrap();

        prop_assert_eq!(link.mirror.state(), next);
        prop_assert_eq!(link.mirror.snapshot(), link.authority.snapshot());
    }

    /// Test that the scalar mask is exactly the set of members written
    #[test]
    fn prop_scalar_bits_match_setters(
        writes in prop::collection::vec(0usize..4, 0..12),
    ) {
        let mut monster = CompressionMonster::from_state(MonsterState::original());
        let mut expected = 0u64;
        for write in writes {
            match write {
                0 => {
                    monster.set_network_health(1);
                    expected |= 1 << 1;
                }
                1 => {
                    monster.set_network_mana(2);
                    expected |= 1 << 2;
                }
                2 => {
                    monster.set_network_position(Vector3::default());
                    expected |= 1 << 4;
                }
                _ => {
                    monster.set_network_defense(3);
                    expected |= 1 << 9;
                }
            }
        }
        prop_assert_eq!(monster.dirty_bits().scalar_bits(), expected);
    }
}
