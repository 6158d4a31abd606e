/// Integration tests for dirty-bit tracking on a `replicate!` type
/// Every generated setter must flag exactly its own member

use replica_shared::Replicate;
use replica_test::{init_logging, CompressionMonster, InventorySlot, MonsterState, SkillSlot, Vector3};

fn monster() -> CompressionMonster {
    CompressionMonster::from_state(MonsterState::original())
}

#[test]
fn constructing_marks_nothing() {
    let monster = monster();
    assert_eq!(monster.dirty_bits().scalar_bits(), 0);
    assert_eq!(monster.dirty_bits().collection_bits(), 0);
    assert!(!monster.dirty_bits().is_dirty());

    let blank = CompressionMonster::new();
    assert!(!blank.dirty_bits().has_bits());
    assert_eq!(*blank.network_level(), 1, "omitted members take their init value");
    assert_eq!(*blank.network_health(), 0);
}

#[test]
fn layout_follows_declaration_order() {
    let layout = CompressionMonster::layout();
    assert_eq!(layout.type_name(), "CompressionMonster");
    assert_eq!(
        layout.scalars(),
        &[
            "monster_name",
            "health",
            "mana",
            "level",
            "position",
            "rotation",
            "strength",
            "intelligence",
            "damage",
            "defense",
        ]
    );
    assert_eq!(layout.collections(), &["inventory", "skills"]);
}

#[test]
fn setting_mana_and_position_sets_bits_two_and_four() {
    let mut monster = monster();
    monster.set_network_position(Vector3::new(9.0, 20.0, 30.0));
    monster.set_network_mana(180);

    assert_eq!(monster.dirty_bits().scalar_bits(), 0b10100);
    assert_eq!(monster.dirty_bits().collection_bits(), 0);
    assert_eq!(monster.dirty_bits().dirty_scalar_names(), vec!["mana", "position"]);
}

#[test]
fn collection_mutations_set_collection_bits() {
    let mut monster = monster();
    monster.inventory.push(InventorySlot::new(7, 1));
    assert_eq!(monster.dirty_bits().collection_bits(), 0b01);

    monster.skills.set(0, SkillSlot::new(4, 3.0)).unwrap();
    assert_eq!(monster.dirty_bits().collection_bits(), 0b11);
    assert_eq!(monster.dirty_bits().scalar_bits(), 0);
    assert_eq!(
        monster.dirty_bits().dirty_collection_names(),
        vec!["inventory", "skills"]
    );
}

#[test]
fn failed_collection_mutation_marks_nothing() {
    let mut monster = monster();
    assert!(monster.inventory.set(10, InventorySlot::new(1, 1)).is_err());
    assert_eq!(monster.dirty_bits().collection_bits(), 0);

    let mut blank = CompressionMonster::new();
    blank.inventory.clear();
    blank.skills.clear();
    assert_eq!(blank.dirty_bits().collection_bits(), 0);
}

#[test]
fn methods_inside_the_macro_go_through_setters() {
    let mut monster = monster();
    monster.take_damage(30);
    assert_eq!(*monster.network_health(), 70);
    assert_eq!(monster.dirty_bits().scalar_bits(), 0b10);

    monster.level_up();
    assert_eq!(*monster.network_level(), 61);
    assert_eq!(monster.dirty_bits().scalar_bits(), 0b1010);
}

#[test]
fn reads_inside_the_macro_mark_nothing() {
    let monster = monster();
    assert_eq!(monster.describe(), "Skeleton (level 60, 100 hp)");
    assert_eq!(monster.state(), MonsterState::original());
    assert!(!monster.dirty_bits().has_bits());
}

#[test]
fn first_subscriber_clears_pending_bits() {
    init_logging();

    let mut monster = monster();
    monster.set_network_strength(99);
    assert!(monster.dirty_bits().has_bits());

    assert!(monster.dirty_bits_mut().add_subscriber());
    assert!(!monster.dirty_bits().has_bits());

    // a second subscriber keeps what the first one is owed
    monster.set_network_strength(98);
    assert!(!monster.dirty_bits_mut().add_subscriber());
    assert_eq!(monster.dirty_bits().dirty_scalar_names(), vec!["strength"]);
    assert_eq!(monster.dirty_bits().subscriber_count(), 2);
}

#[test]
fn clear_all_resets_both_masks() {
    let mut monster = monster();
    monster.set_network_defense(1);
    monster.skills.clear();
    assert!(monster.dirty_bits().is_dirty());

    monster.dirty_bits_mut().clear_all();
    assert!(!monster.dirty_bits().is_dirty());
    assert_eq!(monster.dirty_bits().scalar_bits(), 0);
    assert_eq!(monster.dirty_bits().collection_bits(), 0);
}

#[test]
fn sync_interval_comes_from_the_attribute() {
    let monster = monster();
    assert_eq!(monster.dirty_bits().sync_interval(), 0.0);
}

#[test]
fn applying_a_whole_state_marks_every_member() {
    let mut monster = monster();
    monster.apply_state(MonsterState::big_change());
    assert_eq!(monster.dirty_bits().scalar_bits(), (1 << 10) - 1);
    assert_eq!(monster.dirty_bits().collection_bits(), 0b11);
    assert_eq!(monster.state(), MonsterState::big_change());
}
