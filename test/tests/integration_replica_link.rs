/// Integration tests for dirty-only updates between an authority and its mirror

use replica_shared::{ByteReader, ByteWriter, DirtyHeader, Replicate};
use replica_test::{
    init_logging, CompressionMonster, InventorySlot, MonsterState, ReplicaLink, Vector3,
};

fn connected_link() -> ReplicaLink<CompressionMonster> {
    let mut link = ReplicaLink::new(
        CompressionMonster::from_state(MonsterState::original()),
        CompressionMonster::new(),
    );
    link.connect().unwrap();
    link
}

#[test]
fn connect_sends_the_full_state() {
    init_logging();

    let link = connected_link();
    assert_eq!(link.mirror.state(), MonsterState::original());
    assert_eq!(link.bytes_sent(), link.authority.snapshot().len());
    assert!(!link.mirror.dirty_bits().has_bits());
}

#[test]
fn nothing_is_sent_while_clean() {
    let mut link = connected_link();
    assert_eq!(link.tick().unwrap(), None);
    assert_eq!(link.updates_sent(), 0);
}

#[test]
fn one_changed_field_costs_its_header_and_value() {
    let mut link = connected_link();
    link.authority.take_damage(10);

    // two mask varints, then the i32
    assert_eq!(link.tick().unwrap(), Some(6));
    assert_eq!(*link.mirror.network_health(), 90);
    assert_eq!(link.mirror.health_changes().last(), Some(&(100, 90)));
    assert!(!link.authority.dirty_bits().has_bits());
    assert!(!link.mirror.dirty_bits().has_bits());
}

#[test]
fn collections_travel_whole() {
    let mut link = connected_link();
    link.authority.inventory.set(3, InventorySlot::new(0, 49)).unwrap();
    link.authority.skills.pop();

    link.tick().unwrap().unwrap();
    assert_eq!(link.mirror.inventory.as_slice(), link.authority.inventory.as_slice());
    assert_eq!(link.mirror.skills.len(), 3);
    assert!(!link.mirror.dirty_bits().has_bits());
}

#[test]
fn mirror_keeps_its_own_tracking_after_updates() {
    let mut link = connected_link();
    link.authority.inventory.push(InventorySlot::new(5, 5));
    link.tick().unwrap();

    // the replaced list still reports local changes
    link.mirror.inventory.push(InventorySlot::new(6, 6));
    assert_eq!(link.mirror.dirty_bits().collection_bits(), 0b01);
}

#[test]
fn many_ticks_converge() {
    let mut link = connected_link();
    link.authority.apply_state(MonsterState::small_change());
    link.tick().unwrap();
    assert_eq!(link.mirror.state(), MonsterState::small_change());

    link.authority.apply_state(MonsterState::big_change());
    link.tick().unwrap();
    assert_eq!(link.mirror.state(), MonsterState::big_change());
    assert_eq!(link.updates_sent(), 2);
}

#[test]
fn dirty_update_writes_only_flagged_members() {
    let mut monster = CompressionMonster::from_state(MonsterState::original());
    monster.set_network_position(Vector3::new(1.0, 2.0, 3.0));
    monster.set_network_mana(7);

    let mut writer = ByteWriter::new();
    monster.write_dirty(&mut writer);
    let bytes = writer.to_bytes();

    let mut reader = ByteReader::new(&bytes);
    let header = DirtyHeader::read(&mut reader).unwrap();
    assert_eq!(header.scalar, 0b10100);
    assert_eq!(header.collection, 0);
    // mana, then position
    assert_eq!(reader.remaining(), 4 + 12);
}

#[test]
fn truncated_update_is_an_error() {
    let mut monster = CompressionMonster::from_state(MonsterState::original());
    monster.set_network_monster_name("Lich".to_string());

    let mut writer = ByteWriter::new();
    monster.write_dirty(&mut writer);
    let bytes = writer.to_bytes();

    let mut mirror = CompressionMonster::from_state(MonsterState::original());
    let mut reader = ByteReader::new(&bytes[..bytes.len() - 1]);
    assert!(mirror.read_dirty(&mut reader).is_err());
    assert_eq!(mirror.state(), MonsterState::original());
}

#[test]
fn rejected_update_changes_nothing() {
    let mut monster = CompressionMonster::from_state(MonsterState::original());
    monster.set_network_health(1);
    monster.set_network_mana(2);
    monster.inventory.push(InventorySlot::new(9, 9));

    let mut writer = ByteWriter::new();
    monster.write_dirty(&mut writer);
    let mut bytes = writer.to_bytes();

    let mut mirror = CompressionMonster::from_state(MonsterState::original());
    // cut inside the inventory, after both scalars
    assert!(mirror.apply_dirty(&bytes[..bytes.len() - 2]).is_err());
    assert_eq!(mirror.state(), MonsterState::original());
    assert!(mirror.health_changes().is_empty());

    bytes.push(0);
    assert!(mirror.apply_dirty(&bytes).is_err());
    assert_eq!(mirror.state(), MonsterState::original());

    bytes.pop();
    mirror.apply_dirty(&bytes).unwrap();
    assert_eq!(*mirror.network_health(), 1);
    assert_eq!(mirror.health_changes(), &[(100, 1)]);
    assert_eq!(mirror.inventory.len(), 5);
}
