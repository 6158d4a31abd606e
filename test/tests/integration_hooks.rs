/// Integration tests for change hooks
/// Hooks run exactly once per mutation, after the member is marked dirty,
/// and remote updates run them without marking anything

use std::{
    cell::RefCell,
    sync::{Arc, Mutex},
};

use replica_shared::{
    replicate, ByteReader, Hook, Replicate, ReplicatedField, SerdeErr, Snapshot,
};
use replica_test::{CompressionMonster, MonsterState};

thread_local! {
    static TICKS: RefCell<Vec<(u32, u32)>> = const { RefCell::new(Vec::new()) };
}

replicate! {
    struct Clock {
        #[replicated(hook = "on_tick")]
        tick: u32,
    }

    impl Clock {
        fn new() -> Self {
            Self {}
        }

        fn advance(&mut self) {
            self.tick += 1;
        }

        fn on_tick(old_value: &u32, new_value: &u32) {
            TICKS.with(|ticks| ticks.borrow_mut().push((*old_value, *new_value)));
        }
    }
}

fn recorded_ticks() -> Vec<(u32, u32)> {
    TICKS.with(|ticks| ticks.borrow().clone())
}

#[test]
fn instance_hook_runs_once_per_set() {
    let mut monster = CompressionMonster::from_state(MonsterState::original());
    monster.set_network_health(95);
    assert_eq!(monster.health_changes(), &[(100, 95)]);

    monster.take_damage(5);
    assert_eq!(monster.health_changes(), &[(100, 95), (95, 90)]);
}

#[test]
fn instance_hook_sees_the_dirty_bit() {
    let mut monster = CompressionMonster::from_state(MonsterState::original());
    monster.set_network_health(50);
    assert!(monster.health_dirty_in_hook());
}

#[test]
fn hook_fires_even_when_the_value_is_unchanged() {
    let mut monster = CompressionMonster::from_state(MonsterState::original());
    monster.set_network_health(100);
    assert_eq!(monster.health_changes(), &[(100, 100)]);
    assert_eq!(monster.dirty_bits().scalar_bits(), 0b10);
}

#[test]
fn members_without_hooks_do_not_reach_other_hooks() {
    let mut monster = CompressionMonster::from_state(MonsterState::original());
    monster.set_network_mana(1);
    monster.level_up();
    assert!(monster.health_changes().is_empty());
}

#[test]
fn construction_runs_no_hooks() {
    let monster = CompressionMonster::from_state(MonsterState::big_change());
    assert!(monster.health_changes().is_empty());
}

#[test]
fn static_hook_runs_for_compound_assignment() {
    let mut clock = Clock::new();
    clock.advance();
    clock.advance();

    assert_eq!(*clock.network_tick(), 2);
    assert_eq!(recorded_ticks(), vec![(0, 1), (1, 2)]);
    assert_eq!(clock.dirty_bits().scalar_bits(), 0b1);
}

#[test]
fn remote_snapshot_runs_hooks_without_marking_dirty() {
    let authority = CompressionMonster::from_state(MonsterState::small_change());
    let mut mirror = CompressionMonster::from_state(MonsterState::original());

    mirror.apply_snapshot(&authority.snapshot()).unwrap();

    assert_eq!(mirror.state(), MonsterState::small_change());
    assert_eq!(mirror.health_changes(), &[(100, 95)]);
    assert!(!mirror.health_dirty_in_hook());
    assert!(!mirror.dirty_bits().has_bits());
}

#[test]
fn snapshot_with_leftover_bytes_changes_nothing() {
    let authority = CompressionMonster::from_state(MonsterState::big_change());
    let mut bytes = authority.snapshot().into_bytes();
    bytes.push(0);

    let mut mirror = CompressionMonster::from_state(MonsterState::original());
    assert_eq!(
        mirror.apply_snapshot(&Snapshot::new(bytes)),
        Err(SerdeErr::TrailingBytes { remaining: 1 })
    );
    assert_eq!(mirror.state(), MonsterState::original());
    assert!(mirror.health_changes().is_empty());
}

#[test]
fn truncated_snapshot_changes_nothing() {
    let authority = CompressionMonster::from_state(MonsterState::big_change());
    let bytes = authority.snapshot().into_bytes();

    let mut mirror = CompressionMonster::from_state(MonsterState::original());
    let truncated = Snapshot::new(bytes[..bytes.len() - 3].to_vec());
    assert!(mirror.apply_snapshot(&truncated).is_err());
    assert_eq!(mirror.state(), MonsterState::original());
    assert!(mirror.health_changes().is_empty());
}

#[test]
fn streamed_snapshot_leaves_the_rest_unread() {
    let authority = CompressionMonster::from_state(MonsterState::small_change());
    let mut bytes = authority.snapshot().into_bytes();
    bytes.extend_from_slice(&[7, 7]);

    let mut mirror = CompressionMonster::from_state(MonsterState::original());
    let mut reader = ByteReader::new(&bytes);
    mirror.read_snapshot(&mut reader).unwrap();
    assert_eq!(reader.remaining(), 2);
    assert_eq!(mirror.state(), MonsterState::small_change());
}

#[test]
fn closure_hook_runs_after_on_dirty() {
    let events = Arc::new(Mutex::new(Vec::new()));

    let hook_events = events.clone();
    let dirty_events = events.clone();
    let mut field: ReplicatedField<i32> = ReplicatedField::with_hook(
        1,
        Hook::closure(move |old_value: &i32, new_value: &i32| {
            hook_events
                .lock()
                .unwrap()
                .push(format!("hook {} -> {}", old_value, new_value));
        }),
    )
    .on_dirty(move || dirty_events.lock().unwrap().push("dirty".to_string()));

    assert_eq!(field.set(2), 1);
    assert_eq!(
        *events.lock().unwrap(),
        vec!["dirty".to_string(), "hook 1 -> 2".to_string()]
    );

    events.lock().unwrap().clear();
    field.set_remote(3);
    assert_eq!(*events.lock().unwrap(), vec!["hook 2 -> 3".to_string()]);
}
