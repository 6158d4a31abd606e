
pub use fixtures::{CompressionMonster, InventorySlot, MonsterState, Quaternion, SkillSlot, Vector3};
pub use helpers::*;
