use std::collections::BTreeMap;

use crate::{
    decl::TypeRef,
    diagnostics::WeaveWarning,
    hook::ResolvedHook,
};

/// A scalar field rewritten into a `ReplicatedField<T>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WovenField {
    pub name: String,
    pub ty: TypeRef,
    /// Hidden member holding the `ReplicatedField<T>`
    pub storage: String,
    pub getter: String,
    pub setter: String,
    /// Index in the scalar dirty mask, in declaration order
    pub bit: u8,
    pub hook: Option<ResolvedHook>,
    pub has_initializer: bool,
}

/// A self-tracking collection, kept as-is and wired to the collection mask
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WovenCollection {
    pub name: String,
    pub ty: TypeRef,
    pub bit: u8,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WovenMember {
    Scalar(WovenField),
    Collection(WovenCollection),
}

impl WovenMember {
    pub fn name(&self) -> &str {
        match self {
            WovenMember::Scalar(field) => &field.name,
            WovenMember::Collection(collection) => &collection.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WovenType {
    pub name: String,
    /// Replicated members in declaration order, which is also snapshot order
    pub members: Vec<WovenMember>,
}

impl WovenType {
    pub fn scalars(&self) -> impl Iterator<Item = &WovenField> {
        self.members.iter().filter_map(|member| match member {
            WovenMember::Scalar(field) => Some(field),
            WovenMember::Collection(_) => None,
        })
    }

    pub fn collections(&self) -> impl Iterator<Item = &WovenCollection> {
        self.members.iter().filter_map(|member| match member {
            WovenMember::Collection(collection) => Some(collection),
            WovenMember::Scalar(_) => None,
        })
    }

    pub fn scalar(&self, name: &str) -> Option<&WovenField> {
        self.scalars().find(|field| field.name == name)
    }

    pub fn collection(&self, name: &str) -> Option<&WovenCollection> {
        self.collections().find(|collection| collection.name == name)
    }
}

/// `Type.field`, the key of the access lists
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldPath {
    pub type_name: String,
    pub field: String,
}

impl FieldPath {
    pub fn new(type_name: &str, field: &str) -> Self {
        Self {
            type_name: type_name.to_string(),
            field: field.to_string(),
        }
    }
}

/// Reverse lookups used to redirect every read and write of an original field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessLists {
    pub replacement_setters: BTreeMap<FieldPath, String>,
    pub replacement_getters: BTreeMap<FieldPath, String>,
}

impl AccessLists {
    pub fn setter(&self, type_name: &str, field: &str) -> Option<&str> {
        self.replacement_setters
            .get(&FieldPath::new(type_name, field))
            .map(String::as_str)
    }

    pub fn getter(&self, type_name: &str, field: &str) -> Option<&str> {
        self.replacement_getters
            .get(&FieldPath::new(type_name, field))
            .map(String::as_str)
    }

    pub(crate) fn insert(&mut self, type_name: &str, field: &WovenField) {
        let path = FieldPath::new(type_name, &field.name);
        self.replacement_setters.insert(path.clone(), field.setter.clone());
        self.replacement_getters.insert(path, field.getter.clone());
    }
}

/// The output of a successful weave
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Woven {
    pub types: Vec<WovenType>,
    pub access_lists: AccessLists,
    pub warnings: Vec<WeaveWarning>,
}

impl Woven {
    pub fn get(&self, type_name: &str) -> Option<&WovenType> {
        self.types.iter().find(|woven| woven.name == type_name)
    }
}
