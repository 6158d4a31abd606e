use log::debug;

use crate::{
    decl::{FieldDecl, TypeDecl, TypeShape},
    diagnostics::{Diagnostics, WeaveError, WeaveFailure, WeaveWarning},
    hook::resolve_hook,
    woven::{AccessLists, Woven, WovenCollection, WovenField, WovenMember, WovenType},
};

/// Number of bits in each dirty mask
pub const MASK_WIDTH: usize = 64;

/// Plans the replicated-field rewrite for a set of types.
///
/// Errors never stop the pass early: every type and field is visited so a
/// single run reports every violation, and any error refuses the whole output.
#[derive(Debug, Clone)]
pub struct Weaver {
    accessor_prefix: String,
}

impl Default for Weaver {
    fn default() -> Self {
        Self::new()
    }
}

impl Weaver {
    pub fn new() -> Self {
        Self {
            accessor_prefix: "network_".to_string(),
        }
    }

    /// Use a different prefix for synthesized accessors
    pub fn with_accessor_prefix(prefix: &str) -> Self {
        Self {
            accessor_prefix: prefix.to_string(),
        }
    }

    pub fn weave(&self, types: &[TypeDecl]) -> Result<Woven, WeaveFailure> {
        let mut diagnostics = Diagnostics::default();
        let mut access_lists = AccessLists::default();
        let mut woven_types = Vec::with_capacity(types.len());

        for decl in types {
            let woven = self.weave_type(decl, &mut diagnostics);
            for field in woven.scalars() {
                access_lists.insert(&woven.name, field);
            }
            woven_types.push(woven);
        }

        let failed = diagnostics.failed();
        let (errors, warnings) = diagnostics.into_parts();
        if failed {
            return Err(WeaveFailure { errors, warnings });
        }

        Ok(Woven {
            types: woven_types,
            access_lists,
            warnings,
        })
    }

    fn weave_type(&self, decl: &TypeDecl, diagnostics: &mut Diagnostics) -> WovenType {
        let mut members = Vec::new();
        let mut scalar_count: usize = 0;
        let mut collection_count: usize = 0;

        for field in &decl.fields {
            let is_collection = field.ty.shape == TypeShape::Collection;
            if !field.is_marked() && !(is_collection && !field.is_static) {
                continue;
            }

            if field.is_marked() && field.is_static {
                diagnostics.error(WeaveError::StaticField {
                    type_name: decl.name.clone(),
                    field: field.name.clone(),
                });
                continue;
            }

            if field.ty.shape == TypeShape::Array {
                diagnostics.error(WeaveError::ArrayField {
                    type_name: decl.name.clone(),
                    field: field.name.clone(),
                    ty: field.ty.to_string(),
                });
                continue;
            }

            if is_collection {
                if field.is_marked() {
                    diagnostics.warning(WeaveWarning::RedundantCollectionMarker {
                        type_name: decl.name.clone(),
                        field: field.name.clone(),
                    });
                }
                members.push(WovenMember::Collection(WovenCollection {
                    name: field.name.clone(),
                    ty: field.ty.clone(),
                    bit: bit_index(collection_count),
                }));
                collection_count += 1;
                continue;
            }

            match resolve_hook(decl, field) {
                Ok(hook) => {
                    members.push(WovenMember::Scalar(self.weave_field(
                        field,
                        bit_index(scalar_count),
                        hook,
                    )));
                }
                Err(error) => diagnostics.error(error),
            }
            // keep counting so the capacity check sees every declared field
            scalar_count += 1;
        }

        for (kind, count) in [("fields", scalar_count), ("collections", collection_count)] {
            if count > MASK_WIDTH {
                diagnostics.error(WeaveError::BitSpaceExhausted {
                    type_name: decl.name.clone(),
                    kind,
                    count,
                    capacity: MASK_WIDTH,
                });
            }
        }

        debug!(
            "Weaver: {} has {} replicated field(s) and {} collection(s)",
            decl.name, scalar_count, collection_count
        );

        WovenType {
            name: decl.name.clone(),
            members,
        }
    }

    fn weave_field(
        &self,
        field: &FieldDecl,
        bit: u8,
        hook: Option<crate::hook::ResolvedHook>,
    ) -> WovenField {
        WovenField {
            name: field.name.clone(),
            ty: field.ty.clone(),
            storage: format!("__{}_replica", field.name),
            getter: format!("{}{}", self.accessor_prefix, field.name),
            setter: format!("set_{}{}", self.accessor_prefix, field.name),
            bit,
            hook,
            has_initializer: field.has_initializer,
        }
    }
}

// past the mask width the weave fails anyway; saturate instead of wrapping
fn bit_index(ordinal: usize) -> u8 {
    u8::try_from(ordinal).unwrap_or(u8::MAX)
}
