use proc_macro2::TokenStream;
use quote::quote;
use syn::{Expr, Ident, Type};

use replica_weaver::{HookKind, WovenMember, WovenType};

use crate::{
    input::StructInfo,
    shared::{ident, shared_crate},
};

/// A woven scalar together with the source details needed to emit it
pub struct ScalarPlan {
    pub ident: Ident,
    pub ty: Type,
    pub storage: Ident,
    pub getter: Ident,
    pub setter: Ident,
    pub bit: u8,
    pub hook: Option<(Ident, HookKind)>,
    pub init: Option<Expr>,
}

pub struct CollectionPlan {
    pub ident: Ident,
    pub ty: Type,
    pub bit: u8,
}

pub enum MemberPlan {
    Scalar(ScalarPlan),
    Collection(CollectionPlan),
}

impl MemberPlan {
    pub fn ident(&self) -> &Ident {
        match self {
            MemberPlan::Scalar(scalar) => &scalar.ident,
            MemberPlan::Collection(collection) => &collection.ident,
        }
    }
}

/// Code generation plan for one replicated type
pub struct TypePlan {
    pub ident: Ident,
    pub sync_interval: Option<Expr>,
    /// Declaration order, which is also snapshot order
    pub members: Vec<MemberPlan>,
}

impl TypePlan {
    pub fn new(info: &StructInfo, woven: &WovenType) -> Self {
        let members = woven
            .members
            .iter()
            .filter_map(|member| {
                let field = info.field(member.name())?;
                Some(match member {
                    WovenMember::Scalar(woven_field) => MemberPlan::Scalar(ScalarPlan {
                        ident: field.ident.clone(),
                        ty: field.ty.clone(),
                        storage: ident(&woven_field.storage),
                        getter: ident(&woven_field.getter),
                        setter: ident(&woven_field.setter),
                        bit: woven_field.bit,
                        hook: woven_field
                            .hook
                            .as_ref()
                            .map(|hook| (ident(&hook.method), hook.kind)),
                        init: field.marker.as_ref().and_then(|marker| marker.init.clone()),
                    }),
                    WovenMember::Collection(woven_collection) => {
                        MemberPlan::Collection(CollectionPlan {
                            ident: field.ident.clone(),
                            ty: field.ty.clone(),
                            bit: woven_collection.bit,
                        })
                    }
                })
            })
            .collect();

        Self {
            ident: info.item.ident.clone(),
            sync_interval: info.sync_interval.clone(),
            members,
        }
    }

    pub fn scalars(&self) -> impl Iterator<Item = &ScalarPlan> {
        self.members.iter().filter_map(|member| match member {
            MemberPlan::Scalar(scalar) => Some(scalar),
            MemberPlan::Collection(_) => None,
        })
    }

    pub fn collections(&self) -> impl Iterator<Item = &CollectionPlan> {
        self.members.iter().filter_map(|member| match member {
            MemberPlan::Collection(collection) => Some(collection),
            MemberPlan::Scalar(_) => None,
        })
    }

    pub fn scalar(&self, name: &Ident) -> Option<&ScalarPlan> {
        self.scalars().find(|scalar| scalar.ident == *name)
    }

    pub fn member(&self, name: &Ident) -> Option<&MemberPlan> {
        self.members.iter().find(|member| member.ident() == name)
    }

    /// Expression creating this type's `DirtyBits`
    pub fn dirty_bits_init(&self) -> TokenStream {
        let shared = shared_crate();
        let type_ident = &self.ident;
        let tracker = match &self.sync_interval {
            Some(interval) => quote! { #shared::DirtyBits::new(#interval) },
            None => quote! { <#shared::DirtyBits as ::core::default::Default>::default() },
        };
        quote! {
            #tracker.with_layout(<#type_ident as #shared::Replicate>::layout())
        }
    }
}

impl ScalarPlan {
    /// Expression creating the `Hook` this field is constructed with
    pub fn hook_init(&self, owner: &Ident) -> TokenStream {
        let shared = shared_crate();
        let ty = &self.ty;
        let hook_type = quote! { #shared::Hook::<#ty, #owner> };
        match &self.hook {
            None => quote! { #hook_type::None },
            Some((method, HookKind::Static)) => quote! {
                #hook_type::Static(|old_value: &#ty, new_value: &#ty| #owner::#method(old_value, new_value))
            },
            Some((method, HookKind::Instance { .. })) => quote! {
                #hook_type::Instance(|owner: &mut #owner, old_value: &#ty, new_value: &#ty| owner.#method(old_value, new_value))
            },
        }
    }

    /// Statements run after the value changed, with `old_value` in scope
    pub fn instance_dispatch(&self) -> TokenStream {
        let storage = &self.storage;
        match &self.hook {
            Some((_, HookKind::Instance { .. })) => quote! {
                if let ::core::option::Option::Some(hook) = self.#storage.instance_hook() {
                    let new_value = ::core::clone::Clone::clone(self.#storage.get());
                    hook(self, &old_value, &new_value);
                }
            },
            _ => quote! { let _ = old_value; },
        }
    }
}
