use proc_macro2::TokenStream;
use quote::{quote, ToTokens};
use syn::{Item, ItemImpl};

use replica_weaver::Weaver;

use crate::{
    diagnostics::{weave_errors, weave_warnings},
    input::{impl_target, take_marked_consts, type_decl, MarkerArgs, ReplicateInput, SpanTable, StructInfo},
    plan::{MemberPlan, TypePlan},
    rewrite::Rewriter,
    shared::{dirty_bits_ident, remote_setter_ident, shared_crate, value_local_ident},
};

struct MarkedConst {
    target: Option<String>,
    ident: syn::Ident,
    ty: syn::Type,
    marker: MarkerArgs,
}

pub fn expand(input: ReplicateInput) -> TokenStream {
    let mut parse_errors = Vec::new();
    let mut structs: Vec<StructInfo> = Vec::new();
    let mut impls: Vec<(Option<String>, ItemImpl)> = Vec::new();
    let mut consts: Vec<MarkedConst> = Vec::new();
    let mut others: Vec<Item> = Vec::new();

    for item in input.items {
        match item {
            Item::Struct(item) => match StructInfo::parse(item) {
                Ok(info) => structs.push(info),
                Err(error) => parse_errors.push(error),
            },
            Item::Impl(mut item) => {
                let target = impl_target(&item);
                match take_marked_consts(&mut item) {
                    Ok(marked) => consts.extend(marked.into_iter().map(|(ident, ty, marker)| {
                        MarkedConst {
                            target: target.clone(),
                            ident,
                            ty,
                            marker,
                        }
                    })),
                    Err(error) => parse_errors.push(error),
                }
                impls.push((target, item));
            }
            other => others.push(other),
        }
    }

    if !parse_errors.is_empty() {
        return parse_errors.iter().map(syn::Error::to_compile_error).collect();
    }

    let mut spans = SpanTable::default();
    let mut decls = Vec::with_capacity(structs.len());
    for info in &structs {
        let name = info.name();
        spans.add_type(&name, info.item.ident.span());
        for field in &info.fields {
            spans.add_member(&name, &field.ident, field.marker.as_ref());
        }

        let own_impls: Vec<&ItemImpl> = impls
            .iter()
            .filter(|(target, _)| target.as_deref() == Some(name.as_str()))
            .map(|(_, item)| item)
            .collect();
        let own_consts: Vec<(syn::Ident, syn::Type, MarkerArgs)> = consts
            .iter()
            .filter(|marked| marked.target.as_deref() == Some(name.as_str()))
            .map(|marked| {
                spans.add_member(&name, &marked.ident, Some(&marked.marker));
                (marked.ident.clone(), marked.ty.clone(), marked.marker.clone())
            })
            .collect();

        decls.push(type_decl(info, &own_impls, &own_consts));
    }

    let woven = match Weaver::new().weave(&decls) {
        Ok(woven) => woven,
        Err(failure) => {
            // emit the stripped items too, so the only errors are the ones above
            let mut output = weave_errors(&failure.errors, &spans);
            output.extend(weave_warnings(&failure.warnings, &spans));
            for info in &structs {
                info.item.to_tokens(&mut output);
            }
            for (_, item) in &impls {
                item.to_tokens(&mut output);
            }
            for item in &others {
                item.to_tokens(&mut output);
            }
            return output;
        }
    };

    let plans: Vec<TypePlan> = structs
        .iter()
        .zip(&woven.types)
        .map(|(info, woven_type)| TypePlan::new(info, woven_type))
        .collect();

    let mut rewriter = Rewriter::new(&plans);
    for (target, item) in impls.iter_mut() {
        rewriter.rewrite_impl(item, target.as_deref());
    }

    let mut output = weave_warnings(&woven.warnings, &spans);
    for error in rewriter.into_errors() {
        output.extend(error.to_compile_error());
    }
    for (info, plan) in structs.iter().zip(&plans) {
        output.extend(replicated_struct(info, plan));
        output.extend(accessors(plan));
        output.extend(replicate_impl(plan));
    }
    for (_, item) in &impls {
        item.to_tokens(&mut output);
    }
    for item in &others {
        item.to_tokens(&mut output);
    }
    output
}

/// The struct with each replicated scalar moved into hidden storage
fn replicated_struct(info: &StructInfo, plan: &TypePlan) -> TokenStream {
    let shared = shared_crate();
    let dirty_bits = dirty_bits_ident();
    let item = &info.item;
    let attrs = &item.attrs;
    let vis = &item.vis;
    let owner = &item.ident;

    let fields = item.fields.iter().map(|field| {
        let scalar = field.ident.as_ref().and_then(|ident| plan.scalar(ident));
        match scalar {
            Some(scalar) => {
                let field_attrs = &field.attrs;
                let storage = &scalar.storage;
                let ty = &scalar.ty;
                quote! {
                    #(#field_attrs)*
                    #storage: #shared::ReplicatedField<#ty, #owner>
                }
            }
            None => field.to_token_stream(),
        }
    });

    quote! {
        #(#attrs)*
        #vis struct #owner {
            #(#fields,)*
            #dirty_bits: #shared::DirtyBits,
        }
    }
}

fn accessors(plan: &TypePlan) -> TokenStream {
    let owner = &plan.ident;
    let methods = plan.scalars().map(|scalar| {
        let ty = &scalar.ty;
        let storage = &scalar.storage;
        let getter = &scalar.getter;
        let setter = &scalar.setter;
        let remote = remote_setter_ident(&scalar.ident.to_string());
        let dispatch = scalar.instance_dispatch();
        let getter_doc = format!("Current value of the replicated `{}`", scalar.ident);
        let setter_doc = format!(
            "Sets `{}`, marking it dirty and running its hook",
            scalar.ident
        );
        quote! {
            #[doc = #getter_doc]
            pub fn #getter(&self) -> &#ty {
                self.#storage.get()
            }

            #[doc = #setter_doc]
            pub fn #setter(&mut self, value: #ty) {
                let old_value = self.#storage.set(value);
                #dispatch
            }

            #[doc(hidden)]
            fn #remote(&mut self, value: #ty) {
                let old_value = self.#storage.set_remote(value);
                #dispatch
            }
        }
    });

    quote! {
        #[allow(dead_code)]
        impl #owner {
            #(#methods)*
        }
    }
}

fn replicate_impl(plan: &TypePlan) -> TokenStream {
    let shared = shared_crate();
    let dirty_bits = dirty_bits_ident();
    let owner = &plan.ident;
    let type_name = owner.to_string();
    let scalar_names = plan.scalars().map(|scalar| scalar.ident.to_string());
    let collection_names = plan
        .collections()
        .map(|collection| collection.ident.to_string());

    let mut writes = Vec::new();
    let mut decodes = Vec::new();
    let mut applies = Vec::new();
    let mut dirty_writes = Vec::new();
    let mut dirty_decodes = Vec::new();
    let mut dirty_applies = Vec::new();
    for member in &plan.members {
        let local = value_local_ident(&member.ident().to_string());
        let (write, ty, apply, has_bit) = match member {
            MemberPlan::Scalar(scalar) => {
                let storage = &scalar.storage;
                let remote = remote_setter_ident(&scalar.ident.to_string());
                let bit = scalar.bit;
                (
                    quote! { #shared::Serde::ser(self.#storage.get(), writer); },
                    &scalar.ty,
                    quote! { self.#remote(value); },
                    quote! { header.has_scalar(#shared::BitIndex::new(#bit)) },
                )
            }
            MemberPlan::Collection(collection) => {
                let name = &collection.ident;
                let bit = collection.bit;
                (
                    quote! { #shared::Serde::ser(&self.#name, writer); },
                    &collection.ty,
                    quote! { #shared::ReplicatedCollection::replace_remote(&mut self.#name, value); },
                    quote! { header.has_collection(#shared::BitIndex::new(#bit)) },
                )
            }
        };
        decodes.push(quote! {
            let #local = <#ty as #shared::Serde>::de(reader)?;
        });
        applies.push(quote! {
            let value = #local;
            #apply
        });
        dirty_writes.push(quote! { if #has_bit { #write } });
        dirty_decodes.push(quote! {
            let #local = if #has_bit {
                ::core::option::Option::Some(<#ty as #shared::Serde>::de(reader)?)
            } else {
                ::core::option::Option::None
            };
        });
        dirty_applies.push(quote! {
            if let ::core::option::Option::Some(value) = #local {
                #apply
            }
        });
        writes.push(write);
    }

    quote! {
        impl #shared::Replicate for #owner {
            fn layout() -> &'static #shared::ReplicaLayout {
                static LAYOUT: #shared::ReplicaLayout = #shared::ReplicaLayout::new(
                    #type_name,
                    &[#(#scalar_names),*],
                    &[#(#collection_names),*],
                );
                &LAYOUT
            }

            fn dirty_bits(&self) -> &#shared::DirtyBits {
                &self.#dirty_bits
            }

            fn dirty_bits_mut(&mut self) -> &mut #shared::DirtyBits {
                &mut self.#dirty_bits
            }

            fn write_snapshot(&self, writer: &mut dyn #shared::ByteWrite) {
                #(#writes)*
            }

            fn read_snapshot_with(
                &mut self,
                reader: &mut #shared::ByteReader,
                remainder: #shared::Remainder,
            ) -> ::core::result::Result<(), #shared::SerdeErr> {
                #(#decodes)*
                remainder.check(reader)?;
                #(#applies)*
                ::core::result::Result::Ok(())
            }

            fn write_dirty(&self, writer: &mut dyn #shared::ByteWrite) {
                let header = #shared::DirtyHeader::of(&self.#dirty_bits);
                header.write(writer);
                #(#dirty_writes)*
            }

            fn read_dirty_with(
                &mut self,
                reader: &mut #shared::ByteReader,
                remainder: #shared::Remainder,
            ) -> ::core::result::Result<(), #shared::SerdeErr> {
                let header = #shared::DirtyHeader::read(reader)?;
                #(#dirty_decodes)*
                remainder.check(reader)?;
                #(#dirty_applies)*
                ::core::result::Result::Ok(())
            }
        }
    }
}
