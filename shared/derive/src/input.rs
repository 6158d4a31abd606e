use std::collections::HashMap;

use proc_macro2::Span;
use quote::ToTokens;
use syn::{
    parse::{Parse, ParseStream},
    Attribute, Expr, Fields, FnArg, Ident, ImplItem, Item, ItemImpl, ItemStruct, LitStr, Meta,
    Result, Type,
};

use replica_weaver::{
    FieldDecl, MethodDecl, Receiver, ReplicatedMarker, TypeDecl, TypeRef, TypeShape,
};

const FIELD_MARKER: &str = "replicated";
const STRUCT_MARKER: &str = "replicate";
const COLLECTION_TYPES: [&str; 2] = ["ReplicatedList", "ReplicatedMap"];

/// Everything inside `replicate! { .. }`
pub struct ReplicateInput {
    pub items: Vec<Item>,
}

impl Parse for ReplicateInput {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut items = Vec::new();
        while !input.is_empty() {
            items.push(input.parse()?);
        }
        Ok(Self { items })
    }
}

#[derive(Clone, Default)]
pub struct MarkerArgs {
    pub hook: Option<LitStr>,
    pub init: Option<Expr>,
}

pub struct FieldInfo {
    pub ident: Ident,
    pub ty: Type,
    pub marker: Option<MarkerArgs>,
}

/// A struct with replica attributes parsed out and stripped
pub struct StructInfo {
    pub item: ItemStruct,
    pub sync_interval: Option<Expr>,
    pub fields: Vec<FieldInfo>,
}

impl StructInfo {
    pub fn parse(mut item: ItemStruct) -> Result<Self> {
        if !item.generics.params.is_empty() {
            return Err(syn::Error::new_spanned(
                &item.generics,
                "replicated types cannot be generic",
            ));
        }
        let sync_interval = take_struct_marker(&mut item.attrs)?;

        let Fields::Named(named) = &mut item.fields else {
            return Err(syn::Error::new_spanned(
                &item.ident,
                "replicated types must have named fields",
            ));
        };

        let mut fields = Vec::with_capacity(named.named.len());
        for field in named.named.iter_mut() {
            let marker = take_field_marker(&mut field.attrs)?;
            let Some(ident) = field.ident.clone() else {
                continue;
            };
            fields.push(FieldInfo {
                ident,
                ty: field.ty.clone(),
                marker,
            });
        }

        Ok(Self {
            item,
            sync_interval,
            fields,
        })
    }

    pub fn name(&self) -> String {
        self.item.ident.to_string()
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.iter().find(|field| field.ident == name)
    }
}

/// Name of the type an impl block is for, if it is a plain path
pub fn impl_target(item: &ItemImpl) -> Option<String> {
    match &*item.self_ty {
        Type::Path(path) => path.path.segments.last().map(|segment| segment.ident.to_string()),
        _ => None,
    }
}

/// Associated consts marked `#[replicated]`, with the marker stripped
pub fn take_marked_consts(item: &mut ItemImpl) -> Result<Vec<(Ident, Type, MarkerArgs)>> {
    let mut consts = Vec::new();
    for impl_item in item.items.iter_mut() {
        if let ImplItem::Const(constant) = impl_item {
            if let Some(marker) = take_field_marker(&mut constant.attrs)? {
                consts.push((constant.ident.clone(), constant.ty.clone(), marker));
            }
        }
    }
    Ok(consts)
}

/// Source positions diagnostics point at
#[derive(Default)]
pub struct SpanTable {
    types: HashMap<String, Span>,
    members: HashMap<(String, String), Span>,
    hooks: HashMap<(String, String), Span>,
}

impl SpanTable {
    pub fn add_type(&mut self, name: &str, span: Span) {
        self.types.insert(name.to_string(), span);
    }

    pub fn add_member(&mut self, type_name: &str, member: &Ident, marker: Option<&MarkerArgs>) {
        let key = (type_name.to_string(), member.to_string());
        if let Some(hook) = marker.and_then(|marker| marker.hook.as_ref()) {
            self.hooks.insert(key.clone(), hook.span());
        }
        self.members.insert(key, member.span());
    }

    pub fn type_span(&self, type_name: &str) -> Span {
        self.types
            .get(type_name)
            .copied()
            .unwrap_or_else(Span::call_site)
    }

    pub fn member_span(&self, type_name: &str, member: &str) -> Span {
        let key = (type_name.to_string(), member.to_string());
        self.members
            .get(&key)
            .copied()
            .unwrap_or_else(|| self.type_span(type_name))
    }

    pub fn hook_span(&self, type_name: &str, member: &str) -> Span {
        let key = (type_name.to_string(), member.to_string());
        self.hooks
            .get(&key)
            .copied()
            .unwrap_or_else(|| self.member_span(type_name, member))
    }
}

/// Lowers a struct and the impls targeting it into weaver metadata
pub fn type_decl(
    info: &StructInfo,
    impls: &[&ItemImpl],
    consts: &[(Ident, Type, MarkerArgs)],
) -> TypeDecl {
    let mut decl = TypeDecl::new(&info.name());

    for field in &info.fields {
        let mut field_decl = FieldDecl::new(&field.ident.to_string(), type_ref(&field.ty));
        if let Some(marker) = &field.marker {
            field_decl = field_decl.replicated(replicated_marker(marker));
            if marker.init.is_some() {
                field_decl = field_decl.with_initializer();
            }
        }
        decl = decl.field(field_decl);
    }

    for (ident, ty, marker) in consts {
        decl = decl.field(
            FieldDecl::new(&ident.to_string(), type_ref(ty))
                .replicated(replicated_marker(marker))
                .as_static(),
        );
    }

    for item in impls.iter().filter(|item| item.trait_.is_none()) {
        for impl_item in &item.items {
            if let ImplItem::Fn(method) = impl_item {
                decl = decl.method(method_decl(&method.sig));
            }
        }
    }

    decl
}

fn replicated_marker(marker: &MarkerArgs) -> ReplicatedMarker {
    ReplicatedMarker {
        hook: marker.hook.as_ref().map(LitStr::value),
    }
}

fn method_decl(sig: &syn::Signature) -> MethodDecl {
    let receiver = match sig.receiver() {
        None => Receiver::None,
        Some(receiver) => match &*receiver.ty {
            Type::Reference(reference) if reference.mutability.is_some() => Receiver::RefMut,
            Type::Reference(_) => Receiver::Ref,
            _ => Receiver::Value,
        },
    };
    let params = sig
        .inputs
        .iter()
        .filter_map(|input| match input {
            FnArg::Typed(typed) => Some(type_ref(&typed.ty)),
            FnArg::Receiver(_) => None,
        })
        .collect();
    MethodDecl::new(&sig.ident.to_string(), receiver, params)
}

fn type_ref(ty: &Type) -> TypeRef {
    match ty {
        Type::Reference(reference) if reference.mutability.is_none() => TypeRef::new(
            &reference.elem.to_token_stream().to_string(),
            shape_of(&reference.elem),
            true,
        ),
        _ => TypeRef::new(&ty.to_token_stream().to_string(), shape_of(ty), false),
    }
}

pub fn shape_of(ty: &Type) -> TypeShape {
    match ty {
        Type::Array(_) | Type::Slice(_) => TypeShape::Array,
        Type::Group(group) => shape_of(&group.elem),
        Type::Paren(paren) => shape_of(&paren.elem),
        Type::Path(path) => match path.path.segments.last() {
            Some(segment) if COLLECTION_TYPES.iter().any(|name| segment.ident == name) => {
                TypeShape::Collection
            }
            _ => TypeShape::Plain,
        },
        _ => TypeShape::Plain,
    }
}

fn take_struct_marker(attrs: &mut Vec<Attribute>) -> Result<Option<Expr>> {
    let mut sync_interval = None;
    let mut kept = Vec::with_capacity(attrs.len());
    for attr in attrs.drain(..) {
        if !attr.path().is_ident(STRUCT_MARKER) {
            kept.push(attr);
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("sync_interval") {
                sync_interval = Some(meta.value()?.parse::<Expr>()?);
                Ok(())
            } else {
                Err(meta.error("unsupported #[replicate] argument, expected `sync_interval`"))
            }
        })?;
    }
    *attrs = kept;
    Ok(sync_interval)
}

fn take_field_marker(attrs: &mut Vec<Attribute>) -> Result<Option<MarkerArgs>> {
    let mut marker = None;
    let mut kept = Vec::with_capacity(attrs.len());
    for attr in attrs.drain(..) {
        if !attr.path().is_ident(FIELD_MARKER) {
            kept.push(attr);
            continue;
        }
        let mut args = MarkerArgs::default();
        match &attr.meta {
            Meta::Path(_) => {}
            Meta::List(_) => {
                attr.parse_nested_meta(|meta| {
                    if meta.path.is_ident("hook") {
                        args.hook = Some(meta.value()?.parse::<LitStr>()?);
                        Ok(())
                    } else if meta.path.is_ident("init") {
                        args.init = Some(meta.value()?.parse::<Expr>()?);
                        Ok(())
                    } else {
                        Err(meta.error(
                            "unsupported #[replicated] argument, expected `hook` or `init`",
                        ))
                    }
                })?;
            }
            Meta::NameValue(_) => {
                return Err(syn::Error::new_spanned(
                    &attr,
                    "expected #[replicated] or #[replicated(hook = \"..\", init = ..)]",
                ));
            }
        }
        marker = Some(args);
    }
    *attrs = kept;
    Ok(marker)
}
