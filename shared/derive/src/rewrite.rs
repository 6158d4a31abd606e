use proc_macro2::TokenStream;
use quote::quote;
use syn::{
    parse_quote, punctuated::Punctuated, spanned::Spanned, visit_mut::VisitMut, BinOp, Expr,
    ExprStruct, Ident, ItemImpl, Macro, Member, Token,
};

use crate::{
    plan::{MemberPlan, TypePlan},
    shared::{dirty_bits_ident, shared_crate},
};

/// Redirects field access inside impl bodies through the generated
/// accessors and wires struct literals to a fresh dirty tracker.
///
/// Only accesses through `self` are rewritten: other receivers of the
/// same type go through the accessors explicitly.
pub struct Rewriter<'a> {
    plans: &'a [TypePlan],
    current: Option<&'a TypePlan>,
    errors: Vec<syn::Error>,
}

impl<'a> Rewriter<'a> {
    pub fn new(plans: &'a [TypePlan]) -> Self {
        Self {
            plans,
            current: None,
            errors: Vec::new(),
        }
    }

    pub fn rewrite_impl(&mut self, item: &mut ItemImpl, target: Option<&str>) {
        self.current = target.and_then(|name| self.plans.iter().find(|plan| plan.ident == name));
        self.visit_item_impl_mut(item);
        self.current = None;
    }

    pub fn into_errors(self) -> Vec<syn::Error> {
        self.errors
    }

    fn self_scalar(&self, expr: &Expr) -> Option<(Ident, Ident)> {
        let plan = self.current?;
        let Expr::Field(field) = expr else {
            return None;
        };
        let Expr::Path(base) = &*field.base else {
            return None;
        };
        if !base.path.is_ident("self") {
            return None;
        }
        let Member::Named(name) = &field.member else {
            return None;
        };
        plan.scalar(name)
            .map(|scalar| (scalar.getter.clone(), scalar.setter.clone()))
    }

    fn literal_plan(&self, literal: &ExprStruct) -> Option<&'a TypePlan> {
        if literal.qself.is_some() {
            return None;
        }
        if literal.path.is_ident("Self") {
            return self.current;
        }
        let last = literal.path.segments.last()?;
        self.plans.iter().find(|plan| plan.ident == last.ident)
    }

    fn replacement(&mut self, expr: &mut Expr) -> Option<Expr> {
        if let Some((getter, _)) = self.self_scalar(expr) {
            return Some(parse_quote! { (*self.#getter()) });
        }
        match expr {
            Expr::Assign(assign) => {
                let (_, setter) = self.self_scalar(&assign.left)?;
                self.visit_expr_mut(&mut assign.right);
                let value = &assign.right;
                Some(parse_quote! { self.#setter(#value) })
            }
            Expr::Binary(binary) if is_compound_assign(&binary.op) => {
                let (getter, setter) = self.self_scalar(&binary.left)?;
                self.visit_expr_mut(&mut binary.right);
                let op = &binary.op;
                let value = &binary.right;
                Some(parse_quote! {
                    {
                        let mut __replica_value = ::core::clone::Clone::clone(self.#getter());
                        __replica_value #op #value;
                        self.#setter(__replica_value)
                    }
                })
            }
            Expr::Struct(literal) => {
                let plan = self.literal_plan(literal)?;
                syn::visit_mut::visit_expr_struct_mut(self, literal);
                match construct(plan, literal) {
                    Ok(tokens) => Some(parse_quote! { #tokens }),
                    Err(error) => {
                        self.errors.push(error);
                        None
                    }
                }
            }
            _ => None,
        }
    }
}

impl VisitMut for Rewriter<'_> {
    fn visit_expr_mut(&mut self, expr: &mut Expr) {
        if let Some(replacement) = self.replacement(expr) {
            *expr = replacement;
            return;
        }
        syn::visit_mut::visit_expr_mut(self, expr);
    }

    // format-style macros take comma separated expressions; anything else is left alone
    fn visit_macro_mut(&mut self, mac: &mut Macro) {
        let Ok(mut args) = mac.parse_body_with(Punctuated::<Expr, Token![,]>::parse_terminated)
        else {
            return;
        };
        for arg in args.iter_mut() {
            self.visit_expr_mut(arg);
        }
        mac.tokens = quote! { #args };
    }
}

fn is_compound_assign(op: &BinOp) -> bool {
    matches!(
        op,
        BinOp::AddAssign(_)
            | BinOp::SubAssign(_)
            | BinOp::MulAssign(_)
            | BinOp::DivAssign(_)
            | BinOp::RemAssign(_)
            | BinOp::BitXorAssign(_)
            | BinOp::BitAndAssign(_)
            | BinOp::BitOrAssign(_)
            | BinOp::ShlAssign(_)
            | BinOp::ShrAssign(_)
    )
}

/// Rewrites `Type { .. }` so replicated members are wrapped and bound to a
/// tracker created before any of them. Omitted replicated members take their
/// `init` expression or `Default::default()`.
fn construct(plan: &TypePlan, literal: &ExprStruct) -> syn::Result<TokenStream> {
    if let Some(rest) = &literal.rest {
        return Err(syn::Error::new(
            rest.span(),
            "struct update syntax cannot initialize a replicated type, list every field",
        ));
    }

    let shared = shared_crate();
    let dirty_bits = dirty_bits_ident();
    let owner = &plan.ident;
    let path = &literal.path;

    let mut fields = Vec::with_capacity(literal.fields.len() + 1);
    let mut given = Vec::new();
    for field_value in &literal.fields {
        let attrs = &field_value.attrs;
        let value = &field_value.expr;
        let Member::Named(name) = &field_value.member else {
            let member = &field_value.member;
            fields.push(quote! { #(#attrs)* #member: #value });
            continue;
        };
        given.push(name.clone());
        match plan.member(name) {
            Some(member) => fields.push(bind_member(member, owner, quote! { #value })),
            None => fields.push(quote! { #(#attrs)* #name: #value }),
        }
    }

    for member in plan.members.iter() {
        if given.contains(member.ident()) {
            continue;
        }
        let value = match member {
            MemberPlan::Scalar(scalar) => match &scalar.init {
                Some(init) => quote! { #init },
                None => quote! { ::core::default::Default::default() },
            },
            MemberPlan::Collection(_) => quote! { ::core::default::Default::default() },
        };
        fields.push(bind_member(member, owner, value));
    }
    fields.push(quote! { #dirty_bits });

    let dirty_bits_init = plan.dirty_bits_init();
    Ok(quote! {
        {
            let #dirty_bits: #shared::DirtyBits = #dirty_bits_init;
            #path { #(#fields),* }
        }
    })
}

fn bind_member(member: &MemberPlan, owner: &Ident, value: TokenStream) -> TokenStream {
    let shared = shared_crate();
    let dirty_bits = dirty_bits_ident();
    match member {
        MemberPlan::Scalar(scalar) => {
            let storage = &scalar.storage;
            let bit = scalar.bit;
            let hook = scalar.hook_init(owner);
            quote! {
                #storage: #shared::ReplicatedField::with_hook(#value, #hook)
                    .on_dirty(#dirty_bits.scalar_notifier(#shared::BitIndex::new(#bit)))
            }
        }
        MemberPlan::Collection(collection) => {
            let name = &collection.ident;
            let bit = collection.bit;
            quote! {
                #name: {
                    let mut collection = #value;
                    #shared::ReplicatedCollection::set_on_dirty(
                        &mut collection,
                        ::core::option::Option::Some(::std::boxed::Box::new(
                            #dirty_bits.collection_notifier(#shared::BitIndex::new(#bit)),
                        )),
                    );
                    collection
                }
            }
        }
    }
}
