use crate::{
    decl::{FieldDecl, MethodDecl, Receiver, TypeDecl},
    diagnostics::WeaveError,
};

/// Whether a resolved hook needs its owner as receiver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HookKind {
    Static,
    Instance { mutable: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedHook {
    pub method: String,
    pub kind: HookKind,
}

/// The signature a hook for `field` must have, for error messages
pub fn hook_signature_message(hook: &str, field: &FieldDecl) -> String {
    format!(
        "fn {}(old_value: &{}, new_value: &{})",
        hook, field.ty.text, field.ty.text
    )
}

/// Finds the hook method named by the field's marker, if there is one.
///
/// Only methods with exactly two non-receiver parameters are candidates;
/// the first candidate taking `&T` twice wins. Methods taking `self` by
/// value would consume the owner and never match.
pub(crate) fn resolve_hook(
    owner: &TypeDecl,
    field: &FieldDecl,
) -> Result<Option<ResolvedHook>, WeaveError> {
    let Some(hook) = field.marker.as_ref().and_then(|marker| marker.hook.as_ref()) else {
        return Ok(None);
    };

    let candidates: Vec<&MethodDecl> = owner
        .methods_named(hook)
        .filter(|method| method.params.len() == 2)
        .collect();

    if candidates.is_empty() {
        return Err(WeaveError::HookNotFound {
            type_name: owner.name.clone(),
            field: field.name.clone(),
            hook: hook.clone(),
            expected: hook_signature_message(hook, field),
        });
    }

    for method in candidates {
        if let Some(kind) = matches_parameters(field, method) {
            return Ok(Some(ResolvedHook {
                method: method.name.clone(),
                kind,
            }));
        }
    }

    Err(WeaveError::HookSignatureMismatch {
        type_name: owner.name.clone(),
        field: field.name.clone(),
        hook: hook.clone(),
        expected: hook_signature_message(hook, field),
    })
}

// matches fn hook(old_value: &T, new_value: &T)
fn matches_parameters(field: &FieldDecl, method: &MethodDecl) -> Option<HookKind> {
    let params_match = method.params.iter().all(|param| param.is_ref_to(&field.ty));
    if !params_match {
        return None;
    }
    match method.receiver {
        Receiver::None => Some(HookKind::Static),
        Receiver::Ref => Some(HookKind::Instance { mutable: false }),
        Receiver::RefMut => Some(HookKind::Instance { mutable: true }),
        Receiver::Value => None,
    }
}
