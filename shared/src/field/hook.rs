/// What runs after a replicated value changes.
///
/// `Instance` hooks carry no receiver. The owner passes itself in when it
/// dispatches, so a field never holds a reference back to the object that
/// owns it.
pub enum Hook<T, O = ()> {
    None,
    Static(fn(&T, &T)),
    Closure(Box<dyn FnMut(&T, &T) + Send>),
    Instance(fn(&mut O, &T, &T)),
}

impl<T, O> Hook<T, O> {
    pub fn closure<F: FnMut(&T, &T) + Send + 'static>(hook: F) -> Self {
        Hook::Closure(Box::new(hook))
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Hook::None)
    }

    /// Runs hooks that need no owner. Instance hooks are left to the owner.
    pub(crate) fn call_detached(&mut self, old_value: &T, new_value: &T) {
        match self {
            Hook::None | Hook::Instance(_) => {}
            Hook::Static(hook) => hook(old_value, new_value),
            Hook::Closure(hook) => hook(old_value, new_value),
        }
    }

    pub(crate) fn instance(&self) -> Option<fn(&mut O, &T, &T)> {
        match self {
            Hook::Instance(hook) => Some(*hook),
            _ => None,
        }
    }

    fn name(&self) -> &'static str {
        match self {
            Hook::None => "None",
            Hook::Static(_) => "Static",
            Hook::Closure(_) => "Closure",
            Hook::Instance(_) => "Instance",
        }
    }
}

impl<T, O> Default for Hook<T, O> {
    fn default() -> Self {
        Hook::None
    }
}

impl<T, O> std::fmt::Debug for Hook<T, O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Hook::{}", self.name())
    }
}
