/// Shape of a declared type, as far as replication cares
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeShape {
    /// Any fixed-size or otherwise serializable value type
    Plain,
    /// `[T; N]` or `[T]`
    Array,
    /// A self-tracking replicated collection such as `ReplicatedList<T>`
    Collection,
}

/// A type as written in source, normalized to whitespace-free text
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeRef {
    pub text: String,
    pub shape: TypeShape,
    pub by_ref: bool,
}

impl TypeRef {
    pub fn plain(text: &str) -> Self {
        Self::new(text, TypeShape::Plain, false)
    }

    pub fn reference(text: &str) -> Self {
        Self::new(text, TypeShape::Plain, true)
    }

    pub fn array(text: &str) -> Self {
        Self::new(text, TypeShape::Array, false)
    }

    pub fn collection(text: &str) -> Self {
        Self::new(text, TypeShape::Collection, false)
    }

    pub fn new(text: &str, shape: TypeShape, by_ref: bool) -> Self {
        Self {
            text: normalize(text),
            shape,
            by_ref,
        }
    }

    /// Whether this is exactly `&inner`
    pub fn is_ref_to(&self, inner: &TypeRef) -> bool {
        self.by_ref && !inner.by_ref && self.text == inner.text
    }
}

impl std::fmt::Display for TypeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.by_ref {
            write!(f, "&{}", self.text)
        } else {
            write!(f, "{}", self.text)
        }
    }
}

fn normalize(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Attribute payload of a `#[replicated]` marker
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReplicatedMarker {
    pub hook: Option<String>,
}

impl ReplicatedMarker {
    pub fn with_hook(hook: &str) -> Self {
        Self {
            hook: Some(hook.to_string()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDecl {
    pub name: String,
    pub ty: TypeRef,
    pub marker: Option<ReplicatedMarker>,
    /// Associated items (consts, statics) are never per-instance state
    pub is_static: bool,
    pub has_initializer: bool,
}

impl FieldDecl {
    pub fn new(name: &str, ty: TypeRef) -> Self {
        Self {
            name: name.to_string(),
            ty,
            marker: None,
            is_static: false,
            has_initializer: false,
        }
    }

    pub fn replicated(mut self, marker: ReplicatedMarker) -> Self {
        self.marker = Some(marker);
        self
    }

    pub fn as_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    pub fn with_initializer(mut self) -> Self {
        self.has_initializer = true;
        self
    }

    pub fn is_marked(&self) -> bool {
        self.marker.is_some()
    }
}

/// How a method receives its owner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Receiver {
    None,
    Ref,
    RefMut,
    Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDecl {
    pub name: String,
    pub receiver: Receiver,
    /// Parameters after the receiver
    pub params: Vec<TypeRef>,
}

impl MethodDecl {
    pub fn new(name: &str, receiver: Receiver, params: Vec<TypeRef>) -> Self {
        Self {
            name: name.to_string(),
            receiver,
            params,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDecl {
    pub name: String,
    /// Instance fields and associated items, in declaration order
    pub fields: Vec<FieldDecl>,
    pub methods: Vec<MethodDecl>,
}

impl TypeDecl {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }

    pub fn methods_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a MethodDecl> + 'a {
        self.methods.iter().filter(move |method| method.name == name)
    }
}
