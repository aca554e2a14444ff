use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;

/// Routine name used for constructors
pub const CONSTRUCTOR_NAME: &str = "<init>";

/// Routine name used for static initializer blocks
pub const STATIC_INITIALIZER_NAME: &str = "<clinit>";

/// Dotted identifier tokens inside a rendered type signature
static TYPE_NAME_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[A-Za-z_$][A-Za-z0-9_$]*(?:\.[A-Za-z_$][A-Za-z0-9_$]*)*")
        .expect("type name token pattern is valid")
});

/// Tokens that can appear in a signature without naming a type
const NON_TYPE_TOKENS: &[&str] = &[
    "void", "boolean", "byte", "char", "short", "int", "long", "float", "double", "extends",
    "super",
];

/// Kind of a discovered type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    /// Regular class (including enums)
    Standard,

    /// Interface that classes implement
    Interface,

    /// Annotation-like marker type
    Tag,
}

/// Direct relation stored as an edge from carrier to target
///
/// Inverse relations (subclasses, implementing classes, tagged types, ...)
/// are the incoming side of the same edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RelationKind {
    /// Subclass -> superclass
    Extends,

    /// Class -> implemented interface
    Implements,

    /// Subinterface -> superinterface
    ExtendsInterface,

    /// Non-tag type -> tag
    TaggedBy,

    /// Tag -> meta-tag
    MetaTaggedBy,

    /// Type with a tagged attribute -> tag
    AttributeTaggedBy,

    /// Type with a tagged routine -> tag
    RoutineTaggedBy,

    /// Type -> type named in one of its attribute signatures
    AttributeTypeRef,

    /// Type -> type named in one of its routine signatures
    RoutineTypeRef,
}

/// Declaration modifier, ordered canonically for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
    Public,
    Protected,
    Private,
    Abstract,
    Static,
    Final,
    Transient,
    Volatile,
    Synchronized,
    Native,
    Strictfp,
    Default,
    Synthetic,
}

impl Modifier {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Protected => "protected",
            Self::Private => "private",
            Self::Abstract => "abstract",
            Self::Static => "static",
            Self::Final => "final",
            Self::Transient => "transient",
            Self::Volatile => "volatile",
            Self::Synchronized => "synchronized",
            Self::Native => "native",
            Self::Strictfp => "strictfp",
            Self::Default => "default",
            Self::Synthetic => "synthetic",
        }
    }
}

/// Render a modifier set in canonical order, space separated
pub fn modifiers_str(modifiers: &[Modifier]) -> String {
    modifiers
        .iter()
        .copied()
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(Modifier::keyword)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Rendered type signature, e.g. `java.util.List<com.acme.Item>[]`
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeRef(pub String);

impl TypeRef {
    pub fn new(signature: impl Into<String>) -> Self {
        Self(signature.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Names of all types mentioned in this signature (primitives and
    /// wildcard keywords excluded)
    pub fn referenced_type_names(&self) -> BTreeSet<String> {
        TYPE_NAME_TOKEN
            .find_iter(&self.0)
            .map(|m| m.as_str())
            .filter(|token| !NON_TYPE_TOKENS.contains(token))
            .map(str::to_string)
            .collect()
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeRef {
    fn from(signature: &str) -> Self {
        Self::new(signature)
    }
}

/// Named tag argument; the value is already rendered by the producer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagArgument {
    pub name: String,
    pub value: String,
}

/// One tag attached to a type, attribute, routine or parameter
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagUse {
    /// Fully qualified name of the tag type
    pub name: String,

    #[serde(default)]
    pub arguments: Vec<TagArgument>,
}

impl TagUse {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    /// Builder: add an argument
    #[must_use]
    pub fn arg(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.arguments.push(TagArgument {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

impl fmt::Display for TagUse {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "@{}", self.name)?;
        if !self.arguments.is_empty() {
            let args = self
                .arguments
                .iter()
                .map(|a| format!("{}={}", a.name, a.value))
                .collect::<Vec<_>>()
                .join(", ");
            write!(f, "({args})")?;
        }
        Ok(())
    }
}

/// Attribute (field) declared by a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeInfo {
    pub name: String,

    #[serde(rename = "type")]
    pub type_ref: TypeRef,

    #[serde(default)]
    pub tags: Vec<TagUse>,

    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl AttributeInfo {
    pub fn new(name: impl Into<String>, type_ref: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            type_ref: type_ref.into(),
            tags: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    /// Builder: attach a tag
    #[must_use]
    pub fn tag(mut self, tag: TagUse) -> Self {
        self.tags.push(tag);
        self
    }

    /// Builder: add a modifier
    #[must_use]
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }
}

/// Routine parameter
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterInfo {
    /// Absent when the producer had no parameter names
    #[serde(default)]
    pub name: Option<String>,

    #[serde(rename = "type")]
    pub type_ref: TypeRef,

    #[serde(default)]
    pub tags: Vec<TagUse>,
}

impl ParameterInfo {
    pub fn new(type_ref: impl Into<TypeRef>) -> Self {
        Self {
            name: None,
            type_ref: type_ref.into(),
            tags: Vec::new(),
        }
    }

    /// Builder: set the parameter name
    #[must_use]
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Builder: attach a tag
    #[must_use]
    pub fn tag(mut self, tag: TagUse) -> Self {
        self.tags.push(tag);
        self
    }
}

/// Routine (method, constructor, initializer) declared by a type
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutineInfo {
    pub name: String,

    #[serde(default)]
    pub parameters: Vec<ParameterInfo>,

    pub result_type: TypeRef,

    #[serde(default)]
    pub tags: Vec<TagUse>,

    #[serde(default)]
    pub modifiers: Vec<Modifier>,
}

impl RoutineInfo {
    pub fn new(name: impl Into<String>, result_type: impl Into<TypeRef>) -> Self {
        Self {
            name: name.into(),
            parameters: Vec::new(),
            result_type: result_type.into(),
            tags: Vec::new(),
            modifiers: Vec::new(),
        }
    }

    pub fn constructor() -> Self {
        Self::new(CONSTRUCTOR_NAME, "void")
    }

    /// Builder: append a parameter
    #[must_use]
    pub fn param(mut self, param: ParameterInfo) -> Self {
        self.parameters.push(param);
        self
    }

    /// Builder: attach a tag
    #[must_use]
    pub fn tag(mut self, tag: TagUse) -> Self {
        self.tags.push(tag);
        self
    }

    /// Builder: add a modifier
    #[must_use]
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn is_constructor(&self) -> bool {
        self.name == CONSTRUCTOR_NAME
    }

    pub fn is_static_initializer(&self) -> bool {
        self.name == STATIC_INITIALIZER_NAME
    }

    /// Types named by the result type and every parameter type
    pub fn referenced_type_names(&self) -> BTreeSet<String> {
        let mut names = self.result_type.referenced_type_names();
        for param in &self.parameters {
            names.extend(param.type_ref.referenced_type_names());
        }
        names
    }
}

/// One discovered type, as handed over by the scanner
///
/// Only direct, forward relations are carried here; the graph derives the
/// inverse and transitive structure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TypeRecord {
    /// Fully qualified name (primary key)
    pub name: String,

    pub kind: TypeKind,

    /// Referenced by the scan population but not part of it
    #[serde(default)]
    pub is_external: bool,

    /// Standard type declared as an enum
    #[serde(default)]
    pub is_enum: bool,

    #[serde(default)]
    pub modifiers: Vec<Modifier>,

    /// Direct superclass (standard types only)
    #[serde(default)]
    pub superclass: Option<String>,

    /// Directly implemented interfaces (standard types only)
    #[serde(default)]
    pub interfaces: Vec<String>,

    /// Direct superinterfaces (interfaces only)
    #[serde(default)]
    pub superinterfaces: Vec<String>,

    /// Direct tags; on a tag type these are its meta-tags
    #[serde(default)]
    pub tags: Vec<TagUse>,

    #[serde(default)]
    pub attributes: Vec<AttributeInfo>,

    #[serde(default)]
    pub routines: Vec<RoutineInfo>,

    /// Loader / archive identifiers that produced this type
    #[serde(default)]
    pub origins: Vec<String>,
}

impl TypeRecord {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            is_external: false,
            is_enum: false,
            modifiers: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            superinterfaces: Vec::new(),
            tags: Vec::new(),
            attributes: Vec::new(),
            routines: Vec::new(),
            origins: Vec::new(),
        }
    }

    pub fn standard(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Standard)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn tag_type(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Tag)
    }

    /// Builder: set the direct superclass
    #[must_use]
    pub fn extends(mut self, superclass: impl Into<String>) -> Self {
        self.superclass = Some(superclass.into());
        self
    }

    /// Builder: add a directly implemented interface
    #[must_use]
    pub fn implements(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Builder: add a direct superinterface
    #[must_use]
    pub fn extends_interface(mut self, interface: impl Into<String>) -> Self {
        self.superinterfaces.push(interface.into());
        self
    }

    /// Builder: attach a tag without arguments
    #[must_use]
    pub fn tagged(self, tag: impl Into<String>) -> Self {
        self.tag(TagUse::new(tag))
    }

    /// Builder: attach a tag
    #[must_use]
    pub fn tag(mut self, tag: TagUse) -> Self {
        self.tags.push(tag);
        self
    }

    /// Builder: mark as external
    #[must_use]
    pub fn external(mut self) -> Self {
        self.is_external = true;
        self
    }

    /// Builder: mark as enum
    #[must_use]
    pub fn enumeration(mut self) -> Self {
        self.is_enum = true;
        self
    }

    /// Builder: add a modifier
    #[must_use]
    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    /// Builder: add an attribute
    #[must_use]
    pub fn attribute(mut self, attribute: AttributeInfo) -> Self {
        self.attributes.push(attribute);
        self
    }

    /// Builder: add a routine
    #[must_use]
    pub fn routine(mut self, routine: RoutineInfo) -> Self {
        self.routines.push(routine);
        self
    }

    /// Builder: add an origin identifier
    #[must_use]
    pub fn origin(mut self, origin: impl Into<String>) -> Self {
        self.origins.push(origin.into());
        self
    }

    /// Package prefix including the trailing dot, if any
    pub fn package_name(&self) -> Option<&str> {
        match self.name.rfind('.') {
            Some(idx) if idx > 0 => Some(&self.name[..=idx]),
            _ => None,
        }
    }

    pub fn simple_name(&self) -> &str {
        self.name
            .rfind('.')
            .map_or(self.name.as_str(), |idx| &self.name[idx + 1..])
    }

    /// Types named anywhere in attribute signatures
    pub fn attribute_referenced_type_names(&self) -> BTreeSet<String> {
        self.attributes
            .iter()
            .flat_map(|a| a.type_ref.referenced_type_names())
            .collect()
    }

    /// Types named anywhere in routine signatures
    pub fn routine_referenced_type_names(&self) -> BTreeSet<String> {
        self.routines
            .iter()
            .flat_map(RoutineInfo::referenced_type_names)
            .collect()
    }

    pub fn has_attribute_tag(&self, tag_name: &str) -> bool {
        self.attributes
            .iter()
            .any(|a| a.tags.iter().any(|t| t.name == tag_name))
    }

    pub fn has_routine_tag(&self, tag_name: &str) -> bool {
        self.routines
            .iter()
            .any(|r| r.tags.iter().any(|t| t.name == tag_name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_referenced_type_names_skip_primitives() {
        let sig = TypeRef::new("java.util.Map<java.lang.String, ? extends com.acme.Item>[]");
        let names: Vec<_> = sig.referenced_type_names().into_iter().collect();
        assert_eq!(
            names,
            vec!["com.acme.Item", "java.lang.String", "java.util.Map"]
        );

        assert!(TypeRef::new("int[]").referenced_type_names().is_empty());
    }

    #[test]
    fn test_routine_signature_names() {
        let routine = RoutineInfo::new("find", "com.acme.Item")
            .param(ParameterInfo::new("long").named("id"))
            .param(ParameterInfo::new("com.acme.Query"));
        let names: Vec<_> = routine.referenced_type_names().into_iter().collect();
        assert_eq!(names, vec!["com.acme.Item", "com.acme.Query"]);
    }

    #[test]
    fn test_name_split() {
        let record = TypeRecord::standard("com.acme.Widget");
        assert_eq!(record.package_name(), Some("com.acme."));
        assert_eq!(record.simple_name(), "Widget");

        let bare = TypeRecord::standard("Widget");
        assert_eq!(bare.package_name(), None);
        assert_eq!(bare.simple_name(), "Widget");
    }

    #[test]
    fn test_tag_display() {
        assert_eq!(TagUse::new("Pet").to_string(), "@Pet");
        let tag = TagUse::new("a.Range").arg("min", "1").arg("max", "10");
        assert_eq!(tag.to_string(), "@a.Range(min=1, max=10)");
    }

    #[test]
    fn test_modifiers_are_canonically_ordered() {
        let mods = [Modifier::Final, Modifier::Static, Modifier::Public, Modifier::Final];
        assert_eq!(modifiers_str(&mods), "public static final");
        assert_eq!(modifiers_str(&[]), "");
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let json = r#"{"name":"a.B","kind":"interface","superinterfaces":["a.C"]}"#;
        let record: TypeRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.kind, TypeKind::Interface);
        assert_eq!(record.superinterfaces, vec!["a.C".to_string()]);
        assert!(!record.is_external);
        assert!(record.routines.is_empty());
    }
}
