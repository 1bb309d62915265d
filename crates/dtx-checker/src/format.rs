//! Type-to-source-text rendering.
//!
//! Converts a `TypeId` back into declaration syntax for interpolation into
//! the generated file. Rendering is total and never truncated: a union of
//! twenty literals prints all twenty, with no elision markers.

use crate::types::{FunctionShape, ObjectShape, TypeData, TypeId, TypeInterner};
use dtx_common::interner::{Atom, Interner};

/// Prints interned types as declaration syntax.
pub struct TypeFormatter<'a> {
    types: &'a TypeInterner,
    strings: &'a Interner,
}

impl<'a> TypeFormatter<'a> {
    #[must_use]
    pub fn new(types: &'a TypeInterner, strings: &'a Interner) -> Self {
        Self { types, strings }
    }

    /// Convert a `TypeId` to source-level text.
    #[must_use]
    pub fn format(&self, type_id: TypeId) -> String {
        match self.types.lookup(type_id) {
            TypeData::Intrinsic(kind) => kind.text().to_string(),
            TypeData::StringLiteral(atom) => self.format_string_literal(*atom),
            TypeData::NumberLiteral(atom) => self.resolve(*atom).to_string(),
            TypeData::BooleanLiteral(value) => value.to_string(),
            TypeData::Union(list) => {
                let parts: Vec<String> = self
                    .types
                    .type_list(*list)
                    .iter()
                    .map(|&member| self.format_union_member(member))
                    .collect();
                parts.join(" | ")
            }
            TypeData::Intersection(list) => {
                let parts: Vec<String> = self
                    .types
                    .type_list(*list)
                    .iter()
                    .map(|&member| self.format_intersection_member(member))
                    .collect();
                parts.join(" & ")
            }
            TypeData::Array(elem) => {
                format!("{}[]", self.format_element(*elem))
            }
            TypeData::Readonly(inner) => format!("readonly {}", self.format(*inner)),
            TypeData::Tuple(list) => {
                let parts: Vec<String> = self
                    .types
                    .type_list(*list)
                    .iter()
                    .map(|&member| self.format(member))
                    .collect();
                format!("[{}]", parts.join(", "))
            }
            TypeData::Rest(inner) => format!("...{}", self.format_element(*inner)),
            TypeData::Object(shape_id) => self.format_object(self.types.object_shape(*shape_id)),
            TypeData::Function(shape_id) => {
                self.format_function(self.types.function_shape(*shape_id))
            }
            TypeData::Reference { name, args } => {
                let name = self.resolve(*name);
                let arg_list = self.types.type_list(*args);
                if arg_list.is_empty() {
                    name.to_string()
                } else {
                    let parts: Vec<String> =
                        arg_list.iter().map(|&arg| self.format(arg)).collect();
                    format!("{}<{}>", name, parts.join(", "))
                }
            }
            TypeData::Opaque(atom) => self.resolve(*atom).to_string(),
        }
    }

    fn resolve(&self, atom: Atom) -> &str {
        self.strings.resolve(atom)
    }

    fn format_string_literal(&self, atom: Atom) -> String {
        let value = self.resolve(atom);
        let mut out = String::with_capacity(value.len() + 2);
        out.push('\'');
        for ch in value.chars() {
            match ch {
                '\'' => out.push_str("\\'"),
                '\\' => out.push_str("\\\\"),
                '\n' => out.push_str("\\n"),
                _ => out.push(ch),
            }
        }
        out.push('\'');
        out
    }

    /// Function types bind looser than `|`; parenthesize them inside unions.
    fn format_union_member(&self, member: TypeId) -> String {
        match self.types.lookup(member) {
            TypeData::Function(_) => format!("({})", self.format(member)),
            _ => self.format(member),
        }
    }

    fn format_intersection_member(&self, member: TypeId) -> String {
        match self.types.lookup(member) {
            TypeData::Function(_) | TypeData::Union(_) => format!("({})", self.format(member)),
            _ => self.format(member),
        }
    }

    /// Array element position binds tighter than unions and functions.
    fn format_element(&self, elem: TypeId) -> String {
        match self.types.lookup(elem) {
            TypeData::Union(_) | TypeData::Intersection(_) | TypeData::Function(_) => {
                format!("({})", self.format(elem))
            }
            _ => self.format(elem),
        }
    }

    fn format_object(&self, shape: &ObjectShape) -> String {
        let mut members = Vec::new();
        for property in &shape.properties {
            let mut member = String::new();
            if property.readonly {
                member.push_str("readonly ");
            }
            member.push_str(&self.format_property_name(property.name));
            if property.optional {
                member.push('?');
            }
            member.push_str(": ");
            member.push_str(&self.format(property.type_id));
            members.push(member);
        }
        if let Some(index) = &shape.index {
            members.push(format!(
                "[key: {}]: {}",
                self.format(index.key),
                self.format(index.value)
            ));
        }
        if members.is_empty() {
            return "{}".to_string();
        }
        format!("{{ {} }}", members.join("; "))
    }

    fn format_property_name(&self, atom: Atom) -> String {
        let name = self.resolve(atom);
        if is_valid_identifier(name) {
            name.to_string()
        } else {
            format!("'{name}'")
        }
    }

    fn format_function(&self, shape: &FunctionShape) -> String {
        let mut params = Vec::new();
        for param in &shape.params {
            let mut text = String::new();
            if param.rest {
                text.push_str("...");
            }
            if let Some(name) = param.name {
                text.push_str(self.resolve(name));
                if param.optional {
                    text.push('?');
                }
                text.push_str(": ");
            }
            text.push_str(&self.format(param.type_id));
            params.push(text);
        }
        let prefix = if shape.is_constructor { "new " } else { "" };
        format!(
            "{}({}) => {}",
            prefix,
            params.join(", "),
            self.format(shape.return_type)
        )
    }
}

fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' || first == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ParamInfo, PropertyInfo};

    fn setup() -> (TypeInterner, Interner) {
        (TypeInterner::new(), Interner::new())
    }

    #[test]
    fn formats_intrinsics() {
        let (types, strings) = setup();
        let formatter = TypeFormatter::new(&types, &strings);
        assert_eq!(formatter.format(TypeId::STRING), "string");
        assert_eq!(formatter.format(TypeId::BOOLEAN), "boolean");
        assert_eq!(formatter.format(TypeId::UNDEFINED), "undefined");
    }

    #[test]
    fn formats_wide_union_without_truncation() {
        let (mut types, mut strings) = setup();
        let members: Vec<TypeId> = (0..20)
            .map(|i| {
                let atom = strings.intern(&format!("member-{i}"));
                types.intern(TypeData::StringLiteral(atom))
            })
            .collect();
        let union = types.union(members);
        let formatter = TypeFormatter::new(&types, &strings);
        let text = formatter.format(union);
        assert!(!text.contains("..."));
        assert_eq!(text.matches(" | ").count(), 19);
        assert!(text.starts_with("'member-0'"));
        assert!(text.ends_with("'member-19'"));
    }

    #[test]
    fn escapes_string_literals() {
        let (mut types, mut strings) = setup();
        let atom = strings.intern("it's");
        let id = types.intern(TypeData::StringLiteral(atom));
        let formatter = TypeFormatter::new(&types, &strings);
        assert_eq!(formatter.format(id), "'it\\'s'");
    }

    #[test]
    fn parenthesizes_union_array_elements() {
        let (mut types, _strings) = setup();
        let union = types.union(vec![TypeId::STRING, TypeId::NUMBER]);
        let array = types.intern(TypeData::Array(union));
        let strings = Interner::new();
        let formatter = TypeFormatter::new(&types, &strings);
        assert_eq!(formatter.format(array), "(string | number)[]");
    }

    #[test]
    fn formats_object_and_function_shapes() {
        let (mut types, mut strings) = setup();
        let name = strings.intern("value");
        let shape = ObjectShape {
            properties: vec![PropertyInfo {
                name,
                optional: true,
                readonly: false,
                type_id: TypeId::UNKNOWN,
            }],
            index: None,
        };
        let shape_id = types.add_object_shape(shape);
        let object = types.intern(TypeData::Object(shape_id));

        let param = strings.intern("input");
        let func_id = types.add_function_shape(FunctionShape {
            params: vec![ParamInfo {
                name: Some(param),
                optional: false,
                rest: false,
                type_id: object,
            }],
            return_type: TypeId::VOID,
            is_constructor: false,
        });
        let func = types.intern(TypeData::Function(func_id));

        let formatter = TypeFormatter::new(&types, &strings);
        assert_eq!(
            formatter.format(func),
            "(input: { value?: unknown }) => void"
        );
    }

    #[test]
    fn quotes_non_identifier_property_names() {
        let (mut types, mut strings) = setup();
        let name = strings.intern("data-value");
        let shape_id = types.add_object_shape(ObjectShape {
            properties: vec![PropertyInfo {
                name,
                optional: false,
                readonly: false,
                type_id: TypeId::STRING,
            }],
            index: None,
        });
        let object = types.intern(TypeData::Object(shape_id));
        let formatter = TypeFormatter::new(&types, &strings);
        assert_eq!(formatter.format(object), "{ 'data-value': string }");
    }
}
