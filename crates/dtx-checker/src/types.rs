//! Interned structural type representation.
//!
//! Types are stored once in a `TypeInterner` and referenced by `TypeId`, so
//! type equality is a `u32` comparison. The representation covers the
//! declaration subset the tool extracts from; everything else is carried as
//! an opaque reference that renders back to its source name.

use dtx_common::interner::Atom;
use rustc_hash::FxHashMap;

/// Handle to an interned type.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TypeListId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ObjectShapeId(pub u32);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FunctionShapeId(pub u32);

/// Built-in primitive and special types.
///
/// Variant order fixes the `TypeId` constants below: the interner seeds one
/// intrinsic per variant at construction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum IntrinsicKind {
    Any,
    Unknown,
    Never,
    Void,
    Undefined,
    Null,
    Boolean,
    Number,
    String,
    Object,
    Symbol,
    BigInt,
}

impl IntrinsicKind {
    pub const ALL: [IntrinsicKind; 12] = [
        IntrinsicKind::Any,
        IntrinsicKind::Unknown,
        IntrinsicKind::Never,
        IntrinsicKind::Void,
        IntrinsicKind::Undefined,
        IntrinsicKind::Null,
        IntrinsicKind::Boolean,
        IntrinsicKind::Number,
        IntrinsicKind::String,
        IntrinsicKind::Object,
        IntrinsicKind::Symbol,
        IntrinsicKind::BigInt,
    ];

    #[must_use]
    pub fn text(self) -> &'static str {
        match self {
            IntrinsicKind::Any => "any",
            IntrinsicKind::Unknown => "unknown",
            IntrinsicKind::Never => "never",
            IntrinsicKind::Void => "void",
            IntrinsicKind::Undefined => "undefined",
            IntrinsicKind::Null => "null",
            IntrinsicKind::Boolean => "boolean",
            IntrinsicKind::Number => "number",
            IntrinsicKind::String => "string",
            IntrinsicKind::Object => "object",
            IntrinsicKind::Symbol => "symbol",
            IntrinsicKind::BigInt => "bigint",
        }
    }
}

impl TypeId {
    pub const ANY: TypeId = TypeId(0);
    pub const UNKNOWN: TypeId = TypeId(1);
    pub const NEVER: TypeId = TypeId(2);
    pub const VOID: TypeId = TypeId(3);
    pub const UNDEFINED: TypeId = TypeId(4);
    pub const NULL: TypeId = TypeId(5);
    pub const BOOLEAN: TypeId = TypeId(6);
    pub const NUMBER: TypeId = TypeId(7);
    pub const STRING: TypeId = TypeId(8);
    pub const OBJECT: TypeId = TypeId(9);
    pub const SYMBOL: TypeId = TypeId(10);
    pub const BIGINT: TypeId = TypeId(11);

    #[must_use]
    pub const fn is_intrinsic(self) -> bool {
        self.0 < IntrinsicKind::ALL.len() as u32
    }
}

/// Structure of one interned type.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeData {
    Intrinsic(IntrinsicKind),
    /// Cooked string value.
    StringLiteral(Atom),
    /// Raw numeric source text, kept verbatim for rendering.
    NumberLiteral(Atom),
    BooleanLiteral(bool),
    Union(TypeListId),
    Intersection(TypeListId),
    Array(TypeId),
    /// `readonly T` operator applied to an array or tuple.
    Readonly(TypeId),
    Tuple(TypeListId),
    /// Rest element inside a tuple (`...T`).
    Rest(TypeId),
    Object(ObjectShapeId),
    Function(FunctionShapeId),
    /// Named reference left unexpanded: unresolved import, generic
    /// application, or a recursion-limited alias.
    Reference { name: Atom, args: TypeListId },
    /// Verbatim source text for constructs outside the subset.
    Opaque(Atom),
}

#[derive(Clone, Debug)]
pub struct PropertyInfo {
    pub name: Atom,
    pub optional: bool,
    pub readonly: bool,
    pub type_id: TypeId,
}

#[derive(Clone, Debug)]
pub struct IndexInfo {
    pub key: TypeId,
    pub value: TypeId,
}

#[derive(Clone, Debug, Default)]
pub struct ObjectShape {
    pub properties: Vec<PropertyInfo>,
    pub index: Option<IndexInfo>,
}

#[derive(Clone, Debug)]
pub struct ParamInfo {
    pub name: Option<Atom>,
    pub optional: bool,
    pub rest: bool,
    pub type_id: TypeId,
}

#[derive(Clone, Debug)]
pub struct FunctionShape {
    pub params: Vec<ParamInfo>,
    pub return_type: TypeId,
    pub is_constructor: bool,
}

/// Append-only type store with O(1) structural dedup.
#[derive(Debug)]
pub struct TypeInterner {
    types: Vec<TypeData>,
    dedup: FxHashMap<TypeData, TypeId>,
    type_lists: Vec<Vec<TypeId>>,
    list_dedup: FxHashMap<Vec<TypeId>, TypeListId>,
    object_shapes: Vec<ObjectShape>,
    function_shapes: Vec<FunctionShape>,
}

impl Default for TypeInterner {
    fn default() -> Self {
        Self::new()
    }
}

impl TypeInterner {
    #[must_use]
    pub fn new() -> Self {
        let mut interner = Self {
            types: Vec::new(),
            dedup: FxHashMap::default(),
            type_lists: Vec::new(),
            list_dedup: FxHashMap::default(),
            object_shapes: Vec::new(),
            function_shapes: Vec::new(),
        };
        for kind in IntrinsicKind::ALL {
            interner.intern(TypeData::Intrinsic(kind));
        }
        interner
    }

    pub fn intern(&mut self, data: TypeData) -> TypeId {
        if let Some(&id) = self.dedup.get(&data) {
            return id;
        }
        let id = TypeId(self.types.len() as u32);
        self.dedup.insert(data.clone(), id);
        self.types.push(data);
        id
    }

    #[must_use]
    pub fn lookup(&self, id: TypeId) -> &TypeData {
        &self.types[id.0 as usize]
    }

    pub fn intern_list(&mut self, list: Vec<TypeId>) -> TypeListId {
        if let Some(&id) = self.list_dedup.get(&list) {
            return id;
        }
        let id = TypeListId(self.type_lists.len() as u32);
        self.list_dedup.insert(list.clone(), id);
        self.type_lists.push(list);
        id
    }

    #[must_use]
    pub fn type_list(&self, id: TypeListId) -> &[TypeId] {
        &self.type_lists[id.0 as usize]
    }

    pub fn add_object_shape(&mut self, shape: ObjectShape) -> ObjectShapeId {
        let id = ObjectShapeId(self.object_shapes.len() as u32);
        self.object_shapes.push(shape);
        id
    }

    #[must_use]
    pub fn object_shape(&self, id: ObjectShapeId) -> &ObjectShape {
        &self.object_shapes[id.0 as usize]
    }

    pub fn add_function_shape(&mut self, shape: FunctionShape) -> FunctionShapeId {
        let id = FunctionShapeId(self.function_shapes.len() as u32);
        self.function_shapes.push(shape);
        id
    }

    #[must_use]
    pub fn function_shape(&self, id: FunctionShapeId) -> &FunctionShape {
        &self.function_shapes[id.0 as usize]
    }

    /// Build a union, preserving member order as written. Exact duplicates
    /// collapse; a single remaining member is returned unwrapped.
    pub fn union(&mut self, members: Vec<TypeId>) -> TypeId {
        let mut seen = Vec::with_capacity(members.len());
        for member in members {
            if !seen.contains(&member) {
                seen.push(member);
            }
        }
        match seen.len() {
            0 => TypeId::NEVER,
            1 => seen[0],
            _ => {
                let list = self.intern_list(seen);
                self.intern(TypeData::Union(list))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn intrinsics_are_seeded() {
        let interner = TypeInterner::new();
        assert!(matches!(
            interner.lookup(TypeId::STRING),
            TypeData::Intrinsic(IntrinsicKind::String)
        ));
        assert!(matches!(
            interner.lookup(TypeId::BOOLEAN),
            TypeData::Intrinsic(IntrinsicKind::Boolean)
        ));
        assert!(TypeId::STRING.is_intrinsic());
        assert!(!TypeId(100).is_intrinsic());
    }

    #[test]
    fn interning_dedups_structurally() {
        let mut interner = TypeInterner::new();
        let a = interner.intern(TypeData::BooleanLiteral(true));
        let b = interner.intern(TypeData::BooleanLiteral(true));
        assert_eq!(a, b);
    }

    #[test]
    fn union_preserves_order_and_collapses_duplicates() {
        let mut interner = TypeInterner::new();
        let union = interner.union(vec![TypeId::STRING, TypeId::NUMBER, TypeId::STRING]);
        let TypeData::Union(list) = interner.lookup(union) else {
            panic!("expected union");
        };
        assert_eq!(interner.type_list(*list), &[TypeId::STRING, TypeId::NUMBER]);

        let single = interner.union(vec![TypeId::STRING, TypeId::STRING]);
        assert_eq!(single, TypeId::STRING);
    }
}
