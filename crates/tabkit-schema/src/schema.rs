//! Fields, order declarations and the [`Schema`] container.

use std::fmt;

use indexmap::IndexMap;
use tabkit_ast::Type;
use tracing::debug;

use crate::error::{SchemaError, SchemaResult};

/// A named, typed column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Field {
    /// Column name, unique within a schema.
    pub name: String,
    /// Value type of the column.
    pub ty: Type,
}

impl Field {
    /// Create a field.
    pub fn new(name: impl Into<String>, ty: Type) -> Self {
        Self {
            name: name.into(),
            ty,
        }
    }
}

/// How values of an order field compare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderKind {
    /// Byte-wise string comparison (`str`).
    #[default]
    Lexicographic,
    /// Numeric comparison (`num`).
    Numeric,
    /// General numeric comparison, accepting floats in any notation (`generic`).
    Generic,
}

impl OrderKind {
    /// Name used in the `ORDER:` header section.
    pub fn name(self) -> &'static str {
        match self {
            OrderKind::Lexicographic => "str",
            OrderKind::Numeric => "num",
            OrderKind::Generic => "generic",
        }
    }

    /// Inverse of [`OrderKind::name`].
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "str" => Some(OrderKind::Lexicographic),
            "num" => Some(OrderKind::Numeric),
            "generic" => Some(OrderKind::Generic),
            _ => None,
        }
    }
}

/// One key of the sort order a stream's producer asserts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderField {
    /// Name of a field in the owning schema.
    pub name: String,
    /// Comparison used for this key.
    pub kind: OrderKind,
    /// Whether the key is sorted descending.
    pub descending: bool,
}

impl OrderField {
    /// Ascending lexicographic key on `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: OrderKind::Lexicographic,
            descending: false,
        }
    }

    /// Builder: set the comparison kind.
    pub fn with_kind(mut self, kind: OrderKind) -> Self {
        self.kind = kind;
        self
    }

    /// Builder: mark the key descending.
    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    /// Same key under a different field name.
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: self.kind,
            descending: self.descending,
        }
    }
}

impl fmt::Display for OrderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if self.kind != OrderKind::Lexicographic {
            write!(f, ":{}", self.kind.name())?;
        }
        if self.descending {
            f.write_str(":desc")?;
        }
        Ok(())
    }
}

/// Ordered column list plus the asserted sort order of a stream.
///
/// The order is a contract the producer claims, not something the schema
/// checks against data. Every order entry names an existing field and field
/// names are unique; both are checked on construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schema {
    fields: IndexMap<String, Field>,
    order: Vec<OrderField>,
}

impl Schema {
    /// Build a schema, validating field uniqueness and order references.
    pub fn new(fields: Vec<Field>, order: Vec<OrderField>) -> SchemaResult<Self> {
        let mut by_name = IndexMap::with_capacity(fields.len());
        for field in fields {
            if by_name.contains_key(&field.name) {
                return Err(SchemaError::DuplicateField(field.name));
            }
            by_name.insert(field.name.clone(), field);
        }

        for key in &order {
            if !by_name.contains_key(&key.name) {
                return Err(SchemaError::UnknownOrderField(key.name.clone()));
            }
        }

        Ok(Self {
            fields: by_name,
            order,
        })
    }

    /// Build an unordered schema from `(name, type)` pairs.
    pub fn from_pairs<I, S>(pairs: I) -> SchemaResult<Self>
    where
        I: IntoIterator<Item = (S, Type)>,
        S: Into<String>,
    {
        let fields = pairs
            .into_iter()
            .map(|(name, ty)| Field::new(name, ty))
            .collect();
        Self::new(fields, Vec::new())
    }

    /// Fields in column order.
    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.fields.values()
    }

    /// Field names in column order.
    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Asserted sort order, most significant key first.
    pub fn order(&self) -> &[OrderField] {
        &self.order
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Whether the schema has no columns.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether a column named `name` exists.
    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Zero-based column index of `name`.
    pub fn index(&self, name: &str) -> SchemaResult<usize> {
        self.fields
            .get_index_of(name)
            .ok_or_else(|| SchemaError::NoSuchField(name.to_string()))
    }

    /// Field named `name`.
    pub fn field(&self, name: &str) -> SchemaResult<&Field> {
        self.fields
            .get(name)
            .ok_or_else(|| SchemaError::NoSuchField(name.to_string()))
    }

    /// Field at zero-based column `index`.
    pub fn field_at(&self, index: usize) -> Option<&Field> {
        self.fields.get_index(index).map(|(_, field)| field)
    }

    /// Horizontal concatenation: fields and order lists are appended.
    pub fn concat(&self, other: &Schema) -> SchemaResult<Schema> {
        let fields = self.fields().chain(other.fields()).cloned().collect();
        let order = self.order.iter().chain(&other.order).cloned().collect();
        Schema::new(fields, order)
    }

    /// Positional widening reconciliation, for streams that are unioned.
    ///
    /// The order is dropped: interleaving two sorted streams yields an
    /// unsorted one.
    pub fn generic(&self, other: &Schema) -> SchemaResult<Schema> {
        let fields = self.reconcile(other, Type::wider)?;
        Schema::new(fields, Vec::new())
    }

    /// Positional narrowing reconciliation, for inner-join matches.
    ///
    /// Keeps `self`'s order: a join emits matches in the order of its left
    /// input.
    pub fn narrowest(&self, other: &Schema) -> SchemaResult<Schema> {
        let fields = self.reconcile(other, Type::narrower)?;
        Schema::new(fields, self.order.clone())
    }

    /// Fold [`Schema::generic`] over several inputs.
    ///
    /// A single input is returned unchanged, order included.
    pub fn generic_all<'a, I>(schemas: I) -> SchemaResult<Schema>
    where
        I: IntoIterator<Item = &'a Schema>,
    {
        let mut schemas = schemas.into_iter();
        let Some(first) = schemas.next() else {
            return Err(SchemaError::Incompatible("no inputs".to_string()));
        };

        let mut combined = first.clone();
        let mut count = 1;
        for schema in schemas {
            combined = combined.generic(schema)?;
            count += 1;
        }
        if count > 1 && !first.order.is_empty() {
            debug!(inputs = count, "dropping sort order of concatenated inputs");
        }
        Ok(combined)
    }

    /// Keep only `names`, in schema column order (cut).
    ///
    /// The order survives up to the first key whose field was dropped.
    pub fn project<S: AsRef<str>>(&self, names: &[S]) -> SchemaResult<Schema> {
        for name in names {
            self.index(name.as_ref())?;
        }
        let keep = |field: &str| names.iter().any(|name| name.as_ref() == field);
        self.retain(keep)
    }

    /// Drop `names`, keeping the remaining columns in order.
    pub fn remove<S: AsRef<str>>(&self, names: &[S]) -> SchemaResult<Schema> {
        for name in names {
            self.index(name.as_ref())?;
        }
        let keep = |field: &str| !names.iter().any(|name| name.as_ref() == field);
        self.retain(keep)
    }

    /// Same fields with a new asserted order (sort).
    pub fn with_order(&self, order: Vec<OrderField>) -> SchemaResult<Schema> {
        Schema::new(self.fields().cloned().collect(), order)
    }

    /// Whether the stream is known to be sorted by `names`, i.e. `names`
    /// is a prefix of the declared order.
    pub fn is_ordered_by<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names.len() <= self.order.len()
            && names
                .iter()
                .zip(&self.order)
                .all(|(name, key)| name.as_ref() == key.name)
    }

    fn retain(&self, keep: impl Fn(&str) -> bool) -> SchemaResult<Schema> {
        let fields = self.fields().filter(|f| keep(f.name.as_str())).cloned().collect();
        let order = self
            .order
            .iter()
            .take_while(|key| keep(key.name.as_str()))
            .cloned()
            .collect();
        Schema::new(fields, order)
    }

    fn reconcile(&self, other: &Schema, combine: fn(Type, Type) -> Type) -> SchemaResult<Vec<Field>> {
        if self.len() != other.len() {
            return Err(SchemaError::Incompatible(format!(
                "{} fields vs {} fields",
                self.len(),
                other.len()
            )));
        }

        self.fields()
            .zip(other.fields())
            .map(|(left, right)| {
                if left.name != right.name {
                    return Err(SchemaError::Incompatible(format!(
                        "field '{}' vs '{}'",
                        left.name, right.name
                    )));
                }
                Ok(Field::new(left.name.clone(), combine(left.ty, right.ty)))
            })
            .collect()
    }
}
