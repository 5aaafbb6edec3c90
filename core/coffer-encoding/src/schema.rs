//! Record schemas.
//!
//! Encoding is driven by an explicit per-type descriptor instead of
//! runtime reflection: an ordered list of fields, each carrying the tag
//! options that select its transforms, plus an optional child schema for
//! nested records. Types declare their schema through [`Describe`].

use crate::tags;

/// One field of a record schema.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Field {
    pub name: String,
    pub secure: bool,
    /// Hash transform name, e.g. `"sha256"`.
    pub hash: Option<String>,
    pub omit_empty: bool,
    /// The field is omitted from the encoding.
    pub skip: bool,
    /// Schema applied to the field's value (or each element, for
    /// sequences of records) when the field itself is not secure.
    pub nested: Option<Schema>,
}

impl Field {
    /// Builds a field from a tag string, `"<name>,<option>,…"`.
    pub fn from_tag(tag: &str) -> Self {
        let (name, opts) = tags::parse_tag(tag);
        if tags::ignore_field(name) {
            return Self {
                name: name.to_string(),
                skip: true,
                ..Self::default()
            };
        }
        Self {
            name: name.to_string(),
            secure: tags::is_secure(&opts),
            hash: tags::hash_name(&opts).map(str::to_string),
            omit_empty: tags::is_omit_empty(&opts),
            skip: false,
            nested: None,
        }
    }

    pub fn with_nested(mut self, schema: Schema) -> Self {
        self.nested = Some(schema);
        self
    }
}

/// An ordered field descriptor for one record type.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Schema {
    fields: Vec<Field>,
}

impl Schema {
    /// A schema with no tagged fields; records encode untransformed.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    /// True if any field (at any depth) carries the secure option.
    pub fn has_secure_fields(&self) -> bool {
        self.fields.iter().any(|f| {
            f.secure
                || f.nested
                    .as_ref()
                    .is_some_and(Schema::has_secure_fields)
        })
    }
}

/// Builds a [`Schema`] from tag strings.
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    fields: Vec<Field>,
}

impl SchemaBuilder {
    /// Adds a field from its tag string, e.g. `"password,secure,hash"`.
    pub fn field(mut self, tag: &str) -> Self {
        self.fields.push(Field::from_tag(tag));
        self
    }

    /// Adds a field whose value (or elements) follow a child schema.
    pub fn nested(mut self, tag: &str, schema: Schema) -> Self {
        self.fields.push(Field::from_tag(tag).with_nested(schema));
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            fields: self.fields,
        }
    }
}

/// Declares the schema of a record type.
///
/// The default is the empty schema, which encodes the value without any
/// field transforms. Types with `secure` or `hash` fields override
/// [`Describe::schema`].
pub trait Describe {
    fn schema() -> Schema {
        Schema::empty()
    }
}

impl Describe for String {}
impl Describe for bool {}
impl Describe for i8 {}
impl Describe for i16 {}
impl Describe for i32 {}
impl Describe for i64 {}
impl Describe for u8 {}
impl Describe for u16 {}
impl Describe for u32 {}
impl Describe for u64 {}
impl Describe for f32 {}
impl Describe for f64 {}
impl Describe for serde_json::Value {}

impl<T: Describe> Describe for Vec<T> {}
impl<T: Describe> Describe for Option<T> {}
impl<T: Describe> Describe for std::collections::HashMap<String, T> {}
impl<T: Describe> Describe for std::collections::BTreeMap<String, T> {}
