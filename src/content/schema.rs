//! Collection schemas
//!
//! A schema lists the frontmatter fields a collection recognizes, their
//! types, and defaults for optional fields. Validation turns a raw YAML
//! mapping into [`EntryData`], coercing dates and filling defaults.

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, Utc};
use indexmap::IndexMap;
use serde_yaml::{Mapping, Value};
use std::fmt;
use thiserror::Error;

/// Image used when a post does not set one
pub const PLACEHOLDER_IMAGE: &str = "/static/blog-placeholder.png";

/// Type of a frontmatter field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Date,
    Boolean,
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldType::String => "string",
            FieldType::Date => "date",
            FieldType::Boolean => "boolean",
        };
        f.write_str(name)
    }
}

/// A validated field value
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    String(String),
    Date(DateTime<Utc>),
    Boolean(bool),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<DateTime<Utc>> {
        match self {
            FieldValue::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

/// Declaration of one field in a collection schema
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub ty: FieldType,
    pub required: bool,
    pub default: Option<FieldValue>,
}

impl FieldSpec {
    /// Required, non-empty string
    pub fn string() -> Self {
        Self::required(FieldType::String)
    }

    /// Required date, coerced from a date string or epoch milliseconds
    pub fn date() -> Self {
        Self::required(FieldType::Date)
    }

    /// Required boolean
    pub fn boolean() -> Self {
        Self::required(FieldType::Boolean)
    }

    fn required(ty: FieldType) -> Self {
        Self {
            ty,
            required: true,
            default: None,
        }
    }

    /// Make the field optional without a default
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Make the field optional, filling `value` when absent
    pub fn with_default(mut self, value: FieldValue) -> Self {
        self.required = false;
        self.default = Some(value);
        self
    }
}

/// What went wrong with a single field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationIssue {
    Missing,
    Empty,
    InvalidType {
        expected: FieldType,
        found: &'static str,
    },
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationIssue::Missing => f.write_str("required field is missing"),
            ValidationIssue::Empty => f.write_str("required field is empty"),
            ValidationIssue::InvalidType { expected, found } => {
                write!(f, "expected {}, found {}", expected, found)
            }
        }
    }
}

/// An entry's frontmatter does not satisfy its collection schema
#[derive(Debug, Clone, Error, PartialEq)]
#[error("{collection}/{entry}: field `{field}`: {issue}")]
pub struct SchemaValidationError {
    pub collection: String,
    pub entry: String,
    pub field: String,
    pub issue: ValidationIssue,
}

/// Validated frontmatter of one entry
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntryData {
    fields: IndexMap<String, FieldValue>,
}

impl EntryData {
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn title(&self) -> Option<&str> {
        self.get("title").and_then(FieldValue::as_str)
    }

    pub fn description(&self) -> Option<&str> {
        self.get("description").and_then(FieldValue::as_str)
    }

    pub fn date(&self) -> Option<DateTime<Utc>> {
        self.get("date").and_then(FieldValue::as_date)
    }

    /// Entries without a `draft` field are published
    pub fn draft(&self) -> bool {
        self.get("draft")
            .and_then(FieldValue::as_bool)
            .unwrap_or(false)
    }

    pub fn image(&self) -> Option<&str> {
        self.get("image").and_then(FieldValue::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

/// Schema of one named collection
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionSchema {
    name: String,
    fields: IndexMap<String, FieldSpec>,
}

impl CollectionSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Fields in declaration order
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Validate raw frontmatter of the entry `entry_id`.
    ///
    /// Fields are checked in declaration order and the first failure is
    /// returned. Keys the schema does not declare are dropped.
    pub fn validate(
        &self,
        entry_id: &str,
        frontmatter: &Mapping,
    ) -> Result<EntryData, SchemaValidationError> {
        let mut fields = IndexMap::with_capacity(self.fields.len());

        for (name, spec) in &self.fields {
            let fail = |issue| SchemaValidationError {
                collection: self.name.clone(),
                entry: entry_id.to_string(),
                field: name.clone(),
                issue,
            };

            let value = match frontmatter.get(name.as_str()) {
                None | Some(Value::Null) => {
                    if let Some(default) = &spec.default {
                        fields.insert(name.clone(), default.clone());
                        continue;
                    }
                    if spec.required {
                        return Err(fail(ValidationIssue::Missing));
                    }
                    continue;
                }
                Some(value) => value,
            };

            let coerced = coerce(value, spec.ty).ok_or_else(|| {
                fail(ValidationIssue::InvalidType {
                    expected: spec.ty,
                    found: yaml_kind(value),
                })
            })?;

            if spec.required {
                if let FieldValue::String(s) = &coerced {
                    if s.trim().is_empty() {
                        return Err(fail(ValidationIssue::Empty));
                    }
                }
            }

            fields.insert(name.clone(), coerced);
        }

        Ok(EntryData { fields })
    }
}

/// Named collection schemas
#[derive(Debug, Clone, PartialEq)]
pub struct SchemaRegistry {
    collections: IndexMap<String, CollectionSchema>,
}

impl SchemaRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            collections: IndexMap::new(),
        }
    }

    /// Declare (or replace) the schema of `name`
    pub fn define_schema<'a, I>(&mut self, name: &str, fields: I) -> &CollectionSchema
    where
        I: IntoIterator<Item = (&'a str, FieldSpec)>,
    {
        let schema = CollectionSchema {
            name: name.to_string(),
            fields: fields
                .into_iter()
                .map(|(field, spec)| (field.to_string(), spec))
                .collect(),
        };
        tracing::debug!("Defined collection schema: {}", name);
        self.collections.insert(name.to_string(), schema);
        &self.collections[name]
    }

    pub fn get(&self, name: &str) -> Option<&CollectionSchema> {
        self.collections.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.collections.contains_key(name)
    }

    /// Collection names in declaration order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.collections.keys().map(String::as_str)
    }
}

impl Default for SchemaRegistry {
    /// The blog's collections: `posts` and `about`
    fn default() -> Self {
        let mut registry = Self::new();
        registry.define_schema(
            "posts",
            [
                ("title", FieldSpec::string()),
                ("description", FieldSpec::string()),
                ("date", FieldSpec::date()),
                (
                    "draft",
                    FieldSpec::boolean().with_default(FieldValue::Boolean(false)),
                ),
                (
                    "image",
                    FieldSpec::string()
                        .with_default(FieldValue::String(PLACEHOLDER_IMAGE.to_string())),
                ),
            ],
        );
        registry.define_schema(
            "about",
            [
                ("title", FieldSpec::string()),
                ("description", FieldSpec::string()),
            ],
        );
        registry
    }
}

fn coerce(value: &Value, ty: FieldType) -> Option<FieldValue> {
    match (ty, value) {
        (FieldType::String, Value::String(s)) => Some(FieldValue::String(s.clone())),
        (FieldType::Boolean, Value::Bool(b)) => Some(FieldValue::Boolean(*b)),
        (FieldType::Date, Value::String(s)) => parse_date_string(s).map(FieldValue::Date),
        (FieldType::Date, Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f as i64))
            .and_then(DateTime::<Utc>::from_timestamp_millis)
            .filter(has_four_digit_year)
            .map(FieldValue::Date),
        _ => None,
    }
}

fn yaml_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Parse a date string in various formats. Values without an offset are UTC.
pub fn parse_date_string(s: &str) -> Option<DateTime<Utc>> {
    parse_any_date(s.trim()).filter(has_four_digit_year)
}

/// Years outside 0..=9999 have no RFC 2822 form, so feeds could not carry them
fn has_four_digit_year(dt: &DateTime<Utc>) -> bool {
    (0..=9999).contains(&dt.year())
}

fn parse_any_date(s: &str) -> Option<DateTime<Utc>> {

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    let datetime_formats = [
        "%Y-%m-%d %H:%M:%S",
        "%Y/%m/%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M",
        "%Y-%m-%dT%H:%M:%S",
        "%Y-%m-%dT%H:%M:%S%.f",
        "%Y-%m-%dT%H:%M",
    ];
    for fmt in datetime_formats {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.and_utc());
        }
    }

    let date_formats = [
        "%Y-%m-%d",
        "%Y/%m/%d",
        "%b %d %Y",
        "%b %d, %Y",
        "%B %d %Y",
        "%B %d, %Y",
        "%d %b %Y",
        "%d %B %Y",
    ];
    for fmt in date_formats {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
        }
    }

    None
}
