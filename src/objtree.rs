//! The object tree: the intermediate representation of one deparsed command.
//!
//! Each [`ObjTree`] carries a set of named, typed parameters plus a format
//! template made of literal text and `%{name[:separator]}conv` placeholders.
//! The template is opaque to this crate apart from the placeholder names, which
//! bind each parameter to its slot; expanding it into SQL is up to the consumer
//! of the serialized document.
//!
//! Trees are assembled with the typed `append_*` operations, which honour the
//! verbosity the tree was created under: in compact mode empty strings, nulls
//! and absent sub-clauses are left out entirely.

use std::fmt;

use crate::{Error, Result};

/// Name of the reserved element that records whether a sub-clause applies.
pub const PRESENT: &str = "present";

/// Kind tag of an element value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjType {
    Null,
    Bool,
    String,
    Array,
    Integer,
    Float,
    Object,
}

impl TryFrom<i32> for ObjType {
    type Error = Error;

    fn try_from(tag: i32) -> Result<Self> {
        match tag {
            0 => Ok(ObjType::Null),
            1 => Ok(ObjType::Bool),
            2 => Ok(ObjType::String),
            3 => Ok(ObjType::Array),
            4 => Ok(ObjType::Integer),
            5 => Ok(ObjType::Float),
            6 => Ok(ObjType::Object),
            _ => Err(Error::InvalidKind(tag.to_string())),
        }
    }
}

impl fmt::Display for ObjType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ObjType::Null => "null",
            ObjType::Bool => "bool",
            ObjType::String => "string",
            ObjType::Array => "array",
            ObjType::Integer => "integer",
            ObjType::Float => "float",
            ObjType::Object => "object",
        };
        f.write_str(name)
    }
}

/// The value held by an element.
#[derive(Debug, Clone, PartialEq)]
pub enum ObjValue {
    Null,
    Bool(bool),
    String(String),
    Integer(i64),
    Float(f64),
    /// Array items; in practice always strings or objects.
    Array(Vec<ObjValue>),
    Object(ObjTree),
}

impl ObjValue {
    pub fn kind(&self) -> ObjType {
        match self {
            ObjValue::Null => ObjType::Null,
            ObjValue::Bool(_) => ObjType::Bool,
            ObjValue::String(_) => ObjType::String,
            ObjValue::Integer(_) => ObjType::Integer,
            ObjValue::Float(_) => ObjType::Float,
            ObjValue::Array(_) => ObjType::Array,
            ObjValue::Object(_) => ObjType::Object,
        }
    }

    pub fn as_object(&self) -> Option<&ObjTree> {
        match self {
            ObjValue::Object(tree) => Some(tree),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            ObjValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[ObjValue]> {
        match self {
            ObjValue::Array(items) => Some(items),
            _ => None,
        }
    }
}

impl From<bool> for ObjValue {
    fn from(v: bool) -> Self {
        ObjValue::Bool(v)
    }
}

impl From<&str> for ObjValue {
    fn from(v: &str) -> Self {
        ObjValue::String(v.to_string())
    }
}

impl From<String> for ObjValue {
    fn from(v: String) -> Self {
        ObjValue::String(v)
    }
}

impl From<i64> for ObjValue {
    fn from(v: i64) -> Self {
        ObjValue::Integer(v)
    }
}

impl From<i32> for ObjValue {
    fn from(v: i32) -> Self {
        ObjValue::Integer(v.into())
    }
}

impl From<f64> for ObjValue {
    fn from(v: f64) -> Self {
        ObjValue::Float(v)
    }
}

impl From<ObjTree> for ObjValue {
    fn from(v: ObjTree) -> Self {
        ObjValue::Object(v)
    }
}

impl From<Vec<ObjValue>> for ObjValue {
    fn from(v: Vec<ObjValue>) -> Self {
        ObjValue::Array(v)
    }
}

/// One named parameter of an [`ObjTree`].
#[derive(Debug, Clone, PartialEq)]
pub struct ObjElem {
    name: String,
    value: ObjValue,
}

impl ObjElem {
    pub fn new(name: impl Into<String>, value: impl Into<ObjValue>) -> Self {
        ObjElem { name: name.into(), value: value.into() }
    }

    /// Builds an element whose value must match a declared kind.
    pub fn typed(name: impl Into<String>, kind: ObjType, value: ObjValue) -> Result<Self> {
        if value.kind() != kind {
            return Err(Error::InvalidKind(format!("{} value declared as {}", value.kind(), kind)));
        }
        Ok(ObjElem::new(name, value))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn value(&self) -> &ObjValue {
        &self.value
    }

    pub fn kind(&self) -> ObjType {
        self.value.kind()
    }
}

/// Returns the parameter name bound by the first placeholder in `fragment`.
///
/// The name runs from the character after `{` up to the first `:` or `}`.
///
/// # Example
///
/// ```rust
/// use pg_ddl_deparse::objtree::extract_placeholder_name;
///
/// assert_eq!(extract_placeholder_name("(%{parents:, }D)").unwrap(), "parents");
/// assert_eq!(extract_placeholder_name("OF %{of_type}T").unwrap(), "of_type");
/// assert!(extract_placeholder_name("CASCADE").is_err());
/// ```
pub fn extract_placeholder_name(fragment: &str) -> Result<&str> {
    let malformed = || Error::MalformedTemplate(fragment.to_string());

    let start = fragment.find('{').ok_or_else(malformed)? + 1;
    let rest = &fragment[start..];
    let end = rest.find(|c: char| c == ':' || c == '}').ok_or_else(malformed)?;
    let name = &rest[..end];

    if name.is_empty() {
        return Err(malformed());
    }
    Ok(name)
}

/// A node of the object tree.
#[derive(Debug, Clone, PartialEq)]
pub struct ObjTree {
    params: Vec<ObjElem>,
    fmt: Option<String>,
    present: bool,
    verbose: bool,
}

impl Default for ObjTree {
    fn default() -> Self {
        ObjTree::bare()
    }
}

impl ObjTree {
    /// Creates a tree tracking a format template, seeded with `fmt`.
    pub fn new(fmt: &str) -> Self {
        ObjTree { params: Vec::new(), fmt: Some(fmt.to_string()), present: true, verbose: true }
    }

    /// Creates a tree without a format template, e.g. the `schemaname` /
    /// `objname` pair behind a qualified name.
    pub fn bare() -> Self {
        ObjTree { params: Vec::new(), fmt: None, present: true, verbose: true }
    }

    /// Sets the verbosity honoured by this tree's `append_*` operations.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Adds a parameter without touching the template; the fluent counterpart
    /// of listing `name, type, value` triples when building a node inline.
    ///
    /// A parameter named `present` also sets the tree's own present flag.
    pub fn param(mut self, name: &str, value: impl Into<ObjValue>) -> Self {
        let value = value.into();
        if name == PRESENT {
            if let ObjValue::Bool(flag) = value {
                self.present = flag;
            }
        }
        self.append_premade(ObjElem::new(name, value));
        self
    }

    /// Like [`ObjTree::param`], but checks the value against a declared kind.
    pub fn try_param(self, name: &str, kind: ObjType, value: ObjValue) -> Result<Self> {
        let elem = ObjElem::typed(name, kind, value)?;
        Ok(self.param(name, elem.value))
    }

    pub fn fmt(&self) -> Option<&str> {
        self.fmt.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.present
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose
    }

    /// Parameters in append order.
    pub fn params(&self) -> &[ObjElem] {
        &self.params
    }

    pub fn get(&self, name: &str) -> Option<&ObjValue> {
        self.params.iter().find(|p| p.name == name).map(|p| &p.value)
    }

    pub fn get_object(&self, name: &str) -> Option<&ObjTree> {
        self.get(name).and_then(ObjValue::as_object)
    }

    pub fn get_str(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(ObjValue::as_str)
    }

    pub fn get_array(&self, name: &str) -> Option<&[ObjValue]> {
        self.get(name).and_then(ObjValue::as_array)
    }

    /// Appends literal text to the template, separated by a single space
    /// unless the template is empty or already ends in whitespace.
    pub fn append_format_string(&mut self, fragment: &str) {
        let Some(fmt) = self.fmt.as_mut() else {
            return;
        };
        if fmt.chars().last().is_some_and(|c| !c.is_whitespace()) {
            fmt.push(' ');
        }
        fmt.push_str(fragment);
    }

    /// Binds the placeholder in `fragment` and appends it to the template.
    fn append_placeholder(&mut self, fragment: &str) -> Result<String> {
        let name = extract_placeholder_name(fragment)?.to_string();
        self.append_format_string(fragment);
        Ok(name)
    }

    /// Inserts an element as is, without touching the template.
    pub fn append_premade(&mut self, elem: ObjElem) {
        self.params.push(elem);
    }

    /// Appends a string parameter. Skipped in compact mode when empty.
    pub fn append_string(&mut self, fragment: &str, value: impl Into<String>) -> Result<()> {
        let value = value.into();
        let name = extract_placeholder_name(fragment)?;
        if !self.verbose && value.is_empty() {
            return Ok(());
        }
        let name = name.to_string();
        self.append_format_string(fragment);
        self.append_premade(ObjElem::new(name, value));
        Ok(())
    }

    /// Appends an integer parameter.
    pub fn append_integer(&mut self, fragment: &str, value: i64) -> Result<()> {
        let name = self.append_placeholder(fragment)?;
        self.append_premade(ObjElem::new(name, value));
        Ok(())
    }

    /// Appends a boolean parameter.
    ///
    /// `present` is special: it records whether this (sub-)clause applies,
    /// sets the tree's own flag and never adds a placeholder.
    pub fn append_bool(&mut self, fragment: &str, value: bool) -> Result<()> {
        if fragment == PRESENT {
            self.present = value;
            self.append_premade(ObjElem::new(PRESENT, value));
            return Ok(());
        }
        let name = self.append_placeholder(fragment)?;
        self.append_premade(ObjElem::new(name, value));
        Ok(())
    }

    /// Marks the tree as an absent clause.
    pub fn append_not_present(&mut self) {
        self.present = false;
        self.append_premade(ObjElem::new(PRESENT, false));
    }

    /// Appends a null parameter; only emitted in verbose mode.
    pub fn append_null(&mut self, fragment: &str) -> Result<()> {
        let name = extract_placeholder_name(fragment)?;
        if !self.verbose {
            return Ok(());
        }
        let name = name.to_string();
        self.append_format_string(fragment);
        self.append_premade(ObjElem::new(name, ObjValue::Null));
        Ok(())
    }

    /// Appends a nested tree. Skipped in compact mode when the nested tree is
    /// not present.
    pub fn append_object(&mut self, fragment: &str, value: ObjTree) -> Result<()> {
        let name = extract_placeholder_name(fragment)?;
        if !self.verbose && !value.present {
            return Ok(());
        }
        let name = name.to_string();
        self.append_format_string(fragment);
        self.append_premade(ObjElem::new(name, value));
        Ok(())
    }

    /// Appends an array parameter.
    ///
    /// In compact mode, object items that are not present are dropped first.
    /// An empty array is omitted together with its placeholder.
    pub fn append_array(&mut self, fragment: &str, items: Vec<ObjValue>) -> Result<()> {
        let name = extract_placeholder_name(fragment)?;

        let items: Vec<ObjValue> = if self.verbose {
            items
        } else {
            items.into_iter().filter(|item| !matches!(item, ObjValue::Object(tree) if !tree.present)).collect()
        };
        if items.is_empty() {
            return Ok(());
        }

        let name = name.to_string();
        self.append_format_string(fragment);
        self.append_premade(ObjElem::new(name, items));
        Ok(())
    }

    /// Fails when objects and arrays nest deeper than `max_depth` levels.
    ///
    /// The walk stops descending at the limit.
    pub fn check_depth(&self, max_depth: usize) -> Result<()> {
        check_tree_depth(self, 1, max_depth)
    }
}

fn check_tree_depth(tree: &ObjTree, depth: usize, max_depth: usize) -> Result<()> {
    if depth > max_depth {
        return Err(Error::DepthExceeded(max_depth));
    }
    tree.params.iter().try_for_each(|p| check_value_depth(&p.value, depth, max_depth))
}

fn check_value_depth(value: &ObjValue, depth: usize, max_depth: usize) -> Result<()> {
    match value {
        ObjValue::Object(tree) => check_tree_depth(tree, depth + 1, max_depth),
        ObjValue::Array(items) => {
            if depth + 1 > max_depth {
                return Err(Error::DepthExceeded(max_depth));
            }
            items.iter().try_for_each(|item| check_value_depth(item, depth + 1, max_depth))
        }
        _ => Ok(()),
    }
}
