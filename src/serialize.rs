//! Conversion of an object tree into its JSON document form.
//!
//! Every tree becomes a JSON object: the template (if tracked) under the
//! reserved `"fmt"` key, followed by one key per parameter in append order.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use crate::objtree::{ObjTree, ObjValue};
use crate::Result;

/// Reserved document key holding a tree's format template.
pub const FMT_KEY: &str = "fmt";

impl Serialize for ObjTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        let len = self.params().len() + usize::from(self.fmt().is_some());
        let mut map = serializer.serialize_map(Some(len))?;
        if let Some(fmt) = self.fmt() {
            map.serialize_entry(FMT_KEY, fmt)?;
        }
        for param in self.params() {
            map.serialize_entry(param.name(), param.value())?;
        }
        map.end()
    }
}

impl Serialize for ObjValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        match self {
            ObjValue::Null => serializer.serialize_unit(),
            ObjValue::Bool(b) => serializer.serialize_bool(*b),
            ObjValue::String(s) => serializer.serialize_str(s),
            ObjValue::Integer(i) => serializer.serialize_i64(*i),
            ObjValue::Float(f) => serializer.serialize_f64(*f),
            ObjValue::Object(tree) => tree.serialize(serializer),
            ObjValue::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
        }
    }
}

impl ObjTree {
    /// Serializes the tree into compact JSON text.
    ///
    /// # Example
    ///
    /// ```rust
    /// use pg_ddl_deparse::ObjTree;
    ///
    /// let tree = ObjTree::new("DROP TABLE %{objidentity}s").param("objidentity", "public.foo");
    /// assert_eq!(tree.to_json(64).unwrap(), r#"{"fmt":"DROP TABLE %{objidentity}s","objidentity":"public.foo"}"#);
    /// ```
    pub fn to_json(&self, max_depth: usize) -> Result<String> {
        self.check_depth(max_depth)?;
        Ok(serde_json::to_string(self)?)
    }

    /// Converts the tree into a [`serde_json::Value`].
    pub fn to_value(&self, max_depth: usize) -> Result<serde_json::Value> {
        self.check_depth(max_depth)?;
        Ok(serde_json::to_value(self)?)
    }
}
