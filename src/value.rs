use std::collections::HashMap;
use std::fmt;

use crate::token::ScalarKind;

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum NodeType {
    Object,
    Array,
    Scalar,
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            NodeType::Object => "object",
            NodeType::Array => "array",
            NodeType::Scalar => "scalar",
        })
    }
}

/// A failed scalar accessor.
///
/// Callers are expected to ask for the type matching the scalar's kind;
/// asking for anything else (an integer from `true`, a boolean from a
/// number, any scalar from a container) lands here instead of panicking.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CoercionError {
    #[error("expected a scalar, found {found}")]
    NotAScalar { found: NodeType },
    #[error("{kind} literal {text:?} is not a valid {target}")]
    Invalid {
        target: &'static str,
        kind: ScalarKind,
        text: String,
    },
}

/// A leaf value: one literal token's kind and text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    kind: ScalarKind,
    text: String,
}

impl Scalar {
    /// Callers guarantee `kind.accepts(&text)`.
    pub(crate) fn new(kind: ScalarKind, text: String) -> Self {
        debug_assert!(kind.accepts(&text));
        Scalar { kind, text }
    }

    pub fn kind(&self) -> ScalarKind {
        self.kind
    }

    /// The raw literal text, whatever the kind.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn as_i64(&self) -> Result<i64, CoercionError> {
        self.text.parse().map_err(|_| self.invalid("integer"))
    }

    pub fn as_f64(&self) -> Result<f64, CoercionError> {
        self.text.parse().map_err(|_| self.invalid("float"))
    }

    pub fn as_bool(&self) -> Result<bool, CoercionError> {
        self.text.parse().map_err(|_| self.invalid("boolean"))
    }

    fn invalid(&self, target: &'static str) -> CoercionError {
        CoercionError::Invalid {
            target,
            kind: self.kind,
            text: self.text.clone(),
        }
    }
}

/// A parsed JSON document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Value {
    /// Key/value pairs; the last occurrence of a key wins.
    Object(HashMap<String, Value>),
    Array(Vec<Value>),
    Scalar(Scalar),
}

impl Value {
    pub fn node_type(&self) -> NodeType {
        match self {
            Value::Object(_) => NodeType::Object,
            Value::Array(_) => NodeType::Array,
            Value::Scalar(_) => NodeType::Scalar,
        }
    }

    pub fn as_object(&self) -> Option<&HashMap<String, Value>> {
        match self {
            Value::Object(children) => Some(children),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(elements) => Some(elements.as_slice()),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Value::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Looks up `key` if this is an object.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.as_object().and_then(|children| children.get(key))
    }

    /// Number of children of a container, `None` for a scalar.
    pub fn len(&self) -> Option<usize> {
        match self {
            Value::Object(children) => Some(children.len()),
            Value::Array(elements) => Some(elements.len()),
            Value::Scalar(_) => None,
        }
    }

    /// Whether this is a container without children. Scalars are never empty.
    pub fn is_empty(&self) -> bool {
        self.len() == Some(0)
    }

    pub fn as_str(&self) -> Result<&str, CoercionError> {
        self.scalar().map(Scalar::as_str)
    }

    pub fn as_i64(&self) -> Result<i64, CoercionError> {
        self.scalar()?.as_i64()
    }

    pub fn as_f64(&self) -> Result<f64, CoercionError> {
        self.scalar()?.as_f64()
    }

    pub fn as_bool(&self) -> Result<bool, CoercionError> {
        self.scalar()?.as_bool()
    }

    fn scalar(&self) -> Result<&Scalar, CoercionError> {
        self.as_scalar().ok_or(CoercionError::NotAScalar {
            found: self.node_type(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scalar(kind: ScalarKind, text: &str) -> Scalar {
        Scalar::new(kind, text.to_string())
    }

    #[test]
    fn string_access_is_unconditional() {
        assert_eq!(scalar(ScalarKind::Number, "1,5").as_str(), "1,5");
        assert_eq!(scalar(ScalarKind::True, "true").as_str(), "true");
    }

    #[test]
    fn integer_coercion() {
        assert_eq!(scalar(ScalarKind::Number, "123").as_i64(), Ok(123));
        assert_eq!(
            scalar(ScalarKind::True, "true").as_i64(),
            Err(CoercionError::Invalid {
                target: "integer",
                kind: ScalarKind::True,
                text: "true".to_string(),
            })
        );
        assert!(scalar(ScalarKind::Number, "1.5").as_i64().is_err());
        assert!(scalar(ScalarKind::Number, "1,000").as_i64().is_err());
    }

    #[test]
    fn float_coercion() {
        assert_eq!(scalar(ScalarKind::Number, "123.456").as_f64(), Ok(123.456));
        assert_eq!(scalar(ScalarKind::Number, "7").as_f64(), Ok(7.0));
        assert!(scalar(ScalarKind::String, "abc").as_f64().is_err());
    }

    #[test]
    fn boolean_coercion() {
        assert_eq!(scalar(ScalarKind::True, "true").as_bool(), Ok(true));
        assert_eq!(scalar(ScalarKind::False, "false").as_bool(), Ok(false));
        assert!(scalar(ScalarKind::Number, "1").as_bool().is_err());
    }

    #[test]
    fn containers_do_not_coerce() {
        let array = Value::Array(vec![]);
        assert_eq!(
            array.as_i64(),
            Err(CoercionError::NotAScalar {
                found: NodeType::Array
            })
        );
        assert!(Value::Object(HashMap::new()).as_str().is_err());
    }

    #[test]
    fn object_lookup() {
        let mut children = HashMap::new();
        children.insert(
            "name".to_string(),
            Value::Scalar(scalar(ScalarKind::String, "my-name")),
        );
        let object = Value::Object(children);

        assert_eq!(object.node_type(), NodeType::Object);
        assert_eq!(object.len(), Some(1));
        assert_eq!(object.get("name").unwrap().as_str(), Ok("my-name"));
        assert!(object.get("missing").is_none());
        assert!(object.as_array().is_none());
    }

    #[test]
    fn scalars_have_no_length() {
        let name = Value::Scalar(scalar(ScalarKind::String, "my-name"));
        assert_eq!(name.len(), None);
        assert!(!name.is_empty());

        let empty = Value::Scalar(scalar(ScalarKind::String, ""));
        assert!(!empty.is_empty());

        assert_eq!(Value::Array(vec![]).len(), Some(0));
        assert!(Value::Array(vec![]).is_empty());
    }

    #[test]
    fn coercion_error_message() {
        let err = scalar(ScalarKind::String, "abc").as_i64().unwrap_err();
        assert_eq!(err.to_string(), "string literal \"abc\" is not a valid integer");
    }
}
