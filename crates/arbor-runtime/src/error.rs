use thiserror::Error;

/// Failures converting a host-supplied dynamic value to a declared type.
///
/// Conversion is a total function into this result; nothing here unwinds.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConvertError {
    /// The value's kind does not match the declared kind. No coercion
    /// across kinds is ever attempted.
    #[error("expect {expected}, got: {actual}")]
    TypeMismatch {
        /// Declared kind label.
        expected: &'static str,
        /// Kind label of the supplied value.
        actual: &'static str,
    },
    /// A declared struct field is absent from the supplied object. Defaults
    /// exist only at schema-compile time, so nothing is guessed here.
    #[error("missing field {field} on struct {struct_name}")]
    MissingField {
        /// Struct type name.
        struct_name: String,
        /// Missing field name.
        field: String,
    },
}

/// Failures raised by instance property access.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PropertyError {
    /// The name is not declared in the component's schema.
    #[error("no property named {0}")]
    NoSuchProperty(String),
    /// The supplied value could not be converted to the declared type.
    #[error(transparent)]
    Convert(#[from] ConvertError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_mismatch_message_contract() {
        let e = ConvertError::TypeMismatch { expected: "String", actual: "Number" };
        assert_eq!(e.to_string(), "expect String, got: Number");
    }

    #[test]
    fn property_error_is_transparent_over_convert() {
        let e = PropertyError::from(ConvertError::TypeMismatch {
            expected: "Boolean",
            actual: "Object",
        });
        assert_eq!(e.to_string(), "expect Boolean, got: Object");
    }

    #[test]
    fn missing_field_names_struct_and_field() {
        let e = ConvertError::MissingField { struct_name: "Player".into(), field: "age".into() };
        assert_eq!(e.to_string(), "missing field age on struct Player");
    }
}
