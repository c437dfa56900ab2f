//! Bidirectional conversion between the internal typed [`Value`] and the
//! dynamic host representation (`serde_json::Value`).
//!
//! Dynamic → internal is driven by the declared [`ValueType`] and never
//! coerces across kinds: a `Number` offered to a `string` property fails,
//! and vice versa. Internal → dynamic is total, since slot values are
//! always well-typed.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use crate::error::ConvertError;
use crate::schema::ValueType;
use crate::value::{StructValue, Value};

// ── Kind labels ───────────────────────────────────────────────────────────

/// Host-level kind label for a dynamic value, as reported in errors.
pub fn json_kind(v: &JsonValue) -> &'static str {
    match v {
        JsonValue::Null => "Null",
        JsonValue::Bool(_) => "Boolean",
        JsonValue::Number(_) => "Number",
        JsonValue::String(_) => "String",
        JsonValue::Array(_) => "Array",
        JsonValue::Object(_) => "Object",
    }
}

fn mismatch(ty: &ValueType, v: &JsonValue) -> ConvertError {
    ConvertError::TypeMismatch { expected: ty.label(), actual: json_kind(v) }
}

// ── Dynamic → internal ────────────────────────────────────────────────────

/// Convert a host value against a declared type.
///
/// For structs, every declared field is converted recursively from the
/// object's entry of the same name; a missing entry fails with
/// [`ConvertError::MissingField`], extra keys are ignored. Field failures
/// propagate eagerly, so either the whole value converts or nothing does.
pub fn from_json(ty: &ValueType, v: &JsonValue) -> Result<Value, ConvertError> {
    match ty {
        ValueType::Bool => match v {
            JsonValue::Bool(b) => Ok(Value::Bool(*b)),
            other => Err(mismatch(ty, other)),
        },
        ValueType::Number => match v {
            JsonValue::Number(n) => {
                n.as_f64().map(Value::Number).ok_or_else(|| mismatch(ty, v))
            }
            other => Err(mismatch(ty, other)),
        },
        ValueType::String => match v {
            JsonValue::String(s) => Ok(Value::String(s.clone())),
            other => Err(mismatch(ty, other)),
        },
        ValueType::Struct(st) => match v {
            JsonValue::Object(entries) => {
                let mut fields = Vec::with_capacity(st.fields.len());
                for (fname, fty) in &st.fields {
                    let entry = entries.get(fname).ok_or_else(|| ConvertError::MissingField {
                        struct_name: st.name.clone(),
                        field: fname.clone(),
                    })?;
                    fields.push(from_json(fty, entry)?);
                }
                Ok(Value::Struct(StructValue { ty: Arc::clone(st), fields }))
            }
            other => Err(mismatch(ty, other)),
        },
    }
}

// ── Internal → dynamic ────────────────────────────────────────────────────

/// Convert a slot value back to the host representation. Struct fields are
/// emitted in declaration order.
pub fn to_json(v: &Value) -> JsonValue {
    match v {
        Value::Bool(b) => JsonValue::Bool(*b),
        Value::Number(n) => JsonValue::from(*n),
        Value::String(s) => JsonValue::String(s.clone()),
        Value::Struct(sv) => {
            let mut map = serde_json::Map::with_capacity(sv.fields.len());
            for ((fname, _), fvalue) in sv.ty.fields.iter().zip(&sv.fields) {
                map.insert(fname.clone(), to_json(fvalue));
            }
            JsonValue::Object(map)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StructType;
    use serde_json::json;

    fn player_type() -> Arc<StructType> {
        Arc::new(StructType {
            name: "Player".into(),
            fields: vec![
                ("name".into(), ValueType::String),
                ("age".into(), ValueType::Number),
            ],
        })
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(from_json(&ValueType::Bool, &json!(true)), Ok(Value::Bool(true)));
        assert_eq!(from_json(&ValueType::Number, &json!(42)), Ok(Value::Number(42.0)));
        assert_eq!(from_json(&ValueType::Number, &json!(1.5)), Ok(Value::Number(1.5)));
        assert_eq!(
            from_json(&ValueType::String, &json!("Hello")),
            Ok(Value::String("Hello".into()))
        );
    }

    #[test]
    fn no_coercion_across_kinds() {
        let cases: [(ValueType, JsonValue, &str, &str); 6] = [
            (ValueType::String, json!(42), "String", "Number"),
            (ValueType::String, json!({ "blah": "foo" }), "String", "Object"),
            (ValueType::Number, json!("Hello"), "Number", "String"),
            (ValueType::Bool, json!("Hello"), "Boolean", "String"),
            (ValueType::Bool, json!(null), "Boolean", "Null"),
            (ValueType::Number, json!([1, 2]), "Number", "Array"),
        ];
        for (ty, v, expected, actual) in cases {
            assert_eq!(
                from_json(&ty, &v),
                Err(ConvertError::TypeMismatch { expected, actual })
            );
        }
    }

    #[test]
    fn struct_requires_object_shape() {
        let ty = ValueType::Struct(player_type());
        assert_eq!(
            from_json(&ty, &json!("Player")),
            Err(ConvertError::TypeMismatch { expected: "Object", actual: "String" })
        );
        assert_eq!(
            from_json(&ty, &json!([1])),
            Err(ConvertError::TypeMismatch { expected: "Object", actual: "Array" })
        );
    }

    #[test]
    fn struct_converts_declared_fields() {
        let st = player_type();
        let v = from_json(
            &ValueType::Struct(Arc::clone(&st)),
            &json!({ "name": "Florian", "age": 20 }),
        )
        .unwrap();
        let Value::Struct(sv) = v else { panic!("expected struct") };
        assert_eq!(sv.field("name"), Some(&Value::String("Florian".into())));
        assert_eq!(sv.field("age"), Some(&Value::Number(20.0)));
    }

    #[test]
    fn struct_ignores_extra_keys() {
        let st = player_type();
        let v = from_json(
            &ValueType::Struct(Arc::clone(&st)),
            &json!({ "name": "Florian", "age": 20, "score": 9000 }),
        )
        .unwrap();
        assert_eq!(to_json(&v), json!({ "name": "Florian", "age": 20.0 }));
    }

    #[test]
    fn struct_missing_field_is_not_guessed() {
        let st = player_type();
        assert_eq!(
            from_json(&ValueType::Struct(st), &json!({ "name": "Florian" })),
            Err(ConvertError::MissingField { struct_name: "Player".into(), field: "age".into() })
        );
    }

    #[test]
    fn struct_field_failure_propagates_eagerly() {
        let st = player_type();
        assert_eq!(
            from_json(&ValueType::Struct(st), &json!({ "name": "Florian", "age": "old" })),
            Err(ConvertError::TypeMismatch { expected: "Number", actual: "String" })
        );
    }

    #[test]
    fn nested_struct_round_trip() {
        let point = Arc::new(StructType {
            name: "Point".into(),
            fields: vec![
                ("x".into(), ValueType::Number),
                ("y".into(), ValueType::Number),
            ],
        });
        let line = Arc::new(StructType {
            name: "Line".into(),
            fields: vec![
                ("from".into(), ValueType::Struct(Arc::clone(&point))),
                ("to".into(), ValueType::Struct(Arc::clone(&point))),
            ],
        });
        let input = json!({ "from": { "x": 0.0, "y": 0.0 }, "to": { "x": 3.0, "y": 4.0 } });
        let v = from_json(&ValueType::Struct(line), &input).unwrap();
        assert_eq!(to_json(&v), input);
    }

    #[test]
    fn read_back_emits_fields_in_declaration_order() {
        let st = player_type();
        let v = from_json(
            &ValueType::Struct(st),
            &json!({ "age": 20, "name": "Florian" }),
        )
        .unwrap();
        let JsonValue::Object(map) = to_json(&v) else { panic!("expected object") };
        let keys: Vec<&str> = map.keys().map(|k| k.as_str()).collect();
        assert_eq!(keys, ["name", "age"]);
    }
}
