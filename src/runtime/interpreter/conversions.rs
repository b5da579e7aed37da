//! Type conversions and property access that may run script (`valueOf`/`toString`) or throw.

use std::rc::Rc;

use t262_core::errors::ErrorKind;
use t262_core::numbers::{array_index, to_uint32};
use t262_core::strings::{utf16_len, utf16_unit_at};

use super::{Eval, Interpreter};
use crate::runtime::object::{DescriptorPatch, JsObject, ObjectKind, PropertyDescriptor};
use crate::runtime::value::{ObjectId, Value};

/// Preferred result type for `ToPrimitive`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hint {
    Number,
    String,
}

impl Interpreter {
    /// `ToPrimitive`: objects are converted through `valueOf`/`toString` in hint order.
    pub fn to_primitive(&mut self, value: Value, hint: Hint) -> Eval<Value> {
        let Value::Object(id) = value else {
            return Ok(value);
        };
        let order = match hint {
            Hint::Number => ["valueOf", "toString"],
            Hint::String => ["toString", "valueOf"],
        };
        for name in order {
            let method = self.realm.get(id, name);
            if self.realm.is_callable(&method) {
                let result = self.call(&method, Value::Object(id), &[])?;
                if result.as_object().is_none() {
                    return Ok(result);
                }
            }
        }
        Err(self.type_error("Cannot convert object to primitive value"))
    }

    pub fn to_string(&mut self, value: &Value) -> Eval<Rc<str>> {
        if let Some(s) = value.primitive_to_string() {
            return Ok(s);
        }
        let primitive = self.to_primitive(value.clone(), Hint::String)?;
        Ok(primitive.primitive_to_string().unwrap_or_else(|| "".into()))
    }

    pub fn to_number(&mut self, value: &Value) -> Eval<f64> {
        if let Some(n) = value.primitive_to_number() {
            return Ok(n);
        }
        let primitive = self.to_primitive(value.clone(), Hint::Number)?;
        Ok(primitive.primitive_to_number().unwrap_or(f64::NAN))
    }

    /// `ToObject`. Primitives become fresh ordinary objects; strings expose their code units as read-only indices.
    pub fn to_object(&mut self, value: &Value) -> Eval<ObjectId> {
        let proto = match value {
            Value::Object(id) => return Ok(*id),
            Value::Undefined | Value::Null => {
                return Err(self.type_error("Cannot convert undefined or null to object"));
            }
            Value::String(_) => self.realm.intrinsics().string_prototype,
            Value::Number(_) => self.realm.intrinsics().number_prototype,
            Value::Bool(_) => self.realm.intrinsics().boolean_prototype,
        };
        let id = self.realm.alloc(JsObject::new(Some(proto), ObjectKind::Ordinary));
        if let Value::String(s) = value {
            let units = s.encode_utf16().count();
            for index in 0..units {
                if let Some(unit) = utf16_unit_at(s, index) {
                    let desc = PropertyDescriptor {
                        value: Value::string(unit),
                        writable: false,
                        enumerable: true,
                        configurable: false,
                    };
                    self.realm.insert_property(id, &index.to_string(), desc);
                }
            }
            self.realm.insert_property(id, "length", PropertyDescriptor::frozen(Value::Number(units as f64)));
        }
        Ok(id)
    }

    /// `typeof` of an already evaluated value.
    pub fn type_of(&self, value: &Value) -> &'static str {
        match value {
            Value::Object(id) if self.realm.object(*id).is_callable() => "function",
            Value::Object(_) => "object",
            primitive => primitive.primitive_type_name().unwrap_or("object"),
        }
    }

    /// `==`.
    pub fn loose_equals(&mut self, lhs: &Value, rhs: &Value) -> Eval<bool> {
        Ok(match (lhs, rhs) {
            (Value::Undefined | Value::Null, Value::Undefined | Value::Null) => true,
            (Value::Undefined | Value::Null, _) | (_, Value::Undefined | Value::Null) => false,
            (Value::Number(_), Value::String(s)) => {
                lhs.strict_equals(&Value::Number(t262_core::numbers::string_to_number(s)))
            }
            (Value::String(s), Value::Number(_)) => {
                Value::Number(t262_core::numbers::string_to_number(s)).strict_equals(rhs)
            }
            (Value::Bool(b), _) => return self.loose_equals(&Value::Number(f64::from(u8::from(*b))), rhs),
            (_, Value::Bool(b)) => return self.loose_equals(lhs, &Value::Number(f64::from(u8::from(*b)))),
            (Value::Number(_) | Value::String(_), Value::Object(_)) => {
                let rhs = self.to_primitive(rhs.clone(), Hint::Number)?;
                return self.loose_equals(lhs, &rhs);
            }
            (Value::Object(_), Value::Number(_) | Value::String(_)) => {
                let lhs = self.to_primitive(lhs.clone(), Hint::Number)?;
                return self.loose_equals(&lhs, rhs);
            }
            _ => lhs.strict_equals(rhs),
        })
    }

    // ========================================================================
    // Property access on arbitrary values
    // ========================================================================

    /// `base[key]` for any base value.
    pub fn get_property(&mut self, base: &Value, key: &str) -> Eval<Value> {
        let proto = match base {
            Value::Object(id) => return Ok(self.realm.get(*id, key)),
            Value::Undefined | Value::Null => {
                return Err(self.type_error(format!("Cannot read property '{key}' of {}", nullish_name(base))));
            }
            Value::String(s) => {
                if key == "length" {
                    return Ok(Value::Number(utf16_len(s) as f64));
                }
                if let Some(unit) = array_index(key).and_then(|i| utf16_unit_at(s, i as usize)) {
                    return Ok(Value::string(unit));
                }
                self.realm.intrinsics().string_prototype
            }
            Value::Number(_) => self.realm.intrinsics().number_prototype,
            Value::Bool(_) => self.realm.intrinsics().boolean_prototype,
        };
        Ok(self.realm.get(proto, key))
    }

    /// `base[key] = value`. Writes to primitives are dropped; refused writes fail silently.
    pub fn put_property(&mut self, base: &Value, key: &str, value: Value) -> Eval<()> {
        match base {
            Value::Object(id) => {
                let value = if self.is_array(*id) && key == "length" {
                    Value::Number(f64::from(self.array_length_value(&value)?))
                } else {
                    value
                };
                self.realm.put(*id, key, value);
                Ok(())
            }
            Value::Undefined | Value::Null => {
                Err(self.type_error(format!("Cannot set property '{key}' of {}", nullish_name(base))))
            }
            _ => Ok(()),
        }
    }

    /// `[[DefineOwnProperty]]` with array `length` validation; returns whether the definition was accepted.
    pub fn define_property(&mut self, id: ObjectId, key: &str, mut patch: DescriptorPatch) -> Eval<bool> {
        if self.is_array(id) && key == "length" {
            if let Some(value) = patch.value.take() {
                patch.value = Some(Value::Number(f64::from(self.array_length_value(&value)?)));
            }
        }
        Ok(self.realm.define_own_property(id, key, patch))
    }

    fn is_array(&self, id: ObjectId) -> bool {
        matches!(self.realm.object(id).kind, ObjectKind::Array)
    }

    /// A value usable as an array length, or a `RangeError`.
    pub fn array_length_value(&mut self, value: &Value) -> Eval<u32> {
        let n = self.to_number(value)?;
        let len = to_uint32(n);
        if f64::from(len) != n {
            return Err(self.throw(ErrorKind::RangeError, "Invalid array length"));
        }
        Ok(len)
    }

    /// `lhs instanceof rhs`.
    pub fn instance_of(&mut self, lhs: &Value, rhs: &Value) -> Eval<bool> {
        if !self.realm.is_callable(rhs) {
            return Err(self.type_error("Right-hand side of 'instanceof' is not callable"));
        }
        let Some(constructor) = rhs.as_object() else {
            return Ok(false);
        };
        let Value::Object(target) = self.realm.get(constructor, "prototype") else {
            return Err(self.type_error("Function has non-object prototype in instanceof check"));
        };
        let Some(object) = lhs.as_object() else {
            return Ok(false);
        };
        let mut current = self.realm.object(object).proto;
        while let Some(proto) = current {
            if proto == target {
                return Ok(true);
            }
            current = self.realm.object(proto).proto;
        }
        Ok(false)
    }

    /// `key in object`.
    pub fn has_property_in(&mut self, key: &Value, object: &Value) -> Eval<bool> {
        let Some(id) = object.as_object() else {
            let key = self.to_string(key)?;
            return Err(self.type_error(format!("Cannot use 'in' operator to search for '{key}' in a primitive")));
        };
        let key = self.to_string(key)?;
        Ok(self.realm.has_property(id, &key))
    }
}

fn nullish_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        _ => "undefined",
    }
}
