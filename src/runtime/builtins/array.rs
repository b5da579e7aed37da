//! `Array` and the `Array.prototype` methods fixtures use.

use t262_core::strings::utf16_len;

use super::{arg, constructor_with_prototype, define_global, to_integer};
use crate::runtime::interpreter::{Eval, Interpreter};
use crate::runtime::object::ObjectKind;
use crate::runtime::realm::Realm;
use crate::runtime::value::{ObjectId, Value};

pub(super) fn install(realm: &mut Realm) {
    let proto = realm.intrinsics().array_prototype;
    let array = constructor_with_prototype(realm, "Array", 1, true, proto, |interp, _, args| {
        if let [Value::Number(_)] = args {
            let length = interp.array_length_value(&args[0])?;
            let id = interp.realm_mut().new_array(Vec::new());
            interp.put_property(&Value::Object(id), "length", Value::Number(f64::from(length)))?;
            return Ok(Value::Object(id));
        }
        Ok(Value::Object(interp.realm_mut().new_array(args.to_vec())))
    });
    realm.define_method(array, "isArray", 1, |interp, _, args| {
        let is_array = arg(args, 0)
            .as_object()
            .is_some_and(|id| matches!(interp.realm().object(id).kind, ObjectKind::Array));
        Ok(Value::Bool(is_array))
    });
    define_global(realm, "Array", Value::Object(array));

    realm.define_method(proto, "push", 1, |interp, this, args| {
        let target = interp.to_object(&this)?;
        let mut length = length_of(interp, target)?;
        let base = Value::Object(target);
        for item in args {
            interp.put_property(&base, &number_key(length), item.clone())?;
            length += 1.0;
        }
        interp.put_property(&base, "length", Value::Number(length))?;
        Ok(Value::Number(length))
    });
    realm.define_method(proto, "join", 1, |interp, this, args| {
        let target = interp.to_object(&this)?;
        join(interp, target, &arg(args, 0))
    });
    realm.define_method(proto, "toString", 0, |interp, this, _| {
        let target = interp.to_object(&this)?;
        join(interp, target, &Value::Undefined)
    });
    realm.define_method(proto, "indexOf", 1, |interp, this, args| {
        let target = interp.to_object(&this)?;
        let length = length_of(interp, target)?;
        let search = arg(args, 0);
        let mut start = match args.get(1) {
            Some(from) => to_integer(interp.to_number(from)?),
            None => 0.0,
        };
        if start < 0.0 {
            start = (length + start).max(0.0);
        }
        let mut index = start;
        while index < length {
            interp.tick()?;
            let key = number_key(index);
            if let Some(desc) = interp.realm().get_own_property(target, &key) {
                if desc.value.strict_equals(&search) {
                    return Ok(Value::Number(index));
                }
            }
            index += 1.0;
        }
        Ok(Value::Number(-1.0))
    });
}

/// `ToUint32(this.length)` as a float, ready for index arithmetic.
fn length_of(interp: &mut Interpreter, target: ObjectId) -> Eval<f64> {
    let length = interp.realm().get(target, "length");
    let length = interp.to_number(&length)?;
    Ok(f64::from(t262_core::numbers::to_uint32(length)))
}

fn number_key(index: f64) -> String {
    t262_core::numbers::number_to_string(index)
}

fn join(interp: &mut Interpreter, target: ObjectId, separator: &Value) -> Eval<Value> {
    let length = length_of(interp, target)?;
    let separator = match separator {
        Value::Undefined => ",".into(),
        other => interp.to_string(other)?,
    };
    let separator_units = utf16_len(&separator);
    let mut joined = String::new();
    let mut units = 0usize;
    let mut index = 0.0;
    while index < length {
        interp.tick()?;
        if index > 0.0 {
            units = units.saturating_add(separator_units);
            interp.ensure_string_length(units)?;
            joined.push_str(&separator);
        }
        let element = interp.realm().get(target, &number_key(index));
        if !matches!(element, Value::Undefined | Value::Null) {
            let text = interp.to_string(&element)?;
            units = units.saturating_add(utf16_len(&text));
            interp.ensure_string_length(units)?;
            joined.push_str(&text);
        }
        index += 1.0;
    }
    Ok(Value::string(joined))
}
