//! Global value properties and functions: `NaN`, `Infinity`, `undefined`, `escape`, `unescape`, `isNaN`, `isFinite`.

use t262_core::strings;

use super::{arg, define_global};
use crate::runtime::object::PropertyDescriptor;
use crate::runtime::realm::Realm;
use crate::runtime::value::Value;

pub(super) fn install(realm: &mut Realm) {
    let global = realm.global();
    for (name, value) in [
        ("NaN", Value::Number(f64::NAN)),
        ("Infinity", Value::Number(f64::INFINITY)),
        ("undefined", Value::Undefined),
    ] {
        realm.insert_property(global, name, PropertyDescriptor::frozen(value));
    }

    let escape = realm.new_native_function("escape", 1, false, |interp, _, args| {
        let input = interp.to_string(&arg(args, 0))?;
        interp.ensure_string_length(strings::escaped_len(&input))?;
        Ok(Value::string(strings::escape(&input)))
    });
    define_global(realm, "escape", Value::Object(escape));

    let unescape = realm.new_native_function("unescape", 1, false, |interp, _, args| {
        let input = interp.to_string(&arg(args, 0))?;
        Ok(Value::string(strings::unescape(&input)))
    });
    define_global(realm, "unescape", Value::Object(unescape));

    let is_nan = realm.new_native_function("isNaN", 1, false, |interp, _, args| {
        Ok(Value::Bool(interp.to_number(&arg(args, 0))?.is_nan()))
    });
    define_global(realm, "isNaN", Value::Object(is_nan));

    let is_finite = realm.new_native_function("isFinite", 1, false, |interp, _, args| {
        Ok(Value::Bool(interp.to_number(&arg(args, 0))?.is_finite()))
    });
    define_global(realm, "isFinite", Value::Object(is_finite));
}
