//! `String`, `Number` and `Boolean`.
//!
//! There are no wrapper objects: the three functions are conversions only, and `new` on them is a `TypeError`.
//! Their prototypes hold the methods primitives reach through property access.

use t262_core::errors::ErrorKind;
use t262_core::numbers::number_to_string;

use super::{arg, constructor_with_prototype, define_global};
use crate::runtime::interpreter::{Eval, Interpreter};
use crate::runtime::object::PropertyDescriptor;
use crate::runtime::realm::Realm;
use crate::runtime::value::Value;

pub(super) fn install(realm: &mut Realm) {
    install_string(realm);
    install_number(realm);
    install_boolean(realm);
}

fn install_string(realm: &mut Realm) {
    let proto = realm.intrinsics().string_prototype;
    let string = constructor_with_prototype(realm, "String", 1, false, proto, |interp, _, args| match args.first() {
        Some(value) => interp.to_string(value).map(Value::String),
        None => Ok(Value::string("")),
    });
    define_global(realm, "String", Value::Object(string));

    for name in ["toString", "valueOf"] {
        realm.define_method(proto, name, 0, |interp, this, _| match this {
            Value::String(_) => Ok(this),
            _ => Err(interp.type_error("String.prototype.valueOf requires that 'this' be a String")),
        });
    }
}

fn install_number(realm: &mut Realm) {
    let proto = realm.intrinsics().number_prototype;
    let number = constructor_with_prototype(realm, "Number", 1, false, proto, |interp, _, args| match args.first() {
        Some(value) => interp.to_number(value).map(Value::Number),
        None => Ok(Value::Number(0.0)),
    });
    for (name, value) in [
        ("MAX_VALUE", f64::MAX),
        ("MIN_VALUE", 5e-324),
        ("NaN", f64::NAN),
        ("POSITIVE_INFINITY", f64::INFINITY),
        ("NEGATIVE_INFINITY", f64::NEG_INFINITY),
    ] {
        realm.insert_property(number, name, PropertyDescriptor::frozen(Value::Number(value)));
    }
    define_global(realm, "Number", Value::Object(number));

    realm.define_method(proto, "valueOf", 0, |interp, this, _| this_number(interp, &this).map(Value::Number));
    realm.define_method(proto, "toString", 1, |interp, this, args| {
        let n = this_number(interp, &this)?;
        let radix = match arg(args, 0) {
            Value::Undefined => 10.0,
            other => interp.to_number(&other)?,
        };
        if radix != 10.0 {
            return Err(interp.throw(ErrorKind::RangeError, "toString() radix other than 10 is not supported"));
        }
        Ok(Value::string(number_to_string(n)))
    });
}

fn this_number(interp: &mut Interpreter, this: &Value) -> Eval<f64> {
    match this {
        Value::Number(n) => Ok(*n),
        _ => Err(interp.type_error("Number.prototype.valueOf requires that 'this' be a Number")),
    }
}

fn install_boolean(realm: &mut Realm) {
    let proto = realm.intrinsics().boolean_prototype;
    let boolean = constructor_with_prototype(realm, "Boolean", 1, false, proto, |_, _, args| {
        Ok(Value::Bool(arg(args, 0).to_boolean()))
    });
    define_global(realm, "Boolean", Value::Object(boolean));

    realm.define_method(proto, "valueOf", 0, |interp, this, _| match this {
        Value::Bool(_) => Ok(this),
        _ => Err(interp.type_error("Boolean.prototype.valueOf requires that 'this' be a Boolean")),
    });
    realm.define_method(proto, "toString", 0, |interp, this, _| match this {
        Value::Bool(b) => Ok(Value::string(if b { "true" } else { "false" })),
        _ => Err(interp.type_error("Boolean.prototype.toString requires that 'this' be a Boolean")),
    });
}
