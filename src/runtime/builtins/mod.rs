//! Standard global objects with ES5 property attributes.
//!
//! Functions and constructors are installed writable, non-enumerable and configurable; the value properties
//! `NaN`, `Infinity` and `undefined` are fully frozen. Hosts that want a non-conformant realm install these and
//! then patch the global object (see [`OverrideHost`](crate::host::OverrideHost)).

mod array;
mod error;
mod function;
mod global;
mod object;
mod primitive;

use t262_core::errors::ErrorKind;

use super::interpreter::{Eval, Interpreter};
use super::object::PropertyDescriptor;
use super::realm::Realm;
use super::value::{ObjectId, Value};

pub use error::error_constructor;

/// Populate `realm`'s global object with the standard library.
pub fn install_standard_globals(realm: &mut Realm) {
    object::install(realm);
    function::install(realm);
    array::install(realm);
    for kind in [
        ErrorKind::Error,
        ErrorKind::TypeError,
        ErrorKind::ReferenceError,
        ErrorKind::SyntaxError,
        ErrorKind::RangeError,
    ] {
        let constructor = error_constructor(realm, kind);
        define_global(realm, kind.name(), Value::Object(constructor));
    }
    error::install_prototype_methods(realm);
    primitive::install(realm);
    global::install(realm);
}

/// Add a function or constructor to the global object (writable, non-enumerable, configurable).
pub fn define_global(realm: &mut Realm, name: &str, value: Value) {
    let global = realm.global();
    realm.insert_property(global, name, PropertyDescriptor::hidden(value));
}

/// Create a native constructor whose `prototype` is `prototype`, and link `prototype.constructor` back.
pub(crate) fn constructor_with_prototype(
    realm: &mut Realm,
    name: &str,
    arity: usize,
    constructible: bool,
    prototype: ObjectId,
    call: impl Fn(&mut Interpreter, Value, &[Value]) -> Eval<Value> + 'static,
) -> ObjectId {
    let constructor = realm.new_native_function(name, arity, constructible, call);
    realm.insert_property(constructor, "prototype", PropertyDescriptor::frozen(Value::Object(prototype)));
    realm.insert_property(prototype, "constructor", PropertyDescriptor::hidden(Value::Object(constructor)));
    constructor
}

/// Argument `index`, or `undefined` when absent.
pub(crate) fn arg(args: &[Value], index: usize) -> Value {
    args.get(index).cloned().unwrap_or(Value::Undefined)
}

/// `ToInteger` on an already converted number.
pub(crate) fn to_integer(n: f64) -> f64 {
    if n.is_nan() { 0.0 } else { n.trunc() }
}

/// The object argument of a reflection function, or `TypeError: <caller> called on non-object`.
pub(crate) fn expect_object(interp: &mut Interpreter, value: &Value, caller: &str) -> Eval<ObjectId> {
    match value.as_object() {
        Some(id) => Ok(id),
        None => Err(interp.type_error(format!("{caller} called on non-object"))),
    }
}

#[cfg(test)]
mod tests;
