//! `Function` and `Function.prototype`.

use t262_core::numbers::to_uint32;

use super::{arg, constructor_with_prototype, define_global};
use crate::runtime::object::{FunctionKind, ObjectKind};
use crate::runtime::realm::Realm;
use crate::runtime::value::Value;

pub(super) fn install(realm: &mut Realm) {
    let proto = realm.intrinsics().function_prototype;
    // Present so `instanceof Function` and `Function.prototype` work; source text cannot be compiled at runtime.
    let function = constructor_with_prototype(realm, "Function", 1, true, proto, |interp, _, _| {
        Err(interp.type_error("Function constructor is not supported"))
    });
    define_global(realm, "Function", Value::Object(function));

    realm.define_method(proto, "call", 1, |interp, this, args| {
        if !interp.realm().is_callable(&this) {
            return Err(interp.type_error("Function.prototype.call called on non-function"));
        }
        let rest = args.get(1..).unwrap_or_default();
        interp.call(&this, arg(args, 0), rest)
    });
    realm.define_method(proto, "apply", 2, |interp, this, args| {
        if !interp.realm().is_callable(&this) {
            return Err(interp.type_error("Function.prototype.apply called on non-function"));
        }
        let list = match arg(args, 1) {
            Value::Undefined | Value::Null => Vec::new(),
            Value::Object(source) => {
                let length = interp.realm().get(source, "length");
                let length = to_uint32(interp.to_number(&length)?);
                let mut list = Vec::new();
                for index in 0..length {
                    interp.tick()?;
                    list.push(interp.realm().get(source, &index.to_string()));
                }
                list
            }
            _ => return Err(interp.type_error("Function.prototype.apply: argument list must be an object")),
        };
        interp.call(&this, arg(args, 0), &list)
    });
    realm.define_method(proto, "toString", 0, |interp, this, _| {
        let rendered = match this.as_object().map(|id| &interp.realm().object(id).kind) {
            Some(ObjectKind::Function(FunctionKind::Native(native))) => {
                Some(format!("function {}() {{ [native code] }}", native.name))
            }
            Some(ObjectKind::Function(FunctionKind::Script(script))) => Some(format!(
                "function {}({}) {{ ... }}",
                script.decl.name.as_deref().unwrap_or(""),
                script.decl.params.join(", ")
            )),
            _ => None,
        };
        let Some(rendered) = rendered else {
            return Err(interp.type_error("Function.prototype.toString called on non-function"));
        };
        Ok(Value::string(rendered))
    });
}
