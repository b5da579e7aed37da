//! Error constructors and `Error.prototype.toString`.

use t262_core::errors::ErrorKind;

use super::{arg, constructor_with_prototype};
use crate::runtime::object::PropertyDescriptor;
use crate::runtime::realm::Realm;
use crate::runtime::value::{ObjectId, Value};

/// The constructor for `kind`, wired to the realm's intrinsic prototype for that kind.
///
/// Calling and constructing behave alike: both create an error whose own `message` is the string form of the
/// first argument, if one was given.
pub fn error_constructor(realm: &mut Realm, kind: ErrorKind) -> ObjectId {
    let proto = realm.intrinsics().error_prototype(kind);
    constructor_with_prototype(realm, kind.name(), 1, true, proto, move |interp, _, args| {
        let id = interp.realm_mut().new_error_with_proto(proto, "");
        let message = arg(args, 0);
        if !message.is_undefined() {
            let message = interp.to_string(&message)?;
            interp
                .realm_mut()
                .insert_property(id, "message", PropertyDescriptor::hidden(Value::String(message)));
        }
        Ok(Value::Object(id))
    })
}

/// `Error.prototype.toString`, inherited by every other error prototype.
pub(super) fn install_prototype_methods(realm: &mut Realm) {
    let proto = realm.intrinsics().error_prototype(ErrorKind::Error);
    realm.define_method(proto, "toString", 0, |interp, this, _| {
        let Some(target) = this.as_object() else {
            return Err(interp.type_error("Error.prototype.toString called on non-object"));
        };
        let name = match interp.realm().get(target, "name") {
            Value::Undefined => "Error".into(),
            other => interp.to_string(&other)?,
        };
        let message = match interp.realm().get(target, "message") {
            Value::Undefined => "".into(),
            other => interp.to_string(&other)?,
        };
        let rendered = match (name.is_empty(), message.is_empty()) {
            (_, true) => name.to_string(),
            (true, false) => message.to_string(),
            (false, false) => format!("{name}: {message}"),
        };
        Ok(Value::string(rendered))
    });
}
