//! `Object`, its reflection functions and `Object.prototype`.

use super::{arg, constructor_with_prototype, define_global, expect_object};
use crate::runtime::interpreter::{Eval, Interpreter};
use crate::runtime::object::{DescriptorPatch, PropertyDescriptor};
use crate::runtime::realm::{DescriptorSource, Realm};
use crate::runtime::value::{ObjectId, Value};

pub(super) fn install(realm: &mut Realm) {
    let proto = realm.intrinsics().object_prototype;
    let object = constructor_with_prototype(realm, "Object", 1, true, proto, |interp, _, args| {
        let value = arg(args, 0);
        if value.is_nullish() {
            return Ok(Value::Object(interp.realm_mut().new_object()));
        }
        interp.to_object(&value).map(Value::Object)
    });

    realm.define_method(object, "getOwnPropertyDescriptor", 2, |interp, _, args| {
        let target = expect_object(interp, &arg(args, 0), "Object.getOwnPropertyDescriptor")?;
        let key = interp.to_string(&arg(args, 1))?;
        match interp.realm().own_property_descriptor(target, &key) {
            Some(desc) => Ok(Value::Object(from_property_descriptor(interp.realm_mut(), desc))),
            None => Ok(Value::Undefined),
        }
    });
    realm.define_method(object, "defineProperty", 3, |interp, _, args| {
        let target = expect_object(interp, &arg(args, 0), "Object.defineProperty")?;
        let key = interp.to_string(&arg(args, 1))?;
        let patch = to_property_descriptor(interp, &arg(args, 2))?;
        if !interp.define_property(target, &key, patch)? {
            return Err(interp.type_error(format!("Cannot redefine property: {key}")));
        }
        Ok(Value::Object(target))
    });
    realm.define_method(object, "getOwnPropertyNames", 1, |interp, _, args| {
        let target = expect_object(interp, &arg(args, 0), "Object.getOwnPropertyNames")?;
        let names = interp.realm().own_property_keys(target);
        Ok(string_array(interp.realm_mut(), names))
    });
    realm.define_method(object, "keys", 1, |interp, _, args| {
        let target = expect_object(interp, &arg(args, 0), "Object.keys")?;
        let realm = interp.realm();
        let names: Vec<String> = realm
            .own_keys(target)
            .into_iter()
            .filter(|key| realm.get_own_property(target, key).is_some_and(|d| d.enumerable))
            .map(|key| key.to_string())
            .collect();
        Ok(string_array(interp.realm_mut(), names))
    });
    realm.define_method(object, "getPrototypeOf", 1, |interp, _, args| {
        let target = expect_object(interp, &arg(args, 0), "Object.getPrototypeOf")?;
        Ok(interp.realm().object(target).proto.map_or(Value::Null, Value::Object))
    });
    realm.define_method(object, "preventExtensions", 1, |interp, _, args| {
        let target = expect_object(interp, &arg(args, 0), "Object.preventExtensions")?;
        interp.realm_mut().object_mut(target).extensible = false;
        Ok(Value::Object(target))
    });
    realm.define_method(object, "isExtensible", 1, |interp, _, args| {
        let target = expect_object(interp, &arg(args, 0), "Object.isExtensible")?;
        Ok(Value::Bool(interp.realm().object(target).extensible))
    });
    realm.define_method(object, "freeze", 1, |interp, _, args| {
        let target = expect_object(interp, &arg(args, 0), "Object.freeze")?;
        interp.realm_mut().object_mut(target).freeze();
        Ok(Value::Object(target))
    });
    realm.define_method(object, "isFrozen", 1, |interp, _, args| {
        let target = expect_object(interp, &arg(args, 0), "Object.isFrozen")?;
        Ok(Value::Bool(interp.realm().object(target).is_frozen()))
    });
    define_global(realm, "Object", Value::Object(object));

    install_prototype(realm, proto);
}

fn install_prototype(realm: &mut Realm, proto: ObjectId) {
    realm.define_method(proto, "hasOwnProperty", 1, |interp, this, args| {
        let key = interp.to_string(&arg(args, 0))?;
        let target = interp.to_object(&this)?;
        Ok(Value::Bool(interp.realm().get_own_property(target, &key).is_some()))
    });
    realm.define_method(proto, "propertyIsEnumerable", 1, |interp, this, args| {
        let key = interp.to_string(&arg(args, 0))?;
        let target = interp.to_object(&this)?;
        let enumerable = interp.realm().get_own_property(target, &key).is_some_and(|d| d.enumerable);
        Ok(Value::Bool(enumerable))
    });
    realm.define_method(proto, "isPrototypeOf", 1, |interp, this, args| {
        let Value::Object(candidate) = arg(args, 0) else {
            return Ok(Value::Bool(false));
        };
        let target = interp.to_object(&this)?;
        let realm = interp.realm();
        let mut current = realm.object(candidate).proto;
        while let Some(proto) = current {
            if proto == target {
                return Ok(Value::Bool(true));
            }
            current = realm.object(proto).proto;
        }
        Ok(Value::Bool(false))
    });
    realm.define_method(proto, "toString", 0, |interp, this, _| {
        let class = match &this {
            Value::Undefined => "Undefined",
            Value::Null => "Null",
            Value::Bool(_) => "Boolean",
            Value::Number(_) => "Number",
            Value::String(_) => "String",
            Value::Object(id) => interp.realm().class_name(*id),
        };
        Ok(Value::string(format!("[object {class}]")))
    });
    realm.define_method(proto, "valueOf", 0, |interp, this, _| interp.to_object(&this).map(Value::Object));
}

/// `FromPropertyDescriptor`: a plain object with `value`, `writable`, `enumerable` and `configurable`.
fn from_property_descriptor(realm: &mut Realm, desc: PropertyDescriptor) -> ObjectId {
    let id = realm.new_object();
    realm.insert_property(id, "value", PropertyDescriptor::data(desc.value));
    realm.insert_property(id, "writable", PropertyDescriptor::data(Value::Bool(desc.writable)));
    realm.insert_property(id, "enumerable", PropertyDescriptor::data(Value::Bool(desc.enumerable)));
    realm.insert_property(id, "configurable", PropertyDescriptor::data(Value::Bool(desc.configurable)));
    id
}

/// `ToPropertyDescriptor` for data descriptors. Accessor fields are rejected.
fn to_property_descriptor(interp: &mut Interpreter, attributes: &Value) -> Eval<DescriptorPatch> {
    let Some(source) = attributes.as_object() else {
        return Err(interp.type_error("Property description must be an object"));
    };
    let realm = interp.realm();
    let field = |name: &str| realm.has_property(source, name).then(|| realm.get(source, name));

    let has_accessor = field("get").is_some() || field("set").is_some();
    let patch = DescriptorPatch {
        enumerable: field("enumerable").map(|v| v.to_boolean()),
        configurable: field("configurable").map(|v| v.to_boolean()),
        value: field("value"),
        writable: field("writable").map(|v| v.to_boolean()),
    };
    if has_accessor {
        return Err(interp.type_error("Accessor properties are not supported"));
    }
    Ok(patch)
}

fn string_array(realm: &mut Realm, names: Vec<String>) -> Value {
    let items = names.into_iter().map(Value::string).collect();
    Value::Object(realm.new_array(items))
}
