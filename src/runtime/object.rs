//! Heap objects, property descriptors and the own-property table.
//!
//! Only data properties exist: every property is a [`PropertyDescriptor`] with a value and three flags.
//! Validation of descriptor changes (`[[DefineOwnProperty]]`) lives on [`Realm`](super::Realm) because arrays
//! need to see their `length` while defining an index.

use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use t262_syntax::ast::FunctionDecl;

use super::env::ScopeId;
use super::interpreter::{Abrupt, Interpreter};
use super::value::{ObjectId, Value};

/// Explicit four-field data property record.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyDescriptor {
    pub value: Value,
    pub writable: bool,
    pub enumerable: bool,
    pub configurable: bool,
}

impl PropertyDescriptor {
    /// All flags set: what plain assignment and object literals create.
    pub fn data(value: Value) -> Self {
        Self {
            value,
            writable: true,
            enumerable: true,
            configurable: true,
        }
    }

    /// Writable and configurable but not enumerable: built-in methods and constructors.
    pub fn hidden(value: Value) -> Self {
        Self {
            value,
            writable: true,
            enumerable: false,
            configurable: true,
        }
    }

    /// No flags set: `NaN`, `Infinity`, `undefined`, function `length`.
    pub fn frozen(value: Value) -> Self {
        Self {
            value,
            writable: false,
            enumerable: false,
            configurable: false,
        }
    }

    /// Descriptor for a `var` or function declared in global code.
    pub fn global_binding(value: Value) -> Self {
        Self {
            value,
            writable: true,
            enumerable: true,
            configurable: false,
        }
    }
}

/// A partial descriptor, as passed to `Object.defineProperty`. Absent fields leave the current value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DescriptorPatch {
    pub value: Option<Value>,
    pub writable: Option<bool>,
    pub enumerable: Option<bool>,
    pub configurable: Option<bool>,
}

impl DescriptorPatch {
    pub fn is_empty(&self) -> bool {
        self.value.is_none() && self.writable.is_none() && self.enumerable.is_none() && self.configurable.is_none()
    }

    /// Every present field already equals the corresponding field of `current`.
    pub fn is_noop_for(&self, current: &PropertyDescriptor) -> bool {
        self.value.as_ref().is_none_or(|v| v.same_value(&current.value))
            && self.writable.is_none_or(|w| w == current.writable)
            && self.enumerable.is_none_or(|e| e == current.enumerable)
            && self.configurable.is_none_or(|c| c == current.configurable)
    }

    /// Overwrite the present fields of `target`.
    pub fn apply_to(&self, target: &mut PropertyDescriptor) {
        if let Some(value) = &self.value {
            target.value = value.clone();
        }
        if let Some(writable) = self.writable {
            target.writable = writable;
        }
        if let Some(enumerable) = self.enumerable {
            target.enumerable = enumerable;
        }
        if let Some(configurable) = self.configurable {
            target.configurable = configurable;
        }
    }

    /// A fresh property built from the present fields; absent ones default to `undefined`/`false`.
    pub fn into_descriptor(self) -> PropertyDescriptor {
        PropertyDescriptor {
            value: self.value.unwrap_or(Value::Undefined),
            writable: self.writable.unwrap_or(false),
            enumerable: self.enumerable.unwrap_or(false),
            configurable: self.configurable.unwrap_or(false),
        }
    }
}

impl From<PropertyDescriptor> for DescriptorPatch {
    fn from(desc: PropertyDescriptor) -> Self {
        Self {
            value: Some(desc.value),
            writable: Some(desc.writable),
            enumerable: Some(desc.enumerable),
            configurable: Some(desc.configurable),
        }
    }
}

/// Own properties in insertion order, with a name index.
#[derive(Debug, Clone, Default)]
pub struct PropertyMap {
    entries: Vec<(Rc<str>, PropertyDescriptor)>,
    index: HashMap<Rc<str>, usize>,
}

impl PropertyMap {
    pub fn get(&self, key: &str) -> Option<&PropertyDescriptor> {
        self.index.get(key).map(|&i| &self.entries[i].1)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut PropertyDescriptor> {
        self.index.get(key).map(|&i| &mut self.entries[i].1)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    /// Insert or replace; a replaced property keeps its position.
    pub fn insert(&mut self, key: &str, desc: PropertyDescriptor) {
        if let Some(slot) = self.get_mut(key) {
            *slot = desc;
            return;
        }
        let key: Rc<str> = key.into();
        self.index.insert(key.clone(), self.entries.len());
        self.entries.push((key, desc));
    }

    pub fn remove(&mut self, key: &str) -> Option<PropertyDescriptor> {
        let position = self.index.remove(key)?;
        let (_, desc) = self.entries.remove(position);
        for slot in self.index.values_mut() {
            if *slot > position {
                *slot -= 1;
            }
        }
        Some(desc)
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &Rc<str>> {
        self.entries.iter().map(|(k, _)| k)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Rc<str>, &PropertyDescriptor)> {
        self.entries.iter().map(|(k, d)| (k, d))
    }

    pub fn values_mut(&mut self) -> impl Iterator<Item = &mut PropertyDescriptor> {
        self.entries.iter_mut().map(|(_, d)| d)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Signature of a built-in function: `(interpreter, this, arguments)`.
pub type NativeFn = Rc<dyn Fn(&mut Interpreter, Value, &[Value]) -> Result<Value, Abrupt>>;

#[derive(Clone)]
pub struct NativeFunction {
    pub name: Rc<str>,
    pub call: NativeFn,
    /// Whether `new` may be applied. Constructors receive a fresh object as `this`.
    pub constructor: bool,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("constructor", &self.constructor)
            .finish_non_exhaustive()
    }
}

/// A function defined in fixture source, closed over the scope it was created in.
#[derive(Debug, Clone)]
pub struct ScriptFunction {
    pub decl: Rc<FunctionDecl>,
    pub scope: ScopeId,
}

#[derive(Debug, Clone)]
pub enum FunctionKind {
    Script(ScriptFunction),
    Native(NativeFunction),
}

/// Internal class of an object; drives `Object.prototype.toString` and array `length` upkeep.
#[derive(Debug, Clone)]
pub enum ObjectKind {
    Ordinary,
    Array,
    Error,
    Arguments,
    Function(FunctionKind),
}

impl ObjectKind {
    /// The `[[Class]]` name.
    pub fn class_name(&self) -> &'static str {
        match self {
            ObjectKind::Ordinary => "Object",
            ObjectKind::Array => "Array",
            ObjectKind::Error => "Error",
            ObjectKind::Arguments => "Arguments",
            ObjectKind::Function(_) => "Function",
        }
    }
}

#[derive(Debug, Clone)]
pub struct JsObject {
    pub proto: Option<ObjectId>,
    pub extensible: bool,
    pub kind: ObjectKind,
    pub properties: PropertyMap,
}

impl JsObject {
    pub fn new(proto: Option<ObjectId>, kind: ObjectKind) -> Self {
        Self {
            proto,
            extensible: true,
            kind,
            properties: PropertyMap::default(),
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self.kind, ObjectKind::Function(_))
    }

    pub fn is_constructor(&self) -> bool {
        match &self.kind {
            ObjectKind::Function(FunctionKind::Script(_)) => true,
            ObjectKind::Function(FunctionKind::Native(native)) => native.constructor,
            _ => false,
        }
    }

    /// Non-extensible with every own property non-writable and non-configurable.
    pub fn is_frozen(&self) -> bool {
        !self.extensible && self.properties.iter().all(|(_, d)| !d.writable && !d.configurable)
    }

    pub fn freeze(&mut self) {
        self.extensible = false;
        for desc in self.properties.values_mut() {
            desc.writable = false;
            desc.configurable = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_property_map_keeps_insertion_order_after_remove() {
        let mut map = PropertyMap::default();
        for key in ["a", "b", "c"] {
            map.insert(key, PropertyDescriptor::data(Value::Null));
        }
        map.remove("a");
        map.insert("a", PropertyDescriptor::data(Value::Null));
        map.insert("b", PropertyDescriptor::hidden(Value::Bool(true)));

        let keys: Vec<&str> = map.keys().map(|k| &**k).collect();
        assert_eq!(keys, vec!["b", "c", "a"]);
        assert_eq!(map.get("b").map(|d| d.enumerable), Some(false));
        assert_eq!(map.get("c").map(|d| d.enumerable), Some(true));
    }

    #[test]
    fn test_patch_noop_uses_same_value() {
        let current = PropertyDescriptor::frozen(Value::Number(f64::NAN));
        let patch = DescriptorPatch {
            value: Some(Value::Number(f64::NAN)),
            writable: Some(false),
            ..Default::default()
        };
        assert!(patch.is_noop_for(&current));

        let zero = PropertyDescriptor::frozen(Value::Number(0.0));
        let negative_zero = DescriptorPatch {
            value: Some(Value::Number(-0.0)),
            ..Default::default()
        };
        assert!(!negative_zero.is_noop_for(&zero));
    }

    #[test]
    fn test_fresh_descriptor_defaults_to_false() {
        let desc = DescriptorPatch {
            value: Some(Value::Bool(true)),
            ..Default::default()
        }
        .into_descriptor();
        assert_eq!(desc, PropertyDescriptor::frozen(Value::Bool(true)));
    }
}
