//! Realm: the object heap, the global object and the intrinsic prototypes of one fixture run.
//!
//! Every property operation the interpreter and the builtins perform goes through here, so the descriptor rules
//! (`writable`, `enumerable`, `configurable`, extensibility, array `length`) are enforced in one place.
//!
//! ## Notes
//! - Operations never call back into script: there are no accessors, so reading a property is a pure lookup.
//! - Own keys are reported integer indices first (ascending), then other names in insertion order.

use std::collections::HashSet;
use std::rc::Rc;

use t262_core::errors::ErrorKind;
use t262_core::numbers::{array_index, number_to_string};
use t262_syntax::ast::FunctionDecl;

use super::env::ScopeId;
use super::interpreter::{Abrupt, Interpreter};
use super::object::{
    DescriptorPatch, FunctionKind, JsObject, NativeFunction, ObjectKind, PropertyDescriptor, ScriptFunction,
};
use super::value::{ObjectId, Value};

/// Read-only descriptor reflection.
///
/// `Object.getOwnPropertyDescriptor` and `Object.getOwnPropertyNames` are written against this trait, and tests use
/// it to inspect a realm after a run without going through script.
pub trait DescriptorSource {
    /// The own property `key` of `object`, if present.
    fn own_property_descriptor(&self, object: ObjectId, key: &str) -> Option<PropertyDescriptor>;

    /// Own property names of `object`, integer indices first.
    fn own_property_keys(&self, object: ObjectId) -> Vec<String>;
}

/// Error kinds in a fixed order, matching the slots of [`Intrinsics::error_prototypes`].
const ERROR_KINDS: [ErrorKind; 6] = [
    ErrorKind::Error,
    ErrorKind::TypeError,
    ErrorKind::ReferenceError,
    ErrorKind::SyntaxError,
    ErrorKind::RangeError,
    ErrorKind::Test262Error,
];

/// Prototype objects the runtime needs whether or not the host exposes the matching constructors.
#[derive(Debug, Clone)]
pub struct Intrinsics {
    pub object_prototype: ObjectId,
    pub function_prototype: ObjectId,
    pub array_prototype: ObjectId,
    /// Lookup targets for property reads on string, number and boolean primitives.
    pub string_prototype: ObjectId,
    pub number_prototype: ObjectId,
    pub boolean_prototype: ObjectId,
    error_prototypes: [ObjectId; 6],
}

impl Intrinsics {
    pub fn error_prototype(&self, kind: ErrorKind) -> ObjectId {
        let slot = ERROR_KINDS.iter().position(|k| *k == kind).unwrap_or(0);
        self.error_prototypes[slot]
    }
}

#[derive(Debug)]
pub struct Realm {
    heap: Vec<JsObject>,
    global: ObjectId,
    intrinsics: Intrinsics,
}

impl Default for Realm {
    fn default() -> Self {
        Self::new()
    }
}

impl Realm {
    /// A realm with the intrinsic prototypes and an empty global object.
    ///
    /// Constructors and global functions are added by a [`HostContext`](crate::host::HostContext).
    pub fn new() -> Self {
        let mut heap = Vec::new();
        let mut alloc = |obj: JsObject| {
            heap.push(obj);
            ObjectId(heap.len() - 1)
        };

        let object_prototype = alloc(JsObject::new(None, ObjectKind::Ordinary));
        let function_prototype = alloc(JsObject::new(
            Some(object_prototype),
            ObjectKind::Function(FunctionKind::Native(NativeFunction {
                name: "".into(),
                call: Rc::new(|_, _, _| Ok(Value::Undefined)),
                constructor: false,
            })),
        ));
        let array_prototype = alloc(JsObject::new(Some(object_prototype), ObjectKind::Array));
        let string_prototype = alloc(JsObject::new(Some(object_prototype), ObjectKind::Ordinary));
        let number_prototype = alloc(JsObject::new(Some(object_prototype), ObjectKind::Ordinary));
        let boolean_prototype = alloc(JsObject::new(Some(object_prototype), ObjectKind::Ordinary));
        let base_error = alloc(JsObject::new(Some(object_prototype), ObjectKind::Error));
        let mut error_prototypes = [base_error; 6];
        for slot in error_prototypes.iter_mut().skip(1) {
            *slot = alloc(JsObject::new(Some(base_error), ObjectKind::Error));
        }
        let global = alloc(JsObject::new(Some(object_prototype), ObjectKind::Ordinary));

        let mut realm = Self {
            heap,
            global,
            intrinsics: Intrinsics {
                object_prototype,
                function_prototype,
                array_prototype,
                string_prototype,
                number_prototype,
                boolean_prototype,
                error_prototypes,
            },
        };

        realm.insert_property(function_prototype, "length", PropertyDescriptor::frozen(Value::Number(0.0)));
        realm.insert_property(
            array_prototype,
            "length",
            PropertyDescriptor {
                value: Value::Number(0.0),
                writable: true,
                enumerable: false,
                configurable: false,
            },
        );
        for (kind, proto) in ERROR_KINDS.iter().zip(error_prototypes) {
            realm.insert_property(proto, "name", PropertyDescriptor::hidden(Value::string(kind.name())));
            realm.insert_property(proto, "message", PropertyDescriptor::hidden(Value::string("")));
        }
        realm
    }

    pub fn global(&self) -> ObjectId {
        self.global
    }

    pub fn intrinsics(&self) -> &Intrinsics {
        &self.intrinsics
    }

    // ========================================================================
    // Heap
    // ========================================================================

    pub fn alloc(&mut self, obj: JsObject) -> ObjectId {
        self.heap.push(obj);
        ObjectId(self.heap.len() - 1)
    }

    pub fn object(&self, id: ObjectId) -> &JsObject {
        &self.heap[id.0]
    }

    pub fn object_mut(&mut self, id: ObjectId) -> &mut JsObject {
        &mut self.heap[id.0]
    }

    /// Number of objects allocated in this realm.
    pub fn heap_len(&self) -> usize {
        self.heap.len()
    }

    pub fn new_object(&mut self) -> ObjectId {
        let proto = self.intrinsics.object_prototype;
        self.alloc(JsObject::new(Some(proto), ObjectKind::Ordinary))
    }

    pub fn new_array(&mut self, items: Vec<Value>) -> ObjectId {
        let proto = self.intrinsics.array_prototype;
        let id = self.alloc(JsObject::new(Some(proto), ObjectKind::Array));
        let len = items.len();
        for (index, item) in items.into_iter().enumerate() {
            self.insert_property(id, &index.to_string(), PropertyDescriptor::data(item));
        }
        self.insert_property(
            id,
            "length",
            PropertyDescriptor {
                value: Value::Number(len as f64),
                writable: true,
                enumerable: false,
                configurable: false,
            },
        );
        id
    }

    /// An error object of `kind`. An empty message is inherited from the prototype instead of stored.
    pub fn new_error(&mut self, kind: ErrorKind, message: &str) -> ObjectId {
        let proto = self.intrinsics.error_prototype(kind);
        self.new_error_with_proto(proto, message)
    }

    pub fn new_error_with_proto(&mut self, proto: ObjectId, message: &str) -> ObjectId {
        let id = self.alloc(JsObject::new(Some(proto), ObjectKind::Error));
        if !message.is_empty() {
            self.insert_property(id, "message", PropertyDescriptor::hidden(Value::string(message)));
        }
        id
    }

    /// A built-in function object with a non-writable `length`.
    pub fn new_native_function(
        &mut self,
        name: &str,
        arity: usize,
        constructor: bool,
        call: impl Fn(&mut Interpreter, Value, &[Value]) -> Result<Value, Abrupt> + 'static,
    ) -> ObjectId {
        let proto = self.intrinsics.function_prototype;
        let id = self.alloc(JsObject::new(
            Some(proto),
            ObjectKind::Function(FunctionKind::Native(NativeFunction {
                name: name.into(),
                call: Rc::new(call),
                constructor,
            })),
        ));
        self.insert_property(id, "length", PropertyDescriptor::frozen(Value::Number(arity as f64)));
        id
    }

    /// Install a built-in method on `target` as a non-enumerable property.
    pub fn define_method(
        &mut self,
        target: ObjectId,
        name: &str,
        arity: usize,
        call: impl Fn(&mut Interpreter, Value, &[Value]) -> Result<Value, Abrupt> + 'static,
    ) -> ObjectId {
        let function = self.new_native_function(name, arity, false, call);
        self.insert_property(target, name, PropertyDescriptor::hidden(Value::Object(function)));
        function
    }

    /// A closure over `scope`, with its own `prototype` object whose `constructor` points back.
    pub fn new_script_function(&mut self, decl: Rc<FunctionDecl>, scope: ScopeId) -> ObjectId {
        let arity = decl.params.len();
        let proto = self.intrinsics.function_prototype;
        let id = self.alloc(JsObject::new(
            Some(proto),
            ObjectKind::Function(FunctionKind::Script(ScriptFunction { decl, scope })),
        ));
        self.insert_property(id, "length", PropertyDescriptor::frozen(Value::Number(arity as f64)));

        let prototype = self.new_object();
        self.insert_property(prototype, "constructor", PropertyDescriptor::hidden(Value::Object(id)));
        self.insert_property(
            id,
            "prototype",
            PropertyDescriptor {
                value: Value::Object(prototype),
                writable: true,
                enumerable: false,
                configurable: false,
            },
        );
        id
    }

    // ========================================================================
    // Property access
    // ========================================================================

    /// Set an own property without validation. For realm setup and hosts only.
    pub fn insert_property(&mut self, id: ObjectId, key: &str, desc: PropertyDescriptor) {
        self.object_mut(id).properties.insert(key, desc);
    }

    pub fn get_own_property(&self, id: ObjectId, key: &str) -> Option<&PropertyDescriptor> {
        self.object(id).properties.get(key)
    }

    /// The property `key` found on `id` or its prototype chain.
    pub fn lookup(&self, id: ObjectId, key: &str) -> Option<&PropertyDescriptor> {
        let mut current = Some(id);
        while let Some(obj) = current {
            if let Some(desc) = self.get_own_property(obj, key) {
                return Some(desc);
            }
            current = self.object(obj).proto;
        }
        None
    }

    /// `[[Get]]`: the value of `key`, or `undefined`.
    pub fn get(&self, id: ObjectId, key: &str) -> Value {
        self.lookup(id, key).map_or(Value::Undefined, |d| d.value.clone())
    }

    pub fn has_property(&self, id: ObjectId, key: &str) -> bool {
        self.lookup(id, key).is_some()
    }

    /// `[[Put]]` without throwing: returns `false` when the write is refused.
    ///
    /// A refused write is silent in non-strict code, so callers usually ignore the result.
    pub fn put(&mut self, id: ObjectId, key: &str, value: Value) -> bool {
        if let Some(own) = self.get_own_property(id, key) {
            if !own.writable {
                return false;
            }
            return self.define_own_property(
                id,
                key,
                DescriptorPatch {
                    value: Some(value),
                    ..Default::default()
                },
            );
        }
        if self.lookup(id, key).is_some_and(|inherited| !inherited.writable) {
            return false;
        }
        self.define_own_property(id, key, PropertyDescriptor::data(value).into())
    }

    /// `[[DefineOwnProperty]]` for data properties, including the array `length` and index rules.
    ///
    /// For arrays, a `length` value must already be a valid array length (a number equal to its `ToUint32`).
    pub fn define_own_property(&mut self, id: ObjectId, key: &str, patch: DescriptorPatch) -> bool {
        if matches!(self.object(id).kind, ObjectKind::Array) {
            if key == "length" {
                return self.define_array_length(id, patch);
            }
            if let Some(index) = array_index(key) {
                return self.define_array_index(id, key, index, patch);
            }
        }
        self.define_ordinary(id, key, patch)
    }

    fn define_ordinary(&mut self, id: ObjectId, key: &str, patch: DescriptorPatch) -> bool {
        let obj = self.object_mut(id);
        let Some(current) = obj.properties.get_mut(key) else {
            if !obj.extensible {
                return false;
            }
            obj.properties.insert(key, patch.into_descriptor());
            return true;
        };

        if patch.is_empty() || patch.is_noop_for(current) {
            return true;
        }
        if !current.configurable {
            if patch.configurable == Some(true) {
                return false;
            }
            if patch.enumerable.is_some_and(|e| e != current.enumerable) {
                return false;
            }
            if !current.writable {
                if patch.writable == Some(true) {
                    return false;
                }
                if patch.value.as_ref().is_some_and(|v| !v.same_value(&current.value)) {
                    return false;
                }
            }
        }
        patch.apply_to(current);
        true
    }

    pub fn array_length(&self, id: ObjectId) -> u32 {
        match self.get_own_property(id, "length").map(|d| &d.value) {
            Some(Value::Number(n)) => *n as u32,
            _ => 0,
        }
    }

    fn set_array_length_raw(&mut self, id: ObjectId, len: u32) {
        if let Some(desc) = self.object_mut(id).properties.get_mut("length") {
            desc.value = Value::Number(f64::from(len));
        }
    }

    fn define_array_length(&mut self, id: ObjectId, mut patch: DescriptorPatch) -> bool {
        let Some(Value::Number(requested)) = patch.value.clone() else {
            return self.define_ordinary(id, "length", patch);
        };
        let new_len = requested as u32;
        let old_len = self.array_length(id);
        if new_len >= old_len {
            return self.define_ordinary(id, "length", patch);
        }
        if self.get_own_property(id, "length").is_some_and(|d| !d.writable) {
            return false;
        }

        // Shrinking: delete the trailing elements first, making `length` read-only only afterwards.
        let make_read_only = patch.writable == Some(false);
        if make_read_only {
            patch.writable = None;
        }
        if !self.define_ordinary(id, "length", patch) {
            return false;
        }

        let mut doomed: Vec<u32> = self
            .object(id)
            .properties
            .keys()
            .filter_map(|k| array_index(k))
            .filter(|i| *i >= new_len)
            .collect();
        doomed.sort_unstable_by(|a, b| b.cmp(a));
        for index in doomed {
            if !self.delete(id, &index.to_string()) {
                self.set_array_length_raw(id, index + 1);
                if make_read_only {
                    self.freeze_array_length(id);
                }
                return false;
            }
        }
        if make_read_only {
            self.freeze_array_length(id);
        }
        true
    }

    fn freeze_array_length(&mut self, id: ObjectId) {
        if let Some(desc) = self.object_mut(id).properties.get_mut("length") {
            desc.writable = false;
        }
    }

    fn define_array_index(&mut self, id: ObjectId, key: &str, index: u32, patch: DescriptorPatch) -> bool {
        let old_len = self.array_length(id);
        let length_writable = self.get_own_property(id, "length").is_some_and(|d| d.writable);
        if index >= old_len && !length_writable {
            return false;
        }
        if !self.define_ordinary(id, key, patch) {
            return false;
        }
        if index >= old_len {
            self.set_array_length_raw(id, index + 1);
        }
        true
    }

    /// `[[Delete]]`: `false` only for a non-configurable own property.
    pub fn delete(&mut self, id: ObjectId, key: &str) -> bool {
        match self.get_own_property(id, key) {
            None => true,
            Some(desc) if !desc.configurable => false,
            Some(_) => {
                self.object_mut(id).properties.remove(key);
                true
            }
        }
    }

    /// Own keys: array indices ascending, then the rest in insertion order.
    pub fn own_keys(&self, id: ObjectId) -> Vec<Rc<str>> {
        let mut indices: Vec<(u32, Rc<str>)> = Vec::new();
        let mut names: Vec<Rc<str>> = Vec::new();
        for key in self.object(id).properties.keys() {
            match array_index(key) {
                Some(i) => indices.push((i, key.clone())),
                None => names.push(key.clone()),
            }
        }
        indices.sort_by_key(|(i, _)| *i);
        indices.into_iter().map(|(_, k)| k).chain(names).collect()
    }

    /// Names `for-in` visits: enumerable properties along the prototype chain, shadowed names skipped.
    pub fn for_in_keys(&self, id: ObjectId) -> Vec<Rc<str>> {
        let mut seen: HashSet<Rc<str>> = HashSet::new();
        let mut out = Vec::new();
        let mut current = Some(id);
        while let Some(obj) = current {
            for key in self.own_keys(obj) {
                let enumerable = self.get_own_property(obj, &key).is_some_and(|d| d.enumerable);
                if seen.insert(key.clone()) && enumerable {
                    out.push(key);
                }
            }
            current = self.object(obj).proto;
        }
        out
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn is_callable(&self, value: &Value) -> bool {
        value.as_object().is_some_and(|id| self.object(id).is_callable())
    }

    /// `true` if `id` inherits from the intrinsic prototype of `kind`.
    pub fn is_error_of(&self, id: ObjectId, kind: ErrorKind) -> bool {
        let target = self.intrinsics.error_prototype(kind);
        let mut current = self.object(id).proto;
        while let Some(proto) = current {
            if proto == target {
                return true;
            }
            current = self.object(proto).proto;
        }
        false
    }

    pub fn class_name(&self, id: ObjectId) -> &'static str {
        self.object(id).kind.class_name()
    }

    /// `name: message` of an error-like object, read without running script.
    ///
    /// Used when a thrown value escapes the fixture and has to be described outside the interpreter.
    pub fn describe_error(&self, id: ObjectId) -> String {
        let text = |value: Value| match value {
            Value::Undefined => None,
            Value::Number(n) => Some(number_to_string(n)),
            other => other.primitive_to_string().map(|s| s.to_string()),
        };
        let name = text(self.get(id, "name")).unwrap_or_else(|| "Error".to_string());
        let message = text(self.get(id, "message")).unwrap_or_default();
        match (name.is_empty(), message.is_empty()) {
            (_, true) => name,
            (true, false) => message,
            (false, false) => format!("{name}: {message}"),
        }
    }
}

impl DescriptorSource for Realm {
    fn own_property_descriptor(&self, object: ObjectId, key: &str) -> Option<PropertyDescriptor> {
        self.get_own_property(object, key).cloned()
    }

    fn own_property_keys(&self, object: ObjectId) -> Vec<String> {
        self.own_keys(object).iter().map(|k| k.to_string()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_writable_non_configurable_rejects_changes() {
        let mut realm = Realm::new();
        let obj = realm.new_object();
        assert!(realm.define_own_property(obj, "x", PropertyDescriptor::frozen(Value::Number(1.0)).into()));

        let rewrite = DescriptorPatch {
            value: Some(Value::Number(2.0)),
            ..Default::default()
        };
        assert!(!realm.define_own_property(obj, "x", rewrite));
        let same = DescriptorPatch {
            value: Some(Value::Number(1.0)),
            ..Default::default()
        };
        assert!(realm.define_own_property(obj, "x", same));
        assert!(!realm.put(obj, "x", Value::Number(3.0)));
        assert!(!realm.delete(obj, "x"));
        assert_eq!(realm.get(obj, "x"), Value::Number(1.0));
    }

    #[test]
    fn test_configurable_property_can_change_flags() {
        let mut realm = Realm::new();
        let obj = realm.new_object();
        realm.put(obj, "x", Value::Bool(true));
        let patch = DescriptorPatch {
            enumerable: Some(false),
            writable: Some(false),
            ..Default::default()
        };
        assert!(realm.define_own_property(obj, "x", patch));
        let desc = realm.own_property_descriptor(obj, "x").unwrap();
        assert!(!desc.enumerable && !desc.writable && desc.configurable);
    }

    #[test]
    fn test_inherited_read_only_blocks_put() {
        let mut realm = Realm::new();
        let proto = realm.new_object();
        realm.insert_property(proto, "k", PropertyDescriptor::frozen(Value::Null));
        let child = realm.alloc(JsObject::new(Some(proto), ObjectKind::Ordinary));
        assert!(!realm.put(child, "k", Value::Bool(true)));
        assert!(realm.get_own_property(child, "k").is_none());
    }

    #[test]
    fn test_non_extensible_rejects_new_properties() {
        let mut realm = Realm::new();
        let obj = realm.new_object();
        realm.object_mut(obj).extensible = false;
        assert!(!realm.put(obj, "fresh", Value::Null));
        assert!(!realm.has_property(obj, "fresh"));
    }

    #[test]
    fn test_array_index_grows_length_and_length_truncates() {
        let mut realm = Realm::new();
        let arr = realm.new_array(vec![Value::Number(1.0), Value::Number(2.0)]);
        assert!(realm.put(arr, "5", Value::Null));
        assert_eq!(realm.array_length(arr), 6);

        assert!(realm.put(arr, "length", Value::Number(1.0)));
        assert_eq!(realm.array_length(arr), 1);
        assert_eq!(realm.own_property_keys(arr), vec!["0", "length"]);
    }

    #[test]
    fn test_array_truncation_stops_at_non_configurable_element() {
        let mut realm = Realm::new();
        let arr = realm.new_array(vec![Value::Null, Value::Null, Value::Null]);
        realm.insert_property(arr, "1", PropertyDescriptor::frozen(Value::Null));
        assert!(!realm.put(arr, "length", Value::Number(0.0)));
        assert_eq!(realm.array_length(arr), 2);
    }

    #[test]
    fn test_own_keys_orders_indices_first() {
        let mut realm = Realm::new();
        let obj = realm.new_object();
        for key in ["b", "10", "a", "2"] {
            realm.put(obj, key, Value::Null);
        }
        assert_eq!(realm.own_property_keys(obj), vec!["2", "10", "b", "a"]);
    }

    #[test]
    fn test_for_in_keys_skip_shadowed_and_hidden() {
        let mut realm = Realm::new();
        let proto = realm.new_object();
        realm.put(proto, "inherited", Value::Null);
        realm.put(proto, "shadowed", Value::Null);
        let child = realm.alloc(JsObject::new(Some(proto), ObjectKind::Ordinary));
        realm.put(child, "own", Value::Null);
        realm.insert_property(child, "shadowed", PropertyDescriptor::hidden(Value::Null));

        let keys: Vec<String> = realm.for_in_keys(child).iter().map(|k| k.to_string()).collect();
        assert_eq!(keys, vec!["own", "inherited"]);
    }

    #[test]
    fn test_errors_inherit_from_their_kind() {
        let mut realm = Realm::new();
        let err = realm.new_error(ErrorKind::TypeError, "bad");
        assert!(realm.is_error_of(err, ErrorKind::TypeError));
        assert!(realm.is_error_of(err, ErrorKind::Error));
        assert!(!realm.is_error_of(err, ErrorKind::RangeError));
        assert_eq!(realm.describe_error(err), "TypeError: bad");

        let bare = realm.new_error(ErrorKind::Test262Error, "");
        assert_eq!(realm.describe_error(bare), "Test262Error");
    }
}
