//! Harness globals injected into every fixture realm.
//!
//! All of them are installed like global declarations (writable, enumerable, non-configurable) after the host has
//! populated the realm, so a host can never shadow them.

use std::cell::RefCell;
use std::rc::Rc;

use t262_core::errors::ErrorKind;
use t262_core::lang::harness::{HarnessBindingId, binding_name};

use crate::runtime::builtins::error_constructor;
use crate::runtime::{Eval, Interpreter, PropertyDescriptor, Realm, Value};

/// Results handed to `runTestCase`, in call order. `None` means the call returned exactly `true`; otherwise the
/// entry holds a rendering of what came back.
#[derive(Debug, Clone, Default)]
pub(crate) struct Recorder(Rc<RefCell<Vec<Option<String>>>>);

impl Recorder {
    fn record(&self, entry: Option<String>) {
        self.0.borrow_mut().push(entry);
    }

    pub(crate) fn take(&self) -> Vec<Option<String>> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Install every harness binding into `realm`, wiring `runTestCase` to `recorder`.
pub(crate) fn install(realm: &mut Realm, recorder: &Recorder) {
    let fn_global_object = realm.new_native_function(
        binding_name(HarnessBindingId::FnGlobalObject),
        0,
        false,
        |interp, _, _| Ok(interp.global_object()),
    );
    bind(realm, HarnessBindingId::FnGlobalObject, Value::Object(fn_global_object));

    let sink = recorder.clone();
    let run_test_case = realm.new_native_function(
        binding_name(HarnessBindingId::RunTestCase),
        1,
        false,
        move |interp, _, args| {
            let callee = args.first().cloned().unwrap_or(Value::Undefined);
            let returned = interp.call(&callee, Value::Undefined, &[])?;
            if returned.strict_equals(&Value::Bool(true)) {
                sink.record(None);
            } else {
                let shown = interp.describe_value(&returned);
                tracing::debug!(returned = %shown, "test case returned non-true value");
                sink.record(Some(shown));
            }
            Ok(Value::Undefined)
        },
    );
    bind(realm, HarnessBindingId::RunTestCase, Value::Object(run_test_case));

    for id in [HarnessBindingId::Error, HarnessBindingId::Fail] {
        let function = realm.new_native_function(binding_name(id), 1, false, raise_assertion);
        bind(realm, id, Value::Object(function));
    }

    let print = realm.new_native_function(binding_name(HarnessBindingId::Print), 1, false, |interp, _, args| {
        let message = match args.first() {
            Some(value) => interp.to_string(value)?,
            None => "".into(),
        };
        tracing::debug!(target: "t262::fixture", "{message}");
        Ok(Value::Undefined)
    });
    bind(realm, HarnessBindingId::Print, Value::Object(print));

    let fn_exists = realm.new_native_function(binding_name(HarnessBindingId::FnExists), 1, false, |interp, _, args| {
        Ok(Value::Bool(args.iter().all(|arg| interp.realm().is_callable(arg))))
    });
    bind(realm, HarnessBindingId::FnExists, Value::Object(fn_exists));

    let test262_error = error_constructor(realm, ErrorKind::Test262Error);
    bind(realm, HarnessBindingId::Test262Error, Value::Object(test262_error));
}

fn bind(realm: &mut Realm, id: HarnessBindingId, value: Value) {
    let global = realm.global();
    realm.insert_property(global, binding_name(id), PropertyDescriptor::global_binding(value));
}

/// `$ERROR(message)` / `$FAIL(message)`.
fn raise_assertion(interp: &mut Interpreter, _this: Value, args: &[Value]) -> Eval<Value> {
    let message = match args.first() {
        Some(value) if !value.is_undefined() => interp.to_string(value)?,
        _ => "".into(),
    };
    Err(interp.throw(ErrorKind::Test262Error, message))
}
