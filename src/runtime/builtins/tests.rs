use t262_core::errors::ErrorKind;
use t262_syntax::parser::parse_source;

use super::*;
use crate::runtime::interpreter::{Abrupt, ExecutionLimits};

fn run(source: &str) -> (Interpreter, Eval<()>) {
    let mut realm = Realm::new();
    install_standard_globals(&mut realm);
    let program = parse_source(source).unwrap();
    let mut interp = Interpreter::new(realm, ExecutionLimits::default());
    let result = interp.run_program(&program);
    (interp, result)
}

fn global(interp: &Interpreter, name: &str) -> Value {
    interp.realm().get(interp.realm().global(), name)
}

fn thrown(interp: &Interpreter, result: Eval<()>) -> String {
    match result {
        Err(Abrupt::Throw(Value::Object(id))) => interp.realm().describe_error(id),
        other => panic!("expected a thrown error, got {other:?}"),
    }
}

#[test]
fn test_escape_has_function_attributes() {
    let source = "
        var d = Object.getOwnPropertyDescriptor(this, 'escape');
        var ok = d.writable === true && d.enumerable === false && d.configurable === true;
        var callable = typeof d.value === 'function';
    ";
    let (interp, result) = run(source);
    assert!(result.is_ok());
    assert_eq!(global(&interp, "ok"), Value::Bool(true));
    assert_eq!(global(&interp, "callable"), Value::Bool(true));
}

#[test]
fn test_value_properties_are_frozen() {
    let source = "
        var d = Object.getOwnPropertyDescriptor(this, 'NaN');
        var frozen = !d.writable && !d.enumerable && !d.configurable;
        NaN = 1; undefined = 2;
        var still = NaN !== NaN && undefined === void 0;
    ";
    let (interp, result) = run(source);
    assert!(result.is_ok());
    assert_eq!(global(&interp, "frozen"), Value::Bool(true));
    assert_eq!(global(&interp, "still"), Value::Bool(true));
}

#[test]
fn test_define_property_defaults_and_redefinition() {
    let source = "
        var o = {};
        Object.defineProperty(o, 'x', { value: 1 });
        var d = Object.getOwnPropertyDescriptor(o, 'x');
        var defaults = !d.writable && !d.enumerable && !d.configurable;
        Object.defineProperty(o, 'x', { value: 2 });
    ";
    let (interp, result) = run(source);
    assert_eq!(global(&interp, "defaults"), Value::Bool(true));
    assert_eq!(thrown(&interp, result), "TypeError: Cannot redefine property: x");
}

#[test]
fn test_accessor_descriptors_are_rejected() {
    let (interp, result) = run("Object.defineProperty({}, 'x', { get: function () { return 1; } });");
    assert_eq!(thrown(&interp, result), "TypeError: Accessor properties are not supported");
}

#[test]
fn test_reflection_key_order() {
    let source = "
        var o = { b: 1, 2: 2, a: 3 };
        Object.defineProperty(o, 'hidden', { value: 0 });
        var names = Object.getOwnPropertyNames(o).join(',');
        var keys = Object.keys(o).join(',');
    ";
    let (interp, _) = run(source);
    assert_eq!(global(&interp, "names"), Value::string("2,b,a,hidden"));
    assert_eq!(global(&interp, "keys"), Value::string("2,b,a"));
}

#[test]
fn test_freeze_and_extensibility() {
    let source = "
        var o = { x: 1 };
        Object.freeze(o);
        o.x = 2; o.y = 3;
        var frozen = Object.isFrozen(o) && !Object.isExtensible(o) && o.x === 1 && !('y' in o);
        var p = Object.preventExtensions({});
        var sealed = !Object.isExtensible(p);
        var proto = Object.getPrototypeOf(p) === Object.prototype;
    ";
    let (interp, result) = run(source);
    assert!(result.is_ok());
    for name in ["frozen", "sealed", "proto"] {
        assert_eq!(global(&interp, name), Value::Bool(true), "{name}");
    }
}

#[test]
fn test_object_prototype_methods() {
    let source = "
        var tag = Object.prototype.toString.call([]) + Object.prototype.toString.call(null);
        var own = ({ a: 1 }).hasOwnProperty('a') && !({}).hasOwnProperty('toString');
        var enumerable = !Object.prototype.propertyIsEnumerable('toString');
        var isProto = Object.prototype.isPrototypeOf({});
    ";
    let (interp, _) = run(source);
    assert_eq!(global(&interp, "tag"), Value::string("[object Array][object Null]"));
    for name in ["own", "enumerable", "isProto"] {
        assert_eq!(global(&interp, name), Value::Bool(true), "{name}");
    }
}

#[test]
fn test_call_and_apply() {
    let source = "
        function sum(a, b) { return a + b + this.k; }
        var ctx = { k: 10 };
        var viaCall = sum.call(ctx, 1, 2);
        var viaApply = sum.apply(ctx, [3, 4]);
    ";
    let (interp, _) = run(source);
    assert_eq!(global(&interp, "viaCall"), Value::Number(13.0));
    assert_eq!(global(&interp, "viaApply"), Value::Number(17.0));
}

#[test]
fn test_array_builtins() {
    let source = "
        var sized = new Array(3).length;
        var joined = [1, null, 'x'].join('-');
        var p = []; var len = p.push(1, 2);
        var found = [1, 2, 3].indexOf(3);
        var missing = [1, 2, 3].indexOf('3');
        var text = String([1, [2, 3]]);
        var isArr = Array.isArray([]) && !Array.isArray({});
    ";
    let (interp, result) = run(source);
    assert!(result.is_ok());
    assert_eq!(global(&interp, "sized"), Value::Number(3.0));
    assert_eq!(global(&interp, "joined"), Value::string("1--x"));
    assert_eq!(global(&interp, "len"), Value::Number(2.0));
    assert_eq!(global(&interp, "found"), Value::Number(2.0));
    assert_eq!(global(&interp, "missing"), Value::Number(-1.0));
    assert_eq!(global(&interp, "text"), Value::string("1,2,3"));
    assert_eq!(global(&interp, "isArr"), Value::Bool(true));

    let (interp, result) = run("new Array(-1);");
    assert_eq!(thrown(&interp, result), "RangeError: Invalid array length");
}

#[test]
fn test_error_constructors() {
    let source = "
        var e = new TypeError('bad');
        var text = e.toString();
        var chain = e instanceof TypeError && e instanceof Error && !(e instanceof RangeError);
        var called = RangeError('x').name;
        var bare = String(new Error());
    ";
    let (interp, result) = run(source);
    assert!(result.is_ok());
    assert_eq!(global(&interp, "text"), Value::string("TypeError: bad"));
    assert_eq!(global(&interp, "chain"), Value::Bool(true));
    assert_eq!(global(&interp, "called"), Value::string("RangeError"));
    assert_eq!(global(&interp, "bare"), Value::string("Error"));
}

#[test]
fn test_builtin_type_errors_are_catchable() {
    let source = "
        var caught;
        try { null.x; } catch (e) { caught = e instanceof TypeError; }
    ";
    let (interp, _) = run(source);
    assert_eq!(global(&interp, "caught"), Value::Bool(true));
    let Value::Object(type_error) = global(&interp, "TypeError") else {
        panic!("TypeError should be installed");
    };
    let proto = interp.realm().intrinsics().error_prototype(ErrorKind::TypeError);
    assert_eq!(interp.realm().get(type_error, "prototype"), Value::Object(proto));
}

#[test]
fn test_primitive_conversions() {
    let source = "
        var s = String(12) + String();
        var n = Number('0x10') + Number();
        var b = Boolean('') || Boolean(0);
        var t = (255).toString() + true.toString();
    ";
    let (interp, _) = run(source);
    assert_eq!(global(&interp, "s"), Value::string("12"));
    assert_eq!(global(&interp, "n"), Value::Number(16.0));
    assert_eq!(global(&interp, "b"), Value::Bool(false));
    assert_eq!(global(&interp, "t"), Value::string("255true"));

    let (interp, result) = run("new String('x');");
    assert_eq!(thrown(&interp, result), "TypeError: String is not a constructor");
}

#[test]
fn test_escape_and_unescape() {
    let source = "
        var e = escape('a b+ü');
        var u = unescape('%u0041%41%zz');
        var checks = isNaN('abc') && !isNaN('12') && isFinite(1) && !isFinite(Infinity);
    ";
    let (interp, _) = run(source);
    assert_eq!(global(&interp, "e"), Value::string("a%20b+%FC"));
    assert_eq!(global(&interp, "u"), Value::string("AA%zz"));
    assert_eq!(global(&interp, "checks"), Value::Bool(true));
}
