//! Script runtime: values, the object model, realms and the interpreter.
//!
//! A fresh [`Realm`] is created for every fixture run, so no state survives from one run to the next.

pub mod builtins;
pub mod env;
pub mod interpreter;
pub mod object;
pub mod realm;
pub mod value;

pub use interpreter::{Abrupt, Eval, ExecutionLimits, HaltReason, Interpreter};
pub use object::{DescriptorPatch, PropertyDescriptor};
pub use realm::{DescriptorSource, Realm};
pub use value::{ObjectId, Value};
