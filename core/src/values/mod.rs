//! The dynamic value model.

pub mod convert;
mod function;
mod object;
mod value;

pub use function::{NativeFn, NativeFunction};
pub use object::{Object, ObjectRef, OwnerId};
pub use value::Value;

#[cfg(test)]
mod value_test;
