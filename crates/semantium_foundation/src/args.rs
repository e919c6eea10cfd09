//! Argument checks for parametric word handlers.

use crate::Result;
use crate::error::Error;
use crate::types::Type;
use crate::value::Value;

/// Checks that exactly `expected` parameters were passed.
///
/// # Errors
///
/// Returns `ArityMismatch` otherwise.
pub fn expect_arity(args: &[Value], expected: usize) -> Result<()> {
    if args.len() == expected {
        Ok(())
    } else {
        Err(Error::arity_mismatch(expected.to_string(), args.len()))
    }
}

/// Checks that between `min` and `max` parameters (inclusive) were passed.
///
/// # Errors
///
/// Returns `ArityMismatch` otherwise.
pub fn expect_arity_range(args: &[Value], min: usize, max: usize) -> Result<()> {
    if (min..=max).contains(&args.len()) {
        Ok(())
    } else {
        Err(Error::arity_mismatch(format!("{min}..={max}"), args.len()))
    }
}

/// Returns the parameter at `index` if it is present and of type `expected`.
///
/// # Errors
///
/// Returns `ArityMismatch` if there is no parameter at `index`, or
/// `TypeMismatch` if it has another type.
pub fn expect_param<'a>(args: &'a [Value], index: usize, expected: &Type) -> Result<&'a Value> {
    let value = args
        .get(index)
        .ok_or_else(|| Error::arity_mismatch(format!("at least {}", index + 1), args.len()))?;
    let actual = value.value_type();
    if expected.accepts(&actual) {
        Ok(value)
    } else {
        Err(Error::type_mismatch(expected.clone(), actual))
    }
}
