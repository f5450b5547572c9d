//! Purpose: Build the flat export table of the math module.
//! Exports: `build_table`.
//! Role: Binds export names to JSON-calling closures over `complex` and `vec2`.
//! Invariants: Names follow the `<Group>_<Member>` convention for grouped functions.
//! Invariants: Argument decoding failures are usage errors naming the argument position.
use std::collections::BTreeMap;

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use super::complex::{self, Complex};
use super::vec2::Vec2;
use crate::core::error::{Error, ErrorKind};
use crate::core::export::Export;

fn arg<T: DeserializeOwned>(args: &[Value], idx: usize, expected: &str) -> Result<T, Error> {
    let value = args.get(idx).ok_or_else(|| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("missing argument {idx} ({expected})"))
    })?;
    serde_json::from_value(value.clone()).map_err(|err| {
        Error::new(ErrorKind::Usage)
            .with_message(format!("argument {idx} is not a {expected}"))
            .with_source(err)
    })
}

fn cx(args: &[Value], idx: usize) -> Result<Complex, Error> {
    arg(args, idx, "complex {\"re\",\"im\"}")
}

fn real(args: &[Value], idx: usize) -> Result<f64, Error> {
    arg(args, idx, "number")
}

fn int(args: &[Value], idx: usize) -> Result<i32, Error> {
    arg(args, idx, "32-bit integer")
}

fn vector(args: &[Value], idx: usize) -> Result<Vec2, Error> {
    arg(args, idx, "vector {\"x\",\"y\"}")
}

fn out<T: Serialize>(value: T) -> Result<Value, Error> {
    serde_json::to_value(value).map_err(|err| {
        Error::new(ErrorKind::Internal)
            .with_message("failed to encode result")
            .with_source(err)
    })
}

fn unary(f: fn(&Complex) -> Complex) -> Export {
    Export::function(move |args| out(f(&cx(args, 0)?)))
}

fn binary(f: fn(Complex, Complex) -> Complex) -> Export {
    Export::function(move |args| out(f(cx(args, 0)?, cx(args, 1)?)))
}

fn branched(f: fn(&Complex, i32) -> Complex) -> Export {
    Export::function(move |args| out(f(&cx(args, 0)?, int(args, 1)?)))
}

pub(crate) fn build_table() -> BTreeMap<String, Export> {
    let mut table: Vec<(&str, Export)> = vec![
        // Value-type constructors.
        (
            "Complex",
            Export::constructor(|args| out(Complex::new(real(args, 0)?, real(args, 1)?))),
        ),
        (
            "Vec2",
            Export::constructor(|args| out(Vec2::new(real(args, 0)?, real(args, 1)?))),
        ),
        // Powers and roots are exported without a group prefix.
        (
            "Pow",
            Export::function(|args| out(complex::pow(&cx(args, 0)?, &cx(args, 1)?))),
        ),
        (
            "PowBranched",
            Export::function(|args| {
                out(complex::pow_branched(&cx(args, 0)?, &cx(args, 1)?, int(args, 2)?))
            }),
        ),
        (
            "PowR",
            Export::function(|args| out(complex::pow_r(&cx(args, 0)?, real(args, 1)?))),
        ),
        (
            "PowRBranched",
            Export::function(|args| {
                out(complex::pow_r_branched(&cx(args, 0)?, real(args, 1)?, int(args, 2)?))
            }),
        ),
        (
            "PowZ",
            Export::function(|args| out(complex::pow_z(real(args, 0)?, &cx(args, 1)?))),
        ),
        ("PowN", branched(complex::pow_n)),
        ("Sqrt", unary(complex::sqrt)),
        ("SqrtBranched", branched(complex::sqrt_branched)),
        ("Cbrt", unary(complex::cbrt)),
        ("CbrtBranched", branched(complex::cbrt_branched)),
    ];

    table.extend([
        ("ComplexFunctions_Add", binary(|a, b| a + b)),
        ("ComplexFunctions_Subtract", binary(|a, b| a - b)),
        ("ComplexFunctions_Multiply", binary(|a, b| a * b)),
        ("ComplexFunctions_Divide", binary(|a, b| a / b)),
        (
            "ComplexFunctions_Re",
            Export::function(|args| out(cx(args, 0)?.re)),
        ),
        (
            "ComplexFunctions_Im",
            Export::function(|args| out(cx(args, 0)?.im)),
        ),
        (
            "ComplexFunctions_Construct",
            Export::function(|args| out(Complex::new(real(args, 0)?, real(args, 1)?))),
        ),
        (
            "ComplexFunctions_Abs",
            Export::function(|args| out(cx(args, 0)?.magnitude())),
        ),
        (
            "ComplexFunctions_IsFinite",
            Export::function(|args| out(cx(args, 0)?.is_finite())),
        ),
        ("ComplexFunctions_Sin", unary(complex::sin)),
        ("ComplexFunctions_Cos", unary(complex::cos)),
        ("ComplexFunctions_Tan", unary(complex::tan)),
        ("ComplexFunctions_Sec", unary(complex::sec)),
        ("ComplexFunctions_Csc", unary(complex::csc)),
        ("ComplexFunctions_Cot", unary(complex::cot)),
    ]);

    table.extend([
        (
            "VectorFunctions_Add",
            Export::function(|args| out(vector(args, 0)? + vector(args, 1)?)),
        ),
        (
            "VectorFunctions_Subtract",
            Export::function(|args| out(vector(args, 0)? - vector(args, 1)?)),
        ),
        (
            "VectorFunctions_Dot",
            Export::function(|args| out(vector(args, 0)?.dot(&vector(args, 1)?))),
        ),
        (
            "VectorFunctions_Construct",
            Export::function(|args| out(Vec2::new(real(args, 0)?, real(args, 1)?))),
        ),
        (
            "VectorFunctions_FromComplex",
            Export::function(|args| out(Vec2::from(cx(args, 0)?))),
        ),
    ]);

    table
        .into_iter()
        .map(|(name, export)| (name.to_string(), export))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::build_table;
    use crate::core::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn table_uses_group_prefixes() {
        let table = build_table();
        assert!(table.contains_key("Complex"));
        assert!(table.contains_key("ComplexFunctions_Add"));
        assert!(table.contains_key("VectorFunctions_Dot"));
        assert!(table.contains_key("Sqrt"));
        assert_eq!(
            table.keys().filter(|name| name.starts_with("ComplexFunctions_")).count(),
            15
        );
        assert_eq!(
            table.keys().filter(|name| name.starts_with("VectorFunctions_")).count(),
            5
        );
    }

    #[test]
    fn functions_decode_and_encode_json() {
        let table = build_table();
        let mul = &table["ComplexFunctions_Multiply"];
        let result = mul
            .call(&[json!({ "re": 0.0, "im": 1.0 }), json!({ "re": 0.0, "im": 1.0 })])
            .unwrap();
        assert_eq!(result, json!({ "re": -1.0, "im": 0.0 }));

        let dot = &table["VectorFunctions_Dot"];
        let result = dot
            .call(&[json!({ "x": 1.0, "y": 2.0 }), json!({ "x": 3.0, "y": 4.0 })])
            .unwrap();
        assert_eq!(result, json!(11.0));
    }

    #[test]
    fn bad_arguments_are_usage_errors() {
        let table = build_table();
        let err = table["Sqrt"].call(&[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert_eq!(err.message(), Some("missing argument 0 (complex {\"re\",\"im\"})"));

        let err = table["PowN"]
            .call(&[json!({ "re": 1.0, "im": 0.0 }), json!("two")])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Usage);
        assert_eq!(err.message(), Some("argument 1 is not a 32-bit integer"));
    }
}
