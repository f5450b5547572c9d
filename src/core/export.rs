//! Purpose: Represent one value bound on a wrapped module's export surface.
//! Exports: `Export`, `ExportKind`, `Callable`.
//! Role: Opaque handle shared between the live surface, snapshots, namespaces and pass-through.
//! Invariants: Cloning an `Export` never copies the underlying value; identity is `Arc` identity.
//! Invariants: The adapter never inspects or validates call signatures; JSON values in, JSON value out.
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::error::{Error, ErrorKind};

pub type Callable = dyn Fn(&[Value]) -> Result<Value, Error> + Send + Sync;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ExportKind {
    Function,
    Constructor,
    Value,
}

impl ExportKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ExportKind::Function => "function",
            ExportKind::Constructor => "constructor",
            ExportKind::Value => "value",
        }
    }
}

enum Binding {
    Function(Box<Callable>),
    Constructor(Box<Callable>),
    Value(Value),
}

#[derive(Clone)]
pub struct Export {
    binding: Arc<Binding>,
}

impl Export {
    pub fn function<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self::from_binding(Binding::Function(Box::new(f)))
    }

    /// A value-type constructor; called like a function, reported separately.
    pub fn constructor<F>(f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<Value, Error> + Send + Sync + 'static,
    {
        Self::from_binding(Binding::Constructor(Box::new(f)))
    }

    pub fn value(value: Value) -> Self {
        Self::from_binding(Binding::Value(value))
    }

    fn from_binding(binding: Binding) -> Self {
        Self {
            binding: Arc::new(binding),
        }
    }

    pub fn kind(&self) -> ExportKind {
        match self.binding.as_ref() {
            Binding::Function(_) => ExportKind::Function,
            Binding::Constructor(_) => ExportKind::Constructor,
            Binding::Value(_) => ExportKind::Value,
        }
    }

    pub fn is_callable(&self) -> bool {
        !matches!(self.binding.as_ref(), Binding::Value(_))
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self.binding.as_ref() {
            Binding::Value(value) => Some(value),
            _ => None,
        }
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, Error> {
        match self.binding.as_ref() {
            Binding::Function(f) | Binding::Constructor(f) => f(args),
            Binding::Value(_) => Err(Error::new(ErrorKind::NotCallable)
                .with_message("export is a plain value")
                .with_hint("Read it with `get` instead of calling it.")),
        }
    }

    /// True when both handles refer to the same bound value.
    pub fn same(&self, other: &Export) -> bool {
        Arc::ptr_eq(&self.binding, &other.binding)
    }
}

impl fmt::Debug for Export {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut out = f.debug_struct("Export");
        out.field("kind", &self.kind());
        if let Some(value) = self.as_value() {
            out.field("value", value);
        }
        out.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{Export, ExportKind};
    use crate::core::error::ErrorKind;
    use serde_json::{Value, json};

    #[test]
    fn clones_share_identity() {
        let add = Export::function(|args| {
            let sum: f64 = args.iter().filter_map(Value::as_f64).sum();
            Ok(json!(sum))
        });
        let copy = add.clone();
        let twin = Export::function(|_| Ok(Value::Null));

        assert!(add.same(&copy));
        assert!(!add.same(&twin));
        assert_eq!(copy.call(&[json!(1.5), json!(2.0)]).unwrap(), json!(3.5));
    }

    #[test]
    fn plain_values_are_not_callable() {
        let scalar = Export::value(json!(2.5));
        assert_eq!(scalar.kind(), ExportKind::Value);
        assert!(!scalar.is_callable());
        assert_eq!(scalar.as_value(), Some(&json!(2.5)));

        let err = scalar.call(&[]).expect_err("value call");
        assert_eq!(err.kind(), ErrorKind::NotCallable);
    }

    #[test]
    fn constructors_are_callable() {
        let ctor = Export::constructor(|args| Ok(json!({ "re": args[0], "im": args[1] })));
        assert_eq!(ctor.kind(), ExportKind::Constructor);
        assert_eq!(ctor.kind().as_str(), "constructor");
        assert_eq!(
            ctor.call(&[json!(1.0), json!(2.0)]).unwrap(),
            json!({ "re": 1.0, "im": 2.0 })
        );
    }
}
