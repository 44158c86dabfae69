//! Argument list normalization.
//!
//! Aligns argument nodes with a callable's declared parameter types. Each
//! argument must be reference-assignable to its parameter (by-ref parameters
//! compare against their element type). When the parameter is itself an
//! expression-node class and the argument node is an instance of it, the
//! argument is wrapped in a `Quote` node and passed as data instead.

use std::fmt;

use exprtree_core::{Expr, ExprData, ExprError, ExprKind, TypeCatalog, TypeHash, well_known};

use crate::FactoryOptions;
use crate::conversion::{are_assignable, is_reference_assignable, non_ref_type};

/// The construct whose arguments are being normalized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentContext<'a> {
    /// A method call.
    Call(&'a str),
    /// A delegate invocation.
    Invoke,
    /// A constructor call on the named type.
    New(&'a str),
    /// An `Add` call inside a list initializer.
    ElementInit(&'a str),
}

impl fmt::Display for ArgumentContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgumentContext::Call(name) => write!(f, "call to method '{name}'"),
            ArgumentContext::Invoke => write!(f, "invocation"),
            ArgumentContext::New(name) => write!(f, "constructor of '{name}'"),
            ArgumentContext::ElementInit(name) => write!(f, "element initializer '{name}'"),
        }
    }
}

/// How an argument satisfies a parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgumentFit {
    /// Same type.
    Exact,
    /// Reference-assignable.
    Reference,
    /// Passed as a quoted node.
    Quote,
}

/// Decide how `arg` fits `param`, or `None` if it does not.
pub fn argument_fit<C: TypeCatalog + ?Sized>(
    catalog: &C,
    options: &FactoryOptions,
    param: TypeHash,
    arg: &Expr,
) -> Result<Option<ArgumentFit>, ExprError> {
    let param = non_ref_type(catalog, param);
    let arg_type = arg.static_type();
    if param == arg_type {
        return Ok(Some(ArgumentFit::Exact));
    }
    if is_reference_assignable(catalog, param, arg_type) {
        return Ok(Some(ArgumentFit::Reference));
    }
    if options.quote_expression_arguments && accepts_node(catalog, param, arg)? {
        return Ok(Some(ArgumentFit::Quote));
    }
    Ok(None)
}

/// Normalize `args` against `params`.
///
/// # Errors
///
/// - [`ExprError::InvalidShape`] when the counts differ
/// - [`ExprError::TypeMismatch`] when an argument fits neither directly nor
///   by quoting
pub fn normalize_arguments<C: TypeCatalog + ?Sized>(
    catalog: &C,
    options: &FactoryOptions,
    params: &[TypeHash],
    args: Vec<Expr>,
    context: ArgumentContext<'_>,
) -> Result<Vec<Expr>, ExprError> {
    if params.len() != args.len() {
        return Err(ExprError::invalid_shape(format!(
            "incorrect number of arguments supplied for {context}: expected {}, got {}",
            params.len(),
            args.len()
        )));
    }

    let mut out = Vec::with_capacity(args.len());
    for (position, (param, arg)) in params.iter().zip(args).enumerate() {
        match argument_fit(catalog, options, *param, &arg)? {
            Some(ArgumentFit::Exact | ArgumentFit::Reference) => out.push(arg),
            Some(ArgumentFit::Quote) => {
                tracing::debug!(%context, position, "quoting expression argument");
                out.push(quote_node(catalog, arg)?);
            }
            None => {
                return Err(ExprError::type_mismatch(format!(
                    "expression of type '{}' cannot be used for parameter {position} of type '{}' in {context}",
                    catalog.type_name(arg.static_type()),
                    catalog.type_name(non_ref_type(catalog, *param))
                )));
            }
        }
    }
    Ok(out)
}

/// Whether `ty` is `Expression` or one of its node classes.
pub fn is_expression_class<C: TypeCatalog + ?Sized>(catalog: &C, ty: TypeHash) -> bool {
    catalog.is_subclass_or_same(well_known::EXPRESSION, ty)
}

/// Whether a location of expression-class `ty` can hold the node `arg` itself.
pub(crate) fn accepts_node<C: TypeCatalog + ?Sized>(catalog: &C, ty: TypeHash, arg: &Expr) -> Result<bool, ExprError> {
    if !is_expression_class(catalog, ty) {
        return Ok(false);
    }
    Ok(are_assignable(catalog, ty, arg.node_type(catalog)?))
}

/// Wrap `operand` in a `Quote` node typed with its node class.
pub(crate) fn quote_node<C: TypeCatalog + ?Sized>(catalog: &C, operand: Expr) -> Result<Expr, ExprError> {
    let ty = operand.node_type(catalog)?;
    Ok(Expr::assemble(
        ExprKind::Quote,
        ty,
        ExprData::Unary {
            operand,
            method: None,
            is_lifted: false,
            lift_to_null: false,
        },
    ))
}
