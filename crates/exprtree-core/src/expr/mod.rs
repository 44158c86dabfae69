//! Immutable expression nodes.
//!
//! An [`Expr`] is a cheap-clone handle to an [`ExprNode`]: a node kind, a
//! static type, and kind-specific children. Nodes are never mutated after
//! construction; a different expression is always a new node, possibly
//! sharing children with old ones.
//!
//! Equality is structural. Two nodes built from the same inputs compare equal
//! even though they are distinct allocations; [`Expr::ptr_eq`] tests identity.

mod data;
mod kind;

pub use data::{ConstantValue, ElementInit, ExprData, MemberBinding, ParameterData};
pub use kind::ExprKind;

use std::fmt;
use std::sync::Arc;

use crate::catalog::TypeCatalog;
use crate::entries::MemberRef;
use crate::{ExprError, TypeHash, well_known};

/// A node: kind, static type and payload.
#[derive(Debug, Clone, PartialEq)]
pub struct ExprNode {
    pub kind: ExprKind,
    pub ty: TypeHash,
    pub data: ExprData,
}

/// Shared handle to an immutable expression node.
#[derive(Debug, Clone, PartialEq)]
pub struct Expr(Arc<ExprNode>);

impl Expr {
    /// Wrap already-validated parts into a node.
    ///
    /// This performs no validation; nodes handed to callers come from the
    /// factory.
    pub fn assemble(kind: ExprKind, ty: TypeHash, data: ExprData) -> Self {
        Expr(Arc::new(ExprNode { kind, ty, data }))
    }

    /// Check whether two handles point at the same node.
    pub fn ptr_eq(a: &Expr, b: &Expr) -> bool {
        Arc::ptr_eq(&a.0, &b.0)
    }

    pub fn node(&self) -> &ExprNode {
        &self.0
    }

    pub fn kind(&self) -> ExprKind {
        self.0.kind
    }

    /// The resolved static type. Never empty.
    pub fn static_type(&self) -> TypeHash {
        self.0.ty
    }

    pub fn data(&self) -> &ExprData {
        &self.0.data
    }

    // ==========================================================================
    // Child accessors
    // ==========================================================================

    /// Operand of a unary or type-test node.
    pub fn operand(&self) -> Option<&Expr> {
        match self.data() {
            ExprData::Unary { operand, .. } | ExprData::TypeIs { operand, .. } => Some(operand),
            _ => None,
        }
    }

    pub fn left(&self) -> Option<&Expr> {
        match self.data() {
            ExprData::Binary { left, .. } => Some(left),
            _ => None,
        }
    }

    pub fn right(&self) -> Option<&Expr> {
        match self.data() {
            ExprData::Binary { right, .. } => Some(right),
            _ => None,
        }
    }

    /// The operator or called method, when one was resolved or supplied.
    pub fn method(&self) -> Option<&MemberRef> {
        match self.data() {
            ExprData::Unary { method, .. } | ExprData::Binary { method, .. } => method.as_ref(),
            ExprData::Call { method, .. } => Some(method),
            _ => None,
        }
    }

    /// Accessed member of a member-access node, or constructor of a `New` node.
    pub fn member(&self) -> Option<&MemberRef> {
        match self.data() {
            ExprData::MemberAccess { member, .. } => Some(member),
            ExprData::New { constructor, .. } => constructor.as_ref(),
            _ => None,
        }
    }

    /// Receiver of a member access or instance call.
    pub fn instance(&self) -> Option<&Expr> {
        match self.data() {
            ExprData::MemberAccess { instance, .. } | ExprData::Call { instance, .. } => instance.as_ref(),
            _ => None,
        }
    }

    /// Normalized arguments of a call, construction or invocation.
    pub fn arguments(&self) -> &[Expr] {
        match self.data() {
            ExprData::Call { arguments, .. }
            | ExprData::New { arguments, .. }
            | ExprData::Invoke { arguments, .. } => arguments,
            _ => &[],
        }
    }

    /// Members paired with constructor arguments of a `New` node.
    pub fn members(&self) -> &[MemberRef] {
        match self.data() {
            ExprData::New { members, .. } => members,
            _ => &[],
        }
    }

    /// Initializers or bounds of an array construction.
    pub fn expressions(&self) -> &[Expr] {
        match self.data() {
            ExprData::NewArray { expressions } => expressions,
            _ => &[],
        }
    }

    /// Parameters of a lambda.
    pub fn parameters(&self) -> &[Expr] {
        match self.data() {
            ExprData::Lambda { parameters, .. } => parameters,
            _ => &[],
        }
    }

    /// Body of a lambda.
    pub fn body(&self) -> Option<&Expr> {
        match self.data() {
            ExprData::Lambda { body, .. } => Some(body),
            _ => None,
        }
    }

    /// Delegate type of a lambda.
    pub fn delegate_type(&self) -> Option<TypeHash> {
        match self.data() {
            ExprData::Lambda { .. } => Some(self.static_type()),
            _ => None,
        }
    }

    /// Target of an invocation.
    pub fn target(&self) -> Option<&Expr> {
        match self.data() {
            ExprData::Invoke { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn test(&self) -> Option<&Expr> {
        match self.data() {
            ExprData::Conditional { test, .. } => Some(test),
            _ => None,
        }
    }

    pub fn if_true(&self) -> Option<&Expr> {
        match self.data() {
            ExprData::Conditional { if_true, .. } => Some(if_true),
            _ => None,
        }
    }

    pub fn if_false(&self) -> Option<&Expr> {
        match self.data() {
            ExprData::Conditional { if_false, .. } => Some(if_false),
            _ => None,
        }
    }

    /// The `New` node wrapped by a list-init or member-init node.
    pub fn new_expression(&self) -> Option<&Expr> {
        match self.data() {
            ExprData::ListInit { new_expr, .. } | ExprData::MemberInit { new_expr, .. } => Some(new_expr),
            _ => None,
        }
    }

    pub fn bindings(&self) -> &[MemberBinding] {
        match self.data() {
            ExprData::MemberInit { bindings, .. } => bindings,
            _ => &[],
        }
    }

    pub fn initializers(&self) -> &[ElementInit] {
        match self.data() {
            ExprData::ListInit { initializers, .. } => initializers,
            _ => &[],
        }
    }

    /// Conversion lambda of a coalesce node.
    pub fn conversion(&self) -> Option<&Expr> {
        match self.data() {
            ExprData::Binary { conversion, .. } => conversion.as_ref(),
            _ => None,
        }
    }

    /// Whether the operator was lifted over optional operands.
    pub fn is_lifted(&self) -> bool {
        match self.data() {
            ExprData::Unary { is_lifted, .. } | ExprData::Binary { is_lifted, .. } => *is_lifted,
            _ => false,
        }
    }

    /// Whether a lifted comparison yields optional `bool`.
    pub fn is_lifted_to_null(&self) -> bool {
        match self.data() {
            ExprData::Unary { lift_to_null, .. } | ExprData::Binary { lift_to_null, .. } => *lift_to_null,
            _ => false,
        }
    }

    /// Literal of a constant node.
    pub fn value(&self) -> Option<&ConstantValue> {
        match self.data() {
            ExprData::Constant(value) => Some(value),
            _ => None,
        }
    }

    /// Identity of a parameter node.
    pub fn parameter(&self) -> Option<&ParameterData> {
        match self.data() {
            ExprData::Parameter(p) => Some(p),
            _ => None,
        }
    }

    /// Tested type of a type-is node.
    pub fn type_operand(&self) -> Option<TypeHash> {
        match self.data() {
            ExprData::TypeIs { type_operand, .. } => Some(*type_operand),
            _ => None,
        }
    }

    // ==========================================================================
    // Node classes
    // ==========================================================================

    /// The expression-node class of this node.
    ///
    /// Quoting compares it against expression-typed parameters. Lambdas are
    /// instances of `Expression<TDelegate>` over their delegate type.
    pub fn node_type<C: TypeCatalog + ?Sized>(&self, catalog: &C) -> Result<TypeHash, ExprError> {
        let class = match self.data() {
            ExprData::Constant(_) => well_known::CONSTANT_EXPRESSION,
            ExprData::Parameter(_) => well_known::PARAMETER_EXPRESSION,
            ExprData::Unary { .. } => well_known::UNARY_EXPRESSION,
            ExprData::Binary { .. } => well_known::BINARY_EXPRESSION,
            ExprData::TypeIs { .. } => well_known::TYPE_BINARY_EXPRESSION,
            ExprData::MemberAccess { .. } => well_known::MEMBER_EXPRESSION,
            ExprData::Call { .. } => well_known::METHOD_CALL_EXPRESSION,
            ExprData::New { .. } => well_known::NEW_EXPRESSION,
            ExprData::NewArray { .. } => well_known::NEW_ARRAY_EXPRESSION,
            ExprData::Conditional { .. } => well_known::CONDITIONAL_EXPRESSION,
            ExprData::Invoke { .. } => well_known::INVOCATION_EXPRESSION,
            ExprData::ListInit { .. } => well_known::LIST_INIT_EXPRESSION,
            ExprData::MemberInit { .. } => well_known::MEMBER_INIT_EXPRESSION,
            ExprData::Lambda { .. } => {
                return catalog.generic_instance(well_known::EXPRESSION_OF, &[self.static_type()]);
            }
        };
        Ok(class)
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, items: &[Expr]) -> fmt::Result {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.data() {
            ExprData::Constant(value) => write!(f, "{value}"),
            ExprData::Parameter(p) => match &p.name {
                Some(name) => write!(f, "{name}"),
                None => write!(f, "<param{}>", p.id),
            },
            ExprData::Binary { left, right, .. } => match self.kind() {
                ExprKind::ArrayIndex => write!(f, "{left}[{right}]"),
                kind => write!(f, "({left} {} {right})", kind.symbol().unwrap_or(kind.name())),
            },
            ExprData::Unary { operand, .. } => match self.kind() {
                ExprKind::Negate | ExprKind::NegateChecked => write!(f, "-{operand}"),
                ExprKind::UnaryPlus => write!(f, "+{operand}"),
                ExprKind::Not => write!(f, "Not({operand})"),
                ExprKind::ArrayLength => write!(f, "ArrayLength({operand})"),
                kind => write!(f, "{kind}({operand})"),
            },
            ExprData::TypeIs { operand, type_operand } => write!(f, "({operand} Is {type_operand})"),
            ExprData::MemberAccess { instance, member } => match instance {
                Some(instance) => write!(f, "{instance}.{}", member.name),
                None => write!(f, "{}", member.name),
            },
            ExprData::Call {
                instance,
                method,
                arguments,
            } => {
                if let Some(instance) = instance {
                    write!(f, "{instance}.")?;
                }
                write!(f, "{}(", method.name)?;
                write_list(f, arguments)?;
                write!(f, ")")
            }
            ExprData::New { arguments, .. } => {
                write!(f, "new {}(", self.static_type())?;
                write_list(f, arguments)?;
                write!(f, ")")
            }
            ExprData::NewArray { expressions } => {
                let (open, close) = match self.kind() {
                    ExprKind::NewArrayBounds => ("[", "]"),
                    _ => ("{", "}"),
                };
                write!(f, "new {open}")?;
                write_list(f, expressions)?;
                write!(f, "{close}")
            }
            ExprData::Conditional {
                test,
                if_true,
                if_false,
            } => write!(f, "IIF({test}, {if_true}, {if_false})"),
            ExprData::Invoke { target, arguments } => {
                write!(f, "Invoke({target}")?;
                for arg in arguments {
                    write!(f, ", {arg}")?;
                }
                write!(f, ")")
            }
            ExprData::Lambda { body, parameters } => {
                if parameters.len() == 1 {
                    write!(f, "{}", parameters[0])?;
                } else {
                    write!(f, "(")?;
                    write_list(f, parameters)?;
                    write!(f, ")")?;
                }
                write!(f, " => {body}")
            }
            ExprData::ListInit { new_expr, initializers } => {
                write!(f, "{new_expr} {{")?;
                for (i, init) in initializers.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}(", init.add_method.name)?;
                    write_list(f, &init.arguments)?;
                    write!(f, ")")?;
                }
                write!(f, "}}")
            }
            ExprData::MemberInit { new_expr, bindings } => {
                write!(f, "{new_expr} {{")?;
                for (i, binding) in bindings.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    match binding {
                        MemberBinding::Assignment { member, expression } => {
                            write!(f, "{} = {expression}", member.name)?
                        }
                        other => write!(f, "{} = {{...}}", other.member().name)?,
                    }
                }
                write!(f, "}}")
            }
        }
    }
}
