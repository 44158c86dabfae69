//! The closed set of node kinds.

use std::fmt;

/// What an expression node represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ExprKind {
    Add,
    AddChecked,
    And,
    AndAlso,
    ArrayLength,
    ArrayIndex,
    Call,
    Coalesce,
    Conditional,
    Constant,
    Convert,
    ConvertChecked,
    Divide,
    Equal,
    ExclusiveOr,
    GreaterThan,
    GreaterThanOrEqual,
    Invoke,
    Lambda,
    LeftShift,
    LessThan,
    LessThanOrEqual,
    ListInit,
    MemberAccess,
    MemberInit,
    Modulo,
    Multiply,
    MultiplyChecked,
    Negate,
    NegateChecked,
    UnaryPlus,
    New,
    NewArrayInit,
    NewArrayBounds,
    Not,
    NotEqual,
    Or,
    OrElse,
    Parameter,
    Power,
    Quote,
    RightShift,
    Subtract,
    SubtractChecked,
    TypeAs,
    TypeIs,
}

impl ExprKind {
    /// Every node kind, in declaration order.
    pub const ALL: [ExprKind; 46] = [
        ExprKind::Add,
        ExprKind::AddChecked,
        ExprKind::And,
        ExprKind::AndAlso,
        ExprKind::ArrayLength,
        ExprKind::ArrayIndex,
        ExprKind::Call,
        ExprKind::Coalesce,
        ExprKind::Conditional,
        ExprKind::Constant,
        ExprKind::Convert,
        ExprKind::ConvertChecked,
        ExprKind::Divide,
        ExprKind::Equal,
        ExprKind::ExclusiveOr,
        ExprKind::GreaterThan,
        ExprKind::GreaterThanOrEqual,
        ExprKind::Invoke,
        ExprKind::Lambda,
        ExprKind::LeftShift,
        ExprKind::LessThan,
        ExprKind::LessThanOrEqual,
        ExprKind::ListInit,
        ExprKind::MemberAccess,
        ExprKind::MemberInit,
        ExprKind::Modulo,
        ExprKind::Multiply,
        ExprKind::MultiplyChecked,
        ExprKind::Negate,
        ExprKind::NegateChecked,
        ExprKind::UnaryPlus,
        ExprKind::New,
        ExprKind::NewArrayInit,
        ExprKind::NewArrayBounds,
        ExprKind::Not,
        ExprKind::NotEqual,
        ExprKind::Or,
        ExprKind::OrElse,
        ExprKind::Parameter,
        ExprKind::Power,
        ExprKind::Quote,
        ExprKind::RightShift,
        ExprKind::Subtract,
        ExprKind::SubtractChecked,
        ExprKind::TypeAs,
        ExprKind::TypeIs,
    ];

    /// Kinds built by the generic binary entry point.
    pub fn is_binary(self) -> bool {
        matches!(
            self,
            ExprKind::Add
                | ExprKind::AddChecked
                | ExprKind::Subtract
                | ExprKind::SubtractChecked
                | ExprKind::Multiply
                | ExprKind::MultiplyChecked
                | ExprKind::Divide
                | ExprKind::Modulo
                | ExprKind::Power
                | ExprKind::And
                | ExprKind::AndAlso
                | ExprKind::Or
                | ExprKind::OrElse
                | ExprKind::ExclusiveOr
                | ExprKind::LeftShift
                | ExprKind::RightShift
                | ExprKind::Equal
                | ExprKind::NotEqual
                | ExprKind::LessThan
                | ExprKind::LessThanOrEqual
                | ExprKind::GreaterThan
                | ExprKind::GreaterThanOrEqual
                | ExprKind::Coalesce
                | ExprKind::ArrayIndex
        )
    }

    /// Kinds built by the generic unary entry point.
    pub fn is_unary(self) -> bool {
        matches!(
            self,
            ExprKind::Negate
                | ExprKind::NegateChecked
                | ExprKind::UnaryPlus
                | ExprKind::Not
                | ExprKind::ArrayLength
                | ExprKind::Quote
                | ExprKind::Convert
                | ExprKind::ConvertChecked
                | ExprKind::TypeAs
        )
    }

    /// Comparison kinds, whose built-in result is `bool`.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            ExprKind::Equal
                | ExprKind::NotEqual
                | ExprKind::LessThan
                | ExprKind::LessThanOrEqual
                | ExprKind::GreaterThan
                | ExprKind::GreaterThanOrEqual
        )
    }

    /// Overflow-checked kinds.
    pub fn is_checked(self) -> bool {
        matches!(
            self,
            ExprKind::AddChecked
                | ExprKind::SubtractChecked
                | ExprKind::MultiplyChecked
                | ExprKind::NegateChecked
                | ExprKind::ConvertChecked
        )
    }

    /// Get the kind's name.
    pub fn name(self) -> &'static str {
        match self {
            ExprKind::Add => "Add",
            ExprKind::AddChecked => "AddChecked",
            ExprKind::And => "And",
            ExprKind::AndAlso => "AndAlso",
            ExprKind::ArrayLength => "ArrayLength",
            ExprKind::ArrayIndex => "ArrayIndex",
            ExprKind::Call => "Call",
            ExprKind::Coalesce => "Coalesce",
            ExprKind::Conditional => "Conditional",
            ExprKind::Constant => "Constant",
            ExprKind::Convert => "Convert",
            ExprKind::ConvertChecked => "ConvertChecked",
            ExprKind::Divide => "Divide",
            ExprKind::Equal => "Equal",
            ExprKind::ExclusiveOr => "ExclusiveOr",
            ExprKind::GreaterThan => "GreaterThan",
            ExprKind::GreaterThanOrEqual => "GreaterThanOrEqual",
            ExprKind::Invoke => "Invoke",
            ExprKind::Lambda => "Lambda",
            ExprKind::LeftShift => "LeftShift",
            ExprKind::LessThan => "LessThan",
            ExprKind::LessThanOrEqual => "LessThanOrEqual",
            ExprKind::ListInit => "ListInit",
            ExprKind::MemberAccess => "MemberAccess",
            ExprKind::MemberInit => "MemberInit",
            ExprKind::Modulo => "Modulo",
            ExprKind::Multiply => "Multiply",
            ExprKind::MultiplyChecked => "MultiplyChecked",
            ExprKind::Negate => "Negate",
            ExprKind::NegateChecked => "NegateChecked",
            ExprKind::UnaryPlus => "UnaryPlus",
            ExprKind::New => "New",
            ExprKind::NewArrayInit => "NewArrayInit",
            ExprKind::NewArrayBounds => "NewArrayBounds",
            ExprKind::Not => "Not",
            ExprKind::NotEqual => "NotEqual",
            ExprKind::Or => "Or",
            ExprKind::OrElse => "OrElse",
            ExprKind::Parameter => "Parameter",
            ExprKind::Power => "Power",
            ExprKind::Quote => "Quote",
            ExprKind::RightShift => "RightShift",
            ExprKind::Subtract => "Subtract",
            ExprKind::SubtractChecked => "SubtractChecked",
            ExprKind::TypeAs => "TypeAs",
            ExprKind::TypeIs => "TypeIs",
        }
    }

    /// Infix symbol used when rendering binary nodes.
    pub fn symbol(self) -> Option<&'static str> {
        Some(match self {
            ExprKind::Add | ExprKind::AddChecked => "+",
            ExprKind::Subtract | ExprKind::SubtractChecked => "-",
            ExprKind::Multiply | ExprKind::MultiplyChecked => "*",
            ExprKind::Divide => "/",
            ExprKind::Modulo => "%",
            ExprKind::Power => "^",
            ExprKind::And => "&",
            ExprKind::AndAlso => "&&",
            ExprKind::Or => "|",
            ExprKind::OrElse => "||",
            ExprKind::ExclusiveOr => "^",
            ExprKind::LeftShift => "<<",
            ExprKind::RightShift => ">>",
            ExprKind::Equal => "==",
            ExprKind::NotEqual => "!=",
            ExprKind::LessThan => "<",
            ExprKind::LessThanOrEqual => "<=",
            ExprKind::GreaterThan => ">",
            ExprKind::GreaterThanOrEqual => ">=",
            ExprKind::Coalesce => "??",
            _ => return None,
        })
    }
}

impl fmt::Display for ExprKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
