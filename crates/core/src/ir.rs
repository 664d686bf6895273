mod expr;
pub mod extra_keys;
mod ident;
mod schema_object;
mod types;

pub use expr::{
    BinaryOperator, ComparisonOp, Expr, IsTest, Literal, SetQuantifier, SubQuery, UnaryOperator,
    WindowSpec,
};
pub use ident::{Ident, QualifiedName};
pub use schema_object::{
    CheckConstraint, CheckOption, Column, ColumnPosition, Comment, CommentTarget, Deferrable,
    Domain, EnumValuePosition, ExclusionConstraint, ExclusionElement, Extension, ForeignKey,
    ForeignKeyAction, Function, FunctionParam, FunctionParamMode, FunctionSecurity,
    GeneratedColumn, Identity, IndexColumn, IndexDef, IndexOwner, MaterializedView, NullsOrder,
    Partition, PartitionBound, PartitionElement, PartitionStrategy, Policy, PolicyCommand,
    PrimaryKey, Privilege, PrivilegeObject, PrivilegeOp, SchemaDef, SchemaObject, Sequence,
    SortOrder, Table, TableOptions, Trigger, TriggerEvent, TriggerForEach, TriggerTiming, TypeDef,
    TypeKind, View, ViewSecurity, Volatility,
};
pub use types::{DataType, Value, float_total_cmp, value_total_eq};
