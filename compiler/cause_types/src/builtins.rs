//! Builtin types, present in every table at fixed ids.

use cause_ir::StringInterner;

use crate::table::{FieldDef, TypeDef, TypeKind};
use crate::{ResolvedType, TypeId, TypeTable};

/// Names of the builtin types, in id order. The unknown slot has no name.
pub const BUILTIN_TYPE_NAMES: [&str; TypeId::BUILTIN_COUNT - 1] = [
    "Number",
    "String",
    "Action",
    "Anything",
    "AnySignal",
    "True",
    "False",
    "BinaryAnswer",
    "Debug",
    "AssumptionBroken",
];

pub(crate) fn register(table: &mut TypeTable, interner: &StringInterner) {
    let mut define = |name: &str, kind: TypeKind| {
        table.push(TypeDef {
            name: interner.intern(name),
            kind,
            decl: None,
        })
    };

    let number = define("Number", TypeKind::Primitive);
    let string = define("String", TypeKind::Primitive);
    let action = define("Action", TypeKind::Primitive);
    let anything = define("Anything", TypeKind::Anything);
    let any_signal = define("AnySignal", TypeKind::AnySignal);
    let true_ = define("True", TypeKind::Object { fields: Vec::new() });
    let false_ = define("False", TypeKind::Object { fields: Vec::new() });
    let binary_answer = define(
        "BinaryAnswer",
        TypeKind::Option {
            members: vec![ResolvedType::Named(true_), ResolvedType::Named(false_)],
        },
    );
    let debug = define(
        "Debug",
        TypeKind::Signal {
            fields: vec![FieldDef {
                name: interner.intern("value"),
                ty: ResolvedType::Named(anything),
            }],
            result: ResolvedType::Named(action),
        },
    );
    let assumption_broken = define(
        "AssumptionBroken",
        TypeKind::Signal {
            fields: vec![FieldDef {
                name: interner.intern("message"),
                ty: ResolvedType::Named(string),
            }],
            result: ResolvedType::Named(action),
        },
    );
    let unknown = define("", TypeKind::Unknown);

    debug_assert_eq!(
        [
            number,
            string,
            action,
            anything,
            any_signal,
            true_,
            false_,
            binary_answer,
            debug,
            assumption_broken,
            unknown,
        ],
        [
            TypeId::NUMBER,
            TypeId::STRING,
            TypeId::ACTION,
            TypeId::ANYTHING,
            TypeId::ANY_SIGNAL,
            TypeId::TRUE,
            TypeId::FALSE,
            TypeId::BINARY_ANSWER,
            TypeId::DEBUG,
            TypeId::ASSUMPTION_BROKEN,
            TypeId::UNKNOWN,
        ]
    );
}
