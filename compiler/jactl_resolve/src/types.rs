//! Assignability between declared types.

use jactl_ir::TypeRef;

fn numeric_rank(ty: &TypeRef) -> u8 {
    match ty {
        TypeRef::Int => 0,
        TypeRef::Long => 1,
        _ => 2,
    }
}

/// Whether a value of type `from` can initialise a declaration of type `to`.
///
/// Numbers widen (`int` to `long` to `double`/`Decimal`) but never narrow.
/// Class types are not checked against each other.
pub fn is_assignable(from: &TypeRef, to: &TypeRef) -> bool {
    match (from, to) {
        (TypeRef::Any, _) | (_, TypeRef::Any) | (TypeRef::Class(_), TypeRef::Class(_)) => true,
        (from, to) if from.is_numeric() && to.is_numeric() => {
            numeric_rank(from) <= numeric_rank(to)
        }
        (from, to) => from == to,
    }
}
