//! The AST merge engine.
//!
//! [`merge_documents`] folds any number of schema documents into one: every
//! definition is grouped by the name it introduces (all schema blocks share
//! one reserved group), and groups with more than one member are folded
//! left-to-right with the rules below.
//!
//! * A true definition kind is authoritative: once a group has seen a real
//!   definition, later extensions fold into it without demoting it.
//! * Two extensions folded together synthesize a definition of the
//!   accumulator's family, so extension-only modules still merge into a
//!   printable type.
//! * A definition that never collides passes through verbatim — in
//!   particular a lone `extend` survives as an extension (see
//!   [`normalize_extensions`] for the post-build rewrite).
//!
//! The engine never fails. Same-name collisions across unrelated kind
//! families resolve best-effort by the same kind-priority rule, keeping the
//! side that holds a true definition.

use crate::ast;
use indexmap::IndexMap;
use log::debug;

#[cfg(test)]
mod tests;

#[derive(Clone, Debug, Hash, PartialEq, Eq)]
enum GroupKey {
    /// All schema blocks collapse into one group, whatever else is named.
    Schema,
    Name(String),
}

fn group_key(def: &ast::schema::Definition) -> GroupKey {
    match ast::definition_name(def) {
        Some(name) => GroupKey::Name(name.to_string()),
        None => GroupKey::Schema,
    }
}

/// Merges the definitions of `docs`, in input order, into a single
/// document. The output contains exactly one definition per distinct
/// name (plus at most one schema block), ordered by first appearance.
pub fn merge_documents<I>(docs: I) -> ast::schema::Document
where
    I: IntoIterator<Item = ast::schema::Document>,
{
    let mut groups: IndexMap<GroupKey, ast::schema::Definition> = IndexMap::new();
    for doc in docs {
        for def in doc.definitions {
            let key = group_key(&def);
            match groups.get_mut(&key) {
                Some(acc) => {
                    let folded = merge_definitions(acc.clone(), def);
                    *acc = folded;
                }
                None => {
                    groups.insert(key, def);
                }
            }
        }
    }

    debug!("merged input documents into {} definitions", groups.len());
    ast::schema::Document {
        definitions: groups.into_values().collect(),
    }
}

/// Rewrites every surviving type extension in `doc` into the matching
/// definition kind, leaving every other node untouched.
pub fn normalize_extensions(doc: ast::schema::Document) -> ast::schema::Document {
    ast::schema::Document {
        definitions: doc
            .definitions
            .into_iter()
            .map(|def| match def {
                ast::schema::Definition::TypeExtension(ext) => {
                    ast::schema::Definition::TypeDefinition(promote_extension(ext))
                }
                other => other,
            })
            .collect(),
    }
}

/// Folds `inc` into the accumulated definition `acc` for the same group.
pub(crate) fn merge_definitions(
    acc: ast::schema::Definition,
    inc: ast::schema::Definition,
) -> ast::schema::Definition {
    use ast::schema::Definition as D;
    match (acc, inc) {
        (D::SchemaDefinition(a), D::SchemaDefinition(b)) => {
            D::SchemaDefinition(merge_schema_blocks(a, b))
        }
        (D::DirectiveDefinition(a), D::DirectiveDefinition(b)) => {
            D::DirectiveDefinition(merge_directive_definitions(a, b))
        }
        (D::TypeDefinition(a), D::TypeDefinition(b)) => {
            D::TypeDefinition(merge_type_definitions(a, b))
        }
        (D::TypeDefinition(a), D::TypeExtension(b)) => {
            D::TypeDefinition(merge_type_definitions(a, promote_extension(b)))
        }
        (D::TypeExtension(a), D::TypeDefinition(b)) => {
            // Kind promotion: the incoming true definition wins the kind.
            // Content still accumulates extension-first when the families
            // line up; otherwise the definition side survives alone.
            if extension_family(&a) == definition_family(&b) {
                D::TypeDefinition(merge_type_definitions(promote_extension(a), b))
            } else {
                D::TypeDefinition(b)
            }
        }
        (D::TypeExtension(a), D::TypeExtension(b)) => {
            if extension_family(&a) == extension_family(&b) {
                D::TypeDefinition(merge_type_definitions(
                    promote_extension(a),
                    promote_extension(b),
                ))
            } else {
                D::TypeDefinition(promote_extension(a))
            }
        }
        // Unlike kinds under one name: the accumulated true definition is
        // authoritative over whatever arrives later.
        (acc @ (D::SchemaDefinition(_) | D::TypeDefinition(_) | D::DirectiveDefinition(_)), _) => {
            acc
        }
        // An accumulated extension loses to an incoming true definition of
        // another kind entirely.
        (D::TypeExtension(_), inc) => inc,
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum TypeFamily {
    Scalar,
    Object,
    Interface,
    Union,
    Enum,
    InputObject,
}

fn definition_family(def: &ast::schema::TypeDefinition) -> TypeFamily {
    match def {
        ast::schema::TypeDefinition::Scalar(_) => TypeFamily::Scalar,
        ast::schema::TypeDefinition::Object(_) => TypeFamily::Object,
        ast::schema::TypeDefinition::Interface(_) => TypeFamily::Interface,
        ast::schema::TypeDefinition::Union(_) => TypeFamily::Union,
        ast::schema::TypeDefinition::Enum(_) => TypeFamily::Enum,
        ast::schema::TypeDefinition::InputObject(_) => TypeFamily::InputObject,
    }
}

fn extension_family(ext: &ast::schema::TypeExtension) -> TypeFamily {
    match ext {
        ast::schema::TypeExtension::Scalar(_) => TypeFamily::Scalar,
        ast::schema::TypeExtension::Object(_) => TypeFamily::Object,
        ast::schema::TypeExtension::Interface(_) => TypeFamily::Interface,
        ast::schema::TypeExtension::Union(_) => TypeFamily::Union,
        ast::schema::TypeExtension::Enum(_) => TypeFamily::Enum,
        ast::schema::TypeExtension::InputObject(_) => TypeFamily::InputObject,
    }
}

/// Rewrites an extension node into the matching definition kind. The
/// extension grammar carries no description, so the promoted definition
/// starts without one.
pub(crate) fn promote_extension(ext: ast::schema::TypeExtension) -> ast::schema::TypeDefinition {
    use ast::schema::TypeExtension as E;
    match ext {
        E::Scalar(ext) => ast::schema::TypeDefinition::Scalar(ast::schema::ScalarType {
            position: ext.position,
            description: None,
            name: ext.name,
            directives: ext.directives,
        }),
        E::Object(ext) => ast::schema::TypeDefinition::Object(ast::schema::ObjectType {
            position: ext.position,
            description: None,
            name: ext.name,
            implements_interfaces: ext.implements_interfaces,
            directives: ext.directives,
            fields: ext.fields,
        }),
        E::Interface(ext) => ast::schema::TypeDefinition::Interface(ast::schema::InterfaceType {
            position: ext.position,
            description: None,
            name: ext.name,
            implements_interfaces: ext.implements_interfaces,
            directives: ext.directives,
            fields: ext.fields,
        }),
        E::Union(ext) => ast::schema::TypeDefinition::Union(ast::schema::UnionType {
            position: ext.position,
            description: None,
            name: ext.name,
            directives: ext.directives,
            types: ext.types,
        }),
        E::Enum(ext) => ast::schema::TypeDefinition::Enum(ast::schema::EnumType {
            position: ext.position,
            description: None,
            name: ext.name,
            directives: ext.directives,
            values: ext.values,
        }),
        E::InputObject(ext) => {
            ast::schema::TypeDefinition::InputObject(ast::schema::InputObjectType {
                position: ext.position,
                description: None,
                name: ext.name,
                directives: ext.directives,
                fields: ext.fields,
            })
        }
    }
}

fn merge_type_definitions(
    acc: ast::schema::TypeDefinition,
    inc: ast::schema::TypeDefinition,
) -> ast::schema::TypeDefinition {
    use ast::schema::TypeDefinition as T;
    match (acc, inc) {
        (T::Scalar(a), T::Scalar(b)) => T::Scalar(ast::schema::ScalarType {
            position: a.position,
            description: b.description.or(a.description),
            name: a.name,
            directives: merge_directive_lists(a.directives, b.directives),
        }),
        (T::Object(a), T::Object(b)) => T::Object(ast::schema::ObjectType {
            position: a.position,
            description: b.description.or(a.description),
            name: a.name,
            implements_interfaces: merge_name_lists(
                a.implements_interfaces,
                b.implements_interfaces,
            ),
            directives: merge_directive_lists(a.directives, b.directives),
            fields: merge_field_lists(a.fields, b.fields),
        }),
        (T::Interface(a), T::Interface(b)) => T::Interface(ast::schema::InterfaceType {
            position: a.position,
            description: b.description.or(a.description),
            name: a.name,
            implements_interfaces: merge_name_lists(
                a.implements_interfaces,
                b.implements_interfaces,
            ),
            directives: merge_directive_lists(a.directives, b.directives),
            fields: merge_field_lists(a.fields, b.fields),
        }),
        (T::Union(a), T::Union(b)) => T::Union(ast::schema::UnionType {
            position: a.position,
            description: b.description.or(a.description),
            name: a.name,
            directives: merge_directive_lists(a.directives, b.directives),
            types: merge_name_lists(a.types, b.types),
        }),
        (T::Enum(a), T::Enum(b)) => T::Enum(ast::schema::EnumType {
            position: a.position,
            description: b.description.or(a.description),
            name: a.name,
            directives: merge_directive_lists(a.directives, b.directives),
            values: merge_enum_value_lists(a.values, b.values),
        }),
        (T::InputObject(a), T::InputObject(b)) => T::InputObject(ast::schema::InputObjectType {
            position: a.position,
            description: b.description.or(a.description),
            name: a.name,
            directives: merge_directive_lists(a.directives, b.directives),
            fields: merge_input_value_lists(a.fields, b.fields),
        }),
        // Unlike families under one name: the accumulator wins.
        (acc, _) => acc,
    }
}

fn merge_schema_blocks(
    acc: ast::schema::SchemaDefinition,
    inc: ast::schema::SchemaDefinition,
) -> ast::schema::SchemaDefinition {
    ast::schema::SchemaDefinition {
        position: acc.position,
        directives: merge_directive_lists(acc.directives, inc.directives),
        query: inc.query.or(acc.query),
        mutation: inc.mutation.or(acc.mutation),
        subscription: inc.subscription.or(acc.subscription),
    }
}

fn merge_directive_definitions(
    acc: ast::schema::DirectiveDefinition,
    inc: ast::schema::DirectiveDefinition,
) -> ast::schema::DirectiveDefinition {
    ast::schema::DirectiveDefinition {
        position: acc.position,
        description: inc.description.or(acc.description),
        name: acc.name,
        arguments: merge_input_value_lists(acc.arguments, inc.arguments),
        repeatable: inc.repeatable,
        locations: merge_by_identity(acc.locations, inc.locations, |a, b| a == b),
    }
}

/// Folds two child lists matched by `same`: elements only the accumulator
/// has keep their early positions, matched pairs are folded with `merge`
/// and emitted in incoming order, and genuinely new elements append last.
fn merge_matched<T>(
    acc: Vec<T>,
    inc: Vec<T>,
    same: impl Fn(&T, &T) -> bool,
    merge: impl Fn(T, T) -> T,
) -> Vec<T> {
    let mut remaining: Vec<Option<T>> = acc.into_iter().map(Some).collect();
    let mut matched = Vec::new();
    let mut created = Vec::new();

    for item in inc {
        let mut taken = None;
        for slot in remaining.iter_mut() {
            if slot.as_ref().is_some_and(|prev| same(prev, &item)) {
                taken = slot.take();
                break;
            }
        }
        match taken {
            Some(prev) => matched.push(merge(prev, item)),
            None => created.push(item),
        }
    }

    let mut out: Vec<T> = remaining.into_iter().flatten().collect();
    out.extend(matched);
    out.extend(created);
    out
}

/// List merge for elements whose identity is their whole value (union
/// members, implemented interfaces, directive locations).
fn merge_by_identity<T>(acc: Vec<T>, inc: Vec<T>, same: impl Fn(&T, &T) -> bool) -> Vec<T> {
    merge_matched(acc, inc, same, |_prev, item| item)
}

fn merge_name_lists(acc: Vec<String>, inc: Vec<String>) -> Vec<String> {
    merge_by_identity(acc, inc, |a, b| a == b)
}

fn merge_field_lists(
    acc: Vec<ast::schema::Field>,
    inc: Vec<ast::schema::Field>,
) -> Vec<ast::schema::Field> {
    merge_matched(acc, inc, |a, b| a.name == b.name, merge_fields)
}

fn merge_fields(acc: ast::schema::Field, inc: ast::schema::Field) -> ast::schema::Field {
    ast::schema::Field {
        position: acc.position,
        description: inc.description.or(acc.description),
        name: acc.name,
        arguments: merge_input_value_lists(acc.arguments, inc.arguments),
        field_type: inc.field_type,
        directives: merge_directive_lists(acc.directives, inc.directives),
    }
}

fn merge_input_value_lists(
    acc: Vec<ast::schema::InputValue>,
    inc: Vec<ast::schema::InputValue>,
) -> Vec<ast::schema::InputValue> {
    merge_matched(acc, inc, |a, b| a.name == b.name, merge_input_values)
}

fn merge_input_values(
    acc: ast::schema::InputValue,
    inc: ast::schema::InputValue,
) -> ast::schema::InputValue {
    ast::schema::InputValue {
        position: acc.position,
        description: inc.description.or(acc.description),
        name: acc.name,
        value_type: inc.value_type,
        default_value: inc.default_value.or(acc.default_value),
        directives: merge_directive_lists(acc.directives, inc.directives),
    }
}

fn merge_enum_value_lists(
    acc: Vec<ast::schema::EnumValue>,
    inc: Vec<ast::schema::EnumValue>,
) -> Vec<ast::schema::EnumValue> {
    merge_matched(acc, inc, |a, b| a.name == b.name, merge_enum_values)
}

fn merge_enum_values(
    acc: ast::schema::EnumValue,
    inc: ast::schema::EnumValue,
) -> ast::schema::EnumValue {
    ast::schema::EnumValue {
        position: acc.position,
        description: inc.description.or(acc.description),
        name: acc.name,
        directives: merge_directive_lists(acc.directives, inc.directives),
    }
}

fn merge_directive_lists(
    acc: Vec<ast::schema::Directive>,
    inc: Vec<ast::schema::Directive>,
) -> Vec<ast::schema::Directive> {
    merge_matched(acc, inc, |a, b| a.name == b.name, merge_directive_uses)
}

fn merge_directive_uses(
    acc: ast::schema::Directive,
    inc: ast::schema::Directive,
) -> ast::schema::Directive {
    ast::schema::Directive {
        position: acc.position,
        name: acc.name,
        // Directive arguments are (name, value) pairs; on a name match the
        // incoming value wins.
        arguments: merge_matched(
            acc.arguments,
            inc.arguments,
            |a, b| a.0 == b.0,
            |_prev, arg| arg,
        ),
    }
}
