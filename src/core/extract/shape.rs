//! Code-shape evidence.
//!
//! The node a documentation comment precedes is normalized into a [`Shape`]
//! and described as a [`PartialEntity`]: which name it binds, where it is
//! attached and what kind of value it holds.

use std::collections::HashSet;

use swc_common::{BytePos, Spanned};
use swc_ecma_ast::{
    AssignTarget, Callee, Class, ClassMember, ClassMethod, Decl, DefaultDecl, Expr, Function,
    Ident, Lit, MemberExpr, MemberProp, MethodKind, ModuleDecl, ObjectLit, Pat, Prop, PropName,
    PropOrSpread, SimpleAssignTarget, Stmt, VarDeclarator,
};

use crate::core::entity::{EntityKind, Param, PartialEntity};
use crate::core::extract::scope::ScopeContext;
use crate::core::namepath::{container_path_to_id, is_instance_id, path_to_id};

/// Constructors whose instances are documented as plain members.
pub const BUILTIN_VALUE_CONSTRUCTORS: &[&str] = &[
    "String", "Object", "Array", "Date", "Number", "Boolean", "RegExp",
];

/// Name of the classical-inheritance helper, `Base.extend({...})`.
const EXTEND_METHOD: &str = "extend";

/// The documented node, reduced to the forms that carry evidence.
#[derive(Debug, Clone, Copy)]
pub enum Shape<'a> {
    /// `a.b.c = value`, or a bare `a.b.c;`
    MemberTarget {
        target: &'a MemberExpr,
        value: Option<&'a Expr>,
    },
    /// `a = value`, or a bare `a;`
    IdentTarget {
        ident: &'a Ident,
        value: Option<&'a Expr>,
    },
    /// `var a = value`. For declarations only the first declarator counts.
    Declarator(&'a VarDeclarator),
    /// `function a() {}`, possibly a named default export.
    FunctionDecl {
        ident: &'a Ident,
        function: &'a Function,
    },
    /// `class A extends B {}`, possibly a named default export.
    ClassDecl { ident: &'a Ident, class: &'a Class },
    /// A method or field inside a class body.
    ClassMember(&'a ClassMember),
    /// `key: value` inside an object literal.
    Property(&'a Prop),
    Other,
}

/// A value whose kind can be inferred.
#[derive(Debug, Clone, Copy)]
enum Value<'a> {
    Expr(&'a Expr),
    Function(&'a Function),
}

/// What a shape says about the documented entity.
#[derive(Debug, Default)]
pub struct Description {
    pub partial: PartialEntity,
    /// Records for object literal properties passed to `extend`, keyed by
    /// the start of the property. They are applied when a comment on that
    /// property is reached.
    pub synthesized: Vec<(BytePos, PartialEntity)>,
}

impl<'a> Shape<'a> {
    pub fn from_stmt(stmt: &'a Stmt) -> Self {
        match stmt {
            Stmt::Expr(expr_stmt) => Self::from_expr(&expr_stmt.expr),
            Stmt::Decl(decl) => Self::from_decl(decl),
            _ => Self::Other,
        }
    }

    pub fn from_module_decl(decl: &'a ModuleDecl) -> Self {
        match decl {
            ModuleDecl::ExportDecl(export) => Self::from_decl(&export.decl),
            ModuleDecl::ExportDefaultDecl(export) => match &export.decl {
                DefaultDecl::Fn(fn_expr) => fn_expr.ident.as_ref().map_or(Self::Other, |ident| {
                    Self::FunctionDecl {
                        ident,
                        function: &fn_expr.function,
                    }
                }),
                DefaultDecl::Class(class_expr) => {
                    class_expr.ident.as_ref().map_or(Self::Other, |ident| Self::ClassDecl {
                        ident,
                        class: &class_expr.class,
                    })
                }
                _ => Self::Other,
            },
            _ => Self::Other,
        }
    }

    pub fn from_decl(decl: &'a Decl) -> Self {
        match decl {
            Decl::Var(var) => var.decls.first().map_or(Self::Other, Self::Declarator),
            Decl::Fn(fn_decl) => Self::FunctionDecl {
                ident: &fn_decl.ident,
                function: &fn_decl.function,
            },
            Decl::Class(class_decl) => Self::ClassDecl {
                ident: &class_decl.ident,
                class: &class_decl.class,
            },
            _ => Self::Other,
        }
    }

    pub fn from_expr(expr: &'a Expr) -> Self {
        match expr {
            Expr::Assign(assign) => match &assign.left {
                AssignTarget::Simple(SimpleAssignTarget::Member(member)) => Self::MemberTarget {
                    target: member,
                    value: Some(&assign.right),
                },
                AssignTarget::Simple(SimpleAssignTarget::Ident(binding)) => Self::IdentTarget {
                    ident: &binding.id,
                    value: Some(&assign.right),
                },
                _ => Self::Other,
            },
            Expr::Member(member) => Self::MemberTarget {
                target: member,
                value: None,
            },
            Expr::Ident(ident) => Self::IdentTarget { ident, value: None },
            _ => Self::Other,
        }
    }

    /// Describe the shape. Identity (`id`, `container`) and `inheritsFrom` are
    /// only derived at the top level of `scope`. The instance flag is derived
    /// at any depth.
    pub fn describe(&self, scope: &ScopeContext, utility_namespaces: &HashSet<String>) -> Description {
        let top_level = scope.is_top_level();
        let mut partial = PartialEntity::default();

        let value = match *self {
            Self::MemberTarget { target, value } => {
                partial.name = member_prop_name(&target.prop);
                if let Some(path) = member_expr_path(target) {
                    if is_instance_id(&path_to_id(&path)) {
                        partial.is_instance_member = Some(true);
                    }
                    if top_level {
                        partial.container = member_path(&target.obj)
                            .map(|parent| container_path_to_id(&scope.qualify(&parent)));
                        partial.id = Some(path_to_id(&scope.qualify(&path)));
                    }
                }
                value.map(Value::Expr)
            }
            Self::IdentTarget { ident, value } => {
                let name = ident.sym.to_string();
                if top_level {
                    partial.id = Some(name.clone());
                }
                partial.name = Some(name);
                value.map(Value::Expr)
            }
            Self::Declarator(declarator) => {
                if let Pat::Ident(binding) = &declarator.name {
                    let name = binding.id.sym.to_string();
                    if top_level {
                        partial.id = Some(name.clone());
                    }
                    partial.name = Some(name);
                }
                declarator.init.as_deref().map(Value::Expr)
            }
            Self::FunctionDecl { ident, function } => {
                let name = ident.sym.to_string();
                if top_level {
                    partial.id = Some(name.clone());
                }
                partial.name = Some(name);
                Some(Value::Function(function))
            }
            Self::ClassDecl { ident, class } => {
                let name = ident.sym.to_string();
                if top_level {
                    partial.id = Some(name.clone());
                    partial.inherits_from = class
                        .super_class
                        .as_deref()
                        .and_then(member_path)
                        .map(|path| container_path_to_id(&path));
                }
                partial.name = Some(name);
                partial.kind = Some(EntityKind::Class);
                None
            }
            Self::ClassMember(member) => describe_class_member(member, scope, &mut partial),
            Self::Property(prop) => {
                let (key, value) = property_parts(prop);
                if let Some(key) = &key {
                    let container = scope.container_path();
                    if !container.is_empty() {
                        let id = path_to_id(&scope.qualify(key));
                        if is_instance_id(&id) {
                            partial.is_instance_member = Some(true);
                        }
                        if top_level {
                            partial.id = Some(id);
                            partial.container = Some(container_path_to_id(&container));
                        }
                    }
                }
                partial.name = key;
                value
            }
            Self::Other => None,
        };

        let mut description = Description {
            partial,
            synthesized: Vec::new(),
        };
        if let Some(value) = value {
            infer_value(value, top_level, utility_namespaces, &mut description);
        }
        description
    }
}

fn describe_class_member<'a>(
    member: &'a ClassMember,
    scope: &ScopeContext,
    partial: &mut PartialEntity,
) -> Option<Value<'a>> {
    let (key, is_static, value) = match member {
        ClassMember::Method(ClassMethod {
            key,
            function,
            kind,
            is_static,
            ..
        }) => {
            let value = match kind {
                MethodKind::Method => Some(Value::Function(function)),
                MethodKind::Getter | MethodKind::Setter => {
                    partial.kind = Some(EntityKind::Member);
                    None
                }
            };
            (key, *is_static, value)
        }
        ClassMember::ClassProp(prop) => {
            partial.kind = Some(EntityKind::Member);
            (&prop.key, prop.is_static, prop.value.as_deref().map(Value::Expr))
        }
        _ => return None,
    };

    let name = prop_key_name(key)?;
    if !is_static {
        partial.is_instance_member = Some(true);
    }
    let container = scope.container_path();
    if scope.is_top_level() && !container.is_empty() {
        let path = if is_static {
            scope.qualify(&name)
        } else {
            scope.qualify(&format!("prototype.{}", name))
        };
        partial.id = Some(path_to_id(&path));
        partial.container = Some(container_path_to_id(&container));
    }
    partial.name = Some(name);
    value
}

fn infer_value(
    value: Value<'_>,
    top_level: bool,
    utility_namespaces: &HashSet<String>,
    description: &mut Description,
) {
    let partial = &mut description.partial;

    let expr = match value {
        Value::Function(function) => {
            set_function(partial, function.params.iter().map(|p| &p.pat));
            return;
        }
        Value::Expr(expr) => unparen(expr),
    };

    match expr {
        Expr::Fn(fn_expr) => set_function(partial, fn_expr.function.params.iter().map(|p| &p.pat)),
        Expr::Arrow(arrow) => set_function(partial, arrow.params.iter()),
        Expr::Class(class_expr) => {
            partial.kind = Some(EntityKind::Class);
            if top_level {
                partial.inherits_from = class_expr
                    .class
                    .super_class
                    .as_deref()
                    .and_then(member_path)
                    .map(|path| container_path_to_id(&path));
            }
        }
        Expr::Call(call) => {
            let Callee::Expr(callee) = &call.callee else {
                return;
            };
            let Expr::Member(member) = &**callee else {
                return;
            };
            if member_prop_name(&member.prop).as_deref() != Some(EXTEND_METHOD) {
                return;
            }

            let extended = member_path(&member.obj);
            if extended
                .as_ref()
                .is_some_and(|path| utility_namespaces.contains(path))
            {
                return;
            }

            partial.kind = Some(EntityKind::Class);
            if top_level {
                partial.inherits_from = extended.map(|path| container_path_to_id(&path));
            }

            if let Some(id) = partial.id.clone()
                && let Some(first) = call.args.first()
                && first.spread.is_none()
                && let Expr::Object(object) = unparen(&first.expr)
            {
                description.synthesized = synthesize_members(&id, object);
            }
        }
        Expr::New(new_expr) if top_level => {
            if let Expr::Ident(ident) = &*new_expr.callee {
                let constructor: &str = &ident.sym;
                if BUILTIN_VALUE_CONSTRUCTORS.contains(&constructor) {
                    partial.kind = Some(EntityKind::Member);
                } else if constructor == "Function" {
                    partial.kind = Some(EntityKind::Function);
                }
            }
        }
        _ => {}
    }
}

/// Pre-describe the properties of `Base.extend({...})` as instance members of
/// the class being defined.
fn synthesize_members(class_id: &str, object: &ObjectLit) -> Vec<(BytePos, PartialEntity)> {
    object
        .props
        .iter()
        .filter_map(|prop| match prop {
            PropOrSpread::Prop(prop) => Some(prop),
            PropOrSpread::Spread(_) => None,
        })
        .filter_map(|prop| {
            let (name, _) = property_parts(prop);
            let name = name?;
            let partial = PartialEntity {
                id: Some(format!("{}#{}", class_id, name)),
                name: Some(name),
                is_instance_member: Some(true),
                container: Some(class_id.to_string()),
                ..Default::default()
            };
            Some((prop.span().lo, partial))
        })
        .collect()
}

fn set_function<'p>(partial: &mut PartialEntity, params: impl Iterator<Item = &'p Pat>) {
    partial.kind = Some(EntityKind::Function);
    partial.params = params.filter_map(param_name).map(Param::named).collect();
}

fn param_name(pat: &Pat) -> Option<String> {
    match pat {
        Pat::Ident(binding) => Some(binding.id.sym.to_string()),
        Pat::Assign(assign) => param_name(&assign.left),
        Pat::Rest(rest) => param_name(&rest.arg),
        _ => None,
    }
}

fn unparen(expr: &Expr) -> &Expr {
    match expr {
        Expr::Paren(paren) => unparen(&paren.expr),
        _ => expr,
    }
}

/// Dotted path of a member chain: `a.b["c"].d` → `a.b.c.d`.
///
/// Returns `None` for chains that do not bottom out in an identifier or
/// `this`, or that use computed non-literal properties.
pub fn member_path(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(ident) => Some(ident.sym.to_string()),
        Expr::This(_) => Some("this".to_string()),
        Expr::Member(member) => member_expr_path(member),
        Expr::Paren(paren) => member_path(&paren.expr),
        _ => None,
    }
}

pub fn member_expr_path(member: &MemberExpr) -> Option<String> {
    let object = member_path(&member.obj)?;
    let property = member_prop_name(&member.prop)?;
    Some(format!("{}.{}", object, property))
}

/// The path segments an assignment target adds to the container context.
pub fn assign_target_path(target: &AssignTarget) -> Option<String> {
    match target {
        AssignTarget::Simple(SimpleAssignTarget::Ident(binding)) => Some(binding.id.sym.to_string()),
        AssignTarget::Simple(SimpleAssignTarget::Member(member)) => member_expr_path(member),
        _ => None,
    }
}

pub fn member_prop_name(prop: &MemberProp) -> Option<String> {
    match prop {
        MemberProp::Ident(ident) => Some(ident.sym.to_string()),
        MemberProp::Computed(computed) => match &*computed.expr {
            Expr::Lit(Lit::Str(s)) => s.value.as_str().map(str::to_string),
            _ => None,
        },
        MemberProp::PrivateName(_) => None,
    }
}

pub fn prop_key_name(key: &PropName) -> Option<String> {
    match key {
        PropName::Ident(ident) => Some(ident.sym.to_string()),
        PropName::Str(s) => s.value.as_str().map(str::to_string),
        PropName::Num(n) => Some(n.value.to_string()),
        _ => None,
    }
}

fn property_parts(prop: &Prop) -> (Option<String>, Option<Value<'_>>) {
    match prop {
        Prop::KeyValue(kv) => (prop_key_name(&kv.key), Some(Value::Expr(&kv.value))),
        Prop::Method(method) => (prop_key_name(&method.key), Some(Value::Function(&method.function))),
        Prop::Getter(getter) => (prop_key_name(&getter.key), None),
        Prop::Setter(setter) => (prop_key_name(&setter.key), None),
        Prop::Shorthand(ident) => (Some(ident.sym.to_string()), None),
        Prop::Assign(assign) => (Some(assign.key.sym.to_string()), None),
    }
}
