//! Comment-to-code correlation in a single AST traversal.
//!
//! Every candidate node (statement, module declaration, variable declarator,
//! object property, class member and expression) is checked against the
//! documentation comments. The first node starting on the line right after a
//! comment becomes its defining node; nodes nested on the same line are
//! ignored.

use std::collections::{HashMap, HashSet};

use swc_common::{BytePos, SourceMap, Spanned};
use swc_ecma_ast::{
    ArrowExpr, AssignExpr, ClassDecl, ClassMember, Constructor, DefaultDecl, ExportDefaultDecl,
    Expr, Function, GetterProp, ModuleDecl, Pat, Prop, SetterProp, Stmt, VarDeclarator,
};
use swc_ecma_visit::{Visit, VisitWith};

use crate::core::collect::DocComments;
use crate::core::entity::{EntityTable, PartialEntity, SourceRef};
use crate::core::extract::ExtractOptions;
use crate::core::extract::line_hints::hints_for_line;
use crate::core::extract::scope::ScopeContext;
use crate::core::extract::shape::{Shape, assign_target_path, prop_key_name};
use crate::core::parsers::js::ParsedSource;
use crate::core::tags;

/// Correlate the documentation comments of a parsed file with its code.
///
/// Relationships between entities are not resolved here.
pub fn correlate(parsed: &ParsedSource, options: &ExtractOptions) -> EntityTable {
    let doc_comments = DocComments::collect(&parsed.comments, &parsed.source_map);
    if doc_comments.is_empty() {
        return EntityTable::new();
    }

    let mut correlator = Correlator::new(&parsed.source_map, &doc_comments, options);
    parsed.program.visit_with(&mut correlator);
    correlator.into_table()
}

/// Traversal state for one source unit.
pub struct Correlator<'a> {
    source_map: &'a SourceMap,
    doc_comments: &'a DocComments,
    options: &'a ExtractOptions,
    scope: ScopeContext,
    /// Lines whose comment has already been attached to a node.
    claimed_lines: HashSet<usize>,
    /// Records pre-described by an ancestor, keyed by node start.
    pending: HashMap<BytePos, PartialEntity>,
    table: EntityTable,
}

impl<'a> Correlator<'a> {
    pub fn new(
        source_map: &'a SourceMap,
        doc_comments: &'a DocComments,
        options: &'a ExtractOptions,
    ) -> Self {
        Self {
            source_map,
            doc_comments,
            options,
            scope: ScopeContext::new(),
            claimed_lines: HashSet::new(),
            pending: HashMap::new(),
            table: EntityTable::new(),
        }
    }

    pub fn into_table(self) -> EntityTable {
        self.table
    }

    /// Document the node starting at `lo`, visit its subtree, then drop the
    /// records it synthesized for descendants that had no comment.
    fn document_subtree(&mut self, lo: BytePos, shape: Shape<'_>, visit: impl FnOnce(&mut Self)) {
        let synthesized = self.document(lo, shape);
        visit(self);
        for pos in synthesized {
            self.pending.remove(&pos);
        }
    }

    /// Document the node starting at `lo` if a comment precedes its line.
    /// Returns the positions of the records synthesized for its descendants.
    fn document(&mut self, lo: BytePos, shape: Shape<'_>) -> Vec<BytePos> {
        let loc = self.source_map.lookup_char_pos(lo);
        let line = loc.line;
        if self.claimed_lines.contains(&line) {
            return Vec::new();
        }
        let Some(comment) = self.doc_comments.preceding(line) else {
            return Vec::new();
        };
        self.claimed_lines.insert(line);

        let top_level = self.scope.is_top_level();
        let code_line = loc
            .file
            .get_line(line - 1)
            .map(|text| text.into_owned())
            .unwrap_or_default();

        let description = shape.describe(&self.scope, &self.options.utility_namespaces);
        let synthesized: Vec<BytePos> = description.synthesized.iter().map(|(pos, _)| *pos).collect();
        self.pending.extend(description.synthesized);

        let mut partial = PartialEntity {
            source: Some(SourceRef {
                line,
                url: self.options.source_url.clone(),
                name: self.options.source_name.clone(),
            }),
            ..Default::default()
        };
        partial.merge(hints_for_line(&code_line, top_level));
        partial.merge(description.partial);
        if let Some(synthesized) = self.pending.remove(&lo) {
            partial.merge(synthesized);
        }
        partial.merge(tags::parse_comment(&comment.text));

        match partial.into_entity() {
            Some(entity) => {
                self.table.insert(entity);
            }
            None => log::debug!(
                "skipping comment at line {}: nothing names the documented code",
                comment.start_line
            ),
        }
        synthesized
    }

    fn with_containers<I, S>(&mut self, segments: I, visit: impl FnOnce(&mut Self))
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let pushed = self.scope.push_containers(segments);
        visit(self);
        self.scope.pop_containers(pushed);
    }

    fn in_function(&mut self, visit: impl FnOnce(&mut Self)) {
        self.scope.enter_function();
        visit(self);
        self.scope.exit_function();
    }
}

impl Visit for Correlator<'_> {
    fn visit_module_decl(&mut self, node: &ModuleDecl) {
        self.document_subtree(node.span().lo, Shape::from_module_decl(node), |this| {
            node.visit_children_with(this)
        });
    }

    fn visit_stmt(&mut self, node: &Stmt) {
        self.document_subtree(node.span().lo, Shape::from_stmt(node), |this| {
            node.visit_children_with(this)
        });
    }

    fn visit_var_declarator(&mut self, node: &VarDeclarator) {
        let container = match (&node.name, node.init.as_deref()) {
            (Pat::Ident(binding), Some(Expr::Object(_) | Expr::Class(_))) => {
                Some(binding.id.sym.to_string())
            }
            _ => None,
        };
        self.document_subtree(node.span.lo, Shape::Declarator(node), |this| {
            this.with_containers(container, |this| node.visit_children_with(this))
        });
    }

    fn visit_prop(&mut self, node: &Prop) {
        let container = match node {
            Prop::KeyValue(kv) if matches!(&*kv.value, Expr::Object(_)) => prop_key_name(&kv.key),
            _ => None,
        };
        self.document_subtree(node.span().lo, Shape::Property(node), |this| {
            this.with_containers(container, |this| node.visit_children_with(this))
        });
    }

    fn visit_expr(&mut self, node: &Expr) {
        self.document_subtree(node.span().lo, Shape::from_expr(node), |this| {
            node.visit_children_with(this)
        });
    }

    fn visit_assign_expr(&mut self, node: &AssignExpr) {
        let path = assign_target_path(&node.left).unwrap_or_default();
        let segments = path.split('.').filter(|segment| !segment.is_empty());
        self.with_containers(segments, |this| node.visit_children_with(this));
    }

    fn visit_class_decl(&mut self, node: &ClassDecl) {
        self.with_containers([node.ident.sym.to_string()], |this| {
            node.visit_children_with(this)
        });
    }

    fn visit_export_default_decl(&mut self, node: &ExportDefaultDecl) {
        if let DefaultDecl::Class(class_expr) = &node.decl
            && let Some(ident) = &class_expr.ident
        {
            self.with_containers([ident.sym.to_string()], |this| {
                node.visit_children_with(this)
            });
        } else {
            node.visit_children_with(self);
        }
    }

    fn visit_class_member(&mut self, node: &ClassMember) {
        self.document_subtree(node.span().lo, Shape::ClassMember(node), |this| {
            node.visit_children_with(this)
        });
    }

    fn visit_function(&mut self, node: &Function) {
        self.in_function(|this| node.visit_children_with(this));
    }

    fn visit_arrow_expr(&mut self, node: &ArrowExpr) {
        self.in_function(|this| node.visit_children_with(this));
    }

    fn visit_constructor(&mut self, node: &Constructor) {
        self.in_function(|this| node.visit_children_with(this));
    }

    fn visit_getter_prop(&mut self, node: &GetterProp) {
        self.in_function(|this| node.visit_children_with(this));
    }

    fn visit_setter_prop(&mut self, node: &SetterProp) {
        self.in_function(|this| node.visit_children_with(this));
    }
}
