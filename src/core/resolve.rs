//! Relationship resolution: correcting kinds with cross-entity evidence.
//!
//! Extraction sees one comment at a time, so `var a = {}` documented before
//! `a.prototype.b` is first recorded as a plain member. The resolver sweeps the
//! finished table and promotes containers and superclasses:
//!
//! 1. A container recorded as a function or member becomes a namespace.
//! 2. A namespace that owns an instance member becomes a class.
//! 3. When either side of an `inheritsFrom` link is a class, both are.

use serde::{Deserialize, Serialize};

use crate::core::entity::{Entity, EntityKind, EntityTable};

/// How often the resolution rules are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResolutionMode {
    /// One sweep in table order. Chains of promotions that point backwards in
    /// the table are not followed.
    #[default]
    SingleSweep,
    /// Sweep until no kind changes.
    FixedPoint,
}

/// Apply the resolution rules to `table`. Returns the number of promotions.
pub fn resolve_relationships(table: &mut EntityTable, mode: ResolutionMode) -> usize {
    match mode {
        ResolutionMode::SingleSweep => sweep(table),
        ResolutionMode::FixedPoint => {
            let mut total = 0;
            // Terminates: kinds only move towards class, never back.
            loop {
                let promotions = sweep(table);
                if promotions == 0 {
                    break;
                }
                total += promotions;
            }
            total
        }
    }
}

fn sweep(table: &mut EntityTable) -> usize {
    let ids: Vec<String> = table.ids().map(str::to_string).collect();
    let mut promotions = 0;

    for id in &ids {
        let Some(entity) = table.get(id) else {
            continue;
        };
        let container = entity.container.clone();
        let is_instance_member = entity.is_instance_member;
        let inherits_from = entity.inherits_from.clone();

        if let Some(parent) = container.as_deref().and_then(|c| table.get_mut(c)) {
            if matches!(parent.kind, Some(EntityKind::Function | EntityKind::Member)) {
                promotions += promote(parent, EntityKind::Namespace) as usize;
            }
            if parent.is_kind(EntityKind::Namespace) && is_instance_member {
                promotions += promote(parent, EntityKind::Class) as usize;
            }
        }

        let Some(base) = inherits_from.as_deref().filter(|base| table.contains(base)) else {
            continue;
        };
        let is_class = |id: &str| table.get(id).is_some_and(|e| e.is_kind(EntityKind::Class));
        if is_class(id) || is_class(base) {
            for linked in [id.as_str(), base] {
                if let Some(entity) = table.get_mut(linked) {
                    promotions += promote(entity, EntityKind::Class) as usize;
                }
            }
        }
    }

    promotions
}

fn promote(entity: &mut Entity, kind: EntityKind) -> bool {
    if entity.kind == Some(kind) {
        return false;
    }
    log::debug!(
        "`{}` promoted from {} to {}",
        entity.id,
        entity.kind.map_or("no kind", |k| k.as_str()),
        kind
    );
    entity.kind = Some(kind);
    true
}
