//! Keep entity mappings in line with the chart templates they come from.
//!
//! Synchronization only creates and updates. Entity mappings are never
//! deleted, and the ones without a template link are left alone.

use std::collections::{BTreeMap, BTreeSet};

use rust_decimal::Decimal;

use crate::core::DeclarationField;

use super::ledger::{TaxCodeChart, TaxCodeId};
use super::model::{EntityId, EntityMapping, FieldMapping, MappingKind, TemplateId, TemplateMapping};

/// Tax codes to link and unlink so an entity mapping matches its template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CodeDelta {
    pub add: BTreeSet<TaxCodeId>,
    pub remove: BTreeSet<TaxCodeId>,
}

impl CodeDelta {
    /// Delta turning `current` into `desired`.
    pub fn between(current: &BTreeSet<TaxCodeId>, desired: &BTreeSet<TaxCodeId>) -> Self {
        Self {
            add: desired.difference(current).cloned().collect(),
            remove: current.difference(desired).cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }

    pub fn apply(&self, codes: &mut BTreeSet<TaxCodeId>) {
        for code in &self.remove {
            codes.remove(code);
        }
        codes.extend(self.add.iter().cloned());
    }
}

/// Scalar part of a mapping that is overwritten from its template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MappingHead {
    pub field: DeclarationField,
    pub kind: MappingKind,
    pub number: Option<Decimal>,
}

impl MappingHead {
    fn of(mapping: &FieldMapping) -> Self {
        Self {
            field: mapping.field,
            kind: mapping.kind,
            number: mapping.number,
        }
    }
}

/// Changes bringing an existing entity mapping in line with its template.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingUpdate {
    /// Set when the field, kind or number differs from the template.
    pub head: Option<MappingHead>,
    pub codes: CodeDelta,
    /// Set when the template link must be (re)written.
    pub template: Option<TemplateId>,
}

impl MappingUpdate {
    pub fn is_empty(&self) -> bool {
        self.head.is_none() && self.codes.is_empty() && self.template.is_none()
    }
}

/// Result of comparing a template with the entity mapping linked to it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MappingChange {
    Create(EntityMapping),
    Update(MappingUpdate),
}

/// Counters returned by [`update_chart`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
}

impl TemplateMapping {
    /// Compare this template with `existing` and report what must change.
    ///
    /// Template codes are translated into the entity's tax codes through
    /// `chart`. Returns `None` when nothing changes, including the case of a
    /// code template that resolves to no codes and has no mapping yet.
    pub fn mapping_change<C>(
        &self,
        entity: Option<EntityId>,
        existing: Option<&EntityMapping>,
        chart: &C,
    ) -> Option<MappingChange>
    where
        C: TaxCodeChart + ?Sized,
    {
        let codes = chart.codes_for_templates(&self.mapping.codes);
        let head = MappingHead::of(&self.mapping);

        match existing {
            None => {
                if self.mapping.kind == MappingKind::Code && codes.is_empty() {
                    return None;
                }
                Some(MappingChange::Create(EntityMapping {
                    entity,
                    mapping: FieldMapping {
                        field: head.field,
                        kind: head.kind,
                        codes,
                        number: head.number,
                    },
                    template: Some(self.id),
                }))
            }
            Some(current) => {
                let update = MappingUpdate {
                    head: (MappingHead::of(&current.mapping) != head).then_some(head),
                    codes: CodeDelta::between(&current.mapping.codes, &codes),
                    template: (current.template != Some(self.id)).then_some(self.id),
                };
                (!update.is_empty()).then_some(MappingChange::Update(update))
            }
        }
    }
}

impl EntityMapping {
    pub fn apply(&mut self, update: &MappingUpdate) {
        if let Some(head) = &update.head {
            self.mapping.field = head.field;
            self.mapping.kind = head.kind;
            self.mapping.number = head.number;
        }
        update.codes.apply(&mut self.mapping.codes);
        if let Some(template) = update.template {
            self.template = Some(template);
        }
    }
}

/// Create the mappings of a new entity from the templates.
pub fn create_chart<C>(
    templates: &[TemplateMapping],
    entity: Option<EntityId>,
    chart: &C,
) -> Vec<EntityMapping>
where
    C: TaxCodeChart + ?Sized,
{
    let created: Vec<EntityMapping> = templates
        .iter()
        .filter_map(|t| match t.mapping_change(entity, None, chart) {
            Some(MappingChange::Create(mapping)) => Some(mapping),
            _ => None,
        })
        .collect();
    tracing::info!(
        templates = templates.len(),
        created = created.len(),
        "created AEAT 303 mappings from templates"
    );
    created
}

/// Update the mappings of `entity` from the templates, then create the ones
/// still missing.
///
/// Linked mappings whose template no longer exists are kept unchanged.
pub fn update_chart<C>(
    templates: &[TemplateMapping],
    mappings: &mut Vec<EntityMapping>,
    entity: EntityId,
    chart: &C,
) -> SyncReport
where
    C: TaxCodeChart + ?Sized,
{
    let by_id: BTreeMap<TemplateId, &TemplateMapping> =
        templates.iter().map(|t| (t.id, t)).collect();
    let mut report = SyncReport::default();
    let mut linked = BTreeSet::new();

    for mapping in mappings.iter_mut().filter(|m| m.applies_to(entity)) {
        let Some(template_id) = mapping.template else {
            continue;
        };
        let Some(template) = by_id.get(&template_id) else {
            tracing::warn!(template = template_id.0, "mapping template no longer exists");
            continue;
        };
        linked.insert(template_id);
        if let Some(MappingChange::Update(update)) =
            template.mapping_change(mapping.entity, Some(&*mapping), chart)
        {
            tracing::debug!(field = %mapping.mapping.field, ?update, "updating mapping");
            mapping.apply(&update);
            report.updated += 1;
        }
    }

    for template in templates.iter().filter(|t| !linked.contains(&t.id)) {
        if let Some(MappingChange::Create(mapping)) =
            template.mapping_change(Some(entity), None, chart)
        {
            tracing::debug!(field = %mapping.mapping.field, "creating mapping");
            mappings.push(mapping);
            report.created += 1;
        }
    }

    tracing::info!(
        entity = entity.0,
        created = report.created,
        updated = report.updated,
        "synchronized AEAT 303 mappings"
    );
    report
}
