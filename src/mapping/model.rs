use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::core::DeclarationField;

use super::ledger::TaxCodeId;

/// How a mapped box gets its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKind {
    /// Sum of the balances of a set of tax codes.
    Code,
    /// A constant configured on the mapping.
    Numeric,
}

impl MappingKind {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Code => "code",
            Self::Numeric => "numeric",
        }
    }
}

/// Binds one declaration box to its data source.
///
/// Only the part matching `kind` is meaningful: `codes` for
/// [`MappingKind::Code`], `number` for [`MappingKind::Numeric`]. The other
/// part may carry leftovers and is ignored by the resolver.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    pub field: DeclarationField,
    #[serde(rename = "type")]
    pub kind: MappingKind,
    #[serde(default)]
    pub codes: BTreeSet<TaxCodeId>,
    #[serde(default)]
    pub number: Option<Decimal>,
}

impl FieldMapping {
    /// Mapping summing the balances of `codes`.
    pub fn codes<I, C>(field: DeclarationField, codes: I) -> Self
    where
        I: IntoIterator<Item = C>,
        C: Into<TaxCodeId>,
    {
        Self {
            field,
            kind: MappingKind::Code,
            codes: codes.into_iter().map(Into::into).collect(),
            number: None,
        }
    }

    /// Mapping to a constant.
    pub fn fixed(field: DeclarationField, number: Decimal) -> Self {
        Self {
            field,
            kind: MappingKind::Numeric,
            codes: BTreeSet::new(),
            number: Some(number),
        }
    }

    pub fn is_fixed(&self) -> bool {
        self.kind == MappingKind::Numeric
    }
}

/// Identifier of a mapping template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TemplateId(pub u32);

/// Identifier of the company (entity) a mapping belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u32);

/// Mapping shipped with the chart template. Its codes are tax code
/// template identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TemplateMapping {
    pub id: TemplateId,
    #[serde(flatten)]
    pub mapping: FieldMapping,
}

/// Mapping owned by an entity, optionally linked to the template it was
/// created from. Mappings without an entity apply to every entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityMapping {
    #[serde(default)]
    pub entity: Option<EntityId>,
    #[serde(flatten)]
    pub mapping: FieldMapping,
    #[serde(default)]
    pub template: Option<TemplateId>,
}

impl EntityMapping {
    /// Whether the mapping is visible to `entity`.
    pub fn applies_to(&self, entity: EntityId) -> bool {
        self.entity.is_none_or(|e| e == entity)
    }
}

/// Mappings visible to `entity`.
pub fn mappings_for(
    mappings: &[EntityMapping],
    entity: EntityId,
) -> impl Iterator<Item = &FieldMapping> {
    mappings
        .iter()
        .filter(move |m| m.applies_to(entity))
        .map(|m| &m.mapping)
}
