//! Shared catalog types: entity kinds, envelopes and query filters.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

use crate::client::QueryPairs;

/// Entity kinds exposed by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Product,
    Counterparty,
    /// Shipment document.
    Demand,
    /// Receipt document.
    Supply,
    Organization,
    /// Warehouse.
    Store,
}

impl EntityKind {
    pub const ALL: [EntityKind; 6] = [
        EntityKind::Product,
        EntityKind::Counterparty,
        EntityKind::Demand,
        EntityKind::Supply,
        EntityKind::Organization,
        EntityKind::Store,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::Product => "product",
            EntityKind::Counterparty => "counterparty",
            EntityKind::Demand => "demand",
            EntityKind::Supply => "supply",
            EntityKind::Organization => "organization",
            EntityKind::Store => "store",
        }
    }

    /// Upstream collection path, relative to the API base.
    pub fn collection_path(&self) -> String {
        format!("entity/{}", self.as_str())
    }

    /// Documents carry positions and cannot be deleted through the catalog.
    pub fn is_document(&self) -> bool {
        matches!(self, EntityKind::Demand | EntityKind::Supply)
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown entity kind '{0}'")]
pub struct UnknownEntityKind(pub String);

impl FromStr for EntityKind {
    type Err = UnknownEntityKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        EntityKind::ALL
            .into_iter()
            .find(|k| k.as_str() == wanted)
            .ok_or_else(|| UnknownEntityKind(s.to_string()))
    }
}

/// Upstream metadata block, used both for entity references and for
/// collection envelopes (which add size/limit/offset).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Meta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub href: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<u64>,
}

/// `{"meta": {...}}` reference to another entity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaRef {
    pub meta: Meta,
}

impl MetaRef {
    pub fn new(href: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            meta: Meta {
                href: Some(href.into()),
                kind: Some(kind.into()),
                media_type: Some("application/json".to_string()),
                ..Meta::default()
            },
        }
    }
}

/// Collection envelope returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<serde_json::Value>,
    #[serde(default)]
    pub meta: Meta,
    #[serde(default = "Vec::new")]
    pub rows: Vec<T>,
}

impl<T> Default for Page<T> {
    fn default() -> Self {
        Self {
            context: None,
            meta: Meta::default(),
            rows: Vec::new(),
        }
    }
}

/// List filters, passed through verbatim as query parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryFilters {
    pub limit: Option<u32>,
    pub offset: Option<u32>,
    /// Free-text search.
    pub search: Option<String>,
    /// Server-side filter expression.
    pub filter: Option<String>,
    pub order: Option<String>,
    /// Relation-expansion hint.
    pub expand: Option<String>,
}

impl QueryFilters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = Some(filter.into());
        self
    }

    pub fn with_order(mut self, order: impl Into<String>) -> Self {
        self.order = Some(order.into());
        self
    }

    pub fn with_expand(mut self, expand: impl Into<String>) -> Self {
        self.expand = Some(expand.into());
        self
    }

    /// Only the set filters, in a fixed order.
    pub fn to_query(&self) -> QueryPairs {
        let mut pairs = Vec::new();
        if let Some(limit) = self.limit {
            pairs.push(("limit", limit.to_string()));
        }
        if let Some(offset) = self.offset {
            pairs.push(("offset", offset.to_string()));
        }
        if let Some(search) = &self.search {
            pairs.push(("search", search.clone()));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("filter", filter.clone()));
        }
        if let Some(order) = &self.order {
            pairs.push(("order", order.clone()));
        }
        if let Some(expand) = &self.expand {
            pairs.push(("expand", expand.clone()));
        }
        pairs
    }
}
