//! Multi-kind search fan-out.

use futures_util::future::join_all;
use serde::Serialize;
use serde_json::Value;

use crate::catalog::accessor::Catalog;
use crate::catalog::types::{EntityKind, QueryFilters};

/// Page size used for each per-kind search call.
pub const SEARCH_LIMIT: u32 = 20;

/// Matches for one kind. Empty when that kind's call failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KindResults {
    pub kind: EntityKind,
    pub rows: Vec<Value>,
}

impl Catalog {
    /// Search several kinds at once.
    ///
    /// One call per kind, issued concurrently and joined. A failing kind
    /// contributes an empty row list instead of failing the search. Results
    /// follow the order of `kinds`; an empty `kinds` searches products only.
    pub async fn search(&self, query: &str, kinds: &[EntityKind]) -> Vec<KindResults> {
        let kinds: Vec<EntityKind> = if kinds.is_empty() {
            vec![EntityKind::Product]
        } else {
            kinds.to_vec()
        };
        let filters = QueryFilters::new()
            .with_search(query)
            .with_limit(SEARCH_LIMIT);

        let calls = kinds.into_iter().map(|kind| {
            let filters = &filters;
            async move {
                match self.list_raw(kind, filters).await {
                    Ok(page) => KindResults {
                        kind,
                        rows: page.rows,
                    },
                    Err(e) => {
                        tracing::warn!(kind = %kind, error = %e, "Search failed for kind");
                        KindResults {
                            kind,
                            rows: Vec::new(),
                        }
                    }
                }
            }
        });

        join_all(calls).await
    }
}
