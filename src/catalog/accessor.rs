//! Typed CRUD operations over the authenticated client.

use serde_json::Value;
use std::sync::Arc;

use crate::catalog::entities::{Document, Position, Product, Resource};
use crate::catalog::types::{EntityKind, Page, QueryFilters};
use crate::client::{AuthenticatedClient, UniformError};

/// Thin parameterization of [`AuthenticatedClient`] per entity kind.
#[derive(Debug, Clone)]
pub struct Catalog {
    client: Arc<AuthenticatedClient>,
}

impl Catalog {
    pub fn new(client: Arc<AuthenticatedClient>) -> Self {
        Self { client }
    }

    pub fn client(&self) -> &Arc<AuthenticatedClient> {
        &self.client
    }

    pub async fn list<T: Resource>(&self, filters: &QueryFilters) -> Result<Page<T>, UniformError> {
        self.client
            .get(&T::KIND.collection_path(), filters.to_query())
            .await
    }

    /// Fetch one entity. Documents come back with their positions expanded.
    pub async fn get<T: Resource>(&self, id: &str) -> Result<T, UniformError> {
        let path = item_path(T::KIND, id)?;
        self.client.get(&path, expand_for(T::KIND)).await
    }

    pub async fn create<T: Resource>(&self, partial: &T) -> Result<T, UniformError> {
        self.client.post(&T::KIND.collection_path(), partial).await
    }

    pub async fn update<T: Resource>(&self, id: &str, partial: &T) -> Result<T, UniformError> {
        let path = item_path(T::KIND, id)?;
        self.client.put(&path, partial).await
    }

    pub async fn list_positions<T: Document>(&self, id: &str) -> Result<Page<Position>, UniformError> {
        let path = positions_path(T::KIND, id)?;
        self.client.get(&path, Vec::new()).await
    }

    pub async fn add_position<T: Document>(
        &self,
        id: &str,
        position: &Position,
    ) -> Result<Position, UniformError> {
        let path = positions_path(T::KIND, id)?;
        self.client.post(&path, position).await
    }

    /// Products are the only kind the catalog deletes.
    pub async fn delete_product(&self, id: &str) -> Result<(), UniformError> {
        let path = item_path(Product::KIND, id)?;
        self.client.delete(&path).await
    }

    /// Untyped list, for callers that pick the kind at runtime.
    pub async fn list_raw(
        &self,
        kind: EntityKind,
        filters: &QueryFilters,
    ) -> Result<Page<Value>, UniformError> {
        self.client
            .get(&kind.collection_path(), filters.to_query())
            .await
    }

    pub async fn get_raw(&self, kind: EntityKind, id: &str) -> Result<Value, UniformError> {
        let path = item_path(kind, id)?;
        self.client.get(&path, expand_for(kind)).await
    }

    pub async fn list_positions_raw(
        &self,
        kind: EntityKind,
        id: &str,
    ) -> Result<Page<Value>, UniformError> {
        if !kind.is_document() {
            return Err(UniformError::configuration(format!(
                "'{kind}' is not a document kind and has no positions"
            )));
        }
        let path = positions_path(kind, id)?;
        self.client.get(&path, Vec::new()).await
    }
}

fn expand_for(kind: EntityKind) -> Vec<(&'static str, String)> {
    if kind.is_document() {
        vec![("expand", "positions".to_string())]
    } else {
        Vec::new()
    }
}

fn item_path(kind: EntityKind, id: &str) -> Result<String, UniformError> {
    validate_id(id)?;
    Ok(format!("{}/{}", kind.collection_path(), id))
}

fn positions_path(kind: EntityKind, id: &str) -> Result<String, UniformError> {
    Ok(format!("{}/positions", item_path(kind, id)?))
}

/// Ids are embedded in the path; reject anything that would change it.
fn validate_id(id: &str) -> Result<(), UniformError> {
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(UniformError::configuration(format!("Invalid entity id '{id}'")))
    }
}
