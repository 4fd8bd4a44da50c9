//! Pharmacy inventory endpoints.

use crate::api::client::ApiClient;
use crate::errors::ClientError;
use crate::handlers::cache::EntityCache;
use crate::handlers::events;
use crate::models::all_models::InventoryItem;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

//Create Inventory Item Request
#[derive(Debug, Serialize)]
pub struct CreateInventoryItemRequest {
    pub name: String,
    pub category: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub expiry_date: Option<NaiveDate>,
    pub reorder_level: i64,
}

//Update Inventory Item Request
#[derive(Debug, Serialize, Default)]
pub struct UpdateInventoryItemRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reorder_level: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct DeletedItemResponse {
    pub item_id: Uuid,
}

impl ApiClient {
    pub async fn list_inventory(
        &self,
        cache: &EntityCache<InventoryItem>,
    ) -> Result<Vec<InventoryItem>, ClientError> {
        let items: Vec<InventoryItem> = self.get("/inventory").await?;
        cache.replace_all(items.clone());
        Ok(items)
    }

    pub async fn list_inventory_categories(&self) -> Result<Vec<String>, ClientError> {
        self.get("/inventory/categories").await
    }

    pub async fn create_inventory_item(
        &self,
        cache: &EntityCache<InventoryItem>,
        payload: CreateInventoryItemRequest,
    ) -> Result<InventoryItem, ClientError> {
        if payload.name.trim().is_empty() {
            return Err(ClientError::Validation("An item name is required".into()));
        }

        let created: InventoryItem = self.post("/inventory", &payload).await?;
        cache.upsert(created.clone());
        Ok(created)
    }

    //Update Inventory Item
    //Warns pharmacy staff when the new quantity is at or below the reorder
    //level.
    pub async fn update_inventory_item(
        &self,
        cache: &EntityCache<InventoryItem>,
        item_id: Uuid,
        payload: UpdateInventoryItemRequest,
    ) -> Result<InventoryItem, ClientError> {
        let updated: InventoryItem = self
            .put(&format!("/inventory/{}", item_id), &payload)
            .await?;
        cache.upsert(updated.clone());
        if updated.is_low_stock() {
            events::inventory_low_stock(&self.notifications, &updated);
        }
        Ok(updated)
    }

    pub async fn delete_inventory_item(
        &self,
        cache: &EntityCache<InventoryItem>,
        item_id: Uuid,
    ) -> Result<DeletedItemResponse, ClientError> {
        let deleted: DeletedItemResponse = self.delete(&format!("/inventory/{}", item_id)).await?;
        cache.remove(deleted.item_id);
        Ok(deleted)
    }
}
