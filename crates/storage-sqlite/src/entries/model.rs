//! Database model for the key-value blob storage.

use diesel::prelude::*;
use serde::{Deserialize, Serialize};

/// One named blob in `app_storage`
#[derive(Queryable, Insertable, Serialize, Deserialize, Debug, Clone)]
#[diesel(table_name = crate::schema::app_storage)]
#[serde(rename_all = "camelCase")]
pub struct AppStorageDB {
    pub storage_key: String,
    pub storage_value: String,
}
