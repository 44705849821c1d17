use async_trait::async_trait;
use diesel::prelude::*;
use std::sync::Arc;

use super::model::AppStorageDB;
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::StorageError;
use crate::schema::app_storage::dsl::*;
use borsa_go_core::constants::ENTRIES_STORAGE_KEY;
use borsa_go_core::entries::{BlobUpdate, EntryRepositoryTrait};
use borsa_go_core::errors::Result;

/// Keeps the saved entries as one JSON blob in `app_storage`.
pub struct EntryRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
}

impl EntryRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        EntryRepository { pool, writer }
    }
}

fn read_blob(conn: &mut SqliteConnection) -> std::result::Result<Option<String>, StorageError> {
    Ok(app_storage
        .filter(storage_key.eq(ENTRIES_STORAGE_KEY))
        .select(storage_value)
        .first::<String>(conn)
        .optional()?)
}

#[async_trait]
impl EntryRepositoryTrait for EntryRepository {
    fn load_blob(&self) -> Result<Option<String>> {
        let mut conn = get_connection(&self.pool)?;
        Ok(read_blob(&mut conn)?)
    }

    async fn update_blob(&self, update: BlobUpdate) -> Result<()> {
        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let current = read_blob(conn)?;
                let next = update(current)?;
                diesel::replace_into(app_storage)
                    .values(AppStorageDB {
                        storage_key: ENTRIES_STORAGE_KEY.to_string(),
                        storage_value: next,
                    })
                    .execute(conn)
                    .map_err(StorageError::from)?;
                Ok(())
            })
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, spawn_writer};
    use borsa_go_core::calculator::{calculate, CalculationInput};
    use borsa_go_core::entries::{EntryService, EntryServiceTrait, NewEntry};
    use borsa_go_core::errors::{Error, ValidationError};
    use tempfile::tempdir;

    /// Creates a repository over a fresh database in a temp directory.
    /// Returns the repository, pool, and temp dir (to keep it alive).
    fn create_test_repository() -> (EntryRepository, Arc<DbPool>, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        let pool = create_pool(&db_path_str).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        let writer = spawn_writer((*pool).clone());

        let repo = EntryRepository::new(Arc::clone(&pool), writer);
        (repo, pool, temp_dir)
    }

    fn write_raw_blob(pool: &DbPool, blob: &str) {
        let mut conn = get_connection(pool).expect("Failed to get connection");
        diesel::replace_into(app_storage)
            .values(AppStorageDB {
                storage_key: ENTRIES_STORAGE_KEY.to_string(),
                storage_value: blob.to_string(),
            })
            .execute(&mut conn)
            .expect("Failed to write blob");
    }

    fn new_entry(name: &str, purchase: f64, market: f64) -> NewEntry {
        let input = CalculationInput::new(purchase, market).with_app_fees(0.5);
        let result = calculate(&input).unwrap();
        NewEntry::from_calculation(name, &input, &result)
    }

    #[tokio::test]
    async fn test_fresh_database_has_no_blob() {
        let (repo, _pool, _temp_dir) = create_test_repository();
        assert_eq!(repo.load_blob().unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_blob_sees_previous_value() {
        let (repo, _pool, _temp_dir) = create_test_repository();

        repo.update_blob(Box::new(|current| {
            assert_eq!(current, None);
            Ok("[1]".to_string())
        }))
        .await
        .unwrap();
        repo.update_blob(Box::new(|current| {
            assert_eq!(current.as_deref(), Some("[1]"));
            Ok("[1,2]".to_string())
        }))
        .await
        .unwrap();

        assert_eq!(repo.load_blob().unwrap().as_deref(), Some("[1,2]"));
    }

    #[tokio::test]
    async fn test_failed_update_keeps_previous_blob() {
        let (repo, pool, _temp_dir) = create_test_repository();
        write_raw_blob(&pool, "[]");

        let result = repo
            .update_blob(Box::new(|_| {
                Err(Error::Validation(ValidationError::InvalidInput(
                    "rejected".to_string(),
                )))
            }))
            .await;

        assert!(result.is_err());
        assert_eq!(repo.load_blob().unwrap().as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn test_service_round_trip_over_sqlite() {
        let (repo, _pool, _temp_dir) = create_test_repository();
        let service = EntryService::new(Arc::new(repo));

        let first = service.save(new_entry("FROTO", 100.0, 120.0)).await.unwrap();
        let second = service.save(new_entry("SISE", 50.0, 45.0)).await.unwrap();

        let entries = service.list();
        assert_eq!(entries, vec![second.clone(), first.clone()]);

        let updated = service
            .save(new_entry("FROTO", 100.0, 130.0).with_id(first.id.clone()))
            .await
            .unwrap();
        let entries = service.list();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[1], updated);
        assert_eq!(entries[1].profit, 30.0);

        service.delete(&second.id).await.unwrap();
        assert_eq!(service.list(), vec![updated]);
    }

    #[tokio::test]
    async fn test_legacy_blob_reads_with_third_party_fee_defaulted() {
        let (repo, pool, _temp_dir) = create_test_repository();
        write_raw_blob(
            &pool,
            r#"[{"id":"old-1","savedAt":"2023-01-05T10:00:00.000Z","stockName":"KCHOL",
                "purchaseValue":100,"marketValue":110,"appFees":1,"purifyingPercentage":0,
                "profit":10,"netProfit":9,"purifyingAmount":0,"finalProfit":9}]"#,
        );
        let service = EntryService::new(Arc::new(repo));

        let entries = service.list();

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].third_party_fee, 0.0);
        assert_eq!(entries[0].stock_name, "KCHOL");
    }

    #[tokio::test]
    async fn test_corrupt_blob_lists_empty() {
        let (repo, pool, _temp_dir) = create_test_repository();
        write_raw_blob(&pool, "this is not json");
        let service = EntryService::new(Arc::new(repo));

        assert!(service.list().is_empty());
    }

    #[tokio::test]
    async fn test_concurrent_saves_are_all_kept() {
        let (repo, _pool, _temp_dir) = create_test_repository();
        let service = Arc::new(EntryService::new(Arc::new(repo)));

        let handles: Vec<_> = (0..10)
            .map(|i| {
                let service = Arc::clone(&service);
                tokio::spawn(async move {
                    service
                        .save(new_entry(&format!("STOCK{i}"), 10.0, 10.0 + i as f64))
                        .await
                })
            })
            .collect();
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let entries = service.list();
        assert_eq!(entries.len(), 10);
        let mut ids: Vec<&str> = entries.iter().map(|e| e.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 10);
    }
}
