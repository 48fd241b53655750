//! Dining Table Repository

use super::{RepoError, RepoResult};
use crate::db::MemoryDb;
use shared::models::{DiningTable, DiningTableCreate};

const DEFAULT_ZONE_ID: i64 = 1;
const DEFAULT_CAPACITY: i32 = 4;

#[derive(Clone)]
pub struct DiningTableRepository {
    db: MemoryDb,
}

impl DiningTableRepository {
    pub fn new(db: MemoryDb) -> Self {
        Self { db }
    }

    /// Find all dining tables ordered by name
    pub fn find_all(&self) -> Vec<DiningTable> {
        let mut tables: Vec<DiningTable> =
            self.db.tables.iter().map(|e| e.value().clone()).collect();
        tables.sort_by(|a, b| a.name.cmp(&b.name).then(a.id.cmp(&b.id)));
        tables
    }

    /// Find table by id
    pub fn find_by_id(&self, id: i64) -> Option<DiningTable> {
        self.db.tables.get(&id).map(|t| t.value().clone())
    }

    /// Create a new dining table; names are unique
    pub fn create(&self, data: DiningTableCreate) -> RepoResult<DiningTable> {
        let name = data.name.trim().to_string();
        if self.db.tables.iter().any(|t| t.name == name) {
            return Err(RepoError::Duplicate(format!(
                "Table '{}' already exists",
                name
            )));
        }

        let table = DiningTable {
            id: self.db.next_id(),
            name,
            zone_id: data.zone_id.unwrap_or(DEFAULT_ZONE_ID),
            capacity: data.capacity.unwrap_or(DEFAULT_CAPACITY),
            is_active: true,
        };
        self.db.tables.insert(table.id, table.clone());
        Ok(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(name: &str) -> DiningTableCreate {
        DiningTableCreate {
            name: name.to_string(),
            zone_id: None,
            capacity: Some(2),
        }
    }

    #[test]
    fn test_create_and_list_sorted() {
        let repo = DiningTableRepository::new(MemoryDb::new());
        let b = repo.create(payload("B2")).unwrap();
        let a = repo.create(payload("A1")).unwrap();

        let names: Vec<String> = repo.find_all().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["A1", "B2"]);
        assert_eq!(repo.find_by_id(b.id).map(|t| t.capacity), Some(2));
        assert_eq!(a.zone_id, DEFAULT_ZONE_ID);
        assert!(a.is_active);
    }

    #[test]
    fn test_duplicate_name_rejected() {
        let repo = DiningTableRepository::new(MemoryDb::new());
        repo.create(payload("A1")).unwrap();
        let err = repo.create(payload(" A1 ")).unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }
}
