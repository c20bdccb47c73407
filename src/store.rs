use std::collections::HashMap;
use std::sync::RwLock;

use bson::doc;
use mongodb::{options::ReplaceOptions, Client, Collection};

use crate::error::StoreError;
use crate::schemas::Group;

/// Whole-group persistence. Every mutation loads a group, changes it and
/// saves the full record back.
pub enum GroupStore {
    Memory(MemoryStore),
    Mongo(MongoStore),
}

impl GroupStore {
    pub fn in_memory() -> Self {
        GroupStore::Memory(MemoryStore::default())
    }

    pub async fn load(&self, id: &str) -> Result<Option<Group>, StoreError> {
        match self {
            GroupStore::Memory(store) => store.load(id),
            GroupStore::Mongo(store) => store.load(id).await,
        }
    }

    pub async fn insert(&self, group: &Group) -> Result<(), StoreError> {
        match self {
            GroupStore::Memory(store) => store.insert(group),
            GroupStore::Mongo(store) => store.insert(group).await,
        }
    }

    pub async fn save(&self, group: &Group) -> Result<(), StoreError> {
        match self {
            GroupStore::Memory(store) => store.save(group),
            GroupStore::Mongo(store) => store.save(group).await,
        }
    }

    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        match self {
            GroupStore::Memory(store) => store.delete(id),
            GroupStore::Mongo(store) => store.delete(id).await,
        }
    }
}

#[derive(Default)]
pub struct MemoryStore {
    groups: RwLock<HashMap<String, Group>>,
}

impl MemoryStore {
    fn load(&self, id: &str) -> Result<Option<Group>, StoreError> {
        let groups = self.groups.read().map_err(|_| StoreError::Poisoned)?;
        Ok(groups.get(id).cloned())
    }

    fn insert(&self, group: &Group) -> Result<(), StoreError> {
        let mut groups = self.groups.write().map_err(|_| StoreError::Poisoned)?;
        if groups.contains_key(&group.id) {
            return Err(StoreError::AlreadyExists(group.id.clone()));
        }
        groups.insert(group.id.clone(), group.clone());
        Ok(())
    }

    fn save(&self, group: &Group) -> Result<(), StoreError> {
        let mut groups = self.groups.write().map_err(|_| StoreError::Poisoned)?;
        groups.insert(group.id.clone(), group.clone());
        Ok(())
    }

    fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let mut groups = self.groups.write().map_err(|_| StoreError::Poisoned)?;
        Ok(groups.remove(id).is_some())
    }
}

pub struct MongoStore {
    groups: Collection<Group>,
}

impl MongoStore {
    pub async fn connect(uri: &str, database: &str) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(uri).await?;
        Ok(MongoStore {
            groups: client.database(database).collection("Groups"),
        })
    }

    async fn load(&self, id: &str) -> Result<Option<Group>, StoreError> {
        Ok(self.groups.find_one(doc! { "id": id }, None).await?)
    }

    async fn insert(&self, group: &Group) -> Result<(), StoreError> {
        if self.load(&group.id).await?.is_some() {
            return Err(StoreError::AlreadyExists(group.id.clone()));
        }
        self.groups.insert_one(group, None).await?;
        Ok(())
    }

    async fn save(&self, group: &Group) -> Result<(), StoreError> {
        let options = ReplaceOptions::builder().upsert(true).build();
        self.groups
            .replace_one(doc! { "id": group.id.as_str() }, group, options)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let result = self.groups.delete_one(doc! { "id": id }, None).await?;
        Ok(result.deleted_count > 0)
    }
}
