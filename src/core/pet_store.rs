use crate::domain::model::{Moment, NewMoment, NewPet, Pet, PetUpdate};
use crate::domain::ports::Storage;
use crate::utils::error::{PetError, Result};
use chrono::Utc;
use tokio::sync::Mutex;

pub const PETS_FILE: &str = "pets.json";

/// 寵物與時間軸的存取層。
///
/// 記憶體中的資料為準；寫檔失敗只記 log（唯讀部署時仍可運作）。
pub struct PetStore<S: Storage> {
    storage: S,
    pets: Mutex<Vec<Pet>>,
}

impl<S: Storage> PetStore<S> {
    /// 讀取既有資料；檔案不存在或損壞時從空清單開始
    pub async fn open(storage: S) -> Self {
        let pets = match storage.read_file(PETS_FILE).await {
            Ok(bytes) if bytes.iter().all(u8::is_ascii_whitespace) => Vec::new(),
            Ok(bytes) => match serde_json::from_slice::<Vec<Pet>>(&bytes).map_err(PetError::from) {
                Ok(pets) => {
                    tracing::info!("📂 Loaded {} pets from {}", pets.len(), PETS_FILE);
                    pets
                }
                Err(e) => {
                    tracing::warn!("⚠️ {} is malformed, starting empty: {}", PETS_FILE, e);
                    Vec::new()
                }
            },
            Err(PetError::IoError(e)) if e.kind() == std::io::ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                tracing::warn!("⚠️ Could not read {}, starting empty: {}", PETS_FILE, e);
                Vec::new()
            }
        };

        Self {
            storage,
            pets: Mutex::new(pets),
        }
    }

    async fn write_snapshot(&self, pets: &[Pet]) -> Result<()> {
        let data = serde_json::to_vec_pretty(pets)?;
        self.storage.write_file(PETS_FILE, &data).await
    }

    async fn persist(&self, pets: &[Pet]) {
        if let Err(e) = self.write_snapshot(pets).await {
            tracing::warn!("⚠️ Keeping pets in memory only, write failed: {}", e);
        }
    }

    pub async fn list(&self) -> Vec<Pet> {
        self.pets.lock().await.clone()
    }

    pub async fn get(&self, id: u64) -> Option<Pet> {
        self.pets.lock().await.iter().find(|p| p.id == id).cloned()
    }

    pub async fn create(&self, new_pet: NewPet) -> Result<Pet> {
        let name = new_pet.name.trim();
        if name.is_empty() {
            return Err(PetError::ValidationError {
                message: "name is required".to_string(),
            });
        }

        let mut pets = self.pets.lock().await;
        let pet = Pet {
            id: pets.last().map_or(0, |p| p.id) + 1,
            name: name.to_string(),
            breed: new_pet.breed,
            species: new_pet.species,
            birthday: new_pet.birthday,
            avatar: new_pet.avatar,
            story: new_pet.story,
            moments: Vec::new(),
        };
        pets.push(pet.clone());
        self.persist(&pets).await;

        tracing::info!("🐾 Created pet #{} '{}'", pet.id, pet.name);
        Ok(pet)
    }

    /// 只覆寫有提供的欄位，id 不變
    pub async fn update(&self, id: u64, update: PetUpdate) -> Option<Pet> {
        let mut pets = self.pets.lock().await;
        let pet = pets.iter_mut().find(|p| p.id == id)?;

        let fields = [
            (&mut pet.name, update.name),
            (&mut pet.breed, update.breed),
            (&mut pet.species, update.species),
            (&mut pet.birthday, update.birthday),
            (&mut pet.avatar, update.avatar),
            (&mut pet.story, update.story),
        ];
        for (field, value) in fields {
            if let Some(value) = value {
                *field = value;
            }
        }

        let updated = pet.clone();
        self.persist(&pets).await;
        Some(updated)
    }

    pub async fn remove(&self, id: u64) -> bool {
        let mut pets = self.pets.lock().await;
        let Some(index) = pets.iter().position(|p| p.id == id) else {
            return false;
        };
        let removed = pets.remove(index);
        self.persist(&pets).await;

        tracing::info!("🗑️ Removed pet #{} '{}'", removed.id, removed.name);
        true
    }

    /// 新到舊
    pub async fn list_moments(&self, id: u64) -> Option<Vec<Moment>> {
        let pets = self.pets.lock().await;
        let pet = pets.iter().find(|p| p.id == id)?;
        let mut moments = pet.moments.clone();
        moments.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Some(moments)
    }

    pub async fn add_moment(&self, id: u64, new_moment: NewMoment) -> Option<Moment> {
        let mut pets = self.pets.lock().await;
        let pet = pets.iter_mut().find(|p| p.id == id)?;

        let moment = Moment {
            id: pet.moments.last().map_or(0, |m| m.id) + 1,
            text: new_moment.text.unwrap_or_default(),
            photo: new_moment.photo.unwrap_or_default(),
            created_at: new_moment.created_at.unwrap_or_else(Utc::now),
        };
        pet.moments.push(moment.clone());
        self.persist(&pets).await;

        Some(moment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::LocalStorage;
    use chrono::{Duration, TimeZone};
    use tempfile::TempDir;

    fn storage_in(dir: &TempDir) -> LocalStorage {
        LocalStorage::new(dir.path().to_str().unwrap().to_string())
    }

    fn new_pet(name: &str) -> NewPet {
        NewPet {
            name: name.to_string(),
            breed: "Bouledogue français".to_string(),
            species: "dog".to_string(),
            ..Default::default()
        }
    }

    /// 寫入一律失敗的儲存層
    struct ReadOnlyStorage;

    impl Storage for ReadOnlyStorage {
        async fn read_file(&self, _path: &str) -> Result<Vec<u8>> {
            Ok(b"[]".to_vec())
        }

        async fn write_file(&self, _path: &str, _data: &[u8]) -> Result<()> {
            Err(PetError::IoError(std::io::Error::new(
                std::io::ErrorKind::PermissionDenied,
                "read-only file system",
            )))
        }
    }

    #[tokio::test]
    async fn test_create_assigns_incrementing_ids() {
        let dir = TempDir::new().unwrap();
        let store = PetStore::open(storage_in(&dir)).await;

        let first = store.create(new_pet("Mochi")).await.unwrap();
        let second = store.create(new_pet("  Biscuit ")).await.unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(second.name, "Biscuit");
        assert!(second.moments.is_empty());
        assert_eq!(store.list().await.len(), 2);
    }

    #[tokio::test]
    async fn test_create_requires_name() {
        let dir = TempDir::new().unwrap();
        let store = PetStore::open(storage_in(&dir)).await;

        let err = store.create(new_pet("   ")).await.unwrap_err();
        assert!(matches!(err, PetError::ValidationError { .. }));
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_update_merges_fields_and_keeps_id() {
        let dir = TempDir::new().unwrap();
        let store = PetStore::open(storage_in(&dir)).await;
        let pet = store.create(new_pet("Mochi")).await.unwrap();

        let updated = store
            .update(
                pet.id,
                PetUpdate {
                    story: Some("Adopted in spring".to_string()),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.id, pet.id);
        assert_eq!(updated.name, "Mochi");
        assert_eq!(updated.breed, "Bouledogue français");
        assert_eq!(updated.story, "Adopted in spring");
        assert!(store.update(99, PetUpdate::default()).await.is_none());
    }

    #[tokio::test]
    async fn test_remove_unknown_id_is_false() {
        let dir = TempDir::new().unwrap();
        let store = PetStore::open(storage_in(&dir)).await;
        let pet = store.create(new_pet("Mochi")).await.unwrap();

        assert!(!store.remove(42).await);
        assert!(store.remove(pet.id).await);
        assert!(store.get(pet.id).await.is_none());
    }

    #[tokio::test]
    async fn test_moments_are_listed_newest_first() {
        let dir = TempDir::new().unwrap();
        let store = PetStore::open(storage_in(&dir)).await;
        let pet = store.create(new_pet("Mochi")).await.unwrap();
        let base = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();

        for (offset, text) in [(0, "first walk"), (2, "vet visit"), (1, "new toy")] {
            store
                .add_moment(
                    pet.id,
                    NewMoment {
                        text: Some(text.to_string()),
                        created_at: Some(base + Duration::days(offset)),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        let moments = store.list_moments(pet.id).await.unwrap();
        let texts: Vec<_> = moments.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["vet visit", "new toy", "first walk"]);
        assert_eq!(moments.iter().map(|m| m.id).max(), Some(3));
        assert!(store.list_moments(99).await.is_none());
    }

    #[tokio::test]
    async fn test_moment_defaults() {
        let dir = TempDir::new().unwrap();
        let store = PetStore::open(storage_in(&dir)).await;
        let pet = store.create(new_pet("Mochi")).await.unwrap();

        let before = Utc::now();
        let moment = store.add_moment(pet.id, NewMoment::default()).await.unwrap();

        assert_eq!(moment.id, 1);
        assert_eq!(moment.text, "");
        assert_eq!(moment.photo, "");
        assert!(moment.created_at >= before);
        assert!(store.add_moment(99, NewMoment::default()).await.is_none());
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let store = PetStore::open(storage_in(&dir)).await;
            let pet = store.create(new_pet("Mochi")).await.unwrap();
            store
                .add_moment(
                    pet.id,
                    NewMoment {
                        text: Some("first walk".to_string()),
                        ..Default::default()
                    },
                )
                .await
                .unwrap();
        }

        let reopened = PetStore::open(storage_in(&dir)).await;
        let pets = reopened.list().await;
        assert_eq!(pets.len(), 1);
        assert_eq!(pets[0].moments[0].text, "first walk");

        let next = reopened.create(new_pet("Biscuit")).await.unwrap();
        assert_eq!(next.id, 2);
    }

    #[tokio::test]
    async fn test_malformed_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(PETS_FILE), "{not json").unwrap();

        let store = PetStore::open(storage_in(&dir)).await;
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_keeps_memory_authoritative() {
        let store = PetStore::open(ReadOnlyStorage).await;

        let pet = store.create(new_pet("Mochi")).await.unwrap();
        assert_eq!(store.get(pet.id).await.unwrap().name, "Mochi");
        assert!(store.remove(pet.id).await);
    }
}
