use metrics_exporter_prometheus::PrometheusHandle;
use realty_site::contact::{ContactId, ContactRepository, ContactRequest, ContactService};
use realty_site::content::{ContentId, ContentKind, ContentRecord, ContentRepository, ContentService};
use realty_site::error::RepositoryError;
use realty_site::notify::NotificationPublisher;
use realty_site::property::{Property, PropertyId, PropertyRepository, PropertyService};
use realty_site::seo::{RepositorySeoSource, SeoSource, SiteDefaults};
use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex, MutexGuard};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Keyed records behind a mutex; the backing for every in-process repository.
struct Table<K, V> {
    rows: Mutex<HashMap<K, V>>,
}

impl<K, V> Default for Table<K, V> {
    fn default() -> Self {
        Self {
            rows: Mutex::new(HashMap::new()),
        }
    }
}

impl<K, V> Table<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn lock(&self) -> Result<MutexGuard<'_, HashMap<K, V>>, RepositoryError> {
        self.rows
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }

    fn insert(&self, key: K, value: V) -> Result<V, RepositoryError> {
        let mut guard = self.lock()?;
        if guard.contains_key(&key) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(key, value.clone());
        Ok(value)
    }

    fn update(&self, key: K, value: V) -> Result<V, RepositoryError> {
        let mut guard = self.lock()?;
        match guard.get_mut(&key) {
            Some(slot) => {
                *slot = value.clone();
                Ok(value)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch(&self, key: &K) -> Result<Option<V>, RepositoryError> {
        Ok(self.lock()?.get(key).cloned())
    }

    /// Edits a row in place while the lock is held.
    fn modify(&self, key: &K, edit: impl FnOnce(&mut V)) -> Result<V, RepositoryError> {
        let mut guard = self.lock()?;
        let slot = guard.get_mut(key).ok_or(RepositoryError::NotFound)?;
        edit(slot);
        Ok(slot.clone())
    }

    fn delete(&self, key: &K) -> Result<V, RepositoryError> {
        self.lock()?.remove(key).ok_or(RepositoryError::NotFound)
    }

    fn values(&self) -> Result<Vec<V>, RepositoryError> {
        Ok(self.lock()?.values().cloned().collect())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryContentRepository {
    table: Table<ContentId, ContentRecord>,
}

impl ContentRepository for InMemoryContentRepository {
    fn insert(&self, record: ContentRecord) -> Result<ContentRecord, RepositoryError> {
        self.table.insert(record.id.clone(), record)
    }

    fn update(&self, record: ContentRecord) -> Result<ContentRecord, RepositoryError> {
        self.table.update(record.id.clone(), record)
    }

    fn fetch(&self, id: &ContentId) -> Result<Option<ContentRecord>, RepositoryError> {
        self.table.fetch(id)
    }

    fn delete(&self, id: &ContentId) -> Result<ContentRecord, RepositoryError> {
        self.table.delete(id)
    }

    fn increment_views(&self, id: &ContentId) -> Result<ContentRecord, RepositoryError> {
        self.table.modify(id, |record| record.views += 1)
    }

    fn list(&self, kind: ContentKind) -> Result<Vec<ContentRecord>, RepositoryError> {
        Ok(self
            .table
            .values()?
            .into_iter()
            .filter(|record| record.kind == kind)
            .collect())
    }
}

#[derive(Default)]
pub(crate) struct InMemoryPropertyRepository {
    table: Table<PropertyId, Property>,
}

impl PropertyRepository for InMemoryPropertyRepository {
    fn insert(&self, property: Property) -> Result<Property, RepositoryError> {
        self.table.insert(property.id.clone(), property)
    }

    fn update(&self, property: Property) -> Result<Property, RepositoryError> {
        self.table.update(property.id.clone(), property)
    }

    fn fetch(&self, id: &PropertyId) -> Result<Option<Property>, RepositoryError> {
        self.table.fetch(id)
    }

    fn delete(&self, id: &PropertyId) -> Result<Property, RepositoryError> {
        self.table.delete(id)
    }

    fn all(&self) -> Result<Vec<Property>, RepositoryError> {
        self.table.values()
    }
}

#[derive(Default)]
pub(crate) struct InMemoryContactRepository {
    table: Table<ContactId, ContactRequest>,
}

impl ContactRepository for InMemoryContactRepository {
    fn insert(&self, request: ContactRequest) -> Result<ContactRequest, RepositoryError> {
        self.table.insert(request.id.clone(), request)
    }

    fn update(&self, request: ContactRequest) -> Result<ContactRequest, RepositoryError> {
        self.table.update(request.id.clone(), request)
    }

    fn fetch(&self, id: &ContactId) -> Result<Option<ContactRequest>, RepositoryError> {
        self.table.fetch(id)
    }

    fn delete(&self, id: &ContactId) -> Result<ContactRequest, RepositoryError> {
        self.table.delete(id)
    }

    fn all(&self) -> Result<Vec<ContactRequest>, RepositoryError> {
        self.table.values()
    }
}

/// The process-local document store shared by every service.
#[derive(Default, Clone)]
pub(crate) struct Stores {
    content: Arc<InMemoryContentRepository>,
    properties: Arc<InMemoryPropertyRepository>,
    contacts: Arc<InMemoryContactRepository>,
}

impl Stores {
    pub(crate) fn content_service(&self) -> ContentService<InMemoryContentRepository> {
        ContentService::new(self.content.clone())
    }

    pub(crate) fn property_service(&self) -> PropertyService<InMemoryPropertyRepository> {
        PropertyService::new(self.properties.clone())
    }

    pub(crate) fn contact_service(
        &self,
        publisher: Arc<dyn NotificationPublisher>,
    ) -> ContactService<InMemoryContactRepository> {
        ContactService::new(self.contacts.clone(), publisher)
    }

    pub(crate) fn seo_source(&self, site: &SiteDefaults) -> Arc<dyn SeoSource> {
        Arc::new(RepositorySeoSource::new(
            self.content_service(),
            self.property_service(),
            site.clone(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_rejects_duplicate_inserts_and_unknown_updates() {
        let table: Table<String, u32> = Table::default();
        table.insert("a".to_string(), 1).expect("first insert");
        assert!(matches!(
            table.insert("a".to_string(), 2),
            Err(RepositoryError::Conflict)
        ));
        assert!(matches!(
            table.update("b".to_string(), 3),
            Err(RepositoryError::NotFound)
        ));
        assert_eq!(table.update("a".to_string(), 4).expect("update"), 4);
        assert_eq!(table.delete(&"a".to_string()).expect("delete"), 4);
        assert!(table.values().expect("values").is_empty());
    }

    #[test]
    fn content_listing_is_scoped_by_kind() {
        let stores = Stores::default();
        crate::seed::load(&stores).expect("seed loads");
        let faq = stores.content.list(ContentKind::Faq).expect("faq");
        assert!(!faq.is_empty());
        assert!(faq.iter().all(|record| record.kind == ContentKind::Faq));
    }

    #[test]
    fn view_increment_edits_the_stored_record() {
        let stores = Stores::default();
        crate::seed::load(&stores).expect("seed loads");
        let mut post = stores
            .content
            .list(ContentKind::Blog)
            .expect("blog")
            .into_iter()
            .next()
            .expect("seeded post");

        post.excerpt.en = "Edited".to_string();
        stores.content.update(post.clone()).expect("admin edit");

        let counted = stores.content.increment_views(&post.id).expect("counted");
        assert_eq!(counted.views, post.views + 1);
        assert_eq!(counted.excerpt.en, "Edited");
        assert!(matches!(
            stores
                .content
                .increment_views(&ContentId("missing".to_string())),
            Err(RepositoryError::NotFound)
        ));
    }
}
