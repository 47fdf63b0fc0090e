//! i18n resolution: overlays stored per-field translations onto canonical
//! entity fields, plus language and translation administration.
//!
//! Resolution never fails on an unknown or inactive language code; the
//! canonical fields are returned unchanged.

use std::sync::Arc;

use serde_json::Value;
use shared::pagination::{Pagination, PaginationParams};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::models::{
    CreateLanguageRequest, EntityType, FieldMap, I18nEntry, Language, LocalizedEntity,
    NewTranslation, TranslationQuery, UpdateLanguageRequest, UpsertTranslationRequest,
};
use crate::services::store::EntityStore;

/// Applies `overrides` on top of `canonical`, field by field.
pub fn overlay(mut canonical: FieldMap, overrides: Option<&FieldMap>) -> FieldMap {
    if let Some(overrides) = overrides {
        for (field, value) in overrides {
            canonical.insert(field.clone(), value.clone());
        }
    }
    canonical
}

/// Translation resolver and language administration.
#[derive(Clone)]
pub struct I18nResolver {
    store: Arc<dyn EntityStore>,
    fallback_language: String,
}

impl I18nResolver {
    /// `fallback_language` is treated as the default when the store has no
    /// default language row.
    pub fn new(store: Arc<dyn EntityStore>, fallback_language: impl Into<String>) -> Self {
        Self {
            store,
            fallback_language: fallback_language.into(),
        }
    }

    /// Code of the default language.
    pub async fn default_language_code(&self) -> DomainResult<String> {
        Ok(self
            .store
            .default_language()
            .await?
            .map(|l| l.code)
            .unwrap_or_else(|| self.fallback_language.clone()))
    }

    /// The requested code, or the default language when none was given.
    pub async fn language_or_default(&self, requested: Option<&str>) -> DomainResult<String> {
        match requested.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => Ok(code.to_string()),
            None => self.default_language_code().await,
        }
    }

    /// Canonical fields with the translations for `language_code` applied.
    pub async fn resolve(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
        canonical: FieldMap,
        language_code: &str,
    ) -> DomainResult<FieldMap> {
        if language_code == self.default_language_code().await? {
            return Ok(canonical);
        }

        let mut translations = self
            .store
            .translations_for(entity_type, &[entity_id], language_code)
            .await?;

        tracing::debug!(
            entity_type = %entity_type,
            entity_id = %entity_id,
            language = %language_code,
            translated = translations.contains_key(&entity_id),
            "Resolved translations"
        );

        Ok(overlay(canonical, translations.remove(&entity_id).as_ref()))
    }

    /// Batch form of [`resolve`](Self::resolve) using one translation lookup.
    /// Output order matches input order.
    pub async fn resolve_many(
        &self,
        entity_type: EntityType,
        items: Vec<(Uuid, FieldMap)>,
        language_code: &str,
    ) -> DomainResult<Vec<(Uuid, FieldMap)>> {
        if items.is_empty() || language_code == self.default_language_code().await? {
            return Ok(items);
        }

        let ids: Vec<Uuid> = items.iter().map(|(id, _)| *id).collect();
        let translations = self
            .store
            .translations_for(entity_type, &ids, language_code)
            .await?;

        Ok(items
            .into_iter()
            .map(|(id, canonical)| (id, overlay(canonical, translations.get(&id))))
            .collect())
    }

    /// Inserts or replaces one translated field.
    pub async fn upsert(&self, request: UpsertTranslationRequest) -> DomainResult<I18nEntry> {
        request.validate()?;

        let language = self
            .store
            .find_language_by_code(&request.language_code)
            .await?
            .ok_or_else(|| DomainError::not_found("Language"))?;

        let entry = self
            .store
            .upsert_translation(NewTranslation {
                entity_type: request.entity_type,
                entity_id: request.entity_id,
                language_id: language.id,
                field_name: request.field_name,
                field_value: request.field_value,
            })
            .await?;

        Ok(entry)
    }

    pub async fn list_entries(&self, query: &TranslationQuery) -> DomainResult<Vec<I18nEntry>> {
        Ok(self
            .store
            .list_translations(
                query.entity_type,
                query.entity_id,
                query.language_code.as_deref(),
            )
            .await?)
    }

    pub async fn delete_entry(&self, id: Uuid) -> DomainResult<()> {
        if self.store.delete_translation(id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Translation"))
        }
    }

    pub async fn list_languages(&self) -> DomainResult<Vec<Language>> {
        Ok(self.store.list_languages().await?)
    }

    pub async fn create_language(&self, request: CreateLanguageRequest) -> DomainResult<Language> {
        request.validate()?;

        if self
            .store
            .find_language_by_code(&request.code)
            .await?
            .is_some()
        {
            return Err(DomainError::conflict(format!(
                "Language '{}' already exists",
                request.code
            )));
        }

        if request.is_default && !request.is_active {
            return Err(DomainError::invalid("The default language must be active"));
        }

        Ok(self.store.create_language(request.into()).await?)
    }

    pub async fn update_language(
        &self,
        id: Uuid,
        request: UpdateLanguageRequest,
    ) -> DomainResult<Language> {
        request.validate()?;

        let current = self
            .store
            .find_language(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Language"))?;

        if current.is_default && request.is_default == Some(false) {
            return Err(DomainError::invalid(
                "Set another language as default instead of unsetting the default",
            ));
        }
        let will_be_default = request.is_default.unwrap_or(current.is_default);
        let will_be_active = request.is_active.unwrap_or(current.is_active);
        if will_be_default && !will_be_active {
            return Err(DomainError::invalid("The default language must be active"));
        }

        self.store
            .update_language(id, request.into())
            .await?
            .ok_or_else(|| DomainError::not_found("Language"))
    }

    /// Deletes a language and its translations. The default language cannot
    /// be deleted.
    pub async fn delete_language(&self, id: Uuid) -> DomainResult<()> {
        let language = self
            .store
            .find_language(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Language"))?;

        if language.is_default {
            return Err(DomainError::invalid("The default language cannot be deleted"));
        }

        if self.store.delete_language(id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Language"))
        }
    }

    /// A published product or post, localized.
    pub async fn resolve_entity(
        &self,
        entity_type: EntityType,
        slug: &str,
        language: Option<&str>,
    ) -> DomainResult<LocalizedEntity> {
        ensure_catalog(entity_type)?;
        let language = self.language_or_default(language).await?;

        let entity = self
            .store
            .find_published_entity(entity_type, slug)
            .await?
            .ok_or_else(|| DomainError::not_found(entity_label(entity_type)))?;

        let fields = self
            .resolve(entity_type, entity.id, entity.fields, &language)
            .await?;

        Ok(LocalizedEntity {
            id: entity.id,
            slug: entity.slug,
            language,
            fields,
        })
    }

    /// A page of published products or posts, localized with one lookup.
    pub async fn resolve_entities(
        &self,
        entity_type: EntityType,
        pagination: &PaginationParams,
        language: Option<&str>,
    ) -> DomainResult<(Vec<LocalizedEntity>, Pagination)> {
        ensure_catalog(entity_type)?;
        let language = self.language_or_default(language).await?;

        let entities = self
            .store
            .list_published_entities(
                entity_type,
                pagination.limit() as i64,
                pagination.offset(),
            )
            .await?;
        let total = self.store.count_published_entities(entity_type).await?;

        let slugs: Vec<(Uuid, String)> = entities.iter().map(|e| (e.id, e.slug.clone())).collect();
        let items = entities.into_iter().map(|e| (e.id, e.fields)).collect();
        let resolved = self.resolve_many(entity_type, items, &language).await?;

        let localized = resolved
            .into_iter()
            .zip(slugs)
            .map(|((id, fields), (_, slug))| LocalizedEntity {
                id,
                slug,
                language: language.clone(),
                fields,
            })
            .collect();

        Ok((localized, pagination.meta(total)))
    }
}

fn ensure_catalog(entity_type: EntityType) -> DomainResult<()> {
    if entity_type.is_catalog() {
        Ok(())
    } else {
        Err(DomainError::invalid(format!(
            "Entity type '{}' is not served as a standalone record",
            entity_type
        )))
    }
}

fn entity_label(entity_type: EntityType) -> &'static str {
    match entity_type {
        EntityType::Product => "Product",
        EntityType::Post => "Post",
        EntityType::Page => "Page",
        EntityType::PageComponent => "Component",
    }
}

/// Reads a string field, ignoring non-string translations.
pub fn string_field(fields: &FieldMap, name: &str) -> Option<String> {
    fields.get(name).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CanonicalEntity, NewLanguage};
    use crate::services::memory::InMemoryStore;
    use serde_json::json;

    fn fields(value: Value) -> FieldMap {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    async fn setup() -> (Arc<InMemoryStore>, I18nResolver) {
        let store = Arc::new(InMemoryStore::seeded());
        store
            .create_language(NewLanguage {
                code: "hi".to_string(),
                name: "Hindi".to_string(),
                native_name: Some("हिन्दी".to_string()),
                is_default: false,
                is_active: true,
            })
            .await
            .unwrap();
        let resolver = I18nResolver::new(store.clone(), "en");
        (store, resolver)
    }

    fn upsert_request(entity_id: Uuid, code: &str, field: &str, value: Value) -> UpsertTranslationRequest {
        UpsertTranslationRequest {
            entity_type: EntityType::Product,
            entity_id,
            language_code: code.to_string(),
            field_name: field.to_string(),
            field_value: value,
        }
    }

    #[tokio::test]
    async fn test_resolve_overrides_only_translated_fields() {
        let (_, resolver) = setup().await;
        let product_id = Uuid::new_v4();
        resolver
            .upsert(upsert_request(product_id, "hi", "name", json!("उत्पाद")))
            .await
            .unwrap();

        let canonical = fields(json!({"name": "Product", "description": "Desc"}));
        let resolved = resolver
            .resolve(EntityType::Product, product_id, canonical, "hi")
            .await
            .unwrap();

        assert_eq!(resolved, fields(json!({"name": "उत्पाद", "description": "Desc"})));
    }

    #[tokio::test]
    async fn test_resolve_unknown_language_falls_back() {
        let (_, resolver) = setup().await;
        let product_id = Uuid::new_v4();
        resolver
            .upsert(upsert_request(product_id, "hi", "name", json!("उत्पाद")))
            .await
            .unwrap();

        let canonical = fields(json!({"name": "Product", "description": "Desc"}));
        let resolved = resolver
            .resolve(EntityType::Product, product_id, canonical.clone(), "de")
            .await
            .unwrap();

        assert_eq!(resolved, canonical);
    }

    #[tokio::test]
    async fn test_resolve_default_language_returns_canonical() {
        let (_, resolver) = setup().await;
        let product_id = Uuid::new_v4();
        resolver
            .upsert(upsert_request(product_id, "en", "name", json!("Overridden")))
            .await
            .unwrap();

        let canonical = fields(json!({"name": "Product"}));
        let resolved = resolver
            .resolve(EntityType::Product, product_id, canonical.clone(), "en")
            .await
            .unwrap();

        assert_eq!(resolved, canonical);
    }

    #[tokio::test]
    async fn test_fallback_language_used_without_default_row() {
        let store = Arc::new(InMemoryStore::new());
        let resolver = I18nResolver::new(store, "en");
        assert_eq!(resolver.default_language_code().await.unwrap(), "en");
        assert_eq!(resolver.language_or_default(None).await.unwrap(), "en");
        assert_eq!(resolver.language_or_default(Some("hi")).await.unwrap(), "hi");
    }

    #[tokio::test]
    async fn test_resolve_many_matches_pointwise() {
        let (_, resolver) = setup().await;
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        resolver
            .upsert(upsert_request(b, "hi", "name", json!("बी")))
            .await
            .unwrap();

        let items = vec![
            (a, fields(json!({"name": "A"}))),
            (b, fields(json!({"name": "B"}))),
        ];
        let resolved = resolver
            .resolve_many(EntityType::Product, items.clone(), "hi")
            .await
            .unwrap();

        for ((id, canonical), (resolved_id, resolved_fields)) in items.into_iter().zip(resolved) {
            assert_eq!(id, resolved_id);
            let single = resolver
                .resolve(EntityType::Product, id, canonical, "hi")
                .await
                .unwrap();
            assert_eq!(single, resolved_fields);
        }
    }

    #[tokio::test]
    async fn test_upsert_replaces_value() {
        let (store, resolver) = setup().await;
        let id = Uuid::new_v4();
        resolver
            .upsert(upsert_request(id, "hi", "name", json!("one")))
            .await
            .unwrap();
        resolver
            .upsert(upsert_request(id, "hi", "name", json!("two")))
            .await
            .unwrap();

        let entries = store
            .list_translations(EntityType::Product, id, Some("hi"))
            .await
            .unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].field_value, json!("two"));
    }

    #[tokio::test]
    async fn test_upsert_unknown_language_not_found() {
        let (_, resolver) = setup().await;
        let result = resolver
            .upsert(upsert_request(Uuid::new_v4(), "fr", "name", json!("x")))
            .await;
        assert_eq!(result, Err(DomainError::not_found("Language")));
    }

    #[tokio::test]
    async fn test_delete_entry() {
        let (_, resolver) = setup().await;
        let entry = resolver
            .upsert(upsert_request(Uuid::new_v4(), "hi", "name", json!("x")))
            .await
            .unwrap();

        resolver.delete_entry(entry.id).await.unwrap();
        assert!(matches!(
            resolver.delete_entry(entry.id).await,
            Err(DomainError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_create_language_conflict_and_format() {
        let (_, resolver) = setup().await;
        let request = |code: &str| CreateLanguageRequest {
            code: code.to_string(),
            name: "Lang".to_string(),
            native_name: None,
            is_default: false,
            is_active: true,
        };

        assert!(matches!(
            resolver.create_language(request("hi")).await,
            Err(DomainError::Conflict(_))
        ));
        assert!(matches!(
            resolver.create_language(request("Hindi")).await,
            Err(DomainError::InvalidArgument(_))
        ));
        assert!(resolver.create_language(request("pt-BR")).await.is_ok());
    }

    #[tokio::test]
    async fn test_default_language_cannot_be_deleted() {
        let (store, resolver) = setup().await;
        let en = store.default_language().await.unwrap().unwrap();
        assert!(matches!(
            resolver.delete_language(en.id).await,
            Err(DomainError::InvalidArgument(_))
        ));

        let hi = store.find_language_by_code("hi").await.unwrap().unwrap();
        resolver.delete_language(hi.id).await.unwrap();
        assert!(store.find_language_by_code("hi").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_switching_default_language() {
        let (store, resolver) = setup().await;
        let hi = store.find_language_by_code("hi").await.unwrap().unwrap();

        let updated = resolver
            .update_language(
                hi.id,
                UpdateLanguageRequest {
                    is_default: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert!(updated.is_default);
        assert_eq!(resolver.default_language_code().await.unwrap(), "hi");

        let en = store.find_language_by_code("en").await.unwrap().unwrap();
        assert!(!en.is_default);
    }

    #[tokio::test]
    async fn test_unsetting_default_rejected() {
        let (store, resolver) = setup().await;
        let en = store.default_language().await.unwrap().unwrap();
        let result = resolver
            .update_language(
                en.id,
                UpdateLanguageRequest {
                    is_default: Some(false),
                    ..Default::default()
                },
            )
            .await;
        assert!(matches!(result, Err(DomainError::InvalidArgument(_))));
    }

    #[tokio::test]
    async fn test_resolve_entity_and_list() {
        let (store, resolver) = setup().await;
        let published = CanonicalEntity {
            id: Uuid::new_v4(),
            slug: "widget".to_string(),
            fields: fields(json!({"name": "Widget", "price": 10})),
        };
        let draft = CanonicalEntity {
            id: Uuid::new_v4(),
            slug: "draft".to_string(),
            fields: fields(json!({"name": "Draft"})),
        };
        store
            .insert_entity(EntityType::Product, published.clone(), true)
            .await;
        store.insert_entity(EntityType::Product, draft, false).await;
        resolver
            .upsert(upsert_request(published.id, "hi", "name", json!("विजेट")))
            .await
            .unwrap();

        let localized = resolver
            .resolve_entity(EntityType::Product, "widget", Some("hi"))
            .await
            .unwrap();
        assert_eq!(localized.language, "hi");
        assert_eq!(localized.fields["name"], json!("विजेट"));
        assert_eq!(localized.fields["price"], json!(10));

        assert!(matches!(
            resolver
                .resolve_entity(EntityType::Product, "draft", None)
                .await,
            Err(DomainError::NotFound(_))
        ));

        let (items, meta) = resolver
            .resolve_entities(EntityType::Product, &PaginationParams::default(), Some("hi"))
            .await
            .unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(meta.total, 1);
        assert_eq!(items[0].fields["name"], json!("विजेट"));
    }

    #[tokio::test]
    async fn test_resolve_entity_rejects_page_type() {
        let (_, resolver) = setup().await;
        assert!(matches!(
            resolver.resolve_entity(EntityType::Page, "home", None).await,
            Err(DomainError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_overlay_and_string_field() {
        let merged = overlay(
            fields(json!({"title": "Hello", "body": "World"})),
            Some(&fields(json!({"title": "Namaste", "extra": 1}))),
        );
        assert_eq!(string_field(&merged, "title").as_deref(), Some("Namaste"));
        assert_eq!(string_field(&merged, "body").as_deref(), Some("World"));
        assert_eq!(string_field(&merged, "extra"), None);
    }
}
