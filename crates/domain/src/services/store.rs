//! Entity store abstraction used by every domain service.
//!
//! Implemented over PostgreSQL in the persistence crate and in memory by
//! [`crate::services::memory::InMemoryStore`]. Multi-row writes
//! (`apply_sort_orders`, `delete_page_cascade`, default-language switches) are
//! all-or-nothing.

use std::collections::HashMap;

use thiserror::Error;
use uuid::Uuid;

use crate::models::{
    CanonicalEntity, ComponentDefinition, EntityType, FieldMap, I18nEntry, Language,
    LanguageChanges, NewLanguage, NewPage, NewPageComponent, NewRedirect, NewTranslation, Page,
    PageChanges, PageComponent, Redirect, RedirectChanges, SortAssignment,
};

/// Errors raised by store implementations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// Connection, timeout or any other driver failure.
    #[error("Store unavailable: {0}")]
    Unavailable(String),

    #[error("Unique constraint violated: {0}")]
    UniqueViolation(String),

    #[error("Referenced row does not exist: {0}")]
    ForeignKeyViolation(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Persistence operations required by the CMS services.
#[async_trait::async_trait]
pub trait EntityStore: Send + Sync {
    /// Readiness check.
    async fn ping(&self) -> StoreResult<()>;

    // Pages

    /// Pages ordered newest first.
    async fn list_pages(&self, limit: i64, offset: i64) -> StoreResult<Vec<Page>>;

    async fn count_pages(&self) -> StoreResult<i64>;

    async fn find_page(&self, id: Uuid) -> StoreResult<Option<Page>>;

    async fn find_page_by_slug(&self, slug: &str, published_only: bool)
        -> StoreResult<Option<Page>>;

    /// Fails with `UniqueViolation` on a duplicate slug.
    async fn create_page(&self, page: NewPage) -> StoreResult<Page>;

    async fn update_page(&self, id: Uuid, changes: PageChanges) -> StoreResult<Option<Page>>;

    /// Deletes the page and all of its components in one transaction.
    async fn delete_page_cascade(&self, id: Uuid) -> StoreResult<bool>;

    // Component catalog

    /// Active definitions only, ordered by name.
    async fn list_component_definitions(&self) -> StoreResult<Vec<ComponentDefinition>>;

    async fn find_component_definition(&self, id: Uuid)
        -> StoreResult<Option<ComponentDefinition>>;

    // Page components

    /// Components of a page in ascending `sort_order`.
    async fn list_page_components(&self, page_id: Uuid) -> StoreResult<Vec<PageComponent>>;

    async fn find_page_component(&self, id: Uuid) -> StoreResult<Option<PageComponent>>;

    /// Fails with `UniqueViolation` if the sort order is taken on the page.
    async fn insert_page_component(&self, component: NewPageComponent)
        -> StoreResult<PageComponent>;

    /// `None` fields stay unchanged.
    async fn update_page_component(
        &self,
        id: Uuid,
        props: Option<serde_json::Value>,
        is_visible: Option<bool>,
    ) -> StoreResult<Option<PageComponent>>;

    async fn delete_page_component(&self, id: Uuid) -> StoreResult<bool>;

    /// Applies every assignment or none. Each id must belong to `page_id`.
    async fn apply_sort_orders(
        &self,
        page_id: Uuid,
        assignments: &[SortAssignment],
    ) -> StoreResult<()>;

    // Languages

    async fn list_languages(&self) -> StoreResult<Vec<Language>>;

    async fn find_language(&self, id: Uuid) -> StoreResult<Option<Language>>;

    async fn find_language_by_code(&self, code: &str) -> StoreResult<Option<Language>>;

    async fn default_language(&self) -> StoreResult<Option<Language>>;

    /// A new default clears the previous one in the same transaction.
    async fn create_language(&self, language: NewLanguage) -> StoreResult<Language>;

    /// A new default clears the previous one in the same transaction.
    async fn update_language(
        &self,
        id: Uuid,
        changes: LanguageChanges,
    ) -> StoreResult<Option<Language>>;

    /// Removes the language and its translations.
    async fn delete_language(&self, id: Uuid) -> StoreResult<bool>;

    // Translations

    /// Translated fields per entity for an active language, in one lookup.
    /// Entities without translations are absent from the map.
    async fn translations_for(
        &self,
        entity_type: EntityType,
        entity_ids: &[Uuid],
        language_code: &str,
    ) -> StoreResult<HashMap<Uuid, FieldMap>>;

    /// Insert-or-replace on `(entity_type, entity_id, language_id, field_name)`.
    async fn upsert_translation(&self, translation: NewTranslation) -> StoreResult<I18nEntry>;

    async fn list_translations(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
        language_code: Option<&str>,
    ) -> StoreResult<Vec<I18nEntry>>;

    async fn delete_translation(&self, id: Uuid) -> StoreResult<bool>;

    // Redirects

    /// All redirects, newest first.
    async fn list_redirects(&self, limit: i64, offset: i64) -> StoreResult<Vec<Redirect>>;

    async fn count_redirects(&self) -> StoreResult<i64>;

    /// Active redirects, newest first.
    async fn list_active_redirects(&self) -> StoreResult<Vec<Redirect>>;

    async fn find_redirect(&self, id: Uuid) -> StoreResult<Option<Redirect>>;

    async fn find_active_redirect_by_path(&self, from_path: &str)
        -> StoreResult<Option<Redirect>>;

    /// Fails with `UniqueViolation` if an active redirect exists for the path.
    async fn insert_redirect(&self, redirect: NewRedirect) -> StoreResult<Redirect>;

    async fn update_redirect(
        &self,
        id: Uuid,
        changes: RedirectChanges,
    ) -> StoreResult<Option<Redirect>>;

    async fn delete_redirect(&self, id: Uuid) -> StoreResult<bool>;

    // Localizable records

    async fn find_published_entity(
        &self,
        entity_type: EntityType,
        slug: &str,
    ) -> StoreResult<Option<CanonicalEntity>>;

    /// Published records, newest first.
    async fn list_published_entities(
        &self,
        entity_type: EntityType,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<CanonicalEntity>>;

    async fn count_published_entities(&self, entity_type: EntityType) -> StoreResult<i64>;
}
