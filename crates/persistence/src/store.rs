//! PostgreSQL implementation of the domain entity store.

use std::collections::HashMap;

use domain::models::{
    CanonicalEntity, ComponentDefinition, EntityType, FieldMap, I18nEntry, Language,
    LanguageChanges, NewLanguage, NewPage, NewPageComponent, NewRedirect, NewTranslation, Page,
    PageChanges, PageComponent, Redirect, RedirectChanges, SortAssignment,
};
use domain::services::{EntityStore, StoreError, StoreResult};
use sqlx::PgPool;
use uuid::Uuid;

use crate::metrics::record_store_error;
use crate::repositories::{
    ComponentRepository, LanguageRepository, LocalizableRepository, PageRepository,
    RedirectRepository, TranslationRepository,
};

/// PostgreSQL SQLSTATE for unique_violation.
const UNIQUE_VIOLATION: &str = "23505";
/// PostgreSQL SQLSTATE for foreign_key_violation.
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Maps driver errors onto the store error taxonomy.
pub fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        let detail = db_err
            .constraint()
            .map(str::to_string)
            .unwrap_or_else(|| db_err.message().to_string());
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                record_store_error("unique_violation");
                return StoreError::UniqueViolation(detail);
            }
            Some(FOREIGN_KEY_VIOLATION) => {
                record_store_error("foreign_key_violation");
                return StoreError::ForeignKeyViolation(detail);
            }
            _ => {}
        }
    }
    tracing::error!(error = %err, "Database error");
    record_store_error("unavailable");
    StoreError::Unavailable(err.to_string())
}

fn corrupt_row(err: String) -> StoreError {
    tracing::error!(error = %err, "Stored row could not be decoded");
    record_store_error("corrupt_row");
    StoreError::Unavailable(format!("Corrupt row: {}", err))
}

fn decode_all<E, T>(rows: Vec<E>) -> StoreResult<Vec<T>>
where
    T: TryFrom<E, Error = String>,
{
    rows.into_iter()
        .map(|row| T::try_from(row).map_err(corrupt_row))
        .collect()
}

fn decode_opt<E, T>(row: Option<E>) -> StoreResult<Option<T>>
where
    T: TryFrom<E, Error = String>,
{
    row.map(|r| T::try_from(r).map_err(corrupt_row)).transpose()
}

/// Entity store backed by a PostgreSQL pool.
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
    pages: PageRepository,
    components: ComponentRepository,
    languages: LanguageRepository,
    translations: TranslationRepository,
    redirects: RedirectRepository,
    localizable: LocalizableRepository,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pages: PageRepository::new(pool.clone()),
            components: ComponentRepository::new(pool.clone()),
            languages: LanguageRepository::new(pool.clone()),
            translations: TranslationRepository::new(pool.clone()),
            redirects: RedirectRepository::new(pool.clone()),
            localizable: LocalizableRepository::new(pool.clone()),
            pool,
        }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl EntityStore for PgStore {
    async fn ping(&self) -> StoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        crate::metrics::record_pool_metrics(&self.pool);
        Ok(())
    }

    async fn list_pages(&self, limit: i64, offset: i64) -> StoreResult<Vec<Page>> {
        let pages = self
            .pages
            .list(limit, offset)
            .await
            .map_err(map_sqlx_error)?;
        Ok(pages.into_iter().map(Into::into).collect())
    }

    async fn count_pages(&self) -> StoreResult<i64> {
        self.pages.count().await.map_err(map_sqlx_error)
    }

    async fn find_page(&self, id: Uuid) -> StoreResult<Option<Page>> {
        let page = self.pages.find_by_id(id).await.map_err(map_sqlx_error)?;
        Ok(page.map(Into::into))
    }

    async fn find_page_by_slug(
        &self,
        slug: &str,
        published_only: bool,
    ) -> StoreResult<Option<Page>> {
        let page = self
            .pages
            .find_by_slug(slug, published_only)
            .await
            .map_err(map_sqlx_error)?;
        Ok(page.map(Into::into))
    }

    async fn create_page(&self, page: NewPage) -> StoreResult<Page> {
        let created = self.pages.create(&page).await.map_err(map_sqlx_error)?;
        Ok(created.into())
    }

    async fn update_page(&self, id: Uuid, changes: PageChanges) -> StoreResult<Option<Page>> {
        let updated = self
            .pages
            .update(id, &changes)
            .await
            .map_err(map_sqlx_error)?;
        Ok(updated.map(Into::into))
    }

    async fn delete_page_cascade(&self, id: Uuid) -> StoreResult<bool> {
        self.pages.delete_cascade(id).await.map_err(map_sqlx_error)
    }

    async fn list_component_definitions(&self) -> StoreResult<Vec<ComponentDefinition>> {
        let rows = self
            .components
            .list_definitions()
            .await
            .map_err(map_sqlx_error)?;
        decode_all(rows)
    }

    async fn find_component_definition(
        &self,
        id: Uuid,
    ) -> StoreResult<Option<ComponentDefinition>> {
        let row = self
            .components
            .find_definition(id)
            .await
            .map_err(map_sqlx_error)?;
        decode_opt(row)
    }

    async fn list_page_components(&self, page_id: Uuid) -> StoreResult<Vec<PageComponent>> {
        let rows = self
            .components
            .list_for_page(page_id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_page_component(&self, id: Uuid) -> StoreResult<Option<PageComponent>> {
        let row = self
            .components
            .find_by_id(id)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn insert_page_component(
        &self,
        component: NewPageComponent,
    ) -> StoreResult<PageComponent> {
        let row = self
            .components
            .insert(&component)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update_page_component(
        &self,
        id: Uuid,
        props: Option<serde_json::Value>,
        is_visible: Option<bool>,
    ) -> StoreResult<Option<PageComponent>> {
        let row = self
            .components
            .update(id, props.as_ref(), is_visible)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete_page_component(&self, id: Uuid) -> StoreResult<bool> {
        self.components.delete(id).await.map_err(map_sqlx_error)
    }

    async fn apply_sort_orders(
        &self,
        page_id: Uuid,
        assignments: &[SortAssignment],
    ) -> StoreResult<()> {
        if assignments.is_empty() {
            return Ok(());
        }
        let ids: Vec<Uuid> = assignments.iter().map(|a| a.id).collect();
        let sort_orders: Vec<i32> = assignments.iter().map(|a| a.sort_order).collect();

        let applied = self
            .components
            .apply_sort_orders(page_id, &ids, &sort_orders)
            .await
            .map_err(map_sqlx_error)?;
        if !applied {
            return Err(StoreError::ForeignKeyViolation(
                "page_components_page_id_fkey".to_string(),
            ));
        }
        Ok(())
    }

    async fn list_languages(&self) -> StoreResult<Vec<Language>> {
        let rows = self.languages.list().await.map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_language(&self, id: Uuid) -> StoreResult<Option<Language>> {
        let row = self.languages.find_by_id(id).await.map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn find_language_by_code(&self, code: &str) -> StoreResult<Option<Language>> {
        let row = self
            .languages
            .find_by_code(code)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn default_language(&self) -> StoreResult<Option<Language>> {
        let row = self.languages.find_default().await.map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn create_language(&self, language: NewLanguage) -> StoreResult<Language> {
        let row = self
            .languages
            .create(&language)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.into())
    }

    async fn update_language(
        &self,
        id: Uuid,
        changes: LanguageChanges,
    ) -> StoreResult<Option<Language>> {
        let row = self
            .languages
            .update(id, &changes)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn delete_language(&self, id: Uuid) -> StoreResult<bool> {
        self.languages.delete(id).await.map_err(map_sqlx_error)
    }

    async fn translations_for(
        &self,
        entity_type: EntityType,
        entity_ids: &[Uuid],
        language_code: &str,
    ) -> StoreResult<HashMap<Uuid, FieldMap>> {
        if entity_ids.is_empty() {
            return Ok(HashMap::new());
        }
        let rows = self
            .translations
            .fields_for(entity_type, entity_ids, language_code)
            .await
            .map_err(map_sqlx_error)?;

        let mut by_entity: HashMap<Uuid, FieldMap> = HashMap::new();
        for row in rows {
            by_entity
                .entry(row.entity_id)
                .or_default()
                .insert(row.field_name, row.field_value);
        }
        Ok(by_entity)
    }

    async fn upsert_translation(&self, translation: NewTranslation) -> StoreResult<I18nEntry> {
        let row = self
            .translations
            .upsert(&translation)
            .await
            .map_err(map_sqlx_error)?;
        I18nEntry::try_from(row).map_err(corrupt_row)
    }

    async fn list_translations(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
        language_code: Option<&str>,
    ) -> StoreResult<Vec<I18nEntry>> {
        let rows = self
            .translations
            .list_for_entity(entity_type, entity_id, language_code)
            .await
            .map_err(map_sqlx_error)?;
        decode_all(rows)
    }

    async fn delete_translation(&self, id: Uuid) -> StoreResult<bool> {
        self.translations.delete(id).await.map_err(map_sqlx_error)
    }

    async fn list_redirects(&self, limit: i64, offset: i64) -> StoreResult<Vec<Redirect>> {
        let rows = self
            .redirects
            .list(limit, offset)
            .await
            .map_err(map_sqlx_error)?;
        decode_all(rows)
    }

    async fn count_redirects(&self) -> StoreResult<i64> {
        self.redirects.count().await.map_err(map_sqlx_error)
    }

    async fn list_active_redirects(&self) -> StoreResult<Vec<Redirect>> {
        let rows = self.redirects.list_active().await.map_err(map_sqlx_error)?;
        decode_all(rows)
    }

    async fn find_redirect(&self, id: Uuid) -> StoreResult<Option<Redirect>> {
        let row = self.redirects.find_by_id(id).await.map_err(map_sqlx_error)?;
        decode_opt(row)
    }

    async fn find_active_redirect_by_path(
        &self,
        from_path: &str,
    ) -> StoreResult<Option<Redirect>> {
        let row = self
            .redirects
            .find_active_by_path(from_path)
            .await
            .map_err(map_sqlx_error)?;
        decode_opt(row)
    }

    async fn insert_redirect(&self, redirect: NewRedirect) -> StoreResult<Redirect> {
        let row = self
            .redirects
            .insert(&redirect)
            .await
            .map_err(map_sqlx_error)?;
        Redirect::try_from(row).map_err(corrupt_row)
    }

    async fn update_redirect(
        &self,
        id: Uuid,
        changes: RedirectChanges,
    ) -> StoreResult<Option<Redirect>> {
        let row = self
            .redirects
            .update(id, &changes)
            .await
            .map_err(map_sqlx_error)?;
        decode_opt(row)
    }

    async fn delete_redirect(&self, id: Uuid) -> StoreResult<bool> {
        self.redirects.delete(id).await.map_err(map_sqlx_error)
    }

    async fn find_published_entity(
        &self,
        entity_type: EntityType,
        slug: &str,
    ) -> StoreResult<Option<CanonicalEntity>> {
        let row = self
            .localizable
            .find_published(entity_type, slug)
            .await
            .map_err(map_sqlx_error)?;
        Ok(row.map(Into::into))
    }

    async fn list_published_entities(
        &self,
        entity_type: EntityType,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<CanonicalEntity>> {
        let rows = self
            .localizable
            .list_published(entity_type, limit, offset)
            .await
            .map_err(map_sqlx_error)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_published_entities(&self, entity_type: EntityType) -> StoreResult<i64> {
        self.localizable
            .count_published(entity_type)
            .await
            .map_err(map_sqlx_error)
    }
}
