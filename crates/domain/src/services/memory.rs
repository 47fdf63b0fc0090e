//! In-memory [`EntityStore`] used by tests and local tooling.
//!
//! Mirrors the PostgreSQL constraints: unique page slugs, unique sort orders per
//! page, unique language codes, one active redirect per path, and foreign keys
//! from page components to pages and catalog entries. Every multi-row write
//! happens under a single write lock.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde_json::{json, Value};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::models::{
    CanonicalEntity, ComponentDefinition, ComponentProps, ComponentSummary, ComponentType,
    EntityType, FieldMap, I18nEntry, Language, LanguageChanges, NewLanguage, NewPage,
    NewPageComponent, NewRedirect, NewTranslation, Page, PageChanges, PageComponent, Redirect,
    RedirectChanges, SortAssignment, FALLBACK_LANGUAGE,
};
use crate::services::store::{EntityStore, StoreError, StoreResult};

#[derive(Debug, Clone)]
struct StoredComponent {
    id: Uuid,
    page_id: Uuid,
    component_id: Uuid,
    props: Value,
    sort_order: i32,
    is_visible: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredTranslation {
    id: Uuid,
    entity_type: EntityType,
    entity_id: Uuid,
    language_id: Uuid,
    field_name: String,
    field_value: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
struct StoredEntity {
    entity_type: EntityType,
    entity: CanonicalEntity,
    is_published: bool,
}

/// Collections are kept in insertion order; "newest first" reads reverse them.
#[derive(Debug, Default)]
struct MemoryState {
    pages: Vec<Page>,
    definitions: Vec<ComponentDefinition>,
    components: Vec<StoredComponent>,
    languages: Vec<Language>,
    translations: Vec<StoredTranslation>,
    redirects: Vec<Redirect>,
    entities: Vec<StoredEntity>,
}

impl MemoryState {
    fn hydrate(&self, stored: &StoredComponent) -> PageComponent {
        let component = self
            .definitions
            .iter()
            .find(|d| d.id == stored.component_id)
            .map(|d| ComponentSummary {
                id: d.id,
                component_type: d.component_type,
                name: d.name.clone(),
            });
        let component_type = component.as_ref().map(|c| c.component_type);

        PageComponent {
            id: stored.id,
            page_id: stored.page_id,
            component_id: stored.component_id,
            component,
            props: ComponentProps::decode(component_type, stored.props.clone()),
            sort_order: stored.sort_order,
            is_visible: stored.is_visible,
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }

    fn entry(&self, stored: &StoredTranslation) -> I18nEntry {
        let language_code = self
            .languages
            .iter()
            .find(|l| l.id == stored.language_id)
            .map(|l| l.code.clone())
            .unwrap_or_default();

        I18nEntry {
            id: stored.id,
            entity_type: stored.entity_type,
            entity_id: stored.entity_id,
            language_id: stored.language_id,
            language_code,
            field_name: stored.field_name.clone(),
            field_value: stored.field_value.clone(),
            created_at: stored.created_at,
            updated_at: stored.updated_at,
        }
    }

    fn clear_default_except(&mut self, id: Uuid) {
        let now = Utc::now();
        for lang in self.languages.iter_mut().filter(|l| l.id != id && l.is_default) {
            lang.is_default = false;
            lang.updated_at = now;
        }
    }
}

fn page_window<T: Clone>(items: impl Iterator<Item = T>, limit: i64, offset: i64) -> Vec<T> {
    items
        .skip(offset.max(0) as usize)
        .take(limit.max(0) as usize)
        .collect()
}

/// In-memory store with the same observable semantics as the Postgres store.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    state: RwLock<MemoryState>,
    /// Whether every call fails with `StoreError::Unavailable`.
    pub simulate_failure: bool,
}

impl InMemoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store whose every call fails with `StoreError::Unavailable`.
    pub fn failing() -> Self {
        Self {
            state: RwLock::new(MemoryState::default()),
            simulate_failure: true,
        }
    }

    /// Create a store holding the migration seed data: one catalog component
    /// per type and English as the default language.
    pub fn seeded() -> Self {
        let now = Utc::now();
        let mut state = MemoryState::default();

        for component_type in ComponentType::ALL {
            state.definitions.push(ComponentDefinition {
                id: Uuid::new_v4(),
                component_type,
                name: seed_component_name(component_type).to_string(),
                description: None,
                default_props: seed_default_props(component_type),
                schema: None,
                is_active: true,
                created_at: now,
                updated_at: now,
            });
        }

        state.languages.push(Language {
            id: Uuid::new_v4(),
            code: FALLBACK_LANGUAGE.to_string(),
            name: "English".to_string(),
            native_name: Some("English".to_string()),
            is_default: true,
            is_active: true,
            created_at: now,
            updated_at: now,
        });

        Self {
            state: RwLock::new(state),
            simulate_failure: false,
        }
    }

    pub async fn insert_component_definition(&self, definition: ComponentDefinition) {
        self.state.write().await.definitions.push(definition);
    }

    /// Adds a product or post row.
    pub async fn insert_entity(
        &self,
        entity_type: EntityType,
        entity: CanonicalEntity,
        is_published: bool,
    ) {
        self.state.write().await.entities.push(StoredEntity {
            entity_type,
            entity,
            is_published,
        });
    }

    /// First catalog entry of the given type.
    pub async fn definition_for(&self, component_type: ComponentType) -> Option<ComponentDefinition> {
        self.state
            .read()
            .await
            .definitions
            .iter()
            .find(|d| d.component_type == component_type)
            .cloned()
    }

    fn check(&self) -> StoreResult<()> {
        if self.simulate_failure {
            tracing::warn!("In-memory store simulating failure");
            return Err(StoreError::Unavailable("simulated store failure".to_string()));
        }
        Ok(())
    }
}

fn seed_component_name(component_type: ComponentType) -> &'static str {
    match component_type {
        ComponentType::Hero => "Hero Section",
        ComponentType::Text => "Text Block",
        ComponentType::Gallery => "Image Gallery",
        ComponentType::Form => "Form",
        ComponentType::Cta => "Call to Action",
        ComponentType::Features => "Features Grid",
        ComponentType::Testimonials => "Testimonials",
    }
}

fn seed_default_props(component_type: ComponentType) -> Value {
    match component_type {
        ComponentType::Hero => json!({"title": "Welcome"}),
        ComponentType::Text => json!({"body": ""}),
        ComponentType::Gallery => json!({"images": []}),
        ComponentType::Form => json!({}),
        ComponentType::Cta => json!({"title": "Get started"}),
        ComponentType::Features => json!({"items": []}),
        ComponentType::Testimonials => json!({"items": []}),
    }
}

#[async_trait::async_trait]
impl EntityStore for InMemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        self.check()
    }

    async fn list_pages(&self, limit: i64, offset: i64) -> StoreResult<Vec<Page>> {
        self.check()?;
        let state = self.state.read().await;
        Ok(page_window(state.pages.iter().rev().cloned(), limit, offset))
    }

    async fn count_pages(&self) -> StoreResult<i64> {
        self.check()?;
        Ok(self.state.read().await.pages.len() as i64)
    }

    async fn find_page(&self, id: Uuid) -> StoreResult<Option<Page>> {
        self.check()?;
        let state = self.state.read().await;
        Ok(state.pages.iter().find(|p| p.id == id).cloned())
    }

    async fn find_page_by_slug(
        &self,
        slug: &str,
        published_only: bool,
    ) -> StoreResult<Option<Page>> {
        self.check()?;
        let state = self.state.read().await;
        Ok(state
            .pages
            .iter()
            .find(|p| p.slug == slug && (!published_only || p.is_published))
            .cloned())
    }

    async fn create_page(&self, page: NewPage) -> StoreResult<Page> {
        self.check()?;
        let mut state = self.state.write().await;
        if state.pages.iter().any(|p| p.slug == page.slug) {
            return Err(StoreError::UniqueViolation("pages_slug_key".to_string()));
        }

        let now = Utc::now();
        let page = Page {
            id: Uuid::new_v4(),
            name: page.name,
            slug: page.slug,
            title: page.title,
            description: page.description,
            is_published: page.is_published,
            template: page.template,
            created_at: now,
            updated_at: now,
        };
        state.pages.push(page.clone());
        Ok(page)
    }

    async fn update_page(&self, id: Uuid, changes: PageChanges) -> StoreResult<Option<Page>> {
        self.check()?;
        let mut state = self.state.write().await;

        if let Some(slug) = &changes.slug {
            if state.pages.iter().any(|p| p.id != id && &p.slug == slug) {
                return Err(StoreError::UniqueViolation("pages_slug_key".to_string()));
            }
        }

        let Some(page) = state.pages.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            page.name = name;
        }
        if let Some(slug) = changes.slug {
            page.slug = slug;
        }
        if let Some(title) = changes.title {
            page.title = Some(title);
        }
        if let Some(description) = changes.description {
            page.description = Some(description);
        }
        if let Some(is_published) = changes.is_published {
            page.is_published = is_published;
        }
        if let Some(template) = changes.template {
            page.template = template;
        }
        page.updated_at = Utc::now();

        Ok(Some(page.clone()))
    }

    async fn delete_page_cascade(&self, id: Uuid) -> StoreResult<bool> {
        self.check()?;
        let mut state = self.state.write().await;
        let before = state.pages.len();
        state.pages.retain(|p| p.id != id);
        if state.pages.len() == before {
            return Ok(false);
        }
        state.components.retain(|c| c.page_id != id);
        Ok(true)
    }

    async fn list_component_definitions(&self) -> StoreResult<Vec<ComponentDefinition>> {
        self.check()?;
        let state = self.state.read().await;
        let mut definitions: Vec<_> = state
            .definitions
            .iter()
            .filter(|d| d.is_active)
            .cloned()
            .collect();
        definitions.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(definitions)
    }

    async fn find_component_definition(
        &self,
        id: Uuid,
    ) -> StoreResult<Option<ComponentDefinition>> {
        self.check()?;
        let state = self.state.read().await;
        Ok(state.definitions.iter().find(|d| d.id == id).cloned())
    }

    async fn list_page_components(&self, page_id: Uuid) -> StoreResult<Vec<PageComponent>> {
        self.check()?;
        let state = self.state.read().await;
        let mut components: Vec<_> = state
            .components
            .iter()
            .filter(|c| c.page_id == page_id)
            .map(|c| state.hydrate(c))
            .collect();
        components.sort_by_key(|c| c.sort_order);
        Ok(components)
    }

    async fn find_page_component(&self, id: Uuid) -> StoreResult<Option<PageComponent>> {
        self.check()?;
        let state = self.state.read().await;
        Ok(state
            .components
            .iter()
            .find(|c| c.id == id)
            .map(|c| state.hydrate(c)))
    }

    async fn insert_page_component(
        &self,
        component: NewPageComponent,
    ) -> StoreResult<PageComponent> {
        self.check()?;
        let mut state = self.state.write().await;

        if !state.pages.iter().any(|p| p.id == component.page_id) {
            return Err(StoreError::ForeignKeyViolation(
                "page_components_page_id_fkey".to_string(),
            ));
        }
        if !state.definitions.iter().any(|d| d.id == component.component_id) {
            return Err(StoreError::ForeignKeyViolation(
                "page_components_component_id_fkey".to_string(),
            ));
        }
        if state
            .components
            .iter()
            .any(|c| c.page_id == component.page_id && c.sort_order == component.sort_order)
        {
            return Err(StoreError::UniqueViolation(
                "page_components_page_sort_unique".to_string(),
            ));
        }

        let now = Utc::now();
        let stored = StoredComponent {
            id: Uuid::new_v4(),
            page_id: component.page_id,
            component_id: component.component_id,
            props: component.props,
            sort_order: component.sort_order,
            is_visible: component.is_visible,
            created_at: now,
            updated_at: now,
        };
        let hydrated = state.hydrate(&stored);
        state.components.push(stored);
        Ok(hydrated)
    }

    async fn update_page_component(
        &self,
        id: Uuid,
        props: Option<Value>,
        is_visible: Option<bool>,
    ) -> StoreResult<Option<PageComponent>> {
        self.check()?;
        let mut state = self.state.write().await;

        let Some(stored) = state.components.iter_mut().find(|c| c.id == id) else {
            return Ok(None);
        };
        if let Some(props) = props {
            stored.props = props;
        }
        if let Some(is_visible) = is_visible {
            stored.is_visible = is_visible;
        }
        stored.updated_at = Utc::now();
        let stored = stored.clone();

        Ok(Some(state.hydrate(&stored)))
    }

    async fn delete_page_component(&self, id: Uuid) -> StoreResult<bool> {
        self.check()?;
        let mut state = self.state.write().await;
        let before = state.components.len();
        state.components.retain(|c| c.id != id);
        Ok(state.components.len() != before)
    }

    async fn apply_sort_orders(
        &self,
        page_id: Uuid,
        assignments: &[SortAssignment],
    ) -> StoreResult<()> {
        self.check()?;
        let mut state = self.state.write().await;

        // Stage the new orders so nothing is written unless all of them fit.
        let mut staged: HashMap<Uuid, i32> = state
            .components
            .iter()
            .filter(|c| c.page_id == page_id)
            .map(|c| (c.id, c.sort_order))
            .collect();

        for assignment in assignments {
            match staged.get_mut(&assignment.id) {
                Some(order) => *order = assignment.sort_order,
                None => {
                    return Err(StoreError::ForeignKeyViolation(format!(
                        "page component {} not on page {}",
                        assignment.id, page_id
                    )))
                }
            }
        }

        let mut orders: Vec<i32> = staged.values().copied().collect();
        orders.sort_unstable();
        if orders.windows(2).any(|w| w[0] == w[1]) {
            return Err(StoreError::UniqueViolation(
                "page_components_page_sort_unique".to_string(),
            ));
        }

        let now = Utc::now();
        for component in state.components.iter_mut() {
            if let Some(assignment) = assignments.iter().find(|a| a.id == component.id) {
                component.sort_order = assignment.sort_order;
                component.updated_at = now;
            }
        }

        Ok(())
    }

    async fn list_languages(&self) -> StoreResult<Vec<Language>> {
        self.check()?;
        let state = self.state.read().await;
        let mut languages = state.languages.clone();
        languages.sort_by(|a, b| b.is_default.cmp(&a.is_default).then(a.code.cmp(&b.code)));
        Ok(languages)
    }

    async fn find_language(&self, id: Uuid) -> StoreResult<Option<Language>> {
        self.check()?;
        let state = self.state.read().await;
        Ok(state.languages.iter().find(|l| l.id == id).cloned())
    }

    async fn find_language_by_code(&self, code: &str) -> StoreResult<Option<Language>> {
        self.check()?;
        let state = self.state.read().await;
        Ok(state.languages.iter().find(|l| l.code == code).cloned())
    }

    async fn default_language(&self) -> StoreResult<Option<Language>> {
        self.check()?;
        let state = self.state.read().await;
        Ok(state.languages.iter().find(|l| l.is_default).cloned())
    }

    async fn create_language(&self, language: NewLanguage) -> StoreResult<Language> {
        self.check()?;
        let mut state = self.state.write().await;
        if state.languages.iter().any(|l| l.code == language.code) {
            return Err(StoreError::UniqueViolation("languages_code_key".to_string()));
        }

        let now = Utc::now();
        let language = Language {
            id: Uuid::new_v4(),
            code: language.code,
            name: language.name,
            native_name: language.native_name,
            is_default: language.is_default,
            is_active: language.is_active,
            created_at: now,
            updated_at: now,
        };
        if language.is_default {
            state.clear_default_except(language.id);
        }
        state.languages.push(language.clone());
        Ok(language)
    }

    async fn update_language(
        &self,
        id: Uuid,
        changes: LanguageChanges,
    ) -> StoreResult<Option<Language>> {
        self.check()?;
        let mut state = self.state.write().await;

        let Some(language) = state.languages.iter_mut().find(|l| l.id == id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            language.name = name;
        }
        if let Some(native_name) = changes.native_name {
            language.native_name = Some(native_name);
        }
        if let Some(is_default) = changes.is_default {
            language.is_default = is_default;
        }
        if let Some(is_active) = changes.is_active {
            language.is_active = is_active;
        }
        language.updated_at = Utc::now();
        let language = language.clone();

        if changes.is_default == Some(true) {
            state.clear_default_except(id);
        }

        Ok(Some(language))
    }

    async fn delete_language(&self, id: Uuid) -> StoreResult<bool> {
        self.check()?;
        let mut state = self.state.write().await;
        let before = state.languages.len();
        state.languages.retain(|l| l.id != id);
        if state.languages.len() == before {
            return Ok(false);
        }
        state.translations.retain(|t| t.language_id != id);
        Ok(true)
    }

    async fn translations_for(
        &self,
        entity_type: EntityType,
        entity_ids: &[Uuid],
        language_code: &str,
    ) -> StoreResult<HashMap<Uuid, FieldMap>> {
        self.check()?;
        let state = self.state.read().await;

        let Some(language) = state
            .languages
            .iter()
            .find(|l| l.code == language_code && l.is_active)
        else {
            return Ok(HashMap::new());
        };

        let mut result: HashMap<Uuid, FieldMap> = HashMap::new();
        for t in state.translations.iter().filter(|t| {
            t.entity_type == entity_type
                && t.language_id == language.id
                && entity_ids.contains(&t.entity_id)
        }) {
            result
                .entry(t.entity_id)
                .or_default()
                .insert(t.field_name.clone(), t.field_value.clone());
        }
        Ok(result)
    }

    async fn upsert_translation(&self, translation: NewTranslation) -> StoreResult<I18nEntry> {
        self.check()?;
        let mut state = self.state.write().await;

        if !state.languages.iter().any(|l| l.id == translation.language_id) {
            return Err(StoreError::ForeignKeyViolation(
                "i18n_content_language_id_fkey".to_string(),
            ));
        }

        let now = Utc::now();
        let existing = state.translations.iter_mut().find(|t| {
            t.entity_type == translation.entity_type
                && t.entity_id == translation.entity_id
                && t.language_id == translation.language_id
                && t.field_name == translation.field_name
        });

        let stored = match existing {
            Some(t) => {
                t.field_value = translation.field_value;
                t.updated_at = now;
                t.clone()
            }
            None => {
                let t = StoredTranslation {
                    id: Uuid::new_v4(),
                    entity_type: translation.entity_type,
                    entity_id: translation.entity_id,
                    language_id: translation.language_id,
                    field_name: translation.field_name,
                    field_value: translation.field_value,
                    created_at: now,
                    updated_at: now,
                };
                state.translations.push(t.clone());
                t
            }
        };

        Ok(state.entry(&stored))
    }

    async fn list_translations(
        &self,
        entity_type: EntityType,
        entity_id: Uuid,
        language_code: Option<&str>,
    ) -> StoreResult<Vec<I18nEntry>> {
        self.check()?;
        let state = self.state.read().await;
        let mut entries: Vec<I18nEntry> = state
            .translations
            .iter()
            .filter(|t| t.entity_type == entity_type && t.entity_id == entity_id)
            .map(|t| state.entry(t))
            .filter(|e| language_code.map_or(true, |code| e.language_code == code))
            .collect();
        entries.sort_by(|a, b| {
            a.language_code
                .cmp(&b.language_code)
                .then(a.field_name.cmp(&b.field_name))
        });
        Ok(entries)
    }

    async fn delete_translation(&self, id: Uuid) -> StoreResult<bool> {
        self.check()?;
        let mut state = self.state.write().await;
        let before = state.translations.len();
        state.translations.retain(|t| t.id != id);
        Ok(state.translations.len() != before)
    }

    async fn list_redirects(&self, limit: i64, offset: i64) -> StoreResult<Vec<Redirect>> {
        self.check()?;
        let state = self.state.read().await;
        Ok(page_window(state.redirects.iter().rev().cloned(), limit, offset))
    }

    async fn count_redirects(&self) -> StoreResult<i64> {
        self.check()?;
        Ok(self.state.read().await.redirects.len() as i64)
    }

    async fn list_active_redirects(&self) -> StoreResult<Vec<Redirect>> {
        self.check()?;
        let state = self.state.read().await;
        Ok(state
            .redirects
            .iter()
            .rev()
            .filter(|r| r.is_active)
            .cloned()
            .collect())
    }

    async fn find_redirect(&self, id: Uuid) -> StoreResult<Option<Redirect>> {
        self.check()?;
        let state = self.state.read().await;
        Ok(state.redirects.iter().find(|r| r.id == id).cloned())
    }

    async fn find_active_redirect_by_path(
        &self,
        from_path: &str,
    ) -> StoreResult<Option<Redirect>> {
        self.check()?;
        let state = self.state.read().await;
        Ok(state
            .redirects
            .iter()
            .find(|r| r.is_active && r.from_path == from_path)
            .cloned())
    }

    async fn insert_redirect(&self, redirect: NewRedirect) -> StoreResult<Redirect> {
        self.check()?;
        let mut state = self.state.write().await;
        if state
            .redirects
            .iter()
            .any(|r| r.is_active && r.from_path == redirect.from_path)
        {
            return Err(StoreError::UniqueViolation(
                "redirects_active_from_path_idx".to_string(),
            ));
        }

        let now = Utc::now();
        let redirect = Redirect {
            id: Uuid::new_v4(),
            from_path: redirect.from_path,
            to_path: redirect.to_path,
            redirect_type: redirect.redirect_type,
            is_active: true,
            created_by: redirect.created_by,
            created_at: now,
            updated_at: now,
        };
        state.redirects.push(redirect.clone());
        Ok(redirect)
    }

    async fn update_redirect(
        &self,
        id: Uuid,
        changes: RedirectChanges,
    ) -> StoreResult<Option<Redirect>> {
        self.check()?;
        let mut state = self.state.write().await;

        let Some(current) = state.redirects.iter().find(|r| r.id == id).cloned() else {
            return Ok(None);
        };
        if changes.is_active == Some(true)
            && state
                .redirects
                .iter()
                .any(|r| r.id != id && r.is_active && r.from_path == current.from_path)
        {
            return Err(StoreError::UniqueViolation(
                "redirects_active_from_path_idx".to_string(),
            ));
        }

        let Some(redirect) = state.redirects.iter_mut().find(|r| r.id == id) else {
            return Ok(None);
        };
        if let Some(to_path) = changes.to_path {
            redirect.to_path = to_path;
        }
        if let Some(redirect_type) = changes.redirect_type {
            redirect.redirect_type = redirect_type;
        }
        if let Some(is_active) = changes.is_active {
            redirect.is_active = is_active;
        }
        redirect.updated_at = Utc::now();

        Ok(Some(redirect.clone()))
    }

    async fn delete_redirect(&self, id: Uuid) -> StoreResult<bool> {
        self.check()?;
        let mut state = self.state.write().await;
        let before = state.redirects.len();
        state.redirects.retain(|r| r.id != id);
        Ok(state.redirects.len() != before)
    }

    async fn find_published_entity(
        &self,
        entity_type: EntityType,
        slug: &str,
    ) -> StoreResult<Option<CanonicalEntity>> {
        self.check()?;
        let state = self.state.read().await;
        Ok(state
            .entities
            .iter()
            .find(|e| e.entity_type == entity_type && e.is_published && e.entity.slug == slug)
            .map(|e| e.entity.clone()))
    }

    async fn list_published_entities(
        &self,
        entity_type: EntityType,
        limit: i64,
        offset: i64,
    ) -> StoreResult<Vec<CanonicalEntity>> {
        self.check()?;
        let state = self.state.read().await;
        let published = state
            .entities
            .iter()
            .rev()
            .filter(|e| e.entity_type == entity_type && e.is_published)
            .map(|e| e.entity.clone());
        Ok(page_window(published, limit, offset))
    }

    async fn count_published_entities(&self, entity_type: EntityType) -> StoreResult<i64> {
        self.check()?;
        let state = self.state.read().await;
        Ok(state
            .entities
            .iter()
            .filter(|e| e.entity_type == entity_type && e.is_published)
            .count() as i64)
    }
}
