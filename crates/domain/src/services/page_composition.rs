//! Page composition: page CRUD, ordered components and public rendering.
//!
//! Per page, component sort orders stay unique. Reorders are validated in
//! full before a single all-or-nothing write.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde_json::Value;
use shared::pagination::{Pagination, PaginationParams};
use uuid::Uuid;
use validator::Validate;

use crate::error::{DomainError, DomainResult};
use crate::models::{
    AddComponentRequest, ComponentDefinition, ComponentProps, CreatePageRequest, EntityType,
    FieldMap, NewPageComponent, Page, PageChanges, PageComponent, PageWithComponents,
    PublicComponent, PublicPage, SortAssignment, UpdateComponentRequest, UpdatePageRequest,
};
use crate::services::i18n::{string_field, I18nResolver};
use crate::services::store::EntityStore;

/// Owns the ordering invariant of page components.
#[derive(Clone)]
pub struct PageCompositionEngine {
    store: Arc<dyn EntityStore>,
    i18n: I18nResolver,
}

impl PageCompositionEngine {
    pub fn new(store: Arc<dyn EntityStore>, fallback_language: impl Into<String>) -> Self {
        let i18n = I18nResolver::new(store.clone(), fallback_language);
        Self { store, i18n }
    }

    pub async fn list_pages(
        &self,
        pagination: &PaginationParams,
    ) -> DomainResult<(Vec<Page>, Pagination)> {
        let pages = self
            .store
            .list_pages(pagination.limit() as i64, pagination.offset())
            .await?;
        let total = self.store.count_pages().await?;
        Ok((pages, pagination.meta(total)))
    }

    /// A page with all of its components in display order.
    pub async fn get_page(&self, id: Uuid) -> DomainResult<PageWithComponents> {
        let page = self.require_page(id).await?;
        let components = self.store.list_page_components(id).await?;
        Ok(PageWithComponents { page, components })
    }

    pub async fn create_page(&self, request: CreatePageRequest) -> DomainResult<Page> {
        request.validate()?;

        if self
            .store
            .find_page_by_slug(&request.slug, false)
            .await?
            .is_some()
        {
            return Err(slug_conflict());
        }

        self.store
            .create_page(request.into())
            .await
            .map_err(|e| match DomainError::from(e) {
                DomainError::Conflict(_) => slug_conflict(),
                other => other,
            })
    }

    pub async fn update_page(&self, id: Uuid, request: UpdatePageRequest) -> DomainResult<Page> {
        request.validate()?;
        let current = self.require_page(id).await?;

        if let Some(slug) = request.slug.as_deref() {
            if slug != current.slug && self.store.find_page_by_slug(slug, false).await?.is_some() {
                return Err(slug_conflict());
            }
        }

        self.store
            .update_page(id, request.into())
            .await
            .map_err(|e| match DomainError::from(e) {
                DomainError::Conflict(_) => slug_conflict(),
                other => other,
            })?
            .ok_or_else(|| DomainError::not_found("Page"))
    }

    /// Deletes the page and its components in one transaction.
    pub async fn delete_page(&self, id: Uuid) -> DomainResult<()> {
        if self.store.delete_page_cascade(id).await? {
            Ok(())
        } else {
            Err(DomainError::not_found("Page"))
        }
    }

    /// Flips the publication flag.
    pub async fn toggle_publish(&self, id: Uuid) -> DomainResult<Page> {
        let page = self.require_page(id).await?;
        let changes = PageChanges {
            is_published: Some(!page.is_published),
            ..Default::default()
        };
        self.store
            .update_page(id, changes)
            .await?
            .ok_or_else(|| DomainError::not_found("Page"))
    }

    /// Active catalog components.
    pub async fn list_catalog(&self) -> DomainResult<Vec<ComponentDefinition>> {
        Ok(self.store.list_component_definitions().await?)
    }

    /// Components of a page in ascending sort order.
    pub async fn list_components(&self, page_id: Uuid) -> DomainResult<Vec<PageComponent>> {
        self.require_page(page_id).await?;
        Ok(self.store.list_page_components(page_id).await?)
    }

    /// Appends a catalog component after the current last one.
    ///
    /// Props default to the catalog entry's default props.
    pub async fn add_component(
        &self,
        page_id: Uuid,
        request: AddComponentRequest,
    ) -> DomainResult<PageComponent> {
        let component_id = request
            .component_id
            .ok_or_else(|| DomainError::invalid("Component ID is required"))?;

        self.require_page(page_id).await?;

        let definition = self
            .store
            .find_component_definition(component_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Component"))?;
        if !definition.is_active {
            return Err(DomainError::invalid("Component is not active"));
        }

        let props = request.props.unwrap_or(definition.default_props);
        ensure_object(&props)?;

        let existing = self.store.list_page_components(page_id).await?;
        let sort_order = existing
            .iter()
            .map(|c| c.sort_order)
            .max()
            .map_or(1, |max| max.saturating_add(1));

        let component = self
            .store
            .insert_page_component(NewPageComponent {
                page_id,
                component_id,
                props,
                sort_order,
                is_visible: true,
            })
            .await?;

        tracing::debug!(
            page_id = %page_id,
            component_id = %component.id,
            sort_order = sort_order,
            typed_props = component.props.is_typed(),
            "Added page component"
        );

        Ok(component)
    }

    /// Partial update; omitted fields stay unchanged.
    pub async fn update_component(
        &self,
        id: Uuid,
        request: UpdateComponentRequest,
    ) -> DomainResult<PageComponent> {
        if let Some(props) = &request.props {
            ensure_object(props)?;
        }

        self.store
            .update_page_component(id, request.props, request.is_visible)
            .await?
            .ok_or_else(|| DomainError::not_found("Component"))
    }

    /// Removes a component without renumbering the rest. Returns false when
    /// nothing was deleted.
    pub async fn remove_component(&self, id: Uuid) -> DomainResult<bool> {
        Ok(self.store.delete_page_component(id).await?)
    }

    /// Atomically assigns new sort orders and returns the updated page.
    ///
    /// The batch is rejected as a whole if it names a component twice, names a
    /// component of another page, repeats a sort order, or moves a component
    /// onto the sort order of a component it does not mention.
    pub async fn reorder(
        &self,
        page_id: Uuid,
        assignments: &[SortAssignment],
    ) -> DomainResult<PageWithComponents> {
        self.require_page(page_id).await?;

        if !assignments.is_empty() {
            let current = self.store.list_page_components(page_id).await?;
            validate_reorder(&current, assignments)?;
            self.store.apply_sort_orders(page_id, assignments).await?;

            tracing::debug!(
                page_id = %page_id,
                moved = assignments.len(),
                "Reordered page components"
            );
        }

        self.get_page(page_id).await
    }

    /// A published page with its visible components, localized.
    ///
    /// Page fields resolve as `page` and component props as `page_component`,
    /// the latter with a single translation lookup.
    pub async fn render_public_page(
        &self,
        slug: &str,
        language: Option<&str>,
    ) -> DomainResult<PublicPage> {
        let page = self
            .store
            .find_page_by_slug(slug, true)
            .await?
            .ok_or_else(|| DomainError::not_found("Page"))?;
        let language = self.i18n.language_or_default(language).await?;

        let mut canonical = FieldMap::new();
        canonical.insert("name".to_string(), Value::String(page.name.clone()));
        if let Some(title) = &page.title {
            canonical.insert("title".to_string(), Value::String(title.clone()));
        }
        if let Some(description) = &page.description {
            canonical.insert("description".to_string(), Value::String(description.clone()));
        }
        let page_fields = self
            .i18n
            .resolve(EntityType::Page, page.id, canonical, &language)
            .await?;

        let visible: Vec<PageComponent> = self
            .store
            .list_page_components(page.id)
            .await?
            .into_iter()
            .filter(|c| c.is_visible)
            .collect();

        let translatable: Vec<(Uuid, FieldMap)> = visible
            .iter()
            .filter_map(|c| match c.props.to_value() {
                Value::Object(map) => Some((c.id, map)),
                _ => None,
            })
            .collect();
        let mut resolved: HashMap<Uuid, FieldMap> = self
            .i18n
            .resolve_many(EntityType::PageComponent, translatable, &language)
            .await?
            .into_iter()
            .collect();

        let components = visible
            .into_iter()
            .map(|c| {
                let component_type = c.component_type();
                let props = match resolved.remove(&c.id) {
                    Some(fields) => ComponentProps::decode(component_type, Value::Object(fields)),
                    None => c.props,
                };
                PublicComponent {
                    id: c.id,
                    component_type,
                    props,
                    sort_order: c.sort_order,
                }
            })
            .collect();

        Ok(PublicPage {
            id: page.id,
            slug: page.slug,
            name: string_field(&page_fields, "name").unwrap_or(page.name),
            title: string_field(&page_fields, "title").or(page.title),
            description: string_field(&page_fields, "description").or(page.description),
            template: page.template,
            language,
            components,
        })
    }

    async fn require_page(&self, id: Uuid) -> DomainResult<Page> {
        self.store
            .find_page(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Page"))
    }
}

fn slug_conflict() -> DomainError {
    DomainError::conflict("Page with this slug already exists")
}

fn ensure_object(props: &Value) -> DomainResult<()> {
    if props.is_object() {
        Ok(())
    } else {
        Err(DomainError::invalid("Props must be a JSON object"))
    }
}

/// Checks a reorder batch against the page's current components.
fn validate_reorder(current: &[PageComponent], assignments: &[SortAssignment]) -> DomainResult<()> {
    let on_page: HashSet<Uuid> = current.iter().map(|c| c.id).collect();
    let mut seen_ids = HashSet::with_capacity(assignments.len());
    let mut seen_orders = HashSet::with_capacity(assignments.len());

    for assignment in assignments {
        if !on_page.contains(&assignment.id) {
            return Err(DomainError::invalid(format!(
                "Component {} does not belong to this page",
                assignment.id
            )));
        }
        if !seen_ids.insert(assignment.id) {
            return Err(DomainError::invalid(format!(
                "Component {} appears more than once",
                assignment.id
            )));
        }
        if !seen_orders.insert(assignment.sort_order) {
            return Err(DomainError::invalid(format!(
                "Sort order {} is assigned more than once",
                assignment.sort_order
            )));
        }
    }

    if let Some(clash) = current
        .iter()
        .filter(|c| !seen_ids.contains(&c.id))
        .find(|c| seen_orders.contains(&c.sort_order))
    {
        return Err(DomainError::invalid(format!(
            "Sort order {} is already used by component {}",
            clash.sort_order, clash.id
        )));
    }

    Ok(())
}
