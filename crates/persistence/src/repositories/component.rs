//! Component catalog and page component repository.

use domain::models::NewPageComponent;
use sqlx::PgPool;
use uuid::Uuid;

use crate::entities::{ComponentEntity, PageComponentEntity};
use crate::metrics::{timed, QueryTimer};

/// Page component columns joined with the catalog definition. Expects the
/// page component row aliased `pc` and the definition aliased `c`.
const PAGE_COMPONENT_SELECT: &str = r#"
    SELECT pc.id, pc.page_id, pc.component_id, c.type AS component_type,
           c.name AS component_name, pc.props, pc.sort_order, pc.is_visible,
           pc.created_at, pc.updated_at
"#;

/// Repository for the component catalog and components placed on pages.
#[derive(Clone)]
pub struct ComponentRepository {
    pool: PgPool,
}

impl ComponentRepository {
    /// Creates a new ComponentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// List active catalog definitions.
    pub async fn list_definitions(&self) -> Result<Vec<ComponentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_component_definitions");
        let result = sqlx::query_as::<_, ComponentEntity>(
            r#"
            SELECT id, type, name, description, default_props, schema, is_active, created_at, updated_at
            FROM components
            WHERE is_active = true
            ORDER BY name
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a catalog definition by ID.
    pub async fn find_definition(&self, id: Uuid) -> Result<Option<ComponentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_component_definition");
        let result = sqlx::query_as::<_, ComponentEntity>(
            r#"
            SELECT id, type, name, description, default_props, schema, is_active, created_at, updated_at
            FROM components
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Components of a page in ascending sort order.
    pub async fn list_for_page(
        &self,
        page_id: Uuid,
    ) -> Result<Vec<PageComponentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_page_components");
        let result = sqlx::query_as::<_, PageComponentEntity>(&format!(
            r#"
            {}
            FROM page_components pc
            LEFT JOIN components c ON c.id = pc.component_id
            WHERE pc.page_id = $1
            ORDER BY pc.sort_order ASC
            "#,
            PAGE_COMPONENT_SELECT
        ))
        .bind(page_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Find a page component by ID.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<PageComponentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_page_component");
        let result = sqlx::query_as::<_, PageComponentEntity>(&format!(
            r#"
            {}
            FROM page_components pc
            LEFT JOIN components c ON c.id = pc.component_id
            WHERE pc.id = $1
            "#,
            PAGE_COMPONENT_SELECT
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Place a component on a page.
    pub async fn insert(
        &self,
        component: &NewPageComponent,
    ) -> Result<PageComponentEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_page_component");
        let result = sqlx::query_as::<_, PageComponentEntity>(&format!(
            r#"
            WITH pc AS (
                INSERT INTO page_components (page_id, component_id, props, sort_order, is_visible)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING *
            )
            {}
            FROM pc
            LEFT JOIN components c ON c.id = pc.component_id
            "#,
            PAGE_COMPONENT_SELECT
        ))
        .bind(component.page_id)
        .bind(component.component_id)
        .bind(&component.props)
        .bind(component.sort_order)
        .bind(component.is_visible)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Update props and visibility. `None` leaves a column unchanged.
    pub async fn update(
        &self,
        id: Uuid,
        props: Option<&serde_json::Value>,
        is_visible: Option<bool>,
    ) -> Result<Option<PageComponentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("update_page_component");
        let result = sqlx::query_as::<_, PageComponentEntity>(&format!(
            r#"
            WITH pc AS (
                UPDATE page_components SET
                    props = COALESCE($2, props),
                    is_visible = COALESCE($3, is_visible),
                    updated_at = NOW()
                WHERE id = $1
                RETURNING *
            )
            {}
            FROM pc
            LEFT JOIN components c ON c.id = pc.component_id
            "#,
            PAGE_COMPONENT_SELECT
        ))
        .bind(id)
        .bind(props)
        .bind(is_visible)
        .fetch_optional(&self.pool)
        .await;
        timer.record();
        result
    }

    /// Remove a component from its page.
    pub async fn delete(&self, id: Uuid) -> Result<bool, sqlx::Error> {
        let timer = QueryTimer::new("delete_page_component");
        let result = sqlx::query("DELETE FROM page_components WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await;
        timer.record();
        Ok(result?.rows_affected() > 0)
    }

    /// Assign new sort orders to components of a page in one transaction.
    ///
    /// Returns `false`, with nothing written, when any id does not belong to
    /// the page. Sort-order collisions surface as a unique violation at commit.
    pub async fn apply_sort_orders(
        &self,
        page_id: Uuid,
        ids: &[Uuid],
        sort_orders: &[i32],
    ) -> Result<bool, sqlx::Error> {
        timed(
            "apply_sort_orders",
            self.apply_sort_orders_tx(page_id, ids, sort_orders),
        )
        .await
    }

    async fn apply_sort_orders_tx(
        &self,
        page_id: Uuid,
        ids: &[Uuid],
        sort_orders: &[i32],
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        // Serializes concurrent reorders of the same page
        sqlx::query("SELECT id FROM pages WHERE id = $1 FOR UPDATE")
            .bind(page_id)
            .fetch_optional(&mut *tx)
            .await?;

        let result = sqlx::query(
            r#"
            UPDATE page_components pc
            SET sort_order = u.sort_order, updated_at = NOW()
            FROM UNNEST($2::uuid[], $3::int4[]) AS u(id, sort_order)
            WHERE pc.id = u.id AND pc.page_id = $1
            "#,
        )
        .bind(page_id)
        .bind(ids)
        .bind(sort_orders)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() != ids.len() as u64 {
            tx.rollback().await?;
            return Ok(false);
        }

        tx.commit().await?;
        Ok(true)
    }
}
