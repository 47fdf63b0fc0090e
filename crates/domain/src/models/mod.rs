//! Domain models for the CMS core.

pub mod component;
pub mod i18n;
pub mod page;
pub mod page_component;
pub mod permission;
pub mod principal;
pub mod redirect;

pub use component::{ComponentDefinition, ComponentProps, ComponentType};
pub use i18n::{
    CanonicalEntity, CreateLanguageRequest, EntityType, FieldMap, I18nEntry, Language,
    LanguageChanges, LocalizedEntity, NewLanguage, NewTranslation, TranslationQuery,
    UpdateLanguageRequest, UpsertTranslationRequest, FALLBACK_LANGUAGE,
};
pub use page::{
    CreatePageRequest, NewPage, Page, PageChanges, PageWithComponents, PublicComponent,
    PublicPage, UpdatePageRequest, DEFAULT_TEMPLATE,
};
pub use page_component::{
    AddComponentRequest, ComponentSummary, NewPageComponent, PageComponent,
    ReorderComponentsRequest, SortAssignment, UpdateComponentRequest,
};
pub use permission::{has_any, has_permission, GLOBAL_WILDCARD};
pub use principal::{authorize, Principal};
pub use redirect::{
    CreateRedirectRequest, NewRedirect, Redirect, RedirectChanges, RedirectType,
    UpdateRedirectRequest,
};
