//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod component;
pub mod i18n_content;
pub mod language;
pub mod localizable;
pub mod page;
pub mod page_component;
pub mod redirect;

pub use component::ComponentEntity;
pub use i18n_content::{I18nContentEntity, TranslatedFieldEntity};
pub use language::LanguageEntity;
pub use localizable::LocalizableEntity;
pub use page::PageEntity;
pub use page_component::PageComponentEntity;
pub use redirect::RedirectEntity;
