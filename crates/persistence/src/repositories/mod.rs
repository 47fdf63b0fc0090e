//! Repository implementations for database operations.

pub mod component;
pub mod language;
pub mod localizable;
pub mod page;
pub mod redirect;
pub mod translation;

pub use component::ComponentRepository;
pub use language::LanguageRepository;
pub use localizable::LocalizableRepository;
pub use page::PageRepository;
pub use redirect::RedirectRepository;
pub use translation::TranslationRepository;
