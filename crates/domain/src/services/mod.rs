//! Domain services for the CMS core.
//!
//! Services contain business logic over an injected [`EntityStore`].

pub mod i18n;
pub mod memory;
pub mod page_composition;
pub mod redirects;
pub mod store;

pub use i18n::I18nResolver;
pub use memory::InMemoryStore;
pub use page_composition::PageCompositionEngine;
pub use redirects::RedirectRegistry;
pub use store::{EntityStore, StoreError, StoreResult};
