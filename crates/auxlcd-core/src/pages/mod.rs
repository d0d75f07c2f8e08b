//! Pages: renderable screens bound to one device.

mod collection;
mod composed;
mod hosted;
mod page;

pub use collection::PageCollection;
pub use composed::ComposedContent;
pub use hosted::{HostedContent, HostedElement};
pub use page::{Page, PageContent, PageId};
