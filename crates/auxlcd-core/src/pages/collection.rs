//! Ordered set of pages belonging to one device.

use heapless::Vec;
use log::debug;

use crate::config::MAX_PAGES;
use crate::device::DeviceDescriptor;
use crate::error::LcdError;
use crate::pages::page::{Page, PageId};

/// The pages a device can switch between, with one current page.
///
/// Mutated only by the thread driving that device's frames. The current page
/// is `None` only while the collection is empty; the first added page
/// becomes current automatically.
pub struct PageCollection {
    descriptor: DeviceDescriptor,
    pages: Vec<Page, MAX_PAGES>,
    current: Option<PageId>,
}

impl PageCollection {
    pub fn new(descriptor: DeviceDescriptor) -> Self {
        Self {
            descriptor,
            pages: Vec::new(),
            current: None,
        }
    }

    pub fn descriptor(&self) -> DeviceDescriptor {
        self.descriptor
    }

    /// Append a page. Fails with `InvalidArgument` when the page was built
    /// for another device, reuses an id, or the collection is full.
    pub fn add(&mut self, page: Page) -> Result<(), LcdError> {
        if page.descriptor() != self.descriptor {
            return Err(LcdError::InvalidArgument(
                "page was created for a different device",
            ));
        }
        if self.pages.iter().any(|p| p.id() == page.id()) {
            return Err(LcdError::InvalidArgument("page id already in collection"));
        }
        let id = page.id();
        self.pages
            .push(page)
            .map_err(|_| LcdError::InvalidArgument("page collection is full"))?;
        if self.current.is_none() {
            self.current = Some(id);
        }
        Ok(())
    }

    /// Make a member page current. Fails with `InvalidArgument` for ids not
    /// in the collection.
    pub fn set_current(&mut self, id: PageId) -> Result<(), LcdError> {
        if !self.pages.iter().any(|p| p.id() == id) {
            return Err(LcdError::InvalidArgument("page is not in this collection"));
        }
        if self.current != Some(id) {
            debug!("current page -> {:?}", id);
            self.current = Some(id);
        }
        Ok(())
    }

    pub fn current_id(&self) -> Option<PageId> {
        self.current
    }

    pub fn current(&self) -> Option<&Page> {
        self.current.and_then(|id| self.get(id))
    }

    pub fn current_mut(&mut self) -> Option<&mut Page> {
        let id = self.current?;
        self.get_mut(id)
    }

    pub fn get(&self, id: PageId) -> Option<&Page> {
        self.pages.iter().find(|p| p.id() == id)
    }

    pub fn get_mut(&mut self, id: PageId) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id() == id)
    }

    pub fn len(&self) -> usize {
        self.pages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Page> {
        self.pages.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mono_page(id: u16) -> Page {
        Page::composed(PageId(id), DeviceDescriptor::monochrome()).unwrap()
    }

    #[test]
    fn first_added_page_becomes_current() {
        let mut pages = PageCollection::new(DeviceDescriptor::monochrome());
        assert!(pages.current_id().is_none());

        pages.add(mono_page(7)).unwrap();
        pages.add(mono_page(8)).unwrap();
        assert_eq!(pages.current_id(), Some(PageId(7)));
    }

    #[test]
    fn foreign_descriptor_is_rejected() {
        let mut pages = PageCollection::new(DeviceDescriptor::qvga());
        assert_eq!(
            pages.add(mono_page(0)).err(),
            Some(LcdError::InvalidArgument(
                "page was created for a different device"
            ))
        );
        assert!(pages.is_empty());
    }

    #[test]
    fn duplicate_id_is_rejected() {
        let mut pages = PageCollection::new(DeviceDescriptor::monochrome());
        pages.add(mono_page(1)).unwrap();
        assert!(pages.add(mono_page(1)).is_err());
        assert_eq!(pages.len(), 1);
    }

    #[test]
    fn set_current_requires_membership() {
        let mut pages = PageCollection::new(DeviceDescriptor::monochrome());
        pages.add(mono_page(1)).unwrap();
        pages.add(mono_page(2)).unwrap();

        pages.set_current(PageId(2)).unwrap();
        assert_eq!(pages.current_id(), Some(PageId(2)));

        assert_eq!(
            pages.set_current(PageId(9)).err(),
            Some(LcdError::InvalidArgument("page is not in this collection"))
        );
        assert_eq!(pages.current_id(), Some(PageId(2)));
    }

    #[test]
    fn capacity_overflow_is_an_error() {
        let mut pages = PageCollection::new(DeviceDescriptor::monochrome());
        for i in 0..MAX_PAGES {
            pages.add(mono_page(i as u16)).unwrap();
        }
        assert!(pages.add(mono_page(99)).is_err());
    }
}
