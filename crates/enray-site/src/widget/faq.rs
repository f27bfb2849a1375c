//! FAQ accordion: at most one answer open at a time.

use enray_site_core::logging::targets;

/// The page side of a [`FaqAccordion`].
pub trait FaqSurface {
    fn set_open(&mut self, index: usize, open: bool);
}

#[derive(Debug, Clone)]
pub struct FaqAccordion {
    len: usize,
    open: Option<usize>,
}

impl FaqAccordion {
    /// `initially_open` is the first item already open in the page, if any.
    pub fn new(len: usize, initially_open: Option<usize>) -> Self {
        Self {
            len,
            open: initially_open.filter(|i| *i < len),
        }
    }

    /// The open item.
    #[inline]
    pub fn open_item(&self) -> Option<usize> {
        self.open
    }

    /// A question was clicked: close every other item and toggle this one.
    pub fn toggle<S: FaqSurface>(&mut self, surface: &mut S, index: usize) {
        if index >= self.len {
            return;
        }
        if let Some(open) = self.open
            && open != index
        {
            surface.set_open(open, false);
        }

        let opening = self.open != Some(index);
        surface.set_open(index, opening);
        self.open = opening.then_some(index);
        tracing::trace!(target: targets::FAQ, index, opening, "faq toggled");
    }
}
