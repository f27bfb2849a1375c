//! Capability detail lightbox.
//!
//! [`CapabilityModal`] shows one catalog category at a time: a main image
//! with caption and counter, a thumbnail strip, and the category's detail
//! panel. It is an explicit controller object; the page side is a
//! [`LightboxSurface`].
//!
//! # Keyboard
//!
//! While open, Escape closes, ArrowLeft/ArrowRight step through the images
//! (wrapping), and Tab/Shift+Tab stay inside the dialog.
//!
//! # Signals
//!
//! - `opened(String)`: a category was opened, with its id
//! - `closed(())`: the lightbox was closed

use std::rc::Rc;

use serde::{Deserialize, Serialize};

use enray_site_core::Signal;
use enray_site_core::logging::targets;

use crate::error::{Error, Result};
use crate::gallery::{Catalog, CategoryDetails, GalleryImage};

use super::focus::{FocusMove, FocusReason, trap_focus};
use super::input::{Direction, Key, KeyPress};

/// Heights that bound the image area.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutMetrics {
    pub viewport_height: f64,
    pub header_height: f64,
    pub thumbnails_height: f64,
}

/// Sizing applied to the main image area.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ImageArea {
    /// Minimum height of the main area.
    pub min_height: f64,
    /// Maximum height of the image inside it.
    pub image_max_height: f64,
}

impl ImageArea {
    pub fn compute(metrics: LayoutMetrics, config: &LightboxConfig) -> Self {
        let available = (metrics.viewport_height
            - metrics.header_height
            - metrics.thumbnails_height
            - config.breathing_room)
            .max(config.min_image_area);
        Self {
            min_height: available,
            image_max_height: available - config.image_margin,
        }
    }
}

/// Where focus lands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FocusTarget<H> {
    Element(H),
    /// The lightbox container.
    Container,
    /// The capability section the carousel lives in.
    CapabilitySection,
}

/// What opened the lightbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Trigger<H> {
    /// A carousel card. Focus does not return to it on close, which would
    /// re-show its highlight.
    Card(H),
    /// Any other control.
    Control(H),
}

/// The page side of the lightbox.
pub trait LightboxSurface {
    /// Focusable element handle.
    type Handle: PartialEq + Clone;

    fn show(&mut self);
    fn hide(&mut self);
    fn render_title(&mut self, title: &str);

    /// Show one image with its caption and the `"i / n"` counter.
    fn render_image(&mut self, image: &GalleryImage, counter: &str);

    /// Rebuild the thumbnail strip, one thumbnail per image.
    fn render_thumbnails(&mut self, images: &[GalleryImage], active: usize);

    /// Mark the active thumbnail and scroll it into view.
    fn set_active_thumbnail(&mut self, index: usize);

    fn render_details(&mut self, details: CategoryDetails<'_>);
    fn layout_metrics(&self) -> LayoutMetrics;
    fn apply_image_area(&mut self, area: ImageArea);

    /// Smoothly scroll the thumbnail strip.
    fn scroll_thumbnails_by(&mut self, delta: f64);

    /// The dialog's focusable elements, in tab order.
    fn focusables(&self) -> Vec<Self::Handle>;

    /// The element that currently has focus.
    fn focused(&self) -> Option<Self::Handle>;

    fn focus(&mut self, target: FocusTarget<Self::Handle>);
}

/// Tuning for the lightbox.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightboxConfig {
    /// Distance of one thumbnail-strip scroll button click.
    pub thumbnail_scroll: f64,
    pub min_image_area: f64,
    pub breathing_room: f64,
    /// Space kept free around the image inside its area.
    pub image_margin: f64,
}

impl Default for LightboxConfig {
    fn default() -> Self {
        Self {
            thumbnail_scroll: 200.0,
            min_image_area: 240.0,
            breathing_room: 16.0,
            image_margin: 40.0,
        }
    }
}

/// Format the image counter.
pub fn counter_text(index: usize, total: usize) -> String {
    format!("{} / {}", index + 1, total)
}

struct OpenCategory<H> {
    id: String,
    images: Vec<GalleryImage>,
    index: usize,
    trigger: Trigger<H>,
}

/// Lightbox controller.
pub struct CapabilityModal<H> {
    catalog: Rc<Catalog>,
    config: LightboxConfig,
    state: Option<OpenCategory<H>>,

    /// Emitted with the category id after opening.
    pub opened: Signal<String>,
    /// Emitted after closing.
    pub closed: Signal<()>,
}

impl<H: PartialEq + Clone> CapabilityModal<H> {
    pub fn new(catalog: Rc<Catalog>, config: LightboxConfig) -> Self {
        Self {
            catalog,
            config,
            state: None,
            opened: Signal::new(),
            closed: Signal::new(),
        }
    }

    #[inline]
    pub fn is_open(&self) -> bool {
        self.state.is_some()
    }

    /// Index of the shown image, if open.
    pub fn index(&self) -> Option<usize> {
        self.state.as_ref().map(|s| s.index)
    }

    /// Number of images in the open category.
    pub fn image_count(&self) -> usize {
        self.state.as_ref().map_or(0, |s| s.images.len())
    }

    /// Id of the open category.
    pub fn category_id(&self) -> Option<&str> {
        self.state.as_ref().map(|s| s.id.as_str())
    }

    /// Open the lightbox on a category.
    ///
    /// Fails without touching the page when the category is unknown or has
    /// no images.
    pub fn open<S>(&mut self, surface: &mut S, category_id: &str, trigger: Trigger<H>) -> Result<()>
    where
        S: LightboxSurface<Handle = H>,
    {
        let catalog = Rc::clone(&self.catalog);
        let category = catalog.get(category_id)?;
        if category.images.is_empty() {
            return Err(Error::empty_gallery(category_id));
        }

        tracing::debug!(target: targets::MODAL, id = category_id, images = category.images.len(), "open lightbox");

        surface.render_title(&category.title);
        surface.render_details(category.details());
        surface.render_thumbnails(&category.images, 0);
        self.state = Some(OpenCategory {
            id: category.id.clone(),
            images: category.images.clone(),
            index: 0,
            trigger,
        });
        self.show_current(surface);
        surface.show();

        let first = surface
            .focusables()
            .into_iter()
            .next()
            .map_or(FocusTarget::Container, FocusTarget::Element);
        surface.focus(first);

        self.opened.emit(category.id.clone());
        Ok(())
    }

    /// Close the lightbox and restore focus.
    ///
    /// Returns `false` if it was not open.
    pub fn close<S>(&mut self, surface: &mut S) -> bool
    where
        S: LightboxSurface<Handle = H>,
    {
        let Some(state) = self.state.take() else {
            return false;
        };
        tracing::debug!(target: targets::MODAL, id = %state.id, "close lightbox");

        surface.hide();
        surface.focus(match state.trigger {
            Trigger::Card(_) => FocusTarget::CapabilitySection,
            Trigger::Control(handle) => FocusTarget::Element(handle),
        });
        self.closed.emit(());
        true
    }

    fn show_current<S>(&self, surface: &mut S)
    where
        S: LightboxSurface<Handle = H>,
    {
        let Some(state) = &self.state else {
            return;
        };
        let image = &state.images[state.index];
        surface.render_image(image, &counter_text(state.index, state.images.len()));
        surface.set_active_thumbnail(state.index);
        self.resize(surface);
    }

    fn step<S>(&mut self, surface: &mut S, direction: Direction)
    where
        S: LightboxSurface<Handle = H>,
    {
        let Some(state) = &mut self.state else {
            return;
        };
        state.index = direction.wrap(state.index, state.images.len());
        self.show_current(surface);
    }

    /// Show the next image, wrapping.
    pub fn next<S>(&mut self, surface: &mut S)
    where
        S: LightboxSurface<Handle = H>,
    {
        self.step(surface, Direction::Next);
    }

    /// Show the previous image, wrapping.
    pub fn prev<S>(&mut self, surface: &mut S)
    where
        S: LightboxSurface<Handle = H>,
    {
        self.step(surface, Direction::Previous);
    }

    /// Show image `index` (a thumbnail click). Out-of-range indices are ignored.
    pub fn select<S>(&mut self, surface: &mut S, index: usize)
    where
        S: LightboxSurface<Handle = H>,
    {
        let Some(state) = &mut self.state else {
            return;
        };
        if index < state.images.len() {
            state.index = index;
            self.show_current(surface);
        }
    }

    /// Scroll the thumbnail strip one step.
    pub fn scroll_thumbnails<S>(&self, surface: &mut S, direction: Direction)
    where
        S: LightboxSurface<Handle = H>,
    {
        if !self.is_open() {
            return;
        }
        let delta = match direction {
            Direction::Previous => -self.config.thumbnail_scroll,
            Direction::Next => self.config.thumbnail_scroll,
        };
        surface.scroll_thumbnails_by(delta);
    }

    /// Recompute the image area.
    pub fn resize<S>(&self, surface: &mut S)
    where
        S: LightboxSurface<Handle = H>,
    {
        if self.is_open() {
            let area = ImageArea::compute(surface.layout_metrics(), &self.config);
            surface.apply_image_area(area);
        }
    }

    /// A click landed on the backdrop itself.
    pub fn backdrop_click<S>(&mut self, surface: &mut S) -> bool
    where
        S: LightboxSurface<Handle = H>,
    {
        self.close(surface)
    }

    /// Handle a key press while the lightbox may be open.
    ///
    /// Returns `true` if the key was consumed (the caller should prevent the
    /// default action).
    pub fn handle_key<S>(&mut self, surface: &mut S, press: KeyPress) -> bool
    where
        S: LightboxSurface<Handle = H>,
    {
        if !self.is_open() {
            return false;
        }
        match press.key {
            Key::Escape => self.close(surface),
            Key::ArrowLeft => {
                self.prev(surface);
                true
            }
            Key::ArrowRight => {
                self.next(surface);
                true
            }
            Key::Tab => {
                let focusables = surface.focusables();
                let current = surface.focused();
                let target = match trap_focus(
                    &focusables,
                    current.as_ref(),
                    FocusReason::from_key_press(press),
                ) {
                    FocusMove::Element(handle) => FocusTarget::Element(handle),
                    FocusMove::Container => FocusTarget::Container,
                };
                surface.focus(target);
                true
            }
            _ => false,
        }
    }

    /// Enter or Space on the close control.
    pub fn close_control_key<S>(&mut self, surface: &mut S, key: Key) -> bool
    where
        S: LightboxSurface<Handle = H>,
    {
        key.is_activation() && self.close(surface)
    }
}
