//! Capability gallery catalog.
//!
//! The catalog is an ordered list of categories, each with the images shown
//! in the lightbox and the detail content shown beside them. The quote form
//! derives its category and machine options from the same data.
//!
//! The built-in catalog is embedded from `data/gallery.json`.

use serde::{Deserialize, Serialize};

use enray_site_core::logging::targets;

use crate::error::{Error, Result};

const BUILTIN_GALLERY: &str = include_str!("../data/gallery.json");

/// One image in a category's gallery.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryImage {
    pub src: String,
    #[serde(default)]
    pub caption: String,
}

/// A titled detail entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryItem {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub desc: String,
}

/// A capability category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GalleryCategory {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub images: Vec<GalleryImage>,
    #[serde(default)]
    pub items: Vec<GalleryItem>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub points: Vec<String>,
}

/// The detail content a category presents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryDetails<'a> {
    /// Structured items, used whenever the category has any.
    Items(&'a [GalleryItem]),
    /// Free-text description with optional bullet points.
    Summary {
        description: &'a str,
        points: &'a [String],
    },
}

impl GalleryCategory {
    /// Resolve which detail content this category shows.
    pub fn details(&self) -> CategoryDetails<'_> {
        if self.items.is_empty() {
            CategoryDetails::Summary {
                description: &self.description,
                points: &self.points,
            }
        } else {
            CategoryDetails::Items(&self.items)
        }
    }

    /// Machine names offered by the quote form: the non-empty image captions.
    pub fn machine_names(&self) -> Vec<&str> {
        self.images
            .iter()
            .map(|image| image.caption.as_str())
            .filter(|caption| !caption.is_empty())
            .collect()
    }
}

/// The ordered set of capability categories.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Catalog {
    categories: Vec<GalleryCategory>,
}

impl Catalog {
    /// Load the catalog embedded in the crate.
    pub fn builtin() -> Result<Self> {
        Self::from_json_str(BUILTIN_GALLERY)
    }

    /// Parse a catalog from a JSON array of categories.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let categories: Vec<GalleryCategory> =
            serde_json::from_str(json).map_err(Error::GalleryParse)?;
        Self::new(categories)
    }

    /// Build a catalog, rejecting duplicate ids.
    pub fn new(categories: Vec<GalleryCategory>) -> Result<Self> {
        for (i, category) in categories.iter().enumerate() {
            if categories[..i].iter().any(|c| c.id == category.id) {
                return Err(Error::DuplicateCategory(category.id.clone()));
            }
            if category.images.is_empty() {
                tracing::warn!(target: targets::DATA, id = %category.id, "gallery category has no images");
            }
        }
        tracing::debug!(target: targets::DATA, categories = categories.len(), "gallery catalog loaded");
        Ok(Self { categories })
    }

    /// Look up a category by id.
    pub fn get(&self, id: &str) -> Result<&GalleryCategory> {
        self.categories
            .iter()
            .find(|c| c.id == id)
            .ok_or_else(|| Error::unknown_category(id))
    }

    /// Title for a category id, if known.
    pub fn title_of(&self, id: &str) -> Option<&str> {
        self.get(id).ok().map(|c| c.title.as_str())
    }

    /// `(id, title)` pairs in catalog order.
    pub fn options(&self) -> Vec<(&str, &str)> {
        self.categories
            .iter()
            .map(|c| (c.id.as_str(), c.title.as_str()))
            .collect()
    }

    /// Iterate categories in order.
    pub fn iter(&self) -> impl Iterator<Item = &GalleryCategory> {
        self.categories.iter()
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }
}
