//! Ordered collection of user-added design elements and their transforms.
//!
//! Element order is z-order / recency for the list UI; placement correctness
//! does not depend on it. `ElementId`s are stable for the element's lifetime
//! and serve as render keys, so unrelated edits never cause GPU resource
//! churn. Removed image elements are retired into a drain list; the render
//! host deletes the GL texture for each retired id exactly once.

use std::sync::Arc;

use shared::{ElementId, Rgb};
use uuid::Uuid;

use crate::validation::{check_label_text, finite_or};

/// Decoded RGBA pixels of an uploaded image. Rows are top-left origin, which
/// matches decal projection expectations (no vertical flip).
#[derive(Clone)]
pub struct DecodedImage {
    pub width: u32,
    pub height: u32,
    /// Shared so per-frame render snapshots are cheap; the GL texture built
    /// from it is still exclusively owned by the element's render key.
    pub rgba: Arc<[u8]>,
}

/// Transform axis selector for the per-field setters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Kind-specific payload of a design element
pub enum ElementKind {
    Image {
        pixels: DecodedImage,
        /// Data URI shown as thumbnail in the element list
        preview_uri: String,
        file_name: String,
        file_size: u64,
        /// Uniform decal scale
        scale: f32,
    },
    Text {
        text: String,
        color: Rgb,
        font_size: f32,
    },
}

/// A user customization: image decal or text label
pub struct DesignElement {
    pub id: ElementId,
    pub position: [f32; 3],
    /// Euler angles in radians
    pub rotation: [f32; 3],
    pub kind: ElementKind,
}

impl DesignElement {
    pub fn is_image(&self) -> bool {
        matches!(self.kind, ElementKind::Image { .. })
    }
}

pub const DEFAULT_IMAGE_SCALE: f32 = 0.8;
pub const DEFAULT_FONT_SIZE: f32 = 0.2;
/// Fresh decals spawn on the chest area of the target surface
const IMAGE_SPAWN: [f32; 3] = [0.0, 0.5, 0.4];
const TEXT_SPAWN: [f32; 3] = [0.0, 0.2, 0.45];

/// Ordered design elements plus the current selection
#[derive(Default)]
pub struct DesignCollection {
    elements: Vec<DesignElement>,
    selected: Option<usize>,
    /// Image element ids whose GPU texture must be released
    retired: Vec<ElementId>,
    /// Bumps on every mutation; drives renderer reconciliation
    version: u64,
}

impl DesignCollection {
    pub fn elements(&self) -> &[DesignElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&DesignElement> {
        self.elements.get(index)
    }

    /// Selected element index, always valid while present
    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_element(&self) -> Option<&DesignElement> {
        self.elements.get(self.selected?)
    }

    /// Current mutation version (increments on every successful mutation)
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Append an image element with default placement and select it
    pub fn add_image(
        &mut self,
        pixels: DecodedImage,
        preview_uri: String,
        file_name: String,
        file_size: u64,
    ) -> ElementId {
        let id = Uuid::new_v4().to_string();
        self.elements.push(DesignElement {
            id: id.clone(),
            position: IMAGE_SPAWN,
            rotation: [0.0; 3],
            kind: ElementKind::Image {
                pixels,
                preview_uri,
                file_name,
                file_size,
                scale: DEFAULT_IMAGE_SCALE,
            },
        });
        self.selected = Some(self.elements.len() - 1);
        self.version += 1;
        id
    }

    /// Append a text element with default placement and select it.
    /// Whitespace-only text is rejected (no-op, returns `None`).
    pub fn add_text(&mut self, text: &str) -> Option<ElementId> {
        if check_label_text(text).is_err() {
            return None;
        }
        let text = text.trim();
        let id = Uuid::new_v4().to_string();
        self.elements.push(DesignElement {
            id: id.clone(),
            position: TEXT_SPAWN,
            rotation: [0.0; 3],
            kind: ElementKind::Text {
                text: text.to_string(),
                color: Rgb::BLACK,
                font_size: DEFAULT_FONT_SIZE,
            },
        });
        self.selected = Some(self.elements.len() - 1);
        self.version += 1;
        Some(id)
    }

    /// Remove the element at `index`. Retires its texture if it is an image
    /// and renumbers the selection: unset if it pointed at `index`,
    /// decremented if it pointed past it, unchanged otherwise.
    /// Out-of-range indices are a no-op.
    pub fn remove(&mut self, index: usize) {
        if index >= self.elements.len() {
            return;
        }
        let removed = self.elements.remove(index);
        if removed.is_image() {
            self.retired.push(removed.id);
        }
        self.selected = match self.selected {
            Some(s) if s == index => None,
            Some(s) if s > index => Some(s - 1),
            other => other,
        };
        self.version += 1;
    }

    /// Select an element, or clear the selection. Out-of-range indices clear.
    pub fn select(&mut self, index: Option<usize>) {
        self.selected = index.filter(|&i| i < self.elements.len());
        self.version += 1;
    }

    pub fn set_position(&mut self, index: usize, axis: Axis, value: f32) {
        if let Some(element) = self.elements.get_mut(index) {
            let slot = &mut element.position[axis.index()];
            *slot = finite_or(value, *slot);
            self.version += 1;
        }
    }

    pub fn set_rotation(&mut self, index: usize, axis: Axis, value: f32) {
        if let Some(element) = self.elements.get_mut(index) {
            let slot = &mut element.rotation[axis.index()];
            *slot = finite_or(value, *slot);
            self.version += 1;
        }
    }

    /// Set decal scale; non-finite input falls back to the default.
    /// No-op on text elements.
    pub fn set_scale(&mut self, index: usize, value: f32) {
        if let Some(DesignElement {
            kind: ElementKind::Image { scale, .. },
            ..
        }) = self.elements.get_mut(index)
        {
            *scale = finite_or(value, DEFAULT_IMAGE_SCALE);
            self.version += 1;
        }
    }

    /// No-op on image elements
    pub fn set_text_color(&mut self, index: usize, new_color: Rgb) {
        if let Some(DesignElement {
            kind: ElementKind::Text { color, .. },
            ..
        }) = self.elements.get_mut(index)
        {
            *color = new_color;
            self.version += 1;
        }
    }

    /// Set label font size; non-finite input falls back to the default.
    /// No-op on image elements.
    pub fn set_font_size(&mut self, index: usize, value: f32) {
        if let Some(DesignElement {
            kind: ElementKind::Text { font_size, .. },
            ..
        }) = self.elements.get_mut(index)
        {
            *font_size = finite_or(value, DEFAULT_FONT_SIZE);
            self.version += 1;
        }
    }

    /// Drain ids of removed image elements whose GPU texture must be
    /// released. Each id is returned exactly once.
    pub fn take_retired(&mut self) -> Vec<ElementId> {
        std::mem::take(&mut self.retired)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_pixels() -> DecodedImage {
        DecodedImage {
            width: 2,
            height: 2,
            rgba: Arc::from(vec![255u8; 16].into_boxed_slice()),
        }
    }

    fn add_test_image(c: &mut DesignCollection) -> ElementId {
        c.add_image(test_pixels(), "data:,".into(), "logo.png".into(), 16)
    }

    #[test]
    fn add_image_selects_new_element() {
        let mut c = DesignCollection::default();
        add_test_image(&mut c);
        assert_eq!(c.len(), 1);
        assert_eq!(c.selected(), Some(0));

        c.add_text("hello");
        assert_eq!(c.selected(), Some(1));

        let e = c.get(0).unwrap();
        assert_eq!(e.position, [0.0, 0.5, 0.4]);
        assert!(matches!(e.kind, ElementKind::Image { scale, .. } if scale == 0.8));
    }

    #[test]
    fn add_text_defaults() {
        let mut c = DesignCollection::default();
        c.add_text("  hello  ");
        let e = c.get(0).unwrap();
        assert_eq!(e.position, [0.0, 0.2, 0.45]);
        match &e.kind {
            ElementKind::Text {
                text,
                color,
                font_size,
            } => {
                assert_eq!(text, "hello");
                assert_eq!(*color, Rgb::BLACK);
                assert_eq!(*font_size, 0.2);
            }
            _ => panic!("expected text element"),
        }
    }

    #[test]
    fn whitespace_text_rejected() {
        let mut c = DesignCollection::default();
        assert!(c.add_text("   ").is_none());
        assert!(c.add_text("").is_none());
        assert_eq!(c.len(), 0);
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn remove_renumbers_selection() {
        // [imgA, textB, imgC], selected = 2, remove(0)
        let mut c = DesignCollection::default();
        let id_a = add_test_image(&mut c);
        c.add_text("b");
        let id_c = add_test_image(&mut c);
        c.select(Some(2));

        c.remove(0);

        assert_eq!(c.len(), 2);
        assert_eq!(c.selected(), Some(1));
        assert_eq!(c.get(1).unwrap().id, id_c);

        // imgA's texture is released exactly once
        let retired = c.take_retired();
        assert_eq!(retired, vec![id_a]);
        assert!(c.take_retired().is_empty());
    }

    #[test]
    fn remove_selected_clears_selection() {
        let mut c = DesignCollection::default();
        add_test_image(&mut c);
        c.add_text("t");
        c.select(Some(0));
        c.remove(0);
        assert_eq!(c.selected(), None);
    }

    #[test]
    fn remove_before_selection_is_unchanged() {
        let mut c = DesignCollection::default();
        c.add_text("a");
        c.add_text("b");
        c.select(Some(0));
        c.remove(1);
        assert_eq!(c.selected(), Some(0));
    }

    #[test]
    fn remove_out_of_range_is_noop() {
        let mut c = DesignCollection::default();
        c.add_text("a");
        let version = c.version();
        c.remove(5);
        assert_eq!(c.len(), 1);
        assert_eq!(c.version(), version);
    }

    #[test]
    fn text_removal_retires_nothing() {
        let mut c = DesignCollection::default();
        c.add_text("a");
        c.remove(0);
        assert!(c.take_retired().is_empty());
    }

    #[test]
    fn ids_stable_across_unrelated_mutations() {
        let mut c = DesignCollection::default();
        let id0 = c.add_text("a").unwrap();
        let id1 = add_test_image(&mut c);
        c.set_position(1, Axis::X, 0.3);
        c.set_scale(1, 1.2);
        c.remove(0);
        assert_eq!(c.get(0).unwrap().id, id1);
        assert_ne!(id0, id1);
    }

    #[test]
    fn non_finite_position_keeps_prior_value() {
        let mut c = DesignCollection::default();
        c.add_text("a");
        c.set_position(0, Axis::Y, 0.7);
        c.set_position(0, Axis::Y, f32::NAN);
        assert_eq!(c.get(0).unwrap().position[1], 0.7);
        c.set_rotation(0, Axis::Z, f32::INFINITY);
        assert_eq!(c.get(0).unwrap().rotation[2], 0.0);
    }

    #[test]
    fn non_finite_scale_and_font_fall_back_to_defaults() {
        let mut c = DesignCollection::default();
        add_test_image(&mut c);
        c.add_text("t");

        c.set_scale(0, 1.5);
        c.set_scale(0, f32::NAN);
        match c.get(0).unwrap().kind {
            ElementKind::Image { scale, .. } => assert_eq!(scale, DEFAULT_IMAGE_SCALE),
            _ => unreachable!(),
        }

        c.set_font_size(1, f32::NEG_INFINITY);
        match c.get(1).unwrap().kind {
            ElementKind::Text { font_size, .. } => assert_eq!(font_size, DEFAULT_FONT_SIZE),
            _ => unreachable!(),
        }
    }

    #[test]
    fn kind_mismatched_setters_are_noops() {
        let mut c = DesignCollection::default();
        add_test_image(&mut c);
        c.add_text("t");

        c.set_font_size(0, 0.5);
        assert!(matches!(
            c.get(0).unwrap().kind,
            ElementKind::Image { scale, .. } if scale == DEFAULT_IMAGE_SCALE
        ));

        c.set_scale(1, 2.0);
        assert!(matches!(
            c.get(1).unwrap().kind,
            ElementKind::Text { font_size, .. } if font_size == DEFAULT_FONT_SIZE
        ));
    }

    #[test]
    fn select_out_of_range_clears() {
        let mut c = DesignCollection::default();
        c.add_text("a");
        c.select(Some(9));
        assert_eq!(c.selected(), None);
    }
}
