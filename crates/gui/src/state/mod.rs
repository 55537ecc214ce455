//! Application state: the design collection, the shared garment material,
//! and the order context.

pub mod design;
pub mod order;
pub mod settings;

pub use design::{Axis, DecodedImage, DesignCollection, DesignElement, ElementKind};
pub use order::OrderContext;
pub use settings::AppSettings;

use crate::asset::GarmentMaterial;

/// Combined application state
pub struct AppState {
    /// Ordered design elements plus selection
    pub design: DesignCollection,
    /// The one material instance shared by every garment piece. The color
    /// picker and the hex input both mutate this same value.
    pub material: GarmentMaterial,
    /// Sizes and customer info for submission
    pub order: OrderContext,
    pub settings: AppSettings,
    /// Show settings window
    pub show_settings_window: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            design: DesignCollection::default(),
            material: GarmentMaterial::default(),
            order: OrderContext::default(),
            settings: AppSettings::load(),
            show_settings_window: false,
        }
    }
}
