use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Unique identifier of a design element, stable for the session
pub type ElementId = String;

/// RGB color, stored as 8-bit sRGB components
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    /// Parse a `#rrggbb` or `rrggbb` hex string
    pub fn from_hex(s: &str) -> Option<Rgb> {
        let s = s.trim().trim_start_matches('#');
        if s.len() != 6 || !s.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let r = u8::from_str_radix(&s[0..2], 16).ok()?;
        let g = u8::from_str_radix(&s[2..4], 16).ok()?;
        let b = u8::from_str_radix(&s[4..6], 16).ok()?;
        Some(Rgb { r, g, b })
    }

    /// Format as `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Normalized sRGB components in 0..=1
    pub fn to_f32(self) -> [f32; 3] {
        [
            self.r as f32 / 255.0,
            self.g as f32 / 255.0,
            self.b as f32 / 255.0,
        ]
    }

    /// Linearized components (sRGB transfer function removed), as used by
    /// glTF `baseColorFactor`
    pub fn to_linear(self) -> [f32; 3] {
        fn lin(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        let [r, g, b] = self.to_f32();
        [lin(r), lin(g), lin(b)]
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

/// Garment size label
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SizeLabel {
    Xs,
    S,
    M,
    L,
    Xl,
    Xxl,
}

impl SizeLabel {
    pub const ALL: [SizeLabel; 6] = [
        SizeLabel::Xs,
        SizeLabel::S,
        SizeLabel::M,
        SizeLabel::L,
        SizeLabel::Xl,
        SizeLabel::Xxl,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SizeLabel::Xs => "XS",
            SizeLabel::S => "S",
            SizeLabel::M => "M",
            SizeLabel::L => "L",
            SizeLabel::Xl => "XL",
            SizeLabel::Xxl => "XXL",
        }
    }
}

/// Position, rotation and uniform scale of a design element on the garment
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Placement {
    pub position: [f32; 3],
    /// Euler angles in radians (XYZ order)
    pub rotation: [f32; 3],
    pub scale: f32,
}

/// Kind-specific payload of a summarized design element
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ElementSummary {
    Image {
        file_name: String,
        file_size: u64,
    },
    Text {
        text: String,
        color: Rgb,
        font_size: f32,
    },
}

/// One entry of the design summary sent to the order service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignEntry {
    pub placement: Placement,
    #[serde(flatten)]
    pub summary: ElementSummary,
}

/// Full design summary: garment color plus every customization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DesignSummary {
    pub garment_color: Rgb,
    pub elements: Vec<DesignEntry>,
}

/// Customer contact details captured with the order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CustomerInfo {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub notes: String,
}

/// Per-size item counts, as sent to the order service
pub type SizeCounts = BTreeMap<SizeLabel, u32>;

/// Response body of a successful order submission. The created-resource id
/// is optional; older service versions omit it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InquiryReceipt {
    #[serde(default)]
    pub id: Option<String>,
}

/// Best-effort local draft handed off to a downstream checkout step
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PendingDraft {
    pub customer: CustomerInfo,
    pub design: DesignSummary,
    pub sizes: SizeCounts,
    pub total_items: u64,
    pub total_price: u64,
    pub snapshot_data_uri: String,
    /// Unix timestamp (seconds) of when the draft was written
    pub created_at: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_parse_roundtrip() {
        let c = Rgb { r: 0x1a, g: 0xff, b: 0x00 };
        assert_eq!(Rgb::from_hex(&c.to_hex()), Some(c));
        assert_eq!(Rgb::from_hex("#FFFFFF"), Some(Rgb::WHITE));
        assert_eq!(Rgb::from_hex("000000"), Some(Rgb::BLACK));
    }

    #[test]
    fn hex_parse_rejects_garbage() {
        assert_eq!(Rgb::from_hex(""), None);
        assert_eq!(Rgb::from_hex("#fff"), None);
        assert_eq!(Rgb::from_hex("#gggggg"), None);
        assert_eq!(Rgb::from_hex("#1234567"), None);
    }

    #[test]
    fn linearize_endpoints() {
        assert_eq!(Rgb::BLACK.to_linear(), [0.0, 0.0, 0.0]);
        let white = Rgb::WHITE.to_linear();
        for c in white {
            assert!((c - 1.0).abs() < 1e-5);
        }
    }

    #[test]
    fn design_summary_serde() {
        let summary = DesignSummary {
            garment_color: Rgb { r: 200, g: 30, b: 30 },
            elements: vec![
                DesignEntry {
                    placement: Placement {
                        position: [0.0, 0.5, 0.4],
                        rotation: [0.0; 3],
                        scale: 0.8,
                    },
                    summary: ElementSummary::Image {
                        file_name: "logo.png".into(),
                        file_size: 1024,
                    },
                },
                DesignEntry {
                    placement: Placement {
                        position: [0.0, 0.2, 0.45],
                        rotation: [0.0; 3],
                        scale: 1.0,
                    },
                    summary: ElementSummary::Text {
                        text: "hello".into(),
                        color: Rgb::BLACK,
                        font_size: 0.2,
                    },
                },
            ],
        };

        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("\"kind\":\"image\""));
        assert!(json.contains("\"kind\":\"text\""));
        let back: DesignSummary = serde_json::from_str(&json).unwrap();
        assert_eq!(back, summary);
    }

    #[test]
    fn size_labels_ordered() {
        let mut counts = SizeCounts::new();
        counts.insert(SizeLabel::M, 3);
        counts.insert(SizeLabel::S, 2);
        let keys: Vec<_> = counts.keys().copied().collect();
        assert_eq!(keys, vec![SizeLabel::S, SizeLabel::M]);
    }
}
