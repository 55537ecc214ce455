//! Order submission to the backend collaborator.
//!
//! The multipart form is assembled as a plain field list first so payload
//! construction stays testable without a network; `submit` only attaches the
//! fields and the GLB file and performs the HTTP call.

use std::time::Duration;

use shared::{DesignEntry, DesignSummary, ElementSummary, InquiryReceipt, Placement, Rgb};
use tracing::{info, warn};

use crate::error::UploadError;
use crate::state::design::{DesignCollection, ElementKind};
use crate::state::order::OrderContext;

/// Bounded wait for the whole upload call
pub const UPLOAD_TIMEOUT: Duration = Duration::from_secs(30);

/// Summarize the design for the order service: kind-specific payload plus
/// placement for every element.
pub fn design_summary(design: &DesignCollection, garment_color: Rgb) -> DesignSummary {
    let elements = design
        .elements()
        .iter()
        .map(|e| {
            let (summary, scale) = match &e.kind {
                ElementKind::Image {
                    file_name,
                    file_size,
                    scale,
                    ..
                } => (
                    ElementSummary::Image {
                        file_name: file_name.clone(),
                        file_size: *file_size,
                    },
                    *scale,
                ),
                ElementKind::Text {
                    text,
                    color,
                    font_size,
                } => (
                    ElementSummary::Text {
                        text: text.clone(),
                        color: *color,
                        font_size: *font_size,
                    },
                    1.0,
                ),
            };
            DesignEntry {
                placement: Placement {
                    position: e.position,
                    rotation: e.rotation,
                    scale,
                },
                summary,
            }
        })
        .collect();

    DesignSummary {
        garment_color,
        elements,
    }
}

/// Assembled order inquiry: text fields plus the binary 3D asset
pub struct InquiryForm {
    fields: Vec<(&'static str, String)>,
    glb: Vec<u8>,
}

impl InquiryForm {
    pub fn new(
        order: &OrderContext,
        design: &DesignCollection,
        garment_color: Rgb,
        snapshot_data_uri: String,
        glb: Vec<u8>,
    ) -> Result<InquiryForm, serde_json::Error> {
        let summary = design_summary(design, garment_color);
        let fields = vec![
            ("name", order.customer.name.clone()),
            ("email", order.customer.email.clone()),
            ("phone", order.customer.phone.clone()),
            ("notes", order.customer.notes.clone()),
            ("design", serde_json::to_string(&summary)?),
            ("total_items", order.total_items().to_string()),
            ("total_price", order.total_price().to_string()),
            ("garment_color", garment_color.to_hex()),
            ("sizes", serde_json::to_string(&order.sizes)?),
            ("snapshot", snapshot_data_uri),
        ];
        Ok(InquiryForm { fields, glb })
    }

    pub fn fields(&self) -> &[(&'static str, String)] {
        &self.fields
    }

    pub fn glb(&self) -> &[u8] {
        &self.glb
    }
}

/// Post the inquiry. Returns the created-resource id when the service
/// reports one; its absence is not an error.
pub async fn submit(endpoint: &str, form: InquiryForm) -> Result<Option<String>, UploadError> {
    let mut multipart = reqwest::multipart::Form::new();
    for (name, value) in &form.fields {
        multipart = multipart.text(*name, value.clone());
    }
    let attachment = reqwest::multipart::Part::bytes(form.glb)
        .file_name("design.glb")
        .mime_str("model/gltf-binary")
        .map_err(|e| UploadError::Connect(e.to_string()))?;
    multipart = multipart.part("model", attachment);

    let client = reqwest::Client::new();
    let response = client
        .post(endpoint)
        .multipart(multipart)
        .timeout(UPLOAD_TIMEOUT)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                UploadError::Timeout(UPLOAD_TIMEOUT.as_secs())
            } else {
                UploadError::Connect(e.to_string())
            }
        })?;

    let status = response.status();
    if !status.is_success() {
        let message = response.text().await.unwrap_or_default();
        return Err(UploadError::Server {
            status: status.as_u16(),
            message,
        });
    }

    let id = match response.json::<InquiryReceipt>().await {
        Ok(receipt) => receipt.id,
        Err(e) => {
            // A success response without a parseable body must not fail
            // the flow
            warn!("inquiry response body not understood: {e}");
            None
        }
    };
    info!(id = id.as_deref().unwrap_or("-"), "order inquiry submitted");
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::design::DecodedImage;
    use shared::SizeLabel;
    use std::sync::Arc;

    fn sample_state() -> (OrderContext, DesignCollection) {
        let mut order = OrderContext::default();
        order.customer.name = "Ada".into();
        order.customer.email = "ada@example.com".into();
        order.set_size(SizeLabel::S, 2);
        order.set_size(SizeLabel::M, 3);

        let mut design = DesignCollection::default();
        design.add_image(
            DecodedImage {
                width: 1,
                height: 1,
                rgba: Arc::from(vec![0u8; 4].into_boxed_slice()),
            },
            "data:,".into(),
            "logo.png".into(),
            4,
        );
        design.add_text("crew 2026");
        (order, design)
    }

    #[test]
    fn summary_covers_all_elements() {
        let (_, design) = sample_state();
        let summary = design_summary(&design, Rgb::WHITE);
        assert_eq!(summary.elements.len(), 2);
        assert!(matches!(
            summary.elements[0].summary,
            ElementSummary::Image { ref file_name, file_size: 4 } if file_name == "logo.png"
        ));
        assert_eq!(summary.elements[0].placement.scale, 0.8);
        assert!(matches!(
            summary.elements[1].summary,
            ElementSummary::Text { ref text, .. } if text == "crew 2026"
        ));
    }

    #[test]
    fn form_fields_match_contract() {
        let (order, design) = sample_state();
        let color = Rgb { r: 10, g: 20, b: 30 };
        let form = InquiryForm::new(&order, &design, color, "data:image/png;base64,xx".into(), vec![1, 2, 3])
            .unwrap();

        let get = |name: &str| {
            form.fields()
                .iter()
                .find(|(n, _)| *n == name)
                .map(|(_, v)| v.clone())
                .unwrap()
        };

        assert_eq!(get("name"), "Ada");
        assert_eq!(get("total_items"), "5");
        assert_eq!(get("total_price"), "10000");
        assert_eq!(get("garment_color"), "#0a141e");
        assert_eq!(form.glb(), &[1, 2, 3]);

        let sizes: shared::SizeCounts = serde_json::from_str(&get("sizes")).unwrap();
        assert_eq!(sizes.get(&SizeLabel::M), Some(&3));

        let design_json: DesignSummary = serde_json::from_str(&get("design")).unwrap();
        assert_eq!(design_json.garment_color, color);
        assert_eq!(design_json.elements.len(), 2);
    }
}
