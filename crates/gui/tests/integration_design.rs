//! End-to-end flow over the bundled garment model: load, decompose,
//! customize, export, assemble the order payload.

use std::path::Path;
use std::sync::Arc;

use teelab_gui_lib::asset::GarmentAsset;
use teelab_gui_lib::asset::GarmentMaterial;
use teelab_gui_lib::export::{self, SceneSnapshot};
use teelab_gui_lib::state::design::{DecodedImage, DesignCollection};
use teelab_gui_lib::state::OrderContext;
use teelab_gui_lib::upload::InquiryForm;

use shared::{Rgb, SizeLabel};

fn bundled_model() -> &'static GarmentAsset {
    GarmentAsset::prepare(Path::new("../../assets/tshirt.glb")).expect("bundled model loads")
}

fn red_dot() -> DecodedImage {
    let mut rgba = vec![0u8; 4 * 4 * 4];
    for px in rgba.chunks_mut(4) {
        px.copy_from_slice(&[255, 0, 0, 255]);
    }
    DecodedImage {
        width: 4,
        height: 4,
        rgba: Arc::from(rgba.into_boxed_slice()),
    }
}

#[test]
fn bundled_model_decomposes_into_named_pieces() {
    let asset = bundled_model();
    let names: Vec<&str> = asset.pieces.iter().map(|p| p.name.as_str()).collect();
    assert_eq!(names, ["torso", "sleeve_left", "sleeve_right"]);

    // The torso has the largest bounds and becomes the decal target
    assert_eq!(asset.target_piece_index, 0);
    assert_eq!(asset.target_piece().name, "torso");
}

#[test]
fn customized_design_round_trips_through_glb() {
    let asset = bundled_model();
    let material = GarmentMaterial {
        color: Rgb { r: 20, g: 40, b: 160 },
    };

    let mut design = DesignCollection::default();
    design.add_image(red_dot(), "data:,".into(), "logo.png".into(), 64);
    design.add_text("TEAM");

    let snapshot = SceneSnapshot::capture(asset, &material, &design);
    let glb = export::build_glb(&snapshot).expect("glb builds");

    let (document, _buffers, images) =
        gltf::import_slice(&glb).expect("exported glb parses");

    // Three garment pieces, one image element node, one text element node,
    // plus one quad node per decal
    assert_eq!(document.meshes().len(), 4);
    assert!(document.nodes().len() >= 5);
    assert_eq!(images.len(), 1);

    // The shared material comes first and carries the garment color
    let material = document.materials().next().expect("garment material");
    let base = material.pbr_metallic_roughness().base_color_factor();
    assert!(base[2] > base[0], "blue garment stays blue after export");
}

#[test]
fn inquiry_form_matches_order_state() {
    let asset = bundled_model();
    let material = GarmentMaterial::default();

    let mut design = DesignCollection::default();
    design.add_text("hello");

    let mut order = OrderContext::default();
    order.set_size(SizeLabel::M, 3);
    order.customer.name = "Jo".into();
    order.customer.email = "jo@example.com".into();

    let snapshot = SceneSnapshot::capture(asset, &material, &design);
    let glb = export::build_glb(&snapshot).expect("glb builds");

    let form = InquiryForm::new(
        &order,
        &design,
        material.color,
        "data:image/png;base64,AAAA".into(),
        glb,
    )
    .expect("form assembles");

    let field = |name: &str| {
        form.fields()
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, v)| v.as_str())
            .unwrap_or_else(|| panic!("missing field {name}"))
    };

    assert_eq!(field("name"), "Jo");
    assert_eq!(field("total_items"), "3");
    assert_eq!(field("total_price"), "6000");
    assert_eq!(field("garment_color"), "#ffffff");
    assert!(!form.glb().is_empty());
}
