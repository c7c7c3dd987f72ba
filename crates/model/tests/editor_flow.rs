use proptest::prelude::*;

use reframe_model::editor::EditorState;
use reframe_model::geometry::{fit_contain, fit_cover, Size, VideoDimensions};
use reframe_model::instructions::ClipInstructions;
use reframe_model::layer::{LayerField, LayerId, LayerPatch};
use reframe_model::layout::{OutputConfig, OutputLayout};

#[test]
fn settings_panel_edits_flow_into_clip_request() {
    let mut editor = EditorState::new();
    editor.load_video(VideoDimensions::new(1280, 720).unwrap());

    assert!(editor.apply_field_input(LayerId::Camera, LayerField::X, "640"));
    assert!(editor.apply_field_input(LayerId::Camera, LayerField::Rotation, "90"));
    assert!(!editor.apply_field_input(LayerId::Camera, LayerField::Width, "wide"));
    assert!(editor.set_visible(LayerId::Content, false));

    let config = OutputConfig::new(OutputLayout::YoutubePipTopRight);
    let request = ClipInstructions::build(&editor, "demo.mp4", 12.0, &config).unwrap();

    assert_eq!(request.layers.len(), 1);
    let camera = request.layers[0];
    assert_eq!(camera.id, LayerId::Camera);
    assert_eq!(camera.source_rect.x, 640);
    assert_eq!(camera.source_rect.width, 320);
    assert_eq!(camera.rotation, 90.0);
}

#[test]
fn loading_a_new_video_resets_layers_and_selection() {
    let mut editor = EditorState::new();
    editor.load_video(VideoDimensions::new(1920, 1080).unwrap());
    editor.select(Some(LayerId::Content));
    editor
        .update(LayerId::Content, &LayerPatch::position(100.0, 100.0))
        .unwrap();

    editor.load_video(VideoDimensions::new(720, 1280).unwrap());

    assert_eq!(editor.selected(), None);
    let content = editor.layer(LayerId::Content);
    assert_eq!((content.x, content.y, content.width, content.height), (0.0, 0.0, 720.0, 1280.0));
    let camera = editor.layer(LayerId::Camera);
    assert_eq!(camera.width, 180.0);
    assert!((camera.height - 101.25).abs() < 1e-9);
}

#[test]
fn rejected_update_leaves_revision_alone() {
    let mut editor = EditorState::new();
    editor.load_video(VideoDimensions::new(1920, 1080).unwrap());
    let revision = editor.revision();

    let patch = LayerPatch {
        x: Some(5.0),
        width: Some(f64::INFINITY),
        ..LayerPatch::default()
    };
    assert!(editor.update(LayerId::Camera, &patch).is_err());
    assert_eq!(editor.revision(), revision);
    assert_eq!(editor.layer(LayerId::Camera).x, 20.0);
}

proptest! {
    #[test]
    fn contain_fits_inside_and_cover_fills(
        cw in 1.0f64..5000.0,
        ch in 1.0f64..5000.0,
        vw in 1.0f64..5000.0,
        vh in 1.0f64..5000.0,
    ) {
        let container = Size::new(cw, ch);
        let content = Size::new(vw, vh);

        let contain = fit_contain(container, content).unwrap();
        prop_assert!(contain.width <= cw + 1e-6 && contain.height <= ch + 1e-6);
        prop_assert!((contain.width / contain.height - vw / vh).abs() / (vw / vh) < 1e-9);

        let cover = fit_cover(container, content).unwrap();
        prop_assert!(cover.width >= cw - 1e-6 && cover.height >= ch - 1e-6);
        prop_assert!((cover.offset_x * 2.0 + cover.width - cw).abs() < 1e-6);
    }

    #[test]
    fn draw_order_puts_lower_z_first(content_z in -10i32..10, camera_z in -10i32..10) {
        let mut editor = EditorState::new();
        editor.load_video(VideoDimensions::new(1920, 1080).unwrap());
        editor.update(LayerId::Content, &LayerPatch { z_index: Some(content_z), ..LayerPatch::default() }).unwrap();
        editor.update(LayerId::Camera, &LayerPatch { z_index: Some(camera_z), ..LayerPatch::default() }).unwrap();

        let [background, foreground] = editor.layers_in_draw_order();
        prop_assert!(background.z_index <= foreground.z_index);
        if content_z == camera_z {
            prop_assert_eq!(background.id, LayerId::Camera);
        }
    }
}
