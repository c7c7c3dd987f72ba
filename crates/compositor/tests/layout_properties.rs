use image::{Rgba, RgbaImage};
use proptest::prelude::*;

use reframe_compositor::destinations::{compute_destinations, PIP_PADDING_RATIO};
use reframe_compositor::{Compositor, FrameKind, PixmapSurface, RasterSurface, StillFrameSource};
use reframe_model::geometry::{Rect, Size, VideoDimensions};
use reframe_model::layer::{LayerId, LayerModel, LayerPatch};
use reframe_model::layout::{OutputConfig, OutputLayout};

fn layers_with_camera(width: f64, height: f64) -> LayerModel {
    let mut layers = LayerModel::from_video_dimensions(VideoDimensions::new(1920, 1080).unwrap());
    layers.camera.width = width;
    layers.camera.height = height;
    layers
}

proptest! {
    #[test]
    fn docked_layouts_tile_the_canvas(
        w in 10.0f64..4000.0,
        h in 10.0f64..4000.0,
        top in any::<bool>(),
    ) {
        let layout = if top { OutputLayout::TiktokCamTop } else { OutputLayout::TiktokCamBottom };
        let layers = layers_with_camera(320.0, 180.0);
        let dest = compute_destinations(layout, Size::new(w, h), &layers);
        let camera = dest.camera.unwrap();
        let content = dest.content.unwrap();

        prop_assert!(camera.intersection_area(&content) < 1e-6);
        prop_assert!((camera.area() + content.area() - w * h).abs() < 1e-6 * w * h);
        prop_assert!((camera.width - w).abs() < 1e-9 && (content.width - w).abs() < 1e-9);
        if top {
            prop_assert!(camera.y.abs() < 1e-9);
        } else {
            prop_assert!((camera.bottom() - h).abs() < 1e-6);
        }
    }

    #[test]
    fn pip_stays_inside_padded_canvas(
        w in 10.0f64..4000.0,
        h in 10.0f64..4000.0,
        cam_w in 0.0f64..2000.0,
        cam_h in 0.0f64..2000.0,
        corner in 0usize..4,
    ) {
        let layout = [
            OutputLayout::YoutubePipTopLeft,
            OutputLayout::YoutubePipTopRight,
            OutputLayout::YoutubePipBottomLeft,
            OutputLayout::YoutubePipBottomRight,
        ][corner];
        let layers = layers_with_camera(cam_w, cam_h);
        let dest = compute_destinations(layout, Size::new(w, h), &layers);

        let padding = w.min(h) * PIP_PADDING_RATIO;
        let inner = Rect::new(padding, padding, w - 2.0 * padding, h - 2.0 * padding);
        let camera = dest.camera.unwrap();
        prop_assert!(camera.is_within(&inner, 1e-6), "{camera:?} not within {inner:?}");
        prop_assert_eq!(dest.content, Some(Rect::new(0.0, 0.0, w, h)));
    }
}

#[test]
fn hidden_layers_get_no_destination_in_any_layout() {
    let mut layers = layers_with_camera(320.0, 180.0);
    layers.update(LayerId::Camera, &LayerPatch::visibility(false)).unwrap();
    for layout in OutputLayout::ALL {
        let dest = compute_destinations(layout, Size::new(720.0, 1280.0), &layers);
        assert!(dest.camera.is_none(), "{layout}");
        assert_eq!(dest.content, Some(Rect::new(0.0, 0.0, 720.0, 1280.0)), "{layout}");
    }
}

#[test]
fn pip_frame_paints_camera_over_content() {
    // Left half of the frame red, right half blue; the camera crops the blue side.
    let frame = RgbaImage::from_fn(200, 100, |x, _| {
        if x < 100 {
            Rgba([255, 0, 0, 255])
        } else {
            Rgba([0, 0, 255, 255])
        }
    });
    let video = StillFrameSource::new(frame).unwrap();
    let mut layers = LayerModel::from_video_dimensions(VideoDimensions::new(200, 100).unwrap());
    layers.content = reframe_model::layer::Layer {
        width: 100.0,
        ..layers.content
    };
    layers.camera = reframe_model::layer::Layer {
        x: 120.0,
        y: 10.0,
        width: 64.0,
        height: 36.0,
        ..layers.camera
    };

    let mut compositor = Compositor::new(OutputConfig::new(OutputLayout::YoutubePipTopLeft));
    compositor.on_container_resized(160.0, 90.0, 1.0);
    let mut surface = PixmapSurface::new(1, 1);
    let report = compositor.draw_frame(&mut surface, &layers, &video);

    assert_eq!(report.kind, FrameKind::Composited);
    assert_eq!((surface.width(), surface.height()), (160, 90));
    let image = surface.image();
    // PIP: 40 px wide at 1.8 px padding, so pixel (10, 10) is camera.
    assert_eq!(*image.get_pixel(10, 10), Rgba([0, 0, 255, 255]));
    assert_eq!(*image.get_pixel(120, 70), Rgba([255, 0, 0, 255]));
}

#[test]
fn out_of_bounds_camera_leaves_content_intact() {
    let video = StillFrameSource::new(RgbaImage::from_pixel(64, 36, Rgba([0, 255, 0, 255]))).unwrap();
    let mut layers = LayerModel::from_video_dimensions(VideoDimensions::new(64, 36).unwrap());
    layers.camera.x = 60.0;

    let mut compositor = Compositor::new(OutputConfig::new(OutputLayout::TiktokCamTop));
    compositor.on_container_resized(36.0, 64.0, 1.0);
    let mut surface = PixmapSurface::new(1, 1);
    let report = compositor.draw_frame(&mut surface, &layers, &video);

    assert_eq!(report.drawn, vec![LayerId::Content]);
    let image = surface.image();
    // Camera strip stays black, content area is green.
    assert_eq!(*image.get_pixel(18, 4), Rgba([0, 0, 0, 255]));
    assert_eq!(*image.get_pixel(18, 40), Rgba([0, 255, 0, 255]));
}
