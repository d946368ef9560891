// Marking request shape and label rendering

use rstest::rstest;
use serde_json::json;

use watermarkize::acquisition::AcquiredAsset;
use watermarkize::watermark::*;

#[rstest]
#[case(Some(800), 20)]
#[case(Some(2240), 56)]
#[case(Some(1000), 25)]
#[case(Some(1020), 26)]
#[case(Some(20), 1)]
#[case(None, 56)]
fn test_font_size_for_width(#[case] width: Option<u32>, #[case] expected: u32) {
    assert_eq!(font_size_for_width(width), expected);
}

#[test]
fn test_marking_request_serializes_like_engine_options() {
    let asset = AcquiredAsset::new("file:///DCIM/1.jpg").with_dimensions(800, 600);
    let value = serde_json::to_value(WatermarkConfig::for_asset(&asset)).unwrap();

    assert_eq!(
        value,
        json!({
            "source_uri": "file:///DCIM/1.jpg",
            "texts": [{
                "text": "Created with Watermarkize",
                "position": "bottom-left",
                "margin": 10,
                "style": {
                    "font_size": 20,
                    "color": "#fff",
                    "background": {
                        "padding_x": 15,
                        "padding_y": 15,
                        "color": "#000",
                        "kind": "fit"
                    }
                }
            }],
            "filename": "watermarkize",
            "output_format": "base64"
        })
    );
}

#[test]
fn test_marking_request_round_trips_through_json() {
    let config = WatermarkConfig::for_asset(&AcquiredAsset::new("/tmp/a.png"))
        .with_output_format(OutputFormat::File);
    let text = serde_json::to_string(&config).unwrap();
    let back: WatermarkConfig = serde_json::from_str(&text).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_label_box_includes_padding() {
    let style = TextStyle {
        font_size: 20,
        color: "#fff".to_string(),
        background: Some(TextBackgroundStyle {
            padding_x: 15,
            padding_y: 15,
            color: "#000".to_string(),
            kind: BackgroundKind::Fit,
        }),
    };
    let image = ImageDimensions {
        width: 800,
        height: 600,
    };

    let label = render_label("Created with Watermarkize", &style, &image).unwrap();
    let (text_w, text_h) = measure_text("Created with Watermarkize", 20.0).unwrap();
    assert_eq!(label.width(), text_w + 30);
    assert_eq!(label.height(), text_h + 30);
    assert_eq!(label.get_pixel(0, 0).0, [0, 0, 0, 255]);
}

#[test]
fn test_bottom_left_placement_respects_margin() {
    let pos = calculate_position(
        WatermarkPosition::BottomLeft,
        &ImageDimensions {
            width: 800,
            height: 600,
        },
        &LabelDimensions {
            width: 300,
            height: 50,
        },
        10,
    );
    assert_eq!(pos, PlacementPosition { x: 10, y: 540 });
}
