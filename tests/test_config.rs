use std::time::Duration;
use bvr_live::common::{BvrPrediction, ModelVariant, Resolution};
use bvr_live::data::DetectionConfig;

#[test]
fn resolution_parses_selector_values() {
    assert_eq!(Resolution::parse("1280x720").unwrap(), Resolution::new(1280, 720));
    assert_eq!(" 640X480 ".parse::<Resolution>().unwrap(), Resolution::default());
    assert_eq!(Resolution::new(1920, 1080).to_string(), "1920x1080");

    assert!(Resolution::parse("1280").is_err());
    assert!(Resolution::parse("0x480").is_err());
    assert!(Resolution::parse("widexhigh").is_err());
}

#[test]
fn model_variant_names() {
    assert_eq!(ModelVariant::from_str("lite_mobilenet_v2"), Some(ModelVariant::Lite));
    assert_eq!(ModelVariant::from_str("COCO-SSD"), Some(ModelVariant::Full));
    assert_eq!(ModelVariant::from_str("yolo"), None);
    assert_eq!(ModelVariant::Lite.display_name(), "Lite MobileNet");
    assert_eq!(ModelVariant::all_model_variants(), vec!["full", "lite"]);
}

#[test]
fn config_defaults() {
    let config = DetectionConfig::new();
    assert_eq!(config.confidence_threshold, 0.5);
    assert_eq!(config.model_variant, ModelVariant::Full);
    assert_eq!(config.resolution, Resolution::new(640, 480));
    assert!(!config.tracking_enabled);
    assert_eq!(config.min_detection_interval(), Duration::from_millis(100));
}

#[test]
fn config_file_keeps_defaults_for_missing_keys() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.json");
    std::fs::write(&path, r#"{"confidence_threshold": 1.4, "model_variant": "lite",
                              "resolution": {"width": 1280, "height": 720}}"#).unwrap();

    let config = DetectionConfig::from_file(&path).unwrap();
    assert_eq!(config.confidence_threshold, 1.);
    assert_eq!(config.model_variant, ModelVariant::Lite);
    assert_eq!(config.resolution, Resolution::new(1280, 720));
    assert_eq!(config.min_detection_interval_ms, 100);
}

#[test]
fn config_file_errors() {
    let dir = tempfile::tempdir().unwrap();
    assert!(DetectionConfig::from_file(dir.path().join("missing.json")).is_err());

    let path = dir.path().join("bad.json");
    std::fs::write(&path, r#"{"resolution": {"width": 0, "height": 720}}"#).unwrap();
    let err = DetectionConfig::from_file(&path).unwrap_err();
    assert!(err.to_string().contains("non-zero"), "{}", err);
}

#[test]
fn prediction_uses_model_field_names() {
    let raw = r#"{"class":"person","score":0.87,"bbox":[12.5,20,100,200]}"#;
    let prediction: BvrPrediction = serde_json::from_str(raw).unwrap();

    assert_eq!(prediction.label, "person");
    assert_eq!(prediction.bbox.x_max(), 112.5);
    assert_eq!(prediction.bbox.y_max(), 220.);
    assert_eq!(prediction.label_text(), "person - 87%");

    let json = serde_json::to_value(&prediction).unwrap();
    assert_eq!(json["class"], "person");
    assert_eq!(json["bbox"][2], 100.0);
}

#[test]
fn label_percent_rounds_like_the_display() {
    let at = |score: f32| BvrPrediction::new("x", score, Default::default()).label_text();
    assert_eq!(at(0.285), "x - 28%");
    assert_eq!(at(0.145), "x - 14%");
    assert_eq!(at(0.456), "x - 46%");
    assert_eq!(at(1.), "x - 100%");
}
