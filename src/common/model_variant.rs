use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    #[default] Full,
    Lite,
}

// Hardcoded variant names. Storing the display name and the selector value.
const FULL: [&str; 2] = ["COCO-SSD", "full"];
const LITE: [&str; 2] = ["Lite MobileNet", "lite"];

impl ModelVariant {
    pub fn from_str(variant: &str) -> Option<Self> {
        match variant.to_lowercase().as_str() {
            "full" | "coco-ssd" | "mobilenet_v2" => Some(ModelVariant::Full),
            "lite" | "lite_mobilenet_v2" => Some(ModelVariant::Lite),
            _ => None,
        }
    }

    /// Name shown to the user in history messages.
    pub fn display_name(&self) -> &'static str {
        match self {
            ModelVariant::Full => FULL[0],
            ModelVariant::Lite => LITE[0],
        }
    }

    pub fn str_lowercase(&self) -> &'static str {
        match self {
            ModelVariant::Full => FULL[1],
            ModelVariant::Lite => LITE[1],
        }
    }

    pub fn all_model_variants() -> Vec<String> {
        vec![
            ModelVariant::Full.str_lowercase().to_string(),
            ModelVariant::Lite.str_lowercase().to_string(),
        ]
    }
}

impl std::fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
