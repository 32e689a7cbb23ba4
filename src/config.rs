use std::env;
use std::fmt;
use std::str::FromStr;

/// Which model export the process serves. Both answer the same API; the
/// quantized export is a mobile-style TorchScript module and runs on CPU only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelVariant {
    Full,
    Quantized,
}

impl ModelVariant {
    pub fn default_model_path(self) -> &'static str {
        match self {
            ModelVariant::Full => "model/plant_disease_model.pt",
            ModelVariant::Quantized => "model/plant_disease_model_quant.ptl",
        }
    }
}

impl FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "full" => Ok(ModelVariant::Full),
            "quantized" | "quant" => Ok(ModelVariant::Quantized),
            other => Err(format!("unknown model variant: {other}")),
        }
    }
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelVariant::Full => write!(f, "full"),
            ModelVariant::Quantized => write!(f, "quantized"),
        }
    }
}

pub struct AppConfig {
    pub variant: ModelVariant,
    pub model_path: String,
    pub data_path: String,
    pub port: u16,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let variant = env::var("MODEL_VARIANT")
            .ok()
            .and_then(|s| match s.parse() {
                Ok(v) => Some(v),
                Err(e) => {
                    log::warn!("{e}, falling back to the full model");
                    None
                }
            })
            .unwrap_or(ModelVariant::Full);

        let model_path = env::var("MODEL_PATH")
            .unwrap_or_else(|_| variant.default_model_path().to_string());
        let data_path =
            env::var("DATA_PATH").unwrap_or_else(|_| "data/plant_diseases.json".to_string());
        let port = env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8081);

        Self {
            variant,
            model_path,
            data_path,
            port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn variant_parses_case_insensitively() {
        assert_eq!("Full".parse::<ModelVariant>().unwrap(), ModelVariant::Full);
        assert_eq!(
            "QUANTIZED".parse::<ModelVariant>().unwrap(),
            ModelVariant::Quantized
        );
        assert_eq!(
            "quant".parse::<ModelVariant>().unwrap(),
            ModelVariant::Quantized
        );
        assert!("tflite".parse::<ModelVariant>().is_err());
    }

    #[test]
    fn variants_have_distinct_default_paths() {
        assert_ne!(
            ModelVariant::Full.default_model_path(),
            ModelVariant::Quantized.default_model_path()
        );
    }
}
