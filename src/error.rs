use thiserror::Error;

/// Errors surfaced by the scene engine
#[derive(Debug, Error)]
pub enum SceneError {
    /// A theme name that is not in the palette table
    #[error("unknown theme '{0}' (expected emerald, sapphire, ruby or obsidian)")]
    UnknownTheme(String),

    #[error("invalid hex color '{0}'")]
    InvalidColor(String),

    #[error("config parse error: {0}")]
    Config(#[from] serde_yaml::Error),

    /// WebGL resource creation or shader compilation failure
    #[error("WebGL error: {0}")]
    Gl(String),
}

pub type Result<T> = std::result::Result<T, SceneError>;

impl From<SceneError> for wasm_bindgen::JsValue {
    fn from(err: SceneError) -> Self {
        wasm_bindgen::JsValue::from_str(&err.to_string())
    }
}
