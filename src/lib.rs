use wasm_bindgen::prelude::*;
use web_sys::{HtmlCanvasElement, WebGl2RenderingContext};

pub mod animation;
pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod mesh;
pub mod ornaments;
pub mod particles;
pub mod render;
pub mod scene;

pub use error::SceneError;

use animation::FrameClock;
use config::{ControlAction, Theme, TreeConfig};
use render::RenderPipeline;
use scene::{CameraRig, SceneComposer};

/// Install the panic hook and the console logger
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Info).ok();
}

/// Main engine state exposed to JavaScript
#[wasm_bindgen]
pub struct ArixTreeScene {
    pipeline: RenderPipeline,
    composer: SceneComposer,
    camera: CameraRig,
    clock: FrameClock,
    config: TreeConfig,
}

#[wasm_bindgen]
impl ArixTreeScene {
    /// Create a scene on the given canvas with the default configuration
    #[wasm_bindgen(constructor)]
    pub fn new(canvas: HtmlCanvasElement) -> Result<ArixTreeScene, JsValue> {
        let width = canvas.width() as i32;
        let height = canvas.height() as i32;

        let gl = canvas
            .get_context("webgl2")?
            .ok_or("Failed to get WebGL2 context")?
            .dyn_into::<WebGl2RenderingContext>()?;

        let config = TreeConfig::default();
        let mut pipeline = RenderPipeline::new(gl, width, height)?;

        let mut composer = SceneComposer::new(&config);
        composer.on_create();
        pipeline.upload_scene(&composer)?;

        log::info!("scene created with theme {}", config.theme);

        Ok(Self {
            pipeline,
            composer,
            camera: CameraRig::new(),
            clock: FrameClock::new(),
            config,
        })
    }

    /// Advance by `dt` seconds and draw a frame
    #[wasm_bindgen]
    pub fn render(&mut self, dt: f32) {
        let frame = self.clock.tick(dt);

        self.camera.auto_rotate(self.config.rotation_speed, frame.delta);
        self.composer.update(&self.config, frame);

        let output = self.composer.output(&self.config);
        self.pipeline.render(&output, &self.camera, frame.elapsed);
    }

    #[wasm_bindgen]
    pub fn resize(&mut self, width: i32, height: i32) -> Result<(), JsValue> {
        Ok(self.pipeline.resize(width, height)?)
    }

    /// Orbit camera by a pointer drag in pixels
    #[wasm_bindgen]
    pub fn orbit(&mut self, delta_x: f32, delta_y: f32) {
        self.camera.orbit(delta_x, delta_y);
    }

    #[wasm_bindgen]
    pub fn zoom(&mut self, delta: f32) {
        self.camera.zoom(delta);
    }

    // === Control surface ===

    #[wasm_bindgen]
    pub fn toggle_lights(&mut self) {
        self.config.apply(ControlAction::ToggleLights);
    }

    #[wasm_bindgen]
    pub fn toggle_particles(&mut self) {
        self.config.apply(ControlAction::ToggleParticles);
    }

    #[wasm_bindgen]
    pub fn toggle_assembled(&mut self) {
        self.config.apply(ControlAction::ToggleAssembled);
    }

    /// Switch theme by name; unknown names are rejected
    #[wasm_bindgen]
    pub fn set_theme(&mut self, name: &str) -> Result<(), JsValue> {
        let theme: Theme = name.parse()?;
        self.config.apply(ControlAction::SetTheme(theme));
        log::info!("theme set to {}", theme);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn set_rotation_speed(&mut self, speed: f32) {
        self.config.rotation_speed = speed;
    }

    /// Replace the whole configuration from a YAML document
    #[wasm_bindgen]
    pub fn load_config_yaml(&mut self, yaml: &str) -> Result<(), JsValue> {
        self.config = TreeConfig::from_yaml(yaml)?;
        log::info!("config loaded: {:?}", self.config);
        Ok(())
    }

    #[wasm_bindgen]
    pub fn config_yaml(&self) -> Result<String, JsValue> {
        Ok(self.config.to_yaml()?)
    }

    // === State getters ===

    #[wasm_bindgen]
    pub fn theme(&self) -> String {
        self.config.theme.to_string()
    }

    #[wasm_bindgen]
    pub fn lights_on(&self) -> bool {
        self.config.lights_on
    }

    #[wasm_bindgen]
    pub fn show_particles(&self) -> bool {
        self.config.show_particles
    }

    #[wasm_bindgen]
    pub fn is_assembled(&self) -> bool {
        self.config.is_assembled
    }

    #[wasm_bindgen]
    pub fn rotation_speed(&self) -> f32 {
        self.config.rotation_speed
    }

    /// Foliage morph progress (0 scattered, 1 assembled)
    #[wasm_bindgen]
    pub fn progress(&self) -> f32 {
        self.composer.body().progress()
    }

    /// Backdrop gradient color for the host page, as `#rrggbb`
    #[wasm_bindgen]
    pub fn backdrop_color(&self) -> String {
        self.config.theme.backdrop().to_hex()
    }
}

/// Names of all selectable themes, in menu order
#[wasm_bindgen]
pub fn theme_names() -> Vec<JsValue> {
    Theme::ALL.iter().map(|t| JsValue::from_str(t.name())).collect()
}

/// Swatch color of a theme button; errors on unknown names
#[wasm_bindgen]
pub fn theme_swatch(name: &str) -> Result<String, JsValue> {
    let theme: Theme = name.parse()?;
    Ok(theme.swatch().to_hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_theme_swatch() {
        assert_eq!(theme_swatch("obsidian").ok().as_deref(), Some("#111827"));
        assert_eq!(theme_swatch("emerald").ok().as_deref(), Some("#064e3b"));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    #[wasm_bindgen_test]
    fn test_unknown_theme_rejected_at_boundary() {
        let err = theme_swatch("jade").unwrap_err();
        assert!(err.as_string().unwrap_or_default().contains("jade"));
    }
}
