use serde::{Deserialize, Serialize};
use crate::error::Result;
use super::theme::{Theme, ThemePalette};

/// The single shared scene configuration.
///
/// Animators only ever read it; the control surface mutates it between frames
/// through [`TreeConfig::apply`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default, deny_unknown_fields)]
pub struct TreeConfig {
    pub theme: Theme,
    /// Camera rig auto-rotation speed (orbit-controls units)
    pub rotation_speed: f32,
    pub lights_on: bool,
    pub show_particles: bool,
    /// Master morph switch: tree when true, scattered cloud when false
    pub is_assembled: bool,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            theme: Theme::Emerald,
            rotation_speed: 0.8,
            lights_on: true,
            show_particles: true,
            is_assembled: true,
        }
    }
}

/// One mutation offered by the control surface
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ControlAction {
    ToggleLights,
    ToggleParticles,
    ToggleAssembled,
    SetTheme(Theme),
}

impl TreeConfig {
    /// Parse a YAML document; missing fields keep their defaults
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }

    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn palette(&self) -> ThemePalette {
        self.theme.palette()
    }

    /// Read-modify-write of exactly one field
    pub fn apply(&mut self, action: ControlAction) {
        match action {
            ControlAction::ToggleLights => self.lights_on = !self.lights_on,
            ControlAction::ToggleParticles => self.show_particles = !self.show_particles,
            ControlAction::ToggleAssembled => self.is_assembled = !self.is_assembled,
            ControlAction::SetTheme(theme) => self.theme = theme,
        }
        log::debug!("config action {:?} applied", action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SceneError;

    #[test]
    fn test_defaults() {
        let config = TreeConfig::default();
        assert_eq!(config.theme, Theme::Emerald);
        assert!((config.rotation_speed - 0.8).abs() < 1e-6);
        assert!(config.lights_on && config.show_particles && config.is_assembled);
    }

    #[test]
    fn test_each_action_touches_one_field() {
        let base = TreeConfig::default();

        let mut c = base.clone();
        c.apply(ControlAction::ToggleLights);
        assert_eq!(c, TreeConfig { lights_on: false, ..base.clone() });

        let mut c = base.clone();
        c.apply(ControlAction::ToggleParticles);
        assert_eq!(c, TreeConfig { show_particles: false, ..base.clone() });

        let mut c = base.clone();
        c.apply(ControlAction::ToggleAssembled);
        assert_eq!(c, TreeConfig { is_assembled: false, ..base.clone() });

        let mut c = base.clone();
        c.apply(ControlAction::SetTheme(Theme::Ruby));
        assert_eq!(c, TreeConfig { theme: Theme::Ruby, ..base });
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut c = TreeConfig::default();
        c.apply(ControlAction::ToggleAssembled);
        c.apply(ControlAction::ToggleAssembled);
        assert_eq!(c, TreeConfig::default());
    }

    #[test]
    fn test_from_yaml_partial() {
        let yaml = r#"
theme: sapphire
isAssembled: false
"#;
        let config = TreeConfig::from_yaml(yaml).unwrap();
        assert_eq!(config.theme, Theme::Sapphire);
        assert!(!config.is_assembled);
        assert!(config.lights_on);
    }

    #[test]
    fn test_from_yaml_rejects_unknown_theme() {
        let err = TreeConfig::from_yaml("theme: jade\n").unwrap_err();
        assert!(matches!(err, SceneError::Config(_)));
    }

    #[test]
    fn test_yaml_round_trip() {
        let config = TreeConfig {
            theme: Theme::Obsidian,
            rotation_speed: 1.5,
            ..Default::default()
        };
        let yaml = config.to_yaml().unwrap();
        assert!(yaml.contains("rotationSpeed"));
        assert_eq!(TreeConfig::from_yaml(&yaml).unwrap(), config);
    }
}
