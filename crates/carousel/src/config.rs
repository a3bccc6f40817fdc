use crate::events::AppEvent;
use crate::icon::IconName;
use derive_more::{AsRef, Deref, Display, From, Into};
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use orbit::{Easing, Motion, OrbitError, Radius};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

#[derive(
    Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, Display, Deref, From, Into, AsRef,
)]
#[serde(transparent)]
pub struct ItemLabel(String);

crate::impl_string_newtype!(ItemLabel);

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ItemConfig {
    pub label: ItemLabel,
    pub icon: Option<IconName>,
}

impl ItemConfig {
    fn demo(label: &str, icon: &str) -> Self {
        Self {
            label: ItemLabel::new(label),
            icon: Some(IconName::new(icon)),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Fixed radius in pixels. When unset the radius follows the window width.
    pub radius: Option<f64>,
    pub viewport_fraction: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            radius: None,
            viewport_fraction: 0.25,
        }
    }
}

impl LayoutConfig {
    pub fn radius(&self, viewport_width: impl Fn() -> f64 + 'static) -> Radius {
        match self.radius {
            Some(r) => Radius::Fixed(r),
            None => {
                let fraction = self.viewport_fraction;
                Radius::viewport(move || viewport_width() * fraction)
            }
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct MotionConfig {
    /// Seconds.
    pub duration: f64,
    pub easing: Easing,
    pub resize_debounce_ms: u64,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            duration: 0.3,
            easing: Easing::EaseInOutQuad,
            resize_debounce_ms: 100,
        }
    }
}

impl MotionConfig {
    pub fn motion(&self) -> Result<Motion, OrbitError> {
        let duration = Duration::try_from_secs_f64(self.duration)
            .map_err(|_| OrbitError::InvalidDuration(self.duration))?;
        Ok(Motion {
            duration,
            easing: self.easing,
        })
    }

    pub fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub items: Vec<ItemConfig>,
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub motion: MotionConfig,
}

impl Config {
    /// Used when no config file exists yet.
    pub fn demo() -> Self {
        Self {
            items: vec![
                ItemConfig::demo("Home", "user-home"),
                ItemConfig::demo("Files", "folder"),
                ItemConfig::demo("Browser", "internet-web-browser"),
                ItemConfig::demo("Terminal", "utilities-terminal"),
                ItemConfig::demo("Editor", "accessories-text-editor"),
                ItemConfig::demo("Music", "multimedia-player"),
                ItemConfig::demo("Settings", "preferences-system"),
                ItemConfig::demo("Help", "help-browser"),
            ],
            ..Self::default()
        }
    }

    /// Checks what the carousel would reject, before any window exists.
    pub fn validate(&self) -> Result<(), OrbitError> {
        if self.items.is_empty() {
            return Err(OrbitError::EmptyLayout);
        }
        if let Some(r) = self.layout.radius
            && !(r.is_finite() && r > 0.0)
        {
            return Err(OrbitError::InvalidRadius(r));
        }
        let fraction = self.layout.viewport_fraction;
        if self.layout.radius.is_none() && !(fraction.is_finite() && fraction > 0.0) {
            return Err(OrbitError::InvalidRadius(fraction));
        }
        self.motion.motion().map(|_| ())
    }
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Invalid carousel settings: {0}")]
    Invalid(#[from] OrbitError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
}

pub fn get_config_path() -> Result<std::path::PathBuf, ConfigError> {
    let proj_dirs =
        ProjectDirs::from("org", "orbit", "carousel").ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

fn environment() -> config::Environment {
    config::Environment::with_prefix("CAROUSEL").separator("__")
}

/// Layers `CAROUSEL__*` overrides on top of `base` and validates the result.
fn build_config<S>(base: S, env: config::Environment) -> Result<Config, ConfigError>
where
    S: config::Source + Send + Sync + 'static,
{
    let s = config::Config::builder()
        .add_source(base)
        .add_source(env)
        .build()?;

    let config: Config = s.try_deserialize()?;
    config.validate()?;
    Ok(config)
}

pub fn load_config() -> Result<Config, ConfigError> {
    let config_path = get_config_path()?;
    build_config(
        config::File::from(config_path).required(false),
        environment(),
    )
}

/// Falls back to the demo items only when there is no config file at all;
/// a broken file is an error. Environment overrides apply either way.
pub fn load_or_default() -> Result<Config, ConfigError> {
    if let Ok(path) = get_config_path()
        && !path.exists()
    {
        return build_config(config::Config::try_from(&Config::demo())?, environment());
    }
    load_config()
}

pub fn write_default_config() -> std::io::Result<std::path::PathBuf> {
    let path =
        get_config_path().map_err(|e| std::io::Error::new(std::io::ErrorKind::NotFound, e))?;
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(&path, DEFAULT_CONFIG)?;
    }
    Ok(path)
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

use async_channel::Sender;

pub async fn run_async_watcher(tx: Sender<AppEvent>) {
    let config_path = match get_config_path() {
        Ok(p) => p,
        Err(e) => {
            log::error!("Config watcher error: {}", e);
            return;
        }
    };
    let config_dir = match config_path.parent() {
        Some(p) => p.to_path_buf(),
        None => return,
    };

    if let Err(e) = fs_err::create_dir_all(&config_dir) {
        log::error!("Failed to create config directory for watching: {}", e);
        return;
    }

    let (bridge_tx, bridge_rx) = async_channel::unbounded();

    let mut watcher = match RecommendedWatcher::new(
        move |res| {
            let _ = bridge_tx.send_blocking(res);
        },
        notify::Config::default(),
    ) {
        Ok(w) => w,
        Err(e) => {
            log::error!("Failed to create watcher: {}", ConfigError::from(e));
            return;
        }
    };

    if let Err(e) = watcher.watch(&config_dir, RecursiveMode::NonRecursive) {
        log::error!("Failed to watch config directory: {}", e);
        return;
    }

    while let Ok(res) = bridge_rx.recv().await {
        match res {
            Ok(event) => {
                let meaningful_event = matches!(
                    event.kind,
                    EventKind::Modify(_) | EventKind::Create(_) | EventKind::Remove(_)
                );

                if meaningful_event
                    && event.paths.iter().any(|p| p == &config_path)
                    && tx.send(AppEvent::ConfigReload).await.is_err()
                {
                    break;
                }
            }
            Err(e) => log::error!("Watch error: {}", e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_deserialization() {
        let json = r#"{
            "items": [
                { "label": "Mail", "icon": "mail-unread" },
                { "label": "Notes" }
            ],
            "layout": { "radius": 180.0 },
            "motion": { "easing": "easeOutCubic" }
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert_eq!(config.items.len(), 2);
        assert_eq!(config.items[0].label, ItemLabel::new("Mail"));
        assert_eq!(config.items[0].icon, Some(IconName::new("mail-unread")));
        assert_eq!(config.items[1].icon, None);
        assert_eq!(config.layout.radius, Some(180.0));
        assert_eq!(config.layout.viewport_fraction, 0.25);
        assert_eq!(config.motion.easing, Easing::EaseOutCubic);
        assert_eq!(config.motion.resize_debounce_ms, 100);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_unknown_easing_is_rejected() {
        let json = r#"{ "items": [{ "label": "A" }], "motion": { "easing": "springy" } }"#;
        assert!(serde_json::from_str::<Config>(json).is_err());
    }

    #[test]
    fn test_validation() {
        assert_eq!(Config::default().validate(), Err(OrbitError::EmptyLayout));

        let mut config = Config::demo();
        assert!(config.validate().is_ok());

        config.layout.radius = Some(0.0);
        assert_eq!(config.validate(), Err(OrbitError::InvalidRadius(0.0)));

        config.layout.radius = None;
        config.motion.duration = -0.5;
        assert_eq!(config.validate(), Err(OrbitError::InvalidDuration(-0.5)));
    }

    struct CountingSink(usize);

    impl orbit::RenderSink for CountingSink {
        type Element = usize;

        fn place(&mut self, _: &usize, _: &orbit::Placement) {
            self.0 += 1;
        }

        fn set_stacking_order(&mut self, _: &usize, _: i32) {}
    }

    struct NoFrames;

    impl orbit::FrameScheduler for NoFrames {
        fn request_frame(&mut self) -> orbit::FrameToken {
            orbit::FrameToken::new(0)
        }

        fn cancel_frame(&mut self, _: orbit::FrameToken) {}
    }

    #[test]
    fn test_demo_items_always_lay_out() {
        // The app falls back to these when its own settings are rejected,
        // before the window has a width.
        let demo = Config::demo();
        let carousel = orbit::Carousel::new(
            0..demo.items.len(),
            demo.layout.radius(|| 0.0),
            demo.motion.motion().unwrap(),
            CountingSink(0),
            NoFrames,
        )
        .unwrap();
        assert_eq!(carousel.renderer().0, demo.items.len());
        assert_eq!(carousel.radius(), orbit::layout::FALLBACK_RADIUS);
    }

    #[test]
    fn test_viewport_fraction_validation() {
        let mut config = Config::demo();
        config.layout.viewport_fraction = 0.0;
        assert_eq!(config.validate(), Err(OrbitError::InvalidRadius(0.0)));

        config.layout.viewport_fraction = f64::NAN;
        assert!(matches!(config.validate(), Err(OrbitError::InvalidRadius(f)) if f.is_nan()));

        // A fixed radius makes the fraction irrelevant.
        config.layout.radius = Some(120.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_overrides_apply_to_demo_base() {
        let vars: config::Map<String, String> = [
            ("CAROUSEL__MOTION__DURATION", "0.5"),
            ("CAROUSEL__LAYOUT__VIEWPORT_FRACTION", "0.4"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        let base = config::Config::try_from(&Config::demo()).unwrap();
        let config = build_config(base, environment().source(Some(vars))).unwrap();

        assert_eq!(config.items.len(), Config::demo().items.len());
        assert_eq!(config.motion.duration, 0.5);
        assert_eq!(config.layout.viewport_fraction, 0.4);
        assert_eq!(config.motion.easing, Easing::EaseInOutQuad);
    }

    #[test]
    fn test_env_override_is_validated() {
        let vars: config::Map<String, String> =
            [("CAROUSEL__MOTION__DURATION".to_string(), "-1".to_string())]
                .into_iter()
                .collect();

        let base = config::Config::try_from(&Config::demo()).unwrap();
        let result = build_config(base, environment().source(Some(vars)));
        assert!(matches!(
            result,
            Err(ConfigError::Invalid(OrbitError::InvalidDuration(_)))
        ));
    }

    #[test]
    fn test_viewport_radius() {
        let layout = LayoutConfig::default();
        match layout.radius(|| 1200.0) {
            Radius::Viewport(source) => assert_eq!(source(), 300.0),
            other => panic!("expected a viewport radius, got {other:?}"),
        }

        let fixed = LayoutConfig {
            radius: Some(90.0),
            ..LayoutConfig::default()
        };
        assert!(matches!(fixed.radius(|| 1200.0), Radius::Fixed(r) if r == 90.0));
    }

    #[test]
    fn test_default_config_parses() {
        let config: Config = config::Config::builder()
            .add_source(config::File::from_str(
                DEFAULT_CONFIG,
                config::FileFormat::Toml,
            ))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();
        assert!(config.validate().is_ok());
        assert_eq!(config.motion.easing, Easing::EaseInOutQuad);
    }
}
