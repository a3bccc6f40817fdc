use crate::error::OrbitError;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::str::FromStr;
use strum::{Display as StrumDisplay, EnumIter, EnumString};

/// Polynomial easing curves over normalized progress.
///
/// Names follow the usual camelCase spelling (`easeInOutQuad`); the
/// snake_case form is accepted as well so TOML files can use either.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    SerializeDisplay,
    DeserializeFromStr,
    EnumString,
    EnumIter,
    StrumDisplay,
)]
pub enum Easing {
    #[strum(to_string = "linear")]
    Linear,
    #[strum(to_string = "easeInQuad", serialize = "ease_in_quad")]
    EaseInQuad,
    #[strum(to_string = "easeOutQuad", serialize = "ease_out_quad")]
    EaseOutQuad,
    #[default]
    #[strum(to_string = "easeInOutQuad", serialize = "ease_in_out_quad")]
    EaseInOutQuad,
    #[strum(to_string = "easeInCubic", serialize = "ease_in_cubic")]
    EaseInCubic,
    #[strum(to_string = "easeOutCubic", serialize = "ease_out_cubic")]
    EaseOutCubic,
    #[strum(to_string = "easeInOutCubic", serialize = "ease_in_out_cubic")]
    EaseInOutCubic,
    #[strum(to_string = "easeInQuart", serialize = "ease_in_quart")]
    EaseInQuart,
    #[strum(to_string = "easeOutQuart", serialize = "ease_out_quart")]
    EaseOutQuart,
    #[strum(to_string = "easeInOutQuart", serialize = "ease_in_out_quart")]
    EaseInOutQuart,
    #[strum(to_string = "easeInQuint", serialize = "ease_in_quint")]
    EaseInQuint,
    #[strum(to_string = "easeOutQuint", serialize = "ease_out_quint")]
    EaseOutQuint,
    #[strum(to_string = "easeInOutQuint", serialize = "ease_in_out_quint")]
    EaseInOutQuint,
}

impl Easing {
    /// Looks up a curve by name. Unknown names are an error, never linear.
    pub fn from_name(name: &str) -> Result<Self, OrbitError> {
        Self::from_str(name).map_err(|_| OrbitError::UnknownEasing(name.to_string()))
    }

    pub fn apply(self, t: f64) -> f64 {
        // `u` is the progress shifted to [-1, 0] for the "out" halves.
        let u = t - 1.0;
        match self {
            Self::Linear => t,
            Self::EaseInQuad => t * t,
            Self::EaseOutQuad => t * (2.0 - t),
            Self::EaseInOutQuad => {
                if t < 0.5 {
                    2.0 * t * t
                } else {
                    -1.0 + (4.0 - 2.0 * t) * t
                }
            }
            Self::EaseInCubic => t * t * t,
            Self::EaseOutCubic => u * u * u + 1.0,
            Self::EaseInOutCubic => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    u * (2.0 * t - 2.0) * (2.0 * t - 2.0) + 1.0
                }
            }
            Self::EaseInQuart => t * t * t * t,
            Self::EaseOutQuart => 1.0 - u * u * u * u,
            Self::EaseInOutQuart => {
                if t < 0.5 {
                    8.0 * t * t * t * t
                } else {
                    1.0 - 8.0 * u * u * u * u
                }
            }
            Self::EaseInQuint => t * t * t * t * t,
            Self::EaseOutQuint => 1.0 + u * u * u * u * u,
            Self::EaseInOutQuint => {
                if t < 0.5 {
                    16.0 * t * t * t * t * t
                } else {
                    1.0 + 16.0 * u * u * u * u * u
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_endpoints() {
        for easing in Easing::iter() {
            assert!(easing.apply(0.0).abs() < EPS, "{easing} at 0");
            assert!((easing.apply(1.0) - 1.0).abs() < EPS, "{easing} at 1");
        }
    }

    #[test]
    fn test_midpoints() {
        assert_eq!(Easing::Linear.apply(0.25), 0.25);
        assert_eq!(Easing::EaseInOutQuad.apply(0.5), 0.5);
        assert_eq!(Easing::EaseInQuad.apply(0.5), 0.25);
        assert_eq!(Easing::EaseOutQuad.apply(0.5), 0.75);
        assert_eq!(Easing::EaseOutCubic.apply(0.5), 0.875);
        assert_eq!(Easing::EaseInOutCubic.apply(0.25), 0.0625);
    }

    #[test]
    fn test_in_out_curves_are_monotonic() {
        for easing in Easing::iter() {
            let mut prev = easing.apply(0.0);
            for i in 1..=100 {
                let v = easing.apply(i as f64 / 100.0);
                assert!(v + EPS >= prev, "{easing} decreases at step {i}");
                prev = v;
            }
        }
    }

    #[test]
    fn test_names() {
        assert_eq!(Easing::from_name("linear"), Ok(Easing::Linear));
        assert_eq!(Easing::from_name("easeInOutQuad"), Ok(Easing::EaseInOutQuad));
        assert_eq!(
            Easing::from_name("ease_out_quint"),
            Ok(Easing::EaseOutQuint)
        );
        assert_eq!(Easing::EaseInOutCubic.to_string(), "easeInOutCubic");
    }

    #[test]
    fn test_unknown_name_fails() {
        assert_eq!(
            Easing::from_name("bounce"),
            Err(OrbitError::UnknownEasing("bounce".to_string()))
        );
    }

    #[test]
    fn test_easing_deserialization() {
        let cases = vec![
            ("\"easeInQuart\"", Easing::EaseInQuart),
            ("\"ease_in_quart\"", Easing::EaseInQuart),
            ("\"linear\"", Easing::Linear),
        ];

        for (json, expected) in cases {
            let deserialized: Easing = serde_json::from_str(json).unwrap();
            assert_eq!(deserialized, expected);
        }

        assert!(serde_json::from_str::<Easing>("\"wobble\"").is_err());
    }
}
