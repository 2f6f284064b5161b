//! Show files: a list of fireworks plus optional kinematics overrides

use crate::emitter::{toml_f32, toml_integer, EmitterConfig};
use crate::kinematics::KinematicsSettings;
use pyro_core::{PyroError, Result};
use std::path::Path;

/// Upper bound on `count` for one `[[firework]]` entry
pub const MAX_REPLICAS: i64 = 1_000;

/// A parsed show.
///
/// ```toml
/// [settings]
/// gravity = 9.8
///
/// [[firework]]
/// type = "peony"
/// color = "#ff3300"
/// count = 3
/// stagger = 0.25
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ShowFile {
    pub settings: KinematicsSettings,
    /// One entry per launch, `count` replication already expanded
    pub fireworks: Vec<EmitterConfig>,
}

impl ShowFile {
    pub fn load(path: &Path) -> Result<Self> {
        let source = std::fs::read_to_string(path)?;
        Self::parse(&source)
    }

    pub fn parse(source: &str) -> Result<Self> {
        let root: toml::value::Table = toml::from_str(source)?;

        let mut settings = KinematicsSettings::default();
        if let Some(table) = root.get("settings") {
            let table = table
                .as_table()
                .ok_or_else(|| PyroError::ParseError("[settings] must be a table".into()))?;
            apply_settings(&mut settings, table);
        }
        settings.validate()?;

        let entries = match root.get("firework") {
            Some(v) => v.as_array().ok_or_else(|| {
                PyroError::ParseError("`firework` must be an array of tables".into())
            })?,
            None => {
                return Err(PyroError::InvalidConfig(
                    "show has no [[firework]] entries".into(),
                ))
            }
        };

        let mut fireworks = Vec::new();
        for (i, entry) in entries.iter().enumerate() {
            let table = entry
                .as_table()
                .ok_or_else(|| PyroError::ParseError(format!("firework #{i} is not a table")))?;
            let base = EmitterConfig::from_toml(table)?;

            let count = match table.get("count") {
                Some(v) => toml_integer(v).unwrap_or(0),
                None => 1,
            };
            if !(1..=MAX_REPLICAS).contains(&count) {
                return Err(PyroError::ValueOutOfRange {
                    field: format!("firework #{i} count"),
                    min: 1.0,
                    max: MAX_REPLICAS as f64,
                    value: count as f64,
                });
            }
            let stagger = table.get("stagger").map_or(0.0, |v| toml_f32(v, 0.0));

            for k in 0..count {
                let mut config = base.clone();
                config.delay += k as f32 * stagger;
                fireworks.push(config);
            }
        }

        log::debug!("parsed show: {} firework(s)", fireworks.len());
        Ok(Self {
            settings,
            fireworks,
        })
    }

    /// Entries that would be rejected at launch, with their index
    pub fn invalid_entries(&self) -> Vec<(usize, PyroError)> {
        self.fireworks
            .iter()
            .enumerate()
            .filter_map(|(i, config)| config.validate().err().map(|e| (i, e)))
            .collect()
    }

    /// Time from the first launch until the last firework expires
    pub fn running_time(&self) -> f32 {
        self.fireworks
            .iter()
            .map(|c| c.delay + c.duration)
            .fold(0.0, f32::max)
    }
}

fn apply_settings(settings: &mut KinematicsSettings, table: &toml::value::Table) {
    let fields: [(&str, &mut f32); 7] = [
        ("ascent_ratio", &mut settings.ascent_ratio),
        ("height_ceiling", &mut settings.height_ceiling),
        ("ascent_thrust", &mut settings.ascent_thrust),
        ("gravity", &mut settings.gravity),
        ("drag", &mut settings.drag),
        ("apex_speed", &mut settings.apex_speed),
        ("apex_decay", &mut settings.apex_decay),
    ];
    for (key, slot) in fields {
        if let Some(v) = table.get(key) {
            *slot = toml_f32(v, *slot);
        }
    }
    if let Some(arr) = table.get("ascent_lateral").and_then(|v| v.as_array()) {
        if arr.len() >= 2 {
            settings.ascent_lateral = [
                toml_f32(&arr[0], settings.ascent_lateral[0]),
                toml_f32(&arr[1], settings.ascent_lateral[1]),
            ];
        }
    }
    for key in table.keys() {
        if !KNOWN_SETTINGS.contains(&key.as_str()) {
            log::warn!("ignoring unknown setting '{key}'");
        }
    }
}

const KNOWN_SETTINGS: [&str; 8] = [
    "ascent_ratio",
    "height_ceiling",
    "ascent_thrust",
    "ascent_lateral",
    "gravity",
    "drag",
    "apex_speed",
    "apex_decay",
];

#[cfg(test)]
mod tests {
    use super::*;
    use pyro_core::FireworkType;

    #[test]
    fn parse_show_with_settings_and_replication() {
        let show = ShowFile::parse(
            r##"
[settings]
gravity = 12
drag = 0.95

[[firework]]
type = "peony"
color = "#ff3300"
duration = 3.0
delay = 0.5
count = 3
stagger = 0.25

[[firework]]
type = "comet"
color = 0x00ffcc
particle_count = 40
"##,
        )
        .unwrap();

        assert!((show.settings.gravity - 12.0).abs() < 1e-6);
        assert!((show.settings.drag - 0.95).abs() < 1e-6);
        assert_eq!(show.fireworks.len(), 4);
        let delays: Vec<f32> = show.fireworks[..3].iter().map(|c| c.delay).collect();
        assert_eq!(delays, vec![0.5, 0.75, 1.0]);
        assert_eq!(show.fireworks[3].firework_type, FireworkType::Comet);
        assert_eq!(show.fireworks[3].particle_count, 40);
        assert!((show.running_time() - 4.0).abs() < 1e-6);
        assert!(show.invalid_entries().is_empty());
    }

    #[test]
    fn invalid_entries_are_reported_not_fatal() {
        let show = ShowFile::parse(
            r#"
[[firework]]
duration = -1

[[firework]]
type = "ring"
"#,
        )
        .unwrap();
        let invalid = show.invalid_entries();
        assert_eq!(invalid.len(), 1);
        assert_eq!(invalid[0].0, 0);
    }

    #[test]
    fn missing_fireworks_is_an_error() {
        assert!(ShowFile::parse("[settings]\ngravity = 1").is_err());
    }

    #[test]
    fn bad_settings_are_rejected() {
        let err = ShowFile::parse("[settings]\ndrag = 3\n[[firework]]\n").unwrap_err();
        assert!(matches!(err, PyroError::ValueOutOfRange { .. }));
    }

    #[test]
    fn count_outside_bounds_is_rejected() {
        assert!(ShowFile::parse("[[firework]]\ncount = 0").is_err());

        let err = ShowFile::parse("[[firework]]\ncount = 4000000000").unwrap_err();
        assert!(matches!(err, PyroError::ValueOutOfRange { .. }));

        let show = ShowFile::parse("[[firework]]\ncount = 1000").unwrap();
        assert_eq!(show.fireworks.len(), MAX_REPLICAS as usize);
    }

    #[test]
    fn bundled_demo_show_parses() {
        let show = ShowFile::parse(include_str!("../../../demos/finale.toml")).unwrap();
        assert_eq!(show.fireworks.len(), 6);
        assert!(show.invalid_entries().is_empty());
        assert_eq!(show.fireworks[5].firework_type, FireworkType::Chrysanthemum);
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = ShowFile::parse("[[firework]\n").unwrap_err();
        assert!(matches!(err, PyroError::TomlParseError(_)));
    }
}
