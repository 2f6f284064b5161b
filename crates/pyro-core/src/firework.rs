//! Firework shape selector

use serde::{Deserialize, Serialize};
use std::fmt;

/// Selects which kinematics profile drives an emitter's particles
#[derive(Clone, Copy, Debug, Default, Hash, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FireworkType {
    #[default]
    Default,
    Boom,
    Flower,
    Megaphone,
    Windy,
    Vase,
    Ring,
    Willow,
    Peony,
    Chrysanthemum,
    Palm,
    Crosette,
    Comet,
}

impl FireworkType {
    pub const ALL: [FireworkType; 13] = [
        FireworkType::Default,
        FireworkType::Boom,
        FireworkType::Flower,
        FireworkType::Megaphone,
        FireworkType::Windy,
        FireworkType::Vase,
        FireworkType::Ring,
        FireworkType::Willow,
        FireworkType::Peony,
        FireworkType::Chrysanthemum,
        FireworkType::Palm,
        FireworkType::Crosette,
        FireworkType::Comet,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            FireworkType::Default => "default",
            FireworkType::Boom => "boom",
            FireworkType::Flower => "flower",
            FireworkType::Megaphone => "megaphone",
            FireworkType::Windy => "windy",
            FireworkType::Vase => "vase",
            FireworkType::Ring => "ring",
            FireworkType::Willow => "willow",
            FireworkType::Peony => "peony",
            FireworkType::Chrysanthemum => "chrysanthemum",
            FireworkType::Palm => "palm",
            FireworkType::Crosette => "crosette",
            FireworkType::Comet => "comet",
        }
    }

    /// Look up a type by its lowercase name. `sideways` is an alias for megaphone.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        if name == "sideways" {
            return Some(FireworkType::Megaphone);
        }
        Self::ALL.iter().copied().find(|t| t.name() == name)
    }

    /// Unknown names degrade to the default profile instead of failing a show.
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            log::warn!("unknown firework type '{name}', using default profile");
            FireworkType::Default
        })
    }

    /// Index into per-type tables; matches the order of [`FireworkType::ALL`]
    pub fn index(&self) -> usize {
        *self as usize
    }
}

impl fmt::Display for FireworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for t in FireworkType::ALL {
            assert_eq!(FireworkType::from_name(t.name()), Some(t));
        }
    }

    #[test]
    fn index_matches_table_order() {
        for (i, t) in FireworkType::ALL.iter().enumerate() {
            assert_eq!(t.index(), i);
        }
    }

    #[test]
    fn unknown_falls_back_to_default() {
        assert_eq!(FireworkType::from_name("sparkler"), None);
        assert_eq!(
            FireworkType::from_name_or_default("sparkler"),
            FireworkType::Default
        );
    }

    #[test]
    fn sideways_alias() {
        assert_eq!(
            FireworkType::from_name("Sideways"),
            Some(FireworkType::Megaphone)
        );
    }
}
