//! Environment snapshot handed to the renderer
//!
//! Fog and light follow the time of day through a [`DaylightTable`]. The
//! table only needs entries at the hours where something changes; any other
//! hour uses the closest entry at or before it.

use crate::foundation::math::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Distance fog
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Fog {
    /// Fog colour (RGBA)
    pub color: [f32; 4],
    /// Distance where fog starts
    pub near: f32,
    /// Distance where fog is opaque
    pub far: f32,
}

impl Fog {
    /// Fog pulled closer or pushed away by a UI intensity in `[-1, 1]`
    ///
    /// `1` halves both distances, `-1` makes them half again as far, `0`
    /// leaves the fog unchanged. Values outside the range are clamped.
    pub fn with_intensity(&self, intensity: f32) -> Self {
        let factor = 1.0 - 0.5 * intensity.clamp(-1.0, 1.0);
        Self {
            color: self.color,
            near: self.near * factor,
            far: self.far * factor,
        }
    }
}

/// Directional light
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Light {
    /// Unit direction the light travels in
    pub direction: Vec3,
    /// Intensity multiplier
    pub intensity: f32,
}

/// Fog and lights for one frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Environment {
    /// Fog
    pub fog: Fog,
    /// Lights
    pub lights: Vec<Light>,
}

impl Default for Environment {
    fn default() -> Self {
        Self {
            fog: Fog { color: [0.8, 0.9, 1.0, 1.0], near: 20.0, far: 80.0 },
            lights: vec![Light { direction: Vec3::new(0.0, -1.0, 0.0), intensity: 1.0 }],
        }
    }
}

impl Environment {
    /// Environment for a daylight entry
    ///
    /// `sun_direction` is normalized; a zero vector points straight down.
    pub fn from_daylight(entry: &DaylightEntry, sun_direction: Vec3, fog_intensity: f32) -> Self {
        let direction = sun_direction
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(|| Vec3::new(0.0, -1.0, 0.0));
        let fog = Fog {
            color: entry.fog_color,
            near: entry.fog_near,
            far: entry.fog_far,
        };
        Self {
            fog: fog.with_intensity(fog_intensity),
            lights: vec![Light { direction, intensity: entry.light_intensity }],
        }
    }
}

/// Fog and light at one hour of the day
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DaylightEntry {
    /// Hour this entry starts at
    pub hour: u32,
    /// Fog colour (RGBA)
    pub fog_color: [f32; 4],
    /// Fog start distance
    pub fog_near: f32,
    /// Fog end distance
    pub fog_far: f32,
    /// Sun intensity
    pub light_intensity: f32,
}

/// Hour-keyed daylight lookup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "Vec<DaylightEntry>", into = "Vec<DaylightEntry>")]
pub struct DaylightTable {
    entries: BTreeMap<u32, DaylightEntry>,
}

impl From<Vec<DaylightEntry>> for DaylightTable {
    fn from(entries: Vec<DaylightEntry>) -> Self {
        Self {
            entries: entries.into_iter().map(|entry| (entry.hour, entry)).collect(),
        }
    }
}

impl From<DaylightTable> for Vec<DaylightEntry> {
    fn from(table: DaylightTable) -> Self {
        table.entries.into_values().collect()
    }
}

impl Default for DaylightTable {
    fn default() -> Self {
        vec![
            DaylightEntry { hour: 0, fog_color: [0.05, 0.05, 0.15, 1.0], fog_near: 5.0, fog_far: 30.0, light_intensity: 0.15 },
            DaylightEntry { hour: 6, fog_color: [0.9, 0.6, 0.5, 1.0], fog_near: 10.0, fog_far: 50.0, light_intensity: 0.6 },
            DaylightEntry { hour: 12, fog_color: [0.8, 0.9, 1.0, 1.0], fog_near: 20.0, fog_far: 80.0, light_intensity: 1.0 },
            DaylightEntry { hour: 18, fog_color: [0.7, 0.4, 0.4, 1.0], fog_near: 10.0, fog_far: 50.0, light_intensity: 0.5 },
        ]
        .into()
    }
}

impl DaylightTable {
    /// Entry in effect at `hour`
    ///
    /// Takes the greatest hour at or before `hour`. Before the first entry of
    /// the day, the last entry of the previous day is still in effect.
    /// `None` only for an empty table.
    pub fn lookup(&self, hour: u32) -> Option<&DaylightEntry> {
        self.entries
            .range(..=hour)
            .next_back()
            .or_else(|| self.entries.iter().next_back())
            .map(|(_, entry)| entry)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries in hour order
    pub fn entries(&self) -> impl Iterator<Item = &DaylightEntry> {
        self.entries.values()
    }
}
