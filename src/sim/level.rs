//! Level model: obstacles, spawn point and fall boundary
//!
//! Obstacles live in an arena indexed by their identity. Identities come from
//! a monotonic counter and are never reused, so removal leaves a hole and never
//! invalidates another handle.

use std::fmt;

use glam::DVec2;
use serde::de::{self, IgnoredAny, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::collision::Rect;
use crate::consts::FALL_MARGIN;

/// Name given to levels whose document has none; scores are never submitted for it
pub const UNNAMED_LEVEL: &str = "unnamed";

/// Stable obstacle identity within a level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObstacleId(pub u32);

impl fmt::Display for ObstacleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What touching an obstacle does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ObstacleKind {
    /// Bounceable at the base, run-ending at the head
    #[default]
    Hazard,
    /// Finishes the run at either contact point
    Goal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub id: ObstacleId,
    pub rect: Rect,
    pub kind: ObstacleKind,
}

/// One `[x, y, w, h]` entry of a level document
///
/// Legacy documents sometimes append a type tag after the four numbers; anything
/// past the fourth element is ignored.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectEntry(pub [f64; 4]);

impl Serialize for RectEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.0.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RectEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntryVisitor;

        impl<'de> Visitor<'de> for EntryVisitor {
            type Value = RectEntry;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of at least four numbers [x, y, w, h]")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<RectEntry, A::Error> {
                let mut v = [0.0; 4];
                for (i, slot) in v.iter_mut().enumerate() {
                    *slot = seq
                        .next_element()?
                        .ok_or_else(|| de::Error::invalid_length(i, &self))?;
                }
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(RectEntry(v))
            }
        }

        deserializer.deserialize_seq(EntryVisitor)
    }
}

/// Read an obstacle list, dropping entries that are not `[x, y, w, h]`
///
/// A bad entry, or a list that is not an array at all, is logged and skipped
/// so the rest of the document still loads.
fn lenient_entries<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<Vec<RectEntry>>, D::Error> {
    let Some(value) = Option::<serde_json::Value>::deserialize(deserializer)? else {
        return Ok(None);
    };
    let serde_json::Value::Array(items) = value else {
        log::warn!("Ignoring obstacle list that is not an array: {value}");
        return Ok(None);
    };

    let entries = items
        .into_iter()
        .enumerate()
        .filter_map(|(i, item)| match RectEntry::deserialize(&item) {
            Ok(entry) => Some(entry),
            Err(err) => {
                log::warn!("Skipping obstacle entry {i} ({item}): {err}");
                None
            }
        })
        .collect();
    Ok(Some(entries))
}

/// Persisted level document; every field is optional
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelDoc {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub player_start: Option<[f64; 2]>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_entries")]
    pub obstacles: Option<Vec<RectEntry>>,
    #[serde(skip_serializing_if = "Option::is_none", deserialize_with = "lenient_entries")]
    pub win_blocks: Option<Vec<RectEntry>>,
}

impl LevelDoc {
    /// Parse a document from JSON text
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// A playable level
#[derive(Debug, Clone, PartialEq)]
pub struct Level {
    pub name: String,
    player_start: DVec2,
    /// Arena indexed by `ObstacleId`; removed slots stay `None`
    slots: Vec<Option<Obstacle>>,
    fall_boundary: f64,
}

impl Default for Level {
    fn default() -> Self {
        Self::new(UNNAMED_LEVEL, DVec2::ZERO)
    }
}

impl Level {
    pub fn new(name: impl Into<String>, player_start: DVec2) -> Self {
        Self {
            name: name.into(),
            player_start,
            slots: Vec::new(),
            fall_boundary: player_start.y + FALL_MARGIN,
        }
    }

    /// Build a level from a document; never fails, absent fields default
    pub fn load(doc: &LevelDoc) -> Self {
        let name = doc.name.clone().unwrap_or_else(|| UNNAMED_LEVEL.to_string());
        let start = doc
            .player_start
            .map(|[x, y]| DVec2::new(x, y))
            .unwrap_or(DVec2::ZERO);

        let mut level = Self::new(name, start);
        let hazards = doc.obstacles.iter().flatten().map(|e| (e, ObstacleKind::Hazard));
        let goals = doc.win_blocks.iter().flatten().map(|e| (e, ObstacleKind::Goal));
        for (entry, kind) in hazards.chain(goals) {
            level.insert(Rect::from(entry.0), kind);
        }
        level.recompute_fall_boundary();

        log::debug!(
            "Loaded level '{}': {} obstacles, fall boundary {}",
            level.name,
            level.len(),
            level.fall_boundary
        );
        level
    }

    /// Inverse of `load`: obstacles are partitioned back by kind, ids are dropped
    pub fn to_doc(&self) -> LevelDoc {
        let mut obstacles = Vec::new();
        let mut win_blocks = Vec::new();
        for obstacle in self.iter() {
            let entry = RectEntry(obstacle.rect.to_array());
            match obstacle.kind {
                ObstacleKind::Hazard => obstacles.push(entry),
                ObstacleKind::Goal => win_blocks.push(entry),
            }
        }

        LevelDoc {
            name: (!self.is_unnamed()).then(|| self.name.clone()),
            player_start: Some([self.player_start.x, self.player_start.y]),
            obstacles: Some(obstacles),
            win_blocks: Some(win_blocks),
        }
    }

    /// True if this level carries the unnamed sentinel
    pub fn is_unnamed(&self) -> bool {
        self.name == UNNAMED_LEVEL
    }

    pub fn player_start(&self) -> DVec2 {
        self.player_start
    }

    pub fn set_player_start(&mut self, start: DVec2) {
        self.player_start = start;
        self.extend_fall_boundary(start.y);
    }

    pub fn fall_boundary(&self) -> f64 {
        self.fall_boundary
    }

    /// Insert an obstacle under the next identity
    pub fn insert(&mut self, rect: Rect, kind: ObstacleKind) -> ObstacleId {
        let id = ObstacleId(self.slots.len() as u32);
        self.extend_fall_boundary(rect.bottom());
        self.slots.push(Some(Obstacle { id, rect, kind }));
        id
    }

    /// Remove an obstacle; absent ids are ignored
    pub fn remove(&mut self, id: ObstacleId) -> Option<Obstacle> {
        self.slots.get_mut(id.0 as usize).and_then(Option::take)
    }

    pub fn get(&self, id: ObstacleId) -> Option<&Obstacle> {
        self.slots.get(id.0 as usize).and_then(Option::as_ref)
    }

    /// Translate an obstacle; absent ids are ignored
    pub fn move_obstacle(&mut self, id: ObstacleId, delta: DVec2) {
        let Some(obstacle) = self.slots.get_mut(id.0 as usize).and_then(Option::as_mut) else {
            return;
        };
        obstacle.rect = obstacle.rect.translated(delta);
        let bottom = obstacle.rect.bottom();
        self.extend_fall_boundary(bottom);
    }

    /// Live obstacles in identity order
    pub fn iter(&self) -> impl Iterator<Item = &Obstacle> {
        self.slots.iter().flatten()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Clone with the fall boundary recomputed from scratch, for handing to a run
    pub fn snapshot(&self) -> Self {
        let mut level = self.clone();
        level.recompute_fall_boundary();
        level
    }

    fn extend_fall_boundary(&mut self, y: f64) {
        self.fall_boundary = self.fall_boundary.max(y + FALL_MARGIN);
    }

    fn recompute_fall_boundary(&mut self) {
        let lowest = self
            .iter()
            .map(|o| o.rect.bottom())
            .fold(self.player_start.y, f64::max);
        self.fall_boundary = lowest + FALL_MARGIN;
    }
}
