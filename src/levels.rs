//! Levels shipped with the game
//!
//! Stored as level documents so they go through the same loader as files
//! written by the editor. The id doubles as the leaderboard key.

use crate::sim::{Level, LevelDoc};

/// An embedded level document
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BuiltinLevel {
    pub id: &'static str,
    pub json: &'static str,
}

impl BuiltinLevel {
    pub fn doc(&self) -> serde_json::Result<LevelDoc> {
        LevelDoc::from_json(self.json)
    }

    /// Parse into a level; a broken document is logged and skipped
    pub fn load(&self) -> Option<Level> {
        match self.doc() {
            Ok(doc) => Some(Level::load(&doc)),
            Err(err) => {
                log::warn!("Built-in level '{}' is malformed: {err}", self.id);
                None
            }
        }
    }
}

pub const BUILTIN_LEVELS: [BuiltinLevel; 6] = [
    BuiltinLevel {
        id: "old1",
        json: r#"{"name":"old1","player_start":[360,240],"obstacles":[[200,300,1000,30],[500,250,50,50],[800,230,50,70],[1100,210,50,90]],"win_blocks":[[1200,300,200,30]]}"#,
    },
    BuiltinLevel {
        id: "old2",
        json: r#"{"name":"old2","player_start":[360,240],"obstacles":[[200,300,300,30],[400,100,100,200],[50,0,100,300],[500,100,300,20],[500,100,300,20],[800,50,100,250]],"win_blocks":[[800,0,100,50,"win"]]}"#,
    },
    BuiltinLevel {
        id: "old3",
        json: r#"{"name":"old3","player_start":[360,240],"obstacles":[[200,300,300,30],[200,-300,30,600],[470,-300,30,600]],"win_blocks":[[200,-330,300,30]]}"#,
    },
    BuiltinLevel {
        id: "old4",
        json: r#"{"name":"old4","player_start":[360,240],"obstacles":[[200,300,500,30],[700,-100,30,430],[300,-100,200,200]],"win_blocks":[[300,-130,200,30]]}"#,
    },
    BuiltinLevel {
        id: "old5",
        json: r#"{"name":"old5","player_start":[360,240],"obstacles":[[200,300,1000,30],[500,-500,400,550],[1200,-300,30,630]],"win_blocks":[[-30,-30,60,60,"win"]]}"#,
    },
    BuiltinLevel {
        id: "old6",
        json: r#"{"name":"old6","player_start":[0,0],"obstacles":[[-50,100,300,30],[400,-200,100,500],[-50,120,100,400],[400,500,400,30],[1100,0,100,500]],"win_blocks":[[1000,0,60,60,"win"]]}"#,
    },
];

/// Every built-in level that parses, in menu order
pub fn builtin() -> Vec<Level> {
    BUILTIN_LEVELS.iter().filter_map(BuiltinLevel::load).collect()
}

pub fn by_id(id: &str) -> Option<Level> {
    BUILTIN_LEVELS.iter().find(|l| l.id == id)?.load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::ObstacleKind;

    #[test]
    fn test_all_levels_parse() {
        let levels = builtin();
        assert_eq!(levels.len(), BUILTIN_LEVELS.len());
        for (level, builtin) in levels.iter().zip(BUILTIN_LEVELS) {
            assert_eq!(level.name, builtin.id);
            assert!(!level.is_unnamed());
            assert!(level.iter().any(|o| o.kind == ObstacleKind::Goal));
        }
    }

    #[test]
    fn test_legacy_tags_are_ignored() {
        let level = by_id("old2").unwrap();
        let goal = level.iter().find(|o| o.kind == ObstacleKind::Goal).unwrap();
        assert_eq!(goal.rect.to_array(), [800.0, 0.0, 100.0, 50.0]);
        assert_eq!(level.len(), 7);
    }

    #[test]
    fn test_fall_boundary() {
        let level = by_id("old6").unwrap();
        // Lowest edge is the ledge at y=500..530
        assert_eq!(level.fall_boundary(), 580.0);
    }

    #[test]
    fn test_ids_are_unique_and_not_level_keys() {
        let ids: std::collections::HashSet<_> = BUILTIN_LEVELS.iter().map(|l| l.id).collect();
        assert_eq!(ids.len(), BUILTIN_LEVELS.len());
        // level1..level7 are leaderboard keys for different maps
        assert!((1..=7).all(|n| !ids.contains(format!("level{n}").as_str())));
    }

    #[test]
    fn test_unknown_id() {
        assert!(by_id("old99").is_none());
    }
}
