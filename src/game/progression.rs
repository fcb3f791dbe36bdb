//! # Progression Module
//!
//! Level-up, evolution and upgrade-point bookkeeping driven by combat
//! victories. All mutation goes through the player [`Actor`]; this
//! module only owns the counters.

use crate::{config, Actor, GameEvent, PlayerSpecies};
use serde::{Deserialize, Serialize};

/// What an upgrade point can be spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UpgradeKind {
    Attack,
    Defense,
    Health,
}

/// Victory/experience/upgrade-point counters for the player.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progression {
    pub experience: i32,
    pub victories: i32,
    pub upgrade_points: i32,
}

impl Progression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a combat victory: grants experience, levels the player
    /// up as thresholds are crossed, and hands out upgrade points every
    /// [`config::VICTORIES_FOR_UPGRADE`] wins. Returns the events the
    /// presentation layer should announce.
    pub fn record_victory(&mut self, player: &mut Actor) -> Vec<GameEvent> {
        let mut events = Vec::new();
        self.victories += 1;
        self.experience += config::EXP_PER_VICTORY;

        while self.experience >= player.level * 100 {
            self.level_up(player);
            events.push(GameEvent::LeveledUp {
                level: player.level,
            });
        }

        if self.victories % config::VICTORIES_FOR_UPGRADE == 0 {
            self.upgrade_points += config::UPGRADE_POINTS_PER_GRANT;
            events.push(GameEvent::Message {
                text: format!(
                    "Earned {} upgrade points",
                    config::UPGRADE_POINTS_PER_GRANT
                ),
            });
        }

        events
    }

    /// Applies one level: fixed per-level deltas and a full restore.
    fn level_up(&mut self, player: &mut Actor) {
        player.level += 1;
        player.stats.atk += config::ATK_PER_LEVEL;
        player.stats.def += config::DEF_PER_LEVEL;
        player.stats.hp += config::HP_PER_LEVEL;
        player.stats.mp += config::MP_PER_LEVEL;
        player.current_hp = player.stats.hp;
        player.current_mp = player.stats.mp;
    }

    /// Whether the player may evolve: at/above the level threshold and
    /// not already evolved.
    pub fn can_evolve(&self, player: &Actor) -> bool {
        player.level >= config::EVOLUTION_LEVEL && !player.evolved
    }

    /// Evolves the player: swaps in the evolved stat block, appends the
    /// species' evolution skill, and restores current values to the new
    /// maxima. No-op when not eligible.
    pub fn evolve(&self, player: &mut Actor, species: PlayerSpecies) -> Option<GameEvent> {
        if !self.can_evolve(player) {
            return None;
        }
        player.evolved = true;
        player.stats = species.evolved_stats();
        player.name = species.evolved_name().to_string();
        player.skills.push(species.evolution_skill());
        player.current_hp = player.stats.hp;
        player.current_mp = player.stats.mp;
        Some(GameEvent::Evolved {
            name: player.name.clone(),
        })
    }

    /// Spends one upgrade point. Attack and defense convert 1:1, health
    /// at [`config::HP_PER_UPGRADE_POINT`] per point. Returns false if
    /// no points are banked.
    pub fn spend_point(&mut self, player: &mut Actor, kind: UpgradeKind) -> bool {
        if self.upgrade_points <= 0 {
            return false;
        }
        self.upgrade_points -= 1;
        match kind {
            UpgradeKind::Attack => player.stats.atk += 1,
            UpgradeKind::Defense => player.stats.def += 1,
            UpgradeKind::Health => {
                player.stats.hp += config::HP_PER_UPGRADE_POINT;
                player.current_hp += config::HP_PER_UPGRADE_POINT;
            }
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fresh_player() -> Actor {
        Actor::new_player(PlayerSpecies::Aquille)
    }

    #[test]
    fn test_level_up_on_second_victory() {
        let mut progression = Progression::new();
        let mut player = fresh_player();
        let base_atk = player.stats.atk;

        // 50 exp: not enough for level 2 (needs 100)
        let events = progression.record_victory(&mut player);
        assert_eq!(player.level, 1);
        assert!(!events
            .iter()
            .any(|event| matches!(event, GameEvent::LeveledUp { .. })));

        // 100 exp: level 2, stats bumped, fully restored
        player.current_hp = 10;
        let events = progression.record_victory(&mut player);
        assert_eq!(player.level, 2);
        assert_eq!(player.stats.atk, base_atk + config::ATK_PER_LEVEL);
        assert_eq!(player.current_hp, player.stats.hp);
        assert!(events
            .iter()
            .any(|event| matches!(event, GameEvent::LeveledUp { level: 2 })));
    }

    #[test]
    fn test_upgrade_points_every_second_victory() {
        let mut progression = Progression::new();
        let mut player = fresh_player();

        progression.record_victory(&mut player);
        assert_eq!(progression.upgrade_points, 0);
        progression.record_victory(&mut player);
        assert_eq!(progression.upgrade_points, config::UPGRADE_POINTS_PER_GRANT);
        progression.record_victory(&mut player);
        progression.record_victory(&mut player);
        assert_eq!(
            progression.upgrade_points,
            2 * config::UPGRADE_POINTS_PER_GRANT
        );
    }

    #[test]
    fn test_spend_points() {
        let mut progression = Progression {
            upgrade_points: 2,
            ..Progression::new()
        };
        let mut player = fresh_player();
        let base = player.stats;

        assert!(progression.spend_point(&mut player, UpgradeKind::Attack));
        assert_eq!(player.stats.atk, base.atk + 1);

        assert!(progression.spend_point(&mut player, UpgradeKind::Health));
        assert_eq!(player.stats.hp, base.hp + config::HP_PER_UPGRADE_POINT);

        assert!(!progression.spend_point(&mut player, UpgradeKind::Defense));
        assert_eq!(player.stats.def, base.def);
    }

    #[test]
    fn test_evolution_gate_and_one_shot() {
        let progression = Progression::new();
        let mut player = fresh_player();
        let species = PlayerSpecies::Aquille;

        // Below the threshold: not eligible
        assert!(!progression.can_evolve(&player));
        assert!(progression.evolve(&mut player, species).is_none());

        player.level = config::EVOLUTION_LEVEL;
        assert!(progression.can_evolve(&player));
        let event = progression.evolve(&mut player, species);
        assert!(matches!(event, Some(GameEvent::Evolved { .. })));
        assert_eq!(player.stats, species.evolved_stats());
        assert_eq!(player.skills.len(), 7);

        // Only once
        assert!(!progression.can_evolve(&player));
        assert!(progression.evolve(&mut player, species).is_none());
        assert_eq!(player.skills.len(), 7);
    }
}
