//! # Skill Module
//!
//! Skill definitions and the catalog of concrete skills. A skill is an
//! immutable [`SkillData`] block plus one mutable cooldown counter; the
//! usability gate is `current_mp >= cost && cooldown == 0`.

use serde::{Deserialize, Serialize};

/// Identity tags for every concrete skill in the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkillKind {
    // Player attack skills
    NovaStrike,
    SurgeBall,
    CrashDive,

    // Player defense skills
    Bulwark,
    Afterimage,
    ChargeUp,

    // Evolution-exclusive skills
    Starfall,
    Tidebreak,
    VerdantMend,

    // Enemy skills
    Tackle,
    Emberflare,
    ThornLash,
    Crush,
}

/// Immutable definition of a skill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillData {
    pub kind: SkillKind,
    pub mp_cost: i32,
    pub cooldown: i32,
    pub damage_multiplier: f32,
    pub heal_multiplier: f32,
    pub offensive: bool,
    pub defensive: bool,
    pub special: bool,
}

/// A skill instance: definition plus its current cooldown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skill {
    pub name: String,
    pub data: SkillData,
    pub current_cooldown: i32,
}

impl Skill {
    fn new(name: &str, data: SkillData) -> Self {
        Self {
            name: name.to_string(),
            data,
            current_cooldown: 0,
        }
    }

    /// Usable iff enough MP and the cooldown has fully elapsed.
    pub fn can_use(&self, current_mp: i32) -> bool {
        current_mp >= self.data.mp_cost && self.current_cooldown == 0
    }

    /// Marks the skill used, starting its cooldown.
    pub fn use_skill(&mut self) {
        self.current_cooldown = self.data.cooldown;
    }

    /// Ticks the cooldown down by one turn.
    pub fn update_cooldown(&mut self) {
        if self.current_cooldown > 0 {
            self.current_cooldown -= 1;
        }
    }

    /// Clears the cooldown entirely.
    pub fn reset_cooldown(&mut self) {
        self.current_cooldown = 0;
    }

    /// Raw skill damage before type effectiveness.
    pub fn calculate_damage(&self, attacker_atk: i32) -> i32 {
        (attacker_atk as f32 * self.data.damage_multiplier) as i32
    }

    /// Self-healing amount.
    pub fn calculate_healing(&self, attacker_atk: i32) -> i32 {
        (attacker_atk as f32 * self.data.heal_multiplier) as i32
    }

    // Player attack skills.

    /// Heavy nuke with a chance to stun the target for a turn.
    pub fn nova_strike() -> Skill {
        Skill::new(
            "Nova Strike",
            SkillData {
                kind: SkillKind::NovaStrike,
                mp_cost: 8,
                cooldown: 1,
                damage_multiplier: 1.8,
                heal_multiplier: 0.0,
                offensive: true,
                defensive: false,
                special: true,
            },
        )
    }

    /// Scaling hit: grows with the target's missing HP.
    pub fn surge_ball() -> Skill {
        Skill::new(
            "Surge Ball",
            SkillData {
                kind: SkillKind::SurgeBall,
                mp_cost: 6,
                cooldown: 1,
                damage_multiplier: 1.0,
                heal_multiplier: 0.0,
                offensive: true,
                defensive: false,
                special: true,
            },
        )
    }

    /// Heaviest hit, with self-recoil.
    pub fn crash_dive() -> Skill {
        Skill::new(
            "Crash Dive",
            SkillData {
                kind: SkillKind::CrashDive,
                mp_cost: 10,
                cooldown: 2,
                damage_multiplier: 2.2,
                heal_multiplier: 0.0,
                offensive: true,
                defensive: false,
                special: true,
            },
        )
    }

    // Player defense skills.

    /// Halves the incoming hit.
    pub fn bulwark() -> Skill {
        Skill::new(
            "Bulwark",
            SkillData {
                kind: SkillKind::Bulwark,
                mp_cost: 4,
                cooldown: 1,
                damage_multiplier: 0.0,
                heal_multiplier: 0.0,
                offensive: false,
                defensive: true,
                special: false,
            },
        )
    }

    /// Full dodge: the incoming hit is avoided entirely.
    pub fn afterimage() -> Skill {
        Skill::new(
            "Afterimage",
            SkillData {
                kind: SkillKind::Afterimage,
                mp_cost: 6,
                cooldown: 2,
                damage_multiplier: 0.0,
                heal_multiplier: 0.0,
                offensive: false,
                defensive: true,
                special: false,
            },
        )
    }

    /// Partial reduction plus an attack buff on the following turn.
    pub fn charge_up() -> Skill {
        Skill::new(
            "Charge Up",
            SkillData {
                kind: SkillKind::ChargeUp,
                mp_cost: 5,
                cooldown: 2,
                damage_multiplier: 0.0,
                heal_multiplier: 0.0,
                offensive: false,
                defensive: true,
                special: true,
            },
        )
    }

    // Evolution-exclusive skills.

    /// Fire evolution finisher.
    pub fn starfall() -> Skill {
        Skill::new(
            "Starfall",
            SkillData {
                kind: SkillKind::Starfall,
                mp_cost: 12,
                cooldown: 2,
                damage_multiplier: 2.5,
                heal_multiplier: 0.0,
                offensive: true,
                defensive: false,
                special: false,
            },
        )
    }

    /// Water evolution finisher.
    pub fn tidebreak() -> Skill {
        Skill::new(
            "Tidebreak",
            SkillData {
                kind: SkillKind::Tidebreak,
                mp_cost: 12,
                cooldown: 2,
                damage_multiplier: 2.5,
                heal_multiplier: 0.0,
                offensive: true,
                defensive: false,
                special: false,
            },
        )
    }

    /// Grass evolution: a strong self-heal.
    pub fn verdant_mend() -> Skill {
        Skill::new(
            "Verdant Mend",
            SkillData {
                kind: SkillKind::VerdantMend,
                mp_cost: 10,
                cooldown: 2,
                damage_multiplier: 0.0,
                heal_multiplier: 0.8,
                offensive: false,
                defensive: false,
                special: false,
            },
        )
    }

    // Enemy skills.

    /// Plain enemy hit.
    pub fn tackle() -> Skill {
        Skill::new(
            "Tackle",
            SkillData {
                kind: SkillKind::Tackle,
                mp_cost: 0,
                cooldown: 0,
                damage_multiplier: 1.0,
                heal_multiplier: 0.0,
                offensive: true,
                defensive: false,
                special: false,
            },
        )
    }

    /// Cinderling's fire special.
    pub fn emberflare() -> Skill {
        Skill::new(
            "Emberflare",
            SkillData {
                kind: SkillKind::Emberflare,
                mp_cost: 6,
                cooldown: 1,
                damage_multiplier: 1.4,
                heal_multiplier: 0.0,
                offensive: true,
                defensive: false,
                special: false,
            },
        )
    }

    /// Briarling's grass special.
    pub fn thorn_lash() -> Skill {
        Skill::new(
            "Thorn Lash",
            SkillData {
                kind: SkillKind::ThornLash,
                mp_cost: 6,
                cooldown: 1,
                damage_multiplier: 1.4,
                heal_multiplier: 0.0,
                offensive: true,
                defensive: false,
                special: false,
            },
        )
    }

    /// Boss special.
    pub fn crush() -> Skill {
        Skill::new(
            "Crush",
            SkillData {
                kind: SkillKind::Crush,
                mp_cost: 8,
                cooldown: 1,
                damage_multiplier: 1.6,
                heal_multiplier: 0.0,
                offensive: true,
                defensive: false,
                special: false,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_usability_gate() {
        let mut skill = Skill::nova_strike();
        assert!(skill.can_use(8));
        assert!(!skill.can_use(7));

        skill.use_skill();
        assert_eq!(skill.current_cooldown, 1);
        assert!(!skill.can_use(100));
    }

    #[test]
    fn test_cooldown_ticks_to_zero() {
        let mut skill = Skill::crash_dive();
        skill.use_skill();
        assert_eq!(skill.current_cooldown, 2);

        skill.update_cooldown();
        assert!(!skill.can_use(100));
        skill.update_cooldown();
        assert!(skill.can_use(100));

        // Further ticks stay at zero
        skill.update_cooldown();
        assert_eq!(skill.current_cooldown, 0);
    }

    #[test]
    fn test_reset_cooldown() {
        let mut skill = Skill::afterimage();
        skill.use_skill();
        skill.reset_cooldown();
        assert!(skill.can_use(6));
    }

    #[test]
    fn test_damage_and_healing_math() {
        let nova = Skill::nova_strike();
        assert_eq!(nova.calculate_damage(20), 36); // 20 * 1.8

        let mend = Skill::verdant_mend();
        assert_eq!(mend.calculate_healing(20), 16); // 20 * 0.8
        assert_eq!(mend.calculate_damage(20), 0);
    }
}
