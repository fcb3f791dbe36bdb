//! # Actor Module
//!
//! Combat entities: the player-controlled character and the monster
//! variants it meets. Enemy behavior is dispatched over a tagged
//! [`EnemyVariant`] enum carrying variant-specific parameters, not over
//! trait objects, so every AI decision runs through one match with the
//! shared random source injected.

use crate::{config, GameRng, Skill, SkillKind};
use serde::{Deserialize, Serialize};

/// Elemental types forming a cyclic strength triangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ElementType {
    Fire,
    Water,
    Grass,
}

/// Effectiveness multiplier for an attack of `attacker` element against
/// a `defender` element.
///
/// Fire beats Grass, Water beats Fire, Grass beats Water at 1.5x; the
/// reverse pairs score 0.5x; everything else (same type included) is
/// neutral.
///
/// # Examples
///
/// ```
/// use dicebound::{type_effectiveness, ElementType};
///
/// assert_eq!(type_effectiveness(ElementType::Fire, ElementType::Grass), 1.5);
/// assert_eq!(type_effectiveness(ElementType::Grass, ElementType::Fire), 0.5);
/// assert_eq!(type_effectiveness(ElementType::Fire, ElementType::Fire), 1.0);
/// ```
pub fn type_effectiveness(attacker: ElementType, defender: ElementType) -> f32 {
    use ElementType::*;
    match (attacker, defender) {
        (Fire, Grass) | (Water, Fire) | (Grass, Water) => config::TYPE_SUPER_EFFECTIVE,
        (Grass, Fire) | (Fire, Water) | (Water, Grass) => config::TYPE_NOT_VERY_EFFECTIVE,
        _ => config::TYPE_NORMAL_EFFECTIVE,
    }
}

/// Base stat block. `hp`/`mp` here are maxima; the current values live
/// on the [`Actor`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stats {
    pub hp: i32,
    pub mp: i32,
    pub atk: i32,
    pub def: i32,
    pub crit: f32,
    pub evade: f32,
}

impl Stats {
    pub fn new(hp: i32, mp: i32, atk: i32, def: i32, crit: f32, evade: f32) -> Self {
        Self {
            hp,
            mp,
            atk,
            def,
            crit,
            evade,
        }
    }
}

/// The three player species, one per element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerSpecies {
    Cindram,
    Aquille,
    Verdano,
}

impl PlayerSpecies {
    /// The species for a chosen element.
    pub fn for_element(element: ElementType) -> Self {
        match element {
            ElementType::Fire => PlayerSpecies::Cindram,
            ElementType::Water => PlayerSpecies::Aquille,
            ElementType::Grass => PlayerSpecies::Verdano,
        }
    }

    pub fn element(self) -> ElementType {
        match self {
            PlayerSpecies::Cindram => ElementType::Fire,
            PlayerSpecies::Aquille => ElementType::Water,
            PlayerSpecies::Verdano => ElementType::Grass,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            PlayerSpecies::Cindram => "Cindram",
            PlayerSpecies::Aquille => "Aquille",
            PlayerSpecies::Verdano => "Verdano",
        }
    }

    /// Base stat block. Cindram trades defense for attack, Verdano the
    /// other way around, Aquille sits in the middle.
    pub fn base_stats(self) -> Stats {
        match self {
            PlayerSpecies::Cindram => Stats::new(
                config::BASE_PLAYER_HP - 5,
                config::BASE_PLAYER_MP - 5,
                config::BASE_PLAYER_ATK + 2,
                config::BASE_PLAYER_DEF - 2,
                config::BASE_PLAYER_CRIT,
                config::BASE_PLAYER_EVADE,
            ),
            PlayerSpecies::Aquille => Stats::new(
                config::BASE_PLAYER_HP,
                config::BASE_PLAYER_MP + 5,
                config::BASE_PLAYER_ATK,
                config::BASE_PLAYER_DEF,
                config::BASE_PLAYER_CRIT,
                config::BASE_PLAYER_EVADE,
            ),
            PlayerSpecies::Verdano => Stats::new(
                config::BASE_PLAYER_HP + 5,
                config::BASE_PLAYER_MP,
                config::BASE_PLAYER_ATK - 2,
                config::BASE_PLAYER_DEF + 2,
                config::BASE_PLAYER_CRIT,
                config::BASE_PLAYER_EVADE,
            ),
        }
    }

    /// Evolved stat block, swapped in wholesale on evolution.
    pub fn evolved_stats(self) -> Stats {
        match self {
            PlayerSpecies::Cindram => Stats::new(120, 60, 28, 12, 0.15, 0.07),
            PlayerSpecies::Aquille => Stats::new(130, 75, 26, 15, 0.12, 0.07),
            PlayerSpecies::Verdano => Stats::new(135, 70, 24, 18, 0.10, 0.07),
        }
    }

    pub fn evolved_name(self) -> &'static str {
        match self {
            PlayerSpecies::Cindram => "Cindramax",
            PlayerSpecies::Aquille => "Aquillon",
            PlayerSpecies::Verdano => "Verdanor",
        }
    }

    /// The skill unlocked by evolving.
    pub fn evolution_skill(self) -> Skill {
        match self {
            PlayerSpecies::Cindram => Skill::starfall(),
            PlayerSpecies::Aquille => Skill::tidebreak(),
            PlayerSpecies::Verdano => Skill::verdant_mend(),
        }
    }
}

/// Enemy behavior variants. Carries all variant-specific parameters;
/// dispatched through [`EnemyVariant::choose_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyVariant {
    Regular,
    Cinderling,
    Briarling,
    Boss,
}

/// What an enemy decided to do on its offense turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnemyAction {
    NormalAttack,
    UseSkill(usize),
}

impl EnemyVariant {
    pub fn name(self) -> &'static str {
        match self {
            EnemyVariant::Regular => "Wild Creature",
            EnemyVariant::Cinderling => "Cinderling",
            EnemyVariant::Briarling => "Briarling",
            EnemyVariant::Boss => "Warden",
        }
    }

    pub fn element(self) -> ElementType {
        match self {
            EnemyVariant::Regular => ElementType::Water,
            EnemyVariant::Cinderling => ElementType::Fire,
            EnemyVariant::Briarling => ElementType::Grass,
            EnemyVariant::Boss => ElementType::Fire,
        }
    }

    pub fn base_stats(self) -> Stats {
        match self {
            EnemyVariant::Regular => Stats::new(
                config::BASE_ENEMY_HP,
                config::BASE_ENEMY_MP,
                config::BASE_ENEMY_ATK,
                config::BASE_ENEMY_DEF,
                0.0,
                0.0,
            ),
            EnemyVariant::Cinderling => Stats::new(
                config::BASE_ENEMY_HP,
                config::BASE_ENEMY_MP,
                config::BASE_ENEMY_ATK,
                config::BASE_ENEMY_DEF,
                0.0,
                0.0,
            ),
            EnemyVariant::Briarling => Stats::new(
                config::BASE_ENEMY_HP + 5,
                config::BASE_ENEMY_MP - 5,
                config::BASE_ENEMY_ATK - 2,
                config::BASE_ENEMY_DEF + 2,
                0.0,
                0.0,
            ),
            EnemyVariant::Boss => Stats::new(
                config::BASE_BOSS_HP,
                config::BASE_BOSS_MP,
                config::BASE_BOSS_ATK,
                config::BASE_BOSS_DEF,
                0.0,
                0.0,
            ),
        }
    }

    pub fn skill_pool(self) -> Vec<Skill> {
        match self {
            EnemyVariant::Regular => vec![Skill::tackle()],
            EnemyVariant::Cinderling => vec![Skill::tackle(), Skill::emberflare()],
            EnemyVariant::Briarling => vec![Skill::tackle(), Skill::thorn_lash()],
            EnemyVariant::Boss => vec![Skill::tackle(), Skill::crush(), Skill::emberflare()],
        }
    }

    /// Flat factor applied to all damage this variant takes.
    pub fn damage_reduction(self) -> f32 {
        match self {
            EnemyVariant::Boss => config::BOSS_DAMAGE_REDUCTION,
            _ => 1.0,
        }
    }

    /// Picks this variant's offense for the turn.
    ///
    /// Species variants prefer their special skill 70% of the time;
    /// the boss goes for its strongest usable skill once the target
    /// drops below the aggression threshold. Index results point into
    /// the enemy actor's skill list.
    pub fn choose_action(
        self,
        enemy: &Actor,
        target: &Actor,
        rng: &mut GameRng,
    ) -> EnemyAction {
        match self {
            EnemyVariant::Regular => first_usable_skill(enemy)
                .map(EnemyAction::UseSkill)
                .unwrap_or(EnemyAction::NormalAttack),
            EnemyVariant::Cinderling | EnemyVariant::Briarling => {
                if rng.percent_check(config::SPECIES_SKILL_CHANCE) {
                    if let Some(index) = random_special_skill(enemy, rng) {
                        return EnemyAction::UseSkill(index);
                    }
                }
                EnemyAction::NormalAttack
            }
            EnemyVariant::Boss => {
                let target_fraction = target.current_hp as f32 / target.stats.hp.max(1) as f32;
                if target_fraction < config::BOSS_AGGRESSION_THRESHOLD {
                    if let Some(index) = strongest_usable_skill(enemy) {
                        return EnemyAction::UseSkill(index);
                    }
                }
                first_usable_skill(enemy)
                    .map(EnemyAction::UseSkill)
                    .unwrap_or(EnemyAction::NormalAttack)
            }
        }
    }
}

fn first_usable_skill(actor: &Actor) -> Option<usize> {
    actor
        .skills
        .iter()
        .position(|skill| skill.data.offensive && skill.can_use(actor.current_mp))
}

fn random_special_skill(actor: &Actor, rng: &mut GameRng) -> Option<usize> {
    let candidates: Vec<usize> = actor
        .skills
        .iter()
        .enumerate()
        .filter(|(_, skill)| {
            skill.data.kind != SkillKind::Tackle
                && skill.data.offensive
                && skill.can_use(actor.current_mp)
        })
        .map(|(index, _)| index)
        .collect();
    if candidates.is_empty() {
        None
    } else {
        Some(candidates[rng.pick_index(candidates.len())])
    }
}

fn strongest_usable_skill(actor: &Actor) -> Option<usize> {
    actor
        .skills
        .iter()
        .enumerate()
        .filter(|(_, skill)| {
            skill.data.offensive
                && skill.data.damage_multiplier > 1.0
                && skill.can_use(actor.current_mp)
        })
        .max_by(|(_, a), (_, b)| {
            a.data
                .damage_multiplier
                .partial_cmp(&b.data.damage_multiplier)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .map(|(index, _)| index)
}

/// A combat entity: the player character or one enemy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Actor {
    pub name: String,
    pub element: ElementType,
    pub level: i32,
    pub stats: Stats,
    pub current_hp: i32,
    pub current_mp: i32,
    pub skills: Vec<Skill>,
    pub evolved: bool,
}

impl Actor {
    /// Builds the player character for a chosen species, with the fixed
    /// three-attack/three-defense loadout.
    pub fn new_player(species: PlayerSpecies) -> Self {
        let stats = species.base_stats();
        Self {
            name: species.name().to_string(),
            element: species.element(),
            level: 1,
            stats,
            current_hp: stats.hp,
            current_mp: stats.mp,
            skills: vec![
                Skill::nova_strike(),
                Skill::surge_ball(),
                Skill::crash_dive(),
                Skill::bulwark(),
                Skill::afterimage(),
                Skill::charge_up(),
            ],
            evolved: false,
        }
    }

    /// Builds an enemy for a variant.
    pub fn new_enemy(variant: EnemyVariant) -> Self {
        let stats = variant.base_stats();
        Self {
            name: variant.name().to_string(),
            element: variant.element(),
            level: 1,
            stats,
            current_hp: stats.hp,
            current_mp: stats.mp,
            skills: variant.skill_pool(),
            evolved: false,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    /// Applies a signed HP change, clamped into `[0, max]`.
    pub fn modify_hp(&mut self, delta: i32) {
        self.current_hp = (self.current_hp + delta).clamp(0, self.stats.hp);
    }

    /// Applies a signed MP change, clamped into `[0, max]`.
    pub fn modify_mp(&mut self, delta: i32) {
        self.current_mp = (self.current_mp + delta).clamp(0, self.stats.mp);
    }

    /// Plain attack damage against a defender: `max(1, atk - def)`.
    pub fn normal_attack_damage(&self, defender: &Actor) -> i32 {
        (self.stats.atk - defender.stats.def).max(1)
    }

    /// Indices of the offensive skills, in loadout order. This is the
    /// attack menu shown after a correct offense coin.
    pub fn offensive_skill_indices(&self) -> Vec<usize> {
        self.skills
            .iter()
            .enumerate()
            .filter(|(_, skill)| skill.data.offensive || skill.data.heal_multiplier > 0.0)
            .map(|(index, _)| index)
            .collect()
    }

    /// Indices of the defensive skills, in loadout order. This is the
    /// defense menu shown after a correct defense coin.
    pub fn defensive_skill_indices(&self) -> Vec<usize> {
        self.skills
            .iter()
            .enumerate()
            .filter(|(_, skill)| skill.data.defensive)
            .map(|(index, _)| index)
            .collect()
    }

    /// Ticks every skill cooldown down by one turn.
    pub fn update_cooldowns(&mut self) {
        for skill in &mut self.skills {
            skill.update_cooldown();
        }
    }

    /// Clears every skill cooldown.
    pub fn reset_cooldowns(&mut self) {
        for skill in &mut self.skills {
            skill.reset_cooldown();
        }
    }
}
