//! # Game Session
//!
//! The single-threaded coordinator tying board, walker, combat and
//! progression together. Exactly one state machine is active at a
//! time: entering combat suspends the walker, and the walker's resume
//! contract runs when combat reports its outcome.
//!
//! The session is also the crate's presentation boundary: read-only
//! queries for display, discrete input events in, semantic
//! [`GameEvent`]s out, and the save snapshot projection.

use crate::{
    Actor, Board, BoardGenerator, BoardStrategy, CombatOutcome, CombatPhase, CombatSession,
    DiceboundError, DiceboundResult, Direction, ElementType, EnemyVariant, GameEvent, GameRng,
    GenerationConfig, PlayerSpecies, Position, Progression, RockState, Stats, TeleportGate,
    TileEventKind, TurnController, UpgradeKind, VisitedSet, WalkHalt,
};
use log::info;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Whether the game is still going, and if not, how it ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameCompletion {
    Playing,
    GoalReached,
    PlayerDefeated,
}

/// One running game: board, player, and the active state machine.
#[derive(Debug)]
pub struct GameSession {
    board: Board,
    generation: GenerationConfig,
    strategy: BoardStrategy,
    player: Actor,
    species: PlayerSpecies,
    player_pos: Position,
    direction: Direction,
    rng: GameRng,
    walker: TurnController,
    combat: Option<CombatSession>,
    fighting_monster: Option<Position>,
    progression: Progression,
    completion: GameCompletion,
    can_roll: bool,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Starts a new game on a maze board.
    pub fn new(seed: u32, element: ElementType) -> DiceboundResult<Self> {
        Self::with_strategy(GenerationConfig::new(seed), BoardStrategy::MazeCarve, element)
    }

    /// Starts a new game with an explicit generation config and
    /// strategy.
    pub fn with_strategy(
        generation: GenerationConfig,
        strategy: BoardStrategy,
        element: ElementType,
    ) -> DiceboundResult<Self> {
        let mut rng = GameRng::seeded(generation.seed);
        let generator = BoardGenerator { strategy };
        let board = generator.generate(&generation, &mut rng)?;
        let species = PlayerSpecies::for_element(element);
        let player = Actor::new_player(species);
        let walker = TurnController::new(board.width, board.height);
        let player_pos = board.start;

        info!(
            "new game: seed {}, {} at {:?}",
            generation.seed,
            player.name,
            player_pos
        );

        Ok(Self {
            board,
            generation,
            strategy,
            player,
            species,
            player_pos,
            direction: Direction::Right,
            rng,
            walker,
            combat: None,
            fighting_monster: None,
            progression: Progression::new(),
            completion: GameCompletion::Playing,
            can_roll: true,
            events: Vec::new(),
        })
    }

    // Read-only queries for the presentation layer.

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn player(&self) -> &Actor {
        &self.player
    }

    pub fn player_position(&self) -> Position {
        self.player_pos
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn species(&self) -> PlayerSpecies {
        self.species
    }

    pub fn progression(&self) -> &Progression {
        &self.progression
    }

    pub fn completion(&self) -> GameCompletion {
        self.completion
    }

    pub fn can_roll(&self) -> bool {
        self.can_roll && self.combat.is_none() && self.completion == GameCompletion::Playing
    }

    pub fn visited(&self) -> &VisitedSet {
        self.walker.visited()
    }

    /// The active combat phase, if an encounter is running.
    pub fn combat_phase(&self) -> Option<CombatPhase> {
        self.combat.as_ref().map(|combat| combat.phase())
    }

    /// The combat session for stat/log display, if one is running.
    pub fn combat(&self) -> Option<&CombatSession> {
        self.combat.as_ref()
    }

    /// Drains the queued events.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Reseeds the shared random source (determinism/testing hook).
    pub fn set_seed(&mut self, seed: u32) {
        self.rng.set_seed(seed);
    }

    /// The shared random source's current seed.
    pub fn seed(&self) -> u32 {
        self.rng.seed()
    }

    // Input events.

    /// Rolls the dice and starts a walk sequence. Returns the rolled
    /// value, or None when rolling is not currently allowed.
    pub fn roll_dice(&mut self) -> Option<i32> {
        if !self.can_roll() || self.walker.is_active() {
            return None;
        }
        let value = self.rng.roll_d6();
        self.events.push(GameEvent::DiceRolled { value });
        self.can_roll = false;

        if let Some(halt) = self.walker.begin_sequence(value, &self.board, self.player_pos) {
            self.handle_halt(halt);
        }
        Some(value)
    }

    /// Advances timers: the walker while walking, the combat machine
    /// while fighting.
    pub fn tick(&mut self, dt: Duration) {
        if let Some(combat) = self.combat.as_mut() {
            let outcome = combat.tick(dt, &mut self.rng, &mut self.events);
            if let Some(outcome) = outcome {
                self.finish_combat(outcome);
            }
            return;
        }

        if self.walker.is_active() {
            let before = self.player_pos;
            let halt = self
                .walker
                .tick(dt, &mut self.board, &mut self.player_pos, &mut self.events);
            self.update_direction(before);
            if let Some(halt) = halt {
                self.handle_halt(halt);
            }
        }
    }

    /// Skips the combat ready banner. Returns false if not applicable.
    pub fn skip_banner(&mut self) -> bool {
        self.combat
            .as_mut()
            .map(|combat| combat.skip_banner())
            .unwrap_or(false)
    }

    /// Locks in a coin call for the pending flip.
    pub fn confirm_coin_choice(&mut self, choice: crate::CoinFace) -> bool {
        self.combat
            .as_mut()
            .map(|combat| combat.confirm_coin_choice(choice))
            .unwrap_or(false)
    }

    /// Picks a skill from the open combat menu.
    pub fn select_skill(&mut self, menu_index: usize) -> bool {
        let Some(mut combat) = self.combat.take() else {
            return false;
        };
        let handled = combat.select_skill(menu_index, &mut self.rng, &mut self.events);
        self.combat = Some(combat);
        handled
    }

    /// Performs the fallback flat attack from the open attack menu.
    pub fn use_normal_attack(&mut self) -> bool {
        let Some(mut combat) = self.combat.take() else {
            return false;
        };
        let handled = combat.use_normal_attack(&mut self.events);
        self.combat = Some(combat);
        handled
    }

    /// Takes the pending enemy hit unguarded from the defense menu.
    pub fn forgo_defense(&mut self) -> bool {
        let Some(mut combat) = self.combat.take() else {
            return false;
        };
        let handled = combat.forgo_defense(&mut self.events);
        self.combat = Some(combat);
        handled
    }

    /// Evolves the player if eligible. Returns false otherwise.
    pub fn evolve(&mut self) -> bool {
        if self.combat.is_some() {
            return false;
        }
        match self.progression.evolve(&mut self.player, self.species) {
            Some(event) => {
                self.events.push(event);
                true
            }
            None => false,
        }
    }

    /// Spends one banked upgrade point.
    pub fn spend_upgrade_point(&mut self, kind: UpgradeKind) -> bool {
        if self.combat.is_some() {
            return false;
        }
        self.progression.spend_point(&mut self.player, kind)
    }

    // Internal transitions.

    fn update_direction(&mut self, before: Position) {
        if let Some(dir) = Direction::from_delta(self.player_pos - before) {
            self.direction = dir;
        }
    }

    fn handle_halt(&mut self, halt: WalkHalt) {
        match halt {
            WalkHalt::Combat(monster_pos, variant) => {
                let kind = if variant == EnemyVariant::Boss {
                    TileEventKind::Boss
                } else {
                    TileEventKind::Monster
                };
                self.events.push(GameEvent::TileEventTriggered {
                    kind,
                    at: monster_pos,
                });
                self.events.push(GameEvent::CombatStarted {
                    enemy: variant.name().to_string(),
                });
                // Combat owns a copy of the player for the encounter;
                // results are copied back out on session end
                self.combat = Some(CombatSession::new(self.player.clone(), variant));
                self.fighting_monster = Some(monster_pos);
            }
            WalkHalt::GoalReached => {
                self.events.push(GameEvent::TileEventTriggered {
                    kind: TileEventKind::Goal,
                    at: self.board.goal,
                });
                self.events.push(GameEvent::GoalReached);
                self.completion = GameCompletion::GoalReached;
            }
            WalkHalt::DeadEnd | WalkHalt::Exhausted => {
                self.can_roll = true;
            }
        }
    }

    fn finish_combat(&mut self, outcome: CombatOutcome) {
        let Some(combat) = self.combat.take() else {
            return;
        };
        // Copy results out of the session's owned actor
        self.player = combat.player;
        self.events.push(GameEvent::CombatEnded { outcome });

        let monster_pos = self.fighting_monster.take();
        match outcome {
            CombatOutcome::Victory => {
                let events = self.progression.record_victory(&mut self.player);
                self.events.extend(events);

                if let Some(pos) = monster_pos {
                    self.walker.resume_after_victory(
                        &mut self.board,
                        &mut self.player_pos,
                        pos,
                        &mut self.events,
                    );
                }
                if self.player_pos == self.board.goal {
                    self.events.push(GameEvent::GoalReached);
                    self.completion = GameCompletion::GoalReached;
                }
            }
            CombatOutcome::Defeat => {
                self.walker.resume_after_defeat();
                if !self.player.is_alive() {
                    self.completion = GameCompletion::PlayerDefeated;
                }
            }
        }
        self.can_roll = true;
    }

    // Persistence.

    /// Captures the serializable projection of this session.
    pub fn snapshot(&self) -> SaveSnapshot {
        SaveSnapshot {
            generation: self.generation.clone(),
            strategy: self.strategy,
            rng_seed: self.rng.seed(),
            position: self.player_pos,
            direction: self.direction,
            species: self.species,
            level: self.player.level,
            stats: self.player.stats,
            current_hp: self.player.current_hp,
            current_mp: self.player.current_mp,
            skill_cooldowns: self
                .player
                .skills
                .iter()
                .map(|skill| skill.current_cooldown)
                .collect(),
            evolved: self.player.evolved,
            experience: self.progression.experience,
            victories: self.progression.victories,
            upgrade_points: self.progression.upgrade_points,
            rocks: self.board.rocks().to_vec(),
            gates: self.board.gates().to_vec(),
            monsters: self
                .board
                .live_monsters()
                .iter()
                .map(|site| (site.position, site.variant))
                .collect(),
        }
    }

    /// Rebuilds a session from a snapshot. The board is regenerated
    /// from the recorded seed and then patched with the recorded rock
    /// and monster state.
    pub fn restore(snapshot: &SaveSnapshot) -> DiceboundResult<Self> {
        let element = snapshot.species.element();
        let mut session =
            Self::with_strategy(snapshot.generation.clone(), snapshot.strategy, element)?;

        // Replay board mutations: broken rocks and defeated monsters
        for rock in &snapshot.rocks {
            if session.board.rock_at(rock.position).is_none() {
                return Err(DiceboundError::InvalidState(format!(
                    "save rock at {:?} not present on regenerated board",
                    rock.position
                )));
            }
            for _ in 0..rock.break_progress {
                session.board.strike_rock(rock.position);
            }
        }
        let saved: Vec<Position> = snapshot.monsters.iter().map(|(pos, _)| *pos).collect();
        let defeated: Vec<Position> = session
            .board
            .live_monsters()
            .iter()
            .map(|site| site.position)
            .filter(|pos| !saved.contains(pos))
            .collect();
        for pos in defeated {
            session.board.defeat_monster(pos);
        }

        // Rebuild the player from the recorded projection
        let mut player = Actor::new_player(snapshot.species);
        if snapshot.evolved {
            player.evolved = true;
            player.name = snapshot.species.evolved_name().to_string();
            player.skills.push(snapshot.species.evolution_skill());
        }
        player.level = snapshot.level;
        player.stats = snapshot.stats;
        player.current_hp = snapshot.current_hp;
        player.current_mp = snapshot.current_mp;
        for (skill, cooldown) in player.skills.iter_mut().zip(&snapshot.skill_cooldowns) {
            skill.current_cooldown = *cooldown;
        }

        session.player = player;
        session.player_pos = snapshot.position;
        session.direction = snapshot.direction;
        session.rng.set_seed(snapshot.rng_seed);
        session.progression = Progression {
            experience: snapshot.experience,
            victories: snapshot.victories,
            upgrade_points: snapshot.upgrade_points,
        };
        Ok(session)
    }
}

/// Serializable projection of a running game.
///
/// The board itself is not stored; it is regenerated from the seed and
/// patched with the recorded mutable state, which keeps save files
/// small and the round trip lossless.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveSnapshot {
    pub generation: GenerationConfig,
    pub strategy: BoardStrategy,
    pub rng_seed: u32,
    pub position: Position,
    pub direction: Direction,
    pub species: PlayerSpecies,
    pub level: i32,
    pub stats: Stats,
    pub current_hp: i32,
    pub current_mp: i32,
    pub skill_cooldowns: Vec<i32>,
    pub evolved: bool,
    pub experience: i32,
    pub victories: i32,
    pub upgrade_points: i32,
    pub rocks: Vec<RockState>,
    pub gates: Vec<TeleportGate>,
    pub monsters: Vec<(Position, EnemyVariant)>,
}

impl SaveSnapshot {
    /// Serializes to pretty JSON.
    pub fn to_json(&self) -> DiceboundResult<String> {
        serde_json::to_string_pretty(self).map_err(DiceboundError::from)
    }

    /// Deserializes from JSON.
    pub fn from_json(json: &str) -> DiceboundResult<Self> {
        serde_json::from_str(json).map_err(DiceboundError::from)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config;

    fn quick_session(seed: u32) -> GameSession {
        GameSession::with_strategy(
            GenerationConfig::for_testing(seed),
            BoardStrategy::MazeCarve,
            ElementType::Water,
        )
        .unwrap()
    }

    #[test]
    fn test_new_session_state() {
        let session = quick_session(42);
        assert_eq!(session.completion(), GameCompletion::Playing);
        assert!(session.can_roll());
        assert_eq!(session.player_position(), session.board().start);
        assert!(session.combat_phase().is_none());
    }

    #[test]
    fn test_roll_dice_emits_event_and_blocks_reroll() {
        let mut session = quick_session(42);
        let value = session.roll_dice().expect("roll should be allowed");
        assert!((1..=6).contains(&value));

        let events = session.take_events();
        assert!(events
            .iter()
            .any(|event| matches!(event, GameEvent::DiceRolled { .. })));

        // A second roll mid-sequence is refused
        if session.walker.is_active() || session.combat_phase().is_some() {
            assert!(session.roll_dice().is_none());
        }
    }

    #[test]
    fn test_tick_advances_walk() {
        let mut session = quick_session(42);
        session.roll_dice();

        // Feed generous time; the walker either finishes its sequence
        // or hands off to combat
        for _ in 0..100 {
            session.tick(Duration::from_millis(config::WALKER_STEP_DELAY_MS));
        }
        assert!(!session.walker.is_active() || session.combat_phase().is_some());
    }

    #[test]
    fn test_combat_inputs_refused_outside_combat() {
        let mut session = quick_session(42);
        assert!(!session.confirm_coin_choice(crate::CoinFace::Head));
        assert!(!session.select_skill(0));
        assert!(!session.skip_banner());
    }

    #[test]
    fn test_snapshot_round_trip() {
        let session = quick_session(7);
        let snapshot = session.snapshot();
        let json = snapshot.to_json().unwrap();
        let decoded = SaveSnapshot::from_json(&json).unwrap();
        assert_eq!(snapshot, decoded);
    }

    #[test]
    fn test_restore_rebuilds_identical_board() {
        let session = quick_session(99);
        let snapshot = session.snapshot();
        let restored = GameSession::restore(&snapshot).unwrap();

        assert_eq!(session.board().to_ascii(), restored.board().to_ascii());
        assert_eq!(session.player_position(), restored.player_position());
        assert_eq!(session.player().stats, restored.player().stats);
    }

    #[test]
    fn test_restore_replays_board_mutations() {
        let mut session = quick_session(99);

        // Break a rock and defeat a monster directly on the board
        let rock_pos = session.board.rocks().first().map(|rock| rock.position);
        if let Some(pos) = rock_pos {
            session.board.strike_rock(pos);
            session.board.strike_rock(pos);
        }
        let monster_pos = session
            .board
            .live_monsters()
            .iter()
            .find(|site| site.variant != EnemyVariant::Boss)
            .map(|site| site.position);
        if let Some(pos) = monster_pos {
            session.board.defeat_monster(pos);
        }

        let snapshot = session.snapshot();
        let restored = GameSession::restore(&snapshot).unwrap();

        if let Some(pos) = rock_pos {
            assert!(restored.board().rock_at(pos).unwrap().broken);
        }
        if let Some(pos) = monster_pos {
            assert!(restored.board().monster_at(pos).is_none());
        }
        assert_eq!(
            session.board().live_monsters().len(),
            restored.board().live_monsters().len()
        );
    }

    #[test]
    fn test_evolution_through_session() {
        let mut session = quick_session(3);
        assert!(!session.evolve());

        // Force eligibility
        session.player.level = config::EVOLUTION_LEVEL;
        assert!(session.evolve());
        assert!(session.player().evolved);
        assert!(!session.evolve());
    }
}
