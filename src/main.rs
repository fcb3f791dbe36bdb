//! # Dicebound Main Entry Point
//!
//! Headless driver for the game core: generates a board, prints it, and
//! optionally plays a fully automated game to exercise the walker and
//! combat machines end to end. Real presentation (rendering, audio,
//! input) lives outside this crate.

use clap::Parser;
use dicebound::{
    config, CoinFace, CombatPhase, DiceboundResult, ElementType, GameCompletion, GameEvent,
    GameSession, GenerationConfig,
};
use log::info;
use std::time::Duration;

/// Command line arguments for the Dicebound driver.
#[derive(Parser, Debug)]
#[command(name = "dicebound")]
#[command(about = "A dice-driven board game with coin-flip combat")]
#[command(version)]
struct Args {
    /// Random seed for board generation
    #[arg(short, long, default_value_t = 42)]
    seed: u32,

    /// Use the deterministic serpentine layout instead of a maze
    #[arg(long)]
    serpentine: bool,

    /// Player element: fire, water or grass
    #[arg(short, long, default_value = "fire")]
    element: String,

    /// Play an automated game for up to this many dice rolls
    #[arg(long, default_value_t = 0)]
    autoplay: u32,
}

fn main() -> DiceboundResult<()> {
    env_logger::init();
    let args = Args::parse();

    info!("Starting Dicebound v{}", dicebound::VERSION);

    let element = parse_element(&args.element)?;
    let strategy = if args.serpentine {
        dicebound::BoardStrategy::Serpentine
    } else {
        dicebound::BoardStrategy::MazeCarve
    };
    let mut session =
        GameSession::with_strategy(GenerationConfig::new(args.seed), strategy, element)?;

    println!("Board (seed {}):", args.seed);
    print!("{}", session.board().to_ascii());

    if args.autoplay > 0 {
        autoplay(&mut session, args.autoplay);
    }
    Ok(())
}

fn parse_element(raw: &str) -> DiceboundResult<ElementType> {
    match raw.to_lowercase().as_str() {
        "fire" => Ok(ElementType::Fire),
        "water" => Ok(ElementType::Water),
        "grass" => Ok(ElementType::Grass),
        other => Err(dicebound::DiceboundError::InvalidAction(format!(
            "unknown element '{}'",
            other
        ))),
    }
}

/// Plays the game automatically: rolls whenever allowed, always calls
/// Heads, and always picks the first usable skill.
fn autoplay(session: &mut GameSession, max_rolls: u32) {
    let step = Duration::from_millis(config::WALKER_STEP_DELAY_MS);
    let mut rolls = 0;

    while session.completion() == GameCompletion::Playing && rolls < max_rolls {
        if session.can_roll() {
            if let Some(value) = session.roll_dice() {
                rolls += 1;
                println!("Roll {}: {}", rolls, value);
            }
        }

        // Keep feeding time until the session wants input or the
        // sequence finished; combats burn several seconds of phase
        // timers each round
        for _ in 0..2000 {
            session.tick(step);
            match session.combat_phase() {
                Some(CombatPhase::PlayerCoinChoice) => {
                    session.confirm_coin_choice(CoinFace::Head);
                }
                Some(CombatPhase::PlayerAction) => {
                    // Walk the small menu, falling back to the flat
                    // action when nothing is usable
                    if !(session.select_skill(0)
                        || session.select_skill(1)
                        || session.select_skill(2))
                    {
                        if !session.use_normal_attack() {
                            session.forgo_defense();
                        }
                    }
                }
                _ => {}
            }
            for event in session.take_events() {
                report_event(&event);
            }
            if session.can_roll() || session.completion() != GameCompletion::Playing {
                break;
            }
        }
        if !session.can_roll() && session.completion() == GameCompletion::Playing {
            // Stuck waiting on something unexpected; bail out
            break;
        }
    }

    match session.completion() {
        GameCompletion::GoalReached => println!("Goal reached after {} rolls!", rolls),
        GameCompletion::PlayerDefeated => println!("Defeated after {} rolls.", rolls),
        GameCompletion::Playing => println!("Stopped after {} rolls.", rolls),
    }
    println!(
        "Final: {} lv{} at {:?}, {} victories",
        session.player().name,
        session.player().level,
        session.player_position(),
        session.progression().victories
    );
}

fn report_event(event: &GameEvent) {
    match event {
        GameEvent::CombatStarted { enemy } => println!("  Combat vs {}", enemy),
        GameEvent::CombatEnded { outcome } => println!("  Combat ended: {:?}", outcome),
        GameEvent::Teleported { from, to } => {
            println!("  Teleported {:?} -> {:?}", from, to)
        }
        GameEvent::GoalReached => println!("  Goal reached!"),
        GameEvent::LeveledUp { level } => println!("  Level up -> {}", level),
        _ => {}
    }
}
