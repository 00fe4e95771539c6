use anyhow::{Result, ensure};
use clap::Parser;
use game_core::content::DEMO_ARENA;
use game_core::{Direction, Game, PlayerIntent, SimConfig, StopReason, TileKind};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    #[arg(short, long, default_value_t = 1000)]
    turns: u32,
}

fn choose<T: Clone>(rng: &mut ChaCha8Rng, slice: &[T]) -> T {
    let p = rng.next_u64() as usize % slice.len();
    slice[p].clone()
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for max {} turns...", args.seed, args.turns);
    let mut game = Game::from_layout(DEMO_ARENA, args.seed, SimConfig::default())?;
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    let mut total_turns = 0;
    while total_turns < args.turns {
        let result = game.advance(10);
        total_turns += result.turns_taken;

        match result.stop_reason {
            StopReason::Finished(outcome) => {
                println!("Finished with outcome {:?} after {} turns", outcome, total_turns);
                break;
            }
            StopReason::AwaitingInput => {
                // Bias toward walking so fights and doors actually happen.
                let intent = match rng.next_u64() % 4 {
                    0 => PlayerIntent::Wait,
                    1 => PlayerIntent::AutoExplore,
                    _ => PlayerIntent::Move(choose(&mut rng, &Direction::ALL)),
                };
                game.submit_intent(intent);
            }
            StopReason::Stalled => anyhow::bail!("stalled after {total_turns} turns"),
            StopReason::Halted | StopReason::BudgetExhausted => {}
        }

        for entity in game.entities() {
            ensure!(
                game.grid().kind_at(entity.pos) != TileKind::Wall,
                "Invariant failed: entity inside wall"
            );
            if let Some(body) = entity.body.as_ref() {
                ensure!(body.hp <= body.max_hp, "Invariant failed: HP > Max HP");
                ensure!(
                    game.entity_at(entity.pos).map(|occupant| occupant.id) == Some(entity.id),
                    "Invariant failed: occupancy out of sync"
                );
            }
        }
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}
