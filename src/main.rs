//! Drift Circuit entry point
//!
//! Natively this runs a headless attract-mode race: the autopilot drives the
//! player against the AI and lap events are logged. The browser build is
//! driven through `platform::web::WebRace` instead.

#[cfg(not(target_arch = "wasm32"))]
fn main() -> Result<(), Box<dyn std::error::Error>> {
    use drift_circuit::consts::SIM_DT;
    use drift_circuit::platform::init_logging;
    use drift_circuit::sim::{
        GameState, LapOutcome, RacePhase, RaceSnapshot, TickInput, format_lap_time, tick,
    };
    use drift_circuit::RaceConfig;

    init_logging();

    let config = match std::env::args().nth(1) {
        Some(path) => {
            log::info!("Loading race config from {path}");
            RaceConfig::from_json(&std::fs::read_to_string(path)?)?
        }
        None => RaceConfig::default(),
    };

    log::info!("Drift Circuit (native, headless) starting...");

    // Simulated clock: one fixed step per tick
    let tick_ms = f64::from(SIM_DT) * 1000.0;
    let max_ticks: u64 = 60 * 60 * 10;
    let mut now = 0.0;
    let mut state = GameState::new(config);

    tick(
        &mut state,
        &TickInput {
            restart: true,
            ..Default::default()
        },
        now,
    );

    let idle = TickInput {
        idle_mode: true,
        ..Default::default()
    };
    let mut collisions = 0u32;
    while state.race.phase == RacePhase::Running && state.time_ticks < max_ticks {
        now += tick_ms;
        let report = tick(&mut state, &idle, now);
        collisions += u32::from(report.player_collided);
        match report.lap {
            LapOutcome::LapCompleted { lap, lap_ms } => {
                println!("Lap {lap}: {}", format_lap_time(lap_ms));
            }
            LapOutcome::Finished { lap_ms, total_ms } => {
                println!("Final lap: {}", format_lap_time(lap_ms));
                println!("Race time: {}", format_lap_time(total_ms));
            }
            LapOutcome::None => {}
        }
    }

    let hud = RaceSnapshot::capture(&state, now).hud;
    match hud.phase {
        RacePhase::Finished => println!(
            "Best lap: {}",
            hud.best_lap_ms.map_or_else(|| "-".to_string(), format_lap_time)
        ),
        _ => println!(
            "Gave up after {} ticks on lap {}/{}",
            state.time_ticks, hud.lap, hud.total_laps
        ),
    }
    log::info!("{collisions} boundary hits");
    Ok(())
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is platform::web::WebRace, this is just to satisfy the compiler
}
