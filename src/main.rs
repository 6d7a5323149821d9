use std::sync::Arc;
use std::thread;
use std::time::Duration;

use call_announcer::{Announcer, AnnouncerConfig, AppResult, Player, RodioPlayer, SimulatedPlayer};

/// Initialize tracing with an env-filter console subscriber.
/// Override the level with RUST_LOG, e.g. RUST_LOG=call_announcer=debug.
fn initialize_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("call_announcer=info"));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}

fn main() -> AppResult<()> {
    initialize_tracing();

    println!("===========================================");
    println!("  Call Announcer - playback queue demo");
    println!("===========================================\n");

    let args: Vec<String> = std::env::args().collect();
    let simulate = args.iter().any(|a| a == "--simulate");

    let player: Arc<dyn Player> = if simulate {
        println!("✓ Using simulated player (no audio device)");
        Arc::new(SimulatedPlayer::with_clip_delay(Duration::from_millis(150)))
    } else {
        match RodioPlayer::new() {
            Ok(player) => {
                println!("✓ Audio output device ready");
                Arc::new(player)
            }
            Err(e) => {
                eprintln!("✗ Failed to open audio device: {}", e);
                eprintln!("  Re-run with --simulate for a dry run");
                std::process::exit(1);
            }
        }
    };

    let announcer = Announcer::new(AnnouncerConfig::default(), player);
    let events = announcer.subscribe();

    // A couple of back-to-back calls; they queue up and play in order
    announcer.add_normal_call_default("A1001", 3)?;
    announcer.add_normal_call("B2002", 5, false)?;
    announcer.add_manager_call_default(2)?;

    println!("✓ Enqueued 3 calls (queue length {})\n", announcer.queue_len());

    // Print engine events until the queue drains
    while announcer.queue_len() > 0 || announcer.is_playing() {
        while let Ok(event) = events.try_recv() {
            println!("  {}", event.description());
        }
        thread::sleep(Duration::from_millis(50));
    }
    while let Ok(event) = events.try_recv() {
        println!("  {}", event.description());
    }

    println!("\n✓ All announcements finished");
    Ok(())
}
