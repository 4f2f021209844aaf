use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::{Parser, Subcommand};
use glam::{Quat, Vec3};
use tracing_subscriber::EnvFilter;

use simlog_common::{EntityId, Pose, UpdateInfo};
use simlog_ecs::ComponentStore;
use simlog_log::{LogWriter, EVENT_LOG_FILE, WORLD_FILE};
use simlog_playback::{PlaybackController, PlaybackState, PoseUpdate, POSE_BATCH_TAG};
use simlog_world::EventQueue;

#[derive(Parser)]
#[command(name = "simlog-cli", about = "Generate and play back simlog recordings")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample recording directory (world description + event log)
    Demo {
        /// Directory to write the recording into
        #[arg(short, long)]
        dir: PathBuf,
        /// Number of pose-batch entries to record
        #[arg(short, long, default_value = "20")]
        entries: u32,
    },
    /// Play a recording against a fresh component store
    Play {
        /// Recording directory
        #[arg(short, long)]
        dir: PathBuf,
        /// Number of host ticks to drive
        #[arg(short, long, default_value = "100")]
        ticks: u64,
        /// Simulation time advanced per tick, in milliseconds
        #[arg(short, long, default_value = "250")]
        step_ms: u64,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    match cli.command {
        Commands::Demo { dir, entries } => write_demo(&dir, entries),
        Commands::Play {
            dir,
            ticks,
            step_ms,
        } => play(&dir, ticks, step_ms),
    }
}

const DEMO_WORLD: &str = r#"worlds:
  - name: demo
    models:
      - name: box
      - name: cylinder
    lights:
      - name: sun
        kind: directional
        intensity: 0.9
    plugins:
      - name: ignition::gazebo::systems::Physics
      - name: demo::systems::Visualizer
"#;

fn write_demo(dir: &PathBuf, entries: u32) -> anyhow::Result<()> {
    std::fs::create_dir_all(dir).context("creating recording directory")?;
    std::fs::write(dir.join(WORLD_FILE), DEMO_WORLD)?;

    // Entity ids match what bootstrapping assigns: world=1, box=2, cylinder=3.
    let mut writer = LogWriter::new();
    for i in 0..entries {
        let t = Duration::from_millis(500 * u64::from(i));
        let angle = i as f32 * 0.1;
        let updates = vec![
            PoseUpdate {
                entity: EntityId(2),
                pose: Pose::new(Vec3::new(angle.cos(), angle.sin(), 0.0), Quat::IDENTITY),
            },
            PoseUpdate {
                entity: EntityId(3),
                pose: Pose::new(
                    Vec3::new(0.0, 0.0, i as f32 * 0.05),
                    Quat::from_rotation_z(angle),
                ),
            },
        ];
        writer.append_message(t, POSE_BATCH_TAG, &updates)?;
    }
    writer.write_to(dir.join(EVENT_LOG_FILE))?;

    println!(
        "Wrote demo recording: {} entries under {}",
        entries,
        dir.display()
    );
    Ok(())
}

fn play(dir: &PathBuf, ticks: u64, step_ms: u64) -> anyhow::Result<()> {
    let mut store = ComponentStore::new();
    let world_entity = store.spawn();
    let mut queue = EventQueue::new();

    let mut controller = PlaybackController::new();
    controller
        .configure(dir, world_entity, &mut store, &mut queue)
        .context("configuring playback")?;

    for event in queue.drain_events() {
        let simlog_world::HostEvent::LoadPlugins { world, .. } = event;
        println!(
            "Host would load {} runtime plugin(s) for world '{}'",
            world.plugins.len(),
            world.name
        );
    }

    let total = controller.remaining_entries();
    println!("Playing {} entries over up to {} ticks", total, ticks);

    let mut sim_time = Duration::ZERO;
    for _ in 0..ticks {
        controller.tick(&UpdateInfo::running(sim_time), &mut store);
        sim_time += Duration::from_millis(step_ms);
        if controller.state() == PlaybackState::Finished {
            break;
        }
    }

    println!(
        "Done: state={:?}, applied {}/{} entries, {} entities in store",
        controller.state(),
        total - controller.remaining_entries(),
        total,
        store.entity_count()
    );
    for (entity, pose) in store.poses() {
        let name = store
            .get_name(*entity)
            .map(|n| n.0.clone())
            .unwrap_or_else(|| format!("{entity:?}"));
        println!(
            "  {name}: position=({:.2}, {:.2}, {:.2})",
            pose.position.x, pose.position.y, pose.position.z
        );
    }
    Ok(())
}
