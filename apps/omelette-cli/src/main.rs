mod config;

use clap::{Parser, Subcommand};
use config::SimulationConfig;
use omelette_common::{Entity, Vector3};
use omelette_ecs::{ComponentHandle, MeshComponent, MeshData, Registry, RigidBodyComponent, SharedMesh};
use omelette_physics::{PhysicsWorld, RigidBody};
use std::cell::RefCell;
use std::path::PathBuf;
use std::rc::Rc;
use std::time::{Duration, Instant};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "omelette-cli", about = "Headless driver for the omelette physics core")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// JSON simulation config; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print engine version and crate info
    Info,
    /// Push a cube once and follow it through the entity registry
    Sandbox {
        /// Number of ticks to simulate
        #[arg(short, long)]
        ticks: Option<u64>,
        /// Ticks per second
        #[arg(short, long)]
        frame_rate: Option<f32>,
        /// Pace ticks against the wall clock; `--realtime false` overrides the config
        #[arg(long, num_args = 0..=1, default_missing_value = "true")]
        realtime: Option<bool>,
    },
    /// Drop a single body in a flat gravity world
    Gravity {
        /// Number of ticks to simulate
        #[arg(short, long)]
        ticks: Option<u64>,
        /// Body mass
        #[arg(short, long)]
        mass: Option<f32>,
        /// Print the final world as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)))
        .init();

    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    debug!(?config, "configuration loaded");

    match cli.command {
        Commands::Info => {
            println!("omelette-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("common: {}", omelette_common::crate_info());
            println!("physics: {}", omelette_physics::crate_info());
            println!("ecs: {}", omelette_ecs::crate_info());
        }
        Commands::Sandbox {
            ticks,
            frame_rate,
            realtime,
        } => {
            config.ticks = ticks.unwrap_or(config.ticks);
            config.frame_rate = frame_rate.unwrap_or(config.frame_rate);
            config.realtime = realtime.unwrap_or(config.realtime);
            config.validate()?;
            run_sandbox(&config)?;
        }
        Commands::Gravity { ticks, mass, json } => {
            config.ticks = ticks.unwrap_or(config.ticks);
            config.mass = mass.unwrap_or(config.mass);
            config.validate()?;
            let world = run_gravity(&config);
            if json {
                println!("{}", serde_json::to_string_pretty(&world)?);
            }
        }
    }

    Ok(())
}

/// Unit cube centred on the origin, counter-clockwise front faces.
fn unit_cube() -> MeshData {
    let h = 0.5;
    MeshData::new(
        vec![
            Vector3::new(-h, -h, h),
            Vector3::new(h, -h, h),
            Vector3::new(h, h, h),
            Vector3::new(-h, h, h),
            Vector3::new(-h, -h, -h),
            Vector3::new(h, -h, -h),
            Vector3::new(h, h, -h),
            Vector3::new(-h, h, -h),
        ],
        vec![
            0, 1, 2, 2, 3, 0, // front
            1, 5, 6, 6, 2, 1, // right
            5, 4, 7, 7, 6, 5, // back
            4, 0, 3, 3, 7, 4, // left
            3, 2, 6, 6, 7, 3, // top
            4, 5, 1, 1, 0, 4, // bottom
        ],
    )
}

/// A cube entity whose vertices live in a staging buffer shared with the
/// (absent) renderer, driven by a linked rigid body.
struct Sandbox {
    registry: Registry,
    entity: Entity,
    body: ComponentHandle,
    staging: SharedMesh,
}

impl Sandbox {
    fn new(config: &SimulationConfig) -> anyhow::Result<Self> {
        let staging: SharedMesh = Rc::new(RefCell::new(unit_cube()));
        let entity = Entity::new(0);

        let mut registry = Registry::new();
        registry.add_entity(entity);
        let mesh = registry.add_component(entity, MeshComponent::shared(Rc::clone(&staging)));
        let body = registry.add_component(
            entity,
            RigidBodyComponent::linked_to(RigidBody::at_rest(Vector3::ZERO, config.mass), mesh),
        );
        registry.apply_force(body, config.initial_force())?;

        Ok(Self {
            registry,
            entity,
            body,
            staging,
        })
    }

    fn tick(&mut self, delta_time: f32) {
        self.registry.update_entity(self.entity, delta_time);
    }

    fn body(&self) -> Option<&RigidBodyComponent> {
        self.registry.get(self.body)
    }

    /// What the renderer would upload this frame.
    fn staged_centroid(&self) -> Vector3 {
        self.staging.borrow().centroid()
    }
}

fn run_sandbox(config: &SimulationConfig) -> anyhow::Result<()> {
    let mut sandbox = Sandbox::new(config)?;
    info!(
        ticks = config.ticks,
        frame_rate = config.frame_rate,
        realtime = config.realtime,
        "sandbox started"
    );

    let frame = config.frame_duration();
    let delta_time = config.delta_time();
    let mut last_frame = Instant::now();
    let mut tick = 0;
    while tick < config.ticks {
        if config.realtime {
            let now = Instant::now();
            if now.duration_since(last_frame) < frame {
                std::thread::sleep(Duration::from_millis(1));
                continue;
            }
            last_frame = now;
        }

        sandbox.tick(delta_time);
        tick += 1;

        if let Some(body) = sandbox.body() {
            let (p, v) = (body.position(), body.velocity());
            let c = sandbox.staged_centroid();
            println!(
                "tick {tick:>4}  pos ({:8.3}, {:8.3}, {:8.3})  vel ({:7.3}, {:7.3}, {:7.3})  mesh ({:8.3}, {:8.3}, {:8.3})",
                p.x, p.y, p.z, v.x, v.y, v.z, c.x, c.y, c.z
            );
        }
    }
    info!(ticks = tick, "sandbox finished");
    Ok(())
}

fn run_gravity(config: &SimulationConfig) -> PhysicsWorld {
    let mut world = PhysicsWorld::with_gravity(config.gravity());
    world.add_rigid_body(RigidBody::at_rest(Vector3::ZERO, config.mass));
    info!(ticks = config.ticks, mass = config.mass, "gravity world started");

    let delta_time = config.delta_time();
    for _ in 0..config.ticks {
        world.step(delta_time);
        let body = &world.rigid_bodies()[0];
        println!(
            "tick {:>4}  pos y {:10.4}  vel y {:9.4}",
            world.tick(),
            body.position.y,
            body.velocity.y
        );
    }
    println!("state hash: {:#018x}", world.state_hash());
    world
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn realtime_flag_parses_as_override() {
        let parse = |args: &[&str]| match Cli::try_parse_from(args).unwrap().command {
            Commands::Sandbox { realtime, .. } => realtime,
            _ => panic!("expected sandbox"),
        };
        assert_eq!(parse(&["omelette-cli", "sandbox"]), None);
        assert_eq!(parse(&["omelette-cli", "sandbox", "--realtime"]), Some(true));
        assert_eq!(parse(&["omelette-cli", "sandbox", "--realtime", "false"]), Some(false));
    }

    #[test]
    fn zero_frame_rate_flag_fails_validation() {
        let cli = Cli::try_parse_from(["omelette-cli", "sandbox", "--frame-rate", "0"]).unwrap();
        let Commands::Sandbox { frame_rate, .. } = cli.command else {
            panic!("expected sandbox");
        };
        let config = SimulationConfig {
            frame_rate: frame_rate.unwrap(),
            ..SimulationConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn cube_indices_are_in_range() {
        let cube = unit_cube();
        assert_eq!(cube.triangle_count(), 12);
        assert!(cube.indices.iter().all(|&i| (i as usize) < cube.vertices.len()));
        assert_eq!(cube.centroid(), Vector3::ZERO);
    }

    #[test]
    fn sandbox_first_tick_moves_staging_buffer() {
        let config = SimulationConfig {
            frame_rate: 1.0,
            ..SimulationConfig::default()
        };
        let mut sandbox = Sandbox::new(&config).unwrap();
        sandbox.tick(config.delta_time());

        let body = sandbox.body().unwrap();
        assert_eq!(body.velocity(), Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(body.position(), Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(sandbox.staged_centroid(), Vector3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn gravity_run_matches_single_step() {
        let config = SimulationConfig {
            frame_rate: 1.0,
            ticks: 1,
            mass: 2.0,
            ..SimulationConfig::default()
        };
        let world = run_gravity(&config);
        let body = &world.rigid_bodies()[0];
        assert_eq!(body.velocity, Vector3::new(0.0, -9.81, 0.0));
        assert_eq!(body.position, Vector3::new(0.0, -9.81, 0.0));
    }

    #[test]
    fn gravity_runs_are_reproducible() {
        let config = SimulationConfig::default();
        assert_eq!(
            run_gravity(&config).state_hash(),
            run_gravity(&config).state_hash()
        );
    }
}
