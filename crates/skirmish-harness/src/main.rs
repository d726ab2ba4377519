//! Headless Skirmish runner.
//!
//! Builds a battle from a JSON config file and/or command-line flags, runs it
//! and prints the live-unit count per kind after every tick.
//!
//! ```text
//! skirmish --ticks 1000
//! skirmish --config battle.json --seed 7 --json
//! RUST_LOG=skirmish_core=debug skirmish --width 20 --height 20 --torus
//! ```

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;
use skirmish_core::skirmish_grid::EdgePolicy;
use skirmish_core::{BattleConfig, Census, CountHistory, ForceSpec, Simulation, UnitKind};
use tracing::info;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// JSON battle config; flags below override its fields
    #[arg(long)]
    config: Option<PathBuf>,

    /// Ticks to run
    #[arg(long, default_value_t = 1000)]
    ticks: u64,

    /// RNG seed
    #[arg(long)]
    seed: Option<u64>,

    /// Grid width
    #[arg(long)]
    width: Option<u32>,

    /// Grid height
    #[arg(long)]
    height: Option<u32>,

    /// Wrap the grid edges
    #[arg(long)]
    torus: bool,

    /// Number of archers
    #[arg(long)]
    archers: Option<usize>,

    /// Starting archer health
    #[arg(long)]
    archer_hp: Option<f64>,

    /// Archer base power
    #[arg(long)]
    archer_power: Option<f64>,

    /// Number of axemen
    #[arg(long)]
    axemen: Option<usize>,

    /// Starting axeman health
    #[arg(long)]
    axeman_hp: Option<f64>,

    /// Axeman base power
    #[arg(long)]
    axeman_power: Option<f64>,

    /// Stop early once one side is wiped out
    #[arg(long)]
    stop_when_decided: bool,

    /// Print a JSON report instead of a table
    #[arg(long)]
    json: bool,

    /// Log filter, overridden by `RUST_LOG`
    #[arg(long, default_value = "info")]
    log: String,
}

/// Per-kind overrides taken from the command line.
#[derive(Debug, Default, Clone, Copy)]
struct ForceOverride {
    count: Option<usize>,
    health: Option<f64>,
    power: Option<f64>,
}

impl Cli {
    fn force_override(&self, kind: UnitKind) -> ForceOverride {
        match kind {
            UnitKind::Ranged => ForceOverride {
                count: self.archers,
                health: self.archer_hp,
                power: self.archer_power,
            },
            UnitKind::Melee => ForceOverride {
                count: self.axemen,
                health: self.axeman_hp,
                power: self.axeman_power,
            },
        }
    }

    /// Loads the base config (file or reference skirmish) and applies flags.
    fn battle_config(&self) -> Result<BattleConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let text = fs::read_to_string(path)
                    .with_context(|| format!("reading {}", path.display()))?;
                serde_json::from_str(&text)
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => BattleConfig::skirmish(),
        };

        if let Some(seed) = self.seed {
            config.seed = seed;
        }
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if self.torus {
            config.edge = EdgePolicy::Torus;
        }
        for kind in UnitKind::ALL {
            apply_override(&mut config, kind, self.force_override(kind));
        }
        Ok(config)
    }
}

/// Applies an override to every force of `kind`, adding one if a count is
/// given and none exists.
fn apply_override(config: &mut BattleConfig, kind: UnitKind, over: ForceOverride) {
    if !config.forces.iter().any(|f| f.kind == kind) {
        match over.count {
            Some(count) => config.forces.push(ForceSpec::new(kind, count)),
            None => return,
        }
    }
    for force in config.forces.iter_mut().filter(|f| f.kind == kind) {
        if let Some(count) = over.count {
            force.count = count;
        }
        if let Some(health) = over.health {
            force.health = health;
        }
        if let Some(power) = over.power {
            force.base_power = power;
        }
    }
}

#[derive(Debug, Serialize)]
struct RunReport<'a> {
    config: &'a BattleConfig,
    ticks: u64,
    initial: Census,
    history: &'a CountHistory,
    survivors: Census,
    victor: Option<UnitKind>,
    state_hash: u64,
}

fn init_tracing(level: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    // Logs go to stderr so the count table stays clean on stdout
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

fn print_table(initial: Census, history: &CountHistory) {
    println!(
        "tick\t{}\t{}",
        UnitKind::Ranged.unit_name(),
        UnitKind::Melee.unit_name()
    );
    println!("0\t{}\t{}", initial.ranged, initial.melee);
    let ranged = history.series(UnitKind::Ranged);
    let melee = history.series(UnitKind::Melee);
    for (i, (r, m)) in ranged.iter().zip(melee).enumerate() {
        println!("{}\t{r}\t{m}", i + 1);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli.log);

    let config = cli.battle_config()?;
    let mut sim = Simulation::new(config).context("building the battle")?;
    let initial = sim.count_by_type();

    if cli.stop_when_decided {
        while sim.tick() < cli.ticks && !sim.is_decided() {
            sim.step()?;
        }
    } else {
        sim.run(cli.ticks)?;
    }

    let survivors = sim.count_by_type();
    info!(
        tick = sim.tick(),
        ranged = survivors.ranged,
        melee = survivors.melee,
        "battle over"
    );

    if cli.json {
        let report = RunReport {
            config: sim.config(),
            ticks: sim.tick(),
            initial,
            history: sim.history(),
            survivors,
            victor: survivors.victor(),
            state_hash: sim.state_hash(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(initial, sim.history());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::parse_from(std::iter::once("skirmish").chain(args.iter().copied()))
    }

    #[test]
    fn defaults_to_reference_skirmish() {
        let cli = parse(&[]);
        assert_eq!(cli.ticks, 1000);
        assert_eq!(cli.battle_config().unwrap(), BattleConfig::skirmish());
    }

    #[test]
    fn flags_override_fields() {
        let cli = parse(&[
            "--seed", "9", "--width", "20", "--height", "5", "--torus", "--archers", "3",
            "--axeman-hp", "150",
        ]);
        let config = cli.battle_config().unwrap();
        assert_eq!((config.width, config.height, config.seed), (20, 5, 9));
        assert_eq!(config.edge, EdgePolicy::Torus);
        assert_eq!(config.forces[0].count, 3);
        assert!((config.forces[0].base_power - 50.0).abs() < f64::EPSILON);
        assert!((config.forces[1].health - 150.0).abs() < f64::EPSILON);
    }

    #[test]
    fn count_flag_adds_missing_force() {
        let mut config = BattleConfig::new(5, 5);
        apply_override(
            &mut config,
            UnitKind::Melee,
            ForceOverride {
                count: Some(4),
                ..ForceOverride::default()
            },
        );
        assert_eq!(config.forces, vec![ForceSpec::axemen(4)]);

        // Stats alone never conjure a force
        apply_override(
            &mut config,
            UnitKind::Ranged,
            ForceOverride {
                health: Some(10.0),
                ..ForceOverride::default()
            },
        );
        assert_eq!(config.forces.len(), 1);
    }

    #[test]
    fn cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
