use crate::app::report::RunReport;
use crate::model::config::AppConfig;
use crate::model::simulation::Simulation;
use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use web_time::Instant;

/// Default config file picked up from the working directory.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

/// Headless runner: owns one simulation and drives it for a fixed number
/// of ticks.
pub struct App {
    pub sim: Simulation,
    pub config_path: Option<PathBuf>,
}

impl App {
    /// Loads configuration from `path`, or from `config.toml` when present,
    /// or falls back to defaults.
    ///
    /// An explicit path that cannot be read or parsed is an error; a broken
    /// implicit `config.toml` only warns.
    pub fn load_config(path: Option<&Path>) -> Result<(AppConfig, Option<PathBuf>)> {
        if let Some(path) = path {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("reading config {}", path.display()))?;
            let config = AppConfig::from_toml(&content)
                .with_context(|| format!("parsing config {}", path.display()))?;
            return Ok((config, Some(path.to_path_buf())));
        }

        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        if let Ok(content) = std::fs::read_to_string(default_path) {
            match AppConfig::from_toml(&content) {
                Ok(config) => return Ok((config, Some(default_path.to_path_buf()))),
                Err(e) => {
                    tracing::warn!("Failed to load {}: {e:#}", DEFAULT_CONFIG_PATH);
                }
            }
        }
        Ok((AppConfig::default(), None))
    }

    pub fn new(config: AppConfig) -> Result<Self> {
        let sim = Simulation::new(config).context("creating simulation")?;
        Ok(Self {
            sim,
            config_path: None,
        })
    }

    /// Runs `ticks` ticks and summarizes the result.
    pub fn run(&mut self, ticks: u64) -> RunReport {
        let started = Instant::now();
        tracing::info!(
            ticks,
            agents = self.sim.len(),
            config = ?self.config_path,
            "Headless run started"
        );
        for _ in 0..ticks {
            self.sim.tick();
        }
        let report = RunReport::collect(&self.sim, started.elapsed());
        tracing::info!(
            agents = report.agents,
            mean_speed = report.mean_speed,
            elapsed_ms = report.elapsed_ms,
            "Headless run finished"
        );
        report
    }

    /// Writes the current render snapshot as JSON.
    pub fn write_snapshot(&self, path: &Path) -> Result<()> {
        let json = self.sim.snapshot().to_json()?;
        std::fs::write(path, json).with_context(|| format!("writing snapshot {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn small_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.world.seed = Some(3);
        config.population.initial_prey = 12;
        config.population.spawn_interval = 0;
        config
    }

    #[test]
    fn test_run_reports_ticks() {
        let mut app = App::new(small_config()).unwrap();
        let report = app.run(5);
        assert_eq!(report.ticks, 5);
        assert_eq!(report.agents, 12);
    }

    #[test]
    fn test_explicit_config_path() {
        let dir = std::env::temp_dir().join(format!("murmuration-cfg-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("custom.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "[world]\nwidth = 321.0\nseed = 1").unwrap();

        let (config, used) = App::load_config(Some(&path)).unwrap();
        assert_eq!(config.world.width, 321.0);
        assert_eq!(used.as_deref(), Some(path.as_path()));

        assert!(App::load_config(Some(&dir.join("missing.toml"))).is_err());
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_snapshot_file() {
        let app = App::new(small_config()).unwrap();
        let path = std::env::temp_dir().join(format!("murmuration-snap-{}.json", std::process::id()));
        app.write_snapshot(&path).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"positions\""));
        std::fs::remove_file(&path).ok();
    }
}
