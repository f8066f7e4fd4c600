//! Configuration – reads `~/.drivelink/config.toml`.
//!
//! The endpoint is deliberately required: there is no sensible default
//! robot address, so a missing `host` or `port` is a startup error rather
//! than a silent fallback.  The file is only ever read, never written.

use serde::Deserialize;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use drivelink_control::PilotConfig;

/// User configuration stored in `~/.drivelink/config.toml`.
#[derive(Clone, Debug, Deserialize)]
pub struct Config {
    /// Remote motor-controller host.  Required.
    pub host: String,

    /// Remote motor-controller TCP port.  Required.
    pub port: u16,

    /// Joystick axis magnitude treated as centred.
    #[serde(default = "default_dead_zone")]
    pub dead_zone: f32,

    /// Absolute bound on every per-wheel power value.
    #[serde(default = "default_max_motor_power")]
    pub max_motor_power: i16,

    /// Control-loop cadence.
    #[serde(default = "default_tick_rate_hz")]
    pub tick_rate_hz: u32,

    /// Bound on each connect attempt, in seconds.
    #[serde(default = "default_connect_timeout_s")]
    pub connect_timeout_s: f32,

    /// Wait between reconnect attempts, in seconds.
    #[serde(default = "default_retry_delay_s")]
    pub retry_delay_s: f32,

    /// Throttle at startup.
    #[serde(default = "default_initial_speed")]
    pub initial_speed: f32,

    /// Throttle change per speed-up/down event.
    #[serde(default = "default_speed_step")]
    pub speed_step: f32,
}

fn default_dead_zone() -> f32 {
    0.18
}
fn default_max_motor_power() -> i16 {
    255
}
fn default_tick_rate_hz() -> u32 {
    30
}
fn default_connect_timeout_s() -> f32 {
    5.0
}
fn default_retry_delay_s() -> f32 {
    5.0
}
fn default_initial_speed() -> f32 {
    0.5
}
fn default_speed_step() -> f32 {
    0.1
}

impl Config {
    /// `host:port` for the transport connector.
    pub fn endpoint(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs_f32(self.connect_timeout_s)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs_f32(self.retry_delay_s)
    }

    /// The control-loop knobs this configuration carries.
    pub fn pilot(&self) -> PilotConfig {
        PilotConfig {
            tick_rate_hz: self.tick_rate_hz,
            dead_zone: self.dead_zone,
            max_motor_power: self.max_motor_power,
            initial_speed: self.initial_speed,
            speed_step: self.speed_step,
        }
    }
}

/// Return the path to `~/.drivelink/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".drivelink").join("config.toml")
}

/// Load the config from disk.  Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    validate(&cfg)?;
    Ok(Some(cfg))
}

/// Reject values the control loop cannot run with.
fn validate(cfg: &Config) -> Result<(), String> {
    if cfg.tick_rate_hz == 0 {
        return Err("tick_rate_hz must be at least 1".to_string());
    }
    if cfg.max_motor_power <= 0 {
        return Err("max_motor_power must be positive".to_string());
    }
    Ok(())
}

/// Apply `DRIVELINK_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `DRIVELINK_HOST` | `host` |
/// | `DRIVELINK_PORT` | `port` |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("DRIVELINK_HOST") {
        cfg.host = v;
    }
    if let Ok(v) = std::env::var("DRIVELINK_PORT")
        && let Ok(port) = v.parse::<u16>()
    {
        cfg.port = port;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(dir: &tempfile::TempDir, body: &str) -> PathBuf {
        let path = config_path_for_home(&dir.path().to_string_lossy());
        fs::create_dir_all(path.parent().unwrap()).expect("config dir");
        fs::write(&path, body).expect("write config");
        path
    }

    #[test]
    fn load_from_returns_none_when_missing() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = config_path_for_home(&dir.path().to_string_lossy());
        let result = load_from(&path).expect("no error");
        assert!(result.is_none());
    }

    #[test]
    fn minimal_config_gets_documented_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = write_config(&dir, "host = \"192.168.1.18\"\nport = 65432\n");

        let cfg = load_from(&path).expect("load ok").expect("some");
        assert_eq!(cfg.host, "192.168.1.18");
        assert_eq!(cfg.port, 65432);
        assert_eq!(cfg.dead_zone, 0.18);
        assert_eq!(cfg.max_motor_power, 255);
        assert_eq!(cfg.tick_rate_hz, 30);
        assert_eq!(cfg.connect_timeout_s, 5.0);
        assert_eq!(cfg.retry_delay_s, 5.0);
        assert_eq!(cfg.initial_speed, 0.5);
        assert_eq!(cfg.speed_step, 0.1);
    }

    #[test]
    fn missing_host_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = write_config(&dir, "port = 65432\n");
        assert!(load_from(&path).is_err());
    }

    #[test]
    fn missing_port_is_a_parse_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = write_config(&dir, "host = \"robot.local\"\n");
        assert!(load_from(&path).is_err());
    }

    #[test]
    fn zero_tick_rate_is_rejected() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = write_config(&dir, "host = \"robot.local\"\nport = 9000\ntick_rate_hz = 0\n");
        assert!(load_from(&path).is_err());
    }

    #[test]
    fn non_positive_max_motor_power_is_rejected() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = write_config(&dir, "host = \"robot.local\"\nport = 9000\nmax_motor_power = 0\n");
        assert!(load_from(&path).is_err());
    }

    #[test]
    fn explicit_values_override_defaults() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = write_config(
            &dir,
            "host = \"robot.local\"\nport = 9000\ntick_rate_hz = 60\ninitial_speed = 0.3\n",
        );

        let cfg = load_from(&path).expect("load ok").expect("some");
        assert_eq!(cfg.tick_rate_hz, 60);
        assert_eq!(cfg.initial_speed, 0.3);
    }

    #[test]
    fn endpoint_joins_host_and_port() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = write_config(&dir, "host = \"10.0.0.2\"\nport = 7777\n");
        let cfg = load_from(&path).expect("load ok").expect("some");
        assert_eq!(cfg.endpoint(), "10.0.0.2:7777");
    }

    #[test]
    fn apply_env_overrides_changes_host() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("DRIVELINK_HOST", "10.1.1.1") };
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = write_config(&dir, "host = \"robot.local\"\nport = 9000\n");
        let cfg = load_from(&path).expect("load ok").expect("some");
        assert_eq!(cfg.host, "10.1.1.1");
        unsafe { std::env::remove_var("DRIVELINK_HOST") };
    }

    #[test]
    fn apply_env_overrides_ignores_invalid_port() {
        // SAFETY: single-threaded test; no data races on env vars.
        unsafe { std::env::set_var("DRIVELINK_PORT", "not-a-port") };
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = write_config(&dir, "host = \"robot.local\"\nport = 9000\n");
        let cfg = load_from(&path).expect("load ok").expect("some");
        assert_eq!(cfg.port, 9000);
        unsafe { std::env::remove_var("DRIVELINK_PORT") };
    }

    #[test]
    fn config_path_points_to_drivelink_dir() {
        let p = config_path_for_home("/home/testuser");
        assert!(p.to_string_lossy().contains(".drivelink"));
        assert!(p.to_string_lossy().ends_with("config.toml"));
    }

    #[test]
    fn durations_convert_from_seconds() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = write_config(
            &dir,
            "host = \"robot.local\"\nport = 9000\nconnect_timeout_s = 2.5\nretry_delay_s = 1.0\n",
        );
        let cfg = load_from(&path).expect("load ok").expect("some");
        assert_eq!(cfg.connect_timeout(), Duration::from_millis(2500));
        assert_eq!(cfg.retry_delay(), Duration::from_secs(1));
    }
}
