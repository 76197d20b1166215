//! Replays a recorded trace through a denoise sensor
//!
//! Usage: `replay-demo [config.json] < trace.txt`
//!
//! Each trace line is `<seconds> <state>`, where state is whatever the source
//! reported (a number, `unavailable`, ...). Run with `RUST_LOG=debug` to see
//! held ticks as well.

use std::collections::HashMap;
use std::io::{self, BufRead};
use std::time::Duration;

use denoise_sensor::sensor::{
    DenoiseSensor, SensorConfig, SourceState, StatePublisher, StateSource, StateUpdate,
    TemperatureUnit, TickOutcome,
};
use denoise_sensor::Timestamp;

const DEFAULT_CONFIG: &str = r#"{
    "entity_id": "sensor.outdoor",
    "value_delta": 0.25,
    "precision": 1,
    "average_interval": "00:02:00",
    "update_interval": "00:15:00"
}"#;

struct Trace {
    states: HashMap<String, SourceState>,
}

impl StateSource for Trace {
    type Error = String;

    fn current_state(&self, entity_id: &str) -> Result<Option<SourceState>, String> {
        Ok(self.states.get(entity_id).cloned())
    }
}

struct Console;

impl StatePublisher for Console {
    fn publish(&mut self, update: &StateUpdate<'_>) {
        println!(
            "   {:>9} → {} {}",
            update.last_update.to_string(),
            update.value,
            update.unit_of_measurement.unwrap_or("")
        );
    }
}

/// Split a `<seconds> <state>` line. Timestamps must be finite, non-negative
/// and fit a `Duration`.
fn parse_line(line: &str) -> Option<(Timestamp, &str)> {
    let mut fields = line.split_whitespace();
    let secs = fields.next()?.parse::<f64>().ok()?;
    let state = fields.next()?;
    let elapsed = Duration::try_from_secs_f64(secs).ok()?;

    Some((Timestamp::from_duration(elapsed), state))
}

fn main() {
    env_logger::init();

    let config_text = match std::env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path).unwrap_or_else(|err| {
            eprintln!("cannot read {}: {}", path, err);
            std::process::exit(1);
        }),
        None => DEFAULT_CONFIG.to_owned(),
    };

    let config: SensorConfig = serde_json::from_str(&config_text).unwrap_or_else(|err| {
        eprintln!("invalid config: {}", err);
        std::process::exit(1);
    });

    let mut sensor = DenoiseSensor::new(&config, TemperatureUnit::Celsius).unwrap_or_else(|err| {
        eprintln!("invalid config: {}", err);
        std::process::exit(1);
    });

    println!("=== denoise replay: {} ← {} ===\n", sensor.name(), config.entity_id);

    let mut trace = Trace {
        states: HashMap::new(),
    };
    let mut console = Console;
    let (mut ticks, mut published) = (0, 0);

    for line in io::stdin().lock().lines() {
        let Ok(line) = line else { break };
        let Some((now, state)) = parse_line(&line) else {
            if !line.trim().is_empty() {
                log::warn!("skipping malformed line: {}", line);
            }
            continue;
        };

        trace.states.insert(
            config.entity_id.clone(),
            SourceState::new(config.entity_id.as_str(), state)
                .with_attribute("unit_of_measurement", "°C"),
        );

        ticks += 1;
        if let TickOutcome::Published(_) = sensor.tick(now, &trace, &mut console) {
            published += 1;
        }
    }

    println!("\n{} ticks, {} published", ticks, published);
}
