mod common;

use common::{FakeSource, Recorder};
use denoise_sensor::sensor::{
    DenoiseSensor, SensorConfig, SourceState, TemperatureUnit, TickOutcome, TimePeriod,
};
use denoise_sensor::{PublishReason, PublishedValue, TickError, Timestamp};

fn secs(s: u64) -> Timestamp {
    Timestamp::from_secs(s)
}

fn sensor(entity_id: &str) -> DenoiseSensor {
    common::init_logger();
    let mut config = SensorConfig::new(entity_id);
    config.name = "Outdoor denoised".into();
    config.unique_id = Some("outdoor_denoised".into());
    config.value_delta = 0.5;
    DenoiseSensor::new(&config, TemperatureUnit::Celsius).expect("Valid config")
}

#[test]
fn test_publishes_first_reading_with_identity() {
    let mut sensor = sensor("sensor.outdoor");
    let mut source = FakeSource::default();
    let mut recorder = Recorder::default();

    source.set(SourceState::new("sensor.outdoor", "21.34").with_attribute("unit_of_measurement", "°C"));

    let outcome = sensor.tick(secs(0), &source, &mut recorder);
    assert_eq!(outcome, TickOutcome::Published(PublishReason::FirstObservation));

    let update = recorder.last();
    assert_eq!(update.name, "Outdoor denoised");
    assert_eq!(update.unique_id.as_deref(), Some("outdoor_denoised"));
    assert_eq!(update.value, PublishedValue::Value(21.3));
    assert_eq!(update.last_update, secs(0));
    assert!(update.force_update);
    assert!(sensor.available());
}

#[test]
fn test_small_changes_are_not_published() {
    let mut sensor = sensor("sensor.outdoor");
    let mut source = FakeSource::default();
    let mut recorder = Recorder::default();

    for (t, raw) in [(0, "20.0"), (30, "20.2"), (60, "19.8"), (90, "20.6")] {
        source.set(SourceState::new("sensor.outdoor", raw));
        sensor.tick(secs(t), &source, &mut recorder);
    }

    let values: Vec<_> = recorder.updates.iter().map(|u| u.value).collect();
    assert_eq!(
        values,
        vec![PublishedValue::Value(20.0), PublishedValue::Value(20.6)]
    );
}

#[test]
fn test_fahrenheit_source_converted_to_host_unit() {
    let mut sensor = sensor("sensor.attic");
    let mut source = FakeSource::default();
    let mut recorder = Recorder::default();

    source.set(SourceState::new("sensor.attic", "212").with_attribute("unit_of_measurement", "°F"));
    sensor.tick(secs(0), &source, &mut recorder);

    assert_eq!(sensor.value(), Some(100.0));
    assert_eq!(sensor.unit_of_measurement(), Some("°C"));
    assert_eq!(sensor.device_class(), Some("temperature"));
    assert_eq!(sensor.icon(), Some("mdi:thermometer"));

    let update = recorder.last();
    assert_eq!(update.unit_of_measurement.as_deref(), Some("°C"));
    assert_eq!(update.device_class.as_deref(), Some("temperature"));
}

#[test]
fn test_weather_source_reads_temperature_attribute() {
    let mut sensor = sensor("weather.home");
    let mut source = FakeSource::default();
    let mut recorder = Recorder::default();

    source.set(SourceState::new("weather.home", "sunny").with_attribute("temperature", "14.2"));
    sensor.tick(secs(0), &source, &mut recorder);

    assert_eq!(sensor.value(), Some(14.2));
    assert_eq!(sensor.unit_of_measurement(), Some("°C"));
}

#[test]
fn test_climate_source_reads_current_temperature() {
    let mut config = SensorConfig::new("climate.living_room");
    config.precision = 0;
    let mut sensor =
        DenoiseSensor::new(&config, TemperatureUnit::Fahrenheit).expect("Valid config");
    let mut source = FakeSource::default();
    let mut recorder = Recorder::default();

    source.set(
        SourceState::new("climate.living_room", "heat")
            .with_attribute("temperature", "75")
            .with_attribute("current_temperature", "71.6"),
    );
    sensor.tick(secs(0), &source, &mut recorder);

    // Climate sources are taken to be in the host unit already
    assert_eq!(sensor.value(), Some(72.0));
    assert_eq!(sensor.unit_of_measurement(), Some("°F"));
}

#[test]
fn test_non_temperature_source_keeps_presentation() {
    let mut sensor = sensor("sensor.bathroom_humidity");
    let mut source = FakeSource::default();
    let mut recorder = Recorder::default();

    source.set(
        SourceState::new("sensor.bathroom_humidity", "55.25")
            .with_attribute("unit_of_measurement", "%")
            .with_attribute("device_class", "humidity")
            .with_attribute("icon", "mdi:water-percent"),
    );
    sensor.tick(secs(0), &source, &mut recorder);

    // 552.5 is a tie, 552 is even
    assert_eq!(sensor.value(), Some(55.2));
    assert_eq!(sensor.unit_of_measurement(), Some("%"));
    assert_eq!(sensor.device_class(), Some("humidity"));
    assert_eq!(sensor.icon(), Some("mdi:water-percent"));
}

#[test]
fn test_placeholder_states_are_unavailable() {
    for placeholder in ["unavailable", "unknown", "None"] {
        let mut sensor = sensor("sensor.outdoor");
        let mut source = FakeSource::default();
        let mut recorder = Recorder::default();

        source.set(SourceState::new("sensor.outdoor", "20.0"));
        sensor.tick(secs(0), &source, &mut recorder);

        source.set(SourceState::new("sensor.outdoor", placeholder));
        let outcome = sensor.tick(secs(30), &source, &mut recorder);

        assert_eq!(outcome, TickOutcome::Published(PublishReason::Unavailable));
        assert_eq!(recorder.last().value, PublishedValue::Unavailable);
        assert!(!sensor.available());
    }
}

#[test]
fn test_unparseable_state_is_unavailable() {
    let mut sensor = sensor("sensor.outdoor");
    let mut source = FakeSource::default();
    let mut recorder = Recorder::default();

    source.set(SourceState::new("sensor.outdoor", "warm"));
    let outcome = sensor.tick(secs(0), &source, &mut recorder);

    assert_eq!(outcome, TickOutcome::Published(PublishReason::Unavailable));
    assert!(!sensor.available());
}

#[test]
fn test_missing_entity_stays_unavailable() {
    let mut sensor = sensor("sensor.gone");
    let source = FakeSource::default();
    let mut recorder = Recorder::default();

    assert_eq!(
        sensor.tick(secs(0), &source, &mut recorder),
        TickOutcome::Published(PublishReason::Unavailable)
    );
    for t in 1..10 {
        assert_eq!(
            sensor.tick(secs(t * 30), &source, &mut recorder),
            TickOutcome::Published(PublishReason::StillUnavailable)
        );
        assert_eq!(recorder.last().last_update, secs(t * 30));
    }

    assert_eq!(recorder.updates.len(), 10);
    assert!(recorder.updates.iter().all(|u| u.value == PublishedValue::Unavailable));
    assert!(!sensor.available());
    assert_eq!(sensor.unit_of_measurement(), None);
}

#[test]
fn test_transient_read_failure_skips_tick() {
    let mut sensor = sensor("sensor.outdoor");
    let mut source = FakeSource::default();
    let mut recorder = Recorder::default();

    source.set(SourceState::new("sensor.outdoor", "20.0"));
    sensor.tick(secs(0), &source, &mut recorder);

    source.failing = true;
    assert_eq!(sensor.tick(secs(30), &source, &mut recorder), TickOutcome::Skipped);
    assert_eq!(sensor.value(), Some(20.0));
    assert_eq!(sensor.last_update(), Some(secs(0)));
    assert_eq!(recorder.updates.len(), 1);

    source.failing = false;
    source.set(SourceState::new("sensor.outdoor", "25.0"));
    assert_eq!(
        sensor.tick(secs(60), &source, &mut recorder),
        TickOutcome::Published(PublishReason::ValueChanged)
    );
}

#[test]
fn test_failed_tick_keeps_previous_state() {
    let mut sensor = sensor("sensor.outdoor");
    let mut source = FakeSource::default();
    let mut recorder = Recorder::default();

    source.set(SourceState::new("sensor.outdoor", "20.0"));
    sensor.tick(secs(0), &source, &mut recorder);

    source.set(SourceState::new("sensor.outdoor", "inf"));
    let outcome = sensor.tick(secs(30), &source, &mut recorder);

    assert!(matches!(outcome, TickOutcome::Failed(TickError::NonFiniteReading(_))));
    assert_eq!(sensor.value(), Some(20.0));
    assert_eq!(recorder.updates.len(), 1);
}

#[test]
fn test_staleness_republishes_unchanged_value() {
    let mut config = SensorConfig::new("sensor.outdoor");
    config.value_delta = 1.0;
    config.update_interval = Some(TimePeriod::from("00:10:00"));
    let mut sensor = DenoiseSensor::new(&config, TemperatureUnit::Celsius).expect("Valid config");
    let mut source = FakeSource::default();
    let mut recorder = Recorder::default();

    source.set(SourceState::new("sensor.outdoor", "18.0"));
    for minute in 0..=20 {
        sensor.tick(secs(minute * 60), &source, &mut recorder);
    }

    let stamps: Vec<_> = recorder.updates.iter().map(|u| u.last_update).collect();
    assert_eq!(stamps, vec![secs(0), secs(600), secs(1200)]);
    assert!(recorder.updates.iter().all(|u| u.value == PublishedValue::Value(18.0)));
}

#[test]
fn test_averaging_through_sensor() {
    let mut config = SensorConfig::new("sensor.outdoor");
    config.average_interval = Some(TimePeriod::Seconds(120.0));
    config.scan_interval = Some(60);
    let mut sensor = DenoiseSensor::new(&config, TemperatureUnit::Celsius).expect("Valid config");
    let mut source = FakeSource::default();
    let mut recorder = Recorder::default();

    assert_eq!(sensor.scan_interval(), Some(std::time::Duration::from_secs(60)));

    for (t, raw) in [(0, "10"), (60, "20"), (120, "30"), (180, "40")] {
        source.set(SourceState::new("sensor.outdoor", raw));
        sensor.tick(secs(t), &source, &mut recorder);
    }

    // Last window: 60, 120, 180 -> (20 + 30 + 40) / 3
    assert_eq!(sensor.value(), Some(30.0));
    assert_eq!(sensor.filter().window_len(), 3);
}
