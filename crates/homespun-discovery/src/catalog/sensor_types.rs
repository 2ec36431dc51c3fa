//! The `sensor-types` module: the shared table of sensor reading fields.
//!
//! Observers and subscribers translate device reports into named fields
//! (`temperature`, `co2`, `motion_detected`, ...). This table describes each
//! field's value type, units, plausible domain, and the readings worth
//! surfacing, so every plugin interprets a field the same way. Install it by
//! dropping `utilities/utility-sensortypes.toml` containing
//! `module = "sensor-types"` into the plugin root.

use std::sync::Arc;

use serde::Serialize;
use serde_json::Map;

use crate::catalog::{ModuleError, ModuleSource};
use crate::plugin::{Exports, Plugin};

/// Identifier of this module in the catalog.
pub const MODULE_ID: &str = "sensor-types";

/// Kind of value a sensor field carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueType {
    /// Real-valued measurement.
    Float,
    /// Fraction in `0.0..=1.0`.
    Percentage,
    /// On/off state.
    Boolean,
    /// Four-component value such as a coordinate fix.
    Quad,
}

/// Plausible measurement range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Domain {
    /// Inclusive lower bound.
    pub lower: f64,
    /// Inclusive upper bound.
    pub upper: f64,
}

/// Comparison applied by a [`Threshold`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Operator {
    /// Reading is notable above the value.
    #[serde(rename = ">")]
    Above,
    /// Reading is notable below the value.
    #[serde(rename = "<")]
    Below,
}

/// A bound beyond which a reading is notable.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Threshold {
    /// Direction of the comparison.
    pub operator: Operator,
    /// Boundary value.
    pub value: f64,
}

impl Threshold {
    const fn above(value: f64) -> Self {
        Self {
            operator: Operator::Above,
            value,
        }
    }

    const fn below(value: f64) -> Self {
        Self {
            operator: Operator::Below,
            value,
        }
    }
}

/// Which readings of a field are worth reporting.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readings {
    /// The field is informational only.
    None,
    /// Any change of state is notable.
    AnyChange,
    /// Only a transition to `true` is notable.
    WhenTrue,
    /// Values crossing any of these thresholds are notable.
    Thresholds(&'static [Threshold]),
}

/// Whether readings of a field may be combined across devices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Aggregate {
    /// Readings from several devices may be merged.
    #[default]
    Combine,
    /// Each device's reading stands alone (battery charge, signal strength).
    None,
}

impl Aggregate {
    const fn is_combine(&self) -> bool {
        matches!(self, Self::Combine)
    }
}

impl Readings {
    const fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }
}

/// Description of one sensor field.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SensorType {
    field: &'static str,
    #[serde(rename = "type")]
    value_type: ValueType,
    #[serde(skip_serializing_if = "Option::is_none")]
    units: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    abbrev: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    domain: Option<Domain>,
    #[serde(skip_serializing_if = "Readings::is_none")]
    readings: Readings,
    #[serde(skip_serializing_if = "Aggregate::is_combine")]
    aggregate: Aggregate,
}

impl SensorType {
    const fn new(field: &'static str, value_type: ValueType, units: Option<&'static str>) -> Self {
        Self {
            field,
            value_type,
            units,
            name: None,
            abbrev: None,
            domain: None,
            readings: Readings::None,
            aggregate: Aggregate::Combine,
        }
    }

    const fn float(field: &'static str, units: &'static str) -> Self {
        Self::new(field, ValueType::Float, Some(units))
    }

    const fn percentage(field: &'static str) -> Self {
        Self::new(field, ValueType::Percentage, None)
    }

    const fn boolean(field: &'static str) -> Self {
        Self::new(field, ValueType::Boolean, None)
    }

    const fn named(self, name: &'static str) -> Self {
        Self {
            name: Some(name),
            ..self
        }
    }

    const fn abbreviated(self, abbrev: &'static str) -> Self {
        Self {
            abbrev: Some(abbrev),
            ..self
        }
    }

    const fn bounded(self, lower: f64, upper: f64) -> Self {
        Self {
            domain: Some(Domain { lower, upper }),
            ..self
        }
    }

    const fn notable(self, readings: Readings) -> Self {
        Self { readings, ..self }
    }

    const fn per_device(self) -> Self {
        Self {
            aggregate: Aggregate::None,
            ..self
        }
    }

    const fn sigma(field: &'static str) -> Self {
        Self::float(field, "sigmas")
    }

    /// Returns the field name reported by devices.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the value type.
    #[must_use]
    pub const fn value_type(&self) -> ValueType {
        self.value_type
    }

    /// Returns the measurement units.
    #[must_use]
    pub const fn units(&self) -> Option<&'static str> {
        self.units
    }

    /// Returns the display name, when it differs from the field.
    #[must_use]
    pub const fn name(&self) -> Option<&'static str> {
        self.name
    }

    /// Returns the unit abbreviation.
    #[must_use]
    pub const fn abbrev(&self) -> Option<&'static str> {
        self.abbrev
    }

    /// Returns the plausible range.
    #[must_use]
    pub const fn domain(&self) -> Option<Domain> {
        self.domain
    }

    /// Returns which readings are notable.
    #[must_use]
    pub const fn readings(&self) -> Readings {
        self.readings
    }

    /// Returns whether readings may be combined across devices.
    #[must_use]
    pub const fn aggregate(&self) -> Aggregate {
        self.aggregate
    }
}

const AQI_READINGS: &[Threshold] = &[Threshold::below(0.11), Threshold::above(0.19)];
const CO_READINGS: &[Threshold] = &[Threshold::above(5.0)];
const CO2_READINGS: &[Threshold] = &[Threshold::above(5000.0)];
const HUMIDITY_READINGS: &[Threshold] = &[Threshold::below(0.45), Threshold::above(0.55)];
const NO2_READINGS: &[Threshold] = &[Threshold::above(5.0)];
const NOISE_READINGS: &[Threshold] = &[Threshold::above(60.0)];
const O3_READINGS: &[Threshold] = &[Threshold::above(100.0)];
const PARTICLES_READINGS: &[Threshold] = &[Threshold::above(2.5)];
const SO2_READINGS: &[Threshold] = &[Threshold::above(5000.0)];
const TEMPERATURE_READINGS: &[Threshold] = &[Threshold::below(10.0), Threshold::above(35.0)];
const VOC_READINGS: &[Threshold] = &[Threshold::above(1.0)];

/// Every known sensor field, sorted by the bytes of the field name.
///
/// The `.σ` fields carry the deviation of a raw gas sensor from its baseline.
pub const SENSOR_TYPES: &[SensorType] = &[
    SensorType::float("airflow", "meters/second").bounded(0.0, 135.0),
    SensorType::float("altitude", "meters").bounded(-130.0, 10870.0),
    SensorType::percentage("aqi")
        .named("AQ index")
        .notable(Readings::Thresholds(AQI_READINGS)),
    SensorType::sigma("aqi.\u{3c3}"),
    SensorType::percentage("battery_level").per_device(),
    SensorType::boolean("battery_low"),
    SensorType::percentage("brightness"),
    SensorType::float("co", "ppm")
        .named("CO")
        .bounded(0.0, 200.0)
        .notable(Readings::Thresholds(CO_READINGS)),
    SensorType::sigma("co.\u{3c3}"),
    SensorType::float("co2", "ppm")
        .named("CO\u{2082}")
        .bounded(0.0, 15000.0)
        .notable(Readings::Thresholds(CO2_READINGS)),
    SensorType::sigma("co2.\u{3c3}"),
    SensorType::boolean("contact").notable(Readings::AnyChange),
    SensorType::float("distance", "meters").bounded(0.0, 50000.0),
    SensorType::boolean("flame_detected").notable(Readings::AnyChange),
    SensorType::boolean("floodlight").notable(Readings::AnyChange),
    SensorType::sigma("flow.\u{3c3}"),
    SensorType::sigma("gas.\u{3c3}"),
    SensorType::float("gustheading", "degrees").bounded(0.0, 360.0),
    SensorType::float("gustvelocity", "meters/second").bounded(0.0, 150.0),
    SensorType::float("hcho", "ppm").bounded(0.0, 20.0),
    SensorType::sigma("hcho.\u{3c3}"),
    SensorType::percentage("humidity").notable(Readings::Thresholds(HUMIDITY_READINGS)),
    SensorType::float("hydrogen", "ppm"),
    SensorType::sigma("hydrogen.\u{3c3}"),
    SensorType::float("light", "lux").abbreviated("lx"),
    SensorType::boolean("liquid_detected").notable(Readings::AnyChange),
    SensorType::new("location", ValueType::Quad, Some("coordinates")),
    SensorType::float("methane", "ppm"),
    SensorType::sigma("methane.\u{3c3}"),
    SensorType::percentage("moisture"),
    SensorType::boolean("motion_detected").notable(Readings::AnyChange),
    SensorType::float("no", "ppm").named("NO"),
    SensorType::sigma("no.\u{3c3}"),
    SensorType::float("no2", "ppm")
        .named("NO\u{2082}")
        .notable(Readings::Thresholds(NO2_READINGS)),
    SensorType::sigma("no2.\u{3c3}"),
    SensorType::float("noise", "decibels")
        .abbreviated("dB")
        .notable(Readings::Thresholds(NOISE_READINGS)),
    SensorType::float("o3", "ppb")
        .named("ozone")
        .notable(Readings::Thresholds(O3_READINGS)),
    SensorType::boolean("opened").notable(Readings::AnyChange),
    SensorType::float("pH", "pH").bounded(2.5, 10.5),
    SensorType::float("particles.2_5", "micrograms/cubicmeters")
        .named("particles \u{3bc}m")
        .abbreviated("\u{b5}g/m\u{b3}")
        .notable(Readings::Thresholds(PARTICLES_READINGS)),
    SensorType::float("particulates", "particles/cubicmeters"),
    SensorType::boolean("powered"),
    SensorType::boolean("pressed").notable(Readings::WhenTrue),
    SensorType::float("pressure", "millibars").bounded(945.0, 1081.0),
    SensorType::float("rainfall", "millimeters").bounded(0.0, 1000.0),
    SensorType::boolean("ringing").notable(Readings::AnyChange),
    SensorType::percentage("signal").per_device(),
    SensorType::float("smoke", "ppm"),
    SensorType::sigma("smoke.\u{3c3}"),
    SensorType::float("so2", "ppb")
        .named("SO\u{2082}")
        .notable(Readings::Thresholds(SO2_READINGS)),
    SensorType::percentage("sonority"),
    SensorType::boolean("tamper_detected").notable(Readings::WhenTrue),
    SensorType::float("temperature", "celsius")
        .abbreviated("\u{b0}C")
        .bounded(5.0, 45.0)
        .notable(Readings::Thresholds(TEMPERATURE_READINGS)),
    SensorType::float("uvi", "uv-index")
        .named("UV index")
        .bounded(0.0, 12.0),
    SensorType::float("vapor", "ppm"),
    SensorType::sigma("vapor.\u{3c3}"),
    SensorType::float("velocity", "meters/second").bounded(0.0, 135.0),
    SensorType::boolean("vibration").notable(Readings::AnyChange),
    SensorType::float("voc", "ppb")
        .named("Volatile Organics")
        .notable(Readings::Thresholds(VOC_READINGS)),
    SensorType::float("windheading", "degrees").bounded(0.0, 360.0),
    SensorType::float("windvelocity", "meters/second").bounded(0.0, 135.0),
];

/// Plugin exposing [`SENSOR_TYPES`].
///
/// Each field is also published in the plugin's exports under its field
/// name, so consumers that only hold the registry can read the definitions.
#[derive(Debug)]
pub struct SensorTypesPlugin {
    exports: Exports,
}

impl SensorTypesPlugin {
    /// Looks up the definition of `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&'static SensorType> {
        SENSOR_TYPES
            .binary_search_by(|sensor| sensor.field.cmp(field))
            .ok()
            .and_then(|index| SENSOR_TYPES.get(index))
    }

    /// Iterates over every known field definition.
    pub fn iter(&self) -> impl Iterator<Item = &'static SensorType> {
        SENSOR_TYPES.iter()
    }
}

impl Plugin for SensorTypesPlugin {
    fn module(&self) -> &str {
        MODULE_ID
    }

    fn exports(&self) -> &Exports {
        &self.exports
    }
}

/// Builds a [`SensorTypesPlugin`]; descriptor exports override table entries.
///
/// # Errors
///
/// Returns a [`ModuleError`] if a table entry cannot be serialised.
pub fn build(source: &ModuleSource<'_>) -> Result<Arc<dyn Plugin>, ModuleError> {
    let mut values = Map::new();
    for sensor in SENSOR_TYPES {
        let value = serde_json::to_value(sensor).map_err(|error| {
            ModuleError::new(format!("failed to serialise sensor type '{}': {error}", sensor.field))
        })?;
        values.insert(sensor.field.to_owned(), value);
    }
    for (key, value) in source.manifest().exports() {
        values.insert(key.clone(), value.clone());
    }
    Ok(Arc::new(SensorTypesPlugin {
        exports: Exports::new(values),
    }))
}
