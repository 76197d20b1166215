/// Temperature units a source may report in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol.trim() {
            "°C" => Some(TemperatureUnit::Celsius),
            "°F" => Some(TemperatureUnit::Fahrenheit),
            "K" => Some(TemperatureUnit::Kelvin),
            _ => None,
        }
    }

    pub const fn symbol(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        }
    }

    /// Convert `value` expressed in `self` into `target`.
    pub fn convert(&self, value: f64, target: TemperatureUnit) -> f64 {
        if *self == target {
            return value;
        }

        let celsius = match self {
            TemperatureUnit::Celsius => value,
            TemperatureUnit::Fahrenheit => (value - 32.0) / 1.8,
            TemperatureUnit::Kelvin => value - 273.15,
        };

        match target {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius * 1.8 + 32.0,
            TemperatureUnit::Kelvin => celsius + 273.15,
        }
    }
}
