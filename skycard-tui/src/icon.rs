//! Condition-label → icon mapping for the weather card.

use ratatui::style::Color;

/// Icon shown next to the location heading, selected from the provider's
/// primary condition label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConditionIcon {
    Cloudy,
    Haze,
    Rainy,
    Sunny,
    Drizzle,
    Snow,
    Thunder,
    Mist,
    /// Fallback for condition labels the table doesn't know.
    Warning,
}

impl ConditionIcon {
    /// Fixed lookup table. Unrecognized labels ("Tornado", "Sand", ...)
    /// map to the warning icon.
    pub fn for_condition(label: &str) -> Self {
        match label {
            "Clouds" => Self::Cloudy,
            "Haze" => Self::Haze,
            "Rain" => Self::Rainy,
            "Clear" => Self::Sunny,
            "Drizzle" => Self::Drizzle,
            "Snow" => Self::Snow,
            "Thunderstorm" => Self::Thunder,
            "Mist" => Self::Mist,
            _ => Self::Warning,
        }
    }

    pub fn glyph(self) -> &'static str {
        match self {
            Self::Cloudy => "☁",
            Self::Haze => "≋",
            Self::Rainy => "🌧",
            Self::Sunny => "☀",
            Self::Drizzle => "🌦",
            Self::Snow => "❄",
            Self::Thunder => "🌩",
            Self::Mist => "🌫",
            Self::Warning => "⚠",
        }
    }

    pub fn color(self) -> Color {
        match self {
            Self::Rainy | Self::Drizzle | Self::Snow => Color::Cyan,
            Self::Sunny => Color::Yellow,
            Self::Warning => Color::Red,
            Self::Cloudy | Self::Haze | Self::Thunder | Self::Mist => Color::White,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_labels_map_to_their_icons() {
        assert_eq!(ConditionIcon::for_condition("Clouds"), ConditionIcon::Cloudy);
        assert_eq!(ConditionIcon::for_condition("Haze"), ConditionIcon::Haze);
        assert_eq!(ConditionIcon::for_condition("Rain"), ConditionIcon::Rainy);
        assert_eq!(ConditionIcon::for_condition("Clear"), ConditionIcon::Sunny);
        assert_eq!(ConditionIcon::for_condition("Drizzle"), ConditionIcon::Drizzle);
        assert_eq!(ConditionIcon::for_condition("Snow"), ConditionIcon::Snow);
        assert_eq!(ConditionIcon::for_condition("Mist"), ConditionIcon::Mist);
    }

    // Thunderstorm must never fall through to the mist icon.
    #[test]
    fn thunderstorm_maps_to_thunder_not_mist() {
        assert_eq!(
            ConditionIcon::for_condition("Thunderstorm"),
            ConditionIcon::Thunder
        );
    }

    #[test]
    fn unknown_labels_fall_back_to_warning() {
        assert_eq!(ConditionIcon::for_condition("Tornado"), ConditionIcon::Warning);
        assert_eq!(ConditionIcon::for_condition(""), ConditionIcon::Warning);
        // Matching is case-sensitive, as the provider emits capitalized labels.
        assert_eq!(ConditionIcon::for_condition("clear"), ConditionIcon::Warning);
    }
}
