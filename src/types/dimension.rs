use bitflags::bitflags;

bitflags! {
    /// The weather dimensions a request asks the engine to evaluate.
    ///
    /// Each dimension can be enabled independently. Discomfort is not a dimension of
    /// its own: it is evaluated whenever both `TEMPERATURE` and `HUMIDITY` are enabled.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Dimensions: u8 {
        const TEMPERATURE = 1 << 0;
        const RAIN        = 1 << 1;
        const WIND        = 1 << 2;
        const HUMIDITY    = 1 << 3;

        const ALL = Self::TEMPERATURE.bits()
                  | Self::RAIN.bits()
                  | Self::WIND.bits()
                  | Self::HUMIDITY.bits();
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Dimensions::ALL
    }
}

impl Dimensions {
    /// Builds a selection from the four boolean switches of an inbound query.
    pub fn from_switches(temperature: bool, rain: bool, wind: bool, humidity: bool) -> Self {
        let mut dimensions = Dimensions::empty();
        dimensions.set(Dimensions::TEMPERATURE, temperature);
        dimensions.set(Dimensions::RAIN, rain);
        dimensions.set(Dimensions::WIND, wind);
        dimensions.set(Dimensions::HUMIDITY, humidity);
        dimensions
    }

    /// Whether heat index / discomfort can be evaluated.
    pub fn tracks_discomfort(self) -> bool {
        self.contains(Dimensions::TEMPERATURE | Dimensions::HUMIDITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_switches() {
        assert_eq!(Dimensions::from_switches(true, true, true, true), Dimensions::ALL);
        assert!(Dimensions::from_switches(false, false, false, false).is_empty());
        assert_eq!(
            Dimensions::from_switches(true, false, true, false),
            Dimensions::TEMPERATURE | Dimensions::WIND
        );
    }

    #[test]
    fn test_discomfort_needs_temperature_and_humidity() {
        assert!(Dimensions::ALL.tracks_discomfort());
        assert!(!Dimensions::TEMPERATURE.tracks_discomfort());
        assert!(!(Dimensions::HUMIDITY | Dimensions::RAIN).tracks_discomfort());
    }
}
