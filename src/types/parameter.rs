//! Defines the physical parameters requested from the observation archive.

use crate::types::dimension::Dimensions;
use std::fmt;

/// A physical parameter of the NASA POWER hourly point archive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Parameter {
    /// Air temperature at 2 m, in °C.
    Temperature,
    /// Bias-corrected precipitation, in mm/h.
    Precipitation,
    /// Wind speed at 2 m, in m/s.
    WindSpeed,
    /// Relative humidity at 2 m, in %.
    RelativeHumidity,
    /// All-sky surface shortwave irradiance, in Wh/m² per hour.
    SolarRadiation,
    /// All-sky clearness index, 0 to 1.
    Clearness,
}

impl Parameter {
    pub const ALL: [Parameter; 6] = [
        Parameter::Temperature,
        Parameter::Precipitation,
        Parameter::WindSpeed,
        Parameter::RelativeHumidity,
        Parameter::SolarRadiation,
        Parameter::Clearness,
    ];

    /// The identifier used by the archive, e.g. `T2M`.
    pub fn code(self) -> &'static str {
        match self {
            Parameter::Temperature => "T2M",
            Parameter::Precipitation => "PRECTOTCORR",
            Parameter::WindSpeed => "WS2M",
            Parameter::RelativeHumidity => "RH2M",
            Parameter::SolarRadiation => "ALLSKY_SFC_SW_DWN",
            Parameter::Clearness => "ALLSKY_KT",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Parameter::ALL.into_iter().find(|p| p.code() == code)
    }

    /// The exact set of parameters needed to evaluate `dimensions`.
    ///
    /// Solar parameters are only added when `include_solar` is set; they feed the
    /// UV proxy and clearness figures of the derived summary.
    pub fn for_request(dimensions: Dimensions, include_solar: bool) -> Vec<Parameter> {
        let mut parameters = Vec::with_capacity(6);
        if dimensions.contains(Dimensions::TEMPERATURE) {
            parameters.push(Parameter::Temperature);
        }
        if dimensions.contains(Dimensions::RAIN) {
            parameters.push(Parameter::Precipitation);
        }
        if dimensions.contains(Dimensions::WIND) {
            parameters.push(Parameter::WindSpeed);
        }
        if dimensions.contains(Dimensions::HUMIDITY) {
            parameters.push(Parameter::RelativeHumidity);
        }
        if include_solar {
            parameters.push(Parameter::SolarRadiation);
            parameters.push(Parameter::Clearness);
        }
        parameters
    }

    /// Comma separated codes, as the archive expects them.
    pub(crate) fn join_codes(parameters: &[Parameter]) -> String {
        parameters
            .iter()
            .map(|p| p.code())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_request_is_exact_union() {
        let parameters = Parameter::for_request(Dimensions::TEMPERATURE | Dimensions::WIND, false);
        assert_eq!(parameters, vec![Parameter::Temperature, Parameter::WindSpeed]);

        let parameters = Parameter::for_request(Dimensions::ALL, false);
        assert_eq!(
            Parameter::join_codes(&parameters),
            "T2M,PRECTOTCORR,WS2M,RH2M"
        );

        let parameters = Parameter::for_request(Dimensions::RAIN, true);
        assert_eq!(
            Parameter::join_codes(&parameters),
            "PRECTOTCORR,ALLSKY_SFC_SW_DWN,ALLSKY_KT"
        );
    }

    #[test]
    fn test_code_round_trip() {
        for parameter in Parameter::ALL {
            assert_eq!(Parameter::from_code(parameter.code()), Some(parameter));
        }
        assert_eq!(Parameter::from_code("T10M"), None);
    }
}
