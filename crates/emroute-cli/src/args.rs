//! Shared command-line argument types.

use std::fmt;
use std::str::FromStr;

use clap::Args;
use emroute_lib::{EmergencySession, GeoPoint};

/// One `--damage LAT,LON[,RADIUS_M]` circle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageSpec {
    pub center: GeoPoint,
    /// Falls back to the configured default radius when omitted.
    pub radius_m: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseDamageSpecError(String);

impl fmt::Display for ParseDamageSpecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected 'lat,lon[,radius_m]' but got '{}'", self.0)
    }
}

impl std::error::Error for ParseDamageSpecError {}

impl FromStr for DamageSpec {
    type Err = ParseDamageSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseDamageSpecError(s.to_string());
        let parts: Vec<&str> = s.split(',').map(str::trim).collect();
        let (point, radius) = match parts.as_slice() {
            [lat, lon] => (format!("{lat},{lon}"), None),
            [lat, lon, radius] => (format!("{lat},{lon}"), Some(*radius)),
            _ => return Err(err()),
        };
        let center: GeoPoint = point.parse().map_err(|_| err())?;
        let radius_m = match radius {
            Some(value) => {
                let radius: f64 = value.parse().map_err(|_| err())?;
                if !(radius.is_finite() && radius >= 0.0) {
                    return Err(err());
                }
                Some(radius)
            }
            None => None,
        };
        Ok(Self { center, radius_m })
    }
}

/// Damage options shared by `route` and `compare`.
#[derive(Args, Debug, Clone, Default)]
pub struct DamageArgs {
    /// Block roads within a circle; repeatable.
    #[arg(long = "damage", value_name = "LAT,LON[,RADIUS_M]", allow_hyphen_values = true)]
    pub damage: Vec<DamageSpec>,

    /// Scatter this many random debris pockets before routing.
    #[arg(long, value_name = "COUNT")]
    pub simulate: Option<usize>,

    /// Seed for `--simulate`.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

impl DamageArgs {
    /// Apply the requested damage to the session. Returns the number of
    /// damage events recorded.
    pub fn apply(&self, session: &mut EmergencySession) -> emroute_lib::Result<usize> {
        let mut events = 0;
        for spec in &self.damage {
            session.apply_damage_at(spec.center, spec.radius_m)?;
            events += 1;
        }
        if let Some(count) = self.simulate {
            events += session.simulate_disaster(count, self.seed)?.len();
        }
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_with_and_without_radius() {
        let spec: DamageSpec = "-0.18, -78.48, 25".parse().unwrap();
        assert_eq!(spec.center, GeoPoint::new(-0.18, -78.48));
        assert_eq!(spec.radius_m, Some(25.0));

        let spec: DamageSpec = "1.5,2.5".parse().unwrap();
        assert_eq!(spec.radius_m, None);
    }

    #[test]
    fn rejects_malformed_specs() {
        for bad in ["", "1.0", "1,2,3,4", "a,b", "1,2,-5", "1,2,nan"] {
            assert!(bad.parse::<DamageSpec>().is_err(), "accepted {bad:?}");
        }
    }
}
