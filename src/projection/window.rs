//! Ownership window within the fixed model horizon

use serde::{Deserialize, Serialize};

use crate::error::{ModelError, Result};

/// Number of years every projection covers
pub const HORIZON_YEARS: u32 = 10;

/// Years in which a vehicle is owned, inclusive at both ends
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawWindow")]
pub struct OwnershipWindow {
    start_year: u32,
    end_year: u32,
}

/// Unchecked field layout; deserialized windows go through `OwnershipWindow::new`
#[derive(Deserialize)]
struct RawWindow {
    start_year: u32,
    end_year: u32,
}

impl TryFrom<RawWindow> for OwnershipWindow {
    type Error = ModelError;

    fn try_from(raw: RawWindow) -> Result<Self> {
        Self::new(raw.start_year, raw.end_year)
    }
}

impl OwnershipWindow {
    /// Requires `1 <= start_year <= end_year <= HORIZON_YEARS`
    pub fn new(start_year: u32, end_year: u32) -> Result<Self> {
        if start_year < 1 || end_year > HORIZON_YEARS {
            return Err(ModelError::InvalidArgument(format!(
                "ownership window {}..{} outside model horizon 1..{}",
                start_year, end_year, HORIZON_YEARS
            )));
        }
        if start_year > end_year {
            return Err(ModelError::InvalidArgument(format!(
                "start year {} is after end year {}",
                start_year, end_year
            )));
        }
        Ok(Self { start_year, end_year })
    }

    /// Window starting at `start_year` and held for `hold_years` years
    pub fn held_for(start_year: u32, hold_years: u32) -> Result<Self> {
        if hold_years == 0 {
            return Err(ModelError::InvalidArgument("hold duration must be at least one year".to_string()));
        }
        let end_year = start_year.checked_add(hold_years - 1).ok_or_else(|| {
            ModelError::InvalidArgument(format!(
                "hold of {} years from year {} overflows the calendar",
                hold_years, start_year
            ))
        })?;
        Self::new(start_year, end_year)
    }

    /// Whether a hold of `hold_years` starting in `start_year` ends inside the horizon
    pub fn fits(start_year: u32, hold_years: u32) -> bool {
        (1..=HORIZON_YEARS).contains(&hold_years)
            && (1..=HORIZON_YEARS - hold_years + 1).contains(&start_year)
    }

    pub fn start_year(&self) -> u32 {
        self.start_year
    }

    pub fn end_year(&self) -> u32 {
        self.end_year
    }

    /// Whether the vehicle is owned during `year`
    pub fn contains(&self, year: u32) -> bool {
        (self.start_year..=self.end_year).contains(&year)
    }

    /// Hold duration in years
    pub fn hold_years(&self) -> u32 {
        self.end_year - self.start_year + 1
    }

    /// Bought used (any start after year 1)
    pub fn is_used_purchase(&self) -> bool {
        self.start_year > 1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_windows() {
        let w = OwnershipWindow::new(4, 8).unwrap();
        assert_eq!(w.hold_years(), 5);
        assert!(w.contains(4) && w.contains(8));
        assert!(!w.contains(3) && !w.contains(9));
        assert!(w.is_used_purchase());

        let single = OwnershipWindow::new(10, 10).unwrap();
        assert_eq!(single.hold_years(), 1);
    }

    #[test]
    fn test_invalid_windows() {
        assert!(matches!(OwnershipWindow::new(0, 5), Err(ModelError::InvalidArgument(_))));
        assert!(matches!(OwnershipWindow::new(3, 11), Err(ModelError::InvalidArgument(_))));
        assert!(matches!(OwnershipWindow::new(6, 5), Err(ModelError::InvalidArgument(_))));
    }

    #[test]
    fn test_held_for() {
        assert_eq!(OwnershipWindow::held_for(3, 4).unwrap(), OwnershipWindow::new(3, 6).unwrap());
        assert!(OwnershipWindow::held_for(8, 4).is_err());
        assert!(OwnershipWindow::held_for(2, 0).is_err());
    }

    #[test]
    fn test_held_for_huge_hold_is_an_error() {
        assert!(matches!(
            OwnershipWindow::held_for(2, u32::MAX),
            Err(ModelError::InvalidArgument(_))
        ));
        assert!(!OwnershipWindow::fits(2, u32::MAX));
        assert!(OwnershipWindow::fits(1, 10));
        assert!(OwnershipWindow::fits(10, 1));
        assert!(!OwnershipWindow::fits(2, 10));
        assert!(!OwnershipWindow::fits(0, 3));
        assert!(!OwnershipWindow::fits(3, 0));
    }

    #[test]
    fn test_deserialize_checks_window() {
        let w: OwnershipWindow = serde_json::from_str(r#"{"start_year":4,"end_year":8}"#).unwrap();
        assert_eq!(w, OwnershipWindow::new(4, 8).unwrap());

        assert!(serde_json::from_str::<OwnershipWindow>(r#"{"start_year":8,"end_year":4}"#).is_err());
        assert!(serde_json::from_str::<OwnershipWindow>(r#"{"start_year":1,"end_year":11}"#).is_err());
    }
}
