//! The habitat's breathable air.

use super::resource::AirComponent;
use crate::types::Units;
use serde::{Deserialize, Serialize};

/// Target oxygen share when topping up the air, in percent.
pub const TARGET_O2_PERCENT: Units = 21;

/// Air quality tiers, worst first so `Ord` reads naturally
/// (`quality <= AirQuality::Medium`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum AirQuality {
    Lethal,
    Bad,
    Medium,
    Good,
    Great,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AirComposition {
    pub o2: Units,
    pub co2: Units,
    pub n2: Units,
    pub h2: Units,
    pub h2o: Units,
    pub ch4: Units,
}

impl AirComposition {
    /// Earth-like mix for a given volume: 21% o2, the rest n2.
    pub fn breathable(volume: Units) -> Self {
        let o2 = volume * TARGET_O2_PERCENT / 100;
        Self {
            o2,
            n2: volume - o2,
            ..Self::default()
        }
    }

    pub fn volume(&self) -> Units {
        self.o2 + self.co2 + self.n2 + self.h2 + self.h2o + self.ch4
    }

    pub fn get(&self, component: AirComponent) -> Units {
        match component {
            AirComponent::Oxygen => self.o2,
            AirComponent::CarbonDioxide => self.co2,
            AirComponent::Nitrogen => self.n2,
            AirComponent::Hydrogen => self.h2,
            AirComponent::Vapor => self.h2o,
            AirComponent::Methane => self.ch4,
        }
    }

    fn slot(&mut self, component: AirComponent) -> &mut Units {
        match component {
            AirComponent::Oxygen => &mut self.o2,
            AirComponent::CarbonDioxide => &mut self.co2,
            AirComponent::Nitrogen => &mut self.n2,
            AirComponent::Hydrogen => &mut self.h2,
            AirComponent::Vapor => &mut self.h2o,
            AirComponent::Methane => &mut self.ch4,
        }
    }

    /// Air has no capacity; everything added is kept.
    pub fn add(&mut self, component: AirComponent, amount: Units) {
        if amount > 0 {
            *self.slot(component) += amount;
        }
    }

    /// Remove up to `amount`. Returns what was actually removed.
    pub fn remove(&mut self, component: AirComponent, amount: Units) -> Units {
        if amount <= 0 {
            return 0;
        }
        let slot = self.slot(component);
        let taken = amount.min(*slot);
        *slot -= taken;
        taken
    }

    /// Pour mixed "air" (as stored in Air tanks) into the composition.
    pub fn add_mixed_air(&mut self, amount: Units) {
        if amount <= 0 {
            return;
        }
        let o2 = amount * TARGET_O2_PERCENT / 100;
        self.o2 += o2;
        self.n2 += amount - o2;
    }

    pub fn quality(&self) -> AirQuality {
        let volume = self.volume();
        if volume == 0 {
            return AirQuality::Lethal;
        }
        let o2_pct = self.o2 * 100 / volume;
        // co2 compared against whole percents without truncation
        let co2_hundred = self.co2 * 100;

        if o2_pct >= 20 && co2_hundred < volume {
            AirQuality::Great
        } else if o2_pct >= 18 && co2_hundred < 2 * volume {
            AirQuality::Good
        } else if o2_pct >= 16 && co2_hundred < 4 * volume {
            AirQuality::Medium
        } else if o2_pct >= 10 && co2_hundred < 6 * volume {
            AirQuality::Bad
        } else {
            AirQuality::Lethal
        }
    }

    /// Oxygen to add so that o2 reaches 21% of the resulting volume.
    pub fn oxygen_deficit(&self) -> Units {
        let volume = self.volume();
        let shortfall = TARGET_O2_PERCENT * volume - 100 * self.o2;
        if shortfall <= 0 {
            return 0;
        }
        let headroom = 100 - TARGET_O2_PERCENT;
        (shortfall + headroom - 1) / headroom
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breathable_air_is_great() {
        let air = AirComposition::breathable(1000);
        assert_eq!(air.volume(), 1000);
        assert_eq!(air.quality(), AirQuality::Great);
        assert_eq!(air.oxygen_deficit(), 0);
    }

    #[test]
    fn empty_air_is_lethal() {
        assert_eq!(AirComposition::default().quality(), AirQuality::Lethal);
    }

    #[test]
    fn quality_tiers_follow_oxygen_share() {
        let mk = |o2, n2| AirComposition { o2, n2, ..Default::default() };
        assert_eq!(mk(190, 810).quality(), AirQuality::Good);
        assert_eq!(mk(170, 830).quality(), AirQuality::Medium);
        assert_eq!(mk(120, 880).quality(), AirQuality::Bad);
        assert_eq!(mk(50, 950).quality(), AirQuality::Lethal);
    }

    #[test]
    fn carbon_dioxide_degrades_quality() {
        let air = AirComposition { o2: 210, co2: 50, n2: 740, ..Default::default() };
        assert_eq!(air.quality(), AirQuality::Bad);
    }

    #[test]
    fn deficit_reaches_target_share() {
        let mut air = AirComposition { o2: 100, n2: 900, ..Default::default() };
        let deficit = air.oxygen_deficit();
        air.add(AirComponent::Oxygen, deficit);
        assert!(air.o2 * 100 >= TARGET_O2_PERCENT * air.volume());
        // One unit less would not be enough.
        air.remove(AirComponent::Oxygen, 1);
        assert!(air.o2 * 100 < TARGET_O2_PERCENT * air.volume());
    }

    #[test]
    fn remove_never_goes_negative() {
        let mut air = AirComposition { o2: 3, ..Default::default() };
        assert_eq!(air.remove(AirComponent::Oxygen, 10), 3);
        assert_eq!(air.o2, 0);
    }
}
