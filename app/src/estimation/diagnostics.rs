use crate::core::unit::EfficiencyIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsulationClass {
    Optimal,
    ElevatedLosses,
    LeakOrVentilation,
    Critical,
}

impl InsulationClass {
    pub fn code(&self) -> &'static str {
        match self {
            InsulationClass::Optimal => "optimal",
            InsulationClass::ElevatedLosses => "elevated_losses",
            InsulationClass::LeakOrVentilation => "leak_or_ventilation",
            InsulationClass::Critical => "critical",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InsulationDeviation {
    pub deviation: f64,
    pub class: InsulationClass,
}

impl InsulationDeviation {
    pub fn new(learned: EfficiencyIndex, insulation_factor: f64) -> Self {
        let deviation = ((learned.0 - insulation_factor) * 1000.0).round() / 1000.0;

        let class = match deviation {
            d if d <= 0.05 => InsulationClass::Optimal,
            d if d <= 0.2 => InsulationClass::ElevatedLosses,
            d if d <= 0.5 => InsulationClass::LeakOrVentilation,
            _ => InsulationClass::Critical,
        };

        Self { deviation, class }
    }
}
