use super::error::ParameterError;

/// Knobs used when deciding whether two genomes belong to the same species.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciationParameters {
    /// Maximum genetic distance (inclusive) from a species' representative.
    pub compatibility_threshold: f64,
    pub excess_coefficient: f64,
    pub disjoint_coefficient: f64,
    pub weight_coefficient: f64,
    /// Genomes smaller than this are not normalised by their gene count.
    pub small_genome_size: usize,
    /// Generations without a new fitness highscore before a species counts as stagnant.
    pub stagnant_species_clear_threshold: usize,
}

#[derive(Clone, Debug, PartialEq)]
pub struct AdvancedParameters {
    pub speciation: SpeciationParameters,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TrainingParameters {
    pub number_of_inputs: usize,
    pub number_of_outputs: usize,
    pub updates_per_generation: usize,
    pub advanced: AdvancedParameters,
}

impl TrainingParameters {
    pub fn standard(number_of_inputs: usize, number_of_outputs: usize) -> TrainingParameters {
        TrainingParameters {
            number_of_inputs,
            number_of_outputs,
            updates_per_generation: 1,
            advanced: AdvancedParameters {
                speciation: SpeciationParameters {
                    compatibility_threshold: 3.0,
                    excess_coefficient: 1.0,
                    disjoint_coefficient: 1.0,
                    weight_coefficient: 0.4,
                    small_genome_size: 20,
                    stagnant_species_clear_threshold: 15,
                },
            },
        }
    }

    pub fn compatibility_threshold(&self) -> f64 {
        self.advanced.speciation.compatibility_threshold
    }

    pub fn validate(&self) -> Result<(), ParameterError> {
        if self.number_of_inputs == 0 {
            return Err(ParameterError::NoInputs);
        }
        if self.number_of_outputs == 0 {
            return Err(ParameterError::NoOutputs);
        }

        let speciation = &self.advanced.speciation;
        let threshold = speciation.compatibility_threshold;
        if !threshold.is_finite() || threshold < 0.0 {
            return Err(ParameterError::InvalidCompatibilityThreshold(threshold));
        }

        let coefficients = [
            ("excess", speciation.excess_coefficient),
            ("disjoint", speciation.disjoint_coefficient),
            ("weight", speciation.weight_coefficient),
        ];
        for (name, value) in coefficients {
            if !value.is_finite() || value < 0.0 {
                return Err(ParameterError::InvalidCoefficient { name, value });
            }
        }
        Ok(())
    }
}

impl Default for TrainingParameters {
    fn default() -> Self {
        TrainingParameters::standard(1, 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_parameters_are_valid() {
        let parameters = TrainingParameters::standard(3, 1);
        assert_eq!(parameters.validate(), Ok(()));
        assert_eq!(parameters.compatibility_threshold(), 3.0);
    }

    #[test]
    fn rejects_missing_inputs_and_outputs() {
        assert_eq!(TrainingParameters::standard(0, 1).validate(), Err(ParameterError::NoInputs));
        assert_eq!(TrainingParameters::standard(2, 0).validate(), Err(ParameterError::NoOutputs));
    }

    #[test]
    fn rejects_negative_threshold() {
        let mut parameters = TrainingParameters::default();
        parameters.advanced.speciation.compatibility_threshold = -0.5;
        assert_eq!(parameters.validate(), Err(ParameterError::InvalidCompatibilityThreshold(-0.5)));
    }

    #[test]
    fn rejects_nan_coefficient() {
        let mut parameters = TrainingParameters::default();
        parameters.advanced.speciation.weight_coefficient = f64::NAN;
        match parameters.validate() {
            Err(ParameterError::InvalidCoefficient { name, .. }) => assert_eq!(name, "weight"),
            other => panic!("unexpected validation result {:?}", other),
        }
    }
}
