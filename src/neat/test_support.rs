use rand::{Error, RngCore};

use super::body::Body;
use super::genome::{Gene, GeneExt, Genome};
use super::organism::Organism;
use super::training::TrainingParameters;

#[derive(Clone)]
pub struct FixedFitnessBody(pub f64);

impl Body for FixedFitnessBody {
    fn inputs(&self) -> Vec<f64> {
        vec![0.]
    }

    fn update(&mut self, _outputs: &[f64]) {}

    fn fitness(&self) -> f64 {
        self.0
    }

    fn reset(&mut self) {}

    fn clone_box(&self) -> Box<dyn Body> {
        Box::new(self.clone())
    }
}

/// Feeds constant sensors and accumulates the sum of every output it receives.
#[derive(Clone)]
pub struct OutputSumBody {
    sensors: Vec<f64>,
    total: f64,
}

impl OutputSumBody {
    pub fn new(sensors: Vec<f64>) -> OutputSumBody {
        OutputSumBody { sensors, total: 0. }
    }
}

impl Body for OutputSumBody {
    fn inputs(&self) -> Vec<f64> {
        self.sensors.clone()
    }

    fn update(&mut self, outputs: &[f64]) {
        self.total += outputs.iter().sum::<f64>();
    }

    fn fitness(&self) -> f64 {
        self.total
    }

    fn reset(&mut self) {
        self.total = 0.;
    }

    fn clone_box(&self) -> Box<dyn Body> {
        Box::new(self.clone())
    }
}

pub fn single_gene_genome(weight: f64) -> Genome {
    Genome::create(vec![Gene::create(0, 1, weight, true)], 1, 1)
}

pub fn organism_with_genome(genome: Genome, fitness: f64) -> Organism {
    Organism::create_from_genome(genome, Box::new(FixedFitnessBody(fitness)), TrainingParameters::standard(1, 1))
}

pub fn organism_with_fitness(fitness: f64) -> Organism {
    organism_with_genome(single_gene_genome(0.), fitness)
}

/// Hands out a fixed sequence of uniform draws, repeating the last one forever.
pub struct ScriptedRng {
    draws: Vec<f64>,
    position: usize,
}

impl ScriptedRng {
    pub fn new(draws: Vec<f64>) -> ScriptedRng {
        ScriptedRng { draws, position: 0 }
    }

    pub fn consumed(&self) -> usize {
        self.position
    }
}

impl RngCore for ScriptedRng {
    fn next_u32(&mut self) -> u32 {
        (self.next_u64() >> 32) as u32
    }

    // the standard f64 distribution keeps the top 53 bits of a u64
    fn next_u64(&mut self) -> u64 {
        let index = std::cmp::min(self.position, self.draws.len().saturating_sub(1));
        let draw = self.draws.get(index).copied().unwrap_or(0.);
        self.position += 1;
        ((draw * (1u64 << 53) as f64) as u64) << 11
    }

    fn fill_bytes(&mut self, dest: &mut [u8]) {
        rand::rngs::mock::StepRng::new(self.next_u64(), 0).fill_bytes(dest)
    }

    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), Error> {
        self.fill_bytes(dest);
        Ok(())
    }
}
