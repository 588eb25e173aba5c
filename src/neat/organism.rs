use super::body::Body;
use super::genome::Genome;
use super::network::Network;
use super::training::TrainingParameters;

/// A genome, the network grown from it and the body it lives in.
///
/// Fitness is read from the body lazily and cached until the next
/// [`update`](Organism::update) or [`reset`](Organism::reset). Every fitness
/// handed out is already scaled by the fitness modifier.
#[derive(Clone, Debug)]
pub struct Organism {
    genome: Genome,
    network: Network,
    body: Box<dyn Body>,
    parameters: TrainingParameters,
    fitness: Option<f64>,
    fitness_modifier: f64,
}

impl Organism {
    pub fn create_from_genome(genome: Genome, body: Box<dyn Body>, parameters: TrainingParameters) -> Organism {
        let network = Network::create_from_genome(&genome);
        Organism {
            genome,
            network,
            body,
            parameters,
            fitness: None,
            fitness_modifier: 1.0,
        }
    }

    pub fn get_or_calculate_fitness(&mut self) -> f64 {
        let raw = match self.fitness {
            Some(raw) => raw,
            None => {
                let raw = self.body.fitness();
                self.fitness = Some(raw);
                raw
            }
        };
        raw * self.fitness_modifier
    }

    /// The cached, modified fitness, if it is up to date.
    pub fn fitness(&self) -> Option<f64> {
        self.fitness.map(|raw| raw * self.fitness_modifier)
    }

    pub fn fitness_modifier(&self) -> f64 {
        self.fitness_modifier
    }

    pub fn set_fitness_modifier(&mut self, fitness_modifier: f64) {
        self.fitness_modifier = fitness_modifier;
    }

    pub fn genome(&self) -> &Genome {
        &self.genome
    }

    pub fn training_parameters(&self) -> &TrainingParameters {
        &self.parameters
    }

    /// One tick: sense, think, act.
    pub fn update(&mut self) {
        let inputs = self.body.inputs();
        let outputs = self.network.activate(&inputs);
        self.body.update(&outputs);
        self.fitness = None;
    }

    pub fn reset(&mut self) {
        self.body.reset();
        self.network.reset();
        self.fitness = None;
    }
}
