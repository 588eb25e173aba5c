use log::{debug, trace, warn};
use rand::{Rng, RngCore};

use super::error::SelectionError;
use super::genome::Genome;
use super::organism::Organism;
use super::selection::{PerCandidateDraw, SelectionStrategy};
use super::training::TrainingParameters;

/// A cluster of organisms whose genomes lie within the compatibility threshold
/// of a shared representative.
///
/// The species outlives its members: [`clear`](Species::clear) empties the
/// population at the end of a generation but keeps the representative and the
/// stagnation bookkeeping, so the next generation can be sorted into it.
///
/// A species is meant to be driven by a single generation loop; nothing here
/// is synchronised.
#[derive(Clone, Debug)]
pub struct Species {
    population: Vec<Organism>,
    representative: Organism,
    parameters: TrainingParameters,
    is_sorted_by_fitness: bool,
    fitness_highscore: f64,
    number_of_stagnant_generations: usize,
}

impl Species {
    /// Founds a species, taking ownership of the first member.
    pub fn new<R: RngCore>(rng: &mut R, founder: Organism) -> Species {
        let parameters = founder.training_parameters().clone();
        let representative = founder.clone();
        let mut species = Species {
            population: vec![founder],
            representative,
            parameters,
            is_sorted_by_fitness: false,
            fitness_highscore: 0.0,
            number_of_stagnant_generations: 0,
        };
        species.elect_representative(rng);
        species
    }

    /// Founds a species from a copy of `founder`, leaving the caller's organism untouched.
    pub fn from_organism<R: RngCore>(rng: &mut R, founder: &Organism) -> Species {
        Species::new(rng, founder.clone())
    }

    /// Takes over the members of `other` and elects a new representative from them.
    ///
    /// Only the population moves across. The highscore and stagnation counter of
    /// `self` are kept as they were; callers that want them carried over have to
    /// copy them separately.
    pub fn assign_from<R: RngCore>(&mut self, rng: &mut R, other: Species) {
        self.population = other.population;
        self.is_sorted_by_fitness = false;
        self.elect_representative(rng);
    }

    /// Adds a member and re-shares fitness across the whole species.
    pub fn add_organism<R: RngCore>(&mut self, rng: &mut R, organism: Organism) {
        self.population.push(organism);
        self.elect_representative(rng);
        self.is_sorted_by_fitness = false;
        self.set_populations_fitness_modifier();
    }

    /// Adds a copy of `organism`.
    ///
    /// Unlike [`add_organism`](Species::add_organism) this does not touch the
    /// fitness modifiers; call
    /// [`set_populations_fitness_modifier`](Species::set_populations_fitness_modifier)
    /// before breeding if members were added this way.
    pub fn add_organism_copy<R: RngCore>(&mut self, rng: &mut R, organism: &Organism) {
        self.population.push(organism.clone());
        self.elect_representative(rng);
        self.is_sorted_by_fitness = false;
    }

    /// Closes a generation: records whether the best member beat the highscore
    /// and drops every member. The representative stays.
    pub fn clear(&mut self) {
        let current_best_fitness = self.fittest_mut().get_or_calculate_fitness();
        if self.fitness_highscore < current_best_fitness {
            debug!(
                "species highscore improved from {:.4} to {:.4}",
                self.fitness_highscore, current_best_fitness
            );
            self.fitness_highscore = current_best_fitness;
            self.number_of_stagnant_generations = 0;
        } else {
            self.number_of_stagnant_generations += 1;
            debug!(
                "species stagnant for {} generations (best {:.4}, highscore {:.4})",
                self.number_of_stagnant_generations, current_best_fitness, self.fitness_highscore
            );
        }

        self.population.clear();
        self.is_sorted_by_fitness = false;
    }

    pub fn is_compatible(&self, genome: &Genome) -> bool {
        let distance_to_species = self
            .representative
            .genome()
            .genetic_distance_from(genome, &self.parameters.advanced.speciation);
        !self.is_above_compatibility_threshold(distance_to_species)
    }

    fn is_above_compatibility_threshold(&self, distance: f64) -> bool {
        distance > self.parameters.compatibility_threshold()
    }

    /// Explicit fitness sharing: every member's fitness is divided by the species size.
    pub fn set_populations_fitness_modifier(&mut self) {
        if self.population.is_empty() {
            return;
        }
        let fitness_modifier = 1.0 / self.population.len() as f64;
        for organism in self.population.iter_mut() {
            organism.set_fitness_modifier(fitness_modifier);
        }
    }

    fn elect_representative<R: RngCore>(&mut self, rng: &mut R) {
        if self.population.is_empty() {
            return;
        }
        let random_member = rng.gen_range(0..self.population.len());
        trace!("electing member {} of {} as representative", random_member, self.population.len());
        self.representative.clone_from(&self.population[random_member]);
    }

    /// One tick for every member.
    pub fn let_population_live(&mut self) {
        for organism in self.population.iter_mut() {
            organism.update();
        }
        self.is_sorted_by_fitness = false;
    }

    pub fn reset_to_teachable_state(&mut self) {
        for organism in self.population.iter_mut() {
            organism.reset();
        }
        self.is_sorted_by_fitness = false;
    }

    fn sort_by_fitness(&mut self) {
        let mut ranked: Vec<(f64, Organism)> = self
            .population
            .drain(..)
            .map(|mut organism| (organism.get_or_calculate_fitness(), organism))
            .collect();
        ranked.sort_by(|(lhs, _), (rhs, _)| lhs.total_cmp(rhs));
        self.population = ranked.into_iter().map(|(_, organism)| organism).collect();
        self.is_sorted_by_fitness = true;
    }

    fn fittest_mut(&mut self) -> &mut Organism {
        if !self.is_sorted_by_fitness && !self.population.is_empty() {
            self.sort_by_fitness();
        }
        match self.population.first_mut() {
            Some(organism) => organism,
            None => &mut self.representative,
        }
    }

    /// The front of the population after sorting by ascending fitness, or the
    /// representative when the species has no members.
    ///
    /// Note that with ascending order the front is the member with the *lowest*
    /// fitness. Existing callers rely on this, so it is kept as is.
    pub fn get_fittest_organism(&mut self) -> &Organism {
        self.fittest_mut()
    }

    /// Picks a breeding candidate with [`PerCandidateDraw`].
    pub fn get_organism_to_breed<R: RngCore>(&mut self, rng: &mut R) -> Result<&Organism, SelectionError> {
        self.get_organism_to_breed_with(rng, &PerCandidateDraw)
    }

    /// Picks a breeding candidate in proportion to the members' shared fitness.
    ///
    /// Falls back to the representative when the species has no members. Fails
    /// when the members' total fitness is not positive.
    pub fn get_organism_to_breed_with<R: RngCore>(
        &mut self,
        rng: &mut R,
        strategy: &dyn SelectionStrategy,
    ) -> Result<&Organism, SelectionError> {
        if self.population.is_empty() {
            return Ok(&self.representative);
        }

        let fitnesses: Vec<f64> = self
            .population
            .iter_mut()
            .map(|organism| organism.get_or_calculate_fitness())
            .collect();

        match strategy.select(rng, &fitnesses) {
            Ok(index) => Ok(&self.population[index]),
            Err(err) => {
                warn!("refusing to pick a breeding candidate among {} members: {}", self.population.len(), err);
                Err(err)
            }
        }
    }

    pub fn population(&self) -> &[Organism] {
        &self.population
    }

    pub fn representative(&self) -> &Organism {
        &self.representative
    }

    pub fn parameters(&self) -> &TrainingParameters {
        &self.parameters
    }

    pub fn len(&self) -> usize {
        self.population.len()
    }

    pub fn is_empty(&self) -> bool {
        self.population.is_empty()
    }

    pub fn is_sorted_by_fitness(&self) -> bool {
        self.is_sorted_by_fitness
    }

    pub fn fitness_highscore(&self) -> f64 {
        self.fitness_highscore
    }

    pub fn number_of_stagnant_generations(&self) -> usize {
        self.number_of_stagnant_generations
    }

    /// Whether the species has gone without a new highscore for long enough to
    /// be considered for removal. Removing it is up to the caller.
    pub fn is_stagnant(&self) -> bool {
        self.number_of_stagnant_generations >= self.parameters.advanced.speciation.stagnant_species_clear_threshold
    }
}
