use rand::{Rng, RngCore};

use super::error::SelectionError;

/// Picks the index of a breeding candidate given each candidate's (shared) fitness.
pub trait SelectionStrategy {
    fn select(&self, rng: &mut dyn RngCore, fitnesses: &[f64]) -> Result<usize, SelectionError>;
}

fn total_fitness(fitnesses: &[f64]) -> Result<f64, SelectionError> {
    if fitnesses.is_empty() {
        return Err(SelectionError::EmptyPopulation);
    }
    let total_fitness: f64 = fitnesses.iter().sum();
    if total_fitness.is_finite() && total_fitness > 0.0 {
        Ok(total_fitness)
    } else {
        Err(SelectionError::NoViableCandidate { total_fitness })
    }
}

/// Walks the candidates in order, giving each its own uniform draw which is
/// compared against the running share of total fitness seen so far.
///
/// The running share is kept across passes, so once the first pass is done
/// every later candidate is accepted. Candidates late in the order are picked
/// less often than their share alone would suggest.
#[derive(Clone, Copy, Debug, Default)]
pub struct PerCandidateDraw;

impl SelectionStrategy for PerCandidateDraw {
    fn select(&self, rng: &mut dyn RngCore, fitnesses: &[f64]) -> Result<usize, SelectionError> {
        let total_fitness = total_fitness(fitnesses)?;
        let mut chance = 0.0;
        loop {
            for (index, fitness) in fitnesses.iter().enumerate() {
                let draw: f64 = rng.gen();
                chance += fitness / total_fitness;
                if draw < chance {
                    return Ok(index);
                }
            }
        }
    }
}

/// Classic fitness proportionate selection: one draw against the cumulative distribution.
#[derive(Clone, Copy, Debug, Default)]
pub struct RouletteWheel;

impl SelectionStrategy for RouletteWheel {
    fn select(&self, rng: &mut dyn RngCore, fitnesses: &[f64]) -> Result<usize, SelectionError> {
        let total_fitness = total_fitness(fitnesses)?;
        let draw: f64 = rng.gen::<f64>() * total_fitness;
        let mut cumulative = 0.0;
        for (index, fitness) in fitnesses.iter().enumerate() {
            cumulative += fitness;
            if draw < cumulative {
                return Ok(index);
            }
        }
        // rounding can leave the last bucket a hair short
        Ok(fitnesses.len() - 1)
    }
}
