use itertools::Itertools;
use rand::RngCore;
use rand_distr::{Distribution, Uniform};
use rustc_hash::FxBuildHasher;

use super::training::SpeciationParameters;
use super::vector::{align_sorted_maps, AlignedPair, FxIndexMap};

#[derive(PartialEq, PartialOrd, Clone, Copy, Debug)]
pub struct GeneIndex(pub usize);

#[derive(PartialEq, PartialOrd, Ord, Clone, Copy, Eq, Hash, Debug)]
pub struct NodeId(pub usize);

impl NodeId {
    pub fn inc(self) -> NodeId {
        NodeId(self.0 + 1)
    }
}

#[derive(Hash, Eq, PartialEq, PartialOrd, Ord, Clone, Debug)]
pub struct GeneKey {
    pub in_node_id: NodeId,
    pub out_node_id: NodeId,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GeneValue {
    pub weight: f64,
    pub enabled: bool,
}

impl GeneValue {
    pub fn create(weight: f64, enabled: bool) -> GeneValue {
        GeneValue { weight, enabled }
    }
}

pub type Gene = (GeneKey, GeneValue);

pub trait GeneExt {
    fn create(in_node_id: usize, out_node_id: usize, weight: f64, enabled: bool) -> Self;
}

impl GeneExt for Gene {
    fn create(in_node_id: usize, out_node_id: usize, weight: f64, enabled: bool) -> Gene {
        (
            GeneKey {
                in_node_id: NodeId(in_node_id),
                out_node_id: NodeId(out_node_id),
            },
            GeneValue::create(weight, enabled),
        )
    }
}

/// Connection genes keyed by the nodes they join, kept sorted by key.
///
/// Node ids `0..n_sensor_nodes` are sensors, the next `n_output_nodes` ids are
/// outputs and everything from there up to `next_node_id` is hidden.
#[derive(Clone, Debug)]
pub struct Genome {
    data: FxIndexMap<GeneKey, GeneValue>,
    next_node_id: NodeId,
    pub n_sensor_nodes: usize,
    pub n_output_nodes: usize,
}

impl Genome {
    pub fn iter(&self) -> indexmap::map::Iter<GeneKey, GeneValue> {
        self.data.iter()
    }

    pub fn create(genes: Vec<Gene>, n_sensor_nodes: usize, n_output_nodes: usize) -> Genome {
        let max_node_id = genes
            .iter()
            .flat_map(|(gene_key, _)| [gene_key.in_node_id, gene_key.out_node_id])
            .max();
        let next_node_id = match max_node_id {
            Some(id) => std::cmp::max(id.inc(), NodeId(n_sensor_nodes + n_output_nodes)),
            None => NodeId(n_sensor_nodes + n_output_nodes),
        };
        let data = genes.into_iter().sorted_by_key(|x| x.0.clone()).collect();
        Genome { data, next_node_id, n_sensor_nodes, n_output_nodes }
    }

    /// Fully connects every sensor to every output with weights drawn from [-1, 1).
    pub fn init<R: RngCore + ?Sized>(rng: &mut R, n_sensor_nodes: usize, n_output_nodes: usize) -> Genome {
        let between = Uniform::from(-1.0..1.0);

        let n_connections = n_sensor_nodes * n_output_nodes;
        let mut data = FxIndexMap::with_capacity_and_hasher(n_connections, FxBuildHasher);

        for in_node_id in 0..n_sensor_nodes {
            for out_node_ind in 0..n_output_nodes {
                let out_node_id = out_node_ind + n_sensor_nodes;
                let (gene_key, gene_val) = Gene::create(in_node_id, out_node_id, between.sample(rng), true);
                data.insert(gene_key, gene_val);
            }
        }

        let next_node_id = NodeId(n_sensor_nodes + n_output_nodes);
        Genome { data, next_node_id, n_sensor_nodes, n_output_nodes }
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn next_node_id(&self) -> NodeId {
        self.next_node_id
    }

    pub fn get_index(&self, index: GeneIndex) -> Option<(&GeneKey, &GeneValue)> {
        self.data.get_index(index.0)
    }

    pub fn add_connection(&mut self, in_node_id: NodeId, out_node_id: NodeId, weight: f64) {
        debug_assert!(in_node_id != out_node_id, "Tried to add a connection where input is the same node as output");
        debug_assert!(in_node_id < self.next_node_id, "Tried to add a connection with an input node that does not exist");
        debug_assert!(out_node_id < self.next_node_id, "Tried to add a connection with an output node that does not exist");
        debug_assert!(out_node_id.0 >= self.n_sensor_nodes, "Tried to add a connection with an output node that is a sensor node");

        let gene_key = GeneKey { in_node_id, out_node_id };
        let insertion_result = self.data.insert(gene_key, GeneValue::create(weight, true));
        debug_assert!(insertion_result.is_none(), "Tried to add a connection that already exists");
        self.data.sort_keys();
    }

    /// Splits an enabled connection in two around a fresh hidden node.
    /// Disabled connections are left alone.
    pub fn add_node(&mut self, existing_conn_index: GeneIndex) {
        let Some((gene_key, gene_val)) = self.data.get_index_mut(existing_conn_index.0) else {
            return;
        };
        if !gene_val.enabled {
            return;
        }
        gene_val.enabled = false;
        let gene_key = gene_key.clone();
        let weight = gene_val.weight;

        let new_node_id = self.next_node_id;
        self.next_node_id = self.next_node_id.inc();
        self.add_connection(gene_key.in_node_id, new_node_id, 1.);
        self.add_connection(new_node_id, gene_key.out_node_id, weight);
    }

    /// δ = (c1·E + c2·D + c3·W) / N, where W sums the weight differences of matching genes
    /// and N is the larger gene count (1 when both genomes are small).
    pub fn genetic_distance_from(&self, other: &Genome, parameters: &SpeciationParameters) -> f64 {
        #[derive(PartialEq)]
        enum ExcessSide {
            Left,
            Right,
            Neither,
        }

        let mut total_weight_diff = 0.;
        let mut excess_side = ExcessSide::Neither;
        let mut excess_count = 0;
        let mut disjoint_count = 0;

        let mut increment_counters = |pair: AlignedPair<GeneKey, GeneValue>| match pair {
            AlignedPair::HasBoth((_, left), (_, right)) => {
                excess_side = ExcessSide::Neither;
                disjoint_count += excess_count;
                excess_count = 0;
                total_weight_diff += (left.weight - right.weight).abs();
            }
            AlignedPair::HasLeft(_) => {
                if excess_side == ExcessSide::Left {
                    excess_count += 1;
                } else {
                    excess_side = ExcessSide::Left;
                    disjoint_count += excess_count;
                    excess_count = 1;
                }
            }
            AlignedPair::HasRight(_) => {
                if excess_side == ExcessSide::Right {
                    excess_count += 1;
                } else {
                    excess_side = ExcessSide::Right;
                    disjoint_count += excess_count;
                    excess_count = 1;
                }
            }
        };
        align_sorted_maps(&self.data, &other.data, &mut increment_counters);

        let larger = std::cmp::max(self.len(), other.len());
        if larger == 0 {
            return 0.;
        }
        let n = if larger < parameters.small_genome_size { 1. } else { larger as f64 };

        let excess_term = parameters.excess_coefficient * (excess_count as f64);
        let disjoint_term = parameters.disjoint_coefficient * (disjoint_count as f64);
        let weight_term = parameters.weight_coefficient * total_weight_diff;
        (excess_term + disjoint_term + weight_term) / n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::neat::training::TrainingParameters;
    use assert_approx_eq::assert_approx_eq;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256PlusPlus;

    fn genome_sample_1() -> Genome {
        Genome::create(vec![
            Gene::create(0, 3, 0.0, true),
            Gene::create(1, 3, 0.0, true),
            Gene::create(1, 4, 0.0, true),
            Gene::create(2, 4, 0.0, true),
            Gene::create(3, 4, 0.0, true),
        ], 2, 2)
    }

    fn speciation() -> SpeciationParameters {
        TrainingParameters::standard(2, 2).advanced.speciation
    }

    #[test]
    fn test_genome_max_node_id() {
        let genome = genome_sample_1();
        assert_eq!(genome.next_node_id().0, 5);
    }

    #[test]
    fn test_genome_init() {
        let mut rng = Xoshiro256PlusPlus::seed_from_u64(7);
        let genome = Genome::init(&mut rng, 2, 2);
        assert_eq!(genome.next_node_id().0, 4);
        assert_eq!(genome.len(), 4);
        assert!(genome.iter().all(|(_, v)| v.weight >= -1.0 && v.weight < 1.0));
    }

    #[test]
    fn test_genome_add_connection() {
        let mut genome = genome_sample_1();
        genome.add_connection(NodeId(0), NodeId(4), 0.0);
        assert_eq!(genome.len(), 6);
        assert!(genome.iter().map(|(k, _)| k).tuple_windows().all(|(a, b)| a < b));
    }

    #[test]
    fn test_genome_add_node() {
        let mut genome = genome_sample_1();
        genome.add_node(GeneIndex(0));
        assert_eq!(genome.len(), 7);
        assert_eq!(genome.next_node_id().0, 6);
        let disabled = genome.iter().filter(|(_, v)| !v.enabled).count();
        assert_eq!(disabled, 1);
    }

    #[test]
    fn distance_to_self_is_zero() {
        let genome = genome_sample_1();
        assert_approx_eq!(genome.genetic_distance_from(&genome, &speciation()), 0.0);
    }

    #[test]
    fn distance_of_empty_genomes_is_zero() {
        let empty = Genome::create(vec![], 2, 2);
        assert_eq!(empty.genetic_distance_from(&empty, &speciation()), 0.0);
    }

    #[test]
    fn distance_counts_excess_disjoint_and_weights() {
        let left = Genome::create(vec![
            Gene::create(0, 2, 0.5, true),
            Gene::create(0, 3, 0.0, true),
            Gene::create(1, 2, 1.0, true),
        ], 2, 1);
        let right = Genome::create(vec![
            Gene::create(0, 2, 0.0, true),
            Gene::create(1, 2, 0.0, true),
            Gene::create(1, 3, 0.0, true),
            Gene::create(3, 2, 0.0, true),
        ], 2, 1);
        // (0,3) is disjoint, (1,3) and (3,2) are excess, weight diffs sum to 1.5
        let distance = left.genetic_distance_from(&right, &speciation());
        assert_approx_eq!(distance, 1.0 * 2.0 + 1.0 * 1.0 + 0.4 * 1.5);
        assert_approx_eq!(right.genetic_distance_from(&left, &speciation()), distance);
    }

    #[test]
    fn large_genomes_are_normalised_by_size() {
        let mut parameters = speciation();
        parameters.small_genome_size = 2;
        let left = Genome::create(vec![Gene::create(0, 2, 0.0, true), Gene::create(1, 2, 0.0, true)], 2, 1);
        let right = Genome::create(vec![Gene::create(0, 2, 0.0, true)], 2, 1);
        assert_approx_eq!(left.genetic_distance_from(&right, &parameters), 0.5);
    }
}
