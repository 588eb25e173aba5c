use rustc_hash::FxHashSet;

use super::genome::Genome;

#[derive(Clone, Debug)]
struct Link {
    source: usize,
    weight: f64,
}

/// The phenotype of a genome: node values plus the enabled links feeding each node.
#[derive(Clone, Debug)]
pub struct Network {
    values: Vec<f64>,
    incoming: Vec<Vec<Link>>,
    activation_order: Vec<usize>,
    n_sensor_nodes: usize,
    n_output_nodes: usize,
}

fn relu(x: f64) -> f64 {
    if x > 0.0 {
        x
    } else {
        0.0
    }
}

impl Network {
    pub fn create_from_genome(genome: &Genome) -> Network {
        let n_nodes = genome.next_node_id().0;
        let mut incoming: Vec<Vec<Link>> = vec![Vec::new(); n_nodes];
        for (gene_key, gene_val) in genome.iter() {
            if gene_val.enabled {
                incoming[gene_key.out_node_id.0].push(Link {
                    source: gene_key.in_node_id.0,
                    weight: gene_val.weight,
                });
            }
        }

        let n_sensor_nodes = genome.n_sensor_nodes;
        let n_output_nodes = genome.n_output_nodes;

        // post order walk back from the outputs; a link closing a cycle reads last tick's value
        let mut activation_order = Vec::with_capacity(n_nodes);
        let mut visited = FxHashSet::default();
        for output in n_sensor_nodes..n_sensor_nodes + n_output_nodes {
            if visited.contains(&output) {
                continue;
            }
            visited.insert(output);
            let mut stack = vec![(output, 0usize)];
            while let Some((node, next_link)) = stack.pop() {
                match incoming[node].get(next_link) {
                    Some(link) => {
                        stack.push((node, next_link + 1));
                        if link.source >= n_sensor_nodes && visited.insert(link.source) {
                            stack.push((link.source, 0));
                        }
                    }
                    None => activation_order.push(node),
                }
            }
        }

        Network {
            values: vec![0.; n_nodes],
            incoming,
            activation_order,
            n_sensor_nodes,
            n_output_nodes,
        }
    }

    pub fn activate(&mut self, sensor_values: &[f64]) -> Vec<f64> {
        debug_assert!(sensor_values.len() == self.n_sensor_nodes, "sensor values not the right length for network");

        for (value, &input) in self.values.iter_mut().zip(sensor_values) {
            *value = input;
        }

        for &node in &self.activation_order {
            let active_sum = self.incoming[node]
                .iter()
                .fold(0., |acc, link| acc + link.weight * self.values[link.source]);
            self.values[node] = relu(active_sum);
        }

        self.outputs()
    }

    pub fn outputs(&self) -> Vec<f64> {
        self.values[self.n_sensor_nodes..self.n_sensor_nodes + self.n_output_nodes].to_vec()
    }

    pub fn reset(&mut self) {
        self.values.iter_mut().for_each(|v| *v = 0.);
    }
}
