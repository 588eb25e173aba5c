/// The environment an organism is trained in.
///
/// A body turns its own state into sensor values, reacts to the network's
/// outputs once per tick and reports how well the organism is doing.
pub trait Body {
    fn inputs(&self) -> Vec<f64>;
    fn update(&mut self, outputs: &[f64]);
    fn fitness(&self) -> f64;
    fn reset(&mut self);
    fn clone_box(&self) -> Box<dyn Body>;
}

impl Clone for Box<dyn Body> {
    fn clone(&self) -> Box<dyn Body> {
        self.clone_box()
    }
}

impl std::fmt::Debug for dyn Body {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Body").field("fitness", &self.fitness()).finish()
    }
}
