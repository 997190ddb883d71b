use rand::{
    distributions::{Distribution, Uniform},
    rngs::ThreadRng,
    thread_rng, Rng,
};

/// Uniform draws in `[0, 1)` for spawn position, spawn timing and speed jitter.
pub trait RandomSource {
    fn next_unit(&mut self) -> f64;
}

pub struct UniformRandom<R: Rng = ThreadRng> {
    rng: R,
    dis: Uniform<f64>,
}

impl Default for UniformRandom {
    fn default() -> Self {
        UniformRandom::from_rng(thread_rng())
    }
}

impl<R: Rng> UniformRandom<R> {
    pub fn from_rng(rng: R) -> Self {
        UniformRandom {
            rng,
            dis: Uniform::new(0.0, 1.0),
        }
    }
}

impl<R: Rng> RandomSource for UniformRandom<R> {
    fn next_unit(&mut self) -> f64 {
        self.dis.sample(&mut self.rng)
    }
}

/// Replays a fixed list of draws, cycling when exhausted.
#[cfg(test)]
pub struct ScriptedRandom {
    values: Vec<f64>,
    pos: usize,
}

#[cfg(test)]
impl ScriptedRandom {
    pub fn new(values: &[f64]) -> Self {
        assert!(!values.is_empty());
        ScriptedRandom {
            values: values.to_vec(),
            pos: 0,
        }
    }

    /// A source whose draws never pass a spawn trial.
    pub fn never_spawn() -> Self {
        Self::new(&[0.999])
    }
}

#[cfg(test)]
impl RandomSource for ScriptedRandom {
    fn next_unit(&mut self) -> f64 {
        let v = self.values[self.pos % self.values.len()];
        self.pos += 1;
        v
    }
}
