//! # Interface Table Module
//!
//! An ordered list of interfaces in the order parameter `lambda`, the
//! scaffold every algorithm driver walks across. Interface `1` is the
//! first real interface (at `lambda_a`); interface `0` is a sentinel
//! carrying the same `lambda` as interface 1, used only so that
//! `lambda_min` lookups for interface-1 trials have somewhere to read
//! from. Interface `N` is the last interface, at `lambda_b`.


use crate::error::FfsError;

/// A single interface's static configuration plus its accumulated
/// weight, which is mutated as trials reach it.
#[derive(Debug, Clone, Copy, serde::Serialize, serde::Deserialize)]
pub struct Interface {
    /// Natural-numbered index, `0..=N+1` with `0` the sentinel below
    /// interface 1.
    pub index: usize,
    /// Order-parameter value. Strictly increasing in `index` for
    /// `index >= 1`.
    pub lambda: f64,
    /// Number of forward trials to launch from this interface.
    pub ntrial: usize,
    /// Intended number of states to harvest at this interface.
    pub nstate_target: usize,
    /// Number of states physically retained on storage.
    pub nstate_keep: usize,
    /// Pruning probability in `[0, 1]`. `1.0` at interface 1, `0.0` at
    /// interface `N`.
    pub pprune: f64,
    /// Accumulated weight of all trials that reached this interface.
    pub weight_sum: f64,
}

impl Interface {
    fn sentinel(lambda: f64) -> Self {
        Interface {
            index: 0,
            lambda,
            ntrial: 0,
            nstate_target: 0,
            nstate_keep: 0,
            pprune: 1.0,
            weight_sum: 0.0,
        }
    }
}

/// The ordered interface table, `C1`.
///
/// `interfaces[0]` is the sentinel; `interfaces[1..=n]` are the real
/// interfaces (`n` = `nlambda`).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct InterfaceTable {
    interfaces: Vec<Interface>,
}

impl InterfaceTable {
    /// Number of real interfaces (excludes the sentinel).
    pub fn nlambda(&self) -> usize {
        self.interfaces.len() - 1
    }

    /// Builds and validates an interface table from per-interface values.
    /// `lambdas[0]` is interface 1's lambda (= lambda_a); the list must be
    /// strictly increasing and have at least 2 entries (A and B).
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        lambdas: &[f64],
        ntrial: &[usize],
        nstate_target: &[usize],
        nstate_keep: &[usize],
        pprune: &[f64],
    ) -> Result<Self, FfsError> {
        let n = lambdas.len();
        if n < 2 {
            return Err(FfsError::Configuration(
                "an interface table needs at least 2 interfaces (A and B)".into(),
            ));
        }
        for slice_name_len in [
            ("ntrial", ntrial.len()),
            ("nstate_target", nstate_target.len()),
            ("nstate_keep", nstate_keep.len()),
            ("pprune", pprune.len()),
        ] {
            if slice_name_len.1 != n {
                return Err(FfsError::Configuration(format!(
                    "interface field '{}' has length {} but expected {n}",
                    slice_name_len.0, slice_name_len.1
                )));
            }
        }
        for w in lambdas.windows(2) {
            if !(w[1] > w[0]) {
                return Err(FfsError::Configuration(format!(
                    "interface lambdas must be strictly increasing, got {} then {}",
                    w[0], w[1]
                )));
            }
        }
        for (i, &p) in pprune.iter().enumerate() {
            if !(0.0..=1.0).contains(&p) {
                return Err(FfsError::Configuration(format!(
                    "pprune at interface {} = {p} is outside [0, 1]",
                    i + 1
                )));
            }
        }
        if (pprune[0] - 1.0).abs() > f64::EPSILON {
            return Err(FfsError::Configuration(format!(
                "pprune at interface 1 must be 1.0, got {}",
                pprune[0]
            )));
        }
        if pprune[n - 1] != 0.0 {
            return Err(FfsError::Configuration(format!(
                "pprune at the last interface must be 0.0, got {}",
                pprune[n - 1]
            )));
        }

        let mut interfaces = Vec::with_capacity(n + 1);
        interfaces.push(Interface::sentinel(lambdas[0]));
        for i in 0..n {
            interfaces.push(Interface {
                index: i + 1,
                lambda: lambdas[i],
                ntrial: ntrial[i],
                nstate_target: nstate_target[i],
                nstate_keep: nstate_keep[i],
                pprune: pprune[i],
                weight_sum: 0.0,
            });
        }
        Ok(InterfaceTable { interfaces })
    }

    /// Builds a table with interfaces spaced uniformly between `lambda_a`
    /// and `lambda_b`, mirroring the original source's
    /// `ffs_param_lambda_ab_set` shortcut: interface 1 and the sentinel
    /// both sit exactly at `lambda_a`.
    pub fn uniform(
        nlambda: usize,
        lambda_a: f64,
        lambda_b: f64,
        ntrial: usize,
        nstate_target: usize,
        nstate_keep: usize,
        pprune_interior: f64,
    ) -> Result<Self, FfsError> {
        if nlambda < 2 {
            return Err(FfsError::Configuration(
                "nlambda must be at least 2".into(),
            ));
        }
        let mut lambdas = Vec::with_capacity(nlambda);
        for n in 1..=nlambda {
            let lambda = if n == 1 {
                lambda_a
            } else {
                lambda_a + (n as f64 - 1.0) * (lambda_b - lambda_a) / (nlambda as f64 - 1.0)
            };
            lambdas.push(lambda);
        }
        *lambdas.last_mut().unwrap() = lambda_b;

        let mut pprune = vec![pprune_interior; nlambda];
        pprune[0] = 1.0;
        *pprune.last_mut().unwrap() = 0.0;

        Self::new(
            &lambdas,
            &vec![ntrial; nlambda],
            &vec![nstate_target; nlambda],
            &vec![nstate_keep; nlambda],
            &pprune,
        )
    }

    /// Returns the interface at the given natural-numbered index
    /// (`0` is the sentinel).
    pub fn get(&self, index: usize) -> &Interface {
        &self.interfaces[index]
    }

    fn get_mut(&mut self, index: usize) -> &mut Interface {
        &mut self.interfaces[index]
    }

    /// `lambda` at the given index.
    pub fn lambda(&self, index: usize) -> f64 {
        self.get(index).lambda
    }

    /// `lambda_a`, i.e. interface 1's lambda.
    pub fn lambda_a(&self) -> f64 {
        self.lambda(1)
    }

    /// `lambda_b`, i.e. the last interface's lambda.
    pub fn lambda_b(&self) -> f64 {
        self.lambda(self.nlambda())
    }

    /// Adds `weight` to the accumulated weight sum at `index`.
    pub fn accumulate_weight(&mut self, index: usize, weight: f64) {
        self.get_mut(index).weight_sum += weight;
    }

    /// Iterates the real interfaces (`1..=nlambda`) in order.
    pub fn iter(&self) -> impl Iterator<Item = &Interface> {
        self.interfaces[1..].iter()
    }
}
