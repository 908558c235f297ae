/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! A small non-periodic cluster with a smooth contact switch, for driving the
//! whole pipeline from atomic positions and back.

#![allow(dead_code)]

use cvforce::V3;
use cvforce::atoms::PairForce;
use cvforce::symfunc::PairSample;

pub fn uniform(a: f64, b: f64) -> f64 { rand::random::<f64>() * (b - a) + a }

/// Goes from 1 at `interval.0` to 0 at `interval.1`, with vanishing first
/// and second derivatives at both ends.
pub fn poly5_contact(interval: (f64, f64), r: f64) -> (f64, f64) {
    if r <= interval.0 {
        return (1.0, 0.0);
    } else if interval.1 <= r {
        return (0.0, 0.0);
    }
    let width = interval.1 - interval.0;
    let x = (r - interval.0) / width;
    let value = (x*x*x)*(10.0 + x*(-15.0 + x*6.0));
    let d_x = (30.0*x*x)*(1.0 + x*(-2.0 + x));
    (1.0 - value, -d_x / width)
}

#[derive(Debug, Clone)]
pub struct Cluster {
    pub positions: Vec<V3>,
    pub interval: (f64, f64),
}

impl Cluster {
    /// Jittered points of a cubic grid.
    pub fn random(dim: usize, spacing: f64, interval: (f64, f64)) -> Cluster {
        let mut positions = vec![];
        for i in 0..dim {
            for j in 0..dim {
                for k in 0..dim {
                    let site = V3([i as f64, j as f64, k as f64]) * spacing;
                    let jitter = V3([uniform(-0.2, 0.2), uniform(-0.2, 0.2), uniform(-0.2, 0.2)]);
                    positions.push(site + jitter);
                }
            }
        }
        Cluster { positions, interval }
    }

    /// Neighbors of each atom, in the order their pairs are sampled.
    pub fn neighbors(&self) -> Vec<Vec<usize>> {
        let cutoff = self.interval.1;
        (0..self.positions.len()).map(|i| {
            (0..self.positions.len())
                .filter(|&j| j != i)
                .filter(|&j| (self.positions[j] - self.positions[i]).norm() < cutoff)
                .collect()
        }).collect()
    }

    pub fn samples(&self, neighbors: &[Vec<usize>]) -> Vec<Vec<PairSample>> {
        neighbors.iter().enumerate().map(|(i, js)| {
            js.iter().map(|&j| {
                let displacement = self.positions[j] - self.positions[i];
                let weight = poly5_contact(self.interval, displacement.norm()).0;
                PairSample { weight, displacement }
            }).collect()
        }).collect()
    }

    /// Turn forces on pair inputs into the gradient with respect to positions.
    ///
    /// `pair_forces[i]` is `None` for atoms that no force reached.
    pub fn position_gradient(
        &self,
        neighbors: &[Vec<usize>],
        pair_forces: &[Option<Vec<PairForce>>],
    ) -> Vec<V3> {
        let mut out = vec![V3::zero(); self.positions.len()];
        for (i, forces) in pair_forces.iter().enumerate() {
            let forces = match forces {
                Some(forces) => forces,
                None => continue,
            };
            assert_eq!(forces.len(), neighbors[i].len());
            for (&j, force) in neighbors[i].iter().zip(forces) {
                let displacement = self.positions[j] - self.positions[i];
                let r = displacement.norm();
                let d_weight = poly5_contact(self.interval, r).1;
                let total = force.displacement + displacement * (force.weight * d_weight / r);
                out[j] += total;
                out[i] -= total;
            }
        }
        out
    }

    pub fn flat_positions(&self) -> Vec<f64> {
        self.positions.iter().flat_map(|v| v.0.to_vec()).collect()
    }

    pub fn with_flat_positions(&self, flat: &[f64]) -> Cluster {
        let positions = flat.chunks(3).map(|c| V3([c[0], c[1], c[2]])).collect();
        Cluster { positions, interval: self.interval }
    }
}

pub fn flatten(vs: &[V3]) -> Vec<f64> {
    vs.iter().flat_map(|v| v.0.to_vec()).collect()
}
