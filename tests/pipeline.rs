/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Positions -> pair samples -> symmetry functions -> graph -> forces -> positions.

#[macro_use] extern crate cvforce_assert_close;

mod shared;

use cvforce::{ActionGraph, Combine, Periodicity, ValueId};
use cvforce::atoms::{self, PairForce};
use cvforce::config::{Settings, Threading, YamlRead};
use cvforce::symfunc::{self, Keywords, SymmetryFunctionSet};
use cvforce_numerical::gradient;
use pretty_assertions::assert_eq;

use shared::Cluster;

const INTERVAL: (f64, f64) = (1.0, 2.2);

const SETTINGS: &str = "\
threading: serial
symmetry-functions:
  cn:
    kind: coordination-number
  moments:
    kind: coordination-moments
    r-power: 2
";

struct Pipeline {
    graph: ActionGraph,
    cn: Vec<ValueId>,
    moments: Vec<ValueId>,
    cv: ValueId,
}

// cv = mean(moments) + 0.5 * (sum(cn) - 3)^2
fn build(set: &SymmetryFunctionSet, cluster: &Cluster, threading: Threading) -> Pipeline {
    let neighbors = cluster.neighbors();
    let results = set.evaluate_atoms(&cluster.samples(&neighbors), threading);

    let mut graph = ActionGraph::new();
    let cn = atoms::add_atom_inputs(&mut graph, "cn", &results, set.offset("cn").unwrap()).unwrap();
    let moments = atoms::add_atom_inputs(&mut graph, "moments", &results, set.offset("moments").unwrap()).unwrap();

    let n = results.len();
    graph.add_function("cn_sum", Box::new(Combine::sum(n)), &cn, Periodicity::NotPeriodic).unwrap();
    graph.add_function("moments_mean", Box::new(Combine::mean(n)), &moments, Periodicity::NotPeriodic).unwrap();

    let combine = Combine::new(2, vec![1.0, 0.5], vec![0.0, 3.0], vec![1.0, 2.0]).unwrap();
    let args = [graph.lookup("moments_mean").unwrap(), graph.lookup("cn_sum").unwrap()];
    graph.add_function("cv", Box::new(combine), &args, Periodicity::NotPeriodic).unwrap();
    let cv = graph.lookup("cv").unwrap();

    graph.begin_step();
    graph.calculate();
    Pipeline { graph, cn, moments, cv }
}

fn settings() -> Settings { Settings::from_yaml_str(SETTINGS).unwrap() }

fn cv_value(set: &SymmetryFunctionSet, cluster: &Cluster) -> f64 {
    let pipeline = build(set, cluster, Threading::Serial);
    pipeline.graph.value(pipeline.cv).get()
}

fn analytic_gradient(set: &SymmetryFunctionSet, cluster: &Cluster, threading: Threading) -> Vec<f64> {
    let mut pipeline = build(set, cluster, threading);
    pipeline.graph.value_mut(pipeline.cv).add_force(1.0);
    pipeline.graph.apply_forces();

    let graph = &pipeline.graph;
    let neighbors = cluster.neighbors();
    let mut total = vec![0.0; 3 * cluster.positions.len()];
    for ids in &[&pipeline.cn, &pipeline.moments] {
        let forces: Vec<Option<Vec<PairForce>>> = ids.iter().map(|&id| atoms::pair_forces(graph, id)).collect();
        let grad = shared::flatten(&cluster.position_gradient(&neighbors, &forces));
        for (t, g) in total.iter_mut().zip(grad) {
            *t += g;
        }
    }
    total
}

#[test]
fn forward_matches_direct_sum() {
    let set = SymmetryFunctionSet::from_settings(&settings()).unwrap();
    let cluster = Cluster::random(2, 1.1, INTERVAL);
    let pipeline = build(&set, &cluster, Threading::Serial);

    let samples = cluster.samples(&cluster.neighbors());
    let mut cn_sum = 0.0;
    let mut moments_sum = 0.0;
    for (i, atom) in samples.iter().enumerate() {
        let cn: f64 = atom.iter().map(|s| s.weight).sum();
        let moments: f64 = atom.iter().map(|s| s.weight * s.displacement.sqnorm()).sum();
        assert_close!(rel=1e-12, pipeline.graph.value(pipeline.cn[i]).get(), cn);
        assert_close!(rel=1e-12, pipeline.graph.value(pipeline.moments[i]).get(), moments);
        cn_sum += cn;
        moments_sum += moments;
    }
    let expected = moments_sum / samples.len() as f64 + 0.5 * (cn_sum - 3.0).powi(2);
    assert_close!(rel=1e-12, pipeline.graph.value(pipeline.cv).get(), expected);
}

#[test]
fn position_gradient_matches_finite_differences() {
    let set = SymmetryFunctionSet::from_settings(&settings()).unwrap();
    for _ in 0..3 {
        let cluster = Cluster::random(2, 1.3, INTERVAL);
        let analytic = analytic_gradient(&set, &cluster, Threading::Serial);
        let numerical = gradient(1e-4, None, &cluster.flat_positions(), |flat| {
            cv_value(&set, &cluster.with_flat_positions(flat))
        });
        assert_close!(rel=1e-6, abs=1e-7, analytic, numerical);
    }
}

#[test]
fn threading_does_not_change_forces() {
    let set = SymmetryFunctionSet::from_settings(&settings()).unwrap();
    let cluster = Cluster::random(3, 1.2, INTERVAL);
    let serial = analytic_gradient(&set, &cluster, Threading::Serial);
    let rayon = analytic_gradient(&set, &cluster, Threading::Rayon);
    assert_eq!(serial, rayon);
}

#[test]
fn no_force_reaches_no_atom() {
    let set = SymmetryFunctionSet::from_settings(&settings()).unwrap();
    let cluster = Cluster::random(2, 1.1, INTERVAL);
    let mut pipeline = build(&set, &cluster, Threading::Serial);

    assert_eq!(pipeline.graph.apply_forces(), 0);
    for &id in pipeline.cn.iter().chain(&pipeline.moments) {
        assert_eq!(atoms::pair_forces(&pipeline.graph, id), None);
    }
}

#[test]
fn force_on_one_branch_leaves_the_other_alone() {
    let set = SymmetryFunctionSet::from_settings(&settings()).unwrap();
    let cluster = Cluster::random(2, 1.1, INTERVAL);
    let mut pipeline = build(&set, &cluster, Threading::Serial);

    let mean = pipeline.graph.lookup("moments_mean").unwrap();
    pipeline.graph.value_mut(mean).add_force(1.0);
    pipeline.graph.apply_forces();

    for &id in &pipeline.cn {
        assert_eq!(atoms::pair_forces(&pipeline.graph, id), None);
    }
    for &id in &pipeline.moments {
        let forces = atoms::pair_forces(&pipeline.graph, id).unwrap();
        let num_pairs = pipeline.graph.value(id).num_derivatives() / symfunc::NUM_CHANNELS;
        assert_eq!(forces.len(), num_pairs);
    }
}

#[test]
fn shortcut_builds_the_same_function() {
    let words = ["SPECIES=1-8", "R_0=1.5", "R_POWER=2", "MEAN"];
    let requests = symfunc::expand_shortcut("moments", &words).unwrap();
    let request = requests.iter().find(|r| r.name == "COORDINATION_MOMENTS").unwrap();
    let keywords = Keywords::parse(&request.words).unwrap();

    let mut from_shortcut = SymmetryFunctionSet::new();
    from_shortcut.push("cn", symfunc::registry::create("COORDINATIONNUMBER", &Keywords::default()).unwrap());
    from_shortcut.push("moments", symfunc::registry::create(&request.name, &keywords).unwrap());

    let from_settings = SymmetryFunctionSet::from_settings(&settings()).unwrap();
    assert_eq!(from_shortcut.labels(), from_settings.labels());
    assert_eq!(format!("{:?}", from_shortcut), format!("{:?}", from_settings));
    let cluster = Cluster::random(2, 1.1, INTERVAL);
    assert_eq!(cv_value(&from_shortcut, &cluster), cv_value(&from_settings, &cluster));
}
