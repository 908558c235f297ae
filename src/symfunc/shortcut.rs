/* ************************************************************************ **
** This file is part of cvforce, and is licensed under EITHER the MIT       **
** license or the Apache 2.0 license, at your option.                       **
**                                                                          **
**     http://www.apache.org/licenses/LICENSE-2.0                           **
**     http://opensource.org/licenses/MIT                                   **
** ************************************************************************ */

//! Rewriting of the high-level symmetry function keyword into the primitive
//! actions that implement it.
//!
//! ```text
//! cn: COORDINATION_MOMENTS SPECIES=1-64 SWITCH={RATIONAL R_0=1.5} R_POWER=2 MEAN
//! ```
//!
//! becomes
//!
//! ```text
//! cn_mat: CONTACT_MATRIX SPECIES=1-64 SWITCH={RATIONAL R_0=1.5} COMPONENTS
//! cn: COORDINATION_MOMENTS WEIGHT=cn_mat.w VECTORS1=cn_mat.x VECTORS2=cn_mat.y VECTORS3=cn_mat.z R_POWER=2
//! cn_mean: MEAN ARG=cn PERIODIC=NO
//! ```
//!
//! This is a pure function of its input; nothing here touches the runtime graph.

use std::fmt;

use crate::FailResult;
use crate::keywords::split_keyword;
use crate::registry;

/// Keywords that describe the pairs, and therefore belong to the contact matrix.
const MATRIX_KEYWORDS: &[&str] = &[
    "GROUP", "GROUPA", "GROUPB",
    "SPECIES", "SPECIESA", "SPECIESB",
    "SWITCH", "R_0", "D_0", "D_MAX", "NN", "MM",
    "NL_CUTOFF", "NL_STRIDE",
];

/// Keywords that select the atoms; at least one is needed.
const ATOM_KEYWORDS: &[&str] = &["GROUP", "GROUPA", "SPECIES", "SPECIESA"];

/// Keywords that request a reduction over all atoms.
const REDUCTION_KEYWORDS: &[&str] = &["MEAN", "SUM", "LESS_THAN", "MORE_THAN"];

/// One line of primitive input: `label: NAME words...`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    pub label: String,
    pub name: String,
    pub words: Vec<String>,
}

impl ActionRequest {
    fn new(label: impl Into<String>, name: &str, words: Vec<String>) -> Self {
        ActionRequest { label: label.into(), name: name.to_string(), words }
    }
}

impl fmt::Display for ActionRequest {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}: {}", self.label, self.name)?;
        for word in &self.words {
            write!(f, " {}", word)?;
        }
        Ok(())
    }
}

/// Expand `label: NAME words...` into a contact matrix, the symmetry
/// function itself, and any requested reductions.
///
/// `words[0]` is the symmetry function name, which must be registered.
pub fn expand_shortcut<S: AsRef<str>>(label: &str, words: &[S]) -> FailResult<Vec<ActionRequest>> {
    let (name, rest) = match words.split_first() {
        Some((name, rest)) => (name.as_ref(), rest),
        None => bail!("{}: empty action line", label),
    };
    if registry::lookup(name).is_none() {
        bail!("{}: {} is not a symmetry function", label, name);
    }

    let mut matrix_words = vec![];
    let mut function_words = vec![];
    let mut reductions = vec![];
    for word in rest {
        let word = word.as_ref();
        let key = split_keyword(word).0;
        if MATRIX_KEYWORDS.contains(&key) {
            matrix_words.push(word.to_string());
        } else if REDUCTION_KEYWORDS.contains(&key) {
            reductions.push(split_keyword(word));
        } else {
            function_words.push(word.to_string());
        }
    }

    let has_atoms = matrix_words.iter().any(|w| ATOM_KEYWORDS.contains(&split_keyword(w).0));
    if !has_atoms {
        bail!("{}: no atoms specified (use one of {})", label, ATOM_KEYWORDS.join(", "));
    }

    let matrix = format!("{}_mat", label);
    let mut out = vec![];

    matrix_words.push("COMPONENTS".to_string());
    out.push(ActionRequest::new(&matrix[..], "CONTACT_MATRIX", matrix_words));

    let mut words = vec![
        format!("WEIGHT={}.w", matrix),
        format!("VECTORS1={}.x", matrix),
        format!("VECTORS2={}.y", matrix),
        format!("VECTORS3={}.z", matrix),
    ];
    words.extend(function_words);
    out.push(ActionRequest::new(label, name, words));

    for (key, value) in reductions {
        out.extend(expand_reduction(label, key, value)?);
    }
    debug!("expanded {} into {} actions", label, out.len());
    Ok(out)
}

fn expand_reduction(label: &str, key: &str, value: Option<&str>) -> FailResult<Vec<ActionRequest>> {
    let arg = |of: &str| format!("ARG={}", of);
    let no_periodic = || "PERIODIC=NO".to_string();

    Ok(match (key, value) {
        ("MEAN", None) => vec![
            ActionRequest::new(format!("{}_mean", label), "MEAN", vec![arg(label), no_periodic()]),
        ],
        ("SUM", None) => vec![
            ActionRequest::new(format!("{}_sum", label), "SUM", vec![arg(label), no_periodic()]),
        ],
        ("LESS_THAN", Some(switch)) | ("MORE_THAN", Some(switch)) => {
            let (short, long) = match key {
                "LESS_THAN" => ("lt", "lessthan"),
                _ => ("mt", "morethan"),
            };
            let filtered = format!("{}_{}", label, short);
            vec![
                ActionRequest::new(&filtered[..], key, vec![arg(label), format!("SWITCH={}", switch)]),
                ActionRequest::new(format!("{}_{}", label, long), "SUM", vec![arg(&filtered), no_periodic()]),
            ]
        },
        (_, Some(_)) => bail!("{}: {} is a flag and takes no value", label, key),
        (_, None) => bail!("{}: {} needs a switching function", label, key),
    })
}
