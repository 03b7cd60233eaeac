/* Contracted gaussian type orbitals (CGTO) built on gto.rs,
   plus the NWChem shell-block reader used to assemble them.
*/

#![allow(non_snake_case)]

use crate::basis::Basis;
use crate::gto::GTO;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractedGTO {
    pub primitives: Vec<GTO>,
    pub coefficients: Vec<f64>,
    // shell_type: 1s, 2px, 2py, 2pz, ...
    pub shell_type: String,
    // rescales the contraction to unit self-overlap
    pub norm: f64,
}

impl ContractedGTO {
    /// Builds a normalized contraction of primitives sharing one center and
    /// one Cartesian angular part.
    pub fn new(
        shell_type: &str,
        center: Vector3<f64>,
        l_xyz: Vector3<i32>,
        exponents: &[f64],
        coefficients: &[f64],
    ) -> Self {
        let primitives = exponents
            .iter()
            .map(|&alpha| GTO::new(alpha, l_xyz, center))
            .collect();
        let mut cgto = ContractedGTO {
            primitives,
            coefficients: coefficients.to_vec(),
            shell_type: shell_type.to_string(),
            norm: 1.0,
        };
        let self_overlap = ContractedGTO::Sab(&cgto, &cgto);
        if self_overlap > 0.0 {
            cgto.norm = 1.0 / self_overlap.sqrt();
        }
        cgto
    }

    pub fn center(&self) -> Vector3<f64> {
        self.primitives
            .first()
            .map(|p| p.center)
            .unwrap_or_else(Vector3::zeros)
    }

    /// Same contraction moved to a new center; the normalization is
    /// translation invariant and is carried over.
    pub fn recentered(&self, center: Vector3<f64>) -> Self {
        ContractedGTO {
            primitives: self.primitives.iter().map(|p| p.recentered(center)).collect(),
            coefficients: self.coefficients.clone(),
            shell_type: self.shell_type.clone(),
            norm: self.norm,
        }
    }

    // Example of a shell block in nwchem format:
    // H    S
    //       3.42525091             0.15432897
    //       0.62391373             0.53532814
    //       0.16885540             0.44463454
    // C    SP
    //       2.9412494             -0.09996723             0.15591627
    //       0.6834831              0.39951283             0.60768372
    //       0.2222899              0.70011547             0.39195739
    fn parse_primitive_block(
        lines: &[&str],
        center: Vector3<f64>,
        basis_type: &str,
    ) -> Result<Vec<ContractedGTO>, String> {
        let shells: Vec<(&str, Vector3<i32>, usize)> = match basis_type {
            "S" => vec![("s", Vector3::new(0, 0, 0), 1)],
            "P" => vec![
                ("px", Vector3::new(1, 0, 0), 1),
                ("py", Vector3::new(0, 1, 0), 1),
                ("pz", Vector3::new(0, 0, 1), 1),
            ],
            "SP" => vec![
                ("s", Vector3::new(0, 0, 0), 1),
                ("px", Vector3::new(1, 0, 0), 2),
                ("py", Vector3::new(0, 1, 0), 2),
                ("pz", Vector3::new(0, 0, 1), 2),
            ],
            _ => return Err(format!("Unsupported shell type: {}", basis_type)),
        };

        let mut exponents = Vec::new();
        let mut columns: Vec<Vec<f64>> = vec![Vec::new(); 3];
        for line in lines {
            let tokens: Vec<f64> = line
                .split_whitespace()
                .map(|t| t.replace(|c: char| c == 'D' || c == 'd', "E").parse::<f64>())
                .collect::<Result<_, _>>()
                .map_err(|e| format!("Malformed primitive line '{}': {}", line, e))?;
            if tokens.len() < 2 {
                continue;
            }
            exponents.push(tokens[0]);
            for (col, value) in tokens.iter().skip(1).enumerate().take(2) {
                columns[col + 1].push(*value);
            }
        }

        shells
            .into_iter()
            .map(|(label, l_xyz, col)| {
                let coeffs = &columns[col];
                if coeffs.len() != exponents.len() {
                    return Err(format!(
                        "Shell {} has {} exponents but {} coefficients",
                        basis_type,
                        exponents.len(),
                        coeffs.len()
                    ));
                }
                Ok(ContractedGTO::new(label, center, l_xyz, &exponents, coeffs))
            })
            .collect()
    }

    /// Parses every shell of an NWChem-format basis block and places the
    /// resulting contracted functions on `center`.
    pub fn parse_nwchem(input: &str, center: Vector3<f64>) -> Result<Vec<ContractedGTO>, String> {
        let mut functions = Vec::new();
        let mut current_block: Vec<&str> = Vec::new();
        let mut current_shell_type: Option<&str> = None;

        for line in input.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with("BASIS") || line == "END" {
                continue;
            }

            let tokens: Vec<&str> = line.split_whitespace().collect();
            if tokens.len() == 2 && tokens[0].chars().all(char::is_alphabetic) {
                periodic_table_on_an_enum::Element::from_symbol(tokens[0])
                    .ok_or_else(|| format!("Invalid element symbol: {}", tokens[0]))?;
                if let Some(shell) = current_shell_type {
                    functions.extend(Self::parse_primitive_block(&current_block, center, shell)?);
                }
                current_block.clear();
                current_shell_type = Some(tokens[1]);
            } else if current_shell_type.is_some() {
                current_block.push(line);
            }
        }

        if let Some(shell) = current_shell_type {
            functions.extend(Self::parse_primitive_block(&current_block, center, shell)?);
        }

        Ok(functions)
    }
}

impl Basis for ContractedGTO {
    fn evaluate(&self, r: &Vector3<f64>) -> f64 {
        self.norm
            * self
                .primitives
                .iter()
                .zip(self.coefficients.iter())
                .map(|(p, c)| c * p.evaluate(r))
                .sum::<f64>()
    }

    fn Sab(a: &ContractedGTO, b: &ContractedGTO) -> f64 {
        let mut sum = 0.0;
        for (pa, ca) in a.primitives.iter().zip(a.coefficients.iter()) {
            for (pb, cb) in b.primitives.iter().zip(b.coefficients.iter()) {
                sum += ca * cb * GTO::Sab(pa, pb);
            }
        }
        a.norm * b.norm * sum
    }
}
