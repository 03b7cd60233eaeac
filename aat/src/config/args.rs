//! Command-line argument parsing for AAT calculations

use clap::Parser;

/// Atomic axial tensors from perturbed wavefunction snapshots
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short, long)]
    pub config_file: Option<String>,

    /// Override the snapshot archive (YAML or JSON)
    #[arg(short, long)]
    pub snapshots: Option<String>,

    /// Override output file: (default stdout)
    #[arg(short, long)]
    pub output: Option<String>,

    /// Write the tensors to this plain-text report
    #[arg(long)]
    pub report: Option<String>,

    /// Override method (rhf, cid or mp2)
    #[arg(long)]
    pub method: Option<String>,

    /// Override normalization (full or intermediate)
    #[arg(long)]
    pub normalization: Option<String>,

    /// Override orbital representation (spin or spatial)
    #[arg(long)]
    pub orbitals: Option<String>,

    /// Override double-double loop strategy (restricted or full)
    #[arg(long)]
    pub strategy: Option<String>,

    /// Override nuclear displacement step (bohr)
    #[arg(long)]
    pub nuclear_step: Option<f64>,

    /// Override magnetic field step (a.u.)
    #[arg(long)]
    pub field_step: Option<f64>,

    /// Evaluate double-double blocks on a worker pool
    #[arg(long)]
    pub parallel: bool,

    /// Override worker count
    #[arg(long)]
    pub num_workers: Option<usize>,

    /// Evaluate a single element given as "R,B"
    #[arg(long, value_parser = parse_element)]
    pub element: Option<(usize, usize)>,
}

fn parse_element(s: &str) -> Result<(usize, usize), String> {
    let (r, b) = s
        .split_once(',')
        .ok_or_else(|| format!("expected R,B but got '{}'", s))?;
    let parse = |v: &str| {
        v.trim()
            .parse::<usize>()
            .map_err(|e| format!("invalid index '{}': {}", v, e))
    };
    Ok((parse(r)?, parse(b)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_argument() {
        assert_eq!(parse_element("4,2"), Ok((4, 2)));
        assert_eq!(parse_element(" 0 , 1 "), Ok((0, 1)));
        assert!(parse_element("4").is_err());
        assert!(parse_element("a,1").is_err());

        let args = Args::parse_from(["aat", "--element", "3,1", "--parallel", "--method", "CID"]);
        assert_eq!(args.element, Some((3, 1)));
        assert!(args.parallel);
        assert_eq!(args.method.as_deref(), Some("CID"));
    }
}
