use crate::config::{Args, Config};
use aat::{AatOptions, ElementIndex, LoopStrategy, Method, Normalization, OrbitalRepresentation};
use color_eyre::eyre::Result;
use tracing::info;

fn pick<'a>(arg: Option<&'a String>, config: Option<&'a String>, default: &'a str) -> &'a str {
    arg.or(config).map(String::as_str).unwrap_or(default)
}

/// Command-line values win over the configuration file, which wins over
/// the library defaults.
pub fn resolve_options(args: &Args, config: &Config) -> Result<AatOptions> {
    let params = &config.aat;
    let defaults = AatOptions::default();

    let method: Method = pick(args.method.as_ref(), params.method.as_ref(), "rhf").parse()?;
    let normalization: Normalization = pick(
        args.normalization.as_ref(),
        params.normalization.as_ref(),
        "full",
    )
    .parse()?;
    let representation: OrbitalRepresentation =
        pick(args.orbitals.as_ref(), params.orbitals.as_ref(), "spatial").parse()?;
    let strategy: LoopStrategy =
        pick(args.strategy.as_ref(), params.strategy.as_ref(), "restricted").parse()?;

    let element = args
        .element
        .or(params.element.map(|[r, b]| (r, b)))
        .map(|(r, b)| ElementIndex::new(r, b));

    let options = AatOptions {
        method,
        normalization,
        representation,
        strategy,
        nuclear_step: args
            .nuclear_step
            .or(params.nuclear_step)
            .unwrap_or(defaults.nuclear_step),
        field_step: args
            .field_step
            .or(params.field_step)
            .unwrap_or(defaults.field_step),
        parallel: args.parallel || config.is_parallel(),
        num_workers: args.num_workers.unwrap_or_else(|| config.num_workers()),
        batch_size: None,
        element,
        stop_flag: None,
    };

    info!("AAT parameters:");
    info!("  Method: {}", options.method);
    info!("  Normalization: {}", options.normalization);
    info!("  Orbitals: {}", options.representation);
    info!("  Loop strategy: {}", options.strategy);
    info!("  Nuclear step: {:.3e}", options.nuclear_step);
    info!("  Field step: {:.3e}", options.field_step);
    if options.parallel {
        info!("  Workers: {}", options.num_workers);
    }
    if let Some(element) = options.element {
        info!("  Single element: ({}, {})", element.coordinate, element.field);
    }

    Ok(options)
}
