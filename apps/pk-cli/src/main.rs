use clap::{Parser, Subcommand, ValueEnum};
use pk_equilibrium::{
    ActivityCoefficients, ActivityFlavor, EquilibriumResult, Thermo, ThermoConfig, database,
    load_yaml,
};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "pk-cli")]
#[command(about = "PhaseKit CLI - Vapor/liquid equilibrium of nonideal mixtures", long_about = None)]
struct Cli {
    /// Configuration YAML file (chemicals, records, flavor, solver options)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Chemicals to use when no configuration file is given
    #[arg(long, global = true, value_delimiter = ',', default_value = "Ethanol,Water")]
    chemicals: Vec<String>,

    /// Activity coefficient flavor, overriding the configuration
    #[arg(long, global = true, value_enum)]
    flavor: Option<Flavor>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum Flavor {
    Unifac,
    Dortmund,
}

impl From<Flavor> for ActivityFlavor {
    fn from(flavor: Flavor) -> Self {
        match flavor {
            Flavor::Unifac => ActivityFlavor::Unifac,
            Flavor::Dortmund => ActivityFlavor::Dortmund,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in chemicals
    Chemicals,
    /// Bubble point temperature of a liquid at fixed pressure
    BubbleT {
        /// Liquid amounts, comma separated, in chemical order
        #[arg(value_delimiter = ',')]
        composition: Vec<f64>,
        /// Pressure in Pa
        #[arg(long, default_value_t = 101_325.0)]
        pressure: f64,
    },
    /// Bubble point pressure of a liquid at fixed temperature
    BubbleP {
        /// Liquid amounts, comma separated, in chemical order
        #[arg(value_delimiter = ',')]
        composition: Vec<f64>,
        /// Temperature in K
        #[arg(long)]
        temperature: f64,
    },
    /// Dew point temperature of a vapor at fixed pressure
    DewT {
        /// Vapor amounts, comma separated, in chemical order
        #[arg(value_delimiter = ',')]
        composition: Vec<f64>,
        /// Pressure in Pa
        #[arg(long, default_value_t = 101_325.0)]
        pressure: f64,
    },
    /// Dew point pressure of a vapor at fixed temperature
    DewP {
        /// Vapor amounts, comma separated, in chemical order
        #[arg(value_delimiter = ',')]
        composition: Vec<f64>,
        /// Temperature in K
        #[arg(long)]
        temperature: f64,
    },
    /// Liquid activity coefficients
    Gamma {
        /// Liquid amounts, comma separated, in chemical order
        #[arg(value_delimiter = ',')]
        composition: Vec<f64>,
        /// Temperature in K
        #[arg(long)]
        temperature: f64,
    },
}

fn main() -> EquilibriumResult<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    if let Commands::Chemicals = cli.command {
        for id in database::builtin_ids() {
            println!("{id}");
        }
        return Ok(());
    }

    let thermo = build_thermo(&cli)?;
    println!("{thermo}");

    match cli.command {
        Commands::Chemicals => {}
        Commands::BubbleT {
            composition,
            pressure,
        } => {
            let (t, y) = thermo.bubble_point()?.solve_ty(&composition, pressure)?;
            println!("Bubble point at {pressure:.1} Pa: T = {t:.3} K");
            print_composition(&thermo, "y", &y);
        }
        Commands::BubbleP {
            composition,
            temperature,
        } => {
            let (p, y) = thermo.bubble_point()?.solve_py(&composition, temperature)?;
            println!("Bubble point at {temperature:.2} K: P = {p:.1} Pa");
            print_composition(&thermo, "y", &y);
        }
        Commands::DewT {
            composition,
            pressure,
        } => {
            let (t, x) = thermo.dew_point()?.solve_tx(&composition, pressure)?;
            println!("Dew point at {pressure:.1} Pa: T = {t:.3} K");
            print_composition(&thermo, "x", &x);
        }
        Commands::DewP {
            composition,
            temperature,
        } => {
            let (p, x) = thermo.dew_point()?.solve_px(&composition, temperature)?;
            println!("Dew point at {temperature:.2} K: P = {p:.1} Pa");
            print_composition(&thermo, "x", &x);
        }
        Commands::Gamma {
            composition,
            temperature,
        } => {
            let gamma = thermo.activity_coefficients()?.gamma(&composition, temperature)?;
            print_composition(&thermo, "gamma", &gamma);
        }
    }
    Ok(())
}

fn build_thermo(cli: &Cli) -> EquilibriumResult<Thermo> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!(path = %path.display(), "loading configuration");
            load_yaml(path)?
        }
        None => ThermoConfig::new(cli.chemicals.iter().cloned()),
    };
    if let Some(flavor) = cli.flavor {
        config.flavor = flavor.into();
    }
    config.build()
}

fn print_composition(thermo: &Thermo, label: &str, values: &[f64]) {
    for (chemical, v) in thermo.chemicals().iter().zip(values) {
        println!("  {label}[{}] = {v:.5}", chemical.id());
    }
}
