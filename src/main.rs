//! Concrete strength prediction CLI
//!
//! Predicts compressive strength from an eight-field mix design using a
//! pre-trained gradient-boosted regression artifact.

use clap::{Parser, Subcommand};
use concrete::mix::Unit;
use concrete::{Config, Result};

#[derive(Parser)]
#[command(name = "concrete")]
#[command(about = "Concrete compressive strength prediction from mix design", long_about = None)]
struct Cli {
    /// Config file path
    #[arg(short, long, default_value = "config.toml")]
    config: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict compressive strength for a mix design
    Predict {
        /// Cement content
        #[arg(long)]
        cement: Option<f64>,
        /// Blast-furnace slag content
        #[arg(long)]
        slag: Option<f64>,
        /// Fly ash content
        #[arg(long)]
        fly_ash: Option<f64>,
        /// Water content
        #[arg(long)]
        water: Option<f64>,
        /// Superplasticizer content
        #[arg(long)]
        superplasticizer: Option<f64>,
        /// Coarse aggregate content
        #[arg(long)]
        coarse: Option<f64>,
        /// Fine aggregate content
        #[arg(long)]
        fine: Option<f64>,
        /// Age of the concrete in days
        #[arg(long)]
        age: Option<f64>,
        /// Unit for mass-per-volume inputs
        #[arg(long, default_value = "kg/m3")]
        unit: Unit,
        /// Batch input file (JSON array of mix designs)
        #[arg(long)]
        batch: Option<String>,
        /// Output format
        #[arg(long, default_value = "table")]
        format: OutputFormat,
    },
    /// Model management commands
    Model {
        #[command(subcommand)]
        action: ModelCommands,
    },
    /// Initialize a new project with default config
    Init,
}

#[derive(Subcommand)]
enum ModelCommands {
    /// Show model information
    Info,
    /// Replay the artifact's verification sample
    Verify,
}

#[derive(Clone, Debug)]
enum OutputFormat {
    Table,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" => Ok(OutputFormat::Table),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}. Use table, json, or csv.", s)),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    // Initialize logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level))
        .format_timestamp(None)
        .init();

    // Load or create config
    let config = if std::path::Path::new(&cli.config).exists() {
        match Config::load(&cli.config) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        Config::default()
    };

    // Run command
    let result = match cli.command {
        Commands::Predict {
            cement,
            slag,
            fly_ash,
            water,
            superplasticizer,
            coarse,
            fine,
            age,
            unit,
            batch,
            format,
        } => commands::predict(
            &config,
            [
                cement,
                slag,
                fly_ash,
                water,
                superplasticizer,
                coarse,
                fine,
                age,
            ],
            unit,
            batch,
            format,
        ),
        Commands::Model { action } => match action {
            ModelCommands::Info => commands::model_info(&config),
            ModelCommands::Verify => commands::model_verify(&config),
        },
        Commands::Init => commands::init(&cli.config),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

mod commands {
    use super::*;
    use concrete::mix::MixDesign;
    use concrete::model::ArtifactStore;
    use concrete::predict::{format_prediction, Predictor};
    use concrete::ConcreteError;

    pub fn init(config_path: &str) -> Result<()> {
        let config = Config::default();
        config.save(config_path)?;
        println!("Created default config at {}", config_path);

        std::fs::create_dir_all("model")?;
        println!("Created model/ directory");

        println!("\nNext steps:");
        println!("  1. Edit {} to point at your exported artifact", config_path);
        println!("  2. Run 'concrete model info' to check the artifact");
        println!("  3. Run 'concrete predict --cement 540 --slag 0 --fly-ash 0 --water 162 \\");
        println!("          --superplasticizer 2.5 --coarse 1040 --fine 676 --age 28'");

        Ok(())
    }

    pub fn predict(
        config: &Config,
        fields: [Option<f64>; 8],
        unit: Unit,
        batch: Option<String>,
        format: OutputFormat,
    ) -> Result<()> {
        let store = ArtifactStore::from_config(&config.artifact);
        let artifacts = store.get()?;
        let predictor = Predictor::from_loaded(&artifacts, config.validation.zero_policy)?;

        // Batch prediction from a JSON file
        if let Some(path) = batch {
            let content = std::fs::read_to_string(&path)?;
            let entered: Vec<MixDesign> = serde_json::from_str(&content).map_err(|e| {
                ConcreteError::InvalidInput {
                    field: "batch",
                    reason: format!("failed to parse {}: {}", path, e),
                }
            })?;
            let mixes: Vec<MixDesign> = entered.iter().map(|m| m.to_canonical(unit)).collect();
            let results = predictor.predict_batch(&mixes);
            return print_batch(&mixes, &results, format);
        }

        // Single mix prediction
        if let [Some(cement), Some(slag), Some(fly_ash), Some(water), Some(superplasticizer), Some(coarse), Some(fine), Some(age)] =
            fields
        {
            let entered = MixDesign {
                cement,
                blast_furnace_slag: slag,
                fly_ash,
                water,
                superplasticizer,
                coarse_aggregate: coarse,
                fine_aggregate: fine,
                age_days: age,
            };
            let mix = entered.to_canonical(unit);
            let prediction = predictor.predict(&mix)?;

            match format {
                OutputFormat::Table => {
                    print!("{}", format_prediction(&prediction, &mix));
                }
                OutputFormat::Json => {
                    let json = serde_json::json!({
                        "mix": mix,
                        "strength": prediction.strength,
                        "display": prediction.to_string(),
                        "class": prediction.class.to_string(),
                        "confidence": prediction.confidence.to_string(),
                        "extrapolated": prediction.extrapolated,
                    });
                    println!("{}", serde_json::to_string_pretty(&json).unwrap());
                }
                OutputFormat::Csv => {
                    println!("cement,slag,fly_ash,water,superplasticizer,coarse,fine,age,strength,class,confidence");
                    println!(
                        "{},{},{},{},{},{},{},{},{:.4},{},{}",
                        mix.cement,
                        mix.blast_furnace_slag,
                        mix.fly_ash,
                        mix.water,
                        mix.superplasticizer,
                        mix.coarse_aggregate,
                        mix.fine_aggregate,
                        mix.age_days,
                        prediction.strength,
                        prediction.class,
                        prediction.confidence
                    );
                }
            }
        } else {
            println!("Usage: concrete predict --cement N --slag N --fly-ash N --water N \\");
            println!("                        --superplasticizer N --coarse N --fine N --age DAYS");
            println!("\nExample:");
            println!("  concrete predict --cement 540 --slag 0 --fly-ash 0 --water 162 \\");
            println!("                   --superplasticizer 2.5 --coarse 1040 --fine 676 --age 28");
        }

        Ok(())
    }

    fn print_batch(
        mixes: &[MixDesign],
        results: &[Result<concrete::StrengthPrediction>],
        format: OutputFormat,
    ) -> Result<()> {
        match format {
            OutputFormat::Table => {
                for (i, result) in results.iter().enumerate() {
                    match result {
                        Ok(pred) => println!(
                            "Mix {:>3}: {} ({}, {} confidence)",
                            i + 1,
                            pred,
                            pred.class,
                            pred.confidence
                        ),
                        Err(e) => println!("Mix {:>3}: failed: {}", i + 1, e),
                    }
                }
            }
            OutputFormat::Json => {
                let rows: Vec<serde_json::Value> = results
                    .iter()
                    .zip(mixes.iter())
                    .map(|(result, mix)| match result {
                        Ok(pred) => serde_json::json!({
                            "mix": mix,
                            "strength": pred.strength,
                            "class": pred.class.to_string(),
                            "confidence": pred.confidence.to_string(),
                            "extrapolated": pred.extrapolated,
                        }),
                        Err(e) => serde_json::json!({
                            "mix": mix,
                            "error": e.to_string(),
                        }),
                    })
                    .collect();
                println!("{}", serde_json::to_string_pretty(&rows).unwrap());
            }
            OutputFormat::Csv => {
                println!("index,strength,class,confidence,error");
                for (i, result) in results.iter().enumerate() {
                    match result {
                        Ok(pred) => println!(
                            "{},{:.4},{},{},",
                            i + 1,
                            pred.strength,
                            pred.class,
                            pred.confidence
                        ),
                        Err(e) => println!("{},,,,\"{}\"", i + 1, e),
                    }
                }
            }
        }
        Ok(())
    }

    pub fn model_info(config: &Config) -> Result<()> {
        let store = ArtifactStore::from_config(&config.artifact);
        let artifacts = store.get()?;
        let model = &artifacts.model;

        println!("Model Information");
        println!("───────────────────────────────");
        println!("  Path:          {}", config.artifact.model_path);
        println!("  Model id:      {}", model.model_id);
        println!("  Trained:       {}", model.trained_at);
        println!("  Trees:         {}", model.model.tree_count());
        println!("  Learning rate: {}", model.model.learning_rate);
        println!("  Base:          {:.2} N/mm²", model.model.base_prediction);
        println!(
            "  Scaled inputs: {}",
            if model.scaled_inputs { "yes" } else { "no" }
        );
        match &artifacts.scaler {
            Some(scaler) => println!("  Scaler:        paired with {}", scaler.model_id),
            None => println!("  Scaler:        none"),
        }
        println!(
            "  Verification:  {}",
            if model.verification.is_some() {
                "sample recorded"
            } else {
                "none"
            }
        );

        Ok(())
    }

    pub fn model_verify(config: &Config) -> Result<()> {
        let store = ArtifactStore::from_config(&config.artifact);
        let artifacts = store.get()?;
        let predictor = Predictor::from_loaded(&artifacts, config.validation.zero_policy)?;

        match &artifacts.model.verification {
            None => {
                println!(
                    "No verification sample recorded in {}",
                    config.artifact.model_path
                );
                Ok(())
            }
            Some(sample) => {
                if predictor.verify(sample)? {
                    println!(
                        "Verification passed: artifacts reproduce {:.4} N/mm²",
                        sample.output
                    );
                    Ok(())
                } else {
                    Err(ConcreteError::Inference(format!(
                        "verification failed: artifacts do not reproduce the recorded {:.4} N/mm²",
                        sample.output
                    )))
                }
            }
        }
    }
}
