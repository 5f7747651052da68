extern crate log;
extern crate pretty_env_logger;

use std::error::Error;
use std::fs;
use std::io::BufReader;
use std::path::{
    Path,
    PathBuf,
};

use clap::Parser;
use serde::{
    Deserialize,
    Serialize,
};

use sparsestack::filtering::KnownAdducts;
use sparsestack::pipeline::{
    clean_metadata,
    compute_scores,
    ScoreFilterConfig,
    ScoringConfig,
};
use sparsestack::scores::{
    LayerSelector,
    StackedSparseScores,
};
use sparsestack::spectrum::Spectrum;
use sparsestack::utils::{
    ContextTimer,
    LogLevel,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long)]
    config: String,
    #[arg(short, long, default_value = "sparsestack_output")]
    output_dir: String,
    #[arg(long, action)]
    write_template: bool,
    /// Spectra to compare (.json). One file compares all-vs-all,
    /// two files compare references (first) against queries (second).
    files: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct MetadataConfig {
    clean_metadata: bool,
    adducts: KnownAdducts,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        MetadataConfig {
            clean_metadata: true,
            adducts: KnownAdducts::default(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
struct OutputConfig {
    scores_csv: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            scores_csv: "scores.csv".into(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
struct Config {
    scoring_config: ScoringConfig,
    filter_config: ScoreFilterConfig,
    metadata_config: MetadataConfig,
    output_config: OutputConfig,
}

impl Config {
    fn from_toml(path: String) -> Result<Self, Box<dyn Error>> {
        let config_str = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&config_str)?;
        Ok(config)
    }
}

fn read_spectra(path: &str) -> Result<Vec<Spectrum>, Box<dyn Error>> {
    let file = fs::File::open(path)?;
    let spectra: Vec<Spectrum> = serde_json::from_reader(BufReader::new(file))?;
    log::info!("Read {} spectra from {}", spectra.len(), path);
    Ok(spectra)
}

fn write_scores_csv(
    scores: &StackedSparseScores,
    references: &[Spectrum],
    queries: &[Spectrum],
    out_path: PathBuf,
) -> Result<(), Box<dyn Error>> {
    let mut writer = csv::Writer::from_path(&out_path)?;

    let mut header = vec![
        "row".to_string(),
        "col".to_string(),
        "reference_id".to_string(),
        "query_id".to_string(),
    ];
    header.extend(scores.score_names().iter().cloned());
    writer.write_record(&header)?;

    let layers = scores
        .score_names()
        .iter()
        .map(|name| scores.layer_values(LayerSelector::Name(name)))
        .collect::<Result<Vec<_>, _>>()?;

    for (k, (row, col)) in scores.row().iter().zip(scores.col().iter()).enumerate() {
        let mut record = vec![
            row.to_string(),
            col.to_string(),
            references[*row].metadata.id.clone().unwrap_or_default(),
            queries[*col].metadata.id.clone().unwrap_or_default(),
        ];
        record.extend(layers.iter().map(|layer| layer[k].to_string()));
        writer.write_record(&record)?;
    }
    writer.flush()?;
    log::info!("Wrote {} scored pairs to {:?}", scores.nnz(), out_path);
    Ok(())
}

fn run(
    args: Args,
    config: Config,
) -> Result<(), Box<dyn Error>> {
    let (references, queries, is_symmetric) = match args.files.as_slice() {
        [single] => {
            let spectra = read_spectra(single)?;
            (spectra.clone(), spectra, true)
        },
        [refs, queries] => (read_spectra(refs)?, read_spectra(queries)?, false),
        _ => return Err("Expected one or two spectrum files".into()),
    };

    let (references, queries) = if config.metadata_config.clean_metadata {
        let adducts = &config.metadata_config.adducts;
        (
            clean_metadata(references, adducts),
            clean_metadata(queries, adducts),
        )
    } else {
        (references, queries)
    };

    let scores = compute_scores(
        &references,
        &queries,
        is_symmetric,
        &config.scoring_config,
        &config.filter_config,
    )?;

    let out_path_dir = Path::new(&args.output_dir);
    if !out_path_dir.exists() {
        fs::create_dir_all(out_path_dir)?;
    }
    let out_path = out_path_dir.join(&config.output_config.scores_csv);
    write_scores_csv(&scores, &references, &queries, out_path)?;
    Ok(())
}

fn main() {
    let args = Args::parse();

    if args.write_template {
        let config = Config::default();
        let config_str = toml::to_string_pretty(&config).expect("Default config is serializable");

        let out_path = args.config;
        if fs::metadata(&out_path).is_ok() {
            panic!("File already exists: {}", out_path);
        }
        std::fs::write(&out_path, config_str).expect("Could not write config template");
        println!("Wrote default config to {}", out_path);
        return;
    }

    pretty_env_logger::init();

    let config = match Config::from_toml(args.config.clone()) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Error reading config {}: {}", args.config, e);
            std::process::exit(1);
        },
    };

    let mut timer = ContextTimer::new("sparsestack", true, LogLevel::INFO);
    let out = run(args, config);
    timer.stop(true);
    if let Err(e) = out {
        log::error!("Error computing scores: {}", e);
        std::process::exit(1);
    }
}
