//! ferrite-mlp command-line front end.
//!
//! Loads a pretrained four-layer perceptron from eight raw float files and
//! classifies input samples (raw float files or ordinary images).
//!
//! Run with:
//!   ferrite-mlp w1 w2 w3 w4 b1 b2 b3 b4 --image im0
//! Without `--image`, image paths are read from stdin until `q`.
//! Set `RUST_LOG=debug` to trace each layer.
use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{error, info};
use serde::Serialize;

use ferrite_mlp::{
    load_input, load_network, Digit, Matrix, MlpNetwork, MlpTopology, LoadError, PRINT_THRESHOLD,
};

const QUIT: &str = "q";

fn cli() -> Command {
    Command::new("ferrite-mlp")
        .about("Classifies handwritten digits with a pretrained four-layer perceptron")
        .arg(
            Arg::new("params")
                .help("Four weight files followed by four bias files, input layer first")
                .required(true)
                .num_args(8)
                .value_names(["W1", "W2", "W3", "W4", "B1", "B2", "B3", "B4"])
                .index(1),
        )
        .arg(
            Arg::new("topology")
                .help(
                    "JSON file describing the input and layer shapes \
                     (default: 28x28 -> 128 -> 64 -> 20 -> 10)",
                )
                .long("topology")
                .short('t'),
        )
        .arg(
            Arg::new("image")
                .help("Sample to classify; may be repeated. Reads paths from stdin when absent")
                .long("image")
                .short('i')
                .action(ArgAction::Append),
        )
        .arg(
            Arg::new("threshold")
                .help("Pixel value above which a sample is drawn as filled")
                .long("threshold")
                .value_parser(value_parser!(f32))
                .default_value("0.1"),
        )
        .arg(
            Arg::new("json")
                .help("Print one JSON object per sample instead of text")
                .long("json")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("no-render")
                .help("Do not draw the sample before its result")
                .long("no-render")
                .action(ArgAction::SetTrue),
        )
}

/// Output options shared by batch and interactive mode.
struct Presenter {
    threshold: f32,
    json: bool,
    render: bool,
}

#[derive(Serialize)]
struct Report<'a> {
    image: &'a str,
    #[serde(flatten)]
    digit: Digit,
    probabilities: &'a [f32],
}

impl Presenter {
    fn from_matches(matches: &ArgMatches) -> Presenter {
        Presenter {
            threshold: matches.get_one::<f32>("threshold").copied().unwrap_or(PRINT_THRESHOLD),
            json: matches.get_flag("json"),
            render: !matches.get_flag("no-render"),
        }
    }

    fn present(
        &self,
        out: &mut impl Write,
        path: &str,
        input: &Matrix,
        output: &Matrix,
    ) -> Result<()> {
        let digit = Digit::from_output(output)?;
        if self.json {
            let report = Report {
                image: path,
                digit,
                probabilities: output.as_slice(),
            };
            serde_json::to_writer(&mut *out, &report)?;
            writeln!(out)?;
        } else {
            if self.render {
                write!(out, "{}", input.render_thresholded(self.threshold))?;
            }
            writeln!(
                out,
                "Mlp result: {} at probability: {}",
                digit.class_index, digit.probability
            )?;
        }
        Ok(())
    }
}

fn classify(
    network: &MlpNetwork,
    topology: &MlpTopology,
    presenter: &Presenter,
    out: &mut impl Write,
    path: &str,
) -> Result<()> {
    let input = load_input(path, topology)?;
    let output = network
        .infer_probabilities(&input)
        .with_context(|| format!("inference failed for {}", path))?;
    presenter.present(out, path, &input, &output)
}

fn interactive(
    network: &MlpNetwork,
    topology: &MlpTopology,
    presenter: &Presenter,
) -> Result<()> {
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    let mut out = io::stdout().lock();
    loop {
        write!(out, "Please insert image path: ")?;
        out.flush()?;
        let line = match lines.next() {
            Some(line) => line?,
            None => break,
        };
        let path = line.trim();
        if path == QUIT {
            break;
        }
        if path.is_empty() {
            continue;
        }
        if let Err(e) = classify(network, topology, presenter, &mut out, path) {
            error!("{:#}", e);
        }
    }
    Ok(())
}

fn split_params(params: &[String]) -> Option<([&str; 4], [&str; 4])> {
    match params {
        [w1, w2, w3, w4, b1, b2, b3, b4] => Some((
            [w1.as_str(), w2.as_str(), w3.as_str(), w4.as_str()],
            [b1.as_str(), b2.as_str(), b3.as_str(), b4.as_str()],
        )),
        _ => None,
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let matches = cli().get_matches();

    let topology = match matches.get_one::<String>("topology") {
        Some(path) => MlpTopology::load_json(path)
            .map_err(LoadError::from)
            .with_context(|| format!("cannot load topology {}", path))?,
        None => MlpTopology::default(),
    };

    let params: Vec<String> = matches
        .get_many::<String>("params")
        .map(|values| values.cloned().collect())
        .unwrap_or_default();
    let (weights, biases) = split_params(&params)
        .context("expected four weight files followed by four bias files")?;

    let network = load_network(&weights, &biases, &topology).context("cannot load network")?;
    info!("network ready, topology {:?}", topology);

    let presenter = Presenter::from_matches(&matches);
    match matches.get_many::<String>("image") {
        Some(images) => {
            let mut out = io::stdout().lock();
            for path in images {
                classify(&network, &topology, &presenter, &mut out, path)?;
            }
            Ok(())
        }
        None => interactive(&network, &topology, &presenter),
    }
}
