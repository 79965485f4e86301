use std::path::{Path, PathBuf};

use approx::assert_abs_diff_eq;
use rand::{rngs::StdRng, Rng, SeedableRng};

use ferrite_mlp::{
    load_input, load_network, Digit, LayerShape, LoadError, Matrix, MatrixError, MlpNetwork,
    MlpTopology,
};

fn random(rng: &mut StdRng, rows: usize, cols: usize) -> Matrix {
    let data = (0..rows * cols).map(|_| rng.gen_range(-0.5..0.5)).collect();
    Matrix::from_vec(rows, cols, data).unwrap()
}

fn write(dir: &Path, name: &str, m: &Matrix) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, m.to_bytes()).unwrap();
    path
}

/// Writes `weights`/`biases` as w1..w4 / b1..b4 and returns their paths.
fn write_params(
    dir: &Path,
    weights: &[Matrix; 4],
    biases: &[Matrix; 4],
) -> ([PathBuf; 4], [PathBuf; 4]) {
    let w = [0usize, 1, 2, 3].map(|k| write(dir, &format!("w{}", k + 1), &weights[k]));
    let b = [0usize, 1, 2, 3].map(|k| write(dir, &format!("b{}", k + 1), &biases[k]));
    (w, b)
}

fn random_params(rng: &mut StdRng, topology: &MlpTopology) -> ([Matrix; 4], [Matrix; 4]) {
    let dims = topology.layers.map(|s| (s.rows as usize, s.cols as usize));
    (
        dims.map(|(r, c)| random(rng, r, c)),
        dims.map(|(r, _)| random(rng, r, 1)),
    )
}

#[test]
fn file_loaded_network_matches_in_memory_network() {
    let mut rng = StdRng::seed_from_u64(2024);
    let topology = MlpTopology::default();
    let (weights, biases) = random_params(&mut rng, &topology);
    let dir = tempfile::tempdir().unwrap();
    let (w_paths, b_paths) = write_params(dir.path(), &weights, &biases);

    let loaded = load_network(&w_paths, &b_paths, &topology).unwrap();
    let reference = MlpNetwork::new(weights, biases);

    let sample = random(&mut rng, 28, 28).map(f32::abs);
    let sample_path = write(dir.path(), "im0", &sample);
    let input = load_input(&sample_path, &topology).unwrap();
    assert_eq!(input, sample);

    let probs = loaded.infer_probabilities(&input).unwrap();
    assert_eq!(probs.shape(), (10, 1));
    assert_abs_diff_eq!(probs.sum(), 1.0, epsilon = 1e-5);

    let digit = loaded.infer(&input).unwrap();
    assert_eq!(digit, reference.infer(&sample).unwrap());
    assert!(digit.class_index < 10);
    assert_eq!(digit, Digit::from_output(&probs).unwrap());
}

#[test]
fn one_neuron_network_from_files() {
    let topology = MlpTopology {
        input_rows: 1,
        input_cols: 1,
        layers: [LayerShape { rows: 1, cols: 1 }; 4],
    };
    let one = Matrix::from_vec(1, 1, vec![1.0]).unwrap();
    let zero = Matrix::zeros(1, 1).unwrap();
    let dir = tempfile::tempdir().unwrap();
    let (w, b) = write_params(
        dir.path(),
        &[one.clone(), one.clone(), one.clone(), one],
        &[zero.clone(), zero.clone(), zero.clone(), zero],
    );

    let net = load_network(&w, &b, &topology).unwrap();
    let digit = net.infer(&Matrix::from_vec(1, 1, vec![5.0]).unwrap()).unwrap();
    assert_eq!(digit.class_index, 0);
    assert_eq!(digit.probability, 1.0);
}

#[test]
fn truncated_weight_file_is_rejected() {
    let mut rng = StdRng::seed_from_u64(1);
    let topology = MlpTopology::default();
    let (weights, biases) = random_params(&mut rng, &topology);
    let dir = tempfile::tempdir().unwrap();
    let (w_paths, b_paths) = write_params(dir.path(), &weights, &biases);

    let bytes = std::fs::read(&w_paths[2]).unwrap();
    std::fs::write(&w_paths[2], &bytes[..bytes.len() - 4]).unwrap();

    match load_network(&w_paths, &b_paths, &topology).unwrap_err() {
        LoadError::FileSize { path, expected, actual } => {
            assert_eq!(path, w_paths[2]);
            assert_eq!(expected, 20 * 64 * 4);
            assert_eq!(actual, (20 * 64 * 4 - 4) as u64);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn truncated_stream_is_stream_too_short() {
    let mut m = Matrix::zeros(28, 28).unwrap();
    let short = vec![0u8; 28 * 28 * 4 - 1];
    assert_eq!(
        m.load_from_bytes(short.as_slice()).unwrap_err(),
        MatrixError::StreamTooShort { expected: 3136, actual: 3135 }
    );
}

#[test]
fn independent_instances_run_on_separate_threads() {
    let mut rng = StdRng::seed_from_u64(99);
    let topology = MlpTopology::default();
    let (weights, biases) = random_params(&mut rng, &topology);
    let net = MlpNetwork::new(weights, biases);
    let samples: Vec<Matrix> = (0..4).map(|_| random(&mut rng, 28, 28)).collect();
    let expected: Vec<Digit> = samples.iter().map(|s| net.infer(s).unwrap()).collect();

    let handles: Vec<_> = samples
        .into_iter()
        .map(|sample| {
            let net = net.clone();
            std::thread::spawn(move || net.infer(&sample).unwrap())
        })
        .collect();
    for (handle, want) in handles.into_iter().zip(expected) {
        assert_eq!(handle.join().unwrap(), want);
    }
}
