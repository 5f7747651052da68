use rand::rngs::StdRng;
use rand::{
    Rng,
    SeedableRng,
};

use sparsestack::mod_types::Float;
use sparsestack::scores::{
    AxisIndex,
    CooScores,
    DenseScores,
    LayerSelector,
    StackedSparseScores,
};

fn arange(
    n_row: usize,
    n_col: usize,
) -> DenseScores {
    DenseScores::from_fn(n_row, n_col, |i, j| (i * n_col + j) as Float)
}

fn float_range(
    start: usize,
    end: usize,
    step: usize,
) -> Vec<Float> {
    (start..end).step_by(step).map(|x| x as Float).collect()
}

#[test]
fn test_add_dense() {
    let mut matrix = StackedSparseScores::new(12, 10);
    assert_eq!(matrix.shape(), (12, 10, 0));
    matrix.add_dense("test_score", &arange(12, 10)).unwrap();
    assert_eq!(matrix.shape(), (12, 10, 1));
    assert_eq!(matrix.data("test_score").unwrap(), float_range(1, 120, 1));
    assert!(matrix.data("other_name").is_none());
}

#[test]
fn test_add_sparse() {
    let dense = DenseScores::from_fn(12, 10, |i, j| {
        let v = i * 10 + j;
        if v % 2 == 1 || v % 4 == 0 {
            0.
        } else {
            v as Float
        }
    });

    let mut matrix = StackedSparseScores::new(12, 10);
    matrix
        .add_sparse("test_score", &CooScores::from_dense(&dense))
        .unwrap();
    assert_eq!(matrix.shape(), (12, 10, 1));
    assert_eq!(matrix.data("test_score").unwrap(), float_range(2, 120, 4));

    let all = matrix.layer("test_score".into()).unwrap();
    assert_eq!(all.values, float_range(2, 120, 4));
    assert_eq!(all.row, vec![
        0, 0, 1, 1, 1, 2, 2, 3, 3, 3, 4, 4, 5, 5, 5, 6, 6, 7, 7, 7, 8, 8, 9, 9, 9, 10, 10, 11, 11,
        11
    ]);
    assert_eq!(&all.col[..6], &[2, 6, 0, 4, 8, 2]);
    assert!(matrix.data("other_name").is_none());
}

#[test]
fn test_sparse_input_order_does_not_matter() {
    let coo = CooScores::new(3, 3, vec![2, 0, 1], vec![0, 2, 1], vec![3., 1., 2.]).unwrap();
    let mut matrix = StackedSparseScores::new(3, 3);
    matrix.add_sparse("s", &coo).unwrap();
    assert_eq!(matrix.row(), &[0, 1, 2]);
    assert_eq!(matrix.col(), &[2, 1, 0]);
    assert_eq!(matrix.data("s").unwrap(), &[1., 2., 3.]);
}

#[test]
fn test_slicing() {
    let mut matrix = StackedSparseScores::new(12, 10);
    matrix.add_dense("test_score", &arange(12, 10)).unwrap();

    assert_eq!(matrix.get(0, 0).unwrap(), 0.);
    assert_eq!(matrix.get(2, 2).unwrap(), 22.);
    assert_eq!(
        matrix
            .get_layer(2, 2, LayerSelector::Position(0))
            .unwrap(),
        22.
    );
    assert_eq!(matrix.get(-1, -1).unwrap(), 119.);

    let last_col = matrix.col_slice(-1, LayerSelector::First).unwrap();
    assert_eq!(last_col.values, float_range(9, 120, 10));
    assert!(last_col.col.iter().all(|c| *c == 9));

    let row = matrix
        .slice(AxisIndex::At(2), AxisIndex::All, LayerSelector::First)
        .unwrap();
    assert_eq!(row.values, float_range(20, 30, 1));
    assert!(row.row.iter().all(|r| *r == 2));

    let by_name = matrix.layer("test_score".into()).unwrap();
    let everything = matrix
        .slice(AxisIndex::All, AxisIndex::All, LayerSelector::First)
        .unwrap();
    assert_eq!(by_name.len(), 119);
    assert_eq!(by_name, everything);
    assert_eq!(everything.values, float_range(1, 120, 1));
}

#[test]
fn test_filter_by_range() {
    let mut matrix = StackedSparseScores::new(12, 10);
    matrix.add_dense("test_score", &arange(12, 10)).unwrap();
    let removed = matrix.filter_by_range(None, Some(70.), Some(85.)).unwrap();
    assert_eq!(removed, 119 - 14);
    assert_eq!(matrix.data("test_score").unwrap(), float_range(71, 85, 1));
}

#[test]
fn test_filter_by_range_stacked() {
    let scores1 = arange(12, 10);
    let scores2 = DenseScores::from_fn(12, 10, |i, j| {
        if i * 10 + j < 80 {
            0.
        } else {
            0.9
        }
    });

    let mut matrix = StackedSparseScores::new(12, 10);
    matrix.add_dense("scores1", &scores1).unwrap();
    matrix.filter_by_range(None, Some(70.), Some(85.)).unwrap();
    assert_eq!(matrix.shape(), (12, 10, 1));
    assert_eq!(matrix.data("scores1").unwrap(), float_range(71, 85, 1));

    matrix.add_dense("scores2", &scores2).unwrap();
    matrix
        .filter_by_range(Some("scores2"), Some(0.5), None)
        .unwrap();
    assert_eq!(matrix.shape(), (12, 10, 2));
    assert_eq!(matrix.get_layer(8, 1, LayerSelector::Position(0)).unwrap(), 81.);
    assert_eq!(matrix.get_layer(8, 1, LayerSelector::Position(1)).unwrap(), 0.9);
    assert_eq!(matrix.data("scores1").unwrap(), float_range(80, 85, 1));
    assert_eq!(matrix.col(), &[0, 1, 2, 3, 4]);
    assert!(matrix.row().iter().all(|r| *r == 8));
    assert_eq!(matrix.score_names(), &["scores1", "scores2"]);
}

#[test]
fn test_sparse_projection_fills_zeros() {
    let mut matrix = StackedSparseScores::new(12, 10);
    matrix.add_dense("base", &arange(12, 10)).unwrap();
    matrix.filter_by_range(None, Some(10.), Some(14.)).unwrap();
    assert_eq!(matrix.col(), &[1, 2, 3]);

    // (1, 1) is not in the batch, (0, 5) is not in the pattern.
    let batch = CooScores::new(12, 10, vec![1, 1, 0], vec![2, 3, 5], vec![0.5, 0.25, 7.]).unwrap();
    matrix.add_sparse("partial", &batch).unwrap();
    assert_eq!(matrix.data("partial").unwrap(), &[0., 0.5, 0.25]);
    assert_eq!(matrix.nnz(), 3);
}

#[test]
fn test_reads_do_not_modify() {
    let mut matrix = StackedSparseScores::new(12, 10);
    matrix.add_dense("test_score", &arange(12, 10)).unwrap();
    matrix.filter_by_range(None, Some(30.), Some(75.)).unwrap();
    let row_before = matrix.row().to_vec();
    let col_before = matrix.col().to_vec();
    let data_before = matrix.data("test_score").unwrap().to_vec();

    for (i, j) in [(4, 2), (0, 0), (-5, -1)] {
        assert_eq!(matrix.get(i, j).unwrap(), matrix.get(i, j).unwrap());
    }
    assert_eq!(matrix.get(4, 2).unwrap(), 42.);
    assert_eq!(
        matrix.row_slice(5, LayerSelector::First).unwrap(),
        matrix.row_slice(5, LayerSelector::First).unwrap()
    );
    assert_eq!(
        matrix.col_slice(-3, "test_score".into()).unwrap(),
        matrix.col_slice(-3, "test_score".into()).unwrap()
    );
    assert_eq!(
        matrix.layer(LayerSelector::Position(0)).unwrap(),
        matrix.layer(LayerSelector::Position(0)).unwrap()
    );

    assert_eq!(matrix.row(), row_before.as_slice());
    assert_eq!(matrix.col(), col_before.as_slice());
    assert_eq!(matrix.data("test_score").unwrap(), data_before.as_slice());
    assert_eq!(matrix.shape(), (12, 10, 1));
}

fn random_dense(
    rng: &mut StdRng,
    n_row: usize,
    n_col: usize,
    density: f64,
) -> DenseScores {
    DenseScores::from_fn(n_row, n_col, |_, _| {
        if rng.gen_bool(density) {
            rng.gen_range(0.01..1.0) as Float
        } else {
            0.
        }
    })
}

#[test]
fn test_random_layers_stay_consistent() {
    let mut rng = StdRng::seed_from_u64(42);
    for _ in 0..20 {
        let n_row = rng.gen_range(1..30);
        let n_col = rng.gen_range(1..30);
        let first = random_dense(&mut rng, n_row, n_col, 0.3);
        let second = random_dense(&mut rng, n_row, n_col, 0.5);

        let mut matrix = StackedSparseScores::new(n_row, n_col);
        matrix.add_dense("first", &first).unwrap();
        assert_eq!(matrix.nnz(), first.nonzero().count());

        matrix
            .add_sparse("second", &CooScores::from_dense(&second))
            .unwrap();
        assert_eq!(matrix.nnz(), first.nonzero().count());

        // Every stored entry reads back what the inputs hold there.
        let second_values = matrix.data("second").unwrap();
        for (k, (r, c)) in matrix.row().iter().zip(matrix.col().iter()).enumerate() {
            assert_ne!(first.get(*r, *c), 0.);
            assert_eq!(second_values[k], second.get(*r, *c));
        }

        // Coordinates stay sorted row-major without duplicates.
        let coords = matrix
            .row()
            .iter()
            .zip(matrix.col().iter())
            .collect::<Vec<_>>();
        assert!(coords.windows(2).all(|w| w[0] < w[1]));

        let before = matrix.nnz();
        let removed = matrix
            .filter_by_range(Some("second"), Some(0.25), Some(0.75))
            .unwrap();
        assert_eq!(before - removed, matrix.nnz());
        for name in ["first", "second"] {
            assert_eq!(matrix.data(name).unwrap().len(), matrix.nnz());
        }
        assert!(matrix
            .data("second")
            .unwrap()
            .iter()
            .all(|v| *v > 0.25 && *v < 0.75));

        let dense_out = matrix.to_dense("first".into()).unwrap();
        assert_eq!(dense_out.nonzero().count(), matrix.nnz());
    }
}
