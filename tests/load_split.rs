mod common;

use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use action_seg_datasets::{Dataset, DatasetError, DatasetKind, LoadedSplit};
use ndarray::Array2;
use tempfile::tempdir;

use common::{time_major, write_both, write_features, write_labels, write_manifest};

/// JIGSAWS tree: three sequences a/b/c stored time x features.
fn jigsaws_tree(root: &Path) {
    let base = root.join("JIGSAWS");
    let labels = base.join("labels/sequences/Suturing");
    let features = base.join("features/SpatialCNN");

    let sequences: [(&str, Vec<f64>); 3] = [
        ("a", [vec![2.0; 10], vec![4.0; 10]].concat()),
        ("b", [vec![4.0; 7], vec![7.0; 8]].concat()),
        ("c", vec![9.0; 12]),
    ];
    for (id, y) in &sequences {
        write_labels(&labels, &format!("{id}.mat"), y);
        write_features(&features, &format!("{id}.mat"), &time_major(y.len(), 3));
    }
    write_manifest(&base, 1, &["a.txt", "b.txt", "missing.txt"], &["c.txt"]);
}

fn assert_aligned(loaded: &LoadedSplit) {
    for seq in loaded.train.iter().chain(&loaded.test) {
        assert_eq!(seq.features.ncols(), seq.labels.len(), "{}", seq.id);
    }
    assert!(loaded.report.length_mismatches.is_empty());
}

#[test]
fn jigsaws_split_joins_on_manifest_order() {
    let root = tempdir().unwrap();
    jigsaws_tree(root.path());

    let dataset = Dataset::new(DatasetKind::Jigsaws, root.path(), "SpatialCNN");
    let loaded = dataset.load_split(1, 1).unwrap();

    let train: Vec<_> = loaded.train.iter().map(|s| s.id.as_str()).collect();
    let test: Vec<_> = loaded.test.iter().map(|s| s.id.as_str()).collect();
    assert_eq!(train, ["a", "b"]);
    assert_eq!(test, ["c"]);
    assert_eq!(loaded.report.unmatched_ids, ["missing"]);
    assert!(!loaded.report.empty_train);
    assert_aligned(&loaded);

    let (x_train, y_train, x_test, y_test) = loaded.into_parts();
    assert_eq!(x_train.len(), y_train.len());
    assert_eq!(x_test.len(), 1);
    assert_eq!(y_test[0].len(), 12);
}

#[test]
fn labels_are_dense_over_the_whole_pool() {
    let root = tempdir().unwrap();
    jigsaws_tree(root.path());

    let loaded = Dataset::new(DatasetKind::Jigsaws, root.path(), "SpatialCNN")
        .load_split(1, 1)
        .unwrap();

    // raw {2, 4, 7, 9}
    assert_eq!(loaded.n_classes, 4);
    let seen: BTreeSet<usize> = loaded
        .train
        .iter()
        .chain(&loaded.test)
        .flat_map(|s| s.labels.iter().copied())
        .collect();
    assert_eq!(seen, (0..4).collect::<BTreeSet<usize>>());

    // "c" only holds raw label 9, the largest, even though it sits in test
    assert!(loaded.test[0].labels.iter().all(|&v| v == 3));
}

#[test]
fn time_major_features_are_transposed() {
    let root = tempdir().unwrap();
    jigsaws_tree(root.path());

    let loaded = Dataset::new(DatasetKind::Jigsaws, root.path(), "SpatialCNN")
        .load_split(1, 1)
        .unwrap();

    assert_eq!(loaded.n_features, 3);
    let a = &loaded.train[0];
    assert_eq!(a.features.dim(), (3, 20));
    // [f, t] == t * 10 + f
    assert_eq!(a.features[[2, 5]], 52.0);
}

#[test]
fn subsampling_strides_features_and_labels_together() {
    let root = tempdir().unwrap();
    jigsaws_tree(root.path());

    let loaded = Dataset::new(DatasetKind::Jigsaws, root.path(), "SpatialCNN")
        .load_split(1, 2)
        .unwrap();

    let lens: Vec<_> = loaded.train.iter().map(|s| s.len()).collect();
    assert_eq!(lens, [10, 8]);
    assert_eq!(loaded.train[0].features[[0, 1]], 20.0);
    assert_aligned(&loaded);
}

#[test]
fn unresolvable_feature_file_drops_the_sequence() {
    let root = tempdir().unwrap();
    jigsaws_tree(root.path());
    let gone = root.path().join("JIGSAWS/features/SpatialCNN/b.mat");
    fs::remove_file(&gone).unwrap();

    let loaded = Dataset::new(DatasetKind::Jigsaws, root.path(), "SpatialCNN")
        .load_split(1, 1)
        .unwrap();

    assert_eq!(loaded.report.missing_files, [gone]);
    assert_eq!(loaded.train.len(), 1);
    assert_eq!(loaded.report.unmatched_ids, ["b", "missing"]);
}

#[test]
fn empty_train_partition_is_reported_not_fatal() {
    let root = tempdir().unwrap();
    jigsaws_tree(root.path());
    write_manifest(&root.path().join("JIGSAWS"), 2, &["nobody"], &["a"]);

    let loaded = Dataset::new(DatasetKind::Jigsaws, root.path(), "SpatialCNN")
        .load_split(2, 1)
        .unwrap();

    assert!(loaded.train.is_empty());
    assert!(loaded.report.empty_train);
    assert_eq!(loaded.test.len(), 1);
}

#[test]
fn missing_manifest_is_fatal() {
    let root = tempdir().unwrap();
    jigsaws_tree(root.path());

    let err = Dataset::new(DatasetKind::Jigsaws, root.path(), "SpatialCNN")
        .load_split(3, 1)
        .unwrap_err();
    assert!(matches!(err, DatasetError::Manifest { .. }));
}

#[test]
fn missing_label_directory_is_fatal() {
    let root = tempdir().unwrap();
    write_manifest(&root.path().join("EndoVis"), 1, &["Seg1"], &[]);

    let err = Dataset::new(DatasetKind::EndoVis, root.path(), "SpatialCNN")
        .load_split(1, 1)
        .unwrap_err();
    assert!(matches!(err, DatasetError::Io { .. }));
}

/// EndoVis: flat labels, per-split feature directories, `.mp4.mat` drift.
fn endovis_tree(root: &Path) {
    let base = root.join("EndoVis");
    let labels = base.join("labels/sequences");
    for (i, id) in ["Seg1", "Seg2"].iter().enumerate() {
        let y = vec![i as f64; 6];
        write_labels(&labels, &format!("{id}.mat"), &y);
        for split in 1..=2 {
            let x = Array2::from_elem((4, 6), split as f64);
            write_features(
                &base.join(format!("features/SpatialCNN/Split_{split}")),
                &format!("{id}.mp4.mat"),
                &x,
            );
        }
    }
    write_manifest(&base, 2, &["Seg1.mat"], &["Seg2.mat"]);
}

#[test]
fn endovis_reads_split_specific_features_with_extension_drift() {
    let root = tempdir().unwrap();
    endovis_tree(root.path());

    let loaded = Dataset::new(DatasetKind::EndoVis, root.path(), "SpatialCNN")
        .load_split(2, 1)
        .unwrap();

    assert_eq!(loaded.train.len(), 1);
    assert_eq!(loaded.test.len(), 1);
    assert!(loaded.report.missing_files.is_empty());
    assert!(loaded.train[0].features.iter().all(|&v| v == 2.0));
    assert_eq!(loaded.n_features, 4);
    assert_eq!(loaded.n_classes, 2);
}

#[test]
fn sep_splits_forces_split_directories() {
    let root = tempdir().unwrap();
    let base = root.path().join("EndoVis");
    write_labels(&base.join("labels/sequences/Split_2"), "Seg1.mat", &[0.0, 1.0, 1.0]);
    write_features(
        &base.join("features/SpatialCNN/Split_2"),
        "Seg1.mat",
        &Array2::zeros((2, 3)),
    );
    write_manifest(&base, 2, &["Seg1"], &[]);

    let detected = Dataset::new(DatasetKind::EndoVis, root.path(), "SpatialCNN")
        .load_split(2, 1)
        .unwrap();
    assert!(detected.train.is_empty());

    let forced = Dataset::new(DatasetKind::EndoVis, root.path(), "SpatialCNN")
        .with_sep_splits(true)
        .load_split(2, 1)
        .unwrap();
    assert_eq!(forced.train.len(), 1);
    assert_eq!(forced.n_classes, 2);
}

#[test]
fn salads_labels_are_smoothed_and_kept_dense() {
    let root = tempdir().unwrap();
    let base = root.path().join("50Salads");
    let dir = base.join("features/SpatialCNN/Split_1");

    let mut spiky = vec![1.0; 1000];
    spiky[500] = 5.0;
    write_both(&dir, "rgb-01-1.avi.mat", &time_major(1000, 2), &spiky);
    write_both(&dir, "rgb-01-2.avi.mat", &time_major(800, 2), &vec![3.0; 800]);
    write_manifest(&base, 1, &["01-1"], &["01-2"]);

    let loaded = Dataset::new(DatasetKind::Salads, root.path(), "SpatialCNN")
        .load_split(1, 1)
        .unwrap();

    assert_eq!(loaded.train.len(), 1);
    assert_eq!(loaded.test.len(), 1);
    assert!(loaded.train[0].labels.iter().all(|&v| v == 0));
    assert!(loaded.test[0].labels.iter().all(|&v| v == 1));
    assert_eq!(loaded.n_classes, 2);
    assert_aligned(&loaded);
}

#[test]
fn auxiliary_features_follow_the_same_split() {
    let root = tempdir().unwrap();
    jigsaws_tree(root.path());
    let accel = root.path().join("JIGSAWS/features/accel");
    for (id, len) in [("a", 20), ("b", 15), ("c", 12)] {
        write_features(&accel, &format!("{id}.mat"), &time_major(len, 2));
    }

    let dataset = Dataset::new(DatasetKind::Jigsaws, root.path(), "SpatialCNN");
    let before = dataset.feature_dir().to_path_buf();
    let aux = dataset.load_auxiliary("accel", 1, 1).unwrap();

    assert_eq!(aux.train_ids, ["a", "b"]);
    assert_eq!(aux.test_ids, ["c"]);
    assert_eq!(aux.train.len(), 2);
    assert_eq!(aux.test.len(), 1);
    assert!(aux.train.iter().chain(&aux.test).all(|x| x.nrows() == 2));
    assert_eq!(dataset.feature_dir(), before);

    // main feature set is untouched by the auxiliary load
    assert_eq!(dataset.load_split(1, 1).unwrap().n_features, 3);
}

#[test]
fn failed_auxiliary_load_leaves_dataset_unchanged() {
    let root = tempdir().unwrap();
    jigsaws_tree(root.path());

    let dataset = Dataset::new(DatasetKind::Jigsaws, root.path(), "SpatialCNN");
    let before = dataset.feature_dir().to_path_buf();

    assert!(dataset.load_auxiliary("accel", 4, 1).is_err());
    assert_eq!(dataset.feature_dir(), before);
    assert_eq!(dataset.load_split(1, 1).unwrap().train.len(), 2);
}

#[test]
fn auxiliary_load_reports_dropped_sequences() {
    let root = tempdir().unwrap();
    jigsaws_tree(root.path());
    let accel = root.path().join("JIGSAWS/features/accel");
    for (id, len) in [("a", 20), ("c", 12)] {
        write_features(&accel, &format!("{id}.mat"), &time_major(len, 2));
    }

    let aux = Dataset::new(DatasetKind::Jigsaws, root.path(), "SpatialCNN")
        .load_auxiliary("accel", 1, 1)
        .unwrap();

    assert_eq!(aux.train_ids, ["a"]);
    assert_eq!(aux.train.len(), 1);
    assert_eq!(aux.test_ids, ["c"]);
    assert_eq!(aux.report.missing_files, [accel.join("b.mat")]);
    assert!(aux.report.unmatched_ids.contains(&"b".to_string()));
    assert!(!aux.report.is_clean());
}

#[test]
fn salads_auxiliary_features_read_the_requested_split() {
    let root = tempdir().unwrap();
    let base = root.path().join("50Salads");
    let main = base.join("features/SpatialCNN/Split_1");
    write_both(&main, "rgb-01-1.avi.mat", &time_major(20, 2), &[1.0; 20]);
    write_both(&main, "rgb-01-2.avi.mat", &time_major(16, 2), &[2.0; 16]);
    for split in 1..=2 {
        let dir = base.join(format!("features/accel/Split_{split}"));
        for (file, len) in [("rgb-01-1.avi.mat", 20), ("rgb-01-2.avi.mat", 16)] {
            write_features(&dir, file, &Array2::from_elem((3, len), split as f64));
        }
    }
    write_manifest(&base, 2, &["01-1"], &["01-2"]);

    let aux = Dataset::new(DatasetKind::Salads, root.path(), "SpatialCNN")
        .load_auxiliary("accel", 2, 1)
        .unwrap();

    assert_eq!(aux.train_ids, ["01-1"]);
    assert_eq!(aux.test_ids, ["01-2"]);
    assert!(aux.train.iter().chain(&aux.test).all(|x| x.iter().all(|&v| v == 2.0)));
    assert!(aux.report.is_clean());
}

#[test]
fn split_label_directories_are_detected_without_sep_splits() {
    let root = tempdir().unwrap();
    let base = root.path().join("EndoVis");
    let labels = base.join("labels/sequences");
    write_labels(&labels.join("Split_1"), "Seg1.mat", &[5.0; 6]);
    write_labels(&labels.join("Split_2"), "Seg1.mat", &[0.0, 0.0, 0.0, 1.0, 1.0, 2.0]);
    write_features(&base.join("features/SpatialCNN"), "Seg1.mat", &Array2::zeros((4, 6)));
    write_manifest(&base, 1, &["Seg1"], &[]);
    write_manifest(&base, 2, &["Seg1"], &[]);

    let dataset = Dataset::new(DatasetKind::EndoVis, root.path(), "SpatialCNN");

    let first = dataset.load_split(1, 1).unwrap();
    assert_eq!(first.n_classes, 1);

    let second = dataset.load_split(2, 1).unwrap();
    assert_eq!(second.train.len(), 1);
    assert_eq!(second.n_classes, 3);
    assert_eq!(second.train[0].labels.to_vec(), [0, 0, 0, 1, 1, 2]);
    assert!(second.report.missing_files.is_empty());
}

#[test]
fn fractional_or_nan_labels_are_rejected() {
    for bad in [1.5, f64::NAN] {
        let root = tempdir().unwrap();
        let base = root.path().join("JIGSAWS");
        write_labels(&base.join("labels/sequences/Suturing"), "a.mat", &[1.0, bad, 2.0]);
        write_features(&base.join("features/SpatialCNN"), "a.mat", &time_major(3, 2));
        write_manifest(&base, 1, &["a"], &[]);

        let err = Dataset::new(DatasetKind::Jigsaws, root.path(), "SpatialCNN")
            .load_split(1, 1)
            .unwrap_err();
        assert!(matches!(err, DatasetError::BadLabel { .. }), "{bad}: {err}");
        assert!(!err.is_recoverable());
    }
}

#[test]
fn summary_serializes_to_json() {
    let root = tempdir().unwrap();
    jigsaws_tree(root.path());

    let dataset = Dataset::new(DatasetKind::Jigsaws, root.path(), "SpatialCNN");
    let summary = dataset.load_split(1, 1).unwrap().summary(dataset.name(), dataset.features(), 1);
    let json = serde_json::to_value(&summary).unwrap();

    assert_eq!(json["dataset"], "JIGSAWS");
    assert_eq!(json["train_frames"], 35);
    assert_eq!(json["report"]["unmatched_ids"][0], "missing");
}
