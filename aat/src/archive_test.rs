#[cfg(test)]
mod tests {
    use crate::archive::*;
    use crate::error::AatError;
    use crate::fd_impl::PerturbedSnapshots;
    use crate::test_utils::*;
    use crate::fd_impl::{compute_aat, AatOptions};
    use crate::overlap_impl::GaussianOverlap;
    use crate::wavefunction_impl::{
        CorrelatedSnapshot, OrbitalSet, ReferenceSnapshot, Snapshot, Wavefunction,
    };
    use nalgebra::{DMatrix, Vector3};
    use std::collections::HashSet;
    use num_complex::Complex64;

    const H2_ARCHIVE: &str = r#"
n_atoms: 1
atoms:
  - element: H
    coords: [0.0, 0.0, 0.0]
basis_sets:
  - name: ref
    shells:
      - center: [0.0, 0.0, 0.0]
        nwchem: |
          H    S
                3.42525091             0.15432897
                0.62391373             0.53532814
                0.16885540             0.44463454
      - center: [0.0, 0.0, 1.4]
        l_xyz: [0, 0, 0]
        exponents: [0.8]
        coefficients: [1.0]
nuclear_plus:
  - basis: ref
    coefficients: [[0.6, 0.8], [0.6, -0.8]]
    n_occupied: 1
  - basis: ref
    coefficients: [[0.6, 0.8], [0.6, -0.8]]
    n_occupied: 1
  - basis: ref
    coefficients: [[0.6, 0.8], [0.6, -0.8]]
    coefficients_imag: [[0.0, 0.1], [0.0, 0.0]]
    n_occupied: 1
nuclear_minus:
  - basis: ref
    coefficients: [[0.6, 0.8], [0.6, -0.8]]
    n_occupied: 1
  - basis: ref
    coefficients: [[0.6, 0.8], [0.6, -0.8]]
    n_occupied: 1
  - basis: ref
    coefficients: [[0.6, 0.8], [0.6, -0.8]]
    coefficients_imag: [[0.0, 0.1], [0.0, 0.0]]
    n_occupied: 1
field_plus:
  - basis: ref
    coefficients: [[0.6, 0.8], [0.6, -0.8]]
    n_occupied: 1
  - basis: ref
    coefficients: [[0.6, 0.8], [0.6, -0.8]]
    n_occupied: 1
  - basis: ref
    coefficients: [[0.6, 0.8], [0.6, -0.8]]
    coefficients_imag: [[0.0, 0.1], [0.0, 0.0]]
    n_occupied: 1
field_minus:
  - basis: ref
    coefficients: [[0.6, 0.8], [0.6, -0.8]]
    n_occupied: 1
  - basis: ref
    coefficients: [[0.6, 0.8], [0.6, -0.8]]
    n_occupied: 1
  - basis: ref
    coefficients: [[0.6, 0.8], [0.6, -0.8]]
    coefficients_imag: [[0.0, 0.1], [0.0, 0.0]]
    n_occupied: 1
"#;

    #[test]
    fn test_decode_yaml_archive() {
        let archive = SnapshotArchive::from_yaml(H2_ARCHIVE).unwrap();
        assert_eq!(archive.basis_sets[0].shells.len(), 2);
        assert!(matches!(archive.basis_sets[0].shells[0], ShellRecord::Nwchem { .. }));
        assert!(matches!(archive.basis_sets[0].shells[1], ShellRecord::Cartesian { .. }));

        let snapshots = archive.to_snapshots().unwrap();
        assert_eq!(snapshots.nuclear_plus.len(), 3);
        assert_eq!(snapshots.field_minus.len(), 3);

        let orbitals = snapshots.nuclear_plus[2].orbitals();
        assert_eq!(orbitals.basis.len(), 2);
        assert_eq!(orbitals.coefficients[(0, 1)], Complex64::new(0.8, 0.1));
        assert!(!snapshots.nuclear_plus[0].is_correlated());
        // one shared basis per name
        assert!(std::sync::Arc::ptr_eq(
            &snapshots.nuclear_plus[0].orbitals().basis,
            &snapshots.field_plus[1].orbitals().basis
        ));
    }

    #[test]
    fn test_unknown_basis_and_element_are_rejected() {
        let mut archive = SnapshotArchive::from_yaml(H2_ARCHIVE).unwrap();
        archive.field_plus[1].basis = "missing".to_string();
        match archive.to_snapshots() {
            Err(AatError::InvalidConfiguration(msg)) => assert!(msg.contains("field_plus[1]")),
            other => panic!("expected InvalidConfiguration, got {:?}", other.map(|_| ())),
        }

        let mut archive = SnapshotArchive::from_yaml(H2_ARCHIVE).unwrap();
        archive.atoms[0].element = "Xx".to_string();
        assert!(archive.to_snapshots().is_err());
    }

    #[test]
    fn test_ragged_coefficients_are_rejected() {
        let mut archive = SnapshotArchive::from_yaml(H2_ARCHIVE).unwrap();
        archive.nuclear_minus[0].coefficients[1].pop();
        assert!(matches!(
            archive.to_snapshots(),
            Err(AatError::InvalidConfiguration(_))
        ));
    }

    fn correlated_set() -> PerturbedSnapshots<Snapshot> {
        let basis = s_basis("h4", &line_centers(4));
        let mut rng = rng(5);
        let c = lowdin_orbitals(&basis).map(|x| Complex64::new(x, 0.0));
        let phase = random_complex_matrix(&mut rng, 4, 4) * Complex64::new(0.01, 0.0);
        let orbitals = OrbitalSet::new(c + phase, basis, 2, 0).unwrap();
        let snapshot: Snapshot = CorrelatedSnapshot::new(
            orbitals,
            Complex64::new(0.97, 0.0),
            symmetric_amplitudes(9, 2, 2),
        )
        .unwrap()
        .into();
        PerturbedSnapshots {
            n_atoms: 1,
            nuclear_plus: vec![snapshot.clone(); 3],
            nuclear_minus: vec![snapshot.clone(); 3],
            field_plus: vec![snapshot.clone(); 3],
            field_minus: vec![snapshot; 3],
        }
    }

    #[test]
    fn test_archive_round_trip() {
        let snapshots = correlated_set();
        let archive = SnapshotArchive::from_snapshots(
            &snapshots,
            vec![AtomRecord {
                element: "He".to_string(),
                coords: [0.0, 0.0, 0.0],
            }],
        );
        assert_eq!(archive.basis_sets.len(), 1);

        let yaml = archive.to_yaml().unwrap();
        assert_eq!(SnapshotArchive::from_yaml(&yaml).unwrap(), archive);
        let json = archive.to_json().unwrap();
        assert_eq!(SnapshotArchive::from_json(&json).unwrap(), archive);

        let decoded = archive.to_snapshots().unwrap();
        let (before, after) = (&snapshots.field_plus[2], &decoded.field_plus[2]);
        let diff: DMatrix<Complex64> = &before.orbitals().coefficients - &after.orbitals().coefficients;
        assert!(diff.norm() < 1e-15);
        assert_eq!(before.doubles(), after.doubles());
        assert_eq!(before.reference_weight(), after.reference_weight());

        let s_before = basis::overlap_matrix(&before.orbitals().basis, &before.orbitals().basis);
        let s_after = basis::overlap_matrix(&after.orbitals().basis, &after.orbitals().basis);
        assert!((s_before - s_after).amax() < 1e-14);
    }

    const STEP: f64 = 1e-3;

    /// Every snapshot names its basis "geom", but the nuclear ones carry a
    /// displaced second center.
    fn displaced_set() -> PerturbedSnapshots<Snapshot> {
        let reference = Vector3::new(0.0, 0.0, 1.4);
        let snapshot = |center: Vector3<f64>, angle: f64| -> Snapshot {
            let basis = s_basis("geom", &[Vector3::zeros(), center]);
            let (c, s) = (angle.cos(), angle.sin());
            let rotation = DMatrix::from_row_slice(
                2,
                2,
                &[
                    Complex64::new(c, 0.0),
                    Complex64::new(0.0, s),
                    Complex64::new(0.0, s),
                    Complex64::new(c, 0.0),
                ],
            );
            let orbitals = lowdin_orbitals(&basis).map(|x| Complex64::new(x, 0.0)) * rotation;
            ReferenceSnapshot::new(OrbitalSet::new(orbitals, basis, 1, 0).unwrap()).into()
        };
        let nuclear = |r: usize, h: f64| {
            let mut center = reference;
            center[r] += h;
            snapshot(center, 0.0)
        };
        let field = |k: usize, h: f64| snapshot(reference, 0.5 * (k + 1) as f64 * h);
        PerturbedSnapshots {
            n_atoms: 1,
            nuclear_plus: (0..3).map(|r| nuclear(r, STEP)).collect(),
            nuclear_minus: (0..3).map(|r| nuclear(r, -STEP)).collect(),
            field_plus: (0..3).map(|k| field(k, STEP)).collect(),
            field_minus: (0..3).map(|k| field(k, -STEP)).collect(),
        }
    }

    #[test]
    fn test_same_named_displaced_bases_keep_their_geometry() {
        let snapshots = displaced_set();
        let archive = SnapshotArchive::from_snapshots(&snapshots, Vec::new());

        // six displaced geometries plus the shared undisplaced one
        assert_eq!(archive.basis_sets.len(), 7);
        let names: HashSet<&str> = archive.basis_sets.iter().map(|b| b.name.as_str()).collect();
        assert_eq!(names.len(), 7);
        assert!(names.iter().all(|name| name.starts_with("geom")));
        assert_eq!(archive.field_plus[0].basis, archive.field_minus[2].basis);
        assert_ne!(archive.nuclear_plus[2].basis, archive.nuclear_minus[2].basis);

        let decoded = SnapshotArchive::from_yaml(&archive.to_yaml().unwrap())
            .unwrap()
            .to_snapshots()
            .unwrap();
        for (before, after) in snapshots.iter().zip(decoded.iter()) {
            let (before, after) = (&before.orbitals().basis, &after.orbitals().basis);
            for (f, g) in before.functions.iter().zip(&after.functions) {
                assert!((f.center() - g.center()).norm() < 1e-15);
            }
        }
        let center = decoded.nuclear_minus[2].orbitals().basis.functions[1].center();
        assert!((center.z - (1.4 - STEP)).abs() < 1e-15);

        let options = AatOptions {
            nuclear_step: STEP,
            field_step: STEP,
            ..Default::default()
        };
        let expected = compute_aat(&snapshots, &GaussianOverlap, &options).unwrap().total();
        let actual = compute_aat(&decoded, &GaussianOverlap, &options).unwrap().total();
        assert!((&expected - &actual).amax() < 1e-6 * (1.0 + expected.amax()));
    }

    #[test]
    fn test_identical_bases_share_one_record() {
        let snapshots = correlated_set();
        let mut archive = SnapshotArchive::from_snapshots(&snapshots, Vec::new());
        assert_eq!(archive.basis_sets.len(), 1);
        assert_eq!(archive.basis_sets[0].name, "h4");

        // a duplicate name in a hand-written archive is still an error
        let duplicate = archive.basis_sets[0].clone();
        archive.basis_sets.push(duplicate);
        assert!(matches!(
            archive.to_snapshots(),
            Err(AatError::InvalidConfiguration(_))
        ));
    }
}
