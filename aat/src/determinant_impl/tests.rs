//! Tests for determinant overlaps

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::error::AatError;
    use crate::overlap_impl::spin_block;
    use crate::test_utils::*;
    use nalgebra::DMatrix;
    use num_complex::Complex64;

    fn close(a: Complex64, b: Complex64, tol: f64) -> bool {
        (a - b).norm() < tol
    }

    #[test]
    fn test_reference_overlap_with_identity() {
        let s = DMatrix::<Complex64>::identity(6, 6);
        let ov = determinant_overlap(&s, 3, &Excitation::Reference, &Excitation::Reference).unwrap();
        assert!(close(ov, Complex64::new(1.0, 0.0), 1e-15));

        let reference = SpinResolvedExcitation::reference();
        let ov = factorized_overlap(&s, 3, &reference, &reference).unwrap();
        assert!(close(ov, Complex64::new(1.0, 0.0), 1e-15));
    }

    #[test]
    fn test_excited_determinants_with_identity() {
        let s = DMatrix::<Complex64>::identity(6, 6);
        let d = Excitation::double(0, 3, 1, 4);
        let same = determinant_overlap(&s, 3, &d, &d).unwrap();
        let orthogonal = determinant_overlap(&s, 3, &Excitation::Reference, &d).unwrap();
        assert!(close(same, Complex64::new(1.0, 0.0), 1e-15));
        assert!(close(orthogonal, Complex64::new(0.0, 0.0), 1e-15));

        // i→b, j→a is the same determinant with two rows exchanged
        let crossed = Excitation::double(0, 4, 1, 3);
        let ov = determinant_overlap(&s, 3, &d, &crossed).unwrap();
        assert!(close(ov, Complex64::new(-1.0, 0.0), 1e-15));
    }

    #[test]
    fn test_rank_check() {
        assert_eq!(
            Excitation::from_indices(&[0, 3, 1]),
            Err(AatError::UnsupportedExcitationRank(3))
        );
        assert_eq!(Excitation::from_indices(&[]), Ok(Excitation::Reference));
        assert_eq!(
            Excitation::from_indices(&[0, 3, 1, 4]),
            Ok(Excitation::double(0, 3, 1, 4))
        );
    }

    #[test]
    fn test_out_of_range_indices() {
        let s = DMatrix::<Complex64>::identity(4, 4);
        let d = Excitation::double(0, 5, 1, 3);
        assert!(matches!(
            determinant_overlap(&s, 2, &Excitation::Reference, &d),
            Err(AatError::InvalidConfiguration(_))
        ));
        assert!(matches!(
            determinant_overlap(&s, 5, &Excitation::Reference, &Excitation::Reference),
            Err(AatError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn test_input_matrix_is_not_mutated() {
        let mut rng = rng(8);
        let s = random_complex_matrix(&mut rng, 5, 5);
        let copy = s.clone();
        let d = Excitation::double(0, 3, 1, 4);
        determinant_overlap(&s, 2, &d, &d).unwrap();
        assert_eq!(s, copy);
    }

    #[test]
    fn test_factorized_reference_is_squared_determinant() {
        let mut rng = rng(13);
        let s = perturbed_identity(&mut rng, 5, 0.3);
        let reference = SpinResolvedExcitation::reference();
        let ov = factorized_overlap(&s, 2, &reference, &reference).unwrap();
        let d = s.view((0, 0), (2, 2)).clone_owned().determinant();
        assert!(close(ov, d * d, 1e-13));
    }

    #[test]
    fn test_spatial_and_spin_orbital_determinants_agree() {
        let mut rng = rng(17);
        let n_occ = 2;
        let s = perturbed_identity(&mut rng, 5, 0.4);
        let s_so = spin_block(&s);

        let (i, a, j, b) = (0, 3, 1, 4);
        let so = |p: usize, sigma: usize| 2 * p + sigma;

        // αα excitation on the bra, reference ket
        let spatial = factorized_overlap(
            &s,
            n_occ,
            &SpinResolvedExcitation::new(Excitation::double(i, a, j, b), SpinLabel::Alpha),
            &SpinResolvedExcitation::reference(),
        )
        .unwrap();
        let unified = determinant_overlap(
            &s_so,
            2 * n_occ,
            &Excitation::double(so(i, 0), so(a, 0), so(j, 0), so(b, 0)),
            &Excitation::Reference,
        )
        .unwrap();
        assert!(close(spatial, unified, 1e-13), "{} vs {}", spatial, unified);

        // αβ bra against ββ ket
        let spatial = factorized_overlap(
            &s,
            n_occ,
            &SpinResolvedExcitation::new(Excitation::double(i, a, j, b), SpinLabel::Mixed),
            &SpinResolvedExcitation::new(Excitation::double(j, a, i, b), SpinLabel::Beta),
        )
        .unwrap();
        let unified = determinant_overlap(
            &s_so,
            2 * n_occ,
            &Excitation::double(so(i, 0), so(a, 0), so(j, 1), so(b, 1)),
            &Excitation::double(so(j, 1), so(a, 1), so(i, 1), so(b, 1)),
        )
        .unwrap();
        assert!(close(spatial, unified, 1e-13), "{} vs {}", spatial, unified);
    }

    #[test]
    fn test_mixed_label_routes_one_substitution_per_spin() {
        let mut rng = rng(29);
        let s = perturbed_identity(&mut rng, 4, 0.3);
        let ket = SpinResolvedExcitation::reference();

        let mixed = factorized_overlap(
            &s,
            2,
            &SpinResolvedExcitation::new(Excitation::double(0, 2, 1, 3), SpinLabel::Mixed),
            &ket,
        )
        .unwrap();

        let single = |i: usize, a: usize| {
            let mut rows: Vec<usize> = (0..4).collect();
            rows.swap(i, a);
            DMatrix::from_fn(2, 2, |r, c| s[(rows[r], c)]).determinant()
        };
        assert!(close(mixed, single(0, 2) * single(1, 3), 1e-13));
    }
}
