#![allow(non_snake_case)]

use conicache::solver::*;

#[test]
fn test_dimension_all_tags() {
    let raw = RawCone::new()
        .with("zero", 1)
        .with("nonneg", 20)
        .with("exp", 4)
        .with("dual_exp", 7)
        .with("soc", vec![3i64, 4, 9, 10])
        .with("psd", vec![3i64, 2, 4])
        .with("power", vec![0.1, -0.7]);

    let cone = ConeSpec::normalize(&raw).unwrap();
    assert_eq!(cone.dimension().unwrap(), 110);

    // same thing built directly
    let built = ConeSpec::default()
        .with_zero(1)
        .with_nonneg(20)
        .with_exp(4)
        .with_dual_exp(7)
        .with_soc(vec![3, 4, 9, 10])
        .with_psd(vec![3, 2, 4])
        .with_power(vec![0.1, -0.7]);
    assert_eq!(built, cone);
}

#[test]
fn test_dimension_per_tag() {
    let cases: Vec<(RawCone, usize)> = vec![
        (RawCone::new().with("f", 13), 13),
        (RawCone::new().with("l", 13), 13),
        (RawCone::new().with("ep", 13), 39),
        (RawCone::new().with("ed", 13), 39),
        (RawCone::new().with("q", vec![13i64, 3]), 16),
        (RawCone::new().with("s", vec![13i64, 3]), 91 + 6),
        (RawCone::new().with("p", vec![-0.4, 0.7]), 6),
    ];

    for (raw, dim) in cases {
        let cone = ConeSpec::normalize(&raw).unwrap();
        assert_eq!(cone.dimension().unwrap(), dim);
    }
}

#[test]
fn test_empty_and_absent_tags() {
    let empty = ConeSpec::normalize(&RawCone::new()).unwrap();
    assert!(empty.is_empty());
    assert_eq!(empty.dimension().unwrap(), 0);

    let raw = RawCone::new()
        .with("soc", Vec::<i64>::new())
        .with("psd", Vec::<i64>::new())
        .with("power", Vec::<f64>::new())
        .with("zero", 0)
        .with("exp", 0);
    let cone = ConeSpec::normalize(&raw).unwrap();
    assert_eq!(cone, empty);
    assert!(cone.tags().is_empty());
}

#[test]
fn test_unknown_tags_dropped() {
    let raw = RawCone::new().with("l", 2).with("foo", 7);
    let cone = ConeSpec::normalize(&raw).unwrap();
    assert_eq!(cone, ConeSpec::default().with_nonneg(2));
}

#[test]
fn test_mixed_integer_types() {
    let raw = RawCone::new()
        .with("l", 2u32)
        .with("q", vec![3i32, 4])
        .with("s", vec![2.0, 1.0])
        .with("p", vec![0.5f32]);
    let cone = ConeSpec::normalize(&raw).unwrap();

    assert_eq!(cone.soc(), &[3, 4]);
    assert_eq!(cone.psd(), &[2, 1]);
    assert_eq!(cone.power(), &[0.5]);
    assert_eq!(cone.dimension().unwrap(), 2 + 7 + 3 + 1 + 3);
}

#[test]
fn test_normalize_copies_input() {
    let mut raw = RawCone::new().with("q", vec![3i64, 4]);
    let cone = ConeSpec::normalize(&raw).unwrap();

    raw.entries[0].1 = ConeValue::from(vec![100i64]);
    assert_eq!(cone.soc(), &[3, 4]);
    assert_eq!(cone.dimension().unwrap(), 7);
}

#[test]
fn test_invalid_entries() {
    let negative_count = ConeSpec::normalize(&RawCone::new().with("l", -1)).unwrap();
    assert!(matches!(
        negative_count.dimension(),
        Err(Error::InvalidCone { .. })
    ));

    let negative_psd = ConeSpec::normalize(&RawCone::new().with("s", vec![3i64, -2])).unwrap();
    assert!(matches!(
        negative_psd.dimension(),
        Err(Error::InvalidCone { .. })
    ));

    for a in [0.0, 1.0, -1.0, 1.5, f64::NAN] {
        let bad_power = ConeSpec::default().with_power(vec![a]);
        assert!(matches!(
            bad_power.dimension(),
            Err(Error::InvalidCone { .. })
        ));
    }

    // a sequence where a count is expected
    let err = ConeSpec::normalize(&RawCone::new().with("l", vec![1i64, 2])).unwrap_err();
    assert!(matches!(err, Error::InvalidCone { .. }));

    // fractional sizes
    let err = ConeSpec::normalize(&RawCone::new().with("q", vec![2.5])).unwrap_err();
    assert!(matches!(err, Error::InvalidCone { .. }));
}

#[test]
fn test_invalid_cone_rejected_by_solve() {
    let A = SparseMatrix::csc(1, 1, vec![0i64, 1], vec![0i64], vec![1.]);
    let data = ProblemInput::new(A, vec![1.], vec![1.]);
    let cone = RawCone::new().with("l", -1);

    let err = solve(&data, &cone, None, &SettingsOverrides::new()).unwrap_err();
    assert!(matches!(err, Error::InvalidCone { .. }));
}

#[test]
fn test_dimension_overflow_rejected() {
    let huge_psd = ConeSpec::normalize(&RawCone::new().with("psd", vec![4_000_000_000i64])).unwrap();
    assert!(matches!(
        huge_psd.dimension(),
        Err(Error::InvalidCone { .. })
    ));

    let huge_soc = ConeSpec::normalize(&RawCone::new().with("soc", vec![i64::MAX, 1])).unwrap();
    assert!(matches!(
        huge_soc.dimension(),
        Err(Error::InvalidCone { .. })
    ));

    let huge_exp = ConeSpec::default().with_exp((i64::MAX / 2) as usize);
    assert!(matches!(
        huge_exp.dimension(),
        Err(Error::InvalidCone { .. })
    ));
}
