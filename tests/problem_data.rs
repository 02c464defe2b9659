#![allow(non_snake_case)]

use conicache::solver::*;
use std::sync::Arc;

// 3 x 2 with a single nonneg cone
fn canonical_data() -> (ProblemInput, ConeSpec) {
    let A = SparseMatrix::csc(
        3,
        2,
        vec![0i64, 2, 3],
        vec![0i64, 2, 1],
        vec![1., 2., 3.],
    );
    let data = ProblemInput::new(A, vec![1., 2., 3.], vec![1., -1.]);
    (data, ConeSpec::default().with_nonneg(3))
}

fn int32_float32_matrix() -> SparseMatrix {
    SparseMatrix::csc(
        3,
        2,
        vec![0i32, 2, 3],
        vec![0i32, 2, 1],
        vec![1f32, 2., 3.],
    )
}

fn matrix_arc(data: &ProblemInput) -> &Arc<SparseMatrix> {
    match data.a.as_ref() {
        Some(MatrixInput::Sparse(A)) => A,
        _ => panic!("expected a sparse matrix"),
    }
}

#[test]
fn test_canonical_data_not_copied() {
    let (data, cone) = canonical_data();

    let prepared = ProblemData::prepare(&data, &cone).unwrap();

    assert!(prepared.warnings().is_empty());
    assert!(Arc::ptr_eq(prepared.a(), matrix_arc(&data)));
    assert!(Arc::ptr_eq(prepared.b(), data.b.as_ref().unwrap()));
    assert!(Arc::ptr_eq(prepared.c(), data.c.as_ref().unwrap()));
    assert_eq!((prepared.m(), prepared.n()), (3, 2));
}

#[test]
fn test_prepare_is_idempotent() {
    let (data, cone) = canonical_data();
    let data = ProblemInput {
        a: Some(int32_float32_matrix().into()),
        ..data
    };

    let once = ProblemData::prepare(&data, &cone).unwrap();
    assert_eq!(once.warnings().len(), 2);

    let twice = ProblemData::prepare(&ProblemInput::from(&once), &cone).unwrap();
    assert!(twice.warnings().is_empty());
    assert!(Arc::ptr_eq(twice.a(), once.a()));
    assert_eq!(twice.csc(), once.csc());
}

#[test]
fn test_matrix_types_coerced_with_warning() {
    let (data, cone) = canonical_data();
    let data = ProblemInput {
        a: Some(Arc::new(int32_float32_matrix()).into()),
        ..data
    };

    let prepared = ProblemData::prepare(&data, &cone).unwrap();
    assert_eq!(
        prepared.warnings(),
        &[
            DataWarning::ConvertedIndices(Dtype::Int32),
            DataWarning::ConvertedValues(Dtype::Float32)
        ]
    );

    // a new matrix, the caller's is untouched
    let original = matrix_arc(&data);
    assert!(!Arc::ptr_eq(prepared.a(), original));
    assert_eq!(**original, int32_float32_matrix());

    let A = prepared.csc();
    assert_eq!(A.colptr, &[0, 2, 3]);
    assert_eq!(A.rowval, &[0, 2, 1]);
    assert_eq!(A.nzval, &[1., 2., 3.]);
}

#[test]
fn test_csr_converted_with_warning() {
    let (data, cone) = canonical_data();
    let Acsr = SparseMatrix::csr(3, 2, vec![0i64, 1, 2, 3], vec![0i64, 1, 0], vec![1., 3., 2.]);
    let data = ProblemInput {
        a: Some(Acsr.into()),
        ..data
    };

    let prepared = ProblemData::prepare(&data, &cone).unwrap();
    assert_eq!(
        prepared.warnings(),
        &[DataWarning::ConvertedToCsc(SparseLayout::Csr)]
    );
    assert_eq!(prepared.csc().colptr, &[0, 2, 3]);
}

#[test]
fn test_vector_dtype_rejected() {
    let (data, cone) = canonical_data();

    let data_b = ProblemInput {
        b: Some(Arc::new(DenseArray::vector(vec![1f32, 2., 3.]))),
        ..data.clone()
    };
    assert_eq!(
        ProblemData::prepare(&data_b, &cone),
        Err(Error::DtypeMismatch {
            field: "b",
            found: Dtype::Float32
        })
    );

    let data_c = ProblemInput {
        c: Some(Arc::new(DenseArray::vector(vec![1i64, 2]))),
        ..data
    };
    assert_eq!(
        ProblemData::prepare(&data_c, &cone),
        Err(Error::DtypeMismatch {
            field: "c",
            found: Dtype::Int64
        })
    );
}

#[test]
fn test_vector_shape_rejected() {
    let (data, cone) = canonical_data();

    // rank 2 b with the right number of elements
    let data_b = ProblemInput {
        b: Some(Arc::new(DenseArray::new(vec![3, 1], vec![1., 2., 3.]))),
        ..data.clone()
    };
    assert_eq!(
        ProblemData::prepare(&data_b, &cone),
        Err(Error::ShapeMismatch {
            field: "b",
            expected: 3,
            found: vec![3, 1]
        })
    );

    let data_c = ProblemInput {
        c: Some(Arc::new(DenseArray::vector(vec![1., 2., 3.]))),
        ..data
    };
    assert!(matches!(
        ProblemData::prepare(&data_c, &cone),
        Err(Error::ShapeMismatch { field: "c", .. })
    ));
}

#[test]
fn test_missing_fields() {
    let (data, cone) = canonical_data();

    for (field, input) in [
        ("A", ProblemInput { a: None, ..data.clone() }),
        ("b", ProblemInput { b: None, ..data.clone() }),
        ("c", ProblemInput { c: None, ..data.clone() }),
    ] {
        assert_eq!(
            ProblemData::prepare(&input, &cone),
            Err(Error::MissingField(field))
        );
    }
}

#[test]
fn test_dense_matrix_rejected() {
    let (data, cone) = canonical_data();
    let data = ProblemInput {
        a: Some(DenseArray::new(vec![3, 2], vec![1., 0., 0., 3., 2., 0.]).into()),
        ..data
    };
    assert!(matches!(
        ProblemData::prepare(&data, &cone),
        Err(Error::TypeMismatch { field: "A", .. })
    ));
}

#[test]
fn test_cone_row_mismatch() {
    let (data, _) = canonical_data();

    for cone in [
        ConeSpec::default().with_nonneg(2),
        ConeSpec::default().with_nonneg(4),
        ConeSpec::default(),
    ] {
        assert!(matches!(
            ProblemData::prepare(&data, &cone),
            Err(Error::ConeRowMismatch { .. })
        ));
    }
}

#[test]
fn test_unsorted_rows_rejected() {
    let (data, cone) = canonical_data();
    let A = SparseMatrix::csc(3, 2, vec![0i64, 2, 3], vec![2i64, 0, 1], vec![2., 1., 3.]);
    let data = ProblemInput {
        a: Some(A.into()),
        ..data
    };
    assert!(matches!(
        ProblemData::prepare(&data, &cone),
        Err(Error::BadSparseFormat(_))
    ));
}
