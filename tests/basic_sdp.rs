#![allow(non_snake_case)]

use conicache::{algebra::*, solver::*};

fn basic_sdp_data() -> (ProblemInput, ConeSpec) {
    // minimize   X[1,0] + X[2,0]
    // subject to diag(X) <= 1, X ⪰ 0
    //
    // x holds the lower triangle of the symmetric 3x3 matrix X by
    // columns, and off diagonal rows of A carry a factor of √2.
    let sq = -f64::sqrt(2.);
    let A = SparseMatrix::csc(
        9,
        6,
        vec![0i64, 2, 3, 4, 6, 7, 9],
        vec![0i64, 3, 4, 5, 1, 6, 7, 2, 8],
        vec![1., -1., sq, sq, 1., -1., sq, 1., -1.],
    );
    let b = vec![1., 1., 1., 0., 0., 0., 0., 0., 0.];
    let c = vec![0., 1., 1., 0., 0., 0.];

    let data = ProblemInput::new(A, b, c);
    let cone = ConeSpec::default().with_nonneg(3).with_psd(vec![3]);

    (data, cone)
}

#[test]
fn test_sdp_feasible() {
    let (data, cone) = basic_sdp_data();

    let settings = SettingsOverrides::new()
        .set("eps", 1e-6)
        .set("max_iters", 20000)
        .set("verbose", false);

    let sol = solve(&data, &cone, None, &settings).unwrap();

    assert_eq!(sol.info.status, SolverStatus::Solved);

    let refsol = vec![1., -1., -1., 1., 1., 1.];
    assert!(sol.x.dist(&refsol) <= 1e-3);

    let refobj = -2.;
    assert!(f64::abs(sol.info.pobj - refobj) <= 1e-3);
}
