#![allow(non_snake_case)]

use conicache::{algebra::*, solver::*};

fn test_settings() -> SettingsOverrides {
    SettingsOverrides::new()
        .set("eps", 1e-6)
        .set("max_iters", 20000)
        .set("verbose", false)
}

#[test]
fn test_expcone_feasible() {
    // minimize   -x0 + x1
    // subject to exp(a*x0) <= x1
    //
    // whose solution is x0 = -ln(a)/a, x1 = 1/a
    let a = 0.4;
    let A = SparseMatrix::csc(3, 2, vec![0i64, 1, 2], vec![0i64, 2], vec![-a, -1.]);
    let data = ProblemInput::new(A, vec![0., 1., 0.], vec![-1., 1.]);
    let cone = RawCone::new().with("ep", 1);

    let sol = solve(&data, &cone, None, &test_settings()).unwrap();

    assert_eq!(sol.info.status, SolverStatus::Solved);

    let refsol = vec![-f64::ln(a) / a, 1. / a];
    assert!(sol.x.dist(&refsol) <= 1e-3);
}

#[test]
fn test_expcone_many_iter() {
    // a harder problem mixing zero, nonnegative and two exponential cones
    //
    // minimize   x2 + x3
    // subject to x0 + x1 == 1
    //            x0 >= 5
    //            (x0, 1, x2) ∈ K_exp
    //            (x1, 1, x3) ∈ K_exp
    let A = SparseMatrix::csc(
        8,
        4,
        vec![0i64, 3, 5, 6, 7],
        vec![0i64, 1, 2, 0, 5, 4, 7],
        vec![1., -1., -1., 1., -1., -1., -1.],
    );
    let b = vec![1., -5., 0., 1., 0., 0., 1., 0.];
    let c = vec![0., 0., 1., 1.];
    let data = ProblemInput::new(A, b, c);
    let cone = RawCone::new().with("f", 1).with("l", 1).with("ep", 2);

    let sol = solve(&data, &cone, None, &test_settings()).unwrap();

    assert_eq!(sol.info.status, SolverStatus::Solved);

    // the objective is increasing in x0, so the lower bound is active
    let refsol = vec![5., -4., f64::exp(5.), f64::exp(-4.)];
    assert!(sol.x.dist(&refsol) <= 1e-3 * refsol.norm());
    assert!(sol.info.iter > 0);
}

#[test]
fn test_dual_expcone_feasible() {
    // minimize   x0 + x1
    // subject to (-1, x0, x1) ∈ K_exp*
    //
    // K_exp* = {(u,v,w) | u < 0, -u·exp(v/u) <= e·w}, so the constraint
    // is x1 >= exp(-x0-1) and the solution is x = (-1, 1)
    let A = SparseMatrix::csc(3, 2, vec![0i64, 1, 2], vec![1i64, 2], vec![-1., -1.]);
    let data = ProblemInput::new(A, vec![-1., 0., 0.], vec![1., 1.]);
    let cone = RawCone::new().with("ed", 1);

    let sol = solve(&data, &cone, None, &test_settings()).unwrap();

    assert_eq!(sol.info.status, SolverStatus::Solved);

    let refsol = vec![-1., 1.];
    assert!(sol.x.dist(&refsol) <= 1e-3);
    assert!(f64::abs(sol.info.pobj) <= 1e-3);
}
