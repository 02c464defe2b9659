#![allow(non_snake_case)]

use conicache::{algebra::*, solver::*};

fn test_settings() -> SettingsOverrides {
    SettingsOverrides::new()
        .set("eps", 1e-6)
        .set("max_iters", 20000)
        .set("verbose", false)
}

#[test]
fn test_powcone_feasible() {
    // minimize   x0
    // subject to x1 == 1
    //            x2 <= -2
    //            x0^0.3 * x1^0.7 >= |x2|
    //
    // whose solution is x = (2^(1/0.3), 1, -2)
    let A = SparseMatrix::csc(
        5,
        3,
        vec![0i64, 1, 3, 5],
        vec![2i64, 0, 3, 1, 4],
        vec![-1., 1., -1., 1., -1.],
    );
    let b = vec![1., -2., 0., 0., 0.];
    let c = vec![1., 0., 0.];
    let data = ProblemInput::new(A, b, c);
    let cone = RawCone::new()
        .with("f", 1)
        .with("l", 1)
        .with("p", vec![0.3]);

    let sol = solve(&data, &cone, None, &test_settings()).unwrap();

    assert_eq!(sol.info.status, SolverStatus::Solved);

    let refsol = vec![f64::powf(2., 1. / 0.3), 1., -2.];
    assert!(sol.x.dist(&refsol) <= 1e-3 * refsol.norm());
}

#[test]
fn test_dual_powcone_feasible() {
    // A negative exponent selects the dual cone
    //
    //   K* = {(u,v,w) | (u/a)^a * (v/(1-a))^(1-a) >= |w|}
    //
    // minimize   x0 + x1
    // subject to (x0, x1, 1) ∈ K* with a = 0.5
    //
    // i.e. x0*x1 >= 1/4, so the solution is x = (1/2, 1/2)
    let A = SparseMatrix::csc(3, 2, vec![0i64, 1, 2], vec![0i64, 1], vec![-1., -1.]);
    let data = ProblemInput::new(A, vec![0., 0., 1.], vec![1., 1.]);
    let cone = ConeSpec::default().with_power(vec![-0.5]);

    let sol = solve(&data, &cone, None, &test_settings()).unwrap();

    assert_eq!(sol.info.status, SolverStatus::Solved);

    let refsol = vec![0.5, 0.5];
    assert!(sol.x.dist(&refsol) <= 1e-3);
    assert!(f64::abs(sol.info.pobj - 1.) <= 1e-3);
}
