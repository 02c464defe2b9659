#![allow(non_snake_case)]

use conicache::solver::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

// A backend that records how often it is called and echoes its
// inputs: x = c and s = b.
#[derive(Default, Clone)]
struct EchoBackend {
    setups: Arc<AtomicUsize>,
    solves: Arc<AtomicUsize>,
    fail_setup: bool,
}

impl ConicBackend for EchoBackend {
    type Handle = ();

    fn setup(
        &self,
        _cone: &ConeSpec,
        _A: inputs::CscView<'_>,
        _settings: &Settings,
    ) -> std::result::Result<(), BackendError> {
        if self.fail_setup {
            return Err(BackendError::Unsupported("echo".to_string()));
        }
        self.setups.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn solve(
        &self,
        _handle: &mut (),
        b: &[f64],
        c: &[f64],
        _cone: &ConeSpec,
        buffers: &mut SolutionBuffers,
        _settings: &Settings,
    ) -> SolveInfo {
        self.solves.fetch_add(1, Ordering::SeqCst);
        buffers.x.copy_from_slice(c);
        buffers.s.copy_from_slice(b);
        SolveInfo {
            status: SolverStatus::Solved,
            iter: 1,
            ..SolveInfo::default()
        }
    }

    fn version(&self) -> String {
        "echo".to_string()
    }
}

fn lp_data() -> (ProblemInput, ConeSpec) {
    // minimize   x0 + x1
    // subject to x0 >= 1, x1 >= 2
    let A = SparseMatrix::csc(2, 2, vec![0i64, 1, 2], vec![0i64, 1], vec![-1., -1.]);
    let data = ProblemInput::new(A, vec![-1., -2.], vec![1., 1.]);
    (data, ConeSpec::default().with_nonneg(2))
}

fn echo_workspace(overrides: &SettingsOverrides) -> (Workspace<EchoBackend>, EchoBackend) {
    let (data, cone) = lp_data();
    let backend = EchoBackend::default();
    let work = Workspace::new(backend.clone(), &data, &cone, overrides).unwrap();
    (work, backend)
}

fn test_settings() -> SettingsOverrides {
    SettingsOverrides::new()
        .set("eps", 1e-6)
        .set("max_iters", 20000)
        .set("verbose", false)
}

#[test]
fn test_setup_once_solve_many() {
    let (mut work, backend) = echo_workspace(&SettingsOverrides::new());

    for _ in 0..3 {
        let sol = work.solve(SolveRequest::new()).unwrap();
        assert_eq!(sol.info.status, SolverStatus::Solved);
    }
    assert_eq!(backend.setups.load(Ordering::SeqCst), 1);
    assert_eq!(backend.solves.load(Ordering::SeqCst), 3);
    assert_eq!(work.info().unwrap().map(|i| i.iter), Some(1));
}

#[test]
fn test_fixed_setting_change_rejected() {
    let (mut work, backend) = echo_workspace(&SettingsOverrides::new());

    for (key, value) in [
        ("use_indirect_method", SettingValue::Bool(true)),
        ("use_indirect", SettingValue::Bool(true)),
        ("normalize", SettingValue::Bool(false)),
        ("rho_x", SettingValue::Float(0.5)),
        ("scale", SettingValue::Float(5.0)),
    ] {
        let err = work
            .solve(SolveRequest::new().with_setting(key, value))
            .unwrap_err();
        assert!(matches!(err, Error::FixedSettingChanged { .. }));
    }

    // nothing reached the backend and the live settings are unchanged
    assert_eq!(backend.solves.load(Ordering::SeqCst), 0);
    assert_eq!(*work.settings().unwrap(), Settings::default());

    // restating a fixed value is fine
    let sol = work
        .solve(SolveRequest::new().with_setting("normalize", true))
        .unwrap();
    assert_eq!(sol.info.status, SolverStatus::Solved);
}

#[test]
fn test_fixed_settings_from_construction() {
    let overrides = SettingsOverrides::new().set("use_indirect", true).set("scale", 5.0);
    let (mut work, _) = echo_workspace(&overrides);

    let fixed = work.fixed().unwrap();
    assert!(fixed.use_indirect_method);
    assert_eq!(fixed.scale, 5.0);

    // returning to the defaults is a change
    let err = work
        .solve(SolveRequest::new().with_setting("scale", 1.0))
        .unwrap_err();
    assert_eq!(
        err,
        Error::FixedSettingChanged {
            key: "scale",
            fixed: "5".to_string(),
            requested: "1".to_string(),
        }
    );
}

#[test]
fn test_dynamic_settings_persist() {
    let overrides = SettingsOverrides::new().set("eps", 1e-3);
    let (mut work, _) = echo_workspace(&overrides);
    assert_eq!(work.settings().unwrap().eps, 1e-3);

    work.solve(SolveRequest::new().with_setting("eps", 1e-6))
        .unwrap();
    assert_eq!(work.settings().unwrap().eps, 1e-6);

    // a later solve without overrides keeps the new value
    work.solve(SolveRequest::new()).unwrap();
    assert_eq!(work.settings().unwrap().eps, 1e-6);
}

#[test]
fn test_settings_merge_is_transactional() {
    let overrides = SettingsOverrides::new().set("eps", 1e-3);
    let (mut work, backend) = echo_workspace(&overrides);

    let request = SolveRequest::new()
        .with_setting("eps", 1e-6)
        .with_setting("alpha", 5.0);
    let err = work.solve(request).unwrap_err();
    assert!(matches!(err, Error::InvalidSetting { .. }));

    assert_eq!(work.settings().unwrap().eps, 1e-3);
    assert_eq!(backend.solves.load(Ordering::SeqCst), 0);
}

#[test]
fn test_vector_replacement_persists() {
    let (mut work, _) = echo_workspace(&SettingsOverrides::new());

    let sol = work
        .solve(
            SolveRequest::new()
                .with_b(DenseArray::vector(vec![3., 4.]))
                .with_c(DenseArray::vector(vec![5., 6.])),
        )
        .unwrap();
    assert_eq!(sol.s, vec![3., 4.]);
    assert_eq!(sol.x, vec![5., 6.]);

    // replacements are kept for later solves
    let sol = work.solve(SolveRequest::new()).unwrap();
    assert_eq!(sol.s, vec![3., 4.]);
    assert_eq!(sol.x, vec![5., 6.]);
    assert_eq!(work.data().unwrap().b_values(), &[3., 4.]);
}

#[test]
fn test_bad_vector_replacement_rejected() {
    let (mut work, backend) = echo_workspace(&SettingsOverrides::new());

    // a valid b alongside an invalid c applies neither
    let request = SolveRequest::new()
        .with_b(DenseArray::vector(vec![3., 4.]))
        .with_c(DenseArray::vector(vec![1., 2., 3.]));
    let err = work.solve(request).unwrap_err();
    assert!(matches!(err, Error::ShapeMismatch { field: "c", .. }));

    let request = SolveRequest::new().with_b(DenseArray::vector(vec![3f32, 4.]));
    let err = work.solve(request).unwrap_err();
    assert!(matches!(err, Error::DtypeMismatch { field: "b", .. }));

    assert_eq!(backend.solves.load(Ordering::SeqCst), 0);
    let data = work.data().unwrap();
    assert_eq!(data.b_values(), &[-1., -2.]);
    assert_eq!(data.c_values(), &[1., 1.]);
}

#[test]
fn test_warm_start_errors_before_backend() {
    let (mut work, backend) = echo_workspace(&SettingsOverrides::new());

    let warm = WarmStart {
        x: Some(vec![0., 0.].into()),
        y: None,
        s: None,
    };
    let err = work
        .solve(SolveRequest::new().with_warm_start(warm))
        .unwrap_err();
    assert_eq!(err, Error::IncompleteWarmStart("y"));
    assert_eq!(backend.solves.load(Ordering::SeqCst), 0);
}

#[test]
fn test_release() {
    let (mut work, _) = echo_workspace(&SettingsOverrides::new());
    assert!(!work.is_released());

    work.release();
    assert!(work.is_released());

    assert_eq!(
        work.solve(SolveRequest::new()).unwrap_err(),
        Error::WorkspaceReleased
    );
    assert_eq!(work.settings().unwrap_err(), Error::WorkspaceReleased);
    assert_eq!(work.data().unwrap_err(), Error::WorkspaceReleased);
    assert_eq!(work.dims().unwrap_err(), Error::WorkspaceReleased);

    // releasing twice is harmless
    work.release();
    assert!(work.is_released());
}

#[test]
fn test_setup_failure() {
    let (data, cone) = lp_data();
    let backend = EchoBackend {
        fail_setup: true,
        ..EchoBackend::default()
    };

    let err = Workspace::new(backend, &data, &cone, &SettingsOverrides::new())
        .err()
        .unwrap();
    assert!(matches!(
        err,
        Error::Backend(BackendError::Unsupported(_))
    ));
}

#[test]
fn test_construction_validates() {
    let (data, _) = lp_data();
    let cone = ConeSpec::default().with_nonneg(3);

    let backend = EchoBackend::default();
    let result = Workspace::new(backend.clone(), &data, &cone, &SettingsOverrides::new());
    assert!(matches!(result, Err(Error::ConeRowMismatch { .. })));
    assert_eq!(backend.setups.load(Ordering::SeqCst), 0);
}

#[test]
fn test_admm_workspace_matches_oneshot() {
    let (data, cone) = lp_data();
    let settings = test_settings();

    let mut work = Workspace::with_defaults(&data, &cone, &settings).unwrap();
    assert_eq!(work.dims().unwrap(), (2, 2));
    assert_eq!(work.backend().version(), admm::VERSION);

    let sol = work.solve(SolveRequest::new()).unwrap();
    let reference = solve(&data, &cone, None, &settings).unwrap();

    assert_eq!(sol.info.status, SolverStatus::Solved);
    assert_eq!(sol.x, reference.x);
    assert_eq!(sol.info.iter, reference.info.iter);

    let refsol = [1., 2.];
    assert!(sol.x.iter().zip(refsol).all(|(a, b)| (a - b).abs() <= 1e-4));

    // new right hand side: x0 >= 3, x1 >= 4
    let sol = work
        .solve(SolveRequest::new().with_b(DenseArray::vector(vec![-3., -4.])))
        .unwrap();
    assert_eq!(sol.info.status, SolverStatus::Solved);
    let refsol = [3., 4.];
    assert!(sol.x.iter().zip(refsol).all(|(a, b)| (a - b).abs() <= 1e-4));
}

#[test]
fn test_workspace_survives_caller_mutation() {
    let (data, cone) = lp_data();
    let settings = test_settings();

    let mut A = match data.a.clone() {
        Some(MatrixInput::Sparse(A)) => A,
        _ => unreachable!(),
    };
    let mut work = Workspace::with_defaults(&data, &cone, &settings).unwrap();

    // the caller scribbles over their matrix after construction
    if let SparseStorage::Csc { nzval, .. } = &mut Arc::make_mut(&mut A).storage {
        *nzval = NumericVec::F64(vec![f64::NAN, f64::NAN]);
    }

    let sol = work.solve(SolveRequest::new()).unwrap();
    assert_eq!(sol.info.status, SolverStatus::Solved);
    assert!(sol.x.iter().all(|v| v.is_finite()));
    assert_eq!(work.data().unwrap().csc().nzval, &[-1., -1.]);
}

#[test]
fn test_workspace_shared_between_threads() {
    let (data, cone) = lp_data();
    let work = Workspace::with_defaults(&data, &cone, &test_settings()).unwrap();
    let work = Arc::new(Mutex::new(work));

    let handles: Vec<_> = (1..=4)
        .map(|k| {
            let work = Arc::clone(&work);
            thread::spawn(move || {
                let lb = k as f64;
                let request = SolveRequest::new().with_b(DenseArray::vector(vec![-lb, -lb]));
                let sol = work.lock().unwrap().solve(request).unwrap();
                (lb, sol)
            })
        })
        .collect();

    for h in handles {
        let (lb, sol) = h.join().unwrap();
        assert_eq!(sol.info.status, SolverStatus::Solved);
        assert!(sol.x.iter().all(|&v| (v - lb).abs() <= 1e-4));
    }
}

#[test]
fn test_versions() {
    assert_eq!(conicache::version(), env!("CARGO_PKG_VERSION"));
    assert_eq!(AdmmBackend.version(), "1.0.0");
}
