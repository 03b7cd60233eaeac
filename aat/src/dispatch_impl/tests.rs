//! Tests for the task dispatcher

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::coupling_impl::{ExcitationSpace, LoopStrategy};
    use crate::error::AatError;
    use crate::fd_impl::{ElementIndex, FourPoint};
    use crate::overlap_impl::OrbitalRepresentation;
    use crate::test_utils::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    struct SeriesTask {
        element: ElementIndex,
        terms: usize,
        started: Arc<AtomicUsize>,
    }

    impl Task for SeriesTask {
        type Output = f64;

        fn element(&self) -> ElementIndex {
            self.element
        }

        fn run(&self) -> f64 {
            self.started.fetch_add(1, Ordering::SeqCst);
            (1..=self.terms).map(|k| 1.0 / (k * k) as f64).sum()
        }
    }

    fn series_tasks(n: usize, started: &Arc<AtomicUsize>) -> Vec<SeriesTask> {
        (0..n)
            .map(|k| SeriesTask {
                element: ElementIndex::new(k / 3, k % 3),
                terms: 1000 + 37 * k,
                started: started.clone(),
            })
            .collect()
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let started = Arc::new(AtomicUsize::new(0));
        let sequential = Dispatcher::sequential()
            .run(series_tasks(12, &started))
            .unwrap();
        let parallel = Dispatcher::parallel(4).run(series_tasks(12, &started)).unwrap();

        assert_eq!(started.load(Ordering::SeqCst), 24);
        assert_eq!(sequential.len(), 12);
        assert_eq!(sequential, parallel);
        for (k, (element, _)) in parallel.iter().enumerate() {
            assert_eq!(*element, ElementIndex::new(k / 3, k % 3));
        }
    }

    #[test]
    fn test_stop_flag_cancels_pending_tasks() {
        let started = Arc::new(AtomicUsize::new(0));
        let flag = Arc::new(AtomicBool::new(true));
        for dispatcher in [Dispatcher::sequential(), Dispatcher::parallel(2)] {
            let result = dispatcher
                .with_stop_flag(flag.clone())
                .run(series_tasks(5, &started));
            assert_eq!(result.unwrap_err(), AatError::Cancelled { remaining: 5 });
        }
        assert_eq!(started.load(Ordering::SeqCst), 0);

        flag.store(false, Ordering::SeqCst);
        let result = Dispatcher::parallel(2)
            .with_stop_flag(flag)
            .run(series_tasks(5, &started));
        assert_eq!(result.unwrap().len(), 5);
    }

    #[test]
    fn test_zero_workers_rejected() {
        let started = Arc::new(AtomicUsize::new(0));
        let result = Dispatcher::parallel(0).run(series_tasks(1, &started));
        assert!(matches!(result, Err(AatError::InvalidConfiguration(_))));
    }

    #[test]
    fn test_double_double_task_is_deterministic() {
        let mut rng = rng(77);
        let task = DoubleDoubleTask {
            element: ElementIndex::new(2, 1),
            overlaps: FourPoint::from_fn(|_| perturbed_identity(&mut rng, 4, 0.2)),
            bra: FourPoint::from_fn(|sc| symmetric_amplitudes(sc as u64, 2, 2)),
            ket: FourPoint::from_fn(|sc| symmetric_amplitudes(10 + sc as u64, 2, 2)),
            space: ExcitationSpace {
                n_frozen: 0,
                n_occupied: 2,
                n_virtual: 2,
            },
            representation: OrbitalRepresentation::Spatial,
            strategy: LoopStrategy::Restricted,
            nuclear_step: 1e-3,
            field_step: 1e-3,
        };
        let tasks = vec![task.clone(), task];
        let sequential = Dispatcher::sequential().run(tasks.clone()).unwrap();
        let parallel = Dispatcher::parallel(2).run(tasks).unwrap();

        let values: Vec<f64> = sequential.into_iter().map(|(_, v)| v.unwrap()).collect();
        assert!(values[0].is_finite());
        assert_eq!(values[0], values[1]);
        for (_, v) in parallel {
            assert_eq!(v.unwrap(), values[0]);
        }
    }
}
