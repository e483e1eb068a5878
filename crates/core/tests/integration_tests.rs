//! Integration tests for u-stowage-core.

use chrono::NaiveDate;
use u_stowage_core::clock::{parse_date, FixedClock, SimClock};
use u_stowage_core::event::{EventKind, EventLog, EventOutcome};
use u_stowage_core::geometry::{contained_in, fits, intersects, orientations, Box3, Position, Region};
use u_stowage_core::placement::Placement;
use u_stowage_core::result::{BatchResult, BatchSummary};
use u_stowage_core::{Error, PlacementError};

fn region(x: u32, y: u32, z: u32, w: u32, d: u32, h: u32) -> Region {
    Region::new(Position::new(x, y, z), Box3::new(w, d, h))
}

mod geometry_tests {
    use super::*;

    #[test]
    fn test_touching_faces_do_not_intersect() {
        let a = region(0, 0, 0, 4, 4, 4);
        for b in [
            region(4, 0, 0, 4, 4, 4),
            region(0, 4, 0, 4, 4, 4),
            region(0, 0, 4, 4, 4, 4),
        ] {
            assert!(!intersects(&a, &b));
            assert!(!intersects(&b, &a));
        }
        assert!(intersects(&a, &region(3, 3, 3, 4, 4, 4)));
    }

    #[test]
    fn test_containment_at_interior_boundary() {
        let interior = Box3::new(10, 10, 10);
        assert!(contained_in(&region(6, 6, 6, 4, 4, 4), &interior));
        assert!(!contained_in(&region(7, 6, 6, 4, 4, 4), &interior));
    }

    #[test]
    fn test_orientations_cover_fits() {
        let item = Box3::new(1, 2, 12);
        let interior = Box3::new(12, 2, 1);
        assert!(!fits(&item, &interior));
        assert!(orientations(&item).iter().any(|o| fits(o, &interior)));
    }

    #[test]
    fn test_blocking_requires_projection_overlap() {
        let target = region(0, 5, 0, 4, 4, 4);
        assert!(region(0, 0, 0, 4, 5, 4).blocks(&target));
        // Beside the target's path.
        assert!(!region(4, 0, 0, 4, 5, 4).blocks(&target));
        // Behind the target.
        assert!(!region(0, 9, 0, 4, 1, 4).blocks(&target));
    }
}

mod clock_tests {
    use super::*;

    #[test]
    fn test_sim_clock_from_source() {
        let date = parse_date("2025-12-30").unwrap();
        let mut clock = SimClock::from_source(&FixedClock(date));
        let next = clock.advanced_by(3).unwrap();
        assert_eq!(next, NaiveDate::from_ymd_opt(2026, 1, 2).unwrap());
        assert_eq!(clock.today(), date);

        clock.set(next).unwrap();
        assert!(matches!(clock.set(date), Err(Error::InvalidArgument(_))));
    }
}

mod result_tests {
    use super::*;

    #[test]
    fn test_batch_summary() {
        let mut result = BatchResult::new();
        result.placed.push(Placement::new("I1", "C1", region(0, 0, 0, 2, 2, 2)));
        result
            .placed
            .push(Placement::new("I2", "C2", region(0, 0, 0, 2, 2, 4)).with_orientation(1));
        result
            .failed
            .push(("I3".into(), PlacementError::NoSpace("I3".into())));

        let summary = BatchSummary::from(&result);
        assert_eq!(summary.total_requested, 3);
        assert_eq!(summary.total_placed, 2);
        assert_eq!(summary.total_rotated, 1);
        assert_eq!(summary.containers_used, 2);

        let stats = result.placement_stats();
        assert_eq!(stats.total_volume, 24);
    }

    #[test]
    fn test_event_log_queries() {
        let date = parse_date("2025-01-01").unwrap();
        let mut log = EventLog::new();
        log.append(
            EventKind::Placement,
            date,
            vec!["I1".into(), "I2".into()],
            EventOutcome::Success,
        );
        log.append(
            EventKind::Retrieval,
            date,
            vec!["I2".into()],
            EventOutcome::Failed("Item not found: I2".into()),
        );

        assert_eq!(log.for_id("I2").count(), 2);
        assert_eq!(log.for_id("I1").count(), 1);
        assert_eq!(log.of_kind(EventKind::Retrieval).count(), 1);
        assert_eq!(log.records()[1].sequence, 1);
    }
}
