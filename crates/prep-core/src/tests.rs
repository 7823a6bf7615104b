//! Unit tests for prep-core.

use crate::{Coord, LinkId, Mode, PersonId};
use crate::time::{parse_time, write_time};

// ── IDs ───────────────────────────────────────────────────────────────────────

mod id_tests {
    use super::*;

    #[test]
    fn invalid_sentinel_is_max() {
        assert_eq!(PersonId::INVALID.0, u32::MAX);
        assert_eq!(PersonId::default(), PersonId::INVALID);
    }

    #[test]
    fn index_round_trip() {
        let id = LinkId(42);
        assert_eq!(id.index(), 42);
        assert_eq!(LinkId::try_from(42usize).unwrap(), id);
    }

    #[test]
    fn display_includes_type_name() {
        assert_eq!(PersonId(7).to_string(), "PersonId(7)");
    }
}

// ── Coord ─────────────────────────────────────────────────────────────────────

mod coord_tests {
    use super::*;

    #[test]
    fn distance_is_euclidean() {
        let a = Coord::new(0.0, 0.0);
        let b = Coord::new(3.0, 4.0);
        assert_eq!(a.distance_m(b), 5.0);
        assert_eq!(b.distance_m(a), 5.0);
    }

    #[test]
    fn midpoint() {
        let m = Coord::new(0.0, 0.0).midpoint(Coord::new(10.0, 4.0));
        assert_eq!(m, Coord::new(5.0, 2.0));
    }
}

// ── Time formatting ───────────────────────────────────────────────────────────

mod time_tests {
    use super::*;

    #[test]
    fn writes_hh_mm_ss() {
        assert_eq!(write_time(0.0), "00:00:00");
        assert_eq!(write_time(3_661.0), "01:01:01");
        assert_eq!(write_time(8.0 * 3_600.0 + 30.0 * 60.0), "08:30:00");
    }

    #[test]
    fn hours_beyond_24_not_wrapped() {
        // 26:30:00 means 02:30 the next day in plan-time convention.
        assert_eq!(write_time(26.5 * 3_600.0), "26:30:00");
    }

    #[test]
    fn undefined_for_negative_or_nan() {
        assert_eq!(write_time(-1.0), "undefined");
        assert_eq!(write_time(f64::NAN), "undefined");
        assert_eq!(write_time(f64::INFINITY), "undefined");
    }

    #[test]
    fn parse_round_trip() {
        assert_eq!(parse_time("08:30:00"), Some(30_600.0));
        assert_eq!(parse_time("08:30"), Some(30_600.0));
        assert_eq!(parse_time("undefined"), None);
        assert_eq!(parse_time("08:61:00"), None);
    }
}

// ── Mode ──────────────────────────────────────────────────────────────────────

mod mode_tests {
    use super::*;

    #[test]
    fn parse_known_modes() {
        assert_eq!("car".parse::<Mode>().unwrap(), Mode::Car);
        assert_eq!(" walk ".parse::<Mode>().unwrap(), Mode::Walk);
    }

    #[test]
    fn parse_unknown_mode_errors() {
        assert!("tram".parse::<Mode>().is_err());
    }

    #[test]
    fn name_round_trip() {
        for mode in Mode::ALL {
            assert_eq!(mode.name().parse::<Mode>().unwrap(), mode);
        }
    }
}
