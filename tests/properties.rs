//! Property-based tests for counter allocation and command construction.

use proptest::prelude::*;

use slipway::{BuildCounter, Cmd};

proptest! {
    /// N sequential allocations always yield 1..=N, no gaps, no repeats.
    #[test]
    fn counter_allocations_are_gap_free(n in 1usize..40) {
        let dir = tempfile::tempdir().unwrap();
        let counter = BuildCounter::new(dir.path().join(".lastbuildnumber"));

        let allocated: Vec<u64> = (0..n).map(|_| counter.allocate_next().unwrap()).collect();
        let expected: Vec<u64> = (1..=n as u64).collect();
        prop_assert_eq!(allocated, expected);
    }

    /// The counter resumes from whatever decimal value is on disk.
    #[test]
    fn counter_resumes_from_persisted_value(start in 0u64..1_000_000) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".lastbuildnumber");
        std::fs::write(&path, start.to_string()).unwrap();

        let counter = BuildCounter::new(&path);
        prop_assert_eq!(counter.allocate_next().unwrap(), start + 1);
    }

    /// Ignore patterns appear in the mirror command in order, one exclusion
    /// argument each, between the VCS exclusion and the source/target pair.
    #[test]
    fn mirror_excludes_preserve_pattern_order(
        patterns in proptest::collection::vec("[a-z*.]{1,8}", 0..6)
    ) {
        let cmd = slipway::mirror::mirror_cmd(
            "rsync",
            std::path::Path::new("/p/source"),
            std::path::Path::new("/srv/site"),
            &patterns,
        );

        let argv = cmd.argv();
        let excludes: Vec<&str> = argv
            .iter()
            .skip(3) // -rcvh --delete --exclude=.git*
            .take(patterns.len())
            .map(String::as_str)
            .collect();
        let expected: Vec<String> =
            patterns.iter().map(|p| format!("--exclude={p}")).collect();
        prop_assert_eq!(excludes, expected.iter().map(String::as_str).collect::<Vec<_>>());
        prop_assert_eq!(argv.last().map(String::as_str), Some("/srv/site"));
    }

    /// Command display always echoes program then arguments.
    #[test]
    fn cmd_display_round_trips_argv(args in proptest::collection::vec("[a-z-]{1,6}", 0..5)) {
        let cmd = Cmd::new("git").args(args.clone());
        let rendered = cmd.to_string();
        let mut expected = "git".to_string();
        for arg in &args {
            expected.push(' ');
            expected.push_str(arg);
        }
        prop_assert_eq!(rendered, expected);
    }
}
