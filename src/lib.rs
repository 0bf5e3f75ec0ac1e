pub mod canonical;
pub mod catalog;
pub mod dedup;
pub mod enumerator;
pub mod error;
pub mod generator;
pub mod grid;
pub mod pattern_file;
pub mod render;
pub mod report;
pub mod types;
pub mod visibility;

use canonical::Canonicalizer;
use dedup::{DedupReport, Deduplicator, Occurrence};
use error::ValidationError;
use generator::Generator;
use grid::Grid;
use types::{EnumerationConfig, GridSize, Shape};

/// Validate, generate, canonicalize and deduplicate in one call.
pub fn run(
    size: GridSize,
    shapes: Vec<Shape>,
    config: EnumerationConfig,
    parallel: bool,
) -> Result<DedupReport, ValidationError> {
    run_with(size, shapes, config, parallel, |_, _, _| {})
}

/// `run`, handing every raw pattern to `visit` with its stream index and
/// occurrence as it is checked in. Duplicates are dropped right after the
/// visit; only unique patterns stay in memory.
pub fn run_with<F>(
    size: GridSize,
    shapes: Vec<Shape>,
    config: EnumerationConfig,
    parallel: bool,
    mut visit: F,
) -> Result<DedupReport, ValidationError>
where
    F: FnMut(usize, &Grid, Occurrence),
{
    let generator = Generator::new(size, shapes, config.overlap, config.visibility)?;
    let canonicalizer = Canonicalizer::new(config.canonical, generator.shapes());
    let mut dedup = Deduplicator::new(&canonicalizer);
    let mut check_in = |grid: Grid| {
        let index = dedup.raw_total();
        let occurrence = dedup.push_ref(&grid);
        visit(index, &grid, occurrence);
    };
    if parallel {
        generator.stream_parallel().for_each(&mut check_in);
    } else {
        generator.stream().for_each(&mut check_in);
    }
    Ok(dedup.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::{CanonicalMode, OverlapPolicy, VisibilityMode};

    fn overlapping_trio() -> Vec<Shape> {
        vec![
            Shape::new(1, 2, 'R'),
            Shape::new(2, 2, 'G'),
            Shape::new(1, 1, 'B'),
        ]
    }

    #[test]
    fn test_run_matches_worked_scenario() {
        let shapes = vec![Shape::new(1, 1, 'R'), Shape::new(1, 1, 'G')];
        let report = run(
            GridSize::new(2, 2),
            shapes,
            EnumerationConfig::default(),
            false,
        )
        .unwrap();
        assert_eq!(report.raw_total, 24);
        assert_eq!(report.unique_count(), 12);
        assert_eq!(report.deleted_key_count, 12);
    }

    #[test]
    fn test_run_parallel_matches_sequential() {
        let shapes = vec![
            Shape::new(1, 2, 'R'),
            Shape::new(2, 2, 'G'),
            Shape::new(1, 1, 'B'),
        ];
        let config = EnumerationConfig {
            overlap: OverlapPolicy::OverlapAllowed,
            visibility: VisibilityMode::AllVisible,
            canonical: CanonicalMode::Renamed,
        };
        let seq = run(GridSize::new(2, 3), shapes.clone(), config, false).unwrap();
        let par = run(GridSize::new(2, 3), shapes, config, true).unwrap();
        assert_eq!(seq.unique, par.unique);
        assert_eq!(seq.duplicates, par.duplicates);
        assert_eq!(seq.deleted_key_count, par.deleted_key_count);
    }

    #[test]
    fn test_run_validates_before_enumerating() {
        let err = run(
            GridSize::new(2, 2),
            vec![Shape::new(3, 3, 'R')],
            EnumerationConfig::default(),
            false,
        )
        .unwrap_err();
        assert!(matches!(err, ValidationError::ShapeTooLarge { .. }));
        assert_eq!(err.to_string(), "shape 3x3 (R) does not fit in grid 2x2");
    }

    #[test]
    fn test_streaming_matches_materialized_dedup() {
        let config = EnumerationConfig {
            overlap: OverlapPolicy::OverlapAllowed,
            visibility: VisibilityMode::FirstOnly,
            canonical: CanonicalMode::Symmetric,
        };
        let size = GridSize::new(2, 3);
        let streamed = run(size, overlapping_trio(), config, false).unwrap();

        let generator =
            Generator::new(size, overlapping_trio(), config.overlap, config.visibility).unwrap();
        let canonicalizer = Canonicalizer::new(config.canonical, generator.shapes());
        let materialized = dedup::deduplicate(&canonicalizer, generator.generate());

        assert_eq!(streamed.raw_total, materialized.raw_total);
        assert_eq!(streamed.unique, materialized.unique);
        assert_eq!(streamed.duplicates, materialized.duplicates);
        assert_eq!(streamed.counts, materialized.counts);
        assert_eq!(streamed.deleted_key_count, materialized.deleted_key_count);
    }

    #[test]
    fn test_run_with_visits_every_raw_pattern() {
        let mut visited = Vec::new();
        let report = run_with(
            GridSize::new(2, 2),
            vec![Shape::new(1, 1, 'R'), Shape::new(1, 1, 'G')],
            EnumerationConfig::default(),
            true,
            |index, grid, occurrence| {
                visited.push((index, grid.labels().collect::<String>(), occurrence));
            },
        )
        .unwrap();
        assert_eq!(visited.len(), report.raw_total);
        assert!(visited.iter().enumerate().all(|(i, (index, _, _))| i == *index));
        assert_eq!(visited[0].1, "RGEE");
        assert_eq!(visited[0].2, Occurrence::First);
        // The second order starts by placing G at (0, 0), then R at (0, 1).
        assert_eq!(visited[12].1, "GREE");
        let firsts = visited
            .iter()
            .filter(|(_, _, o)| *o == Occurrence::First)
            .count();
        assert_eq!(firsts, report.unique_count());
    }

    #[test]
    fn test_saved_raw_stream_dedupes_to_same_counts() {
        let config = EnumerationConfig {
            overlap: OverlapPolicy::OverlapAllowed,
            visibility: VisibilityMode::None,
            canonical: CanonicalMode::Exact,
        };
        let mut writer = pattern_file::PatternWriter::new(Vec::new());
        let report = run_with(
            GridSize::new(2, 3),
            overlapping_trio(),
            config,
            false,
            |_, grid, _| writer.write(grid).unwrap(),
        )
        .unwrap();
        assert_eq!(writer.written(), report.raw_total);

        let text = String::from_utf8(writer.into_inner()).unwrap();
        let loaded = pattern_file::parse_patterns(&text).unwrap();
        assert_eq!(loaded.len(), report.raw_total);
        let reloaded = dedup::deduplicate(&Canonicalizer::new(CanonicalMode::Exact, &[]), loaded);

        assert_eq!(reloaded.raw_total, report.raw_total);
        assert_eq!(reloaded.unique_count(), report.unique_count());
        assert_eq!(reloaded.duplicates, report.duplicates);
        assert_eq!(reloaded.deleted_key_count, report.deleted_key_count);
        assert!(!reloaded.duplicates.is_empty());
    }
}
