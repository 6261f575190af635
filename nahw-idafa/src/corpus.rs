//! Corpus batch processing: one detection pass per surah.

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use nahw_morph::{Lexicon, Segment, SegmentId};
use rayon::prelude::*;
use tracing::info;

use crate::construction::{DetectionResult, Statistics};
use crate::detector::IdafaDetector;
use crate::error::DetectError;

/// Corpus input records share the segment schema.
pub type CorpusSegment = Segment;

#[derive(Debug, Clone, Default)]
pub struct CorpusResult {
    /// Per-surah results, ordered by surah number.
    pub surahs: BTreeMap<u32, DetectionResult>,
    pub global_statistics: Statistics,
    pub total_constructions: usize,
    pub elapsed: Duration,
}

impl CorpusResult {
    pub fn surah(&self, number: u32) -> Option<&DetectionResult> {
        self.surahs.get(&number)
    }
}

pub struct CorpusProcessor<'d, 'a> {
    detector: &'d IdafaDetector<'a>,
    lexicon: Option<&'d Lexicon>,
}

impl<'d, 'a> CorpusProcessor<'d, 'a> {
    pub fn new(detector: &'d IdafaDetector<'a>) -> Self {
        Self {
            detector,
            lexicon: None,
        }
    }

    pub fn with_lexicon(mut self, lexicon: &'d Lexicon) -> Self {
        self.lexicon = Some(lexicon);
        self
    }

    pub fn process(&self, segments: &[CorpusSegment]) -> Result<CorpusResult, DetectError> {
        let started = Instant::now();
        let groups = group_by_surah(segments)?;

        let results: Vec<(u32, DetectionResult)> = if self.detector.config().parallel_corpus {
            groups
                .into_par_iter()
                .map(|(surah, group)| self.detect_group(surah, group))
                .collect::<Result<_, _>>()?
        } else {
            groups
                .into_iter()
                .map(|(surah, group)| self.detect_group(surah, group))
                .collect::<Result<_, _>>()?
        };

        let surahs: BTreeMap<u32, DetectionResult> = results.into_iter().collect();
        let global_statistics: Statistics = surahs.values().map(|result| &result.statistics).sum();
        let elapsed = started.elapsed();

        info!(
            surahs = surahs.len(),
            segments = segments.len(),
            constructions = global_statistics.total,
            elapsed_ms = elapsed.as_millis() as u64,
            "corpus processed"
        );

        Ok(CorpusResult {
            total_constructions: global_statistics.total,
            surahs,
            global_statistics,
            elapsed,
        })
    }

    fn detect_group(
        &self,
        surah: u32,
        group: Vec<&Segment>,
    ) -> Result<(u32, DetectionResult), DetectError> {
        let result = self.detector.detect_segments(group, self.lexicon)?;
        Ok((surah, result))
    }
}

fn group_by_surah(segments: &[Segment]) -> Result<BTreeMap<u32, Vec<&Segment>>, DetectError> {
    let mut groups: BTreeMap<u32, Vec<&Segment>> = BTreeMap::new();
    for segment in segments {
        let key: SegmentId = segment.key().map_err(|source| DetectError::InvalidSegmentId {
            id: segment.id.clone(),
            source,
        })?;
        groups.entry(key.surah).or_default().push(segment);
    }
    Ok(groups)
}

/// Process a corpus with the default detector.
pub fn process_corpus(segments: &[CorpusSegment]) -> Result<CorpusResult, DetectError> {
    let detector = IdafaDetector::default();
    CorpusProcessor::new(&detector).process(segments)
}
