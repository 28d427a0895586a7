// ==============================================================================
// resolver.rs - Cross-Frame Variant Coordinate Resolution
// ==============================================================================
// Description: BFS over genomic/transcript/protein HGVS representations
// Author: Matt Barham
// Created: 2026-01-21
// Modified: 2026-02-02
// Version: 1.0.0
// ==============================================================================
// Exploration is bounded: 2 rounds deep, 10 mapping targets per node, 5
// overlapping transcripts per genomic node. The bounds truncate silently;
// they are resource guards, not errors.
// ==============================================================================

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::VariantTable;

/// Maximum BFS expansion rounds
const MAX_DEPTH: usize = 2;

/// Maximum cross-frame mapping targets considered per frontier node
const MAX_MAPPING_TARGETS: usize = 10;

/// Maximum overlapping transcripts considered per genomic node
const MAX_REGION_TRANSCRIPTS: usize = 5;

/// Reference coordinate frame, derived from accession prefix conventions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FrameType {
    Genomic,
    Coding,
    Noncoding,
    Protein,
}

impl FrameType {
    /// Total classification: every accession maps to exactly one frame,
    /// unrecognized prefixes default to Noncoding.
    pub fn from_accession(accession: &str) -> Self {
        if accession.starts_with("NM_") || accession.starts_with("XM_") {
            FrameType::Coding
        } else if accession.starts_with("NR_") || accession.starts_with("XR_") {
            FrameType::Noncoding
        } else if accession.starts_with("NC_")
            || accession.starts_with("NG_")
            || accession.starts_with("NW_")
            || accession.starts_with("NT_")
        {
            FrameType::Genomic
        } else if accession.starts_with("NP_") || accession.starts_with("XP_") {
            FrameType::Protein
        } else {
            FrameType::Noncoding
        }
    }

    /// HGVS sequence-type character for this frame
    pub fn type_char(&self) -> char {
        match self {
            FrameType::Genomic => 'g',
            FrameType::Coding => 'c',
            FrameType::Noncoding => 'n',
            FrameType::Protein => 'p',
        }
    }
}

/// A single genetic variant expressed in one reference frame
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VariantCoordinate {
    pub accession: String,
    pub frame: FrameType,
    pub position: i64,
    pub ref_allele: String,
    pub alt_allele: String,
}

impl VariantCoordinate {
    pub fn new(accession: &str, position: i64, ref_allele: &str, alt_allele: &str) -> Self {
        Self {
            accession: accession.to_string(),
            frame: FrameType::from_accession(accession),
            position,
            ref_allele: ref_allele.to_string(),
            alt_allele: alt_allele.to_string(),
        }
    }

    /// Last reference position covered by the reference allele
    pub fn end_position(&self) -> i64 {
        self.position + (self.ref_allele.chars().count() as i64 - 1).max(0)
    }
}

impl fmt::Display for VariantCoordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let t = self.frame.type_char();
        if self.frame == FrameType::Protein {
            return write!(
                f,
                "{}:p.{}{}{}",
                self.accession, self.ref_allele, self.position, self.alt_allele
            );
        }
        if self.ref_allele.chars().count() <= 1 && self.alt_allele.chars().count() <= 1 {
            write!(
                f,
                "{}:{}.{}{}>{}",
                self.accession, t, self.position, self.ref_allele, self.alt_allele
            )
        } else {
            write!(
                f,
                "{}:{}.{}_{}del{}ins{}",
                self.accession,
                t,
                self.position,
                self.end_position(),
                self.ref_allele,
                self.alt_allele
            )
        }
    }
}

/// Errors surfaced by the remote mapping capability.
///
/// `Unreachable` aborts the whole exploration; the other variants drop only
/// the candidate that produced them.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MappingError {
    #[error("Mapping capability unreachable: {0}")]
    Unreachable(String),

    #[error("Transform {source_frame:?} -> {target:?} is not supported")]
    UnsupportedTransform {
        source_frame: FrameType,
        target: FrameType,
    },

    #[error("No mapping found for '{0}'")]
    NotFound(String),
}

/// Remote variant-mapping capability.
///
/// The underlying client is not guaranteed safe for concurrent invocation;
/// `CoordinateResolver` serializes every call behind a mutex.
pub trait MappingProvider {
    /// Candidate cross-frame mapping target accessions for an accession
    fn mapping_targets(&mut self, accession: &str) -> Result<Vec<String>, MappingError>;

    /// Transform a variant into the frame of a specific target accession.
    /// Legal pairs: genomic<->coding, genomic<->noncoding.
    fn transform(
        &mut self,
        variant: &VariantCoordinate,
        target_accession: &str,
    ) -> Result<VariantCoordinate, MappingError>;

    /// Transcript accessions overlapping a genomic interval
    fn transcripts_for_region(
        &mut self,
        accession: &str,
        start: i64,
        end: i64,
    ) -> Result<Vec<String>, MappingError>;

    /// Project a coding-frame variant into protein frame
    fn to_protein(&mut self, variant: &VariantCoordinate)
        -> Result<VariantCoordinate, MappingError>;
}

/// Whether a pairwise transform between two frames is legal for the provider
fn legal_transform(source: FrameType, target: FrameType) -> bool {
    matches!(
        (source, target),
        (FrameType::Coding, FrameType::Genomic)
            | (FrameType::Noncoding, FrameType::Genomic)
            | (FrameType::Genomic, FrameType::Coding)
            | (FrameType::Genomic, FrameType::Noncoding)
    )
}

/// Explores equivalent variant representations across coordinate frames and
/// selects canonical HGVS identifiers for variant rows.
pub struct CoordinateResolver<P: MappingProvider> {
    provider: Mutex<P>,
}

impl<P: MappingProvider> CoordinateResolver<P> {
    /// Wrap a mapping capability constructed once at startup. All calls into
    /// the provider are serialized through the resolver.
    pub fn new(provider: P) -> Self {
        Self {
            provider: Mutex::new(provider),
        }
    }

    /// Breadth-first exploration of equivalent representations.
    ///
    /// Returns the deduplicated, lexicographically sorted set of every HGVS
    /// string discovered, including the source itself. Per-candidate failures
    /// are dropped; an unreachable capability aborts the search.
    pub fn find_equivalents(
        &self,
        source: &VariantCoordinate,
    ) -> Result<Vec<String>, MappingError> {
        let mut provider = self
            .provider
            .lock()
            .map_err(|_| MappingError::Unreachable("mapping client lock poisoned".into()))?;

        let mut discovered: BTreeSet<String> = BTreeSet::new();
        discovered.insert(source.to_string());

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(source.accession.clone());

        let mut frontier = vec![source.clone()];

        for _round in 0..MAX_DEPTH {
            let mut next_frontier = Vec::new();

            for variant in &frontier {
                // 1. Cross-frame mapping targets for this accession
                match provider.mapping_targets(&variant.accession) {
                    Ok(targets) => {
                        for target in targets.into_iter().take(MAX_MAPPING_TARGETS) {
                            if visited.contains(&target) {
                                continue;
                            }
                            let target_frame = FrameType::from_accession(&target);
                            if legal_transform(variant.frame, target_frame) {
                                match provider.transform(variant, &target) {
                                    Ok(mapped) => {
                                        visited.insert(mapped.accession.clone());
                                        if discovered.insert(mapped.to_string()) {
                                            next_frontier.push(mapped);
                                        }
                                    }
                                    Err(MappingError::Unreachable(msg)) => {
                                        return Err(MappingError::Unreachable(msg));
                                    }
                                    Err(e) => {
                                        debug!("Dropping mapping target {}: {}", target, e);
                                    }
                                }
                            }
                            visited.insert(target);
                        }
                    }
                    Err(MappingError::Unreachable(msg)) => {
                        return Err(MappingError::Unreachable(msg));
                    }
                    Err(e) => {
                        debug!("No mapping targets for {}: {}", variant.accession, e);
                    }
                }

                // 2. Genomic frame: expand into overlapping transcripts
                if variant.frame == FrameType::Genomic {
                    match provider.transcripts_for_region(
                        &variant.accession,
                        variant.position,
                        variant.end_position(),
                    ) {
                        Ok(mut transcripts) => {
                            // Coding transcripts first
                            transcripts.sort_by_key(|tx| {
                                (FrameType::from_accession(tx) != FrameType::Coding, tx.clone())
                            });

                            for tx in transcripts.into_iter().take(MAX_REGION_TRANSCRIPTS) {
                                if visited.contains(&tx) {
                                    continue;
                                }
                                match provider.transform(variant, &tx) {
                                    Ok(mapped) => {
                                        visited.insert(mapped.accession.clone());
                                        if discovered.insert(mapped.to_string()) {
                                            next_frontier.push(mapped);
                                        }
                                    }
                                    Err(MappingError::Unreachable(msg)) => {
                                        return Err(MappingError::Unreachable(msg));
                                    }
                                    Err(e) => {
                                        debug!("Dropping overlapping transcript {}: {}", tx, e);
                                    }
                                }
                                visited.insert(tx);
                            }
                        }
                        Err(MappingError::Unreachable(msg)) => {
                            return Err(MappingError::Unreachable(msg));
                        }
                        Err(e) => {
                            debug!(
                                "No overlapping transcripts for {}: {}",
                                variant.accession, e
                            );
                        }
                    }
                }

                // 3. Coding frame: project into protein (terminal, not expanded)
                if variant.frame == FrameType::Coding {
                    match provider.to_protein(variant) {
                        Ok(protein) => {
                            visited.insert(protein.accession.clone());
                            discovered.insert(protein.to_string());
                        }
                        Err(MappingError::Unreachable(msg)) => {
                            return Err(MappingError::Unreachable(msg));
                        }
                        Err(e) => {
                            debug!("No protein projection for {}: {}", variant.accession, e);
                        }
                    }
                }
            }

            if next_frontier.is_empty() {
                break;
            }
            frontier = next_frontier;
        }

        Ok(discovered.into_iter().collect())
    }

    /// Annotate every row of a variant table with a canonical HGVS identifier
    /// and record the discovered alternatives keyed by that identifier.
    ///
    /// Row failures are isolated: a row that cannot be resolved keeps an
    /// empty hgvs cell and processing continues.
    pub fn annotate_table(
        &self,
        table: &mut VariantTable,
        alternatives: &mut BTreeMap<String, Vec<String>>,
        source_accession: &str,
        target_accession: Option<&str>,
    ) {
        let hgvs_idx = table.ensure_column("hgvs");

        let (pos_idx, ref_idx, alt_idx) = match (
            table.column_index("pos"),
            table.column_index("ref"),
            table.column_index("alt"),
        ) {
            (Some(p), Some(r), Some(a)) => (p, r, a),
            _ => {
                warn!("Required variant columns (pos, ref, alt) not found in header");
                return;
            }
        };

        for (i, row) in table.rows.iter_mut().enumerate() {
            let parsed = parse_row_variant(row, pos_idx, ref_idx, alt_idx, source_accession);
            let source = match parsed {
                Some(v) => v,
                None => {
                    debug!("Variant row {} has no parsable pos/ref/alt", i);
                    continue;
                }
            };

            match self.find_equivalents(&source) {
                Ok(equivalents) => {
                    let selected = select_canonical(&equivalents, target_accession);

                    if let Some(cell) = row.get_mut(hgvs_idx) {
                        *cell = Value::String(selected.clone().unwrap_or_default());
                    }

                    if let Some(selected) = selected {
                        let mut sorted = equivalents;
                        sorted.sort_by_key(alternative_priority);
                        alternatives.insert(selected, sorted);
                    }
                }
                Err(e) => {
                    warn!("Error resolving variant row {}: {}", i, e);
                    if let Some(cell) = row.get_mut(hgvs_idx) {
                        *cell = Value::String(String::new());
                    }
                }
            }
        }
    }
}

/// Canonical selection: coding-transcript candidates first, then an exact
/// target-accession match, then predicted coding (XM_), then the first
/// sorted result.
pub fn select_canonical(equivalents: &[String], target_accession: Option<&str>) -> Option<String> {
    let mut candidates_nm = Vec::new();
    let mut candidates_xm = Vec::new();
    let mut exact_match = None;

    for eq in equivalents {
        if let Some(target) = target_accession {
            if eq.starts_with(&format!("{}:", target)) {
                exact_match = Some(eq.clone());
                continue;
            }
        }
        if eq.starts_with("NM_") {
            candidates_nm.push(eq.clone());
        } else if eq.starts_with("XM_") {
            candidates_xm.push(eq.clone());
        }
    }

    candidates_nm
        .into_iter()
        .next()
        .or(exact_match)
        .or_else(|| candidates_xm.into_iter().next())
        .or_else(|| equivalents.first().cloned())
}

/// Fixed alternative ordering: coding before protein before genomic before
/// anything else, lexicographic within each group.
fn alternative_priority(representation: &String) -> (u8, String) {
    let rank = if representation.starts_with("NM") {
        0
    } else if representation.starts_with("NP") {
        1
    } else if representation.starts_with("NC") {
        2
    } else {
        3
    };
    (rank, representation.clone())
}

fn parse_row_variant(
    row: &[Value],
    pos_idx: usize,
    ref_idx: usize,
    alt_idx: usize,
    source_accession: &str,
) -> Option<VariantCoordinate> {
    let pos = match row.get(pos_idx)? {
        Value::Number(n) => n.as_i64()?,
        Value::String(s) => s.parse().ok()?,
        _ => return None,
    };
    let ref_allele = row.get(ref_idx)?.as_str()?;
    let alt_allele = row.get(alt_idx)?.as_str()?;

    Some(VariantCoordinate::new(
        source_accession,
        pos,
        ref_allele,
        alt_allele,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    /// Scripted provider: fixed target lists and transforms
    #[derive(Default)]
    struct MockProvider {
        targets: HashMap<String, Vec<String>>,
        region_transcripts: HashMap<String, Vec<String>>,
        /// (source accession, target accession) -> mapped position
        transforms: HashMap<(String, String), i64>,
        /// coding accession -> (protein accession, ref, alt)
        proteins: HashMap<String, (String, String, String)>,
        unreachable: bool,
    }

    impl MappingProvider for MockProvider {
        fn mapping_targets(&mut self, accession: &str) -> Result<Vec<String>, MappingError> {
            if self.unreachable {
                return Err(MappingError::Unreachable("connection refused".into()));
            }
            Ok(self.targets.get(accession).cloned().unwrap_or_default())
        }

        fn transform(
            &mut self,
            variant: &VariantCoordinate,
            target_accession: &str,
        ) -> Result<VariantCoordinate, MappingError> {
            if self.unreachable {
                return Err(MappingError::Unreachable("connection refused".into()));
            }
            let key = (variant.accession.clone(), target_accession.to_string());
            match self.transforms.get(&key) {
                Some(&pos) => Ok(VariantCoordinate::new(
                    target_accession,
                    pos,
                    &variant.ref_allele,
                    &variant.alt_allele,
                )),
                None => Err(MappingError::NotFound(target_accession.to_string())),
            }
        }

        fn transcripts_for_region(
            &mut self,
            accession: &str,
            _start: i64,
            _end: i64,
        ) -> Result<Vec<String>, MappingError> {
            Ok(self
                .region_transcripts
                .get(accession)
                .cloned()
                .unwrap_or_default())
        }

        fn to_protein(
            &mut self,
            variant: &VariantCoordinate,
        ) -> Result<VariantCoordinate, MappingError> {
            match self.proteins.get(&variant.accession) {
                Some((ac, r, a)) => Ok(VariantCoordinate::new(ac, variant.position, r, a)),
                None => Err(MappingError::NotFound(variant.accession.clone())),
            }
        }
    }

    fn three_frame_provider() -> MockProvider {
        let mut provider = MockProvider::default();
        provider.targets.insert(
            "NC_000017.11".into(),
            vec!["NM_007294.4".into()],
        );
        provider.transforms.insert(
            ("NC_000017.11".into(), "NM_007294.4".into()),
            589,
        );
        provider.proteins.insert(
            "NM_007294.4".into(),
            ("NP_009225.1".into(), "Gly".into(), "Cys".into()),
        );
        provider
    }

    #[test]
    fn test_frame_classification_is_total() {
        assert_eq!(FrameType::from_accession("NM_000088.3"), FrameType::Coding);
        assert_eq!(FrameType::from_accession("XM_011531.1"), FrameType::Coding);
        assert_eq!(FrameType::from_accession("NR_003287.4"), FrameType::Noncoding);
        assert_eq!(FrameType::from_accession("XR_001737.2"), FrameType::Noncoding);
        assert_eq!(FrameType::from_accession("NC_000017.11"), FrameType::Genomic);
        assert_eq!(FrameType::from_accession("NG_008866.1"), FrameType::Genomic);
        assert_eq!(FrameType::from_accession("NW_003871.1"), FrameType::Genomic);
        assert_eq!(FrameType::from_accession("NT_010718.17"), FrameType::Genomic);
        assert_eq!(FrameType::from_accession("NP_009225.1"), FrameType::Protein);
        // Unrecognized prefix defaults to noncoding
        assert_eq!(FrameType::from_accession("ENST00000357654"), FrameType::Noncoding);
        assert_eq!(FrameType::from_accession(""), FrameType::Noncoding);
    }

    #[test]
    fn test_variant_display() {
        let snv = VariantCoordinate::new("NM_000088.3", 589, "G", "T");
        assert_eq!(snv.to_string(), "NM_000088.3:c.589G>T");

        let genomic = VariantCoordinate::new("NC_000017.11", 43094464, "A", "C");
        assert_eq!(genomic.to_string(), "NC_000017.11:g.43094464A>C");

        let delins = VariantCoordinate::new("NG_008866.1", 100, "ACG", "T");
        assert_eq!(delins.to_string(), "NG_008866.1:g.100_102delACGinsT");

        let protein = VariantCoordinate::new("NP_009225.1", 197, "Gly", "Cys");
        assert_eq!(protein.to_string(), "NP_009225.1:p.Gly197Cys");
    }

    #[test]
    fn test_find_equivalents_three_frames() {
        let resolver = CoordinateResolver::new(three_frame_provider());
        let source = VariantCoordinate::new("NC_000017.11", 43094464, "A", "C");

        let equivalents = resolver.find_equivalents(&source).unwrap();

        assert_eq!(equivalents.len(), 3);
        // Lexicographically sorted
        let mut sorted = equivalents.clone();
        sorted.sort();
        assert_eq!(equivalents, sorted);
        assert!(equivalents.iter().any(|e| e.starts_with("NC_")));
        assert!(equivalents.iter().any(|e| e.starts_with("NM_")));
        assert!(equivalents.iter().any(|e| e.starts_with("NP_")));
    }

    #[test]
    fn test_canonical_prefers_coding() {
        let equivalents = vec![
            "NC_000017.11:g.43094464A>C".to_string(),
            "NM_007294.4:c.589G>T".to_string(),
            "NP_009225.1:p.Gly197Cys".to_string(),
        ];

        let selected = select_canonical(&equivalents, None);
        assert_eq!(selected.as_deref(), Some("NM_007294.4:c.589G>T"));
    }

    #[test]
    fn test_canonical_exact_target_when_no_coding() {
        let equivalents = vec![
            "NC_000017.11:g.43094464A>C".to_string(),
            "NR_003287.4:n.120A>C".to_string(),
        ];

        let selected = select_canonical(&equivalents, Some("NR_003287.4"));
        assert_eq!(selected.as_deref(), Some("NR_003287.4:n.120A>C"));

        // Without a target, falls back to the first sorted entry
        let selected = select_canonical(&equivalents, None);
        assert_eq!(selected.as_deref(), Some("NC_000017.11:g.43094464A>C"));
    }

    #[test]
    fn test_canonical_coding_beats_exact_target() {
        let equivalents = vec![
            "NC_000017.11:g.43094464A>C".to_string(),
            "NM_007294.4:c.589G>T".to_string(),
        ];

        // Coding candidate still wins over the exact genomic target
        let selected = select_canonical(&equivalents, Some("NC_000017.11"));
        assert_eq!(selected.as_deref(), Some("NM_007294.4:c.589G>T"));
    }

    #[test]
    fn test_unreachable_capability_propagates() {
        let provider = MockProvider {
            unreachable: true,
            ..Default::default()
        };
        let resolver = CoordinateResolver::new(provider);
        let source = VariantCoordinate::new("NC_000017.11", 100, "A", "C");

        let err = resolver.find_equivalents(&source).unwrap_err();
        assert!(matches!(err, MappingError::Unreachable(_)));
    }

    /// Provider that always invents novel accessions: exploration must still
    /// terminate within the fixed depth bound.
    struct NovelProvider {
        counter: u64,
    }

    impl MappingProvider for NovelProvider {
        fn mapping_targets(&mut self, accession: &str) -> Result<Vec<String>, MappingError> {
            let frame = FrameType::from_accession(accession);
            let mut targets = Vec::new();
            for _ in 0..20 {
                self.counter += 1;
                let target = match frame {
                    // Alternate frames so every transform is legal
                    FrameType::Genomic => format!("NM_{:06}.1", self.counter),
                    _ => format!("NC_{:06}.1", self.counter),
                };
                targets.push(target);
            }
            Ok(targets)
        }

        fn transform(
            &mut self,
            variant: &VariantCoordinate,
            target_accession: &str,
        ) -> Result<VariantCoordinate, MappingError> {
            Ok(VariantCoordinate::new(
                target_accession,
                variant.position + 1,
                &variant.ref_allele,
                &variant.alt_allele,
            ))
        }

        fn transcripts_for_region(
            &mut self,
            _accession: &str,
            _start: i64,
            _end: i64,
        ) -> Result<Vec<String>, MappingError> {
            let mut transcripts = Vec::new();
            for _ in 0..20 {
                self.counter += 1;
                transcripts.push(format!("NR_{:06}.1", self.counter));
            }
            Ok(transcripts)
        }

        fn to_protein(
            &mut self,
            variant: &VariantCoordinate,
        ) -> Result<VariantCoordinate, MappingError> {
            self.counter += 1;
            Ok(VariantCoordinate::new(
                &format!("NP_{:06}.1", self.counter),
                variant.position,
                &variant.ref_allele,
                &variant.alt_allele,
            ))
        }
    }

    #[test]
    fn test_depth_limit_bounds_exploration() {
        let resolver = CoordinateResolver::new(NovelProvider { counter: 0 });
        let source = VariantCoordinate::new("NC_000001.11", 100, "A", "G");

        let equivalents = resolver.find_equivalents(&source).unwrap();

        // Round 1: source expands to <= 10 targets + 5 transcripts.
        // Round 2: each of those expands once more. Terminates regardless of
        // the provider's endless supply of novel accessions.
        assert!(!equivalents.is_empty());
        assert!(equivalents.len() <= 1 + 15 + 15 * 16);
        assert!(equivalents.contains(&source.to_string()));
    }

    #[test]
    fn test_annotate_table_rows() {
        let resolver = CoordinateResolver::new(three_frame_provider());

        let mut table = VariantTable {
            columns: vec!["chr".into(), "pos".into(), "ref".into(), "alt".into()],
            rows: vec![vec![
                "chr17".into(),
                43094464.into(),
                "A".into(),
                "C".into(),
            ]],
            xranges: None,
        };
        let mut alternatives = BTreeMap::new();

        resolver.annotate_table(&mut table, &mut alternatives, "NC_000017.11", None);

        let hgvs_idx = table.column_index("hgvs").unwrap();
        let selected = table.rows[0][hgvs_idx].as_str().unwrap();
        assert_eq!(selected, "NM_007294.4:c.589A>C");

        let alts = alternatives.get(selected).unwrap();
        assert_eq!(alts.len(), 3);
        // Priority ordering: coding, protein, genomic
        assert!(alts[0].starts_with("NM_"));
        assert!(alts[1].starts_with("NP_"));
        assert!(alts[2].starts_with("NC_"));
    }

    #[test]
    fn test_annotate_table_isolates_bad_rows() {
        let resolver = CoordinateResolver::new(three_frame_provider());

        // First row has an unparsable position; the second resolves normally
        let mut table = VariantTable {
            columns: vec!["chr".into(), "pos".into(), "ref".into(), "alt".into()],
            rows: vec![
                vec!["chr17".into(), "not-a-position".into(), "A".into(), "C".into()],
                vec!["chr17".into(), 43094464.into(), "A".into(), "C".into()],
            ],
            xranges: None,
        };
        let mut alternatives = BTreeMap::new();

        resolver.annotate_table(&mut table, &mut alternatives, "NC_000017.11", None);

        let hgvs_idx = table.column_index("hgvs").unwrap();
        // Bad row keeps its empty hgvs cell, processing continues
        assert_eq!(table.rows[0][hgvs_idx].as_str(), Some(""));
        assert_eq!(
            table.rows[1][hgvs_idx].as_str(),
            Some("NM_007294.4:c.589A>C")
        );
        assert_eq!(alternatives.len(), 1);
    }

    #[test]
    fn test_annotate_table_missing_columns_is_noop() {
        let resolver = CoordinateResolver::new(MockProvider::default());
        let mut table = VariantTable {
            columns: vec!["position".into()],
            rows: vec![vec![100.into()]],
            xranges: None,
        };
        let mut alternatives = BTreeMap::new();

        resolver.annotate_table(&mut table, &mut alternatives, "NC_000017.11", None);

        assert!(alternatives.is_empty());
        // hgvs column added, row untouched beyond padding
        assert!(table.column_index("hgvs").is_some());
    }
}
