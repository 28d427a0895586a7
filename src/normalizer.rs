// ==============================================================================
// normalizer.rs - Alignment Record Normalization
// ==============================================================================
// Description: Strand correction, reference-position mapping, diploid consensus
// Author: Matt Barham
// Created: 2026-01-20
// Modified: 2026-02-02
// Version: 1.0.0
// ==============================================================================
// Failure semantics: a step that cannot proceed (missing or length-mismatched
// alignment strings) degrades to an empty derived field. Nothing here aborts
// the normalization as a whole.
// ==============================================================================

use std::collections::{BTreeMap, BTreeSet};

use serde_json::json;
use tracing::{debug, info, warn};

use crate::iupac::{complement, pairwise_consensus, reverse_complement};
use crate::models::{
    AnnotationConfig, ConsensusPosition, NormalizedAlignment, Orientation, RawAlignment,
    VARIANT_COL_BASECALL_INDEX, VARIANT_COL_SIGNAL_POS,
};
use crate::resolver::{CoordinateResolver, MappingProvider};

/// Half-width of the chart window drawn around a variant's signal position
const CHART_RANGE_PADDING: i64 = 150;

/// Per-allele mapping of one reference coordinate to the observed read bases
/// and their trace positions. More than one base signals an insertion run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AllelePositioning {
    pub bases: Vec<char>,
    pub sanger_pos: Vec<i64>,
}

/// Normalize one raw alignment record into a canonical, forward-stranded
/// representation with reference-position tracks and a diploid consensus.
///
/// The orientation flag is consumed exactly once: a record already forward
/// passes through untouched, so the operation is idempotent in effect.
pub fn normalize(mut raw: RawAlignment) -> NormalizedAlignment {
    let original_orientation = raw.orientation();

    if original_orientation == Orientation::Reverse {
        info!("Reverse-oriented alignment detected, normalizing to forward strand");
        normalize_reverse_orientation(&mut raw);
    }

    if !raw.variants.rows.is_empty() {
        raw.variants.ensure_column("hgvs");
    }

    let positioning1 = allele_positioning(&raw, 1, original_orientation);
    let positioning2 = allele_positioning(&raw, 2, original_orientation);
    let consensus_align = consensus_positioning(&positioning1, &positioning2);

    let read_seq_ref = read_seq_ref(&raw);
    let read_seq_consensus = pairwise_consensus(&raw.primary_seq, &raw.secondary_seq);
    let read_seq_consensus_complementary = complement(&read_seq_consensus);
    // Emitted only when the tool reported base calls at all
    let base_count = if raw.primary_seq.is_empty() {
        None
    } else {
        Some(raw.primary_seq.chars().count())
    };

    NormalizedAlignment {
        record: raw,
        original_orientation,
        consensus_align,
        read_seq_ref,
        read_seq_consensus,
        read_seq_consensus_complementary,
        base_count,
        hgvs_alternatives: BTreeMap::new(),
    }
}

/// Resolve variant-row coordinates through the mapping capability and store
/// canonical identifiers plus their alternatives on the record.
///
/// Callers without a live capability simply skip this step; variant rows then
/// keep an empty hgvs column.
pub fn annotate<P: MappingProvider>(
    aligned: &mut NormalizedAlignment,
    resolver: &CoordinateResolver<P>,
    source_accession: &str,
    config: &AnnotationConfig,
) {
    let mut alternatives = std::mem::take(&mut aligned.hgvs_alternatives);
    resolver.annotate_table(
        &mut aligned.record.variants,
        &mut alternatives,
        source_accession,
        config.transcript.as_deref(),
    );
    aligned.hgvs_alternatives = alternatives;
}

/// Reverse-strand normalization: reorient every trace array, sequence,
/// base call and variant row so the record reads forward.
fn normalize_reverse_orientation(raw: &mut RawAlignment) {
    normalize_peaks(raw);

    raw.primary_seq = reverse_complement(&raw.primary_seq);
    raw.secondary_seq = reverse_complement(&raw.secondary_seq);
    raw.ref1_align = reverse_complement(&raw.ref1_align);
    raw.alt1_align = reverse_complement(&raw.alt1_align);
    raw.ref2_align = reverse_complement(&raw.ref2_align);
    raw.alt2_align = reverse_complement(&raw.alt2_align);
    raw.allele1_align = raw.allele1_align.take().map(|s| reverse_complement(&s));
    raw.allele2_align = raw.allele2_align.take().map(|s| reverse_complement(&s));

    // Orientation is fixed to forward from here on; the flag is consumed
    raw.ref1_forward = 1;

    normalize_basecalls_and_variants(raw);
}

/// Reverse the four trace channels, swapping complementary channels
/// (A with T, C with G), and remap each peak-location index.
fn normalize_peaks(raw: &mut RawAlignment) {
    if raw.peak_a.is_empty() {
        return;
    }

    let max_len = raw.peak_a.len() as i64;

    let peak_a: Vec<i64> = raw.peak_t.iter().rev().copied().collect();
    let peak_t: Vec<i64> = raw.peak_a.iter().rev().copied().collect();
    let peak_c: Vec<i64> = raw.peak_g.iter().rev().copied().collect();
    let peak_g: Vec<i64> = raw.peak_c.iter().rev().copied().collect();
    raw.peak_a = peak_a;
    raw.peak_t = peak_t;
    raw.peak_c = peak_c;
    raw.peak_g = peak_g;

    if !raw.basecall_pos.is_empty() {
        raw.basecall_pos = raw
            .basecall_pos
            .iter()
            .rev()
            .map(|p| max_len - 1 - p)
            .collect();
    }
}

/// Rewrite the basecall map and patch variant rows for the reversed trace.
///
/// The call-index remap `num_calls - call_idx + 1` mirrors the external
/// tool's own 1-based call numbering; preserved as-is.
fn normalize_basecalls_and_variants(raw: &mut RawAlignment) {
    let max_len = raw.peak_a.len() as i64;
    let num_calls = raw.basecall_pos.len() as i64;

    if !raw.basecalls.is_empty() && max_len > 0 {
        let mut new_basecalls = BTreeMap::new();

        for (old_sig_pos_str, call_str) in &raw.basecalls {
            let old_sig_pos: i64 = match old_sig_pos_str.parse() {
                Ok(pos) => pos,
                Err(_) => {
                    debug!("Skipping non-numeric basecall position '{}'", old_sig_pos_str);
                    continue;
                }
            };
            let new_sig_pos = max_len - 1 - old_sig_pos;

            let Some((call_idx_part, bases_part)) = call_str.split_once(':') else {
                continue;
            };
            let call_idx: i64 = match call_idx_part.parse() {
                Ok(idx) => idx,
                Err(_) => continue,
            };
            let new_call_idx = num_calls - call_idx + 1;

            for row in &mut raw.variants.rows {
                if row.len() > VARIANT_COL_SIGNAL_POS
                    && row[VARIANT_COL_SIGNAL_POS].as_i64() == Some(old_sig_pos)
                {
                    row[VARIANT_COL_SIGNAL_POS] = new_sig_pos.into();
                    row[VARIANT_COL_BASECALL_INDEX] = new_call_idx.into();
                }
            }

            let new_bases: Vec<String> = bases_part.split('|').map(complement).collect();
            new_basecalls.insert(
                new_sig_pos.to_string(),
                format!("{}:{}", new_call_idx, new_bases.join("|")),
            );
        }

        raw.basecalls = new_basecalls;
    }

    recompute_chart_ranges(raw);
}

/// Recompute the chart x-axis window from the remapped signal positions
fn recompute_chart_ranges(raw: &mut RawAlignment) {
    if raw.chart_config.is_none() || raw.variants.rows.is_empty() {
        return;
    }

    let ranges: Vec<[i64; 2]> = raw
        .variants
        .rows
        .iter()
        .filter_map(|row| row.get(VARIANT_COL_SIGNAL_POS)?.as_i64())
        .map(|sig| [sig - CHART_RANGE_PADDING, sig + CHART_RANGE_PADDING])
        .collect();

    if ranges.is_empty() {
        return;
    }

    let min = ranges.iter().map(|r| r[0]).min().unwrap_or(0);
    let max = ranges.iter().map(|r| r[1]).max().unwrap_or(0);

    if let Some(config) = raw.chart_config.as_mut() {
        if let Some(range) = config.pointer_mut("/x/axis/range") {
            *range = json!([min, max]);
        }
    }
    raw.variants.xranges = Some(ranges);
}

/// Walk one allele's gapped reference/read strings and map every alignment
/// column onto a reference coordinate.
///
/// Reference gaps are insertions relative to the reference and append to the
/// preceding coordinate's entry; insertions before the first real reference
/// base use the leading-gap arithmetic `start + idx - gaps_before_first_base`
/// (tool-specific convention, preserved exactly). The running read position
/// is seeded from the trim applied to this orientation's leading side.
pub fn allele_positioning(
    raw: &RawAlignment,
    allele: u8,
    original_orientation: Orientation,
) -> BTreeMap<i64, AllelePositioning> {
    let (ref_align, alt_align) = raw.allele_strings(allele);

    if ref_align.is_empty() {
        return BTreeMap::new();
    }

    let ref_chars: Vec<char> = ref_align.chars().collect();
    let alt_chars: Vec<char> = alt_align.chars().collect();

    if ref_chars.len() != alt_chars.len() {
        warn!(
            "Allele {} alignment strings differ in length ({} vs {}), skipping positioning",
            allele,
            ref_chars.len(),
            alt_chars.len()
        );
        return BTreeMap::new();
    }

    let start_pos = raw.allele_start(allele);
    let gaps_before_first_base =
        ref_chars.iter().take_while(|c| **c == '-').count() as i64;

    let mut sanger_pos = match original_orientation {
        Orientation::Reverse => raw.meta.arguments.trim_right,
        Orientation::Forward => raw.meta.arguments.trim_left,
    };

    let mut positioning: BTreeMap<i64, AllelePositioning> = BTreeMap::new();
    let mut ref_offset: i64 = -1;
    let mut achieved_first_base = false;

    for (idx, (&base_ref, &base_alt)) in ref_chars.iter().zip(alt_chars.iter()).enumerate() {
        if base_alt != '-' {
            sanger_pos += 1;
        }

        if base_ref == '-' {
            if !achieved_first_base {
                let ref_pos = start_pos + idx as i64 - gaps_before_first_base;
                let entry = positioning.entry(ref_pos).or_default();
                entry.bases.push(base_alt);
                entry.sanger_pos.push(sanger_pos);
            } else {
                // Insertion relative to the reference, append to the
                // coordinate already emitted for the preceding base
                let ref_pos = start_pos + ref_offset;
                if let Some(entry) = positioning.get_mut(&ref_pos) {
                    entry.bases.push(base_alt);
                    entry.sanger_pos.push(sanger_pos);
                }
            }
        } else {
            ref_offset += 1;
            achieved_first_base = true;

            let ref_pos = start_pos + ref_offset;
            positioning.insert(
                ref_pos,
                AllelePositioning {
                    bases: vec![base_alt],
                    sanger_pos: vec![sanger_pos],
                },
            );
        }
    }

    positioning
}

/// Union both allele mappings and build the per-coordinate consensus view.
/// Consensus bases are computed only where both tracks carry data.
pub fn consensus_positioning(
    positioning1: &BTreeMap<i64, AllelePositioning>,
    positioning2: &BTreeMap<i64, AllelePositioning>,
) -> BTreeMap<String, ConsensusPosition> {
    let all_keys: BTreeSet<i64> = positioning1
        .keys()
        .chain(positioning2.keys())
        .copied()
        .collect();

    let mut consensus = BTreeMap::new();

    for ref_pos in all_keys {
        let mut item = ConsensusPosition {
            ref_pos,
            ..Default::default()
        };

        if let Some(track1) = positioning1.get(&ref_pos) {
            item.alt1 = track1.bases.clone();
            item.sanger_pos1 = track1.sanger_pos.clone();
        }
        if let Some(track2) = positioning2.get(&ref_pos) {
            item.alt2 = track2.bases.clone();
            item.sanger_pos2 = track2.sanger_pos.clone();
        }

        if !item.alt1.is_empty() && !item.alt2.is_empty() {
            let track1: String = item.alt1.iter().collect();
            let track2: String = item.alt2.iter().collect();
            item.cons = pairwise_consensus(&track1, &track2).chars().collect();
        }

        consensus.insert(ref_pos.to_string(), item);
    }

    consensus
}

/// Derive the linear reference sequence implied by the read: reference
/// characters at every column where the read is not a gap, including gap
/// characters at insertion sites. Length-equal to the ungapped read.
pub fn read_seq_ref(raw: &RawAlignment) -> String {
    let ref_chars: Vec<char> = raw.ref1_align.chars().collect();
    let alt_chars: Vec<char> = raw.alt1_align.chars().collect();

    if ref_chars.is_empty() || alt_chars.is_empty() || ref_chars.len() != alt_chars.len() {
        if !ref_chars.is_empty() || !alt_chars.is_empty() {
            warn!("Cannot derive read-vs-reference sequence, alignment strings unusable");
        }
        return String::new();
    }

    ref_chars
        .iter()
        .zip(alt_chars.iter())
        .filter(|(_, &alt)| alt != '-')
        .map(|(&r, _)| r)
        .collect()
}
