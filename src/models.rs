// ==============================================================================
// models.rs - Alignment Data Models
// ==============================================================================
// Description: Typed boundary for tracy decompose JSON and normalized output
// Author: Matt Barham
// Created: 2026-01-19
// Modified: 2026-02-02
// Version: 1.0.0
// ==============================================================================
// The external tool emits dynamically-shaped JSON (fields appear or vanish
// depending on orientation and tool version). Optionality is resolved here,
// at the boundary, so the pipeline never carries an untyped map around.
// ==============================================================================

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Strand orientation of an aligned read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Forward,
    Reverse,
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Forward => "forward",
            Orientation::Reverse => "reverse",
        }
    }
}

/// Variant table as emitted by the alignment tool: a column header plus rows
/// of heterogeneous values at fixed tuple offsets.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VariantTable {
    #[serde(default)]
    pub columns: Vec<String>,

    #[serde(default)]
    pub rows: Vec<Vec<Value>>,

    /// Chart x-ranges recomputed after strand normalization
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub xranges: Option<Vec<[i64; 2]>>,
}

/// Fixed tuple offset of the base-call index column in a variant row.
/// Tool-defined; confirmed against tracy's own variant array layout.
pub const VARIANT_COL_BASECALL_INDEX: usize = 9;

/// Fixed tuple offset of the trace signal-position column in a variant row.
pub const VARIANT_COL_SIGNAL_POS: usize = 10;

impl VariantTable {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Ensure a named column exists, padding every row with an empty cell.
    /// Returns the column index.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.columns.push(name.to_string());
        let idx = self.columns.len() - 1;
        for row in &mut self.rows {
            while row.len() < self.columns.len() {
                row.push(Value::String(String::new()));
            }
        }
        idx
    }
}

/// Trim amounts and other tool arguments recorded in the metadata block
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolArguments {
    #[serde(default, rename = "trimLeft")]
    pub trim_left: i64,

    #[serde(default, rename = "trimRight")]
    pub trim_right: i64,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolMeta {
    #[serde(default)]
    pub arguments: ToolArguments,

    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

fn default_forward_flag() -> i64 {
    1
}

/// One raw alignment record as emitted by `tracy decompose`.
///
/// Field names mirror the tool's JSON keys. Allele 2 fields are empty for
/// single-allele alignments; peak arrays cover all four trace channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawAlignment {
    /// 1 = forward, 0 = reverse. Consumed once by strand normalization.
    #[serde(default = "default_forward_flag", rename = "ref1forward")]
    pub ref1_forward: i64,

    /// First reference base of the alignment window (tool-reported, 1-based)
    #[serde(default, rename = "ref1pos")]
    pub ref1_pos: i64,

    #[serde(default, rename = "ref2pos")]
    pub ref2_pos: i64,

    #[serde(default, rename = "primarySeq")]
    pub primary_seq: String,

    #[serde(default, rename = "secondarySeq")]
    pub secondary_seq: String,

    #[serde(default, rename = "ref1align")]
    pub ref1_align: String,

    #[serde(default, rename = "alt1align")]
    pub alt1_align: String,

    #[serde(default, rename = "ref2align")]
    pub ref2_align: String,

    #[serde(default, rename = "alt2align")]
    pub alt2_align: String,

    #[serde(default, rename = "allele1align", skip_serializing_if = "Option::is_none")]
    pub allele1_align: Option<String>,

    #[serde(default, rename = "allele2align", skip_serializing_if = "Option::is_none")]
    pub allele2_align: Option<String>,

    #[serde(default, rename = "peakA")]
    pub peak_a: Vec<i64>,

    #[serde(default, rename = "peakC")]
    pub peak_c: Vec<i64>,

    #[serde(default, rename = "peakG")]
    pub peak_g: Vec<i64>,

    #[serde(default, rename = "peakT")]
    pub peak_t: Vec<i64>,

    /// Peak-location index for each base call, into the trace arrays
    #[serde(default, rename = "basecallPos")]
    pub basecall_pos: Vec<i64>,

    /// Signal position (stringified) -> "callIndex:BASE" or "callIndex:B1|B2"
    #[serde(default)]
    pub basecalls: BTreeMap<String, String>,

    #[serde(default)]
    pub variants: VariantTable,

    #[serde(default)]
    pub meta: ToolMeta,

    /// Opaque chart payload; only the x-axis range is rewritten here
    #[serde(default, rename = "chartConfig", skip_serializing_if = "Option::is_none")]
    pub chart_config: Option<Value>,

    /// Tool fields the pipeline does not interpret, passed through untouched
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl Default for RawAlignment {
    fn default() -> Self {
        Self {
            ref1_forward: default_forward_flag(),
            ref1_pos: 0,
            ref2_pos: 0,
            primary_seq: String::new(),
            secondary_seq: String::new(),
            ref1_align: String::new(),
            alt1_align: String::new(),
            ref2_align: String::new(),
            alt2_align: String::new(),
            allele1_align: None,
            allele2_align: None,
            peak_a: Vec::new(),
            peak_c: Vec::new(),
            peak_g: Vec::new(),
            peak_t: Vec::new(),
            basecall_pos: Vec::new(),
            basecalls: BTreeMap::new(),
            variants: VariantTable::default(),
            meta: ToolMeta::default(),
            chart_config: None,
            extra: BTreeMap::new(),
        }
    }
}

impl RawAlignment {
    pub fn orientation(&self) -> Orientation {
        if self.ref1_forward == 0 {
            Orientation::Reverse
        } else {
            Orientation::Forward
        }
    }

    /// 0-based position of the alignment window's first reference base
    pub fn reference_start(&self) -> i64 {
        self.ref1_pos - 1
    }

    /// Gapped alignment strings for the given allele (1 or 2)
    pub fn allele_strings(&self, allele: u8) -> (&str, &str) {
        match allele {
            1 => (&self.ref1_align, &self.alt1_align),
            _ => (&self.ref2_align, &self.alt2_align),
        }
    }

    pub fn allele_start(&self, allele: u8) -> i64 {
        match allele {
            1 => self.ref1_pos,
            _ => self.ref2_pos,
        }
    }
}

/// One reference coordinate's aggregated view across both allele tracks.
/// Built once per normalized record, read-only afterward.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ConsensusPosition {
    #[serde(rename = "refPos")]
    pub ref_pos: i64,

    /// Observed allele-1 bases (length > 1 signals an insertion run)
    pub alt1: Vec<char>,

    #[serde(rename = "sangerPos1")]
    pub sanger_pos1: Vec<i64>,

    pub alt2: Vec<char>,

    #[serde(rename = "sangerPos2")]
    pub sanger_pos2: Vec<i64>,

    /// IUPAC-merged bases; empty when either track is empty at this position
    pub cons: Vec<char>,
}

/// Normalized, forward-stranded alignment record with derived tracks.
///
/// The raw record is flattened into the output so downstream consumers see
/// the tool's own field names plus the derived columns.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedAlignment {
    #[serde(flatten)]
    pub record: RawAlignment,

    #[serde(rename = "originalOrientation")]
    pub original_orientation: Orientation,

    /// Consensus map keyed by stringified reference coordinate
    #[serde(rename = "consensusAlign")]
    pub consensus_align: BTreeMap<String, ConsensusPosition>,

    /// Reference base for each read position (gap where the read inserts)
    #[serde(rename = "readSeqRef")]
    pub read_seq_ref: String,

    /// Diploid IUPAC consensus of primary and secondary base calls
    #[serde(rename = "readSeqConsensus")]
    pub read_seq_consensus: String,

    #[serde(rename = "readSeqConsensusComplementary")]
    pub read_seq_consensus_complementary: String,

    /// Primary-sequence length; absent when the tool emitted no base calls
    #[serde(rename = "baseCount", default, skip_serializing_if = "Option::is_none")]
    pub base_count: Option<usize>,

    /// Canonical HGVS representation -> every discovered equivalent
    #[serde(rename = "hgvsAlternatives")]
    pub hgvs_alternatives: BTreeMap<String, Vec<String>>,
}

/// Variant annotation parameters, consumed when resolving variant rows
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    /// Preferred target transcript accession for canonical selection
    pub transcript: Option<String>,

    pub gene: Option<String>,

    pub assembly: String,
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            transcript: None,
            gene: None,
            assembly: "GRCh38".to_string(),
        }
    }
}
