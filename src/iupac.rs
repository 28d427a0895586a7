// ==============================================================================
// iupac.rs - IUPAC Nucleotide Algebra
// ==============================================================================
// Description: Complementation and ambiguity-code consensus over IUPAC DNA codes
// Author: Matt Barham
// Created: 2026-01-19
// Modified: 2026-01-28
// Version: 1.0.0
// ==============================================================================
// All functions are pure. Input characters outside the 16 IUPAC symbols
// (plus gap '-', dot '.', space) are a precondition violation: they are
// passed through uppercased so the breach stays visible downstream, never
// silently dropped.
// ==============================================================================

use std::collections::BTreeSet;

/// Complement a single IUPAC symbol. Case-insensitive input, uppercase output.
///
/// Gap characters map to themselves except '.' which normalizes to '-'.
pub fn complement_symbol(symbol: char) -> char {
    match symbol.to_ascii_uppercase() {
        'A' => 'T',
        'C' => 'G',
        'G' => 'C',
        'T' => 'A',
        'R' => 'Y',
        'Y' => 'R',
        'S' => 'S',
        'W' => 'W',
        'K' => 'M',
        'M' => 'K',
        'B' => 'V',
        'D' => 'H',
        'H' => 'D',
        'V' => 'B',
        'N' => 'N',
        '-' => '-',
        ' ' => ' ',
        '.' => '-',
        other => other, // Precondition violation, kept visible
    }
}

/// Complement a DNA sequence supporting IUPAC ambiguity codes.
///
/// # Examples
/// ```
/// use sanger_processor::iupac::complement;
///
/// assert_eq!(complement("acGT"), "TGCA");
/// assert_eq!(complement("RYN-"), "YRN-");
/// ```
pub fn complement(sequence: &str) -> String {
    sequence.chars().map(complement_symbol).collect()
}

/// Reverse complement a DNA sequence supporting IUPAC ambiguity codes.
pub fn reverse_complement(sequence: &str) -> String {
    sequence.chars().rev().map(complement_symbol).collect()
}

/// Expand an IUPAC symbol to the set of bases it represents.
///
/// Gaps ('-', '.') expand to the gap singleton; an unrecognized symbol
/// expands to the full {A,C,G,T} set (treated as "any base").
pub fn bases_for(symbol: char) -> &'static [char] {
    match symbol.to_ascii_uppercase() {
        'A' => &['A'],
        'C' => &['C'],
        'G' => &['G'],
        'T' => &['T'],
        'R' => &['A', 'G'],
        'Y' => &['C', 'T'],
        'S' => &['C', 'G'],
        'W' => &['A', 'T'],
        'K' => &['G', 'T'],
        'M' => &['A', 'C'],
        'B' => &['C', 'G', 'T'],
        'D' => &['A', 'G', 'T'],
        'H' => &['A', 'C', 'T'],
        'V' => &['A', 'C', 'G'],
        '-' | '.' => &['-'],
        _ => &['A', 'C', 'G', 'T'],
    }
}

/// Canonical base-set to IUPAC symbol lookup (the 16-entry table).
fn symbol_for(bases: &BTreeSet<char>) -> Option<char> {
    let key: String = bases.iter().collect();
    match key.as_str() {
        "A" => Some('A'),
        "C" => Some('C'),
        "G" => Some('G'),
        "T" => Some('T'),
        "AG" => Some('R'),
        "CT" => Some('Y'),
        "CG" => Some('S'),
        "AT" => Some('W'),
        "GT" => Some('K'),
        "AC" => Some('M'),
        "CGT" => Some('B'),
        "AGT" => Some('D'),
        "ACT" => Some('H'),
        "ACG" => Some('V'),
        "ACGT" => Some('N'),
        "-" => Some('-'),
        _ => None,
    }
}

/// Return the IUPAC code representing the union of a set of observed bases.
///
/// Policy (most-informative wins):
/// 1. When more than one symbol is present, gaps ('-', '.') are dropped.
/// 2. When more than one symbol still remains, 'N' is dropped.
/// 3. An empty resulting set yields the gap code '-'.
/// 4. A residual set outside the canonical table yields 'N'.
///
/// # Examples
/// ```
/// use sanger_processor::iupac::ambiguity_code_for;
///
/// assert_eq!(ambiguity_code_for(['A', 'G']), 'R');
/// assert_eq!(ambiguity_code_for(['A', '-']), 'A');
/// assert_eq!(ambiguity_code_for(['-']), '-');
/// ```
pub fn ambiguity_code_for<I>(bases: I) -> char
where
    I: IntoIterator<Item = char>,
{
    let mut set: BTreeSet<char> = bases.into_iter().map(|b| b.to_ascii_uppercase()).collect();

    // Prefer specific information over "no call"
    if set.len() > 1 {
        set.remove(&'-');
        set.remove(&'.');
    }
    if set.len() > 1 {
        set.remove(&'N');
    }

    if set.is_empty() {
        return '-';
    }

    symbol_for(&set).unwrap_or('N')
}

/// Generate an IUPAC consensus of two aligned sequences, merging ambiguity
/// codes by base-set expansion.
///
/// The shorter sequence is gap-padded on the right. Identical positions
/// (case-insensitive) pass through uppercased; differing positions merge via
/// the union of each symbol's represented base-set. An empty input sequence
/// degenerates the consensus to the other sequence, uppercased.
pub fn pairwise_consensus(seq1: &str, seq2: &str) -> String {
    if seq1.is_empty() {
        return seq2.to_uppercase();
    }
    if seq2.is_empty() {
        return seq1.to_uppercase();
    }

    let chars1: Vec<char> = seq1.chars().collect();
    let chars2: Vec<char> = seq2.chars().collect();
    let len = chars1.len().max(chars2.len());

    let mut consensus = String::with_capacity(len);
    for i in 0..len {
        let b1 = chars1.get(i).copied().unwrap_or('-').to_ascii_uppercase();
        let b2 = chars2.get(i).copied().unwrap_or('-').to_ascii_uppercase();

        if b1 == b2 {
            consensus.push(b1);
        } else {
            let mut merged: BTreeSet<char> = bases_for(b1).iter().copied().collect();
            merged.extend(bases_for(b2).iter().copied());
            match symbol_for(&merged) {
                Some(symbol) => consensus.push(symbol),
                None => consensus.push(ambiguity_code_for(merged)),
            }
        }
    }

    consensus
}
