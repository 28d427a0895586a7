// ==============================================================================
// lib.rs - Sanger Trace Processor Library
// ==============================================================================
// Description: Library interface for trace normalization and variant mapping
// Author: Matt Barham
// Created: 2026-01-19
// Modified: 2026-02-02
// Version: 1.0.0
// ==============================================================================

pub mod iupac;
pub mod models;
pub mod normalizer;
pub mod resolver;
