//! # Multiple Sequence Alignment
//!
//! Loads an alignment from FASTA or relaxed sequential PHYLIP (detected
//! from content), validates its shape, and exposes the intrinsic
//! statistics the feature pipeline consumes through the
//! [`Alignment`](crate::data::Alignment) trait.
//!
//! Duplicate sequences distort topological distances, so difficulty
//! features are refused for duplicate-containing alignments unless the
//! caller asks for a reduced copy first.

use std::collections::HashSet;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::data::stats;
use crate::data::Alignment;
use crate::error::{PythiaError, Result};

/// Residues (beyond gaps) that a DNA sequence may contain, including
/// IUPAC ambiguity codes.
const DNA_CHARS: &[u8] = b"ACGTUNRYSWKMBDHV";

/// Detected residue alphabet of an alignment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    Dna,
    Protein,
}

impl DataType {
    /// Default substitution model for this alphabet.
    pub fn model_string(self) -> &'static str {
        match self {
            DataType::Dna => "GTR+G",
            DataType::Protein => "LG+G",
        }
    }
}

/// An in-memory alignment: equal-length rows of residues plus taxon names.
#[derive(Debug, Clone)]
pub struct Msa {
    path: PathBuf,
    taxa: Vec<String>,
    rows: Vec<Vec<u8>>,
    data_type: DataType,
}

impl Msa {
    /// Load and validate an alignment from `path` (FASTA or PHYLIP).
    pub fn from_file(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let text = fs::read_to_string(&path)?;
        let (taxa, rows) = if text.trim_start().starts_with('>') {
            parse_fasta(&text)?
        } else {
            parse_phylip(&text)?
        };
        Self::validate(&path, &taxa, &rows)?;
        let data_type = detect_data_type(&rows);
        Ok(Self {
            path,
            taxa,
            rows,
            data_type,
        })
    }

    fn validate(path: &Path, taxa: &[String], rows: &[Vec<u8>]) -> Result<()> {
        if rows.is_empty() {
            return Err(PythiaError::invalid_data(format!(
                "{} contains no sequences",
                path.display()
            )));
        }
        let n_sites = rows[0].len();
        if n_sites == 0 {
            return Err(PythiaError::invalid_data(format!(
                "{} contains empty sequences",
                path.display()
            )));
        }
        for (taxon, row) in taxa.iter().zip(rows) {
            if row.len() != n_sites {
                return Err(PythiaError::invalid_data(format!(
                    "sequence '{}' has {} sites, expected {}",
                    taxon,
                    row.len(),
                    n_sites
                )));
            }
        }
        Ok(())
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn taxa(&self) -> &[String] {
        &self.taxa
    }

    /// True when at least two sequences are residue-for-residue identical.
    pub fn contains_duplicates(&self) -> bool {
        let mut seen = HashSet::new();
        self.rows.iter().any(|row| !seen.insert(row.as_slice()))
    }

    /// Write a FASTA copy with duplicate sequences removed (first
    /// occurrence kept) and return the alignment loaded from it.
    pub fn save_reduced(&self, reduced_path: impl Into<PathBuf>) -> Result<Msa> {
        let reduced_path = reduced_path.into();
        let file = fs::File::create(&reduced_path)?;
        let mut writer = BufWriter::new(file);
        let mut seen = HashSet::new();
        for (taxon, row) in self.taxa.iter().zip(&self.rows) {
            if seen.insert(row.as_slice()) {
                writeln!(writer, ">{}", taxon)?;
                writer.write_all(row)?;
                writeln!(writer)?;
            }
        }
        writer.flush()?;
        Msa::from_file(reduced_path)
    }
}

impl Alignment for Msa {
    fn model_string(&self) -> String {
        self.data_type.model_string().to_string()
    }

    fn file_path(&self) -> &Path {
        &self.path
    }

    fn taxon_count(&self) -> usize {
        self.rows.len()
    }

    fn site_count(&self) -> usize {
        self.rows[0].len()
    }

    fn entropy(&self) -> f64 {
        stats::mean_entropy(&self.rows)
    }

    fn bollback_score(&self) -> f64 {
        stats::bollback_multinomial(&self.rows)
    }

    fn pattern_entropy(&self) -> f64 {
        stats::pattern_entropy(&self.rows)
    }
}

fn parse_fasta(text: &str) -> Result<(Vec<String>, Vec<Vec<u8>>)> {
    let mut taxa = Vec::new();
    let mut rows: Vec<Vec<u8>> = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(header) = line.strip_prefix('>') {
            // taxon name is the first whitespace token of the header
            let name = header.split_whitespace().next().unwrap_or("").to_string();
            if name.is_empty() {
                return Err(PythiaError::invalid_data("FASTA record with empty name"));
            }
            taxa.push(name);
            rows.push(Vec::new());
        } else {
            let row = rows
                .last_mut()
                .ok_or_else(|| PythiaError::invalid_data("FASTA sequence before first header"))?;
            row.extend(line.bytes().filter(|b| !b.is_ascii_whitespace()));
        }
    }
    Ok((taxa, rows))
}

/// Relaxed sequential PHYLIP: a `ntaxa nsites` header, then one record per
/// taxon whose sequence may continue over following lines until it reaches
/// `nsites` residues.
fn parse_phylip(text: &str) -> Result<(Vec<String>, Vec<Vec<u8>>)> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header = lines
        .next()
        .ok_or_else(|| PythiaError::invalid_data("empty PHYLIP file"))?;
    let mut fields = header.split_whitespace();
    let n_taxa: usize = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| PythiaError::invalid_data("PHYLIP header missing taxon count"))?;
    let n_sites: usize = fields
        .next()
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| PythiaError::invalid_data("PHYLIP header missing site count"))?;

    let mut taxa = Vec::with_capacity(n_taxa);
    let mut rows: Vec<Vec<u8>> = Vec::with_capacity(n_taxa);
    for line in lines {
        let needs_new_record = rows.last().map_or(true, |row| row.len() >= n_sites);
        if needs_new_record {
            if rows.len() == n_taxa {
                return Err(PythiaError::invalid_data(format!(
                    "PHYLIP file has more than {n_taxa} records"
                )));
            }
            let mut fields = line.split_whitespace();
            let name = fields
                .next()
                .ok_or_else(|| PythiaError::invalid_data("PHYLIP record with no name"))?;
            taxa.push(name.to_string());
            rows.push(fields.flat_map(|f| f.bytes()).collect());
        } else {
            let row = rows.last_mut().unwrap();
            row.extend(line.bytes().filter(|b| !b.is_ascii_whitespace()));
        }
    }

    if rows.len() != n_taxa {
        return Err(PythiaError::invalid_data(format!(
            "PHYLIP header promises {} taxa, found {}",
            n_taxa,
            rows.len()
        )));
    }
    for (taxon, row) in taxa.iter().zip(&rows) {
        if row.len() != n_sites {
            return Err(PythiaError::invalid_data(format!(
                "PHYLIP sequence '{}' has {} sites, header promises {}",
                taxon,
                row.len(),
                n_sites
            )));
        }
    }
    Ok((taxa, rows))
}

/// DNA if every non-gap residue belongs to the DNA alphabet (including
/// IUPAC ambiguity codes), otherwise protein.
fn detect_data_type(rows: &[Vec<u8>]) -> DataType {
    let dna = rows.iter().flatten().all(|&b| {
        stats::is_gap(b) || DNA_CHARS.contains(&b.to_ascii_uppercase())
    });
    if dna {
        DataType::Dna
    } else {
        DataType::Protein
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_msa(content: &str, suffix: &str) -> tempfile::NamedTempFile {
        let mut f = tempfile::Builder::new().suffix(suffix).tempfile().unwrap();
        f.write_all(content.as_bytes()).unwrap();
        f
    }

    const FASTA_DNA: &str = ">t1\nACGTACGT\n>t2\nACG-ACGT\n>t3\nACGTACGA\n";

    #[test]
    fn test_fasta_dimensions_and_model() {
        let f = write_msa(FASTA_DNA, ".fasta");
        let msa = Msa::from_file(f.path()).unwrap();
        assert_eq!(msa.taxon_count(), 3);
        assert_eq!(msa.site_count(), 8);
        assert_eq!(msa.data_type(), DataType::Dna);
        assert_eq!(msa.model_string(), "GTR+G");
    }

    #[test]
    fn test_fasta_multiline_sequences_concatenate() {
        let f = write_msa(">t1\nACGT\nACGT\n>t2\nACGTACGT\n", ".fasta");
        let msa = Msa::from_file(f.path()).unwrap();
        assert_eq!(msa.site_count(), 8);
    }

    #[test]
    fn test_protein_alignment_detected() {
        let f = write_msa(">t1\nMKLVFE\n>t2\nMKLIFE\n", ".fasta");
        let msa = Msa::from_file(f.path()).unwrap();
        assert_eq!(msa.data_type(), DataType::Protein);
        assert_eq!(msa.model_string(), "LG+G");
    }

    #[test]
    fn test_phylip_sequential() {
        let f = write_msa("3 8\nt1 ACGTACGT\nt2 ACG-ACGT\nt3 ACGTACGA\n", ".phy");
        let msa = Msa::from_file(f.path()).unwrap();
        assert_eq!(msa.taxon_count(), 3);
        assert_eq!(msa.site_count(), 8);
        assert_eq!(msa.taxa()[2], "t3");
    }

    #[test]
    fn test_phylip_continuation_lines() {
        let f = write_msa("2 8\nt1 ACGT\nACGT\nt2 ACGTACGT\n", ".phy");
        let msa = Msa::from_file(f.path()).unwrap();
        assert_eq!(msa.site_count(), 8);
    }

    #[test]
    fn test_ragged_alignment_rejected() {
        let f = write_msa(">t1\nACGT\n>t2\nACGTACGT\n", ".fasta");
        match Msa::from_file(f.path()) {
            Err(PythiaError::InvalidData { message }) => {
                assert!(message.contains("t1"));
            }
            other => panic!("expected InvalidData, got {other:?}"),
        }
    }

    #[test]
    fn test_phylip_taxon_count_mismatch_rejected() {
        let f = write_msa("3 4\nt1 ACGT\nt2 ACGT\n", ".phy");
        assert!(Msa::from_file(f.path()).is_err());
    }

    #[test]
    fn test_duplicate_detection() {
        let f = write_msa(">t1\nACGT\n>t2\nACGT\n>t3\nACGA\n", ".fasta");
        let msa = Msa::from_file(f.path()).unwrap();
        assert!(msa.contains_duplicates());

        let f = write_msa(FASTA_DNA, ".fasta");
        let msa = Msa::from_file(f.path()).unwrap();
        assert!(!msa.contains_duplicates());
    }

    #[test]
    fn test_save_reduced_drops_duplicates() {
        let f = write_msa(">t1\nACGT\n>t2\nACGT\n>t3\nACGA\n", ".fasta");
        let msa = Msa::from_file(f.path()).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let reduced_path = dir.path().join("reduced.fasta");
        let reduced = msa.save_reduced(&reduced_path).unwrap();
        assert_eq!(reduced.taxon_count(), 2);
        assert_eq!(reduced.taxa(), ["t1", "t3"]);
        assert!(!reduced.contains_duplicates());
        assert_eq!(reduced.file_path(), reduced_path);
    }

    #[test]
    fn test_intrinsic_stats_are_finite() {
        let f = write_msa(FASTA_DNA, ".fasta");
        let msa = Msa::from_file(f.path()).unwrap();
        assert!(msa.entropy().is_finite());
        assert!(msa.bollback_score().is_finite());
        assert!(msa.pattern_entropy().is_finite());
        assert!(msa.entropy() > 0.0);
    }
}
