//! DIMACS CNF format parser.
//!
//! Standard format used in SAT competitions: `c` comment lines, a
//! `p cnf <vars> <clauses>` header, then zero-terminated clause records
//! which may span lines.

use aurora_base::{Error, Result};
use std::io::{BufRead, BufReader, Read};

/// A DIMACS CNF formula, as read: clauses are raw literal lists with no
/// normalization applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DimacsCnf {
    /// Number of variables declared in the header.
    pub num_vars: usize,
    /// Clauses as vectors of signed literals.
    pub clauses: Vec<Vec<i32>>,
}

impl DimacsCnf {
    /// Parses DIMACS CNF from a reader.
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let reader = BufReader::new(reader);
        let mut num_vars = 0;
        let mut clauses = Vec::new();
        let mut header_found = false;
        // Clause records may span lines, the buffer carries over.
        let mut pending: Vec<i32> = Vec::new();

        for line in reader.lines() {
            let line = line?;
            let line = line.trim();

            if line.is_empty() || line.starts_with('c') {
                continue;
            }

            if let Some(rest) = line.strip_prefix('p') {
                let parts: Vec<&str> = rest.split_whitespace().collect();
                if parts.len() < 3 || parts[0] != "cnf" {
                    return Err(Error::Parse(format!("malformed header line: {line:?}")));
                }
                num_vars = parts[1]
                    .parse()
                    .map_err(|e| Error::Parse(format!("invalid variable count: {e}")))?;
                let num_clauses: usize = parts[2]
                    .parse()
                    .map_err(|e| Error::Parse(format!("invalid clause count: {e}")))?;
                header_found = true;
                clauses.reserve(num_clauses);
                continue;
            }

            if !header_found {
                return Err(Error::Parse(
                    "DIMACS header 'p cnf ...' not found".to_string(),
                ));
            }

            for token in line.split_whitespace() {
                let lit: i32 = token
                    .parse()
                    .map_err(|e| Error::Parse(format!("invalid literal {token:?}: {e}")))?;
                if lit == 0 {
                    clauses.push(std::mem::take(&mut pending));
                } else {
                    pending.push(lit);
                }
            }
        }

        if !header_found {
            return Err(Error::Parse(
                "DIMACS header 'p cnf ...' not found".to_string(),
            ));
        }
        // Tolerate a missing final terminator.
        if !pending.is_empty() {
            clauses.push(pending);
        }

        tracing::debug!(num_vars, num_clauses = clauses.len(), "parsed DIMACS input");
        Ok(Self { num_vars, clauses })
    }

    /// Parses DIMACS CNF from a string.
    pub fn parse(s: &str) -> Result<Self> {
        Self::from_reader(s.as_bytes())
    }

    /// Converts to DIMACS text.
    #[must_use]
    pub fn to_dimacs(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("p cnf {} {}\n", self.num_vars, self.clauses.len()));
        for clause in &self.clauses {
            for lit in clause {
                out.push_str(&format!("{lit} "));
            }
            out.push_str("0\n");
        }
        out
    }
}
