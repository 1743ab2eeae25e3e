//! End-condition census: how many markers stopped for which reason, and
//! which internal errors aborted them.

use std::collections::BTreeSet;
use std::fmt;

use mrk_core::{CodeTable, EndCond, MrkResult};
use mrk_state::StateTable;

/// Marker count of one distinct end-condition code.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CensusEntry {
    pub code:  EndCond,
    /// Resolved name; code 0 is reported as `"aborted"`.
    pub name:  String,
    pub count: usize,
}

/// One distinct (message, line, module) error record.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorLine {
    pub message: String,
    pub line:    u32,
    pub module:  String,
}

impl fmt::Display for ErrorLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Error: {} at line {} in {}", self.message, self.line, self.module)
    }
}

/// Census of a final-state table.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CensusReport {
    /// Ascending by code, one entry per distinct code present.
    pub entries: Vec<CensusEntry>,
    /// Distinct non-zero error records, ascending by (message, line, module)
    /// code.
    pub errors:  Vec<ErrorLine>,
}

impl CensusReport {
    /// Sum of all entry counts (equals the table length).
    pub fn total(&self) -> usize {
        self.entries.iter().map(|e| e.count).sum()
    }

    /// Count for `code`, 0 if no marker has it.
    pub fn count(&self, code: EndCond) -> usize {
        self.entries
            .iter()
            .find(|e| e.code == code)
            .map_or(0, |e| e.count)
    }

    /// Human-readable summary: a header, `"<count> : <name>"` per entry,
    /// then one line per error record.
    pub fn lines(&self) -> Vec<String> {
        let mut out = Vec::with_capacity(1 + self.entries.len() + self.errors.len());
        out.push("End conditions:".to_owned());
        out.extend(self.entries.iter().map(|e| format!("{} : {}", e.count, e.name)));
        out.extend(self.errors.iter().map(ErrorLine::to_string));
        out
    }
}

/// Tabulate end conditions and error records of `table`.
///
/// Every code is resolved through `codes`; an unknown end-condition,
/// message or module code fails the whole census.
pub fn endcondition_census<C: CodeTable + ?Sized>(
    table: &StateTable,
    codes: &C,
) -> MrkResult<CensusReport> {
    let entries = table
        .endconds()
        .into_iter()
        .map(|(code, count)| {
            let name = if code.is_none() {
                "aborted".to_owned()
            } else {
                codes.endcond_name(code)?
            };
            Ok(CensusEntry { code, name, count })
        })
        .collect::<MrkResult<Vec<_>>>()?;

    let triples: BTreeSet<(u32, u32, u32)> = table
        .errormsg()
        .iter()
        .zip(table.errorline())
        .zip(table.errormod())
        .map(|((&msg, &line), &module)| (msg, line, module))
        .filter(|&(msg, line, module)| (msg, line, module) != (0, 0, 0))
        .collect();

    let errors = triples
        .into_iter()
        .map(|(msg, line, module)| {
            Ok(ErrorLine {
                message: codes.error_message(msg)?.to_owned(),
                line,
                module:  codes.error_module(module)?.to_owned(),
            })
        })
        .collect::<MrkResult<Vec<_>>>()?;

    Ok(CensusReport { entries, errors })
}
