//! One simulation run's outputs and the store that serves them.
//!
//! A run may lack any of its result groups (a run without orbit recording
//! has no orbit table, an aborted run may lack the final state).  Instead of
//! probing for attributes, [`RunOutput::capabilities`] lists what is present
//! and the `require_*` accessors turn absence into
//! [`MrkError::MissingData`].

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use mrk_core::{MrkError, MrkResult, OrbitWriteOptions};

use crate::{OrbitTable, StateTable};

// ── Capabilities ──────────────────────────────────────────────────────────────

/// A result group that a run may or may not contain.
#[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
pub enum Capability {
    IniState,
    EndState,
    Orbit,
    /// Orbit samples tagged with Poincaré plane indices.
    Poincare,
    /// Orbit-write options (needed to interpret plane indices).
    Options,
}

impl Capability {
    pub fn as_str(self) -> &'static str {
        match self {
            Capability::IniState => "inistate",
            Capability::EndState => "endstate",
            Capability::Orbit    => "orbit",
            Capability::Poincare => "orbit(poincare)",
            Capability::Options  => "options",
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The set of result groups available for one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Capabilities(BTreeSet<Capability>);

impl Capabilities {
    pub fn contains(&self, cap: Capability) -> bool {
        self.0.contains(&cap)
    }

    /// `Ok` if every capability in `caps` is present, otherwise
    /// `MissingData` naming the first absent one.
    pub fn require(&self, caps: &[Capability]) -> MrkResult<()> {
        match caps.iter().find(|c| !self.contains(**c)) {
            Some(missing) => Err(MrkError::MissingData(missing.as_str().to_owned())),
            None => Ok(()),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = Capability> + '_ {
        self.0.iter().copied()
    }
}

// ── RunOutput ─────────────────────────────────────────────────────────────────

/// All tables produced by one simulation run.
#[derive(Clone, Debug, Default)]
pub struct RunOutput {
    /// Run identifier.
    pub qid:      String,
    pub inistate: Option<StateTable>,
    pub endstate: Option<StateTable>,
    pub orbit:    Option<OrbitTable>,
    pub options:  Option<OrbitWriteOptions>,
}

impl RunOutput {
    /// An empty run; attach tables with the `with_*` methods.
    pub fn new(qid: impl Into<String>) -> Self {
        Self { qid: qid.into(), ..Self::default() }
    }

    pub fn with_inistate(mut self, table: StateTable) -> Self {
        self.inistate = Some(table);
        self
    }

    pub fn with_endstate(mut self, table: StateTable) -> Self {
        self.endstate = Some(table);
        self
    }

    pub fn with_orbit(mut self, table: OrbitTable) -> Self {
        self.orbit = Some(table);
        self
    }

    pub fn with_options(mut self, options: OrbitWriteOptions) -> Self {
        self.options = Some(options);
        self
    }

    /// Which result groups this run carries.
    pub fn capabilities(&self) -> Capabilities {
        let mut caps = BTreeSet::new();
        if self.inistate.is_some() {
            caps.insert(Capability::IniState);
        }
        if self.endstate.is_some() {
            caps.insert(Capability::EndState);
        }
        if let Some(orbit) = &self.orbit {
            caps.insert(Capability::Orbit);
            if orbit.has_poincare() {
                caps.insert(Capability::Poincare);
            }
        }
        if self.options.is_some() {
            caps.insert(Capability::Options);
        }
        Capabilities(caps)
    }

    pub fn require_inistate(&self) -> MrkResult<&StateTable> {
        self.inistate.as_ref().ok_or_else(|| missing(Capability::IniState))
    }

    pub fn require_endstate(&self) -> MrkResult<&StateTable> {
        self.endstate.as_ref().ok_or_else(|| missing(Capability::EndState))
    }

    pub fn require_orbit(&self) -> MrkResult<&OrbitTable> {
        self.orbit.as_ref().ok_or_else(|| missing(Capability::Orbit))
    }

    pub fn require_options(&self) -> MrkResult<&OrbitWriteOptions> {
        self.options.as_ref().ok_or_else(|| missing(Capability::Options))
    }
}

fn missing(cap: Capability) -> MrkError {
    MrkError::MissingData(cap.as_str().to_owned())
}

// ── RunStore ──────────────────────────────────────────────────────────────────

/// Source of run outputs, keyed by run identifier.
///
/// The on-disk container is not part of this workspace; applications
/// implement this trait over their file format.  [`MemoryStore`] serves
/// runs already held in memory.
pub trait RunStore {
    /// The outputs of run `qid`.
    fn run(&self, qid: &str) -> MrkResult<&RunOutput>;

    /// Identifiers of all runs in the store.
    fn qids(&self) -> Vec<String>;
}

/// A [`RunStore`] over in-memory runs.
#[derive(Default)]
pub struct MemoryStore {
    runs: HashMap<String, RunOutput>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a run under its own `qid`.
    pub fn insert(&mut self, run: RunOutput) {
        self.runs.insert(run.qid.clone(), run);
    }
}

impl RunStore for MemoryStore {
    fn run(&self, qid: &str) -> MrkResult<&RunOutput> {
        self.runs
            .get(qid)
            .ok_or_else(|| MrkError::MissingData(format!("run {qid}")))
    }

    fn qids(&self) -> Vec<String> {
        let mut qids: Vec<String> = self.runs.keys().cloned().collect();
        qids.sort();
        qids
    }
}
