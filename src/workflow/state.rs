//! Course-creation wizard state with gated phase navigation.
//!
//! `WorkflowManager` owns the current phase, the set of completed phases,
//! the data submitted for each phase and the last validation errors per
//! phase. All mutation goes through its methods.
//!
//! Navigation rule: from the current phase the wizard may go to any earlier
//! phase, stay, step one phase forward, or jump to any phase already
//! completed. Arbitrary forward jumps are rejected.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::{clog_debug, clog_warn};

use super::validation::{validate_phase_data, FieldErrors, ValidationResult};
use super::{Phase, PhaseConfig, PhaseData};

/// A record of a phase being entered.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseHistoryEntry {
    pub phase: Phase,
    pub entered_at: DateTime<Utc>,
}

/// Outcome of submitting a phase. A rejection carries the field errors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhaseCompletion {
    pub success: bool,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub errors: FieldErrors,
}

/// Serializable copy of a manager's full state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowSnapshot {
    pub current_phase: Phase,
    pub completed_phases: BTreeSet<Phase>,
    pub phase_data: BTreeMap<Phase, PhaseData>,
    pub validation_errors: BTreeMap<Phase, FieldErrors>,
    #[serde(default)]
    pub phase_history: Vec<PhaseHistoryEntry>,
}

#[derive(Debug, Clone)]
pub struct WorkflowManager {
    current_phase: Phase,
    completed_phases: BTreeSet<Phase>,
    phase_data: BTreeMap<Phase, PhaseData>,
    validation_errors: BTreeMap<Phase, FieldErrors>,
    phase_history: Vec<PhaseHistoryEntry>,
}

impl WorkflowManager {
    pub fn new() -> Self {
        Self::with_initial_phase(Phase::first())
    }

    pub fn with_initial_phase(phase: Phase) -> Self {
        Self {
            current_phase: phase,
            completed_phases: BTreeSet::new(),
            phase_data: BTreeMap::new(),
            validation_errors: BTreeMap::new(),
            phase_history: vec![PhaseHistoryEntry {
                phase,
                entered_at: Utc::now(),
            }],
        }
    }

    /// Rebuild a manager from a snapshot, rejecting inconsistent state.
    pub fn restore(snapshot: WorkflowSnapshot) -> Result<Self> {
        let WorkflowSnapshot {
            current_phase,
            completed_phases,
            phase_data,
            validation_errors,
            mut phase_history,
        } = snapshot;

        // complete_phase is the only writer of both, so they cover the same phases
        if let Some(phase) = phase_data.keys().find(|p| !completed_phases.contains(*p)) {
            return Err(Error::Validation(format!(
                "snapshot holds data for uncompleted phase {}",
                phase
            )));
        }
        if let Some(phase) = completed_phases.iter().find(|p| !phase_data.contains_key(*p)) {
            return Err(Error::Validation(format!(
                "snapshot marks {} completed without data",
                phase
            )));
        }

        if phase_history.is_empty() {
            phase_history.push(PhaseHistoryEntry {
                phase: current_phase,
                entered_at: Utc::now(),
            });
        }

        clog_debug!(
            "WorkflowManager::restore current={} completed={}",
            current_phase,
            completed_phases.len()
        );

        Ok(Self {
            current_phase,
            completed_phases,
            phase_data,
            validation_errors,
            phase_history,
        })
    }

    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            current_phase: self.current_phase,
            completed_phases: self.completed_phases.clone(),
            phase_data: self.phase_data.clone(),
            validation_errors: self.validation_errors.clone(),
            phase_history: self.phase_history.clone(),
        }
    }

    pub fn current_phase(&self) -> Phase {
        self.current_phase
    }

    pub fn phase_order(&self) -> &'static [Phase] {
        Phase::all()
    }

    pub fn current_phase_index(&self) -> usize {
        self.current_phase.index()
    }

    pub fn current_phase_config(&self) -> &'static PhaseConfig {
        PhaseConfig::for_phase(self.current_phase)
    }

    /// True if `phase` is at most one step ahead of the current phase, or
    /// has already been completed.
    pub fn can_proceed_to_phase(&self, phase: Phase) -> bool {
        phase.index() <= self.current_phase_index() + 1 || self.completed_phases.contains(&phase)
    }

    pub fn validate_phase_data(&self, phase: Phase, data: &PhaseData) -> ValidationResult {
        validate_phase_data(phase, data)
    }

    /// Submit `data` for `phase`. On success the data replaces any earlier
    /// submission and the phase is marked completed; on failure only the
    /// phase's validation errors change.
    pub fn complete_phase(&mut self, phase: Phase, data: PhaseData) -> PhaseCompletion {
        let result = validate_phase_data(phase, &data);
        if !result.is_valid {
            clog_debug!(
                "WorkflowManager: {} rejected ({} field errors)",
                phase,
                result.errors.len()
            );
            self.validation_errors.insert(phase, result.errors.clone());
            return PhaseCompletion {
                success: false,
                errors: result.errors,
            };
        }

        self.phase_data.insert(phase, data);
        self.completed_phases.insert(phase);
        self.validation_errors.remove(&phase);
        clog_debug!(
            "WorkflowManager: {} completed ({}/{})",
            phase,
            self.completed_phases.len(),
            Phase::all().len()
        );

        PhaseCompletion {
            success: true,
            errors: FieldErrors::new(),
        }
    }

    pub fn move_to_phase(&mut self, phase: Phase) -> Result<()> {
        if !self.can_proceed_to_phase(phase) {
            clog_warn!(
                "WorkflowManager: rejected move {} -> {}",
                self.current_phase,
                phase
            );
            return Err(Error::InvalidPhaseTransition {
                from: self.current_phase.to_string(),
                to: phase.to_string(),
            });
        }

        clog_debug!("WorkflowManager: {} -> {}", self.current_phase, phase);
        self.current_phase = phase;
        self.phase_history.push(PhaseHistoryEntry {
            phase,
            entered_at: Utc::now(),
        });
        Ok(())
    }

    /// Advance one phase. Returns `false` without changing state at the last phase.
    pub fn next_phase(&mut self) -> bool {
        match self.current_phase.next() {
            // The next phase is always reachable.
            Some(next) => self.move_to_phase(next).is_ok(),
            None => false,
        }
    }

    /// Step back one phase. Returns `false` without changing state at the first phase.
    pub fn previous_phase(&mut self) -> bool {
        match self.current_phase.previous() {
            Some(prev) => self.move_to_phase(prev).is_ok(),
            None => false,
        }
    }

    /// Percentage of phases completed, 0.0 to 100.0.
    pub fn phase_progress(&self) -> f64 {
        100.0 * self.completed_phases.len() as f64 / Phase::all().len() as f64
    }

    pub fn is_complete(&self) -> bool {
        self.completed_phases.len() == Phase::all().len()
    }

    /// Copy of every phase's submitted data.
    pub fn all_data(&self) -> BTreeMap<Phase, PhaseData> {
        self.phase_data.clone()
    }

    pub fn phase_data(&self, phase: Phase) -> Option<&PhaseData> {
        self.phase_data.get(&phase)
    }

    pub fn validation_errors(&self, phase: Phase) -> Option<&FieldErrors> {
        self.validation_errors.get(&phase)
    }

    pub fn completed_phases(&self) -> &BTreeSet<Phase> {
        &self.completed_phases
    }

    pub fn is_phase_completed(&self, phase: Phase) -> bool {
        self.completed_phases.contains(&phase)
    }

    pub fn phase_history(&self) -> &[PhaseHistoryEntry] {
        &self.phase_history
    }

    /// Return to the first phase with no data, errors or completions.
    pub fn reset(&mut self) {
        clog_debug!("WorkflowManager::reset");
        *self = Self::new();
    }
}

impl Default for WorkflowManager {
    fn default() -> Self {
        Self::new()
    }
}
